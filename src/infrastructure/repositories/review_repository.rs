//! SeaORM implementation of ReviewRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::update_error;
use crate::domain::{Book, DomainError, Repository, Review, ReviewRepository};
use crate::models::book::Entity as BookEntity;
use crate::models::review::{ActiveModel, Column, Entity as ReviewEntity};

/// SeaORM-based implementation of ReviewRepository
pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Review> for SeaOrmReviewRepository {
    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let count = ReviewEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, DomainError> {
        let review = ReviewEntity::find_by_id(id).one(&self.db).await?;
        Ok(review.map(Review::from))
    }

    async fn find_all(&self) -> Result<Vec<Review>, DomainError> {
        let reviews = ReviewEntity::find()
            .order_by_asc(Column::Headline)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(reviews.into_iter().map(Review::from).collect())
    }

    async fn create(&self, review: Review) -> Result<Review, DomainError> {
        let model = ActiveModel {
            id: NotSet,
            headline: Set(review.headline),
            review_text: Set(review.review_text),
            rating: Set(review.rating),
            book_id: Set(review.book_id),
            reviewer_id: Set(review.reviewer_id),
        };

        let result = model.insert(&self.db).await?;
        Ok(Review::from(result))
    }

    async fn update(&self, review: Review) -> Result<Review, DomainError> {
        let model = ActiveModel {
            id: Set(review.id),
            headline: Set(review.headline),
            review_text: Set(review.review_text),
            rating: Set(review.rating),
            book_id: Set(review.book_id),
            reviewer_id: Set(review.reviewer_id),
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_error("Review", review.id, e))?;
        Ok(Review::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = ReviewEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(format!("Review {} not found", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn reviews_of_book(&self, book_id: i32) -> Result<Vec<Review>, DomainError> {
        let reviews = ReviewEntity::find()
            .filter(Column::BookId.eq(book_id))
            .order_by_asc(Column::Headline)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(reviews.into_iter().map(Review::from).collect())
    }

    async fn book_of_review(&self, review_id: i32) -> Result<Option<Book>, DomainError> {
        let Some(review) = ReviewEntity::find_by_id(review_id).one(&self.db).await? else {
            return Ok(None);
        };

        let book = BookEntity::find_by_id(review.book_id).one(&self.db).await?;
        Ok(book.map(Book::from))
    }
}
