//! SeaORM implementation of ReviewerRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::update_error;
use crate::domain::validation::normalize_key;
use crate::domain::{DomainError, Repository, Review, Reviewer, ReviewerRepository};
use crate::models::review::{self, Entity as ReviewEntity};
use crate::models::reviewer::{ActiveModel, Column, Entity as ReviewerEntity};

/// SeaORM-based implementation of ReviewerRepository
pub struct SeaOrmReviewerRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Reviewer> for SeaOrmReviewerRepository {
    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let count = ReviewerEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Reviewer>, DomainError> {
        let reviewer = ReviewerEntity::find_by_id(id).one(&self.db).await?;
        Ok(reviewer.map(Reviewer::from))
    }

    async fn find_all(&self) -> Result<Vec<Reviewer>, DomainError> {
        let reviewers = ReviewerEntity::find()
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(reviewers.into_iter().map(Reviewer::from).collect())
    }

    async fn create(&self, reviewer: Reviewer) -> Result<Reviewer, DomainError> {
        let model = ActiveModel {
            id: NotSet,
            first_name: Set(reviewer.first_name.trim().to_string()),
            last_name: Set(reviewer.last_name.trim().to_string()),
        };

        let result = model.insert(&self.db).await?;
        Ok(Reviewer::from(result))
    }

    async fn update(&self, reviewer: Reviewer) -> Result<Reviewer, DomainError> {
        let model = ActiveModel {
            id: Set(reviewer.id),
            first_name: Set(reviewer.first_name.trim().to_string()),
            last_name: Set(reviewer.last_name.trim().to_string()),
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_error("Reviewer", reviewer.id, e))?;
        Ok(Reviewer::from(result))
    }

    /// Removes the reviewer together with every review they wrote.
    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let reviews = ReviewEntity::delete_many()
            .filter(review::Column::ReviewerId.eq(id))
            .exec(&txn)
            .await?;

        let result = ReviewerEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            // dropping the transaction rolls the review deletion back
            return Err(DomainError::not_found(format!("Reviewer {} not found", id)));
        }

        txn.commit().await?;

        tracing::debug!(
            reviewer_id = id,
            reviews_removed = reviews.rows_affected,
            "reviewer deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl ReviewerRepository for SeaOrmReviewerRepository {
    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Reviewer>, DomainError> {
        let first_key = normalize_key(first_name);
        let last_key = normalize_key(last_name);

        let candidates = ReviewerEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(candidates
            .into_iter()
            .find(|m| {
                normalize_key(&m.first_name) == first_key && normalize_key(&m.last_name) == last_key
            })
            .map(Reviewer::from))
    }

    async fn reviews_of_reviewer(&self, reviewer_id: i32) -> Result<Vec<Review>, DomainError> {
        let reviews = ReviewEntity::find()
            .filter(review::Column::ReviewerId.eq(reviewer_id))
            .order_by_asc(review::Column::Headline)
            .order_by_asc(review::Column::Id)
            .all(&self.db)
            .await?;

        Ok(reviews.into_iter().map(Review::from).collect())
    }

    async fn reviewer_of_review(&self, review_id: i32) -> Result<Option<Reviewer>, DomainError> {
        let Some(review) = ReviewEntity::find_by_id(review_id).one(&self.db).await? else {
            return Ok(None);
        };

        let reviewer = ReviewerEntity::find_by_id(review.reviewer_id)
            .one(&self.db)
            .await?;
        Ok(reviewer.map(Reviewer::from))
    }
}
