//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{key_taken, update_error};
use crate::domain::{Book, BookRepository, DomainError, Repository};
use crate::models::book::{ActiveModel, Column, Entity as BookEntity};
use crate::models::review::{self, Entity as ReviewEntity};
use crate::models::{book_authors, book_categories};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(book: &Book, id: Option<i32>) -> ActiveModel {
    ActiveModel {
        id: id.map_or(NotSet, Set),
        title: Set(book.title.trim().to_string()),
        isbn: Set(book.isbn.trim().to_string()),
        date_published: Set(book.date_published),
    }
}

/// Sorted, de-duplicated copy of the requested link ids.
fn unique_ids(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn insert_links<C>(
    conn: &C,
    book_id: i32,
    author_ids: &[i32],
    category_ids: &[i32],
) -> Result<(), DomainError>
where
    C: ConnectionTrait,
{
    let author_links: Vec<book_authors::ActiveModel> = unique_ids(author_ids)
        .into_iter()
        .map(|author_id| book_authors::ActiveModel {
            book_id: Set(book_id),
            author_id: Set(author_id),
        })
        .collect();

    if !author_links.is_empty() {
        book_authors::Entity::insert_many(author_links)
            .exec_without_returning(conn)
            .await?;
    }

    let category_links: Vec<book_categories::ActiveModel> = unique_ids(category_ids)
        .into_iter()
        .map(|category_id| book_categories::ActiveModel {
            book_id: Set(book_id),
            category_id: Set(category_id),
        })
        .collect();

    if !category_links.is_empty() {
        book_categories::Entity::insert_many(category_links)
            .exec_without_returning(conn)
            .await?;
    }

    Ok(())
}

async fn delete_links<C>(conn: &C, book_id: i32) -> Result<(), DomainError>
where
    C: ConnectionTrait,
{
    book_authors::Entity::delete_many()
        .filter(book_authors::Column::BookId.eq(book_id))
        .exec(conn)
        .await?;

    book_categories::Entity::delete_many()
        .filter(book_categories::Column::BookId.eq(book_id))
        .exec(conn)
        .await?;

    Ok(())
}

#[async_trait]
impl Repository<Book> for SeaOrmBookRepository {
    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let count = BookEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .order_by_asc(Column::Title)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    /// Inserts the book row alone; links are managed by `create_with_links`.
    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        let result = to_active_model(&book, None).insert(&self.db).await?;
        Ok(Book::from(result))
    }

    /// Updates the book row alone, leaving its links untouched.
    async fn update(&self, book: Book) -> Result<Book, DomainError> {
        let result = to_active_model(&book, Some(book.id))
            .update(&self.db)
            .await
            .map_err(|e| update_error("Book", book.id, e))?;
        Ok(Book::from(result))
    }

    /// Removes the book, its author/category links and its reviews as one unit.
    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        delete_links(&txn, id).await?;

        let reviews = ReviewEntity::delete_many()
            .filter(review::Column::BookId.eq(id))
            .exec(&txn)
            .await?;

        let result = BookEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(format!("Book {} not found", id)));
        }

        txn.commit().await?;

        tracing::debug!(
            book_id = id,
            reviews_removed = reviews.rows_affected,
            "book deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find()
            .filter(Column::Isbn.eq(isbn.trim()))
            .one(&self.db)
            .await?;

        Ok(book.map(Book::from))
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool, DomainError> {
        let count = BookEntity::find()
            .filter(Column::Isbn.eq(isbn.trim()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn is_duplicate_isbn(
        &self,
        exclude_id: Option<i32>,
        isbn: &str,
    ) -> Result<bool, DomainError> {
        let rows: Vec<(i32, String)> = BookEntity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Isbn)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(key_taken(rows, exclude_id, isbn))
    }

    async fn rating(&self, book_id: i32) -> Result<f64, DomainError> {
        let reviews = ReviewEntity::find()
            .filter(review::Column::BookId.eq(book_id))
            .all(&self.db)
            .await?;

        if reviews.is_empty() {
            return Ok(0.0);
        }

        let total: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
        Ok(total as f64 / reviews.len() as f64)
    }

    async fn create_with_links(
        &self,
        author_ids: &[i32],
        category_ids: &[i32],
        book: Book,
    ) -> Result<Book, DomainError> {
        let txn = self.db.begin().await?;

        let created = to_active_model(&book, None).insert(&txn).await?;
        insert_links(&txn, created.id, author_ids, category_ids).await?;

        txn.commit().await?;
        Ok(Book::from(created))
    }

    async fn update_with_links(
        &self,
        author_ids: &[i32],
        category_ids: &[i32],
        book: Book,
    ) -> Result<Book, DomainError> {
        let txn = self.db.begin().await?;

        delete_links(&txn, book.id).await?;
        insert_links(&txn, book.id, author_ids, category_ids).await?;

        let updated = to_active_model(&book, Some(book.id))
            .update(&txn)
            .await
            .map_err(|e| update_error("Book", book.id, e))?;

        txn.commit().await?;
        Ok(Book::from(updated))
    }
}
