//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.
//!
//! Records hold foreign keys only; relationships are resolved through the
//! cross-reference queries on each repository.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub country_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub date_published: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reviewer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i32,
    pub headline: String,
    pub review_text: String,
    pub rating: i32,
    pub book_id: i32,
    pub reviewer_id: i32,
}

/// Operations shared by every catalog family.
///
/// `create` ignores the incoming `id` and returns the stored record with the
/// generated one. `update` and `delete` report `DomainError::NotFound` when no
/// row was affected.
#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Check whether a record with this id exists. Never writes.
    async fn exists(&self, id: i32) -> Result<bool, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<T>, DomainError>;

    /// All records in the family's default order.
    async fn find_all(&self) -> Result<Vec<T>, DomainError>;

    async fn create(&self, entity: T) -> Result<T, DomainError>;

    async fn update(&self, entity: T) -> Result<T, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

#[async_trait]
pub trait AuthorRepository: Repository<Author> {
    /// Find an author by first/last name, ignoring case and surrounding whitespace
    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Author>, DomainError>;

    /// Books linked to the author through `book_authors`
    async fn books_of_author(&self, author_id: i32) -> Result<Vec<Book>, DomainError>;

    /// Authors linked to the book through `book_authors`
    async fn authors_of_book(&self, book_id: i32) -> Result<Vec<Author>, DomainError>;
}

#[async_trait]
pub trait BookRepository: Repository<Book> {
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError>;

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool, DomainError>;

    /// True if a book other than `exclude_id` already uses this ISBN
    /// (case-insensitive, trimmed).
    async fn is_duplicate_isbn(
        &self,
        exclude_id: Option<i32>,
        isbn: &str,
    ) -> Result<bool, DomainError>;

    /// Mean rating of the book's reviews, 0.0 when there are none
    async fn rating(&self, book_id: i32) -> Result<f64, DomainError>;

    /// Insert the book and one link per author and category id, atomically
    async fn create_with_links(
        &self,
        author_ids: &[i32],
        category_ids: &[i32],
        book: Book,
    ) -> Result<Book, DomainError>;

    /// Replace every author/category link of the book, then update the row, atomically
    async fn update_with_links(
        &self,
        author_ids: &[i32],
        category_ids: &[i32],
        book: Book,
    ) -> Result<Book, DomainError>;
}

#[async_trait]
pub trait CategoryRepository: Repository<Category> {
    /// True if a category other than `exclude_id` has the same name
    async fn is_duplicate_name(
        &self,
        exclude_id: Option<i32>,
        name: &str,
    ) -> Result<bool, DomainError>;

    async fn books_of_category(&self, category_id: i32) -> Result<Vec<Book>, DomainError>;

    async fn categories_of_book(&self, book_id: i32) -> Result<Vec<Category>, DomainError>;
}

#[async_trait]
pub trait CountryRepository: Repository<Country> {
    /// True if a country other than `exclude_id` has the same name
    async fn is_duplicate_name(
        &self,
        exclude_id: Option<i32>,
        name: &str,
    ) -> Result<bool, DomainError>;

    async fn authors_of_country(&self, country_id: i32) -> Result<Vec<Author>, DomainError>;

    async fn country_of_author(&self, author_id: i32) -> Result<Option<Country>, DomainError>;
}

#[async_trait]
pub trait ReviewerRepository: Repository<Reviewer> {
    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Reviewer>, DomainError>;

    async fn reviews_of_reviewer(&self, reviewer_id: i32) -> Result<Vec<Review>, DomainError>;

    async fn reviewer_of_review(&self, review_id: i32) -> Result<Option<Reviewer>, DomainError>;
}

#[async_trait]
pub trait ReviewRepository: Repository<Review> {
    async fn reviews_of_book(&self, book_id: i32) -> Result<Vec<Review>, DomainError>;

    async fn book_of_review(&self, review_id: i32) -> Result<Option<Book>, DomainError>;
}
