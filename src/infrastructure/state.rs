//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    AuthorRepository, BookRepository, CategoryRepository, CountryRepository, ReviewRepository,
    ReviewerRepository,
};
use crate::infrastructure::{
    SeaOrmAuthorRepository, SeaOrmBookRepository, SeaOrmCategoryRepository,
    SeaOrmCountryRepository, SeaOrmReviewRepository, SeaOrmReviewerRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection (health checks)
    db: DatabaseConnection,
    pub author_repo: Arc<dyn AuthorRepository>,
    pub book_repo: Arc<dyn BookRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub country_repo: Arc<dyn CountryRepository>,
    pub reviewer_repo: Arc<dyn ReviewerRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories sharing one connection handle
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            author_repo: Arc::new(SeaOrmAuthorRepository::new(db.clone())),
            book_repo: Arc::new(SeaOrmBookRepository::new(db.clone())),
            category_repo: Arc::new(SeaOrmCategoryRepository::new(db.clone())),
            country_repo: Arc::new(SeaOrmCountryRepository::new(db.clone())),
            reviewer_repo: Arc::new(SeaOrmReviewerRepository::new(db.clone())),
            review_repo: Arc::new(SeaOrmReviewRepository::new(db.clone())),
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
