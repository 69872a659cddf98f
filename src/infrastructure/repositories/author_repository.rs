//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::update_error;
use crate::domain::validation::normalize_key;
use crate::domain::{Author, AuthorRepository, Book, DomainError, Repository};
use crate::models::author::{ActiveModel, Column, Entity as AuthorEntity};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::book_authors;

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Author> for SeaOrmAuthorRepository {
    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let count = AuthorEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError> {
        let author = AuthorEntity::find_by_id(id).one(&self.db).await?;
        Ok(author.map(Author::from))
    }

    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(Author::from).collect())
    }

    async fn create(&self, author: Author) -> Result<Author, DomainError> {
        let model = ActiveModel {
            id: NotSet,
            first_name: Set(author.first_name.trim().to_string()),
            last_name: Set(author.last_name.trim().to_string()),
            country_id: Set(author.country_id),
        };

        let result = model.insert(&self.db).await?;
        Ok(Author::from(result))
    }

    async fn update(&self, author: Author) -> Result<Author, DomainError> {
        let model = ActiveModel {
            id: Set(author.id),
            first_name: Set(author.first_name.trim().to_string()),
            last_name: Set(author.last_name.trim().to_string()),
            country_id: Set(author.country_id),
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_error("Author", author.id, e))?;
        Ok(Author::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = AuthorEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(format!("Author {} not found", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Author>, DomainError> {
        let first_key = normalize_key(first_name);
        let last_key = normalize_key(last_name);

        let candidates = AuthorEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(candidates
            .into_iter()
            .find(|m| {
                normalize_key(&m.first_name) == first_key && normalize_key(&m.last_name) == last_key
            })
            .map(Author::from))
    }

    async fn books_of_author(&self, author_id: i32) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .join(JoinType::InnerJoin, book_authors::Relation::Book.def().rev())
            .filter(book_authors::Column::AuthorId.eq(author_id))
            .order_by_asc(book::Column::Title)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn authors_of_book(&self, book_id: i32) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .join(
                JoinType::InnerJoin,
                book_authors::Relation::Author.def().rev(),
            )
            .filter(book_authors::Column::BookId.eq(book_id))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(Author::from).collect())
    }
}
