//! SeaORM implementation of CategoryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::{key_taken, update_error};
use crate::domain::{Book, Category, CategoryRepository, DomainError, Repository};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::book_categories;
use crate::models::category::{ActiveModel, Column, Entity as CategoryEntity};

/// SeaORM-based implementation of CategoryRepository
pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Category> for SeaOrmCategoryRepository {
    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let count = CategoryEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let category = CategoryEntity::find_by_id(id).one(&self.db).await?;
        Ok(category.map(Category::from))
    }

    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let categories = CategoryEntity::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn create(&self, category: Category) -> Result<Category, DomainError> {
        let model = ActiveModel {
            id: NotSet,
            name: Set(category.name.trim().to_string()),
        };

        let result = model.insert(&self.db).await?;
        Ok(Category::from(result))
    }

    async fn update(&self, category: Category) -> Result<Category, DomainError> {
        let model = ActiveModel {
            id: Set(category.id),
            name: Set(category.name.trim().to_string()),
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_error("Category", category.id, e))?;
        Ok(Category::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = CategoryEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(format!("Category {} not found", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn is_duplicate_name(
        &self,
        exclude_id: Option<i32>,
        name: &str,
    ) -> Result<bool, DomainError> {
        let rows: Vec<(i32, String)> = CategoryEntity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(key_taken(rows, exclude_id, name))
    }

    async fn books_of_category(&self, category_id: i32) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .join(
                JoinType::InnerJoin,
                book_categories::Relation::Book.def().rev(),
            )
            .filter(book_categories::Column::CategoryId.eq(category_id))
            .order_by_asc(book::Column::Title)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn categories_of_book(&self, book_id: i32) -> Result<Vec<Category>, DomainError> {
        let categories = CategoryEntity::find()
            .join(
                JoinType::InnerJoin,
                book_categories::Relation::Category.def().rev(),
            )
            .filter(book_categories::Column::BookId.eq(book_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(categories.into_iter().map(Category::from).collect())
    }
}
