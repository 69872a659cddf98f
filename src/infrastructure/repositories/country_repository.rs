//! SeaORM implementation of CountryRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{key_taken, update_error};
use crate::domain::{Author, Country, CountryRepository, DomainError, Repository};
use crate::models::author::{self, Entity as AuthorEntity};
use crate::models::country::{ActiveModel, Column, Entity as CountryEntity};

/// SeaORM-based implementation of CountryRepository
pub struct SeaOrmCountryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCountryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Country> for SeaOrmCountryRepository {
    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        let count = CountryEntity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Country>, DomainError> {
        let country = CountryEntity::find_by_id(id).one(&self.db).await?;
        Ok(country.map(Country::from))
    }

    async fn find_all(&self) -> Result<Vec<Country>, DomainError> {
        let countries = CountryEntity::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(countries.into_iter().map(Country::from).collect())
    }

    async fn create(&self, country: Country) -> Result<Country, DomainError> {
        let model = ActiveModel {
            id: NotSet,
            name: Set(country.name.trim().to_string()),
        };

        let result = model.insert(&self.db).await?;
        Ok(Country::from(result))
    }

    async fn update(&self, country: Country) -> Result<Country, DomainError> {
        let model = ActiveModel {
            id: Set(country.id),
            name: Set(country.name.trim().to_string()),
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| update_error("Country", country.id, e))?;
        Ok(Country::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = CountryEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(format!("Country {} not found", id)));
        }

        Ok(())
    }
}

#[async_trait]
impl CountryRepository for SeaOrmCountryRepository {
    async fn is_duplicate_name(
        &self,
        exclude_id: Option<i32>,
        name: &str,
    ) -> Result<bool, DomainError> {
        let rows: Vec<(i32, String)> = CountryEntity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(key_taken(rows, exclude_id, name))
    }

    async fn authors_of_country(&self, country_id: i32) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .filter(author::Column::CountryId.eq(country_id))
            .order_by_asc(author::Column::LastName)
            .order_by_asc(author::Column::FirstName)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(Author::from).collect())
    }

    async fn country_of_author(&self, author_id: i32) -> Result<Option<Country>, DomainError> {
        let Some(author) = AuthorEntity::find_by_id(author_id).one(&self.db).await? else {
            return Ok(None);
        };

        let country = CountryEntity::find_by_id(author.country_id)
            .one(&self.db)
            .await?;
        Ok(country.map(Country::from))
    }
}
