//! Transfer objects exposed at the HTTP boundary.
//!
//! Responses carry only the stable public fields of each record. Request
//! bodies reference related records by id; anything else nested under
//! `country`, `book` or `reviewer` is ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Author, Book, Category, Country, Review, Reviewer};

/// Reference to another record by id
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct IdRef {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub date_published: Option<NaiveDate>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            date_published: book.date_published,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CountryDto {
    pub id: i32,
    pub name: String,
}

impl From<Country> for CountryDto {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            name: country.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl From<Reviewer> for ReviewerDto {
    fn from(reviewer: Reviewer) -> Self {
        Self {
            id: reviewer.id,
            first_name: reviewer.first_name,
            last_name: reviewer.last_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: i32,
    pub headline: String,
    pub review_text: String,
    pub rating: i32,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            headline: review.headline,
            review_text: review.review_text,
            rating: review.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct RatingDto {
    pub rating: f64,
}

// Request bodies. Missing text fields default to empty so shape validation
// can report every violation at once.

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBody {
    pub id: Option<i32>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub country: IdRef,
}

impl AuthorBody {
    pub fn into_author(self, id: i32) -> Author {
        Author {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            country_id: self.country.id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookBody {
    pub id: Option<i32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub isbn: String,
    pub date_published: Option<NaiveDate>,
}

impl BookBody {
    pub fn into_book(self, id: i32) -> Book {
        Book {
            id,
            title: self.title,
            isbn: self.isbn,
            date_published: self.date_published,
        }
    }
}

/// Body shared by categories and countries
#[derive(Debug, Deserialize, ToSchema)]
pub struct NameBody {
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerBody {
    pub id: Option<i32>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl ReviewerBody {
    pub fn into_reviewer(self, id: i32) -> Reviewer {
        Reviewer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
    pub id: Option<i32>,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub review_text: String,
    #[serde(default)]
    pub rating: i32,
    pub reviewer: IdRef,
    pub book: IdRef,
}

impl ReviewBody {
    pub fn into_review(self, id: i32) -> Review {
        Review {
            id,
            headline: self.headline,
            review_text: self.review_text,
            rating: self.rating,
            book_id: self.book.id,
            reviewer_id: self.reviewer.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_dto_uses_camel_case() {
        let dto = BookDto {
            id: 1,
            title: "Dune".to_string(),
            isbn: "0441013597".to_string(),
            date_published: NaiveDate::from_ymd_opt(1965, 8, 1),
        };

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["datePublished"], "1965-08-01");
        assert!(value.get("date_published").is_none());
    }

    #[test]
    fn review_body_keeps_only_reference_ids() {
        let body: ReviewBody = serde_json::from_value(serde_json::json!({
            "headline": "Great",
            "reviewText": "Loved it",
            "rating": 5,
            "reviewer": { "id": 3, "firstName": "Ignored" },
            "book": { "id": 7, "title": "Ignored" }
        }))
        .unwrap();

        let review = body.into_review(0);
        assert_eq!(review.reviewer_id, 3);
        assert_eq!(review.book_id, 7);
    }
}
