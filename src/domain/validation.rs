//! Shape rules for incoming catalog records.
//!
//! Every rule of one stage is evaluated and all violations are reported
//! together.

use super::{Author, Book, Category, Country, DomainError, Review, Reviewer};

pub const FIRST_NAME_MAX: usize = 100;
pub const LAST_NAME_MAX: usize = 200;
pub const NAME_MAX: usize = 50;
pub const TITLE_MAX: usize = 200;
pub const ISBN_MIN: usize = 3;
pub const ISBN_MAX: usize = 10;
pub const HEADLINE_MAX: usize = 200;
pub const REVIEW_TEXT_MAX: usize = 2000;
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// Collects violations found during one validation stage.
#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.messages.push(message.into());
        }
    }

    /// Required text field: not blank and at most `max` characters.
    pub fn required_text(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.messages.push(format!("{} is required", field));
        } else if value.chars().count() > max {
            self.messages
                .push(format!("{} must be up to {} characters in length", field, max));
        }
    }

    /// `Ok` when nothing was recorded, otherwise the error built by `into_error`.
    pub fn finish(
        self,
        into_error: impl FnOnce(Vec<String>) -> DomainError,
    ) -> Result<(), DomainError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(into_error(self.messages))
        }
    }
}

fn person_names(violations: &mut Violations, first_name: &str, last_name: &str) {
    violations.required_text("First Name", first_name, FIRST_NAME_MAX);
    violations.required_text("Last Name", last_name, LAST_NAME_MAX);
}

pub fn author_shape(author: &Author) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    person_names(&mut violations, &author.first_name, &author.last_name);
    violations.finish(DomainError::Validation)
}

pub fn reviewer_shape(reviewer: &Reviewer) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    person_names(&mut violations, &reviewer.first_name, &reviewer.last_name);
    violations.finish(DomainError::Validation)
}

pub fn country_shape(country: &Country) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    violations.required_text("Country", &country.name, NAME_MAX);
    violations.finish(DomainError::Validation)
}

pub fn category_shape(category: &Category) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    violations.required_text("Category", &category.name, NAME_MAX);
    violations.finish(DomainError::Validation)
}

/// Book fields plus the requirement of at least one author and one category.
pub fn book_shape(book: &Book, author_ids: &[i32], category_ids: &[i32]) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    violations.required_text("Title", &book.title, TITLE_MAX);

    let isbn_len = book.isbn.trim().chars().count();
    violations.check(
        (ISBN_MIN..=ISBN_MAX).contains(&isbn_len),
        format!(
            "ISBN must be between {} and {} characters in length",
            ISBN_MIN, ISBN_MAX
        ),
    );
    violations.check(!author_ids.is_empty(), "At least one author is required");
    violations.check(!category_ids.is_empty(), "At least one category is required");
    violations.finish(DomainError::Validation)
}

pub fn review_shape(review: &Review) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    violations.required_text("Headline", &review.headline, HEADLINE_MAX);
    violations.check(
        review.review_text.chars().count() <= REVIEW_TEXT_MAX,
        format!(
            "Review Text must be up to {} characters in length",
            REVIEW_TEXT_MAX
        ),
    );
    violations.check(
        RATING_RANGE.contains(&review.rating),
        format!(
            "Rating must be between {} and {} stars",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        ),
    );
    violations.finish(DomainError::Validation)
}

/// Path id must match the id carried in the body of an update.
pub fn ids_match(path_id: i32, body_id: Option<i32>) -> Result<(), DomainError> {
    match body_id {
        Some(id) if id == path_id => Ok(()),
        Some(id) => Err(DomainError::validation(format!(
            "Path id {} does not match body id {}",
            path_id, id
        ))),
        None => Err(DomainError::validation(format!(
            "Body id is required and must equal {}",
            path_id
        ))),
    }
}

/// Comparison key for case-insensitive, whitespace-trimmed uniqueness checks.
///
/// Full Unicode upper-casing, so "ästhetik" and "Ästhetik" share a key.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, isbn: &str) -> Book {
        Book {
            id: 0,
            title: title.to_string(),
            isbn: isbn.to_string(),
            date_published: None,
        }
    }

    #[test]
    fn author_names_are_required_and_bounded() {
        let author = Author {
            id: 0,
            first_name: "   ".to_string(),
            last_name: "x".repeat(LAST_NAME_MAX + 1),
            country_id: 1,
        };

        match author_shape(&author) {
            Err(DomainError::Validation(msgs)) => {
                assert_eq!(msgs.len(), 2);
                assert!(msgs[0].contains("First Name"));
                assert!(msgs[1].contains("200"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn book_needs_authors_and_categories() {
        let err = book_shape(&book("Dune", "ISBN0000"), &[], &[]).unwrap_err();
        assert_eq!(err.messages().len(), 2);

        assert!(book_shape(&book("Dune", "ISBN0000"), &[1], &[1]).is_ok());
    }

    #[test]
    fn isbn_length_is_bounded() {
        assert!(book_shape(&book("Dune", "12"), &[1], &[1]).is_err());
        assert!(book_shape(&book("Dune", "12345678901"), &[1], &[1]).is_err());
        assert!(book_shape(&book("Dune", "1234567890"), &[1], &[1]).is_ok());
    }

    #[test]
    fn rating_outside_range_is_rejected() {
        let review = Review {
            id: 0,
            headline: "Great".to_string(),
            review_text: String::new(),
            rating: 6,
            book_id: 1,
            reviewer_id: 1,
        };
        assert!(review_shape(&review).is_err());
        assert!(review_shape(&Review { rating: 5, ..review }).is_ok());
    }

    #[test]
    fn ids_must_match() {
        assert!(ids_match(3, Some(3)).is_ok());
        assert!(matches!(ids_match(3, Some(4)), Err(DomainError::Validation(_))));
        assert!(matches!(ids_match(3, None), Err(DomainError::Validation(_))));
    }

    #[test]
    fn keys_ignore_case_and_padding() {
        assert_eq!(normalize_key("  Nigeria "), normalize_key("NIGERIA"));
        assert_ne!(normalize_key("Niger"), normalize_key("Nigeria"));
        assert_eq!(normalize_key(" ästhetik"), normalize_key("Ästhetik "));
        assert_eq!(normalize_key("émile"), normalize_key("ÉMILE"));
    }
}
