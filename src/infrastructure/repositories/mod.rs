//! Repository implementations using SeaORM

pub mod author_repository;
pub mod book_repository;
pub mod category_repository;
pub mod country_repository;
pub mod review_repository;
pub mod reviewer_repository;

pub use author_repository::SeaOrmAuthorRepository;
pub use book_repository::SeaOrmBookRepository;
pub use category_repository::SeaOrmCategoryRepository;
pub use country_repository::SeaOrmCountryRepository;
pub use review_repository::SeaOrmReviewRepository;
pub use reviewer_repository::SeaOrmReviewerRepository;

use sea_orm::DbErr;

use crate::domain::validation::normalize_key;
use crate::domain::DomainError;

/// True if a row other than `exclude_id` holds a value with the same
/// `normalize_key` as `candidate`.
///
/// Compared in Rust rather than with SQLite's `UPPER`, which only folds ASCII.
pub(crate) fn key_taken(
    rows: Vec<(i32, String)>,
    exclude_id: Option<i32>,
    candidate: &str,
) -> bool {
    let key = normalize_key(candidate);
    rows.into_iter()
        .any(|(id, value)| Some(id) != exclude_id && normalize_key(&value) == key)
}

/// Map "zero rows touched" on update to `NotFound`, everything else to `Database`.
pub(crate) fn update_error(entity: &str, id: i32, err: DbErr) -> DomainError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
            DomainError::not_found(format!("{} {} not found", entity, id))
        }
        other => DomainError::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::key_taken;

    #[test]
    fn key_taken_folds_non_ascii_case() {
        let rows = vec![(1, "Ästhetik".to_string()), (2, "Fiction".to_string())];

        assert!(key_taken(rows.clone(), None, " ästhetik "));
        assert!(key_taken(rows.clone(), Some(1), "FICTION"));
        assert!(!key_taken(rows.clone(), Some(1), "ÄSTHETIK"));
        assert!(!key_taken(rows, None, "Poetry"));
    }
}
