//! Demo catalog used when `SEED_DEMO` is set.

use chrono::NaiveDate;

use crate::domain::{Author, Book, Category, Country, DomainError, Repository, Review, Reviewer};
use crate::infrastructure::AppState;

/// Seed a small catalog through the repositories. Does nothing if books already exist.
pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    if !state.book_repo.find_all().await?.is_empty() {
        tracing::info!("Catalog already populated, skipping demo seed");
        return Ok(());
    }

    let mut countries = Vec::new();
    for name in ["Nigeria", "United Kingdom", "Colombia"] {
        let country = state
            .country_repo
            .create(Country {
                id: 0,
                name: name.to_string(),
            })
            .await?;
        countries.push(country);
    }

    let mut authors = Vec::new();
    for (first_name, last_name, country) in [
        ("Chinua", "Achebe", &countries[0]),
        ("Terry", "Pratchett", &countries[1]),
        ("Neil", "Gaiman", &countries[1]),
        ("Gabriel", "Garcia Marquez", &countries[2]),
    ] {
        let author = state
            .author_repo
            .create(Author {
                id: 0,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                country_id: country.id,
            })
            .await?;
        authors.push(author);
    }

    let mut categories = Vec::new();
    for name in ["Fiction", "Fantasy", "Classics"] {
        let category = state
            .category_repo
            .create(Category {
                id: 0,
                name: name.to_string(),
            })
            .await?;
        categories.push(category);
    }

    let books = [
        (
            "Things Fall Apart",
            "0385474547",
            NaiveDate::from_ymd_opt(1958, 6, 17),
            vec![authors[0].id],
            vec![categories[0].id, categories[2].id],
        ),
        (
            "Good Omens",
            "0060853980",
            NaiveDate::from_ymd_opt(1990, 5, 1),
            vec![authors[1].id, authors[2].id],
            vec![categories[0].id, categories[1].id],
        ),
        (
            "One Hundred Years of Solitude",
            "0060883286",
            NaiveDate::from_ymd_opt(1967, 5, 30),
            vec![authors[3].id],
            vec![categories[0].id, categories[2].id],
        ),
    ];

    let mut created_books = Vec::new();
    for (title, isbn, date_published, author_ids, category_ids) in books {
        let book = state
            .book_repo
            .create_with_links(
                &author_ids,
                &category_ids,
                Book {
                    id: 0,
                    title: title.to_string(),
                    isbn: isbn.to_string(),
                    date_published,
                },
            )
            .await?;
        created_books.push(book);
    }

    let reviewer = state
        .reviewer_repo
        .create(Reviewer {
            id: 0,
            first_name: "Ada".to_string(),
            last_name: "Reader".to_string(),
        })
        .await?;

    for (book, headline, rating) in [
        (&created_books[0], "A modern classic", 5),
        (&created_books[1], "Funny and warm", 4),
    ] {
        state
            .review_repo
            .create(Review {
                id: 0,
                headline: headline.to_string(),
                review_text: String::new(),
                rating,
                book_id: book.id,
                reviewer_id: reviewer.id,
            })
            .await?;
    }

    tracing::info!(
        books = created_books.len(),
        authors = authors.len(),
        "Demo catalog seeded"
    );
    Ok(())
}
