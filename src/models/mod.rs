pub mod author;
pub mod book;
pub mod book_authors;
pub mod book_categories;
pub mod category;
pub mod country;
pub mod review;
pub mod reviewer;
