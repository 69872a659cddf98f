use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::authors::list_authors,
        api::authors::get_author,
        api::authors::books_of_author,
        api::authors::authors_of_book,
        api::authors::create_author,
        api::authors::update_author,
        api::authors::delete_author,
        api::books::list_books,
        api::books::get_book,
        api::books::get_book_by_isbn,
        api::books::get_rating,
        api::books::create_book,
        api::books::update_book,
        api::books::delete_book,
        api::categories::list_categories,
        api::categories::get_category,
        api::categories::books_of_category,
        api::categories::categories_of_book,
        api::categories::create_category,
        api::categories::update_category,
        api::categories::delete_category,
        api::countries::list_countries,
        api::countries::get_country,
        api::countries::authors_of_country,
        api::countries::country_of_author,
        api::countries::create_country,
        api::countries::update_country,
        api::countries::delete_country,
        api::reviewers::list_reviewers,
        api::reviewers::get_reviewer,
        api::reviewers::reviews_of_reviewer,
        api::reviewers::reviewer_of_review,
        api::reviewers::create_reviewer,
        api::reviewers::update_reviewer,
        api::reviewers::delete_reviewer,
        api::reviews::list_reviews,
        api::reviews::get_review,
        api::reviews::reviews_of_book,
        api::reviews::book_of_review,
        api::reviews::create_review,
        api::reviews::update_review,
        api::reviews::delete_review,
    ),
    components(
        schemas(
            api::dto::IdRef,
            api::dto::AuthorDto,
            api::dto::AuthorBody,
            api::dto::BookDto,
            api::dto::BookBody,
            api::dto::CategoryDto,
            api::dto::CountryDto,
            api::dto::NameBody,
            api::dto::ReviewerDto,
            api::dto::ReviewerBody,
            api::dto::ReviewDto,
            api::dto::ReviewBody,
            api::dto::RatingDto,
        )
    ),
    tags(
        (name = "bookstore", description = "Bookstore catalog API")
    )
)]
pub struct ApiDoc;
