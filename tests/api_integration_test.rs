use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bookstore::infrastructure::AppState;
use bookstore::{db, server};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create the full application over an in-memory database
async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    server::build_router(AppState::new(db), &[])
}

// Helper to send one request and decode the JSON body (Null when empty)
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");
    let req = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, location, json)
}

async fn create_country(app: &Router, name: &str) -> i64 {
    let (status, _, body) = send(app, "POST", "/api/countries", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_category(app: &Router, name: &str) -> i64 {
    let (status, _, body) =
        send(app, "POST", "/api/categories", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_author(app: &Router, first: &str, last: &str, country_id: i64) -> i64 {
    let (status, _, body) = send(
        app,
        "POST",
        "/api/authors",
        Some(json!({ "firstName": first, "lastName": last, "country": { "id": country_id } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_reviewer(app: &Router, first: &str, last: &str) -> i64 {
    let (status, _, body) = send(
        app,
        "POST",
        "/api/reviewers",
        Some(json!({ "firstName": first, "lastName": last })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_book(app: &Router, query: &str, title: &str, isbn: &str) -> i64 {
    let (status, _, body) = send(
        app,
        "POST",
        &format!("/api/books?{}", query),
        Some(json!({ "title": title, "isbn": isbn, "datePublished": "2001-02-03" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

async fn create_review(app: &Router, book_id: i64, reviewer_id: i64, rating: i64) -> i64 {
    let (status, _, body) = send(
        app,
        "POST",
        "/api/reviews",
        Some(json!({
            "headline": format!("Rated {}", rating),
            "reviewText": "Some thoughts",
            "rating": rating,
            "book": { "id": book_id },
            "reviewer": { "id": reviewer_id }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

/// Country, author and category used by most book scenarios
async fn seed_catalog(app: &Router) -> (i64, i64, i64) {
    let country_id = create_country(app, "Nigeria").await;
    let author_id = create_author(app, "Chinua", "Achebe", country_id).await;
    let category_id = create_category(app, "Fiction").await;
    (country_id, author_id, category_id)
}

fn ids(list: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app().await;

    let (status, _, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "bookstore");
}

#[tokio::test]
async fn test_create_book_is_retrievable_by_id_and_isbn() {
    let app = setup_app().await;
    let (country_id, author_id, category_id) = seed_catalog(&app).await;
    let second_author = create_author(&app, "Wole", "Soyinka", country_id).await;
    let second_category = create_category(&app, "Classics").await;

    let (status, location, body) = send(
        &app,
        "POST",
        &format!(
            "/api/books?authId={}&authId={}&catId={}&catId={}",
            author_id, second_author, category_id, second_category
        ),
        Some(json!({ "title": "T", "isbn": "ISBN0000", "datePublished": "2001-02-03" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let book_id = body["id"].as_i64().unwrap();
    assert_eq!(location.as_deref(), Some(format!("/api/books/{}", book_id).as_str()));
    assert_eq!(body["datePublished"], "2001-02-03");

    let (status, _, by_id) = send(&app, "GET", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["title"], "T");

    let (status, _, by_isbn) = send(&app, "GET", "/api/books/isbn/ISBN0000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_isbn["id"].as_i64(), Some(book_id));

    let (_, _, authors) =
        send(&app, "GET", &format!("/api/authors/{}/authors", book_id), None).await;
    let mut expected = vec![author_id, second_author];
    expected.sort_unstable();
    assert_eq!(ids(&authors), expected);

    let (_, _, categories) =
        send(&app, "GET", &format!("/api/categories/books/{}", book_id), None).await;
    let mut expected = vec![category_id, second_category];
    expected.sort_unstable();
    assert_eq!(ids(&categories), expected);
}

#[tokio::test]
async fn test_create_book_requires_authors_and_categories() {
    let app = setup_app().await;
    seed_catalog(&app).await;

    let (status, _, body) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({ "title": "T", "isbn": "ISBN0000" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    let (_, _, books) = send(&app, "GET", "/api/books", None).await;
    assert!(books.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_book_reports_every_missing_reference() {
    let app = setup_app().await;
    seed_catalog(&app).await;

    let (status, _, body) = send(
        &app,
        "POST",
        "/api/books?authId=41&catId=42",
        Some(json!({ "title": "T", "isbn": "ISBN0000" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_isbn_is_rejected() {
    let app = setup_app().await;
    let (_, author_id, category_id) = seed_catalog(&app).await;
    let query = format!("authId={}&catId={}", author_id, category_id);
    create_book(&app, &query, "First", "ISBN0000").await;

    let (status, _, _) = send(
        &app,
        "POST",
        &format!("/api/books?{}", query),
        Some(json!({ "title": "Second", "isbn": " isbn0000 " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_book_replaces_links() {
    let app = setup_app().await;
    let (country_id, author_id, category_id) = seed_catalog(&app).await;
    let other_author = create_author(&app, "Ben", "Okri", country_id).await;
    let other_category = create_category(&app, "Poetry").await;
    let book_id = create_book(
        &app,
        &format!("authId={}&catId={}", author_id, category_id),
        "T",
        "ISBN0000",
    )
    .await;

    let (status, _, _) = send(
        &app,
        "PUT",
        &format!(
            "/api/books/{}?authId={}&catId={}",
            book_id, other_author, other_category
        ),
        Some(json!({ "id": book_id, "title": "Renamed", "isbn": "ISBN0000" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, authors) =
        send(&app, "GET", &format!("/api/authors/{}/authors", book_id), None).await;
    assert_eq!(ids(&authors), vec![other_author]);

    let (_, _, categories) =
        send(&app, "GET", &format!("/api/categories/books/{}", book_id), None).await;
    assert_eq!(ids(&categories), vec![other_category]);

    let (_, _, book) = send(&app, "GET", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(book["title"], "Renamed");
}

#[tokio::test]
async fn test_update_book_with_another_books_isbn_is_rejected() {
    let app = setup_app().await;
    let (_, author_id, category_id) = seed_catalog(&app).await;
    let query = format!("authId={}&catId={}", author_id, category_id);
    create_book(&app, &query, "Things Fall Apart", "ISBN0001").await;
    let second = create_book(&app, &query, "Arrow of God", "ISBN0002").await;

    let (status, _, body) = send(
        &app,
        "PUT",
        &format!("/api/books/{}?{}", second, query),
        Some(json!({ "id": second, "title": "Arrow of God", "isbn": " isbn0001" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body["errors"].as_array().unwrap().is_empty());

    let (_, _, book) = send(&app, "GET", &format!("/api/books/{}", second), None).await;
    assert_eq!(book["isbn"], "ISBN0002");
}

#[tokio::test]
async fn test_update_with_mismatched_ids_is_rejected() {
    let app = setup_app().await;
    let country_id = create_country(&app, "Kenya").await;

    let (status, _, _) = send(
        &app,
        "PUT",
        &format!("/api/countries/{}", country_id),
        Some(json!({ "id": country_id + 1, "name": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, country) = send(&app, "GET", &format!("/api/countries/{}", country_id), None).await;
    assert_eq!(country["name"], "Kenya");
}

#[tokio::test]
async fn test_update_unknown_record_is_not_found() {
    let app = setup_app().await;

    let (status, _, _) = send(
        &app,
        "PUT",
        "/api/reviewers/999",
        Some(json!({ "id": 999, "firstName": "No", "lastName": "Body" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_update_reports_missing_author_and_country() {
    let app = setup_app().await;

    let (status, _, body) = send(
        &app,
        "PUT",
        "/api/authors/77",
        Some(json!({ "id": 77, "firstName": "A", "lastName": "B", "country": { "id": 88 } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_author_with_unknown_country_is_not_found() {
    let app = setup_app().await;

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/authors",
        Some(json!({ "firstName": "A", "lastName": "B", "country": { "id": 5 } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_names_are_unique_ignoring_case_and_whitespace() {
    let app = setup_app().await;
    let (country_id, _, _) = seed_catalog(&app).await;
    create_reviewer(&app, "Ada", "Reader").await;

    let (status, _, _) =
        send(&app, "POST", "/api/countries", Some(json!({ "name": "  nigeria " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, _) =
        send(&app, "POST", "/api/categories", Some(json!({ "name": "FICTION" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/authors",
        Some(json!({ "firstName": "chinua ", "lastName": " ACHEBE", "country": { "id": country_id } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/reviewers",
        Some(json!({ "firstName": "ADA", "lastName": "reader" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, _, authors) = send(&app, "GET", "/api/authors", None).await;
    assert_eq!(authors.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_names_fold_non_ascii_case() {
    let app = setup_app().await;
    let country_id = create_country(&app, "France").await;
    create_category(&app, "Ästhetik").await;
    create_author(&app, "Émile", "Zola", country_id).await;

    let (status, _, body) =
        send(&app, "POST", "/api/categories", Some(json!({ "name": "ästhetik" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body["errors"].as_array().unwrap().is_empty());

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/authors",
        Some(json!({ "firstName": "ÉMILE", "lastName": "zola", "country": { "id": country_id } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, _, categories) = send(&app, "GET", "/api/categories", None).await;
    assert_eq!(categories.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_category_update_may_keep_its_own_name() {
    let app = setup_app().await;
    let category_id = create_category(&app, "Fiction").await;
    create_category(&app, "Poetry").await;

    let (status, _, _) = send(
        &app,
        "PUT",
        &format!("/api/categories/{}", category_id),
        Some(json!({ "id": category_id, "name": "fiction" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(
        &app,
        "PUT",
        &format!("/api/categories/{}", category_id),
        Some(json!({ "id": category_id, "name": "Poetry" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_guards_block_referenced_records() {
    let app = setup_app().await;
    let (country_id, author_id, category_id) = seed_catalog(&app).await;
    create_book(
        &app,
        &format!("authId={}&catId={}", author_id, category_id),
        "T",
        "ISBN0000",
    )
    .await;

    let (status, _, _) =
        send(&app, "DELETE", &format!("/api/countries/{}", country_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) =
        send(&app, "DELETE", &format!("/api/authors/{}", author_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) =
        send(&app, "DELETE", &format!("/api/categories/{}", category_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, _, countries) = send(&app, "GET", "/api/countries", None).await;
    assert_eq!(ids(&countries), vec![country_id]);

    let (_, _, books) = send(&app, "GET", &format!("/api/authors/{}/books", author_id), None).await;
    assert_eq!(books.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreferenced_country_can_be_deleted() {
    let app = setup_app().await;
    let country_id = create_country(&app, "Ghana").await;

    let (status, _, _) =
        send(&app, "DELETE", &format!("/api/countries/{}", country_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) =
        send(&app, "DELETE", &format!("/api/countries/{}", country_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rating_is_zero_without_reviews_and_mean_otherwise() {
    let app = setup_app().await;
    let (_, author_id, category_id) = seed_catalog(&app).await;
    let book_id = create_book(
        &app,
        &format!("authId={}&catId={}", author_id, category_id),
        "T",
        "ISBN0000",
    )
    .await;

    let (status, _, body) =
        send(&app, "GET", &format!("/api/books/{}/rating", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"].as_f64(), Some(0.0));

    let first = create_reviewer(&app, "Ada", "Reader").await;
    let second = create_reviewer(&app, "Bo", "Critic").await;
    create_review(&app, book_id, first, 4).await;
    create_review(&app, book_id, second, 5).await;

    let (_, _, body) = send(&app, "GET", &format!("/api/books/{}/rating", book_id), None).await;
    assert_eq!(body["rating"].as_f64(), Some(4.5));
}

#[tokio::test]
async fn test_review_rating_out_of_range_is_rejected() {
    let app = setup_app().await;
    let (_, author_id, category_id) = seed_catalog(&app).await;
    let book_id = create_book(
        &app,
        &format!("authId={}&catId={}", author_id, category_id),
        "T",
        "ISBN0000",
    )
    .await;
    let reviewer_id = create_reviewer(&app, "Ada", "Reader").await;

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(json!({
            "headline": "Too good",
            "rating": 6,
            "book": { "id": book_id },
            "reviewer": { "id": reviewer_id }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_book_delete_removes_its_reviews() {
    let app = setup_app().await;
    let (_, author_id, category_id) = seed_catalog(&app).await;
    let book_id = create_book(
        &app,
        &format!("authId={}&catId={}", author_id, category_id),
        "T",
        "ISBN0000",
    )
    .await;
    let reviewer_id = create_reviewer(&app, "Ada", "Reader").await;
    let review_id = create_review(&app, book_id, reviewer_id, 3).await;

    let (status, _, _) = send(&app, "DELETE", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, "GET", &format!("/api/reviews/{}", review_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The author and category are free again
    let (status, _, _) =
        send(&app, "DELETE", &format!("/api/authors/{}", author_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_reviewer_delete_removes_their_reviews() {
    let app = setup_app().await;
    let (_, author_id, category_id) = seed_catalog(&app).await;
    let book_id = create_book(
        &app,
        &format!("authId={}&catId={}", author_id, category_id),
        "T",
        "ISBN0000",
    )
    .await;
    let reviewer_id = create_reviewer(&app, "Ada", "Reader").await;
    let other_reviewer = create_reviewer(&app, "Bo", "Critic").await;
    create_review(&app, book_id, reviewer_id, 2).await;
    let kept = create_review(&app, book_id, other_reviewer, 4).await;

    let (status, _, _) =
        send(&app, "DELETE", &format!("/api/reviewers/{}", reviewer_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, reviews) =
        send(&app, "GET", &format!("/api/reviews/{}/reviews", book_id), None).await;
    assert_eq!(ids(&reviews), vec![kept]);
}

#[tokio::test]
async fn test_review_cross_references() {
    let app = setup_app().await;
    let (_, author_id, category_id) = seed_catalog(&app).await;
    let book_id = create_book(
        &app,
        &format!("authId={}&catId={}", author_id, category_id),
        "T",
        "ISBN0000",
    )
    .await;
    let reviewer_id = create_reviewer(&app, "Ada", "Reader").await;
    let review_id = create_review(&app, book_id, reviewer_id, 5).await;

    let (_, _, book) = send(&app, "GET", &format!("/api/reviews/{}/book", review_id), None).await;
    assert_eq!(book["id"].as_i64(), Some(book_id));

    let (_, _, reviewer) = send(
        &app,
        "GET",
        &format!("/api/reviewers/{}/reviewer", review_id),
        None,
    )
    .await;
    assert_eq!(reviewer["id"].as_i64(), Some(reviewer_id));

    let (_, _, reviews) = send(
        &app,
        "GET",
        &format!("/api/reviewers/{}/reviews", reviewer_id),
        None,
    )
    .await;
    assert_eq!(ids(&reviews), vec![review_id]);

    let (status, _, _) = send(&app, "GET", "/api/reviews/999/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_country_cross_references() {
    let app = setup_app().await;
    let (country_id, author_id, _) = seed_catalog(&app).await;

    let (_, _, authors) = send(
        &app,
        "GET",
        &format!("/api/countries/{}/authors", country_id),
        None,
    )
    .await;
    assert_eq!(ids(&authors), vec![author_id]);

    let (status, _, country) = send(
        &app,
        "GET",
        &format!("/api/countries/authors/{}", author_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(country["name"], "Nigeria");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup_app().await;

    let req = Request::builder()
        .uri("/api/countries")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    // Never the extractor's default 422, which is reserved for duplicates
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request_with_errors() {
    let app = setup_app().await;

    for (method, uri) in [
        ("GET", "/api/books/abc"),
        ("GET", "/api/reviewers/abc/reviews"),
        ("DELETE", "/api/countries/1x"),
    ] {
        let (status, _, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert!(!body["errors"].as_array().unwrap().is_empty(), "{} {}", method, uri);
    }

    let (status, _, body) = send(
        &app,
        "PUT",
        "/api/categories/abc",
        Some(json!({ "name": "Fiction" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn test_openapi_document_lists_every_route() {
    let app = setup_app().await;

    let (status, _, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);

    let paths = doc["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 25);
    for family in ["authors", "books", "categories", "countries", "reviewers", "reviews"] {
        let item = &paths[&format!("/api/{}/{{id}}", family)];
        for method in ["get", "put", "delete"] {
            assert!(item.get(method).is_some(), "{} {}", method, family);
        }
        assert!(paths[&format!("/api/{}", family)].get("post").is_some());
    }
    assert!(paths.contains_key("/api/reviewers/{id}/reviewer"));
    assert!(paths.contains_key("/api/countries/authors/{id}"));
}

#[tokio::test]
async fn test_blank_names_are_rejected() {
    let app = setup_app().await;

    let (status, _, body) = send(
        &app,
        "POST",
        "/api/reviewers",
        Some(json!({ "firstName": " ", "lastName": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}
