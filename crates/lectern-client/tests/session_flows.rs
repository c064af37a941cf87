use lectern_client::prelude::*;
use lectern_client::{ClientConfig, DEFAULT_NOTICE_DURATION, SIGNED_IN_MESSAGE};
use lectern_data::FetchClient;
use lectern_store::Cache;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIVE_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJ0b2tlbl90eXBlIjoiYWNjZXNzIiwiZXhwIjo0MTAyNDQ0ODAwLCJlbWFpbCI6ImFubkBsZWN0ZXJuLmRldiJ9.sig";
const EXPIRED_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJ0b2tlbl90eXBlIjoiYWNjZXNzIiwiZXhwIjoxLCJlbWFpbCI6ImFubkBsZWN0ZXJuLmRldiJ9.sig";

fn session(server: &MockServer, cache: Cache) -> Session {
    let client = FetchClient::new()
        .expect("Failed to build client")
        .with_base_url(server.uri());
    let mut session = Session::new(LibraryApi::new(client), cache);
    session.boot().expect("boot failed");
    session
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "ann@lectern.dev", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": LIVE_TOKEN, "refresh": "r"})),
        )
        .mount(server)
        .await;
}

fn book(id: i64) -> Book {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Book {}", id),
        "isbn": "978-0-00",
        "num_pages": 120,
        "authors": [],
        "complectations": [
            {"id": 10, "model": "Hardcover", "description": "", "price": 12.5},
            {"id": 11, "model": "Paperback", "description": "", "price": 7.0}
        ]
    }))
    .unwrap()
}

#[tokio::test]
async fn test_sign_in_records_role_and_notice() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", format!("Bearer {}", LIVE_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "first_name": "Ann",
            "last_name": "Lee",
            "email": "ann@lectern.dev",
            "role": "LIBRARIAN"
        })))
        .mount(&server)
        .await;

    let cache = Cache::in_memory();
    let mut session = session(&server, cache.clone());
    let notice = session
        .sign_in(&SignInForm::new("ann@lectern.dev", "secret"))
        .await
        .expect("sign in failed");

    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, SIGNED_IN_MESSAGE);
    assert_eq!(notice.duration, DEFAULT_NOTICE_DURATION);
    assert!(!notice.is_visible(Duration::from_millis(3000)));

    let user = session.user().expect("no user");
    assert_eq!(user.role, Role::Librarian);
    assert_eq!(user.display_name(), "Ann Lee");
    assert!(session.auth().is_admin());
    assert!(session.api().client().has_bearer());

    // A fresh session over the same storage picks the user and token back up.
    let restored = self::session(&server, cache);
    assert!(restored.auth().is_authenticated());
    assert!(restored.api().client().has_bearer());
}

#[tokio::test]
async fn test_reader_without_role_falls_back_to_user() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first_name": "Ann",
            "last_name": "Lee",
            "email": "ann@lectern.dev"
        })))
        .mount(&server)
        .await;

    let mut session = session(&server, Cache::in_memory());
    session
        .sign_in(&SignInForm::new("ann@lectern.dev", "secret"))
        .await
        .unwrap();
    assert_eq!(session.user().unwrap().role, Role::User);
    assert!(!session.auth().is_admin());
}

#[tokio::test]
async fn test_failed_role_lookup_still_signs_in() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = session(&server, Cache::in_memory());
    session
        .sign_in(&SignInForm::new("ann@lectern.dev", "secret"))
        .await
        .unwrap();
    let user = session.user().unwrap();
    assert_eq!(user.role, Role::User);
    assert_eq!(user.email(), "ann@lectern.dev");
}

#[tokio::test]
async fn test_sign_in_failure_clears_auth() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "first_name": "Ann", "last_name": "Lee",
            "email": "ann@lectern.dev", "role": "ADMIN"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "ann@lectern.dev", "password": "wrong"})))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect email or password"})),
        )
        .mount(&server)
        .await;

    let mut session = session(&server, Cache::in_memory());
    session
        .sign_in(&SignInForm::new("ann@lectern.dev", "secret"))
        .await
        .unwrap();
    assert!(session.auth().is_authenticated());

    let err = session
        .sign_in(&SignInForm::new("ann@lectern.dev", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Incorrect email or password");
    assert!(!session.auth().is_authenticated());
    assert!(session.auth().token().is_none());
    assert!(!session.api().client().has_bearer());
}

#[tokio::test]
async fn test_invalid_form_is_not_sent() {
    let server = MockServer::start().await;
    let mut session = session(&server, Cache::in_memory());

    let err = session
        .sign_in(&SignInForm::new("not-an-email", "secret"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Email must be valid");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_after_login_leaves_session_signed_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "first_name": "Ann",
            "last_name": "Lee",
            "email": "ann@lectern.dev",
            "role": "ADMIN"
        })))
        .mount(&server)
        .await;

    // A directory squatting on the auth slot's file makes every write to it fail.
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("auth.json")).unwrap();
    let cache = Cache::open_dir(dir.path()).unwrap();
    let mut session = session(&server, cache);

    let err = session
        .sign_in(&SignInForm::new("ann@lectern.dev", "secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Auth(_)), "{:?}", err);

    assert!(!session.api().client().has_bearer());
    assert!(session.auth().token().is_none());
    assert!(session.user().is_none());
    assert!(!dir.path().join("access_token.json").exists());
}

#[tokio::test]
async fn test_expired_token_is_dropped_on_boot() {
    let server = MockServer::start().await;
    let cache = Cache::in_memory();
    cache
        .set(
            "access_token",
            &json!({"state": EXPIRED_TOKEN, "version": 0}),
        )
        .unwrap();
    cache
        .set(
            "auth",
            &json!({"state": {"user": {
                "id": 4, "first_name": "Ann", "last_name": "Lee",
                "email": "ann@lectern.dev", "role": "USER"
            }}, "version": 0}),
        )
        .unwrap();

    let session = session(&server, cache.clone());
    assert!(!session.auth().is_authenticated());
    assert!(!session.api().client().has_bearer());
    assert!(!cache.exists("access_token").unwrap());
}

#[tokio::test]
async fn test_checkout_orders_cart_and_clears_it() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first_name": "Ann", "last_name": "Lee", "email": "ann@lectern.dev"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders/"))
        .and(body_json(json!([1, 2])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"order_id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Cache::in_memory();
    let mut session = session(&server, cache.clone());

    assert!(matches!(
        session.checkout().await,
        Err(ClientError::NotAuthenticated)
    ));
    session
        .sign_in(&SignInForm::new("ann@lectern.dev", "secret"))
        .await
        .unwrap();
    assert!(matches!(session.checkout().await, Err(ClientError::EmptyCart)));

    assert!(session.add_to_cart(&book(1), None).unwrap());
    assert!(!session.add_to_cart(&book(1), Some(ComplectationId::new(11))).unwrap());
    assert!(session.add_to_cart(&book(2), Some(ComplectationId::new(11))).unwrap());
    assert_eq!(session.cart().len(), 2);
    assert_eq!(
        session.cart().items()[1].complectation.as_ref().unwrap().model,
        "Paperback"
    );

    let (order_id, notice) = session.checkout().await.expect("checkout failed");
    assert_eq!(order_id, OrderId::new(42));
    assert_eq!(notice.message, "Order #42 created");
    assert!(session.cart().is_empty());

    let restored = self::session(&server, cache);
    assert!(restored.cart().is_empty());
}

#[tokio::test]
async fn test_unknown_complectation_is_rejected() {
    let server = MockServer::start().await;
    let mut session = session(&server, Cache::in_memory());
    let err = session
        .add_to_cart(&book(1), Some(ComplectationId::new(99)))
        .unwrap_err();
    assert_eq!(err.user_message(), "Choose a complectation first");
    assert!(session.cart().is_empty());
}

#[tokio::test]
async fn test_admin_actions_need_admin_role() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first_name": "Ann", "last_name": "Lee", "email": "ann@lectern.dev"
        })))
        .mount(&server)
        .await;

    let mut session = session(&server, Cache::in_memory());
    assert!(matches!(
        session.approve_order(OrderId::new(1)).await,
        Err(ClientError::NotAuthenticated)
    ));

    session
        .sign_in(&SignInForm::new("ann@lectern.dev", "secret"))
        .await
        .unwrap();
    let err = session.reject_order(OrderId::new(1)).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    assert_eq!(err.user_message(), "You do not have access to this action");

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.url.path().starts_with("/orders")));
}

#[tokio::test]
async fn test_edit_profile_keeps_role() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "first_name": "Ann", "last_name": "Lee",
            "email": "ann@lectern.dev", "role": "ADMIN"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users/4"))
        .and(body_json(json!({
            "first_name": "Anna", "last_name": "Lee", "email": "anna@lectern.dev"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server, Cache::in_memory());
    session
        .sign_in(&SignInForm::new("ann@lectern.dev", "secret"))
        .await
        .unwrap();

    let form = ProfileEditForm {
        first_name: "Anna".to_string(),
        last_name: "Lee".to_string(),
        email: "anna@lectern.dev".to_string(),
    };
    session.edit_profile(&form).await.expect("edit failed");

    let user = session.user().unwrap();
    assert_eq!(user.display_name(), "Anna Lee");
    assert_eq!(user.email(), "anna@lectern.dev");
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn test_search_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/"))
        .and(query_param("search_term", "dune"))
        .and(query_param("min", "100"))
        .and(query_param("max", "300"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Dune", "isbn": "1", "num_pages": 200, "authors": []}
        ])))
        .mount(&server)
        .await;

    let session = session(&server, Cache::in_memory());
    let query = BookQuery::new()
        .with_search_term("dune")
        .with_selection(FilterSelection::new().with_page_range(100, 300));
    let books = session.search(&query).await.unwrap().expect("search was superseded");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Dune");
}

#[tokio::test]
async fn test_report_download_uses_suggested_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analytics/report"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"report.docx\"")
                .set_body_bytes(b"PK\x03\x04".to_vec()),
        )
        .mount(&server)
        .await;

    let session = session(&server, Cache::in_memory());
    let report = session.api().download_report().await.unwrap();
    assert_eq!(report.file_name, "report.docx");
    assert_eq!(report.bytes, b"PK\x03\x04");
}

#[tokio::test]
async fn test_report_name_with_server_path_is_reduced_to_file_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analytics/report"))
        .respond_with(ResponseTemplate::new(200).insert_header(
            "content-disposition",
            "attachment; filename=\"/srv/tables/report-1f2e-2026-10-18T10:00:00.docx\"",
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/analytics/report"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-disposition", "attachment; filename=\"../\""),
        )
        .mount(&server)
        .await;

    let session = session(&server, Cache::in_memory());
    let report = session.api().download_report().await.unwrap();
    assert_eq!(report.file_name, "report-1f2e-2026-10-18T10:00:00.docx");

    let fallback = session.api().download_report().await.unwrap();
    assert_eq!(fallback.file_name, lectern_client::DEFAULT_REPORT_FILE_NAME);
}

#[test]
fn test_session_from_config_uses_storage_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        storage_dir: dir.path().join("state"),
        ..ClientConfig::default()
    };
    let mut session = Session::from_config(&config).unwrap();
    session.boot().unwrap();
    assert!(session.cart().is_empty());
    assert!(dir.path().join("state").is_dir());
}

fn signed_in_cache(role: &str) -> Cache {
    let cache = Cache::in_memory();
    cache
        .set("access_token", &json!({"state": LIVE_TOKEN, "version": 0}))
        .unwrap();
    cache
        .set(
            "auth",
            &json!({"state": {"user": {
                "id": 4, "first_name": "Ann", "last_name": "Lee",
                "email": "ann@lectern.dev", "role": role
            }}, "version": 0}),
        )
        .unwrap();
    cache
}

fn book_json(complectations: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 1,
        "title": "Book 1",
        "isbn": "978-0-00",
        "num_pages": 120,
        "authors": [],
        "complectations": complectations
    })
}

#[tokio::test]
async fn test_edit_complectation_saves_book_with_variant() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/books/1"))
        .and(body_json(json!({
            "title": "Book 1",
            "isbn": "978-0-00",
            "num_pages": 120,
            "authors": [],
            "complectations": [
                {"id": 10, "model": "Hardcover", "description": "", "price": 12.5},
                {"id": 11, "model": "Soft", "description": "Revised", "price": 6.5}
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json(json!([
            {"id": 10, "model": "Hardcover", "description": "", "price": 12.5},
            {"id": 11, "model": "Soft", "description": "Revised", "price": 6.5}
        ]))))
        .mount(&server)
        .await;

    let session = session(&server, signed_in_cache("ADMIN"));
    let mut selection = ComplectationSelection::none();
    selection.select(ComplectationId::new(11));

    let draft = ComplectationDraft {
        model: "Soft".to_string(),
        description: "Revised".to_string(),
        price: Price::from_cents(650),
    };
    let fresh = session
        .edit_complectation(&book(1), &mut selection, draft)
        .await
        .expect("edit failed");

    assert_eq!(selection.id(), Some(ComplectationId::new(11)));
    assert_eq!(selection.current(&fresh.complectations).unwrap().model, "Soft");
}

#[tokio::test]
async fn test_add_complectation_keeps_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items/1/complectation"))
        .and(body_json(json!({"model": "Gift", "description": "Boxed", "price": 30.0})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json(json!([
            {"id": 10, "model": "Hardcover", "description": "", "price": 12.5},
            {"id": 11, "model": "Paperback", "description": "", "price": 7.0},
            {"id": 12, "model": "Gift", "description": "Boxed", "price": 30.0}
        ]))))
        .mount(&server)
        .await;

    let session = session(&server, signed_in_cache("LIBRARIAN"));
    let mut selection = ComplectationSelection::none();
    selection.select(ComplectationId::new(11));

    let draft = ComplectationDraft {
        model: "Gift".to_string(),
        description: "Boxed".to_string(),
        price: Price::from_cents(3000),
    };
    let fresh = session
        .add_complectation(&book(1), &mut selection, draft)
        .await
        .unwrap();

    assert_eq!(fresh.complectations.len(), 3);
    assert_eq!(selection.index_in(&fresh.complectations), Some(1));
}

#[tokio::test]
async fn test_remove_selected_complectation_reanchors_selection() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/complectations/11"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json(json!([
            {"id": 10, "model": "Hardcover", "description": "", "price": 12.5}
        ]))))
        .mount(&server)
        .await;

    let session = session(&server, signed_in_cache("ADMIN"));
    let mut selection = ComplectationSelection::none();
    selection.select(ComplectationId::new(11));

    let fresh = session
        .remove_selected_complectation(&book(1), &mut selection)
        .await
        .unwrap();
    assert_eq!(selection.id(), Some(ComplectationId::new(10)));

    // The last variant stays.
    let err = session
        .remove_selected_complectation(&fresh, &mut selection)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "An item needs at least one complectation");
}

#[tokio::test]
async fn test_complectation_flows_need_admin_role() {
    let server = MockServer::start().await;
    let session = session(&server, signed_in_cache("USER"));
    let mut selection = ComplectationSelection::first_of(&book(1).complectations);

    let err = session
        .remove_selected_complectation(&book(1), &mut selection)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
