use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use harvest_api::application::auth_service::AuthService;
use harvest_api::application::production_service::ProductionService;
use harvest_api::data::memory::InMemoryFarmStore;
use harvest_api::data::user_repository::InMemoryUserRepository;
use harvest_api::domain::repository::UserRepository;
use harvest_api::infrastructure::config::TokenSettings;
use harvest_api::infrastructure::security::{generate_token, validate_token, verify_password};
use harvest_api::presentation::handlers::AppState;
use harvest_api::presentation::routes;
use serde_json::{Value, json};
use std::sync::Arc;

const SECRET: &str = "test-secret-key-for-auth-tests";

macro_rules! setup_auth_test {
    () => {{
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let auth_service = AuthService::new(user_repository.clone(), TokenSettings::new(SECRET));
        let production_service = ProductionService::new(Arc::new(InMemoryFarmStore::new()));

        let state = web::Data::new(AppState {
            auth_service: Arc::new(auth_service),
            production_service: Arc::new(production_service),
        });

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(|cfg| routes::configure(cfg, SECRET)),
        )
        .await;

        (app, user_repository)
    }};
}

fn registration(email: &str, password: &str) -> Value {
    json!({
        "name": "Maria Souza",
        "email": email,
        "phone": "5562999990000",
        "password": password,
        "passwordConfirmation": password
    })
}

#[actix_web::test]
async fn test_full_registration_login_flow() {
    let (app, _) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("flow@example.com", "password123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "flow@example.com");
    assert_eq!(body["user"]["name"], "Maria Souza");
    assert_eq!(body["user"]["phone"], "5562999990000");
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    assert_eq!(
        validate_token(body["token"].as_str().unwrap(), SECRET).unwrap(),
        user_id
    );

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "flow@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(
        validate_token(body["token"].as_str().unwrap(), SECRET).unwrap(),
        user_id
    );
}

#[actix_web::test]
async fn test_password_never_leaves_the_server() {
    let (app, repo) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("hidden@example.com", "sensitive_password_123"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let user = body["user"].as_object().unwrap();
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("passwordHash"));
    assert!(!user.contains_key("password_hash"));
    assert!(!body.to_string().contains("sensitive_password_123"));

    let stored = repo
        .find_user_by_email("hidden@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "sensitive_password_123");
    assert!(verify_password("sensitive_password_123", &stored.password_hash).unwrap());
}

#[actix_web::test]
async fn test_register_missing_fields() {
    let (app, _) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "name": "Maria", "email": "missing@example.com", "password": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert!(body["error"].as_str().unwrap().contains("passwordConfirmation"));
}

#[actix_web::test]
async fn test_register_password_mismatch() {
    let (app, repo) = setup_auth_test!();

    let mut payload = registration("mismatch@example.com", "one");
    payload["passwordConfirmation"] = json!("two");
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
        repo.find_user_by_email("mismatch@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[actix_web::test]
async fn test_register_duplicate_email() {
    let (app, _) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("duplicate@example.com", "pass1"))
        .to_request();
    test::call_service(&app, req).await;

    let mut payload = registration("duplicate@example.com", "pass2");
    payload["name"] = json!("Someone Else");
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_login_failures() {
    let (app, _) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("wrongpass@example.com", "correct"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "wrongpass@example.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "nobody@example.com", "password": "correct" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "wrongpass@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_requires_valid_token() {
    let (app, _) = setup_auth_test!();

    let req = test::TestRequest::put()
        .uri("/update")
        .set_json(json!({ "name": "Nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let forged = generate_token("someone", "another-secret", 3600).unwrap();
    let req = test::TestRequest::put()
        .uri("/update")
        .insert_header(("Authorization", format!("Bearer {}", forged)))
        .set_json(json!({ "name": "Nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::delete()
        .uri("/delete")
        .insert_header(("Authorization", "Token abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_update_profile_and_password() {
    let (app, _) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("update@example.com", "old-pass"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    // The id in the body is ignored; identity comes from the token.
    let req = test::TestRequest::patch()
        .uri("/update")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "id": "someone-else",
            "name": "Maria S.",
            "password": "new-pass",
            "passwordConfirmation": "new-pass"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["name"], "Maria S.");
    assert_eq!(body["user"]["email"], "update@example.com");
    assert_eq!(
        validate_token(body["token"].as_str().unwrap(), SECRET).unwrap(),
        user_id
    );

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "update@example.com", "password": "old-pass" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "update@example.com", "password": "new-pass" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_update_with_mismatched_passwords_keeps_old_password() {
    let (app, repo) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("keep@example.com", "old-pass"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().unwrap().to_string();
    let before = repo
        .find_user_by_email("keep@example.com")
        .await
        .unwrap()
        .unwrap();

    let req = test::TestRequest::put()
        .uri("/update")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "password": "a", "passwordConfirmation": "b" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::put()
        .uri("/update")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "password": "only-one" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let after = repo
        .find_user_by_email("keep@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.password_hash, before.password_hash);
}

#[actix_web::test]
async fn test_update_email_conflict() {
    let (app, _) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("taken@example.com", "pw"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("mover@example.com", "pw"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri("/update")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "email": "taken@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_delete_account_then_token_is_useless() {
    let (app, repo) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(registration("bye@example.com", "pw"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri("/delete")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let bytes = test::read_body(resp).await;
    assert!(bytes.is_empty());
    assert!(
        repo.find_user_by_email("bye@example.com")
            .await
            .unwrap()
            .is_none()
    );

    let req = test::TestRequest::put()
        .uri("/update")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "name": "Ghost" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::delete()
        .uri("/delete")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
