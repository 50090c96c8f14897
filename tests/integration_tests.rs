// Integration tests for the PawMatch client against a mocked backend

use mockito::{Matcher, Server};
use pawmatch_client::config::Settings;
use pawmatch_client::models::{Gender, Pet, PetForm, SwipeAction, UpdatePetRequest};
use pawmatch_client::services::{
    ApiClient, ApiError, MatchingService, MemoryTokenStore, PetService, PhotoService, PhotoUpload,
    TokenStore,
};
use pawmatch_client::stores::{MatchingStore, Notifications};
use pawmatch_client::{App, RefillPolicy, StoreError, SwipePhase};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn ok(data: Value) -> String {
    json!({ "success": true, "data": data }).to_string()
}

fn failure(message: &str, code: Option<&str>) -> String {
    json!({ "success": false, "error": message, "code": code }).to_string()
}

fn pet_json(id: &str, photos: &[&str]) -> Value {
    json!({
        "id": id,
        "ownerId": "u1",
        "name": format!("Pet {}", id),
        "breed": "Beagle",
        "ageYears": 3,
        "gender": "male",
        "photoUrls": photos,
        "isActive": true
    })
}

fn candidate_json(id: &str) -> Value {
    json!({
        "id": id,
        "ownerId": format!("owner-{}", id),
        "name": format!("Candidate {}", id),
        "breed": "Poodle",
        "ageYears": 2,
        "gender": "female",
        "photoUrls": []
    })
}

fn create_test_pet(id: &str) -> Pet {
    serde_json::from_value(pet_json(id, &[])).unwrap()
}

fn tokens(access: &str, refresh: &str) -> Arc<MemoryTokenStore> {
    let store = Arc::new(MemoryTokenStore::new());
    store.set_tokens(Some(access), Some(refresh)).unwrap();
    store
}

fn client(base_url: &str, tokens: Arc<MemoryTokenStore>) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(base_url, Duration::from_secs(5), tokens).unwrap())
}

fn app(base_url: &str) -> App {
    let mut settings = Settings::default();
    settings.api.base_url = base_url.to_string();
    App::with_token_store(settings, tokens("a1", "r1")).unwrap()
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_and_request_retried() {
    let mut server = Server::new_async().await;

    let expired = server
        .mock("GET", "/api/dogs/my")
        .match_header("authorization", "Bearer old")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(failure("Token expired", Some("TOKEN_EXPIRED")))
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/auth/refresh")
        .match_body(Matcher::Json(json!({ "refreshToken": "r1" })))
        .with_header("content-type", "application/json")
        .with_body(ok(json!({ "accessToken": "new" })))
        .expect(1)
        .create_async()
        .await;
    let retried = server
        .mock("GET", "/api/dogs/my")
        .match_header("authorization", "Bearer new")
        .with_header("content-type", "application/json")
        .with_body(ok(json!([pet_json("P1", &[])])))
        .expect(1)
        .create_async()
        .await;

    let store = tokens("old", "r1");
    let pets = PetService::new(client(&server.url(), store.clone()));

    let result = assert_ok!(pets.my_pets().await);
    assert_eq!(result.len(), 1);
    assert_eq!(store.access_token().as_deref(), Some("new"));
    assert_eq!(store.refresh_token().as_deref(), Some("r1"));

    expired.assert_async().await;
    refresh.assert_async().await;
    retried.assert_async().await;
}

#[tokio::test]
async fn test_failed_refresh_clears_tokens() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/dogs/my")
        .with_status(401)
        .with_body(failure("Token expired", Some("TOKEN_EXPIRED")))
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/auth/refresh")
        .with_status(401)
        .with_body(failure("Invalid refresh token", None))
        .expect(1)
        .create_async()
        .await;

    let store = tokens("old", "stale");
    let pets = PetService::new(client(&server.url(), store.clone()));

    let err = assert_err!(pets.my_pets().await);
    assert!(matches!(err, ApiError::AuthExpired));
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());

    refresh.assert_async().await;
}

#[tokio::test]
async fn test_plain_unauthorized_does_not_refresh() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/dogs/my")
        .with_status(401)
        .with_body(failure("Not signed in", Some("UNAUTHORIZED")))
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/auth/refresh")
        .expect(0)
        .create_async()
        .await;

    let store = tokens("old", "r1");
    let pets = PetService::new(client(&server.url(), store.clone()));

    let err = pets.my_pets().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.code(), Some("UNAUTHORIZED"));
    assert_eq!(store.access_token().as_deref(), Some("old"));

    refresh.assert_async().await;
}

#[tokio::test]
async fn test_swipe_flow_detects_match_and_refills() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/dogs/my")
        .with_body(ok(json!([pet_json("P1", &[])])))
        .create_async()
        .await;
    server
        .mock("GET", Matcher::Regex(r"^/api/matching/candidates/P1".to_string()))
        .match_query(Matcher::UrlEncoded("limit".into(), "3".into()))
        .with_body(ok(json!([candidate_json("C1"), candidate_json("C2"), candidate_json("C3")])))
        .expect(1)
        .create_async()
        .await;
    let swipe = server
        .mock("POST", "/api/matching/swipe")
        .match_body(Matcher::Json(json!({
            "swiperDogId": "P1",
            "swipedDogId": "C1",
            "action": "like"
        })))
        .with_body(ok(json!({
            "swipe": { "swiperDogId": "P1", "swipedDogId": "C1", "action": "like" },
            "match": { "id": "M1", "dog1Id": "P1", "dog2Id": "C1" }
        })))
        .expect(1)
        .create_async()
        .await;
    let refill = server
        .mock("GET", Matcher::Regex(r"^/api/matching/candidates/P1".to_string()))
        .match_query(Matcher::UrlEncoded("limit".into(), "10".into()))
        .with_body(ok(json!([candidate_json("C2"), candidate_json("C3"), candidate_json("C4")])))
        .expect(1)
        .create_async()
        .await;

    let app = app(&server.url());

    // the first active pet is selected automatically
    app.pets().fetch_my_pets().await.unwrap();
    assert_eq!(app.matching().active_pet().await.map(|p| p.id), Some("P1".to_string()));

    app.matching().load("P1", 3).await.unwrap();
    assert_eq!(app.matching().queue_len().await, 3);

    let matched = app.matching().swipe("C1", SwipeAction::Like).await.unwrap();
    assert_eq!(matched.map(|m| m.id), Some("M1".to_string()));
    assert_eq!(app.matching().match_count().await, 1);

    app.matching().settle().await;
    let ids: Vec<String> = app.matching().candidates().await.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["C2", "C3", "C4"]);
    assert!(!app.matching().refill_pending().await);

    swipe.assert_async().await;
    refill.assert_async().await;
}

#[tokio::test]
async fn test_duplicate_swipe_removes_candidate_and_reports_error() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/dogs/my")
        .with_body(ok(json!([pet_json("P1", &[])])))
        .create_async()
        .await;
    server
        .mock("GET", Matcher::Regex(r"^/api/matching/candidates/P1".to_string()))
        .with_body(ok(json!([
            candidate_json("C1"),
            candidate_json("C2"),
            candidate_json("C3"),
            candidate_json("C4")
        ])))
        .create_async()
        .await;
    server
        .mock("POST", "/api/matching/swipe")
        .with_status(409)
        .with_body(failure("Already swiped on this dog", Some("DUPLICATE_SWIPE")))
        .create_async()
        .await;

    let app = app(&server.url());
    app.pets().fetch_my_pets().await.unwrap();
    app.matching().load_candidates().await.unwrap();

    let err = assert_err!(app.matching().swipe("C1", SwipeAction::Reject).await);
    assert_eq!(err.api().and_then(ApiError::code), Some("DUPLICATE_SWIPE"));

    let ids: Vec<String> = app.matching().candidates().await.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["C2", "C3", "C4"]);
    assert_eq!(app.matching().match_count().await, 0);
}

#[tokio::test]
async fn test_unreachable_backend_leaves_queue_alone() {
    // nothing listens on the discard port
    let api = client("http://127.0.0.1:9", tokens("a1", "r1"));
    let notifications = Arc::new(Notifications::default());
    let store = MatchingStore::new(
        Arc::new(MatchingService::new(api)),
        notifications.clone(),
        RefillPolicy::default(),
    );
    store.select(create_test_pet("P1")).await.unwrap();

    let err = store.load_candidates().await.unwrap_err();
    assert!(err.is_network());
    assert!(!err.api().unwrap().is_completed());
    assert_eq!(store.queue_len().await, 0);

    let err = store.swipe("C1", SwipeAction::Like).await.unwrap_err();
    assert!(matches!(err.api(), Some(ApiError::Transport(_))));
    assert_eq!(store.phase().await, SwipePhase::Idle);
    assert!(notifications.active().is_empty());
}

#[tokio::test]
async fn test_update_body_omits_absent_fields() {
    let mut server = Server::new_async().await;

    let update = server
        .mock("PUT", "/api/dogs/P1")
        .match_body(Matcher::Json(json!({ "name": "Rex" })))
        .with_body(ok(pet_json("P1", &[])))
        .expect(1)
        .create_async()
        .await;

    let pets = PetService::new(client(&server.url(), tokens("a1", "r1")));
    let request = UpdatePetRequest {
        name: Some("Rex".to_string()),
        ..Default::default()
    };

    let pet = pets.update_pet("P1", &request).await.unwrap();
    assert_eq!(pet.id, "P1");
    update.assert_async().await;
}

#[tokio::test]
async fn test_empty_photo_deletes_send_nothing() {
    // any request would hit an unmocked route and fail
    let server = Server::new_async().await;
    let photos = PhotoService::new(client(&server.url(), tokens("a1", "r1")));

    assert_ok!(photos.delete_photo("").await);
    assert_ok!(photos.delete_photos(&[]).await);
    assert!(photos.upload_photos(vec![]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pet_update_keeps_photo_order_and_appends_uploads() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/dogs/my")
        .with_body(ok(json!([pet_json("P1", &["a.jpg", "b.jpg", "c.jpg"])])))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/photos/bulk")
        .match_body(Matcher::Json(json!({ "urls": ["b.jpg"] })))
        .with_body(ok(Value::Null))
        .expect(1)
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/api/photos/upload-multiple")
        .with_body(ok(json!({ "urls": ["d.jpg"] })))
        .expect(1)
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/api/dogs/P1")
        .match_body(Matcher::PartialJson(json!({
            "name": "Rex",
            "photoUrls": ["a.jpg", "c.jpg", "d.jpg"]
        })))
        .with_body(ok(pet_json("P1", &["a.jpg", "c.jpg", "d.jpg"])))
        .expect(1)
        .create_async()
        .await;

    let app = app(&server.url());
    app.pets().fetch_my_pets().await.unwrap();

    let form = PetForm {
        name: "Rex".to_string(),
        breed: "Beagle".to_string(),
        age_years: 4,
        gender: Gender::Male,
        bio: None,
    };
    let new_photo = PhotoUpload::new("d.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]);

    let pet = app
        .pets()
        .update_pet("P1", form, vec![new_photo], vec!["b.jpg".to_string()])
        .await
        .unwrap();

    assert_eq!(pet.photo_urls, vec!["a.jpg", "c.jpg", "d.jpg"]);
    assert_eq!(app.pets().my_pets().await[0].photo_urls, pet.photo_urls);

    delete.assert_async().await;
    upload.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn test_invalid_pet_form_makes_no_request() {
    let server = Server::new_async().await;
    let app = app(&server.url());

    let form = PetForm {
        name: String::new(),
        breed: "Beagle".to_string(),
        age_years: 31,
        gender: Gender::Female,
        bio: None,
    };

    let err = app.pets().create_pet(form, vec![]).await.unwrap_err();
    match err {
        StoreError::Validation(e) => {
            assert!(e.has_field("name"));
            assert!(e.has_field("age_years"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

fn valid_pet_form(bio: Option<&str>) -> PetForm {
    PetForm {
        name: "Rex".to_string(),
        breed: "Beagle".to_string(),
        age_years: 4,
        gender: Gender::Male,
        bio: bio.map(str::to_string),
    }
}

#[tokio::test]
async fn test_pet_without_photos_makes_no_request() {
    let mut server = Server::new_async().await;

    let create = server
        .mock("POST", "/api/dogs")
        .with_body(ok(pet_json("P1", &[])))
        .expect(0)
        .create_async()
        .await;

    let app = app(&server.url());
    let err = app.pets().create_pet(valid_pet_form(None), vec![]).await.unwrap_err();
    match err {
        StoreError::Validation(e) => assert!(e.has_field("photos")),
        other => panic!("expected validation error, got {:?}", other),
    }

    let pdf = PhotoUpload::new("rex.pdf", "application/pdf", vec![0x25, 0x50]);
    let err = app.pets().create_pet(valid_pet_form(None), vec![pdf]).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(e) if e.has_field("photos")));

    assert!(app.pets().my_pets().await.is_empty());
    create.assert_async().await;
}

#[tokio::test]
async fn test_pet_update_photo_count_is_checked_before_any_request() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/dogs/my")
        .with_body(ok(json!([pet_json(
            "P1",
            &["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]
        )])))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/photos/bulk")
        .with_body(ok(Value::Null))
        .expect(0)
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/api/photos/upload-multiple")
        .with_body(ok(json!({ "urls": ["f.jpg"] })))
        .expect(0)
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/api/dogs/P1")
        .with_body(ok(pet_json("P1", &[])))
        .expect(0)
        .create_async()
        .await;

    let app = app(&server.url());
    app.pets().fetch_my_pets().await.unwrap();

    // a sixth photo
    let extra = PhotoUpload::new("f.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]);
    let err = app
        .pets()
        .update_pet("P1", valid_pet_form(None), vec![extra], vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(e) if e.has_field("photos")));

    // every photo removed and nothing uploaded
    let all: Vec<String> = ["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]
        .iter()
        .map(|url| url.to_string())
        .collect();
    let err = app
        .pets()
        .update_pet("P1", valid_pet_form(None), vec![], all)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(e) if e.has_field("photos")));

    assert_eq!(app.pets().my_pets().await[0].photo_urls.len(), 5);
    delete.assert_async().await;
    upload.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn test_pet_update_with_blank_bio_clears_it() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/dogs/my")
        .with_body(ok(json!([pet_json("P1", &["a.jpg"])])))
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/api/dogs/P1")
        .match_body(Matcher::PartialJson(json!({
            "name": "Rex",
            "bio": null,
            "photoUrls": ["a.jpg"]
        })))
        .with_body(ok(pet_json("P1", &["a.jpg"])))
        .expect(1)
        .create_async()
        .await;

    let app = app(&server.url());
    app.pets().fetch_my_pets().await.unwrap();

    assert_ok!(
        app.pets()
            .update_pet("P1", valid_pet_form(Some("   ")), vec![], vec![])
            .await
    );
    update.assert_async().await;
}

#[tokio::test]
async fn test_sign_in_then_sign_out() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/api/auth/signin")
        .match_body(Matcher::Json(json!({ "email": "sam@paw.io", "password": "Secret123" })))
        .with_body(ok(json!({
            "user": { "id": "u1", "email": "sam@paw.io" },
            "accessToken": "fresh",
            "refreshToken": "r2"
        })))
        .create_async()
        .await;
    server
        .mock("GET", "/api/profiles/u1")
        .match_header("authorization", "Bearer fresh")
        .with_body(ok(json!({ "id": "u1", "displayName": "Sam", "city": "Ghent" })))
        .create_async()
        .await;
    let signout = server
        .mock("POST", "/api/auth/signout")
        .with_body(ok(Value::Null))
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let mut settings = Settings::default();
    settings.api.base_url = server.url();
    let app = App::with_token_store(settings, store.clone()).unwrap();

    let form = pawmatch_client::models::LoginForm {
        email: "sam@paw.io".to_string(),
        password: "Secret123".to_string(),
    };
    app.auth().sign_in(form).await.unwrap();

    let snapshot = app.auth().snapshot().await;
    assert!(snapshot.is_authenticated);
    assert_eq!(
        snapshot.profile.and_then(|p| p.display_name),
        Some("Sam".to_string())
    );
    assert_eq!(store.access_token().as_deref(), Some("fresh"));

    app.sign_out().await.unwrap();
    assert!(!app.auth().is_authenticated().await);
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());

    signout.assert_async().await;
}
