//! End-to-end scenarios over the assembled application.

use actix_web::{http::header, http::StatusCode, test, App, HttpServer};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::error;
use crate::configs::{self, AppServices, CmsConfig};
use crate::modules::auth::{AdminAccount, AdminRole};
use crate::modules::autosave::AutoSaveConfig;
use crate::modules::client::{
    CmsClient, GalleriesHook, LocalFile, PhotosHook, UploadStatus, UploadTracker,
};
use crate::modules::gallery::CreateGalleryModel;
use crate::modules::photo::UploadConfig;
use crate::modules::version_control::{git::GitConfig, CommitInfo, VersionControlSink};
use crate::utils::hash_password;

const ADMIN: (&str, &str) = ("admin@portfolio.com", "portfolio2024");
const PHOTOGRAPHER: (&str, &str) = ("photo@portfolio.com", "lumiere");

/// Records commit messages instead of running git.
#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl VersionControlSink for RecordingSink {
    async fn commit(&self, message: &str) -> Result<String, error::SystemError> {
        let mut messages = self.messages.lock().unwrap();
        messages.push(message.to_string());
        Ok(format!("{:040}", messages.len()))
    }

    async fn history(&self, limit: usize) -> Result<Vec<CommitInfo>, error::SystemError> {
        let messages = self.messages.lock().unwrap();
        Ok(messages
            .iter()
            .enumerate()
            .rev()
            .take(limit)
            .map(|(i, m)| CommitInfo { hash: format!("{:040}", i + 1), message: m.clone(), date: Utc::now() })
            .collect())
    }
}

struct Fixture {
    services: AppServices,
    sink: Arc<RecordingSink>,
    dir: tempfile::TempDir,
}

async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config = CmsConfig {
        data_dir: dir.path().join("data"),
        upload: UploadConfig {
            upload_dir: dir.path().join("uploads").to_string_lossy().into_owned(),
            ..UploadConfig::default()
        },
        accounts: vec![
            AdminAccount {
                email: ADMIN.0.into(),
                password_hash: hash_password(ADMIN.1).unwrap(),
                role: AdminRole::Admin,
            },
            AdminAccount {
                email: PHOTOGRAPHER.0.into(),
                password_hash: hash_password(PHOTOGRAPHER.1).unwrap(),
                role: AdminRole::Photographer,
            },
        ],
        jwt_secret: "test-secret".into(),
        access_token_expiration: 3600,
        autosave: AutoSaveConfig { enabled: false, interval: Duration::from_secs(300) },
        git: GitConfig {
            repo_dir: dir.path().to_path_buf(),
            tracked: Vec::new(),
            remote: "origin".into(),
            branch: "main".into(),
            push: false,
        },
    };
    let sink = Arc::new(RecordingSink::default());
    let services = AppServices::with_sink(config, sink.clone()).await.unwrap();
    Fixture { services, sink, dir }
}

fn token_for(fx: &Fixture, (email, password): (&str, &str)) -> String {
    let login = crate::modules::auth::model::LoginModel {
        email: email.into(),
        password: password.into(),
    };
    fx.services.auth.login(login).unwrap().access_token
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Runs a request and returns status plus JSON body; middleware errors
/// are rendered the way the server would render them.
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let (status, bytes) = match test::try_call_service(&$app, $req.to_request()).await {
            Ok(res) => {
                let status = res.status();
                (status, test::read_body(res).await)
            }
            Err(e) => {
                let res = e.error_response();
                let status = res.status();
                (status, actix_web::body::to_bytes(res.into_body()).await.unwrap())
            }
        };
        let json: Value =
            if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }};
}

macro_rules! app {
    ($fx:expr) => {
        test::init_service(App::new().configure(configs::configure($fx.services.clone()))).await
    };
}

fn multipart(parts: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "----portfolio-boundary";
    let mut body = Vec::new();
    for (filename, mime, bytes) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n\
                 Content-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

#[actix_web::test]
async fn gallery_create_then_unpublish() {
    let fx = fixture().await;
    let app = app!(fx);
    let token = token_for(&fx, ADMIN);

    let req = test::TestRequest::post()
        .uri("/api/cms/galleries")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Nature", "photos": [] }));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::CREATED);
    let created = &body["data"];
    assert_eq!(created["slug"], "nature");
    assert_eq!(created["order"], 0);
    assert_eq!(created["published"], true);
    assert_eq!(created["category"], "general");
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri("/api/cms/galleries")
        .insert_header(bearer(&token))
        .set_json(json!({ "id": id, "published": false }));
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/cms/galleries").insert_header(bearer(&token));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    let galleries = body["data"].as_array().unwrap();
    assert_eq!(galleries.len(), 1);
    assert_eq!(galleries[0]["published"], false);
    assert!(timestamp(&galleries[0]["updatedAt"]) > timestamp(&galleries[0]["createdAt"]));

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/galleries"));
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    let (status, body) = send!(app, test::TestRequest::get().uri("/api/galleries/nature"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Gallery not found");
}

#[actix_web::test]
async fn cms_routes_require_token_and_role() {
    let fx = fixture().await;
    let app = app!(fx);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/cms/photos"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/cms/photos")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-token"));
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let photographer = token_for(&fx, PHOTOGRAPHER);
    let req = test::TestRequest::get().uri("/api/cms/photos").insert_header(bearer(&photographer));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let req = test::TestRequest::put()
        .uri("/api/cms/settings")
        .insert_header(bearer(&photographer))
        .set_json(json!({ "siteName": "Hijacked" }));
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::post().uri("/api/cms/save-changes").insert_header(bearer(&photographer));
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn login_route_issues_usable_token() {
    let fx = fixture().await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": ADMIN.0, "password": "wrong" }));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": ADMIN.0, "password": ADMIN.1 }));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "ADMIN");
    let token = body["data"]["accessToken"].as_str().unwrap();

    let req = test::TestRequest::get().uri("/api/cms/stats").insert_header(bearer(token));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCategories"], 4);
    assert_eq!(body["data"]["monthlyStats"].as_array().unwrap().len(), 6);
}

#[actix_web::test]
async fn upload_serve_and_delete_photo() {
    let fx = fixture().await;
    let app = app!(fx);
    let token = token_for(&fx, ADMIN);
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];

    let (content_type, payload) = multipart(&[
        ("Coucher de soleil.jpg", "image/jpeg", &jpeg),
        ("notes.txt", "text/plain", b"hello"),
    ]);
    let req = test::TestRequest::post()
        .uri("/api/cms/photos")
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload);
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::CREATED);
    let files = body["data"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["title"], "Coucher de soleil");
    assert_eq!(files[0]["type"], "image/jpeg");
    assert_eq!(body["data"]["rejected"][0]["filename"], "notes.txt");
    let id = files[0]["id"].as_str().unwrap().to_string();
    let url = files[0]["url"].as_str().unwrap().to_string();

    let res = test::call_service(&app, test::TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await.as_ref(), jpeg.as_slice());

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/photos?limit=10"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/cms/photos?id={id}"))
        .insert_header(bearer(&token));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Photo deleted successfully");

    let (status, _) = send!(app, test::TestRequest::get().uri(&url));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn upload_of_only_invalid_files_writes_nothing() {
    let fx = fixture().await;
    let app = app!(fx);
    let token = token_for(&fx, ADMIN);

    let (content_type, payload) = multipart(&[("notes.txt", "text/plain", b"hello")]);
    let req = test::TestRequest::post()
        .uri("/api/cms/photos")
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload);
    let (status, body) = send!(app, req);

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("notes.txt"));
    assert!(!fx.dir.path().join("data/photos.json").exists());
    assert!(!fx.services.autosave.status().has_changes);
}

#[actix_web::test]
async fn upload_part_count_is_capped() {
    let fx = fixture().await;
    let app = app!(fx);
    let token = token_for(&fx, ADMIN);
    let jpeg: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];
    let names: Vec<String> = (0..11).map(|i| format!("{i}.jpg")).collect();
    let parts: Vec<(&str, &str, &[u8])> =
        names.iter().map(|n| (n.as_str(), "image/jpeg", jpeg)).collect();

    let (content_type, payload) = multipart(&parts);
    let req = test::TestRequest::post()
        .uri("/api/cms/photos")
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload);
    let (status, body) = send!(app, req);

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Too many files (max 10 per upload)");
    assert!(!fx.dir.path().join("data/photos.json").exists());
}

#[actix_web::test]
async fn malformed_requests_are_rejected() {
    let fx = fixture().await;
    let app = app!(fx);
    let token = token_for(&fx, ADMIN);

    let req = test::TestRequest::post()
        .uri("/api/cms/galleries")
        .insert_header(bearer(&token))
        .set_json(json!({ "description": "no title" }));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let req = test::TestRequest::delete().uri("/api/cms/galleries?id=missing").insert_header(bearer(&token));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Gallery not found");

    let req = test::TestRequest::delete().uri("/api/cms/categories").insert_header(bearer(&token));
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/cms/photos")
        .insert_header(bearer(&token))
        .set_json(json!({ "id": "x", "rating": 9 }));
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn corrupt_collection_is_a_server_error() {
    let fx = fixture().await;
    let app = app!(fx);
    std::fs::write(fx.dir.path().join("data/galleries.json"), "{ not json").unwrap();

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/galleries"));

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal Server Error");
}

#[actix_web::test]
async fn settings_merge_and_public_read() {
    let fx = fixture().await;
    let app = app!(fx);
    let token = token_for(&fx, ADMIN);

    let req = test::TestRequest::put()
        .uri("/api/cms/settings")
        .insert_header(bearer(&token))
        .set_json(json!({ "settings": { "siteName": "Studio Lumière", "accentColor": "#111111" } }));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fontFamily"], "Inter");

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/settings"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["siteName"], "Studio Lumière");
    assert_eq!(body["data"]["accentColor"], "#111111");

    let req = test::TestRequest::put()
        .uri("/api/cms/settings")
        .insert_header(bearer(&token))
        .set_json(json!({ "gallerySettings": { "itemsPerPage": 0 } }));
    let (status, _) = send!(app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn save_changes_commits_pending_writes() {
    let fx = fixture().await;
    let app = app!(fx);
    let token = token_for(&fx, ADMIN);

    let req = test::TestRequest::post()
        .uri("/api/cms/categories")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Street" }));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["order"], 4);

    let req = test::TestRequest::get().uri("/api/cms/save-status").insert_header(bearer(&token));
    let (_, body) = send!(app, req);
    assert_eq!(body["data"]["hasChanges"], true);
    assert_eq!(body["data"]["lastSaved"], Value::Null);

    let req = test::TestRequest::post()
        .uri("/api/cms/save-changes")
        .insert_header(bearer(&token))
        .set_json(json!({ "message": "Nouvelle catégorie Street", "changes": { "categories": ["street"] } }));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["commitHash"].is_string());
    assert_eq!(fx.sink.messages.lock().unwrap().as_slice(), ["Nouvelle catégorie Street"]);

    let req = test::TestRequest::get().uri("/api/cms/save-status").insert_header(bearer(&token));
    let (_, body) = send!(app, req);
    assert_eq!(body["data"]["hasChanges"], false);
    assert!(body["data"]["lastSaved"].is_string());

    let req = test::TestRequest::post().uri("/api/cms/save-changes").insert_header(bearer(&token));
    let (status, body) = send!(app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No changes to save");
    assert_eq!(body["data"]["commitHash"], Value::Null);

    let req = test::TestRequest::get().uri("/api/cms/save-changes").insert_header(bearer(&token));
    let (_, body) = send!(app, req);
    assert_eq!(body["data"][0]["message"], "Nouvelle catégorie Street");

    let log = std::fs::read_to_string(fx.dir.path().join("data/cms/change-log.json")).unwrap();
    let log: Value = serde_json::from_str(&log).unwrap();
    assert_eq!(log["changes"][0]["data"]["message"], "Nouvelle catégorie Street");
    assert_eq!(log["changes"][0]["data"]["changes"], json!({ "categories": ["street"] }));
}

#[actix_web::test]
async fn client_hooks_and_uploads_against_live_server() {
    let fx = fixture().await;
    let services = fx.services.clone();
    let server = HttpServer::new(move || App::new().configure(configs::configure(services.clone())))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let mut client = CmsClient::new(format!("http://{addr}"));
    client.login(ADMIN.0, ADMIN.1).await.unwrap();

    let mut galleries = GalleriesHook::new(client.clone());
    galleries.refetch().await;
    assert!(galleries.items.is_empty() && galleries.error.is_none());

    let model = CreateGalleryModel { title: "Mariage Sarah & Thomas!".into(), ..Default::default() };
    let created = galleries.create(model).await.unwrap();
    assert_eq!(created.slug, "mariage-sarah-thomas");
    assert_eq!(galleries.items.len(), 1);
    assert!(!galleries.loading);

    let mut tracker = UploadTracker::default();
    let ids = tracker.add_files(vec![
        LocalFile::new("one.jpg", "image/jpeg", vec![7; 200 * 1024]),
        LocalFile::new("two.gif", "image/gif", vec![1; 10]),
        LocalFile::new("three.png", "image/png", vec![9; 1024]),
    ]);
    tracker.start(Arc::new(client.clone()));
    let mut completed = Vec::new();
    tracker.settle(|done| completed = done.iter().map(|e| e.id).collect()).await;

    assert_eq!(completed, vec![ids[0], ids[2]]);
    assert_eq!(tracker.get(ids[1]).unwrap().status, UploadStatus::Error);
    assert_eq!(tracker.get(ids[0]).unwrap().progress, 100);

    let mut photos = PhotosHook::new(client.clone());
    photos.refetch().await;
    assert_eq!(photos.items.len(), 2);

    let err = photos.delete("missing").await.unwrap_err();
    assert_eq!(err.to_string(), "Photo not found");
    assert_eq!(photos.error.as_deref(), Some("Photo not found"));

    let anonymous = CmsClient::new(format!("http://{addr}"));
    assert!(anonymous.list_photos().await.is_err());
    assert_eq!(anonymous.public_photos().await.unwrap().len(), 2);

    handle.stop(true).await;
}
