#![cfg(feature = "server")]

use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use actix_web::test::{TestRequest, call_service, init_service, read_body, read_body_json};
use actix_web::{App, web};
use catalog_api::auth::{GoogleVerifier, JwtKeys, PasswordHasher, TOKEN_HEADER};
use catalog_api::models::config::ServerConfig;
use catalog_api::repository::DieselRepository;
use catalog_api::routes;
use catalog_api::storage::Storage;
use catalog_api::storage::local::LocalStore;
use serde_json::{Value, json};
use tempfile::TempDir;

mod common;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-an-image";
const BOUNDARY: &str = "catalog-test-boundary";

struct Fixture {
    db: common::TestDb,
    uploads: TempDir,
    config: ServerConfig,
}

impl Fixture {
    fn new() -> Self {
        let db = common::TestDb::new();
        let uploads = TempDir::new().expect("uploads dir");
        let config = ServerConfig {
            address: "127.0.0.1".to_string(),
            port: 0,
            database_url: String::new(),
            jwt_secret: "integration-secret".to_string(),
            jwt_ttl_hours: 4,
            bcrypt_cost: 4,
            google_client_id: None,
            uploads_dir: uploads.path().to_path_buf(),
            placeholder_image: concat!(env!("CARGO_MANIFEST_DIR"), "/assets/no-image.svg").into(),
            cloudinary: None,
        };
        Self {
            db,
            uploads,
            config,
        }
    }
}

macro_rules! test_app {
    ($fixture:expr) => {
        init_service(
            App::new()
                .app_data(web::Data::new(DieselRepository::new($fixture.db.pool())))
                .app_data(web::Data::new(JwtKeys::new(
                    &$fixture.config.jwt_secret,
                    $fixture.config.jwt_ttl_hours,
                )))
                .app_data(web::Data::new(PasswordHasher::new($fixture.config.bcrypt_cost)))
                .app_data(web::Data::new(GoogleVerifier::new(None)))
                .app_data(web::Data::new(Storage::new(
                    LocalStore::new($fixture.uploads.path()),
                    None,
                )))
                .app_data(web::Data::new($fixture.config.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

fn register(name: &str, email: &str, role: &str) -> TestRequest {
    TestRequest::post().uri("/api/usuarios").set_json(json!({
        "nombre": name,
        "correo": email,
        "password": "secret1",
        "rol": role,
    }))
}

fn login(email: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "secret1" }))
}

fn multipart_image(file_name: &str) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"archivo\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(PNG_BYTES);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[actix_web::test]
async fn catalog_writes_with_a_session_token() {
    let fixture = Fixture::new();
    let app = test_app!(fixture);

    let resp = call_service(&app, register("Root", "root@example.com", "ADMIN_ROLE").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let admin: Value = read_body_json(resp).await;
    assert_eq!(admin["role"], "ADMIN_ROLE");
    assert!(admin.get("password_hash").is_none());

    let resp = call_service(&app, login("root@example.com").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session: Value = read_body_json(resp).await;
    assert_eq!(session["user"]["id"], admin["id"]);
    let token = session["token"].as_str().expect("token").to_string();

    let req = TestRequest::post()
        .uri("/api/categorias")
        .insert_header((TOKEN_HEADER, token.as_str()))
        .set_json(json!({ "nombre": "tools" }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let category: Value = read_body_json(resp).await;
    assert_eq!(category["name"], "TOOLS");
    assert_eq!(category["user"]["name"], "Root");

    let req = TestRequest::post()
        .uri("/api/productos")
        .insert_header((TOKEN_HEADER, token.as_str()))
        .set_json(json!({
            "nombre": "widget a",
            "categoria": category["id"],
            "precio": 19.99,
        }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = read_body_json(resp).await;
    assert_eq!(product["category"]["name"], "TOOLS");
    assert_eq!(product["available"], true);

    let req = TestRequest::get().uri("/api/buscar/productos/Widget").to_request();
    let found: Value = read_body_json(call_service(&app, req).await).await;
    assert_eq!(found["results"].as_array().map(Vec::len), Some(1));
    assert_eq!(found["results"][0]["id"], product["id"]);

    let req = TestRequest::delete()
        .uri(&format!("/api/productos/{}", product["id"].as_str().unwrap()))
        .insert_header((TOKEN_HEADER, token.as_str()))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/api/productos?limite=2&desde=0").to_request();
    let page: Value = read_body_json(call_service(&app, req).await).await;
    assert_eq!(page, json!({ "total": 0, "productos": [] }));
}

#[actix_web::test]
async fn protected_routes_need_a_token() {
    let fixture = Fixture::new();
    let app = test_app!(fixture);

    let req = TestRequest::post()
        .uri("/api/categorias")
        .set_json(json!({ "name": "tools" }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body, json!({ "msg": "there is no token in the request" }));

    let req = TestRequest::post()
        .uri("/api/categorias")
        .insert_header((TOKEN_HEADER, "not-a-jwt"))
        .set_json(json!({ "name": "tools" }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn plain_users_cannot_delete_categories() {
    let fixture = Fixture::new();
    let app = test_app!(fixture);

    call_service(&app, register("Ana", "ana@example.com", "USER_ROLE").to_request()).await;
    let session: Value =
        read_body_json(call_service(&app, login("ana@example.com").to_request()).await).await;
    let token = session["token"].as_str().expect("token").to_string();

    let req = TestRequest::post()
        .uri("/api/categorias")
        .insert_header((TOKEN_HEADER, token.as_str()))
        .set_json(json!({ "name": "snacks" }))
        .to_request();
    let category: Value = read_body_json(call_service(&app, req).await).await;

    let req = TestRequest::delete()
        .uri(&format!("/api/categorias/{}", category["id"].as_str().unwrap()))
        .insert_header((TOKEN_HEADER, token.as_str()))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn bad_input_is_reported_as_json() {
    let fixture = Fixture::new();
    let app = test_app!(fixture);

    let req = TestRequest::post()
        .uri("/api/usuarios")
        .set_json(json!({ "correo": "nobody" }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "name");

    let req = TestRequest::get().uri("/api/productos?limite=500").to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "limite");

    let req = TestRequest::get().uri("/api/buscar/roles/admin").to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(
        body["msg"],
        "collection `roles` is not allowed; allowed collections are: usuarios, categorias, productos"
    );

    let req = TestRequest::get().uri("/api/categorias/nope").to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = call_service(&app, login("ghost@example.com").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body, json!({ "msg": "user / password are not correct" }));
}

#[actix_web::test]
async fn user_images_are_replaced_and_served() {
    let fixture = Fixture::new();
    let app = test_app!(fixture);

    let user: Value = read_body_json(
        call_service(&app, register("Ana", "ana@example.com", "USER_ROLE").to_request()).await,
    )
    .await;
    let id = user["id"].as_str().expect("id").to_string();
    let image_uri = format!("/api/uploads/usuarios/{id}");

    let resp = call_service(&app, TestRequest::get().uri(&image_uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(LOCATION).is_none());

    let req = TestRequest::put()
        .uri(&image_uri)
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_image("Avatar.PNG"))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = read_body_json(resp).await;
    let file_name = updated["image"].as_str().expect("image").to_string();
    assert!(file_name.ends_with(".png"));
    assert!(fixture.uploads.path().join("usuarios").join(&file_name).is_file());

    let resp = call_service(&app, TestRequest::get().uri(&image_uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_body(resp).await.as_ref(), PNG_BYTES);

    let req = TestRequest::put()
        .uri(&image_uri)
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_image("notes.txt"))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "archivo");
}
