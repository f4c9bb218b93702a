//! Application router

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{middleware, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use super::middleware::security_headers_middleware;
use super::state::AppState;
use super::types::Json;
use super::{admin, auth, dashboard, health, public, v1};

/// Slack allowed on top of the image limit for other multipart fields
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the full application router
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        // Service descriptor and health probes
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Session authentication and account flows
        .nest("/auth", auth::create_auth_router())
        // Programmatic API (API keys)
        .nest("/v1", v1::create_v1_router())
        // Dashboard API (session tokens)
        .nest("/dashboard", dashboard::create_dashboard_router())
        // Admin API
        .nest("/admin", admin::create_admin_router())
        // Public card serving
        .route("/c/{slug}", get(public::serve_card))
        .route("/i/{filename}", get(public::serve_image))
        .route("/uploads/{*path}", get(public::serve_upload))
        // Uploads exceed axum's default body limit
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD))
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Cardlink",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Social card service: Open Graph previews with redirect tracking",
        "endpoints": {
            "auth": "/auth/* (registration, login, OAuth)",
            "api": "/v1/cards, /v1/keys (API key)",
            "dashboard": "/dashboard/* (session token)",
            "admin": "/admin/* (admin session token)",
            "cards": "/c/{slug} (public)",
            "images": "/i/{slug}.png (public)"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::test_support::test_state;
    use crate::domain::user::UserRepository;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use tower::ServiceExt;

    const MAX_UPLOAD: usize = 5 * 1024 * 1024;

    fn app(state: AppState) -> Router {
        create_router(state, MAX_UPLOAD)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Register a user, verify them straight through the service, and
    /// return a session token.
    async fn login_user(state: &AppState, email: &str) -> String {
        let user = state.users.register(email, "password123").await.unwrap();
        let token = user.verification_token().unwrap().to_string();
        state.users.verify_email(&token).await.unwrap();

        let user = state.users.authenticate(email, "password123").await.unwrap();
        state.jwt.generate(&user).unwrap()
    }

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(400, 300, Rgba([50, 50, 200, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn multipart_card_body(boundary: &str, title: &str) -> Vec<u8> {
        let mut body = Vec::new();

        for (name, value) in [
            ("title", title),
            ("destination_url", "https://example.com/page"),
            ("card_type", "summary"),
        ] {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }

        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"upload.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&png_bytes());
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        body
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_login_me() {
        let state = test_state();
        let app = app(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::post("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email": "flow@example.com", "password": "password123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Unverified login is rejected
        let response = app
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email": "flow@example.com", "password": "password123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Verify through the stored token, then log in over HTTP
        let user = state
            .users
            .repository()
            .get_by_email("flow@example.com")
            .await
            .unwrap()
            .unwrap();
        let verify_token = user.verification_token().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/auth/verify/{}", verify_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email": "flow@example.com", "password": "password123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let login = body_json(response).await;
        let token = login["token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::get("/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let me = body_json(response).await;
        assert_eq!(me["email"], "flow@example.com");
        assert_eq!(me["tier"], "free");
    }

    #[tokio::test]
    async fn test_card_lifecycle_via_dashboard() {
        let state = test_state();
        let token = login_user(&state, "cards@example.com").await;
        let app = app(state.clone());

        let boundary = "test-boundary-1234";
        let response = app
            .clone()
            .oneshot(
                Request::post("/dashboard/cards")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(multipart_card_body(boundary, "My launch")))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let card = body_json(response).await;
        assert_eq!(card["title"], "My launch");
        let slug = card["slug"].as_str().unwrap().to_string();
        let card_id = card["id"].as_str().unwrap().to_string();

        // A crawler gets meta tags
        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/c/{}", slug))
                    .header(header::USER_AGENT, "Twitterbot/1.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains("og:title"));
        assert!(html.contains("My launch"));

        // A human gets redirected and counted
        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/c/{}", slug))
                    .header(header::USER_AGENT, "Mozilla/5.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/page"
        );

        // The processed image is served
        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/i/{}.png", slug))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        // View shows up in the card detail
        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/dashboard/cards/{}", card_id))
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let detail = body_json(response).await;
        assert_eq!(detail["view_count"], 1);
    }

    #[tokio::test]
    async fn test_v1_requires_api_key() {
        let response = app(test_state())
            .oneshot(Request::get("/v1/cards").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_v1_key_flow() {
        let state = test_state();
        let token = login_user(&state, "api@example.com").await;
        let app = app(state.clone());

        // Mint a key through the dashboard
        let response = app
            .clone()
            .oneshot(
                Request::post("/dashboard/keys")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "CI"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = body_json(response).await;
        let secret = created["key"].as_str().unwrap().to_string();
        assert!(secret.starts_with("ck_live_"));

        // Use it against v1 via X-API-Key
        let response = app
            .clone()
            .oneshot(
                Request::get("/v1/cards")
                    .header("x-api-key", &secret)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let list = body_json(response).await;
        assert_eq!(list["pagination"]["total"], 0);

        // The authenticating key cannot revoke itself
        let key_id = created["id"].as_str().unwrap().to_string();
        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/v1/keys/{}", key_id))
                    .header("x-api-key", &secret)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_surface_requires_admin() {
        let state = test_state();
        let token = login_user(&state, "pleb@example.com").await;
        let app = app(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::get("/admin/stats")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // An actual admin gets through
        state
            .users
            .create_admin("root@example.com", "password123")
            .await
            .unwrap();
        let admin = state
            .users
            .authenticate("root@example.com", "password123")
            .await
            .unwrap();
        let admin_token = state.jwt.generate(&admin).unwrap();

        let response = app
            .oneshot(
                Request::get("/admin/stats")
                    .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stats = body_json(response).await;
        assert_eq!(stats["total_users"], 2);
    }

    #[tokio::test]
    async fn test_unknown_card_404s() {
        let response = app(test_state())
            .oneshot(
                Request::get("/c/does-not-exist")
                    .header(header::USER_AGENT, "Mozilla/5.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
