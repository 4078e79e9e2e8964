//! A thin HTTP facade over any Lyra content platform: roles, permissions,
//! files, content records and settings flags, with public reads gated by the
//! seeded permissions and every response marked uncacheable.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use lyra_core::traits::{ContentPlatform, SettingsStore};
use tower_http::trace::TraceLayer;
use tracing::warn;

mod api;

pub mod auth;
pub mod layers;
pub mod state;

use state::AppState;

/// The builder for the Lyra server.
#[derive(Clone, Debug, Default)]
pub struct LyraServer {
    config: LyraServerConfig,
}

#[derive(Clone, Debug, Default)]
pub struct LyraServerConfig {
    /// Bearer token required on administrative routes.
    ///
    /// **NOTE:** Leaving this unset opens the admin surface to anyone who
    /// can reach the server.
    pub admin_token: Option<String>,
}

impl LyraServer {
    pub fn new(config: LyraServerConfig) -> Self {
        Self { config }
    }

    pub fn build<P: ContentPlatform + SettingsStore>(self, platform: P) -> Router {
        let LyraServerConfig { admin_token } = self.config;
        if admin_token.is_none() {
            warn!("No admin token configured. Administrative routes are open!")
        }
        let state = AppState {
            platform,
            admin_token,
        };

        Router::new()
            .route("/health", get(|| async { "OK" }))
            .route("/roles/{role_type}", get(api::find_role))
            .route("/roles/{id}/permissions", get(api::role_permissions))
            .route("/permissions", post(api::create_permission))
            .route("/files/{name}", get(api::find_file).post(api::upload_file))
            .route(
                "/content/{content_type}",
                get(api::list_content).post(api::create_content),
            )
            .route("/content/{content_type}/{id}", get(api::get_content))
            .route(
                "/settings/{namespace}/{key}",
                get(api::get_flag).put(api::set_flag),
            )
            .layer(middleware::from_fn(layers::no_cache))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

pub mod prelude {
    pub use crate::auth::*;
    pub use crate::layers::*;
    pub use crate::state::*;
    pub use crate::{LyraServer, LyraServerConfig};
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use lyra_core::prelude::*;
    use lyra_mem::MemPlatform;
    use serde_json::json;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn every_response_disables_caching() {
        let app = LyraServer::default().build(MemPlatform::new());

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");
        assert_eq!(response.headers()[header::EXPIRES], "0");
    }

    #[tokio::test]
    async fn content_reads_need_a_public_permission() {
        let platform = MemPlatform::new();
        let app = LyraServer::new(LyraServerConfig {
            admin_token: Some("secret".to_string()),
        })
        .build(platform.clone());

        let denied = app
            .clone()
            .oneshot(
                Request::get("/content/article")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let role = platform.find_role("public").await.unwrap();
        platform
            .create_permission("article.find", role.id)
            .await
            .unwrap();
        platform
            .create_record("article", json!({"title": "Hi"}))
            .await
            .unwrap();

        let allowed = app
            .clone()
            .oneshot(
                Request::get("/content/article")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);

        let body = allowed.into_body().collect().await.unwrap().to_bytes();
        let records: Vec<Record> = serde_json::from_slice(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data["title"], json!("Hi"));
    }

    #[tokio::test]
    async fn single_record_reads_use_their_own_action() {
        let platform = MemPlatform::new();
        let app = LyraServer::new(LyraServerConfig {
            admin_token: Some("secret".to_string()),
        })
        .build(platform.clone());

        let role = platform.find_role("public").await.unwrap();
        platform
            .create_permission("article.find", role.id)
            .await
            .unwrap();
        let record = platform
            .create_record("article", json!({"title": "Hi"}))
            .await
            .unwrap();

        // "find" alone does not cover "find-one".
        let denied = app
            .clone()
            .oneshot(
                Request::get(format!("/content/article/{}", record.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        platform
            .create_permission("article.find-one", role.id)
            .await
            .unwrap();
        let allowed = app
            .clone()
            .oneshot(
                Request::get(format!("/content/article/{}", record.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_routes_require_the_token() {
        let app = LyraServer::new(LyraServerConfig {
            admin_token: Some("secret".to_string()),
        })
        .build(MemPlatform::new());

        let denied = app
            .clone()
            .oneshot(
                Request::post("/content/article")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let allowed = app
            .clone()
            .oneshot(
                Request::post("/content/article")
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::CREATED);
    }
}
