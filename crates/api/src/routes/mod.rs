pub mod admin;
pub mod docs;
pub mod health;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(versions::routes())
        .merge(docs::routes())
        .merge(admin::routes())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use docsite_core::db;
    use docsite_core::events::{DocsEvent, EventBus};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::auth::Claims;
    use crate::config::AppConfig;

    const SECRET: &str = "test-secret";

    struct TestApp {
        state: AppState,
        dir: TempDir,
    }

    async fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let build_root = dir.path().join("build").display().to_string();
        let exclusions = dir.path().join("robots.docs.txt").display().to_string();
        let config = AppConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "DOCS_BUILD_ROOT" => Some(build_root.clone()),
            "DOCS_EXCLUSIONS_PATH" => Some(exclusions.clone()),
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        let pool = db::memory_pool().await.unwrap();
        TestApp {
            state: AppState::new(pool, config, EventBus::new(16)),
            dir,
        }
    }

    fn token(role: &str) -> String {
        let claims = Claims {
            sub: "docs-builder".into(),
            role: role.into(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(app.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(app: &TestApp, uri: &str, role: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(role) = role {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token(role)));
        }
        send(app, request.body(Body::from(body.to_string())).unwrap()).await
    }

    fn pages() -> Value {
        json!({
            "pages": [
                {
                    "current_page_name": "releases/index",
                    "title": "Release notes",
                    "body": "<p>Release notes for every version.</p>"
                },
                {
                    "current_page_name": "releases/1.9.4",
                    "title": "Django 1.9.4 release notes",
                    "body": "<p>Django 1.9.4 fixes a regression in the 1.9.3 security release.</p>",
                    "display_toc": false
                },
                {
                    "current_page_name": "releases/partial",
                    "title": ""
                }
            ]
        })
    }

    #[tokio::test]
    async fn ping_and_health() {
        let app = test_app().await;
        let (status, body) = get(&app, "/v1/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let _rx = app.state.event_bus().subscribe();
        let (status, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "connected");
        assert_eq!(body["indexedDocuments"], 0);
        assert_eq!(body["subscribers"], 1);
    }

    #[tokio::test]
    async fn version_switcher_lists_built_versions() {
        let app = test_app().await;
        let (_, body) = get(&app, "/v1/versions").await;
        assert_eq!(body["versions"], json!(["dev"]));

        for version in ["1.11", "1.8", "not-a-version"] {
            let root = docsite_core::builds::doc_root(&app.state.site().build_root, "en", version);
            std::fs::create_dir_all(root).unwrap();
        }
        let (status, body) = get(&app, "/v1/versions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["versions"], json!(["1.8", "1.11", "dev"]));
        assert!(app.dir.path().join("build").is_dir());
    }

    #[tokio::test]
    async fn unknown_release_is_a_json_404() {
        let app = test_app().await;
        let (status, body) = get(&app, "/v1/docs/en/9.9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "notFound");
        assert_eq!(body["error"]["statusCode"], 404);

        let (status, _) = get(&app, "/v1/docs/en/9.9/search?q=django").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_routes_require_admin_token() {
        let app = test_app().await;
        let (status, body) = post(&app, "/v1/search/update", None, json!({})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "unauthorized");

        let (status, _) = post(&app, "/v1/search/update", Some("reader"), json!({})).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let request = Request::post("/v1/search/reset")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = post(&app, "/v1/search/update", Some("admin"), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn release_lifecycle_sync_and_search() {
        let app = test_app().await;
        let mut events = app.state.event_bus().subscribe();

        let (status, _) = post(
            &app,
            "/v1/releases",
            Some("admin"),
            json!({ "version": "1.9", "date": "2015-12-01", "is_lts": false }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, info) = post(
            &app,
            "/v1/docs/en/1.9",
            Some("admin"),
            json!({ "isDefault": true }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(info["url"], "/en/1.9/");
        assert_eq!(info["scmUrl"], "https://github.com/django/django.git@stable/1.9.x");
        assert_eq!(info["status"], "supported");

        let (_, current) = get(&app, "/v1/docs/en").await;
        assert_eq!(current["version"], "1.9");
        let (_, langs) = get(&app, "/v1/versions/1.9/languages").await;
        assert_eq!(langs["languages"], json!(["en"]));

        let (status, report) = post(&app, "/v1/docs/en/1.9/sync", Some("admin"), pages()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["created"], 2);
        assert_eq!(report["skippedEmpty"], 1);
        match events.recv().await.unwrap() {
            DocsEvent::ReleaseSynced(event) => {
                assert_eq!(event.version, "1.9");
                assert_eq!(event.created, 2);
                assert_eq!(event.skipped, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }

        let (status, body) = get(&app, "/v1/docs/en/1.9/search?q=regression").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        let hit = &body["results"][0];
        assert_eq!(hit["path"], "releases/1.9.4");
        assert_eq!(hit["url"], "/en/1.9/releases/1.9.4/");
        assert_eq!(hit["breadcrumbs"][0]["title"], "Release notes");
        assert!(hit["highlight"].as_str().unwrap().contains("<mark>regression</mark>"));

        let (_, body) = get(&app, "/v1/docs/en/1.9/search?q=release&limit=1").await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["results"].as_array().unwrap().len(), 1);

        let (_, body) = get(&app, "/v1/docs/en/1.9/search").await;
        assert_eq!(body["count"], 0);

        let (_, body) = post(&app, "/v1/search/reset", Some("admin"), json!({})).await;
        assert_eq!(body["count"], 2);
        assert!(matches!(
            events.recv().await.unwrap(),
            DocsEvent::SearchIndexReset { count: 2, .. }
        ));
        let (_, body) = get(&app, "/v1/docs/en/1.9/search?q=regression").await;
        assert_eq!(body["count"], 0);

        let (_, body) = post(&app, "/v1/search/update", Some("admin"), json!({})).await;
        assert_eq!(body["count"], 2);
        let (_, body) = get(&app, "/v1/docs/en/1.9/search?q=regression").await;
        assert_eq!(body["count"], 1);

        // A later micro release closes 1.9 itself; the series lives until its own EOL.
        let (status, _) = post(
            &app,
            "/v1/releases",
            Some("admin"),
            json!({ "version": "1.9.1", "date": "2016-01-04", "eol_date": "2017-04-01" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, info) = get(&app, "/v1/docs/en/1.9").await;
        assert_eq!(info["eolDate"], "2016-01-04");
        assert_eq!(info["seriesEolDate"], "2017-04-01");
        assert_eq!(info["status"], "unsupported");
    }

    #[tokio::test]
    async fn docs_scope_is_created_once() {
        let app = test_app().await;
        let (status, _) = post(&app, "/v1/docs/en/dev", Some("admin"), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = post(&app, "/v1/docs/en/dev", Some("admin"), json!({ "isDefault": true })).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["type"], "conflict");

        let (_, langs) = get(&app, "/v1/versions/dev/languages").await;
        assert_eq!(langs["languages"], json!(["en"]));
    }

    #[tokio::test]
    async fn sync_accepts_large_builds_up_to_limit() {
        let app = test_app().await;
        post(&app, "/v1/docs/en/dev", Some("admin"), json!({})).await;

        // Well past the default extractor limit.
        let body = format!("<p>{}</p>", "django ".repeat(500_000));
        let pages = json!({
            "pages": [{ "current_page_name": "ref/huge", "title": "Huge", "body": body }]
        });
        let (status, report) = post(&app, "/v1/docs/en/dev/sync", Some("admin"), pages).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["created"], 1);

        let request = Request::post("/v1/docs/en/dev/sync")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token("admin")))
            .body(Body::from(vec![b' '; docs::SYNC_BODY_LIMIT + 1]))
            .unwrap();
        let response = build_router(app.state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn sync_honours_exclusion_file() {
        let app = test_app().await;
        std::fs::write(
            &app.state.site().exclusions_path,
            "User-agent: *\nDisallow: /en/dev/releases/1.9.4\n",
        )
        .unwrap();
        let (status, _) = post(&app, "/v1/docs/en/dev", Some("admin"), json!({})).await;
        assert_eq!(status, StatusCode::OK);

        let (status, report) = post(&app, "/v1/docs/en/dev/sync", Some("admin"), pages()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["created"], 1);
        assert_eq!(report["skippedExcluded"], 1);

        let (_, body) = get(&app, "/v1/docs/en/dev/search?q=regression").await;
        assert_eq!(body["count"], 0);
        let (_, info) = get(&app, "/v1/docs/en/dev").await;
        assert_eq!(info["status"], "dev");
        assert_eq!(info["scmUrl"], "https://github.com/django/django.git@main");
    }
}
