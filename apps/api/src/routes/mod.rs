pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::journal::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/healthz", get(health::health_handler))
        // Entries
        .route(
            "/api/entries",
            post(handlers::handle_create_entry).get(handlers::handle_list_entries),
        )
        .route("/api/entries/:id", get(handlers::handle_get_entry))
        // Aggregates
        .route("/api/garden", get(handlers::handle_garden))
        .route("/api/insights", get(handlers::handle_insights))
        // Reflection & digest
        .route("/api/reflect", post(handlers::handle_reflect))
        .route("/api/weekly-summary", post(handlers::handle_weekly_summary))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::JournalSettings;
    use crate::models::entry::{Emotion, Entry};
    use crate::store::{JournalStore, MemoryStore};

    fn app_with(store: Arc<MemoryStore>) -> Router {
        build_router(AppState {
            store,
            generator: None,
            settings: JournalSettings::default(),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");

        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app_with(Arc::new(MemoryStore::new()));
        for path in ["/health", "/healthz"] {
            let (status, body) = send(&app, "GET", path, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["ok"], json!(true));
        }
    }

    #[tokio::test]
    async fn test_create_then_list_entries() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(
            &app,
            "POST",
            "/api/entries",
            Some(json!({"text": "I love spending time with my family", "userId": "ana"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["entry"]["userId"], json!("ana"));
        assert_eq!(body["entry"]["isReflection"], json!(false));
        assert!(body["entry"]["themes"]
            .as_array()
            .unwrap()
            .contains(&json!("family")));

        let (status, body) = send(&app, "GET", "/api/entries?userId=ana", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"].as_array().unwrap().len(), 1);
        assert_eq!(body["hasMore"], json!(false));

        let (_, body) = send(&app, "GET", "/api/entries?userId=ana&theme=travel", None).await;
        assert!(body["entries"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_limit_is_capped() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());
        for i in 0..55 {
            send(
                &app,
                "POST",
                "/api/entries",
                Some(json!({"text": format!("entry number {i}")})),
            )
            .await;
        }
        let (_, body) = send(&app, "GET", "/api/entries?limit=500", None).await;
        assert_eq!(body["entries"].as_array().unwrap().len(), 50);
        assert_eq!(body["hasMore"], json!(true));

        let (_, body) = send(&app, "GET", "/api/entries", None).await;
        assert_eq!(body["entries"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_validation_errors_use_error_envelope() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let (status, body) = send(&app, "POST", "/api/entries", Some(json!({"text": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
        assert_eq!(body["error"]["retryable"], json!(false));

        let (status, _) = send(&app, "GET", "/api/entries?theme=cooking", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/insights?period=yearly", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/entries/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", &format!("/api/entries/{}", Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_reflection_lookup_reports_missing_original() {
        let store = Arc::new(MemoryStore::new());
        let orphan = Entry {
            id: Uuid::new_v4(),
            user_id: "default_user".to_string(),
            text: "Looking back, it was fine.".to_string(),
            created_at: Utc::now(),
            sentiment: 0.0,
            emotion: Emotion::Neutral,
            confidence: 0.0,
            themes: vec![],
            summary: None,
            word_count: 5,
            is_reflection: true,
            original_entry_id: Some(Uuid::new_v4()),
        };
        store.insert_entry(&orphan).await.unwrap();
        let app = app_with(store);

        let (status, body) = send(&app, "GET", &format!("/api/entries/{}", orphan.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["originalEntry"], Value::Null);
        assert_eq!(body["originalMissing"], json!(true));
    }

    #[tokio::test]
    async fn test_reflection_lookup_resolves_original() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (_, created) = send(
            &app,
            "POST",
            "/api/entries",
            Some(json!({"text": "A long day at the office."})),
        )
        .await;
        let original_id = created["entry"]["id"].as_str().unwrap().to_string();

        let (status, reflection) = send(
            &app,
            "POST",
            "/api/entries",
            Some(json!({
                "text": "It was not as bad as it felt.",
                "isReflection": true,
                "originalEntryId": original_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let reflection_id = reflection["entry"]["id"].as_str().unwrap();

        let (_, body) = send(&app, "GET", &format!("/api/entries/{reflection_id}"), None).await;
        assert_eq!(body["originalEntry"]["id"], json!(original_id));
        assert_eq!(body["originalMissing"], json!(false));

        let (_, body) = send(&app, "GET", "/api/entries?reflections=true", None).await;
        assert_eq!(body["entries"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_garden_and_insights_shapes() {
        let app = app_with(Arc::new(MemoryStore::new()));
        for text in ["work was busy", "more work today", "a trip to the beach"] {
            send(&app, "POST", "/api/entries", Some(json!({ "text": text }))).await;
        }

        let (status, body) = send(&app, "GET", "/api/garden", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalPlants"], json!(2));
        assert_eq!(body["garden"][0]["theme"], json!("work"));
        assert_eq!(body["garden"][0]["stage"], json!("sprouting"));
        assert_eq!(body["garden"][0]["nextStageNeeds"], json!(3));

        let (status, body) = send(&app, "GET", "/api/insights?period=monthly", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entryCount"], json!(3));
        assert_eq!(body["topThemes"][0], json!("work"));
        assert!(body["insights"]["avgWordCount"].is_number());
    }

    #[tokio::test]
    async fn test_reflect_without_candidates() {
        let app = app_with(Arc::new(MemoryStore::new()));
        // Fresh entries are too young to reflect on.
        send(&app, "POST", "/api/entries", Some(json!({"text": "just now"}))).await;

        let (status, body) = send(&app, "POST", "/api/reflect", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_reflect_picks_old_entry() {
        let store = Arc::new(MemoryStore::new());
        let old = Entry {
            id: Uuid::new_v4(),
            user_id: "default_user".to_string(),
            text: "Last month's entry".to_string(),
            created_at: Utc::now() - Duration::days(30),
            sentiment: 0.2,
            emotion: Emotion::Positive,
            confidence: 0.8,
            themes: vec![],
            summary: None,
            word_count: 3,
            is_reflection: false,
            original_entry_id: None,
        };
        store.insert_entry(&old).await.unwrap();
        let app = app_with(store);

        let (_, body) = send(&app, "POST", "/api/reflect", Some(json!({"exclude": []}))).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["entry"]["id"], json!(old.id.to_string()));
        assert!(body["prompt"].is_string());

        let (_, body) = send(
            &app,
            "POST",
            "/api/reflect",
            Some(json!({"exclude": [old.id.to_string()]})),
        )
        .await;
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_weekly_summary_statuses_without_generator() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(&app, "POST", "/api/weekly-summary", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("insufficient_data"));
        assert_eq!(body["summary"], Value::Null);

        for text in ["one", "two", "three"] {
            send(&app, "POST", "/api/entries", Some(json!({ "text": text }))).await;
        }
        let (_, body) = send(&app, "POST", "/api/weekly-summary", Some(json!({}))).await;
        assert_eq!(body["status"], json!("unavailable"));
        assert_eq!(body["success"], json!(false));
    }
}
