//! HTTP boundary using Axum
//!
//! A thin layer over `schedule::generate_plan`: one POST endpoint for
//! generation and read-only GET endpoints over the static tables. The
//! core is stateless, so the router carries no shared state.

pub mod handlers;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router
pub fn create_router() -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/generate", post(handlers::generate_taper))
        .route("/api/medications", get(handlers::get_medications))
        .route("/api/taper_speeds", get(handlers::get_taper_speeds))
        .route("/api/strengths/:medication", get(handlers::get_strengths))
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_medications_endpoint() {
        let app = create_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/medications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let meds = json.as_array().unwrap();
        assert_eq!(meds.len(), 7);
        assert!(meds.iter().any(|m| m == "clonazepam"));
    }

    #[tokio::test]
    async fn test_taper_speeds_endpoint() {
        let app = create_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/taper_speeds")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["standard"]["percent"], 5.0);
        assert_eq!(json["ultra_fast"]["interval_days"], 7);
    }

    #[tokio::test]
    async fn test_strengths_endpoint() {
        let app = create_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/strengths/diazepam")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!([10.0, 5.0, 2.0]));
    }

    #[tokio::test]
    async fn test_strengths_endpoint_unknown_medication_is_empty() {
        let app = create_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/strengths/zolpidem")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_generate_endpoint() {
        let app = create_router();
        let body = serde_json::json!({
            "medication": "clonazepam",
            "starting_dose_mg": 1.0,
            "speed": "standard",
            "start_date": "2025-07-15",
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["reference_dose_mg"], 20.0);
        assert!(json["patient_instructions"].as_array().unwrap().len() > 2);
        assert!(json["warn"].is_null());
    }

    #[tokio::test]
    async fn test_generate_endpoint_rejects_bad_dose() {
        let app = create_router();
        let body = serde_json::json!({
            "medication": "clonazepam",
            "starting_dose_mg": -1.0,
            "start_date": "2025-07-15",
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("positive"));
    }
}
