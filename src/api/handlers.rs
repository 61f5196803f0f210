//! HTTP request handlers
//!
//! POST /generate runs the core entry point; the GET endpoints are pure
//! reads of the static tables.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use crate::build_info::BuildInfo;
use crate::equivalence::tables::{available_strengths, speed_profile};
use crate::models::{Medication, TaperRequest, TaperSpeed};
use crate::reports::build_response;
use crate::schedule::generate_plan;

/// POST /generate - run the taper engine on a JSON request
pub async fn generate_taper(Json(req): Json<TaperRequest>) -> Response {
    match generate_plan(&req) {
        Ok(plan) => {
            info!(
                medication = req.medication.as_str(),
                steps = plan.steps.len(),
                total_days = plan.total_days,
                "taper plan generated"
            );
            (StatusCode::OK, Json(build_response(&req, &plan))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "taper generation failed");
            let status = if e.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// GET /api/medications - supported medication names
pub async fn get_medications() -> Json<Vec<&'static str>> {
    Json(Medication::ALL.iter().map(|m| m.as_str()).collect())
}

/// GET /api/taper_speeds - cadence table keyed by speed name
pub async fn get_taper_speeds() -> Json<serde_json::Value> {
    let mut speeds = serde_json::Map::new();
    for speed in TaperSpeed::ALL {
        let profile = speed_profile(speed);
        speeds.insert(
            speed.as_str().to_string(),
            json!({
                "percent": profile.percent,
                "interval_days": profile.interval_days,
            }),
        );
    }
    Json(serde_json::Value::Object(speeds))
}

/// GET /api/strengths/{medication} - tablet strengths for a medication,
/// empty when the medication is unknown or has no tracked tablet forms
pub async fn get_strengths(Path(medication): Path<String>) -> Json<Vec<f64>> {
    let strengths = Medication::parse(&medication)
        .map(|med| available_strengths(med).to_vec())
        .unwrap_or_default();
    Json(strengths)
}

/// GET /health - liveness and build metadata
pub async fn health() -> Json<serde_json::Value> {
    let info = BuildInfo::current();
    Json(json!({
        "status": "ok",
        "name": info.name,
        "version": info.version,
        "build_number": info.build_number,
    }))
}
