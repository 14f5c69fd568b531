use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::services::{AnalysisOptions, IntelligenceEngine};

pub struct AppState {
    pub engine: IntelligenceEngine,
}

#[derive(Debug, Deserialize)]
pub struct IntelligenceQuery {
    pub days: Option<i64>,
    #[serde(rename = "includeAnonymous")]
    pub include_anonymous: Option<bool>,
}

/// GET /api/v1/customers/{id}/intelligence
pub async fn get_customer_intelligence(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<IntelligenceQuery>,
) -> Result<HttpResponse> {
    let defaults = AnalysisOptions::default();
    let options = AnalysisOptions {
        days: query.days.unwrap_or(defaults.days),
        include_anonymous: query.include_anonymous.unwrap_or(defaults.include_anonymous),
    };

    let report = state
        .engine
        .generate_customer_intelligence(path.into_inner(), &options)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).route(
        "/api/v1/customers/{id}/intelligence",
        web::get().to(get_customer_intelligence),
    );
}
