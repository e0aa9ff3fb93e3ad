//! REST handlers for report generation and operational endpoints.

use adreport_core::config::AppConfig;
use adreport_core::error::ReportError;
use adreport_core::types::ReportPeriod;
use adreport_meta_graph::GraphClient;
use adreport_reporting::report::{generate_report, Report};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub start_time: Instant,
}

#[derive(Debug, Deserialize)]
pub struct AdsReportRequest {
    pub access_token: String,
    /// Period bounds, `YYYY-MM-DD`.
    pub date_start: String,
    pub date_end: String,
}

/// Response envelope shared by every outcome of `POST /report`.
/// Handled failures keep HTTP 200 and set `success: false`, matching
/// what existing report consumers expect.
#[derive(Debug, Serialize)]
pub struct AdsReportResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdsReportResponse {
    fn ok(message: String, report: Report) -> Self {
        Self {
            success: true,
            message,
            data: Some(report),
            error: None,
        }
    }

    fn failed(message: &str, error: String) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data: None,
            error: Some(error),
        }
    }
}

/// POST /report — generate the ads report for the requested period.
pub async fn handle_report(
    State(state): State<AppState>,
    Json(request): Json<AdsReportRequest>,
) -> Json<AdsReportResponse> {
    // Validate input at API boundary
    if NaiveDate::parse_from_str(&request.date_start, DATE_FORMAT).is_err()
        || NaiveDate::parse_from_str(&request.date_end, DATE_FORMAT).is_err()
    {
        warn!(
            date_start = %request.date_start,
            date_end = %request.date_end,
            "Report request with malformed dates"
        );
        metrics::counter!("api.validation_errors").increment(1);
        return Json(AdsReportResponse::failed(
            "日期格式錯誤",
            "請使用 YYYY-MM-DD 格式".to_string(),
        ));
    }

    let client = match GraphClient::new(request.access_token, &state.config.meta) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Graph client construction failed");
            return Json(AdsReportResponse::failed("生成報告失敗", e.to_string()));
        }
    };

    let period = ReportPeriod {
        start_date: request.date_start,
        end_date: request.date_end,
    };

    match generate_report(&client, period).await {
        Ok(report) => {
            metrics::counter!("api.reports_generated").increment(1);
            let message = format!("成功生成報告，共找到 {} 個廣告", report.summary.total_ads);
            Json(AdsReportResponse::ok(message, report))
        }
        Err(e) => {
            error!(error = %e, "Report generation failed");
            metrics::counter!("api.report_errors").increment(1);
            Json(failure_envelope(e))
        }
    }
}

/// Map the error taxonomy onto the user-facing envelope. Credential and
/// permission failures get actionable wording; everything else passes
/// its own message through.
fn failure_envelope(error: ReportError) -> AdsReportResponse {
    match error {
        ReportError::InvalidCredential(_) => AdsReportResponse::failed(
            "Token 驗證失敗",
            "Access Token 無效或已過期".to_string(),
        ),
        ReportError::PermissionDenied(_) => {
            AdsReportResponse::failed("權限不足", "Token 缺少 ads_read 權限".to_string())
        }
        other => AdsReportResponse::failed("生成報告失敗", other.to_string()),
    }
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Readiness probe.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope_for_invalid_credential() {
        let envelope =
            failure_envelope(ReportError::InvalidCredential("bad token".to_string()));
        assert!(!envelope.success);
        assert_eq!(envelope.message, "Token 驗證失敗");
        assert_eq!(envelope.error.as_deref(), Some("Access Token 無效或已過期"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_failure_envelope_for_missing_permission() {
        let envelope =
            failure_envelope(ReportError::PermissionDenied("no ads_read".to_string()));
        assert_eq!(envelope.message, "權限不足");
        assert_eq!(envelope.error.as_deref(), Some("Token 缺少 ads_read 權限"));
    }

    #[test]
    fn test_failure_envelope_keeps_upstream_message() {
        let envelope = failure_envelope(ReportError::Upstream {
            code: 17,
            message: "rate limited".to_string(),
        });
        assert_eq!(envelope.message, "生成報告失敗");
        assert_eq!(
            envelope.error.as_deref(),
            Some("Meta API error (code 17): rate limited")
        );
    }

    #[test]
    fn test_envelope_omits_empty_fields() {
        let envelope = AdsReportResponse::failed("生成報告失敗", "boom".to_string());
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["success"], false);
    }
}
