//! Graph API client. Owns authentication, pagination and the
//! translation of upstream error codes into the report error taxonomy.

use std::time::Duration;

use adreport_core::config::MetaConfig;
use adreport_core::error::{ReportError, ReportResult};
use adreport_core::types::{AdAccount, RawInsight, ReportPeriod};
use adreport_reporting::InsightsSource;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

/// Graph error codes with a user-actionable meaning.
const CODE_INVALID_TOKEN: i64 = 190;
const CODE_MISSING_PERMISSION: i64 = 200;

/// Envelope around every Graph list response.
#[derive(Debug, Deserialize)]
struct GraphPage<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GraphErrorDetail {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// One client per report request, bound to that request's access token.
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    insights_page_limit: u32,
}

impl GraphClient {
    pub fn new(access_token: impl Into<String>, config: &MetaConfig) -> ReportResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ReportError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            insights_page_limit: config.insights_page_limit,
        })
    }

    /// Translate a non-success Graph response into the error taxonomy.
    /// Code 190 is an invalid or expired token, code 200 a missing
    /// permission; everything else stays an opaque upstream error with
    /// its message preserved.
    async fn translate_error(response: reqwest::Response) -> ReportError {
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<GraphErrorBody>(&body) {
            Ok(parsed) => match parsed.error.code {
                CODE_INVALID_TOKEN => ReportError::InvalidCredential(parsed.error.message),
                CODE_MISSING_PERMISSION => ReportError::PermissionDenied(parsed.error.message),
                code => ReportError::Upstream {
                    code,
                    message: parsed.error.message,
                },
            },
            Err(_) => ReportError::Upstream {
                code: 0,
                message: body,
            },
        }
    }
}

fn transport_error(e: reqwest::Error) -> ReportError {
    ReportError::Upstream {
        code: 0,
        message: e.to_string(),
    }
}

#[async_trait]
impl InsightsSource for GraphClient {
    async fn list_accounts(&self) -> ReportResult<Vec<AdAccount>> {
        let url = format!("{}/me/adaccounts", self.base_url);

        info!("Fetching ad accounts");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("fields", "id,name,account_status"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::translate_error(response).await);
        }

        let page = response
            .json::<GraphPage<AdAccount>>()
            .await
            .map_err(transport_error)?;

        info!(count = page.data.len(), "Ad accounts fetched");
        Ok(page.data)
    }

    /// Follows `paging.next` until the last page. A failed or
    /// undecodable page ends pagination with a warning and returns what
    /// was accumulated so far; the report proceeds without the rest.
    async fn account_insights(
        &self,
        account_id: &str,
        period: &ReportPeriod,
    ) -> ReportResult<Vec<RawInsight>> {
        let time_range = format!(
            r#"{{"since":"{}","until":"{}"}}"#,
            period.start_date, period.end_date
        );
        let limit = self.insights_page_limit.to_string();

        info!(account_id, "Fetching ad insights");

        let mut ads: Vec<RawInsight> = Vec::new();
        let mut next: Option<String> = None;

        loop {
            let request = match &next {
                // `paging.next` is a complete URL, token included.
                Some(url) => self.http.get(url),
                None => self
                    .http
                    .get(format!("{}/{}/insights", self.base_url, account_id))
                    .query(&[
                        ("access_token", self.access_token.as_str()),
                        ("level", "ad"),
                        ("fields", "ad_name,ad_id,spend,actions,cost_per_action_type"),
                        ("time_range", time_range.as_str()),
                        ("limit", limit.as_str()),
                    ]),
            };

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(account_id, error = %e, "Insights request failed");
                    break;
                }
            };

            if !response.status().is_success() {
                warn!(
                    account_id,
                    status = %response.status(),
                    "Insights page rejected"
                );
                break;
            }

            let page = match response.json::<GraphPage<RawInsight>>().await {
                Ok(page) => page,
                Err(e) => {
                    warn!(account_id, error = %e, "Insights page decode failed");
                    break;
                }
            };

            ads.extend(page.data);

            match page.paging.and_then(|paging| paging.next) {
                Some(url) => next = Some(url),
                None => break,
            }
        }

        info!(account_id, total = ads.len(), "Ad insights fetched");
        Ok(ads)
    }
}
