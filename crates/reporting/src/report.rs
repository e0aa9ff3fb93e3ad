//! Report assembly — fetches every account's insights through the
//! [`InsightsSource`] seam, normalizes them into canonical records and
//! folds those into the final report structure.

use std::collections::BTreeMap;

use adreport_core::error::ReportResult;
use adreport_core::types::{AdAccount, AdRecord, RawInsight, ReportPeriod};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::{account_rollup, employee_summary, AccountRollup, EmployeeSummary};
use crate::leads::extract_leads;

/// Upstream supplier of ad accounts and their ad-level insights. The
/// production implementation talks to the Graph API; tests substitute
/// an in-memory source.
#[async_trait]
pub trait InsightsSource: Send + Sync {
    /// All accounts visible to the current credential. A failure here
    /// is fatal to the report and propagates.
    async fn list_accounts(&self) -> ReportResult<Vec<AdAccount>>;

    /// Ad-level insights for one account over the period. Failures are
    /// scoped to the account: implementations should degrade to a
    /// partial or empty list where they can.
    async fn account_insights(
        &self,
        account_id: &str,
        period: &ReportPeriod,
    ) -> ReportResult<Vec<RawInsight>>;
}

/// Grand totals across every fetched ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_spend: i64,
    pub total_leads: i64,
    pub average_cpl: i64,
    pub total_ads: i64,
    pub total_accounts: i64,
}

/// The assembled report, serialized verbatim to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub report_generated_at: String,
    pub period: ReportPeriod,
    pub summary: ReportSummary,
    pub by_account: BTreeMap<String, AccountRollup>,
    pub employee_summary: Vec<EmployeeSummary>,
    pub ads_detail: Vec<AdRecord>,
}

/// Normalize one raw insight row into a canonical record. Spend and CPL
/// are truncated to whole currency units.
pub fn normalize_insight(account: &AdAccount, insight: &RawInsight) -> AdRecord {
    let spend = insight.spend_value();
    let (leads, cpl) = extract_leads(spend, &insight.actions, &insight.cost_per_action_type);

    AdRecord {
        account_name: account.display_name().to_string(),
        account_id: account.id.clone(),
        ad_name: insight
            .ad_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        ad_id: insight.ad_id.clone().unwrap_or_default(),
        spend: spend as i64,
        leads,
        cpl,
    }
}

/// Generate the report for one period. Accounts are fetched first; a
/// per-account insights failure downgrades that account to zero ads
/// with a warning instead of failing the whole report. Zero accounts
/// produce a well-formed empty report.
pub async fn generate_report<S: InsightsSource>(
    source: &S,
    period: ReportPeriod,
) -> ReportResult<Report> {
    info!(
        start = %period.start_date,
        end = %period.end_date,
        "Starting report generation"
    );

    let accounts = source.list_accounts().await?;

    let mut records: Vec<AdRecord> = Vec::new();
    for account in &accounts {
        match source.account_insights(&account.id, &period).await {
            Ok(insights) => {
                records.extend(
                    insights
                        .iter()
                        .map(|insight| normalize_insight(account, insight)),
                );
            }
            Err(e) => {
                warn!(
                    account_id = %account.id,
                    error = %e,
                    "Insights fetch failed, account contributes no ads"
                );
            }
        }
    }

    Ok(assemble_report(period, records))
}

/// Pure fold from canonical records to the final report. Running it
/// twice over the same records yields identical rollups.
pub fn assemble_report(period: ReportPeriod, ads: Vec<AdRecord>) -> Report {
    let total_spend: i64 = ads.iter().map(|ad| ad.spend).sum();
    let total_leads: i64 = ads.iter().map(|ad| ad.leads).sum();
    let average_cpl = if total_leads > 0 {
        total_spend / total_leads
    } else {
        0
    };

    let by_account = account_rollup(&ads);
    let employees = employee_summary(&ads);

    info!(total_spend, total_leads, average_cpl, "Report summary computed");

    Report {
        report_generated_at: Utc::now().to_rfc3339(),
        period,
        summary: ReportSummary {
            total_spend,
            total_leads,
            average_cpl,
            total_ads: ads.len() as i64,
            total_accounts: by_account.len() as i64,
        },
        by_account,
        employee_summary: employees,
        ads_detail: ads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreport_core::types::ActionEntry;

    fn period() -> ReportPeriod {
        ReportPeriod {
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-31".to_string(),
        }
    }

    #[test]
    fn test_normalize_truncates_spend_and_derives_cpl() {
        let account = AdAccount {
            id: "act_1".to_string(),
            name: Some("Acme".to_string()),
            account_status: Some(1),
        };
        let insight = RawInsight {
            ad_name: Some("P/行銷_課程/Amy".to_string()),
            ad_id: Some("ad_9".to_string()),
            spend: Some("199.99".to_string()),
            actions: vec![ActionEntry {
                action_type: "lead".to_string(),
                value: "4".into(),
            }],
            cost_per_action_type: vec![],
        };

        let record = normalize_insight(&account, &insight);
        assert_eq!(record.account_name, "Acme");
        assert_eq!(record.spend, 199);
        assert_eq!(record.leads, 4);
        assert_eq!(record.cpl, 49);
    }

    #[test]
    fn test_normalize_defaults_missing_fields() {
        let account = AdAccount {
            id: "act_1".to_string(),
            name: None,
            account_status: None,
        };
        let record = normalize_insight(&account, &RawInsight {
            ad_name: None,
            ad_id: None,
            spend: None,
            actions: vec![],
            cost_per_action_type: vec![],
        });
        assert_eq!(record.account_name, "Unknown");
        assert_eq!(record.ad_name, "Unknown");
        assert_eq!(record.ad_id, "");
        assert_eq!(record.spend, 0);
        assert_eq!(record.leads, 0);
        assert_eq!(record.cpl, 0);
    }

    #[test]
    fn test_assemble_empty_report() {
        let report = assemble_report(period(), Vec::new());
        assert_eq!(report.summary.total_spend, 0);
        assert_eq!(report.summary.total_leads, 0);
        assert_eq!(report.summary.average_cpl, 0);
        assert_eq!(report.summary.total_ads, 0);
        assert_eq!(report.summary.total_accounts, 0);
        assert!(report.by_account.is_empty());
        assert!(report.employee_summary.is_empty());
        assert!(report.ads_detail.is_empty());
        assert_eq!(report.period, period());
    }

    #[test]
    fn test_assemble_totals_and_cpl_tolerance() {
        let ads = vec![
            AdRecord {
                account_name: "Acme".to_string(),
                account_id: "act_1".to_string(),
                ad_name: "P/行銷_課程/Amy".to_string(),
                ad_id: "1".to_string(),
                spend: 301,
                leads: 7,
                cpl: 43,
            },
            AdRecord {
                account_name: "Beta".to_string(),
                account_id: "act_2".to_string(),
                ad_name: "P/求職_素材/Ben".to_string(),
                ad_id: "2".to_string(),
                spend: 99,
                leads: 2,
                cpl: 49,
            },
        ];
        let report = assemble_report(period(), ads);

        assert_eq!(report.summary.total_spend, 400);
        assert_eq!(report.summary.total_leads, 9);
        assert_eq!(report.summary.average_cpl, 44);
        assert_eq!(report.summary.total_ads, 2);
        assert_eq!(report.summary.total_accounts, 2);

        // Truncation tolerance: average_cpl * total_leads never exceeds
        // total_spend and is within one lead's worth of it.
        for rollup in report.by_account.values() {
            if rollup.total_leads > 0 {
                let reconstructed = rollup.average_cpl * rollup.total_leads;
                assert!(reconstructed <= rollup.total_spend);
                assert!(rollup.total_spend - reconstructed < rollup.total_leads);
            } else {
                assert_eq!(rollup.average_cpl, 0);
            }
        }
    }
}
