//! Rollups over canonical ad records — by account, and by
//! employee × grade × field with formatted summary cells.

use std::collections::BTreeMap;

use adreport_core::types::{AdRecord, Grade};
use serde::{Deserialize, Serialize};

use crate::classify::decode_ad_name;

/// Aggregated figures for one advertising account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRollup {
    pub account_id: String,
    pub total_spend: i64,
    pub total_leads: i64,
    pub ads_count: i64,
    pub average_cpl: i64,
}

/// Group records by account name. Spend, leads and the ad count are
/// accumulated in one pass; `average_cpl` is finalized afterwards.
pub fn account_rollup(ads: &[AdRecord]) -> BTreeMap<String, AccountRollup> {
    let mut by_account: BTreeMap<String, AccountRollup> = BTreeMap::new();

    for ad in ads {
        let rollup = by_account
            .entry(ad.account_name.clone())
            .or_insert_with(|| AccountRollup {
                account_id: ad.account_id.clone(),
                ..Default::default()
            });
        rollup.total_spend += ad.spend;
        rollup.total_leads += ad.leads;
        rollup.ads_count += 1;
    }

    for rollup in by_account.values_mut() {
        rollup.average_cpl = if rollup.total_leads > 0 {
            rollup.total_spend / rollup.total_leads
        } else {
            0
        };
    }

    by_account
}

#[derive(Debug, Clone, Copy, Default)]
struct CellStats {
    total_spend: i64,
    total_leads: i64,
    ads_count: i64,
}

/// Per-employee summary. One bucket per grade, and all six buckets are
/// always present so consumers can rely on a uniform shape. Field names
/// follow the upstream report convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    #[serde(rename = "員工")]
    pub employee: String,
    #[serde(rename = "SSR等級花費")]
    pub ssr: Vec<String>,
    #[serde(rename = "SR等級花費")]
    pub sr: Vec<String>,
    #[serde(rename = "R等級花費")]
    pub r: Vec<String>,
    #[serde(rename = "N等級花費")]
    pub n: Vec<String>,
    #[serde(rename = "C等級花費")]
    pub c: Vec<String>,
    #[serde(rename = "D等級花費")]
    pub d: Vec<String>,
}

impl EmployeeSummary {
    fn new(employee: String) -> Self {
        Self {
            employee,
            ssr: Vec::new(),
            sr: Vec::new(),
            r: Vec::new(),
            n: Vec::new(),
            c: Vec::new(),
            d: Vec::new(),
        }
    }

    fn bucket_mut(&mut self, grade: Grade) -> &mut Vec<String> {
        match grade {
            Grade::Ssr => &mut self.ssr,
            Grade::Sr => &mut self.sr,
            Grade::R => &mut self.r,
            Grade::N => &mut self.n,
            Grade::C => &mut self.c,
            Grade::D => &mut self.d,
        }
    }
}

/// Fold records into cells keyed by `(employee_key, grade, field)`,
/// then format each cell. Records whose name fails to decode are
/// skipped here; they still count toward totals and the account rollup.
pub fn employee_summary(ads: &[AdRecord]) -> Vec<EmployeeSummary> {
    let mut cells: BTreeMap<(String, Grade, String), CellStats> = BTreeMap::new();

    for ad in ads {
        let Some(parsed) = decode_ad_name(&ad.ad_name) else {
            continue;
        };
        let stats = cells
            .entry((parsed.employee_key, parsed.grade, parsed.field))
            .or_default();
        stats.total_spend += ad.spend;
        stats.total_leads += ad.leads;
        stats.ads_count += 1;
    }

    let mut by_employee: BTreeMap<String, EmployeeSummary> = BTreeMap::new();
    for ((employee_key, grade, field), stats) in cells {
        let average_cpl = if stats.total_leads > 0 {
            stats.total_spend / stats.total_leads
        } else {
            0
        };
        let cell = format!(
            "{field},average_cpl:{average_cpl},total_spend:{},total_leads:{},ads_count:{}",
            stats.total_spend, stats.total_leads, stats.ads_count
        );
        by_employee
            .entry(employee_key.clone())
            .or_insert_with(|| EmployeeSummary::new(employee_key))
            .bucket_mut(grade)
            .push(cell);
    }

    by_employee.into_values().collect()
}
