use serde::{Deserialize, Serialize};

/// Business-priority tier encoded in an ad name. Declaration order is
/// highest tier first, which also drives rollup iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    Ssr,
    Sr,
    R,
    N,
    C,
    D,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Ssr => "SSR",
            Grade::Sr => "SR",
            Grade::R => "R",
            Grade::N => "N",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

/// Start/end date pair of a report, echoed back in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start_date: String,
    pub end_date: String,
}

/// An advertising account as returned by `GET /me/adaccounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdAccount {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account_status: Option<i64>,
}

impl AdAccount {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// One platform-reported action or cost-per-action figure. The platform
/// serializes `value` sometimes as a decimal string and sometimes as a
/// number, so it is kept raw and parsed leniently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl ActionEntry {
    /// Numeric reading of `value`; anything unparseable counts as zero.
    pub fn numeric_value(&self) -> f64 {
        match &self.value {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
            serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// One ad-level insight row as fetched from `GET /{account}/insights`.
/// Every field tolerates absence; missing data degrades to zero rather
/// than failing the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInsight {
    #[serde(default)]
    pub ad_name: Option<String>,
    #[serde(default)]
    pub ad_id: Option<String>,
    /// Spend over the period, as the platform's decimal string.
    #[serde(default)]
    pub spend: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
    #[serde(default)]
    pub cost_per_action_type: Vec<ActionEntry>,
}

impl RawInsight {
    pub fn spend_value(&self) -> f64 {
        self.spend
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0.0)
    }
}

/// Canonical per-ad record after lead extraction and spend truncation.
/// `cpl` is `spend / leads` when leads are present, zero otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub account_name: String,
    pub account_id: String,
    pub ad_name: String,
    pub ad_id: String,
    pub spend: i64,
    pub leads: i64,
    pub cpl: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_serializes_to_marker() {
        assert_eq!(serde_json::to_string(&Grade::Ssr).unwrap(), "\"SSR\"");
        assert_eq!(serde_json::to_string(&Grade::D).unwrap(), "\"D\"");
    }

    #[test]
    fn test_action_value_string_and_number() {
        let from_string: ActionEntry =
            serde_json::from_str(r#"{"action_type":"lead","value":"12"}"#).unwrap();
        assert_eq!(from_string.numeric_value(), 12.0);

        let from_number: ActionEntry =
            serde_json::from_str(r#"{"action_type":"lead","value":12.5}"#).unwrap();
        assert_eq!(from_number.numeric_value(), 12.5);

        let missing: ActionEntry = serde_json::from_str(r#"{"action_type":"lead"}"#).unwrap();
        assert_eq!(missing.numeric_value(), 0.0);
    }

    #[test]
    fn test_insight_spend_parses_decimal_string() {
        let insight: RawInsight = serde_json::from_str(
            r#"{"ad_name":"a/b/c","ad_id":"1","spend":"123.45","actions":[]}"#,
        )
        .unwrap();
        assert_eq!(insight.spend_value(), 123.45);

        let no_spend: RawInsight = serde_json::from_str(r#"{"ad_id":"1"}"#).unwrap();
        assert_eq!(no_spend.spend_value(), 0.0);
    }
}
