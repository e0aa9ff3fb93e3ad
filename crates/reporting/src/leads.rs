//! Lead extraction — reconciles the platform's overlapping action-type
//! taxonomies into one lead count and cost-per-lead per ad.

use adreport_core::types::ActionEntry;

const CUSTOM_CONVERSION: &str = "offsite_conversion.fb_pixel_custom";
const STANDARD_LEAD: &str = "lead";

/// Action types always summed in the aggregating pass.
const GROUPED_LEAD_TYPES: [&str; 3] = [
    "offsite_conversion.fb_pixel_lead",
    "onsite_conversion.lead_grouped",
    "leadgen_grouped",
];

/// Resolve `(leads, cpl)` for one ad.
///
/// The cascade is a strict priority order; evaluation order matters as
/// much as presence:
/// 1. the first `offsite_conversion.fb_pixel_custom` action wins
///    outright (a custom pixel event is the canonical lead signal, and
///    its presence suppresses the plain `lead` lookup even at value 0);
/// 2. otherwise the first `lead` action wins;
/// 3. otherwise the SUM of every grouped lead type plus any action type
///    containing `lead` (other than `lead` itself, case-insensitive);
/// 4. otherwise leads are derived from `cost_per_action_type` as
///    `spend / cost`, custom conversion first, then `lead`; the first
///    entry with a positive cost wins.
///
/// CPL is `spend / leads` truncated, zero when no leads were found.
pub fn extract_leads(
    spend: f64,
    actions: &[ActionEntry],
    cost_per_action: &[ActionEntry],
) -> (i64, i64) {
    let mut leads: i64 = 0;
    let mut custom_found = false;

    for action in actions {
        if action.action_type == CUSTOM_CONVERSION {
            leads = action.numeric_value() as i64;
            custom_found = true;
            break;
        }
    }

    if !custom_found {
        for action in actions {
            if action.action_type == STANDARD_LEAD {
                leads = action.numeric_value() as i64;
                break;
            }
        }
    }

    if leads == 0 {
        for action in actions {
            let action_type = action.action_type.as_str();
            if GROUPED_LEAD_TYPES.contains(&action_type)
                || (action_type.to_lowercase().contains(STANDARD_LEAD)
                    && action_type != STANDARD_LEAD)
            {
                leads += action.numeric_value() as i64;
            }
        }
    }

    if leads == 0 {
        leads = leads_from_costs(spend, cost_per_action);
    }

    let cpl = if leads > 0 {
        (spend / leads as f64) as i64
    } else {
        0
    };

    (leads, cpl)
}

/// Back-derive a lead count from reported cost-per-action figures.
fn leads_from_costs(spend: f64, cost_per_action: &[ActionEntry]) -> i64 {
    for entry in cost_per_action {
        if entry.action_type == CUSTOM_CONVERSION {
            let cost = entry.numeric_value();
            if cost > 0.0 {
                return (spend / cost) as i64;
            }
        }
    }
    for entry in cost_per_action {
        if entry.action_type == STANDARD_LEAD {
            let cost = entry.numeric_value();
            if cost > 0.0 {
                return (spend / cost) as i64;
            }
        }
    }
    0
}
