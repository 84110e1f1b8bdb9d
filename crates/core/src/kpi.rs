//! KPI underperformance rules and alert rendering.
//!
//! A KPI is "underperforming" when its actual/target ratio is strictly
//! below 0.80. Targets at or below zero cannot produce a meaningful ratio:
//! a zero target short-circuits to "no alert" for that row, while a
//! negative target counts as zero performance and is flagged.

use rust_decimal::Decimal;
use serde::Serialize;

/// Underperformance threshold: strictly below 80% of target.
pub const UNDERPERFORMANCE_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

/// A KPI row as evaluated for alerting.
#[derive(Debug, Clone, Serialize)]
pub struct KpiSnapshot {
    /// KPI name.
    pub kpi_name: String,
    /// Target value for the period.
    pub target_value: Decimal,
    /// Actual value for the period.
    pub actual_value: Decimal,
    /// Display unit (e.g. "%", "T", "EUR").
    pub unit: String,
}

impl KpiSnapshot {
    /// Performance as a fraction of target. `None` when the target is zero.
    #[must_use]
    pub fn performance_ratio(&self) -> Option<Decimal> {
        if self.target_value.is_zero() {
            return None;
        }
        if self.target_value < Decimal::ZERO {
            return Some(Decimal::ZERO);
        }
        Some(self.actual_value / self.target_value)
    }

    /// Whether this KPI should be flagged in the weekly alert.
    #[must_use]
    pub fn is_underperforming(&self) -> bool {
        match self.performance_ratio() {
            Some(ratio) => ratio < UNDERPERFORMANCE_THRESHOLD,
            None => false,
        }
    }
}

/// Filters a period's KPI rows down to the underperforming ones.
#[must_use]
pub fn underperforming<'a>(kpis: &'a [KpiSnapshot]) -> Vec<&'a KpiSnapshot> {
    kpis.iter().filter(|k| k.is_underperforming()).collect()
}

/// Renders the weekly alert email body as an HTML summary table.
#[must_use]
pub fn render_alert_html(kpis: &[&KpiSnapshot], dashboard_url: &str) -> String {
    let rows: String = kpis
        .iter()
        .map(|kpi| {
            let performance = kpi
                .performance_ratio()
                .map_or_else(|| "n/a".to_string(), |r| format!("{}%", (r * Decimal::ONE_HUNDRED).round_dp(1)));
            format!(
                "<tr style=\"border-bottom: 1px solid #ddd;\">\
                 <td style=\"padding: 12px;\">{}</td>\
                 <td style=\"padding: 12px;\">{}{}</td>\
                 <td style=\"padding: 12px;\">{}{}</td>\
                 <td style=\"padding: 12px; color: #e74c3c; font-weight: bold;\">{performance}</td>\
                 </tr>",
                kpi.kpi_name, kpi.target_value, kpi.unit, kpi.actual_value, kpi.unit,
            )
        })
        .collect();

    format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2 style=\"color: #e74c3c;\">KPI Alert</h2>\
         <p>The following KPIs are underperforming and require attention:</p>\
         <table style=\"width: 100%; border-collapse: collapse; margin: 20px 0;\">\
         <thead><tr style=\"background-color: #34495e; color: white;\">\
         <th style=\"padding: 12px; text-align: left;\">KPI</th>\
         <th style=\"padding: 12px; text-align: left;\">Target</th>\
         <th style=\"padding: 12px; text-align: left;\">Actual</th>\
         <th style=\"padding: 12px; text-align: left;\">Performance</th>\
         </tr></thead><tbody>{rows}</tbody></table>\
         <p>Please review these metrics in the <a href=\"{dashboard_url}\">Executive Dashboard</a>.</p>\
         <div style=\"margin-top: 30px; padding: 15px; background-color: #f8f9fa; border-radius: 5px;\">\
         <small>This is an automated alert from the reporting system.</small>\
         </div></div>"
    )
}

/// Renders the monthly board report body. Content generation is a stub
/// pending the report layout decision.
#[must_use]
pub fn render_monthly_report_html() -> String {
    "<h2>Monthly Performance Report</h2><p>Report content...</p>".to_string()
}
