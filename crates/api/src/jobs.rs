//! Scheduled KPI alert and monthly report jobs.
//!
//! Two cron-driven jobs run inside the server process:
//! - weekly (Monday 08:00) KPI alert to the management address, sent only
//!   when the most recent period has underperforming KPIs;
//! - monthly (1st 09:00) performance report to the board address.
//!
//! Job failures are logged and never crash the process; the next tick runs
//! regardless.

use rust_decimal::Decimal;
use thiserror::Error;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, info};

use crate::AppState;
use finboard_core::kpi::{KpiSnapshot, render_alert_html, render_monthly_report_html, underperforming};
use finboard_db::entities::kpi_data;
use finboard_db::{KpiRepository, PeriodRepository};

/// Monday 08:00 server time.
const WEEKLY_ALERT_SCHEDULE: &str = "0 0 8 * * Mon";

/// 1st of each month, 09:00 server time.
const MONTHLY_REPORT_SCHEDULE: &str = "0 0 9 1 * *";

/// Errors raised inside a job run.
#[derive(Debug, Error)]
pub enum JobError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Email delivery error.
    #[error("Email error: {0}")]
    Email(#[from] finboard_shared::email::EmailError),
}

/// Converts a stored KPI row into the shape the alert rules evaluate.
/// Missing values count as zero; a missing unit renders empty.
fn snapshot_from(model: &kpi_data::Model) -> KpiSnapshot {
    KpiSnapshot {
        kpi_name: model.kpi_name.clone(),
        target_value: model.target_value.unwrap_or(Decimal::ZERO),
        actual_value: model.actual_value.unwrap_or(Decimal::ZERO),
        unit: model.unit.clone().unwrap_or_default(),
    }
}

/// Evaluates the most recent period's KPIs and emails management when any
/// underperform.
pub async fn run_kpi_alert(state: &AppState) -> Result<(), JobError> {
    let periods = PeriodRepository::new((*state.db).clone());
    let Some(period) = periods.latest().await? else {
        info!("No periods recorded yet, skipping KPI alert");
        return Ok(());
    };

    let kpis = KpiRepository::new((*state.db).clone())
        .for_period(period.id)
        .await?;
    let snapshots: Vec<KpiSnapshot> = kpis.iter().map(snapshot_from).collect();

    let flagged = underperforming(&snapshots);
    if flagged.is_empty() {
        info!(period_date = %period.period_date, "All KPIs on track, no alert sent");
        return Ok(());
    }

    let html = render_alert_html(&flagged, state.email_service.dashboard_url());
    state
        .email_service
        .send_html(
            state.email_service.management_email(),
            "KPI Alert: Underperforming Metrics Detected",
            &html,
        )
        .await?;

    info!(
        period_date = %period.period_date,
        flagged = flagged.len(),
        "KPI alert email sent"
    );
    Ok(())
}

/// Sends the monthly performance report to the board address.
pub async fn run_monthly_report(state: &AppState) -> Result<(), JobError> {
    let html = render_monthly_report_html();
    state
        .email_service
        .send_html(
            state.email_service.board_email(),
            "Monthly Performance Report",
            &html,
        )
        .await?;

    info!("Monthly report email sent");
    Ok(())
}

/// Registers both jobs and starts the scheduler. The returned handle must be
/// kept alive for the jobs to keep firing.
///
/// # Errors
///
/// Returns an error if a cron expression fails to parse or the scheduler
/// cannot start.
pub async fn start_scheduler(state: AppState) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let alert_state = state.clone();
    scheduler
        .add(Job::new_async(WEEKLY_ALERT_SCHEDULE, move |_uuid, _lock| {
            let state = alert_state.clone();
            Box::pin(async move {
                if let Err(e) = run_kpi_alert(&state).await {
                    error!(error = %e, "Weekly KPI alert job failed");
                }
            })
        })?)
        .await?;

    let report_state = state;
    scheduler
        .add(Job::new_async(MONTHLY_REPORT_SCHEDULE, move |_uuid, _lock| {
            let state = report_state.clone();
            Box::pin(async move {
                if let Err(e) = run_monthly_report(&state).await {
                    error!(error = %e, "Monthly report job failed");
                }
            })
        })?)
        .await?;

    scheduler.start().await?;
    info!("Report scheduler started");

    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn model(name: &str, target: Option<Decimal>, actual: Option<Decimal>) -> kpi_data::Model {
        kpi_data::Model {
            id: 1,
            period_id: 1,
            kpi_name: name.to_string(),
            target_value: target,
            actual_value: actual,
            unit: Some("%".to_string()),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_snapshot_defaults_missing_values_to_zero() {
        let snapshot = snapshot_from(&model("Sales Volume", None, None));
        assert_eq!(snapshot.target_value, Decimal::ZERO);
        assert_eq!(snapshot.actual_value, Decimal::ZERO);
        // Zero target short-circuits, so a fully empty row never alerts.
        assert!(!snapshot.is_underperforming());
    }

    #[test]
    fn test_snapshot_conversion_preserves_values() {
        let snapshot = snapshot_from(&model("Turnover", Some(dec!(2542)), Some(dec!(1519))));
        assert_eq!(snapshot.kpi_name, "Turnover");
        assert!(snapshot.is_underperforming());
    }
}
