//! Conflicts command - Inspect and resolve booking conflicts
//!
//! Provides the `gigbook conflicts` CLI command which:
//! 1. Lists conflicts across the whole calendar
//! 2. Shows the conflicts of a single booking
//! 3. Resolves and unresolves a pair of bookings
//! 4. Lists stored resolutions

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use tracing::info;

use gigbook_cache::{DatabasePool, SqliteBookingSnapshot, SqliteResolutionStore};
use gigbook_conflict::{ConflictReport, ConflictService, ConflictView};
use gigbook_core::domain::{BookingId, BookingPair, ConflictResolution, Severity};

use super::CommandContext;
use crate::output::{plural, OutputFormatter};

/// Conflicts subcommands
#[derive(Debug, Subcommand)]
pub enum ConflictsCommand {
    /// List conflicts across all bookings
    List {
        /// Also list conflicts that have been resolved
        #[arg(long)]
        resolved: bool,
    },
    /// Show the conflicts of one booking
    Show {
        /// Booking ID
        booking_id: BookingId,
    },
    /// Accept the conflict between two bookings so it stops being reported
    Resolve {
        /// First booking ID
        a: BookingId,
        /// Second booking ID
        b: BookingId,
        /// Date of the conflict (YYYY-MM-DD); defaults to the event date
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Free-form note kept with the resolution
        #[arg(long)]
        notes: Option<String>,
    },
    /// Withdraw a resolution so the conflict is reported again
    Unresolve {
        /// First booking ID
        a: BookingId,
        /// Second booking ID
        b: BookingId,
    },
    /// List stored resolutions
    Resolved,
}

impl ConflictsCommand {
    /// Execute the conflicts command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let service = open_service(ctx).await?;

        match self {
            ConflictsCommand::List { resolved } => execute_list(ctx, &service, *resolved).await,
            ConflictsCommand::Show { booking_id } => {
                execute_show(ctx, &service, *booking_id).await
            }
            ConflictsCommand::Resolve { a, b, date, notes } => {
                execute_resolve(ctx, &service, *a, *b, *date, notes.clone()).await
            }
            ConflictsCommand::Unresolve { a, b } => {
                execute_unresolve(ctx, &service, *a, *b).await
            }
            ConflictsCommand::Resolved => execute_resolved(ctx, &service).await,
        }
    }
}

/// Opens the configured database and wires the conflict service
async fn open_service(ctx: &CommandContext) -> Result<ConflictService> {
    let db_path = &ctx.config.database.path;
    if !db_path.exists() {
        anyhow::bail!(
            "No database found at {}. Set database.path to the booking database.",
            db_path.display()
        );
    }

    let pool = DatabasePool::new(db_path)
        .await
        .context("Failed to open database")?;

    Ok(ConflictService::new(
        Arc::new(SqliteBookingSnapshot::new(pool.pool().clone())),
        Arc::new(SqliteResolutionStore::new(pool.pool().clone())),
    ))
}

async fn execute_list(ctx: &CommandContext, service: &ConflictService, resolved: bool) -> Result<()> {
    let user_id = ctx.user_id()?;
    let formatter = ctx.formatter();
    let show_resolved = resolved || ctx.config.conflicts.show_resolved;

    let mut report = service
        .conflicts_for_user(user_id)
        .await
        .context("Failed to build conflict report")?;
    if !ctx.config.conflicts.show_soft {
        hide_soft(&mut report);
    }

    let summary = report.summary();
    info!(user_id = %user_id, hard = summary.hard, soft = summary.soft, "Listed conflicts");

    if ctx.is_json() {
        let mut json = serde_json::json!({
            "user_id": user_id,
            "summary": summary,
            "conflicts": report.conflicts,
        });
        if show_resolved {
            json["resolved"] = serde_json::to_value(&report.resolved)?;
        }
        formatter.print_json(&json);
        return Ok(());
    }

    let views: Vec<&ConflictView> = one_side(report.conflicts.iter()).collect();
    if views.is_empty() {
        formatter.success("No booking conflicts");
    } else {
        formatter.success(&format!(
            "{} ({} hard, {} soft)",
            plural(views.len(), "conflict"),
            summary.hard,
            summary.soft
        ));
        formatter.info("");
        print_table(&*formatter, views.into_iter());
    }

    if show_resolved && !report.resolved.is_empty() {
        formatter.info("");
        formatter.info(&format!("Resolved ({}):", summary.resolved));
        print_table(&*formatter, one_side(report.resolved.iter().map(|r| &r.view)));
    } else if summary.resolved > 0 {
        formatter.info("");
        formatter.info(&format!(
            "{} hidden. Use 'gigbook conflicts list --resolved' to include them.",
            plural(summary.resolved, "resolved conflict")
        ));
    }

    Ok(())
}

async fn execute_show(
    ctx: &CommandContext,
    service: &ConflictService,
    booking_id: BookingId,
) -> Result<()> {
    let user_id = ctx.user_id()?;
    let formatter = ctx.formatter();

    let report = service
        .conflicts_for_booking(user_id, booking_id)
        .await
        .with_context(|| format!("Failed to check booking {}", booking_id))?;

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "booking_id": booking_id,
            "conflicts": report.conflicts,
            "resolved": report.resolved,
        }));
        return Ok(());
    }

    if report.conflicts.is_empty() {
        formatter.success(&format!("Booking #{} has no open conflicts", booking_id));
    } else {
        formatter.success(&format!(
            "Booking #{}: {}",
            booking_id,
            plural(report.conflicts.len(), "conflict")
        ));
    }

    for view in &report.conflicts {
        print_detail(&*formatter, view, None);
    }
    for resolved in &report.resolved {
        print_detail(&*formatter, &resolved.view, Some(&resolved.resolution));
    }

    Ok(())
}

async fn execute_resolve(
    ctx: &CommandContext,
    service: &ConflictService,
    a: BookingId,
    b: BookingId,
    date: Option<NaiveDate>,
    notes: Option<String>,
) -> Result<()> {
    let user_id = ctx.user_id()?;
    let formatter = ctx.formatter();

    let resolution = service
        .resolve_conflict(user_id, a, b, date, notes)
        .await
        .with_context(|| format!("Failed to resolve conflict between #{} and #{}", a, b))?;

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "success": true,
            "resolution": resolution,
        }));
    } else {
        formatter.success(&format!(
            "Conflict {} resolved for {}",
            pair_label(resolution.pair()),
            resolution.conflict_date()
        ));
        if let Some(notes) = resolution.notes() {
            formatter.field("Notes", notes);
        }
    }

    Ok(())
}

async fn execute_unresolve(
    ctx: &CommandContext,
    service: &ConflictService,
    a: BookingId,
    b: BookingId,
) -> Result<()> {
    let user_id = ctx.user_id()?;
    let formatter = ctx.formatter();
    let pair = BookingPair::new(a, b)?;

    let removed = service
        .unresolve_conflict(user_id, a, b)
        .await
        .with_context(|| format!("Failed to unresolve conflict {}", pair_label(pair)))?;

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "success": true,
            "removed": removed,
            "pair": pair,
        }));
    } else if removed {
        formatter.success(&format!("Conflict {} will be reported again", pair_label(pair)));
    } else {
        formatter.warn(&format!("No resolution recorded for {}", pair_label(pair)));
    }

    Ok(())
}

async fn execute_resolved(ctx: &CommandContext, service: &ConflictService) -> Result<()> {
    let user_id = ctx.user_id()?;
    let formatter = ctx.formatter();

    let resolutions = service
        .list_resolutions(user_id)
        .await
        .context("Failed to list resolutions")?;

    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "count": resolutions.len(),
            "resolutions": resolutions,
        }));
        return Ok(());
    }

    if resolutions.is_empty() {
        formatter.success("No resolved conflicts");
        return Ok(());
    }

    formatter.success(&plural(resolutions.len(), "resolution"));
    formatter.info("");
    formatter.info(&format!("{:<16} {:<10}  {:<16}  Notes", "Bookings", "Date", "Resolved"));
    formatter.info(&format!("{:-<16} {:-<10}  {:-<16}  {:-<5}", "", "", "", ""));
    for r in &resolutions {
        formatter.info(&format!(
            "{:<16} {:<10}  {:<16}  {}",
            pair_label(r.pair()),
            r.conflict_date(),
            r.resolved_at().format("%Y-%m-%d %H:%M"),
            truncate(r.notes().unwrap_or("-"), 40)
        ));
    }

    Ok(())
}

// ============================================================================
// Rendering helpers
// ============================================================================

/// Drops soft conflicts from both buckets
fn hide_soft(report: &mut ConflictReport) {
    report.conflicts.retain(|v| v.severity != Severity::Soft);
    report.resolved.retain(|r| r.view.severity != Severity::Soft);
}

/// Keeps one perspective per pair (the lower booking id's)
fn one_side<'a>(views: impl Iterator<Item = &'a ConflictView>) -> impl Iterator<Item = &'a ConflictView> {
    views.filter(|v| v.booking_id < v.with_booking_id)
}

fn print_table<'a>(formatter: &dyn OutputFormatter, views: impl Iterator<Item = &'a ConflictView>) {
    for view in views {
        formatter.info(&format!(
            "{} {:<4} {:<16} {}  {}",
            severity_marker(view.severity),
            view.severity.to_string(),
            pair_label_ids(view.booking_id, view.with_booking_id),
            view.date,
            view.message
        ));
    }
}

fn print_detail(
    formatter: &dyn OutputFormatter,
    view: &ConflictView,
    resolution: Option<&ConflictResolution>,
) {
    formatter.info("");
    formatter.info(&format!(
        "{} {} with #{} {}",
        severity_marker(view.severity),
        view.severity,
        view.with_booking_id,
        view.client_name
    ));
    formatter.field("Date", &view.date.to_string());
    formatter.field("Time", &view.time_display);
    if let Some(venue) = &view.venue {
        formatter.field("Venue", venue);
    }
    formatter.field("Status", view.status.as_str());
    formatter.field("Detail", &view.message);
    formatter.field(
        "Actions",
        if view.can_edit {
            "edit, reject"
        } else {
            "none (booking is locked)"
        },
    );
    if let Some(resolution) = resolution {
        formatter.field(
            "Resolved",
            &resolution.resolved_at().format("%Y-%m-%d %H:%M UTC").to_string(),
        );
        if let Some(notes) = resolution.notes() {
            formatter.field("Notes", notes);
        }
    }
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Hard => "\u{2717}",
        Severity::Soft => "\u{26a0}",
    }
}

fn pair_label(pair: BookingPair) -> String {
    pair_label_ids(pair.low(), pair.high())
}

fn pair_label_ids(a: BookingId, b: BookingId) -> String {
    format!("#{} \u{2194} #{}", a, b)
}

/// Truncate to at most `max_chars` characters, ending with "..." when cut
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
