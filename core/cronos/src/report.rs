//! Plain-text rendering for status and history output.

use chrono::{DateTime, Utc};
use cronos_core::{reconcile, Cycle, CycleStatus};

pub fn render_status(active: Option<&Cycle>, now: DateTime<Utc>) -> String {
    let Some(cycle) = active else {
        return "No active cycle.".to_string();
    };

    let progress = reconcile(cycle, now);
    let mut line = format!(
        "{} ({} min): {} remaining",
        cycle.task,
        cycle.minutes_amount,
        progress.label()
    );
    if progress.completed {
        line.push_str(", due to finish");
    }
    line
}

pub fn render_history(cycles: &[Cycle], now: DateTime<Utc>) -> String {
    if cycles.is_empty() {
        return "No cycles yet.".to_string();
    }

    let task_width = cycles
        .iter()
        .map(|cycle| cycle.task.chars().count())
        .max()
        .unwrap_or(0)
        .max("TASK".len());

    let mut out = format!(
        "{:<task_width$}  {:>8}  {:<22}  STATUS",
        "TASK", "DURATION", "STARTED"
    );
    for cycle in cycles {
        out.push('\n');
        out.push_str(&format!(
            "{:<task_width$}  {:>8}  {:<22}  {}",
            cycle.task,
            format!("{} min", cycle.minutes_amount),
            relative_time(cycle.start_date, now),
            status_label(cycle.status()),
        ));
    }
    out
}

fn status_label(status: CycleStatus) -> &'static str {
    match status {
        CycleStatus::Active => "in progress",
        CycleStatus::Interrupted => "interrupted",
        CycleStatus::Finished => "finished",
    }
}

/// Human distance from `then` to `now`, e.g. `"5 minutes ago"`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds().max(0);
    let minutes = (seconds + 30) / 60;

    if minutes < 1 {
        return "less than a minute ago".to_string();
    }
    if minutes < 45 {
        return plural(minutes, "minute");
    }
    let hours = (minutes + 30) / 60;
    if hours < 24 {
        return format!("about {}", plural(hours, "hour"));
    }
    let days = (hours + 12) / 24;
    plural(days, "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
