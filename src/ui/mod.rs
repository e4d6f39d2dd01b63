//! Terminal UI helpers for task display.
//!
//! This module uses println! for CLI output, which is appropriate
//! for terminal user interfaces.

#![allow(clippy::disallowed_macros)]

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::ai::schemas::DailyPlanOutput;
use crate::engine::{DecisionSource, WhatNow};
use crate::entities::{
    HouseholdMember, Nudge, NudgeType, Priority, Task, TaskAction, TaskStatus,
};

/// Get colored status string
pub fn status_colored(status: TaskStatus) -> String {
    match status {
        TaskStatus::Captured => "captured".yellow().to_string(),
        TaskStatus::Parsed => "parsed".yellow().to_string(),
        TaskStatus::Triaged => "triaged".blue().to_string(),
        TaskStatus::Planned => "planned".cyan().to_string(),
        TaskStatus::Scheduled => "scheduled".cyan().to_string(),
        TaskStatus::InProgress => "in-progress".magenta().to_string(),
        TaskStatus::Done => "done".green().to_string(),
        TaskStatus::Cancelled => "cancelled".red().to_string(),
    }
}

/// Get colored priority string
pub fn priority_colored(priority: Priority) -> String {
    match priority {
        Priority::Critical => "critical".red().bold().to_string(),
        Priority::High => "high".yellow().to_string(),
        Priority::Medium => "medium".normal().to_string(),
        Priority::Low => "low".dimmed().to_string(),
        Priority::Someday => "someday".dimmed().to_string(),
    }
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Captured | TaskStatus::Parsed => Color::Yellow,
        TaskStatus::Triaged => Color::Blue,
        TaskStatus::Planned | TaskStatus::Scheduled => Color::Cyan,
        TaskStatus::InProgress => Color::Magenta,
        TaskStatus::Done => Color::Green,
        TaskStatus::Cancelled => Color::Red,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Critical => Color::Red,
        Priority::High => Color::Yellow,
        Priority::Medium => Color::White,
        Priority::Low | Priority::Someday => Color::DarkGrey,
    }
}

/// Create a table for displaying tasks
pub fn task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Domain").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Due").fg(Color::Cyan),
    ]);

    for task in tasks {
        let due = task
            .due_date
            .map_or_else(|| "-".to_string(), |d| d.to_string());

        table.add_row(vec![
            Cell::new(short_id(&task.id)),
            Cell::new(&task.title),
            Cell::new(task.domain.to_string()),
            Cell::new(task.status.to_string()).fg(status_color(task.status)),
            Cell::new(task.priority.to_string()).fg(priority_color(task.priority)),
            Cell::new(format!("{:.2}", task.priority_score)),
            Cell::new(due),
        ]);
    }

    table
}

/// Create a table for a task's action pipeline
pub fn action_table(actions: &[TaskAction]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Type").fg(Color::Cyan),
        Cell::new("Label").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Assigned").fg(Color::Cyan),
    ]);

    for action in actions {
        let assigned = action.assigned_to.as_deref().unwrap_or("-");
        table.add_row(vec![
            Cell::new(action.order_index),
            Cell::new(short_id(&action.id)),
            Cell::new(action.action_type.to_string()),
            Cell::new(&action.label),
            Cell::new(action.status.to_string()),
            Cell::new(assigned),
        ]);
    }

    table
}

/// Create a table for the household roster
pub fn member_table(members: &[HouseholdMember]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Role").fg(Color::Cyan),
        Cell::new("Skills").fg(Color::Cyan),
        Cell::new("External").fg(Color::Cyan),
    ]);

    for member in members {
        table.add_row(vec![
            Cell::new(short_id(&member.id)),
            Cell::new(&member.name),
            Cell::new(&member.role),
            Cell::new(member.skills.join(", ")),
            Cell::new(if member.is_external { "yes" } else { "no" }),
        ]);
    }

    table
}

/// Display task details in a formatted way
pub fn display_task_details(task: &Task) {
    println!("{}", "═".repeat(60).dimmed());
    println!(
        "{} {} {}",
        "Task".cyan().bold(),
        task.id.cyan().bold(),
        format!("[{}]", task.status).yellow()
    );
    println!("{}", "═".repeat(60).dimmed());
    println!();

    println!("{}: {}", "Title".bold(), task.title);
    println!("{}: {}", "Domain".bold(), task.domain);
    println!("{}: {}", "Status".bold(), status_colored(task.status));
    println!("{}: {}", "Priority".bold(), priority_colored(task.priority));
    println!(
        "{}: {:.2} (urgency {}, importance {})",
        "Score".bold(),
        task.priority_score,
        task.urgency,
        task.importance
    );

    if let Some(due) = task.due_date {
        println!("{}: {}", "Due".bold(), due);
    }
    if let Some(duration) = task.estimated_duration_min {
        println!("{}: {} min", "Estimated".bold(), duration);
    }

    if let Some(ref description) = task.description {
        println!();
        println!("{}", "Description".bold().underline());
        println!("{description}");
    }

    println!();
}

/// Display a what-now answer with its provenance
pub fn display_recommendations(answer: &WhatNow, source: DecisionSource) {
    match source {
        DecisionSource::Oracle => print_info("Recommendations from the reasoning service"),
        DecisionSource::Fallback => print_warning("Reasoning service unavailable, ranked by score"),
    }
    println!();

    if answer.recommendations.is_empty() {
        println!("{}", "Nothing to recommend right now.".dimmed());
        return;
    }

    for (i, rec) in answer.recommendations.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("{}.", i + 1).bold(),
            rec.task.title.bold(),
            format!("(~{} min, confidence {:.0}%)", rec.estimated_time_min, rec.confidence * 100.0)
                .dimmed()
        );
        println!("   {}", rec.reason);
    }

    if !answer.reasoning.is_empty() {
        println!();
        println!("{}", answer.reasoning.dimmed());
    }
}

/// Display a daily plan
pub fn display_daily_plan(output: &DailyPlanOutput, source: DecisionSource) {
    match source {
        DecisionSource::Oracle => print_info("Plan from the reasoning service"),
        DecisionSource::Fallback => print_warning("Reasoning service unavailable, packed by score"),
    }
    println!();

    for item in &output.plan {
        let time = item
            .suggested_time
            .split('T')
            .nth(1)
            .unwrap_or(&item.suggested_time);
        println!(
            "{} {} {}",
            time.cyan().bold(),
            item.task_title.bold(),
            format!("({} min)", item.estimated_duration_min).dimmed()
        );
        println!("      {}", item.reason.dimmed());
    }

    if !output.summary.is_empty() {
        println!();
        println!("{}", output.summary);
    }
}

/// Display nudges, most severe first
pub fn display_nudges(nudges: &[Nudge]) {
    if nudges.is_empty() {
        print_success("Nothing needs your attention.");
        return;
    }

    for nudge in nudges {
        let marker = match nudge.nudge_type {
            NudgeType::Overdue => "!".red().bold().to_string(),
            NudgeType::DueSoon => "•".yellow().bold().to_string(),
            NudgeType::Suggestion | NudgeType::Reminder => "•".blue().to_string(),
        };
        println!("{marker} {}", nudge.message);
    }
}

/// First eight characters of an id, or the whole id when shorter.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}
