//! Output formatting helpers for CLI commands

use crate::directory::{AgentStatus, AgentView};
use crate::metrics::MetricsReport;
use crate::routing::{RoutingDecision, RoutingOutcome, ScoreBreakdown};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Format agents as a table
pub fn format_agents_table(agents: &[AgentView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Expertise", "Status", "Load"]);

    for a in agents {
        let status_str = match a.status {
            AgentStatus::Available => "Available".green().to_string(),
            AgentStatus::Unavailable => "Unavailable".red().to_string(),
        };
        let load_str = if a.is_within_capacity() {
            format!("{}/{}", a.current_load, a.capacity)
        } else {
            format!("{}/{}", a.current_load, a.capacity)
                .yellow()
                .to_string()
        };

        table.add_row(vec![
            Cell::new(&a.id),
            Cell::new(&a.name),
            Cell::new(a.expertise.join(", ")),
            Cell::new(status_str),
            Cell::new(load_str),
        ]);
    }

    table.to_string()
}

/// Format agents as JSON
pub fn format_agents_json(agents: &[AgentView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({ "agents": agents }))
}

/// Format routing decisions as a table
pub fn format_decisions_table(decisions: &[RoutingDecision]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ticket", "Score", "Destination", "Outcome"]);

    for d in decisions {
        let outcome = match d.outcome() {
            RoutingOutcome::Routed => "routed".green().to_string(),
            RoutingOutcome::Queued => "queued".cyan().to_string(),
            RoutingOutcome::Escalated => "escalated".yellow().to_string(),
        };
        table.add_row(vec![
            Cell::new(&d.ticket_id),
            Cell::new(d.score),
            Cell::new(d.destination.to_string()),
            Cell::new(outcome),
        ]);
    }

    table.to_string()
}

/// Format the automation report as a table
pub fn format_report_table(report: &MetricsReport, rejected: usize, replayed: usize) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Total decisions"), Cell::new(report.total_decisions)]);
    table.add_row(vec![Cell::new("Routed to agent"), Cell::new(report.automated_count)]);
    table.add_row(vec![Cell::new("Standard queue"), Cell::new(report.queued_count)]);
    table.add_row(vec![Cell::new("Escalated"), Cell::new(report.escalated_count)]);
    table.add_row(vec![Cell::new("Rejected"), Cell::new(rejected)]);
    table.add_row(vec![Cell::new("Replayed"), Cell::new(replayed)]);
    table.add_row(vec![Cell::new("Commit retries"), Cell::new(report.commit_retries)]);
    table.add_row(vec![
        Cell::new("Automation rate"),
        Cell::new(format!("{:.1}%", report.automation_rate_percent)),
    ]);
    table.to_string()
}

/// Format a score breakdown as a table
pub fn format_score_table(category: &str, breakdown: &ScoreBreakdown) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Component", "Value"]);
    table.add_row(vec![
        Cell::new(format!("Category ({})", category)),
        Cell::new(breakdown.base),
    ]);
    table.add_row(vec![Cell::new("Risk tags"), Cell::new(breakdown.risk)]);
    table.add_row(vec![Cell::new("Critical bonus"), Cell::new(breakdown.bonus)]);
    table.add_row(vec![
        Cell::new("Total".bold().to_string()),
        Cell::new(breakdown.total.to_string().bold().to_string()),
    ]);
    table.to_string()
}
