//! Score command implementation

use crate::cli::output::format_score_table;
use crate::cli::route::load_config_with_overrides;
use crate::cli::ScoreArgs;
use crate::routing::PriorityScorer;
use crate::ticket::Ticket;
use serde_json::json;

/// Handle `triage score` command
pub fn handle_score(args: &ScoreArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.config, None, None)?;
    let scorer = PriorityScorer::new(&config.scoring);

    // Go through Ticket so repeated tags collapse the same way they do when routing.
    let ticket = Ticket::new("-", args.category.clone(), args.tags.clone());
    let breakdown = scorer.breakdown(&ticket.category, ticket.tags.iter().map(String::as_str));

    if args.json {
        Ok(serde_json::to_string_pretty(&json!({
            "category": ticket.category,
            "tags": ticket.tags,
            "score": breakdown,
            "queued": breakdown.total < config.routing.standard_threshold,
        }))?)
    } else {
        Ok(format_score_table(&ticket.category, &breakdown))
    }
}
