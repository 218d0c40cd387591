//! Agents command implementation

use crate::cli::output::{format_agents_json, format_agents_table};
use crate::cli::route::load_config_with_overrides;
use crate::cli::AgentsArgs;
use crate::directory::{AgentDirectory, AgentStatus, AgentView};

/// List agents, optionally narrowed to one status or to the candidates for a category.
pub fn list_agents(
    directory: &AgentDirectory,
    category: Option<&str>,
    status: Option<AgentStatus>,
) -> Result<Vec<AgentView>, Box<dyn std::error::Error>> {
    let agents = match category {
        Some(category) => directory.candidates(category)?,
        None => directory.agents()?,
    };

    Ok(match status {
        Some(status) => agents.into_iter().filter(|a| a.status == status).collect(),
        None => agents,
    })
}

/// Handle `triage agents` command
pub fn handle_agents(args: &AgentsArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.config, None, None)?;
    let directory = AgentDirectory::from_config(&config.agents, config.routing.max_ideal_load)?;

    let status = args
        .status
        .as_deref()
        .map(str::parse::<AgentStatus>)
        .transpose()?;
    let agents = list_agents(&directory, args.category.as_deref(), status)?;

    if args.json {
        Ok(format_agents_json(&agents)?)
    } else {
        Ok(format_agents_table(&agents))
    }
}
