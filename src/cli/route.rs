//! Route command implementation

use crate::cli::output::{format_decisions_table, format_report_table};
use crate::cli::RouteArgs;
use crate::config::TriageConfig;
use crate::directory::AgentDirectory;
use crate::metrics::{setup_metrics, MetricsCollector};
use crate::routing::{Router, RoutingError, Submission};
use crate::ticket::TicketRequest;
use serde_json::json;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// One input line that could not be turned into a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// 1-based line number in the input
    pub line: usize,
    pub reason: String,
}

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    path: &Path,
    log_level: Option<&str>,
    max_ideal_load: Option<u32>,
) -> Result<TriageConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if path.exists() {
        TriageConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        TriageConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }
    if let Some(load) = max_ideal_load {
        config.routing.max_ideal_load = load;
    }

    config.validate()?;
    Ok(config)
}

/// Build the directory and router described by `config`.
pub fn build_router(
    config: &TriageConfig,
    metrics: Arc<MetricsCollector>,
) -> Result<Arc<Router>, Box<dyn std::error::Error>> {
    let directory = Arc::new(AgentDirectory::from_config(
        &config.agents,
        config.routing.max_ideal_load,
    )?);
    Ok(Arc::new(
        Router::from_config(directory, config).with_metrics(metrics),
    ))
}

/// Parse JSON-lines ticket submissions, skipping blank lines.
///
/// Returns the parsed requests with their line numbers, plus a rejection for
/// every line that is not valid JSON.
pub fn parse_ticket_lines(input: &str) -> (Vec<(usize, TicketRequest)>, Vec<Rejection>) {
    let mut requests = Vec::new();
    let mut rejections = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<TicketRequest>(trimmed) {
            Ok(request) => requests.push((line_no, request)),
            Err(e) => rejections.push(Rejection {
                line: line_no,
                reason: format!("invalid JSON: {}", e),
            }),
        }
    }

    (requests, rejections)
}

/// Route requests, preserving input order in the result.
///
/// A request repeating an already-decided ticket id comes back as a replayed
/// submission.
///
/// With more than one worker, tickets are routed concurrently on the blocking
/// pool; the directory's commit check keeps loads consistent.
pub async fn route_batch(
    router: Arc<Router>,
    requests: Vec<TicketRequest>,
    workers: usize,
) -> Result<Vec<Result<Submission, RoutingError>>, Box<dyn std::error::Error>> {
    if workers <= 1 {
        return Ok(requests
            .into_iter()
            .map(|request| router.submit_request(request))
            .collect());
    }

    let total = requests.len();
    let permits = Arc::new(Semaphore::new(workers));
    let mut set = JoinSet::new();

    for (index, request) in requests.into_iter().enumerate() {
        let permit = Arc::clone(&permits).acquire_owned().await?;
        let router = Arc::clone(&router);
        set.spawn_blocking(move || {
            let _permit = permit;
            (index, router.submit_request(request))
        });
    }

    let mut slots: Vec<Option<Result<Submission, RoutingError>>> =
        (0..total).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        let (index, result) = joined?;
        slots[index] = Some(result);
    }

    Ok(slots.into_iter().flatten().collect())
}

fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e).into())
    }
}

/// Run the `route` command
pub async fn run_route(args: RouteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        load_config_with_overrides(&args.config, args.log_level.as_deref(), args.max_ideal_load)?;
    crate::logging::init_tracing(&config.logging)?;

    let prometheus = if args.prometheus {
        Some(setup_metrics()?)
    } else {
        None
    };

    let metrics = Arc::new(MetricsCollector::new());
    let router = build_router(&config, Arc::clone(&metrics))?;

    let input = read_input(&args.input)?;
    let (parsed, mut rejections) = parse_ticket_lines(&input);
    tracing::info!(
        tickets = parsed.len(),
        rejected = rejections.len(),
        workers = args.workers,
        "Routing batch"
    );

    let (lines, requests): (Vec<usize>, Vec<TicketRequest>) = parsed.into_iter().unzip();
    let results = route_batch(Arc::clone(&router), requests, args.workers).await?;

    let mut decisions = Vec::with_capacity(results.len());
    let mut replayed = 0;
    for (line, result) in lines.into_iter().zip(results) {
        match result {
            Ok(submission) if submission.replayed => {
                tracing::debug!(line, ticket_id = %submission.decision.ticket_id, "Duplicate ticket id");
                replayed += 1;
            }
            Ok(submission) => decisions.push(submission.decision),
            Err(RoutingError::Validation(e)) => rejections.push(Rejection {
                line,
                reason: e.to_string(),
            }),
            Err(e) => return Err(format!("line {}: {}", line, e).into()),
        }
    }
    rejections.sort_by_key(|r| r.line);

    for rejection in &rejections {
        eprintln!("Rejected line {}: {}", rejection.line, rejection.reason);
    }

    let report = metrics.report();
    if args.json {
        for decision in &decisions {
            println!("{}", serde_json::to_string(decision)?);
        }
        println!(
            "{}",
            serde_json::to_string(&json!({
                "report": report,
                "rejected": rejections.len(),
                "replayed": replayed,
            }))?
        );
    } else {
        println!("{}", format_decisions_table(&decisions));
        println!("{}", format_report_table(&report, rejections.len(), replayed));
    }

    if let Some(handle) = prometheus {
        metrics.update_agent_gauges(router.directory());
        println!("{}", handle.render());
    }

    Ok(())
}
