use clap::Parser;
use triage::cli::{
    agents::handle_agents, handle_completions, handle_config_init, score::handle_score, Cli,
    Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Route(args) => triage::cli::route::run_route(args).await,
        Commands::Score(args) => handle_score(&args).map(|output| println!("{}", output)),
        Commands::Agents(args) => handle_agents(&args).map(|output| println!("{}", output)),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
