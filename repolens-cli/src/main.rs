//! RepoLens CLI - analyze public repositories through a remote analysis service
//!
//! The presentation boundary: it owns the controller and chat lifecycles and
//! renders their state; all analysis semantics live in repolens-client.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use repolens_client::{
    AnalysisController, AnalysisService, ApiClientConfig, ChatConversation, HttpAnalysisService,
};
use repolens_core::{init_logging, performance, LensConfig, LoggingConfig};

mod features;
mod render;

#[derive(Parser)]
#[command(name = "repolens")]
#[command(about = "Analyze public GitHub repositories through a remote analysis service")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the analysis service base URL
    #[arg(long)]
    service_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a repository and render the report
    Analyze {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Interactive chat about a codebase
    Chat,

    /// Check whether the analysis service is reachable
    Health,

    /// List feature capabilities and their status
    Features,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    };
    if let Err(e) = init_logging(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let mut config = LensConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.service_url {
        config.service.base_url = url;
        config.validate()?;
    }

    match cli.command {
        Commands::Analyze { url, json } => run_analyze(&config, &url, json).await,
        Commands::Chat => run_chat(&config).await,
        Commands::Health => run_health(&config).await,
        Commands::Features => {
            for capability in features::capabilities() {
                println!(
                    "{:<24} [{}]  {}",
                    capability.name, capability.status, capability.description
                );
            }
            Ok(())
        }
        Commands::Config { show, init } => run_config(&config, show, init),
    }
}

fn build_service(config: &LensConfig) -> anyhow::Result<Arc<HttpAnalysisService>> {
    let api_config = ApiClientConfig {
        base_url: config.service.base_url.clone(),
        timeout_seconds: config.service.timeout_seconds,
        user_agent: config.service.user_agent.clone(),
        headers: Default::default(),
    };
    Ok(Arc::new(HttpAnalysisService::new(api_config)?))
}

async fn run_analyze(config: &LensConfig, url: &str, json: bool) -> anyhow::Result<()> {
    let service = build_service(config)?;
    let mut controller = AnalysisController::new(service);

    match performance::measure_async("analyze_repository", controller.submit(url)).await {
        Ok(()) => {
            let Some(report) = controller.report() else {
                anyhow::bail!("analysis succeeded but no report is available");
            };

            if json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                print!("{}", render::render_report(report));
            }
            Ok(())
        }
        Err(e) => anyhow::bail!("{}", e.user_message()),
    }
}

async fn run_chat(config: &LensConfig) -> anyhow::Result<()> {
    let service = build_service(config)?;
    let mut chat = ChatConversation::new(service);

    println!("Chat about a codebase. Type 'exit' to quit, 'clear' to start over.");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "exit" | "quit" => break,
            "clear" => {
                chat.clear();
                println!("(conversation cleared)");
                continue;
            }
            _ => {}
        }

        match chat.send(input).await {
            Ok(Some(reply)) => println!("{}", reply.content),
            Ok(None) => continue,
            Err(_) => {
                if let Some(message) = chat.last_error() {
                    eprintln!("{}", message);
                }
            }
        }
    }

    info!(turns = chat.messages().len(), "Chat session ended");
    Ok(())
}

async fn run_health(config: &LensConfig) -> anyhow::Result<()> {
    let service = build_service(config)?;

    if service.health().await? {
        println!("Analysis service at {} is healthy", config.service.base_url);
        Ok(())
    } else {
        anyhow::bail!(
            "Analysis service at {} is not reachable",
            config.service.base_url
        )
    }
}

fn run_config(config: &LensConfig, show: bool, init: bool) -> anyhow::Result<()> {
    if init {
        let Some(path) = LensConfig::default_path() else {
            anyhow::bail!("no config directory available on this platform");
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        LensConfig::default().save_to_file(&path)?;
        println!("Wrote default configuration to {}", path.display());
    }

    if show || !init {
        print!("{}", toml::to_string_pretty(config)?);
    }

    Ok(())
}
