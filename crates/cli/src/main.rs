use anyhow::{Context, Result};
use chatlens_core::{Config, LoggingConfig, TranscriptParser, init_logging};
use chatlens_ui::App;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// chatlens - a terminal viewer for exported chat transcripts
#[derive(Parser, Debug)]
#[command(name = "chatlens")]
#[command(about = "View exported chat transcripts in the terminal", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to chatlens.toml (default: ./chatlens.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open a transcript in the interactive viewer
    View {
        /// Exported transcript file
        #[arg(required = true, value_name = "FILE")]
        file: PathBuf,
    },
    /// Parse a transcript and print aggregate statistics
    Stats {
        /// Exported transcript file
        #[arg(required = true, value_name = "FILE")]
        file: PathBuf,

        /// Emit statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print an example configuration file
    ExampleConfig,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    init_logging(Some(LoggingConfig::from(config.logging.clone())))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    match cli.command {
        Commands::View { file } => runtime.block_on(cmd_view(config, file)),
        Commands::Stats { file, json } => runtime.block_on(cmd_stats(config, file, json, cli.verbose)),
        Commands::ExampleConfig => {
            print!("{}", Config::example());
            Ok(())
        }
    }
}

/// Load configuration: an explicit --config path must exist; the default
/// path is used when present and falls back to defaults otherwise.
fn load_config(explicit: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = explicit {
        if verbose {
            println!("{} Loading config from {}", "Info:".blue().bold(), path.display());
        }
        return Config::from_file(path).with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let default_path = Path::new("chatlens.toml");
    if default_path.exists() {
        if verbose {
            println!("{} Loading config from {}", "Info:".blue().bold(), default_path.display());
        }
        Config::from_file(default_path).context("Failed to load chatlens.toml")
    } else {
        if verbose {
            println!("{} No chatlens.toml found, using defaults", "Info:".blue().bold());
        }
        Ok(Config::default())
    }
}

/// Open the interactive viewer
async fn cmd_view(config: Config, file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("transcript not found: {}", file.display());
    }

    let mut app = App::new(config, file);
    app.run().await.context("terminal error")?;
    Ok(())
}

/// Parse a transcript and print its aggregate statistics
async fn cmd_stats(config: Config, file: PathBuf, json: bool, verbose: bool) -> Result<()> {
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();

    let mut parser = TranscriptParser::new().with_batch_size(config.parser.batch_size);
    if verbose {
        parser = parser.with_progress(|percent, status| {
            eprintln!("{} {:>3}% {}", "Parsing:".blue().bold(), percent, status);
        });
    }

    let outcome = parser.parse(&text).await?;

    if json {
        let payload = serde_json::json!({
            "stats": outcome.stats,
            "current_user": outcome.current_user,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let stats = &outcome.stats;
    println!("{} {}", "Messages:".green().bold(), stats.total_messages);
    println!("{} {}", "Participants:".green().bold(), stats.participants);
    println!("{} {}", "Messages/day:".green().bold(), stats.avg_messages_per_day);
    println!("{} {} days", "Duration:".green().bold(), stats.duration_days);
    println!(
        "{} {} \u{2192} {}",
        "Period:".green().bold(),
        stats.date_range.start,
        stats.date_range.end
    );
    println!("{} {}", "Most active:".green().bold(), outcome.current_user);

    Ok(())
}
