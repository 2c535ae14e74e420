//! ShakeIt replay tool
//!
//! Drives the shake engine from recorded accelerometer files, with the high
//! score kept in a JSON preferences file between runs.
//!
//! This is the entry point for standalone use. For library use, see lib.rs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shakeit::{
    ClassifierKind, CommitPolicy, JsonFileStore, LogNotifier, ReplaySource, SessionUpdate,
    ShakeConfig, ShakeEdge, ShakeResult, ShakeSession,
};

#[derive(Parser, Debug)]
#[command(name = "shakeit", version, about = "Shake detection and scoring from accelerometer recordings")]
struct Cli {
    /// JSON config file (thresholds, classifier, commit policy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// High score preferences file.
    #[arg(long, global = true, default_value = "shakeit_prefs.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recording (one `x` or `x,y,z` sample per line).
    Replay {
        file: PathBuf,

        /// Override the classifier (difference | peak_to_peak).
        #[arg(long)]
        classifier: Option<ClassifierKind>,

        /// Override the commit policy (on_shake_end | every_sample).
        #[arg(long)]
        policy: Option<CommitPolicy>,

        /// Only print the summary.
        #[arg(long)]
        quiet: bool,
    },
    /// Print the stored high score.
    Highscore,
    /// Reset the stored high score to 0.
    Reset,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("shakeit: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> ShakeResult<ShakeConfig> {
    let config = match path {
        Some(path) => ShakeConfig::from_path(path)?,
        None => ShakeConfig::default(),
    };
    config.with_env_overrides()
}

fn run(cli: Cli) -> ShakeResult<()> {
    let mut config = load_config(cli.config.as_deref())?;
    let store = JsonFileStore::open(&cli.store)?;

    match cli.command {
        Command::Replay {
            file,
            classifier,
            policy,
            quiet,
        } => {
            if let Some(classifier) = classifier {
                config.classifier = classifier;
            }
            if let Some(policy) = policy {
                config.commit_policy = policy;
            }

            let mut source = ReplaySource::from_path(&file)?;
            let mut session = ShakeSession::new(config, store, LogNotifier)?;
            session.resume(&mut source)?;
            let updates = session.drain(&mut source);
            session.pause(&mut source);

            if !quiet {
                for update in updates.iter().filter(|u| is_notable(u)) {
                    println!("{}", describe(update));
                }
            }

            let summary = serde_json::json!({
                "file": file.display().to_string(),
                "classifier": session.config().classifier,
                "commit_policy": session.config().commit_policy,
                "stats": session.stats(),
                "highscore": session.highscore(),
            });
            println!("{summary}");
        }
        Command::Highscore => {
            let session = ShakeSession::new(config, store, LogNotifier)?;
            println!("{}", session.highscore());
        }
        Command::Reset => {
            let mut session = ShakeSession::new(config, store, LogNotifier)?;
            session.try_reset_highscore()?;
            println!("0");
        }
    }
    Ok(())
}

fn is_notable(update: &SessionUpdate) -> bool {
    update.edge != ShakeEdge::None || update.new_highscore
}

fn describe(update: &SessionUpdate) -> String {
    let event = match update.edge {
        ShakeEdge::Started => "shake started",
        ShakeEdge::Ended => "shake ended",
        ShakeEdge::None => "shaking",
    };
    let mut line = format!(
        "#{:<6} {:<14} delta={:<8.2} score={:<6} highscore={}",
        update.index, event, update.delta, update.score, update.highscore
    );
    if update.new_highscore {
        line.push_str("  NEW HIGHSCORE");
    }
    line
}
