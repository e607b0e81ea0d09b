#![forbid(unsafe_code)]

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use assetstats_config::Settings;
use assetstats_engine::host::EventReader;
use assetstats_engine::{StatsDocument, StatsExporter};
use clap::{Parser, Subcommand};

type CliResult = Result<(), Box<dyn Error>>;

/// Settings file looked up in the current directory when `--config` is absent.
const DEFAULT_SETTINGS_FILE: &str = "assetstats.toml";

#[derive(Debug, Parser)]
#[command(name = "assetstats", about = "Export build pipeline stats for asset-manifest loaders")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Feed recorded host build events to a fresh exporter
    Replay {
        /// JSON-lines event file; reads stdin when absent or `-`
        #[arg(long)]
        events: Option<PathBuf>,
        /// Settings file (defaults to ./assetstats.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the host's public-path base
        #[arg(long)]
        public_path: Option<String>,
        /// Override the host's output directory
        #[arg(long)]
        output_path: Option<String>,
        /// Report every write
        #[arg(long, short = 'v')]
        verbose: bool,
    },
    /// Print where a named asset was emitted
    Resolve {
        /// Logical asset name, as requested in the assets chunk
        name: String,
        /// Settings file (defaults to ./assetstats.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the status recorded in the stats file
    Status {
        /// Settings file (defaults to ./assetstats.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Replay {
            events,
            config,
            public_path,
            output_path,
            verbose,
        } => cmd_replay(events, config, public_path, output_path, verbose),
        Command::Resolve { name, config } => cmd_resolve(&name, config),
        Command::Status { config } => cmd_status(config),
    };

    if let Err(msg) = result {
        eprintln!("error: {msg}");
        process::exit(1);
    }
}

/// Load settings from an explicit file, or from `./assetstats.toml` when it exists.
fn load_settings(config: Option<PathBuf>) -> Result<Settings, Box<dyn Error>> {
    let settings = match config {
        Some(path) => Settings::from_path(&path)?,
        None => Settings::from_path_or_default(Path::new(DEFAULT_SETTINGS_FILE))?,
    };
    Ok(settings)
}

fn open_events(events: Option<PathBuf>) -> Result<Box<dyn BufRead>, Box<dyn Error>> {
    match events {
        Some(path) if path.as_os_str() != "-" => {
            let file =
                File::open(&path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn cmd_replay(
    events: Option<PathBuf>,
    config: Option<PathBuf>,
    public_path: Option<String>,
    output_path: Option<String>,
    verbose: bool,
) -> CliResult {
    let mut settings = load_settings(config)?;
    if public_path.is_some() {
        settings.output.public_path = public_path;
    }
    if output_path.is_some() {
        settings.output.path = output_path;
    }

    let mut exporter = StatsExporter::new(&settings);
    let mut handled = 0usize;
    for event in EventReader::new(open_events(events)?) {
        exporter.handle(&event?)?;
        handled = handled.saturating_add(1);
        if verbose {
            let status = exporter
                .state()
                .get("status")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("?");
            eprintln!("       Wrote `{status}` to {}", exporter.target().display());
        }
    }

    if handled == 0 {
        eprintln!("    No events to replay");
    } else {
        eprintln!(
            "    Finished {handled} event(s) into {}",
            exporter.target().display()
        );
    }
    Ok(())
}

fn cmd_resolve(name: &str, config: Option<PathBuf>) -> CliResult {
    let settings = load_settings(config)?;
    let doc = StatsDocument::from_settings(&settings)?;

    let Some(asset) = doc.asset(name) else {
        let known = doc.asset_names();
        let hint = if known.is_empty() {
            "no assets were exported".to_owned()
        } else {
            format!("known assets: {}", known.join(", "))
        };
        return Err(format!(
            "no asset named `{name}` in {} — {hint}",
            doc.path().display()
        )
        .into());
    };

    println!("{}", asset.location());
    Ok(())
}

fn cmd_status(config: Option<PathBuf>) -> CliResult {
    let settings = load_settings(config)?;
    let doc = StatsDocument::from_settings(&settings)?;

    println!("{}", doc.status().unwrap_or("unknown"));

    if let Some(error) = doc.error() {
        if let Some(file) = error.file {
            eprintln!("  in {file}");
        }
        if let Some(message) = error.message {
            eprintln!("{message}");
        }
        return Err(format!("build failed with {}", error.kind).into());
    }
    Ok(())
}
