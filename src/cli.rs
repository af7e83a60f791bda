//! CLI interface for feedback-curator

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::time::Duration;

use crate::config::Config;
use crate::curation::FeedbackStore;
use crate::service::{run_scheduler, CurationService};
use crate::types::{Category, FeedbackRecord};

#[derive(Parser)]
#[command(name = "feedback-curator")]
#[command(about = "Curates user correction feedback into a golden set of labeled examples", long_about = None)]
#[command(version)]
struct Cli {
    /// Override the data directory holding the persisted collections
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service with the periodic curation scheduler
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one curation cycle and exit
    Curate,
    /// Submit a single correction record
    Submit {
        /// The original user prompt
        prompt: String,
        /// Category the classifier assigned
        #[arg(long)]
        from: String,
        /// Category the user asserts is correct
        #[arg(long)]
        to: String,
        /// Classifier confidence in [0,1]
        #[arg(long)]
        confidence: Option<f64>,
        /// External rating in [0,100]
        #[arg(long)]
        quality: Option<u8>,
        /// Provenance tag
        #[arg(long)]
        source: Option<String>,
    },
    /// Show or update configuration
    Config {
        /// Set hours between scheduled curation runs
        #[arg(long)]
        set_interval_hours: Option<u64>,
        /// Set the server bind host
        #[arg(long)]
        set_host: Option<String>,
        /// Set the server bind port
        #[arg(long)]
        set_port: Option<u16>,
    },
    /// Show the current golden set
    GoldenSet,
    /// Show summary statistics
    Stats,
    /// Write the full export snapshot as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_store(data_dir: Option<PathBuf>, config: &Config) -> Result<Arc<FeedbackStore>> {
    let store = match data_dir.or_else(|| config.storage.data_dir.clone()) {
        Some(dir) => FeedbackStore::with_dir(dir)?,
        None => FeedbackStore::new()?,
    };
    Ok(Arc::new(store))
}

fn parse_category(label: &str) -> Result<Category> {
    match Category::parse(label) {
        Some(category) => Ok(category),
        None => bail!(
            "Unknown category '{}' (expected one of: {})",
            label,
            Category::ALL.map(|c| c.as_str()).join(", ")
        ),
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let store = open_store(cli.data_dir, &config)?;
    let service = Arc::new(CurationService::new(store));

    match cli.command {
        Commands::Serve { host, port } => {
            let mut server_config = config.server.clone();
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }

            let interval = Duration::from_secs(config.curation.interval_hours * 3600);
            tokio::spawn(run_scheduler(service.clone(), interval));

            crate::server::start(service, &server_config).await
        }
        Commands::Curate => {
            match service.run_curation(Utc::now())? {
                Some(outcome) => println!(
                    "Scored {} records, golden set {}, retained {}, pruned {}",
                    outcome.population, outcome.golden_set_size, outcome.retained, outcome.pruned
                ),
                None => println!("Curation already running, nothing to do"),
            }
            Ok(())
        }
        Commands::Submit {
            prompt,
            from,
            to,
            confidence,
            quality,
            source,
        } => {
            let mut record =
                FeedbackRecord::new(prompt, parse_category(&from)?, parse_category(&to)?, Utc::now());
            if let Some(confidence) = confidence {
                record.confidence = confidence.clamp(0.0, 1.0);
            }
            record.user_quality_score = quality.map(|q| q.min(100));
            if let Some(source) = source {
                record.source = source;
            }

            service.submit_feedback(record)?;
            // One-shot process: run the follow-up curation inline
            service.run_curation(Utc::now())?;
            println!("Feedback recorded");
            Ok(())
        }
        Commands::Config {
            set_interval_hours,
            set_host,
            set_port,
        } => {
            let mut config = config;
            let mut changed = false;
            if let Some(hours) = set_interval_hours {
                config.curation.interval_hours = hours;
                changed = true;
            }
            if let Some(host) = set_host {
                config.server.host = host;
                changed = true;
            }
            if let Some(port) = set_port {
                config.server.port = port;
                changed = true;
            }

            if changed {
                config.save()?;
                println!(
                    "Configuration saved to {}",
                    crate::config::config_path()?.display()
                );
            } else {
                println!("Curation interval: {}h", config.curation.interval_hours);
                println!(
                    "Server:            {}:{}",
                    config.server.host, config.server.port
                );
                match &config.storage.data_dir {
                    Some(dir) => println!("Data directory:    {}", dir.display()),
                    None => println!("Data directory:    (default)"),
                }
            }
            Ok(())
        }
        Commands::GoldenSet => {
            let entries = service.golden_set()?;
            if entries.is_empty() {
                println!("Golden set is empty - no curation has run yet");
                return Ok(());
            }
            println!("Golden set: {} entries", entries.len());
            for entry in entries {
                println!(
                    "  [{:>5.1}] {:<20} {}",
                    entry.quality_score,
                    entry.correct_category.to_string(),
                    entry.prompt
                );
            }
            Ok(())
        }
        Commands::Stats => {
            let stats = service.stats()?;
            println!("Total feedback:   {}", stats.total_feedback);
            println!(
                "Recent:           {} / 24h, {} / 7d, {} / 30d",
                stats.last_24_hours, stats.last_7_days, stats.last_30_days
            );
            println!("Average quality:  {:.1}", stats.average_quality);
            println!(
                "Distribution:     {} high (>60), {} low (<30)",
                stats.high_quality, stats.low_quality
            );
            if !stats.pattern_counts.is_empty() {
                println!("Error patterns:");
                for pc in stats.pattern_counts.iter().take(10) {
                    println!("  {:>4}  {}", pc.count, pc.pattern);
                }
            }
            Ok(())
        }
        Commands::Export { output } => {
            let snapshot = service.export()?;
            let json = serde_json::to_string_pretty(&snapshot)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Export written to {}", path.display());
                }
                None => println!("{}", json),
            }
            Ok(())
        }
    }
}
