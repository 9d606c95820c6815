use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use speech_tone_connector::config::{DEFAULT_DATA_DIR, DEFAULT_TIMEOUT_SECS};
use speech_tone_connector::{
    ConnectorConfig, DataSetSelection, PipeConnector, PipeRunner, RunStatus, StagingStore,
    ToneAnalyzerCredentials, ToneConnector,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "speech-tone-connector")]
#[command(about = "Sample data pipe connector: victory speech transcripts enriched with tone scores")]
struct Args {
    /// Directory holding transcriptListings.json and the transcripts
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Tone analyzer base URL (or set TONE_ANALYZER_URL / VCAP_SERVICES)
    #[arg(long)]
    tone_url: Option<String>,

    /// Tone analyzer user (or set TONE_ANALYZER_USERNAME)
    #[arg(long)]
    tone_username: Option<String>,

    /// Tone analyzer password (or set TONE_ANALYZER_PASSWORD)
    #[arg(long)]
    tone_password: Option<String>,

    /// Timeout for the tone analyzer request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the data sets that can be loaded
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the pipe for one data set or all of them
    Run {
        /// Data set to load
        #[arg(long, conflicts_with = "all")]
        data_set: Option<String>,

        /// Load every data set
        #[arg(long)]
        all: bool,

        /// Where staged records are written
        #[arg(short, long, default_value = "staging")]
        output_dir: PathBuf,

        /// Keep previously staged records
        #[arg(long)]
        no_recreate: bool,
    },
}

fn build_config(args: &Args) -> Result<ConnectorConfig> {
    let mut config = ConnectorConfig::new(args.data_dir.clone())
        .with_timeout(Duration::from_secs(args.timeout_secs));

    let tone_analyzer = match &args.tone_url {
        Some(url) => Some(ToneAnalyzerCredentials {
            url: url.clone(),
            username: args
                .tone_username
                .clone()
                .or_else(|| std::env::var("TONE_ANALYZER_USERNAME").ok())
                .unwrap_or_default(),
            password: args
                .tone_password
                .clone()
                .or_else(|| std::env::var("TONE_ANALYZER_PASSWORD").ok())
                .unwrap_or_default(),
        }),
        None => ConnectorConfig::tone_analyzer_from_env()
            .context("Failed to resolve tone analyzer credentials")?,
    };

    match tone_analyzer {
        Some(credentials) => {
            info!("Tone analyzer: {}", credentials.url);
            config = config.with_tone_analyzer(credentials);
        }
        None => info!("No tone analyzer bound, records will not be enriched"),
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let connector = ToneConnector::new(config).context("Failed to create connector")?;

    match args.command {
        Command::List { json } => {
            let data_sets = connector.list_data_sets();
            if json {
                println!("{}", serde_json::to_string_pretty(&data_sets)?);
            } else {
                for data_set in &data_sets {
                    match &data_set.name {
                        Some(name) => println!("  {}", name),
                        None => println!("* {}", data_set.label),
                    }
                }
            }
        }
        Command::Run {
            data_set,
            all,
            output_dir,
            no_recreate,
        } => {
            let selection = match (data_set, all) {
                (Some(name), false) => DataSetSelection::Named(name),
                (None, true) => DataSetSelection::All,
                _ => bail!("Pass either --data-set <name> or --all"),
            };

            let recreate = connector.info().recreate_target && !no_recreate;
            let prefix = connector.name_prefix().to_string();
            let store = StagingStore::new(output_dir);
            store
                .prepare(&prefix, recreate)
                .with_context(|| format!("Failed to prepare {}", store.output_dir().display()))?;

            let runner = PipeRunner::new(Arc::new(connector));
            let stats = runner.run(&selection).await;

            for run in &stats.data_sets {
                match &run.outcome {
                    Ok(records) => {
                        store
                            .write(&prefix, &run.data_set, records)
                            .with_context(|| format!("Failed to stage {}", run.data_set))?;
                        println!("{}: {} record(s)", run.data_set, records.len());
                    }
                    Err(message) => {
                        error!("{}: {}", run.data_set, message);
                        println!("{}: FAILED ({})", run.data_set, message);
                    }
                }
            }

            println!(
                "Run {} {:?}: {} record(s) in {} ms",
                stats.run_id,
                stats.status(),
                stats.total_records(),
                (stats.finished_at - stats.started_at).num_milliseconds()
            );

            if stats.status() == RunStatus::Failed {
                bail!("Pipe run {} failed", stats.run_id);
            }
        }
    }

    Ok(())
}
