mod config;
mod logging;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use medsynth_core::{DateWindow, EnvironmentPreset, Error as CoreError};
use medsynth_generate::ids::DEFAULT_MAX_ATTEMPTS;
use medsynth_generate::{GenerateOptions, GenerationEngine, GenerationError};
use medsynth_publish::{LocalStore, MemoryStore, ObjectStore, PublishError, Publisher, S3Store};
use serde::Serialize;
use thiserror::Error;

use config::{BackendKind, ConfigError, EnvSelection, Overrides, Settings, StorageSettings};
use logging::{LogFormat, LogOptions, LoggingError, init_logging};
use output::{OutputError, emit_json, write_dataset};

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

#[derive(Parser, Debug)]
#[command(name = "medsynth", version, about = "Synthetic healthcare data publisher")]
struct Cli {
    /// Path to a medsynth.toml settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `medsynth_publish=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Console log format.
    #[arg(long, value_enum, global = true, default_value = "text")]
    log_format: LogFormat,
    /// Append JSON logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    overrides: Overrides,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and publish fresh batches to storage.
    Run(RunArgs),
    /// Generate batches into a local directory without touching storage.
    Generate(GenerateArgs),
    /// List objects in the bucket.
    List(ListArgs),
    /// Delete every object under the environment prefixes.
    Clear(ClearArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long, value_enum, default_value = "all")]
    env: EnvSelection,
    /// Write the run report here instead of stdout.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long, value_enum, default_value = "all")]
    env: EnvSelection,
    /// Output directory; one subdirectory per environment.
    #[arg(long, default_value = "generated")]
    out: PathBuf,
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Key prefix; lists the whole bucket when omitted.
    #[arg(long, default_value = "")]
    prefix: String,
}

#[derive(Args, Debug)]
struct ClearArgs {
    #[arg(long, value_enum)]
    env: EnvSelection,
}

#[derive(Debug, Serialize)]
struct GenerateReport {
    output_dir: PathBuf,
    window_start: String,
    window_end: String,
    seed: Option<u64>,
    environments: Vec<output::GeneratedEnvironment>,
}

#[derive(Debug, Serialize)]
struct ClearedPrefix {
    prefix: &'static str,
    deleted: usize,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    init_logging(&LogOptions {
        level: cli.log_level.clone(),
        format: cli.log_format,
        file: cli.log_file.clone(),
    })?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply(&cli.overrides);

    match cli.command {
        Command::Run(args) => run_publish(&settings, args).await,
        Command::Generate(args) => run_generate(&settings, args),
        Command::List(args) => run_list(&settings, args).await,
        Command::Clear(args) => run_clear(&settings, args).await,
    }
}

async fn run_publish(settings: &Settings, args: RunArgs) -> Result<(), CliError> {
    let engine = build_engine(settings)?;
    let publisher = Publisher::new(open_store(&settings.storage).await?, &settings.bucket);

    let result = medsynth_publish::run(&publisher, &engine, &args.env.presets()).await;
    let report = close_after(publisher, result).await?;

    emit_json(&report, args.report.as_deref())?;
    Ok(())
}

fn run_generate(settings: &Settings, args: GenerateArgs) -> Result<(), CliError> {
    let engine = build_engine(settings)?;
    tracing::info!(event = "generate_started", out = %args.out.display());

    let mut environments = Vec::new();
    for preset in args.env.presets() {
        let dataset = engine.generate(&preset)?;
        environments.push(write_dataset(&args.out, preset.prefix, &dataset)?);
    }

    let options = engine.options();
    let report = GenerateReport {
        output_dir: args.out,
        window_start: options.window.start().to_string(),
        window_end: options.window.end().to_string(),
        seed: options.seed,
        environments,
    };
    emit_json(&report, args.report.as_deref())?;
    Ok(())
}

async fn run_list(settings: &Settings, args: ListArgs) -> Result<(), CliError> {
    let publisher = Publisher::new(open_store(&settings.storage).await?, &settings.bucket);
    let result = publisher.list(&args.prefix).await;

    for object in close_after(publisher, result).await? {
        println!("{}\t{}", object.size, object.key);
    }
    Ok(())
}

async fn run_clear(settings: &Settings, args: ClearArgs) -> Result<(), CliError> {
    let publisher = Publisher::new(open_store(&settings.storage).await?, &settings.bucket);

    let result = clear_prefixes(&publisher, &args.env.presets()).await;
    let cleared = close_after(publisher, result).await?;

    emit_json(&cleared, None)?;
    Ok(())
}

async fn clear_prefixes<S: ObjectStore>(
    publisher: &Publisher<S>,
    presets: &[EnvironmentPreset],
) -> Result<Vec<ClearedPrefix>, PublishError> {
    let mut cleared = Vec::with_capacity(presets.len());
    for preset in presets {
        cleared.push(ClearedPrefix {
            prefix: preset.prefix,
            deleted: publisher.clear(preset.prefix).await?,
        });
    }
    Ok(cleared)
}

/// Close the publisher once its operation finished. An operation error is
/// returned ahead of a close error; the close error is then only logged.
async fn close_after<S: ObjectStore, T>(
    publisher: Publisher<S>,
    result: Result<T, PublishError>,
) -> Result<T, CliError> {
    let closed = publisher.close().await;
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), closed) => {
            if let Err(close_err) = closed {
                tracing::warn!(
                    event = "store_close_failed",
                    error = %close_err,
                    "ignoring close error after failed operation"
                );
            }
            Err(err.into())
        }
    }
}

fn build_engine(settings: &Settings) -> Result<GenerationEngine, CliError> {
    Ok(GenerationEngine::new(GenerateOptions {
        window: DateWindow::until_today(settings.window_start)?,
        seed: settings.seed,
        max_id_attempts: DEFAULT_MAX_ATTEMPTS,
    }))
}

async fn open_store(storage: &StorageSettings) -> Result<Box<dyn ObjectStore>, CliError> {
    let store: Box<dyn ObjectStore> = match storage.backend {
        BackendKind::Memory => Box::new(MemoryStore::new()),
        BackendKind::Local => Box::new(LocalStore::new(&storage.root)),
        BackendKind::S3 => Box::new(S3Store::connect(&storage.s3()).await?),
    };
    tracing::debug!(event = "store_opened", backend = store.backend());
    Ok(store)
}
