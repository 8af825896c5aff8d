//! imgsweep - keeps a notes vault's images in one folder
//!
//! This is the CLI application. It loads configuration, builds the
//! operations context and renders events and results; the sweep itself
//! lives in the library crates.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use imgsweep_config::{constants, Config};
use imgsweep_events::{EventReceiver, EventSender};
use imgsweep_ops::{OperationResult, OpsContextBuilder, OpsCtx};
use imgsweep_types::{ColorChoice, OutputFormat};
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting imgsweep v{}", env!("CARGO_PKG_VERSION"));

    // Configuration precedence: file (or defaults) < environment < CLI flags
    let mut config = Config::load_or_default(&cli.global.config).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global, &cli.command);

    let (event_sender, event_receiver) = imgsweep_events::channel();
    let ops_ctx = build_ops_context(event_sender, config.clone())?;

    let output_format = config.general.default_output;
    let renderer = OutputRenderer::new(output_format, config.general.color);

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(
        colors_enabled,
        cli.global.debug,
        output_format == OutputFormat::Json,
    );

    let result =
        execute_command_with_events(cli.command, ops_ctx, event_receiver, &mut event_handler)
            .await?;

    renderer.render_result(&result)?;

    info!(all_items_succeeded = result.is_success(), "Command completed");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Sweep { check, .. } => {
            let report = imgsweep_ops::sweep(&ctx, check).await?;
            Ok(OperationResult::SweepReport(report))
        }
        Commands::Refs { .. } => {
            let report = imgsweep_ops::references(&ctx).await?;
            Ok(OperationResult::References(report))
        }
    }
}

/// Build operations context with all required components
fn build_ops_context(event_sender: EventSender, config: Config) -> Result<OpsCtx, CliError> {
    let ctx = OpsContextBuilder::new()
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;

    Ok(ctx)
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Some(log_file) = create_log_file(json_mode) {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::sync::Mutex::new(log_file))
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                        tracing_subscriber::EnvFilter::new("info,imgsweep=debug")
                    }),
                )
                .init();
            return;
        }
    }

    if json_mode {
        // Keep stdout machine-readable
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode (or no log file available): minimal logging to stderr
        let default_filter = if debug_enabled {
            "info,imgsweep=debug"
        } else {
            "warn"
        };
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
            )
            .init();
    }
}

/// Open a timestamped log file in the log directory
fn create_log_file(quiet: bool) -> Option<std::fs::File> {
    let Some(log_dir) = constants::logs_dir() else {
        if !quiet {
            eprintln!("Warning: No data directory available for log files");
        }
        return None;
    };
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        if !quiet {
            eprintln!("Warning: Failed to create log directory: {e}");
        }
        return None;
    }

    let log_file = log_dir.join(format!(
        "imgsweep-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match std::fs::File::create(&log_file) {
        Ok(file) => {
            if !quiet {
                eprintln!("Debug logging enabled: {}", log_file.display());
            }
            Some(file)
        }
        Err(e) => {
            if !quiet {
                eprintln!("Warning: Failed to create log file: {e}");
            }
            None
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &Commands) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
    if let Some(vault) = command.vault() {
        config.sweep.vault_root = Some(vault.clone());
    }
}
