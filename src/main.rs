use std::{
    fs::OpenOptions,
    path::PathBuf,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::{anyhow, Result};
use candy_mint::{
    cli::{Cli, Commands},
    constants::{COMPLETE_EMOJI, ERROR_EMOJI, LOG_FILE},
    mint::{process_mint, MintArgs},
    parse::parse_mint_errors,
    show::{process_show, ShowArgs},
    utils::Interrupt,
};
use clap::Parser;
use console::style;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{self, filter::LevelFilter, prelude::*, EnvFilter};

fn setup_logging(level: Option<EnvFilter>) -> Result<()> {
    // Log in current directory for now.
    let log_path = PathBuf::from(LOG_FILE);

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Prioritize user-provided level, otherwise read from RUST_LOG env var for log level, fall back to "trace" if not set.
    let env_filter = if let Some(filter) = level {
        filter
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"))
    };

    let formatting_layer = BunyanFormattingLayer::new("candy-mint".into(), file);
    let level_filter = LevelFilter::from_str(&env_filter.to_string())?;

    let subscriber = tracing_subscriber::registry()
        .with(formatting_layer.with_filter(level_filter))
        .with(JsonStorageLayer);

    set_global_default(subscriber)
        .map_err(|err| anyhow!("Failed to set global default subscriber: {}", err))?;

    Ok(())
}

#[tokio::main(worker_threads = 4)]
async fn main() {
    match run().await {
        Ok(()) => {
            println!(
                "\n{}{}",
                COMPLETE_EMOJI,
                style("Command successful.").green().bold().dim()
            );
        }
        Err(err) => {
            let parsed_err = parse_mint_errors(&format!("{:#}", err));

            println!(
                "\n{}{} {}",
                ERROR_EMOJI,
                style("Error running command:").red(),
                parsed_err,
            );
            // finished the program with an error code to the OS
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    solana_logger::setup_with_default("solana=off");

    let cli = Cli::parse();

    if let Some(user_filter) = cli.log_level {
        let filter = EnvFilter::from_str(&user_filter).map_err(|_| {
            anyhow!(
                "Invalid log level: {:?}.\n Valid levels are: trace, debug, info, warn, error.",
                user_filter
            )
        })?;
        setup_logging(Some(filter))?;
    } else {
        setup_logging(None)?;
    }

    tracing::info!("Starting candy-mint {}", env!("CARGO_PKG_VERSION"));

    let interrupt = Arc::new(Interrupt::new());
    let ctrl_handler = interrupt.clone();
    let pressed = AtomicBool::new(false);

    ctrlc::set_handler(move || {
        if pressed.swap(true, Ordering::SeqCst) {
            // we really need to exit
            println!(
                "\n\n{}{} Operation aborted.",
                ERROR_EMOJI,
                style("Error running command:").red(),
            );
            // finished the program with an error code to the OS
            std::process::exit(1);
        }
        // signal that we want to exit
        ctrl_handler.trigger();
    })?;

    match cli.command {
        Commands::Show {
            keypair,
            rpc_url,
            config,
        } => process_show(ShowArgs {
            keypair,
            rpc_url,
            config,
        })?,
        Commands::Mint {
            keypair,
            rpc_url,
            config,
            wait,
            number,
        } => {
            process_mint(MintArgs {
                keypair,
                rpc_url,
                config,
                wait,
                number,
                interrupt,
            })
            .await?
        }
    }

    Ok(())
}
