// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stayflow - an AI guest-messaging platform for hospitality teams.
//!
//! Binary entry point: config loading, logging setup, and the operator CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod approvals;
mod doctor;
mod simulate;
mod wiring;

use clap::{Parser, Subcommand};
use stayflow_core::types::Channel;
use tracing_subscriber::EnvFilter;

/// Stayflow - an AI guest-messaging platform for hospitality teams.
#[derive(Parser, Debug)]
#[command(name = "stayflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive one guest message through the full pipeline with the built-in
    /// keyword responder.
    Simulate {
        /// Channel the message arrives on.
        #[arg(long, default_value = "whatsapp")]
        channel: Channel,
        /// Channel identity of the sender (phone number, email, session id).
        #[arg(long)]
        from: String,
        /// The guest message text.
        message: String,
    },
    /// Inspect and decide pending approval items.
    Approvals {
        #[command(subcommand)]
        command: approvals::ApprovalsCommand,
    },
    /// Print the effective configuration as TOML.
    Config,
    /// Check configuration and storage health.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match stayflow_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            stayflow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone())),
        )
        .init();

    let result = match cli.command {
        Some(Commands::Simulate {
            channel,
            from,
            message,
        }) => simulate::run(&config, channel, &from, &message).await,
        Some(Commands::Approvals { command }) => approvals::run(&config, command).await,
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => {
                    println!("{rendered}");
                    Ok(())
                }
                Err(e) => Err(stayflow_core::StayflowError::Internal(format!(
                    "config rendering failed: {e}"
                ))),
            }
        }
        Some(Commands::Doctor) => doctor::run(&config).await,
        None => {
            println!("stayflow: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("stayflow: {e}");
        std::process::exit(1);
    }
}
