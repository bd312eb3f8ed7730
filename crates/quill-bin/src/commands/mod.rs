// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod account;
mod inspect;
mod navigate;
mod validate;
mod version;

use quill_client::QuillClient;
use quill_config::{ConfigFormat, ConfigLoader, QuillConfig};
use serde::Serialize;
use tracing::debug;

pub use account::{forgot_password, login, logout, refresh, register};
pub use inspect::{decode, role, whoami};
pub use navigate::navigate;
pub use validate::validate;
pub use version::version;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::error::{BinError, BinResult};

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.command.clone() {
        Commands::Login(args) => account::login(&cli, args).await,
        Commands::Register(args) => account::register(&cli, args).await,
        Commands::Logout => account::logout(&cli).await,
        Commands::Refresh => account::refresh(&cli).await,
        Commands::ForgotPassword(args) => account::forgot_password(&cli, args).await,
        Commands::Whoami(args) => inspect::whoami(&cli, args).await,
        Commands::Role(args) => inspect::role(&cli, args).await,
        Commands::Decode(args) => inspect::decode(&cli, args),
        Commands::Navigate(args) => navigate::navigate(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Version => version::version(&cli),
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Loads the configuration file, or the defaults when it does not exist.
pub fn load_config(cli: &Cli) -> BinResult<QuillConfig> {
    let loader = ConfigLoader::new();
    if cli.config.exists() {
        loader
            .load(&cli.config)
            .map_err(|e| BinError::from(e).with_context(format!("loading {}", cli.config.display())))
    } else {
        debug!(path = %cli.config.display(), "No configuration file, using defaults");
        Ok(loader.load_from_str("", ConfigFormat::Yaml)?)
    }
}

/// Builds a client from the configuration.
pub fn build_client(cli: &Cli) -> BinResult<QuillClient> {
    let config = load_config(cli)?;
    QuillClient::from_config(&config)
        .map_err(|e| BinError::from(e).with_context("building client"))
}

/// Prints `value` as JSON, or `text` in text mode.
pub(crate) fn emit<T: Serialize>(cli: &Cli, value: &T, text: impl FnOnce() -> String) -> BinResult<()> {
    match cli.output {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| BinError::runtime(format!("failed to render output: {}", e)))?;
            println!("{}", json);
        }
    }
    Ok(())
}
