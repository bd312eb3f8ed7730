// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use quill_config::{QuillConfig, StorageBackend, TokenSource};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::Configuration(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = quill_config::load_config(config_path).map_err(|e| {
        BinError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    let warnings = collect_warnings(&config);

    match cli.output {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  API:            {}", config.api.api_base_url());
            println!("  Timeout:        {}", display_duration(config.api.timeout));
            println!("  Role cache TTL: {}", display_duration(config.auth.role_cache_ttl));
            println!("  Token source:   {:?}", config.auth.token_source);
            println!("  Storage:        {:?} ({})", config.storage.backend, config.storage.path.display());
            println!("  Site title:     {}", config.routes.site_title);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!(
                    "{}",
                    serde_json::to_string_pretty(&config)
                        .unwrap_or_else(|_| "(serialization error)".to_string())
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "api_base_url": config.api.api_base_url(),
                    "token_source": format!("{:?}", config.auth.token_source).to_lowercase(),
                    "storage_backend": format!("{:?}", config.storage.backend).to_lowercase(),
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            let rendered = serde_json::to_string_pretty(&output)
                .map_err(|e| BinError::runtime(e.to_string()))?;
            println!("{}", rendered);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::Configuration(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Returns non-fatal configuration issues.
pub fn collect_warnings(config: &QuillConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.api.base_url.starts_with("http://")
        && !config.api.base_url.contains("localhost")
        && !config.api.base_url.contains("127.0.0.1")
    {
        warnings.push("API base URL is not HTTPS; credentials are sent in clear text".to_string());
    }

    if config.auth.token_source == TokenSource::Cookie && config.storage.cookie.is_none() {
        warnings.push("Cookie token source selected but storage.cookie is not set".to_string());
    }

    if config.storage.backend == StorageBackend::Memory {
        warnings.push("Memory storage selected; sessions will not survive between runs".to_string());
    }

    if !config.auth.validate_on_init {
        warnings.push("Startup validation disabled; stored sessions are trusted as-is".to_string());
    }

    warnings
}

fn display_duration(duration: std::time::Duration) -> String {
    format!("{:?}", duration)
}
