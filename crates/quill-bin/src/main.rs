// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Quill - blog client authentication CLI
//!
//! Main binary entry point.

use quill_bin::error::{report_error_and_exit, BinError};
use quill_bin::{commands, init_logging, Cli};

fn main() {
    let cli = Cli::parse_args();

    // Flags win over the config file's logging section.
    let logging = commands::load_config(&cli)
        .map(|config| config.logging)
        .unwrap_or_default();
    let level = cli
        .effective_log_level()
        .unwrap_or(logging.level.as_str())
        .to_string();
    init_logging(&level, cli.log_format.unwrap_or(logging.format.into()));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => report_error_and_exit(BinError::init(format!("failed to start runtime: {}", e))),
    };

    if let Err(e) = runtime.block_on(commands::execute(cli)) {
        report_error_and_exit(e);
    }
}
