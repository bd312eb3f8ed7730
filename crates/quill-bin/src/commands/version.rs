// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use serde_json::json;

use super::emit;
use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(cli: &Cli) -> BinResult<()> {
    let value = json!({
        "quill-bin": env!("CARGO_PKG_VERSION"),
        "quill-client": quill_client::VERSION,
        "quill-config": quill_config::VERSION,
        "arch": std::env::consts::ARCH,
        "os": std::env::consts::OS,
    });

    emit(cli, &value, || {
        [
            "Quill - blog client authentication".to_string(),
            String::new(),
            "Version Information:".to_string(),
            format!("  quill-bin:    {}", env!("CARGO_PKG_VERSION")),
            format!("  quill-client: {}", quill_client::VERSION),
            format!("  quill-config: {}", quill_config::VERSION),
            String::new(),
            "Build Information:".to_string(),
            "  Rust Edition: 2024".to_string(),
            format!("  Target:       {}", std::env::consts::ARCH),
            format!("  OS:           {}", std::env::consts::OS),
            String::new(),
            "License: PolyForm Noncommercial License 1.0.0".to_string(),
            "Copyright (c) 2025 Sylvex. All rights reserved.".to_string(),
        ]
        .join("\n")
    })
}
