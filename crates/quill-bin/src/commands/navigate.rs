// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `navigate` command.

use quill_client::NavigationDecision;
use serde_json::json;

use super::{build_client, emit};
use crate::cli::{Cli, NavigateArgs};
use crate::error::BinResult;

/// Runs the route guard for a path and prints the decision.
pub async fn navigate(cli: &Cli, args: NavigateArgs) -> BinResult<()> {
    let client = build_client(cli)?;
    client.init().await;

    let decision = client.navigate(&args.path).await;
    let title = client.guard().document_title();

    let (value, text) = match &decision {
        NavigationDecision::Allow(route) => (
            json!({
                "decision": "allow",
                "route": route.name,
                "params": route.params,
                "title": title,
            }),
            format!(
                "allow {} ({})",
                route.path,
                route.name.as_deref().unwrap_or("unnamed")
            ),
        ),
        NavigationDecision::Redirect(redirect) => (
            json!({
                "decision": "redirect",
                "to": redirect.to_url(),
                "reason": format!("{:?}", redirect.reason),
                "title": title,
            }),
            format!("redirect {} -> {}", args.path, redirect.to_url()),
        ),
        NavigationDecision::Superseded => (
            json!({ "decision": "superseded" }),
            "superseded".to_string(),
        ),
    };

    emit(cli, &value, || format!("{}\ntitle: {}", text, title))
}
