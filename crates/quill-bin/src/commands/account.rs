// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account commands: `login`, `register`, `logout`, `refresh`, `forgot-password`.

use serde_json::json;
use tracing::info;

use super::{build_client, emit};
use crate::cli::{Cli, ForgotPasswordArgs, LoginArgs, RegisterArgs};
use crate::error::BinResult;

/// Signs in and persists the session.
pub async fn login(cli: &Cli, args: LoginArgs) -> BinResult<()> {
    let client = build_client(cli)?;
    let user = client.login(&args.username, &args.password).await?;
    info!(username = %args.username, "Signed in");

    emit(cli, &user, || {
        format!(
            "Signed in as {}",
            user.username.as_deref().unwrap_or(&args.username)
        )
    })
}

/// Creates an account.
pub async fn register(cli: &Cli, args: RegisterArgs) -> BinResult<()> {
    let client = build_client(cli)?;
    let created = client
        .register(&args.username, &args.email, &args.password)
        .await?;

    emit(cli, &json!({ "registered": true, "user": created }), || {
        format!("Account {} created, you can now sign in", args.username)
    })
}

/// Signs out.
pub async fn logout(cli: &Cli) -> BinResult<()> {
    let client = build_client(cli)?;
    client.logout().await?;
    emit(cli, &json!({ "signedOut": true }), || "Signed out".to_string())
}

/// Refreshes the credential.
pub async fn refresh(cli: &Cli) -> BinResult<()> {
    let client = build_client(cli)?;
    let token = client.refresh().await?;
    let info = client.inspector().token_info();

    emit(cli, &json!({ "refreshed": true, "token": info }), || {
        match info.as_ref().and_then(|i| i.exp) {
            Some(exp) => format!("Credential refreshed, expires at {}", exp),
            None => format!("Credential refreshed ({} bytes)", token.len()),
        }
    })
}

/// Requests a password reset email.
pub async fn forgot_password(cli: &Cli, args: ForgotPasswordArgs) -> BinResult<()> {
    let client = build_client(cli)?;
    client.forgot_password(&args.email).await?;
    emit(cli, &json!({ "sent": true, "email": args.email }), || {
        format!("Password reset email sent to {}", args.email)
    })
}
