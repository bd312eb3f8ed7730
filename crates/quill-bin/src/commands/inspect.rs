// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Inspection commands: `whoami`, `role`, `decode`.

use chrono::Utc;
use quill_client::auth::decode as decode_token;
use quill_client::{AuthPhase, RequiredRole};
use serde_json::json;

use super::{build_client, emit, load_config};
use crate::cli::{Cli, DecodeArgs, RoleArgs, WhoamiArgs};
use crate::error::{BinError, BinResult};

/// Shows the signed-in user.
pub async fn whoami(cli: &Cli, args: WhoamiArgs) -> BinResult<()> {
    let client = build_client(cli)?;
    let snapshot = client.init().await;

    if snapshot.phase() != AuthPhase::Authenticated {
        return emit(cli, &json!({ "signedIn": false }), || "Not signed in".to_string());
    }

    let user = if args.remote {
        client.refresh_user().await?
    } else {
        client.session().user().unwrap_or_default()
    };
    let session = client.session();

    emit(
        cli,
        &json!({ "signedIn": true, "user": user, "avatar": session.avatar() }),
        || {
            let mut lines = vec![format!("Signed in as {}", session.username())];
            if let Some(id) = user.id {
                lines.push(format!("  ID:     {}", id));
            }
            if let Some(email) = &user.email {
                lines.push(format!("  Email:  {}", email));
            }
            if let Some(role) = user.role {
                lines.push(format!("  Role:   {}", role));
            }
            lines.push(format!("  Avatar: {}", session.avatar()));
            lines.join("\n")
        },
    )
}

/// Shows the current role.
pub async fn role(cli: &Cli, args: RoleArgs) -> BinResult<()> {
    let client = build_client(cli)?;
    client.init().await;
    let info = client.roles().role_info().await;

    emit(cli, &info, || match info.role {
        Some(role) => format!("{} (code {})", info.role_name, role.code()),
        None => info.role_name.clone(),
    })?;

    if let Some(required) = args.require.map(RequiredRole::from) {
        if !info.satisfies(required) {
            return Err(BinError::denied(format!(
                "role {} does not satisfy {}",
                info.role_name, required
            )));
        }
    }
    Ok(())
}

/// Shows the claims of a token.
pub fn decode(cli: &Cli, args: DecodeArgs) -> BinResult<()> {
    let token = match args.token {
        Some(token) => token,
        None => {
            let config = load_config(cli)?;
            let client = quill_client::QuillClient::from_config(&config)?;
            client
                .inspector()
                .token()
                .ok_or_else(|| BinError::runtime("no stored credential to decode"))?
        }
    };

    let claims = decode_token(&token)?;
    let now = Utc::now().timestamp();
    let expired = claims.is_expired_at(now);

    emit(
        cli,
        &json!({ "claims": claims, "isExpired": expired }),
        || {
            let mut lines = Vec::new();
            lines.push(format!(
                "User ID:  {}",
                claims.user_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into())
            ));
            lines.push(format!(
                "Role:     {}",
                claims.role.map(|r| r.to_string()).unwrap_or_else(|| "-".into())
            ));
            lines.push(format!(
                "Issued:   {}",
                claims.issued_at().map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into())
            ));
            lines.push(format!(
                "Expires:  {}",
                claims.expires_at().map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into())
            ));
            match claims.seconds_left_at(now) {
                Some(left) if !expired => lines.push(format!("Status:   valid, {}s left", left)),
                _ => lines.push("Status:   expired".to_string()),
            }
            lines.push("Signature not verified.".to_string());
            lines.join("\n")
        },
    )
}
