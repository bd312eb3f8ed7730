// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Guard Integration Tests
//!
//! Navigation decisions driven through a full client.
//!
//! - `test_nav_*`: Redirect rules per session state
//! - `test_title_*`: Document titles
//! - `test_custom_*`: Custom route tables and redirect targets

use std::sync::Arc;
use std::time::Duration;

use quill_client::guard::{Route, RouteMeta};
use quill_client::{NavigationDecision, QuillClient, RedirectReason, Role, RouteTable};
use quill_config::RoutesConfig;
use quill_tests::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

fn signed_out(api: Arc<MockAuthApi>) -> QuillClient {
    QuillClient::builder().api(api).build().expect("Failed to build client")
}

async fn signed_in(role: Role) -> QuillClient {
    let user = match role {
        Role::Admin => UserFixtures::admin(),
        _ => UserFixtures::reader(),
    };
    let api = MockAuthApi::new()
        .with_login(Some(TokenFixtures::valid(1, role)), user)
        .with_role(role);
    let client = signed_out(Arc::new(api));
    client.login("blog_admin", "secret1").await.expect("login failed");
    client
}

fn redirect_of(decision: &NavigationDecision) -> (String, RedirectReason) {
    let redirect = decision.redirect().expect("expected a redirect");
    (redirect.to_url(), redirect.reason)
}

// =============================================================================
// Redirect Rules
// =============================================================================

#[tokio::test]
async fn test_nav_public_routes_always_allowed() {
    let client = signed_out(Arc::new(MockAuthApi::new()));
    for path in ["/", "/about", "/articles", "/article/42", "/403", "/does/not/exist"] {
        assert!(client.navigate(path).await.is_allowed(), "{} should be allowed", path);
    }
}

#[tokio::test]
async fn test_nav_signed_out_protected_route() {
    let client = signed_out(Arc::new(MockAuthApi::new()));

    let decision = client.navigate("/settings").await;
    assert_eq!(
        redirect_of(&decision),
        ("/login?redirect=/settings".to_string(), RedirectReason::LoginRequired)
    );

    let decision = client.navigate("/profile?tab=posts").await;
    assert_eq!(
        redirect_of(&decision).0,
        "/login?redirect=/profile%3Ftab%3Dposts"
    );
}

#[tokio::test]
async fn test_nav_signed_out_admin_goes_to_login() {
    let api = Arc::new(MockAuthApi::new().with_role(Role::Admin));
    let client = signed_out(api.clone());

    let decision = client.navigate("/admin").await;
    assert_eq!(redirect_of(&decision).1, RedirectReason::LoginRequired);
    assert_eq!(api.role_calls(), 0);
}

#[tokio::test]
async fn test_nav_guest_routes_bounce_signed_in() {
    let client = signed_in(Role::User).await;

    for path in ["/login", "/register", "/login?redirect=/settings"] {
        let decision = client.navigate(path).await;
        assert_eq!(
            redirect_of(&decision),
            ("/".to_string(), RedirectReason::GuestOnly)
        );
    }
    assert!(client.navigate("/settings").await.is_allowed());
}

#[tokio::test]
async fn test_nav_admin_route_by_role() {
    let user = signed_in(Role::User).await;
    let decision = user.navigate("/admin").await;
    assert_eq!(
        redirect_of(&decision),
        ("/403".to_string(), RedirectReason::AdminRequired)
    );

    let admin = signed_in(Role::Admin).await;
    match admin.navigate("/admin").await {
        NavigationDecision::Allow(route) => {
            assert_eq!(route.name.as_deref(), Some("Admin"));
        }
        other => panic!("expected allow, got {:?}", other),
    }
}

#[tokio::test]
async fn test_nav_admin_route_uses_role_cache() {
    let api = Arc::new(MockAuthApi::new().with_role(Role::Admin));
    let client = QuillClient::builder()
        .api(api.clone())
        .build()
        .unwrap();
    let store = client.token_store();
    store.save(&UserFixtures::admin()).unwrap();
    client.init().await;
    let after_init = api.role_calls();

    for _ in 0..3 {
        assert!(client.navigate("/admin").await.is_allowed());
    }
    assert_eq!(api.role_calls(), after_init);
}

#[tokio::test]
async fn test_nav_admin_route_fails_closed_when_offline() {
    let api = Arc::new(MockAuthApi::new().with_role(Role::Admin));
    let client = QuillClient::builder()
        .api(api.clone())
        .validate_on_init(false)
        .build()
        .unwrap();
    client.token_store().save(&UserFixtures::admin()).unwrap();
    client.init().await;
    api.set_offline(true);

    let decision = client.navigate("/admin").await;
    assert_eq!(redirect_of(&decision).1, RedirectReason::AdminRequired);
}

#[tokio::test]
async fn test_nav_logout_then_protected() {
    let client = signed_in(Role::User).await;
    assert!(client.navigate("/profile").await.is_allowed());

    client.logout().await.unwrap();
    assert_eq!(
        redirect_of(&client.navigate("/profile").await).1,
        RedirectReason::LoginRequired
    );
}

#[tokio::test(start_paused = true)]
async fn test_nav_later_navigation_wins() {
    let api = Arc::new(
        MockAuthApi::new()
            .with_role(Role::Admin)
            .with_role_delay(Duration::from_secs(1)),
    );
    let client = Arc::new(
        QuillClient::builder()
            .api(api)
            .validate_on_init(false)
            .build()
            .unwrap(),
    );
    client.token_store().save(&UserFixtures::admin()).unwrap();
    client.init().await;

    let slow = {
        let client = client.clone();
        tokio::spawn(async move { client.navigate("/admin").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let fast = client.navigate("/about").await;

    assert!(fast.is_allowed());
    assert_eq!(slow.await.unwrap(), NavigationDecision::Superseded);
    assert_eq!(client.guard().document_title(), "About Me - My Blog");
}

// =============================================================================
// Titles
// =============================================================================

#[tokio::test]
async fn test_title_follows_navigation() {
    let client = signed_out(Arc::new(MockAuthApi::new()));
    assert_eq!(client.guard().document_title(), "My Blog");

    client.navigate("/article/7").await;
    assert_eq!(client.guard().document_title(), "Article - My Blog");

    client.navigate("/settings").await;
    assert_eq!(client.guard().document_title(), "Settings - My Blog");

    client.navigate("/missing").await;
    assert_eq!(client.guard().document_title(), "Page Not Found - My Blog");
}

// =============================================================================
// Custom Tables
// =============================================================================

#[tokio::test]
async fn test_custom_routes_config() {
    let routes = RoutesConfig {
        site_title: "Notes".to_string(),
        login_path: "/signin".to_string(),
        redirect_param: "next".to_string(),
        ..RoutesConfig::default()
    };
    let client = QuillClient::builder()
        .api(Arc::new(MockAuthApi::new()))
        .routes(routes)
        .build()
        .unwrap();

    let decision = client.navigate("/settings").await;
    assert_eq!(redirect_of(&decision).0, "/signin?next=/settings");
    assert_eq!(client.guard().document_title(), "Settings - Notes");
}

#[tokio::test]
async fn test_custom_table_inherits_meta() {
    let table = RouteTable::new(vec![
        Route::new("/", "Home"),
        Route::layout(
            "/dashboard",
            vec![
                Route::new("", "Dashboard").meta(RouteMeta::new().title("Dashboard")),
                Route::new("drafts/:draftId", "Draft").meta(RouteMeta::new().title("Draft")),
            ],
        )
        .meta(RouteMeta::new().requires_auth()),
    ]);
    let client = QuillClient::builder()
        .api(Arc::new(MockAuthApi::new()))
        .route_table(table)
        .build()
        .unwrap();

    assert!(client.navigate("/").await.is_allowed());
    assert_eq!(
        redirect_of(&client.navigate("/dashboard").await).1,
        RedirectReason::LoginRequired
    );
    assert_eq!(
        redirect_of(&client.navigate("/dashboard/drafts/3").await),
        (
            "/login?redirect=/dashboard/drafts/3".to_string(),
            RedirectReason::LoginRequired
        )
    );
    // No catch-all: unknown paths pass through.
    assert!(client.navigate("/elsewhere").await.is_allowed());
}
