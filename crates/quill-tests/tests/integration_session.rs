// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! - `test_init_*`: Restoring a stored session at startup
//! - `test_login_*` / `test_logout_*`: Client sign-in and sign-out flows
//! - `test_profile_*`: Profile and avatar updates
//! - `test_persist_*`: File-backed sessions across client instances
//! - `prop_*`: The signed-in flag never disagrees with the user record

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use quill_client::storage::{KeyValueStore, TokenStore, USER_INFO_KEY};
use quill_client::{
    AuthPhase, ClientError, FileStore, MemoryStore, QuillClient, Role, UserInfo,
};
use quill_tests::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

fn client_with(api: Arc<MockAuthApi>, store: TokenStore) -> QuillClient {
    QuillClient::builder()
        .api(api)
        .token_store(store)
        .build()
        .expect("Failed to build client")
}

fn memory_store() -> TokenStore {
    TokenStore::new(Arc::new(MemoryStore::new()))
}

// =============================================================================
// Startup
// =============================================================================

#[tokio::test]
async fn test_init_without_record_is_anonymous() {
    let api = Arc::new(MockAuthApi::new().with_role(Role::User));
    let client = client_with(api.clone(), memory_store());
    assert_eq!(client.session().phase(), AuthPhase::Uninitialized);

    let snapshot = client.init().await;
    assert_eq!(snapshot.phase(), AuthPhase::Anonymous);
    assert!(!snapshot.is_logged_in());
    assert!(!snapshot.loading());
    assert_eq!(api.role_calls(), 0);
}

#[tokio::test]
async fn test_init_restores_validated_session() {
    init_test_logging();
    let store = memory_store();
    store.save_token(&TokenFixtures::valid(7, Role::User)).unwrap();
    store.save(&UserFixtures::reader()).unwrap();

    let api = Arc::new(MockAuthApi::new().with_role(Role::User));
    let client = client_with(api.clone(), store);

    let snapshot = client.init().await;
    assert_eq!(snapshot.phase(), AuthPhase::Authenticated);
    assert_eq!(snapshot.user(), Some(&UserFixtures::reader()));
    assert_eq!(client.session().username(), "ada_reader");
    assert_eq!(api.role_calls(), 1);
}

#[tokio::test]
async fn test_init_rejected_session_is_purged() {
    let store = memory_store();
    store.save_token(&TokenFixtures::expired(7, Role::User)).unwrap();
    store.save(&UserFixtures::reader()).unwrap();

    let api = Arc::new(MockAuthApi::new());
    let client = client_with(api, store.clone());

    let snapshot = client.init().await;
    assert_eq!(snapshot.phase(), AuthPhase::Anonymous);
    assert!(store.token().unwrap().is_none());
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_init_offline_signs_out() {
    let store = memory_store();
    store.save_token(&TokenFixtures::valid(7, Role::User)).unwrap();
    store.save(&UserFixtures::reader()).unwrap();

    let api = Arc::new(MockAuthApi::new().with_role(Role::User));
    api.set_offline(true);
    let client = client_with(api, store);

    assert_eq!(client.init().await.phase(), AuthPhase::Anonymous);
}

#[tokio::test]
async fn test_init_without_validation_trusts_record() {
    let store = memory_store();
    store.save(&UserFixtures::admin()).unwrap();

    let api = Arc::new(MockAuthApi::new());
    let client = QuillClient::builder()
        .api(api.clone())
        .token_store(store)
        .validate_on_init(false)
        .build()
        .unwrap();

    assert!(client.init().await.is_logged_in());
    assert_eq!(api.role_calls(), 0);
}

#[tokio::test]
async fn test_init_corrupt_record_is_discarded() {
    let backing = Arc::new(MemoryStore::new());
    backing.set(USER_INFO_KEY, "{not json").unwrap();
    let store = TokenStore::new(backing.clone());

    let api = Arc::new(MockAuthApi::new().with_role(Role::User));
    let client = client_with(api, store);

    assert_eq!(client.init().await.phase(), AuthPhase::Anonymous);
    assert!(backing.get(USER_INFO_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_init_restores_loosely_typed_record() {
    let backing = Arc::new(MemoryStore::new());
    backing
        .set(
            USER_INFO_KEY,
            r#"{"id":"7","username":"ada_reader","role":"owner","avatarUrl":null}"#,
        )
        .unwrap();
    let store = TokenStore::new(backing.clone());
    let token = TokenFixtures::valid(7, Role::User);
    store.save_token(&token).unwrap();

    let api = Arc::new(MockAuthApi::new().with_role(Role::User));
    let client = client_with(api, store.clone());

    let snapshot = client.init().await;
    assert_eq!(snapshot.phase(), AuthPhase::Authenticated);
    let user = snapshot.user().unwrap();
    assert_eq!(user.id, Some(7));
    assert_eq!(user.role, None);
    assert_eq!(user.extra["role"], "owner");
    assert_eq!(client.session().username(), "ada_reader");
    assert_eq!(store.token().unwrap(), Some(token));
}

#[tokio::test]
async fn test_init_publishes_to_subscribers() {
    let api = Arc::new(MockAuthApi::new().with_role(Role::User));
    let client = client_with(api, memory_store());
    let mut rx = client.session().subscribe();

    client.init().await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().phase(), AuthPhase::Anonymous);
}

#[tokio::test(start_paused = true)]
async fn test_init_login_during_probe_wins() {
    let token = TokenFixtures::valid(1, Role::Admin);
    let store = memory_store();
    store.save(&UserInfo::new(3, "old_user")).unwrap();

    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(token.clone()), UserFixtures::admin())
            .with_role(Role::Admin)
            .with_role_delay(Duration::from_secs(1)),
    );
    let client = Arc::new(client_with(api, store.clone()));

    let restore = {
        let client = client.clone();
        tokio::spawn(async move { client.init().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    client.login("blog_admin", "secret1").await.unwrap();

    let snapshot = restore.await.unwrap();
    assert_eq!(snapshot.phase(), AuthPhase::Authenticated);
    assert_eq!(client.session().username(), "blog_admin");
    assert_eq!(store.token().unwrap(), Some(token));
    assert_eq!(store.load().unwrap(), Some(UserFixtures::admin()));
}

#[tokio::test(start_paused = true)]
async fn test_init_logout_during_probe_wins() {
    let store = memory_store();
    store.save(&UserFixtures::reader()).unwrap();

    let api = Arc::new(
        MockAuthApi::new()
            .with_role(Role::User)
            .with_role_delay(Duration::from_secs(1)),
    );
    let client = Arc::new(client_with(api, store.clone()));

    let restore = {
        let client = client.clone();
        tokio::spawn(async move { client.init().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    client.logout().await.unwrap();

    assert_eq!(restore.await.unwrap().phase(), AuthPhase::Anonymous);
    assert!(!client.session().is_logged_in());
    assert!(store.load().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_init_probes_again_after_cache_clear() {
    let store = memory_store();
    store.save(&UserFixtures::reader()).unwrap();

    let api = Arc::new(
        MockAuthApi::new()
            .with_role(Role::User)
            .with_role_delay(Duration::from_secs(1)),
    );
    let client = Arc::new(client_with(api.clone(), store.clone()));

    let restore = {
        let client = client.clone();
        tokio::spawn(async move { client.init().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    client.roles().clear_cache();

    assert_eq!(restore.await.unwrap().phase(), AuthPhase::Authenticated);
    assert_eq!(api.role_calls(), 2);
    assert_eq!(store.load().unwrap(), Some(UserFixtures::reader()));
}

// =============================================================================
// Login / Logout
// =============================================================================

#[tokio::test]
async fn test_login_persists_session() {
    let token = TokenFixtures::valid(7, Role::User);
    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(token.clone()), UserFixtures::reader())
            .with_role(Role::User),
    );
    let store = memory_store();
    let client = client_with(api, store.clone());
    client.init().await;

    let user = client.login("ada_reader", "secret1").await.unwrap();
    assert_eq!(user, UserFixtures::reader());
    assert!(client.session().is_logged_in());
    assert_eq!(store.token().unwrap(), Some(token));
    assert_eq!(store.load().unwrap(), Some(UserFixtures::reader()));
    assert_eq!(client.inspector().user_id_from_token(), Some(7));
}

#[tokio::test]
async fn test_login_fills_profile_from_claims() {
    let token = TokenFixtures::valid(12, Role::Admin);
    let api = Arc::new(MockAuthApi::new().with_login(Some(token), UserInfo::default()));
    let client = client_with(api, memory_store());

    let user = client.login("new_admin", "secret1").await.unwrap();
    assert_eq!(user.id, Some(12));
    assert_eq!(user.role, Some(Role::Admin));
    assert_eq!(user.username.as_deref(), Some("new_admin"));
}

#[tokio::test]
async fn test_login_rejected_keeps_state() {
    let api = Arc::new(MockAuthApi::new());
    let store = memory_store();
    let client = client_with(api, store.clone());
    client.init().await;

    let err = client.login("ada_reader", "wrong99").await.unwrap_err();
    assert!(err.is_application());
    assert_eq!(err.user_message(), BAD_CREDENTIALS);
    assert!(!client.session().is_logged_in());
    assert!(store.token().unwrap().is_none());
}

#[tokio::test]
async fn test_login_validation_skips_backend() {
    let api = Arc::new(MockAuthApi::new());
    let client = client_with(api.clone(), memory_store());

    let err = client.login("ab", "secret1").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
    let err = client.login("ada_reader", "letters").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
    assert_eq!(api.calls("login"), 0);
}

#[tokio::test]
async fn test_login_without_token_fails() {
    let api = Arc::new(MockAuthApi::new().with_login(None, UserFixtures::reader()));
    let client = client_with(api, memory_store());

    let err = client.login("ada_reader", "secret1").await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse { .. }));
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn test_login_resets_role_cache() {
    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(TokenFixtures::valid(1, Role::Admin)), UserFixtures::admin())
            .with_role(Role::User),
    );
    let client = client_with(api.clone(), memory_store());

    assert!(!client.roles().is_admin().await);
    api.set_role(Some(Role::Admin));
    client.login("blog_admin", "secret1").await.unwrap();
    assert!(client.roles().is_admin().await);
    assert_eq!(api.role_calls(), 2);
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(TokenFixtures::valid(7, Role::User)), UserFixtures::reader())
            .with_role(Role::User),
    );
    let store = memory_store();
    let client = client_with(api.clone(), store.clone());
    client.login("ada_reader", "secret1").await.unwrap();
    assert!(client.roles().is_user().await);

    client.logout().await.unwrap();
    assert_eq!(client.session().phase(), AuthPhase::Anonymous);
    assert!(client.session().user().is_none());
    assert!(store.token().unwrap().is_none());
    assert!(store.load().unwrap().is_none());
    assert!(client.roles().cached_role().is_none());
    assert_eq!(api.calls("logout"), 1);
}

#[tokio::test]
async fn test_logout_survives_backend_failure() {
    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(TokenFixtures::valid(7, Role::User)), UserFixtures::reader())
            .failing_logout(),
    );
    let client = client_with(api, memory_store());
    client.login("ada_reader", "secret1").await.unwrap();

    client.logout().await.unwrap();
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn test_refresh_replaces_token() {
    let fresh = TokenFixtures::valid(7, Role::Admin);
    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(TokenFixtures::valid(7, Role::User)), UserFixtures::reader())
            .with_refresh_token(fresh.clone())
            .with_role(Role::User),
    );
    let store = memory_store();
    let client = client_with(api.clone(), store.clone());
    client.login("ada_reader", "secret1").await.unwrap();
    client.roles().fetch_role().await;

    assert_eq!(client.refresh().await.unwrap(), fresh);
    assert_eq!(store.token().unwrap(), Some(fresh));
    assert!(client.roles().cached_role().is_none());
}

#[tokio::test]
async fn test_register_and_forgot_password() {
    let api = Arc::new(MockAuthApi::new());
    let client = client_with(api.clone(), memory_store());

    assert!(client.register("new_reader", "new@blog.test", "secret1").await.unwrap().is_none());
    let err = client
        .register("taken_name", "taken@blog.test", "secret1")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Username already exists");
    assert!(client.register("new_reader", "not-an-email", "secret1").await.is_err());
    assert_eq!(api.calls("register"), 2);

    client.forgot_password("ada@blog.test").await.unwrap();
    assert!(client.forgot_password("nope").await.is_err());
    assert_eq!(api.calls("forgot_password"), 1);
    assert!(!client.session().is_logged_in());
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_profile_update_ignored_when_signed_out() {
    let api = Arc::new(MockAuthApi::new());
    let store = memory_store();
    let client = client_with(api, store.clone());
    client.init().await;

    client.session().update_avatar("/a.png").unwrap();
    client.session().update_user(UserFixtures::reader()).unwrap();
    assert!(!client.session().is_logged_in());
    assert!(store.load().unwrap().is_none());

    let err = client.refresh_user().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));
}

#[tokio::test]
async fn test_profile_avatar_update_persists() {
    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(TokenFixtures::valid(7, Role::User)), UserFixtures::reader()),
    );
    let store = memory_store();
    let client = client_with(api, store.clone());
    client.login("ada_reader", "secret1").await.unwrap();
    assert_eq!(client.session().avatar(), "/default-avatar.jpg");

    client.session().update_avatar("/uploads/ada.png").unwrap();
    assert_eq!(client.session().avatar(), "/uploads/ada.png");
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.avatar_url.as_deref(), Some("/uploads/ada.png"));
}

#[tokio::test]
async fn test_profile_refresh_from_backend() {
    let renamed = UserInfo::new(7, "ada_lovelace").with_role(Role::User);
    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(TokenFixtures::valid(7, Role::User)), UserFixtures::reader())
            .with_profile(renamed.clone()),
    );
    let client = client_with(api, memory_store());
    client.login("ada_reader", "secret1").await.unwrap();

    assert_eq!(client.refresh_user().await.unwrap(), renamed);
    assert_eq!(client.session().username(), "ada_lovelace");
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_persist_across_clients() {
    let dir = temp_test_dir("quill-session");
    let path = dir.path().join("session.json");

    let api = Arc::new(
        MockAuthApi::new()
            .with_login(Some(TokenFixtures::valid(7, Role::User)), UserFixtures::reader())
            .with_role(Role::User),
    );

    {
        let store = TokenStore::new(Arc::new(FileStore::open(&path).unwrap()));
        let client = client_with(api.clone(), store);
        client.login("ada_reader", "secret1").await.unwrap();
    }

    let store = TokenStore::new(Arc::new(FileStore::open(&path).unwrap()));
    let client = client_with(api.clone(), store);
    let snapshot = client.init().await;
    assert_eq!(snapshot.phase(), AuthPhase::Authenticated);
    assert_eq!(client.session().username(), "ada_reader");

    client.logout().await.unwrap();
    let store = TokenStore::new(Arc::new(FileStore::open(&path).unwrap()));
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_persist_from_config() {
    let dir = temp_test_dir("quill-config");
    let config = ConfigFixtures::file("http://127.0.0.1:9", dir.path());

    let client = QuillClient::from_config(&config).unwrap();
    assert!(client.cookie_jar().is_none());
    assert_eq!(client.init().await.phase(), AuthPhase::Anonymous);
}

// =============================================================================
// Property Tests
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Init,
    Login,
    Logout,
    UpdateAvatar(String),
    UpdateUser,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Init),
        Just(Op::Login),
        Just(Op::Logout),
        "[a-z]{1,8}".prop_map(|s| Op::UpdateAvatar(format!("/{}.png", s))),
        Just(Op::UpdateUser),
    ]
}

proptest! {
    #[test]
    fn prop_signed_in_iff_user_present(ops in proptest::collection::vec(op_strategy(), 1..24)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let api = Arc::new(
                MockAuthApi::new()
                    .with_login(Some(TokenFixtures::valid(7, Role::User)), UserFixtures::reader())
                    .with_role(Role::User),
            );
            let store = memory_store();
            let client = client_with(api, store.clone());
            client.init().await;

            for op in ops {
                let was_signed_in = client.session().is_logged_in();
                match op {
                    Op::Init => {
                        client.init().await;
                    }
                    Op::Login => {
                        client.login("ada_reader", "secret1").await.unwrap();
                    }
                    Op::Logout => {
                        client.logout().await.unwrap();
                    }
                    Op::UpdateAvatar(url) => {
                        client.session().update_avatar(url).unwrap();
                        assert_eq!(client.session().is_logged_in(), was_signed_in);
                    }
                    Op::UpdateUser => {
                        client.session().update_user(UserFixtures::reader()).unwrap();
                        assert_eq!(client.session().is_logged_in(), was_signed_in);
                    }
                }

                let snapshot = client.session().snapshot();
                assert_eq!(snapshot.is_logged_in(), snapshot.user().is_some());
                assert_eq!(
                    snapshot.is_logged_in(),
                    snapshot.phase() == AuthPhase::Authenticated
                );
                assert!(!snapshot.loading());
                assert_eq!(store.load().unwrap().is_some(), snapshot.is_logged_in());
            }
        });
    }
}
