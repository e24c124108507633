use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::net::api::{ACCOUNT_PATH, LOGIN_PATH, ME_PATH, SIGNUP_PATH, URLS_PATH};
use crate::net::http::Method;
use crate::net::testing::{Harness, user_json};
use crate::state::auth::SessionPhase;
use crate::util::credentials::CredentialStore;

// =============================================================================
// Helpers
// =============================================================================

type Log = Rc<RefCell<Vec<(AuthState, SessionChange)>>>;

fn record(session: &SessionController) -> Log {
    let log: Log = Rc::default();
    let sink = log.clone();
    session.subscribe(move |state, change| sink.borrow_mut().push((state.clone(), change)));
    log
}

fn changes(log: &Log) -> Vec<SessionChange> {
    log.borrow().iter().map(|(_, c)| *c).collect()
}

fn auth_body(token: &str, username: &str) -> serde_json::Value {
    serde_json::json!({ "token": token, "user": user_json(username) })
}

async fn signed_in(h: &Harness) -> SessionController {
    h.backend.reply(Method::Get, ME_PATH, 200, serde_json::json!({ "user": user_json("alice") }));
    let session = SessionController::new(h.transport.clone());
    session.bootstrap().await;
    assert!(session.is_authenticated());
    session
}

// =============================================================================
// Bootstrap
// =============================================================================

#[test]
fn new_controller_starts_bootstrapping() {
    let h = Harness::new(Some("tok"));
    let session = SessionController::new(h.transport.clone());
    assert_eq!(session.state().phase(), SessionPhase::Bootstrapping);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn bootstrap_without_token_is_anonymous_without_network() {
    let h = Harness::new(None);
    let session = SessionController::new(h.transport.clone());
    let log = record(&session);

    session.bootstrap().await;

    assert_eq!(session.state(), AuthState::anonymous());
    assert_eq!(h.backend.request_count(), 0);
    assert_eq!(changes(&log), vec![SessionChange::Bootstrapped]);
}

#[tokio::test]
async fn bootstrap_resumes_with_stored_token() {
    let h = Harness::new(Some("tok"));
    h.backend.reply(Method::Get, ME_PATH, 200, serde_json::json!({ "user": user_json("alice") }));
    let session = SessionController::new(h.transport.clone());

    session.bootstrap().await;

    let state = session.state();
    assert_eq!(state.phase(), SessionPhase::Authenticated);
    assert_eq!(state.token.as_deref(), Some("tok"));
    assert_eq!(state.user.map(|u| u.username).as_deref(), Some("alice"));
    assert_eq!(h.backend.requests()[0].header("Authorization"), Some("Bearer tok"));
}

#[tokio::test]
async fn bootstrap_failure_clears_store() {
    let h = Harness::new(Some("tok"));
    h.backend.fail(Method::Get, ME_PATH, "offline");
    let session = SessionController::new(h.transport.clone());

    session.bootstrap().await;

    assert_eq!(session.state(), AuthState::anonymous());
    assert_eq!(h.store.read(), None);
}

#[tokio::test]
async fn bootstrap_rejected_token_is_forced_invalidation() {
    let h = Harness::new(Some("expired"));
    h.backend.reply(Method::Get, ME_PATH, 401, serde_json::json!({ "message": "Token is not valid" }));
    let session = SessionController::new(h.transport.clone());
    let log = record(&session);

    session.bootstrap().await;

    assert_eq!(session.state(), AuthState::anonymous());
    assert_eq!(h.store.read(), None);
    assert_eq!(changes(&log), vec![SessionChange::Invalidated]);
}

#[tokio::test]
async fn bootstrap_runs_only_once() {
    let h = Harness::new(Some("tok"));
    let session = signed_in(&h).await;

    session.bootstrap().await;

    assert_eq!(h.backend.request_count(), 1);
}

// =============================================================================
// Login / signup
// =============================================================================

#[tokio::test]
async fn login_persists_token_and_authenticates() {
    let h = Harness::new(None);
    let session = SessionController::new(h.transport.clone());
    session.bootstrap().await;
    let log = record(&session);
    h.backend.reply(Method::Post, LOGIN_PATH, 200, auth_body("fresh", "alice"));

    let user = session.login("alice@example.com", "pw").await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(h.store.read().as_deref(), Some("fresh"));
    assert_eq!(session.state().token.as_deref(), Some("fresh"));
    assert_eq!(changes(&log), vec![SessionChange::SignedIn]);
}

#[tokio::test]
async fn login_failure_returns_message_and_keeps_state() {
    let h = Harness::new(None);
    let session = SessionController::new(h.transport.clone());
    session.bootstrap().await;
    h.backend.reply(Method::Post, LOGIN_PATH, 400, serde_json::json!({ "message": "Invalid credentials" }));

    let err = session.login("alice@example.com", "wrong").await.unwrap_err();

    assert_eq!(err, "Invalid credentials");
    assert_eq!(session.state(), AuthState::anonymous());
    assert_eq!(h.store.read(), None);
}

#[tokio::test]
async fn login_network_failure_is_generic() {
    let h = Harness::new(None);
    let session = SessionController::new(h.transport.clone());
    session.bootstrap().await;
    h.backend.fail(Method::Post, LOGIN_PATH, "offline");

    let err = session.login("a@b.c", "pw").await.unwrap_err();

    assert_eq!(err, "Unable to reach the server. Please try again.");
}

#[tokio::test]
async fn signup_authenticates_directly() {
    let h = Harness::new(None);
    let session = SessionController::new(h.transport.clone());
    session.bootstrap().await;
    h.backend.reply(Method::Post, SIGNUP_PATH, 201, auth_body("new-user-token", "bob"));

    let user = session.signup("bob", "bob@example.com", "pw").await.unwrap();

    assert_eq!(user.email, "bob@example.com");
    assert!(session.is_authenticated());
    assert_eq!(h.store.read().as_deref(), Some("new-user-token"));
}

#[tokio::test]
async fn signup_duplicate_email_surfaces_server_message() {
    let h = Harness::new(None);
    let session = SessionController::new(h.transport.clone());
    session.bootstrap().await;
    h.backend.reply(Method::Post, SIGNUP_PATH, 400, serde_json::json!({ "message": "User already exists" }));

    assert_eq!(session.signup("bob", "bob@example.com", "pw").await, Err("User already exists".to_owned()));
    assert!(!session.is_authenticated());
}

// =============================================================================
// Logout / delete account
// =============================================================================

#[tokio::test]
async fn logout_clears_everything_without_network() {
    let h = Harness::new(Some("tok"));
    let session = signed_in(&h).await;
    let log = record(&session);

    session.logout();

    assert_eq!(session.state(), AuthState::anonymous());
    assert_eq!(h.store.read(), None);
    assert_eq!(h.backend.request_count(), 1);
    assert_eq!(changes(&log), vec![SessionChange::SignedOut]);
}

#[tokio::test]
async fn delete_account_success_tears_down_session() {
    let h = Harness::new(Some("tok"));
    let session = signed_in(&h).await;
    let log = record(&session);
    h.backend.reply(Method::Delete, ACCOUNT_PATH, 200, serde_json::json!({ "message": "Account deleted" }));

    assert_eq!(session.delete_account("pw").await, Ok(()));

    assert_eq!(session.state(), AuthState::anonymous());
    assert_eq!(h.store.read(), None);
    assert_eq!(changes(&log), vec![SessionChange::AccountDeleted]);
}

#[tokio::test]
async fn delete_account_wrong_password_keeps_session() {
    let h = Harness::new(Some("tok"));
    let session = signed_in(&h).await;
    let before = session.state();
    h.backend.reply(Method::Delete, ACCOUNT_PATH, 400, serde_json::json!({ "message": "Incorrect password" }));

    let err = session.delete_account("nope").await.unwrap_err();

    assert_eq!(err, "Incorrect password");
    assert_eq!(session.state(), before);
    assert_eq!(h.store.read().as_deref(), Some("tok"));
}

#[tokio::test]
async fn delete_account_requires_password() {
    let h = Harness::new(Some("tok"));
    let session = signed_in(&h).await;

    assert!(session.delete_account("").await.is_err());
    assert_eq!(h.backend.request_count(), 1);
}

// =============================================================================
// Forced invalidation and races
// =============================================================================

#[tokio::test]
async fn any_401_forces_anonymous() {
    let h = Harness::new(Some("tok"));
    let session = signed_in(&h).await;
    let log = record(&session);
    h.backend.reply(Method::Get, URLS_PATH, 401, serde_json::json!({ "message": "jwt expired" }));

    let _ = h.transport.request_ack(Method::Get, URLS_PATH, None).await;

    assert_eq!(session.state(), AuthState::anonymous());
    assert_eq!(h.store.read(), None);
    assert_eq!(changes(&log), vec![SessionChange::Invalidated]);
}

#[tokio::test]
async fn login_completing_during_bootstrap_wins_over_stale_result() {
    let h = Harness::new(Some("old"));
    let me_gate = h.backend.gate(Method::Get, ME_PATH);
    h.backend.reply(Method::Post, LOGIN_PATH, 200, auth_body("new", "alice"));
    let session = SessionController::new(h.transport.clone());

    let boot = session.bootstrap();
    let login = async {
        let result = session.login("alice@example.com", "pw").await;
        me_gate.respond(500, serde_json::json!({ "message": "boom" }));
        result
    };
    let ((), result) = futures::join!(boot, login);

    assert!(result.is_ok());
    assert_eq!(session.state().token.as_deref(), Some("new"));
    assert_eq!(h.store.read().as_deref(), Some("new"));
}

#[tokio::test]
async fn rejection_of_replaced_token_does_not_end_fresh_login() {
    let h = Harness::new(Some("old"));
    let me_gate = h.backend.gate(Method::Get, ME_PATH);
    h.backend.reply(Method::Post, LOGIN_PATH, 200, auth_body("new", "alice"));
    let session = SessionController::new(h.transport.clone());
    let log = record(&session);

    let boot = session.bootstrap();
    let login = async {
        let result = session.login("alice@example.com", "pw").await;
        me_gate.respond(401, serde_json::json!({ "message": "Token is not valid" }));
        result
    };
    let ((), result) = futures::join!(boot, login);

    assert!(result.is_ok());
    assert!(session.is_authenticated());
    assert_eq!(session.state().token.as_deref(), Some("new"));
    assert_eq!(h.store.read().as_deref(), Some("new"));
    assert_eq!(h.transport.invalidation().epoch(), 0);
    assert!(!changes(&log).contains(&SessionChange::Invalidated));
}

#[tokio::test]
async fn forced_invalidation_overrides_inflight_login() {
    let h = Harness::new(Some("tok"));
    let session = signed_in(&h).await;
    let login_gate = h.backend.gate(Method::Post, LOGIN_PATH);
    h.backend.reply(Method::Get, URLS_PATH, 401, serde_json::json!({}));

    let login = session.login("alice@example.com", "pw");
    let other = async {
        let _ = h.transport.request_ack(Method::Get, URLS_PATH, None).await;
        login_gate.respond(200, auth_body("late", "alice"));
    };
    let (result, ()) = futures::join!(login, other);

    assert_eq!(result, Err(SESSION_EXPIRED_MESSAGE.to_owned()));
    assert_eq!(session.state(), AuthState::anonymous());
    assert_eq!(h.store.read(), None);
}

#[tokio::test]
async fn observed_states_never_half_authenticated() {
    let h = Harness::new(Some("tok"));
    let session = SessionController::new(h.transport.clone());
    let log = record(&session);
    h.backend.reply(Method::Get, ME_PATH, 200, serde_json::json!({ "user": user_json("alice") }));
    h.backend.reply(Method::Post, LOGIN_PATH, 200, auth_body("t2", "alice"));
    h.backend.reply(Method::Get, URLS_PATH, 401, serde_json::json!({}));

    session.bootstrap().await;
    session.logout();
    let _ = session.login("alice@example.com", "pw").await;
    let _ = h.transport.request_ack(Method::Get, URLS_PATH, None).await;

    assert_eq!(log.borrow().len(), 4);
    for (state, _) in log.borrow().iter() {
        assert_eq!(state.user.is_some(), state.token.is_some());
        assert!(!state.loading);
    }
}
