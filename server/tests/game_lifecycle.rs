//! End-to-end exercise of a game through the `Server` aggregate: creation,
//! starting, joining, order submission, and processing.

use std::collections::BTreeSet;

use diplomacy::Nation;
use diplomacy_server::error::ServerError;
use diplomacy_server::game_actor::{MutationOutcome, Operation};
use diplomacy_server::notifier::Notification;
use diplomacy_server::session::{Role, User};
use diplomacy_server::Server;

fn eng() -> Nation {
    Nation::from("ENG")
}

fn fra() -> Nation {
    Nation::from("FRA")
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("diplomacy-server-it-{name}-{}", std::process::id()))
}

#[tokio::test]
async fn orders_submitted_before_start_are_rejected_by_phase_check() {
    let dir = temp_dir("pre-start");
    let server = Server::new(&dir);
    server
        .create_game("g1", vec![eng(), fra()], BTreeSet::new())
        .await
        .unwrap();

    let mut registry = server.registry.lock().await;
    registry.register_user(User::new("alice", "pw")).unwrap();
    let token = registry.sign_in("alice", "pw").unwrap();
    registry.create_channel(token.clone()).unwrap();
    registry.channel_mut(&token).unwrap().join("g1", Role::Power(eng()));
    drop(registry);

    let result = server
        .dispatcher
        .submit_orders(&token, "g1", &eng(), "S1901M", vec!["A LON H".into()], false, false)
        .await;
    assert!(matches!(result, Err(ServerError::PhaseMismatch { .. })));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn starting_a_game_allows_order_submission_and_processing() {
    let dir = temp_dir("start-flow");
    let server = Server::new(&dir);
    server
        .create_game("g1", vec![eng(), fra()], BTreeSet::new())
        .await
        .unwrap();
    server.start_game("g1").await.unwrap();

    let mut registry = server.registry.lock().await;
    registry.register_user(User::new("alice", "pw")).unwrap();
    let token = registry.sign_in("alice", "pw").unwrap();
    registry.create_channel(token.clone()).unwrap();
    registry.channel_mut(&token).unwrap().join("g1", Role::Power(eng()));
    drop(registry);

    let mut notifier = server.notifier.lock().await;
    let mut rx = notifier.register(token.clone());
    drop(notifier);

    server
        .dispatcher
        .submit_orders(&token, "g1", &eng(), "S1901M", vec!["A LON H".into()], false, false)
        .await
        .expect("order submission against the now-active game succeeds");

    // The order submission should have produced a visible notification to
    // the submitting power's own session.
    let frame = rx.try_recv().expect("power_orders_update delivered");
    assert_eq!(frame.name, "power_orders_update");

    let games = server.games.lock().await;
    let handle = games.get("g1").cloned().unwrap();
    drop(games);
    let outcome = handle.send(Operation::Process).await.unwrap();
    assert!(matches!(outcome, MutationOutcome::Processed(_)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn starting_twice_is_rejected() {
    let dir = temp_dir("double-start");
    let server = Server::new(&dir);
    server.create_game("g1", vec![eng(), fra()], BTreeSet::new()).await.unwrap();
    server.start_game("g1").await.unwrap();
    assert!(server.start_game("g1").await.is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn account_deletion_notification_reaches_the_deleted_users_token() {
    let dir = temp_dir("delete");
    let server = Server::new(&dir);

    let mut registry = server.registry.lock().await;
    registry.register_user(User::new("bob", "pw")).unwrap();
    let token = registry.sign_in("bob", "pw").unwrap();
    drop(registry);

    let mut notifier = server.notifier.lock().await;
    let mut rx = notifier.register(token.clone());
    notifier.notify_token(
        &token,
        Notification::AccountDeleted {
            username: "bob".into(),
        },
    );
    drop(notifier);

    let frame = rx.try_recv().expect("account deletion notification delivered");
    assert_eq!(frame.name, "account_deleted");

    let _ = std::fs::remove_dir_all(&dir);
}
