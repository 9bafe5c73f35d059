//! Exercises the same wiring `bin/main.rs` sets up between the scheduler's
//! fire channel and a game actor's `Process` mutation, without going through
//! the binary.

use std::collections::BTreeSet;
use std::time::Duration;

use diplomacy::Nation;
use diplomacy_server::game_actor::{self, MutationOutcome, Operation};
use diplomacy_server::notifier::Notifier;
use diplomacy_server::scheduler::Scheduler;
use diplomacy_server::session::SessionRegistry;
use tokio::sync::Mutex;

#[tokio::test(start_paused = true)]
async fn a_fired_deadline_triggers_game_processing() {
    let mut game = diplomacy::game::Game::new(
        "g1",
        vec![Nation::from("ENG"), Nation::from("FRA")],
        BTreeSet::new(),
    );
    game.start().unwrap();

    let notifier = std::sync::Arc::new(Mutex::new(Notifier::new()));
    let registry = std::sync::Arc::new(Mutex::new(SessionRegistry::new()));
    let handle = game_actor::spawn(game, notifier, registry);

    let (mut scheduler, mut fire_rx) = Scheduler::new();
    let now = tokio::time::Instant::now();
    scheduler.schedule("g1", now + Duration::from_secs(5));

    let fired = scheduler.drain_due(now + Duration::from_secs(6));
    assert_eq!(fired, 1);

    let game_id = fire_rx.recv().await.expect("scheduler fired g1");
    assert_eq!(game_id, "g1");

    let outcome = handle.send(Operation::Process).await.unwrap();
    assert!(matches!(outcome, MutationOutcome::Processed(_)));
}
