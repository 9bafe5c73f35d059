//! Per-game serialization: one owning task per game, fed by an `mpsc` channel
//! of mutations. Only one mutation is ever in flight for a given game, and
//! adjudication runs to completion inside that mutation without suspending,
//! so it can never interleave with a concurrent mutation of the same game.
//! This follows the same per-room owning-task pattern used for relaying raw
//! bytes between clients, generalized here to applying typed mutations
//! against a [`Game`] and returning typed results.

use tokio::sync::{mpsc, oneshot};

use diplomacy::game::{Game, GameError, GameStatus, PhaseKind, PhaseRecord};
use diplomacy::Nation;

use crate::notifier::{Notification, Notifier};
use crate::phase_fmt::game_phase_string;
use crate::session::SessionRegistry;

/// One request to mutate (or read) a single game, plus the reply channel the
/// dispatcher awaits on.
pub struct Mutation {
    pub op: Operation,
    pub reply: oneshot::Sender<Result<MutationOutcome, GameError>>,
}

#[derive(Debug)]
pub enum Operation {
    /// Transition a `FORMING` game into its first movement phase.
    Start,
    SubmitMainOrders { nation: Nation, order_texts: Vec<String> },
    SubmitRetreatOrders { nation: Nation, order_texts: Vec<String> },
    SubmitBuildOrders { nation: Nation, order_texts: Vec<String> },
    SubmitDrawVote { nation: Nation, vote: bool },
    /// Mark a power's controller as departed or returned, e.g. when its
    /// controlling account is deleted or a new player claims a vacant seat.
    SetCivilDisorder { nation: Nation, in_disorder: bool },
    Process,
    /// A read-only summary request; still serialized through the actor so it
    /// never observes a half-applied mutation.
    Describe,
    /// A full clone of the game's current state, for persistence. Serialized
    /// through the actor for the same reason as `Describe`.
    Snapshot,
}

#[derive(Debug, Clone)]
pub enum MutationOutcome {
    Accepted,
    Processed(Vec<PhaseRecord>),
    Described(GameSummary),
    Snapshot(Box<Game>),
}

#[derive(Debug, Clone)]
pub struct GameSummary {
    pub id: String,
    pub phase: String,
    pub status: String,
    /// `None` for `Forming`/`Completed` games, which have no open phase to
    /// size a deadline against.
    pub phase_kind: Option<PhaseKind>,
}

/// A handle the dispatcher holds for a running game actor.
#[derive(Clone)]
pub struct GameHandle {
    pub game_id: String,
    sender: mpsc::Sender<Mutation>,
}

impl GameHandle {
    pub async fn send(&self, op: Operation) -> Result<MutationOutcome, GameError> {
        let (tx, rx) = oneshot::channel();
        if self
            .sender
            .send(Mutation { op, reply: tx })
            .await
            .is_err()
        {
            return Err(GameError::Internal("game actor has shut down".into()));
        }
        rx.await
            .unwrap_or_else(|_| Err(GameError::Internal("game actor dropped the reply".into())))
    }
}

/// Spawn the owning task for `game`. Notifications generated by each mutation
/// are published through `notifier` before the mutation's reply is sent,
/// which is what gives per-session ordering its guarantee: the dispatcher's
/// response and the notification both derive from the same commit point, in
/// the same order other mutations commit.
pub fn spawn(
    mut game: Game,
    notifier: std::sync::Arc<tokio::sync::Mutex<Notifier>>,
    registry: std::sync::Arc<tokio::sync::Mutex<SessionRegistry>>,
) -> GameHandle {
    let game_id = game.id().to_string();
    let (tx, mut rx) = mpsc::channel::<Mutation>(64);

    tokio::spawn(async move {
        while let Some(Mutation { op, reply }) = rx.recv().await {
            let result = apply(&mut game, op, &notifier, &registry).await;
            let _ = reply.send(result);
        }
        tracing::info!(game_id = %game.id(), "game actor shut down");
    });

    GameHandle {
        game_id,
        sender: tx,
    }
}

async fn apply(
    game: &mut Game,
    op: Operation,
    notifier: &std::sync::Arc<tokio::sync::Mutex<Notifier>>,
    registry: &std::sync::Arc<tokio::sync::Mutex<SessionRegistry>>,
) -> Result<MutationOutcome, GameError> {
    match op {
        Operation::Start => {
            game.start()?;
            publish(
                game,
                notifier,
                registry,
                Notification::GameStatusUpdate {
                    game_id: game.id().to_string(),
                    status: format!("{:?}", game.status()),
                },
            )
            .await;
            Ok(MutationOutcome::Accepted)
        }
        Operation::SubmitMainOrders { nation, order_texts } => {
            game.submit_main_orders(&nation, &order_texts)?;
            publish(
                game,
                notifier,
                registry,
                Notification::PowerOrdersUpdate {
                    game_id: game.id().to_string(),
                    nation,
                    order_count: order_texts.len(),
                },
            )
            .await;
            Ok(MutationOutcome::Accepted)
        }
        Operation::SubmitRetreatOrders { nation, order_texts } => {
            game.submit_retreat_orders(&nation, &order_texts)?;
            Ok(MutationOutcome::Accepted)
        }
        Operation::SubmitBuildOrders { nation, order_texts } => {
            game.submit_build_orders(&nation, &order_texts)?;
            Ok(MutationOutcome::Accepted)
        }
        Operation::SubmitDrawVote { nation, vote } => {
            game.submit_draw_vote(&nation, vote)?;
            publish(
                game,
                notifier,
                registry,
                Notification::PowerVoteUpdate {
                    game_id: game.id().to_string(),
                    nation,
                    vote,
                },
            )
            .await;
            Ok(MutationOutcome::Accepted)
        }
        Operation::SetCivilDisorder { nation, in_disorder } => {
            game.set_civil_disorder(&nation, in_disorder)?;
            publish(
                game,
                notifier,
                registry,
                Notification::PowerStatusUpdate {
                    game_id: game.id().to_string(),
                    nation,
                    in_disorder,
                },
            )
            .await;
            Ok(MutationOutcome::Accepted)
        }
        Operation::Process => {
            let records = game.process()?;
            publish(
                game,
                notifier,
                registry,
                Notification::PhaseUpdate {
                    game_id: game.id().to_string(),
                    phase: game_phase_string(game.status(), game.current_time()),
                },
            )
            .await;
            for record in &records {
                publish(
                    game,
                    notifier,
                    registry,
                    Notification::GameProcessed {
                        game_id: game.id().to_string(),
                        record: (record).into(),
                    },
                )
                .await;
                if !record.ownership_changes.is_empty() {
                    publish(
                        game,
                        notifier,
                        registry,
                        Notification::ClearedCenters {
                            game_id: game.id().to_string(),
                        },
                    )
                    .await;
                }
            }
            publish(
                game,
                notifier,
                registry,
                Notification::GameStatusUpdate {
                    game_id: game.id().to_string(),
                    status: format!("{:?}", game.status()),
                },
            )
            .await;
            Ok(MutationOutcome::Processed(records))
        }
        Operation::Describe => Ok(MutationOutcome::Described(GameSummary {
            id: game.id().to_string(),
            phase: game_phase_string(game.status(), game.current_time()),
            status: format!("{:?}", game.status()),
            phase_kind: matches!(game.status(), GameStatus::Active).then(|| game.phase_kind()),
        })),
        Operation::Snapshot => Ok(MutationOutcome::Snapshot(Box::new(game.clone()))),
    }
}

async fn publish(
    _game: &Game,
    notifier: &std::sync::Arc<tokio::sync::Mutex<Notifier>>,
    registry: &std::sync::Arc<tokio::sync::Mutex<SessionRegistry>>,
    notification: Notification,
) {
    let registry = registry.lock().await;
    let notifier = notifier.lock().await;
    notifier.publish(&registry, notification);
}
