//! The `Server` aggregate: owns the three registries (users, games, tokens)
//! and scopes their lifetime to one run.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use diplomacy::game::{Game, PhaseKind, PhaseRecord, RuleFlag};
use diplomacy::Nation;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::ServerError;
use crate::game_actor::{self, GameHandle, MutationOutcome};
use crate::notifier::{Notification, Notifier};
use crate::persistence::{GameSnapshot, Store};
use crate::scheduler::Scheduler;
use crate::session::{Role, SessionRegistry};

/// The process-wide state a running deployment owns. The user database/token
/// index and the game registry are the only state shared across game
/// boundaries; each game's own state is owned exclusively by its
/// [`game_actor`]. The deadline heap is shared too, since advancing a game's
/// phase (via [`Server::start_game`] or [`Server::process_game`]) must be
/// able to push that game's next deadline onto the same heap a background
/// [`crate::scheduler::run_shared`] task is waking on.
pub struct Server {
    pub registry: Arc<Mutex<SessionRegistry>>,
    pub games: Arc<Mutex<HashMap<String, GameHandle>>>,
    pub notifier: Arc<Mutex<Notifier>>,
    pub store: Store,
    pub dispatcher: Dispatcher,
    pub scheduler: Arc<Mutex<Scheduler>>,
    /// Unix timestamp each live game's current phase should auto-process at,
    /// mirrored alongside the scheduler's heap so `snapshot_all` can persist
    /// it without round-tripping through the scheduler's internals.
    deadlines: Arc<Mutex<HashMap<String, u64>>>,
    config: ServerConfig,
}

impl Server {
    pub fn new(data_dir: impl Into<std::path::PathBuf>) -> Self {
        Self::with_config(data_dir, ServerConfig::default())
    }

    /// Build a `Server` and spawn its two background tasks: the scheduler's
    /// own wake loop ([`crate::scheduler::run_shared`]) and a task draining
    /// the scheduler's fire channel into [`Server::process_game`] calls, the
    /// same wiring `bin/main.rs` would otherwise have to assemble by hand.
    pub fn with_config(data_dir: impl Into<std::path::PathBuf>, config: ServerConfig) -> Self {
        let registry = Arc::new(Mutex::new(SessionRegistry::new()));
        let games = Arc::new(Mutex::new(HashMap::new()));
        let dispatcher = Dispatcher::new(registry.clone(), games.clone());
        let (scheduler, fire_rx) = Scheduler::new();
        let scheduler = Arc::new(Mutex::new(scheduler));
        let deadlines = Arc::new(Mutex::new(HashMap::new()));

        tokio::spawn(crate::scheduler::run_shared(scheduler.clone()));
        tokio::spawn(run_fire_channel(
            fire_rx,
            games.clone(),
            scheduler.clone(),
            deadlines.clone(),
            config.clone(),
        ));

        Server {
            registry,
            games,
            notifier: Arc::new(Mutex::new(Notifier::new())),
            store: Store::new(data_dir),
            dispatcher,
            scheduler,
            deadlines,
            config,
        }
    }

    /// Re-read a game's current phase and, if it is still active, (re)compute
    /// its deadline from the configured per-phase-kind duration and push it
    /// onto the shared scheduler. A `Forming` or `Completed` game has its
    /// deadline (if any) cleared instead.
    async fn advance_deadline(&self, game_id: &str, handle: &GameHandle) -> Result<(), ServerError> {
        advance_deadline_for(&self.scheduler, &self.deadlines, &self.config, game_id, handle).await
    }

    /// Create a new `FORMING` game and register its actor. The game does not
    /// receive a deadline until it starts.
    pub async fn create_game(
        &self,
        game_id: impl Into<String>,
        nations: Vec<Nation>,
        rules: BTreeSet<RuleFlag>,
    ) -> Result<(), ServerError> {
        let game_id = game_id.into();
        let mut games = self.games.lock().await;
        if games.contains_key(&game_id) {
            return Err(ServerError::Conflict(format!("game {game_id} already exists")));
        }

        let game = Game::new(game_id.clone(), nations, rules);
        let handle = game_actor::spawn(game, self.notifier.clone(), self.registry.clone());
        games.insert(game_id, handle);
        Ok(())
    }

    /// Transition a `FORMING` game into its first movement phase, once all
    /// seats are assigned or an admin forces an early start, and schedule its
    /// first deadline.
    pub async fn start_game(&self, game_id: &str) -> Result<(), ServerError> {
        let handle = self.handle_for(game_id).await?;
        handle.send(game_actor::Operation::Start).await?;
        self.advance_deadline(game_id, &handle).await?;
        Ok(())
    }

    /// Run a scheduled or admin-triggered `process` mutation and advance the
    /// game's deadline to the phase it lands on (or clear it, if the game
    /// just completed). This is what both the scheduler's fire channel and a
    /// manual "process now" admin request should call, rather than sending
    /// `Operation::Process` to the handle directly — otherwise the deadline
    /// never advances past the phase the game started in.
    pub async fn process_game(&self, game_id: &str) -> Result<Vec<PhaseRecord>, ServerError> {
        let handle = self.handle_for(game_id).await?;
        let outcome = handle.send(game_actor::Operation::Process).await?;
        self.advance_deadline(game_id, &handle).await?;
        let MutationOutcome::Processed(records) = outcome else {
            return Ok(Vec::new());
        };
        Ok(records)
    }

    /// Delete an account: notify every live session it held, vacate any
    /// powers it was controlling (so the game state reflects a departed
    /// controller rather than silently orphaning them), then revoke its
    /// tokens. Notification is sent before revocation so the outbound frame
    /// still has a live channel to ride out on.
    pub async fn delete_account(&self, username: &str) -> Result<(), ServerError> {
        let (tokens, controlled) = {
            let registry = self.registry.lock().await;
            let tokens = registry.tokens_for_user(username);
            let mut controlled = Vec::new();
            for token in &tokens {
                if let Ok(channel) = registry.channel(token) {
                    for (game_id, instance) in &channel.games {
                        for role in &instance.roles {
                            if let Role::Power(nation) = role {
                                controlled.push((game_id.clone(), nation.clone()));
                            }
                        }
                    }
                }
            }
            (tokens, controlled)
        };

        {
            let mut registry = self.registry.lock().await;
            let notifier = self.notifier.lock().await;
            for token in &tokens {
                notifier.notify_token(
                    token,
                    Notification::AccountDeleted {
                        username: username.to_string(),
                    },
                );
            }
            registry.revoke_user(username);
        }

        {
            let mut notifier = self.notifier.lock().await;
            for token in &tokens {
                notifier.unregister(token);
            }
        }

        for (game_id, nation) in controlled {
            if let Ok(handle) = self.handle_for(&game_id).await {
                let _ = handle
                    .send(game_actor::Operation::SetCivilDisorder {
                        nation,
                        in_disorder: true,
                    })
                    .await;
            }
        }

        Ok(())
    }

    async fn handle_for(&self, game_id: &str) -> Result<GameHandle, ServerError> {
        let games = self.games.lock().await;
        games
            .get(game_id)
            .cloned()
            .ok_or_else(|| ServerError::NotFound(format!("no game {game_id}")))
    }

    /// Boot-time recovery: load every persisted snapshot and spawn an actor
    /// for each, priming the shared scheduler from each game's stored
    /// deadline. Malformed snapshots are skipped and logged rather than
    /// aborting boot.
    pub async fn load_from_disk(&self) -> Result<usize, ServerError> {
        let snapshots = self
            .store
            .load_all_games()
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        let mut loaded = 0;
        let mut games = self.games.lock().await;
        let mut scheduler = self.scheduler.lock().await;
        let mut deadlines = self.deadlines.lock().await;
        for (game_id, GameSnapshot { game, deadline_unix_secs }) in snapshots {
            let handle = game_actor::spawn(game, self.notifier.clone(), self.registry.clone());
            games.insert(game_id.clone(), handle);
            if let Some(deadline) = deadline_unix_secs {
                let remaining = deadline.saturating_sub(unix_now());
                scheduler.schedule(
                    &game_id,
                    tokio::time::Instant::now() + Duration::from_secs(remaining),
                );
                deadlines.insert(game_id.clone(), deadline);
            }
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Write every live game's current state to disk, as on a clean shutdown.
    /// A persistence failure for one game is logged and does not abort the
    /// others or the shutdown itself.
    pub async fn snapshot_all(&self) -> usize {
        let handles: Vec<(String, GameHandle)> = {
            let games = self.games.lock().await;
            games.iter().map(|(id, h)| (id.clone(), h.clone())).collect()
        };
        let deadlines = self.deadlines.lock().await.clone();

        let mut count = 0;
        for (game_id, handle) in handles {
            let outcome = match handle.send(game_actor::Operation::Snapshot).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(game_id, error = %e, "could not read game state for snapshot");
                    continue;
                }
            };

            let game_actor::MutationOutcome::Snapshot(game) = outcome else {
                continue;
            };

            let snapshot = GameSnapshot {
                game: *game,
                deadline_unix_secs: deadlines.get(&game_id).copied(),
            };

            match self.store.save_game(&game_id, &snapshot).await {
                Ok(()) => count += 1,
                Err(e) => tracing::error!(game_id, error = %e, "failed to persist game snapshot"),
            }
        }
        count
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Seconds a freshly opened phase of `kind` stays open before it
/// auto-processes, per the configured defaults.
fn deadline_secs(config: &ServerConfig, kind: PhaseKind) -> u64 {
    match kind {
        PhaseKind::Movement => config.movement_deadline_secs,
        PhaseKind::Retreat => config.retreat_deadline_secs,
        PhaseKind::Build => config.build_deadline_secs,
    }
}

/// Shared implementation behind [`Server::advance_deadline`], free of `&self`
/// so the background fire-channel task (which only owns clones of the Arcs,
/// not a `Server`) can call it too.
async fn advance_deadline_for(
    scheduler: &Arc<Mutex<Scheduler>>,
    deadlines: &Arc<Mutex<HashMap<String, u64>>>,
    config: &ServerConfig,
    game_id: &str,
    handle: &GameHandle,
) -> Result<(), ServerError> {
    let MutationOutcome::Described(summary) = handle.send(game_actor::Operation::Describe).await? else {
        return Ok(());
    };

    match summary.phase_kind {
        Some(kind) => {
            let secs = deadline_secs(config, kind);
            let now_unix = unix_now();
            deadlines.lock().await.insert(game_id.to_string(), now_unix + secs);
            scheduler
                .lock()
                .await
                .schedule(game_id, tokio::time::Instant::now() + Duration::from_secs(secs));
        }
        None => {
            deadlines.lock().await.remove(game_id);
            scheduler.lock().await.cancel(game_id);
        }
    }
    Ok(())
}

/// Drains the scheduler's fire channel: each `game_id` it receives means that
/// game's deadline was reached and still current, so run a `process`
/// mutation on it and advance its deadline to wherever it lands. A
/// process/describe failure for one game is logged and does not stop the
/// channel from servicing the rest.
async fn run_fire_channel(
    mut fire_rx: tokio::sync::mpsc::UnboundedReceiver<String>,
    games: Arc<Mutex<HashMap<String, GameHandle>>>,
    scheduler: Arc<Mutex<Scheduler>>,
    deadlines: Arc<Mutex<HashMap<String, u64>>>,
    config: ServerConfig,
) {
    while let Some(game_id) = fire_rx.recv().await {
        let handle = {
            let games = games.lock().await;
            games.get(&game_id).cloned()
        };
        let Some(handle) = handle else { continue };

        if let Err(e) = handle.send(game_actor::Operation::Process).await {
            tracing::error!(game_id = %game_id, error = %e, "scheduled process failed");
            continue;
        }
        if let Err(e) = advance_deadline_for(&scheduler, &deadlines, &config, &game_id, &handle).await {
            tracing::error!(game_id = %game_id, error = %e, "failed to advance deadline after scheduled process");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eng() -> Nation {
        Nation::from("ENG")
    }

    fn fra() -> Nation {
        Nation::from("FRA")
    }

    fn temp_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("diplomacy-server-unit-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn starting_a_game_records_a_deadline() {
        let dir = temp_dir("start-deadline");
        let server = Server::new(&dir);
        server.create_game("g1", vec![eng(), fra()], BTreeSet::new()).await.unwrap();
        server.start_game("g1").await.unwrap();

        assert!(server.deadlines.lock().await.contains_key("g1"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn processing_advances_the_recorded_deadline() {
        let dir = temp_dir("process-deadline");
        let server = Server::new(&dir);
        server.create_game("g1", vec![eng(), fra()], BTreeSet::new()).await.unwrap();
        server.start_game("g1").await.unwrap();

        let before = *server.deadlines.lock().await.get("g1").unwrap();
        server.process_game("g1").await.unwrap();
        let after = *server.deadlines.lock().await.get("g1").unwrap();

        // Both deadlines are `now + movement_deadline_secs` computed at
        // different instants; the second call happens no earlier than the
        // first, so the recorded deadline never moves backwards.
        assert!(after >= before);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn deleting_an_account_vacates_its_powers_and_revokes_its_token() {
        use crate::session::{Role, User};

        let dir = temp_dir("delete-account");
        let server = Server::new(&dir);
        server.create_game("g1", vec![eng(), fra()], BTreeSet::new()).await.unwrap();

        let token = {
            let mut registry = server.registry.lock().await;
            registry.register_user(User::new("alice", "pw")).unwrap();
            let token = registry.sign_in("alice", "pw").unwrap();
            registry.create_channel(token.clone()).unwrap();
            registry
                .channel_mut(&token)
                .unwrap()
                .join("g1", Role::Power(eng()));
            token
        };
        let mut rx = {
            let mut notifier = server.notifier.lock().await;
            notifier.register(token.clone())
        };

        server.delete_account("alice").await.unwrap();

        let frame = rx.try_recv().expect("account_deleted notification sent");
        assert_eq!(frame.name, "account_deleted");
        assert!(server.registry.lock().await.channel(&token).is_err());

        let handle = server.handle_for("g1").await.unwrap();
        let outcome = handle
            .send(game_actor::Operation::SubmitMainOrders {
                nation: eng(),
                order_texts: vec!["ENG: F Lon hold".to_string()],
            })
            .await;
        assert!(matches!(outcome, Err(diplomacy::game::GameError::Conflict(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        let dir = temp_dir("unknown-process");
        let server = Server::new(&dir);
        assert!(matches!(
            server.process_game("ghost").await,
            Err(ServerError::NotFound(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
