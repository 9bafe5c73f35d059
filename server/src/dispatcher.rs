//! Request parsing, authentication, phase-dependence checking, and routing
//! to a game's serial mutation queue.

use std::sync::Arc;

use diplomacy::Nation;
use tokio::sync::Mutex;

use crate::error::ServerError;
use crate::game_actor::{GameHandle, MutationOutcome, Operation};
use crate::session::{SessionRegistry, Token};
use crate::wire::RequestLevel;

/// Everything the dispatcher needs to look up in order to route one request:
/// the registries it reads from and the game actor handles it routes
/// game-level mutations to.
pub struct Dispatcher {
    pub registry: Arc<Mutex<SessionRegistry>>,
    pub games: Arc<Mutex<std::collections::HashMap<String, GameHandle>>>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<Mutex<SessionRegistry>>,
        games: Arc<Mutex<std::collections::HashMap<String, GameHandle>>>,
    ) -> Self {
        Dispatcher { registry, games }
    }

    /// Step 1-2: authenticate and, for game-level requests, check the carried
    /// phase against the game's current phase before the mutation is ever
    /// enqueued.
    async fn authenticate(&self, level: RequestLevel, token: Option<&Token>) -> Result<(), ServerError> {
        if level == RequestLevel::Connection {
            return Ok(());
        }
        let token = token.ok_or_else(|| ServerError::Auth("request requires a token".into()))?;
        let registry = self.registry.lock().await;
        registry.require_token(token)?;
        Ok(())
    }

    /// Step 3-4: enqueue the mutation on the named game's serial queue, run
    /// it, and translate the result. `expected_phase` is `Some` only for
    /// phase-dependent requests; a mismatch short-circuits before the
    /// mutation ever reaches the game actor.
    pub async fn dispatch_game_request(
        &self,
        token: &Token,
        game_id: &str,
        expected_phase: Option<&str>,
        op: Operation,
    ) -> Result<MutationOutcome, ServerError> {
        self.authenticate(RequestLevel::Game, Some(token)).await?;

        let handle = {
            let games = self.games.lock().await;
            games
                .get(game_id)
                .cloned()
                .ok_or_else(|| ServerError::NotFound(format!("no game {game_id}")))?
        };

        if let Some(expected) = expected_phase {
            let current = handle
                .send(Operation::Describe)
                .await
                .map_err(ServerError::from)?;
            if let MutationOutcome::Described(summary) = current {
                if summary.phase != expected {
                    return Err(ServerError::PhaseMismatch {
                        expected: expected.to_string(),
                        current: summary.phase,
                    });
                }
            }
        }

        handle.send(op).await.map_err(ServerError::from)
    }

    /// Convenience wrapper for order submission requests, which additionally
    /// check that the submitting token controls the named power.
    pub async fn submit_orders(
        &self,
        token: &Token,
        game_id: &str,
        nation: &Nation,
        expected_phase: &str,
        order_texts: Vec<String>,
        retreat: bool,
        build: bool,
    ) -> Result<MutationOutcome, ServerError> {
        {
            let registry = self.registry.lock().await;
            let channel = registry.channel(token)?;
            let instance = channel
                .roles_in(game_id)
                .ok_or_else(|| ServerError::Auth("not joined to this game".into()))?;
            if !instance.controls(nation) {
                return Err(ServerError::Auth(format!("token does not control {nation}")));
            }
        }

        let op = match (retreat, build) {
            (true, false) => Operation::SubmitRetreatOrders {
                nation: nation.clone(),
                order_texts,
            },
            (false, true) => Operation::SubmitBuildOrders {
                nation: nation.clone(),
                order_texts,
            },
            (false, false) => Operation::SubmitMainOrders {
                nation: nation.clone(),
                order_texts,
            },
            (true, true) => {
                return Err(ServerError::Conflict(
                    "a request cannot be both a retreat and a build submission".into(),
                ))
            }
        };

        self.dispatch_game_request(token, game_id, Some(expected_phase), op)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Role, User};
    use diplomacy::game::Game;
    use std::collections::{BTreeSet, HashMap};

    async fn make_dispatcher_with_game() -> (Dispatcher, Token, String) {
        let registry = Arc::new(Mutex::new(SessionRegistry::new()));
        {
            let mut reg = registry.lock().await;
            reg.register_user(User::new("alice", "pw")).unwrap();
        }
        let token = {
            let mut reg = registry.lock().await;
            let token = reg.sign_in("alice", "pw").unwrap();
            reg.create_channel(token.clone()).unwrap();
            reg.channel_mut(&token)
                .unwrap()
                .join("g1", Role::Power(Nation::from("ENG")));
            token
        };

        let mut game = Game::new(
            "g1",
            vec![Nation::from("ENG"), Nation::from("FRA")],
            BTreeSet::new(),
        );
        game.start().unwrap();

        let notifier = Arc::new(Mutex::new(crate::notifier::Notifier::new()));
        let handle = crate::game_actor::spawn(game, notifier, registry.clone());

        let mut games = HashMap::new();
        games.insert("g1".to_string(), handle);
        let games = Arc::new(Mutex::new(games));

        let dispatcher = Dispatcher::new(registry, games);
        (dispatcher, token, "g1".to_string())
    }

    #[tokio::test]
    async fn phase_mismatch_is_rejected_before_reaching_the_game() {
        let (dispatcher, token, game_id) = make_dispatcher_with_game().await;
        let result = dispatcher
            .submit_orders(
                &token,
                &game_id,
                &Nation::from("ENG"),
                "not-a-real-phase",
                vec![],
                false,
                false,
            )
            .await;
        assert!(matches!(result, Err(ServerError::PhaseMismatch { .. })));
    }

    #[tokio::test]
    async fn foreign_power_submission_is_rejected() {
        let (dispatcher, token, game_id) = make_dispatcher_with_game().await;
        let result = dispatcher
            .submit_orders(
                &token,
                &game_id,
                &Nation::from("FRA"),
                "S1901M",
                vec![],
                false,
                false,
            )
            .await;
        assert!(matches!(result, Err(ServerError::Auth(_))));
    }

    #[tokio::test]
    async fn unknown_game_id_is_not_found() {
        let (dispatcher, token, _) = make_dispatcher_with_game().await;
        let result = dispatcher
            .dispatch_game_request(&token, "ghost", None, Operation::Process)
            .await;
        assert!(matches!(result, Err(ServerError::NotFound(_))));
    }
}
