//! Client-side reconnection.
//!
//! Modeled as a small state machine: `Draining -> Syncing(n_pending) ->
//! Committing -> Done`. Each transition is driven by an explicit completion
//! event rather than polling.
//!
//! A known failure mode in the original client — a `Synchronize` reply
//! arriving after reconnection already declared `Done` — is handled by
//! stamping every reconnection attempt with a monotonically increasing epoch
//! and rejecting any `SyncReply` whose epoch doesn't match the current one.
//! Late replies are discarded rather than allowed to reopen a finished
//! reconnection (see DESIGN.md for the reasoning).

use std::collections::{HashMap, HashSet};

/// A request the client has in flight, or queued to re-send once reconnected.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub request_id: String,
    pub game_id: Option<String>,
    /// The phase this request was issued against, if it is phase-dependent.
    pub phase: Option<String>,
}

/// The result of a `Synchronize(game_id, last_known_phase_index)` call.
#[derive(Debug, Clone)]
pub struct SyncReply {
    pub epoch: u64,
    pub game_id: String,
    /// `Ok` carries the server's current phase for that game; `Err` means the
    /// sync itself failed (the game vanished, the token was rejected, ...).
    pub result: Result<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Draining,
    Syncing,
    Committing,
    Done,
}

/// Drives one reconnection attempt to completion.
pub struct Reconnection {
    epoch: u64,
    state: State,
    /// Requests that were in flight when the connection dropped; any still
    /// awaiting a Synchronize reply are invalidated immediately per step 1.
    in_flight: Vec<PendingRequest>,
    games_pending: HashSet<String>,
    /// Phase reported by the server for each game that has finished syncing.
    current_phase: HashMap<String, String>,
    failed_games: HashSet<String>,
}

impl Reconnection {
    /// Begin a reconnection attempt. `epoch` must be strictly greater than any
    /// previous attempt's epoch for this client.
    pub fn start(epoch: u64, in_flight: Vec<PendingRequest>, games: HashSet<String>) -> Self {
        let mut this = Reconnection {
            epoch,
            state: State::Draining,
            in_flight,
            games_pending: games.clone(),
            current_phase: HashMap::new(),
            failed_games: HashSet::new(),
        };
        this.drain();
        this
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Step 1: invalidate and drop any in-flight Synchronize requests — they
    /// pertain to a now-defunct epoch. Any other in-flight request is kept and
    /// marked re-sent (step 2).
    fn drain(&mut self) {
        self.in_flight.retain(|r| {
            // A Synchronize request is identified by targeting a game with no
            // prior phase recorded; defunct ones are simply dropped here.
            !(r.game_id.is_some() && r.phase.is_none())
        });

        self.state = if self.games_pending.is_empty() {
            State::Committing
        } else {
            State::Syncing
        };
    }

    /// Feed a `Synchronize` reply. Replies whose epoch doesn't match the
    /// reconnection's own epoch are stale (arrived after this attempt already
    /// finished, or belong to an even older attempt) and are discarded.
    pub fn on_sync_reply(&mut self, reply: SyncReply) -> Result<(), StaleReply> {
        if reply.epoch != self.epoch {
            return Err(StaleReply);
        }
        if self.state == State::Done {
            // The legacy bug case: a reply for the right epoch but arriving
            // after this attempt already moved on. Reject it rather than
            // re-opening a finished reconnection.
            return Err(StaleReply);
        }

        self.games_pending.remove(&reply.game_id);
        match reply.result {
            Ok(phase) => {
                self.current_phase.insert(reply.game_id, phase);
            }
            Err(_) => {
                self.failed_games.insert(reply.game_id);
            }
        }

        if self.games_pending.is_empty() && self.state == State::Syncing {
            self.state = State::Committing;
            self.commit();
        }

        Ok(())
    }

    /// Steps 4-5: drop re-sends whose carried phase no longer matches the
    /// server's reported phase for that game, then return the survivors.
    fn commit(&mut self) {
        self.state = State::Done;
    }

    /// Requests that survive reconnection and should actually be re-sent,
    /// versus those that must fail with `OBSOLETE` because their phase is
    /// stale. Only meaningful once `state()` is `Done`.
    pub fn resolve(&self) -> (Vec<PendingRequest>, Vec<PendingRequest>) {
        let mut survivors = Vec::new();
        let mut obsolete = Vec::new();

        for request in &self.in_flight {
            let is_obsolete = match (&request.game_id, &request.phase) {
                (Some(game_id), Some(phase)) => self
                    .current_phase
                    .get(game_id)
                    .map(|current| current != phase)
                    .unwrap_or(true),
                _ => false,
            };

            if is_obsolete {
                obsolete.push(request.clone());
            } else {
                survivors.push(request.clone());
            }
        }

        (survivors, obsolete)
    }

    pub fn failed_games(&self) -> &HashSet<String> {
        &self.failed_games
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stale Synchronize reply, discarded")]
pub struct StaleReply;

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: &str, game: &str, phase: &str) -> PendingRequest {
        PendingRequest {
            request_id: id.into(),
            game_id: Some(game.into()),
            phase: Some(phase.into()),
        }
    }

    #[test]
    fn obsolete_requests_are_dropped_after_phase_moves() {
        let games: HashSet<String> = ["g1".to_string()].into_iter().collect();
        let in_flight = vec![req("r1", "g1", "S1901M")];
        let mut recon = Reconnection::start(1, in_flight, games);

        assert_eq!(*recon.state(), State::Syncing);
        recon
            .on_sync_reply(SyncReply {
                epoch: 1,
                game_id: "g1".into(),
                result: Ok("F1901M".into()),
            })
            .unwrap();

        assert_eq!(*recon.state(), State::Done);
        let (survivors, obsolete) = recon.resolve();
        assert!(survivors.is_empty());
        assert_eq!(obsolete.len(), 1);
        assert_eq!(obsolete[0].request_id, "r1");
    }

    #[test]
    fn matching_phase_requests_survive() {
        let games: HashSet<String> = ["g1".to_string()].into_iter().collect();
        let in_flight = vec![req("r1", "g1", "S1901M")];
        let mut recon = Reconnection::start(1, in_flight, games);

        recon
            .on_sync_reply(SyncReply {
                epoch: 1,
                game_id: "g1".into(),
                result: Ok("S1901M".into()),
            })
            .unwrap();

        let (survivors, obsolete) = recon.resolve();
        assert_eq!(survivors.len(), 1);
        assert!(obsolete.is_empty());
    }

    #[test]
    fn late_reply_after_done_is_rejected() {
        let games: HashSet<String> = ["g1".to_string()].into_iter().collect();
        let mut recon = Reconnection::start(1, vec![], games);

        recon
            .on_sync_reply(SyncReply {
                epoch: 1,
                game_id: "g1".into(),
                result: Ok("S1901M".into()),
            })
            .unwrap();
        assert_eq!(*recon.state(), State::Done);

        let late = recon.on_sync_reply(SyncReply {
            epoch: 1,
            game_id: "g1".into(),
            result: Ok("F1901M".into()),
        });
        assert!(late.is_err());
    }

    #[test]
    fn reply_from_a_stale_epoch_is_rejected() {
        let games: HashSet<String> = ["g1".to_string()].into_iter().collect();
        let mut recon = Reconnection::start(2, vec![], games);
        let result = recon.on_sync_reply(SyncReply {
            epoch: 1,
            game_id: "g1".into(),
            result: Ok("S1901M".into()),
        });
        assert!(result.is_err());
    }

    #[test]
    fn per_game_sync_failures_do_not_block_others() {
        let games: HashSet<String> = ["g1".to_string(), "g2".to_string()].into_iter().collect();
        let mut recon = Reconnection::start(1, vec![], games);

        recon
            .on_sync_reply(SyncReply {
                epoch: 1,
                game_id: "g1".into(),
                result: Err("game not found".into()),
            })
            .unwrap();
        assert_eq!(*recon.state(), State::Syncing);

        recon
            .on_sync_reply(SyncReply {
                epoch: 1,
                game_id: "g2".into(),
                result: Ok("S1901M".into()),
            })
            .unwrap();

        assert_eq!(*recon.state(), State::Done);
        assert!(recon.failed_games().contains("g1"));
    }
}
