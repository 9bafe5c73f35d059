//! Deadline-driven phase processing.
//!
//! A single min-heap keyed by `(Instant, GameId)`. Deadline extensions are
//! advisory: rather than removing a stale heap entry when a game's deadline
//! changes, the scheduler stamps each entry with an epoch number and
//! re-checks it against the game's current epoch at pop time (lazy
//! cancellation).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;

/// One entry in the deadline heap.
#[derive(Debug, Clone, Eq, PartialEq)]
struct Entry {
    at: Instant,
    game_id: String,
    epoch: u64,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.at.cmp(&other.at).then_with(|| self.game_id.cmp(&other.game_id))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Tracks the current deadline epoch for every scheduled game so popped heap
/// entries can be checked for staleness without removing anything from the
/// heap.
#[derive(Debug, Default)]
pub struct DeadlineTable {
    epochs: HashMap<String, u64>,
}

impl DeadlineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new deadline for `game_id`, bumping its epoch. Returns the new
    /// epoch so the caller can push a matching heap entry.
    pub fn set(&mut self, game_id: &str) -> u64 {
        let epoch = self.epochs.entry(game_id.to_string()).or_insert(0);
        *epoch += 1;
        *epoch
    }

    /// Remove a game's deadline tracking entirely (e.g. on completion).
    pub fn clear(&mut self, game_id: &str) {
        self.epochs.remove(game_id);
    }

    fn is_current(&self, game_id: &str, epoch: u64) -> bool {
        self.epochs.get(game_id) == Some(&epoch)
    }
}

/// A deadline heap plus a channel to deliver `process` signals on.
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    table: DeadlineTable,
    fire: mpsc::UnboundedSender<String>,
}

impl Scheduler {
    /// `fire` receives a game id each time that game's deadline is reached and
    /// still current; the caller enqueues a `process` mutation on that game's
    /// actor channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Scheduler {
                heap: BinaryHeap::new(),
                table: DeadlineTable::new(),
                fire: tx,
            },
            rx,
        )
    }

    /// Schedule (or reschedule) `game_id` to process at `deadline`. Any
    /// previously scheduled entry for this game becomes stale and is dropped
    /// lazily the next time it would pop.
    pub fn schedule(&mut self, game_id: &str, deadline: Instant) {
        let epoch = self.table.set(game_id);
        self.heap.push(Reverse(Entry {
            at: deadline,
            game_id: game_id.to_string(),
            epoch,
        }));
    }

    pub fn cancel(&mut self, game_id: &str) {
        self.table.clear(game_id);
    }

    /// Pop and fire every entry whose deadline has passed and is still
    /// current. Returns the number of games actually fired, for tests.
    pub fn drain_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.at > now {
                break;
            }
            let Reverse(entry) = self.heap.pop().unwrap();
            if self.table.is_current(&entry.game_id, entry.epoch) {
                let _ = self.fire.send(entry.game_id);
                fired += 1;
            }
        }
        fired
    }

    /// The next deadline in the heap, stale entries included — used only to
    /// size the sleep between drain passes.
    fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(e)| e.at)
    }

    /// Run forever, waking at the next deadline (or on a fixed tick if the
    /// heap is momentarily empty) and firing due entries.
    pub async fn run(mut self) {
        loop {
            let sleep_for = self
                .next_deadline()
                .map(|at| at.saturating_duration_since(Instant::now()))
                .unwrap_or(Duration::from_secs(1));

            tokio::time::sleep(sleep_for).await;
            self.drain_due(Instant::now());
        }
    }
}

/// Drive a [`Scheduler`] shared behind a lock, so callers elsewhere (e.g. the
/// `Server` aggregate computing a freshly-processed game's next deadline) can
/// push new entries onto the same heap this loop is waking on, rather than
/// each owning a scheduler of its own.
pub async fn run_shared(scheduler: Arc<Mutex<Scheduler>>) {
    loop {
        let sleep_for = {
            let guard = scheduler.lock().await;
            guard
                .next_deadline()
                .map(|at| at.saturating_duration_since(Instant::now()))
                .unwrap_or(Duration::from_secs(1))
        };

        tokio::time::sleep(sleep_for).await;
        scheduler.lock().await.drain_due(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn rescheduling_drops_the_stale_entry() {
        let (mut scheduler, mut rx) = Scheduler::new();
        let now = Instant::now();

        scheduler.schedule("g1", now + Duration::from_secs(10));
        scheduler.schedule("g1", now + Duration::from_secs(20));

        // The stale 10s entry should not fire even though its deadline has passed.
        let fired = scheduler.drain_due(now + Duration::from_secs(15));
        assert_eq!(fired, 0);
        assert!(rx.try_recv().is_err());

        let fired = scheduler.drain_due(now + Duration::from_secs(25));
        assert_eq!(fired, 1);
        assert_eq!(rx.try_recv().unwrap(), "g1");
    }

    #[tokio::test(start_paused = true)]
    async fn independent_games_both_fire() {
        let (mut scheduler, mut rx) = Scheduler::new();
        let now = Instant::now();
        scheduler.schedule("g1", now + Duration::from_secs(5));
        scheduler.schedule("g2", now + Duration::from_secs(5));

        let fired = scheduler.drain_due(now + Duration::from_secs(6));
        assert_eq!(fired, 2);
        let mut seen = vec![rx.try_recv().unwrap(), rx.try_recv().unwrap()];
        seen.sort();
        assert_eq!(seen, vec!["g1", "g2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_future_fire() {
        let (mut scheduler, mut rx) = Scheduler::new();
        let now = Instant::now();
        scheduler.schedule("g1", now + Duration::from_secs(5));
        scheduler.cancel("g1");

        let fired = scheduler.drain_due(now + Duration::from_secs(6));
        assert_eq!(fired, 0);
        assert!(rx.try_recv().is_err());
    }
}
