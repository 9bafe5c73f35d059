//! Fan-out of typed notifications to subscribed sessions, ordered per
//! recipient.
//!
//! Each session owns one outbound `mpsc` channel (the same shape as a
//! `host_to_client_broadcaster`, generalized from "broadcast to everyone in
//! the room" to "filtered per recipient", since Diplomacy notifications are
//! not uniformly visible: a power's pending orders are secret from other
//! powers until adjudication unless a recipient is omniscient).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use diplomacy::game::{OrderResult, PhaseRecord};
use diplomacy::{Nation, ShortName};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::session::{Channel, Role, SessionRegistry, Token};
use crate::wire::NotificationFrame;

/// The notification event vocabulary.
#[derive(Debug, Clone)]
pub enum Notification {
    PhaseUpdate {
        game_id: String,
        phase: String,
    },
    GameProcessed {
        game_id: String,
        record: PhaseRecordSummary,
    },
    PowerOrdersUpdate {
        game_id: String,
        nation: Nation,
        order_count: usize,
    },
    PowerVoteUpdate {
        game_id: String,
        nation: Nation,
        vote: bool,
    },
    GameStatusUpdate {
        game_id: String,
        status: String,
    },
    ClearedCenters {
        game_id: String,
    },
    /// A power's controller departed (`in_disorder: true`) or reclaimed the
    /// seat (`false`). Public: which powers are vacant is visible to anyone
    /// watching the game.
    PowerStatusUpdate {
        game_id: String,
        nation: Nation,
        in_disorder: bool,
    },
    AccountDeleted {
        username: String,
    },
    OmniscientUpdated {
        game_id: String,
        nation: Nation,
        orders: Vec<String>,
    },
}

/// An owned, serializable summary of a [`PhaseRecord`], independent of the
/// adjudicator's internal borrow lifetimes.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseRecordSummary {
    pub results: Vec<OrderResultSummary>,
    pub dislodged_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResultSummary {
    pub order_text: String,
    pub result: String,
}

impl From<&PhaseRecord> for PhaseRecordSummary {
    fn from(record: &PhaseRecord) -> Self {
        PhaseRecordSummary {
            results: record
                .results
                .iter()
                .map(OrderResultSummary::from)
                .collect(),
            dislodged_count: record.dislodged.len(),
        }
    }
}

impl From<&OrderResult> for OrderResultSummary {
    fn from(r: &OrderResult) -> Self {
        OrderResultSummary {
            order_text: r.order_text.clone(),
            result: format!("{:?}", r.result),
        }
    }
}

impl Notification {
    fn name(&self) -> &'static str {
        match self {
            Notification::PhaseUpdate { .. } => "phase_update",
            Notification::GameProcessed { .. } => "game_processed",
            Notification::PowerOrdersUpdate { .. } => "power_orders_update",
            Notification::PowerVoteUpdate { .. } => "power_vote_update",
            Notification::GameStatusUpdate { .. } => "game_status_update",
            Notification::ClearedCenters { .. } => "cleared_centers",
            Notification::PowerStatusUpdate { .. } => "power_status_update",
            Notification::AccountDeleted { .. } => "account_deleted",
            Notification::OmniscientUpdated { .. } => "omniscient_updated",
        }
    }

    fn game_id(&self) -> Option<&str> {
        match self {
            Notification::PhaseUpdate { game_id, .. }
            | Notification::GameProcessed { game_id, .. }
            | Notification::PowerOrdersUpdate { game_id, .. }
            | Notification::PowerVoteUpdate { game_id, .. }
            | Notification::GameStatusUpdate { game_id, .. }
            | Notification::ClearedCenters { game_id }
            | Notification::PowerStatusUpdate { game_id, .. }
            | Notification::OmniscientUpdated { game_id, .. } => Some(game_id),
            Notification::AccountDeleted { .. } => None,
        }
    }

    fn fields(&self) -> Value {
        match self {
            Notification::PhaseUpdate { phase, .. } => json!({ "phase": phase }),
            Notification::GameProcessed { record, .. } => json!({ "record": record }),
            Notification::PowerOrdersUpdate {
                nation,
                order_count,
                ..
            } => json!({ "nation": nation.short_name(), "order_count": order_count }),
            Notification::PowerVoteUpdate { nation, vote, .. } => {
                json!({ "nation": nation.short_name(), "vote": vote })
            }
            Notification::GameStatusUpdate { status, .. } => json!({ "status": status }),
            Notification::ClearedCenters { .. } => json!({}),
            Notification::PowerStatusUpdate { nation, in_disorder, .. } => {
                json!({ "nation": nation.short_name(), "in_disorder": in_disorder })
            }
            Notification::AccountDeleted { username } => json!({ "username": username }),
            Notification::OmniscientUpdated { nation, orders, .. } => {
                json!({ "nation": nation.short_name(), "orders": orders })
            }
        }
    }

    /// Whether a session holding `instance`'s roles may see this notification.
    /// Order contents prior to adjudication are secret from everyone but the
    /// owning power and omniscient observers; everything else is public.
    fn visible_to(&self, channel: &Channel, game_id: &str) -> bool {
        let Some(instance) = channel.roles_in(game_id) else {
            return false;
        };

        match self {
            Notification::PowerOrdersUpdate { nation, .. } => {
                instance.can_see_orders_before_adjudication() || instance.controls(nation)
            }
            Notification::OmniscientUpdated { .. } => instance.can_see_orders_before_adjudication(),
            _ => !instance.roles.is_empty(),
        }
    }
}

/// Per-session outbound queue, preserving commit order for that recipient.
pub struct SessionOutbox {
    pub sender: mpsc::UnboundedSender<NotificationFrame>,
}

/// Computes recipient sets and writes notifications to each session's outbox
/// in generating-mutation order.
pub struct Notifier {
    outboxes: HashMap<Token, mpsc::UnboundedSender<NotificationFrame>>,
    next_id: AtomicU64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Notifier {
            outboxes: HashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn register(&mut self, token: Token) -> mpsc::UnboundedReceiver<NotificationFrame> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outboxes.insert(token, tx);
        rx
    }

    pub fn unregister(&mut self, token: &Token) {
        self.outboxes.remove(token);
    }

    /// Deliver a notification, computing its recipient set from `registry`.
    ///
    /// Must be called in the order the generating mutations committed; this
    /// function makes no attempt to reorder, so callers own that invariant —
    /// notifications to a session must preserve the commit order of the
    /// mutations that generated them.
    pub fn publish(&self, registry: &SessionRegistry, notification: Notification) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let name = notification.name().to_string();
        let fields = notification.fields();

        let recipients: Vec<(Token, Option<String>)> = match notification.game_id() {
            Some(game_id) => registry
                .channels_in_game(game_id)
                .filter(|c| notification.visible_to(c, game_id))
                .map(|c| (c.token.clone(), Some(game_id.to_string())))
                .collect(),
            None => {
                // Connection-scoped notifications (e.g. account deletion) have no
                // game-wide recipient set; deliver them with `notify_token` instead.
                Vec::new()
            }
        };

        for (token, game_id) in recipients {
            if let Some(sender) = self.outboxes.get(&token) {
                let _ = sender.send(NotificationFrame {
                    notification_id: id,
                    name: name.clone(),
                    token,
                    game_id,
                    fields: fields.clone(),
                });
            }
        }
    }

    /// Deliver an `AccountDeleted` notification directly to one still-registered
    /// token (sent just before that session's channel is torn down).
    pub fn notify_token(&self, token: &Token, notification: Notification) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        if let Some(sender) = self.outboxes.get(token) {
            let _ = sender.send(NotificationFrame {
                notification_id: id,
                name: notification.name().to_string(),
                token: token.clone(),
                game_id: notification.game_id().map(str::to_string),
                fields: notification.fields(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{GameInstance, Role, User};

    fn registry_with_observer(game_id: &str) -> (SessionRegistry, Token) {
        let mut registry = SessionRegistry::new();
        registry.register_user(User::new("alice", "pw")).unwrap();
        let token = registry.sign_in("alice", "pw").unwrap();
        registry.create_channel(token.clone()).unwrap();
        registry
            .channel_mut(&token)
            .unwrap()
            .join(game_id, Role::Observer);
        (registry, token)
    }

    #[test]
    fn observer_does_not_see_pre_adjudication_orders() {
        let (registry, token) = registry_with_observer("g1");
        let mut notifier = Notifier::new();
        let mut rx = notifier.register(token.clone());

        notifier.publish(
            &registry,
            Notification::PowerOrdersUpdate {
                game_id: "g1".into(),
                nation: Nation::from("ENG"),
                order_count: 3,
            },
        );

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn power_sees_its_own_orders_update() {
        let mut registry = SessionRegistry::new();
        registry.register_user(User::new("bob", "pw")).unwrap();
        let token = registry.sign_in("bob", "pw").unwrap();
        registry.create_channel(token.clone()).unwrap();
        let eng = Nation::from("ENG");
        registry
            .channel_mut(&token)
            .unwrap()
            .join("g1", Role::Power(eng.clone()));

        let mut notifier = Notifier::new();
        let mut rx = notifier.register(token.clone());

        notifier.publish(
            &registry,
            Notification::PowerOrdersUpdate {
                game_id: "g1".into(),
                nation: eng,
                order_count: 2,
            },
        );

        let frame = rx.try_recv().expect("notification delivered");
        assert_eq!(frame.name, "power_orders_update");
    }

    #[test]
    fn ordering_is_preserved_per_session() {
        let (registry, token) = registry_with_observer("g1");
        let mut notifier = Notifier::new();
        let mut rx = notifier.register(token);

        for phase in ["S1901M", "F1901M", "F1901A"] {
            notifier.publish(
                &registry,
                Notification::PhaseUpdate {
                    game_id: "g1".into(),
                    phase: phase.into(),
                },
            );
        }

        let mut seen = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            seen.push(frame.fields["phase"].as_str().unwrap().to_string());
        }
        assert_eq!(seen, vec!["S1901M", "F1901M", "F1901A"]);
    }

    #[allow(dead_code)]
    fn _type_check(_: GameInstance) {}
}
