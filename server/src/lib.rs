//! Session, dispatch, notification, scheduling, reconnection, DAIDE, and
//! persistence layer around the [`diplomacy`] adjudication engine.
//!
//! This crate owns no rules knowledge of its own (that lives in
//! `diplomacy::judge` and `diplomacy::game`) and instead arbitrates who may
//! mutate which game, when, and tells everyone who's watching what just
//! happened.

pub mod config;
pub mod daide;
pub mod dispatcher;
pub mod error;
pub mod game_actor;
pub mod notifier;
pub mod persistence;
pub mod phase_fmt;
pub mod reconnect;
pub mod scheduler;
pub mod server;
pub mod session;
pub mod wire;

pub use error::ServerError;
pub use server::Server;
