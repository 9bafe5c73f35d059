//! Phase string rendering for the wire protocol: `<S|F|W><YYYY><M|R|A>`, plus
//! the literals `FORMING` and `COMPLETED`.
//!
//! The engine's own [`ShortName`] for [`Time`] uses `B` for the build phase
//! (its internal vocabulary calls it "build", not "adjustment"); the wire
//! vocabulary calls the same phase `A`. This module is the single place that
//! translates between the two so the rest of `server` only ever produces
//! wire-shaped phase strings.

use diplomacy::game::GameStatus;
use diplomacy::time::Time;
use diplomacy::ShortName;

/// Render a game's current phase for the wire, given its status and (if
/// active) its current time.
pub fn game_phase_string(status: &GameStatus, time: Time) -> String {
    match status {
        GameStatus::Forming => "FORMING".to_string(),
        GameStatus::Completed(_) => "COMPLETED".to_string(),
        GameStatus::Active => time_phase_string(time),
    }
}

/// Render a bare [`Time`] as `<S|F|W><YYYY><M|R|A>`.
pub fn time_phase_string(time: Time) -> String {
    let raw = time.short_name().into_owned();
    if let Some(stripped) = raw.strip_suffix('B') {
        format!("{stripped}A")
    } else {
        raw
    }
}
