//! Snapshotting games and users to disk; loading on boot.
//!
//! Each game and the user database is an append-or-overwrite snapshot.
//! Writes are atomic: the new content lands in a `.tmp` sibling, which is
//! then renamed over the real path (`write-then-rename`). Persistence is not
//! transactional; durability is "last successful snapshot" — a crash between
//! the write and the rename leaves the previous snapshot intact, and a crash
//! after the rename leaves the new one intact, but there is no log to recover
//! a write that was interrupted mid-rename on a filesystem without atomic
//! rename semantics.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use diplomacy::game::Game;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A directory layout of `<data_dir>/users.json` and
/// `<data_dir>/games/<game_id>.json`.
pub struct Store {
    data_dir: PathBuf,
}

/// A game's persisted form: the engine state plus the deadline it was
/// scheduled against, so the scheduler can be primed on boot without
/// consulting the (ephemeral) in-memory scheduler of the previous run.
#[derive(Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game: Game,
    /// Seconds since `UNIX_EPOCH` at which this game's current phase should
    /// auto-process, or `None` if it has no pending deadline (e.g. `FORMING`
    /// games awaiting more seats, or `COMPLETED` games).
    pub deadline_unix_secs: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UsersSnapshot {
    pub users: Vec<UserRecord>,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Store {
            data_dir: data_dir.into(),
        }
    }

    fn games_dir(&self) -> PathBuf {
        self.data_dir.join("games")
    }

    fn game_path(&self, game_id: &str) -> PathBuf {
        self.games_dir().join(format!("{game_id}.json"))
    }

    fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    pub async fn ensure_layout(&self) -> Result<(), PersistError> {
        fs::create_dir_all(self.games_dir())
            .await
            .map_err(|source| io_err(self.games_dir(), source))
    }

    /// Atomically write `snapshot` to `<data_dir>/games/<game_id>.json`.
    pub async fn save_game(&self, game_id: &str, snapshot: &GameSnapshot) -> Result<(), PersistError> {
        let path = self.game_path(game_id);
        let body = serde_json::to_vec_pretty(snapshot)?;
        write_then_rename(&path, &body).await
    }

    pub async fn load_game(&self, game_id: &str) -> Result<GameSnapshot, PersistError> {
        let path = self.game_path(game_id);
        let bytes = fs::read(&path).await.map_err(|source| io_err(path, source))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Load every persisted game, skipping (and logging) any file that fails
    /// to parse rather than aborting the whole boot.
    pub async fn load_all_games(&self) -> Result<Vec<(String, GameSnapshot)>, PersistError> {
        self.ensure_layout().await?;
        let mut out = Vec::new();
        let mut entries = fs::read_dir(self.games_dir())
            .await
            .map_err(|source| io_err(self.games_dir(), source))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| io_err(self.games_dir(), source))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice::<GameSnapshot>(&bytes) {
                    Ok(snapshot) => out.push((stem.to_string(), snapshot)),
                    Err(e) => {
                        tracing::error!(game_id = stem, error = %e, "quarantining unreadable game snapshot");
                    }
                },
                Err(e) => {
                    tracing::error!(game_id = stem, error = %e, "failed to read game snapshot");
                }
            }
        }

        Ok(out)
    }

    pub async fn save_users(&self, snapshot: &UsersSnapshot) -> Result<(), PersistError> {
        let body = serde_json::to_vec_pretty(snapshot)?;
        write_then_rename(&self.users_path(), &body).await
    }

    pub async fn load_users(&self) -> Result<UsersSnapshot, PersistError> {
        let path = self.users_path();
        match fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UsersSnapshot::default()),
            Err(source) => Err(io_err(path, source)),
        }
    }
}

async fn write_then_rename(path: &Path, body: &[u8]) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| io_err(parent.to_path_buf(), source))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, body)
        .await
        .map_err(|source| io_err(tmp_path.clone(), source))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|source| io_err(path.to_path_buf(), source))
}

fn io_err(path: PathBuf, source: std::io::Error) -> PersistError {
    PersistError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("diplomacy-server-test-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn game_snapshot_round_trips() {
        let dir = temp_dir("game-roundtrip");
        let store = Store::new(&dir);

        let mut game = Game::new("g1", vec![diplomacy::Nation::from("ENG"), diplomacy::Nation::from("FRA")], BTreeSet::new());
        game.start().unwrap();

        let snapshot = GameSnapshot {
            game,
            deadline_unix_secs: Some(1_700_000_000),
        };

        store.save_game("g1", &snapshot).await.unwrap();
        let loaded = store.load_game("g1").await.unwrap();
        assert_eq!(loaded.deadline_unix_secs, Some(1_700_000_000));
        assert_eq!(loaded.game.id(), "g1");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_skipped_not_fatal() {
        let dir = temp_dir("corrupt-skip");
        let store = Store::new(&dir);
        store.ensure_layout().await.unwrap();
        fs::write(dir.join("games").join("broken.json"), b"not json")
            .await
            .unwrap();

        let loaded = store.load_all_games().await.unwrap();
        assert!(loaded.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_users_file_loads_as_empty() {
        let dir = temp_dir("missing-users");
        let store = Store::new(&dir);
        let users = store.load_users().await.unwrap();
        assert!(users.users.is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
