//! Users, tokens, channels, and per-game instance sets.
//!
//! A [`Token`] identifies a signed-in [`User`]. A [`Channel`] is one live
//! connection's view: the set of [`GameInstance`]s it has joined, each as one
//! or more [`Role`]s (a single channel can hold both an observer view and a
//! power view of the same game).

use std::collections::{HashMap, HashSet};

use diplomacy::Nation;
use rand::RngCore;

use crate::error::ServerError;

/// An opaque 128-bit bearer token. Never derived from user-controllable input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Token(String);

impl Token {
    /// Mint a new random token using the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Token(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account. Password comparison is an opaque equality check;
/// real credential hashing is out of scope for this layer.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    password: String,
    /// Every live token issued to this user, so revoking the account invalidates
    /// all of them at once.
    tokens: HashSet<Token>,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        User {
            username: username.into(),
            password: password.into(),
            tokens: HashSet::new(),
        }
    }

    fn check_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// The view a session holds of one joined game: which roles it plays there.
/// A channel may hold more than one role in the same game (e.g. the creator
/// observing while also controlling a power).
#[derive(Debug, Clone, Default)]
pub struct GameInstance {
    pub roles: HashSet<Role>,
}

impl GameInstance {
    pub fn can_see_orders_before_adjudication(&self) -> bool {
        self.roles.contains(&Role::Omniscient)
    }

    pub fn controls(&self, nation: &Nation) -> bool {
        self.roles.contains(&Role::Power(nation.clone()))
    }
}

/// What a joined session is allowed to do in a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Sees public game state only; cannot submit orders.
    Observer,
    /// Sees all powers' pending orders before adjudication, in addition to
    /// everything an observer sees.
    Omniscient,
    /// Controls one power: may submit orders and votes for that nation.
    Power(Nation),
}

/// One live connection's view of the server: the user it authenticated as and
/// the games it has joined.
#[derive(Debug, Clone)]
pub struct Channel {
    pub token: Token,
    pub games: HashMap<String, GameInstance>,
}

impl Channel {
    fn new(token: Token) -> Self {
        Channel {
            token,
            games: HashMap::new(),
        }
    }

    pub fn join(&mut self, game_id: impl Into<String>, role: Role) {
        self.games.entry(game_id.into()).or_default().roles.insert(role);
    }

    pub fn roles_in(&self, game_id: &str) -> Option<&GameInstance> {
        self.games.get(game_id)
    }
}

/// A game's registration gate, used to decide whether joining as a given
/// role requires the game's `registration_password` (see DESIGN.md: the
/// password gates the `Power` role only; `Observer` and `Omniscient` are
/// always free to join).
pub fn role_requires_password(role: &Role) -> bool {
    matches!(role, Role::Power(_))
}

/// The server-wide registries: token → user, user → tokens, channel → state.
/// Mutations to this registry serialise under its own lock; it does not share
/// a lock with any per-game state.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    users: HashMap<String, User>,
    tokens: HashMap<Token, String>,
    channels: HashMap<Token, Channel>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_user(&mut self, user: User) -> Result<(), ServerError> {
        if self.users.contains_key(&user.username) {
            return Err(ServerError::Conflict(format!(
                "user {} already exists",
                user.username
            )));
        }
        self.users.insert(user.username.clone(), user);
        Ok(())
    }

    /// `sign_in`: exchange a username/password for a fresh token.
    pub fn sign_in(&mut self, username: &str, password: &str) -> Result<Token, ServerError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| ServerError::Auth("unknown user".into()))?;

        if !user.check_password(password) {
            return Err(ServerError::Auth("wrong password".into()));
        }

        let token = Token::generate();
        user.tokens.insert(token.clone());
        self.tokens.insert(token.clone(), username.to_string());
        Ok(token)
    }

    /// `create_channel`: open a fresh connection-scoped view for an already
    /// signed-in token.
    pub fn create_channel(&mut self, token: Token) -> Result<(), ServerError> {
        self.require_token(&token)?;
        self.channels.insert(token.clone(), Channel::new(token));
        Ok(())
    }

    pub fn require_token(&self, token: &Token) -> Result<&str, ServerError> {
        self.tokens
            .get(token)
            .map(|s| s.as_str())
            .ok_or_else(|| ServerError::Auth("unknown token".into()))
    }

    pub fn channel_mut(&mut self, token: &Token) -> Result<&mut Channel, ServerError> {
        self.channels
            .get_mut(token)
            .ok_or_else(|| ServerError::Auth("no channel for token".into()))
    }

    pub fn channel(&self, token: &Token) -> Result<&Channel, ServerError> {
        self.channels
            .get(token)
            .ok_or_else(|| ServerError::Auth("no channel for token".into()))
    }

    /// Every live token currently issued to `username`, for a caller that
    /// needs to notify or inspect those sessions before revoking them.
    pub fn tokens_for_user(&self, username: &str) -> Vec<Token> {
        self.users
            .get(username)
            .map(|user| user.tokens.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Revoke every token belonging to a user; their channels stop authenticating
    /// immediately. Used for `AccountDeleted`.
    pub fn revoke_user(&mut self, username: &str) {
        if let Some(user) = self.users.remove(username) {
            for token in &user.tokens {
                self.tokens.remove(token);
                self.channels.remove(token);
            }
        }
    }

    /// Every channel token currently joined to `game_id`, for notification fan-out.
    pub fn channels_in_game<'a>(&'a self, game_id: &'a str) -> impl Iterator<Item = &'a Channel> + 'a {
        self.channels.values().filter(move |c| c.games.contains_key(game_id))
    }
}
