//! Tournament section aggregate and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Player, PlayerId, Points, Round, SectionId};

/// A tournament section: roster, rounds, and lifecycle flags.
///
/// Sections start `Open` (registration allowed) and are `Locked` before
/// the first round is paired. Locking freezes the roster; `reset` reopens
/// the section and clears all rounds and score state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier (derived from the section name)
    pub id: SectionId,

    /// Section name
    pub name: String,

    /// Whether the UI collects USCF attributes; the engine never branches on it
    #[serde(default)]
    pub uscf_mode: bool,

    /// Total number of rounds to be played
    pub planned_rounds: u32,

    /// Locked sections have a frozen roster and may be paired
    #[serde(default)]
    pub locked: bool,

    /// Registered players, in registration order
    #[serde(default)]
    pub players: Vec<Player>,

    /// Completed and in-progress rounds, in order
    #[serde(default)]
    pub rounds: Vec<Round>,

    /// When this section was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Section {
    /// Create a new Section with auto-generated ID.
    pub fn new(name: impl Into<String>, planned_rounds: u32) -> Self {
        let name = name.into();
        let id = EntityId::generate(&[&name]);

        Self {
            id,
            name,
            uscf_mode: false,
            planned_rounds,
            locked: false,
            players: Vec::new(),
            rounds: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder method to enable USCF mode.
    pub fn with_uscf_mode(mut self, uscf_mode: bool) -> Self {
        self.uscf_mode = uscf_mode;
        self
    }

    /// Look up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    /// Mutable lookup by id.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == *id)
    }

    /// Look up a player by display name.
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Look up a round by number.
    pub fn round(&self, number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.number == number)
    }

    /// Mutable lookup by round number.
    pub fn round_mut(&mut self, number: u32) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.number == number)
    }

    /// Ids of players still eligible for pairing, in registration order.
    pub fn active_player_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !p.withdrawn)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Freeze the roster. Idempotent.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Reopen the section: clear all rounds and every player's score state.
    ///
    /// The registered roster survives, including `withdrawn` flags.
    pub fn reset(&mut self) {
        self.rounds.clear();
        self.locked = false;
        for player in &mut self.players {
            player.score = Points::ZERO;
            player.opponents.clear();
            player.colors.clear();
            player.results.clear();
            player.had_bye = false;
        }
    }
}
