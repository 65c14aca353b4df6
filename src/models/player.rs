//! Player roster records and per-round history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId, Points};

/// Board color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The other color.
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// One entry in a player's per-round history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Round number this entry belongs to
    pub round: u32,

    /// Opponent id; None iff this was a bye
    #[serde(default)]
    pub opponent_id: Option<PlayerId>,

    /// Points earned (0, 0.5 or 1)
    pub points: Points,

    /// Whether this was a bye
    #[serde(default)]
    pub is_bye: bool,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier (derived from section name + player name)
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Rating; 0 means unrated
    #[serde(default)]
    pub rating: u32,

    /// External USCF membership id, opaque to the engine
    #[serde(default)]
    pub uscf_id: Option<String>,

    /// Running score
    #[serde(default)]
    pub score: Points,

    /// Opponents faced, one per non-bye game, in round order
    #[serde(default)]
    pub opponents: Vec<PlayerId>,

    /// Colors held, aligned positionally with `opponents`
    #[serde(default)]
    pub colors: Vec<Color>,

    /// Per-round result history
    #[serde(default)]
    pub results: Vec<GameRecord>,

    /// Whether the player has received a bye in any round
    #[serde(default)]
    pub had_bye: bool,

    /// Withdrawn players are excluded from future pairings
    #[serde(default)]
    pub withdrawn: bool,

    /// When this player registered
    #[serde(default = "Utc::now")]
    pub registered_at: DateTime<Utc>,
}

impl Player {
    /// Create a new Player with auto-generated ID.
    pub fn new(section_name: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        let id = EntityId::generate(&[section_name, &name]);

        Self {
            id,
            name,
            rating: 0,
            uscf_id: None,
            score: Points::ZERO,
            opponents: Vec::new(),
            colors: Vec::new(),
            results: Vec::new(),
            had_bye: false,
            withdrawn: false,
            registered_at: Utc::now(),
        }
    }

    /// Builder method to set rating.
    pub fn with_rating(mut self, rating: u32) -> Self {
        self.rating = rating;
        self
    }

    /// Builder method to set USCF id.
    pub fn with_uscf_id(mut self, uscf_id: String) -> Self {
        self.uscf_id = Some(uscf_id);
        self
    }

    /// Whether this player has already faced `opponent`.
    pub fn has_played(&self, opponent: &PlayerId) -> bool {
        self.opponents.contains(opponent)
    }

    /// Count of (whites, blacks) held so far.
    pub fn color_counts(&self) -> (usize, usize) {
        let whites = self.colors.iter().filter(|c| **c == Color::White).count();
        (whites, self.colors.len() - whites)
    }

    /// True iff the player's last two games were both played as `color`.
    pub fn last_two_were(&self, color: Color) -> bool {
        self.colors.len() >= 2 && self.colors[self.colors.len() - 2..].iter().all(|c| *c == color)
    }

    /// Record a game against `opponent` holding `color`.
    ///
    /// Called by the pairer at pairing time so that later pairings in the
    /// same round observe the update.
    pub fn record_game(&mut self, opponent: PlayerId, color: Color) {
        self.opponents.push(opponent);
        self.colors.push(color);
    }

    /// Number of non-bye games recorded.
    pub fn games_played(&self) -> usize {
        self.opponents.len()
    }

    /// Recompute `had_bye` from the result history.
    pub fn sync_bye_flag(&mut self) {
        self.had_bye = self.results.iter().any(|r| r.is_bye);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new("Open", "Alice");

        assert_eq!(player.name, "Alice");
        assert_eq!(player.rating, 0);
        assert_eq!(player.score, Points::ZERO);
        assert!(player.opponents.is_empty());
        assert!(!player.had_bye);
        assert!(!player.withdrawn);
    }

    #[test]
    fn test_player_id_deterministic() {
        let p1 = Player::new("Open", "Alice");
        let p2 = Player::new("Open", "Alice");
        assert_eq!(p1.id, p2.id);

        let p3 = Player::new("Reserve", "Alice");
        assert_ne!(p1.id, p3.id);
    }

    #[test]
    fn test_player_builder() {
        let player = Player::new("Open", "Alice")
            .with_rating(1800)
            .with_uscf_id("12345678".to_string());

        assert_eq!(player.rating, 1800);
        assert_eq!(player.uscf_id, Some("12345678".to_string()));
    }

    #[test]
    fn test_record_game_keeps_alignment() {
        let mut player = Player::new("Open", "Alice");
        let opp = EntityId::from("opp-1");

        player.record_game(opp.clone(), Color::White);

        assert_eq!(player.opponents.len(), player.colors.len());
        assert!(player.has_played(&opp));
        assert_eq!(player.games_played(), 1);
    }

    #[test]
    fn test_color_counts() {
        let mut player = Player::new("Open", "Alice");
        player.record_game(EntityId::from("a"), Color::White);
        player.record_game(EntityId::from("b"), Color::Black);
        player.record_game(EntityId::from("c"), Color::White);

        assert_eq!(player.color_counts(), (2, 1));
    }

    #[test]
    fn test_last_two_were() {
        let mut player = Player::new("Open", "Alice");
        assert!(!player.last_two_were(Color::White));

        player.record_game(EntityId::from("a"), Color::White);
        assert!(!player.last_two_were(Color::White));

        player.record_game(EntityId::from("b"), Color::White);
        assert!(player.last_two_were(Color::White));
        assert!(!player.last_two_were(Color::Black));

        player.record_game(EntityId::from("c"), Color::Black);
        assert!(!player.last_two_were(Color::White));
    }

    #[test]
    fn test_sync_bye_flag() {
        let mut player = Player::new("Open", "Alice");
        player.results.push(GameRecord {
            round: 1,
            opponent_id: None,
            points: Points::ONE,
            is_bye: true,
        });

        player.sync_bye_flag();
        assert!(player.had_bye);

        player.results.clear();
        player.sync_bye_flag();
        assert!(!player.had_bye);
    }

    #[test]
    fn test_player_deserializes_with_defaults() {
        // Missing optional fields come back as defaults
        let json = r#"{"id": "abc", "name": "Alice"}"#;
        let player: Player = serde_json::from_str(json).unwrap();

        assert_eq!(player.rating, 0);
        assert_eq!(player.score, Points::ZERO);
        assert!(player.opponents.is_empty());
        assert!(player.results.is_empty());
        assert!(!player.had_bye);
        assert!(!player.withdrawn);
    }

    #[test]
    fn test_player_serialization_roundtrip() {
        let mut player = Player::new("Open", "Alice").with_rating(1650);
        player.score = Points::from_f64(2.5);
        player.results.push(GameRecord {
            round: 1,
            opponent_id: Some(EntityId::from("opp")),
            points: Points::ONE,
            is_bye: false,
        });

        let json = serde_json::to_string(&player).unwrap();
        let deserialized: Player = serde_json::from_str(&json).unwrap();

        assert_eq!(player, deserialized);
    }
}
