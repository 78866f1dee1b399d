use alloc::collections::btree_map::{BTreeMap, Entry};
use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// One registered player and their sheet. Players are never deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    username: String,
    sheet: SheetGrid,
}

impl Player {
    fn new(username: &str, config: SheetConfig) -> Result<Self> {
        Ok(Self {
            username: username.into(),
            sheet: SheetGrid::empty(config.size)?,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn sheet(&self) -> &SheetGrid {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut SheetGrid {
        &mut self.sheet
    }
}

/// Every known player plus the active session. This is the exact structure
/// serialized as the application blob; whole-blob replacement, last write
/// wins.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: BTreeMap<String, Player>,
    active: Option<String>,
}

impl Roster {
    /// Usernames match exactly after trimming; names differing only in case
    /// are distinct players.
    pub fn get_or_create(&mut self, username: &str, config: SheetConfig) -> Result<&mut Player> {
        let username = username.trim();
        if username.is_empty() {
            return Err(TrackerError::EmptyUsername);
        }

        match self.players.entry(username.into()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                log::debug!("creating player {:?}", username);
                Ok(entry.insert(Player::new(username, config)?))
            }
        }
    }

    pub fn player(&self, username: &str) -> Option<&Player> {
        self.players.get(username.trim())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn set_active(&mut self, username: Option<&str>) {
        self.active = username.map(String::from);
    }

    pub fn active_username(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Resolves the recorded session. A username that no longer maps to a
    /// stored player reads as logged-out rather than failing.
    pub fn active_player(&self) -> Option<&Player> {
        self.players.get(self.active.as_deref()?)
    }

    pub fn active_player_mut(&mut self) -> Option<&mut Player> {
        let active = self.active.clone()?;
        self.players.get_mut(&active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_a_player_once_and_returns_it_afterwards() {
        let mut roster = Roster::default();

        roster.get_or_create("Alice", SheetConfig::default()).unwrap();
        assert_eq!(roster.player_count(), 1);

        let player = roster.get_or_create("Alice", SheetConfig::default()).unwrap();
        assert_eq!(player.username(), "Alice");
        assert_eq!(roster.player_count(), 1);
    }

    #[test]
    fn usernames_are_trimmed_before_matching() {
        let mut roster = Roster::default();

        roster.get_or_create("  Alice  ", SheetConfig::default()).unwrap();
        let player = roster.get_or_create("Alice", SheetConfig::default()).unwrap();

        assert_eq!(player.username(), "Alice");
        assert_eq!(roster.player_count(), 1);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let mut roster = Roster::default();

        roster.get_or_create("Alice", SheetConfig::default()).unwrap();
        roster.get_or_create("alice", SheetConfig::default()).unwrap();

        assert_eq!(roster.player_count(), 2);
    }

    #[test]
    fn whitespace_only_username_is_rejected_without_side_effects() {
        let mut roster = Roster::default();

        let result = roster.get_or_create("  ", SheetConfig::default());

        assert_eq!(result.err(), Some(TrackerError::EmptyUsername));
        assert_eq!(roster.player_count(), 0);
        assert_eq!(roster.active_username(), None);
    }

    #[test]
    fn dangling_active_username_resolves_to_no_player() {
        let mut roster = Roster::default();
        roster.set_active(Some("Ghost"));

        assert_eq!(roster.active_username(), Some("Ghost"));
        assert!(roster.active_player().is_none());
        assert!(roster.active_player_mut().is_none());
    }

    #[test]
    fn blob_round_trips_through_json() {
        use alloc::format;
        use ndarray::Array2;

        let mut roster = Roster::default();
        let player = roster.get_or_create("Alice", SheetConfig::default()).unwrap();
        let texts = Array2::from_shape_fn((4, 4), |(r, c)| format!("phrase {}", r * 4 + c + 1));
        player.sheet_mut().replace_texts(&texts).unwrap();
        player.sheet_mut().toggle_mark((0, 0)).unwrap();
        roster.set_active(Some("Alice"));

        let blob = serde_json::to_string(&roster).unwrap();
        let restored: Roster = serde_json::from_str(&blob).unwrap();

        assert_eq!(restored, roster);
    }
}
