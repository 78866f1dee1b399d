use alloc::string::String;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Where the session currently is. Not persisted; derived from the roster on
/// restore.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionPhase {
    LoggedOut,
    Editing,
    Playing,
}

impl SessionPhase {
    pub const fn is_logged_in(self) -> bool {
        !matches!(self, Self::LoggedOut)
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::LoggedOut
    }
}

/// Outcome of activating a tile during play.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ActivateOutcome {
    NoChange,
    Changed,
    Bingo,
}

impl ActivateOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_bingo(self) -> bool {
        matches!(self, Self::Bingo)
    }
}

/// Session and gameplay state machine over a roster.
#[derive(Clone, Debug, PartialEq)]
pub struct Tracker {
    config: SheetConfig,
    roster: Roster,
    phase: SessionPhase,
}

impl Tracker {
    pub fn new(config: SheetConfig) -> Self {
        Self::restore(config, Roster::default())
    }

    /// Startup: a persisted session resumes straight into editing or play,
    /// depending on whether the sheet has any phrases. An active username
    /// that no longer resolves is dropped and reads as logged-out.
    pub fn restore(config: SheetConfig, mut roster: Roster) -> Self {
        if roster.active_username().is_some() && roster.active_player().is_none() {
            log::warn!("active session does not resolve to a player, clearing it");
            roster.set_active(None);
        }

        let phase = match roster.active_player() {
            Some(player) if player.sheet().is_empty() => SessionPhase::Editing,
            Some(_) => SessionPhase::Playing,
            None => SessionPhase::LoggedOut,
        };

        Self {
            config,
            roster,
            phase,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn sheet_config(&self) -> SheetConfig {
        self.config
    }

    /// Applies to players created from now on; existing sheets keep their size.
    pub fn set_sheet_config(&mut self, config: SheetConfig) {
        self.config = config;
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.roster.active_player()
    }

    pub fn login(&mut self, username: &str) -> Result<SessionPhase> {
        self.check_phase(SessionPhase::LoggedOut)?;

        let player = self.roster.get_or_create(username, self.config)?;
        let username = String::from(player.username());
        let phase = if player.sheet().is_empty() {
            SessionPhase::Editing
        } else {
            SessionPhase::Playing
        };

        self.roster.set_active(Some(&username));
        self.phase = phase;
        log::debug!("{:?} logged in, entering {:?}", username, phase);
        Ok(phase)
    }

    pub fn logout(&mut self) {
        if let Some(username) = self.roster.active_username() {
            log::debug!("{:?} logged out", username);
        }
        self.roster.set_active(None);
        self.phase = SessionPhase::LoggedOut;
    }

    /// Saving always enters play, whether or not every phrase is filled.
    pub fn save_sheet(&mut self, texts: &Array2<String>) -> Result<()> {
        self.check_phase(SessionPhase::Editing)?;

        let player = self
            .roster
            .active_player_mut()
            .ok_or(TrackerError::WrongPhase)?;
        player.sheet_mut().replace_texts(texts)?;

        self.phase = SessionPhase::Playing;
        log::debug!("sheet saved, entering play");
        Ok(())
    }

    pub fn begin_edit(&mut self) -> Result<()> {
        self.check_phase(SessionPhase::Playing)?;
        self.phase = SessionPhase::Editing;
        Ok(())
    }

    /// Marks or unmarks one tile; reports a bingo every time the sheet is in
    /// a winning position after the toggle, so un-marking and re-marking into
    /// the same line raises it again.
    pub fn activate_tile(&mut self, coords: Coord2) -> Result<ActivateOutcome> {
        self.check_phase(SessionPhase::Playing)?;

        let player = self
            .roster
            .active_player_mut()
            .ok_or(TrackerError::WrongPhase)?;
        let outcome = player.sheet_mut().toggle_mark(coords)?;

        Ok(match outcome {
            MarkOutcome::NoChange => ActivateOutcome::NoChange,
            MarkOutcome::Changed if player.sheet().has_win() => ActivateOutcome::Bingo,
            MarkOutcome::Changed => ActivateOutcome::Changed,
        })
    }

    fn check_phase(&self, expected: SessionPhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(TrackerError::WrongPhase)
        }
    }
}
