use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::MarkOutcome;

/// One cell of a bingo sheet: the player's phrase plus its marked flag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    text: String,
    marked: bool,
}

impl Tile {
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.trim().into(),
            marked: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the player has written a phrase into this tile.
    pub fn is_filled(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// A tile contributes to a win line only when it is both filled and marked.
    pub fn counts_for_win(&self) -> bool {
        self.marked && self.is_filled()
    }

    /// Unfilled tiles are never markable.
    pub(crate) fn toggle_mark(&mut self) -> MarkOutcome {
        if self.is_filled() {
            self.marked = !self.marked;
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        }
    }
}
