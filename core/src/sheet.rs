use alloc::string::String;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The full N×N collection of tiles belonging to one player.
///
/// Always square by construction; mutation goes through methods so the
/// tile invariants hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetGrid {
    tiles: Array2<Tile>,
}

impl SheetGrid {
    pub fn empty(size: Coord) -> Result<Self> {
        if size == 0 {
            return Err(TrackerError::InvalidSize);
        }
        Ok(Self {
            tiles: Array2::default((size, size).to_nd_index()),
        })
    }

    pub fn from_texts(texts: &Array2<String>) -> Result<Self> {
        let (rows, cols) = texts.dim();
        if rows != cols {
            return Err(TrackerError::InvalidSheetShape);
        }
        let size = rows.try_into().map_err(|_| TrackerError::InvalidSheetShape)?;
        let mut sheet = Self::empty(size)?;
        sheet.replace_texts(texts)?;
        Ok(sheet)
    }

    pub fn size(&self) -> Coord {
        self.tiles.dim().0.try_into().unwrap()
    }

    pub fn total_tiles(&self) -> TileCount {
        self.tiles.len().try_into().unwrap()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(TrackerError::InvalidCoords)
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> &Tile {
        &self.tiles[coords.to_nd_index()]
    }

    /// True iff no tile has a phrase yet; decides edit-vs-play on login.
    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|tile| !tile.is_filled())
    }

    /// Snapshot of every phrase, used to pre-fill the sheet editor.
    pub fn texts(&self) -> Array2<String> {
        self.tiles.map(|tile| tile.text().into())
    }

    /// Replaces every phrase and resets all marks: edited content invalidates
    /// prior marks. Unfilled cells are allowed.
    pub fn replace_texts(&mut self, texts: &Array2<String>) -> Result<()> {
        if texts.dim() != self.tiles.dim() {
            return Err(TrackerError::InvalidSheetShape);
        }
        self.tiles = texts.map(|text| Tile::from_text(text));
        Ok(())
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.tiles[coords.to_nd_index()].toggle_mark())
    }

    /// The first completed line, if any. Evaluation order is not part of the
    /// contract; callers that only need the predicate use [`Self::has_win`].
    pub fn winning_line(&self) -> Option<WinLine> {
        let size = self.size();

        for row in 0..size {
            if (0..size).all(|col| self.tile_at((row, col)).counts_for_win()) {
                return Some(WinLine::Row(row));
            }
        }

        for col in 0..size {
            if (0..size).all(|row| self.tile_at((row, col)).counts_for_win()) {
                return Some(WinLine::Col(col));
            }
        }

        if (0..size).all(|i| self.tile_at((i, i)).counts_for_win()) {
            return Some(WinLine::Diagonal);
        }

        if (0..size).all(|i| self.tile_at((i, size - 1 - i)).counts_for_win()) {
            return Some(WinLine::AntiDiagonal);
        }

        None
    }

    pub fn has_win(&self) -> bool {
        self.winning_line().is_some()
    }
}

impl Index<Coord2> for SheetGrid {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}

/// Outcome of toggling a tile mark.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// A completed line: every tile on it is marked and filled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WinLine {
    Row(Coord),
    Col(Coord),
    Diagonal,
    AntiDiagonal,
}

impl WinLine {
    /// Whether `coords` lies on this line of a sheet with side `size`.
    pub const fn contains(self, coords: Coord2, size: Coord) -> bool {
        let (row, col) = coords;
        match self {
            Self::Row(r) => row == r,
            Self::Col(c) => col == c,
            Self::Diagonal => row == col,
            Self::AntiDiagonal => row as TileCount + col as TileCount == size as TileCount - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn texts(rows: &[&[&str]]) -> Array2<String> {
        let size = rows.len();
        let flat: Vec<String> = rows
            .iter()
            .flat_map(|row| row.iter().map(|text| text.to_string()))
            .collect();
        Array2::from_shape_vec((size, size), flat).unwrap()
    }

    fn sheet(rows: &[&[&str]]) -> SheetGrid {
        SheetGrid::from_texts(&texts(rows)).unwrap()
    }

    fn mark_all(sheet: &mut SheetGrid, coords: &[Coord2]) {
        for &pos in coords {
            assert_eq!(sheet.toggle_mark(pos).unwrap(), MarkOutcome::Changed);
        }
    }

    #[test]
    fn empty_sheet_is_empty_for_any_size() {
        for size in [1, 2, 4, 9] {
            let sheet = SheetGrid::empty(size).unwrap();
            assert_eq!(sheet.size(), size);
            assert_eq!(sheet.total_tiles(), square(size));
            assert!(sheet.is_empty());
            assert!(!sheet.has_win());
        }
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(SheetGrid::empty(0), Err(TrackerError::InvalidSize));
    }

    #[test]
    fn toggle_on_unfilled_tile_is_a_no_op() {
        let mut sheet = sheet(&[&["a", ""], &["", ""]]);

        assert_eq!(sheet.toggle_mark((0, 1)).unwrap(), MarkOutcome::NoChange);
        assert!(!sheet.tile_at((0, 1)).is_marked());
    }

    #[test]
    fn toggling_twice_restores_original_state() {
        let mut sheet = sheet(&[&["a", "b"], &["c", "d"]]);

        assert_eq!(sheet.toggle_mark((1, 0)).unwrap(), MarkOutcome::Changed);
        assert!(sheet.tile_at((1, 0)).is_marked());
        assert_eq!(sheet.toggle_mark((1, 0)).unwrap(), MarkOutcome::Changed);
        assert!(!sheet.tile_at((1, 0)).is_marked());
    }

    #[test]
    fn out_of_range_coords_are_rejected() {
        let mut sheet = sheet(&[&["a", "b"], &["c", "d"]]);

        assert_eq!(sheet.toggle_mark((2, 0)), Err(TrackerError::InvalidCoords));
        assert_eq!(sheet.toggle_mark((0, 2)), Err(TrackerError::InvalidCoords));
    }

    #[test]
    fn replace_texts_trims_and_resets_marks() {
        let mut sheet = sheet(&[&["a", "b"], &["c", "d"]]);
        mark_all(&mut sheet, &[(0, 0), (1, 1)]);

        sheet
            .replace_texts(&texts(&[&["  x  ", "y"], &["", "z"]]))
            .unwrap();

        assert_eq!(sheet.tile_at((0, 0)).text(), "x");
        assert_eq!(sheet.tile_at((0, 1)).text(), "y");
        assert!(!sheet.tile_at((1, 0)).is_filled());
        assert!(sheet.tiles.iter().all(|tile| !tile.is_marked()));
    }

    #[test]
    fn replace_texts_rejects_shape_mismatch() {
        let mut small = SheetGrid::empty(2).unwrap();
        let wrong = Array2::from_elem((3, 3), "x".to_string());

        assert_eq!(
            small.replace_texts(&wrong),
            Err(TrackerError::InvalidSheetShape)
        );
    }

    #[test]
    fn full_marked_row_wins() {
        let mut sheet = sheet(&[
            &["A", "B", "C", "D"],
            &["", "", "", ""],
            &["", "", "", ""],
            &["", "", "", ""],
        ]);
        mark_all(&mut sheet, &[(0, 0), (0, 1), (0, 2), (0, 3)]);

        assert_eq!(sheet.winning_line(), Some(WinLine::Row(0)));
        assert!(sheet.has_win());
    }

    #[test]
    fn full_marked_column_wins() {
        let mut sheet = sheet(&[
            &["A", "", "", ""],
            &["B", "", "", ""],
            &["C", "", "", ""],
            &["D", "", "", ""],
        ]);
        mark_all(&mut sheet, &[(0, 0), (1, 0), (2, 0), (3, 0)]);

        assert_eq!(sheet.winning_line(), Some(WinLine::Col(0)));
    }

    #[test]
    fn main_diagonal_wins() {
        let mut sheet = sheet(&[
            &["A", "", "", ""],
            &["", "B", "", ""],
            &["", "", "C", ""],
            &["", "", "", "D"],
        ]);
        mark_all(&mut sheet, &[(0, 0), (1, 1), (2, 2), (3, 3)]);

        assert_eq!(sheet.winning_line(), Some(WinLine::Diagonal));
    }

    #[test]
    fn anti_diagonal_wins() {
        let mut sheet = sheet(&[
            &["", "", "", "A"],
            &["", "", "B", ""],
            &["", "C", "", ""],
            &["D", "", "", ""],
        ]);
        mark_all(&mut sheet, &[(0, 3), (1, 2), (2, 1), (3, 0)]);

        assert_eq!(sheet.winning_line(), Some(WinLine::AntiDiagonal));
    }

    #[test]
    fn unfilled_tiles_never_complete_a_line() {
        // Row 0 has three filled tiles, all marked; the unfilled fourth can
        // never be marked, so the row stays incomplete.
        let mut sheet = sheet(&[
            &["A", "B", "C", ""],
            &["x", "x", "x", "x"],
            &["x", "x", "x", "x"],
            &["x", "x", "x", "x"],
        ]);
        mark_all(&mut sheet, &[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(sheet.toggle_mark((0, 3)).unwrap(), MarkOutcome::NoChange);

        assert_eq!(sheet.winning_line(), None);
    }

    #[test]
    fn no_win_without_marks() {
        let sheet = sheet(&[&["a", "b"], &["c", "d"]]);
        assert!(!sheet.has_win());
    }

    #[test]
    fn win_line_contains_its_cells() {
        assert!(WinLine::Row(1).contains((1, 3), 4));
        assert!(!WinLine::Row(1).contains((2, 3), 4));
        assert!(WinLine::Col(2).contains((0, 2), 4));
        assert!(WinLine::Diagonal.contains((2, 2), 4));
        assert!(WinLine::AntiDiagonal.contains((1, 2), 4));
        assert!(!WinLine::AntiDiagonal.contains((1, 1), 4));
    }
}
