use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::{LaneId, Point};
use crate::config::{BoardConfig, StartCell, Tile};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("row {row} is outside the board ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("column {column} is outside the board ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
}

/// Geometry the traffic scheduler needs from the board.
pub trait LaneGrid {
    fn column_count(&self) -> usize;
    fn row_count(&self) -> usize;
    fn column_width(&self) -> f32;
    fn pixel_for_cell(&self, column: usize, lane: LaneId) -> Point;
    /// Lanes enemies may currently travel on.
    fn traversable_lanes(&self) -> &[LaneId];

    fn random_traversable_lane<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<LaneId> {
        self.traversable_lanes().choose(rng).copied()
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    columns: usize,
    col_width: f32,
    row_height: f32,
    /// Tile kind per row. Every column in a row shares the row's tile.
    rows: Vec<Tile>,
    road_rows: Vec<LaneId>,
    start: StartCell,
}

impl Board {
    pub fn new(config: &BoardConfig) -> Self {
        let layout = &config.board;
        let mut board = Self {
            columns: layout.columns,
            col_width: layout.col_width,
            row_height: layout.row_height,
            rows: layout.rows.clone(),
            road_rows: Vec::new(),
            start: layout.start_cell(),
        };
        board.rebuild_road_rows();
        board
    }

    fn rebuild_road_rows(&mut self) {
        self.road_rows = self.rows
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Stone)
            .map(|(row, _)| LaneId(row))
            .collect();
    }

    pub fn start_cell(&self) -> StartCell {
        self.start
    }

    pub fn tile(&self, column: usize, row: usize) -> Result<Tile, BoardError> {
        if column >= self.columns {
            return Err(BoardError::ColumnOutOfRange { column, columns: self.columns });
        }
        self.rows
            .get(row)
            .copied()
            .ok_or(BoardError::RowOutOfRange { row, rows: self.rows.len() })
    }

    pub fn set_row(&mut self, row: usize, tile: Tile) -> Result<(), BoardError> {
        let rows = self.rows.len();
        let slot = self.rows
            .get_mut(row)
            .ok_or(BoardError::RowOutOfRange { row, rows })?;
        if *slot == tile {
            return Ok(());
        }
        *slot = tile;
        self.rebuild_road_rows();
        log::debug!("Row {} is now {:?}; roads: {:?}", row, tile, self.road_rows);
        Ok(())
    }

    /// Applies each `(row, tile)` pair, then sets every row not named to
    /// `rest` when given. Nothing changes if any row is out of range.
    pub fn set_rows(&mut self, rows: &[(usize, Tile)], rest: Option<Tile>) -> Result<(), BoardError> {
        if let Some(&(row, _)) = rows.iter().find(|(row, _)| *row >= self.rows.len()) {
            return Err(BoardError::RowOutOfRange { row, rows: self.rows.len() });
        }

        let mut next = self.rows.clone();
        if let Some(rest) = rest {
            next.iter_mut().for_each(|tile| *tile = rest);
        }
        for &(row, tile) in rows {
            next[row] = tile;
        }

        self.rows = next;
        self.rebuild_road_rows();
        Ok(())
    }

    pub fn player_can_move_here(&self, column: isize, row: isize) -> bool {
        column >= 0 && row >= 0 && (column as usize) < self.columns && (row as usize) < self.rows.len()
    }

    /// The top row is the goal row. Whether the tile there can be stood on
    /// is up to the caller.
    pub fn row_is_goal(&self, row: usize) -> bool {
        row == 0
    }
}

impl LaneGrid for Board {
    fn column_count(&self) -> usize {
        self.columns
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_width(&self) -> f32 {
        self.col_width
    }

    fn pixel_for_cell(&self, column: usize, lane: LaneId) -> Point {
        Point::new(column as f32 * self.col_width, lane.0 as f32 * self.row_height)
    }

    fn traversable_lanes(&self) -> &[LaneId] {
        &self.road_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn road_rows_follow_row_changes() {
        let mut board = Board::new(&BoardConfig::default());
        assert_eq!(board.traversable_lanes(), &[LaneId(1), LaneId(2), LaneId(3), LaneId(4)]);

        board.set_row(2, Tile::Grass).unwrap();
        assert_eq!(board.traversable_lanes(), &[LaneId(1), LaneId(3), LaneId(4)]);

        board.set_rows(&[(0, Tile::Water), (3, Tile::Stone)], Some(Tile::Grass)).unwrap();
        assert_eq!(board.traversable_lanes(), &[LaneId(3)]);
        assert_eq!(board.tile(4, 5), Ok(Tile::Grass));
    }

    #[test]
    fn out_of_range_rows_are_rejected() {
        let mut board = Board::new(&BoardConfig::default());
        assert_eq!(
            board.set_rows(&[(1, Tile::Grass), (9, Tile::Stone)], None),
            Err(BoardError::RowOutOfRange { row: 9, rows: 6 })
        );
        // The valid pair was not applied either
        assert_eq!(board.tile(0, 1), Ok(Tile::Stone));
        assert!(board.tile(5, 0).is_err());
    }

    #[test]
    fn set_row_outside_board_leaves_roads_alone() {
        let mut board = Board::new(&BoardConfig::default());
        assert_eq!(
            board.set_row(6, Tile::Stone),
            Err(BoardError::RowOutOfRange { row: 6, rows: 6 })
        );
        assert_eq!(board.traversable_lanes().len(), 4);

        // Setting a row to the tile it already has is a no-op
        board.set_row(1, Tile::Stone).unwrap();
        assert_eq!(board.traversable_lanes().len(), 4);
        assert!(board.row_is_goal(0));
        assert!(!board.row_is_goal(1));
    }

    #[test]
    fn random_lane_is_a_road() {
        let board = Board::new(&BoardConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let lane = board.random_traversable_lane(&mut rng).unwrap();
            assert_eq!(board.tile(0, lane.0), Ok(Tile::Stone));
        }

        let mut flooded = board.clone();
        flooded.set_rows(&[], Some(Tile::Water)).unwrap();
        assert_eq!(flooded.random_traversable_lane(&mut rng), None);
    }

    #[test]
    fn pixel_coordinates_use_tile_size() {
        let board = Board::new(&BoardConfig::default());
        let point = board.pixel_for_cell(2, LaneId(3));
        assert_eq!(point, Point::new(202.0, 249.0));
    }
}
