use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use super::Validate;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    pub board: BoardLayout,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardLayout {
    pub name: String,
    pub columns: usize,
    pub col_width: f32,
    pub row_height: f32,
    /// One tile kind per row, top to bottom.
    pub rows: Vec<Tile>,
    #[serde(default)]
    pub player_start: Option<StartCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    Water,
    /// Road. The only tile enemies travel on.
    Stone,
    Grass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct StartCell {
    pub column: usize,
    pub row: usize,
}

impl BoardLayout {
    /// Configured start cell, or the middle of the bottom row.
    pub fn start_cell(&self) -> StartCell {
        self.player_start.unwrap_or(StartCell {
            column: self.columns.saturating_sub(1) / 2,
            row: self.rows.len().saturating_sub(1),
        })
    }
}

impl Default for BoardConfig {
    /// The title screen board: a river on top, four roads, grass at the bottom.
    fn default() -> Self {
        Self {
            board: BoardLayout {
                name: "title".to_string(),
                columns: 5,
                col_width: 101.0,
                row_height: 83.0,
                rows: vec![
                    Tile::Water,
                    Tile::Stone,
                    Tile::Stone,
                    Tile::Stone,
                    Tile::Stone,
                    Tile::Grass,
                ],
                player_start: None,
            },
        }
    }
}

impl Validate for BoardConfig {
    fn validate(&self) -> Result<()> {
        let board = &self.board;

        if board.columns == 0 {
            return Err(anyhow!("Board must have at least one column"));
        }

        if board.rows.is_empty() {
            return Err(anyhow!("Board must have at least one row"));
        }

        if board.col_width <= 0.0 || board.row_height <= 0.0 {
            return Err(anyhow!("Column width and row height must be positive"));
        }

        if let Some(start) = board.player_start {
            if start.column >= board.columns || start.row >= board.rows.len() {
                return Err(anyhow!(
                    "Player start ({}, {}) is outside the {}x{} board",
                    start.column, start.row, board.columns, board.rows.len()
                ));
            }
        }

        Ok(())
    }
}
