use anyhow::{Context, Result};

pub mod board;
pub mod traffic;

pub use board::*;
pub use traffic::*;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub board: BoardConfig,
    pub traffic: TrafficConfig,
}

impl SimulationConfig {
    pub fn load_from_files(board_path: &str, traffic_path: &str) -> Result<Self> {
        let board_content = std::fs::read_to_string(board_path)
            .with_context(|| format!("reading board configuration {}", board_path))?;
        let traffic_content = std::fs::read_to_string(traffic_path)
            .with_context(|| format!("reading traffic configuration {}", traffic_path))?;

        Self::from_toml_strs(&board_content, &traffic_content)
    }

    pub fn from_toml_strs(board_toml: &str, traffic_toml: &str) -> Result<Self> {
        let board: BoardConfig = toml::from_str(board_toml)?;
        let traffic: TrafficConfig = toml::from_str(traffic_toml)?;

        // Validate configurations
        board.validate()?;
        traffic.validate()?;

        Ok(SimulationConfig { board, traffic })
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
