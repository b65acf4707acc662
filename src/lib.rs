pub mod config;
pub mod simulation;

pub use simulation::*;
// Items only: `config::board` and `config::traffic` would shadow the simulation modules
pub use config::{
    BoardConfig, BoardLayout, PerformanceConfig, RandomConfig, SimulationConfig, SpawnCadence,
    SpeedRange, SpriteEdges, StartCell, Tile, TrafficConfig, Validate, MAX_SPAWN_ATTEMPTS,
};
