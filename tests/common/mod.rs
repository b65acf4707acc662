#![allow(dead_code)]

use lane_crossing::config::{BoardConfig, BoardLayout, StartCell, Tile, TrafficConfig};
use lane_crossing::simulation::TrafficObserver;

/// Grass, one road, grass. Five 101px columns.
pub fn one_lane_board() -> BoardConfig {
    board_with_rows(vec![Tile::Grass, Tile::Stone, Tile::Grass])
}

pub fn board_with_rows(rows: Vec<Tile>) -> BoardConfig {
    let last = rows.len() - 1;
    BoardConfig {
        board: BoardLayout {
            name: "test".to_string(),
            columns: 5,
            col_width: 101.0,
            row_height: 83.0,
            rows,
            player_start: Some(StartCell { column: 2, row: last }),
        },
    }
}

/// Every enemy at exactly 100px/s; after the first spawn nothing else
/// spawns unless the cadence is changed.
pub fn fixed_speed_traffic() -> TrafficConfig {
    let mut config = TrafficConfig::default();
    config.speeds.lower = 100.0;
    config.speeds.upper = 100.0;
    config.spawn.mean_interval = 1000.0;
    config.spawn.variance = 0.0;
    config.random.seed = Some(1);
    config
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub shifts: Vec<f64>,
    pub threats: Vec<f64>,
}

impl TrafficObserver for Recorder {
    fn on_pause_shift(&mut self, paused: f64) {
        self.shifts.push(paused);
    }

    fn on_new_threat(&mut self, collision_time: f64) {
        self.threats.push(collision_time);
    }
}
