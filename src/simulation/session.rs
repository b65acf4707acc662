use anyhow::Result;

use super::{Board, Direction, MoveOutcome, Player, TickSummary, TrafficScheduler};
use crate::config::SimulationConfig;

/// Seconds traffic stays frozen after the player dies.
pub const DIE_DURATION: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Play,
    /// Traffic halted and hidden.
    Paused,
    /// Traffic halted but visible until `until`, then the player respawns.
    Died { until: f64 },
}

/// Board, traffic and player driven together, one `step` per frame.
pub struct Session {
    board: Board,
    traffic: TrafficScheduler,
    player: Player,
    phase: Phase,
    deaths: u32,
    crossings: u32,
}

impl Session {
    pub fn new(config: &SimulationConfig, now: f64) -> Result<Self> {
        let board = Board::new(&config.board);
        let mut traffic = TrafficScheduler::new(&config.traffic, &board);
        let mut player = Player::new(&config.traffic.sprites);

        let start = board.start_cell();
        player.set_position(start.column, start.row, &board, &mut traffic, now)?;
        player.set_collision_detection(true);

        Ok(Self {
            board,
            traffic,
            player,
            phase: Phase::Play,
            deaths: 0,
            crossings: 0,
        })
    }

    pub fn step(&mut self, dt: f64, now: f64) -> Result<TickSummary> {
        // Resume before ticking so the respawn below sees shifted timelines
        let respawn = matches!(self.phase, Phase::Died { until } if now >= until);
        if respawn {
            self.traffic.resume();
        }

        let summary = self.traffic.tick(dt, now, &self.board, &mut self.player);

        if respawn {
            self.reincarnate(now)?;
        } else if self.phase == Phase::Play {
            self.player.update(now);
            self.check_death(now);
        }

        Ok(summary)
    }

    /// Input is ignored outside of play, and for the frame between a resume
    /// and the step that shifts the traffic timelines.
    pub fn move_player(&mut self, direction: Direction, now: f64) -> Result<MoveOutcome> {
        if self.phase != Phase::Play || self.traffic.paused_for() > 0.0 {
            return Ok(MoveOutcome::Blocked);
        }

        let outcome = self.player.step(direction, &self.board, &mut self.traffic, now)?;
        match outcome {
            MoveOutcome::Crossed => {
                self.crossings += 1;
                log::info!("Crossing #{} complete", self.crossings);
                let start = self.board.start_cell();
                self.player.respawn(start, &self.board, &mut self.traffic, now)?;
                self.check_death(now);
            }
            MoveOutcome::Moved => self.check_death(now),
            MoveOutcome::Blocked => {}
        }
        Ok(outcome)
    }

    pub fn toggle_pause(&mut self) -> Phase {
        match self.phase {
            Phase::Play => {
                self.traffic.halt(true);
                self.player.set_collision_detection(false);
                self.phase = Phase::Paused;
                log::info!("Paused");
            }
            Phase::Paused => {
                self.traffic.resume();
                self.player.set_collision_detection(true);
                self.phase = Phase::Play;
                log::info!("Resumed");
            }
            Phase::Died { .. } => {}
        }
        self.phase
    }

    fn check_death(&mut self, now: f64) {
        if self.player.is_alive() {
            return;
        }
        self.deaths += 1;
        self.traffic.halt(false);
        self.player.set_collision_detection(false);
        self.phase = Phase::Died { until: now + DIE_DURATION };
    }

    fn reincarnate(&mut self, now: f64) -> Result<()> {
        let start = self.board.start_cell();
        self.player.respawn(start, &self.board, &mut self.traffic, now)?;
        self.player.set_collision_detection(true);
        self.phase = Phase::Play;
        log::info!("Player respawned ({} deaths so far)", self.deaths);
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn traffic(&self) -> &TrafficScheduler {
        &self.traffic
    }

    /// For retuning speeds and spawn cadence between levels.
    pub fn traffic_mut(&mut self) -> &mut TrafficScheduler {
        &mut self.traffic
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn crossings(&self) -> u32 {
        self.crossings
    }
}
