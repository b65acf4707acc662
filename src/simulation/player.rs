use super::{Board, BoardError, CollisionForecast, LaneGrid, LaneId, Point, TrafficObserver, TrafficScheduler};
use crate::config::{SpriteEdges, StartCell, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Struck,
    Drowned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Alive,
    Dead(DeathCause),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Blocked,
    Moved,
    /// Reached the goal row alive.
    Crossed,
}

/// The player never scans traffic itself. It asks the scheduler once per
/// move and afterwards only compares the cached collision time with `now`.
#[derive(Debug, Clone)]
pub struct Player {
    column: usize,
    row: usize,
    position: Point,
    pixel_adjust: f32,
    collision_time: Option<f64>,
    collision_detection: bool,
    state: PlayerState,
}

impl Player {
    pub fn new(edges: &SpriteEdges) -> Self {
        Self {
            column: 0,
            row: 0,
            position: Point::origin(),
            pixel_adjust: edges.player_pixel_adjust,
            collision_time: None,
            collision_detection: false,
            state: PlayerState::Alive,
        }
    }

    /// Moves to the cell (clamped into the board) and refreshes the cached
    /// collision time from the tile underneath.
    pub fn set_position(
        &mut self,
        column: usize,
        row: usize,
        board: &Board,
        traffic: &mut TrafficScheduler,
        now: f64,
    ) -> Result<(), BoardError> {
        self.column = column.min(board.column_count().saturating_sub(1));
        self.row = row.min(board.row_count().saturating_sub(1));

        let lane = LaneId(self.row);
        let cell = board.pixel_for_cell(self.column, lane);
        self.position = Point::new(cell.x, cell.y + self.pixel_adjust);

        match board.tile(self.column, self.row)? {
            Tile::Stone => match traffic.predict_collision(Some(self.column), lane, now) {
                CollisionForecast::Clear => self.collision_time = None,
                CollisionForecast::FutureCollisionAt(time) => self.collision_time = Some(time),
                CollisionForecast::ImmediateCollision => {
                    self.collision_time = None;
                    self.die(DeathCause::Struck);
                }
            },
            Tile::Water => {
                traffic.predict_collision(None, lane, now);
                self.collision_time = None;
                self.die(DeathCause::Drowned);
            }
            Tile::Grass => {
                traffic.predict_collision(None, lane, now);
                self.collision_time = None;
            }
        }
        Ok(())
    }

    pub fn step(
        &mut self,
        direction: Direction,
        board: &Board,
        traffic: &mut TrafficScheduler,
        now: f64,
    ) -> Result<MoveOutcome, BoardError> {
        if !self.is_alive() {
            return Ok(MoveOutcome::Blocked);
        }

        let (dc, dr) = match direction {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        };
        let column = self.column as isize + dc;
        let row = self.row as isize + dr;
        if !board.player_can_move_here(column, row) {
            return Ok(MoveOutcome::Blocked);
        }

        let (column, row) = (column as usize, row as usize);
        let crossed = board.row_is_goal(row) && board.tile(column, row)? != Tile::Water;
        self.set_position(column, row, board, traffic, now)?;

        Ok(if crossed && self.is_alive() {
            MoveOutcome::Crossed
        } else {
            MoveOutcome::Moved
        })
    }

    /// Dies once `now` passes the cached collision time.
    pub fn update(&mut self, now: f64) {
        if !self.collision_detection || !self.is_alive() {
            return;
        }
        if self.collision_time.is_some_and(|time| now > time) {
            self.die(DeathCause::Struck);
        }
    }

    /// Back to life at `start`, with nothing scheduled.
    pub fn respawn(
        &mut self,
        start: StartCell,
        board: &Board,
        traffic: &mut TrafficScheduler,
        now: f64,
    ) -> Result<(), BoardError> {
        self.state = PlayerState::Alive;
        self.collision_time = None;
        self.set_position(start.column, start.row, board, traffic, now)
    }

    fn die(&mut self, cause: DeathCause) {
        if self.is_alive() {
            log::info!("Player died at ({}, {}): {:?}", self.column, self.row, cause);
            self.state = PlayerState::Dead(cause);
        }
    }

    pub fn set_collision_detection(&mut self, enabled: bool) {
        self.collision_detection = enabled;
    }

    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn collision_time(&self) -> Option<f64> {
        self.collision_time
    }
}

impl TrafficObserver for Player {
    fn on_pause_shift(&mut self, paused: f64) {
        if let Some(time) = self.collision_time.as_mut() {
            *time += paused;
        }
    }

    fn on_new_threat(&mut self, collision_time: f64) {
        if self.collision_time.is_none() {
            self.collision_time = Some(collision_time);
        }
    }
}
