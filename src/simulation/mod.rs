use nalgebra::Point2;
use std::collections::VecDeque;
use std::time::Duration;
use instant::Instant;

pub mod board;
pub mod pool;
pub mod timeline;
pub mod traffic;
pub mod player;
pub mod session;

pub use board::*;
pub use pool::*;
pub use timeline::*;
pub use traffic::*;
pub use player::*;
pub use session::*;

pub type Point = Point2<f32>;

/// Board row index. Lanes are keyed by row, never by pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneId(pub usize);

/// A board column in a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub column: usize,
    pub lane: LaneId,
}

/// A moving enemy. Shells are recycled through the [`ActorPool`], so every
/// field is overwritten by [`Actor::reset`] on each spawn.
#[derive(Debug, Clone)]
pub struct Actor {
    pub position: Point,
    pub lane: LaneId,
    /// Pixels per second, fixed for the actor's whole trip.
    pub speed: f32,
    pub visible: bool,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            position: Point::origin(),
            lane: LaneId(0),
            speed: 0.0,
            visible: false,
        }
    }
}

impl Actor {
    pub fn reset(&mut self, x: f32, y: f32, lane: LaneId, speed: f32) {
        self.position = Point::new(x, y);
        self.lane = lane;
        self.speed = speed;
        self.visible = true;
    }

    pub fn advance(&mut self, dt: f64) {
        self.position.x += self.speed * dt as f32;
    }
}

/// Rolling window of tick costs, measured on the host clock.
#[derive(Debug)]
pub struct PerformanceTracker {
    samples: VecDeque<Duration>,
    max_samples: usize,
    current_tick_start: Option<Instant>,
    slowest: Duration,
}

impl PerformanceTracker {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            current_tick_start: None,
            slowest: Duration::ZERO,
        }
    }

    pub fn start_tick(&mut self) {
        self.current_tick_start = Some(Instant::now());
    }

    pub fn end_tick(&mut self) {
        if let Some(start) = self.current_tick_start.take() {
            self.record(start.elapsed());
        }
    }

    pub fn record(&mut self, tick_time: Duration) {
        if self.samples.len() >= self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(tick_time);
        self.slowest = self.slowest.max(tick_time);
    }

    pub fn average_tick_time(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.samples.iter().sum();
        total / self.samples.len() as u32
    }

    /// Slowest tick seen since construction, not just within the window.
    pub fn slowest_tick_time(&self) -> Duration {
        self.slowest
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}
