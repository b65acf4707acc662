use super::{ActiveRecord, Actor, ActorPool, Cell, LaneGrid, LaneId};
use crate::config::{SpriteEdges, TrafficConfig};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};
use std::collections::{HashMap, VecDeque};

/// Answer of the collision oracle for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionForecast {
    /// No currently active actor will reach the cell.
    Clear,
    /// The first actor to reach the cell gets there at this wall-clock time.
    FutureCollisionAt(f64),
    /// An actor is overlapping the cell right now.
    ImmediateCollision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Admitted { lane: LaneId, attempts: u32 },
    /// Every candidate would have overlapped its lane's tail actor.
    Abandoned,
    NoTraversableLane,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickSummary {
    pub retired: usize,
    pub spawn: Option<SpawnOutcome>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficStats {
    pub spawned: u64,
    pub rejected_attempts: u64,
    pub abandoned_cycles: u64,
    pub retired: u64,
    pub peak_active: usize,
}

/// Out-of-band notifications the scheduler pushes to the player.
pub trait TrafficObserver {
    /// Traffic resumed after being halted for `paused` seconds.
    fn on_pause_shift(&mut self, paused: f64);
    /// A newly admitted actor will reach the last queried cell at `collision_time`.
    fn on_new_threat(&mut self, collision_time: f64);
}

impl TrafficObserver for () {
    fn on_pause_shift(&mut self, _paused: f64) {}
    fn on_new_threat(&mut self, _collision_time: f64) {}
}

#[derive(Debug, Clone, Copy)]
struct Retirement {
    lane: LaneId,
    retire_time: f64,
}

pub struct TrafficScheduler {
    /// Active records per lane, oldest first.
    lanes: HashMap<LaneId, VecDeque<ActiveRecord>>,
    /// Every active record's lane, ordered by retire time.
    retirements: VecDeque<Retirement>,
    pool: ActorPool,
    lower_speed: f32,
    upper_speed: f32,
    spawn_interval: f64,
    spawn_variance: f64,
    max_spawn_attempts: u32,
    time_until_spawn: f64,
    edges: SpriteEdges,
    columns: usize,
    rows: usize,
    column_width: f32,
    spawn_x: f32,
    pending_query: Option<Cell>,
    paused_for: f64,
    running: bool,
    hidden: bool,
    stats: TrafficStats,
    rng: StdRng,
}

impl TrafficScheduler {
    pub fn new<G: LaneGrid>(config: &TrafficConfig, grid: &G) -> Self {
        let rng = if let Some(seed) = config.random.seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        // Actors start one full column left of the board
        let spawn_x = grid.pixel_for_cell(0, LaneId(0)).x - grid.column_width();

        let mut scheduler = Self {
            lanes: HashMap::new(),
            retirements: VecDeque::new(),
            pool: ActorPool::new(),
            lower_speed: config.speeds.lower,
            upper_speed: config.speeds.upper,
            spawn_interval: config.spawn.mean_interval,
            spawn_variance: config.spawn.variance,
            max_spawn_attempts: config.spawn.max_attempts,
            time_until_spawn: 0.0,
            edges: config.sprites,
            columns: grid.column_count(),
            rows: grid.row_count(),
            column_width: grid.column_width(),
            spawn_x,
            pending_query: None,
            paused_for: 0.0,
            running: true,
            hidden: false,
            stats: TrafficStats::default(),
            rng,
        };
        scheduler.set_speeds(config.speeds.lower, config.speeds.upper);
        scheduler
    }

    /// Range for speeds drawn at spawn. Actors already on the board keep theirs.
    pub fn set_speeds(&mut self, lower: f32, upper: f32) {
        assert!(
            lower > 0.0 && lower <= upper,
            "invalid enemy speed range {}..={}", lower, upper
        );
        self.lower_speed = lower;
        self.upper_speed = upper;
    }

    pub fn set_spawn_cadence(&mut self, mean_interval: f64, variance: f64) {
        self.spawn_interval = mean_interval;
        self.spawn_variance = variance;

        // A countdown that the new parameters could never produce is redrawn
        if self.time_until_spawn > mean_interval * (1.0 + variance) {
            self.redraw_countdown();
        }
    }

    fn redraw_countdown(&mut self) {
        let jitter = Uniform::new_inclusive(-1.0_f64, 1.0).sample(&mut self.rng);
        self.time_until_spawn = self.spawn_interval * (1.0 + self.spawn_variance * jitter);
    }

    fn draw_speed(&mut self) -> f32 {
        self.rng.gen_range(self.lower_speed..=self.upper_speed)
    }

    /// Freezes traffic. Ticks only accumulate the halted time until
    /// [`resume`](Self::resume); `hide` also hides actors from rendering.
    pub fn halt(&mut self, hide: bool) {
        if self.running {
            log::debug!("Traffic halted ({} active)", self.active_count());
        }
        self.running = false;
        self.hidden = hide;
    }

    pub fn resume(&mut self) {
        if !self.running {
            log::debug!("Traffic resuming after {:.3}s halted", self.paused_for);
        }
        self.running = true;
        self.hidden = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick<G: LaneGrid, O: TrafficObserver>(
        &mut self,
        dt: f64,
        now: f64,
        grid: &G,
        observer: &mut O,
    ) -> TickSummary {
        if !self.running {
            self.paused_for += dt;
            return TickSummary::default();
        }

        // Must come first: retirement below compares shifted times against now
        if self.paused_for > 0.0 {
            self.apply_pause_shift(observer);
        }

        let retired = self.retire_due(now);

        for record in self.lanes.values_mut().flat_map(|bucket| bucket.iter_mut()) {
            record.actor.advance(dt);
        }

        self.time_until_spawn -= dt;
        let spawn = if self.time_until_spawn <= 0.0 {
            let outcome = self.spawn_cycle(now, grid, observer);
            self.redraw_countdown();
            Some(outcome)
        } else {
            None
        };

        log::trace!(
            "tick dt={:.4} now={:.3}: retired {}, spawn {:?}, {} active",
            dt, now, retired, spawn, self.active_count()
        );

        TickSummary { retired, spawn }
    }

    fn apply_pause_shift<O: TrafficObserver>(&mut self, observer: &mut O) {
        let paused = std::mem::take(&mut self.paused_for);

        for retirement in self.retirements.iter_mut() {
            retirement.retire_time += paused;
        }
        for record in self.lanes.values_mut().flat_map(|bucket| bucket.iter_mut()) {
            record.timeline.shift(paused);
        }
        observer.on_pause_shift(paused);

        log::debug!("Shifted {} active timelines by {:.3}s", self.retirements.len(), paused);
    }

    fn retire_due(&mut self, now: f64) -> usize {
        let mut retired = 0;
        while let Some(head) = self.retirements.front().copied() {
            if head.retire_time > now {
                break;
            }
            self.retirements.pop_front();

            // Lanes are FIFO by retire time, so the lane's oldest record is the one leaving
            if let Some(record) = self.lanes.get_mut(&head.lane).and_then(|bucket| bucket.pop_front()) {
                debug_assert_eq!(record.retire_time(), head.retire_time);
                self.pool.release(record);
                retired += 1;
            }
        }
        self.stats.retired += retired as u64;
        retired
    }

    fn spawn_cycle<G: LaneGrid, O: TrafficObserver>(
        &mut self,
        now: f64,
        grid: &G,
        observer: &mut O,
    ) -> SpawnOutcome {
        let columns = self.columns;

        for attempt in 1..=self.max_spawn_attempts {
            let Some(lane) = grid.random_traversable_lane(&mut self.rng) else {
                log::debug!("No road on the board, skipping spawn cycle");
                return SpawnOutcome::NoTraversableLane;
            };

            let mut record = self.pool.acquire();
            let y = grid.pixel_for_cell(0, lane).y + self.edges.enemy_pixel_adjust;
            let speed = self.draw_speed();
            record.actor.reset(self.spawn_x, y, lane, speed);
            record.timeline.compute(now, speed, self.column_width, columns, &self.edges);

            let bucket = self.lanes.entry(lane).or_default();
            if bucket.back().is_some_and(|tail| record.overlaps_behind(tail, columns)) {
                log::trace!(
                    "Spawn attempt {} rejected: {:.1}px/s actor would overlap in lane {}",
                    attempt, speed, lane.0
                );
                self.pool.release(record);
                self.stats.rejected_attempts += 1;
                continue;
            }

            self.admit(record, observer);
            return SpawnOutcome::Admitted { lane, attempts: attempt };
        }

        log::debug!("Abandoning spawn cycle after {} rejected attempts", self.max_spawn_attempts);
        self.stats.abandoned_cycles += 1;
        SpawnOutcome::Abandoned
    }

    fn admit<O: TrafficObserver>(&mut self, record: ActiveRecord, observer: &mut O) {
        let lane = record.actor.lane;

        // The player may already be standing in this lane with nothing scheduled
        if let Some(query) = self.pending_query {
            if query.lane == lane {
                observer.on_new_threat(record.timeline.entry[query.column]);
            }
        }

        let retire_time = record.retire_time();
        let at = self.retirements.partition_point(|queued| queued.retire_time <= retire_time);
        self.retirements.insert(at, Retirement { lane, retire_time });
        self.lanes.entry(lane).or_default().push_back(record);

        self.stats.spawned += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.retirements.len());
    }

    /// Records `(column, lane)` as the player's cell and answers whether and
    /// when it will be hit. `None` means the player left the roads: the
    /// pending query is cleared and the answer is always clear.
    ///
    /// Panics if the cell is outside the board the scheduler was built for.
    pub fn predict_collision(&mut self, column: Option<usize>, lane: LaneId, now: f64) -> CollisionForecast {
        let Some(column) = column else {
            self.pending_query = None;
            return CollisionForecast::Clear;
        };

        self.assert_on_board(column, lane);
        self.pending_query = Some(Cell { column, lane });
        self.peek_collision(column, lane, now)
    }

    /// Same answer as [`predict_collision`](Self::predict_collision) without
    /// recording the cell.
    pub fn peek_collision(&self, column: usize, lane: LaneId, now: f64) -> CollisionForecast {
        self.assert_on_board(column, lane);

        let Some(bucket) = self.lanes.get(&lane) else {
            return CollisionForecast::Clear;
        };

        // Oldest first: later actors reach this column later still
        match bucket.iter().find(|record| record.timeline.exit[column] > now) {
            Some(record) if record.timeline.entry[column] > now => {
                CollisionForecast::FutureCollisionAt(record.timeline.entry[column])
            }
            Some(_) => CollisionForecast::ImmediateCollision,
            None => CollisionForecast::Clear,
        }
    }

    fn assert_on_board(&self, column: usize, lane: LaneId) {
        assert!(
            column < self.columns,
            "column {} queried on a board with {} columns", column, self.columns
        );
        assert!(
            lane.0 < self.rows,
            "lane {} queried on a board with {} rows", lane.0, self.rows
        );
    }

    pub fn active_count(&self) -> usize {
        self.retirements.len()
    }

    pub fn lane_records(&self, lane: LaneId) -> impl Iterator<Item = &ActiveRecord> {
        self.lanes.get(&lane).into_iter().flat_map(|bucket| bucket.iter())
    }

    pub fn active_lanes(&self) -> impl Iterator<Item = LaneId> + '_ {
        self.lanes
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(lane, _)| *lane)
    }

    /// Retire times in retirement order.
    pub fn global_retire_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.retirements.iter().map(|retirement| retirement.retire_time)
    }

    /// Actors to draw. Empty while traffic is hidden.
    pub fn visible_actors(&self) -> impl Iterator<Item = &Actor> {
        let hidden = self.hidden;
        self.lanes
            .values()
            .flat_map(|bucket| bucket.iter())
            .map(|record| &record.actor)
            .filter(move |actor| !hidden && actor.visible)
    }

    pub fn time_until_spawn(&self) -> f64 {
        self.time_until_spawn
    }

    pub fn paused_for(&self) -> f64 {
        self.paused_for
    }

    pub fn pending_query(&self) -> Option<Cell> {
        self.pending_query
    }

    pub fn stats(&self) -> TrafficStats {
        self.stats
    }

    pub fn pool(&self) -> &ActorPool {
        &self.pool
    }
}
