use super::Actor;
use crate::config::SpriteEdges;

/// Predicted wall-clock times at which an actor's visible silhouette enters
/// and leaves each column, from column 0 through two columns past the right
/// edge of the board.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub entry: Vec<f64>,
    pub exit: Vec<f64>,
}

impl Timeline {
    /// Refills the timeline in place for an actor of the given speed
    /// starting one column left of the board at `now`.
    pub fn compute(&mut self, now: f64, speed: f32, column_width: f32, columns: usize, edges: &SpriteEdges) {
        let speed = speed as f64;
        let seconds_per_column = column_width as f64 / speed;
        let entry_adjust = (edges.enemy_lead_edge + edges.player_trail_edge) as f64 / speed;
        let exit_adjust = (edges.enemy_trail_edge + edges.player_lead_edge) as f64 / speed;

        self.entry.clear();
        self.exit.clear();
        for column in 0..columns + 2 {
            let column = column as f64;
            self.entry.push(now + column * seconds_per_column + entry_adjust);
            self.exit.push(now + (column + 2.0) * seconds_per_column - exit_adjust);
        }
    }

    /// Entry time of the last off-board column: the actor is fully gone.
    pub fn retire_time(&self) -> f64 {
        self.entry.last().copied().unwrap_or(f64::NEG_INFINITY)
    }

    pub fn shift(&mut self, seconds: f64) {
        self.entry.iter_mut().for_each(|time| *time += seconds);
        self.exit.iter_mut().for_each(|time| *time += seconds);
    }

    pub fn len(&self) -> usize {
        self.entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }
}

/// An actor together with its precomputed timeline.
#[derive(Debug, Clone, Default)]
pub struct ActiveRecord {
    pub actor: Actor,
    pub timeline: Timeline,
}

impl ActiveRecord {
    pub fn retire_time(&self) -> f64 {
        self.timeline.retire_time()
    }

    /// Whether admitting `self` behind `tail` in the same lane could make the
    /// two sprites overlap, either while leaving past the right edge or while
    /// entering at the left edge.
    pub fn overlaps_behind(&self, tail: &ActiveRecord, columns: usize) -> bool {
        let exit_begin = self.timeline.entry[columns];
        let tail_exit_completion = tail.timeline.entry[columns + 1];
        if exit_begin < tail_exit_completion {
            return true;
        }

        let first_column_entry = self.timeline.entry[0];
        let tail_second_column_entry = tail.timeline.entry[1];
        first_column_entry < tail_second_column_entry
    }
}
