use super::ActiveRecord;

/// Recycles actor shells, timeline buffers included, so steady-state
/// spawning does not allocate.
#[derive(Debug, Default)]
pub struct ActorPool {
    retired: Vec<ActiveRecord>,
    allocated: usize,
}

impl ActorPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a retired shell if one exists, otherwise builds a new one.
    /// The caller is expected to overwrite every field.
    pub fn acquire(&mut self) -> ActiveRecord {
        self.retired.pop().unwrap_or_else(|| {
            self.allocated += 1;
            ActiveRecord::default()
        })
    }

    pub fn release(&mut self, mut record: ActiveRecord) {
        record.actor.visible = false;
        self.retired.push(record);
    }

    /// Shells waiting for reuse.
    pub fn len(&self) -> usize {
        self.retired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retired.is_empty()
    }

    /// Shells ever constructed by this pool.
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}
