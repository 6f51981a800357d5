//! Sequential position within a cluster chain

/// Where the next sector of a file will be read from.
///
/// A cursor with `working_cluster == 0` is idle: it has either never been
/// armed or its chain has been exhausted (or broken by an error).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCursor {
    /// Cluster being read, 0 when idle
    pub working_cluster: u32,
    /// Sector offset within `working_cluster`
    pub working_sector: u32,
}

impl FileCursor {
    /// An idle cursor
    pub const fn idle() -> Self {
        FileCursor {
            working_cluster: 0,
            working_sector: 0,
        }
    }

    /// Points the cursor at the first sector of `cluster`. Performs no I/O.
    pub fn arm(&mut self, cluster: u32) {
        self.working_cluster = cluster;
        self.working_sector = 0;
    }

    pub fn is_idle(&self) -> bool {
        self.working_cluster == 0
    }

    pub(super) fn stop(&mut self) {
        self.working_cluster = 0;
    }
}
