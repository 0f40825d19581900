//! Resident-memory snapshots taken around model building and solving.

use std::time::Instant;

use sysinfo::System;

/// Resident set size of this process at one named stage.
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    pub rss_bytes: u64,
    pub timestamp: Instant,
    /// e.g. "build", "solve_start", "solve_end"
    pub stage: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    ProcessNotFound { pid: u32 },
}

impl MemoryError {
    pub fn code(&self) -> &'static str {
        match self {
            MemoryError::ProcessNotFound { .. } => "MEMORY_PROCESS_NOT_FOUND",
        }
    }
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::ProcessNotFound { pid } => {
                write!(f, "[{}] failed to locate process {pid}", self.code())
            }
        }
    }
}

impl std::error::Error for MemoryError {}

impl MemorySnapshot {
    /// Capture the current RSS for `stage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current process cannot be located.
    pub fn capture(stage: &str) -> Result<Self, MemoryError> {
        let pid = sysinfo::Pid::from(std::process::id() as usize);

        // Refresh only this process.
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            sysinfo::ProcessesToUpdate::Some(&[pid]),
            true,
            sysinfo::ProcessRefreshKind::nothing().with_memory(),
        );

        let process = sys.process(pid).ok_or(MemoryError::ProcessNotFound {
            pid: std::process::id(),
        })?;

        Ok(MemorySnapshot {
            rss_bytes: process.memory(),
            timestamp: Instant::now(),
            stage: stage.to_string(),
        })
    }

    /// RSS growth from `earlier` to `self`; negative when memory was released.
    pub fn delta_since(&self, earlier: &Self) -> i64 {
        self.rss_bytes as i64 - earlier.rss_bytes as i64
    }
}

/// Ordered series of snapshots, one per stage.
#[derive(Debug, Default)]
pub struct MemoryProbe {
    snapshots: Vec<MemorySnapshot>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot for `stage` and log it.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be captured.
    pub fn record(&mut self, stage: &str) -> Result<&MemorySnapshot, MemoryError> {
        let snapshot = MemorySnapshot::capture(stage)?;
        let delta = self
            .snapshots
            .last()
            .map(|previous| snapshot.delta_since(previous));
        tracing::debug!(
            component = "memory",
            operation = "record",
            status = "success",
            stage,
            rss_bytes = snapshot.rss_bytes,
            rss_delta_bytes = ?delta,
            "Recorded memory snapshot"
        );
        self.snapshots.push(snapshot);
        Ok(&self.snapshots[self.snapshots.len() - 1])
    }

    pub fn push(&mut self, snapshot: MemorySnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[MemorySnapshot] {
        &self.snapshots
    }

    /// Growth between the last two snapshots.
    pub fn last_delta(&self) -> Option<i64> {
        match self.snapshots.as_slice() {
            [.., previous, last] => Some(last.delta_since(previous)),
            _ => None,
        }
    }

    /// Largest RSS seen and the stage it was seen at.
    pub fn peak(&self) -> Option<(&str, u64)> {
        self.snapshots
            .iter()
            .max_by_key(|snapshot| snapshot.rss_bytes)
            .map(|snapshot| (snapshot.stage.as_str(), snapshot.rss_bytes))
    }
}
