use std::sync::atomic::{AtomicU8, Ordering};

/// Process lifecycle phase. Transitions are one-directional; no phase is
/// ever revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProcessPhase {
    Starting = 0,
    Listening = 1,
    ShuttingDown = 2,
    Terminated = 3,
}

fn decode(raw: u8) -> ProcessPhase {
    match raw {
        0 => ProcessPhase::Starting,
        1 => ProcessPhase::Listening,
        2 => ProcessPhase::ShuttingDown,
        _ => ProcessPhase::Terminated,
    }
}

/// Atomic cell holding the current phase. The compare-exchange transitions
/// are what make concurrent termination triggers release the data store and
/// close the listener exactly once.
pub struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(ProcessPhase::Starting as u8))
    }

    pub fn current(&self) -> ProcessPhase {
        decode(self.0.load(Ordering::Acquire))
    }

    /// Advance from one phase to the next. Returns false if the cell is no
    /// longer in `from`.
    pub fn advance(&self, from: ProcessPhase, to: ProcessPhase) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Claim the shutdown transition. Succeeds for exactly one caller,
    /// whether the process was still starting or already listening.
    pub fn begin_shutdown(&self) -> bool {
        self.advance(ProcessPhase::Starting, ProcessPhase::ShuttingDown)
            || self.advance(ProcessPhase::Listening, ProcessPhase::ShuttingDown)
    }
}

impl Default for PhaseCell {
    fn default() -> Self {
        Self::new()
    }
}
