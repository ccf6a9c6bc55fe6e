//! Per-line, per-CPU fire counters.
//!
//! The counter store is the leaf of the accounting layer: a fixed table
//! of relaxed atomic counters with no locks of its own. Each CPU only
//! ever increments its own column (the dispatch layer calls
//! [`IrqStats::record`] from the interrupting CPU), so there are no
//! cross-CPU write races by construction; the atomic cells exist so a
//! concurrent reader sees either the old or the new count, never a torn
//! one.

use core::sync::atomic::{AtomicU64, Ordering};

use muon_core::cpu_local::{CpuLocal, MAX_CPUS, current_cpu_id};
use muon_core::id::{CpuId, IrqLine};

/// Fire counts for `LINES` interrupt lines across all possible CPUs.
///
/// Counts are monotonically increasing; nothing ever resets them.
pub struct IrqStats<const LINES: usize> {
    counts: CpuLocal<[AtomicU64; LINES]>,
}

impl<const LINES: usize> IrqStats<LINES> {
    /// Creates a zeroed counter table.
    pub const fn new() -> Self {
        Self {
            counts: CpuLocal::new([const { [const { AtomicU64::new(0) }; LINES] }; MAX_CPUS]),
        }
    }

    /// Counts one delivery of `line` on `cpu`.
    ///
    /// Must be called from the interrupt path of the CPU that took the
    /// interrupt; `cpu` names that CPU. Lock-free and allocation-free.
    /// Out-of-range indices are ignored: accounting never faults in
    /// interrupt context.
    pub fn record(&self, line: IrqLine, cpu: CpuId) {
        if line.as_usize() >= LINES || cpu.as_usize() >= MAX_CPUS {
            return;
        }
        self.counts.get_for(cpu)[line.as_usize()].fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one delivery of `line` on the current CPU.
    pub fn record_local(&self, line: IrqLine) {
        self.record(line, current_cpu_id());
    }

    /// Reads the count for `(line, cpu)`.
    ///
    /// A plain indexed atomic load: takes no lock, so it is callable
    /// while the line's lock is held by a renderer. Out-of-range
    /// indices read as zero.
    pub fn read(&self, line: IrqLine, cpu: CpuId) -> u64 {
        if line.as_usize() >= LINES || cpu.as_usize() >= MAX_CPUS {
            return 0;
        }
        self.counts.get_for(cpu)[line.as_usize()].load(Ordering::Relaxed)
    }
}

impl<const LINES: usize> Default for IrqStats<LINES> {
    fn default() -> Self {
        Self::new()
    }
}
