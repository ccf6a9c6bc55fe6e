//! The interrupt line table.
//!
//! One [`IrqDesc`] per configured line, each protecting its handler
//! chain with an interrupt-safe spin lock. The same lock doubles as the
//! renderer's consistency boundary: holding it while reading both the
//! chain and the line's counters yields a name/count snapshot that no
//! concurrent registration can tear. Consistency is per line only;
//! taking every line's lock at once is deliberately not offered, so the
//! time any interrupt spends waiting on a lock stays bounded by one
//! line's chain length.
//!
//! The table is built once at kernel initialization (typically in a
//! `static`) and handed by reference to the dispatch layer and the
//! introspection layer; only its contents change afterwards.

use muon_core::cpumask::CpuMask;
use muon_core::id::IrqLine;
use muon_core::sync::{IrqSpinLock, IrqSpinLockGuard};
use planck_noalloc::vec::ArrayVec;

use crate::action::{ActionChain, IrqAction, IrqError};
use crate::stats::IrqStats;

/// Per-line descriptor: the handler chain and its lock.
pub struct IrqDesc {
    pub(crate) chain: IrqSpinLock<ActionChain>,
}

impl IrqDesc {
    const fn new() -> Self {
        Self {
            chain: IrqSpinLock::new(ArrayVec::new()),
        }
    }
}

/// Interrupt accounting state for `LINES` lines.
///
/// Owns the line descriptors, the fire counters, and the online-CPU
/// mask the renderer consults. All storage is fixed-size and allocated
/// with the table itself; no operation on it allocates.
pub struct IrqTable<const LINES: usize> {
    pub(crate) descs: [IrqDesc; LINES],
    pub(crate) stats: IrqStats<LINES>,
    pub(crate) online: CpuMask,
}

impl<const LINES: usize> IrqTable<LINES> {
    /// Creates a table with empty chains, zero counts, and no CPUs
    /// marked online.
    pub const fn new() -> Self {
        Self {
            descs: [const { IrqDesc::new() }; LINES],
            stats: IrqStats::new(),
            online: CpuMask::new(),
        }
    }

    /// Returns the number of configured lines.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        LINES
    }

    /// Returns the fire-count store.
    ///
    /// The dispatch layer records deliveries through this; the renderer
    /// reads it under the line lock.
    pub fn stats(&self) -> &IrqStats<LINES> {
        &self.stats
    }

    /// Returns the online-CPU mask, maintained by CPU bring-up.
    pub fn online(&self) -> &CpuMask {
        &self.online
    }

    fn desc(&self, line: IrqLine) -> Option<&IrqDesc> {
        self.descs.get(line.as_usize())
    }

    /// Appends `action` to `line`'s handler chain.
    ///
    /// Registration order is display order in the rendered table.
    pub fn register(&self, line: IrqLine, action: IrqAction) -> Result<(), IrqError> {
        let desc = self.desc(line).ok_or(IrqError::InvalidLine)?;
        let mut chain = desc.chain.lock();
        if chain.is_full() {
            return Err(IrqError::ChainFull);
        }
        chain.push(action);
        Ok(())
    }

    /// Removes the first handler named `name` from `line`'s chain.
    ///
    /// The order of the remaining handlers is preserved.
    pub fn remove(&self, line: IrqLine, name: &str) -> Result<(), IrqError> {
        let desc = self.desc(line).ok_or(IrqError::InvalidLine)?;
        let mut chain = desc.chain.lock();
        let idx = chain
            .iter()
            .position(|action| action.name() == name)
            .ok_or(IrqError::NotRegistered)?;
        chain.remove(idx);
        Ok(())
    }

    /// Locks `line`'s handler chain and returns the guard.
    ///
    /// This is how the dispatch layer walks the chain to deliver an
    /// interrupt: iteration happens under the same lock that guards
    /// registration. Returns `None` for out-of-range lines.
    pub fn actions(&self, line: IrqLine) -> Option<IrqSpinLockGuard<'_, ActionChain>> {
        Some(self.desc(line)?.chain.lock())
    }
}

impl<const LINES: usize> Default for IrqTable<LINES> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::MAX_ACTIONS;

    fn nop(_line: IrqLine) {}

    #[test]
    fn register_rejects_out_of_range_line() {
        let table = IrqTable::<4>::new();
        assert_eq!(
            table.register(IrqLine::new(4), IrqAction::new("timer", nop)),
            Err(IrqError::InvalidLine)
        );
        assert_eq!(
            table.register(IrqLine::new(u32::MAX), IrqAction::new("timer", nop)),
            Err(IrqError::InvalidLine)
        );
    }

    #[test]
    fn register_fills_until_capacity() {
        let table = IrqTable::<1>::new();
        let line = IrqLine::new(0);
        for _ in 0..MAX_ACTIONS {
            assert_eq!(table.register(line, IrqAction::new("dev", nop)), Ok(()));
        }
        assert_eq!(
            table.register(line, IrqAction::new("dev", nop)),
            Err(IrqError::ChainFull)
        );
    }

    #[test]
    fn remove_preserves_order_of_rest() {
        let table = IrqTable::<2>::new();
        let line = IrqLine::new(1);
        table.register(line, IrqAction::new("a", nop)).unwrap();
        table.register(line, IrqAction::new("b", nop)).unwrap();
        table.register(line, IrqAction::new("c", nop)).unwrap();

        table.remove(line, "b").unwrap();

        let chain = table.actions(line).unwrap();
        let names: Vec<&str> = chain.iter().map(IrqAction::name).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn remove_reports_missing_handler() {
        let table = IrqTable::<2>::new();
        assert_eq!(
            table.remove(IrqLine::new(0), "ghost"),
            Err(IrqError::NotRegistered)
        );
        assert_eq!(
            table.remove(IrqLine::new(7), "ghost"),
            Err(IrqError::InvalidLine)
        );
    }

    #[test]
    fn actions_returns_none_out_of_range() {
        let table = IrqTable::<2>::new();
        assert!(table.actions(IrqLine::new(2)).is_none());
    }

    #[test]
    fn actions_walks_chain_in_registration_order() {
        let table = IrqTable::<2>::new();
        let line = IrqLine::new(0);
        table.register(line, IrqAction::new("first", nop)).unwrap();
        table.register(line, IrqAction::new("second", nop)).unwrap();

        let chain = table.actions(line).unwrap();
        let names: Vec<&str> = chain.iter().map(IrqAction::name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
