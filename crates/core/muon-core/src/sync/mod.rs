//! Synchronization primitives for the kernel.
//!
//! Everything that shares state with interrupt context locks through
//! [`IrqSpinLock`], which masks interrupts for the duration of the
//! critical section. Primitives here are const-constructable so they
//! can live in `static` items, and none of them allocate.

mod irq_spinlock;

pub use irq_spinlock::{IrqSpinLock, IrqSpinLockGuard};
