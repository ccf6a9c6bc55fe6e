//! Per-CPU storage indexed by CPU id.
//!
//! [`CpuLocal`] wraps one instance of `T` per possible CPU. The current
//! CPU's id comes from a provider function registered by the arch layer
//! during bring-up ([`set_cpu_id_fn`]); before registration, and on host
//! builds, the bootstrap CPU (id 0) is assumed.

use core::sync::atomic::{AtomicPtr, Ordering};

use crate::id::CpuId;

/// Maximum supported CPUs. Matches the configuration upper bound.
pub const MAX_CPUS: usize = 64;

/// Per-CPU storage. Wraps `[T; MAX_CPUS]`, indexed by CPU id.
pub struct CpuLocal<T> {
    slots: [T; MAX_CPUS],
}

impl<T> CpuLocal<T> {
    /// Creates a new `CpuLocal` wrapping the given array.
    pub const fn new(slots: [T; MAX_CPUS]) -> Self {
        Self { slots }
    }

    /// Returns a reference to the current CPU's instance.
    ///
    /// If the registered provider reports an id outside `[0, MAX_CPUS)`,
    /// the bootstrap CPU's slot is returned instead of faulting.
    pub fn get(&self) -> &T {
        let id = current_cpu_id().as_usize();
        if id < MAX_CPUS {
            &self.slots[id]
        } else {
            &self.slots[0]
        }
    }

    /// Returns a reference to a specific CPU's instance.
    ///
    /// # Panics
    ///
    /// Panics if `cpu.as_usize() >= MAX_CPUS`.
    pub fn get_for(&self, cpu: CpuId) -> &T {
        &self.slots[cpu.as_usize()]
    }
}

// SAFETY: CpuLocal<T> is designed for per-CPU access. Send/Sync are safe
// because each CPU only mutates its own slot and T itself governs what a
// shared reference permits.
unsafe impl<T: Send> Send for CpuLocal<T> {}
unsafe impl<T: Send + Sync> Sync for CpuLocal<T> {}

/// The signature of the current-CPU-id provider.
pub type CpuIdFn = fn() -> CpuId;

fn bootstrap_cpu_id() -> CpuId {
    CpuId::new(0)
}

static CPU_ID_FN: AtomicPtr<()> = AtomicPtr::new(bootstrap_cpu_id as *mut ());

/// Registers the current-CPU-id provider.
///
/// Called once by the arch layer after per-CPU state is reachable from
/// interrupt context.
///
/// # Safety
///
/// The provided function must be callable from any context, including
/// interrupt context with interrupts disabled, and must not take locks
/// or allocate.
pub unsafe fn set_cpu_id_fn(f: CpuIdFn) {
    CPU_ID_FN.store(f as *mut (), Ordering::Release);
}

/// Returns the current CPU's id.
///
/// Before a provider is registered (and always on host builds), this is
/// the bootstrap CPU, id 0.
#[inline]
pub fn current_cpu_id() -> CpuId {
    let ptr = CPU_ID_FN.load(Ordering::Acquire);
    // SAFETY: Only valid `CpuIdFn` pointers are ever stored in CPU_ID_FN.
    let f: CpuIdFn = unsafe { core::mem::transmute(ptr) };
    f()
}
