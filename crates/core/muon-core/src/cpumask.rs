//! Online-CPU bookkeeping.
//!
//! [`CpuMask`] is a fixed bitmask with one bit per possible CPU, stored
//! as atomic words so it can be read without locks from any context.
//! CPU bring-up marks processors online; readers (the interrupt table
//! renderer, for one) snapshot the mask word by word.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::cpu_local::MAX_CPUS;
use crate::id::CpuId;

const BITS_PER_WORD: usize = u64::BITS as usize;
const WORDS: usize = MAX_CPUS.div_ceil(BITS_PER_WORD);

/// A set of CPUs, one bit per possible CPU id.
///
/// Reads and writes are word-granular atomics; iteration sees a
/// snapshot taken at the call, not a live view.
pub struct CpuMask {
    words: [AtomicU64; WORDS],
}

impl CpuMask {
    /// Creates an empty mask (all CPUs offline).
    pub const fn new() -> Self {
        Self {
            words: [const { AtomicU64::new(0) }; WORDS],
        }
    }

    /// Sets the bit for `cpu`. Out-of-range ids are ignored.
    pub fn mark_online(&self, cpu: CpuId) {
        let id = cpu.as_usize();
        if id < MAX_CPUS {
            self.words[id / BITS_PER_WORD].fetch_or(1 << (id % BITS_PER_WORD), Ordering::Relaxed);
        }
    }

    /// Clears the bit for `cpu`. Out-of-range ids are ignored.
    pub fn mark_offline(&self, cpu: CpuId) {
        let id = cpu.as_usize();
        if id < MAX_CPUS {
            self.words[id / BITS_PER_WORD]
                .fetch_and(!(1 << (id % BITS_PER_WORD)), Ordering::Relaxed);
        }
    }

    /// Returns whether the bit for `cpu` is set.
    pub fn is_online(&self, cpu: CpuId) -> bool {
        let id = cpu.as_usize();
        id < MAX_CPUS
            && self.words[id / BITS_PER_WORD].load(Ordering::Relaxed) & (1 << (id % BITS_PER_WORD))
                != 0
    }

    /// Returns the number of set bits.
    pub fn count(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    /// Returns an iterator over the set CPUs in ascending id order.
    ///
    /// The mask is snapshotted when this is called; concurrent updates
    /// do not affect an iteration already in progress.
    pub fn iter(&self) -> CpuIter {
        let mut words = [0u64; WORDS];
        for (snap, word) in words.iter_mut().zip(&self.words) {
            *snap = word.load(Ordering::Relaxed);
        }
        CpuIter { words, next: 0 }
    }
}

impl Default for CpuMask {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the CPUs set in a [`CpuMask`] snapshot.
pub struct CpuIter {
    words: [u64; WORDS],
    next: usize,
}

impl Iterator for CpuIter {
    type Item = CpuId;

    fn next(&mut self) -> Option<CpuId> {
        while self.next < MAX_CPUS {
            let id = self.next;
            self.next += 1;
            if self.words[id / BITS_PER_WORD] & (1 << (id % BITS_PER_WORD)) != 0 {
                return Some(CpuId::new(id as u32));
            }
        }
        None
    }
}
