//! Core types and synchronization primitives for the Muon kernel.
//!
//! This crate holds the host-testable foundations the kernel subsystems
//! build on: typed resource identifiers, per-CPU storage, the online-CPU
//! mask, the interrupt-safe spin lock, and the kernel logging facility.
//!
//! Everything here compiles for bare-metal targets and for the host: the
//! few arch-specific paths (interrupt-flag save/restore) fall back to
//! no-ops off-target, so the crate tests with plain `cargo test`.

#![cfg_attr(not(test), no_std)]

pub mod cpu_local;
pub mod cpumask;
pub mod id;
pub mod log;
pub mod sync;
