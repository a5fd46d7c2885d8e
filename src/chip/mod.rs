//! Transport boundary to the EFI power-management controller.
//!
//! Everything the crate knows about the controller goes through the
//! [`EfiChip`] trait: single register reads and generic command exchanges.
//! The physical transport (bus access, serialization of concurrent callers,
//! timeouts) belongs to the implementor; this crate issues at most one
//! exchange per query and treats every failure as opaque.
//!
//! [`FakeChip`] is a scripted in-memory implementation for tests and for
//! callers developing against the telemetry API without hardware.

use std::fmt::Debug;

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

pub mod registers;

mod fake;
pub use fake::FakeChip;

/// Low-level access to the EFI power-management controller.
///
/// Each call maps to one protocol exchange and may block for its duration.
/// Implementations must be safe to share between the supplies the controller
/// serves; any locking discipline is theirs to provide.
#[cfg_attr(test, automock)]
pub trait EfiChip: Send + Sync + Debug {
    /// Read a single 16-bit controller register.
    fn read_register(&self, address: u8) -> Result<u16>;

    /// Execute a generic controller command with the given payload and
    /// return its 16-bit reply.
    fn generic_command(&self, opcode: u16, payload: u16) -> Result<u16>;
}
