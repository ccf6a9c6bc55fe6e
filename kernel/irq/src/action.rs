//! Handler registration records.
//!
//! Each interrupt line carries an ordered chain of [`IrqAction`]s. The
//! chain is bounded and lives inline in the line descriptor, so
//! touching it never allocates.

use core::fmt;

use muon_core::id::IrqLine;
use planck_noalloc::vec::ArrayVec;

/// Handler function signature: receives the line that fired.
pub type IrqHandler = fn(IrqLine);

/// Maximum number of handlers sharing one interrupt line.
pub const MAX_ACTIONS: usize = 8;

/// The per-line handler chain, in registration order.
pub type ActionChain = ArrayVec<IrqAction, MAX_ACTIONS>;

/// A registered interrupt handler: a display name plus the handler the
/// dispatch layer invokes. Immutable once registered.
#[derive(Debug, Clone, Copy)]
pub struct IrqAction {
    name: &'static str,
    handler: IrqHandler,
}

impl IrqAction {
    /// Creates a new action.
    pub const fn new(name: &'static str, handler: IrqHandler) -> Self {
        Self { name, handler }
    }

    /// Returns the display name, as shown in the rendered table.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the handler function.
    pub const fn handler(&self) -> IrqHandler {
        self.handler
    }
}

/// Error type for registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqError {
    /// Line is outside the configured range.
    InvalidLine,
    /// The line's handler chain is at capacity.
    ChainFull,
    /// No handler with the given name is registered on the line.
    NotRegistered,
}

impl fmt::Display for IrqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLine => write!(f, "line outside configured range"),
            Self::ChainFull => write!(f, "handler chain at capacity"),
            Self::NotRegistered => write!(f, "no such handler on this line"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nop(_line: IrqLine) {}

    #[test]
    fn action_accessors() {
        let action = IrqAction::new("timer", nop);
        assert_eq!(action.name(), "timer");
        assert_eq!(action.handler() as usize, nop as usize);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            format!("{}", IrqError::InvalidLine),
            "line outside configured range"
        );
        assert_eq!(format!("{}", IrqError::ChainFull), "handler chain at capacity");
        assert_eq!(
            format!("{}", IrqError::NotRegistered),
            "no such handler on this line"
        );
    }
}
