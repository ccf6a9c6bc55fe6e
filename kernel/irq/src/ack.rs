//! Fallback acknowledge for unconfigured lines.

use muon_core::id::IrqLine;
use muon_core::kwarn;

/// Answers a hardware interrupt on a line no configuration claims.
///
/// Emits one diagnostic naming the raw line number and returns. Takes
/// no locks, touches no table state, and never allocates, so the
/// dispatch layer may call it directly from interrupt context with any
/// value the hardware reported, including ones far outside the
/// configured range. Escalation beyond the diagnostic (masking the
/// line, panicking) is the caller's policy, not this layer's.
pub fn ack_unexpected(line: IrqLine) {
    kwarn!("unexpected IRQ {line}");
}

#[cfg(test)]
mod tests {
    use core::fmt;
    use std::fmt::Write as _;
    use std::sync::Mutex;

    use muon_core::log::{LogLevel, set_log_fn};

    use super::*;

    static CAPTURED: Mutex<String> = Mutex::new(String::new());

    fn capture(level: LogLevel, args: fmt::Arguments<'_>) {
        let _ = writeln!(CAPTURED.lock().unwrap(), "[{}] {args}", level.name());
    }

    // The log sink is process-global, so all acknowledger assertions
    // live in one test.
    #[test]
    fn emits_diagnostic_for_any_raw_value() {
        // SAFETY: `capture` only takes a test-local mutex.
        unsafe { set_log_fn(capture) };

        ack_unexpected(IrqLine::new(9));
        ack_unexpected(IrqLine::new(u32::MAX));

        let captured = CAPTURED.lock().unwrap();
        assert!(captured.contains("[WARN ] unexpected IRQ 9"));
        assert!(captured.contains("[WARN ] unexpected IRQ 4294967295"));
    }
}
