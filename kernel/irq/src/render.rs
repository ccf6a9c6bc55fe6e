//! Rendering of the interrupt table as text.
//!
//! Produces the classic per-line report: a header naming each online
//! CPU, then one row per line that has at least one handler, carrying
//! the per-CPU fire counts and the comma-joined handler names. Rows are
//! produced one line at a time so the introspection layer can stream
//! them; each row's counts and names are captured under a single
//! acquisition of that line's lock.

use core::fmt;

use muon_core::id::IrqLine;

use crate::table::IrqTable;

impl<const LINES: usize> IrqTable<LINES> {
    /// Writes the header row: one fixed-width column label per online
    /// CPU.
    ///
    /// Takes no lock; the online mask is read atomically.
    pub fn render_header<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str("           ")?;
        for cpu in self.online.iter() {
            write!(w, "CPU{cpu}       ")?;
        }
        w.write_str("\n")
    }

    /// Writes the row for `line`, if it has any handlers.
    ///
    /// Returns `Ok(true)` if a row was written. Lines with an empty
    /// chain (and line numbers outside the configured range) produce
    /// no output and return `Ok(false)`: unused lines are omitted from
    /// the table entirely rather than rendered as zeros.
    ///
    /// The line's lock is held from before the chain is inspected until
    /// after the last name is written, so the counts and the name list
    /// in one row always belong to the same instant. Two different
    /// rows may still reflect different instants; only per-line
    /// consistency is promised.
    pub fn render_row<W: fmt::Write>(&self, line: IrqLine, w: &mut W) -> Result<bool, fmt::Error> {
        let Some(desc) = self.descs.get(line.as_usize()) else {
            return Ok(false);
        };

        let chain = desc.chain.lock();
        if chain.is_empty() {
            return Ok(false);
        }

        write!(w, "{:3}: ", line.as_u32())?;
        for cpu in self.online.iter() {
            write!(w, "{:10} ", self.stats.read(line, cpu))?;
        }
        for (idx, action) in chain.iter().enumerate() {
            if idx == 0 {
                // The last count field already ended with one space.
                write!(w, " {}", action.name())?;
            } else {
                write!(w, ", {}", action.name())?;
            }
        }
        w.write_str("\n")?;
        Ok(true)
    }

    /// Writes the whole table: header plus every populated line's row,
    /// in ascending line order.
    pub fn render<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        self.render_header(w)?;
        for idx in 0..LINES {
            self.render_row(IrqLine::new(idx as u32), w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use muon_core::id::CpuId;

    use super::*;
    use crate::action::IrqAction;

    fn nop(_line: IrqLine) {}

    #[test]
    fn header_lists_online_cpus() {
        let table = IrqTable::<4>::new();
        table.online().mark_online(CpuId::new(0));
        table.online().mark_online(CpuId::new(1));

        let mut out = String::new();
        table.render_header(&mut out).unwrap();
        assert_eq!(out, "           CPU0       CPU1       \n");
    }

    #[test]
    fn empty_line_produces_no_row() {
        let table = IrqTable::<4>::new();
        let mut out = String::new();
        assert_eq!(table.render_row(IrqLine::new(1), &mut out), Ok(false));
        assert!(out.is_empty());
    }

    #[test]
    fn out_of_range_line_produces_no_row() {
        let table = IrqTable::<4>::new();
        let mut out = String::new();
        assert_eq!(table.render_row(IrqLine::new(99), &mut out), Ok(false));
        assert!(out.is_empty());
    }

    #[test]
    fn names_join_in_registration_order() {
        let table = IrqTable::<4>::new();
        table.online().mark_online(CpuId::new(0));
        let line = IrqLine::new(0);
        table.register(line, IrqAction::new("timer", nop)).unwrap();
        table.register(line, IrqAction::new("uart", nop)).unwrap();

        let mut out = String::new();
        assert_eq!(table.render_row(line, &mut out), Ok(true));
        assert!(out.trim_end().ends_with("timer, uart"));
    }

    #[test]
    fn row_count_matches_populated_lines() {
        let table = IrqTable::<4>::new();
        table.online().mark_online(CpuId::new(0));
        table
            .register(IrqLine::new(1), IrqAction::new("kbd", nop))
            .unwrap();
        table
            .register(IrqLine::new(3), IrqAction::new("disk", nop))
            .unwrap();

        let mut out = String::new();
        table.render(&mut out).unwrap();
        // Header plus one row per populated line.
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("  1: "));
        assert!(out.contains("  3: "));
        assert!(!out.contains("  0: "));
        assert!(!out.contains("  2: "));
    }

    #[test]
    fn report_format_is_bit_exact() {
        let table = IrqTable::<4>::new();
        table.online().mark_online(CpuId::new(0));
        table.online().mark_online(CpuId::new(1));
        table
            .register(IrqLine::new(2), IrqAction::new("net0", nop))
            .unwrap();
        for _ in 0..5 {
            table.stats().record(IrqLine::new(2), CpuId::new(0));
        }
        for _ in 0..3 {
            table.stats().record(IrqLine::new(2), CpuId::new(1));
        }

        let mut out = String::new();
        table.render(&mut out).unwrap();
        assert_eq!(
            out,
            "           CPU0       CPU1       \n  2:          5          3  net0\n"
        );
    }

    #[test]
    fn concurrent_registration_yields_consistent_rows() {
        use std::sync::Arc;

        const NAMES: [&str; 8] = ["h0", "h1", "h2", "h3", "h4", "h5", "h6", "h7"];

        let table = Arc::new(IrqTable::<1>::new());
        table.online().mark_online(CpuId::new(0));
        let line = IrqLine::new(0);

        let registrar = {
            let table = Arc::clone(&table);
            std::thread::spawn(move || {
                for name in NAMES {
                    table.register(line, IrqAction::new(name, nop)).unwrap();
                    std::thread::yield_now();
                }
            })
        };

        // Every observed row must be a clean prefix of the registration
        // sequence: a torn snapshot would show a name list whose length
        // disagrees with what was registered at the lock instant.
        let mut seen = 0;
        while seen < NAMES.len() {
            let mut out = String::new();
            if !table.render_row(line, &mut out).unwrap() {
                std::thread::yield_now();
                continue;
            }
            let row = out.trim_end();
            let names = row.rsplit("  ").next().unwrap();
            let count = names.split(", ").count();
            assert!(count >= seen);
            assert_eq!(names, NAMES[..count].join(", "));
            seen = count;
        }

        registrar.join().unwrap();
    }
}
