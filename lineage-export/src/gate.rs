//! One in-flight export at a time, whatever its kind.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Png,
    Pdf,
    Svg,
}

/// Shared flag covering PNG, PDF and SVG exports. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct ExportGate {
    active: Rc<Cell<Option<ExportKind>>>,
}

/// Held for the duration of an export; releases the gate when dropped.
#[derive(Debug)]
pub struct ExportTicket {
    kind: ExportKind,
    active: Rc<Cell<Option<ExportKind>>>,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `Err` with the kind currently running.
    pub fn try_begin(&self, kind: ExportKind) -> Result<ExportTicket, ExportKind> {
        if let Some(running) = self.active.get() {
            return Err(running);
        }
        self.active.set(Some(kind));
        Ok(ExportTicket {
            kind,
            active: self.active.clone(),
        })
    }

    pub fn active(&self) -> Option<ExportKind> {
        self.active.get()
    }

    pub fn is_busy(&self) -> bool {
        self.active.get().is_some()
    }
}

impl ExportTicket {
    pub fn kind(&self) -> ExportKind {
        self.kind
    }
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.active.set(None);
    }
}
