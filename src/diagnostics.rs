//! Relay for the runtime's own output stream.
//!
//! Messages go straight through to the configured sink in the order they
//! arrive. Without a sink they land on the `log` facade under the `player`
//! target; whichever logger the host installed at startup decides where that
//! ends up (`wasm_logger` in the browser bridge).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub const LOG_TARGET: &str = "player";

/// A single-string callback.
pub type Sink = Rc<dyn Fn(&str)>;

#[derive(Clone, Default)]
pub struct Diagnostics {
    print: Option<Sink>,
    print_err: Option<Sink>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("print", &self.print.is_some())
            .field("print_err", &self.print_err.is_some())
            .finish()
    }
}

impl Diagnostics {
    pub fn set_print(&mut self, sink: Sink) {
        self.print = Some(sink);
    }

    pub fn set_print_err(&mut self, sink: Sink) {
        self.print_err = Some(sink);
    }

    pub fn info(&self, message: &str) {
        match &self.print {
            Some(sink) => sink(message),
            None => log::info!(target: LOG_TARGET, "{message}"),
        }
    }

    pub fn error(&self, message: &str) {
        match &self.print_err {
            Some(sink) => sink(message),
            None => log::error!(target: LOG_TARGET, "{message}"),
        }
    }
}

struct RelayState {
    diagnostics: Diagnostics,
    progress: Cell<f64>,
    closed: Cell<bool>,
}

/// Handle given to the bootstrap so the runtime can report output and load
/// progress for the lifetime of one instance.
///
/// Once the instance is released the relay is closed and drops anything
/// that still trickles in.
#[derive(Clone)]
pub struct Relay {
    state: Rc<RelayState>,
}

impl Relay {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            state: Rc::new(RelayState {
                diagnostics,
                progress: Cell::new(0.0),
                closed: Cell::new(false),
            }),
        }
    }

    pub fn info(&self, message: &str) {
        if !self.state.closed.get() {
            self.state.diagnostics.info(message);
        }
    }

    pub fn error(&self, message: &str) {
        if !self.state.closed.get() {
            self.state.diagnostics.error(message);
        }
    }

    /// Record load progress. Clamped to `[0, 1]`, never goes backwards.
    pub fn progress(&self, value: f64) {
        if self.state.closed.get() || value.is_nan() {
            return;
        }
        let value = value.clamp(0.0, 1.0);
        if value > self.state.progress.get() {
            log::trace!(target: LOG_TARGET, "load progress {:.0}%", value * 100.0);
            self.state.progress.set(value);
        }
    }

    pub fn current_progress(&self) -> f64 {
        self.state.progress.get()
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.get()
    }

    pub(crate) fn close(&self) {
        self.state.closed.set(true);
    }
}
