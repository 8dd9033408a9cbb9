//! Output sink for the `print` and `println` natives.
//!
//! Embedders pick where program output goes:
//! - stdout (the default)
//! - an in-memory buffer, for tests and hosts that display output themselves
//! - nowhere

use std::sync::Arc;

use parking_lot::Mutex;

/// Writes to the process's stdout.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn println(&self, msg: &str) {
        println!("{msg}");
    }

    pub fn print(&self, msg: &str) {
        print!("{msg}");
    }
}

/// Collects output in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    pub fn print(&self, msg: &str) {
        self.buffer.lock().push_str(msg);
    }

    /// Everything printed so far.
    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    /// Take everything printed so far, leaving the buffer empty.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.lock())
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Print destination, dispatched by enum.
pub enum PrintHandlerImpl {
    Stdout(StdoutPrintHandler),
    Buffer(BufferPrintHandler),
    /// Discards everything.
    Silent,
}

impl PrintHandlerImpl {
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.println(msg),
            Self::Buffer(h) => h.println(msg),
            Self::Silent => {}
        }
    }

    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.print(msg),
            Self::Buffer(h) => h.print(msg),
            Self::Silent => {}
        }
    }

    /// Captured output; empty for handlers that do not capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(h) => h.output(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    /// Take captured output; empty for handlers that do not capture.
    pub fn take(&self) -> String {
        match self {
            Self::Buffer(h) => h.take(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Print handler shared between the interpreter, its natives and the host.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout(StdoutPrintHandler))
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}
