//! Output routing for the `print` builtin.
//!
//! The interpreter writes program output through a shared handler so that
//! embedders and tests capture it instead of racing for stdout.

use std::sync::Arc;

use parking_lot::Mutex;

/// Destination for `print` output.
pub enum PrintHandler {
    /// Write to process stdout.
    Stdout,
    /// Append to an in-memory buffer.
    Buffer(Mutex<String>),
    /// Discard everything.
    Silent,
}

/// Handler shared between the interpreter and whoever reads the output.
pub type SharedPrintHandler = Arc<PrintHandler>;

impl PrintHandler {
    pub fn stdout() -> SharedPrintHandler {
        Arc::new(PrintHandler::Stdout)
    }

    pub fn buffer() -> SharedPrintHandler {
        Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
    }

    pub fn silent() -> SharedPrintHandler {
        Arc::new(PrintHandler::Silent)
    }

    /// Write one line of program output.
    pub fn print_line(&self, line: &str) {
        match self {
            PrintHandler::Stdout => println!("{line}"),
            PrintHandler::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(line);
                buffer.push('\n');
            }
            PrintHandler::Silent => {}
        }
    }

    /// Take the buffered output, leaving the buffer empty.
    ///
    /// Non-buffering handlers return an empty string.
    pub fn take_output(&self) -> String {
        match self {
            PrintHandler::Buffer(buffer) => std::mem::take(&mut *buffer.lock()),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn buffer_collects_lines() {
        let handler = PrintHandler::buffer();
        handler.print_line("one");
        handler.print_line("two");
        assert_eq!(handler.take_output(), "one\ntwo\n");
        assert_eq!(handler.take_output(), "");
    }

    #[test]
    fn silent_discards() {
        let handler = PrintHandler::silent();
        handler.print_line("gone");
        assert_eq!(handler.take_output(), "");
    }
}
