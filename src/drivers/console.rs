//! UART developer console.
//!
//! Assembles received bytes into lines and writes responses back out.
//! Reading is strictly non-blocking: the main loop polls once per
//! iteration and gets at most one completed line.
//!
//! Input that overflows the line buffer is truncated; a truncated line
//! cannot match any command and falls through the silent-ignore path.

use crate::app::ports::{ConsoleLine, ConsolePort};
use crate::drivers::hw_init;

pub struct UartConsole {
    line: ConsoleLine,
}

impl UartConsole {
    pub fn new() -> Self {
        Self {
            line: ConsoleLine::new(),
        }
    }
}

impl Default for UartConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsolePort for UartConsole {
    fn poll_line(&mut self) -> Option<ConsoleLine> {
        while let Some(byte) = hw_init::uart_read_byte() {
            match byte {
                b'\r' | b'\n' => {
                    if !self.line.is_empty() {
                        return Some(core::mem::take(&mut self.line));
                    }
                    // Bare terminators (CRLF tails, empty lines) are skipped.
                }
                _ => {
                    let _ = self.line.push(byte as char);
                }
            }
        }
        None
    }

    fn write_line(&mut self, s: &str) {
        hw_init::uart_write(s.as_bytes());
        hw_init::uart_write(b"\r\n");
    }
}
