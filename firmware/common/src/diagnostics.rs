//! On-screen diagnostics.
//!
//! A small ring buffer of recent events (rejected frames, decoder faults,
//! accepted snapshots) shown on the waiting screen. Host drivers still log
//! through `defmt` or `log`; this buffer is what a person standing in front of
//! the display gets to see.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = DiagnosticLog::new();
//! log.push(Severity::Info, 1_000, "snapshot accepted");
//! log.push_fmt(Severity::Warn, 2_000, format_args!("rejected: {}", err));
//!
//! for entry in log.iter() {
//!     // entry.severity, entry.at_ms, entry.message
//! }
//! ```

use core::fmt::{self, Write};

use heapless::{Deque, String};

// =============================================================================
// Configuration
// =============================================================================

/// Entries kept in the ring buffer.
pub const LOG_ENTRIES: usize = 8;

/// Maximum characters per message.
pub const LOG_MSG_LEN: usize = 48;

// =============================================================================
// Entries
// =============================================================================

/// How much attention an entry deserves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Info,
    Warn,
}

impl Severity {
    /// Single-character prefix shown before the message.
    pub const fn prefix(self) -> char {
        match self {
            Self::Info => 'I',
            Self::Warn => 'W',
        }
    }
}

/// One diagnostic line.
#[derive(Clone, Debug)]
pub struct DiagnosticEntry {
    pub severity: Severity,
    /// Host clock when the entry was recorded.
    pub at_ms: u64,
    /// Message, truncated to `LOG_MSG_LEN - 1` characters.
    pub message: String<LOG_MSG_LEN>,
}

/// Writer that silently stops at capacity instead of failing the whole format.
struct Truncating<'a>(&'a mut String<LOG_MSG_LEN>);

impl Write for Truncating<'_> {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.len() + c.len_utf8() > LOG_MSG_LEN - 1 {
                break;
            }
            self.0.push(c).ok();
        }
        Ok(())
    }
}

// =============================================================================
// Ring Buffer
// =============================================================================

/// Last `LOG_ENTRIES` diagnostic entries. The oldest is dropped when full.
pub struct DiagnosticLog {
    buffer: Deque<DiagnosticEntry, LOG_ENTRIES>,
}

impl DiagnosticLog {
    pub const fn new() -> Self { Self { buffer: Deque::new() } }

    /// Record a plain message.
    pub fn push(
        &mut self,
        severity: Severity,
        at_ms: u64,
        msg: &str,
    ) {
        self.push_fmt(severity, at_ms, format_args!("{msg}"));
    }

    /// Record a formatted message, truncated to fit.
    pub fn push_fmt(
        &mut self,
        severity: Severity,
        at_ms: u64,
        args: fmt::Arguments<'_>,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }

        let mut message = String::new();
        Truncating(&mut message).write_fmt(args).ok();

        self.buffer
            .push_back(DiagnosticEntry {
                severity,
                at_ms,
                message,
            })
            .ok();
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DiagnosticEntry> { self.buffer.iter() }

    /// The `n` most recent entries, oldest first.
    pub fn latest(
        &self,
        n: usize,
    ) -> impl Iterator<Item = &DiagnosticEntry> {
        self.buffer.iter().skip(self.buffer.len().saturating_sub(n))
    }

    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }
}

impl Default for DiagnosticLog {
    fn default() -> Self { Self::new() }
}
