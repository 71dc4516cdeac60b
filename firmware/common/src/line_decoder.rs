//! Newline framing for the serial byte stream.
//!
//! Bytes arrive in arbitrary chunks. [`LineDecoder`] accumulates them into a
//! pending line and, on each `\n`, trims the line and queues it if it is not
//! empty. Chunk boundaries never change the decoded lines:
//!
//! ```text
//! feed("AB\nC")            -> ["AB"], pending "C"
//! feed("A"), feed("B\nC")  -> ["AB"], pending "C"
//! ```
//!
//! # Bounded Buffers
//!
//! Both the pending line and the queue are fixed-capacity. Overflow never
//! blocks or panics; it drops data and records a [`DecodeFault`] that the owner
//! can drain with [`LineDecoder::pop_fault`]:
//!
//! - a line longer than `LINE` bytes is discarded up to its terminator
//! - a line that is not UTF-8 is discarded
//! - a full queue drops its oldest line (snapshots are whole-state, newest wins)

use core::fmt;

use heapless::{Deque, String, Vec};

/// Line terminator.
pub const TERMINATOR: u8 = b'\n';

/// Number of undrained faults kept. Older ones are dropped first.
const FAULT_DEPTH: usize = 4;

/// Data dropped by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeFault {
    /// A line exceeded the buffer capacity and was discarded.
    LineTooLong,
    /// A completed line was not valid UTF-8 and was discarded.
    InvalidUtf8,
    /// The queue was full; the oldest completed line was dropped.
    QueueFull,
}

impl fmt::Display for DecodeFault {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::LineTooLong => f.write_str("line too long, discarded"),
            Self::InvalidUtf8 => f.write_str("line not UTF-8, discarded"),
            Self::QueueFull => f.write_str("queue full, oldest line dropped"),
        }
    }
}

/// Reassembles newline-terminated lines from a chunked byte stream.
///
/// `LINE` is the longest accepted line in bytes, `QUEUE` the number of
/// completed lines held until popped.
pub struct LineDecoder<const LINE: usize, const QUEUE: usize> {
    pending: Vec<u8, LINE>,
    /// Set after an overflow; bytes are ignored until the next terminator.
    discarding: bool,
    completed: Deque<String<LINE>, QUEUE>,
    faults: Deque<DecodeFault, FAULT_DEPTH>,
}

impl<const LINE: usize, const QUEUE: usize> LineDecoder<LINE, QUEUE> {
    /// Create an empty decoder.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            discarding: false,
            completed: Deque::new(),
            faults: Deque::new(),
        }
    }

    /// Consume every byte of `bytes`.
    ///
    /// Never blocks and never waits for more input; a trailing partial line
    /// stays pending until a later call supplies its terminator.
    pub fn feed(
        &mut self,
        bytes: &[u8],
    ) {
        for &byte in bytes {
            if byte == TERMINATOR {
                self.complete_line();
            } else if !self.discarding && self.pending.push(byte).is_err() {
                self.pending.clear();
                self.discarding = true;
                self.record(DecodeFault::LineTooLong);
            }
        }
    }

    /// Whether [`pop_next`](Self::pop_next) has a line to return.
    #[inline]
    pub fn has_next(&self) -> bool { !self.completed.is_empty() }

    /// Remove and return the oldest completed line.
    ///
    /// # Panics
    ///
    /// Panics if no line is queued. Check [`has_next`](Self::has_next) first,
    /// or use [`next_line`](Self::next_line).
    pub fn pop_next(&mut self) -> String<LINE> {
        match self.completed.pop_front() {
            Some(line) => line,
            None => panic!("pop_next called with no completed line queued"),
        }
    }

    /// Remove and return the oldest completed line, if any.
    #[inline]
    pub fn next_line(&mut self) -> Option<String<LINE>> { self.completed.pop_front() }

    /// Bytes buffered for the line in progress.
    #[inline]
    pub fn pending_len(&self) -> usize { self.pending.len() }

    /// Number of completed lines waiting to be popped.
    #[inline]
    pub fn queued(&self) -> usize { self.completed.len() }

    /// Remove and return the oldest unreported fault.
    #[inline]
    pub fn pop_fault(&mut self) -> Option<DecodeFault> { self.faults.pop_front() }

    fn complete_line(&mut self) {
        if self.discarding {
            // The overflowing line ends here; the buffer was already cleared
            self.discarding = false;
            return;
        }

        let decoded = core::str::from_utf8(&self.pending).map(|text| {
            let trimmed = text.trim();
            let mut line: String<LINE> = String::new();
            // Cannot overflow: the trimmed text is a slice of a LINE-sized buffer
            line.push_str(trimmed).ok();
            line
        });
        self.pending.clear();

        match decoded {
            Ok(line) if line.is_empty() => {}
            Ok(line) => self.enqueue(line),
            Err(_) => self.record(DecodeFault::InvalidUtf8),
        }
    }

    fn enqueue(
        &mut self,
        line: String<LINE>,
    ) {
        if self.completed.is_full() {
            self.completed.pop_front();
            self.record(DecodeFault::QueueFull);
        }
        self.completed.push_back(line).ok();
    }

    fn record(
        &mut self,
        fault: DecodeFault,
    ) {
        if self.faults.is_full() {
            self.faults.pop_front();
        }
        self.faults.push_back(fault).ok();
    }
}

impl<const LINE: usize, const QUEUE: usize> Default for LineDecoder<LINE, QUEUE> {
    fn default() -> Self { Self::new() }
}
