//! Async tasks for the display firmware.
//!
//! - `flush`: display buffer flush task (DMA transfers)
//! - `usb`: USB device stack and CDC-ACM receive task

pub mod flush;
pub mod usb;

pub use flush::{FLUSH_DONE, FLUSH_SIGNAL, LAST_FLUSH_TIME_US, display_flush_task};
pub use usb::{RX_PIPE, serial_rx_task, usb_device_task};
