//! Build farm display library - host-testable parts of the Pico 2 firmware.
//!
//! The binary (`main.rs`) adds the embassy tasks, USB and SPI on top of this.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p farm-display-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p farm-display-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod framebuffer;

pub use config::RenderCadence;
pub use framebuffer::FramebufferRenderer;
