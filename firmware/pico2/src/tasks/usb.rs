//! USB CDC-ACM serial input.
//!
//! The host writes newline-delimited JSON to the Pico's serial port. Packets
//! go straight into [`RX_PIPE`]; the main loop drains the pipe on its own
//! schedule, so decoding never runs inside the USB task.

use defmt::{info, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::driver::EndpointError;
use farm_display_pico2::config::{RX_PIPE_CAPACITY, USB_MAX_PACKET_SIZE};

pub type UsbDriver = Driver<'static, USB>;
pub type UsbDevice = embassy_usb::UsbDevice<'static, UsbDriver>;
pub type SerialClass = CdcAcmClass<'static, UsbDriver>;

/// Received bytes waiting for the main loop.
pub static RX_PIPE: Pipe<CriticalSectionRawMutex, RX_PIPE_CAPACITY> = Pipe::new();

/// Runs the USB device stack (enumeration, control requests).
#[embassy_executor::task]
pub async fn usb_device_task(mut device: UsbDevice) -> ! { device.run().await }

/// Copies every received packet into [`RX_PIPE`].
///
/// Waits when the pipe is full, which pushes back on the host through USB
/// flow control instead of dropping bytes.
#[embassy_executor::task]
pub async fn serial_rx_task(mut class: SerialClass) {
    let mut packet = [0u8; USB_MAX_PACKET_SIZE as usize];

    loop {
        class.wait_connection().await;
        info!("USB serial connected");

        loop {
            match class.read_packet(&mut packet).await {
                Ok(n) => RX_PIPE.write_all(&packet[..n]).await,
                Err(EndpointError::Disabled) => break,
                Err(err) => warn!("USB read failed: {:?}", err),
            }
        }

        info!("USB serial disconnected");
    }
}
