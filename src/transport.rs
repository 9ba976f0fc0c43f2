//! Debug transport abstraction.
//!
//! The transport is an opaque byte sink: a narrow channel drained by a
//! host-side viewer. Its own wire protocol is out of scope here; the
//! logger only needs "write these bytes" and the viewer's terminal
//! control sequences.

/// Terminal control sequences understood by the debug viewer.
pub mod ctrl {
    /// Reset colour state.
    pub const RESET: &str = "\x1b[0m";
    /// Clear the viewer's display.
    pub const CLEAR: &str = "\x1b[2J";
    pub const TEXT_BRIGHT_RED: &str = "\x1b[1;31m";
    pub const TEXT_BRIGHT_YELLOW: &str = "\x1b[1;33m";
    pub const TEXT_BRIGHT_GREEN: &str = "\x1b[1;32m";
    pub const TEXT_BRIGHT_MAGENTA: &str = "\x1b[1;35m";
}

/// Byte sink behind the logger.
///
/// Writes are fire and forget: the debug channel is best effort and a
/// failed or truncated write is silently lost. Implementations are not
/// expected to be reentrant; the logger serializes all access.
pub trait Transport {
    /// Write one contiguous chunk.
    fn write(&mut self, bytes: &[u8]);
}

#[cfg(target_os = "espidf")]
pub use uart::{UartTransport, UartTransportConfig};

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::EspError;

    use super::Transport;

    /// UART configuration for the debug channel.
    pub struct UartTransportConfig {
        pub baud_rate: u32,
    }

    impl Default for UartTransportConfig {
        fn default() -> Self {
            Self { baud_rate: 115_200 }
        }
    }

    /// TX-only UART debug channel.
    ///
    /// Requires an external USB-UART adapter (CH340, CP2102, etc.) on
    /// the chosen pin.
    pub struct UartTransport<'d> {
        tx: UartTxDriver<'d>,
    }

    impl<'d> UartTransport<'d> {
        /// Open a TX-only UART on the given pin.
        pub fn new(
            uart: impl Peripheral<P = impl uart::Uart> + 'd,
            tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
            config: &UartTransportConfig,
        ) -> Result<Self, EspError> {
            let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));

            let tx = UartTxDriver::new(
                uart,
                tx_pin,
                Option::<gpio::AnyIOPin>::None, // CTS
                Option::<gpio::AnyIOPin>::None, // RTS
                &uart_config,
            )?;
            Ok(Self { tx })
        }
    }

    impl Transport for UartTransport<'_> {
        fn write(&mut self, bytes: &[u8]) {
            let _ = self.tx.write(bytes);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub use memory::MemoryTransport;

#[cfg(not(target_os = "espidf"))]
mod memory {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use std::sync::Mutex;

    use super::Transport;

    /// In-memory stand-in for the debug channel.
    ///
    /// Records each write call as a separate chunk, so tests can check
    /// both content and write granularity. Clones share the same sink.
    #[derive(Clone, Default)]
    pub struct MemoryTransport {
        chunks: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl MemoryTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Chunks written so far, one entry per write call.
        pub fn writes(&self) -> Vec<Vec<u8>> {
            self.chunks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        }

        /// Everything written so far, concatenated.
        pub fn contents(&self) -> Vec<u8> {
            self.writes().concat()
        }
    }

    impl Transport for MemoryTransport {
        fn write(&mut self, bytes: &[u8]) {
            self.chunks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(bytes.to_vec());
        }
    }
}
