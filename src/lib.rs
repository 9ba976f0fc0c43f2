//! # RustDebugLog
//!
//! Thread-safe leveled logging over a narrow debug transport.
//!
//! ## Architecture
//!
//! One [`DebugLogger`] wraps the debug channel. A log call runs
//! filter → lock → assemble → single transport write:
//! - Filtered-out calls cost one comparison, no lock taken
//! - The scratch buffer and the transport share one mutex
//! - Each message reaches the transport as one contiguous write
//!
//! ## Rules
//!
//! - Log only from schedulable task context
//! - Never log from an ISR or before the scheduler runs
//! - The transport is best effort: failed writes are silently lost

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[cfg(not(target_os = "espidf"))]
extern crate std;

pub mod call_site;
pub mod facade;
pub mod kernel;
pub mod logger;
pub mod severity;
pub mod transport;

pub use call_site::CallSite;
pub use logger::{DebugLogger, DEFAULT_SCRATCH_CAPACITY};
pub use severity::LogLevel;
pub use transport::{ctrl, Transport};

#[cfg(target_os = "espidf")]
pub use transport::{UartTransport, UartTransportConfig};

#[cfg(not(target_os = "espidf"))]
pub use transport::MemoryTransport;
