//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the instrument runtime from specific I/O:
//! the bus controller, the debounced switches and the lamp outputs. Each
//! platform implements the trait, while the generic [`crate::Runtime`]
//! handles all orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use blockline_core::IndicatorVector;
use blockline_proto::CanFrame;

use crate::InstrumentEvent;

/// Abstracts I/O operations for the instrument runtime.
///
/// # Implementations
///
/// - **Console**: stdin commands and a simulated peer (`blockline-node`)
/// - **Simulation**: scripted inputs and captured outputs (`blockline-harness`)
/// - **Hardware**: a CAN controller, GPIO switches and LEDs
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Wait for the next input.
    ///
    /// Returns `None` once input has ended and the runtime should stop.
    fn poll_input(
        &mut self,
    ) -> impl Future<Output = Result<Option<InstrumentEvent>, Self::Error>> + Send;

    /// Put a frame on the bus. Fire and forget: delivery is not confirmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus controller rejects the frame.
    fn send_frame(&mut self, frame: CanFrame) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Push indications to the lamps, buzzer and bell.
    ///
    /// # Errors
    ///
    /// Returns an error if the outputs cannot be driven.
    fn render(&mut self, indicators: &IndicatorVector) -> Result<(), Self::Error>;

    /// Release resources.
    fn stop(&mut self);
}
