//! Generic runtime for instrument orchestration.
//!
//! The Runtime drives the cooperative event loop, coordinating between:
//! - [`Instrument`]: interlock dispatch
//! - [`Driver`]: platform-specific I/O
//!
//! Each input is processed to completion (every send executed, the render
//! pushed, own events looped back) before the next input is polled.

use std::collections::VecDeque;

use blockline_core::EventTable;
use blockline_proto::CanFrame;

use crate::{Driver, Instrument, InstrumentAction};

/// Generic runtime that orchestrates an Instrument and a Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `T`: Event table backing the instrument
pub struct Runtime<D, T>
where
    D: Driver,
{
    driver: D,
    instrument: Instrument<T, D::Instant>,
    consume_own_events: bool,
}

impl<D, T> Runtime<D, T>
where
    D: Driver,
    T: EventTable,
{
    /// Create a new runtime with the given driver and instrument.
    pub fn new(driver: D, instrument: Instrument<T, D::Instant>) -> Self {
        Self { driver, instrument, consume_own_events: false }
    }

    /// Feed every frame we send back through our own event table.
    #[must_use]
    pub fn with_consume_own_events(mut self, consume: bool) -> Self {
        self.consume_own_events = consume;
        self
    }

    /// Run the event loop until the driver reports end of input.
    ///
    /// Renders the power-on indications first.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.instrument.indicators())?;

        while self.step().await? {}

        self.driver.stop();
        Ok(())
    }

    /// Poll and process one input.
    ///
    /// Returns `false` once input has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let Some(event) = self.driver.poll_input().await? else {
            return Ok(false);
        };

        tracing::trace!(?event, "input");
        let now = self.driver.now();
        let actions = self.instrument.handle(event, now);
        self.execute(actions).await?;
        Ok(true)
    }

    /// Execute actions in order, including any produced by looped-back sends.
    async fn execute(&mut self, initial: Vec<InstrumentAction>) -> Result<(), D::Error> {
        let mut pending: VecDeque<InstrumentAction> = initial.into();
        let mut own: VecDeque<CanFrame> = VecDeque::new();

        loop {
            while let Some(action) = pending.pop_front() {
                match action {
                    InstrumentAction::Send(frame) => {
                        self.driver.send_frame(frame).await?;
                        if self.consume_own_events {
                            own.push_back(frame);
                        }
                    },
                    InstrumentAction::Render(indicators) => self.driver.render(&indicators)?,
                }
            }

            let Some(frame) = own.pop_front() else {
                return Ok(());
            };
            pending.extend(self.instrument.receive_frame(&frame));
        }
    }

    /// Get a reference to the Instrument
    pub fn instrument(&self) -> &Instrument<T, D::Instant> {
        &self.instrument
    }

    /// Get a mutable reference to the Instrument
    pub fn instrument_mut(&mut self) -> &mut Instrument<T, D::Instant> {
        &mut self.instrument
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
