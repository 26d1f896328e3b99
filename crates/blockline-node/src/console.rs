//! Operator console.
//!
//! Each line is one [`Command`]. Commands work the local panel unless they
//! start with `peer`. After every command the bus is allowed to drain, so
//! the operator always sees the settled result.
//!
//! ```text
//! lc | tot | nrm     operate a block switch (press and release)
//! bell               ring the far end's bell
//! lock | unlock      move the commutator lever guarding this instrument
//! tick <ms>          advance time
//! status             log both panels
//! quit               stop
//! ```

use std::{str::FromStr, time::Duration};

use blockline_core::{IndicatorVector, NodeConfig, Switch};
use blockline_harness::{InstrumentPair, Side};

use crate::{CommandError, NodeError};

/// Side the console operates unless told otherwise.
const LOCAL: Side = Side::A;

/// One console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Press and release a panel switch.
    Operate {
        /// Panel.
        side: Side,
        /// Switch.
        switch: Switch,
    },
    /// Move a commutator lever.
    Lever {
        /// Instrument the lever guards.
        side: Side,
        /// `true` to lock.
        locked: bool,
    },
    /// Advance time.
    Tick(Duration),
    /// Log both panels.
    Status,
    /// Stop the node.
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let mut word = words.next().ok_or(CommandError::Empty)?;

        let side = if word.eq_ignore_ascii_case("peer") {
            word = words
                .next()
                .ok_or(CommandError::MissingArgument { command: "peer", argument: "a command" })?;
            LOCAL.peer()
        } else {
            LOCAL
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "lc" => Self::Operate { side, switch: Switch::LineClear },
            "tot" => Self::Operate { side, switch: Switch::TrainOnTrack },
            "nrm" => Self::Operate { side, switch: Switch::Normal },
            "bell" => Self::Operate { side, switch: Switch::Bell },
            "lock" => Self::Lever { side, locked: true },
            "unlock" => Self::Lever { side, locked: false },
            "tick" => {
                let value = words
                    .next()
                    .ok_or(CommandError::MissingArgument { command: "tick", argument: "<ms>" })?;
                let millis = value.parse::<u64>().map_err(|_| CommandError::InvalidArgument {
                    argument: "milliseconds",
                    value: value.to_string(),
                })?;
                Self::Tick(Duration::from_millis(millis))
            },
            "status" if side == LOCAL => Self::Status,
            "quit" | "exit" if side == LOCAL => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}

/// Whether to keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Quit,
}

/// A simulated pair worked from the console.
pub struct Console {
    pair: InstrumentPair,
}

impl Console {
    /// Build the pair from the local and far configurations.
    pub fn new(local: &NodeConfig, peer: &NodeConfig) -> Result<Self, NodeError> {
        let pair = InstrumentPair::from_configs(local, peer)?;
        Ok(Self { pair })
    }

    /// Run one command to completion and log what changed.
    pub fn execute(&mut self, command: Command) -> Flow {
        let before = [*self.pair.rendered(Side::A), *self.pair.rendered(Side::B)];

        match command {
            Command::Operate { side, switch } => {
                tracing::info!(%side, %switch, "operate");
                self.pair.press(side, switch);
                self.pair.settle();
                self.pair.release(side, switch);
            },
            Command::Lever { side, locked } => {
                tracing::info!(%side, locked, "lever");
                self.pair.set_lever(side, locked);
            },
            Command::Tick(by) => self.pair.advance(by),
            Command::Status => {
                for side in Side::BOTH {
                    self.log_panel(side);
                }
                return Flow::Continue;
            },
            Command::Quit => return Flow::Quit,
        }

        self.pair.settle();
        for side in Side::BOTH {
            if *self.pair.rendered(side) != before[side.index()] {
                self.log_panel(side);
            }
        }
        Flow::Continue
    }

    fn log_panel(&self, side: Side) {
        let instrument = self.pair.instrument(side);
        let indicators: &IndicatorVector = self.pair.rendered(side);
        tracing::info!(
            %side,
            node = instrument.codec().node_number(),
            remote = %instrument.remote_state(),
            local = %instrument.local_state(),
            "{indicators}"
        );
    }

    /// The simulated pair.
    pub fn pair(&self) -> &InstrumentPair {
        &self.pair
    }
}
