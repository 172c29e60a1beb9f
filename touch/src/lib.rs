//! Two-electrode capacitive touch sensing.
//!
//! The two electrodes share a pin pair: each one is charged while the other is
//! held low, then released and sampled with the ADC. A cycle repeats that
//! measurement a configurable number of times, low-pass filters the totals and
//! compares them against a threshold which slowly tracks the baseline. The
//! threshold tracks a little above the signal while untouched and a little
//! below it while touched, which gives hysteresis without a debounce timer.
//!
//! Pin access and timing are provided by the caller through [`io::TouchPins`]
//! and [`io::MicrosClock`]. Call [`DualTouch::update`] periodically and query
//! [`DualTouch::left_touched`] / [`DualTouch::right_touched`] in between.
#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod config;
pub mod io;
pub mod sensor;

pub use channel::Channel;
pub use config::{Config, DEFAULT_CONFIG, MAX_SAMPLE_COUNT};
pub use sensor::DualTouch;

/// Identifies one of the two electrodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Errors reported by a sensing cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The pin collaborator failed to change mode, drive a level or sample
    Pin(E),
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_side_index() {
        assert_eq!(Side::ALL.map(Side::index), [0, 1]);
    }
}
