//! Hardware collaborators used by the sensing cycle.
//!
//! The engine needs to switch each electrode pin between a driven output and a
//! high impedance analog input at runtime, which the typestate pin APIs of most
//! HALs can't express on a borrowed pin. Implement these traits once per board.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Push-pull output
    Output,
    /// High impedance input, ready for an analog reading
    Input,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// Digital and analog access to the electrode pins
pub trait TouchPins {
    /// Identifies a pin, e.g. a pin number or an ADC channel
    type Pin: Copy;
    type Error;

    fn set_mode(&mut self, pin: Self::Pin, mode: PinMode) -> Result<(), Self::Error>;

    /// Drive the output level of a pin in [`PinMode::Output`]
    fn write(&mut self, pin: Self::Pin, level: Level) -> Result<(), Self::Error>;

    /// Take one analog reading. The value is expected to grow roughly linearly
    /// with the charge left on the electrode.
    fn read_analog(&mut self, pin: Self::Pin) -> Result<u16, Self::Error>;
}

/// A free-running microsecond counter
///
/// The counter may wrap; only differences between readings are used.
pub trait MicrosClock {
    fn now_us(&mut self) -> u32;
}

/// Spin until `interval_us` microseconds have passed since `start_us`.
///
/// Uses wrapping arithmetic so a counter rollover during the wait is harmless.
pub fn wait_since<C: MicrosClock + ?Sized>(clock: &mut C, start_us: u32, interval_us: u32) {
    while clock.now_us().wrapping_sub(start_us) < interval_us {
        core::hint::spin_loop();
    }
}
