use log::{debug, trace};

use crate::channel::Channel;
use crate::io::{self, Level, MicrosClock, PinMode, TouchPins};
use crate::{Config, Error, Side, DEFAULT_CONFIG};

/// Touch engine for two electrodes sharing a pin pair
pub struct DualTouch<IO: TouchPins, CLK> {
    io: IO,
    clock: CLK,
    pins: [IO::Pin; 2],
    config: Config,
    channels: [Channel; 2],
    /// States seen by callers, inversion applied when the cycle ran
    reported: [bool; 2],
    initialized: bool,
}

impl<IO, CLK> DualTouch<IO, CLK>
where
    IO: TouchPins,
    CLK: MicrosClock,
{
    pub fn new(io: IO, clock: CLK, left: IO::Pin, right: IO::Pin) -> Self {
        Self::with_config(io, clock, left, right, DEFAULT_CONFIG)
    }

    pub fn with_config(io: IO, clock: CLK, left: IO::Pin, right: IO::Pin, config: Config) -> Self {
        Self {
            io,
            clock,
            pins: [left, right],
            // Re-apply the clamp in case of a hand-built config
            config: config.with_sample_count(config.sample_count()),
            channels: [Channel::new(); 2],
            reported: [false; 2],
            initialized: false,
        }
    }

    /// Give back the pin and clock collaborators
    pub fn release(self) -> (IO, CLK) {
        (self.io, self.clock)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set the fractional margin around the adaptive threshold, e.g. 0.05
    pub fn set_trigger_margin(&mut self, margin: f32) {
        self.config = self.config.with_trigger_margin(margin);
    }

    /// Set the smoothing and threshold filter gains
    ///
    /// Keep `threshold` well below `smoothing`, otherwise the threshold follows
    /// a touch as quickly as the signal does and it is never reported.
    pub fn set_filter_gains(&mut self, smoothing: f32, threshold: f32) {
        self.config = self.config.with_filter_gains(smoothing, threshold);
    }

    /// Set the number of readings summed per cycle, at most [`crate::MAX_SAMPLE_COUNT`]
    pub fn set_sample_count(&mut self, count: u8) {
        self.config = self.config.with_sample_count(count);
    }

    pub fn set_sample_interval(&mut self, interval_us: u32) {
        self.config = self.config.with_sample_interval(interval_us);
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.config = self.config.with_invert(invert);
    }

    pub fn left_touched(&self) -> bool {
        self.touched(Side::Left)
    }

    pub fn right_touched(&self) -> bool {
        self.touched(Side::Right)
    }

    /// State reported by the last cycle, including inversion
    ///
    /// Configuration changes, `set_invert` included, only show up here after
    /// the next cycle.
    pub fn touched(&self, side: Side) -> bool {
        self.reported[side.index()]
    }

    /// Filter state of an electrode
    pub fn channel(&self, side: Side) -> &Channel {
        &self.channels[side.index()]
    }

    /// True once a cycle has seeded the filters
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Re-seed both channels from the next cycle's measurement
    pub fn reset(&mut self) {
        self.initialized = false;
    }

    /// Run one sampling and decision cycle
    ///
    /// Blocks for roughly `(sample_count + 1) * sample_interval_us`. If the pins
    /// report an error the filters are left as they were.
    pub fn update(&mut self) -> Result<(), Error<IO::Error>> {
        let totals = self.sample()?;
        self.process(totals);
        Ok(())
    }

    /// Take the raw measurements for both electrodes
    ///
    /// Runs `sample_count + 1` charge transfer iterations. The first one only
    /// settles the pins and its readings are dropped.
    pub fn sample(&mut self) -> Result<[u32; 2], Error<IO::Error>> {
        let mut totals = [0u32; 2];

        for i in 0..=self.config.sample_count() {
            let start = self.clock.now_us();

            for side in Side::ALL {
                let reading = self.transfer(side).map_err(Error::Pin)?;
                if i > 0 {
                    totals[side.index()] += reading as u32;
                }
            }

            io::wait_since(&mut self.clock, start, self.config.sample_interval_us());
        }

        Ok(totals)
    }

    /// Charge one electrode against the other and read back what is left
    fn transfer(&mut self, side: Side) -> Result<u16, IO::Error> {
        let [left, right] = self.pins;
        let (left_level, right_level) = match side {
            Side::Left => (Level::High, Level::Low),
            Side::Right => (Level::Low, Level::High),
        };
        let sense = self.pins[side.index()];

        self.io.set_mode(left, PinMode::Output)?;
        self.io.write(left, left_level)?;
        self.io.set_mode(right, PinMode::Output)?;
        self.io.write(right, right_level)?;

        self.io.set_mode(sense, PinMode::Input)?;
        self.io.read_analog(sense)
    }

    /// Feed raw totals through the filters and update the touch states
    pub fn process(&mut self, totals: [u32; 2]) {
        if !self.initialized {
            for side in Side::ALL {
                self.channels[side.index()].reset(totals[side.index()], self.config.trigger_margin());
            }
            self.initialized = true;
            debug!("touch filters seeded: {} {}", totals[0], totals[1]);
        }

        for side in Side::ALL {
            let before = self.touched(side);
            let channel = &mut self.channels[side.index()];
            channel.push(totals[side.index()], &self.config);
            trace!(
                "touch {:?}: raw {} smoothed {} threshold {}",
                side,
                channel.raw_total,
                channel.smoothed,
                channel.threshold
            );

            let after = channel.touched != self.config.invert();
            self.reported[side.index()] = after;
            if after != before {
                debug!("touch {:?}: {}", side, if after { "pressed" } else { "released" });
            }
        }
    }
}
