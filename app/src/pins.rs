//! Electrode pins on PA0 (ADC_IN0) and PA1 (ADC_IN1).
//!
//! The HAL only lets a pin change mode by consuming it, so the charge transfer
//! toggles MODER directly and hands the pins back to the ADC in analog mode.
//! Nothing else in the application touches PA0/PA1.

use crate::hal::adc::{Adc, AdcPrecision};
use crate::hal::gpio::gpioa::{PA0, PA1};
use crate::hal::gpio::Analog;
use crate::hal::pac;
use crate::hal::prelude::*;

use touch::io::{Level, PinMode, TouchPins};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPin {
    Left,
    Right,
}

impl TouchPin {
    /// Pin number within GPIOA
    const fn number(self) -> u32 {
        match self {
            TouchPin::Left => 0,
            TouchPin::Right => 1,
        }
    }
}

const MODE_OUTPUT: u32 = 0b01;
const MODE_ANALOG: u32 = 0b11;

pub struct AdcPins {
    adc: Adc,
    left: PA0<Analog>,
    right: PA1<Analog>,
}

impl AdcPins {
    pub fn new(mut adc: Adc, left: PA0<Analog>, right: PA1<Analog>) -> Self {
        // 10 bit readings keep 64 summed samples in the same range as the default tuning
        adc.set_precision(AdcPrecision::B_10);
        Self { adc, left, right }
    }
}

impl TouchPins for AdcPins {
    type Pin = TouchPin;
    type Error = ();

    fn set_mode(&mut self, pin: TouchPin, mode: PinMode) -> Result<(), ()> {
        let gpioa = unsafe { &*pac::GPIOA::ptr() };
        let shift = pin.number() * 2;
        let bits = match mode {
            PinMode::Output => MODE_OUTPUT,
            PinMode::Input => MODE_ANALOG,
        };
        gpioa.moder.modify(|r, w| unsafe { w.bits((r.bits() & !(0b11 << shift)) | (bits << shift)) });
        Ok(())
    }

    fn write(&mut self, pin: TouchPin, level: Level) -> Result<(), ()> {
        let gpioa = unsafe { &*pac::GPIOA::ptr() };
        let mask = match level {
            Level::High => 1 << pin.number(),
            Level::Low => 1 << (pin.number() + 16),
        };
        gpioa.bsrr.write(|w| unsafe { w.bits(mask) });
        Ok(())
    }

    fn read_analog(&mut self, pin: TouchPin) -> Result<u16, ()> {
        match pin {
            TouchPin::Left => nb::block!(self.adc.read(&mut self.left)),
            TouchPin::Right => nb::block!(self.adc.read(&mut self.right)),
        }
    }
}
