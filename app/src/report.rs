//! Touch state reports on USART1 (PB6 TX, PB7 RX), 115200 baud.
//!
//! Lines only go out when a state changes, so the writes simply block.

use core::fmt::Write;

use crate::hal::gpio::gpiob::{PB6, PB7};
use crate::hal::gpio::{Alternate, AF0};
use crate::hal::pac;
use crate::hal::serial::Serial;

use touch::{Channel, Side};

type Uart = Serial<pac::USART1, PB6<Alternate<AF0>>, PB7<Alternate<AF0>>>;

pub struct Reporter {
    uart: Uart,
    reported: [bool; 2],
}

impl Reporter {
    pub fn new(uart: Uart) -> Self {
        Self {
            uart,
            reported: [false; 2],
        }
    }

    /// Print a line if `side` changed since the last call
    pub fn state(&mut self, side: Side, touched: bool, channel: &Channel) {
        if self.reported[side as usize] == touched {
            return;
        }
        self.reported[side as usize] = touched;

        write!(
            self.uart,
            "{:?} {} (raw {} smoothed {} th {})\r\n",
            side,
            if touched { "down" } else { "up" },
            channel.raw_total,
            channel.smoothed as u32,
            channel.threshold as u32
        )
        .ok();
    }

    pub fn error(&mut self) {
        self.uart.write_str("ADC read failed\r\n").ok();
    }
}
