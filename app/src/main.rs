#![no_main]
#![no_std]

use cortex_m;
use cortex_m_rt::entry;
use panic_halt as _;

use stm32f0xx_hal as hal;

use touch::{Config, DualTouch, Side};

use crate::hal::adc::Adc;
use crate::hal::pac;
use crate::hal::prelude::*;

use micros::MicrosTimer;
use pins::{AdcPins, TouchPin};
use report::Reporter;

mod micros;
mod pins;
mod report;

static TOUCH_CONFIG: Config = Config::default()
    .with_sample_count(40)
    .with_sample_interval(1000)
    .with_trigger_margin(0.05)
    .with_filter_gains(0.25, 0.03);

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();

    let mut flash = dp.FLASH;
    let mut rcc = dp.RCC.configure().sysclk(48.mhz()).freeze(&mut flash);
    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);

    // A library requiring a critical section to set a gpio AF register is bad and I just won't.
    let fake_cs = unsafe { cortex_m::interrupt::CriticalSection::new() };

    // Electrodes
    let left = gpioa.pa0.into_analog(&fake_cs);
    let right = gpioa.pa1.into_analog(&fake_cs);

    let tx_pin = gpiob.pb6.into_alternate_af0(&fake_cs);
    let rx_pin = gpiob.pb7.into_alternate_af0(&fake_cs);
    let uart = hal::serial::Serial::usart1(dp.USART1, (tx_pin, rx_pin), 115200.bps(), &mut rcc);
    let mut reporter = Reporter::new(uart);

    let adc = Adc::new(dp.ADC, &mut rcc);
    let clock = MicrosTimer::new(dp.TIM2, &rcc);

    let mut touch = DualTouch::with_config(
        AdcPins::new(adc, left, right),
        clock,
        TouchPin::Left,
        TouchPin::Right,
        TOUCH_CONFIG,
    );

    loop {
        if touch.update().is_err() {
            reporter.error();
            continue;
        }

        for side in Side::ALL {
            reporter.state(side, touch.touched(side), touch.channel(side));
        }
    }
}
