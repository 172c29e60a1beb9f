use crate::pac;
use crate::hal::rcc::Rcc;

use touch::io::MicrosClock;

/// TIM2 as a free-running 32-bit microsecond counter
pub struct MicrosTimer {
    tim: pac::TIM2,
}

impl MicrosTimer {
    pub fn new(tim: pac::TIM2, rcc: &Rcc) -> Self {
        let rccregs = unsafe { pac::Peripherals::steal().RCC };
        rccregs.apb1enr.modify(|_, w| w.tim2en().set_bit());

        // If pclk is prescaled from hclk, the frequency fed into the timers is doubled
        let clk_freq = if rcc.clocks.hclk().0 == rcc.clocks.pclk().0 {
            rcc.clocks.pclk().0
        } else {
            rcc.clocks.pclk().0 * 2
        };

        tim.psc.write(|w| unsafe { w.bits(clk_freq / 1_000_000 - 1) });
        tim.arr.write(|w| unsafe { w.bits(u32::MAX) });
        // Load the prescaler
        tim.egr.write(|w| w.ug().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }
}

impl MicrosClock for MicrosTimer {
    fn now_us(&mut self) -> u32 {
        self.tim.cnt.read().bits()
    }
}
