use crate::Config;

/// Filter state of one electrode
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Channel {
    /// Sum of the readings of the last cycle
    pub raw_total: u32,
    /// Low pass filtered raw total
    pub smoothed: f32,
    /// Adaptive threshold the smoothed level is compared against
    pub threshold: f32,
    /// Filter decision, before inversion
    pub touched: bool,
}

impl Channel {
    pub const fn new() -> Self {
        Self {
            raw_total: 0,
            smoothed: 0.0,
            threshold: 0.0,
            touched: false,
        }
    }

    /// Seed the filters from a first measurement
    ///
    /// The threshold starts well above the signal so noise can't trigger a
    /// touch before it has had time to settle.
    pub fn reset(&mut self, raw_total: u32, trigger_margin: f32) {
        self.raw_total = raw_total;
        self.touched = false;
        self.smoothed = raw_total as f32;
        self.threshold = self.smoothed * (1.0 + 4.0 * trigger_margin);
    }

    /// Process the raw total of a new cycle
    ///
    /// Returns the updated decision.
    pub fn push(&mut self, raw_total: u32, config: &Config) -> bool {
        let raw = raw_total as f32;
        self.raw_total = raw_total;

        self.smoothed = config.smoothing_gain() * raw + config.smoothing_keep() * self.smoothed;

        // Track above the signal while idle and below it while touched
        let margin = if self.touched {
            1.0 - config.trigger_margin()
        } else {
            1.0 + config.trigger_margin()
        };
        self.threshold = config.threshold_gain() * raw * margin + config.threshold_keep() * self.threshold;

        self.touched = self.smoothed > self.threshold;
        self.touched
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::DEFAULT_CONFIG;

    const EPSILON: f32 = 0.5;

    #[test]
    fn test_reset() {
        let mut ch = Channel::new();
        ch.touched = true;
        ch.reset(1000, 0.05);
        assert!(!ch.touched);
        assert_eq!(ch.smoothed, 1000.0);
        assert!((ch.threshold - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn test_convergence_untouched() {
        let config = DEFAULT_CONFIG;
        let mut ch = Channel::new();
        ch.reset(1000, config.trigger_margin());

        const R: u32 = 800;
        let mut last_error = f32::MAX;
        for _ in 0..40 {
            ch.push(R, &config);
            let error = (ch.smoothed - R as f32).abs();
            assert!(error <= last_error, "Smoothed level moved away from input");
            last_error = error;
        }
        assert!(last_error < EPSILON, "Smoothed level did not converge: {}", ch.smoothed);

        // The threshold filter is slower, give it ~10 time constants
        for _ in 0..400 {
            ch.push(R, &config);
        }
        assert!(!ch.touched);
        let target = R as f32 * (1.0 + config.trigger_margin());
        assert!((ch.threshold - target).abs() < EPSILON, "Threshold {} not near {}", ch.threshold, target);
    }

    #[test]
    fn test_convergence_touched() {
        let config = DEFAULT_CONFIG;
        let mut ch = Channel::new();
        ch.reset(1000, config.trigger_margin());

        // Baseline, then a step large enough to trigger
        for _ in 0..50 {
            ch.push(1000, &config);
        }
        for _ in 0..10 {
            ch.push(2000, &config);
        }
        assert!(ch.touched, "Step did not trigger");

        // Held touch: the threshold settles below the signal and the touch holds
        for _ in 0..400 {
            ch.push(2000, &config);
            assert!(ch.touched, "Touch released while held");
        }
        let target = 2000.0 * (1.0 - config.trigger_margin());
        assert!((ch.threshold - target).abs() < EPSILON, "Threshold {} not near {}", ch.threshold, target);
    }

    #[test]
    fn test_hysteresis() {
        let config = DEFAULT_CONFIG;
        let margin = config.trigger_margin();

        // Idle with the threshold settled at R * (1 + margin) for R = 1000
        let mut ch = Channel::new();
        ch.raw_total = 1000;
        ch.threshold = 1000.0 * (1.0 + margin);
        ch.smoothed = ch.threshold + 5.0;
        ch.touched = false;

        // A raw level held just past the trigger point flips the state...
        let level = 1060;
        assert!(ch.push(level, &config), "Did not trigger above the threshold");

        // ...and the same level keeps it, because the threshold now moves below the signal
        for _ in 0..20 {
            let before = ch.threshold;
            assert!(ch.push(level, &config), "Chattered at the trigger boundary");
            assert!(ch.threshold <= before + 1e-3, "Threshold rose while touched");
        }
    }

    #[test]
    fn test_hysteresis_settled_boundary() {
        let config = DEFAULT_CONFIG;
        let mut ch = Channel::new();
        ch.reset(1000, config.trigger_margin());

        // Let the idle threshold settle on R * (1 + margin)
        for _ in 0..400 {
            ch.push(1000, &config);
        }
        assert!(!ch.touched);
        let boundary = ch.threshold;
        assert!((boundary - 1050.0).abs() < EPSILON, "Threshold settled at {}", boundary);

        // A short press triggers...
        assert!(ch.push(2000, &config), "Press did not trigger");

        // ...and holding the raw level exactly on the idle trigger point keeps it touched
        let level = boundary.round() as u32;
        for _ in 0..400 {
            assert!(ch.push(level, &config), "Released at the trigger boundary");
        }
        let target = level as f32 * (1.0 - config.trigger_margin());
        assert!((ch.threshold - target).abs() < EPSILON, "Threshold {} not near {}", ch.threshold, target);
    }

    #[test]
    fn test_release() {
        let config = DEFAULT_CONFIG;
        let mut ch = Channel::new();
        ch.reset(1000, config.trigger_margin());
        for _ in 0..50 {
            ch.push(1000, &config);
        }
        for _ in 0..10 {
            ch.push(2000, &config);
        }
        assert!(ch.touched);

        let mut released = false;
        for _ in 0..20 {
            if !ch.push(1000, &config) {
                released = true;
                break;
            }
        }
        assert!(released, "Didn't release after the signal dropped");
    }
}
