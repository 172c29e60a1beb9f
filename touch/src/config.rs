/// Upper bound on measurements per cycle.
///
/// 64 readings of a 10-bit converter still fit the raw total of the original
/// 16-bit accumulator, so totals stay comparable across platforms.
pub const MAX_SAMPLE_COUNT: u8 = 64;

/// Configuration for the touch engine
///
/// Fields are private so the sample count clamp and the cached filter
/// complements can't be bypassed. Build one with the `with_*` methods, which
/// are `const` so a configuration can live in a `static`.
///
/// The threshold filter is expected to be much slower than the smoothing
/// filter (`threshold_gain` well below `smoothing_gain`). This is not checked:
/// with the ordering reversed the threshold chases the touch signal and
/// touches go undetected.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    sample_count: u8,
    sample_interval_us: u32,
    trigger_margin: f32,
    smoothing_gain: f32,
    smoothing_keep: f32,
    threshold_gain: f32,
    threshold_keep: f32,
    invert: bool,
}

impl Config {
    pub const fn default() -> Self {
        Self {
            sample_count: 40,
            sample_interval_us: 1000,
            trigger_margin: 0.05,
            smoothing_gain: 0.25,
            smoothing_keep: 1.0 - 0.25,
            threshold_gain: 0.03,
            threshold_keep: 1.0 - 0.03,
            invert: false,
        }
    }

    /// Set the number of measurements summed per cycle, clamped to [`MAX_SAMPLE_COUNT`]
    pub const fn with_sample_count(mut self, count: u8) -> Self {
        self.sample_count = if count > MAX_SAMPLE_COUNT { MAX_SAMPLE_COUNT } else { count };
        self
    }

    /// Set the minimum time between the start of successive measurements
    pub const fn with_sample_interval(mut self, interval_us: u32) -> Self {
        self.sample_interval_us = interval_us;
        self
    }

    /// Set the fractional margin the smoothed level must cross to change state
    pub const fn with_trigger_margin(mut self, margin: f32) -> Self {
        self.trigger_margin = margin;
        self
    }

    /// Set the smoothing and threshold filter gains, both expected in (0, 1]
    pub const fn with_filter_gains(mut self, smoothing: f32, threshold: f32) -> Self {
        self.smoothing_gain = smoothing;
        self.smoothing_keep = 1.0 - smoothing;
        self.threshold_gain = threshold;
        self.threshold_keep = 1.0 - threshold;
        self
    }

    /// Report the complement of the filter decision
    pub const fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub const fn sample_count(&self) -> u8 {
        self.sample_count
    }

    pub const fn sample_interval_us(&self) -> u32 {
        self.sample_interval_us
    }

    pub const fn trigger_margin(&self) -> f32 {
        self.trigger_margin
    }

    pub const fn smoothing_gain(&self) -> f32 {
        self.smoothing_gain
    }

    pub const fn threshold_gain(&self) -> f32 {
        self.threshold_gain
    }

    pub const fn invert(&self) -> bool {
        self.invert
    }

    /// Weight kept from the previous smoothed level, `1 - smoothing_gain`
    pub(crate) const fn smoothing_keep(&self) -> f32 {
        self.smoothing_keep
    }

    /// Weight kept from the previous threshold, `1 - threshold_gain`
    pub(crate) const fn threshold_keep(&self) -> f32 {
        self.threshold_keep
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::default()
    }
}

pub const DEFAULT_CONFIG: Config = Config::default();

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DEFAULT_CONFIG;
        assert_eq!(config.sample_count(), 40);
        assert_eq!(config.sample_interval_us(), 1000);
        assert_eq!(config.trigger_margin(), 0.05);
        assert_eq!(config.smoothing_gain(), 0.25);
        assert_eq!(config.threshold_gain(), 0.03);
        assert!(!config.invert());
        assert_eq!(<Config as Default>::default(), DEFAULT_CONFIG);
    }

    #[test]
    fn test_sample_count_clamp() {
        for count in 0..=u8::MAX {
            let config = DEFAULT_CONFIG.with_sample_count(count);
            if count > MAX_SAMPLE_COUNT {
                assert_eq!(config.sample_count(), MAX_SAMPLE_COUNT, "{} was not clamped", count);
            } else {
                assert_eq!(config.sample_count(), count);
            }
        }
    }

    #[test]
    fn test_filter_complements() {
        let config = DEFAULT_CONFIG.with_filter_gains(0.5, 0.125);
        assert_eq!(config.smoothing_gain(), 0.5);
        assert_eq!(config.smoothing_keep(), 0.5);
        assert_eq!(config.threshold_gain(), 0.125);
        assert_eq!(config.threshold_keep(), 0.875);
    }

    #[test]
    fn test_static_config() {
        static CONFIG: Config = Config::default()
            .with_sample_count(200)
            .with_sample_interval(0)
            .with_invert(true);

        assert_eq!(CONFIG.sample_count(), MAX_SAMPLE_COUNT);
        assert_eq!(CONFIG.sample_interval_us(), 0);
        assert!(CONFIG.invert());
    }
}
