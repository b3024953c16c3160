use num_traits::AsPrimitive;

/// Spike-rejecting average filter.
///
/// The smoothed value advances as the midpoint of the old and new samples.
/// A sample deviating from it by more than the activity threshold is treated
/// as a suppression candidate: the output holds until the configured number
/// of consecutive large samples has been seen, then the next one is accepted.
/// Isolated spikes are rejected outright while a sustained level change gets
/// through with a worst-case lag of `suppression_count + 1` samples.
#[derive(Debug, Clone, Copy)]
pub struct SuppressingAverageFilter<T> {
    enabled: bool,
    first_sample: bool,

    smooth_value: T,
    raw_value: T,
    filtered_value: T,
    changed: bool,

    activity_threshold: T,
    suppression_count: i32,
    current_suppression_count: i32,
}

impl<T> SuppressingAverageFilter<T>
where
    T: Copy + PartialOrd + AsPrimitive<f64>,
    f64: AsPrimitive<T>,
{
    /// Create a filter that suppresses deviations larger than
    /// `activity_threshold` for up to `suppression_count` consecutive samples.
    pub fn new(activity_threshold: T, suppression_count: i32) -> Self {
        let zero: T = 0.0_f64.as_();

        Self {
            enabled: true,
            first_sample: true,
            smooth_value: zero,
            raw_value: zero,
            filtered_value: zero,
            changed: false,
            activity_threshold,
            suppression_count,
            current_suppression_count: 0,
        }
    }

    /// Feed one raw sample and return the filtered value.
    ///
    /// When the filter is disabled the raw value passes through unchanged.
    /// The changed flag compares against the previous filtered value with
    /// exact equality on `T`.
    pub fn update(&mut self, raw_value: T) -> T {
        self.raw_value = raw_value;

        let previous = self.filtered_value;
        self.filtered_value = if self.enabled {
            self.apply(raw_value)
        } else {
            raw_value
        };

        self.changed = self.filtered_value != previous;
        self.filtered_value
    }

    fn apply(&mut self, new_value: T) -> T {
        if self.first_sample {
            self.smooth_value = new_value;
            self.first_sample = false;
        }

        let new_f = new_value.as_();
        let smooth_f = self.smooth_value.as_();
        let diff = if new_f > smooth_f {
            new_f - smooth_f
        } else {
            smooth_f - new_f
        };

        if diff > self.activity_threshold.as_() {
            self.current_suppression_count = self.current_suppression_count.saturating_add(1);

            // Suppression exhausted, accept the large sample.
            if self.current_suppression_count > self.suppression_count {
                self.smooth_value = midpoint(smooth_f, new_f);
                self.current_suppression_count = 0;
            }
        } else {
            self.smooth_value = midpoint(smooth_f, new_f);
            self.current_suppression_count = 0;
        }

        self.smooth_value
    }

    /// Last filtered value produced by [`update`](Self::update).
    pub fn value(&self) -> T {
        self.filtered_value
    }

    /// Last raw value passed to [`update`](Self::update).
    pub fn raw_value(&self) -> T {
        self.raw_value
    }

    /// Whether the filtered value changed during the last [`update`](Self::update).
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// When disabled, [`update`](Self::update) passes raw values through unchanged.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Number of consecutive large samples held back before one is accepted.
    pub fn suppression_count(&self) -> i32 {
        self.suppression_count
    }

    pub fn set_suppression_count(&mut self, count: i32) {
        self.suppression_count = count;
    }

    /// Deviation magnitude beyond which a sample is a suppression candidate.
    pub fn activity_threshold(&self) -> T {
        self.activity_threshold
    }

    pub fn set_activity_threshold(&mut self, threshold: T) {
        self.activity_threshold = threshold;
    }

    /// Reset filter state. The next sample re-seeds the smoothed value.
    pub fn reset(&mut self) {
        self.first_sample = true;
        self.current_suppression_count = 0;
    }
}

fn midpoint<T>(old: f64, new: f64) -> T
where
    T: Copy + 'static,
    f64: AsPrimitive<T>,
{
    ((old + new) / 2.0).as_()
}
