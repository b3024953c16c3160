use num_traits::AsPrimitive;

/// Smoothing factor for the internal error tracking EMA.
const ERROR_SMOOTHING: f64 = 0.4;

/// Adaptive exponential moving average filter.
///
/// Smooths a stream of noisy samples with a variable-rate EMA: the smoothing
/// factor is derived from the magnitude of recent change through a saturating
/// snap curve, so small jitter is damped hard while large movements pass
/// through almost directly.
///
/// Two optional behaviors refine the output near rest and near the bounds:
///
/// - **Sleep**: a second EMA tracks the recent raw-minus-smooth error. While
///   its magnitude stays below the activity threshold the output holds
///   perfectly still instead of drifting with the noise floor.
/// - **Edge snap**: smoothed values within the activity threshold of a bound
///   snap to that bound, so the output can actually reach the extremes.
///
/// Feed one raw sample per tick through [`update`](Self::update) and read the
/// result back. Each call is O(1) and allocation free.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveSmoothingFilter<T> {
    enabled: bool,
    first_sample: bool,
    sleep_enabled: bool,
    edge_snap_enabled: bool,
    sleeping: bool,

    smooth_value: T,
    error_ema: f64,

    lower_bound: T,
    upper_bound: T,

    raw_value: T,
    filtered_value: T,
    changed: bool,

    snap_multiplier: f64,
    activity_threshold: T,
}

impl<T> AdaptiveSmoothingFilter<T>
where
    T: Copy + PartialOrd + AsPrimitive<f64>,
    f64: AsPrimitive<T>,
{
    /// Create a filter for samples in `lower_bound..=upper_bound`.
    ///
    /// The filter starts enabled only if `upper_bound > lower_bound`. This is
    /// evaluated once, here; changing the bounds later does not revisit it,
    /// only [`set_enabled`](Self::set_enabled) does.
    ///
    /// Sleep and edge snapping start enabled, the snap multiplier defaults to
    /// 0.01 and the activity threshold to 1% of the bound range.
    pub fn new(lower_bound: T, upper_bound: T) -> Self {
        let threshold = ((upper_bound.as_() - lower_bound.as_()) * 0.01).as_();

        Self {
            enabled: upper_bound > lower_bound,
            first_sample: true,
            sleep_enabled: true,
            edge_snap_enabled: true,
            sleeping: false,
            smooth_value: lower_bound,
            error_ema: 0.0,
            lower_bound,
            upper_bound,
            raw_value: lower_bound,
            filtered_value: lower_bound,
            changed: false,
            snap_multiplier: 0.01,
            activity_threshold: threshold,
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

        let lower = self.lower_bound.as_();
        let upper = self.upper_bound.as_();
        let threshold = self.activity_threshold.as_();

        // Near a bound, warp the input away from it so movements there
        // register as larger ones. Input resting right at a bound could
        // otherwise never accumulate enough error to wake the filter.
        let mut new_value = new_value;
        if self.sleep_enabled && self.edge_snap_enabled {
            let v = new_value.as_();
            if fabs(v - lower) < threshold {
                new_value = (lower + fabs(fabs(v - lower) * 2.0 - threshold)).as_();
            } else if fabs(v - upper) < threshold {
                new_value = (upper - fabs(fabs(v - upper) * 2.0 - threshold)).as_();
            }
        }

        let new_f = new_value.as_();
        let smooth_f = self.smooth_value.as_();
        let diff = fabs(new_f - smooth_f);

        // Second EMA over the signed deviation, used only for the sleep decision.
        self.error_ema += ((new_f - smooth_f) - self.error_ema) * ERROR_SMOOTHING;

        if self.sleep_enabled {
            self.sleeping = fabs(self.error_ema) < threshold;
        }

        // While sleeping the smoothed value holds. Error tracking above ran
        // regardless, so a sustained change will still wake the filter.
        if !(self.sleep_enabled && self.sleeping) {
            let snap = snap_curve(diff * self.snap_multiplier);
            let mut smooth: T = (smooth_f + (new_f - smooth_f) * snap).as_();

            if smooth < self.lower_bound
                || (self.edge_snap_enabled && fabs(smooth.as_() - lower) < threshold)
            {
                smooth = self.lower_bound;
            }
            if smooth > self.upper_bound
                || (self.edge_snap_enabled && fabs(smooth.as_() - upper) < threshold)
            {
                smooth = self.upper_bound;
            }

            self.smooth_value = smooth;
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

    /// Whether the last [`update`](Self::update) held the output because the
    /// recent error magnitude stayed below the activity threshold.
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn lower_bound(&self) -> T {
        self.lower_bound
    }

    /// Takes effect on the next update; the current smoothed value is not re-clamped.
    pub fn set_lower_bound(&mut self, lower_bound: T) {
        self.lower_bound = lower_bound;
    }

    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }

    pub fn set_upper_bound(&mut self, upper_bound: T) {
        self.upper_bound = upper_bound;
    }

    /// Responsiveness of the filter. Larger values make it react to smaller changes.
    pub fn snap_multiplier(&self) -> f64 {
        self.snap_multiplier
    }

    /// Set the snap multiplier, clamped into `0.0..=1.0`.
    pub fn set_snap_multiplier(&mut self, multiplier: f64) {
        self.snap_multiplier = if multiplier > 1.0 {
            1.0
        } else if multiplier < 0.0 {
            0.0
        } else {
            multiplier
        };
    }

    pub fn sleep_enabled(&self) -> bool {
        self.sleep_enabled
    }

    pub fn set_sleep_enabled(&mut self, sleep_enabled: bool) {
        self.sleep_enabled = sleep_enabled;
    }

    pub fn edge_snap_enabled(&self) -> bool {
        self.edge_snap_enabled
    }

    /// When enabled, smoothed values within the activity threshold of a bound
    /// snap to that bound.
    pub fn set_edge_snap_enabled(&mut self, edge_snap_enabled: bool) {
        self.edge_snap_enabled = edge_snap_enabled;
    }

    /// Change magnitude below which input is treated as noise.
    pub fn activity_threshold(&self) -> T {
        self.activity_threshold
    }

    pub fn set_activity_threshold(&mut self, threshold: T) {
        self.activity_threshold = threshold;
    }

    /// Reset filter state. The next sample re-seeds the smoothed value.
    pub fn reset(&mut self) {
        self.first_sample = true;
        self.error_ema = 0.0;
        self.sleeping = false;
    }
}

/// Map an input magnitude to a smoothing factor in `0.0..=1.0`.
///
/// Zero maps to zero, the output rises steeply and saturates at one, so small
/// differences are smoothed aggressively while large ones pass through at
/// nearly full rate.
fn snap_curve(x: f64) -> f64 {
    let y = (1.0 - 1.0 / (x + 1.0)) * 2.0;
    if y > 1.0 { 1.0 } else { y }
}

// f64::abs is unavailable in core.
fn fabs(x: f64) -> f64 {
    if x < 0.0 { -x } else { x }
}
