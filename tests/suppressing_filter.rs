#![cfg(feature = "filter-suppressing")]

use steady_read::SuppressingAverageFilter;

#[test]
fn spike_train_is_held_then_accepted() {
    // threshold 10, two samples of suppression: the third consecutive large
    // sample is accepted as the midpoint of old and new.
    let mut filter = SuppressingAverageFilter::new(10, 2);

    filter.update(100);

    assert_eq!(filter.update(200), 100);
    assert!(!filter.has_changed());

    assert_eq!(filter.update(200), 100);
    assert!(!filter.has_changed());

    assert_eq!(filter.update(200), 150);
    assert!(filter.has_changed());
}

#[test]
fn sustained_change_accepted_within_count_plus_one_ticks() {
    for count in [0, 1, 2, 5, 17] {
        let mut filter = SuppressingAverageFilter::new(10.0, count);
        filter.update(0.0);

        let mut accepted_at = None;
        for tick in 1..=count + 1 {
            if filter.update(100.0) != 0.0 {
                accepted_at = Some(tick);
                break;
            }
        }

        assert_eq!(accepted_at, Some(count + 1), "count = {}", count);
    }
}

#[test]
fn deviation_equal_to_threshold_is_accepted() {
    let mut filter = SuppressingAverageFilter::new(10.0, 3);
    filter.update(100.0);

    // Suppression requires strictly more than the threshold.
    assert_eq!(filter.update(110.0), 105.0);
}

#[test]
fn zero_threshold_treats_any_change_as_large() {
    let mut filter = SuppressingAverageFilter::new(0.0, 1);
    filter.update(100.0);

    assert_eq!(filter.update(101.0), 100.0);
    assert_eq!(filter.update(101.0), 100.5);
}

#[test]
fn constant_input_converges_to_input() {
    let mut filter = SuppressingAverageFilter::new(1000.0, 0);
    filter.update(100.0);

    let mut out = 0.0;
    for _ in 0..200 {
        out = filter.update(200.0);
    }

    assert_eq!(out, 200.0);
    assert!(!filter.has_changed());
}

#[test]
fn integer_average_truncates_toward_stability() {
    let mut filter = SuppressingAverageFilter::new(1000, 0);
    filter.update(100);

    let mut out = 0;
    for _ in 0..20 {
        out = filter.update(200);
    }

    // Integer storage truncates the midpoint, so the resting value sits one
    // count below the input.
    assert_eq!(out, 199);
    assert!(!filter.has_changed());
}

#[test]
fn disabled_changed_flag_tracks_raw() {
    let mut filter = SuppressingAverageFilter::new(10, 2);
    filter.set_enabled(false);

    filter.update(5);
    assert_eq!(filter.update(5), 5);
    assert!(!filter.has_changed());

    filter.update(7);
    assert!(filter.has_changed());
}

#[test]
fn raw_value_recorded_while_output_holds() {
    let mut filter = SuppressingAverageFilter::new(10.0, 2);
    filter.update(100.0);
    assert_eq!(filter.value(), 100.0);
    assert_eq!(filter.raw_value(), 100.0);

    filter.update(200.0);
    assert_eq!(filter.raw_value(), 200.0);
    assert_eq!(filter.value(), 100.0);
}

#[test]
fn reconfiguration_applies_on_next_update() {
    let mut filter = SuppressingAverageFilter::new(10.0, 5);
    filter.update(100.0);

    assert_eq!(filter.update(200.0), 100.0);

    // Dropping the count below the running tally accepts the next sample.
    filter.set_suppression_count(1);
    assert_eq!(filter.update(200.0), 150.0);
}
