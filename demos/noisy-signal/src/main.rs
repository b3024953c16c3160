//! Simulates a polled sensor with injected noise and runs both filters
//! side by side on the same sample stream.
//!
//! The signal steps through a few levels while uniform noise with an
//! amplitude of 1/40th of the input range is re-rolled every tick.

use rand::Rng;
use steady_read::{AdaptiveSmoothingFilter, SuppressingAverageFilter};

const LOWER: i32 = 0;
const UPPER: i32 = 1024;

/// (level, ticks to hold it)
const SCRIPT: &[(i32, u32)] = &[(0, 15), (512, 25), (520, 15), (1024, 25), (100, 25)];

fn main() {
    let mut adaptive = AdaptiveSmoothingFilter::new(LOWER, UPPER);
    let mut suppressing = SuppressingAverageFilter::new(10, 5);

    let noise_range = (UPPER - LOWER) / 40;
    let mut rng = rand::rng();

    println!("=== steady-read: noisy signal demo ===");
    println!();
    println!("input range {}..={}, noise amplitude +/-{}", LOWER, UPPER, noise_range / 2);
    println!();
    println!("{:>5} {:>6} {:>6} {:>10} {:>9} {:>7}", "tick", "level", "noise", "effective", "adaptive", "simple");

    let mut tick = 0u32;
    for &(level, hold) in SCRIPT {
        for _ in 0..hold {
            let noise = (noise_range as f64 * (0.5 - rng.random::<f64>())) as i32;
            let effective = level + noise;

            let smooth = adaptive.update(effective);
            let simple = suppressing.update(effective);

            println!(
                "{:>5} {:>6} {:>6} {:>10} {:>8}{} {:>7}",
                tick,
                level,
                noise,
                effective,
                smooth,
                if adaptive.is_sleeping() { "z" } else { " " },
                simple,
            );

            tick += 1;
        }
    }

    println!();
    println!("'z' marks ticks where the adaptive filter slept through the noise");
}
