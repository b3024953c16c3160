#![no_std]

#[cfg(feature = "filter-adaptive")]
mod adaptive;

#[cfg(feature = "filter-suppressing")]
mod suppressing;

#[cfg(feature = "filter-adaptive")]
pub use adaptive::AdaptiveSmoothingFilter;

#[cfg(feature = "filter-suppressing")]
pub use suppressing::SuppressingAverageFilter;
