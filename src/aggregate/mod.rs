//! Aggregation engine
//!
//! Pure functions over immutable record slices. Every time-relative operation
//! takes the reference instant `now` explicitly; callers capture it once per
//! pass so sibling windows agree with each other.

pub mod grouping;
pub mod load;
pub mod price;
pub mod production;
pub mod stats;
pub mod transfer;
pub mod window;

pub use load::*;
pub use price::*;
pub use production::*;
pub use transfer::*;
pub use window::{select_trailing_days, select_window, truncate_to_day, Trailing, Window};
