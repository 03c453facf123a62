//! One module per dashboard panel: the queries it issues, how rows are
//! reduced, and which fixture it falls back to.

pub mod acquisition;
pub mod devices;
pub mod geo;
pub mod overview;
pub mod pages;
pub mod revenue;

/// Default look-back window for breakdown panels.
pub const LAST_30_DAYS: (&str, &str) = ("30daysAgo", "today");
