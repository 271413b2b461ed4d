//! Export of operational views for printing and spreadsheets.

mod schedule;

pub use schedule::*;
