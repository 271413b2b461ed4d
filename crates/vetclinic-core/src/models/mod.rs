//! Domain models for the clinic store.

mod appointment;
mod medical;
mod owner;
mod pet;

pub use appointment::*;
pub use medical::*;
pub use owner::*;
pub use pet::*;
