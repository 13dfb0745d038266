//! Domain models for the clinic records store.

mod bmi;
mod history;
mod patient;
mod visit;

pub use bmi::*;
pub use history::*;
pub use patient::*;
pub use visit::*;
