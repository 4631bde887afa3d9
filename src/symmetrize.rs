mod magnetic_standardize;
mod standardize;

pub use magnetic_standardize::StandardizedMagneticCell;
pub use standardize::{orbits_in_cell, StandardizedCell};
