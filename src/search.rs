mod primitive_cell;
mod primitive_symmetry_search;
mod solve;

pub use primitive_cell::{PrimitiveCell, PrimitiveMagneticCell};
pub use primitive_symmetry_search::{
    magnetic_operations_in_magnetic_cell, operations_in_cell, PrimitiveMagneticSymmetrySearch,
    PrimitiveSymmetrySearch,
};
pub use solve::{
    solve_correspondence, solve_correspondence_naive, PeriodicKdTree, PeriodicNeighbor,
};
