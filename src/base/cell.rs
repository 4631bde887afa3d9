use std::collections::BTreeMap;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use union_find::{QuickFindUf, UnionByRank, UnionFind};

use super::lattice::Lattice;
use super::permutation::Permutation;

/// Fractional coordinates
pub type Position = Vector3<f64>;
/// Atomic number
pub type AtomicSpecie = i32;

/// -1 for an ordinary 3-periodic bulk cell; 0, 1, or 2 names the lattice axis
/// (a, b, c respectively) that is aperiodic for a layer cell.
pub type AperiodicAxis = i8;

/// An ordinary, fully-periodic cell.
pub const NO_APERIODIC_AXIS: AperiodicAxis = -1;

fn default_aperiodic_axis() -> AperiodicAxis {
    NO_APERIODIC_AXIS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Representing a crystal structure
pub struct Cell {
    /// Lattice of the cell.
    pub lattice: Lattice,
    /// `positions[i]` is a fractional coordinates of the i-th site.
    pub positions: Vec<Position>,
    /// `numbers[i]` is an atomic number of the i-th site.
    pub numbers: Vec<AtomicSpecie>,
    /// [`NO_APERIODIC_AXIS`] for a bulk cell, or the axis index (0, 1, or 2) that is not
    /// periodic for a layer cell. The coordinate along this axis is not wrapped into [0, 1).
    #[serde(default = "default_aperiodic_axis")]
    pub aperiodic_axis: AperiodicAxis,
}

impl Cell {
    pub fn new(lattice: Lattice, positions: Vec<Position>, numbers: Vec<AtomicSpecie>) -> Self {
        Self::new_layer(lattice, positions, numbers, NO_APERIODIC_AXIS)
    }

    /// Construct a layer cell whose `aperiodic_axis`-th lattice vector is not periodic.
    ///
    /// Full layer-group identification (2-D point-group classification and layer Hall-symbol
    /// matching) is not implemented; see DESIGN.md. This constructor exists so layer cells can
    /// be represented and carried through lattice/position bookkeeping without discarding the
    /// aperiodic axis.
    pub fn new_layer(
        lattice: Lattice,
        positions: Vec<Position>,
        numbers: Vec<AtomicSpecie>,
        aperiodic_axis: AperiodicAxis,
    ) -> Self {
        if positions.len() != numbers.len() {
            panic!("positions and numbers should be the same length");
        }
        if !(-1..=2).contains(&aperiodic_axis) {
            panic!("aperiodic_axis should be -1, 0, 1, or 2");
        }
        Self {
            lattice,
            positions,
            numbers,
            aperiodic_axis,
        }
    }

    /// Return the number of atoms in the cell.
    pub fn num_atoms(&self) -> usize {
        self.positions.len()
    }

    /// True for an ordinary 3-periodic bulk cell.
    pub fn is_bulk(&self) -> bool {
        self.aperiodic_axis == NO_APERIODIC_AXIS
    }

    /// Rotate the cell by the given rotation matrix.
    pub fn rotate(&self, rotation_matrix: &Matrix3<f64>) -> Self {
        Self::new_layer(
            self.lattice.rotate(rotation_matrix),
            self.positions.clone(),
            self.numbers.clone(),
            self.aperiodic_axis,
        )
    }
}

/// If and only if the `i`th and `j`th atoms are equivalent, `orbits[i] == orbits[j]`.
/// For each orbit, only one of them satisfies `orbits[i] == i`.
pub fn orbits_from_permutations(num_atoms: usize, permutations: &[Permutation]) -> Vec<usize> {
    let mut uf = QuickFindUf::<UnionByRank>::new(num_atoms);
    for permutation in permutations.iter() {
        for i in 0..num_atoms {
            uf.union(i, permutation.apply(i));
        }
    }
    let mut identifier_mapping = BTreeMap::new();
    for i in 0..num_atoms {
        identifier_mapping.entry(uf.find(i)).or_insert(i);
    }

    (0..num_atoms)
        .map(|i| *identifier_mapping.get(&uf.find(i)).unwrap())
        .collect()
}
