#[macro_use]
extern crate approx;

use nalgebra::{matrix, vector, Matrix3, Vector3};
use test_log::test;

use moyo::base::{AngleTolerance, Cell, Lattice, Permutation, Rotation, Translation};
use moyo::data::Setting;
use moyo::MoyoDataset;

/// Sanity-check MoyoDataset
fn assert_dataset(
    cell: &Cell,
    symprec: f64,
    angle_tolerance: AngleTolerance,
    setting: Setting,
) -> MoyoDataset {
    let dataset = MoyoDataset::new(cell, symprec, angle_tolerance, setting).unwrap();

    // Check if operations are unique
    let num_operations = dataset.operations.len();
    for i in 0..num_operations {
        for j in i + 1..num_operations {
            if dataset.operations[i].rotation != dataset.operations[j].rotation {
                continue;
            }
            let mut diff = dataset.operations[i].translation - dataset.operations[j].translation;
            diff -= diff.map(|x| x.round());
            assert!(diff.iter().any(|x| x.abs() > 1e-4));
        }
    }

    for operation in dataset.operations.iter() {
        // Check if operation induces permutation
        let permutation =
            permutation_from_operation(cell, &operation.rotation, &operation.translation).unwrap();

        // For pure translation, check if mapped to the same site
        if operation.rotation == Rotation::identity() {
            for i in 0..cell.num_atoms() {
                let j = permutation.apply(i);
                assert_eq!(dataset.mapping_std_prim[i], dataset.mapping_std_prim[j]);
            }
        }

        for i in 0..cell.num_atoms() {
            let j = permutation.apply(i);
            assert_eq!(cell.numbers[i], cell.numbers[j]);
            // Check if belong to the same orbit
            assert_eq!(dataset.orbits[i], dataset.orbits[j]);
        }
    }

    // std_cell
    let std_dataset =
        MoyoDataset::new(&dataset.std_cell, symprec, angle_tolerance, setting).unwrap();
    assert_eq!(std_dataset.number, dataset.number);
    assert_eq!(std_dataset.hall_number, dataset.hall_number);

    // prim_std_cell
    let prim_std_dataset =
        MoyoDataset::new(&dataset.prim_std_cell, symprec, angle_tolerance, setting).unwrap();
    assert_eq!(prim_std_dataset.number, dataset.number);
    assert_eq!(prim_std_dataset.hall_number, dataset.hall_number);

    // prim_std_linear should be an inverse of an integer matrix
    let prim_std_linear_inv = dataset
        .prim_std_linear
        .map(|e| e as f64)
        .try_inverse()
        .unwrap();
    assert_relative_eq!(
        prim_std_linear_inv,
        prim_std_linear_inv.map(|e| e.round()),
        epsilon = 1e-8
    );

    // Check std_rotation_matrix and std_linear
    assert_relative_eq!(
        dataset.std_rotation_matrix * cell.lattice.basis * dataset.std_linear,
        dataset.std_cell.lattice.basis,
        epsilon = 1e-8
    );
    // Check std_rotation_matrix and prim_std_linear
    assert_relative_eq!(
        dataset.std_rotation_matrix * cell.lattice.basis * dataset.prim_std_linear,
        dataset.prim_std_cell.lattice.basis,
        epsilon = 1e-8
    );

    assert_eq!(dataset.mapping_std_prim.len(), cell.num_atoms());

    dataset
}

/// O(num_atoms^2)
fn permutation_from_operation(
    cell: &Cell,
    rotation: &Rotation,
    translation: &Translation,
) -> Option<Permutation> {
    let mut visited = vec![false; cell.num_atoms()];
    let mut mapping = vec![0; cell.num_atoms()];
    for i in 0..cell.num_atoms() {
        let new_pos = rotation.map(|e| e as f64) * cell.positions[i] + translation;
        let mut overlap = false;
        for j in 0..cell.num_atoms() {
            if visited[j] {
                continue;
            }
            let mut diff = new_pos - cell.positions[j];
            diff -= diff.map(|x| x.round());
            if diff.iter().all(|x| x.abs() < 1e-4) {
                visited[j] = true;
                mapping[i] = j;
                overlap = true;
                break;
            }
        }
        if !overlap {
            return None;
        }
    }
    Some(Permutation::new(mapping))
}

#[test]
fn test_with_triclinic_single_atom() {
    // P1 (#1): a generic lattice with a single atom has no symmetry beyond translation.
    let lattice = Lattice::new(matrix![
        4.0, 0.3, 0.1;
        0.0, 3.5, 0.2;
        0.0, 0.0, 5.1;
    ]);
    let positions = vec![Vector3::new(0.12, 0.34, 0.56)];
    let numbers = vec![0];
    let cell = Cell::new(lattice, positions, numbers);

    let symprec = 1e-4;
    let angle_tolerance = AngleTolerance::Default;
    let setting = Setting::Spglib;

    let dataset = assert_dataset(&cell, symprec, angle_tolerance, setting);
    assert_eq!(dataset.number, 1);
    assert_eq!(dataset.hall_number, 1);
    assert_eq!(dataset.num_operations(), 1);
    assert_eq!(dataset.orbits, vec![0]);
    assert_eq!(dataset.wyckoffs, vec!['a']);
}

#[test]
fn test_with_inversion_pair() {
    // P-1 (#2): two atoms related by an inversion center at the origin.
    let lattice = Lattice::new(matrix![
        4.0, 0.0, 0.0;
        0.5, 3.5, 0.0;
        0.3, 0.2, 5.1;
    ]);
    let positions = vec![
        Vector3::new(0.12, 0.23, 0.31),
        Vector3::new(-0.12, -0.23, -0.31),
    ];
    let numbers = vec![0, 0];
    let cell = Cell::new(lattice, positions, numbers);

    let symprec = 1e-4;
    let angle_tolerance = AngleTolerance::Default;
    let setting = Setting::Spglib;

    let dataset = assert_dataset(&cell, symprec, angle_tolerance, setting);
    assert_eq!(dataset.number, 2);
    assert_eq!(dataset.hall_number, 2);
    assert_eq!(dataset.num_operations(), 2);
    assert_eq!(dataset.orbits, vec![0, 0]);
    assert_eq!(dataset.wyckoffs, vec!['i', 'i']);
}

#[test]
fn test_with_simple_cubic() {
    // Pm-3m (#221): a single atom at the origin of a simple cubic lattice.
    let lattice = Lattice::new(Matrix3::identity());
    let positions = vec![vector![0.0, 0.0, 0.0]];
    let numbers = vec![0];
    let cell = Cell::new(lattice, positions, numbers);

    let symprec = 1e-4;
    let angle_tolerance = AngleTolerance::Default;
    let setting = Setting::Standard;

    let dataset = assert_dataset(&cell, symprec, angle_tolerance, setting);
    assert_dataset(&dataset.std_cell, symprec, angle_tolerance, setting);
    assert_dataset(&dataset.prim_std_cell, symprec, angle_tolerance, setting);

    assert_eq!(dataset.number, 221);
    assert_eq!(dataset.hall_number, 10);
    assert_eq!(dataset.num_operations(), 48);
    assert_eq!(dataset.orbits, vec![0]);
    assert_eq!(dataset.wyckoffs, vec!['a']);
}

#[test]
fn test_with_tetragonal_two_atoms() {
    // P4/mmm (#123): an atom at the origin and one at z=1/2, both on 4mm sites.
    let a = 3.8;
    let c = 6.1;
    let lattice = Lattice::new(matrix![
        a, 0.0, 0.0;
        0.0, a, 0.0;
        0.0, 0.0, c;
    ]);
    let positions = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.5)];
    let numbers = vec![0, 0];
    let cell = Cell::new(lattice, positions, numbers);

    let symprec = 1e-4;
    let angle_tolerance = AngleTolerance::Default;
    let setting = Setting::Standard;

    let dataset = assert_dataset(&cell, symprec, angle_tolerance, setting);
    assert_eq!(dataset.number, 123);
    assert_eq!(dataset.hall_number, 9);
}

#[test]
fn test_with_high_symprec_and_angle_tolerance() {
    let lattice = Lattice::new(Matrix3::identity());
    let positions = vec![
        vector![0.0, 0.0, 0.0],
        vector![0.0, 0.5, 0.5],
        vector![0.5, 0.0, 0.5],
        vector![0.5, 0.5, 0.0],
    ];
    let numbers = vec![0, 0, 0, 0];
    let cell = Cell::new(lattice, positions, numbers);

    let symprec = 0.1;
    let angle_tolerance = AngleTolerance::Radian(1.0);
    let setting = Setting::Spglib;

    // Heavily relaxed tolerances collapse these four sites onto a cubic Bravais lattice;
    // this only checks that identification completes without panicking.
    let _ = MoyoDataset::new(&cell, symprec, angle_tolerance, setting).unwrap();
}
