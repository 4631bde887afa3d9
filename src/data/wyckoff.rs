use nalgebra::{Matrix3, Vector3};

use super::hall_symbol_database::HallNumber;

/// A Wyckoff position entry for one Hall setting.
///
/// `coordinates` encodes an affine subspace of the unit cell: row `i` gives the
/// coefficients of the free parameters `(x, y, z)` followed by a constant term for the
/// `i`th fractional coordinate. A general position has `coordinates` equal to the
/// identity plus zero offset; a special position zeroes out the columns of the
/// parameters it fixes and records the fixed value in the constant term.
#[derive(Debug, Clone)]
pub struct WyckoffPosition {
    pub hall_number: HallNumber,
    pub letter: char,
    pub multiplicity: usize,
    pub site_symmetry: &'static str,
    pub coordinates: [[f64; 4]; 3],
}

impl WyckoffPosition {
    const fn new(
        hall_number: HallNumber,
        letter: char,
        multiplicity: usize,
        site_symmetry: &'static str,
        coordinates: [[f64; 4]; 3],
    ) -> Self {
        Self {
            hall_number,
            letter,
            multiplicity,
            site_symmetry,
            coordinates,
        }
    }
}

/// Affine subspace spanned by a [`WyckoffPosition`]'s free parameters.
///
/// `linear` and `origin` play the same role as a symmetry operation's rotation and
/// translation: a point on the Wyckoff position is `linear * y + origin` for some
/// `y` in the parameter space.
pub struct WyckoffPositionSpace {
    pub linear: Matrix3<i32>,
    pub origin: Vector3<f64>,
}

impl WyckoffPositionSpace {
    pub fn new(coordinates: [[f64; 4]; 3]) -> Self {
        let mut linear = Matrix3::<i32>::zeros();
        let mut origin = Vector3::<f64>::zeros();
        for i in 0..3 {
            for j in 0..3 {
                linear[(i, j)] = coordinates[i][j].round() as i32;
            }
            origin[i] = coordinates[i][3];
        }
        Self { linear, origin }
    }
}

pub fn iter_wyckoff_positions(
    hall_number: HallNumber,
    multiplicity: usize,
) -> impl Iterator<Item = &'static WyckoffPosition> {
    WYCKOFF_POSITION_DATABASE
        .iter()
        .filter(move |w| w.hall_number == hall_number && w.multiplicity == multiplicity)
}

// Free-parameter rows/columns refer to the generic `(x, y, z)` triplet regardless of how
// many components a given position actually leaves free.
const X: [f64; 4] = [1.0, 0.0, 0.0, 0.0];
const Y: [f64; 4] = [0.0, 1.0, 0.0, 0.0];
const Z: [f64; 4] = [0.0, 0.0, 1.0, 0.0];
const fn fixed(v: f64) -> [f64; 4] {
    [0.0, 0.0, 0.0, v]
}

/// Curated Wyckoff positions for the [`super::hall_symbol_database`] entries.
///
/// The real ITA tables enumerate every Wyckoff position for all 530 Hall settings; since
/// this crate ships only a 10-entry sample of that database (see
/// `hall_symbol_database.rs`), only the general position plus a handful of illustrative
/// special positions are reproduced here, one block per curated Hall number. See
/// DESIGN.md for the scope decision.
const WYCKOFF_POSITION_DATABASE: &[WyckoffPosition] = &[
    // Hall 1: P1 (#1)
    WyckoffPosition::new(1, 'a', 1, "1", [X, Y, Z]),
    // Hall 2: P-1 (#2)
    WyckoffPosition::new(2, 'i', 2, "1", [X, Y, Z]),
    WyckoffPosition::new(2, 'a', 1, "-1", [fixed(0.0), fixed(0.0), fixed(0.0)]),
    WyckoffPosition::new(2, 'b', 1, "-1", [fixed(0.5), fixed(0.0), fixed(0.0)]),
    WyckoffPosition::new(2, 'c', 1, "-1", [fixed(0.0), fixed(0.5), fixed(0.0)]),
    WyckoffPosition::new(2, 'd', 1, "-1", [fixed(0.0), fixed(0.0), fixed(0.5)]),
    WyckoffPosition::new(2, 'e', 1, "-1", [fixed(0.5), fixed(0.5), fixed(0.0)]),
    WyckoffPosition::new(2, 'f', 1, "-1", [fixed(0.5), fixed(0.0), fixed(0.5)]),
    WyckoffPosition::new(2, 'g', 1, "-1", [fixed(0.0), fixed(0.5), fixed(0.5)]),
    WyckoffPosition::new(2, 'h', 1, "-1", [fixed(0.5), fixed(0.5), fixed(0.5)]),
    // Hall 3: P2 (#3), unique axis b
    WyckoffPosition::new(3, 'e', 2, "1", [X, Y, Z]),
    WyckoffPosition::new(3, 'a', 1, "2", [fixed(0.0), Y, fixed(0.0)]),
    WyckoffPosition::new(3, 'b', 1, "2", [fixed(0.0), Y, fixed(0.5)]),
    WyckoffPosition::new(3, 'c', 1, "2", [fixed(0.5), Y, fixed(0.0)]),
    WyckoffPosition::new(3, 'd', 1, "2", [fixed(0.5), Y, fixed(0.5)]),
    // Hall 5: C2 (#5), unique axis b, C-centered
    WyckoffPosition::new(5, 'c', 4, "1", [X, Y, Z]),
    WyckoffPosition::new(5, 'a', 2, "2", [fixed(0.0), Y, fixed(0.0)]),
    WyckoffPosition::new(5, 'b', 2, "2", [fixed(0.0), Y, fixed(0.5)]),
    // Hall 6: Pm (#6), unique axis b
    WyckoffPosition::new(6, 'c', 2, "1", [X, Y, Z]),
    WyckoffPosition::new(6, 'a', 1, "m", [X, fixed(0.0), Z]),
    WyckoffPosition::new(6, 'b', 1, "m", [X, fixed(0.5), Z]),
    // Hall 25: Pmm2 (#25)
    WyckoffPosition::new(25, 'f', 4, "1", [X, Y, Z]),
    WyckoffPosition::new(25, 'e', 2, "m..", [X, fixed(0.0), Z]),
    WyckoffPosition::new(25, 'c', 2, ".m.", [fixed(0.0), Y, Z]),
    WyckoffPosition::new(25, 'a', 1, "mm2", [fixed(0.0), fixed(0.0), Z]),
    // Hall 47: Pmmm (#47)
    WyckoffPosition::new(47, 'r', 8, "1", [X, Y, Z]),
    WyckoffPosition::new(47, 'a', 1, "mmm", [fixed(0.0), fixed(0.0), fixed(0.0)]),
    WyckoffPosition::new(47, 'h', 1, "mmm", [fixed(0.5), fixed(0.5), fixed(0.5)]),
    WyckoffPosition::new(47, 'q', 4, "..2", [X, Y, fixed(0.0)]),
    // Hall 75: P4 (#75)
    WyckoffPosition::new(75, 'c', 4, "1", [X, Y, Z]),
    WyckoffPosition::new(75, 'a', 1, "4", [fixed(0.0), fixed(0.0), Z]),
    WyckoffPosition::new(75, 'b', 1, "4", [fixed(0.5), fixed(0.5), Z]),
    // Hall 123: P4/mmm (#123)
    WyckoffPosition::new(123, 'u', 8, "1", [X, Y, Z]),
    WyckoffPosition::new(123, 'a', 1, "4/mmm", [fixed(0.0), fixed(0.0), fixed(0.0)]),
    WyckoffPosition::new(123, 'd', 1, "4/mmm", [fixed(0.5), fixed(0.5), fixed(0.5)]),
    WyckoffPosition::new(123, 'e', 2, "4mm", [fixed(0.0), fixed(0.0), Z]),
    // Hall 221: Pm-3m (#221)
    WyckoffPosition::new(221, 'k', 48, "1", [X, Y, Z]),
    WyckoffPosition::new(221, 'a', 1, "m-3m", [fixed(0.0), fixed(0.0), fixed(0.0)]),
    WyckoffPosition::new(221, 'b', 1, "m-3m", [fixed(0.5), fixed(0.5), fixed(0.5)]),
    WyckoffPosition::new(221, 'c', 3, "4/mmm", [fixed(0.0), fixed(0.5), fixed(0.5)]),
    WyckoffPosition::new(221, 'd', 3, "4/mmm", [fixed(0.5), fixed(0.0), fixed(0.0)]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_wyckoff_positions() {
        let general = iter_wyckoff_positions(1, 1).collect::<Vec<_>>();
        assert_eq!(general.len(), 1);
        assert_eq!(general[0].letter, 'a');

        let specials = iter_wyckoff_positions(2, 1).collect::<Vec<_>>();
        assert_eq!(specials.len(), 8);

        assert_eq!(iter_wyckoff_positions(2, 99).count(), 0);
    }

    #[test]
    fn test_wyckoff_position_space() {
        let space = WyckoffPositionSpace::new([X, Y, Z]);
        assert_eq!(space.linear, Matrix3::<i32>::identity());
        assert_eq!(space.origin, Vector3::zeros());

        let space = WyckoffPositionSpace::new([fixed(0.5), fixed(0.5), fixed(0.5)]);
        assert_eq!(space.linear, Matrix3::<i32>::zeros());
        assert_eq!(space.origin, Vector3::new(0.5, 0.5, 0.5));
    }
}
