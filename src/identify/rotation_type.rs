use crate::base::Rotation;

/// Crystallographic rotation types, classified by the trace and determinant
/// of the rotation matrix (ITA Table 1.2.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationType {
    RotoInversion6,
    RotoInversion4,
    RotoInversion3,
    RotoInversion2, // = mirror
    RotoInversion1, // = inversion
    Rotation1,
    Rotation2,
    Rotation3,
    Rotation4,
    Rotation6,
}

/// Classify a rotation matrix by its trace and determinant.
/// `rotation` is assumed to be an element of the crystallographic point group,
/// so its determinant is exactly 1 or -1 and its trace is one of {-3,-1,0,1,2,3}.
pub fn identify_rotation_type(rotation: &Rotation) -> RotationType {
    let trace = rotation.trace();
    let det = rotation.map(|e| e as f64).determinant().round() as i32;

    match (det, trace) {
        (1, 3) => RotationType::Rotation1,
        (1, -1) => RotationType::Rotation2,
        (1, 0) => RotationType::Rotation3,
        (1, 1) => RotationType::Rotation4,
        (1, 2) => RotationType::Rotation6,
        (-1, -3) => RotationType::RotoInversion1,
        (-1, 1) => RotationType::RotoInversion2,
        (-1, 0) => RotationType::RotoInversion3,
        (-1, -1) => RotationType::RotoInversion4,
        (-1, -2) => RotationType::RotoInversion6,
        _ => unreachable!("invalid crystallographic rotation matrix: trace={trace}, det={det}"),
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::matrix;

    use super::*;

    #[test]
    fn test_identify_rotation_type() {
        let identity = matrix![1, 0, 0; 0, 1, 0; 0, 0, 1];
        assert_eq!(identify_rotation_type(&identity), RotationType::Rotation1);

        let inversion = matrix![-1, 0, 0; 0, -1, 0; 0, 0, -1];
        assert_eq!(
            identify_rotation_type(&inversion),
            RotationType::RotoInversion1
        );

        // 4-fold rotation around z
        let rot4 = matrix![0, -1, 0; 1, 0, 0; 0, 0, 1];
        assert_eq!(identify_rotation_type(&rot4), RotationType::Rotation4);

        // mirror plane perpendicular to z
        let mirror = matrix![1, 0, 0; 0, 1, 0; 0, 0, -1];
        assert_eq!(
            identify_rotation_type(&mirror),
            RotationType::RotoInversion2
        );
    }
}
