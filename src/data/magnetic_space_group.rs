use std::ops::RangeInclusive;

use super::hall_symbol_database::Number;

pub type UNINumber = i32;

/// Construct type of a magnetic space group (see e.g. Litvin, "Magnetic Group Tables").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructType {
    /// No time-reversal operations (ordinary space group embedded as a magnetic one)
    Type1,
    /// Grey group: time-reversal combined with every operation of the family space group
    Type2,
    /// Time-reversal combined with only part of the family space group's coset
    Type3,
    /// Time-reversal combined with a translation (anti-translation)
    Type4,
}

#[derive(Debug, Clone)]
pub struct MagneticSpaceGroupType {
    pub uni_number: UNINumber,
    /// ITA number of the family space group
    pub number: Number,
    pub construct_type: ConstructType,
}

impl MagneticSpaceGroupType {
    const fn new(uni_number: UNINumber, number: Number, construct_type: ConstructType) -> Self {
        Self {
            uni_number,
            number,
            construct_type,
        }
    }
}

pub fn get_magnetic_space_group_type(uni_number: UNINumber) -> Option<MagneticSpaceGroupType> {
    MAGNETIC_SPACE_GROUP_TYPE_DATABASE
        .get(uni_number as usize - 1)
        .cloned()
}

/// Range of UNI numbers whose family space group is `number`.
pub fn uni_number_range(number: Number) -> Option<RangeInclusive<UNINumber>> {
    let uni_numbers: Vec<UNINumber> = MAGNETIC_SPACE_GROUP_TYPE_DATABASE
        .iter()
        .filter(|entry| entry.number == number)
        .map(|entry| entry.uni_number)
        .collect();
    if uni_numbers.is_empty() {
        return None;
    }
    Some(*uni_numbers.iter().min().unwrap()..=*uni_numbers.iter().max().unwrap())
}

/// Curated subset of magnetic space group types: Type I (trivial) and Type II (grey)
/// entries for each of the 10 family space groups in [`super::hall_symbol_database`].
/// The full dataset enumerates 1651 magnetic space group types, including Type III and
/// Type IV entries; see DESIGN.md for the scope decision. The identification logic in
/// `identify::magnetic_space_group` handles all four construct types regardless of how
/// much of the reference table is bundled here.
pub const NUM_MAGNETIC_SPACE_GROUP_TYPES: usize = 20;

const MAGNETIC_SPACE_GROUP_TYPE_DATABASE: [MagneticSpaceGroupType; NUM_MAGNETIC_SPACE_GROUP_TYPES] = [
    MagneticSpaceGroupType::new(1, 1, ConstructType::Type1),
    MagneticSpaceGroupType::new(2, 1, ConstructType::Type2),
    MagneticSpaceGroupType::new(3, 2, ConstructType::Type1),
    MagneticSpaceGroupType::new(4, 2, ConstructType::Type2),
    MagneticSpaceGroupType::new(5, 3, ConstructType::Type1),
    MagneticSpaceGroupType::new(6, 3, ConstructType::Type2),
    MagneticSpaceGroupType::new(7, 5, ConstructType::Type1),
    MagneticSpaceGroupType::new(8, 5, ConstructType::Type2),
    MagneticSpaceGroupType::new(9, 6, ConstructType::Type1),
    MagneticSpaceGroupType::new(10, 6, ConstructType::Type2),
    MagneticSpaceGroupType::new(11, 25, ConstructType::Type1),
    MagneticSpaceGroupType::new(12, 25, ConstructType::Type2),
    MagneticSpaceGroupType::new(13, 47, ConstructType::Type1),
    MagneticSpaceGroupType::new(14, 47, ConstructType::Type2),
    MagneticSpaceGroupType::new(15, 75, ConstructType::Type1),
    MagneticSpaceGroupType::new(16, 75, ConstructType::Type2),
    MagneticSpaceGroupType::new(17, 123, ConstructType::Type1),
    MagneticSpaceGroupType::new(18, 123, ConstructType::Type2),
    MagneticSpaceGroupType::new(19, 221, ConstructType::Type1),
    MagneticSpaceGroupType::new(20, 221, ConstructType::Type2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_magnetic_space_group_type() {
        let entry = get_magnetic_space_group_type(2).unwrap();
        assert_eq!(entry.number, 1);
        assert_eq!(entry.construct_type, ConstructType::Type2);
    }

    #[test]
    fn test_uni_number_range() {
        assert_eq!(uni_number_range(1), Some(1..=2));
        assert_eq!(uni_number_range(221), Some(19..=20));
        assert_eq!(uni_number_range(999), None);
    }
}
