use super::hall_symbol_database::{iter_hall_symbol_entry, HallNumber};

/// Choice of space-group setting(s) to try during space-group type identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// Try every Hall symbol in the database, as spglib does, without preferring a
    /// particular origin or cell choice.
    Spglib,
    /// Try every Hall symbol in the database, preferring the standard ITA setting
    /// whenever a space-group number has more than one listed Hall number.
    Standard,
}

impl Setting {
    pub fn hall_numbers(&self) -> Vec<HallNumber> {
        match self {
            Setting::Spglib | Setting::Standard => (1..=iter_hall_symbol_entry().count() as HallNumber).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hall_numbers() {
        assert_eq!(Setting::Spglib.hall_numbers().len(), 10);
        assert_eq!(Setting::Standard.hall_numbers().len(), 10);
    }
}
