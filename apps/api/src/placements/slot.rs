//! Placement slot selector.
//!
//! A student record carries three fixed placement attachment points; one
//! parameterized handler keyed by `Slot` serves all of them.

use serde::Deserialize;
use uuid::Uuid;

use crate::models::student::StudentRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    One,
    Two,
    Three,
}

impl Slot {
    /// The slot's column on the `students` table. Static strings only;
    /// these are interpolated into SQL.
    pub fn column(self) -> &'static str {
        match self {
            Slot::One => "placement_one",
            Slot::Two => "placement_two",
            Slot::Three => "placement_three",
        }
    }

    /// The placement reference currently held in this slot, if any.
    pub fn reference_in(self, student: &StudentRow) -> Option<Uuid> {
        match self {
            Slot::One => student.placement_one,
            Slot::Two => student.placement_two,
            Slot::Three => student.placement_three,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::student::sample_row;

    #[test]
    fn test_slot_parses_from_path_segment() {
        assert_eq!(serde_json::from_str::<Slot>(r#""one""#).unwrap(), Slot::One);
        assert_eq!(serde_json::from_str::<Slot>(r#""two""#).unwrap(), Slot::Two);
        assert_eq!(
            serde_json::from_str::<Slot>(r#""three""#).unwrap(),
            Slot::Three
        );
        assert!(serde_json::from_str::<Slot>(r#""four""#).is_err());
    }

    #[test]
    fn test_column_mapping() {
        assert_eq!(Slot::One.column(), "placement_one");
        assert_eq!(Slot::Two.column(), "placement_two");
        assert_eq!(Slot::Three.column(), "placement_three");
    }

    #[test]
    fn test_reference_in_reads_the_right_slot() {
        let mut student = sample_row();
        let id = Uuid::new_v4();
        student.placement_two = Some(id);
        assert_eq!(Slot::One.reference_in(&student), None);
        assert_eq!(Slot::Two.reference_in(&student), Some(id));
        assert_eq!(Slot::Three.reference_in(&student), None);
    }
}
