//! Detection class labels.
//!
//! The detector emits a free-form class label per detection. Labels `A1`
//! through `A19` are military aircraft codes; every other label is counted
//! as a non-aircraft vehicle. The split is a closed enumeration so adding an
//! aircraft code is a change to [`AircraftClass`] rather than to a runtime
//! list.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aircraft class codes recognised by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum AircraftClass {
    A1 = 1,
    A2 = 2,
    A3 = 3,
    A4 = 4,
    A5 = 5,
    A6 = 6,
    A7 = 7,
    A8 = 8,
    A9 = 9,
    A10 = 10,
    A11 = 11,
    A12 = 12,
    A13 = 13,
    A14 = 14,
    A15 = 15,
    A16 = 16,
    A17 = 17,
    A18 = 18,
    A19 = 19,
}

impl AircraftClass {
    /// Every aircraft class, in code order.
    pub const ALL: [AircraftClass; 19] = [
        AircraftClass::A1,
        AircraftClass::A2,
        AircraftClass::A3,
        AircraftClass::A4,
        AircraftClass::A5,
        AircraftClass::A6,
        AircraftClass::A7,
        AircraftClass::A8,
        AircraftClass::A9,
        AircraftClass::A10,
        AircraftClass::A11,
        AircraftClass::A12,
        AircraftClass::A13,
        AircraftClass::A14,
        AircraftClass::A15,
        AircraftClass::A16,
        AircraftClass::A17,
        AircraftClass::A18,
        AircraftClass::A19,
    ];

    /// Look up an aircraft class by its exact, case-sensitive label.
    ///
    /// ```
    /// use basewatch_types::AircraftClass;
    ///
    /// assert_eq!(AircraftClass::from_label("A7"), Some(AircraftClass::A7));
    /// assert_eq!(AircraftClass::from_label("a7"), None);
    /// assert_eq!(AircraftClass::from_label("A20"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.label() == label)
    }

    /// The detector label for this class.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AircraftClass::A1 => "A1",
            AircraftClass::A2 => "A2",
            AircraftClass::A3 => "A3",
            AircraftClass::A4 => "A4",
            AircraftClass::A5 => "A5",
            AircraftClass::A6 => "A6",
            AircraftClass::A7 => "A7",
            AircraftClass::A8 => "A8",
            AircraftClass::A9 => "A9",
            AircraftClass::A10 => "A10",
            AircraftClass::A11 => "A11",
            AircraftClass::A12 => "A12",
            AircraftClass::A13 => "A13",
            AircraftClass::A14 => "A14",
            AircraftClass::A15 => "A15",
            AircraftClass::A16 => "A16",
            AircraftClass::A17 => "A17",
            AircraftClass::A18 => "A18",
            AircraftClass::A19 => "A19",
        }
    }
}

impl fmt::Display for AircraftClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The bucket a detection is counted in.
///
/// Unknown labels fall into [`DetectionClass::OtherVehicle`]; there is no
/// separate "unclassified" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetectionClass {
    /// One of the recognised aircraft codes.
    Aircraft(AircraftClass),
    /// Any other vehicle label.
    OtherVehicle,
}

impl DetectionClass {
    /// Classify a detector label.
    ///
    /// ```
    /// use basewatch_types::{AircraftClass, DetectionClass};
    ///
    /// assert_eq!(
    ///     DetectionClass::classify("A12"),
    ///     DetectionClass::Aircraft(AircraftClass::A12)
    /// );
    /// assert_eq!(DetectionClass::classify("truck"), DetectionClass::OtherVehicle);
    /// ```
    #[must_use]
    pub fn classify(label: &str) -> Self {
        match AircraftClass::from_label(label) {
            Some(class) => DetectionClass::Aircraft(class),
            None => DetectionClass::OtherVehicle,
        }
    }

    /// Whether this is an aircraft bucket.
    #[must_use]
    pub fn is_aircraft(&self) -> bool {
        matches!(self, DetectionClass::Aircraft(_))
    }
}
