//! Amenity classes recognised by the detector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bus-stop amenities, in the detector's class-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Amenity {
    Seating,
    Shelter,
    Signage,
    #[serde(rename = "Trash Can")]
    TrashCan,
}

impl Amenity {
    /// All amenities, indexed by class id
    pub const ALL: [Amenity; 4] = [Amenity::Seating, Amenity::Shelter, Amenity::Signage, Amenity::TrashCan];

    pub fn from_class(class: usize) -> Option<Self> {
        Self::ALL.get(class).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Amenity::Seating => "Seating",
            Amenity::Shelter => "Shelter",
            Amenity::Signage => "Signage",
            Amenity::TrashCan => "Trash Can",
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
