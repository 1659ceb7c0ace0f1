use std::fmt;

/// Feature category based on the OSM `aeroway` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Gate,
    Terminal,
    Apron,
    ParkingStand,
    Unknown,
}

impl Category {
    /// Classify an `aeroway` tag value. Missing or unmapped values are `Unknown`.
    pub fn from_aeroway_tag(tag: Option<&str>) -> Category {
        match tag {
            Some("gate") => Category::Gate,
            Some("terminal") => Category::Terminal,
            Some("apron") => Category::Apron,
            Some("parking_position") => Category::ParkingStand,
            _ => Category::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gate => "gate",
            Category::Terminal => "terminal",
            Category::Apron => "apron",
            Category::ParkingStand => "parking_stand",
            Category::Unknown => "unknown",
        }
    }

    /// Output bucket for this category, if it is exported at all
    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            Category::Gate => Some(Bucket::Gates),
            Category::Terminal => Some(Bucket::Terminals),
            Category::Apron => Some(Bucket::Aprons),
            Category::ParkingStand => Some(Bucket::ParkingStands),
            Category::Unknown => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exported feature group. Ordering follows output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Gates,
    Terminals,
    Aprons,
    ParkingStands,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Gates,
        Bucket::Terminals,
        Bucket::Aprons,
        Bucket::ParkingStands,
    ];

    /// Used both in collection names and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Gates => "gates",
            Bucket::Terminals => "terminals",
            Bucket::Aprons => "aprons",
            Bucket::ParkingStands => "parking_stands",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
