//! Closed vocabulary of exit directions and their grid semantics.

use std::convert::Infallible;
use std::f64::consts::FRAC_1_SQRT_2;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Up,
    Down,
    Enter,
    Unknown,
}

impl Direction {
    pub const ALL: [Self; 12] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
        Self::Up,
        Self::Down,
        Self::Enter,
        Self::Unknown,
    ];

    /// Cell offset applied during placement. Non-planar directions stay on the same cell.
    pub const fn grid_offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
            Self::Up | Self::Down | Self::Enter | Self::Unknown => (0, 0),
        }
    }

    /// Visual bearing as a unit vector in screen orientation.
    pub fn unit_vector(self) -> (f64, f64) {
        match self {
            Self::North => (0.0, -1.0),
            Self::NorthEast => (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            Self::East => (1.0, 0.0),
            Self::SouthEast => (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            Self::South => (0.0, 1.0),
            Self::SouthWest => (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
            Self::West => (-1.0, 0.0),
            Self::NorthWest => (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            Self::Up | Self::Down | Self::Enter | Self::Unknown => (0.0, 0.0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::East => Self::West,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::West => Self::East,
            Self::NorthWest => Self::SouthEast,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Enter => Self::Enter,
            Self::Unknown => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::NorthEast => "northeast",
            Self::East => "east",
            Self::SouthEast => "southeast",
            Self::South => "south",
            Self::SouthWest => "southwest",
            Self::West => "west",
            Self::NorthWest => "northwest",
            Self::Up => "up",
            Self::Down => "down",
            Self::Enter => "enter",
            Self::Unknown => "unknown",
        }
    }

    /// True for the eight compass points.
    pub const fn is_planar(self) -> bool {
        !matches!(self, Self::Up | Self::Down | Self::Enter | Self::Unknown)
    }

    /// Lenient parse used at the data boundary; unrecognized text maps to `Unknown`.
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "n" | "north" => Self::North,
            "ne" | "northeast" => Self::NorthEast,
            "e" | "east" => Self::East,
            "se" | "southeast" => Self::SouthEast,
            "s" | "south" => Self::South,
            "sw" | "southwest" => Self::SouthWest,
            "w" | "west" => Self::West,
            "nw" | "northwest" => Self::NorthWest,
            "u" | "up" | "climb" => Self::Up,
            "d" | "down" | "descend" => Self::Down,
            "in" | "enter" | "portal" => Self::Enter,
            _ => Self::Unknown,
        }
    }
}

impl FromStr for Direction {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}
