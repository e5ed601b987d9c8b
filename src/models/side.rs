use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Edge or corner of a work area a window can be tiled against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Side {
    pub const ALL: [Side; 8] = [
        Side::Left,
        Side::Right,
        Side::Top,
        Side::Bottom,
        Side::TopLeft,
        Side::TopRight,
        Side::BottomLeft,
        Side::BottomRight,
    ];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::TopLeft => "top-left",
            Side::TopRight => "top-right",
            Side::BottomLeft => "bottom-left",
            Side::BottomRight => "bottom-right",
        };
        f.write_str(name)
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Side::ALL
            .into_iter()
            .find(|side| side.to_string() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid side: {}", s))
    }
}

/// Edge being dragged during an interactive resize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeDirection {
    #[serde(alias = "n")]
    North,
    #[serde(alias = "s")]
    South,
    #[serde(alias = "e")]
    East,
    #[serde(alias = "w")]
    West,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_round_trips_through_display() {
        for side in Side::ALL {
            assert_eq!(side.to_string().parse::<Side>().unwrap(), side);
        }
        assert_eq!("TOP-LEFT".parse::<Side>().unwrap(), Side::TopLeft);
        assert!("middle".parse::<Side>().is_err());
    }
}
