//! Topping kinds and the static topping table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Static properties of a topping kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToppingSpec {
    pub name: &'static str,
    /// Fall speed in pixels per frame at level 0
    pub base_speed: f32,
    /// Sprite edge length on a desktop-width canvas
    pub base_size: f32,
}

/// The falling topping kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToppingKind {
    /// Chili sauce
    Sambal,
    /// Fried wonton
    Pangsit,
    /// Spring onion
    DaunBawang,
}

impl ToppingKind {
    /// Every kind, in table order (spawn picks uniformly from this)
    pub const ALL: [ToppingKind; 3] = [
        ToppingKind::Sambal,
        ToppingKind::Pangsit,
        ToppingKind::DaunBawang,
    ];

    pub fn spec(self) -> ToppingSpec {
        match self {
            ToppingKind::Sambal => ToppingSpec {
                name: "sambal",
                base_speed: 3.0,
                base_size: 40.0,
            },
            ToppingKind::Pangsit => ToppingSpec {
                name: "pangsit",
                base_speed: 2.0,
                base_size: 50.0,
            },
            ToppingKind::DaunBawang => ToppingSpec {
                name: "daunbawang",
                base_speed: 2.5,
                base_size: 45.0,
            },
        }
    }

    /// Key used by the page markup (`data-topping`)
    pub fn as_str(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for ToppingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized topping key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTopping(pub String);

impl fmt::Display for UnknownTopping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown topping '{}'", self.0)
    }
}

impl std::error::Error for UnknownTopping {}

impl FromStr for ToppingKind {
    type Err = UnknownTopping;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sambal" => Ok(ToppingKind::Sambal),
            "pangsit" => Ok(ToppingKind::Pangsit),
            "daunbawang" | "daun-bawang" => Ok(ToppingKind::DaunBawang),
            _ => Err(UnknownTopping(s.to_string())),
        }
    }
}

/// Sprite scale for the current canvas width (smaller screens, smaller toppings)
pub fn size_multiplier(canvas_width: f32) -> f32 {
    if canvas_width >= 750.0 {
        1.0 // Desktop
    } else if canvas_width >= 600.0 {
        0.85 // Tablet
    } else if canvas_width >= 480.0 {
        0.75 // Mobile
    } else {
        0.65 // Small phone
    }
}

/// On-screen edge length of a freshly spawned topping
pub fn scaled_size(kind: ToppingKind, canvas_width: f32) -> f32 {
    (kind.spec().base_size * size_multiplier(canvas_width)).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_multiplier_breakpoints() {
        assert_eq!(size_multiplier(800.0), 1.0);
        assert_eq!(size_multiplier(750.0), 1.0);
        assert_eq!(size_multiplier(749.0), 0.85);
        assert_eq!(size_multiplier(600.0), 0.85);
        assert_eq!(size_multiplier(480.0), 0.75);
        assert_eq!(size_multiplier(479.9), 0.65);
        assert_eq!(size_multiplier(320.0), 0.65);
    }

    #[test]
    fn test_scaled_size_is_floored() {
        assert_eq!(scaled_size(ToppingKind::Pangsit, 800.0), 50.0);
        // 50 * 0.85 = 42.5
        assert_eq!(scaled_size(ToppingKind::Pangsit, 640.0), 42.0);
        // 45 * 0.65 = 29.25
        assert_eq!(scaled_size(ToppingKind::DaunBawang, 360.0), 29.0);
    }

    #[test]
    fn test_key_round_trip() {
        for kind in ToppingKind::ALL {
            assert_eq!(kind.as_str().parse::<ToppingKind>(), Ok(kind));
        }
        assert!("rendang".parse::<ToppingKind>().is_err());
    }
}
