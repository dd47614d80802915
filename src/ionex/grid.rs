use crate::linspace::Linspace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference grid, defined in terms of latitude, longitude and altitude.
/// 2D maps are defined at a fixed altitude: start = end and spacing = 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    /// Latitude, in decimal degrees
    pub latitude: Linspace,
    /// Longitude, in decimal degrees
    pub longitude: Linspace,
    /// Altitude, in km
    pub height: Linspace,
}

impl Grid {
    /// Returns true if this grid describes 3D maps
    pub fn is_3d(&self) -> bool {
        !self.is_2d()
    }
    /// Returns true if this grid describes 2D maps,
    /// at fixed altitude.
    pub fn is_2d(&self) -> bool {
        self.height.is_single_point()
    }
    /// Number of nodes in a single map
    pub fn map_size(&self) -> usize {
        self.latitude.length() * self.longitude.length()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grid_dimensions() {
        let grid = Grid {
            latitude: Linspace::new(87.5, -87.5, -2.5).unwrap(),
            longitude: Linspace::new(-180.0, 180.0, 5.0).unwrap(),
            height: Linspace::new(450.0, 450.0, 0.0).unwrap(),
        };
        assert!(grid.is_2d());
        assert_eq!(grid.map_size(), 71 * 73);

        let grid = Grid {
            height: Linspace::new(100.0, 1000.0, 50.0).unwrap(),
            ..grid
        };
        assert!(grid.is_3d());
    }
}
