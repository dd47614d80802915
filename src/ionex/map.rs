use crate::linspace::Linspace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Single TEC (or RMS) map, at the shell height.
/// Values are expressed in TECu, missing nodes are `None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Map {
    latitude: Linspace,
    longitude: Linspace,
    values: Vec<Option<f64>>,
}

impl Map {
    /// Builds an empty [Map] (all nodes missing)
    pub(crate) fn new(latitude: Linspace, longitude: Linspace) -> Self {
        Self {
            latitude,
            longitude,
            values: vec![None; latitude.length() * longitude.length()],
        }
    }

    fn offset(&self, lat_index: usize, long_index: usize) -> usize {
        lat_index * self.longitude.length() + long_index
    }

    pub(crate) fn set(&mut self, lat_index: usize, long_index: usize, value: Option<f64>) {
        let offset = self.offset(lat_index, long_index);
        self.values[offset] = value;
    }

    fn node(&self, lat_index: usize, long_index: usize) -> Option<f64> {
        self.values[self.offset(lat_index, long_index)]
    }

    /// Returns the value stored at this node, if any
    pub fn value(&self, lat_ddeg: f64, long_ddeg: f64) -> Option<f64> {
        let lat_index = self.latitude.node_index(lat_ddeg)?;
        let long_index = self.longitude.node_index(long_ddeg)?;
        self.node(lat_index, long_index)
    }

    /// Number of missing nodes
    pub fn missing_nodes(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Brings the longitude into the covered range, when possible
    fn wrap_longitude(&self, long_ddeg: f64) -> Option<f64> {
        [long_ddeg, long_ddeg + 360.0, long_ddeg - 360.0]
            .into_iter()
            .find(|long| self.longitude.contains(*long))
    }

    /// Bilinear interpolation of the four nodes surrounding the given coordinates.
    /// Returns None when the coordinates are not covered, or when
    /// one of the surrounding nodes is missing.
    pub fn interpolate(&self, lat_ddeg: f64, long_ddeg: f64) -> Option<f64> {
        let long_ddeg = self.wrap_longitude(long_ddeg)?;

        let lat = self.latitude.bracket(lat_ddeg)?;
        let long = self.longitude.bracket(long_ddeg)?;

        let (p, q) = (long.fraction, lat.fraction);

        let e00 = self.node(lat.index, long.index)?;
        let e10 = self.node(lat.index, long.index + 1)?;
        let e01 = self.node(lat.index + 1, long.index)?;
        let e11 = self.node(lat.index + 1, long.index + 1)?;

        Some(
            (1.0 - p) * (1.0 - q) * e00
                + p * (1.0 - q) * e10
                + q * (1.0 - p) * e01
                + p * q * e11,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn plane() -> Map {
        let latitude = Linspace::new(60.0, 40.0, -5.0).unwrap();
        let longitude = Linspace::new(-180.0, 180.0, 90.0).unwrap();
        let mut map = Map::new(latitude, longitude);
        for i in 0..latitude.length() {
            for j in 0..longitude.length() {
                // linear in both directions
                let value = 2.0 * latitude.value(i) + 0.1 * longitude.value(j);
                map.set(i, j, Some(value));
            }
        }
        map
    }

    #[test]
    fn nodes() {
        let map = plane();
        assert_eq!(map.value(55.0, 90.0), Some(119.0));
        assert_eq!(map.value(54.0, 90.0), None);
        assert_eq!(map.missing_nodes(), 0);

        // nodes are reproduced exactly
        assert_eq!(map.interpolate(55.0, 90.0), Some(119.0));
        assert_eq!(map.interpolate(40.0, 180.0), Some(98.0));
    }

    #[test]
    fn bilinear() {
        let map = plane();
        // bilinear interpolation of a plane is exact
        for (lat, long) in [(52.9, 6.87), (41.2, -170.3), (59.99, 179.9)] {
            let value = map.interpolate(lat, long).unwrap();
            let expected = 2.0 * lat + 0.1 * long;
            assert!((value - expected).abs() < 1.0E-9, "{} {}", lat, long);
        }

        // cell center is the average of its corners
        let mut map = Map::new(
            Linspace::new(10.0, 0.0, -10.0).unwrap(),
            Linspace::new(0.0, 10.0, 10.0).unwrap(),
        );
        map.set(0, 0, Some(1.0));
        map.set(0, 1, Some(2.0));
        map.set(1, 0, Some(3.0));
        map.set(1, 1, Some(6.0));
        assert_eq!(map.interpolate(5.0, 5.0), Some(3.0));
    }

    #[test]
    fn coverage() {
        let map = plane();
        assert!(map.interpolate(60.1, 0.0).is_none());
        assert!(map.interpolate(39.9, 0.0).is_none());

        // longitudes wrap around
        let value = map.interpolate(50.0, 200.0).unwrap();
        assert!((value - (100.0 - 16.0)).abs() < 1.0E-9);

        let regional = Map::new(
            Linspace::new(10.0, 0.0, -10.0).unwrap(),
            Linspace::new(0.0, 10.0, 10.0).unwrap(),
        );
        assert!(regional.interpolate(5.0, 11.0).is_none());
    }

    #[test]
    fn missing_node() {
        let mut map = plane();
        map.set(1, 2, None);
        assert_eq!(map.missing_nodes(), 1);
        // any cell touching (55°, 0°) is no longer defined
        assert!(map.interpolate(56.0, 1.0).is_none());
        assert!(map.interpolate(54.0, -1.0).is_none());
        assert!(map.interpolate(44.0, -1.0).is_some());
    }
}
