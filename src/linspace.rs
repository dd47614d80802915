use crate::prelude::ParsingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear space as used in IONEX grid definitions.
/// Linear space starting from `start` ranging to `end` (included).
/// `spacing` is signed: IONEX latitudes usually decrease (87.5 -> -87.5).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Linspace {
    /// start coordinates or value
    pub start: f64,
    /// end coordinates or value
    pub end: f64,
    /// spacing (increment value)
    pub spacing: f64,
}

/// Position of a value within a [Linspace]: lower node index and
/// fractional distance to the next node, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bracket {
    pub index: usize,
    pub fraction: f64,
}

impl Linspace {
    /// Builds a new Linear space
    pub fn new(start: f64, end: f64, spacing: f64) -> Result<Self, ParsingError> {
        if !start.is_finite() || !end.is_finite() || !spacing.is_finite() {
            return Err(ParsingError::BadIonexGridSpecs);
        }
        if spacing == 0.0 {
            if start == end {
                return Ok(Self {
                    start,
                    end,
                    spacing,
                });
            }
            return Err(ParsingError::BadIonexGridSpecs);
        }
        let steps = (end - start) / spacing;
        /*
         * end must be reachable from start, with an integer number of steps
         */
        if steps < 0.0 || (steps - steps.round()).abs() > 1.0E-6 {
            return Err(ParsingError::BadIonexGridSpecs);
        }
        Ok(Self {
            start,
            end,
            spacing,
        })
    }
    /// Returns grid length, in terms of data points
    pub fn length(&self) -> usize {
        if self.is_single_point() {
            1
        } else {
            ((self.end - self.start) / self.spacing).round() as usize + 1
        }
    }
    /// Returns true if self is a single point space
    pub fn is_single_point(&self) -> bool {
        (self.end == self.start) && self.spacing == 0.0
    }
    /// Returns value of the i-th node
    pub fn value(&self, index: usize) -> f64 {
        self.start + self.spacing * index as f64
    }
    /// Returns smallest value covered by this space
    pub fn min(&self) -> f64 {
        self.start.min(self.end)
    }
    /// Returns largest value covered by this space
    pub fn max(&self) -> f64 {
        self.start.max(self.end)
    }
    /// Returns true if value is contained in this space
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min() && value <= self.max()
    }
    /// Returns node index matching given value, if it lies on a node
    pub(crate) fn node_index(&self, value: f64) -> Option<usize> {
        if self.is_single_point() {
            return if value == self.start { Some(0) } else { None };
        }
        let steps = (value - self.start) / self.spacing;
        let rounded = steps.round();
        if rounded < 0.0 || (steps - rounded).abs() > 1.0E-6 {
            return None;
        }
        let index = rounded as usize;
        if index < self.length() {
            Some(index)
        } else {
            None
        }
    }
    /// Locates value in this space: returns the lower node
    /// index and fractional position towards the following node.
    /// The last node is returned as the end of the last interval,
    /// so `index + 1` is always a valid node.
    pub(crate) fn bracket(&self, value: f64) -> Option<Bracket> {
        if !self.contains(value) || self.length() < 2 {
            return None;
        }
        let steps = (value - self.start) / self.spacing;
        let last = self.length() - 2;
        let index = (steps.floor().max(0.0) as usize).min(last);
        Some(Bracket {
            index,
            fraction: steps - index as f64,
        })
    }
}

impl From<(f64, f64, f64)> for Linspace {
    fn from(tuple: (f64, f64, f64)) -> Self {
        Self {
            start: tuple.0,
            end: tuple.1,
            spacing: tuple.2,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn linspace() {
        let default = Linspace::default();
        assert_eq!(
            default,
            Linspace {
                start: 0.0,
                end: 0.0,
                spacing: 0.0,
            }
        );
        assert!(default.is_single_point());
        assert_eq!(default.length(), 1);

        let grid = Linspace::new(1.0, 10.0, 1.0).unwrap();
        assert_eq!(grid.length(), 10);
        assert!(!grid.is_single_point());

        let latitudes = Linspace::new(87.5, -87.5, -2.5).unwrap();
        assert_eq!(latitudes.length(), 71);
        assert_eq!(latitudes.value(70), -87.5);

        let longitudes = Linspace::new(-180.0, 180.0, 5.0).unwrap();
        assert_eq!(longitudes.length(), 73);

        assert!(Linspace::new(0.0, 10.0, 3.0).is_err());
        assert!(Linspace::new(0.0, 10.0, -1.0).is_err());
        assert!(Linspace::new(0.0, 10.0, 0.0).is_err());
    }
    #[test]
    fn non_finite_bounds() {
        assert!(Linspace::new(f64::NAN, 10.0, 1.0).is_err());
        assert!(Linspace::new(0.0, f64::NAN, 1.0).is_err());
        assert!(Linspace::new(0.0, 10.0, f64::NAN).is_err());
        assert!(Linspace::new(0.0, f64::INFINITY, 1.0).is_err());
        assert!(Linspace::new(f64::NEG_INFINITY, f64::NEG_INFINITY, 0.0).is_err());
    }
    #[test]
    fn bracketing() {
        let latitudes = Linspace::new(60.0, 40.0, -2.5).unwrap();

        let b = latitudes.bracket(52.9).unwrap();
        assert_eq!(b.index, 2);
        assert!((b.fraction - 0.84).abs() < 1.0E-9);

        // last node closes the last interval
        let b = latitudes.bracket(40.0).unwrap();
        assert_eq!(b.index, 7);
        assert!((b.fraction - 1.0).abs() < 1.0E-9);

        let b = latitudes.bracket(60.0).unwrap();
        assert_eq!(b.index, 0);
        assert_eq!(b.fraction, 0.0);

        assert!(latitudes.bracket(60.1).is_none());
        assert!(latitudes.bracket(39.9).is_none());

        assert_eq!(latitudes.node_index(55.0), Some(2));
        assert_eq!(latitudes.node_index(54.0), None);
        assert_eq!(latitudes.node_index(37.5), None);
    }
}
