//! International Geomagnetic Reference Field
use super::{Error, FieldComponents, FieldModel};
use itertools::Itertools;
use std::{path::Path, str::FromStr};

#[cfg(feature = "log")]
use log::debug;

/// IGRF reference radius (km)
const REFERENCE_RADIUS_KM: f64 = 6371.2;

/// Secular variation may be extrapolated up to 5 years past the last epoch
const SV_VALIDITY_YEARS: f64 = 5.0;

/// Minimal sin(colatitude), avoids the singularity at the poles
const MIN_SIN_COLATITUDE: f64 = 1.0E-10;

lazy_static! {
    static ref IGRF13: Igrf = Igrf::from_str(include_str!("../../data/igrf13.txt")).unwrap();
}

/// Index of (n, m) in triangular storage
fn index(n: usize, m: usize) -> usize {
    n * (n + 1) / 2 + m
}

/// Schmidt semi-normalised coefficients, up to a given degree
#[derive(Debug, Clone, Default, PartialEq)]
struct Coefficients {
    g: Vec<f64>,
    h: Vec<f64>,
}

impl Coefficients {
    fn new(degree: usize) -> Self {
        let size = index(degree, degree) + 1;
        Self {
            g: vec![0.0; size],
            h: vec![0.0; size],
        }
    }
    /// self + (rhs - self) * ratio
    fn lerp(&self, rhs: &Self, ratio: f64) -> Self {
        let lerp = |a: &[f64], b: &[f64]| {
            a.iter()
                .zip(b.iter())
                .map(|(a, b)| a + (b - a) * ratio)
                .collect::<Vec<_>>()
        };
        Self {
            g: lerp(&self.g, &rhs.g),
            h: lerp(&self.h, &rhs.h),
        }
    }
    /// self + rate * dt
    fn extrapolate(&self, rate: &Self, dt: f64) -> Self {
        let extrapolate = |a: &[f64], r: &[f64]| {
            a.iter()
                .zip(r.iter())
                .map(|(a, r)| a + r * dt)
                .collect::<Vec<_>>()
        };
        Self {
            g: extrapolate(&self.g, &rate.g),
            h: extrapolate(&self.h, &rate.h),
        }
    }
}

/// [Igrf] model: main field coefficients at each model epoch,
/// and secular variation past the last epoch.
/// Coefficient tables are described in the format published by IAGA,
/// for example `igrf13coeffs.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Igrf {
    /// Maximal degree
    degree: usize,
    /// Model epochs (decimal years)
    epochs: Vec<f64>,
    /// Main field, for each model epoch
    models: Vec<Coefficients>,
    /// Secular variation (nT/year)
    secular: Coefficients,
}

impl Default for Igrf {
    /// Builds the complete IGRF-13 model (degree 13, 2000.0 to 2025.0)
    fn default() -> Self {
        IGRF13.clone()
    }
}

impl Igrf {
    /// Loads a complete coefficient table from a local file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::prelude::Error> {
        let content = std::fs::read_to_string(path)?;
        let igrf = Self::from_str(&content)?;
        Ok(igrf)
    }
    /// Maximal degree of this model
    pub fn degree(&self) -> usize {
        self.degree
    }
    /// Returns (first, last) decimal years covered by this model
    pub fn validity(&self) -> (f64, f64) {
        let first = self.epochs.first().copied().unwrap_or_default();
        let last = self.epochs.last().copied().unwrap_or_default();
        (first, last + SV_VALIDITY_YEARS)
    }
    /// Coefficients at given decimal year
    fn coefficients(&self, year: f64) -> Result<Coefficients, Error> {
        let (first, last) = self.validity();
        if !(first..=last).contains(&year) {
            return Err(Error::OutsideValidity { year, first, last });
        }

        for ((t0, m0), (t1, m1)) in self.epochs.iter().zip(self.models.iter()).tuple_windows() {
            if year >= *t0 && year < *t1 {
                return Ok(m0.lerp(m1, (year - t0) / (t1 - t0)));
            }
        }

        // past last epoch
        let last_epoch = self.epochs[self.epochs.len() - 1];
        let last_model = &self.models[self.models.len() - 1];
        Ok(last_model.extrapolate(&self.secular, year - last_epoch))
    }
}

impl FromStr for Igrf {
    type Err = Error;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let err = |line: &str| Error::CoefficientTable(line.trim().to_string());

        let mut epochs = Vec::<f64>::new();
        let mut rows = Vec::<(bool, usize, usize, Vec<f64>)>::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("c/s") {
                continue;
            }

            let items = trimmed.split_ascii_whitespace().collect::<Vec<_>>();

            if items[0] == "g/h" {
                // model epochs, then secular variation column
                if items.len() < 5 {
                    return Err(err(line));
                }
                epochs = items[3..items.len() - 1]
                    .iter()
                    .map(|item| item.parse::<f64>().map_err(|_| err(line)))
                    .collect::<Result<Vec<_>, _>>()?;
                continue;
            }

            let is_g = match items[0] {
                "g" => true,
                "h" => false,
                _ => return Err(err(line)),
            };

            if epochs.is_empty() || items.len() != epochs.len() + 4 {
                return Err(err(line));
            }

            let n = items[1].parse::<usize>().map_err(|_| err(line))?;
            let m = items[2].parse::<usize>().map_err(|_| err(line))?;

            if n == 0 || m > n || (!is_g && m == 0) {
                return Err(err(line));
            }

            let values = items[3..]
                .iter()
                .map(|item| item.parse::<f64>().map_err(|_| err(line)))
                .collect::<Result<Vec<_>, _>>()?;

            rows.push((is_g, n, m, values));
        }

        if epochs.is_empty() {
            return Err(Error::NoModelEpoch);
        }

        if epochs.iter().tuple_windows().any(|(t0, t1)| t1 <= t0) {
            return Err(Error::CoefficientTable("model epochs must increase".to_string()));
        }

        if rows.is_empty() {
            return Err(Error::CoefficientTable("no coefficients".to_string()));
        }

        let degree = rows.iter().map(|(_, n, _, _)| *n).max().unwrap_or(0);

        // every (n, m) up to the maximal degree: g, and h when m > 0
        let size = index(degree, degree) + 1;
        let (mut has_g, mut has_h) = (vec![false; size], vec![false; size]);
        for (is_g, n, m, _) in rows.iter() {
            let k = index(*n, *m);
            if *is_g {
                has_g[k] = true;
            } else {
                has_h[k] = true;
            }
        }
        for n in 1..=degree {
            for m in 0..=n {
                let k = index(n, m);
                if !has_g[k] {
                    return Err(Error::CoefficientTable(format!("missing g({}, {})", n, m)));
                }
                if m > 0 && !has_h[k] {
                    return Err(Error::CoefficientTable(format!("missing h({}, {})", n, m)));
                }
            }
        }

        let mut models = vec![Coefficients::new(degree); epochs.len()];
        let mut secular = Coefficients::new(degree);

        for (is_g, n, m, values) in rows {
            let k = index(n, m);
            for (model, value) in models.iter_mut().zip(values.iter()) {
                if is_g {
                    model.g[k] = *value;
                } else {
                    model.h[k] = *value;
                }
            }
            let sv = values[values.len() - 1];
            if is_g {
                secular.g[k] = sv;
            } else {
                secular.h[k] = sv;
            }
        }

        #[cfg(feature = "log")]
        debug!(
            "igrf: degree {}, epochs {:?}",
            degree,
            epochs.iter().map(|t| format!("{:.1}", t)).join(", ")
        );

        Ok(Self {
            degree,
            epochs,
            models,
            secular,
        })
    }
}

impl FieldModel for Igrf {
    fn field(
        &self,
        decimal_year: f64,
        radius_km: f64,
        lat_ddeg: f64,
        long_ddeg: f64,
    ) -> Result<FieldComponents, Error> {
        let coefs = self.coefficients(decimal_year)?;
        let degree = self.degree;

        let colatitude = (90.0 - lat_ddeg).to_radians();
        let (c, s) = (colatitude.cos(), colatitude.sin().max(MIN_SIN_COLATITUDE));
        let phi = long_ddeg.to_radians();

        // associated Legendre functions and their derivatives with respect to colatitude
        let size = index(degree, degree) + 1;
        let mut p = vec![0.0_f64; size];
        let mut dp = vec![0.0_f64; size];
        p[0] = 1.0;

        for n in 1..=degree {
            let nf = n as f64;
            for m in 0..=n {
                let mf = m as f64;
                let k = index(n, m);
                if n == m {
                    let prev = index(n - 1, n - 1);
                    let scale = if n == 1 {
                        1.0
                    } else {
                        ((2.0 * nf - 1.0) / (2.0 * nf)).sqrt()
                    };
                    p[k] = scale * s * p[prev];
                    dp[k] = scale * (c * p[prev] + s * dp[prev]);
                } else {
                    let prev = index(n - 1, m);
                    let coupling = ((nf - 1.0).powi(2) - mf.powi(2)).sqrt();
                    let (p2, dp2) = if n >= m + 2 {
                        let k2 = index(n - 2, m);
                        (p[k2], dp[k2])
                    } else {
                        (0.0, 0.0)
                    };
                    let norm = (nf.powi(2) - mf.powi(2)).sqrt();
                    p[k] = ((2.0 * nf - 1.0) * c * p[prev] - coupling * p2) / norm;
                    dp[k] = ((2.0 * nf - 1.0) * (c * dp[prev] - s * p[prev]) - coupling * dp2)
                        / norm;
                }
            }
        }

        let mut field = FieldComponents::default();

        for n in 1..=degree {
            let ratio = (REFERENCE_RADIUS_KM / radius_km).powi(n as i32 + 2);
            for m in 0..=n {
                let k = index(n, m);
                let (g, h) = (coefs.g[k], coefs.h[k]);
                let (sin_m, cos_m) = (m as f64 * phi).sin_cos();
                let cosine_term = g * cos_m + h * sin_m;

                field.x_nt += ratio * cosine_term * dp[k];
                field.y_nt += ratio * m as f64 * (g * sin_m - h * cos_m) * p[k] / s;
                field.z_nt -= ratio * (n as f64 + 1.0) * cosine_term * p[k];
            }
        }

        Ok(field)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_field(field: FieldComponents, expected: (f64, f64, f64)) {
        assert!((field.x_nt - expected.0).abs() < 1.0E-3, "{:?}", field);
        assert!((field.y_nt - expected.1).abs() < 1.0E-3, "{:?}", field);
        assert!((field.z_nt - expected.2).abs() < 1.0E-3, "{:?}", field);
    }

    #[test]
    fn builtin_table() {
        let igrf = Igrf::default();
        assert_eq!(igrf.degree(), 13);
        assert_eq!(igrf.validity(), (2000.0, 2025.0));
    }

    #[test]
    fn axial_dipole() {
        let igrf = Igrf::from_str(
            "g/h n m 2000.0 2000-05
g 1 0 -30000.0 0.0
g 1 1 0.0 0.0
h 1 1 0.0 0.0",
        )
        .unwrap();

        // equator: horizontal, pointing north
        let field = igrf.field(2000.0, REFERENCE_RADIUS_KM, 0.0, 0.0).unwrap();
        assert!((field.x_nt - 30000.0).abs() < 1.0E-9);
        assert!(field.y_nt.abs() < 1.0E-9);
        assert!(field.z_nt.abs() < 1.0E-9);

        // north pole: vertical, pointing down, twice as strong
        let field = igrf.field(2000.0, REFERENCE_RADIUS_KM, 90.0, 0.0).unwrap();
        assert!((field.z_nt - 60000.0).abs() < 1.0E-6);

        // 1/r³ decay
        let field = igrf.field(2000.0, 2.0 * REFERENCE_RADIUS_KM, 0.0, 0.0).unwrap();
        assert!((field.x_nt - 30000.0 / 8.0).abs() < 1.0E-9);
    }

    #[test]
    fn builtin_synthesis() {
        let igrf = Igrf::default();

        let field = igrf.field(2010.0, 6371.2, 52.9, 6.87).unwrap();
        assert_field(field, (18271.062794, 184.229993, 45552.038921));

        // at the ionosphere shell
        let field = igrf.field(2010.0, 6821.0, 52.9, 6.87).unwrap();
        assert_field(field, (15347.741357, -83.087213, 37263.139695));

        // interpolated between model epochs
        let field = igrf.field(2012.5, 6821.0, 52.9, 6.87).unwrap();
        assert_field(field, (15362.729982, 24.092429, 37305.931854));

        let field = igrf.field(2015.0, 6821.0, 52.9, 6.87).unwrap();
        assert_field(field, (15377.718608, 131.272070, 37348.724013));

        let field = igrf.field(2011.0 + 293.0 / 365.0, 6821.0, 0.0, 0.0).unwrap();
        assert_field(field, (22207.037405, -2424.137712, -10992.106611));

        let field = igrf.field(2003.0, 6500.0, 10.0, -70.0).unwrap();
        assert_field(field, (25715.602544, -3968.566830, 19566.421896));

        // secular variation, past the last epoch
        let field = igrf.field(2022.0, 6821.0, -30.0, 140.0).unwrap();
        assert_field(field, (21040.449866, 2698.751662, -40077.385006));
    }

    #[test]
    fn validity() {
        let igrf = Igrf::default();
        assert!(igrf.field(1999.9, 6821.0, 52.9, 6.87).is_err());
        assert!(igrf.field(2024.9, 6821.0, 52.9, 6.87).is_ok());
        assert!(matches!(
            igrf.field(2025.1, 6821.0, 52.9, 6.87),
            Err(Error::OutsideValidity { .. })
        ));
    }

    #[test]
    fn secular_variation() {
        let igrf = Igrf::from_str(
            "g/h n m 2000.0 2000-05
g 1 0 -30000.0 10.0
g 1 1 0.0 0.0
h 1 1 0.0 0.0",
        )
        .unwrap();
        let field = igrf.field(2004.0, REFERENCE_RADIUS_KM, 0.0, 0.0).unwrap();
        assert!((field.x_nt - 29960.0).abs() < 1.0E-9);
    }

    #[test]
    fn malformed_tables() {
        for content in [
            "g 1 0 -30000.0 10.0",
            "g/h n m 2000.0 2000-05\ng 1 0 -30000.0",
            "g/h n m 2000.0 2000-05\nh 1 0 -30000.0 10.0",
            "g/h n m 2000.0 2000-05\ng 1 2 -30000.0 10.0",
            "g/h n m 2005.0 2000.0 2000-05\ng 1 0 -30000.0 -30000.0 10.0",
            "# empty",
            "g/h n m 2010.0 2015.0 2015-20\n",
            "g/h n m 2000.0 2000-05\ng 1 0 -30000.0 10.0\ng 1 1 -1700.0 10.0",
            "g/h n m 2000.0 2000-05\ng 1 0 -30000.0 10.0\ng 1 1 -1700.0 10.0\nh 1 1 5000.0 -20.0\ng 2 0 -2300.0 -10.0",
        ] {
            assert!(Igrf::from_str(content).is_err(), "parsed \"{}\"", content);
        }
    }
}
