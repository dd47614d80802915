//! Ionospheric rotation measure prediction over one day
use crate::{
    config::Config,
    constants::{EARTH_RADIUS_M, FARADAY_RM_CONSTANT, HOURS_PER_DAY, TECU},
    epoch::{decimal_year, hour_of_day, parse_reference_day},
    geomag::FieldModel,
    ionex::Ionex,
    ipp::compute_ipp,
    observer::Observer,
    prelude::{Epoch, Error, ParsingError},
    results::{HourlyResult, ResultTable},
    sidereal::{SiderealConverter, SkyPosition, Topocentric},
    source::SourceDirection,
};

use std::str::FromStr;

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to predict: a fixed source, seen from one location, during one day.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationRequest {
    /// Observer location
    pub observer: Observer,
    /// Source direction
    pub source: SourceDirection,
    /// Start of the day (00:00:00 UTC)
    pub day: Epoch,
}

impl ObservationRequest {
    pub fn new(observer: Observer, source: SourceDirection, day: Epoch) -> Self {
        Self {
            observer,
            source,
            day,
        }
    }

    /// Builds [ObservationRequest] from its textual description:
    /// ```
    /// use ionfr::prelude::*;
    ///
    /// let request = ObservationRequest::from_descriptions(
    ///     "08h13m36.0s+48d13m03s",
    ///     "52d54m54.6sn",
    ///     "6d52m11.7se",
    ///     "2011-10-20T00:00:00",
    /// ).unwrap();
    ///
    /// assert_eq!(request.day, Epoch::from_gregorian_utc_at_midnight(2011, 10, 20));
    /// ```
    pub fn from_descriptions(
        radec: &str,
        latitude: &str,
        longitude: &str,
        datetime: &str,
    ) -> Result<Self, ParsingError> {
        let source = SourceDirection::from_str(radec)?;
        let observer = Observer::from_dms(latitude, longitude)?;
        let day = parse_reference_day(datetime)?;
        Ok(Self::new(observer, source, day))
    }
}

/// [RmPipeline] evaluates the ionospheric rotation measure, hour by hour.
/// The ionosphere maps are shared read-only, hours are independent.
pub struct RmPipeline<'a, S: SkyPosition, F: FieldModel> {
    request: ObservationRequest,
    ionex: &'a Ionex,
    sky: S,
    field_model: F,
    elevation_cutoff_rad: f64,
}

impl<'a, F: FieldModel> RmPipeline<'a, SiderealConverter, F> {
    /// Builds a pipeline that locates the source with the [SiderealConverter]
    pub fn sidereal(request: ObservationRequest, ionex: &'a Ionex, field_model: F) -> Self {
        let sky = SiderealConverter::new(request.observer, request.source);
        Self::new(request, ionex, sky, field_model)
    }
}

impl<'a, S: SkyPosition, F: FieldModel> RmPipeline<'a, S, F> {
    pub fn new(request: ObservationRequest, ionex: &'a Ionex, sky: S, field_model: F) -> Self {
        Self {
            request,
            ionex,
            sky,
            field_model,
            elevation_cutoff_rad: 0.0,
        }
    }

    /// Copies and sets the elevation cutoff, in degrees
    pub fn with_elevation_cutoff(mut self, cutoff_deg: f64) -> Self {
        self.elevation_cutoff_rad = cutoff_deg.to_radians();
        self
    }

    /// Hours of the day where the source is above the elevation cutoff,
    /// with their [Epoch] and source position.
    pub fn visible_hours(&self) -> impl Iterator<Item = (u8, Epoch, Topocentric)> + '_ {
        (0..HOURS_PER_DAY)
            .map(move |hour| {
                let t = hour_of_day(self.request.day, hour);
                (hour, t, self.sky.topocentric(t))
            })
            .filter(move |(_hour, _, position)| {
                let visible = position.is_above(self.elevation_cutoff_rad);

                #[cfg(feature = "log")]
                if !visible {
                    debug!(
                        "{:02}h: source below horizon (elev={:.3}°)",
                        _hour,
                        position.altitude_rad.to_degrees()
                    );
                }

                visible
            })
    }

    /// Evaluates the prediction at this hour, for this source position
    pub fn evaluate(
        &self,
        hour: u8,
        t: Epoch,
        position: &Topocentric,
    ) -> Result<HourlyResult, Error> {
        let observer = &self.request.observer;
        let shell_height_m = self.ionex.shell_height_m();

        let ipp = compute_ipp(
            observer.latitude_magnitude_rad(),
            position.azimuth_rad,
            position.zenith_rad(),
            shell_height_m,
        )?;

        let (lat_ddeg, long_ddeg) =
            observer.apply_hemispheres(ipp.offset_lat_rad, ipp.offset_long_rad);

        let vtec = self.ionex.vtec(t, lat_ddeg, long_ddeg)?;
        let rms_vtec = self.ionex.rms_vtec(t, lat_ddeg, long_ddeg)?;

        let tec_path = vtec * TECU * ipp.slant_factor();
        let rms_path = rms_vtec * TECU * ipp.slant_factor();

        let radius_km = (EARTH_RADIUS_M + shell_height_m) / 1.0E3;
        let year = decimal_year(self.request.day);

        let field = self
            .field_model
            .field(year, radius_km, lat_ddeg, long_ddeg)?;

        let tot_field = field.line_of_sight_gauss(ipp.azimuth_rad, ipp.zenith_rad);

        let ifr = FARADAY_RM_CONSTANT * tot_field * tec_path;
        let rms_ifr = FARADAY_RM_CONSTANT * tot_field * rms_path;

        #[cfg(feature = "log")]
        debug!(
            "{:02}h: elev={:.3}° ipp=({:.4}°, {:.4}°) vtec={:.3} TECu b={:.6} G rm={:.6}",
            hour,
            position.altitude_rad.to_degrees(),
            lat_ddeg,
            long_ddeg,
            vtec,
            tot_field,
            ifr,
        );

        Ok(HourlyResult {
            hour,
            tec_path,
            tot_field,
            ifr,
            rms_ifr,
        })
    }

    /// Runs the prediction over the entire day.
    /// Any failure aborts the whole prediction.
    pub fn run(&self) -> Result<ResultTable, Error> {
        self.visible_hours()
            .map(|(hour, t, position)| self.evaluate(hour, t, &position))
            .collect::<Result<ResultTable, Error>>()
    }
}

/// Predicts the ionospheric rotation measure for this request,
/// using the [SiderealConverter] and the geomagnetic model described by [Config].
pub fn predict(
    request: ObservationRequest,
    ionex: &Ionex,
    cfg: &Config,
) -> Result<ResultTable, Error> {
    let igrf = cfg.igrf()?;
    RmPipeline::sidereal(request, ionex, igrf)
        .with_elevation_cutoff(cfg.elevation_cutoff_deg)
        .run()
}
