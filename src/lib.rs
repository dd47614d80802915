#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * IONFR is part of the rtk-rs framework.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al.
 * This framework is shipped under the Mozilla Public V2 license.
 *
 * Documentation: https://github.com/rtk-rs/ionfr
 */

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod constants;
pub mod epoch;
pub mod geomag;
pub mod ionex;
pub mod ipp;
pub mod linspace;
pub mod observer;
pub mod pipeline;
pub mod results;
pub mod sidereal;
pub mod source;

mod error;

#[cfg(test)]
mod tests;

pub mod prelude {
    // export
    pub use crate::{
        config::Config,
        error::{Error, ParsingError},
        geomag::{FieldComponents, FieldModel, Igrf},
        ionex::{Grid, Header, Ionex, Map, MappingFunction},
        ipp::{compute_ipp, PiercingPoint},
        linspace::Linspace,
        observer::{LatitudeHemisphere, LongitudeHemisphere, Observer},
        pipeline::{predict, ObservationRequest, RmPipeline},
        results::{HourlyResult, ResultTable},
        sidereal::{SiderealConverter, SkyPosition, Topocentric},
        source::SourceDirection,
    };

    // pub re-export
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
}
