//! Calendar helpers
use crate::prelude::{Epoch, ParsingError};
use hifitime::Unit;

/// Parses an ISO-8601 description "YYYY-MM-DD[Thh:mm:ss]"
/// and returns the start of that day (00:00:00 UTC).
/// Only the calendar date is retained: the prediction always
/// covers one entire day.
pub fn parse_reference_day(content: &str) -> Result<Epoch, ParsingError> {
    let err = || ParsingError::DateTime(content.to_string());

    let content = content.trim();
    let (date, time) = match content.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (content, None),
    };

    let items = date.split('-').collect::<Vec<_>>();
    if items.len() != 3 {
        return Err(err());
    }

    let y = items[0].parse::<i32>().map_err(|_| err())?;
    let m = items[1].parse::<u8>().map_err(|_| err())?;
    let d = items[2].parse::<u8>().map_err(|_| err())?;

    if let Some(time) = time {
        // time of day is not used, but must still be sane
        let time = time.trim_end_matches('Z');
        for (index, item) in time.split(':').enumerate() {
            let value = item.parse::<f64>().map_err(|_| err())?;
            let max = if index == 0 { 24.0 } else { 60.0 };
            if index > 2 || !(0.0..max).contains(&value) {
                return Err(err());
            }
        }
    }

    Epoch::maybe_from_gregorian_utc(y, m, d, 0, 0, 0, 0).map_err(|_| err())
}

/// Returns the [Epoch] of given hour within the day starting at `day`
pub fn hour_of_day(day: Epoch, hour: u8) -> Epoch {
    day + Unit::Hour * i64::from(hour)
}

/// Returns day of year, starting at 1 on January 1st
pub fn day_of_year(t: Epoch) -> u16 {
    let (y, m, d, _, _, _, _) = t.to_gregorian_utc();
    let midnight = Epoch::from_gregorian_utc_at_midnight(y, m, d);
    let new_year = Epoch::from_gregorian_utc_at_midnight(y, 1, 1);
    (midnight - new_year).to_unit(Unit::Day).round() as u16 + 1
}

/// Returns the decimal year used by the geomagnetic model.
/// Leap years are approximated as every 4th year and the day of year is
/// divided by the year length: this tolerates a 1 day error, which is
/// insignificant for the secular variation of the field.
pub fn decimal_year(t: Epoch) -> f64 {
    let (y, _, _, _, _, _, _) = t.to_gregorian_utc();
    let doy = day_of_year(t) as f64;
    if y % 4 != 0 {
        y as f64 + doy / 365.0
    } else {
        y as f64 + doy / 366.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reference_day() {
        let expected = Epoch::from_gregorian_utc_at_midnight(2011, 10, 20);
        for content in [
            "2011-10-20T00:00:00",
            "2011-10-20T13:45:10",
            "2011-10-20T23:59:59.5",
            "2011-10-20",
            " 2011-10-20T00:00:00Z ",
        ] {
            let day = parse_reference_day(content).unwrap();
            assert_eq!(day, expected, "failed for \"{}\"", content);
        }
        for content in [
            "2011-13-20T00:00:00",
            "2011-02-30",
            "2011/10/20",
            "2011-10-20T25:00:00",
            "2011-10-20T00:61:00",
            "20-10",
        ] {
            assert!(
                parse_reference_day(content).is_err(),
                "parsed invalid \"{}\"",
                content
            );
        }
    }

    #[test]
    fn hours() {
        let day = Epoch::from_gregorian_utc_at_midnight(2011, 10, 20);
        assert_eq!(
            hour_of_day(day, 13),
            Epoch::from_gregorian_utc(2011, 10, 20, 13, 0, 0, 0)
        );
        assert_eq!(
            hour_of_day(day, 24),
            Epoch::from_gregorian_utc_at_midnight(2011, 10, 21)
        );
    }

    #[test]
    fn days_of_year() {
        let t = Epoch::from_gregorian_utc_at_midnight(2011, 1, 1);
        assert_eq!(day_of_year(t), 1);
        let t = Epoch::from_gregorian_utc(2011, 10, 20, 23, 0, 0, 0);
        assert_eq!(day_of_year(t), 293);
        let t = Epoch::from_gregorian_utc_at_midnight(2012, 12, 31);
        assert_eq!(day_of_year(t), 366);
    }

    #[test]
    fn decimal_years() {
        let t = Epoch::from_gregorian_utc_at_midnight(2011, 10, 20);
        assert!((decimal_year(t) - (2011.0 + 293.0 / 365.0)).abs() < 1.0E-12);

        let t = Epoch::from_gregorian_utc_at_midnight(2012, 3, 1);
        assert!((decimal_year(t) - (2012.0 + 61.0 / 366.0)).abs() < 1.0E-12);
    }
}
