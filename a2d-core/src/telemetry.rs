//! Autel telemetry extraction and DJI style rendering.
//!
//! An Autel subtitle carries its telemetry as free text, e.g.
//!
//! ```text
//! HOME(E: 120.3512, N: 23.1189) 2024-09-14 10:21:07
//! GPS(E: 120.3534, N: 23.1201, 26.0m)
//! ISO:100 SHUTTER:1667.11 EV:0.0 F-NUM:2.8
//! ```
//!
//! which is rendered into the single line DJI Mini 2 tooling expects:
//!
//! ```text
//! F/2.8, SS 1667.11, ISO 100, EV 0.0, DZOOM 0.0, GPS (120.3534, 23.1201, 0), D 0.0m, H 26.0m, H.S 0.0m/s, V.S 0.0m/s
//! ```
use std::{fmt, str::FromStr};

use crate::error::TelemetryError;

/// Raw captures of the `GPS(E: lon, N: lat, altm)` fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsMatch<'a> {
    pub east_west: &'a str,
    pub longitude: &'a str,
    pub north_south: &'a str,
    pub latitude: &'a str,
    pub altitude: &'a str,
}

impl<'a> GpsMatch<'a> {
    pub fn find(text: &'a str) -> Option<GpsMatch<'a>> {
        let re = once_cell_regex::regex!(
            r##"GPS\((?P<ew>[EW]):\s+(?P<lon>\d+\.\d+),\s+(?P<ns>[NS]):\s+(?P<lat>\d+\.\d+),\s+(?P<alt>\d+\.\d+)m\)"##
        );
        let captures = re.captures(text)?;
        let group = |name: &str| {
            captures
                .name(name)
                .expect("non optional regex match")
                .as_str()
        };
        Some(GpsMatch {
            east_west: group("ew"),
            longitude: group("lon"),
            north_south: group("ns"),
            latitude: group("lat"),
            altitude: group("alt"),
        })
    }
}

/// Raw captures of the `ISO:.. SHUTTER:.. EV:.. F-NUM:..` fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraMatch<'a> {
    pub iso: &'a str,
    pub shutter: &'a str,
    pub ev: &'a str,
    pub f_number: &'a str,
}

impl<'a> CameraMatch<'a> {
    pub fn find(text: &'a str) -> Option<CameraMatch<'a>> {
        let re = once_cell_regex::regex!(
            r##"ISO:(?P<iso>\d+)\s+SHUTTER:(?P<shutter>\d+\.?\d*)\s+EV:(?P<ev>\d+\.\d+)\s+F-NUM:(?P<f_num>\d+\.\d+)"##
        );
        let captures = re.captures(text)?;
        let group = |name: &str| {
            captures
                .name(name)
                .expect("non optional regex match")
                .as_str()
        };
        Some(CameraMatch {
            iso: group("iso"),
            shutter: group("shutter"),
            ev: group("ev"),
            f_number: group("f_num"),
        })
    }
}

/// One line of DJI Mini 2 telemetry.
///
/// Autel overlays carry no home distance, satellite count, speeds or digital
/// zoom, so those stay at their zero defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub aperture: f64,
    pub shutter: f64,
    pub iso: u32,
    pub ev: f64,
    pub digital_zoom: f64,
    /// Signed decimal degrees, west is negative.
    pub longitude: f64,
    /// Signed decimal degrees, south is negative.
    pub latitude: f64,
    pub satellites: u32,
    pub home_distance: f64,
    pub altitude: f64,
    pub horizontal_speed: f64,
    pub vertical_speed: f64,
}

impl TelemetryRecord {
    /// Build a record from the two matched fragments, folding the hemisphere
    /// letters into the coordinate signs.
    pub fn from_matches(
        gps: &GpsMatch<'_>,
        camera: &CameraMatch<'_>,
    ) -> Result<TelemetryRecord, TelemetryError> {
        let longitude: f64 = parse_field("longitude", gps.longitude)?;
        let latitude: f64 = parse_field("latitude", gps.latitude)?;

        Ok(TelemetryRecord {
            aperture: parse_field("F-NUM", camera.f_number)?,
            shutter: parse_field("SHUTTER", camera.shutter)?,
            iso: parse_field("ISO", camera.iso)?,
            ev: parse_field("EV", camera.ev)?,
            longitude: match gps.east_west {
                "W" => -longitude,
                _ => longitude,
            },
            latitude: match gps.north_south {
                "S" => -latitude,
                _ => latitude,
            },
            altitude: parse_field("altitude", gps.altitude)?,
            ..TelemetryRecord::default()
        })
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, TelemetryError> {
    value
        .parse::<T>()
        .map_err(|_| TelemetryError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Search a subtitle payload for both telemetry fragments.
///
/// The fragments may appear anywhere in the text and in either order.
pub fn extract(text: &str) -> Result<TelemetryRecord, TelemetryError> {
    match (GpsMatch::find(text), CameraMatch::find(text)) {
        (Some(gps), Some(camera)) => TelemetryRecord::from_matches(&gps, &camera),
        (None, Some(_)) => Err(TelemetryError::MissingGps),
        (Some(_), None) => Err(TelemetryError::MissingCamera),
        (None, None) => Err(TelemetryError::MissingGpsAndCamera),
    }
}

/// Writes a float with the shortest digits that round-trip, always keeping a
/// fractional part (`0.0`, `26.0`, `1667.11`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decimal(pub f64);

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 {
            write!(f, "{:.1}", v)
        } else {
            write!(f, "{}", v)
        }
    }
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "F/{}, SS {}, ISO {}, EV {}, DZOOM {}, GPS ({}, {}, {}), D {}m, H {}m, H.S {}m/s, V.S {}m/s ",
            Decimal(self.aperture),
            Decimal(self.shutter),
            self.iso,
            Decimal(self.ev),
            Decimal(self.digital_zoom),
            Decimal(self.longitude),
            Decimal(self.latitude),
            self.satellites,
            Decimal(self.home_distance),
            Decimal(self.altitude),
            Decimal(self.horizontal_speed),
            Decimal(self.vertical_speed),
        )
    }
}
