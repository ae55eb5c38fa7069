//! Scalar haversine distance and the grid bearing built from its terms.
//!
//! The bearing here is NOT the textbook initial great-circle bearing. It is
//! assembled from the two partial sums of the haversine formula:
//!
//! ```text
//! meridional = sin²(Δlat / 2)
//! zonal      = cos(lat0) · cos(lat) · sin²(Δlon / 2)
//! bearing    = atan2(sign(Δlat) · √meridional, sign(Δlon) · √zonal)
//! ```
//!
//! Angles are measured counterclockwise from east, matching the convention
//! of `atan2(v, u)` for wind vectors. Sector assignment in the center search
//! depends on this exact definition.

/// Mean Earth radius used for all distances (km).
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// Sign function with sign(0) = 0.
///
/// `f64::signum` returns 1.0 for +0.0, which would give the reference cell
/// itself a non-zero bearing component.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}

/// Meridional and zonal haversine terms plus the signed separations (radians).
#[inline]
fn haversine_terms(lat0: f64, lon0: f64, lat: f64, lon: f64) -> (f64, f64, f64, f64) {
    let lat0_r = lat0.to_radians();
    let lat_r = lat.to_radians();
    let dlat = lat_r - lat0_r;
    let dlon = lon.to_radians() - lon0.to_radians();

    let meridional = (dlat / 2.0).sin().powi(2);
    let zonal = lat0_r.cos() * lat_r.cos() * (dlon / 2.0).sin().powi(2);

    (meridional, zonal, dlat, dlon)
}

/// Great-circle distance in km between (lat0, lon0) and (lat, lon), in degrees.
#[inline]
pub fn haversine_km(lat0: f64, lon0: f64, lat: f64, lon: f64, radius_km: f64) -> f64 {
    let (meridional, zonal, _, _) = haversine_terms(lat0, lon0, lat, lon);
    let a = meridional + zonal;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    radius_km * c
}

/// Bearing (radians, counterclockwise from east) from (lat0, lon0) to (lat, lon).
///
/// Returns 0 when both points coincide.
#[inline]
pub fn pseudo_bearing(lat0: f64, lon0: f64, lat: f64, lon: f64) -> f64 {
    let (meridional, zonal, dlat, dlon) = haversine_terms(lat0, lon0, lat, lon);
    (sign(dlat) * meridional.sqrt()).atan2(sign(dlon) * zonal.sqrt())
}
