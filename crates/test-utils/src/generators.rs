//! Test data generators for synthetic vortex cases.
//!
//! Grids are built on a local tangent plane: cell (row, col) sits
//! `(col - center_col) * spacing` km east and `(row - center_row) * spacing`
//! km north of the center, so rows run south to north. Winds are
//! counterclockwise (cyclonic in the northern hemisphere) with zero radial
//! component.

use ndarray::Array2;

/// Earth radius (km) used to turn km offsets into degrees.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// Creates latitude and longitude grids with a fixed spacing in km.
///
/// Cell `center` maps exactly to (`center_lat`, `center_lon`).
///
/// # Returns
///
/// `(lat, lon)` in degrees, each of shape `(rows, cols)`.
///
/// # Example
///
/// ```
/// use test_utils::regular_grid_km;
///
/// let (lat, lon) = regular_grid_km(5, 5, 2.0, (2, 2), 20.0, -60.0);
/// assert_eq!(lat[[2, 2]], 20.0);
/// assert_eq!(lon[[2, 2]], -60.0);
/// assert!(lat[[3, 2]] > lat[[2, 2]]);
/// ```
pub fn regular_grid_km(
    rows: usize,
    cols: usize,
    spacing_km: f64,
    center: (usize, usize),
    center_lat: f64,
    center_lon: f64,
) -> (Array2<f64>, Array2<f64>) {
    let dlat_deg = (spacing_km / EARTH_RADIUS_KM).to_degrees();
    let dlon_deg = (spacing_km / (EARTH_RADIUS_KM * center_lat.to_radians().cos())).to_degrees();

    let lat = Array2::from_shape_fn((rows, cols), |(r, _)| {
        center_lat + (r as f64 - center.0 as f64) * dlat_deg
    });
    let lon = Array2::from_shape_fn((rows, cols), |(_, c)| {
        center_lon + (c as f64 - center.1 as f64) * dlon_deg
    });
    (lat, lon)
}

/// Creates a vortex whose tangential wind at radius `r` (km) is `profile(r)`.
///
/// The center cell itself gets zero wind.
///
/// # Returns
///
/// `(u, v)` wind components of shape `(rows, cols)`.
pub fn tangential_vortex<F>(
    rows: usize,
    cols: usize,
    spacing_km: f64,
    center: (usize, usize),
    profile: F,
) -> (Array2<f64>, Array2<f64>)
where
    F: Fn(f64) -> f64,
{
    let mut u = Array2::<f64>::zeros((rows, cols));
    let mut v = Array2::<f64>::zeros((rows, cols));

    for row in 0..rows {
        for col in 0..cols {
            let x = (col as f64 - center.1 as f64) * spacing_km;
            let y = (row as f64 - center.0 as f64) * spacing_km;
            let r = x.hypot(y);
            if r == 0.0 {
                continue;
            }
            let speed = profile(r);
            u[[row, col]] = -speed * y / r;
            v[[row, col]] = speed * x / r;
        }
    }

    (u, v)
}

/// Tangential wind of a Rankine vortex: solid-body inside `rmw_km`, 1/r outside.
pub fn rankine_profile(r_km: f64, rmw_km: f64, vmax: f64) -> f64 {
    if r_km <= rmw_km {
        vmax * r_km / rmw_km
    } else {
        vmax * rmw_km / r_km
    }
}

/// Creates a Rankine vortex wind field.
///
/// # Example
///
/// ```
/// use test_utils::rankine_vortex;
///
/// let (u, v) = rankine_vortex(21, 21, 2.0, (10, 10), 10.0, 40.0);
/// // 10 km east of the center the wind blows due north at vmax
/// assert!(u[[10, 15]].abs() < 1e-9);
/// assert!((v[[10, 15]] - 40.0).abs() < 1e-9);
/// ```
pub fn rankine_vortex(
    rows: usize,
    cols: usize,
    spacing_km: f64,
    center: (usize, usize),
    rmw_km: f64,
    vmax: f64,
) -> (Array2<f64>, Array2<f64>) {
    tangential_vortex(rows, cols, spacing_km, center, |r| {
        rankine_profile(r, rmw_km, vmax)
    })
}

/// Creates a wind field with every value missing.
pub fn all_missing_wind(rows: usize, cols: usize) -> (Array2<f64>, Array2<f64>) {
    (
        Array2::from_elem((rows, cols), f64::NAN),
        Array2::from_elem((rows, cols), f64::NAN),
    )
}

/// Creates a uniform wind field (no rotation at all).
pub fn uniform_wind(rows: usize, cols: usize, u: f64, v: f64) -> (Array2<f64>, Array2<f64>) {
    (
        Array2::from_elem((rows, cols), u),
        Array2::from_elem((rows, cols), v),
    )
}

/// Marks every cell within `radius_cells` (Euclidean, in cells) of `center` as missing.
pub fn punch_hole(
    u: &mut Array2<f64>,
    v: &mut Array2<f64>,
    center: (usize, usize),
    radius_cells: f64,
) {
    for ((row, col), value) in u.indexed_iter_mut() {
        let dr = row as f64 - center.0 as f64;
        let dc = col as f64 - center.1 as f64;
        if dr.hypot(dc) <= radius_cells {
            *value = f64::NAN;
            v[[row, col]] = f64::NAN;
        }
    }
}

/// Marks a rectangular block of cells as missing (inclusive bounds).
pub fn blank_region(
    u: &mut Array2<f64>,
    v: &mut Array2<f64>,
    rows: std::ops::RangeInclusive<usize>,
    cols: std::ops::RangeInclusive<usize>,
) {
    for row in rows {
        for col in cols.clone() {
            if row < u.nrows() && col < u.ncols() {
                u[[row, col]] = f64::NAN;
                v[[row, col]] = f64::NAN;
            }
        }
    }
}
