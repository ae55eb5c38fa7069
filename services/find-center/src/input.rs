//! JSON case files.
//!
//! A case holds four equal-shaped 2D arrays as nested row lists, with `null`
//! for missing values:
//!
//! ```json
//! { "u": [[...]], "v": [[...]], "lat": [[...]], "lon": [[...]] }
//! ```

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vortex_common::{LatLonGrid, VortexError, VortexResult, WindField};

/// Nested rows as read from JSON.
pub type Rows = Vec<Vec<Option<f64>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    pub u: Rows,
    pub v: Rows,
    pub lat: Rows,
    pub lon: Rows,
}

impl CaseFile {
    pub fn from_path(path: impl AsRef<Path>) -> VortexResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> VortexResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build validated inputs for the center finder.
    pub fn into_inputs(self) -> VortexResult<(WindField, LatLonGrid)> {
        let lat = rows_to_array("lat", self.lat)?;
        let lon = rows_to_array("lon", self.lon)?;
        let grid = LatLonGrid::new(lat, lon)?;
        let wind = WindField::new(rows_to_array("u", self.u)?, rows_to_array("v", self.v)?)?;
        wind.check_grid(&grid)?;
        Ok((wind, grid))
    }
}

/// Convert nested rows to an array, mapping `null` to NaN.
///
/// Every row must have the length of the first one.
pub fn rows_to_array(name: &str, rows: Rows) -> VortexResult<Array2<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);

    let mut values = Vec::with_capacity(nrows * ncols);
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != ncols {
            return Err(VortexError::shape_mismatch(
                format!("{} row {}", name, i),
                (1, ncols),
                (1, row.len()),
            ));
        }
        values.extend(row.into_iter().map(|v| v.unwrap_or(f64::NAN)));
    }

    Array2::from_shape_vec((nrows, ncols), values)
        .map_err(|e| VortexError::InvalidParameter {
            param: name.to_string(),
            message: e.to_string(),
        })
}

/// Convert an array to nested rows, writing non-finite values as `null`.
pub fn array_to_rows(array: &Array2<f64>) -> Rows {
    array
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.is_finite().then_some(*v)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_nulls() {
        let case = CaseFile::parse(
            r#"{
                "u": [[1.0, null], [2.0, 3.0]],
                "v": [[0.0, 0.0], [null, 1.0]],
                "lat": [[10.0, 10.0], [10.1, 10.1]],
                "lon": [[50.0, 50.1], [50.0, 50.1]]
            }"#,
        )
        .unwrap();

        let (wind, grid) = case.into_inputs().unwrap();
        assert_eq!(grid.shape(), (2, 2));
        assert!(wind.u()[[0, 1]].is_nan());
        assert!(wind.v()[[1, 0]].is_nan());
        assert_eq!(wind.u()[[1, 1]], 3.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![Some(1.0), Some(2.0)], vec![Some(3.0)]];
        let err = rows_to_array("u", rows).unwrap_err();
        assert!(matches!(err, VortexError::InputShapeMismatch { .. }));
        assert!(err.to_string().contains("u row 1"));
    }

    #[test]
    fn test_mismatched_grids_rejected() {
        let case = CaseFile {
            u: vec![vec![Some(1.0); 3]; 2],
            v: vec![vec![Some(1.0); 3]; 2],
            lat: vec![vec![Some(10.0); 2]; 2],
            lon: vec![vec![Some(50.0); 2]; 2],
        };
        let err = case.into_inputs().unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_missing_coordinates_rejected() {
        let case = CaseFile {
            u: vec![vec![Some(1.0)]],
            v: vec![vec![Some(1.0)]],
            lat: vec![vec![None]],
            lon: vec![vec![Some(50.0)]],
        };
        assert!(matches!(
            case.into_inputs().unwrap_err(),
            VortexError::InvalidCoordinates(_)
        ));
    }

    #[test]
    fn test_array_to_rows_writes_null() {
        let a = ndarray::array![[1.0, f64::NAN], [f64::INFINITY, -2.0]];
        assert_eq!(
            array_to_rows(&a),
            vec![vec![Some(1.0), None], vec![None, Some(-2.0)]]
        );
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(
            CaseFile::parse("{\"u\": 3}").unwrap_err(),
            VortexError::Json(_)
        ));
    }
}
