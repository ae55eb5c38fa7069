//! Box smoothing of gappy 2D fields.
//!
//! The filter is separable: a 1D running mean along rows, then along
//! columns. Edges use half-sample symmetric reflection
//! (`d c b a | a b c d | d c b a`), repeated for windows wider than the grid.

use ndarray::{Array2, Axis, Zip};

/// Reflect an out-of-range index back onto `0..len`.
#[inline]
pub fn reflect_index(i: isize, len: usize) -> usize {
    let n = len as isize;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    if m < n {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Uniform (box) mean of width `2 * half_width + 1` along one axis.
fn uniform_filter_axis(data: &Array2<f64>, axis: Axis, half_width: usize) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros(data.dim());
    let size = (2 * half_width + 1) as f64;
    let hw = half_width as isize;

    for (lane_in, mut lane_out) in data.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        let len = lane_in.len();
        for i in 0..len {
            let mut sum = 0.0;
            for offset in -hw..=hw {
                sum += lane_in[reflect_index(i as isize + offset, len)];
            }
            lane_out[i] = sum / size;
        }
    }

    out
}

/// Separable 2D box mean with reflected edges.
pub fn uniform_filter(data: &Array2<f64>, half_width: usize) -> Array2<f64> {
    if data.is_empty() {
        return data.clone();
    }
    let rows_done = uniform_filter_axis(data, Axis(1), half_width);
    uniform_filter_axis(&rows_done, Axis(0), half_width)
}

/// Box-smooth a field containing NaN gaps.
///
/// Missing values are replaced by zero, the field and its validity mask are
/// smoothed separately, and the ratio is taken. Cells whose smoothed
/// validity weight falls below `min_coverage` become NaN.
pub fn smooth_with_coverage(
    data: &Array2<f64>,
    half_width: usize,
    min_coverage: f64,
) -> Array2<f64> {
    let filled = data.mapv(|v| if v.is_finite() { v } else { 0.0 });
    let mask = data.mapv(|v| if v.is_finite() { 1.0 } else { 0.0 });

    let smoothed = uniform_filter(&filled, half_width);
    let weight = uniform_filter(&mask, half_width);

    Zip::from(&smoothed)
        .and(&weight)
        .map_collect(|&value, &w| {
            if w < min_coverage || w <= 0.0 {
                f64::NAN
            } else {
                value / w
            }
        })
}
