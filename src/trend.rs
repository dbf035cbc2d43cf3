/// Least-squares fit of a ratio series against time.
///
/// `r_squared` is computed alongside the fit but is not part of the report
/// output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Ordinary least-squares linear fit of `ratios` over `timestamps`:
/// `ratio ≈ slope * timestamp + intercept`, via the mean-centered sums of
/// squares and cross-products.
///
/// Degenerate series are fitted with a flat line instead of dividing by
/// zero: a series of length one, or one whose timestamps all coincide, gets
/// slope 0.0 and intercept equal to the mean ratio. An empty series yields
/// an all-zero line. Timestamps need not be strictly increasing.
pub fn fit_line(timestamps: &[i64], ratios: &[f64]) -> TrendLine {
    debug_assert_eq!(timestamps.len(), ratios.len());

    let n = timestamps.len().min(ratios.len());
    if n == 0 {
        return TrendLine::default();
    }

    let nf = n as f64;
    let mean_x = timestamps.iter().map(|&t| t as f64).sum::<f64>() / nf;
    let mean_y = ratios.iter().sum::<f64>() / nf;

    let mut s_xx = 0.0;
    let mut s_yy = 0.0;
    let mut s_xy = 0.0;
    for i in 0..n {
        let dx = timestamps[i] as f64 - mean_x;
        let dy = ratios[i] - mean_y;
        s_xx += dx * dx;
        s_yy += dy * dy;
        s_xy += dx * dy;
    }

    if s_xx == 0.0 {
        // Zero variance in x: length-1 series or identical timestamps.
        return TrendLine {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
        };
    }

    let slope = s_xy / s_xx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if s_yy == 0.0 {
        // Constant ratios fit the horizontal line exactly.
        1.0
    } else {
        (s_xy * s_xy) / (s_xx * s_yy)
    };

    TrendLine {
        slope,
        intercept,
        r_squared,
    }
}
