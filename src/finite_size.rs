// finite_size.rs - Peak locations across lattice sizes and their L → ∞ limit

use crate::observables::ObservableSeries;

/// Location of the maximum of one observable curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub lattice_size: usize,
    pub temperature: f64,
    pub value: f64,
}

/// Collects finished series for several lattice sizes.
#[derive(Debug, Default)]
pub struct FiniteSizeAnalysis {
    data: Vec<(usize, ObservableSeries)>,
}

impl FiniteSizeAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_series(&mut self, lattice_size: usize, series: ObservableSeries) {
        self.data.push((lattice_size, series));
        self.data.sort_by_key(|(l, _)| *l);
    }

    pub fn specific_heat_peaks(&self) -> Vec<Peak> {
        self.peaks(|s| &s.specific_heat)
    }

    pub fn susceptibility_peaks(&self) -> Vec<Peak> {
        self.peaks(|s| &s.susceptibility)
    }

    fn peaks(&self, pick: impl Fn(&ObservableSeries) -> &Vec<f64>) -> Vec<Peak> {
        self.data
            .iter()
            .filter_map(|(l, s)| {
                peak(&s.temperature, pick(s)).map(|(temperature, value)| Peak {
                    lattice_size: *l,
                    temperature,
                    value,
                })
            })
            .collect()
    }

    /// Extrapolate peak temperatures with `T(L) = Tc + a / L` (ν = 1 in 2D).
    /// Needs at least two sizes.
    pub fn extrapolate_tc(peaks: &[Peak]) -> Option<f64> {
        if peaks.len() < 2 {
            return None;
        }
        let points: Vec<(f64, f64)> = peaks
            .iter()
            .map(|p| (1.0 / p.lattice_size as f64, p.temperature))
            .collect();
        let (_, intercept) = linear_regression(&points);
        intercept.is_finite().then_some(intercept)
    }
}

/// Maximum of `values` over `temps`, refined by a parabola through the
/// maximum and its two neighbours when both exist.
pub fn peak(temps: &[f64], values: &[f64]) -> Option<(f64, f64)> {
    if temps.is_empty() || temps.len() != values.len() {
        return None;
    }
    let k = values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(k, _)| k)?;

    if k == 0 || k + 1 == values.len() {
        return Some((temps[k], values[k]));
    }

    let (x0, x1, x2) = (temps[k - 1], temps[k], temps[k + 1]);
    let (y0, y1, y2) = (values[k - 1], values[k], values[k + 1]);
    let denom = (x0 - x1) * (x0 - x2) * (x1 - x2);
    let a = (x2 * (y1 - y0) + x1 * (y0 - y2) + x0 * (y2 - y1)) / denom;
    let b = (x2 * x2 * (y0 - y1) + x1 * x1 * (y2 - y0) + x0 * x0 * (y1 - y2)) / denom;
    let c = (x1 * x2 * (x1 - x2) * y0 + x2 * x0 * (x2 - x0) * y1 + x0 * x1 * (x0 - x1) * y2) / denom;

    if !(a < 0.0) || !denom.is_finite() || denom == 0.0 {
        return Some((x1, y1));
    }
    let xv = -b / (2.0 * a);
    if xv < x0 || xv > x2 {
        return Some((x1, y1));
    }
    Some((xv, c - b * b / (4.0 * a)))
}

/// Simple linear regression returning (slope, intercept)
fn linear_regression(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    (slope, intercept)
}
