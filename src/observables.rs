// observables.rs - Per-temperature moments and the derived thermodynamic series

/// Running first and second moments of energy and magnetization for one
/// temperature point.
#[derive(Debug, Clone, Default)]
pub struct ObservableAccumulator {
    n_sites: usize,
    samples: usize,
    sum_e: f64,
    sum_e2: f64,
    sum_m: f64,
    sum_m2: f64,
    attempted: u64,
    accepted: u64,
}

/// Final averages at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperaturePoint {
    pub temperature: f64,
    /// Mean energy per site.
    pub energy: f64,
    /// |Σ M_k| per sample per site.
    pub magnetization: f64,
    pub specific_heat: f64,
    pub susceptibility: f64,
    pub acceptance_rate: f64,
    pub samples: usize,
}

impl ObservableAccumulator {
    pub fn new(n_sites: usize) -> Self {
        Self { n_sites, ..Self::default() }
    }

    /// Record one measurement (total energy, signed magnetization).
    pub fn push(&mut self, energy: f64, magnetization: f64) {
        self.samples += 1;
        self.sum_e += energy;
        self.sum_e2 += energy * energy;
        self.sum_m += magnetization;
        self.sum_m2 += magnetization * magnetization;
    }

    pub fn record_moves(&mut self, attempted: usize, accepted: usize) {
        self.attempted += attempted as u64;
        self.accepted += accepted as u64;
    }

    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// Reduce the sums into per-site averages.
    ///
    /// With `n1 = 1/(S·N²)` and `n2 = 1/(S²·N²)`:
    /// `e = n1 ΣE`, `m = n1 |ΣM|`, `Cv = (n1 ΣE² - n2 (ΣE)²) / T`,
    /// `χ = (n1 ΣM² - n2 (ΣM)²) / T`.
    pub fn finalize(&self, temperature: f64) -> TemperaturePoint {
        let acceptance_rate = if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        };
        if self.samples == 0 || self.n_sites == 0 {
            return TemperaturePoint {
                temperature,
                energy: 0.0,
                magnetization: 0.0,
                specific_heat: 0.0,
                susceptibility: 0.0,
                acceptance_rate,
                samples: 0,
            };
        }

        let s = self.samples as f64;
        let sites = self.n_sites as f64;
        let n1 = 1.0 / (s * sites);
        let n2 = 1.0 / (s * s * sites);

        TemperaturePoint {
            temperature,
            energy: n1 * self.sum_e,
            magnetization: n1 * self.sum_m.abs(),
            specific_heat: (n1 * self.sum_e2 - n2 * self.sum_e * self.sum_e) / temperature,
            susceptibility: (n1 * self.sum_m2 - n2 * self.sum_m * self.sum_m) / temperature,
            acceptance_rate,
            samples: self.samples,
        }
    }
}

/// Observable-vs-temperature curves, one entry per temperature point.
/// All vectors always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservableSeries {
    pub temperature: Vec<f64>,
    pub energy: Vec<f64>,
    pub magnetization: Vec<f64>,
    pub specific_heat: Vec<f64>,
    pub susceptibility: Vec<f64>,
    pub acceptance_rate: Vec<f64>,
}

impl ObservableSeries {
    pub fn push(&mut self, p: &TemperaturePoint) {
        self.temperature.push(p.temperature);
        self.energy.push(p.energy);
        self.magnetization.push(p.magnetization);
        self.specific_heat.push(p.specific_heat);
        self.susceptibility.push(p.susceptibility);
        self.acceptance_rate.push(p.acceptance_rate);
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

impl FromIterator<TemperaturePoint> for ObservableSeries {
    fn from_iter<I: IntoIterator<Item = TemperaturePoint>>(iter: I) -> Self {
        let mut series = Self::default();
        for p in iter {
            series.push(&p);
        }
        series
    }
}
