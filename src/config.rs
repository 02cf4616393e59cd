//! Run configuration and per-temperature model parameters.

use crate::error::IsingError;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use validator::{Validate, ValidationError};

/// Boltzmann constant; energy and temperature share units.
pub const K_B: f64 = 1.0;

/// How the energy change of a trial flip is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    /// Flip, recompute the site energy, keep or undo.
    #[default]
    FlipRecompute,
    /// `ΔE = -2 · E_site` before flipping.
    ClosedForm,
}

impl TryFrom<&str> for DeltaMode {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "flip" | "flip-recompute" => Ok(Self::FlipRecompute),
            "closed" | "closed-form" => Ok(Self::ClosedForm),
            _ => Err(format!(
                "unknown delta_mode '{s}', expected 'flip-recompute' or 'closed-form'"
            )),
        }
    }
}

/// Starting state of the lattice at each temperature point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatticePolicy {
    /// Fresh random lattice for every temperature.
    #[default]
    Fresh,
    /// Carry the final lattice of one temperature into the next.
    Anneal,
}

impl TryFrom<&str> for LatticePolicy {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "fresh" => Ok(Self::Fresh),
            "anneal" => Ok(Self::Anneal),
            _ => Err(format!(
                "unknown lattice_policy '{s}', expected 'fresh' or 'anneal'"
            )),
        }
    }
}

/// Immutable model parameters for one temperature point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    pub temperature: f64,
    pub coupling: f64,
    pub field: f64,
}

impl SimulationParameters {
    pub fn new(temperature: f64, coupling: f64, field: f64) -> Result<Self, IsingError> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(IsingError::InvalidConfig(format!(
                "temperature must be finite and > 0, got {temperature}"
            )));
        }
        if !coupling.is_finite() || !field.is_finite() {
            return Err(IsingError::InvalidConfig(format!(
                "coupling and field must be finite, got J={coupling}, h={field}"
            )));
        }
        Ok(Self { temperature, coupling, field })
    }

    /// `k_B · T`
    #[inline(always)]
    pub fn thermal_energy(&self) -> f64 {
        K_B * self.temperature
    }
}

/// Recipe for the ordered temperature sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureSchedule {
    /// `count` evenly spaced points on `[start, end]`, both ends included.
    Linear { start: f64, end: f64, count: usize },
    /// `count` normal draws around `center`, keeping only those strictly
    /// inside `(min, max)`, sorted ascending. Concentrates points near Tc.
    Gaussian { center: f64, width: f64, count: usize, min: f64, max: f64 },
}

impl TemperatureSchedule {
    pub fn temperatures(&self, rng: &mut impl Rng) -> Result<Vec<f64>, IsingError> {
        let temps = match *self {
            Self::Linear { start, end, count } => linspace(start, end, count),
            Self::Gaussian { center, width, count, min, max } => {
                let normal = Normal::new(center, width)
                    .map_err(|e| IsingError::InvalidConfig(format!("temperature distribution: {e}")))?;
                let mut temps: Vec<f64> = normal
                    .sample_iter(rng)
                    .take(count)
                    .filter(|t| *t > min && *t < max)
                    .collect();
                temps.sort_by(f64::total_cmp);
                temps
            }
        };
        if temps.is_empty() {
            return Err(IsingError::InvalidConfig(format!(
                "temperature schedule {self:?} produced no points"
            )));
        }
        Ok(temps)
    }
}

/// `count` evenly spaced values on `[start, end]`.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|k| start + step * k as f64).collect()
        }
    }
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_sim_config(cfg: &SimConfig) -> Result<(), ValidationError> {
    if cfg.lattice_size < 2 {
        return Err(invalid(
            "lattice_size",
            format!("lattice_size must be >= 2, got {}", cfg.lattice_size),
        ));
    }
    if !cfg.coupling.is_finite() {
        return Err(invalid("coupling", format!("coupling must be finite, got {}", cfg.coupling)));
    }
    if !cfg.field.is_finite() {
        return Err(invalid("field", format!("field must be finite, got {}", cfg.field)));
    }
    if cfg.temperatures.is_empty() {
        return Err(invalid("temperatures", "temperature sequence is empty".to_string()));
    }
    if let Some(t) = cfg.temperatures.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
        return Err(invalid(
            "temperatures",
            format!("temperatures must be finite and > 0, got {t}"),
        ));
    }
    if cfg.measurement_sweeps < 1 {
        return Err(invalid("measurement_sweeps", "measurement_sweeps must be >= 1".to_string()));
    }
    if cfg.snapshot_interval == Some(0) {
        return Err(invalid("snapshot_interval", "snapshot_interval must be >= 1".to_string()));
    }
    Ok(())
}

/// Everything the scheduler needs for one temperature sweep.
#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_sim_config"))]
pub struct SimConfig {
    /// Side length N.
    pub lattice_size: usize,
    /// Coupling J; J > 0 is ferromagnetic.
    pub coupling: f64,
    /// Uniform external field h.
    pub field: f64,
    /// Visited in order.
    pub temperatures: Vec<f64>,
    /// Elementary moves discarded before measuring.
    pub thermalization_moves: usize,
    /// Sweeps of N² moves, each followed by one measurement.
    pub measurement_sweeps: usize,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub lattice_policy: LatticePolicy,
    pub delta_mode: DeltaMode,
    /// Emit a snapshot every this many thermalization moves.
    pub snapshot_interval: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        let n = 16;
        Self {
            lattice_size: n,
            coupling: 1.0,
            field: 0.0,
            temperatures: linspace(1.0, 4.0, 16),
            thermalization_moves: 1_000 * n * n,
            measurement_sweeps: 1_000,
            seed: None,
            lattice_policy: LatticePolicy::Fresh,
            delta_mode: DeltaMode::FlipRecompute,
            snapshot_interval: None,
        }
    }
}

impl SimConfig {
    /// Express thermalization as whole sweeps of the current lattice size.
    /// Fails when `sweeps · N²` does not fit in a `usize`.
    pub fn with_thermalization_sweeps(mut self, sweeps: usize) -> Result<Self, IsingError> {
        self.thermalization_moves = sweeps
            .checked_mul(self.lattice_size)
            .and_then(|m| m.checked_mul(self.lattice_size))
            .ok_or_else(|| {
                IsingError::InvalidConfig(format!(
                    "{sweeps} thermalization sweeps of a {n}x{n} lattice overflow the move count",
                    n = self.lattice_size
                ))
            })?;
        Ok(self)
    }

    pub fn parameters(&self, temperature: f64) -> Result<SimulationParameters, IsingError> {
        SimulationParameters::new(temperature, self.coupling, self.field)
    }
}
