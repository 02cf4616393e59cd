//! Temperature sweep driver: thermalize, measure, reduce, move on.

use crate::config::{LatticePolicy, SimConfig};
use crate::error::IsingError;
use crate::lattice::Lattice;
use crate::observables::{ObservableAccumulator, ObservableSeries, TemperaturePoint};
use crate::sink::VisualizationSink;
use crate::utils::rng::seeded_rng;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use validator::Validate;

/// Where a temperature point currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Thermalizing,
    Measuring,
    Done,
}

/// Runs the configured temperature sequence on one lattice at a time.
///
/// Owns the random source and the visualization sink; both are injected so
/// runs can be made reproducible and so snapshot delivery stays the
/// caller's concern.
pub struct Scheduler<R: Rng, S: VisualizationSink> {
    config: SimConfig,
    rng: R,
    sink: S,
    lattice: Option<Lattice>,
    phase: Phase,
}

impl<S: VisualizationSink> Scheduler<ChaCha20Rng, S> {
    /// Seed from `config.seed`, or from OS entropy when it is `None`.
    pub fn new(config: SimConfig, sink: S) -> Result<Self, IsingError> {
        let rng = seeded_rng(config.seed);
        Self::with_rng(config, rng, sink)
    }
}

impl<R: Rng, S: VisualizationSink> Scheduler<R, S> {
    /// Validates the whole configuration before anything is built.
    pub fn with_rng(config: SimConfig, rng: R, sink: S) -> Result<Self, IsingError> {
        config.validate()?;
        Ok(Self { config, rng, sink, lattice: None, phase: Phase::Done })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Lattice left behind by the most recent temperature point.
    pub fn lattice(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Whole temperature sequence; the series is also handed to the sink.
    pub fn run(&mut self) -> Result<ObservableSeries, IsingError> {
        self.run_with_progress(&|_| {})
    }

    /// Like [`run`](Self::run), calling `on_point` after every temperature
    /// (useful for progress bars).
    pub fn run_with_progress(
        &mut self,
        on_point: &dyn Fn(&TemperaturePoint),
    ) -> Result<ObservableSeries, IsingError> {
        let temperatures = self.config.temperatures.clone();
        let mut series = ObservableSeries::default();
        for t in temperatures {
            let point = self.run_temperature(t)?;
            on_point(&point);
            series.push(&point);
        }
        self.sink.series(&series);
        Ok(series)
    }

    /// Thermalization then measurement at a single temperature.
    pub fn run_temperature(&mut self, temperature: f64) -> Result<TemperaturePoint, IsingError> {
        let params = self.config.parameters(temperature)?;
        let n = self.config.lattice_size;
        let mode = self.config.delta_mode;

        let mut lattice = match (self.config.lattice_policy, self.lattice.take()) {
            (LatticePolicy::Anneal, Some(previous)) => previous,
            _ => Lattice::random_with(&mut self.rng, n, params.coupling)?,
        };
        log::info!("T = {temperature:.4}: N = {n}, J = {}, h = {}", params.coupling, params.field);

        self.phase = Phase::Thermalizing;
        log::debug!("T = {temperature:.4}: thermalizing for {} moves", self.config.thermalization_moves);
        for k in 1..=self.config.thermalization_moves {
            lattice.metropolis_step(&params, mode, &mut self.rng)?;
            if let Some(every) = self.config.snapshot_interval {
                if k % every == 0 {
                    self.sink.snapshot(lattice.snapshot(temperature, k));
                }
            }
        }

        self.phase = Phase::Measuring;
        log::debug!("T = {temperature:.4}: measuring over {} sweeps", self.config.measurement_sweeps);
        let mut acc = ObservableAccumulator::new(lattice.n_sites());
        for _ in 0..self.config.measurement_sweeps {
            let accepted = lattice.metropolis_sweep(&params, mode, &mut self.rng)?;
            acc.record_moves(lattice.n_sites(), accepted);
            acc.push(lattice.total_energy(params.field), lattice.magnetization());
        }

        self.phase = Phase::Done;
        let point = acc.finalize(temperature);
        log::info!(
            "T = {temperature:.4}: e = {:.4}, |m| = {:.4}, Cv = {:.4}, chi = {:.4}, acc = {:.3}",
            point.energy,
            point.magnetization,
            point.specific_heat,
            point.susceptibility,
            point.acceptance_rate
        );
        self.lattice = Some(lattice);
        Ok(point)
    }
}
