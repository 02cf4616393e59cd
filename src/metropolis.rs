//! Single-spin-flip Metropolis dynamics.

use crate::config::{DeltaMode, SimulationParameters};
use crate::error::IsingError;
use crate::lattice::Lattice;
use rand::Rng;

/// Returned by every elementary move, allows O(1) book-keeping in the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    pub row: usize,
    pub col: usize,
    pub accepted: bool,
    pub delta_e: f64, // change in total energy (0 if rejected)
    pub delta_m: f64, // change in magnetization (0 if rejected)
}

impl Lattice {
    /// One Metropolis move on a uniformly chosen site.
    ///
    /// Draws the row, then the column, then (only when ΔE > 0) one uniform
    /// value in [0, 1) for the acceptance test.
    pub fn metropolis_step(
        &mut self,
        params: &SimulationParameters,
        mode: DeltaMode,
        rng: &mut impl Rng,
    ) -> Result<StepInfo, IsingError> {
        let i = rng.gen_range(0..self.n());
        let j = rng.gen_range(0..self.n());
        self.metropolis_move_at(i, j, params, mode, rng)
    }

    /// Metropolis move on a given site.
    ///
    /// ΔE ≤ 0 is always accepted without consuming randomness. Otherwise the
    /// flip is undone when `exp(-ΔE / k_B T) < r`. `params.coupling` must
    /// match the lattice's coupling.
    pub fn metropolis_move_at(
        &mut self,
        i: usize,
        j: usize,
        params: &SimulationParameters,
        mode: DeltaMode,
        rng: &mut impl Rng,
    ) -> Result<StepInfo, IsingError> {
        let kt = params.thermal_energy();
        if kt.is_nan() || kt <= 0.0 {
            return Err(IsingError::InvalidConfig(format!(
                "temperature must be > 0, got {}",
                params.temperature
            )));
        }
        // Energies are evaluated with the lattice's own J.
        if params.coupling != self.coupling() {
            return Err(IsingError::InvalidConfig(format!(
                "parameters carry J = {} but the lattice was built with J = {}",
                params.coupling,
                self.coupling()
            )));
        }

        let before = self.site_energy(i, j, params.field);
        let delta_e = match mode {
            DeltaMode::FlipRecompute => {
                self.flip(i, j);
                self.site_energy(i, j, params.field) - before
            }
            DeltaMode::ClosedForm => {
                self.flip(i, j);
                -2.0 * before
            }
        };

        if !delta_e.is_finite() {
            self.flip(i, j);
            return Err(IsingError::NonFiniteEnergy { row: i, col: j, delta: delta_e });
        }

        let accepted = if delta_e <= 0.0 {
            true
        } else {
            let prob = (-delta_e / kt).exp();
            let r: f64 = rng.gen();
            prob >= r
        };

        if !accepted {
            self.flip(i, j);
            return Ok(StepInfo { row: i, col: j, accepted: false, delta_e: 0.0, delta_m: 0.0 });
        }

        Ok(StepInfo {
            row: i,
            col: j,
            accepted: true,
            delta_e,
            delta_m: 2.0 * self.spin(i, j).value(),
        })
    }

    /// N² elementary moves. Returns the number of accepted moves.
    pub fn metropolis_sweep(
        &mut self,
        params: &SimulationParameters,
        mode: DeltaMode,
        rng: &mut impl Rng,
    ) -> Result<usize, IsingError> {
        let mut accepted = 0;
        for _ in 0..self.n_sites() {
            if self.metropolis_step(params, mode, rng)?.accepted {
                accepted += 1;
            }
        }
        Ok(accepted)
    }
}
