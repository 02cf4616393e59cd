//! Acceptance rule of the single-spin-flip Metropolis move.

use ising::{DeltaMode, IsingError, Lattice, SimulationParameters, Spin, StepInfo};

use rand::rngs::mock::StepRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

// StepRng(0, 0) yields a uniform f64 of exactly 0.0,
// StepRng(u64::MAX, 0) yields 1 - 2^-53.
fn draw_zero() -> StepRng {
    StepRng::new(0, 0)
}

fn draw_almost_one() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// All up except (1, 1): flipping (1, 1) back up lowers the energy by 8J.
fn lattice_with_defect() -> Lattice {
    let mut lat = Lattice::new(4, 1.0).unwrap();
    lat.flip(1, 1);
    lat
}

#[test]
fn test_downhill_move_always_accepted() {
    let params = SimulationParameters::new(2.0, 1.0, 0.0).unwrap();
    for mode in [DeltaMode::FlipRecompute, DeltaMode::ClosedForm] {
        for mut rng in [draw_zero(), draw_almost_one()] {
            let mut lat = lattice_with_defect();
            let info = lat.metropolis_move_at(1, 1, &params, mode, &mut rng).unwrap();
            assert!(info.accepted);
            assert_eq!(info.delta_e, -8.0);
            assert_eq!(info.delta_m, 2.0);
            assert_eq!(lat.spin(1, 1), Spin::Up);
        }
    }
}

#[test]
fn test_downhill_move_consumes_no_randomness() {
    let params = SimulationParameters::new(2.0, 1.0, 0.0).unwrap();
    let mut rng = StepRng::new(0, 1);
    let mut lat = lattice_with_defect();
    lat.metropolis_move_at(1, 1, &params, DeltaMode::FlipRecompute, &mut rng).unwrap();
    assert_eq!(rng.next_u64(), 0, "no draw expected when ΔE <= 0");
}

#[test]
fn test_zero_cost_move_accepted() {
    // (0, 1) has two up and two down neighbours.
    let values = [
        1, 1, 1, 1, //
        -1, -1, -1, -1, //
        -1, -1, -1, -1, //
        1, 1, 1, 1,
    ];
    let params = SimulationParameters::new(1.0, 1.0, 0.0).unwrap();
    let mut lat = Lattice::from_values(4, 1.0, &values).unwrap();
    lat.flip(0, 0);
    let info = lat
        .metropolis_move_at(0, 1, &params, DeltaMode::FlipRecompute, &mut draw_almost_one())
        .unwrap();
    assert_eq!(info.delta_e, 0.0);
    assert!(info.accepted);
}

#[test]
fn test_uphill_move_with_zero_draw_accepted() {
    let params = SimulationParameters::new(2.0, 1.0, 0.0).unwrap();
    let mut lat = Lattice::new(4, 1.0).unwrap();
    let info = lat
        .metropolis_move_at(2, 3, &params, DeltaMode::FlipRecompute, &mut draw_zero())
        .unwrap();
    assert!(info.accepted);
    assert_eq!(info.delta_e, 8.0);
    assert_eq!(info.delta_m, -2.0);
    assert_eq!(lat.spin(2, 3), Spin::Down);
}

#[test]
fn test_uphill_move_with_high_draw_rejected() {
    let ordered = Lattice::new(4, 1.0).unwrap();
    for (t, field) in [(0.5, 0.0), (2.0, 0.0), (100.0, 0.0), (2.0, 0.3)] {
        let params = SimulationParameters::new(t, 1.0, field).unwrap();
        for mode in [DeltaMode::FlipRecompute, DeltaMode::ClosedForm] {
            let mut lat = ordered.clone();
            let info = lat.metropolis_move_at(0, 0, &params, mode, &mut draw_almost_one()).unwrap();
            assert_eq!(
                info,
                StepInfo { row: 0, col: 0, accepted: false, delta_e: 0.0, delta_m: 0.0 },
                "T={t} h={field}"
            );
            assert_eq!(lat, ordered, "rejected move must restore the lattice");
        }
    }
}

#[test]
fn test_field_biases_uphill_cost() {
    // Flipping an up spin against a positive field costs 8J + 2h.
    let params = SimulationParameters::new(1.0, 1.0, 0.5).unwrap();
    let mut lat = Lattice::new(3, 1.0).unwrap();
    let info = lat
        .metropolis_move_at(1, 2, &params, DeltaMode::FlipRecompute, &mut draw_zero())
        .unwrap();
    assert_eq!(info.delta_e, 9.0);
}

#[test]
fn test_non_finite_delta_is_a_fault() {
    let params = SimulationParameters { temperature: 1.0, coupling: 1e308, field: 0.0 };
    let mut lat = Lattice::new(3, 1e308).unwrap();
    let before = lat.clone();
    let err = lat
        .metropolis_move_at(0, 0, &params, DeltaMode::FlipRecompute, &mut draw_zero())
        .unwrap_err();
    assert!(matches!(err, IsingError::NonFiniteEnergy { row: 0, col: 0, .. }));
    assert_eq!(lat, before, "faulted move must not leave the trial flip behind");
}

#[test]
fn test_non_positive_temperature_rejected() {
    assert!(SimulationParameters::new(0.0, 1.0, 0.0).is_err());
    assert!(SimulationParameters::new(-1.0, 1.0, 0.0).is_err());
    assert!(SimulationParameters::new(f64::NAN, 1.0, 0.0).is_err());

    let params = SimulationParameters { temperature: 0.0, coupling: 1.0, field: 0.0 };
    let mut lat = Lattice::new(3, 1.0).unwrap();
    let err = lat
        .metropolis_step(&params, DeltaMode::FlipRecompute, &mut draw_zero())
        .unwrap_err();
    assert!(matches!(err, IsingError::InvalidConfig(_)));
}

#[test]
fn test_coupling_mismatch_rejected() {
    // All-up lattice built with J = +1, parameters asking for J = -1.
    let params = SimulationParameters::new(1.0, -1.0, 0.0).unwrap();
    let mut lat = Lattice::new(4, 1.0).unwrap();
    let before = lat.clone();
    for mode in [DeltaMode::FlipRecompute, DeltaMode::ClosedForm] {
        let err = lat.metropolis_move_at(0, 0, &params, mode, &mut draw_zero()).unwrap_err();
        assert!(matches!(err, IsingError::InvalidConfig(_)), "{mode:?}: {err}");
        let err = lat.metropolis_step(&params, mode, &mut draw_zero()).unwrap_err();
        assert!(matches!(err, IsingError::InvalidConfig(_)));
    }
    assert_eq!(lat, before, "a rejected call must not touch the lattice");

    // Antiferromagnetic lattice with matching parameters: the all-up state is
    // the energy maximum, so flipping is downhill.
    let mut afm = Lattice::new(4, -1.0).unwrap();
    let info = afm
        .metropolis_move_at(0, 0, &params, DeltaMode::FlipRecompute, &mut draw_almost_one())
        .unwrap();
    assert!(info.accepted);
    assert_eq!(info.delta_e, -8.0);
}

#[test]
fn test_metropolis_acceptance_rate() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xDEADBEEF);
    let params = SimulationParameters::new(2.5, 1.0, 0.0).unwrap();
    let mut lat = Lattice::random_with(&mut rng, 8, 1.0).unwrap();

    let n_sweeps = 50;
    let mut accepted = 0usize;
    for _ in 0..n_sweeps {
        accepted += lat.metropolis_sweep(&params, DeltaMode::FlipRecompute, &mut rng).unwrap();
    }
    let acc_rate = accepted as f64 / (n_sweeps * lat.n_sites()) as f64;

    // Near Tc the rate sits well inside (0, 1).
    assert!(
        (0.05..=0.95).contains(&acc_rate),
        "Acceptance rate {acc_rate:.3} is outside plausible range"
    );
}

#[test]
fn test_step_bookkeeping_tracks_observables() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let params = SimulationParameters::new(2.0, 1.0, 0.2).unwrap();
    let mut lat = Lattice::random_with(&mut rng, 6, 1.0).unwrap();

    let mut e = lat.total_energy(params.field);
    let mut m = lat.magnetization();
    for _ in 0..2_000 {
        let info = lat.metropolis_step(&params, DeltaMode::ClosedForm, &mut rng).unwrap();
        e += info.delta_e;
        m += info.delta_m;
    }
    assert!((e - lat.total_energy(params.field)).abs() < 1e-6);
    assert_eq!(m, lat.magnetization());
}
