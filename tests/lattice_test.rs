use ising::{IsingError, Lattice, NeighborSet, Spin};
use rand::SeedableRng;
use rand_pcg::Pcg64;

#[test]
fn test_neighbors_in_range_and_not_self() {
    for n in 2..=7 {
        for i in 0..n {
            for j in 0..n {
                for (a, b) in NeighborSet::of(i, j, n).sites() {
                    assert!(a < n && b < n, "neighbor ({a}, {b}) out of range for N={n}");
                    assert_ne!((a, b), (i, j), "site ({i}, {j}) is its own neighbor for N={n}");
                }
            }
        }
    }
}

#[test]
fn test_neighbors_pairwise_distinct() {
    // On a 2×2 torus top/bottom and left/right coincide, so distinctness
    // only holds from N = 3 up.
    for n in 3..=7 {
        for i in 0..n {
            for j in 0..n {
                let sites = NeighborSet::of(i, j, n).sites();
                for a in 0..4 {
                    for b in (a + 1)..4 {
                        assert_ne!(sites[a], sites[b], "duplicate neighbor of ({i}, {j}), N={n}");
                    }
                }
            }
        }
    }
}

#[test]
fn test_neighbor_relation_is_symmetric() {
    for n in 2..=7 {
        for i in 0..n {
            for j in 0..n {
                for (a, b) in NeighborSet::of(i, j, n).sites() {
                    let back = NeighborSet::of(a, b, n).sites();
                    assert!(back.contains(&(i, j)), "({i}, {j}) missing from neighbors of ({a}, {b}), N={n}");
                }
            }
        }
    }
}

#[test]
fn test_small_lattices_rejected() {
    for n in [0, 1] {
        match Lattice::new(n, 1.0) {
            Err(IsingError::InvalidConfig(_)) => {}
            other => panic!("N={n} should be rejected, got {other:?}"),
        }
    }
    assert!(Lattice::new(4, f64::NAN).is_err());
}

#[test]
fn test_from_values_validates_spins() {
    assert_eq!(
        Lattice::from_values(2, 1.0, &[1, -1, 0, 1]),
        Err(IsingError::InvalidSpin(0))
    );
    assert!(Lattice::from_values(2, 1.0, &[1, -1, 1]).is_err());
}

#[test]
fn test_initialize_is_roughly_balanced() {
    let mut rng = Pcg64::seed_from_u64(42);
    let lat = Lattice::random_with(&mut rng, 64, 1.0).unwrap();
    let up = lat.spins().iter().filter(|s| **s == Spin::Up).count();
    let frac = up as f64 / lat.n_sites() as f64;
    assert!((0.45..=0.55).contains(&frac), "fraction of up spins {frac:.3}");

    // A second draw must not reproduce the first.
    let again = Lattice::random_with(&mut rng, 64, 1.0).unwrap();
    assert_ne!(lat, again);
}

#[test]
fn test_double_flip_restores_lattice() {
    let mut rng = Pcg64::seed_from_u64(7);
    let mut lat = Lattice::random_with(&mut rng, 5, 1.0).unwrap();
    let original = lat.clone();
    for (i, j) in original.sites() {
        lat.flip(i, j);
        assert_ne!(lat.spin(i, j), original.spin(i, j));
        lat.flip(i, j);
    }
    assert_eq!(lat, original);
}
