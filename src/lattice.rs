//! Periodic N×N spin lattice.

use crate::error::IsingError;
use rand::Rng;

/// Elementary ±1 state of one lattice site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Spin {
    Down = -1,
    Up = 1,
}

impl Spin {
    #[inline(always)]
    pub fn value(self) -> f64 {
        self as i8 as f64
    }

    #[inline(always)]
    pub fn flipped(self) -> Self {
        match self {
            Spin::Down => Spin::Up,
            Spin::Up => Spin::Down,
        }
    }
}

impl TryFrom<i8> for Spin {
    type Error = IsingError;
    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Spin::Down),
            1 => Ok(Spin::Up),
            _ => Err(IsingError::InvalidSpin(v)),
        }
    }
}

/// The four periodic nearest neighbours of a site, as (row, col) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborSet {
    pub top: (usize, usize),
    pub bottom: (usize, usize),
    pub left: (usize, usize),
    pub right: (usize, usize),
}

impl NeighborSet {
    /// Neighbours of (i, j) on an `n`×`n` torus. Pure function of (i, j, n).
    #[inline]
    pub fn of(i: usize, j: usize, n: usize) -> Self {
        Self {
            top: ((i + n - 1) % n, j),
            bottom: ((i + 1) % n, j),
            left: (i, (j + n - 1) % n),
            right: (i, (j + 1) % n),
        }
    }

    pub fn sites(&self) -> [(usize, usize); 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

/// Lattice state partitioned by spin sign, handed to visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeSnapshot {
    pub temperature: f64,
    /// Elementary moves performed at this temperature when the snapshot was taken.
    pub moves: usize,
    pub size: usize,
    pub up: Vec<(usize, usize)>,
    pub down: Vec<(usize, usize)>,
}

/// N×N torus of spins with coupling constant J.
///
/// Spins are stored row-major: site (i, j) lives at `i * n + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    n: usize,
    coupling: f64,
    spins: Vec<Spin>,
}

impl Lattice {
    /// Fully ordered (all up) lattice. Sizes below 2 are rejected because every
    /// neighbour of the single site of a 1×1 torus is the site itself.
    pub fn new(n: usize, coupling: f64) -> Result<Self, IsingError> {
        if n < 2 {
            return Err(IsingError::InvalidConfig(format!(
                "lattice size must be >= 2, got {n}"
            )));
        }
        if !coupling.is_finite() {
            return Err(IsingError::InvalidConfig(format!(
                "coupling must be finite, got {coupling}"
            )));
        }
        Ok(Self { n, coupling, spins: vec![Spin::Up; n * n] })
    }

    /// Lattice with every site independently ±1 with probability ½.
    pub fn random_with(rng: &mut impl Rng, n: usize, coupling: f64) -> Result<Self, IsingError> {
        let mut lattice = Self::new(n, coupling)?;
        lattice.initialize(rng);
        Ok(lattice)
    }

    /// Build from raw row-major values, each of which must be -1 or +1.
    pub fn from_values(n: usize, coupling: f64, values: &[i8]) -> Result<Self, IsingError> {
        let mut lattice = Self::new(n, coupling)?;
        if values.len() != n * n {
            return Err(IsingError::InvalidConfig(format!(
                "expected {} spin values, got {}",
                n * n,
                values.len()
            )));
        }
        for (slot, &v) in lattice.spins.iter_mut().zip(values) {
            *slot = Spin::try_from(v)?;
        }
        Ok(lattice)
    }

    /// Reassign every site independently to +1 or -1.
    pub fn initialize(&mut self, rng: &mut impl Rng) {
        for s in &mut self.spins {
            *s = if rng.gen::<f64>() < 0.5 { Spin::Down } else { Spin::Up };
        }
    }

    pub fn fill(&mut self, spin: Spin) {
        self.spins.fill(spin);
    }

    /// Side length N.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of sites N².
    #[inline(always)]
    pub fn n_sites(&self) -> usize {
        self.spins.len()
    }

    #[inline(always)]
    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    #[inline(always)]
    pub fn spin(&self, i: usize, j: usize) -> Spin {
        self.spins[i * self.n + j]
    }

    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    /// Invert the spin at (i, j) in place.
    #[inline(always)]
    pub fn flip(&mut self, i: usize, j: usize) {
        let s = &mut self.spins[i * self.n + j];
        *s = s.flipped();
    }

    #[inline]
    pub fn neighbors(&self, i: usize, j: usize) -> NeighborSet {
        NeighborSet::of(i, j, self.n)
    }

    /// Iterate over all (row, col) pairs in row-major order.
    pub fn sites(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |i| (0..self.n).map(move |j| (i, j)))
    }

    pub fn snapshot(&self, temperature: f64, moves: usize) -> LatticeSnapshot {
        let (up, down): (Vec<_>, Vec<_>) = self.sites().partition(|&(i, j)| self.spin(i, j) == Spin::Up);
        LatticeSnapshot { temperature, moves, size: self.n, up, down }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraparound_on_3x3() {
        let nn = NeighborSet::of(0, 0, 3);
        assert_eq!(nn.top, (2, 0));
        assert_eq!(nn.bottom, (1, 0));
        assert_eq!(nn.left, (0, 2));
        assert_eq!(nn.right, (0, 1));

        let nn = NeighborSet::of(2, 2, 3);
        assert_eq!(nn.bottom, (0, 2));
        assert_eq!(nn.right, (2, 0));
    }

    #[test]
    fn test_spin_try_from() {
        assert_eq!(Spin::try_from(1), Ok(Spin::Up));
        assert_eq!(Spin::try_from(-1), Ok(Spin::Down));
        assert_eq!(Spin::try_from(0), Err(IsingError::InvalidSpin(0)));
    }

    #[test]
    fn test_snapshot_partition() {
        let lat = Lattice::from_values(2, 1.0, &[1, -1, -1, 1]).unwrap();
        let snap = lat.snapshot(2.0, 7);
        assert_eq!(snap.up, vec![(0, 0), (1, 1)]);
        assert_eq!(snap.down, vec![(0, 1), (1, 0)]);
        assert_eq!(snap.moves, 7);
        assert_eq!(snap.size, 2);
    }
}
