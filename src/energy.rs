//! Ising Hamiltonian `H = -J Σ_<ij> s_i s_j - h Σ_i s_i` on a periodic lattice.

use crate::config::DeltaMode;
use crate::lattice::Lattice;

impl Lattice {
    /// Interaction part of the site energy, `-J s_ij Σ_nb s_nb`, summed term by
    /// term over top, right, bottom, left.
    #[inline]
    fn site_interaction(&self, i: usize, j: usize) -> f64 {
        let s = self.spin(i, j).value();
        let mut energy = 0.0;
        for (a, b) in self.neighbors(i, j).sites() {
            energy += -self.coupling() * s * self.spin(a, b).value();
        }
        energy
    }

    /// Energy of every interaction site (i, j) takes part in:
    /// `-J s_ij Σ_nb s_nb - h s_ij`.
    ///
    /// Each bond is counted in full here, so summing this over all sites
    /// counts every bond twice.
    #[inline]
    pub fn site_energy(&self, i: usize, j: usize, field: f64) -> f64 {
        self.site_interaction(i, j) - field * self.spin(i, j).value()
    }

    /// Total energy from per-site energies. The bond part is halved because
    /// every bond was seen from both of its endpoints; the field term is a
    /// single-site term and is counted once.
    pub fn total_energy(&self, field: f64) -> f64 {
        let pairs: f64 = self.sites().map(|(i, j)| self.site_interaction(i, j)).sum();
        pairs / 2.0 - field * self.magnetization()
    }

    /// Total energy visiting each undirected bond exactly once (right and
    /// bottom neighbour of every site).
    pub fn bond_energy(&self, field: f64) -> f64 {
        let mut pairs = 0.0;
        for (i, j) in self.sites() {
            let s = self.spin(i, j).value();
            let nn = self.neighbors(i, j);
            let (ri, rj) = nn.right;
            let (bi, bj) = nn.bottom;
            pairs += -self.coupling() * s * self.spin(ri, rj).value();
            pairs += -self.coupling() * s * self.spin(bi, bj).value();
        }
        pairs - field * self.magnetization()
    }

    /// Signed sum of all spins, in [-N², N²].
    pub fn magnetization(&self) -> f64 {
        self.spins().iter().map(|s| *s as i8 as i64).sum::<i64>() as f64
    }

    /// Energy change caused by flipping (i, j). The lattice is left as it was.
    ///
    /// `FlipRecompute` flips, re-evaluates the site energy and flips back;
    /// `ClosedForm` uses `-2 · E_site` directly.
    pub fn delta_energy_of_flip(&mut self, i: usize, j: usize, field: f64, mode: DeltaMode) -> f64 {
        let before = self.site_energy(i, j, field);
        match mode {
            DeltaMode::FlipRecompute => {
                self.flip(i, j);
                let after = self.site_energy(i, j, field);
                self.flip(i, j);
                after - before
            }
            DeltaMode::ClosedForm => -2.0 * before,
        }
    }
}
