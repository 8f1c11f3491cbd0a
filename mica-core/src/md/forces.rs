//! Pairwise force and potential-energy evaluation.

use super::boundary::minimum_image;
use super::potential::LennardJones;
use crate::types::Vec3;

/// Forces on every particle plus the total potential energy, produced by a
/// single pass over all pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceEvaluation {
    /// Force vector per particle, same ordering as the positions.
    pub forces: Vec<Vec3>,
    /// Total shifted potential energy summed over interacting pairs.
    pub potential_energy: f64,
}

/// Evaluate forces and potential energy over all particle pairs.
///
/// Separations use the minimum-image convention; pairs at or beyond the
/// cutoff contribute nothing. Newton's third law halves the work: each pair
/// is visited once and the force applied to both members with opposite sign.
pub fn compute_forces(
    positions: &[Vec3],
    potential: &LennardJones,
    box_length: f64,
) -> ForceEvaluation {
    let n = positions.len();
    let mut forces = vec![Vec3::zeros(); n];
    let mut potential_energy = 0.0;

    for i in 0..n {
        for j in (i + 1)..n {
            let delta = minimum_image(positions[i] - positions[j], box_length);
            let r_squared = delta.norm_squared();
            if r_squared < potential.cutoff_squared() {
                let r = r_squared.sqrt();
                let pair_force = delta * (potential.shifted_force(r) / r);
                forces[i] += pair_force;
                forces[j] -= pair_force;
                potential_energy += potential.shifted_energy(r);
            }
        }
    }

    ForceEvaluation {
        forces,
        potential_energy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lj() -> LennardJones {
        LennardJones::new(1.0, 1.0, 2.5)
    }

    #[test]
    fn two_atoms_repel_at_sigma() {
        let positions = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        let eval = compute_forces(&positions, &lj(), 20.0);

        let expected = lj().shifted_force(1.0);
        assert!(expected > 0.0);
        assert!((eval.forces[0].x + expected).abs() < 1e-12);
        assert!((eval.forces[1].x - expected).abs() < 1e-12);
        assert!(eval.forces[0].y.abs() < 1e-14);
        assert!((eval.potential_energy - lj().shifted_energy(1.0)).abs() < 1e-12);
    }

    #[test]
    fn opposite_forces_on_each_pair_member() {
        let positions = vec![Vec3::new(0.1, 0.2, 0.3), Vec3::new(1.0, 1.1, 0.9)];
        let eval = compute_forces(&positions, &lj(), 20.0);
        assert!((eval.forces[0] + eval.forces[1]).norm() < 1e-12);
    }

    #[test]
    fn no_interaction_beyond_cutoff() {
        let positions = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.6, 0.0, 0.0)];
        let eval = compute_forces(&positions, &lj(), 20.0);
        assert!(eval.forces[0].norm() < 1e-14);
        assert!(eval.potential_energy.abs() < 1e-14);
    }

    #[test]
    fn pair_exactly_at_cutoff_excluded() {
        let positions = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.5, 0.0, 0.0)];
        let eval = compute_forces(&positions, &lj(), 20.0);
        assert!(eval.forces[0].norm() < 1e-14);
        assert!(eval.potential_energy.abs() < 1e-14);
    }

    #[test]
    fn net_force_vanishes() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.1, 0.2, 0.0),
            Vec3::new(0.4, 1.0, 0.7),
        ];
        let eval = compute_forces(&positions, &lj(), 20.0);
        let net: Vec3 = eval.forces.iter().sum();
        assert!(net.norm() < 1e-12);
    }

    #[test]
    fn energy_sums_over_pairs() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.2, 0.0, 0.0),
            Vec3::new(2.4, 0.0, 0.0),
        ];
        let eval = compute_forces(&positions, &lj(), 20.0);
        let expected = 2.0 * lj().shifted_energy(1.2) + lj().shifted_energy(2.4);
        assert!((eval.potential_energy - expected).abs() < 1e-12);
    }

    #[test]
    fn interacts_through_periodic_boundary() {
        // Direct separation 6.0 is outside the cutoff; the image distance 0.8
        // is deep in the repulsive region.
        let box_length = 6.8;
        let positions = vec![Vec3::new(0.5, 3.0, 3.0), Vec3::new(6.5, 3.0, 3.0)];
        let eval = compute_forces(&positions, &lj(), box_length);

        let expected = lj().shifted_force(0.8);
        assert!(expected > 0.0);
        assert!((eval.forces[0].x - expected).abs() < 1e-12);
        assert!((eval.forces[1].x + expected).abs() < 1e-12);
    }

    #[test]
    fn force_matches_energy_gradient() {
        let h = 1e-6;
        let base = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.5, 0.0, 0.0)];
        let eval = compute_forces(&base, &lj(), 20.0);

        let mut plus = base.clone();
        plus[0].x += h;
        let mut minus = base.clone();
        minus[0].x -= h;
        let numeric = -(compute_forces(&plus, &lj(), 20.0).potential_energy
            - compute_forces(&minus, &lj(), 20.0).potential_energy)
            / (2.0 * h);

        assert!((eval.forces[0].x - numeric).abs() < 1e-5);
    }
}
