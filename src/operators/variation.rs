//! Real-valued variation operators.
//!
//! Offspring are always fresh, unevaluated [`Solution`]s; parents are never
//! modified. Every operator clamps its results into the variable bounds.
//!
//! # Operators
//!
//! - [`Sbx`]: simulated binary crossover (arity 2)
//! - [`De`]: differential evolution, rand/1/bin (arity 4)
//! - [`Pm`]: polynomial mutation (arity 1)
//! - [`Um`]: uniform mutation (arity 1)
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Storn & Price (1997), "Differential Evolution — A Simple and Efficient
//!   Heuristic for Global Optimization over Continuous Spaces"
//! - Deb & Goyal (1996), "A Combined Genetic Adaptive Search (GeneAS) for
//!   Engineering Design"

use rand::Rng;

use crate::core::Solution;
use crate::error::ConfigError;

const EPS: f64 = 1.0e-14;

/// Simulated binary crossover.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sbx {
    /// Probability of recombining a pair of parents.
    pub rate: f64,
    /// Distribution index; larger values keep children near their parents.
    pub distribution_index: f64,
}

impl Default for Sbx {
    fn default() -> Self {
        Self {
            rate: 1.0,
            distribution_index: 15.0,
        }
    }
}

/// Differential evolution (rand/1/bin).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct De {
    pub crossover_rate: f64,
    pub step_size: f64,
}

impl Default for De {
    fn default() -> Self {
        Self {
            crossover_rate: 0.1,
            step_size: 0.5,
        }
    }
}

/// Polynomial mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pm {
    /// Per-variable mutation probability.
    pub rate: f64,
    pub distribution_index: f64,
}

impl Pm {
    /// Mutates one variable on average: rate `1 / variables`.
    pub fn for_variables(variables: usize) -> Self {
        Self {
            rate: 1.0 / variables.max(1) as f64,
            distribution_index: 20.0,
        }
    }
}

/// Uniform mutation: replaces a variable by a uniform draw within bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Um {
    /// Per-variable mutation probability.
    pub rate: f64,
}

impl Um {
    /// Mutates one variable on average: rate `1 / variables`.
    pub fn for_variables(variables: usize) -> Self {
        Self {
            rate: 1.0 / variables.max(1) as f64,
        }
    }
}

/// A variation strategy: one of the built-in operator pipelines.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variation {
    /// SBX followed by polynomial mutation of both children.
    SbxPm(Sbx, Pm),
    /// Differential evolution followed by polynomial mutation.
    DePm(De, Pm),
    /// Polynomial mutation alone.
    Pm(Pm),
    /// Uniform mutation alone.
    Um(Um),
}

impl Variation {
    /// Number of parents consumed by [`evolve`](Self::evolve).
    pub fn arity(&self) -> usize {
        match self {
            Variation::SbxPm(..) => 2,
            Variation::DePm(..) => 4,
            Variation::Pm(_) | Variation::Um(_) => 1,
        }
    }

    /// Short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Variation::SbxPm(..) => "sbx+pm",
            Variation::DePm(..) => "de+pm",
            Variation::Pm(_) => "pm",
            Variation::Um(_) => "um",
        }
    }

    /// Checks rates and indices.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate_ok = |r: f64| (0.0..=1.0).contains(&r);
        let pm_ok = |pm: &Pm| rate_ok(pm.rate) && pm.distribution_index >= 0.0;
        let ok = match self {
            Variation::SbxPm(sbx, pm) => {
                rate_ok(sbx.rate) && sbx.distribution_index >= 0.0 && pm_ok(pm)
            }
            Variation::DePm(de, pm) => {
                rate_ok(de.crossover_rate) && de.step_size.is_finite() && pm_ok(pm)
            }
            Variation::Pm(pm) => pm_ok(pm),
            Variation::Um(um) => rate_ok(um.rate),
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidOperator(format!("{self:?}")))
        }
    }

    /// Produces unevaluated offspring from `parents`.
    ///
    /// # Panics
    /// Panics if fewer than [`arity`](Self::arity) parents are given.
    pub fn evolve<R: Rng>(
        &self,
        parents: &[&Solution],
        bounds: &[(f64, f64)],
        rng: &mut R,
    ) -> Vec<Solution> {
        assert!(
            parents.len() >= self.arity(),
            "{} needs {} parents, got {}",
            self.name(),
            self.arity(),
            parents.len()
        );

        match self {
            Variation::SbxPm(sbx, pm) => {
                let mut c1 = parents[0].variables().to_vec();
                let mut c2 = parents[1].variables().to_vec();
                sbx_crossover(&mut c1, &mut c2, sbx, bounds, rng);
                polynomial_mutation(&mut c1, pm, bounds, rng);
                polynomial_mutation(&mut c2, pm, bounds, rng);
                vec![Solution::new(c1), Solution::new(c2)]
            }
            Variation::DePm(de, pm) => {
                let mut child = differential_evolution(parents, de, bounds, rng);
                polynomial_mutation(&mut child, pm, bounds, rng);
                vec![Solution::new(child)]
            }
            Variation::Pm(pm) => {
                let mut child = parents[0].variables().to_vec();
                polynomial_mutation(&mut child, pm, bounds, rng);
                vec![Solution::new(child)]
            }
            Variation::Um(um) => {
                let mut child = parents[0].variables().to_vec();
                uniform_mutation(&mut child, um, bounds, rng);
                vec![Solution::new(child)]
            }
        }
    }
}

/// SBX on two decision vectors, in place.
pub fn sbx_crossover<R: Rng>(
    x1: &mut [f64],
    x2: &mut [f64],
    sbx: &Sbx,
    bounds: &[(f64, f64)],
    rng: &mut R,
) {
    if rng.random::<f64>() > sbx.rate {
        return;
    }

    let exponent = 1.0 / (sbx.distribution_index + 1.0);
    let spread = |u: f64| {
        if u <= 0.5 {
            (2.0 * u).powf(exponent)
        } else {
            (0.5 / (1.0 - u)).powf(exponent)
        }
    };

    for (i, &(lb, ub)) in bounds.iter().enumerate() {
        if !rng.random_bool(0.5) {
            continue;
        }
        let (a, b) = (x1[i], x2[i]);
        let dx = (b - a).abs();
        if dx <= EPS {
            continue;
        }

        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let beta_l = 1.0 + 2.0 * (lo - lb) / dx;
        let beta_u = 1.0 + 2.0 * (ub - hi) / dx;
        // symmetric distribution
        let beta = beta_l.min(beta_u);
        let alpha = 1.0 - 1.0 / (2.0 * beta.powf(sbx.distribution_index + 1.0));

        let u = rng.random::<f64>() * alpha;
        let bq = spread(u);

        let mut v1 = 0.5 * (lo + hi - bq * dx);
        let mut v2 = 0.5 * (lo + hi + bq * dx);
        if rng.random_bool(0.5) {
            std::mem::swap(&mut v1, &mut v2);
        }

        x1[i] = v1.clamp(lb, ub);
        x2[i] = v2.clamp(lb, ub);
    }
}

/// Polynomial mutation of a decision vector, in place.
pub fn polynomial_mutation<R: Rng>(x: &mut [f64], pm: &Pm, bounds: &[(f64, f64)], rng: &mut R) {
    let exponent = 1.0 / (pm.distribution_index + 1.0);

    for (xi, &(lb, ub)) in x.iter_mut().zip(bounds) {
        if rng.random::<f64>() > pm.rate {
            continue;
        }
        let dx = ub - lb;
        if dx <= 0.0 {
            continue;
        }

        let u = rng.random::<f64>();
        let delta = if u < 0.5 {
            let bl = (*xi - lb) / dx;
            let b = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - bl).powf(pm.distribution_index + 1.0);
            b.powf(exponent) - 1.0
        } else {
            let bu = (ub - *xi) / dx;
            let b = 2.0 * (1.0 - u)
                + 2.0 * (u - 0.5) * (1.0 - bu).powf(pm.distribution_index + 1.0);
            1.0 - b.powf(exponent)
        };

        *xi = (*xi + delta * dx).clamp(lb, ub);
    }
}

/// Uniform mutation of a decision vector, in place.
pub fn uniform_mutation<R: Rng>(x: &mut [f64], um: &Um, bounds: &[(f64, f64)], rng: &mut R) {
    for (xi, &(lb, ub)) in x.iter_mut().zip(bounds) {
        if rng.random::<f64>() <= um.rate && ub > lb {
            *xi = rng.random_range(lb..ub);
        }
    }
}

/// DE rand/1/bin: `parents[3] + F * (parents[1] - parents[2])`, crossed
/// over with `parents[0]`.
pub fn differential_evolution<R: Rng>(
    parents: &[&Solution],
    de: &De,
    bounds: &[(f64, f64)],
    rng: &mut R,
) -> Vec<f64> {
    let base = parents[0].variables();
    let (d1, d2, target) = (
        parents[1].variables(),
        parents[2].variables(),
        parents[3].variables(),
    );
    let mut child = base.to_vec();
    if child.is_empty() {
        return child;
    }
    let forced = rng.random_range(0..child.len());

    for (j, &(lb, ub)) in bounds.iter().enumerate() {
        if j == forced || rng.random::<f64>() <= de.crossover_rate {
            child[j] = (target[j] + de.step_size * (d1[j] - d2[j])).clamp(lb, ub);
        }
    }
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn parent(values: &[f64]) -> Solution {
        Solution::evaluated(values.to_vec(), vec![0.0], vec![])
    }

    fn unit_bounds(n: usize) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); n]
    }

    #[test]
    fn test_arity() {
        let n = 5;
        assert_eq!(Variation::SbxPm(Sbx::default(), Pm::for_variables(n)).arity(), 2);
        assert_eq!(Variation::DePm(De::default(), Pm::for_variables(n)).arity(), 4);
        assert_eq!(Variation::Pm(Pm::for_variables(n)).arity(), 1);
        assert_eq!(Variation::Um(Um::for_variables(n)).arity(), 1);
    }

    #[test]
    fn test_offspring_respect_bounds() {
        let mut rng = create_rng(42);
        let bounds = unit_bounds(6);
        let parents = [
            parent(&[0.0, 0.1, 0.5, 0.9, 1.0, 0.3]),
            parent(&[1.0, 0.9, 0.4, 0.0, 0.2, 0.3]),
            parent(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.5]),
            parent(&[0.2, 0.8, 0.2, 0.8, 0.2, 0.8]),
        ];
        let refs: Vec<&Solution> = parents.iter().collect();

        let operators = [
            Variation::SbxPm(Sbx::default(), Pm::for_variables(6)),
            Variation::DePm(De::default(), Pm::for_variables(6)),
            Variation::Pm(Pm {
                rate: 1.0,
                distribution_index: 20.0,
            }),
            Variation::Um(Um { rate: 1.0 }),
        ];

        for op in operators {
            for _ in 0..200 {
                let children = op.evolve(&refs, &bounds, &mut rng);
                assert!(!children.is_empty());
                for child in &children {
                    assert!(!child.is_evaluated());
                    assert_eq!(child.variables().len(), 6);
                    assert!(
                        child.variables().iter().all(|v| (0.0..=1.0).contains(v)),
                        "{} produced out-of-bounds {:?}",
                        op.name(),
                        child.variables()
                    );
                }
            }
        }
    }

    #[test]
    fn test_sbx_disabled_keeps_parents() {
        let mut rng = create_rng(1);
        let mut a = vec![0.2, 0.4];
        let mut b = vec![0.8, 0.6];
        let sbx = Sbx {
            rate: 0.0,
            distribution_index: 15.0,
        };
        sbx_crossover(&mut a, &mut b, &sbx, &unit_bounds(2), &mut rng);
        assert_eq!(a, vec![0.2, 0.4]);
        assert_eq!(b, vec![0.8, 0.6]);
    }

    #[test]
    fn test_pm_zero_rate_is_identity() {
        let mut rng = create_rng(3);
        let mut x = vec![0.3, 0.7];
        let pm = Pm {
            rate: 0.0,
            distribution_index: 20.0,
        };
        polynomial_mutation(&mut x, &pm, &unit_bounds(2), &mut rng);
        assert_eq!(x, vec![0.3, 0.7]);
    }

    #[test]
    fn test_de_changes_at_least_one_variable() {
        let mut rng = create_rng(5);
        let parents = [
            parent(&[0.5, 0.5, 0.5]),
            parent(&[0.9, 0.9, 0.9]),
            parent(&[0.1, 0.1, 0.1]),
            parent(&[0.2, 0.2, 0.2]),
        ];
        let refs: Vec<&Solution> = parents.iter().collect();
        let de = De {
            crossover_rate: 0.0,
            step_size: 0.5,
        };
        let child = differential_evolution(&refs, &de, &unit_bounds(3), &mut rng);
        let changed = child.iter().filter(|&&v| (v - 0.6).abs() < 1e-12).count();
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_um_full_rate_resamples() {
        let mut rng = create_rng(9);
        let mut x = vec![5.0; 50];
        uniform_mutation(&mut x, &Um { rate: 1.0 }, &vec![(0.0, 1.0); 50], &mut rng);
        assert!(x.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_validate() {
        assert!(Variation::Um(Um { rate: 0.5 }).validate().is_ok());
        assert!(Variation::Um(Um { rate: 1.5 }).validate().is_err());
        assert!(Variation::SbxPm(
            Sbx {
                rate: 1.0,
                distribution_index: -1.0
            },
            Pm::for_variables(2)
        )
        .validate()
        .is_err());
    }

    #[test]
    #[should_panic(expected = "de+pm needs 4 parents")]
    fn test_too_few_parents_panics() {
        let mut rng = create_rng(0);
        let p = parent(&[0.5]);
        Variation::DePm(De::default(), Pm::for_variables(1)).evolve(&[&p], &unit_bounds(1), &mut rng);
    }
}
