//! Glicko-2 volatility solver
//!
//! The new volatility is the root of a scalar equation in `x = ln(σ'²)`. The
//! root is bracketed and then refined with the Illinois variant of regula
//! falsi, as laid out in step 5 of Glickman's Glicko-2 paper.

use crate::error::{RatingError, Result, SolverStage};
use tracing::{debug, warn};

/// The function whose root gives the new volatility
///
/// All quantities live on the internal Glicko-2 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityEquation {
    /// Squared prior rating deviation (φ²)
    pub deviation_squared: f64,
    /// Estimated variance from game outcomes (v)
    pub variance: f64,
    /// Squared estimated improvement (Δ²)
    pub difference_squared: f64,
    /// ln(σ²) of the prior volatility
    pub alpha: f64,
    /// System constant
    pub tau: f64,
}

impl VolatilityEquation {
    pub fn new(deviation: f64, volatility: f64, difference: f64, variance: f64, tau: f64) -> Self {
        Self {
            deviation_squared: deviation * deviation,
            variance,
            difference_squared: difference * difference,
            alpha: (volatility * volatility).ln(),
            tau,
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        let ex = x.exp();
        let tmp = self.deviation_squared + self.variance + ex;
        ex * (self.difference_squared - tmp) / (2.0 * tmp * tmp)
            - (x - self.alpha) / (self.tau * self.tau)
    }

    /// Initial bracket `(a, b)` around the root
    fn bracket(&self, max_iterations: u32) -> Result<(f64, f64)> {
        let a = self.alpha;
        let excess = self.difference_squared - self.deviation_squared - self.variance;
        if excess > 0.0 {
            return Ok((a, excess.ln()));
        }

        let mut k = 1u32;
        while self.eval(a - f64::from(k) * self.tau) < 0.0 {
            if k >= max_iterations {
                warn!(iterations = k, "Volatility bracket search exhausted");
                return Err(RatingError::Convergence {
                    stage: SolverStage::Bracket,
                    iterations: max_iterations,
                });
            }
            k += 1;
        }
        Ok((a, a - f64::from(k) * self.tau))
    }

    /// Solve for the new volatility σ'
    pub fn solve(&self, epsilon: f64, max_iterations: u32) -> Result<f64> {
        let (mut a, mut b) = self.bracket(max_iterations)?;
        let mut f_a = self.eval(a);
        let mut f_b = self.eval(b);

        for iteration in 0..max_iterations {
            if (b - a).abs() <= epsilon {
                debug!(iterations = iteration, "Volatility solver converged");
                return Ok((a / 2.0).exp());
            }

            let c = a + (a - b) * f_a / (f_b - f_a);
            let f_c = self.eval(c);
            if !c.is_finite() || !f_c.is_finite() {
                warn!(iteration, "Volatility solver diverged");
                return Err(RatingError::Convergence {
                    stage: SolverStage::Illinois,
                    iterations: iteration + 1,
                });
            }
            // An exact root would leave `a` pinned and the bracket never shrinking
            if f_c == 0.0 {
                debug!(iterations = iteration + 1, "Volatility solver hit exact root");
                return Ok((c / 2.0).exp());
            }

            if f_c * f_b < 0.0 {
                a = b;
                f_a = f_b;
            } else {
                f_a /= 2.0;
            }
            b = c;
            f_b = f_c;
        }

        if (b - a).abs() <= epsilon {
            return Ok((a / 2.0).exp());
        }

        warn!(
            max_iterations,
            width = (b - a).abs(),
            "Volatility solver did not converge"
        );
        Err(RatingError::Convergence {
            stage: SolverStage::Illinois,
            iterations: max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Intermediate values of the worked example in Glickman's paper
    fn glickman_example() -> VolatilityEquation {
        VolatilityEquation::new(1.1513, 0.06, -0.4834, 1.7785, 0.5)
    }

    #[test]
    fn test_glickman_example() {
        let volatility = glickman_example().solve(1e-6, 100).unwrap();
        assert!((volatility - 0.05999).abs() < 1e-4);
    }

    #[test]
    fn test_large_improvement_uses_direct_bracket() {
        // Δ² exceeds φ² + v, so b = ln(Δ² − φ² − v)
        let equation = VolatilityEquation::new(0.5, 0.06, 3.0, 1.0, 0.5);
        let volatility = equation.solve(1e-6, 100).unwrap();

        assert!(volatility > 0.06);
        assert!(equation.eval(2.0 * volatility.ln()).abs() < 1e-4);
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let result = glickman_example().solve(1e-300, 2);
        assert_eq!(
            result,
            Err(RatingError::Convergence {
                stage: SolverStage::Illinois,
                iterations: 2,
            })
        );
    }

    #[test]
    fn test_bracket_cap_is_reported() {
        // Tight deviation and a wide tau keep f(a - τ) negative for one step
        let equation = VolatilityEquation::new(0.01, 1.0, 0.0, 0.01, 3.0);
        assert_eq!(
            equation.solve(1e-6, 1),
            Err(RatingError::Convergence {
                stage: SolverStage::Bracket,
                iterations: 1,
            })
        );

        let volatility = equation.solve(1e-6, 1000).unwrap();
        assert!((volatility - 0.17995).abs() < 1e-4);
        assert!(equation.eval(2.0 * volatility.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_exact_root_terminates() {
        // Inputs where an Illinois iterate can land exactly on the root
        let equation = VolatilityEquation::new(
            0.7489968969921021,
            0.4476041701999975,
            -3.0162777807520147,
            1.6302419456665287,
            1.9096489472881386,
        );
        let volatility = equation.solve(1e-6, 1000).unwrap();
        assert!(equation.eval(2.0 * volatility.ln()).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_solver_terminates_with_small_residual(
            deviation in 0.05f64..3.0,
            volatility in 0.005f64..0.5,
            difference in -20.0f64..20.0,
            variance in 0.01f64..500.0,
            tau in 0.1f64..3.0,
        ) {
            let equation = VolatilityEquation::new(deviation, volatility, difference, variance, tau);
            let result = equation.solve(1e-6, 1000);
            prop_assert!(result.is_ok(), "solver failed: {:?}", result);

            let new_volatility = result.unwrap();
            prop_assert!(new_volatility.is_finite() && new_volatility > 0.0);
            // f is dominated by (x - α) / τ², so scale the residual back by τ²
            let residual = equation.eval(2.0 * new_volatility.ln()).abs() * tau * tau;
            prop_assert!(residual < 1e-4, "residual {} too large", residual);
        }
    }
}
