//! Finite-difference helpers for cross-checking analytic gradients.

use approx::relative_eq;
use ndarray::{ArrayD, NdFloat};
use num_traits::NumCast;
use thiserror::Error;

use crate::autograd::config::no_grad_scope;
use crate::error::GradFlowError;
use crate::variable::Variable;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed at element {element_index}: analytical grad {analytical_grad:?} != numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Input has no gradient after the backward pass.")]
    MissingAnalyticalGrad,

    #[error("Numerical gradient is NaN or infinite at element {element_index}. Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNotFinite {
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Engine error during gradient check: {0}")]
    Engine(GradFlowError),
}

impl From<GradFlowError> for GradCheckError {
    fn from(err: GradFlowError) -> Self {
        GradCheckError::Engine(err)
    }
}

fn value_of<A: NdFloat>(var: &Variable<A>, what: &str) -> Result<ArrayD<A>, GradFlowError> {
    var.data()
        .ok_or_else(|| GradFlowError::InvalidOperand(format!("{} is empty", what)))
}

/// Central-difference derivative `(f(x + eps) - f(x - eps)) / 2eps`.
///
/// Every element of `x` is shifted at once, so the result is the derivative
/// only for element-wise `f`. Evaluated with recording disabled.
pub fn numerical_diff<A, F>(f: F, x: &Variable<A>, eps: A) -> Result<ArrayD<A>, GradFlowError>
where
    A: NdFloat,
    F: Fn(&Variable<A>) -> Result<Variable<A>, GradFlowError>,
{
    let data = value_of(x, "numerical_diff input")?;
    no_grad_scope(|| {
        let x0 = Variable::new(data.mapv(|v| v - eps));
        let x1 = Variable::new(data.mapv(|v| v + eps));
        let y0 = value_of(&f(&x0)?, "f(x - eps)")?;
        let y1 = value_of(&f(&x1)?, "f(x + eps)")?;
        if y0.shape() != y1.shape() {
            return Err(GradFlowError::ShapeMismatch {
                expected: y0.shape().to_vec(),
                actual: y1.shape().to_vec(),
                operation: "numerical_diff".to_string(),
            });
        }
        let two_eps = eps + eps;
        Ok((y1 - &y0).mapv(|v| v / two_eps))
    })
}

/// Compares the gradient computed by `backward` with a per-element
/// finite-difference estimate of \( \frac{d}{dx} \sum f(x) \).
///
/// `x` must be a leaf; its gradient is cleared first and holds the analytic
/// gradient afterwards.
pub fn check_grad<A, F>(
    f: F,
    x: &Variable<A>,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    A: NdFloat,
    F: Fn(&Variable<A>) -> Result<Variable<A>, GradFlowError>,
{
    if !x.is_leaf() {
        return Err(GradFlowError::InvalidOperand(
            "check_grad input must be a leaf variable".to_string(),
        )
        .into());
    }
    let data = value_of(x, "check_grad input")?;
    let eps = <A as NumCast>::from(epsilon).ok_or_else(|| {
        GradFlowError::InvalidOperand(format!("epsilon {} is not representable", epsilon))
    })?;

    x.cleargrad();
    f(x)?.backward(false)?;
    let analytical = x.grad().ok_or(GradCheckError::MissingAnalyticalGrad)?;

    let loss_at = |values: ArrayD<A>| -> Result<f64, GradFlowError> {
        let y = no_grad_scope(|| f(&Variable::new(values)))?;
        let total = value_of(&y, "check_grad output")?.sum();
        Ok(total.to_f64().unwrap_or(f64::NAN))
    };

    for (element_index, analytical_grad) in analytical.iter().enumerate() {
        let mut plus = data.clone();
        let mut minus = data.clone();
        if let Some(v) = plus.iter_mut().nth(element_index) {
            *v += eps;
        }
        if let Some(v) = minus.iter_mut().nth(element_index) {
            *v -= eps;
        }
        let loss_plus = loss_at(plus)?;
        let loss_minus = loss_at(minus)?;
        let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
        if !numerical_grad.is_finite() {
            return Err(GradCheckError::NumericalGradNotFinite {
                element_index,
                loss_plus,
                loss_minus,
            });
        }

        let analytical_grad = analytical_grad.to_f64().unwrap_or(f64::NAN);
        if !relative_eq!(
            analytical_grad,
            numerical_grad,
            epsilon = tolerance,
            max_relative = tolerance
        ) {
            return Err(GradCheckError::GradientMismatch {
                element_index,
                analytical_grad,
                numerical_grad,
                difference: (analytical_grad - numerical_grad).abs(),
            });
        }
    }
    log::debug!("Gradient check passed for {} element(s)", analytical.len());
    Ok(())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
