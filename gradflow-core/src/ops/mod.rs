//! # Differentiable operations (`ops`)
//!
//! Each operation is a small struct implementing
//! [`Function`](crate::autograd::Function) plus an `xxx_op` free function that
//! runs it through [`apply_single`](crate::autograd::apply_single).
//!
//! ## Key Submodules:
//!
//! - [`arithmetic`]: element-wise binary operations (add, mul).
//! - [`math_elem`]: element-wise unary functions (square, exp, pow).
//!
//! The helpers below validate what the forward and backward rules receive so
//! that malformed calls surface as `GradFlowError`s instead of ndarray panics.

use ndarray::{ArrayD, NdFloat};

use crate::error::GradFlowError;

pub mod arithmetic;
pub mod math_elem;

pub use arithmetic::{add_op, mul_op, Add, Mul};
pub use math_elem::{exp_op, pow_op, square_op, Exp, Pow, Square};

/// Checks that a rule received exactly `expected` values.
pub(crate) fn check_arity<T>(
    op: &'static str,
    values: &[T],
    expected: usize,
) -> Result<(), GradFlowError> {
    if values.len() != expected {
        return Err(GradFlowError::ArityMismatch {
            op,
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Checks that two operands of an element-wise binary op share one shape.
pub(crate) fn check_same_shape<A: NdFloat>(
    op: &'static str,
    a: &ArrayD<A>,
    b: &ArrayD<A>,
) -> Result<(), GradFlowError> {
    if a.shape() != b.shape() {
        return Err(GradFlowError::ShapeMismatch {
            expected: a.shape().to_vec(),
            actual: b.shape().to_vec(),
            operation: op.to_string(),
        });
    }
    Ok(())
}

/// Fetches the gradient of output `index`, which must have `shape`.
pub(crate) fn output_grad<'a, A: NdFloat>(
    op: &'static str,
    gys: &'a [Option<ArrayD<A>>],
    index: usize,
    shape: &[usize],
) -> Result<&'a ArrayD<A>, GradFlowError> {
    let gy = gys
        .get(index)
        .and_then(Option::as_ref)
        .ok_or_else(|| {
            GradFlowError::InvalidOperand(format!(
                "'{}' has no gradient for output {}",
                op, index
            ))
        })?;
    if gy.shape() != shape {
        return Err(GradFlowError::ShapeMismatch {
            expected: shape.to_vec(),
            actual: gy.shape().to_vec(),
            operation: format!("{} backward", op),
        });
    }
    Ok(gy)
}
