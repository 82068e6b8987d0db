use ndarray::{ArrayD, NdFloat};

use crate::autograd::{apply_single, Function};
use crate::error::GradFlowError;
use crate::ops::{check_arity, check_same_shape, output_grad};
use crate::variable::Variable;

const NAME: &str = "add";

/// Element-wise addition \( y = x_0 + x_1 \).
///
/// Both operands must have the same shape. The gradient flows through
/// unchanged to both addends: \( \frac{dL}{dx_0} = \frac{dL}{dx_1} = \frac{dL}{dy} \).
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl<A: NdFloat> Function<A> for Add {
    fn name(&self) -> &'static str {
        NAME
    }

    fn forward(&self, xs: &[&ArrayD<A>]) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(NAME, xs, 2)?;
        check_same_shape(NAME, xs[0], xs[1])?;
        Ok(vec![xs[0] + xs[1]])
    }

    fn backward(
        &self,
        xs: &[&ArrayD<A>],
        gys: &[Option<ArrayD<A>>],
    ) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(NAME, xs, 2)?;
        let gy = output_grad(NAME, gys, 0, xs[0].shape())?;
        Ok(vec![gy.clone(), gy.clone()])
    }
}

/// Adds two variables of the same shape.
///
/// Passing the same variable twice is allowed; its gradient then receives
/// both contributions.
///
/// # Errors
/// `GradFlowError::ShapeMismatch` if the shapes differ,
/// `GradFlowError::InvalidOperand` if either variable is empty.
pub fn add_op<A: NdFloat>(x0: &Variable<A>, x1: &Variable<A>) -> Result<Variable<A>, GradFlowError> {
    apply_single(Add, &[x0, x1])
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
