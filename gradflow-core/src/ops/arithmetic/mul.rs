use ndarray::{ArrayD, NdFloat};

use crate::autograd::{apply_single, Function};
use crate::error::GradFlowError;
use crate::ops::{check_arity, check_same_shape, output_grad};
use crate::variable::Variable;

const NAME: &str = "mul";

/// Element-wise product \( y = x_0 \cdot x_1 \).
///
/// Backward: \( \frac{dL}{dx_0} = \frac{dL}{dy} \cdot x_1 \) and
/// \( \frac{dL}{dx_1} = \frac{dL}{dy} \cdot x_0 \).
#[derive(Debug, Clone, Copy, Default)]
pub struct Mul;

impl<A: NdFloat> Function<A> for Mul {
    fn name(&self) -> &'static str {
        NAME
    }

    fn forward(&self, xs: &[&ArrayD<A>]) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(NAME, xs, 2)?;
        check_same_shape(NAME, xs[0], xs[1])?;
        Ok(vec![xs[0] * xs[1]])
    }

    fn backward(
        &self,
        xs: &[&ArrayD<A>],
        gys: &[Option<ArrayD<A>>],
    ) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(NAME, xs, 2)?;
        let gy = output_grad(NAME, gys, 0, xs[0].shape())?;
        Ok(vec![gy * xs[1], gy * xs[0]])
    }
}

/// Multiplies two variables of the same shape element-wise.
pub fn mul_op<A: NdFloat>(x0: &Variable<A>, x1: &Variable<A>) -> Result<Variable<A>, GradFlowError> {
    apply_single(Mul, &[x0, x1])
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
