use ndarray::{ArrayD, NdFloat};

use crate::autograd::{apply_single, Function};
use crate::error::GradFlowError;
use crate::ops::{check_arity, output_grad};
use crate::variable::Variable;

const NAME: &str = "square";

/// Element-wise square \( y = x^2 \).
///
/// The input value is needed by the backward rule,
/// \( \frac{dL}{dx} = 2x \cdot \frac{dL}{dy} \); it is read from the
/// recorded input variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl<A: NdFloat> Function<A> for Square {
    fn name(&self) -> &'static str {
        NAME
    }

    fn forward(&self, xs: &[&ArrayD<A>]) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(NAME, xs, 1)?;
        Ok(vec![xs[0].mapv(|v| v * v)])
    }

    fn backward(
        &self,
        xs: &[&ArrayD<A>],
        gys: &[Option<ArrayD<A>>],
    ) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(NAME, xs, 1)?;
        let x = xs[0];
        let gy = output_grad(NAME, gys, 0, x.shape())?;
        Ok(vec![x.mapv(|v| v + v) * gy])
    }
}

/// Squares every element of `x`.
pub fn square_op<A: NdFloat>(x: &Variable<A>) -> Result<Variable<A>, GradFlowError> {
    apply_single(Square, &[x])
}

#[cfg(test)]
#[path = "square_test.rs"]
mod tests;
