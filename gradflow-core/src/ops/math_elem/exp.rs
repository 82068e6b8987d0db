use ndarray::{ArrayD, NdFloat};

use crate::autograd::{apply_single, Function};
use crate::error::GradFlowError;
use crate::ops::{check_arity, output_grad};
use crate::variable::Variable;

const NAME: &str = "exp";

/// Element-wise exponential \( y = e^x \).
///
/// Backward: \( \frac{dL}{dx} = e^x \cdot \frac{dL}{dy} \). The exponential is
/// recomputed from the recorded input, since outputs are only weakly held.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl<A: NdFloat> Function<A> for Exp {
    fn name(&self) -> &'static str {
        NAME
    }

    fn forward(&self, xs: &[&ArrayD<A>]) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(NAME, xs, 1)?;
        Ok(vec![xs[0].mapv(|v| v.exp())])
    }

    fn backward(
        &self,
        xs: &[&ArrayD<A>],
        gys: &[Option<ArrayD<A>>],
    ) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(NAME, xs, 1)?;
        let x = xs[0];
        let gy = output_grad(NAME, gys, 0, x.shape())?;
        Ok(vec![x.mapv(|v| v.exp()) * gy])
    }
}

/// Computes \( e^x \) for every element of `x`.
pub fn exp_op<A: NdFloat>(x: &Variable<A>) -> Result<Variable<A>, GradFlowError> {
    apply_single(Exp, &[x])
}

#[cfg(test)]
#[path = "exp_test.rs"]
mod tests;
