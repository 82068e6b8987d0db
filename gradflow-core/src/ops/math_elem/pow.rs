use ndarray::{ArrayD, NdFloat};

use crate::autograd::{apply_single, Function};
use crate::error::GradFlowError;
use crate::ops::{check_arity, output_grad};
use crate::variable::Variable;

/// Element-wise power with a constant exponent, \( y = x^c \).
///
/// Backward: \( \frac{dL}{dx} = c \cdot x^{c-1} \cdot \frac{dL}{dy} \).
/// The exponent is not a graph input and receives no gradient.
#[derive(Debug, Clone, Copy)]
pub struct Pow<A> {
    pub exponent: A,
}

impl<A: NdFloat> Function<A> for Pow<A> {
    fn name(&self) -> &'static str {
        "pow"
    }

    fn forward(&self, xs: &[&ArrayD<A>]) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(self.name(), xs, 1)?;
        let c = self.exponent;
        Ok(vec![xs[0].mapv(|v| v.powf(c))])
    }

    fn backward(
        &self,
        xs: &[&ArrayD<A>],
        gys: &[Option<ArrayD<A>>],
    ) -> Result<Vec<ArrayD<A>>, GradFlowError> {
        check_arity(self.name(), xs, 1)?;
        let x = xs[0];
        let gy = output_grad(self.name(), gys, 0, x.shape())?;
        let c = self.exponent;
        let c_minus_one = c - A::one();
        Ok(vec![x.mapv(|v| c * v.powf(c_minus_one)) * gy])
    }
}

/// Raises every element of `x` to the constant power `exponent`.
///
/// Non-integer exponents of negative values yield NaN, as `powf` does.
pub fn pow_op<A: NdFloat>(x: &Variable<A>, exponent: A) -> Result<Variable<A>, GradFlowError> {
    apply_single(Pow { exponent }, &[x])
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
