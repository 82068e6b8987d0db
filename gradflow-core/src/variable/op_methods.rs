// Method-call sugar over the functions in `crate::ops`.

use ndarray::NdFloat;

use crate::error::GradFlowError;
use crate::ops;
use crate::variable::Variable;

impl<A: NdFloat> Variable<A> {
    pub fn add(&self, other: &Variable<A>) -> Result<Variable<A>, GradFlowError> {
        ops::add_op(self, other)
    }

    pub fn mul(&self, other: &Variable<A>) -> Result<Variable<A>, GradFlowError> {
        ops::mul_op(self, other)
    }

    pub fn square(&self) -> Result<Variable<A>, GradFlowError> {
        ops::square_op(self)
    }

    pub fn exp(&self) -> Result<Variable<A>, GradFlowError> {
        ops::exp_op(self)
    }

    pub fn pow(&self, exponent: A) -> Result<Variable<A>, GradFlowError> {
        ops::pow_op(self, exponent)
    }
}
