use std::rc::Rc;

use ndarray::{ArrayD, NdFloat};

use crate::autograd::{self, FunctionNode};
use crate::error::GradFlowError;
use crate::variable::Variable;

impl<A: NdFloat> Variable<A> {
    /// Returns a copy of the accumulated gradient, if any.
    pub fn grad(&self) -> Option<ArrayD<A>> {
        self.read_data().grad.clone()
    }

    /// Returns the recorded function that produced this variable.
    ///
    /// `None` for leaves and for results computed with recording disabled.
    pub fn creator(&self) -> Option<Rc<FunctionNode<A>>> {
        self.read_data().creator.clone()
    }

    pub fn generation(&self) -> usize {
        self.read_data().generation
    }

    /// `true` when no recorded function produced this variable.
    pub fn is_leaf(&self) -> bool {
        self.read_data().creator.is_none()
    }

    /// Links this variable to the function node that produced it.
    pub(crate) fn set_creator(&self, func: Rc<FunctionNode<A>>) {
        let mut guard = self.inner.borrow_mut();
        guard.generation = func.generation() + 1;
        guard.creator = Some(func);
    }

    /// Adds `grad` to the stored gradient, or stores it if there is none yet.
    pub(crate) fn accumulate_grad(&self, grad: ArrayD<A>) -> Result<(), GradFlowError> {
        let mut guard = self.inner.borrow_mut();

        let expected = match guard.data.as_ref() {
            Some(data) => data.shape().to_vec(),
            None => {
                return Err(GradFlowError::InvalidOperand(
                    "cannot accumulate a gradient into an empty variable".to_string(),
                ))
            }
        };
        if grad.shape() != expected.as_slice() {
            return Err(GradFlowError::ShapeMismatch {
                expected,
                actual: grad.shape().to_vec(),
                operation: "accumulate_grad".to_string(),
            });
        }

        let accumulated = match guard.grad.take() {
            Some(existing) => existing + &grad,
            None => grad,
        };
        guard.grad = Some(accumulated);
        Ok(())
    }

    /// Resets the gradient to `None`. Calling it again is a no-op.
    pub fn cleargrad(&self) {
        self.inner.borrow_mut().grad = None;
    }

    /// Backpropagates from this variable to every variable it depends on.
    ///
    /// When no gradient is stored yet it is seeded with ones. Unless
    /// `retain_grad` is set, gradients of intermediate variables (this one
    /// included) are dropped once their producing function has consumed them,
    /// so only leaves keep theirs.
    ///
    /// # Errors
    /// * `GradFlowError::InvalidOperand` if this variable is empty or has no
    ///   creator (a leaf, or a result computed with recording disabled).
    /// * Any error raised by a function's backward rule; the pass stops there.
    pub fn backward(&self, retain_grad: bool) -> Result<(), GradFlowError> {
        autograd::backward(self, retain_grad)
    }
}
