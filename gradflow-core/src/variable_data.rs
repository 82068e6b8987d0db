use std::rc::Rc;

use ndarray::{ArrayD, NdFloat};

use crate::autograd::FunctionNode;

/// Internal state of a graph node.
///
/// Wrapped in `Rc<RefCell<VariableData>>` by [`crate::Variable`] so that user
/// handles, function inputs and weak function outputs all refer to the same
/// node.
pub struct VariableData<A: NdFloat> {
    /// The value; `None` only for the empty sentinel.
    pub(crate) data: Option<ArrayD<A>>,
    /// Gradient accumulated by the backward pass, same shape as `data`.
    pub(crate) grad: Option<ArrayD<A>>,
    /// The recorded function that produced this node. This is the owning edge
    /// of the node <-> function cycle; the function only keeps `Weak` handles
    /// to its outputs.
    pub(crate) creator: Option<Rc<FunctionNode<A>>>,
    /// 0 for leaves, `creator.generation() + 1` otherwise.
    pub(crate) generation: usize,
}

impl<A: NdFloat> VariableData<A> {
    pub(crate) fn new(data: Option<ArrayD<A>>) -> Self {
        VariableData {
            data,
            grad: None,
            creator: None,
            generation: 0,
        }
    }
}
