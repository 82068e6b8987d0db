use std::any::{type_name, Any};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use ndarray::{arr0, Array, Array0, Array1, Array2, ArrayD, Dimension, NdFloat};

use crate::error::GradFlowError;
use crate::variable_data::VariableData;

mod autograd;
mod op_methods;

/// A node of the computation graph.
///
/// `Variable` uses `Rc<RefCell<VariableData>>` internally:
/// 1.  **Shared identity:** clones are cheap and denote the *same* node, so
///     a variable passed twice to a function (or to two functions) receives
///     the sum of both gradient contributions.
/// 2.  **Interior mutability:** the gradient is filled in by the backward
///     pass through a shared handle.
///
/// The handle is neither `Send` nor `Sync`; a graph lives on the thread that
/// built it.
pub struct Variable<A: NdFloat = f64> {
    pub(crate) inner: Rc<RefCell<VariableData<A>>>,
}

impl<A: NdFloat> Variable<A> {
    /// Creates a leaf variable holding `data`.
    pub fn new<D: Dimension>(data: Array<A, D>) -> Self {
        Self::from_data(Some(data.into_dyn()))
    }

    /// Creates a 0-dimensional leaf variable.
    pub fn scalar(value: A) -> Self {
        Self::new(arr0(value))
    }

    /// Creates the "no value yet" sentinel.
    ///
    /// Functions refuse it as an input and `backward` refuses it as a root.
    pub fn empty() -> Self {
        Self::from_data(None)
    }

    /// Creates a leaf variable from a dynamically typed value.
    ///
    /// Accepted: `ArrayD<A>`, `Array0<A>`, `Array1<A>`, `Array2<A>` and
    /// `Option<ArrayD<A>>` (where `None` yields [`Variable::empty`]).
    /// Anything else, bare scalars included, fails with
    /// `GradFlowError::UnsupportedValueType`.
    pub fn try_from_value<V: Any>(value: V) -> Result<Self, GradFlowError> {
        let boxed: Box<dyn Any> = Box::new(value);
        let boxed = match boxed.downcast::<ArrayD<A>>() {
            Ok(array) => return Ok(Self::from_data(Some(*array))),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Array0<A>>() {
            Ok(array) => return Ok(Self::new(*array)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Array1<A>>() {
            Ok(array) => return Ok(Self::new(*array)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Array2<A>>() {
            Ok(array) => return Ok(Self::new(*array)),
            Err(other) => other,
        };
        match boxed.downcast::<Option<ArrayD<A>>>() {
            Ok(maybe_array) => Ok(Self::from_data(*maybe_array)),
            Err(_) => Err(GradFlowError::UnsupportedValueType {
                type_name: type_name::<V>().to_string(),
            }),
        }
    }

    pub(crate) fn from_data(data: Option<ArrayD<A>>) -> Self {
        Variable {
            inner: Rc::new(RefCell::new(VariableData::new(data))),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<VariableData<A>>> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Rc<RefCell<VariableData<A>>>) -> Self {
        Variable { inner }
    }

    pub(crate) fn read_data(&self) -> Ref<'_, VariableData<A>> {
        self.inner.borrow()
    }

    /// Returns a copy of the value, or `None` for the empty sentinel.
    pub fn data(&self) -> Option<ArrayD<A>> {
        self.read_data().data.clone()
    }

    /// Returns `true` for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.read_data().data.is_none()
    }

    pub fn shape(&self) -> Option<Vec<usize>> {
        self.read_data().data.as_ref().map(|d| d.shape().to_vec())
    }

    pub fn ndim(&self) -> Option<usize> {
        self.read_data().data.as_ref().map(|d| d.ndim())
    }

    /// Number of elements.
    pub fn size(&self) -> Option<usize> {
        self.read_data().data.as_ref().map(|d| d.len())
    }

    /// Length of the first axis; 0-dimensional values report 1.
    pub fn len(&self) -> Option<usize> {
        self.read_data()
            .data
            .as_ref()
            .map(|d| d.shape().first().copied().unwrap_or(1))
    }

    /// `true` if both handles point at the same graph node.
    pub fn ptr_eq(&self, other: &Variable<A>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// Manual implementation: cloning shares the node, never the data.
impl<A: NdFloat> Clone for Variable<A> {
    fn clone(&self) -> Self {
        Variable {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: NdFloat> fmt::Debug for Variable<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        f.debug_struct("Variable")
            .field("data", &guard.data)
            .field("grad", &guard.grad)
            .field("creator", &guard.creator.as_ref().map(|c| c.name()))
            .field("generation", &guard.generation)
            .finish()
    }
}

impl<A: NdFloat> fmt::Display for Variable<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.read_data().data {
            None => write!(f, "variable(None)"),
            Some(data) => {
                let body = data.to_string().replace('\n', "\n         ");
                write!(f, "variable({})", body)
            }
        }
    }
}

#[cfg(test)]
mod tests;
