//! Define-by-run reverse-mode automatic differentiation.
//!
//! Functions applied to [`Variable`]s record a graph as they run; calling
//! [`Variable::backward`] on a result walks that graph back in generation
//! order and deposits gradients on every variable it depends on.
//!
//! ```
//! use gradflow_core::ops::{add_op, square_op};
//! use gradflow_core::Variable;
//! use gradflow_core::ndarray::arr0;
//!
//! let x = Variable::new(arr0(3.0));
//! let y = add_op(&square_op(&x)?, &x)?;
//! y.backward(false)?;
//! assert_eq!(x.grad().unwrap(), arr0(7.0).into_dyn());
//! # Ok::<(), gradflow_core::GradFlowError>(())
//! ```

pub mod autograd;
pub mod creation;
pub mod error;
pub mod ops;
pub mod utils;
pub mod variable;
pub mod variable_data;

pub use autograd::{no_grad, using_config, Function};
pub use error::GradFlowError;
pub use variable::Variable;

// Re-export the array crate so callers build values against the same version.
pub use ndarray;
pub use num_traits;
