//! Graph recording and reverse-mode traversal.

pub mod backward;
pub mod config;
pub mod function;
pub mod grad_check;

pub use backward::backward;
pub use config::{
    is_recording_enabled, no_grad, no_grad_scope, using_config, with_recording_disabled,
    ConfigGuard,
};
pub use function::{apply, apply_single, Function, FunctionNode};
pub use grad_check::{check_grad, numerical_diff, GradCheckError};
