use thiserror::Error;

/// Custom error type for the gradflow engine.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum GradFlowError {
    /// A leaf variable was built from something that is not an array of the
    /// expected element type (and not the empty sentinel either).
    #[error("{type_name} is not supported as a variable value")]
    UnsupportedValueType { type_name: String },

    /// A `Function` was invoked through a rule it does not override.
    #[error("Function '{op}' does not implement its {rule} rule")]
    UnimplementedOperation { op: &'static str, rule: &'static str },

    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    #[error("Arity mismatch in '{op}': expected {expected}, got {actual}")]
    ArityMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Function '{op}' produced no outputs")]
    NoOutputs { op: &'static str },
}
