// Element-wise binary operations on variables of the same shape.
pub mod add;
pub mod mul;

pub use add::{add_op, Add};
pub use mul::{mul_op, Mul};
