// Element-wise unary functions.
pub mod exp;
pub mod pow;
pub mod square;

pub use exp::{exp_op, Exp};
pub use pow::{pow_op, Pow};
pub use square::{square_op, Square};
