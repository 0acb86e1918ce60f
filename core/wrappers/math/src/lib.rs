mod algebra;

pub use algebra::*;
