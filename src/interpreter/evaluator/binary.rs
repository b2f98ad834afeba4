/// Operator dispatch.
pub mod core;

/// `+ - * / %` and their result kinds.
pub mod arithmetic;

/// Equality and ordering.
pub mod comparison;

/// `&&` and `||`.
pub mod logic;
