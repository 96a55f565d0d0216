//! Utility modules for rule implementations.

pub mod allowance;
pub mod arguments;
pub mod cursor;
pub mod enclosing;
pub mod names;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck};
#[doc(inline)]
pub use arguments::count_arguments;
#[doc(inline)]
pub use cursor::{next_significant, previous_significant, skip_balanced_group};
#[doc(inline)]
pub use enclosing::enclosing_routine_name;
#[doc(inline)]
pub use names::{resolve_qualified_name, QualifiedName};
