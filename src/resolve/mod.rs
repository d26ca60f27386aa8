//! Name resolution
//!
//! Tokenizing, the candidate index and prefix matching of command names.

pub mod candidate;
pub mod compare;
pub mod suggestion;
pub mod token;

pub use candidate::{common_prefix, Candidate};
pub use compare::Comparison;
pub use suggestion::{suggest, Suggestion};
pub use token::{Arguments, Token};
