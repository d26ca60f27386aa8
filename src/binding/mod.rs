//! Argument binding
//!
//! Converts argument tokens to typed values and assigns them to the parameters of
//! the resolved operation.

pub mod convert;
pub mod slot;

pub use convert::{coerce, convert, NULL_TOKEN, STD_HANDLE};
pub use slot::{ParameterSlot, SlotKind, SlotSet, POSITIONAL_ONLY};
