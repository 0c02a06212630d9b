mod collection;
pub mod error;
mod features;
pub mod records;
#[allow(clippy::module_inception)]
pub mod store;

pub use error::{StoreError, StoreResult};
pub use records::{CompletedStep, CompletionPatch, NewRoutineCompletion, Routine, RoutineCompletion};
pub use store::Store;
