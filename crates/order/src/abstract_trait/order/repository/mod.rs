mod command;
mod query;

pub use self::command::{AssignOutcome, DynOrderCommandRepository, OrderCommandRepositoryTrait};
pub use self::query::{DynOrderQueryRepository, OrderQueryRepositoryTrait};
