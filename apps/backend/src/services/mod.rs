//! Service layer: session registry, turn scheduler and the coordinator
//! state machine that ties them together.

pub mod coordinator;
pub mod registry;
pub mod scheduler;
