pub mod availability;
pub mod slot;
pub mod workflow;
