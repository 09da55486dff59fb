//! Non-overlapping team planner: normalizes a fixed team catalog, tracks the resources
//! committed by the current selection, filters by hero/pet/badge and ranks what is left
//! by how few resources each team would collide on.

pub mod cli;
pub mod config;
pub mod data;
pub mod planner;
pub mod server;
