//! Utility modules shared by the commands.

pub mod exec;
pub mod log;
pub mod slug;
