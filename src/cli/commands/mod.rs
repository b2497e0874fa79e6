//! Command implementations

pub mod add;
pub mod check;
pub mod hash;
pub mod init;
pub mod list;
pub mod remove;
