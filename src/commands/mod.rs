//! CLI command implementations

pub mod edit;
pub mod find;
pub mod import;
pub mod init;
pub mod list;
pub mod manage;
pub mod new;
pub mod show;
pub mod watch;
