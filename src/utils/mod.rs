pub mod changelog;
pub mod changelog_checker;
pub mod config;
pub mod discovery;
pub mod severity;
pub mod severity_config;

pub mod testing;
