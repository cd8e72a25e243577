pub mod config;
pub mod list;
pub mod serve;
pub mod status;
pub mod take;
