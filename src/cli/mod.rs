pub mod auth;
pub mod output;
pub mod report;
