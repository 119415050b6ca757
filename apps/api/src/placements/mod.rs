pub mod handlers;
pub mod report;
pub mod slot;
