pub mod placement;
pub mod student;
