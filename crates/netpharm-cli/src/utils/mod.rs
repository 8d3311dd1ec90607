pub mod progress;
pub mod tables;
