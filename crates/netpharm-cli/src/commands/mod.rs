pub mod network;
pub mod run;
