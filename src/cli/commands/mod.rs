pub mod completion;
pub mod config;
pub mod control;
pub mod ps;
pub mod sandbox;
pub mod start;
