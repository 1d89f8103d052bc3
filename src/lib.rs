pub mod cli;
pub mod config;
pub mod echo;
pub mod parallel;
pub mod simulation;
