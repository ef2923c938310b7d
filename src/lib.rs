// src/lib.rs
#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod dates;
pub mod error;
pub mod file;
pub mod fragment;
pub mod locator;
pub mod matcher;
pub mod progress;
pub mod report;
pub mod roster;
pub mod runner;
pub mod specs;
