//! Main module for lql library functionality

pub mod client;
pub mod config;
pub mod controller;
pub mod grammar;
pub mod logging;
pub mod normalize;
pub mod phase;
pub mod response;
pub mod samples;
