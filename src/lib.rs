// fraudcheck: transaction fraud scoring service
//
// This is the library root. The binary in main.rs wires these together:
// config → classifier (loaded once) → web server.

pub mod classifier;
pub mod config;
pub mod detect;
pub mod web;
