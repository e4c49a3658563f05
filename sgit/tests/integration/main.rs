#[path = "../common/mod.rs"]
mod common;

mod cli_tests;
mod gate_tests;
