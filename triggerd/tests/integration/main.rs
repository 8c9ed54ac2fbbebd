#[path = "../common/mod.rs"]
mod common;

mod cli_tests;
mod server_tests;
