//! Command handlers for the swiftida CLI.
//!
//! `signature` works on type strings given on the command line;
//! `database` edits declared types kept in a JSON type database.

pub mod database;
pub mod signature;

pub use database::{handle_apply, handle_declare, handle_show};
pub use signature::{handle_list_commands, handle_parse, handle_rewrite};
