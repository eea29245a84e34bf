pub mod check;
pub mod config;
pub mod keys;
pub mod run;
mod terminal;
