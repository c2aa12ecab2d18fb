//! jewel-search CLI ライブラリ

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod output;
