pub mod config;
pub mod current;
pub mod domain;
pub mod error;
pub mod git;
pub mod resolver;
pub mod tagger;
pub mod ui;

pub use error::{Result, SemvError};
