// src/core/mod.rs

pub mod counter;
pub mod merge;
pub mod parser;
pub mod table;
pub mod types;
pub mod writer;
