// src/services/mod.rs

pub mod generation;
pub mod scores;
