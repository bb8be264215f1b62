// src/handlers/mod.rs

pub mod quiz;
