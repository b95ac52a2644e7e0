//! Core types for printer tracking-dot decoding.
//!
//! This crate is intentionally small and purely combinatorial. It knows
//! nothing about concrete manufacturer patterns; those live in
//! `trackdots-patterns`.

mod grid;
mod logger;
mod region;
mod transform;

pub use grid::{BitGrid, GridError};
pub use region::{ExtractedCell, ExtractedGrid, RegionMeta};
pub use transform::{Orientation, Transformation, ORIENTATIONS_D4};

pub use logger::{init_logging, installed_config, LogConfig, LogFormat, LogInitError};
