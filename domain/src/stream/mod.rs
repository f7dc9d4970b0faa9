//! Streaming token accumulation.

pub mod accumulator;
