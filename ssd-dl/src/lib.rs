//! The building blocks of the SSD data loading pipeline.

mod common;
pub mod dataset;
pub mod encoder;
pub mod label;
pub mod processor;
