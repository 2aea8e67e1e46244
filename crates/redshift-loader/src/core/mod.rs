//! Core data model shared across the pipeline stages.

mod frame;

pub use frame::{Column, DType, Frame, Value};
