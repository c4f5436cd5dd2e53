//! The finished screen as handed to the caller.

mod mask;
mod tos;

pub use mask::{MaskData, ThresholdMask};
