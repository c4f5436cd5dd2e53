//! Public API: parameters, the generation entry point, errors and warnings.

mod error;
mod generate;
mod params;

pub use error::{ScreenError, ScreenWarning};
pub use generate::{generate_ordered_screen, GeneratedScreen};
pub use params::{OutputFormat, ScreenParams};
