pub mod encode;

pub use encode::{default_file_name, encode, ScreenFormat, ScreenReport, UnknownFormat};
