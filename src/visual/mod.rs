//! Visual encoding of relationship graphs

mod color;
mod encoder;
mod view;

pub use color::{ColorError, Rgb};
pub use encoder::{VisualEncoder, VisualStyle, DEFAULT_AVG_SIZE, DEFAULT_MAX_COLOR, DEFAULT_MIN_COLOR};
pub use view::{build_view, compose_view, ViewOptions, DEFAULT_MAX_OBJECTS};
