pub mod errors;
pub mod markup;
pub mod registry;

pub use errors::*;
pub use markup::{parse_attr_value, parse_options, parse_panel, parse_panels};
pub use registry::TargetRegistry;
