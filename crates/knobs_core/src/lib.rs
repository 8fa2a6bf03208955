pub mod color;
pub mod config;
pub mod deduce;
pub mod descriptor;
pub mod errors;
pub mod panel;
pub mod patch;
pub mod path;
pub mod preview;
pub mod target;
pub mod value;

pub use config::*;
pub use deduce::{ControlKind, NumberRange, deduce_kind};
pub use descriptor::*;
pub use errors::*;
pub use panel::{Panel, UiInput};
pub use patch::{Patch, build_update_patch};
pub use path::{Path, Segment, get_nested_value};
pub use target::{JsonTarget, SharedTarget, Target, UpdateRecord};
