//! Common/Shared UI Components
//!
//! Reusable components used by both screens.

mod icons;
mod picker;
mod tag_input;

pub use icons::*;
pub use picker::EntityPicker;
pub use tag_input::TagInput;
