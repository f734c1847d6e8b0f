pub mod model;
pub mod view;

pub use model::{ClickOutcome, Session};
pub use view::draw;

pub const FRAME_DT_DEFAULT: f64 = 1.0 / 60.0;
pub const FRAME_DT_MAX: f64 = 0.1; // long stalls count as one slow frame
pub const SCROLL_DURATION: f64 = 0.45;
pub const WHEEL_STEP: f64 = 48.0; // px per wheel notch
pub const LABEL_FONT_SIZE: f64 = 13.0;
pub const TITLE_FONT_SIZE: f64 = 42.0;
pub const HEADING_FONT_SIZE: f64 = 26.0;
pub const CONTENT_INSET: f64 = 160.0;
