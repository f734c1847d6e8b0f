//! Orb navigation core: layout geometry, the orb set, per-frame motion and the
//! layout state machine that switches between idle motion and the settled sides.

pub mod geometry;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod macros;
pub mod motion;
pub mod orb;
pub mod page;
pub mod scene;
pub mod theme;

pub use geometry::{Point, Size, ViewportState};
pub use input::InputEvent;
pub use layout::{LayoutParams, LayoutState};
pub use motion::{IdleMotion, MotionParams, MotionParamsError, Schedule};
pub use orb::{NavEntry, NavTable, Orb, OrbId, OrbMode, OrbSet, OrbSizes};
pub use page::{PageId, PageKind};
pub use scene::Scene;
pub use theme::{Theme, ThemeStore};
