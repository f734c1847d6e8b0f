use crate::orb::{Destination, Orb, OrbId};
use crate::page::{HOME_PAGE, PageId};
use std::time::Duration;

pub const FADE_DURATION: Duration = Duration::from_millis(280);
pub const PULSE_DURATION: Duration = Duration::from_millis(320);
pub const PULSE_SCALE: f64 = 1.15;

/// Where the user currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub page: PageId,
    /// Path of the current location, e.g. `/site/about.html`.
    pub location: String,
}

impl PageContext {
    pub fn new(page: PageId) -> Self {
        let location = format!("/{}", page.file_name());
        Self { page, location }
    }

    pub fn is_current(&self, destination: &Destination) -> bool {
        (self.page.as_str() == HOME_PAGE && destination.as_str() == "index.html")
            || self.location.ends_with(destination.as_str())
    }
}

/// Lookup of in-page anchors by id.
pub trait AnchorLookup {
    fn has_anchor(&self, id: &PageId) -> bool;
}

/// Side effects of activating an orb, supplied by the host.
pub trait Navigator {
    fn scroll_into_view(&mut self, anchor: &PageId);
    fn pulse(&mut self, orb: &OrbId);
    fn fade_out(&mut self, duration: Duration);
    fn navigate_after(&mut self, destination: &Destination, delay: Duration);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    ScrollTo { anchor: PageId },
    Navigate { destination: Destination },
}

pub fn resolve(orb: &Orb, ctx: &PageContext, document: &impl AnchorLookup) -> Activation {
    let destination = &orb.entry.href;
    let anchor = destination.page_id();

    if ctx.is_current(destination) && document.has_anchor(&anchor) {
        Activation::ScrollTo { anchor }
    } else {
        Activation::Navigate {
            destination: destination.clone(),
        }
    }
}

pub fn activate(
    orb: &Orb,
    ctx: &PageContext,
    document: &impl AnchorLookup,
    navigator: &mut impl Navigator,
) -> Activation {
    let activation = resolve(orb, ctx, document);
    match &activation {
        Activation::ScrollTo { anchor } => {
            log::debug!("Scrolling to #{} for orb '{}'", anchor, orb.id());
            navigator.scroll_into_view(anchor);
            navigator.pulse(orb.id());
        }
        Activation::Navigate { destination } => {
            log::info!("Navigating to {}", destination);
            navigator.fade_out(FADE_DURATION);
            navigator.navigate_after(destination, FADE_DURATION);
        }
    }
    activation
}

/// Scale of a pulsing orb `elapsed` into the acknowledgment animation.
pub fn pulse_scale(elapsed: Duration) -> f64 {
    let t = (elapsed.as_secs_f64() / PULSE_DURATION.as_secs_f64()).clamp(0.0, 1.0);
    PULSE_SCALE + (1.0 - PULSE_SCALE) * t
}
