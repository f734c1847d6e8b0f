use crate::geometry::{SettleGeometry, ViewportState};
use crate::page::PageKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Scroll offset, as a fraction of viewport height, past which home pages settle.
    pub settle_ratio: f64,
    pub hex_radius: f64,
    pub circle_radius: f64,
    /// Delay before home pages snap into the idle layout.
    pub idle_snap_delay_ms: u64,
    /// Delay before inner pages settle, so the first layout pass has happened.
    pub inner_settle_delay_ms: u64,
    pub settle: SettleGeometry,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            settle_ratio: 0.45,
            hex_radius: 190.0,
            circle_radius: 240.0,
            idle_snap_delay_ms: 120,
            inner_settle_delay_ms: 180,
            settle: SettleGeometry::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    WideIdle,
    Settled,
}

/// Geometry snap the scene must perform after a state machine decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snap {
    /// Stop motion and stack every orb on the sides.
    Settle,
    /// Leave the settled layout: snap to the idle layout and resume motion.
    Restore,
    /// Re-snap the idle layout without changing modes.
    Idle,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    remaining: f64,
    snap: Snap,
}

#[derive(Debug, Clone)]
pub struct LayoutStateMachine {
    kind: PageKind,
    state: LayoutState,
    pending: Option<Pending>,
    params: LayoutParams,
}

impl LayoutStateMachine {
    pub fn new(kind: PageKind, params: LayoutParams) -> Self {
        let pending = match kind {
            PageKind::Home => Pending {
                remaining: params.idle_snap_delay_ms as f64 / 1000.0,
                snap: Snap::Idle,
            },
            PageKind::Inner => Pending {
                remaining: params.inner_settle_delay_ms as f64 / 1000.0,
                snap: Snap::Settle,
            },
        };

        Self {
            kind,
            state: LayoutState::WideIdle,
            pending: Some(pending),
            params,
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn is_settled(&self) -> bool {
        self.state == LayoutState::Settled
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn threshold(&self, viewport: &ViewportState) -> f64 {
        viewport.height * self.params.settle_ratio
    }

    /// Runs the startup timer forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) -> Option<Snap> {
        let pending = self.pending.as_mut()?;
        pending.remaining -= dt.max(0.0);
        if pending.remaining > 0.0 {
            return None;
        }

        let snap = pending.snap;
        self.pending = None;
        match (snap, self.state) {
            (Snap::Settle, _) => {
                log::debug!("Startup settle on {} page", self.kind);
                self.state = LayoutState::Settled;
                Some(Snap::Settle)
            }
            // scrolling already settled the page before the idle snap came due
            (Snap::Idle, LayoutState::Settled) => None,
            (snap, _) => Some(snap),
        }
    }

    pub fn on_scroll(&mut self, viewport: &ViewportState) -> Option<Snap> {
        if self.kind != PageKind::Home {
            return None;
        }

        let past = viewport.scroll_y > self.threshold(viewport);
        match (self.state, past) {
            (LayoutState::WideIdle, true) => {
                log::debug!("Scrolled past {:.0}px, settling", self.threshold(viewport));
                self.state = LayoutState::Settled;
                Some(Snap::Settle)
            }
            (LayoutState::Settled, false) => {
                log::debug!("Scrolled back above {:.0}px, restoring", self.threshold(viewport));
                self.state = LayoutState::WideIdle;
                Some(Snap::Restore)
            }
            _ => None,
        }
    }

    pub fn on_resize(&mut self) -> Snap {
        match self.state {
            LayoutState::WideIdle => Snap::Idle,
            LayoutState::Settled => Snap::Settle,
        }
    }
}
