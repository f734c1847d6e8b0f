use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Keeps free-floating orbs this far inside the viewport edges.
pub const EDGE_MARGIN: f64 = 8.0;
pub const START_OFFSET: f64 = -PI / 2.0;

/// Hand-placed idle slots, in percent of the viewport. Slot 0 belongs to the center orb.
pub const WIDE_HEX: [Fraction; 6] = [
    Fraction::new(50.0, 44.0),
    Fraction::new(18.0, 36.0),
    Fraction::new(82.0, 36.0),
    Fraction::new(10.0, 70.0),
    Fraction::new(90.0, 70.0),
    Fraction::new(50.0, 88.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }
}

/// Snapshot of the window the orbs live in. Positions are document coordinates, so
/// `scroll_y` is the document offset of the viewport's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
    pub document_height: f64,
}

impl ViewportState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
            document_height: height,
        }
    }

    pub fn with_scroll(self, scroll_y: f64) -> Self {
        Self { scroll_y, ..self }
    }

    pub fn with_document_height(self, document_height: f64) -> Self {
        Self {
            document_height,
            ..self
        }
    }

    /// Center of the visible area, in document coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.scroll_y + self.height / 2.0)
    }

    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }
}

/// Position expressed in percent of the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fraction {
    pub x: f64,
    pub y: f64,
}

impl Fraction {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Document coordinates of the fraction, so the point follows the viewport as it scrolls.
    pub fn resolve(self, viewport: &ViewportState) -> Point {
        Point::new(
            viewport.width * (self.x / 100.0),
            viewport.scroll_y + viewport.height * (self.y / 100.0),
        )
    }
}

pub fn wide_hex_slot(index: usize) -> Fraction {
    debug_assert!(
        index < WIDE_HEX.len(),
        "orb index {index} has no wide-hex slot"
    );
    WIDE_HEX[index.min(WIDE_HEX.len() - 1)]
}

/// Clamps `value` into `[lo, hi]`. An inverted range collapses onto `lo` and a
/// non-finite value resolves to `lo`, so the result is always a usable coordinate.
pub fn clamp_axis(value: f64, lo: f64, hi: f64) -> f64 {
    if !value.is_finite() || hi < lo {
        return lo;
    }
    value.clamp(lo, hi)
}

/// Keeps an orb's top-left corner inside the visible area with `margin` on all sides.
/// `pos` is in document coordinates.
pub fn clamp_to_viewport(pos: Point, size: Size, viewport: &ViewportState, margin: f64) -> Point {
    let top = viewport.scroll_y;
    Point::new(
        clamp_axis(pos.x, margin, viewport.width - size.width - margin),
        clamp_axis(
            pos.y,
            top + margin,
            top + viewport.height - size.height - margin,
        ),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// Every orb, center included, evenly around one ring.
    Circle { radius: f64 },
    /// Center orb in the middle, the rest evenly around a ring.
    Hex { radius: f64 },
    WideHex,
}

impl Layout {
    /// Top-left corner of orb `index` out of `count` for this layout.
    pub fn target_position(
        self,
        index: usize,
        count: usize,
        size: Size,
        viewport: &ViewportState,
    ) -> Point {
        debug_assert!(index < count, "orb index {index} out of range for {count} orbs");
        let center = viewport.center();
        let anchor = match self {
            Layout::Circle { radius } => ring_point(center, radius, circle_angle(index, count)),
            Layout::Hex { radius } => hex_angle(index, count)
                .map(|angle| ring_point(center, radius, angle))
                .unwrap_or(center),
            Layout::WideHex => wide_hex_slot(index).resolve(viewport),
        };
        anchor.offset(-size.width / 2.0, -size.height / 2.0)
    }
}

pub fn circle_angle(index: usize, count: usize) -> f64 {
    START_OFFSET + index as f64 * TAU / count.max(1) as f64
}

/// Angle of an outer orb in the hex layout; `None` for the center orb.
pub fn hex_angle(index: usize, count: usize) -> Option<f64> {
    let outer = count.saturating_sub(1).max(1);
    (index > 0).then(|| START_OFFSET + (index - 1) as f64 * TAU / outer as f64)
}

fn ring_point(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Column and row of an orb in the settled layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidePlacement {
    pub side: Side,
    pub index: usize,
}

impl SidePlacement {
    pub fn of(index: usize, count: usize) -> Self {
        let left = left_count(count);
        if index < left {
            Self {
                side: Side::Left,
                index,
            }
        } else {
            Self {
                side: Side::Right,
                index: index - left,
            }
        }
    }
}

/// The left column takes the larger half.
pub fn left_count(count: usize) -> usize {
    count.div_ceil(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleGeometry {
    pub inset: f64,
    pub base_offset: f64,
    pub max_gap: f64,
    pub gap_divisor: f64,
    pub edge_margin: f64,
    pub vertical_margin: f64,
}

impl Default for SettleGeometry {
    fn default() -> Self {
        Self {
            inset: 18.0,
            base_offset: 120.0,
            max_gap: 140.0,
            gap_divisor: 6.0,
            edge_margin: EDGE_MARGIN,
            vertical_margin: 20.0,
        }
    }
}

impl SettleGeometry {
    pub fn gap(&self, viewport: &ViewportState) -> f64 {
        self.max_gap.min(viewport.height / self.gap_divisor)
    }

    pub fn position(&self, placement: SidePlacement, size: Size, viewport: &ViewportState) -> Point {
        let x = match placement.side {
            Side::Left => self.inset,
            Side::Right => viewport.width - self.inset - size.width,
        };
        let y = viewport.scroll_y + self.base_offset + placement.index as f64 * self.gap(viewport);

        Point::new(
            clamp_axis(x, self.edge_margin, viewport.width - size.width - self.edge_margin),
            clamp_axis(
                y,
                self.vertical_margin,
                viewport.document_height - size.height - self.vertical_margin,
            ),
        )
    }

    pub fn settled_sides(
        &self,
        index: usize,
        count: usize,
        size: Size,
        viewport: &ViewportState,
    ) -> Point {
        debug_assert!(index < count, "orb index {index} out of range for {count} orbs");
        self.position(SidePlacement::of(index, count), size, viewport)
    }
}
