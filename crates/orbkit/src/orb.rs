use crate::geometry::{Fraction, Point, Size, ViewportState, WIDE_HEX, wide_hex_slot};
use crate::motion::MotionParams;
use crate::page::PageId;
use derive_more::{AsRef, Deref, Display, From, Into};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::TAU;
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct OrbId(String);

crate::impl_string_newtype!(OrbId);

/// Link target of an orb, e.g. `about.html`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Destination(String);

crate::impl_string_newtype!(Destination);

impl Destination {
    /// The destination's file stem, which is both its page identity and its in-page anchor.
    pub fn page_id(&self) -> PageId {
        PageId::new(self.0.strip_suffix(".html").unwrap_or(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub id: OrbId,
    pub label: String,
    pub href: Destination,
}

impl NavEntry {
    pub fn new(id: &str, label: &str, href: &str) -> Self {
        Self {
            id: OrbId::new(id),
            label: label.to_string(),
            href: Destination::new(href),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTable {
    pub center: NavEntry,
    pub entries: Vec<NavEntry>,
}

impl Default for NavTable {
    fn default() -> Self {
        Self {
            center: NavEntry::new("vegetable-fish", "Vegetable Fish", "vegetable-fish.html"),
            entries: vec![
                NavEntry::new("home", "Home", "index.html"),
                NavEntry::new("about", "About", "about.html"),
                NavEntry::new("projects", "Projects", "projects.html"),
                NavEntry::new("skills", "Skills", "skills.html"),
                NavEntry::new("contact", "Contact", "contact.html"),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbSizes {
    pub center: f64,
    pub outer: f64,
}

impl Default for OrbSizes {
    fn default() -> Self {
        Self {
            center: 120.0,
            outer: 92.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbMode {
    #[default]
    Free,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub const ZERO: Self = Self { vx: 0.0, vy: 0.0 };

    pub fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

/// Per-orb oscillation so idle orbs don't drift in lockstep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bumble {
    pub amplitude: f64,
    pub speed: f64,
    pub offset: f64,
}

impl Bumble {
    pub fn roll(rng: &mut impl Rng, params: &MotionParams) -> Self {
        Self {
            amplitude: sample(rng, params.bumble_amplitude_min, params.bumble_amplitude_max),
            speed: sample(rng, params.bumble_speed_min, params.bumble_speed_max),
            offset: rng.gen_range(0.0..TAU),
        }
    }

    /// Displacement from the anchor after `t` seconds.
    pub fn displacement(&self, t: f64) -> (f64, f64) {
        let theta = t * self.speed + self.offset;
        (
            self.amplitude * theta.sin(),
            self.amplitude * (theta * 0.8).cos(),
        )
    }
}

fn sample(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    if max > min { rng.gen_range(min..max) } else { min }
}

#[derive(Debug, Clone)]
pub struct Orb {
    pub entry: NavEntry,
    pub is_center: bool,
    pub size: Size,
    /// Top-left corner in document coordinates.
    pub position: Point,
    pub velocity: Velocity,
    pub target_fraction: Fraction,
    pub mode: OrbMode,
    pub phase: Bumble,
    /// Last idle snap, the point bumble motion oscillates around.
    pub anchor: Point,
}

impl Orb {
    pub fn id(&self) -> &OrbId {
        &self.entry.id
    }

    pub fn center(&self) -> Point {
        self.position
            .offset(self.size.width / 2.0, self.size.height / 2.0)
    }

    pub fn radius(&self) -> f64 {
        self.size.width.min(self.size.height) / 2.0
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center().distance(point) <= self.radius()
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum OrbSetError {
    #[error("{count} orbs do not fit the {slots} idle slots")]
    TooManyOrbs { count: usize, slots: usize },
    #[error("Duplicate orb id '{0}'")]
    DuplicateId(OrbId),
}

/// Center orb first, then the outer orbs in navigation order.
#[derive(Debug, Clone)]
pub struct OrbSet {
    orbs: Vec<Orb>,
}

impl OrbSet {
    pub fn new(
        nav: &NavTable,
        sizes: OrbSizes,
        params: &MotionParams,
        viewport: &ViewportState,
        rng: &mut impl Rng,
    ) -> Result<Self, OrbSetError> {
        let count = nav.entries.len() + 1;
        if count > WIDE_HEX.len() {
            return Err(OrbSetError::TooManyOrbs {
                count,
                slots: WIDE_HEX.len(),
            });
        }

        let mut seen = HashSet::new();
        let orbs = std::iter::once((&nav.center, true))
            .chain(nav.entries.iter().map(|e| (e, false)))
            .enumerate()
            .map(|(i, (entry, is_center))| {
                if !seen.insert(entry.id.clone()) {
                    return Err(OrbSetError::DuplicateId(entry.id.clone()));
                }
                let side = if is_center { sizes.center } else { sizes.outer };
                Ok(Self::scattered(
                    entry.clone(),
                    is_center,
                    Size::square(side),
                    wide_hex_slot(i),
                    params,
                    viewport,
                    rng,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { orbs })
    }

    /// Starts an orb near the middle of the viewport with a small random drift.
    fn scattered(
        entry: NavEntry,
        is_center: bool,
        size: Size,
        target_fraction: Fraction,
        params: &MotionParams,
        viewport: &ViewportState,
        rng: &mut impl Rng,
    ) -> Orb {
        let center = viewport.center();
        let start_x = center.x + (rng.r#gen::<f64>() - 0.5) * viewport.width * params.initial_spread;
        let start_y =
            center.y + (rng.r#gen::<f64>() - 0.5) * viewport.height * params.initial_spread;
        let position = Point::new(start_x - size.width / 2.0, start_y - size.height / 2.0);

        let velocity = Velocity::new(
            (rng.r#gen::<f64>() - 0.5) * params.initial_speed,
            (rng.r#gen::<f64>() - 0.5) * params.initial_speed,
        );

        Orb {
            entry,
            is_center,
            size,
            position,
            velocity,
            target_fraction,
            mode: OrbMode::Free,
            phase: Bumble::roll(rng, params),
            anchor: position,
        }
    }

    pub fn len(&self) -> usize {
        self.orbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Orb> {
        self.orbs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Orb> {
        self.orbs.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Orb> {
        self.orbs.get(index)
    }

    pub fn center(&self) -> Option<&Orb> {
        self.orbs.iter().find(|o| o.is_center)
    }

    pub fn find(&self, id: &OrbId) -> Option<&Orb> {
        self.orbs.iter().find(|o| o.id() == id)
    }

    /// Topmost orb under `point` (later orbs are drawn over earlier ones).
    pub fn hit_test(&self, point: Point) -> Option<&Orb> {
        self.orbs.iter().rev().find(|o| o.contains(point))
    }
}
