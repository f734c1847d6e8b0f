use crate::geometry::{EDGE_MARGIN, Point, ViewportState, clamp_to_viewport};
use crate::orb::{Orb, OrbMode, OrbSet, Velocity};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// What free orbs do while the page is idle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum IdleMotion {
    /// Continuous attraction toward the wide-hex slots with jitter and cursor magnetism.
    #[default]
    #[strum(serialize = "physics")]
    Physics,
    /// Sinusoidal float around a fixed hex anchor.
    #[strum(serialize = "bumble")]
    Bumble,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    pub drag: f64,
    pub attract_strength: f64,
    pub jitter_strength: f64,
    pub proximity_radius: f64,
    pub magnetism: f64,
    pub margin: f64,
    /// Start scatter, as a fraction of the viewport.
    pub initial_spread: f64,
    pub initial_speed: f64,
    pub bumble_amplitude_min: f64,
    pub bumble_amplitude_max: f64,
    pub bumble_speed_min: f64,
    pub bumble_speed_max: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            drag: 0.985,
            attract_strength: 0.018,
            jitter_strength: 0.6,
            proximity_radius: 240.0,
            magnetism: 0.03,
            margin: EDGE_MARGIN,
            initial_spread: 0.18,
            initial_speed: 1.4,
            bumble_amplitude_min: 4.0,
            bumble_amplitude_max: 10.0,
            bumble_speed_min: 0.6,
            bumble_speed_max: 1.4,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum MotionParamsError {
    #[error("drag must lie strictly between 0 and 1, got {0}")]
    Drag(f64),
    #[error("{name} must be a finite, non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} range is inverted: {min} > {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
}

impl MotionParams {
    /// Rejects values that would let orbs speed up without bound or leave the viewport.
    pub fn validate(&self) -> Result<(), MotionParamsError> {
        if !(self.drag > 0.0 && self.drag < 1.0) {
            return Err(MotionParamsError::Drag(self.drag));
        }

        let non_negative = [
            ("attract_strength", self.attract_strength),
            ("jitter_strength", self.jitter_strength),
            ("proximity_radius", self.proximity_radius),
            ("magnetism", self.magnetism),
            ("margin", self.margin),
            ("initial_spread", self.initial_spread),
            ("initial_speed", self.initial_speed),
            ("bumble_amplitude_min", self.bumble_amplitude_min),
            ("bumble_amplitude_max", self.bumble_amplitude_max),
            ("bumble_speed_min", self.bumble_speed_min),
            ("bumble_speed_max", self.bumble_speed_max),
        ];
        if let Some(&(name, value)) = non_negative
            .iter()
            .find(|(_, v)| !(v.is_finite() && *v >= 0.0))
        {
            return Err(MotionParamsError::Negative { name, value });
        }

        let ranges = [
            (
                "bumble_amplitude",
                self.bumble_amplitude_min,
                self.bumble_amplitude_max,
            ),
            ("bumble_speed", self.bumble_speed_min, self.bumble_speed_max),
        ];
        match ranges.into_iter().find(|(_, min, max)| min > max) {
            Some((name, min, max)) => Err(MotionParamsError::InvertedRange { name, min, max }),
            None => Ok(()),
        }
    }
}

/// Whether the frame loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Continue,
    Pause,
}

/// Inputs shared by every orb for one frame. `cursor` is in document coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub viewport: &'a ViewportState,
    pub cursor: Option<Point>,
    /// Seconds since the previous frame.
    pub dt: f64,
}

#[derive(Debug, Clone)]
pub struct MotionDriver {
    params: MotionParams,
    style: IdleMotion,
    elapsed: f64,
}

impl MotionDriver {
    pub fn new(params: MotionParams, style: IdleMotion) -> Self {
        Self {
            params,
            style,
            elapsed: 0.0,
        }
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    pub fn style(&self) -> IdleMotion {
        self.style
    }

    /// Advances every free orb by one frame. All orbs are computed from the previous
    /// frame's state before any of them is written back.
    pub fn tick(&mut self, orbs: &mut OrbSet, input: &FrameInput, rng: &mut impl Rng) -> Schedule {
        self.elapsed += input.dt.max(0.0);

        let updates: Vec<Option<(Point, Velocity)>> = orbs
            .iter()
            .map(|orb| match (orb.mode, self.style) {
                (OrbMode::Settled, _) => None,
                (OrbMode::Free, IdleMotion::Physics) => Some(self.integrate(orb, input, rng)),
                (OrbMode::Free, IdleMotion::Bumble) => Some(self.float(orb, input.viewport)),
            })
            .collect();

        let mut moved = false;
        for (orb, update) in orbs.iter_mut().zip(updates) {
            if let Some((position, velocity)) = update {
                orb.position = position;
                orb.velocity = velocity;
                moved = true;
            }
        }

        if moved {
            Schedule::Continue
        } else {
            Schedule::Pause
        }
    }

    fn integrate(&self, orb: &Orb, input: &FrameInput, rng: &mut impl Rng) -> (Point, Velocity) {
        let p = &self.params;
        let center = orb.center();
        let target = orb.target_fraction.resolve(input.viewport);

        let mut ax = (target.x - center.x) * p.attract_strength + jitter(rng, p.jitter_strength);
        let mut ay = (target.y - center.y) * p.attract_strength + jitter(rng, p.jitter_strength);

        if let Some((mx, my)) = input.cursor.and_then(|c| magnetism(center, c, p)) {
            ax += mx;
            ay += my;
        }

        let velocity = Velocity::new((orb.velocity.vx + ax) * p.drag, (orb.velocity.vy + ay) * p.drag);
        let position = clamp_to_viewport(
            orb.position.offset(velocity.vx, velocity.vy),
            orb.size,
            input.viewport,
            p.margin,
        );

        // clamp_axis already resolves non-finite positions; velocity gets the same treatment
        if !velocity.vx.is_finite() || !velocity.vy.is_finite() {
            log::warn!("Discarding non-finite velocity for orb '{}'", orb.id());
            return (position, Velocity::ZERO);
        }

        (position, velocity)
    }

    fn float(&self, orb: &Orb, viewport: &ViewportState) -> (Point, Velocity) {
        let (dx, dy) = orb.phase.displacement(self.elapsed);
        let position = clamp_to_viewport(
            orb.anchor.offset(dx, dy),
            orb.size,
            viewport,
            self.params.margin,
        );
        (position, Velocity::ZERO)
    }
}

/// Zero-mean uniform noise in `[-strength / 2, strength / 2)`.
pub fn jitter(rng: &mut impl Rng, strength: f64) -> f64 {
    if strength > 0.0 {
        (rng.r#gen::<f64>() - 0.5) * strength
    } else {
        0.0
    }
}

/// Impulse pulling an orb centered at `from` toward the cursor, if the cursor is in range.
/// A cursor sitting exactly on the orb's center has no direction and yields nothing.
pub fn magnetism(from: Point, cursor: Point, params: &MotionParams) -> Option<(f64, f64)> {
    let (dx, dy) = (cursor.x - from.x, cursor.y - from.y);
    let dist = dx.hypot(dy);

    (dist > 0.0 && dist < params.proximity_radius)
        .then(|| (dx / dist * params.magnetism, dy / dist * params.magnetism))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Layout;
    use crate::orb::{NavTable, OrbSizes};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn viewport() -> ViewportState {
        ViewportState::new(1600.0, 1000.0)
    }

    fn calm() -> MotionParams {
        MotionParams {
            jitter_strength: 0.0,
            ..MotionParams::default()
        }
    }

    /// Orb set resting `offset` px left of and above each slot, at rest.
    fn displaced(params: &MotionParams, offset: f64) -> OrbSet {
        let vp = viewport();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut set = OrbSet::new(&NavTable::default(), OrbSizes::default(), params, &vp, &mut rng)
            .unwrap();
        let count = set.len();
        for (i, orb) in set.iter_mut().enumerate() {
            let slot = Layout::WideHex.target_position(i, count, orb.size, &vp);
            orb.position = slot.offset(-offset, -offset);
            orb.anchor = slot;
            orb.velocity = Velocity::ZERO;
        }
        set
    }

    fn distance_to_target(orb: &Orb, vp: &ViewportState) -> f64 {
        orb.center().distance(orb.target_fraction.resolve(vp))
    }

    fn run(driver: &mut MotionDriver, set: &mut OrbSet, cursor: Option<Point>, frames: usize) {
        let vp = viewport();
        let mut rng = SmallRng::seed_from_u64(3);
        let input = FrameInput {
            viewport: &vp,
            cursor,
            dt: 1.0 / 60.0,
        };
        for _ in 0..frames {
            driver.tick(set, &input, &mut rng);
        }
    }

    #[test]
    fn test_attraction_converges_without_diverging() {
        let params = calm();
        let mut driver = MotionDriver::new(params, IdleMotion::Physics);
        let mut set = displaced(&params, 60.0);
        let vp = viewport();

        let mut envelopes = Vec::new();
        for _ in 0..6 {
            let mut worst: f64 = 0.0;
            for _ in 0..200 {
                run(&mut driver, &mut set, None, 1);
                let d = distance_to_target(set.get(2).unwrap(), &vp);
                assert!(d.is_finite());
                worst = worst.max(d);
            }
            envelopes.push(worst);
        }

        assert!(envelopes[0] <= 60.0 * std::f64::consts::SQRT_2 + 1e-9);
        for pair in envelopes.windows(2) {
            assert!(pair[1] < pair[0], "envelope grew: {envelopes:?}");
        }
        for orb in set.iter() {
            assert!(distance_to_target(orb, &vp) < 0.5);
        }
    }

    #[test]
    fn test_heavy_drag_approaches_target_monotonically() {
        let params = MotionParams {
            drag: 0.6,
            ..calm()
        };
        let mut driver = MotionDriver::new(params, IdleMotion::Physics);
        let mut set = displaced(&params, 80.0);
        let vp = viewport();

        let mut last = distance_to_target(set.get(1).unwrap(), &vp);
        for _ in 0..700 {
            run(&mut driver, &mut set, None, 1);
            let d = distance_to_target(set.get(1).unwrap(), &vp);
            assert!(d <= last);
            last = d;
        }
        assert!(last < 1e-6);
    }

    #[test]
    fn test_magnetism_skips_zero_distance() {
        let params = MotionParams::default();
        let p = Point::new(100.0, 100.0);
        assert_eq!(magnetism(p, p, &params), None);
    }

    #[test]
    fn test_magnetism_is_a_unit_impulse_inside_radius() {
        let params = MotionParams::default();
        let from = Point::new(0.0, 0.0);

        let (mx, my) = magnetism(from, Point::new(30.0, 40.0), &params).unwrap();
        assert!((mx - 0.6 * 0.03).abs() < 1e-12);
        assert!((my - 0.8 * 0.03).abs() < 1e-12);

        assert_eq!(magnetism(from, Point::new(240.0, 0.0), &params), None);
    }

    #[test]
    fn test_cursor_on_orb_center_keeps_velocity_finite() {
        let params = calm();
        let mut driver = MotionDriver::new(params, IdleMotion::Physics);
        let mut set = displaced(&params, 0.0);
        let cursor = set.get(0).unwrap().center();

        run(&mut driver, &mut set, Some(cursor), 1);

        let orb = set.get(0).unwrap();
        assert!(orb.velocity.vx.is_finite() && orb.velocity.vy.is_finite());
        assert!(orb.position.is_finite());
    }

    #[test]
    fn test_cursor_pulls_nearby_orb() {
        let params = calm();
        let vp = viewport();
        let mut still = displaced(&params, 0.0);
        let mut pulled = displaced(&params, 0.0);
        let cursor = pulled.get(1).unwrap().center().offset(100.0, 0.0);

        run(&mut MotionDriver::new(params, IdleMotion::Physics), &mut still, None, 1);
        run(&mut MotionDriver::new(params, IdleMotion::Physics), &mut pulled, Some(cursor), 1);

        assert!(pulled.get(1).unwrap().velocity.vx > still.get(1).unwrap().velocity.vx);
        // orbs outside the radius are unaffected
        assert_eq!(
            pulled.get(4).unwrap().position,
            still.get(4).unwrap().position
        );
        assert!(distance_to_target(pulled.get(4).unwrap(), &vp) < 1e-9);
    }

    #[test]
    fn test_positions_stay_inside_viewport() {
        let params = MotionParams {
            jitter_strength: 40.0,
            ..MotionParams::default()
        };
        let mut driver = MotionDriver::new(params, IdleMotion::Physics);
        let mut set = displaced(&params, 300.0);
        let vp = viewport();

        run(&mut driver, &mut set, Some(Point::new(5.0, 5.0)), 500);

        for orb in set.iter() {
            assert!(orb.position.x >= 8.0 && orb.position.x <= vp.width - orb.size.width - 8.0);
            assert!(orb.position.y >= 8.0 && orb.position.y <= vp.height - orb.size.height - 8.0);
        }
    }

    #[test]
    fn test_settled_orbs_are_left_alone() {
        let params = MotionParams::default();
        let mut driver = MotionDriver::new(params, IdleMotion::Physics);
        let mut set = displaced(&params, 50.0);
        let before: Vec<Point> = set.iter().map(|o| o.position).collect();
        for orb in set.iter_mut() {
            orb.mode = OrbMode::Settled;
        }

        let vp = viewport();
        let mut rng = SmallRng::seed_from_u64(9);
        let input = FrameInput {
            viewport: &vp,
            cursor: None,
            dt: 0.016,
        };
        assert_eq!(driver.tick(&mut set, &input, &mut rng), Schedule::Pause);

        let after: Vec<Point> = set.iter().map(|o| o.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_bumble_floats_around_anchor() {
        let params = MotionParams::default();
        let mut driver = MotionDriver::new(params, IdleMotion::Bumble);
        let mut set = displaced(&params, 0.0);

        for _ in 0..240 {
            run(&mut driver, &mut set, Some(Point::new(700.0, 400.0)), 1);
            for orb in set.iter() {
                let drift = orb.position.distance(orb.anchor);
                assert!(drift <= orb.phase.amplitude * std::f64::consts::SQRT_2 + 1e-9);
                assert_eq!(orb.velocity, Velocity::ZERO);
            }
        }
    }

    #[test]
    fn test_default_params_are_valid() {
        assert_eq!(MotionParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_params_validation_rejects_runaway_values() {
        let cases = vec![
            (
                MotionParams {
                    drag: 1.2,
                    ..MotionParams::default()
                },
                MotionParamsError::Drag(1.2),
            ),
            (
                MotionParams {
                    drag: 0.0,
                    ..MotionParams::default()
                },
                MotionParamsError::Drag(0.0),
            ),
            (
                MotionParams {
                    proximity_radius: -5.0,
                    ..MotionParams::default()
                },
                MotionParamsError::Negative {
                    name: "proximity_radius",
                    value: -5.0,
                },
            ),
            (
                MotionParams {
                    margin: -1.0,
                    ..MotionParams::default()
                },
                MotionParamsError::Negative {
                    name: "margin",
                    value: -1.0,
                },
            ),
            (
                MotionParams {
                    bumble_speed_min: 2.0,
                    ..MotionParams::default()
                },
                MotionParamsError::InvertedRange {
                    name: "bumble_speed",
                    min: 2.0,
                    max: 1.4,
                },
            ),
        ];

        for (params, expected) in cases {
            assert_eq!(params.validate(), Err(expected));
        }

        let nan = MotionParams {
            drag: f64::NAN,
            ..MotionParams::default()
        };
        assert!(matches!(nan.validate(), Err(MotionParamsError::Drag(_))));
    }

    #[test]
    fn test_jitter_is_bounded() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..1000 {
            let j = jitter(&mut rng, 0.6);
            assert!((-0.3..0.3).contains(&j));
        }
        assert_eq!(jitter(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn test_idle_motion_deserialization() {
        let cases = vec![
            ("\"physics\"", IdleMotion::Physics),
            ("\"Bumble\"", IdleMotion::Bumble),
        ];

        for (json, expected) in cases {
            let deserialized: IdleMotion = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_degenerate_viewport_stays_finite() {
        let params = MotionParams::default();
        let mut driver = MotionDriver::new(params, IdleMotion::Physics);
        let mut set = displaced(&params, 10.0);
        let tiny = ViewportState::new(40.0, 30.0);
        let mut rng = SmallRng::seed_from_u64(5);
        let input = FrameInput {
            viewport: &tiny,
            cursor: Some(Point::new(20.0, 15.0)),
            dt: 0.016,
        };

        for _ in 0..100 {
            driver.tick(&mut set, &input, &mut rng);
        }
        for orb in set.iter() {
            assert_eq!(orb.position, Point::new(8.0, 8.0));
            assert!(orb.velocity.speed().is_finite());
        }
    }
}
