use crate::geometry::{Layout, Point, ViewportState};
use crate::input::{InputEvent, InputRouter};
use crate::layout::{LayoutParams, LayoutState, LayoutStateMachine, Snap};
use crate::motion::{FrameInput, IdleMotion, MotionDriver, Schedule};
use crate::orb::{OrbMode, OrbSet, Velocity};
use crate::page::PageKind;
use rand::Rng;

/// One page session: the orbs plus everything that decides where they go.
#[derive(Debug, Clone)]
pub struct Scene {
    orbs: OrbSet,
    machine: LayoutStateMachine,
    driver: MotionDriver,
    router: InputRouter,
    /// Layout the free orbs were last snapped to.
    anchors: Layout,
}

impl Scene {
    pub fn new(
        orbs: OrbSet,
        kind: PageKind,
        layout: LayoutParams,
        driver: MotionDriver,
        viewport: ViewportState,
    ) -> Self {
        let mut scene = Self {
            orbs,
            machine: LayoutStateMachine::new(kind, layout),
            driver,
            router: InputRouter::new(viewport),
            anchors: Layout::WideHex,
        };
        if scene.driver.style() == IdleMotion::Bumble {
            scene.snap_to(Layout::Circle {
                radius: layout.circle_radius,
            });
        }
        scene
    }

    pub fn orbs(&self) -> &OrbSet {
        &self.orbs
    }

    pub fn viewport(&self) -> &ViewportState {
        self.router.viewport()
    }

    /// Pointer position in document coordinates.
    pub fn cursor(&self) -> Option<Point> {
        self.router.cursor_in_document()
    }

    pub fn state(&self) -> LayoutState {
        self.machine.state()
    }

    pub fn kind(&self) -> PageKind {
        self.machine.kind()
    }

    pub fn idle_layout(&self) -> Layout {
        match self.driver.style() {
            IdleMotion::Physics => Layout::WideHex,
            IdleMotion::Bumble => Layout::Hex {
                radius: self.machine.params().hex_radius,
            },
        }
    }

    pub fn input(&mut self, event: InputEvent) {
        match self.router.route(event, &mut self.machine) {
            Some(snap) => self.apply(snap),
            None if matches!(event, InputEvent::Scroll(_)) && !self.machine.is_settled() => {
                self.reanchor()
            }
            None => {}
        }
    }

    /// Runs one animation frame `dt` seconds after the previous one.
    pub fn frame(&mut self, dt: f64, rng: &mut impl Rng) -> Schedule {
        if let Some(snap) = self.machine.advance(dt) {
            self.apply(snap);
        }

        let input = FrameInput {
            viewport: self.router.viewport(),
            cursor: self.router.cursor_in_document(),
            dt,
        };
        let schedule = self.driver.tick(&mut self.orbs, &input, rng);

        if self.machine.has_pending() {
            Schedule::Continue
        } else {
            schedule
        }
    }

    fn apply(&mut self, snap: Snap) {
        log::debug!("Applying {:?} snap in {:?}", snap, self.machine.state());
        match snap {
            Snap::Settle => self.settle(),
            Snap::Restore => {
                for orb in self.orbs.iter_mut() {
                    orb.mode = OrbMode::Free;
                }
                self.snap_to(self.idle_layout());
            }
            Snap::Idle => self.snap_to(self.idle_layout()),
        }
    }

    fn settle(&mut self) {
        let viewport = *self.router.viewport();
        let settle = self.machine.params().settle;
        let count = self.orbs.len();

        for (i, orb) in self.orbs.iter_mut().enumerate() {
            orb.mode = OrbMode::Settled;
            orb.velocity = Velocity::ZERO;
            orb.position = settle.settled_sides(i, count, orb.size, &viewport);
        }
    }

    fn snap_to(&mut self, layout: Layout) {
        let viewport = *self.router.viewport();
        let count = self.orbs.len();

        self.anchors = layout;
        for (i, orb) in self.orbs.iter_mut().enumerate() {
            let position = layout.target_position(i, count, orb.size, &viewport);
            orb.position = position;
            orb.anchor = position;
        }
    }

    /// Moves the free orbs' anchors with the viewport. Positions follow on the next frame.
    fn reanchor(&mut self) {
        let viewport = *self.router.viewport();
        let count = self.orbs.len();

        for (i, orb) in self.orbs.iter_mut().enumerate() {
            orb.anchor = self.anchors.target_position(i, count, orb.size, &viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Side, SidePlacement};
    use crate::motion::MotionParams;
    use crate::orb::{NavTable, OrbSizes};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn scene(kind: PageKind, style: IdleMotion) -> (Scene, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(42);
        let vp = ViewportState::new(1280.0, 800.0).with_document_height(4000.0);
        let params = MotionParams::default();
        let orbs = OrbSet::new(&NavTable::default(), OrbSizes::default(), &params, &vp, &mut rng)
            .unwrap();
        let scene = Scene::new(
            orbs,
            kind,
            LayoutParams::default(),
            MotionDriver::new(params, style),
            vp,
        );
        (scene, rng)
    }

    fn positions(scene: &Scene) -> Vec<Point> {
        scene.orbs().iter().map(|o| o.position).collect()
    }

    #[test]
    fn test_scroll_settles_and_restores_home_page() {
        let (mut scene, mut rng) = scene(PageKind::Home, IdleMotion::Physics);
        for _ in 0..30 {
            scene.frame(1.0 / 60.0, &mut rng);
        }

        scene.input(InputEvent::Scroll(0.46 * 800.0));
        assert_eq!(scene.state(), LayoutState::Settled);
        assert!(scene.orbs().iter().all(|o| o.mode == OrbMode::Settled));
        let settled = positions(&scene);

        assert_eq!(scene.frame(1.0 / 60.0, &mut rng), Schedule::Pause);
        assert_eq!(positions(&scene), settled);

        scene.input(InputEvent::Scroll(0.40 * 800.0));
        assert_eq!(scene.state(), LayoutState::WideIdle);
        let vp = *scene.viewport();
        for (i, orb) in scene.orbs().iter().enumerate() {
            assert_eq!(orb.mode, OrbMode::Free);
            assert_eq!(orb.position, Layout::WideHex.target_position(i, 6, orb.size, &vp));
        }
        assert_eq!(scene.frame(1.0 / 60.0, &mut rng), Schedule::Continue);
    }

    fn assert_visible(scene: &Scene) {
        let vp = *scene.viewport();
        for orb in scene.orbs().iter() {
            let top = orb.position.y - vp.scroll_y;
            assert!(
                top >= 8.0 && top <= vp.height - orb.size.height - 8.0,
                "orb {} drawn at viewport y {top}",
                orb.id()
            );
            assert!(orb.position.x >= 8.0 && orb.position.x <= vp.width - orb.size.width - 8.0);
        }
    }

    #[test]
    fn test_idle_orbs_stay_visible_while_scrolled_below_threshold() {
        let (mut scene, mut rng) = scene(PageKind::Home, IdleMotion::Physics);
        for _ in 0..30 {
            scene.frame(1.0 / 60.0, &mut rng);
        }
        scene.input(InputEvent::Scroll(0.46 * 800.0));
        scene.input(InputEvent::Scroll(0.40 * 800.0));
        assert_eq!(scene.state(), LayoutState::WideIdle);

        for _ in 0..600 {
            scene.frame(1.0 / 60.0, &mut rng);
            assert_visible(&scene);
        }

        // the formation sits around its slots in the scrolled viewport
        let vp = *scene.viewport();
        let center = scene.orbs().get(0).unwrap();
        assert!(center.center().distance(center.target_fraction.resolve(&vp)) < 40.0);
    }

    #[test]
    fn test_idle_scroll_without_settling_moves_formation() {
        let (mut scene, mut rng) = scene(PageKind::Home, IdleMotion::Physics);
        for _ in 0..30 {
            scene.frame(1.0 / 60.0, &mut rng);
        }
        scene.input(InputEvent::Scroll(200.0));
        assert_eq!(scene.state(), LayoutState::WideIdle);

        for _ in 0..300 {
            scene.frame(1.0 / 60.0, &mut rng);
            assert_visible(&scene);
        }
    }

    #[test]
    fn test_bumble_anchors_follow_idle_scroll() {
        let (mut scene, mut rng) = scene(PageKind::Home, IdleMotion::Bumble);
        scene.frame(0.2, &mut rng);
        scene.input(InputEvent::Scroll(300.0));
        assert_eq!(scene.state(), LayoutState::WideIdle);

        let vp = *scene.viewport();
        let hex = scene.idle_layout();
        for (i, orb) in scene.orbs().iter().enumerate() {
            assert_eq!(orb.anchor, hex.target_position(i, 6, orb.size, &vp));
        }

        for _ in 0..120 {
            scene.frame(1.0 / 60.0, &mut rng);
            assert_visible(&scene);
        }
    }

    #[test]
    fn test_settled_layout_splits_sides() {
        let (mut scene, _) = scene(PageKind::Home, IdleMotion::Physics);
        scene.input(InputEvent::Scroll(500.0));

        let vp = *scene.viewport();
        let lefts = scene
            .orbs()
            .iter()
            .filter(|o| o.position.x < vp.width / 2.0)
            .count();
        assert_eq!(lefts, 3);

        let first = scene.orbs().get(0).unwrap();
        assert_eq!(first.position, Point::new(18.0, 620.0));
        assert_eq!(SidePlacement::of(5, 6).side, Side::Right);
    }

    #[test]
    fn test_inner_page_settles_after_startup_delay() {
        let (mut scene, mut rng) = scene(PageKind::Inner, IdleMotion::Physics);
        assert_eq!(scene.frame(0.1, &mut rng), Schedule::Continue);
        assert_eq!(scene.state(), LayoutState::WideIdle);

        scene.frame(0.1, &mut rng);
        assert_eq!(scene.state(), LayoutState::Settled);
        assert_eq!(scene.frame(0.1, &mut rng), Schedule::Pause);

        scene.input(InputEvent::Scroll(0.0));
        assert_eq!(scene.state(), LayoutState::Settled);
    }

    #[test]
    fn test_resize_while_settled_resettles() {
        let (mut scene, _) = scene(PageKind::Home, IdleMotion::Physics);
        scene.input(InputEvent::Scroll(600.0));
        let before = positions(&scene);

        scene.input(InputEvent::Resize {
            width: 900.0,
            height: 700.0,
        });
        let after = positions(&scene);
        assert_ne!(before, after);
        assert_eq!(scene.orbs().get(3).unwrap().position.x, 900.0 - 18.0 - 92.0);
        assert_eq!(scene.state(), LayoutState::Settled);
    }

    #[test]
    fn test_resize_while_idle_resnaps_immediately() {
        let (mut scene, mut rng) = scene(PageKind::Home, IdleMotion::Physics);
        for _ in 0..20 {
            scene.frame(1.0 / 60.0, &mut rng);
        }
        scene.input(InputEvent::Resize {
            width: 1000.0,
            height: 600.0,
        });

        let vp = *scene.viewport();
        let center = scene.orbs().get(0).unwrap();
        assert_eq!(
            center.position,
            Layout::WideHex.target_position(0, 6, center.size, &vp)
        );
    }

    #[test]
    fn test_bumble_starts_in_circle_then_snaps_to_hex() {
        let (mut scene, mut rng) = scene(PageKind::Home, IdleMotion::Bumble);
        let vp = *scene.viewport();
        let circle = Layout::Circle { radius: 240.0 };
        let first = scene.orbs().get(1).unwrap();
        assert_eq!(first.anchor, circle.target_position(1, 6, first.size, &vp));

        scene.frame(0.2, &mut rng);
        let hex = scene.idle_layout();
        let center = scene.orbs().get(0).unwrap();
        assert_eq!(center.anchor, hex.target_position(0, 6, center.size, &vp));
        assert!(center.position.distance(center.anchor) <= center.phase.amplitude * 1.5);
    }
}
