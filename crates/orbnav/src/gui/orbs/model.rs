use crate::config::Config;
use crate::gui::orbs::{FRAME_DT_DEFAULT, FRAME_DT_MAX, SCROLL_DURATION, WHEEL_STEP};
use crate::site::Page;
use orbkit::geometry::Point;
use orbkit::motion::MotionDriver;
use orbkit::interaction::{self, Activation, Navigator, PageContext};
use orbkit::orb::{Destination, OrbSetError};
use orbkit::{
    InputEvent, Orb, OrbId, OrbSet, PageId, PageKind, Scene, Schedule, Theme,
    ViewportState,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    elapsed: f64,
}

impl ScrollAnimation {
    fn position(&self) -> f64 {
        let t = (self.elapsed / SCROLL_DURATION).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * ease_in_out(t)
    }

    fn finished(&self) -> bool {
        self.elapsed >= SCROLL_DURATION
    }
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Collects what an activation asked for so the session can apply it afterwards.
#[derive(Debug, Default)]
struct Effects {
    scroll: Option<PageId>,
    pulse: Option<OrbId>,
    fade: Option<Duration>,
    navigate: Option<(Destination, Duration)>,
}

impl Navigator for Effects {
    fn scroll_into_view(&mut self, anchor: &PageId) {
        self.scroll = Some(anchor.clone());
    }

    fn pulse(&mut self, orb: &OrbId) {
        self.pulse = Some(orb.clone());
    }

    fn fade_out(&mut self, duration: Duration) {
        self.fade = Some(duration);
    }

    fn navigate_after(&mut self, destination: &Destination, delay: Duration) {
        self.navigate = Some((destination.clone(), delay));
    }
}

/// What the window has to do after a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Nothing,
    Scrolled,
    Navigate { destination: Destination, delay: Duration },
}

/// Everything the window shows for the current page.
pub struct Session {
    pub scene: Scene,
    pub page: Page,
    pub context: PageContext,
    pub theme: Theme,
    pub fading: bool,
    rng: SmallRng,
    scroll: Option<ScrollAnimation>,
    pulses: Vec<(OrbId, Duration)>,
    last_frame: Option<i64>,
}

impl Session {
    pub fn new(
        config: &Config,
        page_id: PageId,
        viewport: ViewportState,
        theme: Theme,
        seed: Option<u64>,
    ) -> Result<Self, OrbSetError> {
        let mut rng = seed.map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        let nav = config.nav_table();
        let page = Page::build(&page_id, &nav);
        let viewport = viewport.with_document_height(page.height().max(viewport.height));

        let orbs = OrbSet::new(&nav, config.orbs, &config.motion, &viewport, &mut rng)?;
        let scene = Scene::new(
            orbs,
            PageKind::of(&page_id),
            config.layout,
            MotionDriver::new(config.motion, config.idle),
            viewport,
        );
        log::info!("Opened {} page '{}'", scene.kind(), page_id);

        Ok(Self {
            scene,
            context: PageContext::new(page_id),
            page,
            theme,
            fading: false,
            rng,
            scroll: None,
            pulses: Vec::new(),
            last_frame: None,
        })
    }

    /// Advances one frame. `frame_time` is the frame clock's timestamp in microseconds.
    pub fn frame(&mut self, frame_time: i64) -> Schedule {
        let dt = self
            .last_frame
            .map(|last| (frame_time - last) as f64 / 1_000_000.0)
            .unwrap_or(FRAME_DT_DEFAULT)
            .clamp(0.0, FRAME_DT_MAX);
        self.last_frame = Some(frame_time);

        if let Some(mut anim) = self.scroll.take() {
            anim.elapsed += dt;
            self.scene.input(InputEvent::Scroll(anim.position()));
            if !anim.finished() {
                self.scroll = Some(anim);
            }
        }

        let step = Duration::from_secs_f64(dt);
        self.pulses.retain_mut(|(_, elapsed)| {
            *elapsed += step;
            *elapsed < interaction::PULSE_DURATION
        });

        let schedule = self.scene.frame(dt, &mut self.rng);
        if schedule == Schedule::Continue || self.is_animating() {
            Schedule::Continue
        } else {
            self.last_frame = None;
            Schedule::Pause
        }
    }

    pub fn is_animating(&self) -> bool {
        self.scroll.is_some() || !self.pulses.is_empty() || self.fading
    }

    pub fn scroll_y(&self) -> f64 {
        self.scene.viewport().scroll_y
    }

    fn clamp_scroll(&self, y: f64) -> f64 {
        y.clamp(0.0, self.scene.viewport().max_scroll())
    }

    pub fn wheel(&mut self, dy: f64) {
        self.scroll = None;
        let y = self.clamp_scroll(self.scroll_y() + dy * WHEEL_STEP);
        self.scene.input(InputEvent::Scroll(y));
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.scroll = Some(ScrollAnimation {
            from: self.scroll_y(),
            to: self.clamp_scroll(y),
            elapsed: 0.0,
        });
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.scene.input(InputEvent::Resize { width, height });
        self.scene.input(InputEvent::DocumentHeight(self.page.height()));
        let y = self.clamp_scroll(self.scroll_y());
        self.scene.input(InputEvent::Scroll(y));
    }

    /// `point` is in viewport coordinates.
    pub fn pointer(&mut self, point: Option<Point>) {
        self.scene.input(match point {
            Some(p) => InputEvent::PointerMove(p),
            None => InputEvent::PointerLeave,
        });
    }

    pub fn hovered(&self) -> Option<&Orb> {
        self.scene
            .cursor()
            .and_then(|c| self.scene.orbs().hit_test(c))
    }

    pub fn pulse_scale(&self, id: &OrbId) -> f64 {
        self.pulses
            .iter()
            .find(|(orb, _)| orb == id)
            .map_or(1.0, |(_, elapsed)| interaction::pulse_scale(*elapsed))
    }

    pub fn click(&mut self, point: Point) -> ClickOutcome {
        if self.fading {
            return ClickOutcome::Nothing;
        }
        let in_document = point.offset(0.0, self.scroll_y());
        let Some(orb) = self.scene.orbs().hit_test(in_document).cloned() else {
            return ClickOutcome::Nothing;
        };

        let mut effects = Effects::default();
        match interaction::activate(&orb, &self.context, &self.page, &mut effects) {
            Activation::ScrollTo { .. } => {
                if let Some(top) = effects.scroll.and_then(|a| self.page.anchor_top(&a)) {
                    self.scroll_to(top);
                }
                if let Some(id) = effects.pulse {
                    self.pulses.retain(|(o, _)| *o != id);
                    self.pulses.push((id, Duration::ZERO));
                }
                ClickOutcome::Scrolled
            }
            Activation::Navigate { .. } => match effects.navigate {
                Some((destination, delay)) => {
                    self.fading = effects.fade.is_some();
                    ClickOutcome::Navigate { destination, delay }
                }
                None => ClickOutcome::Nothing,
            },
        }
    }
}
