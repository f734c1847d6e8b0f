use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::orbs::{self, ClickOutcome, Session};
use crate::gui::theme::{self, FADING_CSS_CLASS, LIGHT_CSS_CLASS, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use orbkit::orb::Destination;
use orbkit::{PageId, Point, Schedule, Theme, ThemeStore, ViewportState};
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

pub const DEFAULT_WIDTH: i32 = 1280;
pub const DEFAULT_HEIGHT: i32 = 800;

pub struct AppInit {
    pub session: Session,
    pub config: Config,
    pub config_path: PathBuf,
    pub seed: Option<u64>,
    pub theme_store: ThemeStore,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    pub session: Rc<RefCell<Session>>,
    pub ticking: Rc<Cell<bool>>,
    pub config: Config,
    pub config_path: PathBuf,
    pub seed: Option<u64>,
    pub theme_store: ThemeStore,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerMove(Point),
    PointerLeave,
    Wheel(f64),
    Resize(f64, f64),
    Click(Point),
    Navigate(Destination),
    ToggleTheme,
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Orbnav"),
            set_default_size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            add_css_class: "orbnav-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    if key == gtk::gdk::Key::t || key == gtk::gdk::Key::T {
                        sender.input(AppMsg::ToggleTheme);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "orbnav-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width as f64, height as f64));
                },

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::PointerMove(Point::new(x, y)));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::PointerLeave);
                    }
                },

                add_controller = gtk::GestureClick {
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Click(Point::new(x, y)));
                    }
                },

                add_controller = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL) {
                    connect_scroll[sender] => move |_, _, dy| {
                        sender.input(AppMsg::Wheel(dy));
                        glib::Propagation::Stop
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            session,
            config,
            config_path,
            seed,
            theme_store,
            events,
        } = init;

        theme::load_css();
        if session.theme == Theme::Light {
            root.add_css_class(LIGHT_CSS_CLASS);
        }

        let model = AppModel {
            session: Rc::new(RefCell::new(session)),
            ticking: Rc::new(Cell::new(false)),
            config,
            config_path,
            seed,
            theme_store,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let session_draw = model.session.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, width, height| {
                let session = session_draw.borrow();
                let colors = ThemeColors::for_theme(session.theme);
                if let Err(e) = orbs::draw(cr, &session, &colors, width as f64, height as f64) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        model.refresh();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::PointerMove(point) => {
                self.session.borrow_mut().pointer(Some(point));
                self.drawing_area.queue_draw();
            }
            AppMsg::PointerLeave => {
                self.session.borrow_mut().pointer(None);
                self.drawing_area.queue_draw();
            }
            AppMsg::Wheel(dy) => {
                self.session.borrow_mut().wheel(dy);
                self.refresh();
            }
            AppMsg::Resize(width, height) => {
                self.session.borrow_mut().resize(width, height);
                self.refresh();
            }
            AppMsg::Click(point) => {
                let outcome = self.session.borrow_mut().click(point);
                match outcome {
                    ClickOutcome::Nothing => {}
                    ClickOutcome::Scrolled => self.refresh(),
                    ClickOutcome::Navigate { destination, delay } => {
                        log::info!("Leaving for {}", destination);
                        self.drawing_area.add_css_class(FADING_CSS_CLASS);
                        glib::timeout_add_local_once(delay, move || {
                            sender.input(AppMsg::Navigate(destination));
                        });
                        self.refresh();
                    }
                }
            }
            AppMsg::Navigate(destination) => self.open_page(destination.page_id()),
            AppMsg::ToggleTheme => {
                let theme = {
                    let mut session = self.session.borrow_mut();
                    session.theme = session.theme.toggled();
                    session.theme
                };
                if let Err(e) = self.theme_store.save(theme) {
                    log::warn!("Failed to persist theme: {}", e);
                }
                if theme == Theme::Light {
                    self.root.add_css_class(LIGHT_CSS_CLASS);
                } else {
                    self.root.remove_css_class(LIGHT_CSS_CLASS);
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_from(&self.config_path) {
                Ok(new_config) => {
                    self.config = new_config;
                    let page = self.session.borrow().context.page.clone();
                    self.open_page(page);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => self.root.close(),
        }
    }
}

impl AppModel {
    /// Replaces the session with a fresh one for `page`, keeping viewport size and theme.
    fn open_page(&mut self, page: PageId) {
        let (viewport, theme) = {
            let session = self.session.borrow();
            let vp = session.scene.viewport();
            (ViewportState::new(vp.width, vp.height), session.theme)
        };

        match Session::new(&self.config, page, viewport, theme, self.seed) {
            Ok(session) => *self.session.borrow_mut() = session,
            Err(e) => {
                log::error!("Failed to open page: {}", e);
                self.session.borrow_mut().fading = false;
            }
        }
        self.drawing_area.remove_css_class(FADING_CSS_CLASS);
        self.refresh();
    }

    fn refresh(&self) {
        self.start_ticking();
        self.drawing_area.queue_draw();
    }

    /// Installs the frame callback unless one is already running. The callback removes
    /// itself once the session reports nothing left to animate.
    fn start_ticking(&self) {
        if self.ticking.replace(true) {
            return;
        }
        let session = self.session.clone();
        let ticking = self.ticking.clone();
        self.drawing_area.add_tick_callback(move |area, clock| {
            let schedule = session.borrow_mut().frame(clock.frame_time());
            area.queue_draw();
            match schedule {
                Schedule::Continue => glib::ControlFlow::Continue,
                Schedule::Pause => {
                    ticking.set(false);
                    glib::ControlFlow::Break
                }
            }
        });
    }
}
