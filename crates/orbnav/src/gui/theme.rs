use gtk::gdk;
use gtk4 as gtk;
use orbkit::Theme;
use palette::Srgba;

pub const LIGHT_CSS_CLASS: &str = "light-theme";
pub const FADING_CSS_CLASS: &str = "fading";

pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub text: Srgba<f64>,
    pub rule: Srgba<f64>,
    pub orb: Srgba<f64>,
    pub center_orb: Srgba<f64>,
    pub hovered: Srgba<f64>,
    pub label: Srgba<f64>,
}

impl ThemeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Srgba::new(0.06, 0.07, 0.09, 1.0),
                text: Srgba::new(0.88, 0.9, 0.93, 1.0),
                rule: Srgba::new(1.0, 1.0, 1.0, 0.08),
                orb: Srgba::new(0.2, 0.32, 0.45, 0.85),
                center_orb: Srgba::new(0.36, 0.22, 0.5, 0.9),
                hovered: Srgba::new(0.4, 0.4, 0.8, 0.9),
                label: Srgba::new(1.0, 1.0, 1.0, 0.95),
            },
            Theme::Light => Self {
                background: Srgba::new(0.96, 0.96, 0.94, 1.0),
                text: Srgba::new(0.12, 0.13, 0.16, 1.0),
                rule: Srgba::new(0.0, 0.0, 0.0, 0.1),
                orb: Srgba::new(0.55, 0.72, 0.86, 0.9),
                center_orb: Srgba::new(0.74, 0.6, 0.88, 0.9),
                hovered: Srgba::new(0.45, 0.45, 0.9, 0.9),
                label: Srgba::new(0.08, 0.08, 0.12, 0.95),
            },
        }
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.orbnav-area {
    opacity: 1;
    transition: opacity 280ms ease;
}
.orbnav-area.fading {
    opacity: 0;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
