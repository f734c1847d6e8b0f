use super::model::Session;
use super::{CONTENT_INSET, HEADING_FONT_SIZE, LABEL_FONT_SIZE, TITLE_FONT_SIZE};
use crate::gui::theme::ThemeColors;
use crate::site::Section;
use cairo::Context;
use orbkit::Orb;
use palette::Srgba;
use std::f64::consts::PI;

struct OrbRenderer<'a> {
    orb: &'a Orb,
    scroll_y: f64,
    scale: f64,
    hovered: bool,
}

impl<'a> OrbRenderer<'a> {
    fn new(orb: &'a Orb, scroll_y: f64, scale: f64, hovered: bool) -> Self {
        Self {
            orb,
            scroll_y,
            scale,
            hovered,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        self.draw_circle(cr, colors)?;
        self.draw_label(cr, colors)
    }

    fn center(&self) -> (f64, f64) {
        let c = self.orb.center();
        (c.x, c.y - self.scroll_y)
    }

    fn draw_circle(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let color = OrbState::resolve(self.orb, self.hovered).color(colors);
        set_source(cr, color);
        let (x, y) = self.center();
        cr.arc(x, y, self.orb.radius() * self.scale, 0.0, 2.0 * PI);
        cr.fill()
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_source(cr, colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(LABEL_FONT_SIZE * self.scale);
        let text = self.orb.entry.label.as_str();
        if let Ok(ext) = cr.text_extents(text) {
            let (x, y) = self.center();
            cr.move_to(x - ext.width() / 2.0, y + ext.height() / 2.0);
            cr.show_text(text)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrbState {
    Hovered,
    Center,
    Idle,
}

impl OrbState {
    fn resolve(orb: &Orb, hovered: bool) -> Self {
        if hovered {
            Self::Hovered
        } else if orb.is_center {
            Self::Center
        } else {
            Self::Idle
        }
    }

    fn color(self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Hovered => colors.hovered,
            Self::Center => colors.center_orb,
            Self::Idle => colors.orb,
        }
    }
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn draw_section(
    cr: &Context,
    section: &Section,
    index: usize,
    scroll_y: f64,
    width: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let top = section.top - scroll_y;

    if index > 0 {
        set_source(cr, colors.rule);
        cr.rectangle(CONTENT_INSET, top, (width - 2.0 * CONTENT_INSET).max(0.0), 1.0);
        cr.fill()?;
    }

    let size = if index == 0 {
        TITLE_FONT_SIZE
    } else {
        HEADING_FONT_SIZE
    };
    set_source(cr, colors.text);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    let text = section.title.as_str();
    if let Ok(ext) = cr.text_extents(text) {
        let baseline = if index == 0 {
            top + section.height * 0.6
        } else {
            top + 96.0
        };
        cr.move_to(width / 2.0 - ext.width() / 2.0, baseline);
        cr.show_text(text)?;
    }
    Ok(())
}

pub fn draw(
    cr: &Context,
    session: &Session,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    set_source(cr, colors.background);
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()?;

    let scroll_y = session.scroll_y();
    for (i, section) in session.page.sections.iter().enumerate() {
        // only sections intersecting the viewport
        if section.top + section.height >= scroll_y && section.top <= scroll_y + height {
            draw_section(cr, section, i, scroll_y, width, colors)?;
        }
    }

    let hovered = session.hovered();
    for orb in session.scene.orbs().iter() {
        let is_hovered = hovered.is_some_and(|h| h.id() == orb.id());
        OrbRenderer::new(orb, scroll_y, session.pulse_scale(orb.id()), is_hovered)
            .draw(cr, colors)?;
    }
    Ok(())
}
