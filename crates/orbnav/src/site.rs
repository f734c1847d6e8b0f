use orbkit::interaction::AnchorLookup;
use orbkit::{NavTable, PageId};

pub const HERO_HEIGHT: f64 = 900.0;
pub const SECTION_HEIGHT: f64 = 640.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub anchor: PageId,
    pub title: String,
    pub top: f64,
    pub height: f64,
}

/// The static document shown behind the orbs.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Page {
    /// A hero section anchored at the page's own id, followed by plain content sections.
    pub fn build(id: &PageId, nav: &NavTable) -> Self {
        let title = std::iter::once(&nav.center)
            .chain(&nav.entries)
            .find(|e| e.href.page_id() == *id)
            .map(|e| e.label.clone())
            .unwrap_or_else(|| id.to_string());

        let headings = ["Overview", "Details", "Notes"];
        let mut sections = vec![Section {
            anchor: id.clone(),
            title: title.clone(),
            top: 0.0,
            height: HERO_HEIGHT,
        }];
        for (i, heading) in headings.iter().enumerate() {
            sections.push(Section {
                anchor: PageId::new(format!("{}-{}", id, heading.to_lowercase())),
                title: heading.to_string(),
                top: HERO_HEIGHT + i as f64 * SECTION_HEIGHT,
                height: SECTION_HEIGHT,
            });
        }

        Self {
            id: id.clone(),
            title,
            sections,
        }
    }

    pub fn height(&self) -> f64 {
        self.sections
            .last()
            .map(|s| s.top + s.height)
            .unwrap_or_default()
    }

    pub fn anchor_top(&self, anchor: &PageId) -> Option<f64> {
        self.sections
            .iter()
            .find(|s| s.anchor == *anchor)
            .map(|s| s.top)
    }
}

impl AnchorLookup for Page {
    fn has_anchor(&self, id: &PageId) -> bool {
        self.anchor_top(id).is_some()
    }
}
