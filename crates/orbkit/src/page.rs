use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

pub const HOME_PAGE: &str = "index";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PageId(String);

crate::impl_string_newtype!(PageId);

impl PageId {
    pub fn home() -> Self {
        Self::new(HOME_PAGE)
    }

    /// File name the page is served under.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.0)
    }
}

/// Home-type pages settle and restore with scrolling; inner-type pages settle once on load.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, DeserializeFromStr, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[strum(to_string = "home", serialize = "index")]
    Home,
    #[strum(serialize = "inner")]
    Inner,
}

impl PageKind {
    pub fn of(page: &PageId) -> Self {
        if page.as_str() == HOME_PAGE {
            PageKind::Home
        } else {
            PageKind::Inner
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_kind_follows_page_id() {
        assert_eq!(PageKind::of(&PageId::home()), PageKind::Home);
        assert_eq!(PageKind::of(&PageId::new("about")), PageKind::Inner);
    }

    #[test]
    fn test_page_kind_deserialization() {
        let cases = vec![
            ("\"home\"", PageKind::Home),
            ("\"Index\"", PageKind::Home),
            ("\"INNER\"", PageKind::Inner),
        ];

        for (json, expected) in cases {
            let deserialized: PageKind = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }
}
