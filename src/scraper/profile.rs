use ::scraper::{Html, Selector};

use crate::error::{ExtractError, Result};
use crate::extract::link;

/// The athlete profile link on a race analysis page.
pub(crate) struct ProfilePage {
    base_url: String,
    anchor: Selector,
}

impl ProfilePage {
    pub(crate) fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            anchor: Selector::parse("a[href^=\"/athlete/\"]")?,
        })
    }

    pub(crate) fn extract(&self, document: &Html) -> std::result::Result<String, ExtractError> {
        link(
            &self.base_url,
            &document.root_element(),
            &self.anchor,
            "athlete profile link",
        )
    }
}
