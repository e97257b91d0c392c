//! Journal directory and public article links.
//!
//! Maps the canonical PLoS journal display names to their web sites and
//! formats article landing-page URLs from a DOI.

use crate::error::{PlosError, Result};
use std::collections::HashMap;

/// Static journal name -> base URL pairs
const JOURNAL_URLS: &[(&str, &str)] = &[
    ("PLoS Biology", "http://www.plosbiology.org"),
    ("PLoS Genetics", "http://www.plosgenetics.org"),
    ("PLoS Computational Biology", "http://www.ploscompbiol.org"),
    ("PLoS Medicine", "http://www.plosmedicine.org"),
    ("PLoS ONE", "http://www.plosone.org"),
    ("PLoS Neglected Tropical Diseases", "http://www.plosntds.org"),
    ("PLoS Pathogens", "http://www.plospathogens.org"),
];

/// Path segment between the journal site and the escaped DOI
const ARTICLE_PATH: &str = "/article/info%3Adoi%2F";

/// Immutable lookup table from journal display name to base web URL.
#[derive(Debug, Clone)]
pub struct JournalDirectory {
    urls: HashMap<String, String>,
}

impl JournalDirectory {
    /// Base URL of `journal`, or `UnknownJournal`.
    pub fn base_url(&self, journal: &str) -> Result<&str> {
        self.urls
            .get(journal)
            .map(String::as_str)
            .ok_or_else(|| PlosError::UnknownJournal(journal.to_string()))
    }

    /// Format a link to the article page, given its DOI and journal.
    ///
    /// Every `/` in the DOI is escaped to `%2F`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownJournal` when `journal` is not in the directory.
    pub fn format_article_url(&self, doi: &str, journal: &str) -> Result<String> {
        let base = self.base_url(journal)?;
        Ok(format!("{}{}{}", base, ARTICLE_PATH, doi.replace('/', "%2F")))
    }

    /// Journal names, sorted for display.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.urls.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl Default for JournalDirectory {
    fn default() -> Self {
        Self {
            urls: JOURNAL_URLS
                .iter()
                .map(|(name, url)| (name.to_string(), url.to_string()))
                .collect(),
        }
    }
}
