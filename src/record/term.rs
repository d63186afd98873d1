use std::fmt;
use url::Url;

/// An operator-supplied search keyword
///
/// The term drives the listing query and doubles as the relevance filter for
/// listing cards: a card survives only if its displayed title contains the
/// term, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Creates a search term, returning None for blank input
    pub fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            folded: raw.to_lowercase(),
        })
    }

    /// Splits a comma-separated list, dropping blank entries
    pub fn parse_list(input: &str) -> Vec<Self> {
        input.split(',').filter_map(Self::new).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Case-insensitive substring match against a displayed title
    pub fn matches(&self, title: &str) -> bool {
        title.trim().to_lowercase().contains(&self.folded)
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Href of a detail page as found on a listing card
///
/// Usually a site-relative path; it only becomes a navigable URL once joined
/// onto the site origin with [`PageReference::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageReference(String);

impl PageReference {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the reference against the site base URL
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(self.0.trim())
    }
}

impl fmt::Display for PageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
