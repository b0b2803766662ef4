//! Browsing history: a stack of visited URLs, current page on top

use url::Url;

/// Visited pages, oldest at the bottom
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<Url>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly loaded page
    pub fn push(&mut self, url: Url) {
        self.entries.push(url);
    }

    /// Drop the current page and return the one below it.
    ///
    /// With one entry or none nothing changes and `None` is returned.
    pub fn back(&mut self) -> Option<&Url> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.entries.last()
    }

    pub fn current(&self) -> Option<&Url> {
        self.entries.last()
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.entries.iter().rev()
    }
}
