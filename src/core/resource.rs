//! Resource classes, URL lists and the halt signal returned by callbacks.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two independently scheduled kinds of resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceClass {
    /// Executable code (scripts). Execution order matters.
    Code,
    /// Stylesheets. Precedence follows document position.
    Style,
}

impl ResourceClass {
    /// Both classes, in a stable order.
    pub const ALL: [Self; 2] = [Self::Code, Self::Style];

    /// Short label used in logs (`js` / `css`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Code => "js",
            Self::Style => "css",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Code => 0,
            Self::Style => 1,
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of one submitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(Uuid);

impl BatchId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered list of resource locations.
///
/// Accepts a single location or any ordered sequence of them. Blank entries
/// are treated as malformed and dropped by [`UrlList::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlList(Vec<String>);

impl UrlList {
    /// Number of entries, including blank ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop blank entries and trim surrounding whitespace.
    ///
    /// Returns the cleaned list together with the number of dropped entries.
    #[must_use]
    pub fn normalize(self) -> (Vec<String>, usize) {
        let before = self.0.len();
        let urls: Vec<String> = self
            .0
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        let dropped = before - urls.len();
        (urls, dropped)
    }
}

impl From<&str> for UrlList {
    fn from(url: &str) -> Self {
        Self(vec![url.to_string()])
    }
}

impl From<String> for UrlList {
    fn from(url: String) -> Self {
        Self(vec![url])
    }
}

impl From<Vec<String>> for UrlList {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

impl From<Vec<&str>> for UrlList {
    fn from(urls: Vec<&str>) -> Self {
        Self(urls.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for UrlList {
    fn from(urls: &[&str]) -> Self {
        Self(urls.iter().map(|u| (*u).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for UrlList {
    fn from(urls: [&str; N]) -> Self {
        Self(urls.iter().map(|u| (*u).to_string()).collect())
    }
}

impl FromIterator<String> for UrlList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What a batch callback asks the loader to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Promote the next queued batch of the class.
    #[default]
    Continue,
    /// Leave the queue paused until the next submit or explicit advance.
    Halt,
}

impl Flow {
    /// Whether this value pauses the queue.
    #[must_use]
    pub const fn is_halt(self) -> bool {
        matches!(self, Self::Halt)
    }
}

impl From<bool> for Flow {
    /// `true` halts, mirroring a truthy callback return.
    fn from(halt: bool) -> Self {
        if halt {
            Self::Halt
        } else {
            Self::Continue
        }
    }
}

impl From<()> for Flow {
    fn from((): ()) -> Self {
        Self::Continue
    }
}
