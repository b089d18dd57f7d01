// src/resolve.rs

use ahash::AHashMap;

use crate::error::Result;

/// Outcome of looking up a taxon name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A stable identifier was found.
    Resolved(String),
    /// Unknown name; the name itself stands in as the identifier.
    Fallback(String),
}

impl Resolution {
    pub fn into_id(self) -> String {
        match self {
            Resolution::Resolved(id) | Resolution::Fallback(id) => id,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback(_))
    }
}

/// Maps a taxon name to an identifier.
///
/// A name the backend does not know is `Ok(Resolution::Fallback)`;
/// `Err` means the backend itself failed and aborts the run.
pub trait Resolver {
    fn resolve(&self, name: &str) -> Result<Resolution>;
}

/// Resolve `name` to an id, warning when the fallback is used.
pub fn resolve_id(resolver: &dyn Resolver, name: &str) -> Result<String> {
    let resolution = resolver.resolve(name)?;
    if resolution.is_fallback() {
        log::warn!("Unable to match tax ID for '{name}', using the name itself");
    }
    Ok(resolution.into_id())
}

/// In-memory name -> id table.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    ids: AHashMap<String, String>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.ids.insert(name.into(), id.into());
    }
}

impl<N: Into<String>, I: Into<String>> FromIterator<(N, I)> for MapResolver {
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut resolver = MapResolver::new();
        for (name, id) in iter {
            resolver.insert(name, id);
        }
        resolver
    }
}

impl Resolver for MapResolver {
    fn resolve(&self, name: &str) -> Result<Resolution> {
        Ok(match self.ids.get(name) {
            Some(id) => Resolution::Resolved(id.clone()),
            None => Resolution::Fallback(name.to_string()),
        })
    }
}
