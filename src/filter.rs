//! Filter engine: derives the visible track list from the active genre tab
//! and the search box.

use crate::catalog::{Catalog, Track};

/// The active genre tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Genre {
    #[default]
    All,
    Named(String),
}

impl Genre {
    pub fn label(&self) -> &str {
        match self {
            Genre::All => "All",
            Genre::Named(name) => name,
        }
    }

    pub fn matches(&self, track: &Track) -> bool {
        match self {
            Genre::All => true,
            Genre::Named(name) => track.genre == *name,
        }
    }
}

/// `All` followed by each distinct genre in order of first appearance.
pub fn genres(catalog: &Catalog) -> Vec<Genre> {
    let mut out = vec![Genre::All];
    for track in catalog.tracks() {
        if !out[1..].iter().any(|g| g.label() == track.genre) {
            out.push(Genre::Named(track.genre.clone()));
        }
    }
    out
}

/// Precomputed lowercase titles so a keystroke does not re-lowercase the
/// whole catalog.
#[derive(Clone, Debug, Default)]
pub struct TitleIndex {
    lower_titles: Vec<String>,
}

impl TitleIndex {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            lower_titles: catalog
                .tracks()
                .iter()
                .map(|t| t.title.to_lowercase())
                .collect(),
        }
    }

    /// Catalog indices of the tracks that pass both the genre and the
    /// case-insensitive title substring predicates, in catalog order.
    pub fn view(&self, catalog: &Catalog, genre: &Genre, query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        catalog
            .tracks()
            .iter()
            .zip(&self.lower_titles)
            .enumerate()
            .filter(|(_, (track, lower))| genre.matches(track) && lower.contains(&query))
            .map(|(i, _)| i)
            .collect()
    }
}
