use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog listing that can be turned into a play queue
///
/// Resolved by exhaustive match in the catalog implementation; there is no
/// string-prefix routing anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CatalogCategory {
    /// All tracks on one album
    Album(String),

    /// All tracks by one artist
    Artist(String),

    /// Members of a playlist, in playlist order
    Playlist(String),

    /// All tracks tagged with a genre
    Genre(String),

    /// Every track in the library
    AllTracks,
}

impl fmt::Display for CatalogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogCategory::Album(id) => write!(f, "album:{id}"),
            CatalogCategory::Artist(id) => write!(f, "artist:{id}"),
            CatalogCategory::Playlist(id) => write!(f, "playlist:{id}"),
            CatalogCategory::Genre(id) => write!(f, "genre:{id}"),
            CatalogCategory::AllTracks => write!(f, "all"),
        }
    }
}
