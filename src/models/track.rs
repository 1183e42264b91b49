use serde::{Deserialize, Serialize};

/// A matched track as served to clients.
///
/// Field names serialize in PascalCase to keep the wire format stable for
/// existing consumers:
/// `{"Name":...,"Artists":[...],"Album":...,"Href":...,"Territories":...}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Track {
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    /// Stable reference id, e.g. `spotify:track:5r35Zd5Onw3aV3Gm9XdgtI`.
    pub href: String,
    /// Space-separated territory codes the track is available in.
    pub territories: String,
}

impl Track {
    /// The all-empty value doubles as the "no match found" sentinel: a
    /// searcher that finds nothing returns `Track::default()` with no error.
    pub fn is_empty(&self) -> bool {
        *self == Track::default()
    }
}
