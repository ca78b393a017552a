use serde::{Deserialize, Serialize};

/// One imported audio file.
///
/// `name` is the identity key within a category; nothing else references a
/// track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,
    /// Already picked in the current shuffle round.
    #[serde(default)]
    pub played: bool,
}

impl Track {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            played: false,
        }
    }
}
