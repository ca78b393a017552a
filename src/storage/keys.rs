//! Key schema for everything the app persists.
//!
//! Category-scoped keys embed the category title verbatim; the title is
//! the category's identity.

/// Global play mode.
pub const MODE: &str = "mode";
/// JSON array of category titles, in creation order.
pub const CATEGORIES: &str = "categories";
/// Title of the category that was open when the app last exited.
pub const LAST_CATEGORY: &str = "last_category";

/// JSON snapshot of a category's tracks.
pub fn playlist(category: &str) -> String {
    format!("playlist/{category}")
}

/// Name of the track that was current in `category`.
pub fn playing(category: &str) -> String {
    format!("playing/{category}")
}

/// Last persisted position (milliseconds) of the current track in `category`.
pub fn position(category: &str) -> String {
    format!("position/{category}")
}
