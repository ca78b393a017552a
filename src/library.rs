//! Library module: the track model, importing files into tracks, and the
//! persisted list of categories.

mod categories;
mod import;
mod model;

pub use categories::CategoryStore;
pub use import::import_paths;
pub use model::Track;

#[cfg(test)]
mod tests;
