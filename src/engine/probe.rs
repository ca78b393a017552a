use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;

/// Read the track length from file properties.
///
/// Used when the decoder cannot tell (common for VBR mp3 without a Xing
/// header). Returns `None` for unreadable or non-audio files.
pub fn probe_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let d = tagged.properties().duration();
            (!d.is_zero()).then_some(d)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not probe duration");
            None
        }
    }
}
