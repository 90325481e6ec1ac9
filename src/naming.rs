//! Output file naming: `<base>_<YYYYMMDD_HHMM>[_<n>].<ext>`.
//!
//! The timestamp is local wall-clock time to the minute, so two builds in the
//! same minute would collide; the second one gets `_2`, the third `_3`, and
//! so on. The check is advisory: nothing is reserved, and a file created
//! between the check and the write is the writer's problem (the deck writer
//! refuses to overwrite).
//!
//! ```text
//! slideshow_20261018_0942.pptx
//! slideshow_20261018_0942_2.pptx
//! ```

use std::path::{Path, PathBuf};

/// Local time formatted as `YYYYMMDD_HHMM`.
pub fn output_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M").to_string()
}

/// First name of the form `<base>_<stamp>[_<n>].<ext>` not present in `dir`.
/// Suffixes start at 2.
pub fn unique_file_name(dir: &Path, base: &str, ext: &str, stamp: &str) -> String {
    let plain = format!("{base}_{stamp}.{ext}");
    if !dir.join(&plain).exists() {
        return plain;
    }
    (2u32..)
        .map(|n| format!("{base}_{stamp}_{n}.{ext}"))
        .find(|name| !dir.join(name).exists())
        .unwrap_or(plain)
}

/// [`unique_file_name`] with the current timestamp, joined onto `dir`.
pub fn unique_output_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    dir.join(unique_file_name(dir, base, ext, &output_timestamp()))
}
