//! Zip container output.
//!
//! XML entries are deflated; media entries are stored as-is since JPEG and
//! PNG data does not shrink further.

use super::PackageError;
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

pub enum Entry<'a> {
    Xml { name: String, text: String },
    Binary { name: String, bytes: &'a [u8] },
}

impl Entry<'_> {
    fn name(&self) -> &str {
        match self {
            Entry::Xml { name, .. } | Entry::Binary { name, .. } => name,
        }
    }
}

/// Write `entries` in order into an in-memory zip archive.
pub fn write_zip(entries: &[Entry<'_>]) -> Result<Vec<u8>, PackageError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for entry in entries {
        let name = entry.name().trim_start_matches('/');
        match entry {
            Entry::Xml { text, .. } => {
                zip.start_file(name, deflated)?;
                zip.write_all(text.as_bytes())?;
            }
            Entry::Binary { bytes, .. } => {
                zip.start_file(name, stored)?;
                zip.write_all(bytes)?;
            }
        }
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{zip_entry_names, zip_entry_text};

    #[test]
    fn entries_keep_their_order_and_lose_the_leading_slash() {
        let bytes = write_zip(&[
            Entry::Xml {
                name: "/[Content_Types].xml".into(),
                text: "<Types/>".into(),
            },
            Entry::Binary {
                name: "/ppt/media/image1.png".into(),
                bytes: &[1, 2, 3],
            },
        ])
        .unwrap();

        assert_eq!(
            zip_entry_names(&bytes),
            vec!["[Content_Types].xml", "ppt/media/image1.png"]
        );
        assert_eq!(zip_entry_text(&bytes, "[Content_Types].xml"), "<Types/>");
    }
}
