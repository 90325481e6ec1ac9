//! In-memory OPC package and its serialization to a zip container.
//!
//! A [`Package`] collects parts (XML trees or raw bytes, each with a content
//! type) and the relationships between them. Nothing is written until
//! [`Package::finalize`], which checks the package is well-formed and then
//! produces the archive bytes:
//!
//! 1. every relationship owner is the package root or an existing part
//! 2. every relationship target is an existing part
//! 3. every part has a content type and the registry resolves it
//! 4. every image reached through an image relationship has bytes that
//!    match its declared content type
//!
//! Archive order is `[Content_Types].xml`, `_rels/.rels`, then each part in
//! insertion order followed by its own `.rels` part when it has one.

pub mod constants;
pub mod content_types;
pub mod relationships;
mod writer;

pub use content_types::{ContentTypes, sniff_content_type};
pub use relationships::{Relationship, rels_part_name, relative_target};

use constants::{CONTENT_TYPES_PART, PACKAGE_ROOT, relationship_type};
use crate::xml::Element;
use std::collections::HashMap;
use thiserror::Error;
use writer::Entry;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Duplicate part name: {0}")]
    DuplicatePartName(String),
    #[error("Duplicate content type registration for {0}")]
    DuplicateContentType(String),
    #[error("Relationship {id} of {owner} points at missing part {target}")]
    DanglingRelationship {
        owner: String,
        id: String,
        target: String,
    },
    #[error("Relationship owner {0} is not a part")]
    UnknownOwner(String),
    #[error("Part {0} has no content type")]
    MissingContentType(String),
    #[error("Part {part} is declared {declared} but its bytes are {actual}")]
    ContentTypeMismatch {
        part: String,
        declared: String,
        actual: String,
    },
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub enum PartContent {
    Xml(Element),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct Part {
    content_type: String,
    content: PartContent,
}

impl Part {
    pub fn xml(content_type: impl Into<String>, root: Element) -> Self {
        Self {
            content_type: content_type.into(),
            content: PartContent::Xml(root),
        }
    }

    pub fn binary(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            content: PartContent::Binary(bytes),
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &PartContent {
        &self.content
    }
}

/// Lowercase extension of a part name's last segment.
pub(crate) fn part_extension(part_name: &str) -> Option<String> {
    let file = part_name.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if ext.is_empty() || (stem.is_empty() && !file.starts_with('.')) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[derive(Debug, Default)]
pub struct Package {
    parts: Vec<(String, Part)>,
    part_index: HashMap<String, usize>,
    relationships: HashMap<String, Vec<Relationship>>,
    name_counters: HashMap<String, u32>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused name of the form `<prefix><n>.<ext>`, counting from 1 per
    /// prefix. `("/ppt/media/image", "png")` → `/ppt/media/image1.png`.
    pub fn allocate_part_name(&mut self, prefix: &str, extension: &str) -> String {
        let counter = self.name_counters.entry(prefix.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{prefix}{counter}.{extension}");
            if !self.part_index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub fn add_part(&mut self, name: impl Into<String>, part: Part) -> Result<(), PackageError> {
        let name = name.into();
        if self.part_index.contains_key(&name) || name == CONTENT_TYPES_PART {
            return Err(PackageError::DuplicatePartName(name));
        }
        self.part_index.insert(name.clone(), self.parts.len());
        self.parts.push((name, part));
        Ok(())
    }

    /// Record a relationship from `owner` (a part name, or `/` for the
    /// package root) to `target`. Returns the new id, `rId1`, `rId2`, ...
    /// counted per owner.
    pub fn add_relationship(&mut self, owner: &str, target: &str, rel_type: &str) -> String {
        let rels = self.relationships.entry(owner.to_string()).or_default();
        let id = format!("rId{}", rels.len() + 1);
        rels.push(Relationship {
            id: id.clone(),
            owner: owner.to_string(),
            target: target.to_string(),
            rel_type: rel_type.to_string(),
        });
        id
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.part_index.get(name).map(|&i| &self.parts[i].1)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    pub fn relationships_of(&self, owner: &str) -> &[Relationship] {
        self.relationships
            .get(owner)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Validate and serialize the package to zip bytes.
    pub fn finalize(self) -> Result<Vec<u8>, PackageError> {
        self.validate_relationships()?;
        let content_types = ContentTypes::for_parts(
            self.parts
                .iter()
                .map(|(name, part)| (name.as_str(), part)),
        )?;
        self.validate_content_types(&content_types)?;

        let mut entries = Vec::with_capacity(self.parts.len() * 2 + 2);
        entries.push(Entry::Xml {
            name: CONTENT_TYPES_PART.to_string(),
            text: content_types.to_element().to_document(),
        });
        self.push_rels_entry(PACKAGE_ROOT, &mut entries);

        for (name, part) in &self.parts {
            entries.push(match part.content() {
                PartContent::Xml(root) => Entry::Xml {
                    name: name.clone(),
                    text: root.to_document(),
                },
                PartContent::Binary(bytes) => Entry::Binary {
                    name: name.clone(),
                    bytes,
                },
            });
            self.push_rels_entry(name, &mut entries);
        }

        writer::write_zip(&entries)
    }

    fn push_rels_entry<'a>(&'a self, owner: &str, entries: &mut Vec<Entry<'a>>) {
        let rels = self.relationships_of(owner);
        if !rels.is_empty() {
            entries.push(Entry::Xml {
                name: rels_part_name(owner),
                text: relationships::rels_element(owner, rels).to_document(),
            });
        }
    }

    fn validate_relationships(&self) -> Result<(), PackageError> {
        let mut owners: Vec<&String> = self.relationships.keys().collect();
        owners.sort();
        for owner in owners {
            if owner != PACKAGE_ROOT && !self.part_index.contains_key(owner) {
                return Err(PackageError::UnknownOwner(owner.clone()));
            }
            for rel in &self.relationships[owner] {
                if !self.part_index.contains_key(&rel.target) {
                    return Err(PackageError::DanglingRelationship {
                        owner: owner.clone(),
                        id: rel.id.clone(),
                        target: rel.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_content_types(&self, content_types: &ContentTypes) -> Result<(), PackageError> {
        for (name, part) in &self.parts {
            if part.content_type().is_empty()
                || content_types.resolve(name) != Some(part.content_type())
            {
                return Err(PackageError::MissingContentType(name.clone()));
            }
        }

        let image_targets = self
            .relationships
            .values()
            .flatten()
            .filter(|rel| rel.rel_type == relationship_type::IMAGE)
            .map(|rel| rel.target.as_str());
        for target in image_targets {
            let Some(part) = self.part(target) else {
                continue;
            };
            let PartContent::Binary(bytes) = part.content() else {
                continue;
            };
            let actual = sniff_content_type(bytes).unwrap_or("unknown");
            if actual != part.content_type() {
                return Err(PackageError::ContentTypeMismatch {
                    part: target.to_string(),
                    declared: part.content_type().to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(())
    }
}
