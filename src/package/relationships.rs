//! Relationships between parts and the `.rels` parts that record them.
//!
//! Targets are held as absolute part names and only made relative to the
//! owner's directory when the `.rels` XML is written.

use super::constants::{PACKAGE_ROOT, namespace};
use crate::xml::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub owner: String,
    pub target: String,
    pub rel_type: String,
}

/// Name of the `.rels` part holding `owner`'s relationships.
///
/// `/` → `/_rels/.rels`, `/ppt/slides/slide1.xml` → `/ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_part_name(owner: &str) -> String {
    if owner == PACKAGE_ROOT {
        return "/_rels/.rels".to_string();
    }
    let (dir, file) = split_part_name(owner);
    format!("{dir}/_rels/{file}.rels")
}

/// Express `target` relative to the directory containing `owner`.
pub fn relative_target(owner: &str, target: &str) -> String {
    if owner == PACKAGE_ROOT {
        return target.trim_start_matches('/').to_string();
    }
    let (owner_dir, _) = split_part_name(owner);
    let base: Vec<&str> = owner_dir.split('/').filter(|s| !s.is_empty()).collect();
    let segments: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let (dirs, file) = segments.split_at(segments.len().saturating_sub(1));
    let common = base
        .iter()
        .zip(dirs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = std::iter::repeat_n("..", base.len() - common).collect();
    parts.extend_from_slice(&dirs[common..]);
    parts.extend_from_slice(file);
    parts.join("/")
}

/// Build the `<Relationships>` tree for one owner.
pub fn rels_element(owner: &str, relationships: &[Relationship]) -> Element {
    Element::new("Relationships")
        .attr("xmlns", namespace::OPC_RELATIONSHIPS)
        .children_from(relationships.iter().map(|rel| {
            Element::new("Relationship")
                .attr("Id", &rel.id)
                .attr("Type", &rel.rel_type)
                .attr("Target", relative_target(owner, &rel.target))
        }))
}

/// Split `/a/b/c.xml` into (`/a/b`, `c.xml`).
fn split_part_name(name: &str) -> (&str, &str) {
    match name.rfind('/') {
        Some(i) => (&name[..i], &name[i + 1..]),
        None => ("", name),
    }
}
