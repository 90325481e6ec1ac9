//! The `[Content_Types].xml` registry.
//!
//! Binary parts are covered by an extension default (`png` → `image/png`),
//! XML parts by a per-part override. Each extension and each part name may
//! appear once; a second registration is an internal bug and fails fast.

use super::constants::{content_type as ct, namespace};
use super::{PackageError, Part, PartContent, part_extension};
use crate::xml::Element;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
    default_index: HashMap<String, usize>,
    override_index: HashMap<String, usize>,
}

impl ContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a default for an extension (lowercase, no dot).
    pub fn add_default(&mut self, extension: &str, content_type: &str) -> Result<(), PackageError> {
        let extension = extension.to_ascii_lowercase();
        if self.default_index.contains_key(&extension) {
            return Err(PackageError::DuplicateContentType(extension));
        }
        self.default_index
            .insert(extension.clone(), self.defaults.len());
        self.defaults.push((extension, content_type.to_string()));
        Ok(())
    }

    /// Register an override for one part name.
    pub fn add_override(&mut self, part_name: &str, content_type: &str) -> Result<(), PackageError> {
        if self.override_index.contains_key(part_name) {
            return Err(PackageError::DuplicateContentType(part_name.to_string()));
        }
        self.override_index
            .insert(part_name.to_string(), self.overrides.len());
        self.overrides
            .push((part_name.to_string(), content_type.to_string()));
        Ok(())
    }

    /// Build the registry covering every part in `parts`.
    ///
    /// `rels` and `xml` defaults are always present. A binary part whose
    /// extension is already mapped to a different type gets an override.
    pub fn for_parts<'a>(
        parts: impl IntoIterator<Item = (&'a str, &'a Part)>,
    ) -> Result<Self, PackageError> {
        let mut registry = Self::new();
        registry.add_default("rels", ct::OPC_RELATIONSHIPS)?;
        registry.add_default("xml", ct::XML)?;

        for (name, part) in parts {
            match part.content() {
                PartContent::Xml(_) => registry.add_override(name, part.content_type())?,
                PartContent::Binary(_) => match part_extension(name) {
                    Some(ext) => match registry.default_for(&ext) {
                        None => registry.add_default(&ext, part.content_type())?,
                        Some(existing) if existing == part.content_type() => {}
                        Some(_) => registry.add_override(name, part.content_type())?,
                    },
                    None => registry.add_override(name, part.content_type())?,
                },
            }
        }
        Ok(registry)
    }

    pub fn default_for(&self, extension: &str) -> Option<&str> {
        self.default_index
            .get(&extension.to_ascii_lowercase())
            .map(|&i| self.defaults[i].1.as_str())
    }

    /// Resolve the content type a reader would assign to `part_name`:
    /// override first, then the extension default.
    pub fn resolve(&self, part_name: &str) -> Option<&str> {
        if let Some(&i) = self.override_index.get(part_name) {
            return Some(self.overrides[i].1.as_str());
        }
        part_extension(part_name).and_then(|ext| self.default_for(&ext))
    }

    pub fn to_element(&self) -> Element {
        let defaults = self.defaults.iter().map(|(ext, ct)| {
            Element::new("Default")
                .attr("Extension", ext)
                .attr("ContentType", ct)
        });
        let overrides = self.overrides.iter().map(|(name, ct)| {
            Element::new("Override")
                .attr("PartName", name)
                .attr("ContentType", ct)
        });
        Element::new("Types")
            .attr("xmlns", namespace::OPC_CONTENT_TYPES)
            .children_from(defaults)
            .children_from(overrides)
    }
}

/// Sniff an image's real content type from its leading bytes.
pub fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    Some(format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::png_bytes;

    #[test]
    fn duplicate_default_fails_fast() {
        let mut registry = ContentTypes::new();
        registry.add_default("png", ct::PNG).unwrap();
        let err = registry.add_default("PNG", ct::PNG).unwrap_err();
        assert!(matches!(err, PackageError::DuplicateContentType(ext) if ext == "png"));
    }

    #[test]
    fn duplicate_override_fails_fast() {
        let mut registry = ContentTypes::new();
        registry
            .add_override("/ppt/slides/slide1.xml", ct::PML_SLIDE)
            .unwrap();
        assert!(
            registry
                .add_override("/ppt/slides/slide1.xml", ct::PML_SLIDE)
                .is_err()
        );
    }

    #[test]
    fn registry_covers_xml_and_binary_parts() {
        let slide = Part::xml(ct::PML_SLIDE, Element::new("p:sld"));
        let image_a = Part::binary(ct::PNG, png_bytes(2, 2));
        let image_b = Part::binary(ct::PNG, png_bytes(3, 3));
        let parts = vec![
            ("/ppt/slides/slide1.xml", &slide),
            ("/ppt/media/image1.png", &image_a),
            ("/ppt/media/image2.png", &image_b),
        ];
        let registry = ContentTypes::for_parts(parts).unwrap();

        assert_eq!(registry.resolve("/ppt/slides/slide1.xml"), Some(ct::PML_SLIDE));
        assert_eq!(registry.resolve("/ppt/media/image2.png"), Some(ct::PNG));
        assert_eq!(registry.resolve("/_rels/.rels"), Some(ct::OPC_RELATIONSHIPS));

        let xml = registry.to_element().to_xml();
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
        assert_eq!(xml.matches("<Override ").count(), 1);
    }

    #[test]
    fn conflicting_binary_extension_gets_override() {
        let a = Part::binary(ct::JPEG, vec![0xFF, 0xD8, 0xFF]);
        let b = Part::binary("image/x-custom", vec![1, 2, 3]);
        let registry =
            ContentTypes::for_parts(vec![("/media/a.bin", &a), ("/media/b.bin", &b)]).unwrap();
        assert_eq!(registry.resolve("/media/a.bin"), Some(ct::JPEG));
        assert_eq!(registry.resolve("/media/b.bin"), Some("image/x-custom"));
    }

    #[test]
    fn defaults_precede_overrides() {
        let slide = Part::xml(ct::PML_SLIDE, Element::new("p:sld"));
        let registry = ContentTypes::for_parts(vec![("/ppt/slides/slide1.xml", &slide)]).unwrap();
        let xml = registry.to_element().to_xml();
        let last_default = xml.rfind("<Default ").unwrap();
        let first_override = xml.find("<Override ").unwrap();
        assert!(last_default < first_override);
    }

    #[test]
    fn sniff_recognises_png() {
        assert_eq!(sniff_content_type(&png_bytes(1, 1)), Some(ct::PNG));
        assert_eq!(sniff_content_type(b"nope"), None);
    }
}
