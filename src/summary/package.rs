//! Open Packaging Conventions container: parts, content types and relationships.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use super::xml::{XmlPart, NS_CONTENT_TYPES, NS_PACKAGE_RELATIONSHIPS};

pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const CT_XML: &str = "application/xml";
pub const CT_PNG: &str = "image/png";

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
pub const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
pub const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
pub const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";

/// Relationship list of a single part
#[derive(Debug, Default)]
pub struct Relationships {
    entries: Vec<(String, &'static str, String)>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its id (`rId1`, `rId2`, ...)
    pub fn add(&mut self, rel_type: &'static str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((id.clone(), rel_type, target.into()));
        id
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlPart::new()?;
        xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
        for (id, rel_type, target) in &self.entries {
            xml.empty(
                "Relationship",
                &[("Id", id.as_str()), ("Type", *rel_type), ("Target", target.as_str())],
            )?;
        }
        xml.end("Relationships")?;
        Ok(xml.finish())
    }
}

/// Parts collected in memory and zipped on `finish`
#[derive(Default)]
pub struct Package {
    parts: Vec<(String, Vec<u8>)>,
    overrides: Vec<(String, String)>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part; `content_type` is recorded as an override unless the extension default covers it
    pub fn add_part(&mut self, name: &str, content_type: Option<&str>, bytes: Vec<u8>) {
        if let Some(content_type) = content_type {
            self.overrides
                .push((format!("/{}", name), content_type.to_string()));
        }
        self.parts.push((name.to_string(), bytes));
    }

    /// Add the relationships part belonging to `source_part` (empty string for the package)
    pub fn add_relationships(&mut self, source_part: &str, rels: &Relationships) -> Result<()> {
        let name = match source_part.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None if source_part.is_empty() => "_rels/.rels".to_string(),
            None => format!("_rels/{}.rels", source_part),
        };
        self.add_part(&name, None, rels.to_xml()?);
        Ok(())
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    fn content_types(&self) -> Result<Vec<u8>> {
        let mut xml = XmlPart::new()?;
        xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        for (extension, content_type) in [("rels", CT_RELATIONSHIPS), ("xml", CT_XML), ("png", CT_PNG)] {
            xml.empty(
                "Default",
                &[("Extension", extension), ("ContentType", content_type)],
            )?;
        }
        for (part_name, content_type) in &self.overrides {
            xml.empty(
                "Override",
                &[("PartName", part_name.as_str()), ("ContentType", content_type.as_str())],
            )?;
        }
        xml.end("Types")?;
        Ok(xml.finish())
    }

    /// Zip every part, content types first
    pub fn finish(self) -> Result<Vec<u8>> {
        let content_types = self.content_types()?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(&content_types)?;
        for (name, bytes) in &self.parts {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(bytes)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}
