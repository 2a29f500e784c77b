//! Small helpers over the quick-xml writer used by every package part.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::utils::sanitize_xml_text;

pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Namespace declarations carried by every presentationml root element
pub const PML_NAMESPACES: [(&str, &str); 3] = [
    ("xmlns:a", NS_DRAWING),
    ("xmlns:r", NS_RELATIONSHIPS),
    ("xmlns:p", NS_PRESENTATION),
];

/// Start tag with attribute values stripped of characters XML cannot carry
fn element_with_attributes<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for (key, value) in attrs {
        let value = sanitize_xml_text(value);
        element.push_attribute((*key, value.as_str()));
    }
    element
}

/// An XML part being written into memory
pub struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    /// Start a standalone UTF-8 document
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = element_with_attributes(name, attrs);
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = element_with_attributes(name, attrs);
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Write escaped character data, dropping characters XML cannot carry
    pub fn text(&mut self, text: &str) -> Result<()> {
        let clean = sanitize_xml_text(text);
        self.writer.write_event(Event::Text(BytesText::new(&clean)))?;
        Ok(())
    }

    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_declaration_and_escaped_text() {
        let mut part = XmlPart::new().unwrap();
        part.start("root", &[("id", "a&b")]).unwrap();
        part.text_element("t", &[], "1 < 2\u{7}").unwrap();
        part.empty("leaf", &[]).unwrap();
        part.end("root").unwrap();
        let xml = String::from_utf8(part.finish()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains("<root id=\"a&amp;b\">"));
        assert!(xml.contains("<t>1 &lt; 2</t>"));
        assert!(xml.contains("<leaf/>"));
        assert!(xml.ends_with("</root>"));
    }

    #[test]
    fn attribute_values_drop_control_characters() {
        let mut part = XmlPart::new().unwrap();
        part.empty("pic", &[("descr", "we\u{1}ird_BF.png")]).unwrap();
        let xml = String::from_utf8(part.finish()).unwrap();

        assert!(xml.contains("<pic descr=\"weird_BF.png\"/>"));
        assert!(!xml.contains('\u{1}'));
    }
}
