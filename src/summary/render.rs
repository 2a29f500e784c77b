use std::fs;
use std::io::Cursor;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use image::{ImageFormat, ImageReader};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Emu, Placement, SlideGeometry, SlidePlan};
use crate::utils::ensure_directory_exists;
use super::package::{
    Package, Relationships, REL_CORE_PROPERTIES, REL_EXTENDED_PROPERTIES, REL_IMAGE,
    REL_NOTES_MASTER, REL_NOTES_SLIDE, REL_OFFICE_DOCUMENT, REL_PRES_PROPS, REL_SLIDE,
    REL_SLIDE_LAYOUT, REL_SLIDE_MASTER, REL_TABLE_STYLES, REL_THEME,
};
use super::templates::{
    self, CT_CORE_PROPERTIES, CT_EXTENDED_PROPERTIES, CT_NOTES_MASTER, CT_NOTES_SLIDE,
    CT_PRESENTATION, CT_PRES_PROPS, CT_SLIDE, CT_SLIDE_LAYOUT, CT_SLIDE_MASTER, CT_TABLE_STYLES,
    CT_THEME, TABLE_STYLES, THEME,
};
use super::xml::{XmlPart, PML_NAMESPACES};

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const DECK_TITLE: &str = "Confocal Summary";
const FIRST_SLIDE_ID: usize = 256;
const NOTES_WIDTH: Emu = 6_858_000;
const NOTES_HEIGHT: Emu = 9_144_000;

/// Outcome of rendering a deck
#[derive(Debug, Default)]
pub struct RenderReport {
    pub slides: usize,
    pub images: usize,
    /// Images that could not be placed; their slots were left empty
    pub warnings: Vec<Error>,
}

/// PNG bytes with their native pixel size
struct LoadedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

fn load_image(path: &Path) -> std::result::Result<LoadedImage, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    let (width, height) = ImageReader::with_format(Cursor::new(&bytes), ImageFormat::Png)
        .into_dimensions()
        .map_err(|e| e.to_string())?;
    if width == 0 || height == 0 {
        return Err("image has no pixels".to_string());
    }
    Ok(LoadedImage {
        bytes,
        width,
        height,
    })
}

/// Height of a picture drawn `width` wide, keeping the native aspect ratio
fn scaled_height(width: Emu, image: &LoadedImage) -> Emu {
    (i128::from(width) * i128::from(image.height) / i128::from(image.width)) as Emu
}

/// Render the plans and write the deck to `output`
pub fn render_presentation(
    plans: &[SlidePlan],
    geometry: &SlideGeometry,
    output: &Path,
) -> Result<RenderReport> {
    let (bytes, report) = build_presentation(plans, geometry)?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory_exists(parent)?;
        }
    }
    fs::write(output, bytes)?;
    debug!(
        "Wrote {} slides with {} images to {}",
        report.slides,
        report.images,
        output.display()
    );
    Ok(report)
}

/// Render the plans into an in-memory `.pptx` package
pub fn build_presentation(
    plans: &[SlidePlan],
    geometry: &SlideGeometry,
) -> Result<(Vec<u8>, RenderReport)> {
    let mut package = Package::new();
    let mut report = RenderReport::default();

    let mut root_rels = Relationships::new();
    root_rels.add(REL_OFFICE_DOCUMENT, PRESENTATION_PART);
    root_rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
    root_rels.add(REL_EXTENDED_PROPERTIES, "docProps/app.xml");
    package.add_relationships("", &root_rels)?;

    let mut pres_rels = Relationships::new();
    let master_rid = pres_rels.add(REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    let notes_master_rid = pres_rels.add(REL_NOTES_MASTER, "notesMasters/notesMaster1.xml");
    pres_rels.add(REL_THEME, "theme/theme1.xml");
    pres_rels.add(REL_PRES_PROPS, "presProps.xml");
    pres_rels.add(REL_TABLE_STYLES, "tableStyles.xml");

    add_fixed_parts(&mut package)?;

    let mut slide_rids = Vec::with_capacity(plans.len());
    let mut media_count = 0usize;

    for (index, plan) in plans.iter().enumerate() {
        let number = index + 1;
        let slide_part = format!("ppt/slides/slide{}.xml", number);
        let notes_part = format!("ppt/notesSlides/notesSlide{}.xml", number);

        let mut slide_rels = Relationships::new();
        slide_rels.add(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");

        let mut pictures = Vec::new();
        for slot in &plan.slots {
            let Some(image_ref) = &slot.image else {
                continue;
            };
            match load_image(&image_ref.path) {
                Ok(image) => {
                    media_count += 1;
                    let media_name = format!("image{}.png", media_count);
                    let rid = slide_rels.add(REL_IMAGE, format!("../media/{}", media_name));
                    let placement = Placement {
                        left: image_ref.left,
                        top: image_ref.top,
                        width: image_ref.width,
                        height: scaled_height(image_ref.width, &image),
                    };
                    pictures.push(Picture {
                        rid,
                        name: image_ref.file_name.clone(),
                        placement,
                    });
                    package.add_part(&format!("ppt/media/{}", media_name), None, image.bytes);
                }
                Err(reason) => {
                    let warning = Error::Render {
                        sample: plan.key.clone(),
                        channel: slot.label.clone(),
                        path: image_ref.path.clone(),
                        reason,
                    };
                    warn!("{}", warning);
                    report.warnings.push(warning);
                }
            }
        }
        report.images += pictures.len();

        slide_rels.add(REL_NOTES_SLIDE, format!("../notesSlides/notesSlide{}.xml", number));
        package.add_part(&slide_part, Some(CT_SLIDE), slide_xml(plan, &pictures, geometry)?);
        package.add_relationships(&slide_part, &slide_rels)?;

        let mut notes_rels = Relationships::new();
        notes_rels.add(REL_NOTES_MASTER, "../notesMasters/notesMaster1.xml");
        notes_rels.add(REL_SLIDE, format!("../slides/slide{}.xml", number));
        package.add_part(&notes_part, Some(CT_NOTES_SLIDE), notes_xml(&plan.notes_text())?);
        package.add_relationships(&notes_part, &notes_rels)?;

        slide_rids.push(pres_rels.add(REL_SLIDE, format!("slides/slide{}.xml", number)));
        report.slides += 1;
    }

    package.add_part(
        PRESENTATION_PART,
        Some(CT_PRESENTATION),
        presentation_xml(&master_rid, &notes_master_rid, &slide_rids, geometry)?,
    );
    package.add_relationships(PRESENTATION_PART, &pres_rels)?;
    package.add_part("docProps/core.xml", Some(CT_CORE_PROPERTIES), core_properties_xml()?);
    package.add_part(
        "docProps/app.xml",
        Some(CT_EXTENDED_PROPERTIES),
        app_properties_xml(report.slides)?,
    );

    Ok((package.finish()?, report))
}

/// Master, layout, themes and the other parts that are identical in every deck
fn add_fixed_parts(package: &mut Package) -> Result<()> {
    let master_part = "ppt/slideMasters/slideMaster1.xml";
    let layout_part = "ppt/slideLayouts/slideLayout1.xml";
    let notes_master_part = "ppt/notesMasters/notesMaster1.xml";

    package.add_part(master_part, Some(CT_SLIDE_MASTER), templates::slide_master().into_bytes());
    let mut rels = Relationships::new();
    rels.add(REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
    rels.add(REL_THEME, "../theme/theme1.xml");
    package.add_relationships(master_part, &rels)?;

    package.add_part(layout_part, Some(CT_SLIDE_LAYOUT), templates::blank_layout().into_bytes());
    let mut rels = Relationships::new();
    rels.add(REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
    package.add_relationships(layout_part, &rels)?;

    package.add_part(notes_master_part, Some(CT_NOTES_MASTER), templates::notes_master().into_bytes());
    let mut rels = Relationships::new();
    rels.add(REL_THEME, "../theme/theme2.xml");
    package.add_relationships(notes_master_part, &rels)?;

    package.add_part("ppt/theme/theme1.xml", Some(CT_THEME), THEME.as_bytes().to_vec());
    package.add_part("ppt/theme/theme2.xml", Some(CT_THEME), THEME.as_bytes().to_vec());
    package.add_part(
        "ppt/presProps.xml",
        Some(CT_PRES_PROPS),
        templates::presentation_properties().into_bytes(),
    );
    package.add_part("ppt/tableStyles.xml", Some(CT_TABLE_STYLES), TABLE_STYLES.as_bytes().to_vec());
    Ok(())
}

/// A picture resolved against its media part
struct Picture {
    rid: String,
    name: String,
    placement: Placement,
}

fn write_group_properties(xml: &mut XmlPart) -> Result<()> {
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.start("p:grpSpPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.end("a:xfrm")?;
    xml.end("p:grpSpPr")
}

fn write_transform(xml: &mut XmlPart, placement: &Placement) -> Result<()> {
    xml.start("a:xfrm", &[])?;
    xml.empty(
        "a:off",
        &[("x", placement.left.to_string().as_str()), ("y", placement.top.to_string().as_str())],
    )?;
    xml.empty(
        "a:ext",
        &[("cx", placement.width.to_string().as_str()), ("cy", placement.height.to_string().as_str())],
    )?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")
}

fn write_text_box(
    xml: &mut XmlPart,
    id: usize,
    placement: &Placement,
    text: &str,
    font_size: u32,
    align: &str,
) -> Result<()> {
    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[("id", id.to_string().as_str()), ("name", format!("TextBox {}", id - 1).as_str())],
    )?;
    xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?;
    write_transform(xml, placement)?;
    xml.empty("a:noFill", &[])?;
    xml.end("p:spPr")?;

    xml.start("p:txBody", &[])?;
    xml.start("a:bodyPr", &[("wrap", "none")])?;
    xml.empty("a:spAutoFit", &[])?;
    xml.end("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;
    xml.start("a:p", &[])?;
    xml.empty("a:pPr", &[("algn", align)])?;
    xml.start("a:r", &[])?;
    xml.empty(
        "a:rPr",
        &[("lang", "en-US"), ("sz", font_size.to_string().as_str()), ("b", "1"), ("dirty", "0")],
    )?;
    xml.text_element("a:t", &[], text)?;
    xml.end("a:r")?;
    xml.end("a:p")?;
    xml.end("p:txBody")?;
    xml.end("p:sp")
}

fn write_picture(xml: &mut XmlPart, id: usize, picture: &Picture) -> Result<()> {
    xml.start("p:pic", &[])?;
    xml.start("p:nvPicPr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[
            ("id", id.to_string().as_str()),
            ("name", format!("Picture {}", id - 1).as_str()),
            ("descr", picture.name.as_str()),
        ],
    )?;
    xml.start("p:cNvPicPr", &[])?;
    xml.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    xml.end("p:cNvPicPr")?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvPicPr")?;

    xml.start("p:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", picture.rid.as_str())])?;
    xml.start("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.end("a:stretch")?;
    xml.end("p:blipFill")?;

    xml.start("p:spPr", &[])?;
    write_transform(xml, &picture.placement)?;
    xml.end("p:spPr")?;
    xml.end("p:pic")
}

fn slide_xml(plan: &SlidePlan, pictures: &[Picture], geometry: &SlideGeometry) -> Result<Vec<u8>> {
    let align = geometry.align.as_ooxml();
    let mut xml = XmlPart::new()?;
    xml.start("p:sld", &PML_NAMESPACES)?;
    xml.start("p:cSld", &[])?;
    xml.start("p:spTree", &[])?;
    write_group_properties(&mut xml)?;

    let mut next_id = 2;
    write_text_box(
        &mut xml,
        next_id,
        &plan.title_box,
        &plan.title,
        geometry.title_font_size,
        align,
    )?;
    for slot in &plan.slots {
        next_id += 1;
        write_text_box(
            &mut xml,
            next_id,
            &slot.label_box,
            &slot.label,
            geometry.label_font_size,
            align,
        )?;
    }
    for picture in pictures {
        next_id += 1;
        write_picture(&mut xml, next_id, picture)?;
    }

    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok(xml.finish())
}

fn notes_xml(text: &str) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start("p:notes", &PML_NAMESPACES)?;
    xml.start("p:cSld", &[])?;
    xml.start("p:spTree", &[])?;
    write_group_properties(&mut xml)?;

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "2"), ("name", "Slide Image Placeholder 1")])?;
    xml.start("p:cNvSpPr", &[])?;
    xml.empty("a:spLocks", &[("noGrp", "1"), ("noRot", "1"), ("noChangeAspect", "1")])?;
    xml.end("p:cNvSpPr")?;
    xml.start("p:nvPr", &[])?;
    xml.empty("p:ph", &[("type", "sldImg")])?;
    xml.end("p:nvPr")?;
    xml.end("p:nvSpPr")?;
    xml.empty("p:spPr", &[])?;
    xml.end("p:sp")?;

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "3"), ("name", "Notes Placeholder 2")])?;
    xml.start("p:cNvSpPr", &[])?;
    xml.empty("a:spLocks", &[("noGrp", "1")])?;
    xml.end("p:cNvSpPr")?;
    xml.start("p:nvPr", &[])?;
    xml.empty("p:ph", &[("type", "body"), ("idx", "1")])?;
    xml.end("p:nvPr")?;
    xml.end("p:nvSpPr")?;
    xml.empty("p:spPr", &[])?;
    xml.start("p:txBody", &[])?;
    xml.empty("a:bodyPr", &[])?;
    xml.empty("a:lstStyle", &[])?;
    for line in text.lines() {
        xml.start("a:p", &[])?;
        xml.start("a:r", &[])?;
        xml.empty("a:rPr", &[("lang", "en-US"), ("dirty", "0")])?;
        xml.text_element("a:t", &[], line)?;
        xml.end("a:r")?;
        xml.end("a:p")?;
    }
    xml.end("p:txBody")?;
    xml.end("p:sp")?;

    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:notes")?;
    Ok(xml.finish())
}

fn presentation_xml(
    master_rid: &str,
    notes_master_rid: &str,
    slide_rids: &[String],
    geometry: &SlideGeometry,
) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    let mut attrs = PML_NAMESPACES.to_vec();
    attrs.push(("saveSubsetFonts", "1"));
    xml.start("p:presentation", &attrs)?;

    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", master_rid)])?;
    xml.end("p:sldMasterIdLst")?;
    xml.start("p:notesMasterIdLst", &[])?;
    xml.empty("p:notesMasterId", &[("r:id", notes_master_rid)])?;
    xml.end("p:notesMasterIdLst")?;

    if !slide_rids.is_empty() {
        xml.start("p:sldIdLst", &[])?;
        for (index, rid) in slide_rids.iter().enumerate() {
            let id = (FIRST_SLIDE_ID + index).to_string();
            xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rid.as_str())])?;
        }
        xml.end("p:sldIdLst")?;
    }

    xml.empty(
        "p:sldSz",
        &[
            ("cx", geometry.slide_width.to_string().as_str()),
            ("cy", geometry.slide_height.to_string().as_str()),
        ],
    )?;
    xml.empty(
        "p:notesSz",
        &[("cx", NOTES_WIDTH.to_string().as_str()), ("cy", NOTES_HEIGHT.to_string().as_str())],
    )?;
    xml.end("p:presentation")?;
    Ok(xml.finish())
}

fn core_properties_xml() -> Result<Vec<u8>> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = XmlPart::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.text_element("dc:title", &[], DECK_TITLE)?;
    xml.text_element("dc:creator", &[], "ScopeSrt")?;
    xml.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &timestamp)?;
    xml.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &timestamp)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

fn app_properties_xml(slides: usize) -> Result<Vec<u8>> {
    let count = slides.to_string();
    let mut xml = XmlPart::new()?;
    xml.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    xml.text_element("Application", &[], "ScopeSrt")?;
    xml.text_element("Slides", &[], &count)?;
    xml.text_element("Notes", &[], &count)?;
    xml.end("Properties")?;
    Ok(xml.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{inches, SummaryConfig};
    use crate::sample::aggregate;
    use crate::summary::plan_slides;
    use tempfile::TempDir;

    #[test]
    fn scaled_height_keeps_aspect_ratio() {
        let image = LoadedImage {
            bytes: Vec::new(),
            width: 200,
            height: 100,
        };
        assert_eq!(scaled_height(inches(2.5), &image), inches(2.5) / 2);
    }

    #[test]
    fn unreadable_image_becomes_a_warning() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("s1_BF.png"), b"not really a png").unwrap();
        let config = SummaryConfig::default();
        let samples = aggregate(dir.path(), ["s1_BF.png"], &config);
        let plans = plan_slides(&samples, &config);

        let (bytes, report) = build_presentation(&plans, &config.geometry).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(report.slides, 1);
        assert_eq!(report.images, 0);
        assert_eq!(report.warnings.len(), 1);
        match &report.warnings[0] {
            Error::Render { sample, channel, .. } => {
                assert_eq!(sample, "s1");
                assert_eq!(channel, "C");
            }
            other => panic!("unexpected warning {other:?}"),
        }
    }

    #[test]
    fn presentation_without_slides_omits_slide_list() {
        let xml = presentation_xml("rId1", "rId2", &[], &SlideGeometry::default()).unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(!xml.contains("sldIdLst"));
        assert!(xml.contains("<p:sldSz cx=\"12188952\" cy=\"6858000\"/>"));
    }
}
