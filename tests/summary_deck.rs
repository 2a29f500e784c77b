use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use tempfile::TempDir;
use zip::ZipArchive;

use scopesrt::models::{ChannelSet, MatchPolicy, SummaryConfig};
use scopesrt::summary::build_summary;
use scopesrt::Error;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    image::RgbImage::new(width, height)
        .save(dir.join(name))
        .unwrap();
}

fn open_deck(path: &Path) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(fs::read(path).unwrap())).unwrap()
}

fn part_text(deck: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
    let mut text = String::new();
    deck.by_name(name).unwrap().read_to_string(&mut text).unwrap();
    text
}

fn part_names(deck: &ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
    deck.file_names().map(str::to_string).collect()
}

fn count_parts(names: &[String], prefix: &str) -> usize {
    names
        .iter()
        .filter(|n| n.starts_with(prefix) && n.ends_with(".xml"))
        .count()
}

#[test]
fn one_slide_per_sample_with_notes() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "s1_Atto488DPPE.png", 40, 20);
    write_png(dir.path(), "s1_Atto655DOPE.png", 40, 20);
    write_png(dir.path(), "s2_Atto488DPPE.png", 20, 40);
    fs::write(dir.path().join("s2_Atto488DPPE.tif"), b"not a png").unwrap();
    let output = dir.path().join("deck.pptx");

    let outcome = build_summary(
        &[dir.path().to_path_buf()],
        &output,
        &SummaryConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.samples, 2);
    assert_eq!(outcome.incomplete, 2);
    assert_eq!(outcome.report.slides, 2);
    assert_eq!(outcome.report.images, 3);
    assert!(outcome.report.warnings.is_empty());

    let mut deck = open_deck(&output);
    let names = part_names(&deck);
    assert_eq!(deck.file_names().next(), Some("[Content_Types].xml"));
    assert_eq!(count_parts(&names, "ppt/slides/slide"), 2);
    assert_eq!(count_parts(&names, "ppt/notesSlides/notesSlide"), 2);
    assert_eq!(names.iter().filter(|n| n.starts_with("ppt/media/")).count(), 3);

    let slide1 = part_text(&mut deck, "ppt/slides/slide1.xml");
    assert!(slide1.contains("Sample: s1"));
    assert!(slide1.contains("s1_Atto655DOPE.png"));

    let notes1 = part_text(&mut deck, "ppt/notesSlides/notesSlide1.xml");
    assert!(notes1.contains("A: s1_Atto488DPPE.png"));
    assert!(notes1.contains("C: MISSING"));

    let notes2 = part_text(&mut deck, "ppt/notesSlides/notesSlide2.xml");
    assert!(notes2.contains("Sample: s2"));
    assert!(notes2.contains("B: MISSING"));

    let content_types = part_text(&mut deck, "[Content_Types].xml");
    assert!(content_types.contains("/ppt/slides/slide2.xml"));
    assert!(content_types.contains("Extension=\"png\""));
}

#[test]
fn empty_folder_gives_a_deck_without_slides() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("deck.pptx");

    let outcome = build_summary(
        &[dir.path().to_path_buf()],
        &output,
        &SummaryConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.report.slides, 0);
    let mut deck = open_deck(&output);
    let names = part_names(&deck);
    assert_eq!(count_parts(&names, "ppt/slides/slide"), 0);
    let presentation = part_text(&mut deck, "ppt/presentation.xml");
    assert!(!presentation.contains("sldIdLst"));
}

#[test]
fn corrupt_image_is_reported_and_other_slides_survive() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "good_BF.png", 10, 10);
    fs::write(dir.path().join("bad_BF.png"), b"\x89PNG broken").unwrap();
    let output = dir.path().join("deck.pptx");

    let outcome = build_summary(
        &[dir.path().to_path_buf()],
        &output,
        &SummaryConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.report.slides, 2);
    assert_eq!(outcome.report.images, 1);
    assert_eq!(outcome.report.warnings.len(), 1);
    assert!(matches!(
        &outcome.report.warnings[0],
        Error::Render { sample, .. } if sample == "bad"
    ));

    let mut deck = open_deck(&output);
    let bad = part_text(&mut deck, "ppt/slides/slide1.xml");
    assert!(bad.contains("Sample: bad"));
    assert!(!bad.contains("<p:pic>"));
    let good = part_text(&mut deck, "ppt/slides/slide2.xml");
    assert!(good.contains("<p:pic>"));
}

#[test]
fn folders_keep_argument_order() {
    let root = TempDir::new().unwrap();
    let first = root.path().join("z_plate");
    let second = root.path().join("a_plate");
    fs::create_dir(&first).unwrap();
    fs::create_dir(&second).unwrap();
    write_png(&first, "zz_merged.png", 8, 8);
    write_png(&second, "aa_merged.png", 8, 8);
    let output = root.path().join("combined.pptx");

    let outcome = build_summary(
        &[first, second],
        &output,
        &SummaryConfig::default(),
    )
    .unwrap();
    assert_eq!(outcome.samples, 2);

    let mut deck = open_deck(&output);
    assert!(part_text(&mut deck, "ppt/slides/slide1.xml").contains("Sample: zz"));
    assert!(part_text(&mut deck, "ppt/slides/slide2.xml").contains("Sample: aa"));
}

#[test]
fn missing_folder_fails_without_output() {
    let root = TempDir::new().unwrap();
    let good = root.path().join("plate");
    fs::create_dir(&good).unwrap();
    write_png(&good, "s1_BF.png", 8, 8);
    let output = root.path().join("deck.pptx");

    let err = build_summary(
        &[good, root.path().join("gone")],
        &output,
        &SummaryConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::DirectoryAccess { .. }));
    assert!(!output.exists());
}

#[test]
fn custom_channels_with_longest_match() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "cell_GFP.png", 8, 8);
    write_png(dir.path(), "cell_eGFP.png", 8, 8);
    let channels = ChannelSet::parse_specs(&["GFP=Green", "eGFP=Enhanced"]).unwrap();
    let config = SummaryConfig::new(channels, MatchPolicy::LongestFirst);
    let output: PathBuf = dir.path().join("deck.pptx");

    let outcome = build_summary(&[dir.path().to_path_buf()], &output, &config).unwrap();

    assert_eq!(outcome.samples, 1);
    assert_eq!(outcome.incomplete, 0);
    let mut deck = open_deck(&output);
    let notes = part_text(&mut deck, "ppt/notesSlides/notesSlide1.xml");
    assert!(notes.contains("Green: cell_GFP.png"));
    assert!(notes.contains("Enhanced: cell_eGFP.png"));
}

#[test]
fn control_characters_in_file_names_keep_parts_well_formed() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "good_BF.png", 8, 8);
    write_png(dir.path(), "we\u{1}ird_BF.png", 8, 8);
    let output = dir.path().join("deck.pptx");

    let outcome = build_summary(
        &[dir.path().to_path_buf()],
        &output,
        &SummaryConfig::default(),
    )
    .unwrap();
    assert_eq!(outcome.report.images, 2);

    let mut deck = open_deck(&output);
    let names = part_names(&deck);
    let xml_parts: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") || n.starts_with("ppt/notesSlides/"))
        .filter(|n| n.ends_with(".xml"))
        .collect();
    assert_eq!(xml_parts.len(), 4);

    for name in xml_parts {
        let text = part_text(&mut deck, name);
        assert!(!text.contains('\u{1}'), "{} carries a control character", name);

        let mut reader = Reader::from_str(&text);
        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                    for attr in element.attributes() {
                        attr.unwrap();
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("{} is not well-formed: {}", name, e),
            }
        }
    }

    let slide = part_text(&mut deck, "ppt/slides/slide2.xml");
    assert!(slide.contains("descr=\"weird_BF.png\""));
}
