use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Characters Windows and macOS refuse in a path component
    static ref RESERVED: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    // Control characters and non-characters that XML 1.0 cannot carry
    static ref XML_INVALID: Regex =
        Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x{FFFE}\x{FFFF}]").unwrap();
}

/// Make a user-supplied name safe as a single folder name
pub fn clean_name(name: &str) -> String {
    let cleaned = RESERVED.replace_all(name, "_");
    let cleaned = cleaned.trim().trim_matches('.');
    if cleaned.is_empty() {
        "Unknown".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Drop characters that would make slide XML unreadable
pub fn sanitize_xml_text(text: &str) -> String {
    XML_INVALID.replace_all(text, "").into_owned()
}
