use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

/// Length in English Metric Units, the OOXML drawing unit
pub type Emu = i64;

pub const EMU_PER_INCH: f64 = 914_400.0;

/// Convert inches to EMU, truncating like PowerPoint tooling does
pub fn inches(value: f64) -> Emu {
    (value * EMU_PER_INCH) as Emu
}

/// Suffixes recognized by the confocal export naming convention, in slot order
pub const DEFAULT_SUFFIXES: [&str; 4] = ["_Atto488DPPE", "_Atto655DOPE", "_BF", "_merged"];

/// Name of the deck written into a source folder
pub const DEFAULT_OUTPUT_NAME: &str = "Confocal_Summary.pptx";

/// One acquisition channel: the filename suffix and its display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub suffix: String,
    pub label: String,
}

impl Channel {
    pub fn new(suffix: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            label: label.into(),
        }
    }

    /// Parse `SUFFIX` or `SUFFIX=LABEL`; the label falls back to `default_label`
    pub fn parse(spec: &str, default_label: String) -> Result<Self> {
        let (suffix, label) = match spec.split_once('=') {
            Some((suffix, label)) => (suffix.trim(), label.trim().to_string()),
            None => (spec.trim(), default_label),
        };
        if suffix.is_empty() {
            return Err(Error::Config(format!("channel '{}' has an empty suffix", spec)));
        }
        if label.is_empty() {
            return Err(Error::Config(format!("channel '{}' has an empty label", spec)));
        }
        Ok(Self::new(suffix, label))
    }
}

/// Ordered set of channels; order decides the left-to-right slot position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet {
    channels: Vec<Channel>,
}

impl ChannelSet {
    /// Build a channel set, rejecting empty sets and duplicate suffixes
    pub fn new(channels: Vec<Channel>) -> Result<Self> {
        if channels.is_empty() {
            return Err(Error::Config("at least one channel is required".to_string()));
        }
        let mut seen = HashSet::new();
        for channel in &channels {
            if channel.suffix.is_empty() {
                return Err(Error::Config("channel suffixes must not be empty".to_string()));
            }
            if !seen.insert(channel.suffix.as_str()) {
                return Err(Error::Config(format!(
                    "channel suffix '{}' is listed twice",
                    channel.suffix
                )));
            }
        }
        Ok(Self { channels })
    }

    /// Build a channel set with generated labels A, B, C, ...
    pub fn from_suffixes<S: AsRef<str>>(suffixes: &[S]) -> Result<Self> {
        let channels = suffixes
            .iter()
            .enumerate()
            .map(|(i, suffix)| Channel::new(suffix.as_ref(), slot_label(i)))
            .collect();
        Self::new(channels)
    }

    /// Parse `SUFFIX[=LABEL]` specs from the command line
    pub fn parse_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let channels = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| Channel::parse(spec.as_ref(), slot_label(i)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(channels)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Channel> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn position(&self, suffix: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.suffix == suffix)
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self {
            channels: DEFAULT_SUFFIXES
                .iter()
                .enumerate()
                .map(|(i, suffix)| Channel::new(*suffix, slot_label(i)))
                .collect(),
        }
    }
}

/// Generated label for a slot: A..Z, then numbers
fn slot_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

/// How a filename containing several suffix tokens picks its channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// First suffix in channel order wins
    #[default]
    DeclaredOrder,
    /// Longest occurring suffix wins, ties go to channel order
    LongestFirst,
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::DeclaredOrder => write!(f, "declared order"),
            MatchPolicy::LongestFirst => write!(f, "longest match first"),
        }
    }
}

/// Paragraph alignment for slide text boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

impl TextAlign {
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            TextAlign::Left => "l",
            TextAlign::Center => "ctr",
        }
    }
}

/// Slide dimensions and slot geometry, all in EMU
#[derive(Debug, Clone, PartialEq)]
pub struct SlideGeometry {
    pub slide_width: Emu,
    pub slide_height: Emu,
    pub title_left: Emu,
    pub title_top: Emu,
    pub title_width: Emu,
    pub title_height: Emu,
    /// Font size in hundredths of a point
    pub title_font_size: u32,
    pub base_offset: Emu,
    pub slot_pitch: Emu,
    pub slot_width: Emu,
    pub label_top: Emu,
    pub label_height: Emu,
    /// Font size in hundredths of a point
    pub label_font_size: u32,
    pub image_top: Emu,
    pub align: TextAlign,
}

impl Default for SlideGeometry {
    fn default() -> Self {
        Self {
            slide_width: inches(13.33),
            slide_height: inches(7.5),
            title_left: inches(0.5),
            title_top: inches(0.2),
            title_width: inches(12.5),
            title_height: inches(0.5),
            title_font_size: 2800,
            base_offset: inches(1.0),
            slot_pitch: inches(2.8),
            slot_width: inches(2.5),
            label_top: inches(1.0),
            label_height: inches(0.4),
            label_font_size: 1600,
            image_top: inches(1.5),
            align: TextAlign::Left,
        }
    }
}

impl SlideGeometry {
    /// Left edge of the slot at `index`
    pub fn slot_left(&self, index: usize) -> Emu {
        self.base_offset + index as Emu * self.slot_pitch
    }

    /// Whether `slots` slots fit within the slide width
    pub fn fits(&self, slots: usize) -> bool {
        if slots == 0 {
            return true;
        }
        self.slot_left(slots - 1) + self.slot_width <= self.slide_width
    }
}

/// Configuration for building a summary deck
#[derive(Debug, Clone, Default)]
pub struct SummaryConfig {
    pub channels: ChannelSet,
    pub match_policy: MatchPolicy,
    pub geometry: SlideGeometry,
}

impl SummaryConfig {
    pub fn new(channels: ChannelSet, match_policy: MatchPolicy) -> Self {
        Self {
            channels,
            match_policy,
            geometry: SlideGeometry::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_channels_follow_confocal_convention() {
        let set = ChannelSet::default();
        let pairs: Vec<(&str, &str)> = set
            .iter()
            .map(|c| (c.suffix.as_str(), c.label.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("_Atto488DPPE", "A"),
                ("_Atto655DOPE", "B"),
                ("_BF", "C"),
                ("_merged", "D"),
            ]
        );
    }

    #[test]
    fn parse_specs_generates_missing_labels() {
        let set = ChannelSet::parse_specs(&["_GFP=green", "_BF"]).unwrap();
        assert_eq!(set.get(0), Some(&Channel::new("_GFP", "green")));
        assert_eq!(set.get(1), Some(&Channel::new("_BF", "B")));
    }

    #[test]
    fn duplicate_suffix_is_rejected() {
        let err = ChannelSet::from_suffixes(&["_BF", "_BF"]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn empty_channel_set_is_rejected() {
        let empty: [&str; 0] = [];
        assert!(ChannelSet::from_suffixes(&empty).is_err());
        assert!(ChannelSet::parse_specs(&["=A"]).is_err());
    }

    #[test]
    fn default_geometry_matches_widescreen_deck() {
        let geometry = SlideGeometry::default();
        assert_eq!(geometry.slide_width, 12_188_952);
        assert_eq!(geometry.slide_height, 6_858_000);
        assert_eq!(geometry.slot_left(0), 914_400);
        assert_eq!(geometry.slot_left(2), 914_400 + 2 * inches(2.8));
        assert!(geometry.fits(4));
        assert!(!geometry.fits(5));
    }
}
