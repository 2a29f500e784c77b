use std::path::PathBuf;

use super::config::Emu;
use super::sample::SampleKey;

/// Marker written to the notes for a channel without a file
pub const MISSING_MARKER: &str = "MISSING";

/// Position and size of a shape on the slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
}

/// Image to place in a slot; the height follows the image's aspect ratio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub file_name: String,
    pub path: PathBuf,
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
}

/// One channel position on a slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPlan {
    pub label: String,
    pub suffix: String,
    pub label_box: Placement,
    pub image: Option<ImageRef>,
}

/// Renderable description of one sample slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePlan {
    pub key: SampleKey,
    pub title: String,
    pub title_box: Placement,
    pub slots: Vec<SlotPlan>,
}

impl SlidePlan {
    /// Labels of slots with no image, in slot order
    pub fn missing(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|slot| slot.image.is_none())
            .map(|slot| slot.label.as_str())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.image.is_some())
    }

    /// Speaker-notes text: the sample name, then one `label: file` line per slot
    pub fn notes_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.slots.len() + 1);
        lines.push(self.title.clone());
        for slot in &self.slots {
            let file = slot
                .image
                .as_ref()
                .map(|image| image.file_name.as_str())
                .unwrap_or(MISSING_MARKER);
            lines.push(format!("{}: {}", slot.label, file));
        }
        lines.join("\n")
    }
}
