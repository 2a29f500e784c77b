use std::path::Path;

use log::debug;

use crate::models::{Channel, ChannelSet, MatchPolicy, SampleKey};

/// A filename resolved to its sample and channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'c> {
    pub key: SampleKey,
    pub slot: usize,
    pub channel: &'c Channel,
}

/// Check if a filename is an eligible image (`.png` in any case)
pub fn is_eligible(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Slots of every channel whose suffix occurs in `file_name`, in channel order
pub fn matching_slots(file_name: &str, channels: &ChannelSet) -> Vec<usize> {
    channels
        .iter()
        .enumerate()
        .filter(|(_, channel)| file_name.contains(channel.suffix.as_str()))
        .map(|(slot, _)| slot)
        .collect()
}

/// Resolve a filename to `(sample key, channel)`, or `None` when not eligible
pub fn classify<'c>(
    file_name: &str,
    channels: &'c ChannelSet,
    policy: MatchPolicy,
) -> Option<Classification<'c>> {
    if !is_eligible(file_name) {
        return None;
    }

    let candidates = matching_slots(file_name, channels);
    let slot = match policy {
        MatchPolicy::DeclaredOrder => candidates.first().copied(),
        // max_by_key keeps the last maximum, so walk in reverse to favour channel order
        MatchPolicy::LongestFirst => candidates
            .iter()
            .rev()
            .copied()
            .max_by_key(|&slot| channels.get(slot).map_or(0, |c| c.suffix.len())),
    }?;
    let channel = channels.get(slot)?;

    if candidates.len() > 1 {
        debug!(
            "{} matches {} channel suffixes; using '{}' ({})",
            file_name,
            candidates.len(),
            channel.suffix,
            policy
        );
    }

    Some(Classification {
        key: sample_key(file_name, &channel.suffix),
        slot,
        channel,
    })
}

/// Strip the extension and, when it ends the stem, the channel suffix
fn sample_key(file_name: &str, suffix: &str) -> SampleKey {
    // is_eligible guarantees a four-byte ASCII ".png" tail
    let stem = &file_name[..file_name.len() - ".png".len()];
    stem.strip_suffix(suffix).unwrap_or(stem).to_string()
}
