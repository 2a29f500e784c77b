use log::{debug, warn};

use crate::models::{
    ImageRef, Placement, SampleRecord, SampleSet, SlidePlan, SlotPlan, SummaryConfig,
};

/// Build one slide plan per sample, in sample key order
pub fn plan_slides(samples: &SampleSet, config: &SummaryConfig) -> Vec<SlidePlan> {
    let geometry = &config.geometry;
    if !samples.is_empty() && !geometry.fits(config.channels.len()) {
        warn!(
            "{} channel slots do not fit the slide width; the rightmost images will overflow",
            config.channels.len()
        );
    }

    let plans: Vec<SlidePlan> = samples
        .iter()
        .map(|record| plan_slide(samples, record, config))
        .collect();

    for plan in plans.iter().filter(|p| !p.is_complete()) {
        debug!(
            "Sample '{}' is missing channels {}",
            plan.key,
            plan.missing().join(", ")
        );
    }
    plans
}

/// Lay out a single sample
pub fn plan_slide(samples: &SampleSet, record: &SampleRecord, config: &SummaryConfig) -> SlidePlan {
    let geometry = &config.geometry;

    let slots = config
        .channels
        .iter()
        .enumerate()
        .map(|(index, channel)| {
            let left = geometry.slot_left(index);
            let image = record.file(&channel.suffix).map(|file_name| ImageRef {
                file_name: file_name.to_string(),
                path: samples.source_dir().join(file_name),
                left,
                top: geometry.image_top,
                width: geometry.slot_width,
            });
            SlotPlan {
                label: channel.label.clone(),
                suffix: channel.suffix.clone(),
                label_box: Placement {
                    left,
                    top: geometry.label_top,
                    width: geometry.slot_width,
                    height: geometry.label_height,
                },
                image,
            }
        })
        .collect();

    SlidePlan {
        key: record.key.clone(),
        title: format!("Sample: {}", record.key),
        title_box: Placement {
            left: geometry.title_left,
            top: geometry.title_top,
            width: geometry.title_width,
            height: geometry.title_height,
        },
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{inches, ChannelSet, MatchPolicy, MISSING_MARKER};
    use crate::sample::aggregate;
    use std::path::Path;

    fn config_with(suffixes: &[&str]) -> SummaryConfig {
        SummaryConfig::new(
            ChannelSet::from_suffixes(suffixes).unwrap(),
            MatchPolicy::DeclaredOrder,
        )
    }

    #[test]
    fn missing_channel_is_flagged_in_notes() {
        let config = config_with(&["_AttoX", "_BF", "_merged"]);
        let samples = aggregate(Path::new("/data"), ["s1_AttoX.png", "s1_BF.png"], &config);
        let plans = plan_slides(&samples, &config);

        assert_eq!(plans.len(), 1);
        let plan = &plans[0];
        assert_eq!(plan.title, "Sample: s1");
        assert_eq!(plan.slots.len(), 3);
        assert_eq!(plan.missing(), vec!["C"]);
        assert!(!plan.is_complete());
        assert_eq!(
            plan.notes_text(),
            format!("Sample: s1\nA: s1_AttoX.png\nB: s1_BF.png\nC: {}", MISSING_MARKER)
        );
    }

    #[test]
    fn present_slots_keep_their_images() {
        let config = config_with(&["_AttoX", "_BF", "_merged"]);
        let samples = aggregate(Path::new("/data"), ["s1_BF.png"], &config);
        let plan = &plan_slides(&samples, &config)[0];

        assert!(plan.slots[0].image.is_none());
        assert!(plan.slots[2].image.is_none());
        let image = plan.slots[1].image.as_ref().unwrap();
        assert_eq!(image.file_name, "s1_BF.png");
        assert_eq!(image.path, Path::new("/data").join("s1_BF.png"));
    }

    #[test]
    fn slots_are_evenly_spaced() {
        let config = SummaryConfig::default();
        let samples = aggregate(
            Path::new("."),
            ["s_Atto488DPPE.png", "s_Atto655DOPE.png", "s_BF.png", "s_merged.png"],
            &config,
        );
        let plan = &plan_slides(&samples, &config)[0];

        let lefts: Vec<i64> = plan.slots.iter().map(|s| s.label_box.left).collect();
        let pitch = inches(2.8);
        assert_eq!(lefts, vec![inches(1.0), inches(1.0) + pitch, inches(1.0) + 2 * pitch, inches(1.0) + 3 * pitch]);
        for slot in &plan.slots {
            let image = slot.image.as_ref().unwrap();
            assert_eq!(image.left, slot.label_box.left);
            assert_eq!(image.top, inches(1.5));
            assert_eq!(slot.label_box.top, inches(1.0));
            assert!(slot.label_box.top < image.top);
        }
        assert!(plan.is_complete());
        assert!(plan.missing().is_empty());
    }

    #[test]
    fn plans_follow_key_order_not_listing_order() {
        let config = SummaryConfig::default();
        let samples = aggregate(
            Path::new("."),
            ["s3_BF.png", "s1_merged.png", "s2_BF.png", "s1_BF.png"],
            &config,
        );
        let keys: Vec<String> = plan_slides(&samples, &config)
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(keys, vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn empty_sample_set_yields_no_plans() {
        let samples = SampleSet::new(".");
        assert!(plan_slides(&samples, &SummaryConfig::default()).is_empty());
    }
}
