//! Data types shared by the grouping, planning and rendering stages

pub mod config;
pub mod plan;
pub mod sample;

pub use config::{
    inches, Channel, ChannelSet, Emu, MatchPolicy, SlideGeometry, SummaryConfig, TextAlign,
    DEFAULT_OUTPUT_NAME,
};
pub use plan::{ImageRef, Placement, SlidePlan, SlotPlan, MISSING_MARKER};
pub use sample::{SampleKey, SampleRecord, SampleSet};
