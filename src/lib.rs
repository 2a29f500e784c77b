//! Group confocal channel images into samples and lay them out as summary slides

pub mod error;
pub mod listing;
pub mod models;
pub mod organizer;
pub mod sample;
pub mod summary;
pub mod utils;

pub use error::{Error, Result};
