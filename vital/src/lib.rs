//! Parser for Vital Recorder's `.vital` capture format: a gzip-compressed
//! sequence of typed packets describing physiological waveform, numeric and
//! annotation tracks recorded over the course of a case.
//!
//! Typical usage:
//!
//! ```no_run
//! use std::path::Path;
//! use vital::reader::{open_vital, parse_vital};
//!
//! let reader = open_vital(Path::new("case.vital"))?;
//! let file = parse_vital(&reader)?;
//! let hr = file.get_track(None, Some("HR"))?;
//! for block in &hr.blocks {
//!     println!("{}: {:?}", block.dt, block.values);
//! }
//! # Ok::<(), vital::error::VitalError>(())
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod frame;
pub mod header;
pub mod reader;
pub mod record;
pub mod track;
pub mod view;

pub use error::{Result, VitalError};
pub use reader::{VitalFile, VitalReader, open_vital, parse_vital};
pub use view::TrackView;
