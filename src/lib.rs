//! Connects audio and MIDI ports of a desktop audio server by name.
//!
//! Ports are looked up by a substring of their name and a substring of the
//! label of the device or application that owns them. Stereo channel pairs
//! are searched left channel first.
//!
//! ```no_run
//! use portwire::{BackendKind, PortRouter, PortSpec};
//!
//! let mut router = PortRouter::new(BackendKind::PipeWire, "portwire")?;
//! let piano = router.find_output(&PortSpec::new("MDA Piano", "left_out"))?;
//! let speaker = router.find_input(&PortSpec::new("Scarlett 4i4", "playback_FL"))?;
//! if let (Some(piano), Some(speaker)) = (piano, speaker) {
//!     router.connect(&piano, &speaker)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod config;
pub mod routing;

mod common;
mod errors;
mod matching;
mod port;
mod traits;

pub use common::*;
pub use errors::*;
pub use matching::{find_port, match_port, port_matches, MatchOptions, PortSpec};
pub use port::{pair_stereo, Link, Port, PortDirection, PortEntry, PortId};
pub use routing::{all_satisfied, apply_routes, Route, RouteOutcome, RouteReport};
pub use traits::PortGraph;
