//! # Ostinato
//!
//! A deterministic MIDI arpeggiator & step sequencer. Note-on/off events
//! from a controller are tracked as a sorted chord; four independent
//! step patterns then pull notes out of the chord by index and emit them
//! on a millisecond grid, with per-step velocity, gate, octave and
//! probability, and an overlap window that ties consecutive notes
//! together without gaps.
//!
//! The core is allocation-free and single-threaded. Hosts drive it
//! through two small ports: a monotonic millisecond [`Clock`] and a
//! [`MidiOut`] sink. A polling host calls [`PatternEngine::tick`] every
//! millisecond; a block-based host wraps the engine in a [`BlockDriver`]
//! and advances it per audio block.

#[macro_use]
extern crate serde_derive;

mod block;
mod clock;
mod engine;
mod err;
mod ports;
mod preset;

pub mod cli;
pub mod log;
pub mod sinks;

pub use crate::block::BlockDriver;
pub use crate::clock::{ManualClock, SystemClock};
pub use crate::engine::builder::PatternBuilder;
pub use crate::engine::config::{
    EngineConfig, PatternConfig, Step, MAX_HELD_NOTES, MAX_PENDING_OFFS, MAX_STEPS, NUM_PATTERNS,
};
pub use crate::engine::{ChordState, PatternEngine, PendingOff, PendingOffQueue};
pub use crate::err::{CmdErr, Error, SysErr};
pub use crate::ports::{Clock, MidiIn, MidiMsg, MidiOut};
pub use crate::preset::{PatternPreset, Preset};
