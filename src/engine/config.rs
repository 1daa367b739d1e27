//! Engine and pattern configuration.
//!
//! All containers are fixed arrays sized by the constants below; nothing
//! here allocates. Out-of-range values are clamped at the edges (CLI,
//! builder, presets), never rejected.

/// Patterns advanced by one engine.
pub const NUM_PATTERNS: usize = 4;
/// Steps per pattern.
pub const MAX_STEPS: usize = 64;
/// Scheduled note-offs across all patterns.
pub const MAX_PENDING_OFFS: usize = 64;
/// Notes tracked in a held chord.
pub const MAX_HELD_NOTES: usize = 8;

/// One pattern step. `note_index` is a 1-based position into the sorted
/// chord; 0 is a rest, consuming the step slot without emitting.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub note_index: u8,
    pub velocity: u8,
    pub gate_pct: u8,
    pub octave: i8,
    pub enabled: bool,
    pub probability: u8,
}

impl Default for Step {
    fn default() -> Step {
        Step {
            note_index: 0,
            velocity: 100,
            gate_pct: 50,
            octave: 0,
            enabled: true,
            probability: 100,
        }
    }
}

impl Step {
    /// Copy of this step with every field forced into its legal range.
    pub fn clamped(&self) -> Step {
        Step {
            note_index: self.note_index.min(8),
            velocity: self.velocity.max(1).min(127),
            gate_pct: self.gate_pct.max(1).min(200),
            octave: self.octave.max(-8).min(8),
            enabled: self.enabled,
            probability: self.probability.min(100),
        }
    }
}

/// Per-pattern configuration. Only the first `length` steps are live.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PatternConfig {
    pub channel: u8,
    pub division: u16,
    pub length: usize,
    pub steps: [Step; MAX_STEPS],
}

impl Default for PatternConfig {
    fn default() -> PatternConfig {
        PatternConfig {
            channel: 1,
            division: 2,
            length: 0,
            steps: [Step::default(); MAX_STEPS],
        }
    }
}

/// Global engine configuration. `external_clock` is reserved; behaviour
/// is undefined when enabled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub bpm: f64,
    pub overlap_ms: u8,
    pub external_clock: bool,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            bpm: 120.0,
            overlap_ms: 10,
            external_clock: false,
        }
    }
}
