//! JSON presets for the engine and its four patterns. Only the live
//! prefix of each pattern's steps is persisted; loading clamps every
//! field rather than rejecting it.

use std::fs;

use crate::engine::config::{EngineConfig, PatternConfig, Step, MAX_STEPS, NUM_PATTERNS};
use crate::engine::PatternEngine;
use crate::err::Error;
use crate::ports::{Clock, MidiOut};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternPreset {
    pub channel: u8,
    pub division: u16,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub bpm: f64,
    pub overlap_ms: u8,
    pub external_clock: bool,
    pub patterns: Vec<PatternPreset>,
}

impl Preset {
    /// Snapshot an engine's configuration.
    pub fn capture<S, C>(engine: &PatternEngine<S, C>) -> Preset
    where
        S: MidiOut,
        C: Clock,
    {
        let config = engine.engine_config();
        let mut patterns = Vec::with_capacity(NUM_PATTERNS);
        for i in 0..NUM_PATTERNS {
            let pattern = engine.pattern(i);
            let length = pattern.length.min(MAX_STEPS);
            patterns.push(PatternPreset {
                channel: pattern.channel,
                division: pattern.division,
                steps: pattern.steps[..length].to_vec(),
            });
        }
        Preset {
            bpm: config.bpm,
            overlap_ms: config.overlap_ms,
            external_clock: config.external_clock,
            patterns: patterns,
        }
    }

    /// Write this preset's configuration into an engine, clamping as the
    /// CLI would. Extra patterns and steps beyond capacity are ignored.
    pub fn apply<S, C>(&self, engine: &mut PatternEngine<S, C>)
    where
        S: MidiOut,
        C: Clock,
    {
        engine.set_engine_config(EngineConfig {
            bpm: self.bpm,
            overlap_ms: self.overlap_ms,
            external_clock: self.external_clock,
        });

        for (i, source) in self.patterns.iter().take(NUM_PATTERNS).enumerate() {
            let mut pattern = PatternConfig::default();
            pattern.channel = source.channel.max(1).min(16);
            pattern.division = if source.division > 0 { source.division } else { 2 };
            pattern.length = source.steps.len().min(MAX_STEPS);
            for (slot, step) in pattern.steps.iter_mut().zip(source.steps.iter()) {
                *slot = step.clamped();
            }
            *engine.pattern_mut(i) = pattern;
        }
    }

    pub fn load(path: &str) -> Result<Preset, Error> {
        let text = fs::read_to_string(path)?;
        let preset = serde_json::from_str(&text)?;
        Ok(preset)
    }

    pub fn save(&self, path: &str) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sinks::Capture;

    #[test]
    fn test_roundtrip_through_json() {
        let mut eng = PatternEngine::new(Capture::new(), ManualClock::new());
        let mut config = EngineConfig::default();
        config.bpm = 98.0;
        config.overlap_ms = 15;
        eng.set_engine_config(config);

        {
            let pattern = eng.pattern_mut(0);
            pattern.channel = 3;
            pattern.division = 4;
            pattern.length = 2;
            pattern.steps[0].note_index = 1;
            pattern.steps[1].note_index = 3;
            pattern.steps[1].velocity = 80;
        }

        let text = serde_json::to_string(&Preset::capture(&eng)).unwrap();
        let preset: Preset = serde_json::from_str(&text).unwrap();

        let mut other = PatternEngine::new(Capture::new(), ManualClock::new());
        preset.apply(&mut other);

        assert_eq!(other.engine_config().bpm, 98.0);
        assert_eq!(other.engine_config().overlap_ms, 15);
        assert_eq!(*other.pattern(0), *eng.pattern(0));
        assert_eq!(*other.pattern(1), *eng.pattern(1));
    }

    #[test]
    fn test_apply_clamps_out_of_range() {
        let preset = Preset {
            bpm: -10.0,
            overlap_ms: 10,
            external_clock: false,
            patterns: vec![PatternPreset {
                channel: 99,
                division: 0,
                steps: vec![Step {
                    note_index: 12,
                    velocity: 200,
                    gate_pct: 250,
                    octave: 15,
                    enabled: true,
                    probability: 255,
                }],
            }],
        };

        let mut eng = PatternEngine::new(Capture::new(), ManualClock::new());
        preset.apply(&mut eng);

        assert_eq!(eng.engine_config().bpm, 120.0);
        let pattern = eng.pattern(0);
        assert_eq!(pattern.channel, 16);
        assert_eq!(pattern.division, 2);
        assert_eq!(pattern.length, 1);
        assert_eq!(pattern.steps[0].note_index, 8);
        assert_eq!(pattern.steps[0].velocity, 127);
        assert_eq!(pattern.steps[0].gate_pct, 200);
        assert_eq!(pattern.steps[0].octave, 8);
        assert_eq!(pattern.steps[0].probability, 100);
    }
}
