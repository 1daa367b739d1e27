//! The note-scheduling core: chord tracking, per-pattern step
//! advancement, gating with overlap-based legato, and the pending
//! note-off buffer. Everything here is synchronous, allocation-free and
//! driven entirely by `on_midi_in` and `tick`.

pub mod builder;
pub mod config;

mod chord;
mod offs;

use rand::{Rng, SeedableRng, StdRng};

pub use self::chord::ChordState;
pub use self::offs::{PendingOff, PendingOffQueue};

use self::config::{EngineConfig, PatternConfig, MAX_STEPS, NUM_PATTERNS};
use crate::ports::{Clock, MidiMsg, MidiOut};

const DEFAULT_SEED: usize = 0xC0FFEE;

/// Runtime cursor of one pattern. `next_step_ms == 0` means the pattern
/// has not been armed yet; the first tick pins it to the current clock.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct PatternState {
    step_pos: usize,
    next_step_ms: u64,
    last_on_valid: bool,
    last_on_note: u8,
    last_on_ch: u8,
}

pub struct PatternEngine<S, C>
where
    S: MidiOut,
    C: Clock,
{
    config: EngineConfig,
    patterns: [PatternConfig; NUM_PATTERNS],
    states: [PatternState; NUM_PATTERNS],
    chord: ChordState,
    offs: PendingOffQueue,
    rng: StdRng,
    out: S,
    clock: C,
}

impl<S, C> PatternEngine<S, C>
where
    S: MidiOut,
    C: Clock,
{
    pub fn new(out: S, clock: C) -> PatternEngine<S, C> {
        PatternEngine::with_seed(out, clock, DEFAULT_SEED)
    }

    /// Engine with an explicit probability seed, for reproducible runs.
    pub fn with_seed(out: S, clock: C, seed: usize) -> PatternEngine<S, C> {
        PatternEngine {
            config: EngineConfig::default(),
            patterns: [PatternConfig::default(); NUM_PATTERNS],
            states: [PatternState::default(); NUM_PATTERNS],
            chord: ChordState::new(),
            offs: PendingOffQueue::new(),
            rng: SeedableRng::from_seed(&[seed][..]),
            out: out,
            clock: clock,
        }
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the global configuration. A non-positive bpm is clamped to
    /// the default instead of being rejected.
    pub fn set_engine_config(&mut self, config: EngineConfig) {
        self.config = config;
        if !(self.config.bpm > 0.0) {
            self.config.bpm = 120.0;
        }
    }

    pub fn pattern(&self, idx: usize) -> &PatternConfig {
        &self.patterns[idx]
    }

    pub fn pattern_mut(&mut self, idx: usize) -> &mut PatternConfig {
        &mut self.patterns[idx]
    }

    pub fn sink(&self) -> &S {
        &self.out
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.out
    }

    /// Feed one inbound message. Note-ons grow the chord, note-offs (and
    /// zero-velocity note-ons) shrink it; everything else is ignored.
    /// Input velocity is discarded, step velocity is authoritative.
    pub fn on_midi_in(&mut self, msg: MidiMsg) {
        match msg.status & 0xf0 {
            0x90 if msg.data2 > 0 => self.chord.note_on(msg.data1),
            0x80 | 0x90 => self.chord.note_off(msg.data1),
            _ => (),
        }
    }

    /// Advance the engine to the clock's current time. Call at ~1 ms
    /// cadence; when ticks arrive late, every missed step boundary is
    /// replayed at its logical time so the pattern keeps phase.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();

        self.offs.flush_due(now, &mut self.out);
        for state in self.states.iter_mut() {
            if state.last_on_valid
                && !self.offs.contains(state.last_on_ch, state.last_on_note)
            {
                state.last_on_valid = false;
            }
        }

        for idx in 0..NUM_PATTERNS {
            if self.patterns[idx].length == 0 {
                continue;
            }
            if self.states[idx].next_step_ms == 0 {
                self.states[idx].next_step_ms = now;
            }
            while now >= self.states[idx].next_step_ms {
                let at = self.states[idx].next_step_ms;
                self.pattern_step(idx, at);
                let step_ms = self.step_ms_for(self.patterns[idx].division);
                self.states[idx].next_step_ms = at + step_ms;
            }
        }
    }

    /// Drain every pending off at the current time, e.g. on shutdown.
    pub fn flush_all(&mut self) {
        let now = self.clock.now_ms();
        self.offs.flush_all(now, &mut self.out);
        for state in self.states.iter_mut() {
            state.last_on_valid = false;
        }
    }

    /// Return to the post-construction state, releasing anything that is
    /// still sounding.
    pub fn reset(&mut self) {
        self.flush_all();
        self.chord.clear();
        for state in self.states.iter_mut() {
            *state = PatternState::default();
        }
    }

    fn pattern_step(&mut self, idx: usize, now_step: u64) {
        let length = self.patterns[idx].length.min(MAX_STEPS);
        let step = self.patterns[idx].steps[self.states[idx].step_pos % length];
        self.states[idx].step_pos = (self.states[idx].step_pos + 1) % length;

        if !step.enabled {
            return;
        }
        if !self.chance(step.probability) {
            return;
        }

        // 1-based chord index; rests and indices beyond the chord resolve
        // to nothing but still consume the step
        let base = match self.chord.by_index(step.note_index) {
            Some(note) => note,
            None => return,
        };

        let transposed = i32::from(base) + 12 * i32::from(step.octave);
        let note = transposed.max(0).min(127) as u8;

        let ch = self.patterns[idx].channel.wrapping_sub(1) & 0x0f;
        let step_ms = self.step_ms_for(self.patterns[idx].division);
        let gate_pct = u64::from(step.gate_pct.max(1).min(200));
        let gate_ms = (step_ms * gate_pct / 100).max(1);

        let overlap = u64::from(self.config.overlap_ms);
        let on_at = now_step;
        let off_at = on_at + gate_ms + overlap;

        // hold the previous note until past this one's onset, so the
        // envelope downstream never hears a gap
        let state = self.states[idx];
        if state.last_on_valid {
            self.offs
                .extend_last(state.last_on_ch, state.last_on_note, on_at + overlap);
        }

        self.out.send(MidiMsg::note_on(ch, note, step.velocity, on_at));
        self.offs.schedule(off_at, ch, note, &mut self.out);

        let state = &mut self.states[idx];
        state.last_on_valid = true;
        state.last_on_ch = ch;
        state.last_on_note = note;
    }

    /// Milliseconds per step: a quarter-note at the configured tempo,
    /// split by the pattern's division. Degenerate values fall back to
    /// the defaults (120 bpm, division 2) and the result never reaches 0.
    fn step_ms_for(&self, division: u16) -> u64 {
        let bpm = if self.config.bpm > 0.0 {
            self.config.bpm
        } else {
            120.0
        };
        let division = if division > 0 { division } else { 2 };
        let quarter_ms = 60_000.0 / bpm;
        let ms = (quarter_ms / f64::from(division)) as u64;
        if ms == 0 {
            1
        } else {
            ms
        }
    }

    fn chance(&mut self, probability: u8) -> bool {
        if probability >= 100 {
            return true;
        }
        if probability == 0 {
            return false;
        }
        self.rng.gen_range(1i32, 101) <= i32::from(probability)
    }
}
