//! Block-based host adapter. An audio plugin's callback hands over the
//! block's duration in (fractional) milliseconds; the driver advances a
//! manual clock one whole millisecond per tick and carries the remainder
//! into the next block, so the engine sees the same 1 ms cadence as a
//! polling host.

use crate::clock::ManualClock;
use crate::engine::PatternEngine;
use crate::ports::{MidiMsg, MidiOut};

pub struct BlockDriver<S>
where
    S: MidiOut,
{
    engine: PatternEngine<S, ManualClock>,
    clock: ManualClock,
    carry: f64,
}

impl<S> BlockDriver<S>
where
    S: MidiOut,
{
    pub fn new(out: S) -> BlockDriver<S> {
        let clock = ManualClock::new();
        let engine = PatternEngine::new(out, clock.handle());
        BlockDriver {
            engine: engine,
            clock: clock,
            carry: 0.0,
        }
    }

    pub fn engine(&self) -> &PatternEngine<S, ManualClock> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PatternEngine<S, ManualClock> {
        &mut self.engine
    }

    /// Rewind to time zero, as a plugin does when playback (re)starts.
    pub fn prepare(&mut self) {
        self.engine.reset();
        self.clock.set_ms(0);
        self.carry = 0.0;
    }

    /// Host tempo override; non-positive values are ignored.
    pub fn set_bpm(&mut self, bpm: f64) {
        if bpm <= 0.0 {
            return;
        }
        let mut config = *self.engine.engine_config();
        if config.bpm != bpm {
            config.bpm = bpm;
            self.engine.set_engine_config(config);
        }
    }

    /// Feed one block's MIDI input and run the whole milliseconds it
    /// covers, keeping the fractional remainder for the next block.
    pub fn process_block(&mut self, block_ms: f64, input: &[MidiMsg]) {
        for msg in input {
            self.engine.on_midi_in(*msg);
        }

        let total = self.carry + block_ms;
        let ticks = total.floor() as u64;
        self.carry = total - ticks as f64;

        for _ in 0..ticks {
            self.engine.tick();
            self.clock.advance_ms(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::Capture;

    #[test]
    fn test_carry_accumulates_fractions() {
        let mut driver = BlockDriver::new(Capture::new());
        driver.engine_mut().pattern_mut(0).length = 1;
        driver.engine_mut().pattern_mut(0).steps[0].note_index = 1;
        driver.process_block(0.0, &[MidiMsg::note_on(0, 60, 100, 0)]);

        // three 0.4 ms blocks make one whole millisecond
        driver.process_block(0.4, &[]);
        driver.process_block(0.4, &[]);
        assert!(driver.engine().sink().messages().is_empty());
        driver.process_block(0.4, &[]);
        assert_eq!(driver.engine().sink().messages().len(), 1);
    }

    #[test]
    fn test_blocks_advance_pattern_time() {
        let mut driver = BlockDriver::new(Capture::new());
        {
            let pattern = driver.engine_mut().pattern_mut(0);
            pattern.length = 1;
            pattern.division = 2;
            pattern.steps[0].note_index = 1;
        }
        driver.process_block(0.0, &[MidiMsg::note_on(0, 60, 100, 0)]);

        // ~11.6 ms blocks, enough of them to cross the 250 ms boundary
        for _ in 0..24 {
            driver.process_block(11.61, &[]);
        }

        let ons: Vec<_> = driver
            .engine()
            .sink()
            .messages()
            .iter()
            .filter(|m| m.status & 0xf0 == 0x90)
            .map(|m| m.t_ms)
            .collect();
        assert_eq!(ons, vec![0, 250]);
    }

    #[test]
    fn test_prepare_rewinds() {
        let mut driver = BlockDriver::new(Capture::new());
        driver.engine_mut().pattern_mut(0).length = 1;
        driver.engine_mut().pattern_mut(0).steps[0].note_index = 1;
        driver.process_block(10.0, &[MidiMsg::note_on(0, 60, 100, 0)]);

        driver.prepare();
        assert_eq!(driver.engine().sink().messages().len(), 2); // on + flushed off

        driver.engine().sink().clear();
        driver.process_block(2.0, &[MidiMsg::note_on(0, 62, 100, 0)]);
        let ons: Vec<_> = driver
            .engine()
            .sink()
            .messages()
            .into_iter()
            .filter(|m| m.status & 0xf0 == 0x90)
            .collect();
        assert_eq!(ons.len(), 1);
        assert_eq!(ons[0].t_ms, 0);
    }
}
