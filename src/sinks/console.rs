use crate::ports::{MidiMsg, MidiOut};

/// Prints every message, for running against no hardware at all.
pub struct Console;

impl Console {
    pub fn new() -> Console {
        Console {}
    }
}

impl MidiOut for Console {
    fn send(&mut self, msg: MidiMsg) {
        println!(
            "0x{:02x} {:3} {:3} @ {} ms",
            msg.status, msg.data1, msg.data2, msg.t_ms
        );
    }
}
