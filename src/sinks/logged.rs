use crate::log::Logger;
use crate::ports::{MidiMsg, MidiOut};

/// Hands each message to the logger before forwarding it.
pub struct Logged<S>
where
    S: MidiOut,
{
    inner: S,
    logger: Logger,
}

impl<S> Logged<S>
where
    S: MidiOut,
{
    pub fn new(inner: S, logger: Logger) -> Logged<S> {
        Logged {
            inner: inner,
            logger: logger,
        }
    }
}

impl<S> MidiOut for Logged<S>
where
    S: MidiOut,
{
    fn send(&mut self, msg: MidiMsg) {
        self.logger.log_msg("out", &msg);
        self.inner.send(msg);
    }
}
