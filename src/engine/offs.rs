use crate::engine::config::MAX_PENDING_OFFS;
use crate::ports::{MidiMsg, MidiOut};

/// A scheduled note-off awaiting its deadline.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PendingOff {
    pub at_ms: u64,
    pub ch: u8,
    pub note: u8,
}

/// Unordered fixed buffer of scheduled note-offs, drained by deadline.
/// On overflow the off is emitted inline instead; entries are never
/// dropped and the buffer never grows.
#[derive(Copy, Clone, Debug)]
pub struct PendingOffQueue {
    buf: [PendingOff; MAX_PENDING_OFFS],
    count: usize,
}

impl PendingOffQueue {
    pub fn new() -> PendingOffQueue {
        PendingOffQueue {
            buf: [PendingOff::default(); MAX_PENDING_OFFS],
            count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    pub fn contains(&self, ch: u8, note: u8) -> bool {
        self.buf[..self.count]
            .iter()
            .any(|p| p.ch == ch && p.note == note)
    }

    /// Queue a note-off for `at_ms`. When the buffer is full the off goes
    /// straight to the sink, stamped with its intended time.
    pub fn schedule<S>(&mut self, at_ms: u64, ch: u8, note: u8, out: &mut S)
    where
        S: MidiOut,
    {
        if self.count < MAX_PENDING_OFFS {
            self.buf[self.count] = PendingOff {
                at_ms: at_ms,
                ch: ch,
                note: note,
            };
            self.count += 1;
        } else {
            out.send(MidiMsg::note_off(ch, note, at_ms));
        }
    }

    /// Push the deadline of the most recently queued off for `(ch, note)`
    /// out to at least `new_time`. The newest match is the note that must
    /// not leave a gap before its successor. No-op when absent.
    pub fn extend_last(&mut self, ch: u8, note: u8, new_time: u64) {
        for i in (0..self.count).rev() {
            let p = &mut self.buf[i];
            if p.ch == ch && p.note == note {
                if p.at_ms < new_time {
                    p.at_ms = new_time;
                }
                return;
            }
        }
    }

    /// Send every off whose deadline has passed, stamped `now`, and
    /// compact the survivors to the front in one pass.
    pub fn flush_due<S>(&mut self, now: u64, out: &mut S)
    where
        S: MidiOut,
    {
        let mut w = 0;
        for r in 0..self.count {
            let p = self.buf[r];
            if p.at_ms <= now {
                out.send(MidiMsg::note_off(p.ch, p.note, now));
            } else {
                self.buf[w] = p;
                w += 1;
            }
        }
        self.count = w;
    }

    /// Drain everything regardless of deadline, stamped `now`.
    pub fn flush_all<S>(&mut self, now: u64, out: &mut S)
    where
        S: MidiOut,
    {
        for r in 0..self.count {
            let p = self.buf[r];
            out.send(MidiMsg::note_off(p.ch, p.note, now));
        }
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::Capture;

    #[test]
    fn test_flush_partitions_by_deadline() {
        let mut queue = PendingOffQueue::new();
        let mut out = Capture::new();

        queue.schedule(100, 0, 60, &mut out);
        queue.schedule(300, 0, 64, &mut out);
        queue.schedule(200, 1, 67, &mut out);
        assert_eq!(queue.len(), 3);

        queue.flush_due(250, &mut out);
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(0, 64));
        assert!(!queue.contains(0, 60));

        let sent = out.messages();
        assert_eq!(sent, vec![
            MidiMsg::note_off(0, 60, 250),
            MidiMsg::note_off(1, 67, 250),
        ]);
    }

    #[test]
    fn test_extend_last_targets_newest() {
        let mut queue = PendingOffQueue::new();
        let mut out = Capture::new();

        queue.schedule(100, 0, 60, &mut out);
        queue.schedule(150, 0, 60, &mut out);
        queue.extend_last(0, 60, 400);

        // the older entry still drains at its own deadline
        queue.flush_due(120, &mut out);
        assert_eq!(queue.len(), 1);
        queue.flush_due(399, &mut out);
        assert_eq!(queue.len(), 1);
        queue.flush_due(400, &mut out);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_extend_never_shortens() {
        let mut queue = PendingOffQueue::new();
        let mut out = Capture::new();

        queue.schedule(500, 0, 60, &mut out);
        queue.extend_last(0, 60, 300);

        queue.flush_due(499, &mut out);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_extend_absent_is_noop() {
        let mut queue = PendingOffQueue::new();
        queue.extend_last(0, 60, 400);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_overflow_emits_inline() {
        let mut queue = PendingOffQueue::new();
        let mut out = Capture::new();

        for n in 0..MAX_PENDING_OFFS {
            queue.schedule(1000, 0, n as u8, &mut out);
        }
        assert_eq!(queue.len(), MAX_PENDING_OFFS);
        assert!(out.messages().is_empty());

        queue.schedule(1234, 2, 99, &mut out);
        assert_eq!(queue.len(), MAX_PENDING_OFFS);
        assert_eq!(out.messages(), vec![MidiMsg::note_off(2, 99, 1234)]);
    }

    #[test]
    fn test_flush_all_drains_everything() {
        let mut queue = PendingOffQueue::new();
        let mut out = Capture::new();

        queue.schedule(100, 0, 60, &mut out);
        queue.schedule(9999, 0, 64, &mut out);
        queue.flush_all(50, &mut out);

        assert!(queue.is_empty());
        assert_eq!(out.messages(), vec![
            MidiMsg::note_off(0, 60, 50),
            MidiMsg::note_off(0, 64, 50),
        ]);
    }
}
