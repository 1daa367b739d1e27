use std::cell::RefCell;
use std::rc::Rc;

use crate::ports::{MidiMsg, MidiOut};

/// Records everything it is sent. Handles share the same buffer, so a
/// test can keep one while the engine owns the other.
#[derive(Clone, Debug, Default)]
pub struct Capture {
    messages: Rc<RefCell<Vec<MidiMsg>>>,
}

impl Capture {
    pub fn new() -> Capture {
        Capture {
            messages: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn handle(&self) -> Capture {
        self.clone()
    }

    pub fn messages(&self) -> Vec<MidiMsg> {
        self.messages.borrow().clone()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl MidiOut for Capture {
    fn send(&mut self, msg: MidiMsg) {
        self.messages.borrow_mut().push(msg);
    }
}
