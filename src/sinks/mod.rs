mod capture;
mod console;
mod logged;
mod osc;
#[cfg(feature = "with-portmidi")]
mod portmidi;

use crate::err::{Error, SysErr};
use crate::ports::MidiOut;

pub use self::capture::Capture;
pub use self::console::Console;
pub use self::logged::Logged;
pub use self::osc::Osc;
#[cfg(feature = "with-portmidi")]
pub use self::portmidi::{PortMidiIn, PortMidiOut};

#[derive(Clone, Debug, PartialEq)]
pub enum Backend<'a> {
    Console,
    Osc(&'a str, &'a str),
    PortMidi(Option<usize>),
}

#[allow(unreachable_patterns)]
pub fn factory(request: &Backend) -> Result<Box<dyn MidiOut>, Error> {
    match *request {
        Backend::Console => Ok(Box::new(Console::new())),
        Backend::Osc(host, client) => Ok(Box::new(Osc::new(host, client)?)),
        #[cfg(feature = "with-portmidi")]
        Backend::PortMidi(device) => Ok(Box::new(PortMidiOut::new(device)?)),
        _ => Err(Error::SysErr(SysErr::UnknownBackend)),
    }
}
