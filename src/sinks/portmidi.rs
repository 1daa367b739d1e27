use portmidi as pm;

use crate::err::SysErr;
use crate::ports::{MidiIn, MidiMsg, MidiOut};

impl From<pm::Error> for SysErr {
    fn from(_: pm::Error) -> SysErr {
        SysErr::UnreachableBackend
    }
}

pub struct PortMidiOut {
    ctx: pm::PortMidi,
    port: Option<pm::OutputPort>,
}

impl PortMidiOut {
    pub fn new(id: Option<usize>) -> Result<Self, SysErr> {
        let ctx = pm::PortMidi::new()?;

        let id = match id {
            Some(id) => Some(id as i32),
            None => match ctx.default_output_device_id() {
                Ok(id) => Some(id),
                Err(_) => None,
            },
        };

        let port = match id {
            Some(id) => {
                let info = ctx.device(id)?;
                Some(ctx.output_port(info, 1024)?)
            }
            None => None,
        };

        Ok(PortMidiOut {
            ctx: ctx,
            port: port,
        })
    }
}

impl MidiOut for PortMidiOut {
    fn send(&mut self, msg: MidiMsg) {
        let msg = pm::MidiMessage {
            status: msg.status,
            data1: msg.data1,
            data2: msg.data2,
        };
        if let Some(ref mut port) = self.port {
            port.write_message(msg).ok();
        }
    }
}

pub struct PortMidiIn {
    ctx: pm::PortMidi,
    port: Option<pm::InputPort>,
}

impl PortMidiIn {
    pub fn new(id: Option<usize>) -> Result<Self, SysErr> {
        let ctx = pm::PortMidi::new()?;

        let id = match id {
            Some(id) => Some(id as i32),
            None => match ctx.default_input_device_id() {
                Ok(id) => Some(id),
                Err(_) => None,
            },
        };

        let port = match id {
            Some(id) => {
                let info = ctx.device(id)?;
                Some(ctx.input_port(info, 1024)?)
            }
            None => None,
        };

        Ok(PortMidiIn {
            ctx: ctx,
            port: port,
        })
    }
}

impl MidiIn for PortMidiIn {
    fn poll(&mut self) -> Option<MidiMsg> {
        let port = match self.port {
            Some(ref mut port) => port,
            None => return None,
        };

        match port.read() {
            Ok(Some(event)) => Some(MidiMsg {
                status: event.message.status,
                data1: event.message.data1,
                data2: event.message.data2,
                t_ms: u64::from(event.timestamp),
            }),
            _ => None,
        }
    }
}
