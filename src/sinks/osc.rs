use rosc::encoder;
use rosc::{OscMessage, OscPacket, OscType};

use std::net::UdpSocket;

use crate::err::Error;
use crate::ports::{MidiMsg, MidiOut};

/// Forwards note events as OSC messages over UDP, for synths that speak
/// OSC rather than raw MIDI.
pub struct Osc {
    sock: UdpSocket,
}

impl Osc {
    pub fn new(host_addr: &str, client_addr: &str) -> Result<Osc, Error> {
        let sock = UdpSocket::bind(host_addr)?;
        sock.connect(client_addr)?;
        Ok(Osc { sock: sock })
    }
}

impl MidiOut for Osc {
    fn send(&mut self, msg: MidiMsg) {
        if let Some(buff) = encode(msg) {
            self.sock.send(&buff).ok();
        }
    }
}

fn encode(msg: MidiMsg) -> Option<Vec<u8>> {
    let ch = msg.status & 0x0f;
    match msg.status & 0xf0 {
        0x90 => encoder::encode(&OscPacket::Message(OscMessage {
            addr: "/ostinato/note_on".to_string(),
            args: vec![
                OscType::Int(i32::from(ch)),
                OscType::Int(i32::from(msg.data1)),
                OscType::Int(i32::from(msg.data2)),
            ],
        }))
        .ok(),
        0x80 => encoder::encode(&OscPacket::Message(OscMessage {
            addr: "/ostinato/note_off".to_string(),
            args: vec![
                OscType::Int(i32::from(ch)),
                OscType::Int(i32::from(msg.data1)),
            ],
        }))
        .ok(),
        _ => None,
    }
}
