#[macro_use]
extern crate serde_derive;

use std::io;
use std::io::Write;
use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;

use docopt::Docopt;

use ostinato::cli;
use ostinato::cli::Control;
use ostinato::log::{ConsoleLogger, FileLogger, LogBackend, Logger};
use ostinato::sinks::{factory, Backend, Logged};
use ostinato::{
    Error, MidiMsg, MidiOut, PatternBuilder, PatternEngine, Preset, SysErr, SystemClock,
};

#[cfg(feature = "with-portmidi")]
use ostinato::sinks::PortMidiIn;
#[cfg(feature = "with-portmidi")]
use ostinato::MidiIn;

const USAGE: &str = "
Ostinato. A deterministic MIDI arpeggiator & step sequencer.

Usage:
  ostinato [options]
  ostinato (-h | --help)
  ostinato --version

Options:
  -h --help         Show this screen.
  --sink=NAME       Where notes go: 'console', 'osc' or 'portmidi'
                    [default: console].
  --device=ID       MIDI output device id (portmidi sink only).
  --input=ID        MIDI input device id (requires 'with-portmidi').
  --host=ADDR       OSC bind address [default: 127.0.0.1:34254].
  --client=ADDR     OSC client address [default: 127.0.0.1:3000].
  --preset=FILE     Load a JSON preset instead of the demo patterns.
  --hold=NOTES      Comma separated notes held from the start, e.g.
                    '60,64,67'.
  --log             Log emitted messages to the console.
  --log-file        Log emitted messages to a JSON lines file.
";

#[derive(Debug, Deserialize)]
struct Args {
    flag_sink: String,
    flag_device: Option<usize>,
    flag_input: Option<usize>,
    flag_host: String,
    flag_client: String,
    flag_preset: Option<String>,
    flag_hold: Option<String>,
    flag_log: bool,
    flag_log_file: bool,
}

fn make_sink(args: &Args) -> Result<Box<dyn MidiOut>, Error> {
    let backend = match args.flag_sink.as_str() {
        "console" | "" => Backend::Console,
        "osc" => Backend::Osc(&args.flag_host, &args.flag_client),
        "portmidi" => Backend::PortMidi(args.flag_device),
        _ => return Err(Error::SysErr(SysErr::UnknownBackend)),
    };

    let sink = factory(&backend)?;
    if !args.flag_log && !args.flag_log_file {
        return Ok(sink);
    }

    let (send, recv) = channel();
    if args.flag_log_file {
        FileLogger::new().run_forever(recv);
    } else {
        ConsoleLogger::new().run_forever(recv);
    }
    Ok(Box::new(Logged::new(sink, Logger::new(send))))
}

/// Demo patterns matching an empty startup: a [1,3,2] arp on eighths, a
/// climbing octave on sixteenths, and a rest-speckled line.
fn demo_patterns<S, C>(engine: &mut PatternEngine<S, C>)
where
    S: MidiOut,
    C: ostinato::Clock,
{
    {
        let pattern = engine.pattern_mut(0);
        pattern.channel = 1;
        pattern.division = 2;
        PatternBuilder::new(pattern)
            .clear()
            .indices(&[1, 3, 2])
            .each()
            .gate(70)
            .vel(100)
            .done();
    }
    {
        let pattern = engine.pattern_mut(1);
        pattern.channel = 2;
        pattern.division = 4;
        PatternBuilder::new(pattern)
            .clear()
            .indices(&[1, 2, 3])
            .each()
            .gate(50)
            .vel(90)
            .oct(1)
            .done();
    }
    {
        let pattern = engine.pattern_mut(2);
        pattern.channel = 1;
        pattern.division = 2;
        PatternBuilder::new(pattern)
            .clear()
            .indices(&[1, 0, 2, 3])
            .step()
            .idx(3)
            .vel(120)
            .gate(80);
    }
}

fn hold_notes<S, C>(engine: &mut PatternEngine<S, C>, notes: &str) -> Result<(), Error>
where
    S: MidiOut,
    C: ostinato::Clock,
{
    for word in notes.split(',') {
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        let note: u8 = word
            .parse()
            .map_err(|_| Error::CmdErr(ostinato::CmdErr::BadNumber))?;
        engine.on_midi_in(MidiMsg::note_on(0, note.min(127), 100, 0));
    }
    Ok(())
}

fn run_app(args: &Args) -> Result<(), Error> {
    let sink = make_sink(args)?;
    let engine = &mut PatternEngine::new(sink, SystemClock::new());

    match args.flag_preset {
        Some(ref path) => Preset::load(path)?.apply(engine),
        None => demo_patterns(engine),
    }
    if let Some(ref notes) = args.flag_hold {
        hold_notes(engine, notes)?;
    }

    #[cfg(feature = "with-portmidi")]
    let mut midi_in = match args.flag_input {
        Some(id) => Some(PortMidiIn::new(Some(id))?),
        None => None,
    };

    let commands = cli::spawn_reader();
    println!("Ready. Type 'help'.");

    let res = Duration::from_millis(1);
    loop {
        #[cfg(feature = "with-portmidi")]
        {
            if let Some(ref mut input) = midi_in {
                while let Some(msg) = input.poll() {
                    engine.on_midi_in(msg);
                }
            }
        }

        let mut stop = false;
        while let Ok(cmd) = commands.try_recv() {
            if cli::apply(cmd, engine) == Control::Stop {
                stop = true;
            }
        }
        if stop {
            break;
        }

        engine.tick();
        thread::sleep(res);
    }

    engine.flush_all();
    println!("Bye");
    Ok(())
}

fn main() {
    let version = env!("CARGO_PKG_VERSION").to_string();
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.version(Some(version)).deserialize())
        .unwrap_or_else(|e| e.exit());

    let code = match run_app(&args) {
        Ok(_) => 0,
        Err(err) => {
            writeln!(io::stderr(), "Error: {}", err).unwrap();
            1
        }
    };

    std::process::exit(code);
}
