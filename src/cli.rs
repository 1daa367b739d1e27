//! Interactive command surface for the polling host. Lines from stdin
//! are parsed into `Command`s on a reader thread and applied to the
//! engine between ticks by the main loop. Out-of-range parameters are
//! clamped, never rejected.

use std::io;
use std::io::BufRead;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use crate::engine::config::{PatternConfig, MAX_STEPS, NUM_PATTERNS};
use crate::engine::PatternEngine;
use crate::err::CmdErr;
use crate::ports::{Clock, MidiOut};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Help,
    Show(Option<i64>),
    SetBpm(i64),
    SetDivision(i64, i64),
    SetLength(i64, i64),
    SetNoteIndex(i64, i64, i64),
    SetVelocity(i64, i64, i64),
    SetGate(i64, i64, i64),
    SetOctave(i64, i64, i64),
    SetProbability(i64, i64, i64),
    SetEnabled(i64, i64, bool),
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Control {
    Continue,
    Stop,
}

fn clamp(value: i64, min: i64, max: i64) -> i64 {
    value.max(min).min(max)
}

/// Parse one line of input. Empty lines are `MissingArg`; callers should
/// skip them before parsing.
pub fn parse(line: &str) -> Result<Command, CmdErr> {
    let mut words = line.split_whitespace();
    let head = match words.next() {
        Some(word) => word,
        None => return Err(CmdErr::MissingArg),
    };

    let mut arg = || -> Result<i64, CmdErr> {
        let word = words.next().ok_or(CmdErr::MissingArg)?;
        word.parse().map_err(|_| CmdErr::BadNumber)
    };

    match head {
        "help" => Ok(Command::Help),
        "show" => {
            let pat = match arg() {
                Ok(pat) => Some(pat),
                Err(CmdErr::MissingArg) => None,
                Err(err) => return Err(err),
            };
            Ok(Command::Show(pat))
        }
        "bpm" => Ok(Command::SetBpm(arg()?)),
        "div" => Ok(Command::SetDivision(arg()?, arg()?)),
        "len" => Ok(Command::SetLength(arg()?, arg()?)),
        "idx" => Ok(Command::SetNoteIndex(arg()?, arg()?, arg()?)),
        "vel" => Ok(Command::SetVelocity(arg()?, arg()?, arg()?)),
        "gate" => Ok(Command::SetGate(arg()?, arg()?, arg()?)),
        "oct" => Ok(Command::SetOctave(arg()?, arg()?, arg()?)),
        "prob" => Ok(Command::SetProbability(arg()?, arg()?, arg()?)),
        "on" => Ok(Command::SetEnabled(arg()?, arg()?, true)),
        "off" => Ok(Command::SetEnabled(arg()?, arg()?, false)),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CmdErr::UnknownCommand),
    }
}

/// Apply a command to the engine, printing whatever the command reports.
pub fn apply<S, C>(cmd: Command, engine: &mut PatternEngine<S, C>) -> Control
where
    S: MidiOut,
    C: Clock,
{
    let pat_idx = |pat: i64| clamp(pat, 0, NUM_PATTERNS as i64 - 1) as usize;

    match cmd {
        Command::Help => print_help(),
        Command::Show(None) => {
            for i in 0..NUM_PATTERNS {
                print_pattern(engine.pattern(i), i);
            }
        }
        Command::Show(Some(pat)) => {
            let pat = pat_idx(pat);
            print_pattern(engine.pattern(pat), pat);
        }
        Command::SetBpm(value) => {
            let mut config = *engine.engine_config();
            config.bpm = value as f64;
            engine.set_engine_config(config);
            println!("BPM = {}", engine.engine_config().bpm);
        }
        Command::SetDivision(pat, value) => {
            let pat = pat_idx(pat);
            let value = clamp(value, 1, i64::from(u16::max_value())) as u16;
            engine.pattern_mut(pat).division = value;
            println!("pat {} division = {}", pat, value);
        }
        Command::SetLength(pat, value) => {
            let pat = pat_idx(pat);
            let value = clamp(value, 0, MAX_STEPS as i64) as usize;
            engine.pattern_mut(pat).length = value;
            println!("pat {} length = {}", pat, value);
        }
        Command::SetNoteIndex(pat, step, value) => {
            edit_step(engine, pat, step, |s| s.note_index = clamp(value, 0, 8) as u8)
        }
        Command::SetVelocity(pat, step, value) => {
            edit_step(engine, pat, step, |s| s.velocity = clamp(value, 1, 127) as u8)
        }
        Command::SetGate(pat, step, value) => {
            edit_step(engine, pat, step, |s| s.gate_pct = clamp(value, 1, 200) as u8)
        }
        Command::SetOctave(pat, step, value) => {
            edit_step(engine, pat, step, |s| s.octave = clamp(value, -8, 8) as i8)
        }
        Command::SetProbability(pat, step, value) => {
            edit_step(engine, pat, step, |s| s.probability = clamp(value, 0, 100) as u8)
        }
        Command::SetEnabled(pat, step, enabled) => {
            edit_step(engine, pat, step, |s| s.enabled = enabled)
        }
        Command::Quit => return Control::Stop,
    }

    Control::Continue
}

fn edit_step<S, C, F>(engine: &mut PatternEngine<S, C>, pat: i64, step: i64, func: F)
where
    S: MidiOut,
    C: Clock,
    F: Fn(&mut crate::engine::config::Step),
{
    let pat = clamp(pat, 0, NUM_PATTERNS as i64 - 1) as usize;
    let pattern = engine.pattern_mut(pat);
    let length = pattern.length.min(MAX_STEPS);
    if length == 0 {
        return;
    }
    let step = clamp(step, 0, length as i64 - 1) as usize;
    func(&mut pattern.steps[step]);
}

pub fn print_help() {
    println!("Commands:");
    println!("  help                        - show this help");
    println!("  show [pat]                  - show pattern (0..3), or all if omitted");
    println!("  bpm <value>                 - set global BPM");
    println!("  div <pat> <division>        - set pattern division (1=1/4,2=1/8,4=1/16,...)");
    println!("  len <pat> <length>          - set pattern length (0..{})", MAX_STEPS);
    println!("  idx <pat> <step> <0..8>     - set step's note index (0=REST)");
    println!("  vel <pat> <step> <1..127>   - set velocity");
    println!("  gate <pat> <step> <1..200>  - set gate percent");
    println!("  oct <pat> <step> <-8..+8>   - set octave transpose");
    println!("  prob <pat> <step> <0..100>  - set probability");
    println!("  on <pat> <step>             - enable step");
    println!("  off <pat> <step>            - disable step");
    println!("  quit                        - exit");
}

pub fn print_pattern(pattern: &PatternConfig, idx: usize) {
    println!(
        "Pattern {} | ch={} div={} len={}",
        idx, pattern.channel, pattern.division, pattern.length
    );
    for i in 0..pattern.length.min(MAX_STEPS) {
        let step = &pattern.steps[i];
        println!(
            "  [{}] {} idx={} vel={} gate={} oct={} prob={}",
            i,
            if step.enabled { "on " } else { "off" },
            step.note_index,
            step.velocity,
            step.gate_pct,
            step.octave,
            step.probability
        );
    }
}

/// Read stdin on a background thread, handing parsed commands to the
/// host loop. The thread ends with the stream, on `quit`, or when the
/// receiver goes away.
pub fn spawn_reader() -> Receiver<Command> {
    let (send, recv) = channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse(&line) {
                Ok(cmd) => {
                    let quit = cmd == Command::Quit;
                    if send.send(cmd).is_err() || quit {
                        break;
                    }
                }
                Err(err) => println!("{}. Type 'help'.", err),
            }
        }
    });
    recv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("help"), Ok(Command::Help));
        assert_eq!(parse("quit"), Ok(Command::Quit));
        assert_eq!(parse("exit"), Ok(Command::Quit));
        assert_eq!(parse("show"), Ok(Command::Show(None)));
        assert_eq!(parse("show 2"), Ok(Command::Show(Some(2))));
        assert_eq!(parse("bpm 140"), Ok(Command::SetBpm(140)));
    }

    #[test]
    fn test_parse_step_commands() {
        assert_eq!(parse("div 1 4"), Ok(Command::SetDivision(1, 4)));
        assert_eq!(parse("len 0 16"), Ok(Command::SetLength(0, 16)));
        assert_eq!(parse("idx 0 3 2"), Ok(Command::SetNoteIndex(0, 3, 2)));
        assert_eq!(parse("vel 2 0 90"), Ok(Command::SetVelocity(2, 0, 90)));
        assert_eq!(parse("gate 0 1 70"), Ok(Command::SetGate(0, 1, 70)));
        assert_eq!(parse("oct 0 1 -2"), Ok(Command::SetOctave(0, 1, -2)));
        assert_eq!(parse("prob 3 5 50"), Ok(Command::SetProbability(3, 5, 50)));
        assert_eq!(parse("on 0 2"), Ok(Command::SetEnabled(0, 2, true)));
        assert_eq!(parse("off 0 2"), Ok(Command::SetEnabled(0, 2, false)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("wibble"), Err(CmdErr::UnknownCommand));
        assert_eq!(parse("bpm"), Err(CmdErr::MissingArg));
        assert_eq!(parse("div 0"), Err(CmdErr::MissingArg));
        assert_eq!(parse("bpm fast"), Err(CmdErr::BadNumber));
        assert_eq!(parse("show five"), Err(CmdErr::BadNumber));
    }

    #[test]
    fn test_extra_whitespace_tolerated() {
        assert_eq!(parse("  bpm   99 "), Ok(Command::SetBpm(99)));
    }
}
