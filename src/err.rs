use std::error::Error as StdError;
use std::fmt;
use std::io;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SysErr {
    UnknownBackend,
    UnreachableBackend,
}

impl StdError for SysErr {}

impl fmt::Display for SysErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SysErr::UnknownBackend => write!(f, "unknown backend"),
            SysErr::UnreachableBackend => write!(f, "unreachable backend"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CmdErr {
    UnknownCommand,
    MissingArg,
    BadNumber,
}

impl StdError for CmdErr {}

impl fmt::Display for CmdErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CmdErr::UnknownCommand => write!(f, "unknown command"),
            CmdErr::MissingArg => write!(f, "missing argument"),
            CmdErr::BadNumber => write!(f, "malformed number"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    SysErr(SysErr),
    CmdErr(CmdErr),
    BadPreset,
    IoErr,
}

impl From<SysErr> for Error {
    fn from(err: SysErr) -> Error {
        Error::SysErr(err)
    }
}

impl From<CmdErr> for Error {
    fn from(err: CmdErr) -> Error {
        Error::CmdErr(err)
    }
}

impl From<io::Error> for Error {
    fn from(_: io::Error) -> Error {
        Error::IoErr
    }
}

impl From<serde_json::Error> for Error {
    fn from(_: serde_json::Error) -> Error {
        Error::BadPreset
    }
}

impl StdError for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::SysErr(ref err) => write!(f, "System error: {}", err),
            Error::CmdErr(ref err) => write!(f, "Command error: {}", err),
            Error::BadPreset => write!(f, "Malformed preset"),
            Error::IoErr => write!(f, "IO error"),
        }
    }
}
