//! Process exit codes, values from BSD sysexits.h.
//!
//! A rejected drop exits with `DATAERR` like a malformed document: in both cases
//! the input tree stays as it was and nothing is printed to stdout.

/// Bad arguments or an unrecognised file extension
pub const USAGE: i32 = 64;

/// Malformed tree document or event script, duplicate ids, rejected drop
pub const DATAERR: i32 = 65;

/// Tree document or script file does not exist
pub const NOINPUT: i32 = 66;

pub const SOFTWARE: i32 = 70;

/// Reading an input file failed for a reason other than absence
pub const IOERR: i32 = 74;

/// Unreadable config file, invalid band limits or margin
pub const CONFIG: i32 = 78;
