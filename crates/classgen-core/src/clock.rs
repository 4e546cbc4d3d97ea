//! Time source for the `year` replacement.

use std::fmt;

use chrono::{Datelike, Local};

/// Supplies the calendar year stamped into generated files.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current calendar year.
    fn year(&self) -> i32;
}

/// Reads the local system clock on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn year(&self) -> i32 {
        Local::now().year()
    }
}

/// Always reports the same year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn year(&self) -> i32 {
        self.0
    }
}
