//! Deterministic changelog timestamps in `yyyyMMddHHmmss` form. The
//! normalizer hands every emitted entity the next second, so migration files
//! sort in declaration order and repeated runs produce identical output.

use std::fmt;

use crate::error::CompileError;

pub const DEFAULT_BASE: &str = "20200101000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl Timestamp {
    pub fn parse(text: &str) -> Result<Timestamp, CompileError> {
        if text.len() != 14 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CompileError::InvalidObject(format!(
                "'{text}' is not a yyyyMMddHHmmss timestamp"
            )));
        }
        let number = |start: usize, len: usize| {
            text.as_bytes()[start..start + len]
                .iter()
                .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
        };
        let timestamp = Timestamp {
            year: number(0, 4),
            month: number(4, 2),
            day: number(6, 2),
            hour: number(8, 2),
            minute: number(10, 2),
            second: number(12, 2),
        };
        if !timestamp.is_valid() {
            return Err(CompileError::InvalidObject(format!(
                "'{text}' is not a valid calendar timestamp"
            )));
        }
        Ok(timestamp)
    }

    fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    pub fn next_second(mut self) -> Timestamp {
        self.second += 1;
        if self.second == 60 {
            self.second = 0;
            self.minute += 1;
        }
        if self.minute == 60 {
            self.minute = 0;
            self.hour += 1;
        }
        if self.hour == 24 {
            self.hour = 0;
            self.day += 1;
        }
        if self.day > days_in_month(self.year, self.month) {
            self.day = 1;
            self.month += 1;
        }
        if self.month > 12 {
            self.month = 1;
            self.year += 1;
        }
        self
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn is_leap_year(year: u32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}
