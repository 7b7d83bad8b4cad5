use std::fmt;

use crate::error::LogicError;

/// Largest code point a range may start at.
pub const MAX_START: u32 = 0x10_FFFF;
/// Largest value the end of a range may take; masks such as `1?????` go past
/// the last code point.
pub const MAX_END: u32 = 0x1F_FFFF;

/// An inclusive range of code points as written in `U+0-7F` or `U+4??`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnicodeRange {
    start: u32,
    end:   u32,
}

impl UnicodeRange {
    /// Creates a range, checking the bounds.
    ///
    /// # Errors
    /// A start past `0x10FFFF`, an end past `0x1FFFFF` or a start larger than
    /// the end are internal errors: the lexer never produces such ranges.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::unicode_range::UnicodeRange;
    ///
    /// assert!(UnicodeRange::new(0x20, 0x7f).is_ok());
    /// assert!(UnicodeRange::new(0x7f, 0x20).is_err());
    /// ```
    pub fn new(start: u32, end: u32) -> Result<Self, LogicError> {
        if start > MAX_START {
            return Err(LogicError(format!("the start parameter is limited to a maximum of 0x10FFFF, it is 0x{start:x} now.")));
        }
        if end > MAX_END {
            return Err(LogicError(format!("the end parameter is limited to a maximum of 0x1FFFFF, it is 0x{end:x} now.")));
        }
        if start > end {
            return Err(LogicError(format!("the start parameter ({start:x}) cannot be larged than the end parameter ({end:x}) in a unicode range.")));
        }
        Ok(Self { start, end })
    }

    /// Parses the text following `U+`.
    ///
    /// Accepts `XXXX`, `XXXX-YYYY` and masks such as `4??`. Returns `None`
    /// when the text is not a valid range.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::unicode_range::UnicodeRange;
    ///
    /// let r = UnicodeRange::parse("4??").unwrap();
    /// assert_eq!((r.start(), r.end()), (0x400, 0x4ff));
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let hex = |s: &str| {
            if s.is_empty() || s.len() > 6 {
                None
            } else {
                u32::from_str_radix(s, 16).ok()
            }
        };

        if let Some((start, end)) = text.split_once('-') {
            return Self::new(hex(start)?, hex(end)?).ok();
        }
        if text.contains('?') {
            let digits = text.trim_end_matches('?');
            if digits.contains('?') || text.len() > 6 {
                return None;
            }
            let start = hex(&text.replace('?', "0"))?;
            let end = hex(&text.replace('?', "f"))?;
            return Self::new(start, end.min(MAX_END)).ok();
        }
        let value = hex(text)?;
        Self::new(value, value).ok()
    }

    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Intersection of two ranges, `None` when they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }
}

impl fmt::Display for UnicodeRange {
    /// Writes the range without the `U+` introducer, using a `?` mask when
    /// possible.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::unicode_range::UnicodeRange;
    ///
    /// assert_eq!(UnicodeRange::new(0x400, 0x4ff).unwrap().to_string(), "4??");
    /// assert_eq!(UnicodeRange::new(0x20, 0x7e).unwrap().to_string(), "20-7e");
    /// assert_eq!(UnicodeRange::new(0, 0x10ffff).unwrap().to_string(), "??????");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == 0 && self.end >= MAX_START {
            return f.write_str("??????");
        }
        if self.start == self.end {
            return write!(f, "{:x}", self.start);
        }

        let start = format!("{:06x}", self.start);
        let end = format!("{:06x}", self.end);
        let mut p = 6;
        while p > 0 && start.as_bytes()[p - 1] == b'0' && end.as_bytes()[p - 1] == b'f' {
            p -= 1;
        }
        if start[..p] == end[..p] {
            let masked = format!("{}{}", &start[..p], "?".repeat(6 - p));
            return f.write_str(masked.trim_start_matches('0'));
        }

        write!(f, "{:x}-{:x}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_code_point() {
        let r = UnicodeRange::parse("A5").unwrap();
        assert_eq!((r.start(), r.end()), (0xa5, 0xa5));
        assert_eq!(r.to_string(), "a5");
    }

    #[test]
    fn intersection() {
        let a = UnicodeRange::new(0x10, 0x40).unwrap();
        let b = UnicodeRange::new(0x30, 0x80).unwrap();
        assert_eq!(a.intersect(&b), Some(UnicodeRange::new(0x30, 0x40).unwrap()));

        let c = UnicodeRange::new(0x100, 0x200).unwrap();
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn rejects_reversed_ranges() {
        assert!(UnicodeRange::parse("80-10").is_none());
        assert!(UnicodeRange::new(0x11_0000, 0x11_0000).is_err());
    }
}
