// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Argument Vector Cursor
// ─────────────────────────────────────────────────────────────────────
//! Flat argument-vector scanning.
//!
//! Flags are located by exact match (`--pump`, `--tetm`) and their
//! values are read positionally with a caller-held cursor, so repeated
//! occurrences of the same flag can be consumed one after another.

use crate::error::{CondensateError, CondensateResult};

/// An owned argument vector without the program name.
#[derive(Debug, Clone, Default)]
pub struct ArgList {
    args: Vec<String>,
}

impl ArgList {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Process arguments, skipping the program name.
    pub fn from_env() -> Self {
        Self::new(std::env::args().skip(1))
    }

    /// Split a whitespace-separated command line. Test convenience.
    pub fn parse_line(line: &str) -> Self {
        Self::new(line.split_whitespace())
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Value at `cursor` without advancing.
    pub fn peek(&self, cursor: usize) -> Option<&str> {
        self.args.get(cursor).map(String::as_str)
    }

    /// Index of the first `flag` at or after `from`.
    pub fn find(&self, flag: &str, from: usize) -> Option<usize> {
        self.args
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, a)| a.as_str() == flag)
            .map(|(i, _)| i)
    }

    pub fn has(&self, flag: &str) -> bool {
        self.find(flag, 0).is_some()
    }

    /// Read the string at `cursor` and advance it.
    pub fn next_str(&self, name: &str, cursor: &mut usize) -> CondensateResult<&str> {
        let value = self
            .args
            .get(*cursor)
            .ok_or_else(|| CondensateError::MissingValue {
                name: name.to_string(),
            })?;
        *cursor += 1;
        Ok(value.as_str())
    }

    /// Read a finite float at `cursor` and advance it.
    pub fn next_f64(&self, name: &str, cursor: &mut usize) -> CondensateResult<f64> {
        let raw = self.next_str(name, cursor)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(CondensateError::InvalidNumber {
                name: name.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Read a signed integer at `cursor` and advance it.
    pub fn next_i64(&self, name: &str, cursor: &mut usize) -> CondensateResult<i64> {
        let raw = self.next_str(name, cursor)?;
        raw.parse::<i64>()
            .map_err(|_| CondensateError::InvalidNumber {
                name: name.to_string(),
                value: raw.to_string(),
            })
    }

    /// Read a non-negative integer at `cursor` and advance it.
    pub fn next_usize(&self, name: &str, cursor: &mut usize) -> CondensateResult<usize> {
        let raw = self.next_str(name, cursor)?;
        raw.parse::<usize>()
            .map_err(|_| CondensateError::InvalidNumber {
                name: name.to_string(),
                value: raw.to_string(),
            })
    }

    /// Cursor positioned just after `flag`, if present.
    pub fn value_cursor(&self, flag: &str) -> Option<usize> {
        self.find(flag, 0).map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_exact_match_only() {
        let args = ArgList::parse_line("--pumpX 1 --pump 2");
        assert_eq!(args.find("--pump", 0), Some(2));
        assert_eq!(args.find("--pump", 3), None);
        assert!(args.has("--pumpX"));
        assert!(!args.has("--pulse"));
    }

    #[test]
    fn test_cursor_advances() {
        let args = ArgList::parse_line("--N 400 300");
        let mut cursor = args.value_cursor("--N").unwrap();
        assert_eq!(args.next_usize("N_x", &mut cursor).unwrap(), 400);
        assert_eq!(args.next_usize("N_y", &mut cursor).unwrap(), 300);
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_missing_value() {
        let args = ArgList::parse_line("--tmax");
        let mut cursor = 1;
        let err = args.next_f64("tmax", &mut cursor).unwrap_err();
        assert!(matches!(err, CondensateError::MissingValue { .. }));
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_invalid_number() {
        let args = ArgList::parse_line("abc nan -3");
        let mut cursor = 0;
        assert!(matches!(
            args.next_f64("a", &mut cursor),
            Err(CondensateError::InvalidNumber { .. })
        ));
        assert!(args.next_f64("b", &mut cursor).is_err());
        assert!(args.next_usize("c", &mut cursor).is_err());
    }

    #[test]
    fn test_peek_does_not_advance() {
        let args = ArgList::parse_line("--historyMatrix 0 10");
        assert_eq!(args.peek(1), Some("0"));
        assert_eq!(args.peek(3), None);
    }

    #[test]
    fn test_negative_integer() {
        let args = ArgList::parse_line("-2");
        let mut cursor = 0;
        assert_eq!(args.next_i64("halo", &mut cursor).unwrap(), -2);
    }
}
