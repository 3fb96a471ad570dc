// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

//! Parsing of delimited numeric-list option values (tile column widths,
//! tone mapping pivot arrays, mastering display primaries).

use thiserror::Error;

use std::str::FromStr;

/// Errors from parsing a delimited numeric-list option value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListParseError {
  /// A token did not parse as a number.
  #[error("cannot parse `{value}` as a number")]
  InvalidNumber {
    /// The offending token.
    value: String,
  },
  /// The list held the wrong number of values.
  #[error("expected {expected} values, found {found}")]
  WrongCount {
    /// The number of values the option requires.
    expected: usize,
    /// The number of values found.
    found: usize,
  },
}

fn is_delimiter(c: char) -> bool {
  c.is_whitespace() || c == ',' || c == '-' || c == '.'
}

/// Parses a whitespace, comma, dash or dot delimited list of numbers.
///
/// # Errors
///
/// Returns [`ListParseError::InvalidNumber`] when a token is not a
/// number of the requested type.
pub fn parse_list<T: FromStr>(s: &str) -> Result<Vec<T>, ListParseError> {
  s.split(is_delimiter)
    .filter(|token| !token.is_empty())
    .map(|token| {
      token
        .parse()
        .map_err(|_| ListParseError::InvalidNumber { value: token.to_owned() })
    })
    .collect()
}

/// Parses a delimited list that must hold exactly `expected` values.
///
/// # Errors
///
/// Returns [`ListParseError::WrongCount`] when the count differs, or
/// [`ListParseError::InvalidNumber`] when a token is not a number.
pub fn parse_exact_list<T: FromStr>(
  s: &str, expected: usize,
) -> Result<Vec<T>, ListParseError> {
  let values = parse_list(s)?;
  if values.len() != expected {
    return Err(ListParseError::WrongCount {
      expected,
      found: values.len(),
    });
  }
  Ok(values)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn accepts_all_documented_delimiters() {
    let expected = vec![3u32, 5, 8];
    assert_eq!(parse_list("3 5 8"), Ok(expected.clone()));
    assert_eq!(parse_list("3,5,8"), Ok(expected.clone()));
    assert_eq!(parse_list("3-5-8"), Ok(expected.clone()));
    assert_eq!(parse_list("3. 5. 8"), Ok(expected.clone()));
    assert_eq!(parse_list("3, 5 - 8"), Ok(expected));
  }

  #[test]
  fn empty_input_is_an_empty_list() {
    assert_eq!(parse_list::<u32>(""), Ok(Vec::new()));
    assert_eq!(parse_list::<u32>("  "), Ok(Vec::new()));
  }

  #[test]
  fn rejects_non_numeric_tokens() {
    assert_eq!(
      parse_list::<u32>("3 x 8"),
      Err(ListParseError::InvalidNumber { value: "x".to_owned() })
    );
  }

  #[test]
  fn count_mismatch_is_an_error() {
    assert_eq!(
      parse_exact_list::<u32>("0 50000 0 0 50000", 6),
      Err(ListParseError::WrongCount { expected: 6, found: 5 })
    );
    assert!(parse_exact_list::<u32>("0 50000 0 0 50000 0", 6).is_ok());
  }
}
