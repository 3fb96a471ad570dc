// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use rhevce::{ConfigViolations, GopEntryParseError, ListParseError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
  #[error("{msg}: {io}")]
  Io { msg: String, io: std::io::Error },
  #[error("{msg}:\n  {status}")]
  Config { msg: String, status: ConfigViolations },
  #[error("Cannot parse option `{opt}`: {err}")]
  ParseInt { opt: String, err: std::num::ParseIntError },
  #[error("Cannot parse option `{opt}`: {err}")]
  List { opt: String, err: ListParseError },
  #[error("Cannot parse GOP entry `{opt}`: {err}")]
  Gop { opt: String, err: GopEntryParseError },
  #[error("Invalid value `{value}` for option `{opt}`")]
  InvalidValue { opt: String, value: String },
  #[error("{msg}")]
  Generic { msg: String },
}

impl CliError {
  pub fn new(msg: &str) -> CliError {
    CliError::Generic { msg: msg.to_owned() }
  }

  pub fn invalid_value(opt: &str, value: impl ToString) -> CliError {
    CliError::InvalidValue {
      opt: opt.to_owned(),
      value: value.to_string(),
    }
  }
}

pub trait ToError {
  fn context(self, msg: &str) -> CliError;
}

impl ToError for std::io::Error {
  fn context(self, msg: &str) -> CliError {
    CliError::Io { msg: msg.to_owned(), io: self }
  }
}

impl ToError for ConfigViolations {
  fn context(self, msg: &str) -> CliError {
    CliError::Config { msg: msg.to_owned(), status: self }
  }
}

impl ToError for std::num::ParseIntError {
  fn context(self, opt: &str) -> CliError {
    CliError::ParseInt { opt: opt.to_lowercase(), err: self }
  }
}

impl ToError for ListParseError {
  fn context(self, opt: &str) -> CliError {
    CliError::List { opt: opt.to_owned(), err: self }
  }
}

impl ToError for GopEntryParseError {
  fn context(self, opt: &str) -> CliError {
    CliError::Gop { opt: opt.to_owned(), err: self }
  }
}

pub fn print_error(e: &dyn std::error::Error) {
  error!("{}", e);
  let mut cause = e.source();
  while let Some(e) = cause {
    error!("Caused by: {}", e);
    cause = e.source();
  }
}
