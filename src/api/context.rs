// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use crate::api::config::{
  DerivedConstants, EncoderConfig, GopDerived, GopEntry, RateControlConfig,
};

/// A configured encoding session.
///
/// Holds the normalized, validated configuration, the fully expanded
/// GOP structure and the published derived constants. Everything in
/// here is frozen: the encoding pipeline reads it for the duration of
/// the run, and nothing is ever written after construction, so it can
/// be shared freely across encoding workers.
///
/// Created only through [`Config::new_context`].
///
/// [`Config::new_context`]: crate::Config::new_context
#[derive(Clone, Debug)]
pub struct Context {
  config: EncoderConfig,
  rate_control: RateControlConfig,
  gop_derived: GopDerived,
  constants: DerivedConstants,
}

impl Context {
  pub(crate) fn new(
    config: EncoderConfig, rate_control: RateControlConfig,
    gop_derived: GopDerived, constants: DerivedConstants,
  ) -> Self {
    Context { config, rate_control, gop_derived, constants }
  }

  /// The normalized encoder configuration.
  pub fn config(&self) -> &EncoderConfig {
    &self.config
  }

  /// The rate control configuration.
  pub fn rate_control(&self) -> &RateControlConfig {
    &self.rate_control
  }

  /// The full GOP structure: the verified template followed by the
  /// entries synthesized during reference-picture-set expansion.
  pub fn gop(&self) -> &[GopEntry] {
    &self.config.gop
  }

  /// Buffering and reordering bounds derived from the GOP structure.
  pub fn gop_derived(&self) -> &GopDerived {
    &self.gop_derived
  }

  /// The derived constants published for the rest of the run.
  pub fn constants(&self) -> &DerivedConstants {
    &self.constants
  }
}
