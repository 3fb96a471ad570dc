// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use crate::serialize::{Deserialize, Serialize};

/// Rate control configuration.
///
/// The default configuration leaves rate control disabled and codes at a
/// fixed QP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateControlConfig {
  /// Enable rate control.
  pub enabled: bool,
  /// Target bitrate in bits per second.
  pub target_bitrate: i32,
  /// Bit allocation across the hierarchy: 0 equal, 1 fixed ratio,
  /// 2 adaptive ratio.
  pub keep_hierarchical_bit: u32,
  /// Use CTU-level rate control rather than picture-level.
  pub lcu_level: bool,
  /// Use a separate R-lambda model per CTU.
  pub lcu_separate_model: bool,
  /// Initial QP, or 0 to estimate one from the target bitrate.
  pub initial_qp: i32,
  /// Force intra frames to use the initial QP.
  pub force_intra_qp: bool,
}

impl Default for RateControlConfig {
  fn default() -> Self {
    RateControlConfig {
      enabled: false,
      target_bitrate: 0,
      keep_hierarchical_bit: 0,
      lcu_level: true,
      lcu_separate_model: true,
      initial_qp: 0,
      force_intra_qp: false,
    }
  }
}
