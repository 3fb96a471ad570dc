// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

//! Level limits from ITU-T H.265 Annex A.

use crate::api::Level;

/// Maximum luma picture size (`MaxLumaPs`) per level, from Table A.8.
///
/// Level 8.5 carries no limit and is absent from the table.
pub static HEVC_LEVEL_MAX_LUMA_PS: [(Level, usize); 13] = [
  (Level::L1, 36_864),
  (Level::L2, 122_880),
  (Level::L2_1, 245_760),
  (Level::L3, 552_960),
  (Level::L3_1, 983_040),
  (Level::L4, 2_228_224),
  (Level::L4_1, 2_228_224),
  (Level::L5, 8_912_896),
  (Level::L5_1, 8_912_896),
  (Level::L5_2, 8_912_896),
  (Level::L6, 35_651_584),
  (Level::L6_1, 35_651_584),
  (Level::L6_2, 35_651_584),
];

/// The `MaxLumaPs` limit for a level, or `None` when the level is
/// unconstrained (unset, or level 8.5).
pub fn max_luma_picture_size(level: Level) -> Option<usize> {
  HEVC_LEVEL_MAX_LUMA_PS
    .iter()
    .find(|&&(l, _)| l == level)
    .map(|&(_, ps)| ps)
}

/// The per-dimension bound `sqrt(MaxLumaPs * 8)` for a level, or `None`
/// when the level is unconstrained.
pub fn max_luma_dimension(level: Level) -> Option<usize> {
  max_luma_picture_size(level).map(|ps| ((ps * 8) as f64).sqrt() as usize)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn limits_known_levels() {
    assert_eq!(max_luma_picture_size(Level::L4_1), Some(2_228_224));
    assert_eq!(max_luma_picture_size(Level::L8_5), None);
    assert_eq!(max_luma_picture_size(Level::None), None);
  }

  #[test]
  fn dimension_bound_is_sqrt_of_eight_times_picture_size() {
    // 8 * 2228224 = 17825792, sqrt = 4222.06...
    assert_eq!(max_luma_dimension(Level::L4), Some(4222));
    assert_eq!(max_luma_dimension(Level::L1), Some(543));
  }
}
