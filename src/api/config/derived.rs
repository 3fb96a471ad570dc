// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use crate::api::color::{BitDepths, ChromaFormat};
use crate::api::config::EncoderConfig;
use crate::serialize::{Deserialize, Serialize};

/// Extra partition depth needed for non-4:2:0 sub-TU partitioning when
/// the minimum TU is larger than 4x4.
fn max_cu_depth_offset(
  chroma_format: ChromaFormat, tu_log2_min_size: u32,
) -> u32 {
  if chroma_format == ChromaFormat::Cf422 && tu_log2_min_size > 2 {
    1
  } else {
    0
  }
}

/// Constants derived from a validated configuration, read by every
/// downstream pipeline stage for the duration of the encode run.
///
/// Published exactly once per run and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedConstants {
  /// Effective maximum CU depth: the configured depth plus as many
  /// extra levels as needed for the minimum transform size to divide
  /// the minimum CU size, plus the non-4:2:0 sub-partitioning offset.
  pub max_cu_depth: u32,
  /// Number of partitioning levels added beyond the configured depth,
  /// plus one.
  pub add_cu_depth: u32,
  /// Working bit depth per channel.
  pub bit_depth: BitDepths,
  /// PCM sample bit depth per channel: the MSB-extended depth when PCM
  /// codes input samples, the internal depth otherwise.
  pub pcm_bit_depth: BitDepths,
  /// Transform coefficient dynamic range per channel, in bits.
  pub max_tr_dynamic_range: BitDepths,
}

impl DerivedConstants {
  pub(crate) fn new(cfg: &EncoderConfig) -> Self {
    let mut add_depth = 0;
    while (cfg.max_cu_width >> cfg.max_cu_depth)
      > (1 << (cfg.tu_log2_min_size + add_depth))
    {
      add_depth += 1;
    }
    add_depth +=
      max_cu_depth_offset(cfg.chroma_format, cfg.tu_log2_min_size);

    let dynamic_range = |bit_depth: u32| {
      if cfg.extended_precision {
        15.max(bit_depth + 6)
      } else {
        15
      }
    };
    let pcm_depth = if cfg.pcm_input_bit_depth {
      cfg.msb_extended_bit_depth
    } else {
      cfg.internal_bit_depth
    };

    DerivedConstants {
      max_cu_depth: cfg.max_cu_depth + add_depth,
      add_cu_depth: add_depth + 1,
      bit_depth: cfg.internal_bit_depth,
      pcm_bit_depth: pcm_depth,
      max_tr_dynamic_range: BitDepths::new(
        dynamic_range(cfg.internal_bit_depth.luma),
        dynamic_range(cfg.internal_bit_depth.chroma),
      ),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn no_extra_depth_when_min_tu_matches_min_cu() {
    // 64 >> 4 = 4 == 1 << 2: the minimum TU already divides the
    // minimum CU.
    let cfg = EncoderConfig::default();
    let constants = DerivedConstants::new(&cfg);
    assert_eq!(constants.max_cu_depth, 4);
    assert_eq!(constants.add_cu_depth, 1);
  }

  #[test]
  fn extra_depth_covers_the_min_tu_gap() {
    let mut cfg = EncoderConfig::default();
    cfg.max_cu_depth = 3; // min CU 8, min TU 4
    let constants = DerivedConstants::new(&cfg);
    assert_eq!(constants.max_cu_depth, 4);
    assert_eq!(constants.add_cu_depth, 2);
  }

  #[test]
  fn chroma_422_with_large_min_tu_adds_a_level() {
    let mut cfg = EncoderConfig::default();
    cfg.chroma_format = ChromaFormat::Cf422;
    cfg.tu_log2_min_size = 3;
    cfg.max_cu_depth = 3; // min CU 8 == 1 << 3
    let constants = DerivedConstants::new(&cfg);
    assert_eq!(constants.max_cu_depth, 4);
  }

  #[test]
  fn pcm_bit_depth_follows_the_input_flag() {
    let mut cfg = EncoderConfig::default();
    cfg.msb_extended_bit_depth = BitDepths::new(10, 10);
    cfg.internal_bit_depth = BitDepths::new(12, 12);
    cfg.pcm_input_bit_depth = true;
    assert_eq!(
      DerivedConstants::new(&cfg).pcm_bit_depth,
      BitDepths::new(10, 10)
    );
    cfg.pcm_input_bit_depth = false;
    assert_eq!(
      DerivedConstants::new(&cfg).pcm_bit_depth,
      BitDepths::new(12, 12)
    );
  }

  #[test]
  fn dynamic_range_is_15_unless_extended_precision() {
    let mut cfg = EncoderConfig::default();
    cfg.internal_bit_depth = BitDepths::new(12, 10);
    assert_eq!(
      DerivedConstants::new(&cfg).max_tr_dynamic_range,
      BitDepths::new(15, 15)
    );
    cfg.extended_precision = true;
    assert_eq!(
      DerivedConstants::new(&cfg).max_tr_dynamic_range,
      BitDepths::new(18, 16)
    );
  }
}
