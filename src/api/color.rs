// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use num_derive::FromPrimitive;

use crate::serialize::{Deserialize, Serialize};

use std::fmt;

/// Chroma subsampling format.
///
/// The ordering follows `chroma_format_idc`, so formats compare by how
/// much chroma information they carry.
#[derive(
  Copy,
  Clone,
  Debug,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  FromPrimitive,
  Serialize,
  Deserialize,
)]
#[repr(C)]
pub enum ChromaFormat {
  /// Monochrome.
  Cf400,
  /// Both vertically and horizontally subsampled.
  Cf420,
  /// Horizontally subsampled.
  Cf422,
  /// Not subsampled.
  Cf444,
}

impl Default for ChromaFormat {
  fn default() -> Self {
    ChromaFormat::Cf420
  }
}

impl ChromaFormat {
  /// Maps the conventional IDC notation (400, 420, 422, 444) to a format.
  pub fn from_idc(idc: u32) -> Option<ChromaFormat> {
    use self::ChromaFormat::*;
    match idc {
      400 => Some(Cf400),
      420 => Some(Cf420),
      422 => Some(Cf422),
      444 => Some(Cf444),
      _ => None,
    }
  }

  /// The conventional IDC notation for this format.
  pub const fn idc(self) -> u32 {
    use self::ChromaFormat::*;
    match self {
      Cf400 => 400,
      Cf420 => 420,
      Cf422 => 422,
      Cf444 => 444,
    }
  }

  /// Horizontal unit of the conformance window and padding offsets.
  ///
  /// Window offsets and padding amounts must be multiples of this value.
  pub const fn win_unit_x(self) -> u32 {
    use self::ChromaFormat::*;
    match self {
      Cf420 | Cf422 => 2,
      Cf400 | Cf444 => 1,
    }
  }

  /// Vertical unit of the conformance window and padding offsets.
  pub const fn win_unit_y(self) -> u32 {
    use self::ChromaFormat::*;
    match self {
      Cf420 => 2,
      Cf400 | Cf422 | Cf444 => 1,
    }
  }

  /// Provides the amount to right shift the luma plane dimensions to get
  /// the chroma plane dimensions.
  /// Cf400 returns None, as there are no chroma planes.
  pub fn get_decimation(self) -> Option<(usize, usize)> {
    use self::ChromaFormat::*;
    match self {
      Cf420 => Some((1, 1)),
      Cf422 => Some((1, 0)),
      Cf444 => Some((0, 0)),
      Cf400 => None,
    }
  }
}

impl fmt::Display for ChromaFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    use self::ChromaFormat::*;
    match self {
      Cf400 => write!(f, "4:0:0"),
      Cf420 => write!(f, "4:2:0"),
      Cf422 => write!(f, "4:2:2"),
      Cf444 => write!(f, "4:4:4"),
    }
  }
}

/// Per-channel bit depths, in luma/chroma order.
///
/// A value of zero means "not set"; the normalization cascade resolves
/// every zero before validation runs.
#[derive(
  Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct BitDepths {
  /// Luma channel bit depth.
  pub luma: u32,
  /// Chroma channel bit depth.
  pub chroma: u32,
}

impl BitDepths {
  /// Creates a per-channel bit depth pair.
  pub const fn new(luma: u32, chroma: u32) -> Self {
    BitDepths { luma, chroma }
  }

  /// The larger of the two channel depths.
  pub fn max(self) -> u32 {
    self.luma.max(self.chroma)
  }
}

impl fmt::Display for BitDepths {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "(Y:{}, C:{})", self.luma, self.chroma)
  }
}

/// Chromaticity coordinates in CIE xy, in increments of 1/50000.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct Point {
  pub x: u16,
  pub y: u16,
}

/// Mastering display colour volume, as carried by the corresponding SEI
/// message.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteringDisplay {
  /// Chromaticity coordinates in Green, Blue, Red order, in increments
  /// of 1/50000.
  pub primaries: [Point; 3],
  /// White point chromaticity coordinates in increments of 1/50000.
  pub white_point: Point,
  /// Maximum luminance in units of 1/10000 candela per square metre.
  pub max_luminance: u32,
  /// Minimum luminance in units of 1/10000 candela per square metre.
  pub min_luminance: u32,
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn chroma_format_idc_round_trip() {
    for idc in [400, 420, 422, 444] {
      assert_eq!(ChromaFormat::from_idc(idc).unwrap().idc(), idc);
    }
    assert_eq!(ChromaFormat::from_idc(411), None);
  }

  #[test]
  fn window_units() {
    assert_eq!(ChromaFormat::Cf420.win_unit_x(), 2);
    assert_eq!(ChromaFormat::Cf420.win_unit_y(), 2);
    assert_eq!(ChromaFormat::Cf422.win_unit_x(), 2);
    assert_eq!(ChromaFormat::Cf422.win_unit_y(), 1);
    assert_eq!(ChromaFormat::Cf444.win_unit_x(), 1);
    assert_eq!(ChromaFormat::Cf400.win_unit_y(), 1);
  }

  #[test]
  fn chroma_format_ordering() {
    assert!(ChromaFormat::Cf400 < ChromaFormat::Cf420);
    assert!(ChromaFormat::Cf420 < ChromaFormat::Cf422);
    assert!(ChromaFormat::Cf422 < ChromaFormat::Cf444);
  }
}
