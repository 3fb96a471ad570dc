// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use arg_enum_proc_macro::ArgEnum;

use crate::api::color::ChromaFormat;
use crate::serialize::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Coded profile, as signalled by `general_profile_idc`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub enum Profile {
  /// No profile signalled. Produces a warning at validation time.
  None = 0,
  /// Main profile: 8-bit 4:2:0.
  Main = 1,
  /// Main 10 profile: up to 10-bit 4:2:0.
  Main10 = 2,
  /// Main Still Picture profile.
  MainStillPicture = 3,
  /// Range extensions profile family.
  MainRExt = 4,
  /// High-throughput range extensions profile (development placeholder).
  HighRExt = 5,
}

impl Default for Profile {
  fn default() -> Self {
    Profile::None
  }
}

impl Profile {
  const NAMES: [(&'static str, Profile); 6] = [
    ("none", Profile::None),
    ("main", Profile::Main),
    ("main10", Profile::Main10),
    ("main-still-picture", Profile::MainStillPicture),
    ("main-RExt", Profile::MainRExt),
    ("high-RExt", Profile::HighRExt),
  ];

  /// Whether this is one of the range extensions profile families.
  pub const fn is_rext(self) -> bool {
    matches!(self, Profile::MainRExt | Profile::HighRExt)
  }
}

impl fmt::Display for Profile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = Profile::NAMES
      .iter()
      .find(|&&(_, p)| p == *self)
      .map(|&(s, _)| s)
      .unwrap_or("none");
    write!(f, "{}", name)
  }
}

/// Tier to use for interpretation of the level limits.
#[derive(
  ArgEnum, Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize,
)]
#[repr(C)]
pub enum Tier {
  /// Main tier.
  Main,
  /// High tier.
  High,
}

impl Default for Tier {
  fn default() -> Self {
    Tier::Main
  }
}

/// Level limit, as signalled by `general_level_idc`.
///
/// Discriminants are the signalled idc values (level number times 30).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
#[allow(non_camel_case_types)]
pub enum Level {
  /// No level signalled. Produces a warning at validation time.
  None = 0,
  /// Level 1
  L1 = 30,
  /// Level 2
  L2 = 60,
  /// Level 2.1
  L2_1 = 63,
  /// Level 3
  L3 = 90,
  /// Level 3.1
  L3_1 = 93,
  /// Level 4
  L4 = 120,
  /// Level 4.1
  L4_1 = 123,
  /// Level 5
  L5 = 150,
  /// Level 5.1
  L5_1 = 153,
  /// Level 5.2
  L5_2 = 156,
  /// Level 6
  L6 = 180,
  /// Level 6.1
  L6_1 = 183,
  /// Level 6.2
  L6_2 = 186,
  /// Level 8.5, the unconstrained still-picture level.
  L8_5 = 255,
}

impl Default for Level {
  fn default() -> Self {
    Level::None
  }
}

impl Level {
  const NAMES: [(&'static str, Level); 15] = [
    ("none", Level::None),
    ("1", Level::L1),
    ("2", Level::L2),
    ("2.1", Level::L2_1),
    ("3", Level::L3),
    ("3.1", Level::L3_1),
    ("4", Level::L4),
    ("4.1", Level::L4_1),
    ("5", Level::L5),
    ("5.1", Level::L5_1),
    ("5.2", Level::L5_2),
    ("6", Level::L6),
    ("6.1", Level::L6_1),
    ("6.2", Level::L6_2),
    ("8.5", Level::L8_5),
  ];
}

impl FromStr for Level {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Level::NAMES
      .iter()
      .find(|&&(name, _)| name == s)
      .map(|&(_, l)| l)
      .ok_or(())
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = Level::NAMES
      .iter()
      .find(|&&(_, l)| l == *self)
      .map(|&(s, _)| s)
      .unwrap_or("none");
    write!(f, "{}", name)
  }
}

/// A profile name as given on the command line: either one of the base
/// profiles, or an RExt sub-profile shorthand that decomposes into a
/// constraint flag triple.
///
/// Sub-profile codes lie in the 1000..=2316 range and encode the
/// constraints by digit position: the bottom two digits carry the
/// bit-depth constraint, the hundreds digit the chroma format
/// constraint, and values of 2000 and above set the intra constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtendedProfile {
  /// One of the base profiles.
  Base(Profile),
  /// An RExt sub-profile shorthand code.
  SubProfile(u16),
}

impl Default for ExtendedProfile {
  fn default() -> Self {
    ExtendedProfile::Base(Profile::None)
  }
}

/// The constraint triple an RExt sub-profile shorthand decomposes into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RExtConstraints {
  /// Value of `general_intra_constraint_flag`.
  pub intra_constraint: bool,
  /// Bit-depth constraint.
  pub bit_depth: u32,
  /// Chroma format constraint.
  pub chroma_format: ChromaFormat,
}

const EXTENDED_PROFILE_NAMES: [(&str, ExtendedProfile); 24] = [
  ("none", ExtendedProfile::Base(Profile::None)),
  ("main", ExtendedProfile::Base(Profile::Main)),
  ("main10", ExtendedProfile::Base(Profile::Main10)),
  ("main-still-picture", ExtendedProfile::Base(Profile::MainStillPicture)),
  ("main-RExt", ExtendedProfile::Base(Profile::MainRExt)),
  ("high-RExt", ExtendedProfile::Base(Profile::HighRExt)),
  ("monochrome12", ExtendedProfile::SubProfile(1012)),
  ("monochrome16", ExtendedProfile::SubProfile(1016)),
  ("main12", ExtendedProfile::SubProfile(1112)),
  ("main_422_10", ExtendedProfile::SubProfile(1210)),
  ("main_422_12", ExtendedProfile::SubProfile(1212)),
  ("main_444", ExtendedProfile::SubProfile(1308)),
  ("main_444_10", ExtendedProfile::SubProfile(1310)),
  ("main_444_12", ExtendedProfile::SubProfile(1312)),
  ("main_444_16", ExtendedProfile::SubProfile(1316)),
  ("main_intra", ExtendedProfile::SubProfile(2108)),
  ("main_10_intra", ExtendedProfile::SubProfile(2110)),
  ("main_12_intra", ExtendedProfile::SubProfile(2112)),
  ("main_422_10_intra", ExtendedProfile::SubProfile(2210)),
  ("main_422_12_intra", ExtendedProfile::SubProfile(2212)),
  ("main_444_intra", ExtendedProfile::SubProfile(2308)),
  ("main_444_10_intra", ExtendedProfile::SubProfile(2310)),
  ("main_444_12_intra", ExtendedProfile::SubProfile(2312)),
  ("main_444_16_intra", ExtendedProfile::SubProfile(2316)),
];

impl FromStr for ExtendedProfile {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    EXTENDED_PROFILE_NAMES
      .iter()
      .find(|&&(name, _)| name == s)
      .map(|&(_, p)| p)
      .ok_or(())
  }
}

impl fmt::Display for ExtendedProfile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match EXTENDED_PROFILE_NAMES.iter().find(|&&(_, p)| p == *self) {
      Some(&(name, _)) => write!(f, "{}", name),
      None => match self {
        ExtendedProfile::Base(p) => write!(f, "{}", p),
        ExtendedProfile::SubProfile(code) => write!(f, "{}", code),
      },
    }
  }
}

impl ExtendedProfile {
  /// Decomposes an RExt sub-profile shorthand into its constraint
  /// triple. Returns `None` for base profiles.
  pub fn decompose(self) -> Option<RExtConstraints> {
    match self {
      ExtendedProfile::Base(_) => None,
      ExtendedProfile::SubProfile(code) => {
        let chroma_format = match (code / 100) % 10 {
          0 => ChromaFormat::Cf400,
          1 => ChromaFormat::Cf420,
          2 => ChromaFormat::Cf422,
          _ => ChromaFormat::Cf444,
        };
        Some(RExtConstraints {
          intra_constraint: code >= 2000,
          bit_depth: u32::from(code % 100),
          chroma_format,
        })
      }
    }
  }
}

/// Legal (intra constraint, bit depth constraint, chroma format
/// constraint) combinations for the Main RExt profile, as sub-profile
/// names. Indexed by `[intra][bit depth 8/10/12/16][chroma format]`.
/// `main_444_16` is a non-standard combination kept for development.
#[rustfmt::skip]
static VALID_REXT_PROFILES: [[[Option<&str>; 4]; 4]; 2] = [
  [
    // 8-bit inter for 4:0:0, 4:2:0, 4:2:2 and 4:4:4
    [None, None, None, Some("main_444")],
    // 10-bit inter
    [None, None, Some("main_422_10"), Some("main_444_10")],
    // 12-bit inter
    [Some("monochrome12"), Some("main12"), Some("main_422_12"), Some("main_444_12")],
    // 16-bit inter
    [Some("monochrome16"), None, None, Some("main_444_16")],
  ],
  [
    // 8-bit intra
    [None, Some("main_intra"), None, Some("main_444_intra")],
    // 10-bit intra
    [None, Some("main_10_intra"), Some("main_422_10_intra"), Some("main_444_10_intra")],
    // 12-bit intra
    [None, Some("main_12_intra"), Some("main_422_12_intra"), Some("main_444_12_intra")],
    // 16-bit intra
    [None, None, None, Some("main_444_16_intra")],
  ],
];

/// Looks up the sub-profile name of a constraint triple, or `None` when
/// the combination is not a defined RExt profile.
pub fn rext_sub_profile_name(
  intra_constraint: bool, bit_depth: u32, chroma_format: ChromaFormat,
) -> Option<&'static str> {
  let bit_depth_idx = match bit_depth {
    8 => 0,
    10 => 1,
    12 => 2,
    16 => 3,
    _ => return None,
  };
  VALID_REXT_PROFILES[usize::from(intra_constraint)][bit_depth_idx]
    [chroma_format as usize]
}

/// Tool usage that feeds the automatic RExt constraint selection.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct RExtToolUsage {
  /// Any of the general RExt tools is in use.
  pub general_tools: bool,
  /// CU chroma QP adjustment is in use.
  pub chroma_qp_adjustment: bool,
  /// Extended precision processing is in use.
  pub extended_precision: bool,
}

/// Rounds a trial bit depth up to the nearest depth a profile is
/// defined for: below 8 up to 8, 9 to 10, 11 to 12, above 12 to 16.
pub(crate) fn round_trial_bit_depth(bit_depth: u32) -> u32 {
  if bit_depth < 8 {
    8
  } else if bit_depth == 9 || bit_depth == 11 {
    bit_depth + 1
  } else if bit_depth > 12 {
    16
  } else {
    bit_depth
  }
}

/// Chooses the tightest legal (bit depth, chroma format) constraint pair
/// when neither was specified for an RExt profile.
pub(crate) fn select_rext_constraints(
  tools: RExtToolUsage, intra_constraint: bool, max_bit_depth: u32,
  chroma_format: ChromaFormat,
) -> (u32, ChromaFormat) {
  let trial_bit_depth = round_trial_bit_depth(max_bit_depth);

  if tools.extended_precision || trial_bit_depth == 16 {
    let chroma = if !intra_constraint && chroma_format == ChromaFormat::Cf400 {
      ChromaFormat::Cf400
    } else {
      ChromaFormat::Cf444
    };
    (16, chroma)
  } else if tools.general_tools {
    if chroma_format == ChromaFormat::Cf400 && !intra_constraint {
      (16, ChromaFormat::Cf400)
    } else {
      (trial_bit_depth, ChromaFormat::Cf444)
    }
  } else if chroma_format == ChromaFormat::Cf400 {
    if intra_constraint {
      // there is no intra 4:0:0 profile
      (trial_bit_depth, ChromaFormat::Cf420)
    } else {
      (12, ChromaFormat::Cf400)
    }
  } else {
    let mut bit_depth = trial_bit_depth;
    let mut chroma = chroma_format;
    if tools.chroma_qp_adjustment && chroma == ChromaFormat::Cf420 {
      // 4:2:0 cannot use the chroma QP tool
      chroma = ChromaFormat::Cf422;
    }
    if chroma == ChromaFormat::Cf422 && bit_depth == 8 {
      // there is no 8-bit 4:2:2 profile
      bit_depth = 10;
    }
    if chroma == ChromaFormat::Cf420 && !intra_constraint {
      // there is no 8 or 10-bit 4:2:0 inter RExt profile
      bit_depth = 12;
    }
    (bit_depth, chroma)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use interpolate_name::interpolate_test;

  #[test]
  fn profile_names_parse() {
    assert_eq!(
      "main-RExt".parse(),
      Ok(ExtendedProfile::Base(Profile::MainRExt))
    );
    assert_eq!(
      "main_422_10_intra".parse(),
      Ok(ExtendedProfile::SubProfile(2210))
    );
    assert!("main_13".parse::<ExtendedProfile>().is_err());
  }

  #[test]
  fn level_names_parse() {
    assert_eq!("5.1".parse(), Ok(Level::L5_1));
    assert_eq!("8.5".parse(), Ok(Level::L8_5));
    assert!("7".parse::<Level>().is_err());
  }

  #[interpolate_test(monochrome12, 1012, false, 12, ChromaFormat::Cf400)]
  #[interpolate_test(main12, 1112, false, 12, ChromaFormat::Cf420)]
  #[interpolate_test(main_422_10, 1210, false, 10, ChromaFormat::Cf422)]
  #[interpolate_test(main_444, 1308, false, 8, ChromaFormat::Cf444)]
  #[interpolate_test(main_444_10_intra, 2310, true, 10, ChromaFormat::Cf444)]
  #[interpolate_test(main_444_16_intra, 2316, true, 16, ChromaFormat::Cf444)]
  fn decomposition(
    code: u16, intra: bool, bit_depth: u32, chroma: ChromaFormat,
  ) {
    let c = ExtendedProfile::SubProfile(code).decompose().unwrap();
    assert_eq!(c.intra_constraint, intra);
    assert_eq!(c.bit_depth, bit_depth);
    assert_eq!(c.chroma_format, chroma);
  }

  #[test]
  fn decomposition_is_total_over_named_codes() {
    for &(name, profile) in EXTENDED_PROFILE_NAMES.iter() {
      if let ExtendedProfile::SubProfile(code) = profile {
        let c = profile.decompose().unwrap();
        // Every named shorthand decomposes to a defined profile, whose
        // name round-trips.
        assert_eq!(
          rext_sub_profile_name(
            c.intra_constraint,
            c.bit_depth,
            c.chroma_format
          ),
          Some(name),
          "code {}",
          code
        );
      }
    }
  }

  #[test]
  fn trial_bit_depth_rounding() {
    assert_eq!(round_trial_bit_depth(7), 8);
    assert_eq!(round_trial_bit_depth(8), 8);
    assert_eq!(round_trial_bit_depth(9), 10);
    assert_eq!(round_trial_bit_depth(10), 10);
    assert_eq!(round_trial_bit_depth(11), 12);
    assert_eq!(round_trial_bit_depth(12), 12);
    assert_eq!(round_trial_bit_depth(13), 16);
    assert_eq!(round_trial_bit_depth(14), 16);
  }

  #[test]
  fn auto_select_extended_precision_forces_16_bit() {
    let tools = RExtToolUsage { extended_precision: true, ..Default::default() };
    let (bd, cf) = select_rext_constraints(tools, false, 10, ChromaFormat::Cf420);
    assert_eq!((bd, cf), (16, ChromaFormat::Cf444));
    // inter monochrome stays 4:0:0
    let (bd, cf) = select_rext_constraints(tools, false, 10, ChromaFormat::Cf400);
    assert_eq!((bd, cf), (16, ChromaFormat::Cf400));
  }

  #[test]
  fn auto_select_general_tools_force_444() {
    let tools = RExtToolUsage { general_tools: true, ..Default::default() };
    let (bd, cf) = select_rext_constraints(tools, false, 10, ChromaFormat::Cf420);
    assert_eq!((bd, cf), (10, ChromaFormat::Cf444));
    // inter monochrome maps to 16-bit 4:0:0
    let (bd, cf) = select_rext_constraints(tools, false, 10, ChromaFormat::Cf400);
    assert_eq!((bd, cf), (16, ChromaFormat::Cf400));
  }

  #[test]
  fn auto_select_monochrome() {
    let tools = RExtToolUsage::default();
    // no intra 4:0:0 profile exists
    let (bd, cf) = select_rext_constraints(tools, true, 10, ChromaFormat::Cf400);
    assert_eq!((bd, cf), (10, ChromaFormat::Cf420));
    let (bd, cf) = select_rext_constraints(tools, false, 10, ChromaFormat::Cf400);
    assert_eq!((bd, cf), (12, ChromaFormat::Cf400));
  }

  #[test]
  fn auto_select_forced_bumps() {
    let tools =
      RExtToolUsage { chroma_qp_adjustment: true, ..Default::default() };
    // the chroma QP tool bumps 4:2:0 to 4:2:2
    let (bd, cf) = select_rext_constraints(tools, true, 10, ChromaFormat::Cf420);
    assert_eq!((bd, cf), (10, ChromaFormat::Cf422));
    // no 8-bit 4:2:2 profile
    let (bd, cf) = select_rext_constraints(tools, true, 8, ChromaFormat::Cf420);
    assert_eq!((bd, cf), (10, ChromaFormat::Cf422));
    // no 8 or 10-bit 4:2:0 inter RExt profile
    let tools = RExtToolUsage::default();
    let (bd, cf) = select_rext_constraints(tools, false, 8, ChromaFormat::Cf420);
    assert_eq!((bd, cf), (12, ChromaFormat::Cf420));
  }

  #[test]
  fn rext_profile_table() {
    assert!(rext_sub_profile_name(false, 8, ChromaFormat::Cf420).is_none());
    assert!(rext_sub_profile_name(false, 10, ChromaFormat::Cf422).is_some());
    assert!(rext_sub_profile_name(true, 16, ChromaFormat::Cf400).is_none());
    assert_eq!(
      rext_sub_profile_name(false, 16, ChromaFormat::Cf444),
      Some("main_444_16")
    );
  }
}
