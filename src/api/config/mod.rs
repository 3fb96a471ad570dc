// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use itertools::Itertools;
use log::warn;
use thiserror::Error;

use crate::api::color::ChromaFormat;
use crate::api::context::Context;
use crate::levels;

mod derived;
pub use derived::*;

mod encoder;
pub use encoder::*;

pub(crate) mod gop;
pub use gop::*;

mod list;
pub use list::*;

mod profile;
pub use profile::*;

mod rate;
pub use rate::*;

/// Enumeration of possible invalid configuration diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum InvalidConfig {
  /// Explicit constraints combined with an RExt sub-profile shorthand.
  #[error(
    "the bit depth and chroma format constraints are not used when an \
     explicit RExt profile is specified"
  )]
  MutuallyExclusiveConstraints,
  /// Only one of the two RExt constraints was given.
  #[error(
    "the bit depth and chroma format constraints must either both be \
     specified or both be configured automatically"
  )]
  PartiallySpecifiedConstraints,
  /// Automatic padding produced a pad the chroma format cannot express.
  #[error(
    "padded picture width is not an integer multiple of the specified \
     chroma subsampling (pad {pad}, unit {unit})"
  )]
  PaddedWidthNotChromaAligned { pad: u32, unit: u32 },
  /// Automatic padding produced a pad the chroma format cannot express.
  #[error(
    "padded picture height is not an integer multiple of the specified \
     chroma subsampling (pad {pad}, unit {unit})"
  )]
  PaddedHeightNotChromaAligned { pad: u32, unit: u32 },
  /// The CU partitioning depth cannot be used to derive unit sizes.
  #[error("invalid max partition depth {0} (expected >= 1, <= 6)")]
  InvalidMaxCuDepth(u32),
  /// Fewer GOP template entries than the GOP size requires.
  #[error("found fewer reference picture sets ({templates}) than GOP size ({gop_size})")]
  FewerRpsThanGopSize { templates: usize, gop_size: usize },
  /// A template reference is never available in any period.
  #[error("reference picture {delta_poc} is not available for GOP frame {frame}")]
  UnavailableReference { delta_poc: i32, frame: usize },
  /// RPS synthesis exceeded the GOP list capacity.
  #[error("too many synthesized reference picture sets")]
  RpsListFull,
  /// A GOP entry uses a temporal layer beyond the supported maximum.
  #[error("temporal id {actual} exceeds the maximum of {max}")]
  TemporalIdOutOfRange { actual: u32, max: u32 },

  /// The internal bit depth exceeds the profile constraint.
  #[error(
    "the internal bit depth {actual} must not be greater than the bit \
     depth constraint {max}"
  )]
  InternalBitDepthExceedsConstraint { actual: u32, max: u32 },
  /// The chroma format exceeds the profile constraint.
  #[error(
    "the chroma format {actual} must not be greater than the chroma \
     format constraint {max}"
  )]
  ChromaFormatExceedsConstraint { actual: ChromaFormat, max: ChromaFormat },
  /// Inter coding requires the lower bit rate constraint.
  #[error(
    "the lower bit rate constraint flag cannot be false when the intra \
     constraint flag is false"
  )]
  LowerBitRateConstraintRequired,
  /// CABAC alignment is a high-throughput-profile tool.
  #[error(
    "CABAC bypass alignment must not be enabled unless the high \
     bit rate profile is used"
  )]
  CabacAlignmentOutsideHighRExt,
  /// The constraint triple does not name a defined RExt profile.
  #[error(
    "invalid intra constraint ({intra}), bit depth constraint \
     ({bit_depth}) and chroma format constraint ({chroma_format}) \
     combination for an RExt profile"
  )]
  InvalidRExtProfileCombination {
    intra: bool,
    bit_depth: u32,
    chroma_format: ChromaFormat,
  },
  /// Chroma QP adjustment is not available under this constraint.
  #[error(
    "CU chroma QP adjustment cannot be used for 4:0:0 or 4:2:0 RExt \
     profiles (constraint {0})"
  )]
  ChromaQpAdjustmentConstraint(ChromaFormat),
  /// Extended precision requires the 16-bit constraint.
  #[error("extended precision can only be used in 16-bit RExt profiles")]
  ExtendedPrecisionRequires16Bit,
  /// General RExt tools used under a constraint that forbids them.
  #[error(
    "combination of tools and profiles are not possible in the \
     specified RExt profile"
  )]
  RExtToolsOutsideValidProfiles,
  /// A fixed bit depth constraint is mandated outside RExt.
  #[error("the bit depth constraint must be {expected} for this profile")]
  BitDepthConstraintForV1Profile { expected: u32 },
  /// A fixed chroma format constraint is mandated outside RExt.
  #[error("the chroma format constraint must be 4:2:0 for non-RExt profiles")]
  ChromaConstraintForV1Profile,
  /// The intra constraint flag is an RExt signalling field.
  #[error("the intra constraint flag must be false for non-RExt profiles")]
  IntraConstraintForV1Profile,
  /// The lower bit rate constraint is fixed outside RExt.
  #[error("the lower bit rate constraint flag must be true for non-RExt profiles")]
  LowerBitRateConstraintForV1Profile,
  /// A range-extensions tool enabled under a V1 profile.
  #[error("{0} must not be used for non-RExt profiles")]
  ToolForbiddenInV1Profile(&'static str),
  /// Intra reference smoothing cannot be turned off outside RExt.
  #[error("intra reference smoothing must be enabled for non-RExt profiles")]
  IntraSmoothingRequiredInV1Profile,

  /// Input bit depths start at 8.
  #[error("input bit depth for {channel} must be at least 8 (is {actual})")]
  InputBitDepthTooLow { channel: &'static str, actual: u32 },
  /// MSB extension can only add bits.
  #[error(
    "MSB-extended bit depth for {channel} must be greater than or \
     equal to the input bit depth"
  )]
  MsbExtendedBelowInput { channel: &'static str },
  /// SAO offset shifts are bounded by the internal bit depth.
  #[error(
    "SAO {channel} offset bit shift {actual} must be in the range of 0 \
     to {max}, inclusive"
  )]
  SaoOffsetBitShiftOutOfRange { channel: &'static str, actual: i32, max: i32 },
  /// The frame rate must be positive.
  #[error("frame rate must be more than 0")]
  InvalidFrameRate,
  /// The number of frames to encode must be positive.
  #[error("total number of frames to be encoded must be more than 0")]
  InvalidFramesToEncode,
  /// GOP size starts at 1.
  #[error("GOP size {0} must be greater than or equal to 1")]
  InvalidGopSize(usize),
  /// GOP sizes above 1 must be even.
  #[error("GOP size {0} must be a multiple of 2")]
  OddGopSize(usize),
  /// Intra period is -1, or at least the GOP size.
  #[error(
    "intra period {intra_period} must be more than GOP size {gop_size}, \
     or -1, not 0"
  )]
  InvalidIntraPeriod { intra_period: i32, gop_size: usize },
  /// Intra period must cover whole GOPs.
  #[error("intra period {intra_period} must be a multiple of GOP size {gop_size}, or -1")]
  IntraPeriodNotMultipleOfGop { intra_period: i32, gop_size: usize },
  /// Decoding refresh types are 0 to 3.
  #[error("decoding refresh type {0} must be between 0 and 3, inclusive")]
  InvalidDecodingRefreshType(u32),
  /// Refresh type 3 signals random access via recovery point SEI.
  #[error(
    "when using recovery point SEI messages as random access points, \
     the recovery point SEI must be enabled"
  )]
  RecoveryPointSeiRequired,
  /// Periodic IDR needs an intra period beyond a single GOP.
  #[error("intra period must be larger than GOP size for periodic IDR pictures")]
  IdrPeriodTooSmall,
  /// QP is bounded by the luma bit depth offset below and 51 above.
  #[error("QP {actual} exceeds supported range ({min} to 51)")]
  QpOutOfRange { actual: i32, min: i32 },
  /// Deblocking beta offsets span -6 to 6.
  #[error("loop filter beta offset div. 2 {0} exceeds supported range (-6 to 6)")]
  LoopFilterBetaOffsetOutOfRange(i32),
  /// Deblocking tc offsets span -6 to 6.
  #[error("loop filter tc offset div. 2 {0} exceeds supported range (-6 to 6)")]
  LoopFilterTcOffsetOutOfRange(i32),
  /// A per-entry beta offset leaves the legal range.
  #[error(
    "loop filter beta offset div. 2 for GOP frame {frame} exceeds \
     supported range (-6 to 6)"
  )]
  GopBetaOffsetOutOfRange { frame: usize },
  /// A per-entry tc offset leaves the legal range.
  #[error(
    "loop filter tc offset div. 2 for GOP frame {frame} exceeds \
     supported range (-6 to 6)"
  )]
  GopTcOffsetOutOfRange { frame: usize },
  /// Motion search modes are 0 to 2.
  #[error("fast search mode {0} is not supported (0: full, 1: diamond, 2: PMVFAST)")]
  InvalidFastSearchMode(u32),
  /// The motion search range cannot be negative.
  #[error("search range must be more than 0")]
  InvalidSearchRange,
  /// The bipred refinement range cannot be negative.
  #[error("bipred search range must be more than 0")]
  InvalidBipredSearchRange,
  /// Block dQP offsets are bounded.
  #[error("absolute delta QP {0} exceeds supported range (0 to 7)")]
  MaxDeltaQpOutOfRange(u32),
  /// The dQP signalling depth is bounded by the CU depth.
  #[error("absolute depth for a minimum CU dQP {actual} exceeds maximum coding unit depth")]
  DqpDepthExceedsCuDepth { actual: u32 },
  /// Chroma Cb QP offsets span -12 to 12.
  #[error("chroma Cb QP offset {0} must be in the range of -12 to 12, inclusive")]
  CbQpOffsetOutOfRange(i32),
  /// Chroma Cr QP offsets span -12 to 12.
  #[error("chroma Cr QP offset {0} must be in the range of -12 to 12, inclusive")]
  CrQpOffsetOutOfRange(i32),
  /// The QP adaptation range must be positive.
  #[error("QP adaptation range must be more than 0")]
  InvalidQpAdaptationRange,
  /// Adaptive QP selection needs a non-negative QP.
  #[error("adaptive QP selection must be disabled when QP is less than 0")]
  AdaptiveQpSelectWithNegativeQp,
  /// Adaptive QP selection conflicts with chroma QP offsets.
  #[error("adaptive QP selection must be disabled when the chroma QP offset is not 0")]
  AdaptiveQpSelectWithChromaOffset,

  /// CU widths are powers of two.
  #[error("maximum CU width {0} should be a power of 2")]
  CuWidthNotPowerOfTwo(u32),
  /// CU heights are powers of two.
  #[error("maximum CU height {0} should be a power of 2")]
  CuHeightNotPowerOfTwo(u32),
  /// The CU size must be at least 16.
  #[error("maximum partition {dimension} size {actual} should be larger than or equal to 16")]
  MaxCuSizeTooSmall { dimension: &'static str, actual: u32 },
  /// The minimum partition size must be at least 4.
  #[error("minimum partition {dimension} size should be larger than or equal to 4")]
  MinPartitionTooSmall { dimension: &'static str },
  /// Picture dimensions are coded in whole minimum CUs.
  #[error(
    "resulting coded frame width {width} must be a multiple of the \
     minimum CU size {min_cu}"
  )]
  WidthNotMultipleOfMinCu { width: usize, min_cu: u32 },
  /// Picture dimensions are coded in whole minimum CUs.
  #[error(
    "resulting coded frame height {height} must be a multiple of the \
     minimum CU size {min_cu}"
  )]
  HeightNotMultipleOfMinCu { height: usize, min_cu: u32 },
  /// Picture widths follow the chroma subsampling unit.
  #[error("picture width {width} must be an integer multiple of the specified chroma subsampling")]
  WidthNotChromaAligned { width: usize },
  /// Picture heights follow the chroma subsampling unit.
  #[error("picture height {height} must be an integer multiple of the specified chroma subsampling")]
  HeightNotChromaAligned { height: usize },
  /// Padding follows the chroma subsampling unit.
  #[error("{direction} padding {pad} must be an integer multiple of the specified chroma subsampling")]
  PaddingNotChromaAligned { direction: &'static str, pad: u32 },
  /// Conformance window offsets follow the chroma subsampling unit.
  #[error(
    "{edge} conformance window offset {offset} must be an integer \
     multiple of the specified chroma subsampling"
  )]
  ConformanceOffsetNotChromaAligned { edge: &'static str, offset: u32 },
  /// Minimum TU sizes start at 4x4.
  #[error("minimum TU size in log2 must be 2 or greater (is {0})")]
  TuLog2MinTooSmall(u32),
  /// Maximum TU sizes end at 32x32.
  #[error("maximum TU size in log2 must be 5 or smaller (is {0})")]
  TuLog2MaxTooLarge(u32),
  /// TU size bounds must be ordered.
  #[error("maximum TU size in log2 ({max}) must be greater than or equal to the minimum ({min})")]
  TuMaxLessThanMin { max: u32, min: u32 },
  /// The maximum TU fits in the CU.
  #[error("maximum TU size in log2 must be log2 of the maximum CU size or smaller")]
  TuMaxExceedsCu,
  /// The minimum TU fits in the minimum partition.
  #[error("minimum TU size must not be greater than the minimum CU size")]
  TuMinExceedsMinCu,
  /// The smallest CU still holds a transform.
  #[error("minimum CU size must be greater than the minimum transform size")]
  TuMinExceedsMinPartition,
  /// The inter TU tree depth starts at 1 and fits the CU.
  #[error("TU tree depth for inter CUs must be at least 1 and fit within the CU size")]
  InvalidTuDepthInter(u32),
  /// The intra TU tree depth starts at 1 and fits the CU.
  #[error("TU tree depth for intra CUs must be at least 1 and fit within the CU size")]
  InvalidTuDepthIntra(u32),
  /// Merge candidate counts span 1 to 5.
  #[error("maximum number of merge candidates {0} must be between 1 and 5, inclusive")]
  InvalidMaxNumMergeCand(u32),

  /// PCM cannot code samples wider than the internal depth.
  #[error(
    "PCM bit depth for {channel} cannot be greater than the internal \
     bit depth when PCM codes input samples"
  )]
  PcmBitDepthExceedsInternal { channel: &'static str },
  /// Minimum PCM block sizes span log2 3 to 5.
  #[error("minimum PCM size in log2 ({0}) must be between 3 and 5, inclusive")]
  PcmLog2MinOutOfRange(u32),
  /// Maximum PCM block sizes end at log2 5.
  #[error("maximum PCM size in log2 ({0}) must be 5 or smaller")]
  PcmLog2MaxTooLarge(u32),
  /// PCM block size bounds must be ordered.
  #[error("maximum PCM size must be equal to or greater than the minimum PCM size")]
  PcmMaxLessThanMin,
  /// The transform skip size starts at 4x4.
  #[error("maximum transform skip size in log2 must be at least 2 (is {0})")]
  TransformSkipSizeTooSmall(u32),

  /// Slice modes are 0 to 3.
  #[error("slice mode {0} exceeds supported range (0 to 3)")]
  InvalidSliceMode(u32),
  /// Enabled slice modes need a positive argument.
  #[error("slice argument should be larger than or equal to 1")]
  InvalidSliceArgument,
  /// Slice segment modes are 0 to 3.
  #[error("slice segment mode {0} exceeds supported range (0 to 3)")]
  InvalidSliceSegmentMode(u32),
  /// Enabled slice segment modes need a positive argument.
  #[error("slice segment argument should be larger than or equal to 1")]
  InvalidSliceSegmentArgument,
  /// Tiles and wavefront synchronization are mutually exclusive.
  #[error("tiles and wavefront synchronization can not be applied together")]
  TilesWithWavefront,
  /// Explicit tile columns need exactly one width per boundary.
  #[error("expected {expected} tile column widths, found {found}")]
  TileColumnCountMismatch { expected: usize, found: usize },
  /// Explicit tile rows need exactly one height per boundary.
  #[error("expected {expected} tile row heights, found {found}")]
  TileRowCountMismatch { expected: usize, found: usize },
  /// Wavefront synchronization cannot be negative.
  #[error("wavefront synchronization cannot be negative")]
  NegativeWavefront(i32),
  /// The parallel merge estimation region starts at log2 2.
  #[error("log2 parallel merge level should be larger than or equal to 2")]
  ParallelMergeLevelTooSmall(u32),
  /// Forcing transquant bypass requires enabling it first.
  #[error(
    "forcing transquant bypass requires the transquant bypass enable \
     flag to be set"
  )]
  TransquantBypassForceWithoutEnable,
  /// Rate control and slice-level multi-QP optimization conflict.
  #[error("rate control cannot be used together with slice-level multiple QP optimization")]
  RateControlWithDeltaQpRd,

  /// Tone mapping coded data depths span 8 to 14.
  #[error("tone mapping coded data bit depth {0} must be in the range 8 to 14")]
  ToneMapCodedBitDepthOutOfRange(u32),
  /// Tone mapping target depths span 1 to 16, or 255.
  #[error("tone mapping target bit depth {0} must be in the range 1 to 16, or equal to 255")]
  ToneMapTargetBitDepthOutOfRange(u32),
  /// The camera ISO speed is nonzero.
  #[error("tone mapping camera ISO speed shall not be equal to 0")]
  ZeroCameraIsoSpeed,
  /// The exposure index is nonzero.
  #[error("tone mapping exposure index shall not be equal to 0")]
  ZeroExposureIndex,
  /// The extended range white level starts at 100.
  #[error("tone mapping extended range white level {0} should be greater than or equal to 100")]
  ExtendedRangeWhiteLevelTooLow(u32),
  /// Nominal levels must be ordered.
  #[error(
    "tone mapping nominal white level ({white}) shall be greater than \
     the nominal black level ({black})"
  )]
  NominalWhiteNotAboveBlack { black: u32, white: u32 },
  /// The extended white level bounds the nominal one.
  #[error(
    "tone mapping extended white level ({extended}) shall be greater \
     than or equal to the nominal white level ({nominal})"
  )]
  ExtendedWhiteBelowNominal { extended: u32, nominal: u32 },
  /// Pivot arrays match the declared pivot count.
  #[error("expected {expected} tone mapping pivot values, found {found}")]
  ToneMapPivotCountMismatch { expected: usize, found: usize },
  /// Knee point counts span 1 to 999.
  #[error("knee function point count {0} must be in the range of 1 to 999")]
  KneePointCountOutOfRange(usize),
  /// Input and output knee point arrays pair up.
  #[error("knee function input and output point counts differ ({inputs} vs {outputs})")]
  KneePointCountMismatch { inputs: usize, outputs: usize },
  /// Input knee points span 1 to 999.
  #[error("knee function input point {value} at index {index} must be in the range of 1 to 999")]
  KneeInputPointOutOfRange { index: usize, value: u32 },
  /// Output knee points span 0 to 1000.
  #[error("knee function output point {value} at index {index} must be in the range of 0 to 1000")]
  KneeOutputPointOutOfRange { index: usize, value: u32 },
  /// Input knee points increase strictly.
  #[error("knee function input points must be strictly increasing (index {index})")]
  KneeInputPointsNotIncreasing { index: usize },
  /// Frame packing arrangement types span 3 to 5.
  #[error("frame packing type {0} must be in the range 3 to 5")]
  InvalidFramePackingType(u32),

  /// The coded picture exceeds the level's luma sample budget.
  #[error(
    "coded picture size {luma_samples} exceeds the maximum luma \
     samples {max} of the specified level"
  )]
  LevelPictureSizeExceeded { luma_samples: usize, max: usize },
  /// A coded dimension exceeds the level's bound.
  #[error("coded {dimension} {actual} exceeds the maximum of {max} for the specified level")]
  LevelDimensionExceeded { dimension: &'static str, actual: usize, max: usize },

  /// The intra constraint flag only fits all-intra sequences.
  #[error("the intra constraint flag cannot be set for inter sequences")]
  IntraConstraintForInterSequence,
  /// GOP periods close at the base temporal layer.
  #[error("the last frame in each GOP must have temporal id 0 (frame {frame})")]
  LastGopEntryTemporalId { frame: usize },
}

/// The collected diagnostics of a failed validation run.
///
/// Every failing predicate of the battery is recorded before validation
/// as a whole fails, so a single run reports every violation at once.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .violations.iter().map(|v| v.to_string()).join("\n  "))]
pub struct ConfigViolations {
  /// The individual rule violations, in evaluation order.
  pub violations: Vec<InvalidConfig>,
}

impl From<InvalidConfig> for ConfigViolations {
  fn from(violation: InvalidConfig) -> Self {
    ConfigViolations { violations: vec![violation] }
  }
}

/// Contains the encoder configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
  /// Settings which impact the produced bitstream.
  pub(crate) enc: EncoderConfig,
  /// Rate control configuration.
  pub(crate) rate_control: RateControlConfig,
}

impl Config {
  /// Creates a default configuration.
  ///
  /// Same as `Default::default()`.
  pub fn new() -> Self {
    Config::default()
  }

  /// Sets the encoder configuration.
  ///
  /// `EncoderConfig` contains the settings impacting the codec features
  /// used in the produced bitstream.
  pub fn with_encoder_config(mut self, enc: EncoderConfig) -> Self {
    self.enc = enc;
    self
  }

  /// Sets the rate control configuration.
  ///
  /// The default configuration codes at a fixed QP.
  pub fn with_rate_control(
    mut self, rate_control: RateControlConfig,
  ) -> Self {
    self.rate_control = rate_control;
    self
  }

  /// Validates the configuration.
  ///
  /// Equivalent to [`new_context`] with the resulting context dropped.
  ///
  /// # Errors
  ///
  /// Returns every violated rule as a [`ConfigViolations`] list.
  ///
  /// [`new_context`]: Config::new_context
  pub fn validate(&self) -> Result<(), ConfigViolations> {
    self.new_context().map(|_| ())
  }

  /// Creates a frozen [`Context`] from this configuration.
  ///
  /// Runs, in order: parameter normalization, reference-picture-set
  /// expansion, the full validation battery, and the publication of the
  /// derived constants. The configuration held by the returned context
  /// is immutable for the rest of the run.
  ///
  /// # Errors
  ///
  /// Configuration-authoring errors (mutually exclusive input styles,
  /// malformed derived geometry, unsatisfiable reference structures)
  /// surface as a single diagnostic at the point of detection; rule
  /// violations are collected across the whole battery and returned
  /// together.
  pub fn new_context(&self) -> Result<Context, ConfigViolations> {
    let mut enc = self.enc.clone();
    let mut rate_control = self.rate_control;

    enc.normalize()?;

    if rate_control.enabled
      && rate_control.force_intra_qp
      && rate_control.initial_qp == 0
    {
      warn!(
        "initial QP for rate control is not specified; \
         not forcing the intra QP"
      );
      rate_control.force_intra_qp = false;
    }

    let gop_derived = gop::expand(
      &mut enc.gop,
      enc.gop_size,
      enc.intra_period,
      enc.field_coding,
    )?;

    let violations = validate_config(&enc, &rate_control);
    if !violations.is_empty() {
      return Err(ConfigViolations { violations });
    }

    let constants = DerivedConstants::new(&enc);
    Ok(Context::new(enc, rate_control, gop_derived, constants))
  }
}

impl EncoderConfig {
  /// Derives every dependent field that was left unset, following the
  /// fixed precedence cascade, and resolves profile shorthands into
  /// canonical constraint fields.
  ///
  /// Normalization is idempotent: running it again on an already
  /// normalized configuration changes nothing.
  ///
  /// # Errors
  ///
  /// Returns the first fatal configuration-authoring error found:
  /// mutually exclusive constraint styles, partially specified
  /// constraints, or padding geometry the chroma format cannot express.
  pub fn normalize(&mut self) -> Result<(), InvalidConfig> {
    if !(1..=6).contains(&self.max_cu_depth) {
      return Err(InvalidConfig::InvalidMaxCuDepth(self.max_cu_depth));
    }
    if self.max_cu_width == 0 {
      return Err(InvalidConfig::MaxCuSizeTooSmall {
        dimension: "width",
        actual: 0,
      });
    }
    if self.max_cu_height == 0 {
      return Err(InvalidConfig::MaxCuSizeTooSmall {
        dimension: "height",
        actual: 0,
      });
    }

    // Bit-depth cascade. Applied in dependency order: luma before
    // chroma, earlier stage before later stage.
    if self.msb_extended_bit_depth.luma == 0 {
      self.msb_extended_bit_depth.luma = self.input_bit_depth.luma;
    }
    if self.msb_extended_bit_depth.chroma == 0 {
      self.msb_extended_bit_depth.chroma = self.msb_extended_bit_depth.luma;
    }
    if self.internal_bit_depth.luma == 0 {
      self.internal_bit_depth.luma = self.msb_extended_bit_depth.luma;
    }
    if self.internal_bit_depth.chroma == 0 {
      self.internal_bit_depth.chroma = self.internal_bit_depth.luma;
    }
    if self.input_bit_depth.chroma == 0 {
      self.input_bit_depth.chroma = self.input_bit_depth.luma;
    }
    if self.output_bit_depth.luma == 0 {
      self.output_bit_depth.luma = self.internal_bit_depth.luma;
    }
    if self.output_bit_depth.chroma == 0 {
      self.output_bit_depth.chroma = self.internal_bit_depth.chroma;
    }

    self.chroma_format =
      self.chroma_format_override.unwrap_or(self.input_chroma_format);

    self.resolve_profile()?;
    self.resolve_conformance_window()?;
    self.resolve_sao_offsets();

    self.wavefront_substreams = if self.wavefront_synchro > 0 {
      (self.coded_height + self.max_cu_height as usize - 1)
        / self.max_cu_height as usize
    } else {
      1
    };

    if self.cross_component_prediction
      && self.chroma_format != ChromaFormat::Cf444
    {
      warn!("cross-component prediction is specified for 4:4:4 format only");
      self.cross_component_prediction = false;
    }

    if self.tmcts_sei
      && self.num_tile_columns_minus1 == 0
      && self.num_tile_rows_minus1 == 0
    {
      warn!(
        "disabling the temporal motion-constrained tile sets SEI \
         because no tiles are enabled"
      );
      self.tmcts_sei = false;
    }

    Ok(())
  }

  fn resolve_profile(&mut self) -> Result<(), InvalidConfig> {
    match self.extended_profile {
      ExtendedProfile::Base(profile) => self.profile = profile,
      ExtendedProfile::SubProfile(_) => {
        self.profile = Profile::MainRExt;
        if self.bit_depth_constraint != 0
          || self.chroma_format_constraint.is_some()
        {
          return Err(InvalidConfig::MutuallyExclusiveConstraints);
        }
        if let Some(c) = self.extended_profile.decompose() {
          self.bit_depth_constraint = c.bit_depth;
          self.intra_constraint = c.intra_constraint;
          self.chroma_format_constraint = Some(c.chroma_format);
        }
        // The shorthand is fully decomposed; only the base profile
        // remains to be signalled.
        self.extended_profile = ExtendedProfile::Base(Profile::MainRExt);
      }
    }

    if self.profile.is_rext() {
      match (self.bit_depth_constraint, self.chroma_format_constraint) {
        (0, None) => {
          // Produce a valid combination, if possible.
          let tools = RExtToolUsage {
            general_tools: self.uses_general_rext_tools(),
            chroma_qp_adjustment: self.uses_chroma_qp_adjustment(),
            extended_precision: self.extended_precision,
          };
          let (bit_depth, chroma_format) = select_rext_constraints(
            tools,
            self.intra_constraint,
            self.max_internal_bit_depth(),
            self.chroma_format,
          );
          self.bit_depth_constraint = bit_depth;
          self.chroma_format_constraint = Some(chroma_format);
        }
        (0, Some(_)) | (_, None) => {
          return Err(InvalidConfig::PartiallySpecifiedConstraints);
        }
        _ => {}
      }
    } else {
      if self.chroma_format_constraint.is_none() {
        self.chroma_format_constraint = Some(self.chroma_format);
      }
      self.bit_depth_constraint =
        if self.profile == Profile::Main10 { 10 } else { 8 };
    }

    Ok(())
  }

  fn resolve_conformance_window(&mut self) -> Result<(), InvalidConfig> {
    let src_width = self.width;
    let src_height = self.source_height();

    match self.conformance_mode {
      ConformanceMode::Disabled => {
        self.conf_win = ConformanceWindow::default();
        self.pad = [0, 0];
        self.coded_width = src_width;
        self.coded_height = src_height;
      }
      ConformanceMode::AutoPadding => {
        self.conf_win = ConformanceWindow::default();
        self.pad = [0, 0];
        self.coded_width = src_width;
        self.coded_height = src_height;
        let min_cu = self.min_cu_size() as usize;
        if min_cu > 0 && src_width % min_cu != 0 {
          let pad = (src_width / min_cu + 1) * min_cu - src_width;
          self.pad[0] = pad as u32;
          self.conf_win.right = pad as u32;
          self.coded_width = src_width + pad;
        }
        if min_cu > 0 && src_height % min_cu != 0 {
          let pad = (src_height / min_cu + 1) * min_cu - src_height;
          self.pad[1] = pad as u32;
          self.conf_win.bottom = pad as u32;
          self.coded_height = src_height + pad;
        }
        if self.pad[0] % self.chroma_format.win_unit_x() != 0 {
          return Err(InvalidConfig::PaddedWidthNotChromaAligned {
            pad: self.pad[0],
            unit: self.chroma_format.win_unit_x(),
          });
        }
        if self.pad[1] % self.chroma_format.win_unit_y() != 0 {
          return Err(InvalidConfig::PaddedHeightNotChromaAligned {
            pad: self.pad[1],
            unit: self.chroma_format.win_unit_y(),
          });
        }
      }
      ConformanceMode::Padding => {
        self.coded_width = src_width + self.pad[0] as usize;
        self.coded_height = src_height + self.pad[1] as usize;
        self.conf_win = ConformanceWindow {
          left: 0,
          right: self.pad[0],
          top: 0,
          bottom: self.pad[1],
        };
      }
      ConformanceMode::Window => {
        let w = self.conf_win;
        if w.left == 0 && w.right == 0 && w.top == 0 && w.bottom == 0 {
          warn!(
            "conformance window enabled, but all conformance window \
             parameters set to zero"
          );
        }
        if self.pad[0] != 0 || self.pad[1] != 0 {
          warn!(
            "conformance window enabled, padding parameters will be \
             ignored"
          );
        }
        self.pad = [0, 0];
        self.coded_width = src_width;
        self.coded_height = src_height;
      }
    }

    Ok(())
  }

  fn resolve_sao_offsets(&mut self) {
    let resolve = |shift: i32, bit_depth: u32, qp: i32| -> i32 {
      if shift >= 0 {
        shift
      } else if bit_depth > 10 {
        let derived = (f64::from(bit_depth) - 10.0 + 0.165 * f64::from(qp)
          - 3.22
          + 0.5) as i32;
        derived.clamp(0, bit_depth as i32 - 10)
      } else {
        0
      }
    };
    self.sao_luma_offset_bit_shift = resolve(
      self.sao_luma_offset_bit_shift,
      self.internal_bit_depth.luma,
      self.qp,
    );
    self.sao_chroma_offset_bit_shift = resolve(
      self.sao_chroma_offset_bit_shift,
      self.internal_bit_depth.chroma,
      self.qp,
    );
  }
}

macro_rules! confirm {
  ($violations:expr, $cond:expr, $err:expr) => {
    if $cond {
      $violations.push($err);
    }
  };
}

/// Evaluates the exhaustive battery of legality checks against a
/// normalized configuration. Every predicate runs; nothing short
/// circuits.
fn validate_config(
  enc: &EncoderConfig, rc: &RateControlConfig,
) -> Vec<InvalidConfig> {
  use InvalidConfig::*;

  let mut v = Vec::new();

  if enc.decoded_picture_hash == DecodedPictureHash::None {
    warn!(
      "the decoded picture hash SEI is disabled; automatic \
       verification of decoded pictures by a decoder requires it"
    );
  }
  if enc.profile == Profile::None {
    warn!("for conforming bitstreams a valid profile value must be set");
  }
  if enc.level == Level::None {
    warn!("for conforming bitstreams a valid level value must be set");
  }

  // Profile conformance.
  let max_bit_depth = enc.max_internal_bit_depth();
  confirm!(
    v,
    enc.bit_depth_constraint < max_bit_depth,
    InternalBitDepthExceedsConstraint {
      actual: max_bit_depth,
      max: enc.bit_depth_constraint
    }
  );
  let chroma_constraint =
    enc.chroma_format_constraint.unwrap_or(enc.chroma_format);
  confirm!(
    v,
    chroma_constraint < enc.chroma_format,
    ChromaFormatExceedsConstraint {
      actual: enc.chroma_format,
      max: chroma_constraint
    }
  );

  if enc.profile.is_rext() {
    confirm!(
      v,
      !enc.lower_bit_rate_constraint && !enc.intra_constraint,
      LowerBitRateConstraintRequired
    );
    confirm!(
      v,
      enc.align_cabac_before_bypass && enc.profile != Profile::HighRExt,
      CabacAlignmentOutsideHighRExt
    );
    if enc.profile == Profile::MainRExt {
      let valid = rext_sub_profile_name(
        enc.intra_constraint,
        enc.bit_depth_constraint,
        chroma_constraint,
      )
      .is_some();
      confirm!(
        v,
        !valid,
        InvalidRExtProfileCombination {
          intra: enc.intra_constraint,
          bit_depth: enc.bit_depth_constraint,
          chroma_format: chroma_constraint
        }
      );
      confirm!(
        v,
        matches!(
          chroma_constraint,
          ChromaFormat::Cf400 | ChromaFormat::Cf420
        ) && enc.uses_chroma_qp_adjustment(),
        ChromaQpAdjustmentConstraint(chroma_constraint)
      );
      confirm!(
        v,
        enc.bit_depth_constraint != 16 && enc.extended_precision,
        ExtendedPrecisionRequires16Bit
      );
      if !(chroma_constraint == ChromaFormat::Cf400
        && enc.bit_depth_constraint == 16)
        && chroma_constraint != ChromaFormat::Cf444
      {
        confirm!(
          v,
          enc.uses_general_rext_tools(),
          RExtToolsOutsideValidProfiles
        );
      }
      if !enc.intra_constraint
        && enc.bit_depth_constraint == 16
        && chroma_constraint == ChromaFormat::Cf444
      {
        warn!(
          "the RExt constraint flags describe a non-standard \
           combination (used for development only)"
        );
      }
    }
  } else {
    let expected =
      if enc.profile == Profile::Main10 { 10 } else { 8 };
    confirm!(
      v,
      enc.bit_depth_constraint != expected,
      BitDepthConstraintForV1Profile { expected }
    );
    confirm!(
      v,
      chroma_constraint != ChromaFormat::Cf420,
      ChromaConstraintForV1Profile
    );
    confirm!(v, enc.intra_constraint, IntraConstraintForV1Profile);
    confirm!(
      v,
      !enc.lower_bit_rate_constraint,
      LowerBitRateConstraintForV1Profile
    );
    confirm!(
      v,
      enc.cross_component_prediction,
      ToolForbiddenInV1Profile("cross-component prediction")
    );
    confirm!(
      v,
      enc.transform_skip_log2_max_size != 2,
      ToolForbiddenInV1Profile("a non-default transform skip size")
    );
    confirm!(
      v,
      enc.residual_rotation,
      ToolForbiddenInV1Profile("residual rotation")
    );
    confirm!(
      v,
      enc.single_significance_map_context,
      ToolForbiddenInV1Profile("the single significance map context")
    );
    confirm!(
      v,
      enc.implicit_rdpcm,
      ToolForbiddenInV1Profile("implicit residual DPCM")
    );
    confirm!(
      v,
      enc.explicit_rdpcm,
      ToolForbiddenInV1Profile("explicit residual DPCM")
    );
    confirm!(
      v,
      enc.golomb_rice_adaptation,
      ToolForbiddenInV1Profile("Golomb-Rice parameter adaptation")
    );
    confirm!(
      v,
      enc.extended_precision,
      ToolForbiddenInV1Profile("extended precision")
    );
    confirm!(
      v,
      enc.high_precision_weighting,
      ToolForbiddenInV1Profile("high precision prediction weighting")
    );
    confirm!(
      v,
      !enc.intra_reference_smoothing,
      IntraSmoothingRequiredInV1Profile
    );
    confirm!(
      v,
      enc.align_cabac_before_bypass,
      ToolForbiddenInV1Profile("CABAC bypass alignment")
    );
  }

  // Range checks.
  confirm!(
    v,
    enc.input_bit_depth.luma < 8,
    InputBitDepthTooLow { channel: "luma", actual: enc.input_bit_depth.luma }
  );
  confirm!(
    v,
    enc.input_bit_depth.chroma < 8,
    InputBitDepthTooLow {
      channel: "chroma",
      actual: enc.input_bit_depth.chroma
    }
  );
  confirm!(
    v,
    enc.msb_extended_bit_depth.luma < enc.input_bit_depth.luma,
    MsbExtendedBelowInput { channel: "luma" }
  );
  confirm!(
    v,
    enc.msb_extended_bit_depth.chroma < enc.input_bit_depth.chroma,
    MsbExtendedBelowInput { channel: "chroma" }
  );
  for (channel, shift, depth) in [
    ("luma", enc.sao_luma_offset_bit_shift, enc.internal_bit_depth.luma),
    (
      "chroma",
      enc.sao_chroma_offset_bit_shift,
      enc.internal_bit_depth.chroma,
    ),
  ] {
    let max = if depth < 10 { 0 } else { depth as i32 - 10 };
    confirm!(
      v,
      shift > max,
      SaoOffsetBitShiftOutOfRange { channel, actual: shift, max }
    );
  }
  confirm!(v, enc.frame_rate == 0, InvalidFrameRate);
  confirm!(v, enc.frames_to_encode == 0, InvalidFramesToEncode);
  confirm!(v, enc.gop_size < 1, InvalidGopSize(enc.gop_size));
  confirm!(
    v,
    enc.gop_size > 1 && enc.gop_size % 2 != 0,
    OddGopSize(enc.gop_size)
  );
  confirm!(
    v,
    (enc.intra_period > 0 && (enc.intra_period as usize) < enc.gop_size)
      || enc.intra_period == 0,
    InvalidIntraPeriod {
      intra_period: enc.intra_period,
      gop_size: enc.gop_size
    }
  );
  confirm!(
    v,
    enc.intra_period >= 0
      && enc.gop_size > 0
      && enc.intra_period as usize % enc.gop_size != 0,
    IntraPeriodNotMultipleOfGop {
      intra_period: enc.intra_period,
      gop_size: enc.gop_size
    }
  );
  confirm!(
    v,
    enc.decoding_refresh_type > 3,
    InvalidDecodingRefreshType(enc.decoding_refresh_type)
  );
  confirm!(
    v,
    enc.decoding_refresh_type == 3 && !enc.recovery_point_sei,
    RecoveryPointSeiRequired
  );
  confirm!(
    v,
    enc.decoding_refresh_type == 2
      && enc.intra_period > 0
      && enc.intra_period as usize <= enc.gop_size,
    IdrPeriodTooSmall
  );

  let qp_min = -6 * (enc.internal_bit_depth.luma as i32 - 8);
  confirm!(
    v,
    enc.qp < qp_min || enc.qp > 51,
    QpOutOfRange { actual: enc.qp, min: qp_min }
  );
  confirm!(
    v,
    !(-6..=6).contains(&enc.loop_filter_beta_offset_div2),
    LoopFilterBetaOffsetOutOfRange(enc.loop_filter_beta_offset_div2)
  );
  confirm!(
    v,
    !(-6..=6).contains(&enc.loop_filter_tc_offset_div2),
    LoopFilterTcOffsetOutOfRange(enc.loop_filter_tc_offset_div2)
  );
  if enc.intra_period != 1
    && !enc.loop_filter_offset_in_pps
    && enc.deblocking_control_present
    && !enc.loop_filter_disable
  {
    for (i, entry) in enc.gop.iter().take(enc.gop_size).enumerate() {
      let beta = entry.beta_offset_div2 + enc.loop_filter_beta_offset_div2;
      let tc = entry.tc_offset_div2 + enc.loop_filter_tc_offset_div2;
      confirm!(
        v,
        !(-6..=6).contains(&beta),
        GopBetaOffsetOutOfRange { frame: i + 1 }
      );
      confirm!(
        v,
        !(-6..=6).contains(&tc),
        GopTcOffsetOutOfRange { frame: i + 1 }
      );
    }
  }
  confirm!(
    v,
    enc.fast_search > 2,
    InvalidFastSearchMode(enc.fast_search)
  );
  confirm!(v, enc.search_range < 0, InvalidSearchRange);
  confirm!(v, enc.bipred_search_range < 0, InvalidBipredSearchRange);
  confirm!(
    v,
    enc.max_delta_qp > 7,
    MaxDeltaQpOutOfRange(enc.max_delta_qp)
  );
  confirm!(
    v,
    enc.max_cu_dqp_depth > enc.max_cu_depth - 1,
    DqpDepthExceedsCuDepth { actual: enc.max_cu_dqp_depth }
  );
  confirm!(
    v,
    !(-12..=12).contains(&enc.cb_qp_offset),
    CbQpOffsetOutOfRange(enc.cb_qp_offset)
  );
  confirm!(
    v,
    !(-12..=12).contains(&enc.cr_qp_offset),
    CrQpOffsetOutOfRange(enc.cr_qp_offset)
  );
  confirm!(
    v,
    enc.qp_adaptation_range <= 0,
    InvalidQpAdaptationRange
  );
  confirm!(
    v,
    enc.adaptive_qp_select && enc.qp < 0,
    AdaptiveQpSelectWithNegativeQp
  );
  confirm!(
    v,
    enc.adaptive_qp_select
      && (enc.cb_qp_offset != 0 || enc.cr_qp_offset != 0),
    AdaptiveQpSelectWithChromaOffset
  );

  // Structural consistency of the partitioning units.
  confirm!(
    v,
    !enc.max_cu_width.is_power_of_two(),
    CuWidthNotPowerOfTwo(enc.max_cu_width)
  );
  confirm!(
    v,
    !enc.max_cu_height.is_power_of_two(),
    CuHeightNotPowerOfTwo(enc.max_cu_height)
  );
  confirm!(
    v,
    enc.max_cu_width < 16,
    MaxCuSizeTooSmall { dimension: "width", actual: enc.max_cu_width }
  );
  confirm!(
    v,
    enc.max_cu_height < 16,
    MaxCuSizeTooSmall { dimension: "height", actual: enc.max_cu_height }
  );
  confirm!(
    v,
    (enc.max_cu_width >> enc.max_cu_depth) < 4,
    MinPartitionTooSmall { dimension: "width" }
  );
  confirm!(
    v,
    (enc.max_cu_height >> enc.max_cu_depth) < 4,
    MinPartitionTooSmall { dimension: "height" }
  );

  let min_cu = enc.min_cu_size();
  confirm!(
    v,
    min_cu > 0 && enc.coded_width % min_cu as usize != 0,
    WidthNotMultipleOfMinCu { width: enc.coded_width, min_cu }
  );
  confirm!(
    v,
    min_cu > 0 && enc.coded_height % min_cu as usize != 0,
    HeightNotMultipleOfMinCu { height: enc.coded_height, min_cu }
  );

  let unit_x = enc.chroma_format.win_unit_x() as usize;
  let unit_y = enc.chroma_format.win_unit_y() as usize;
  confirm!(
    v,
    enc.coded_width % unit_x != 0,
    WidthNotChromaAligned { width: enc.coded_width }
  );
  confirm!(
    v,
    enc.coded_height % unit_y != 0,
    HeightNotChromaAligned { height: enc.coded_height }
  );
  confirm!(
    v,
    enc.pad[0] as usize % unit_x != 0,
    PaddingNotChromaAligned { direction: "horizontal", pad: enc.pad[0] }
  );
  confirm!(
    v,
    enc.pad[1] as usize % unit_y != 0,
    PaddingNotChromaAligned { direction: "vertical", pad: enc.pad[1] }
  );
  for (edge, offset, unit) in [
    ("left", enc.conf_win.left, unit_x),
    ("right", enc.conf_win.right, unit_x),
    ("top", enc.conf_win.top, unit_y),
    ("bottom", enc.conf_win.bottom, unit_y),
  ] {
    confirm!(
      v,
      offset as usize % unit != 0,
      ConformanceOffsetNotChromaAligned { edge, offset }
    );
  }

  confirm!(
    v,
    enc.tu_log2_min_size < 2,
    TuLog2MinTooSmall(enc.tu_log2_min_size)
  );
  confirm!(
    v,
    enc.tu_log2_max_size > 5,
    TuLog2MaxTooLarge(enc.tu_log2_max_size)
  );
  confirm!(
    v,
    enc.tu_log2_max_size < enc.tu_log2_min_size,
    TuMaxLessThanMin {
      max: enc.tu_log2_max_size,
      min: enc.tu_log2_min_size
    }
  );
  if (2..=5).contains(&enc.tu_log2_min_size)
    && enc.tu_log2_max_size <= 5
  {
    confirm!(
      v,
      (1 << enc.tu_log2_max_size) > enc.max_cu_width,
      TuMaxExceedsCu
    );
    confirm!(
      v,
      (1 << enc.tu_log2_min_size)
        > (enc.max_cu_width >> (enc.max_cu_depth - 1))
        || (1 << enc.tu_log2_min_size)
          > (enc.max_cu_height >> (enc.max_cu_depth - 1)),
      TuMinExceedsMinCu
    );
    confirm!(
      v,
      (1 << enc.tu_log2_min_size) > (enc.max_cu_width >> enc.max_cu_depth)
        || (1 << enc.tu_log2_min_size)
          > (enc.max_cu_height >> enc.max_cu_depth),
      TuMinExceedsMinPartition
    );
    confirm!(
      v,
      !(1..=6).contains(&enc.tu_max_depth_inter)
        || enc.max_cu_width
          < (1 << (enc.tu_log2_min_size + enc.tu_max_depth_inter - 1)),
      InvalidTuDepthInter(enc.tu_max_depth_inter)
    );
    confirm!(
      v,
      !(1..=6).contains(&enc.tu_max_depth_intra)
        || enc.max_cu_width
          < (1 << (enc.tu_log2_min_size + enc.tu_max_depth_intra - 1)),
      InvalidTuDepthIntra(enc.tu_max_depth_intra)
    );
  }

  confirm!(
    v,
    !(1..=5).contains(&enc.max_num_merge_cand),
    InvalidMaxNumMergeCand(enc.max_num_merge_cand)
  );

  if enc.pcm {
    for (channel, msb, internal) in [
      (
        "luma",
        enc.msb_extended_bit_depth.luma,
        enc.internal_bit_depth.luma,
      ),
      (
        "chroma",
        enc.msb_extended_bit_depth.chroma,
        enc.internal_bit_depth.chroma,
      ),
    ] {
      confirm!(
        v,
        msb > internal && enc.pcm_input_bit_depth,
        PcmBitDepthExceedsInternal { channel }
      );
    }
    confirm!(
      v,
      !(3..=5).contains(&enc.pcm_log2_min_size),
      PcmLog2MinOutOfRange(enc.pcm_log2_min_size)
    );
    confirm!(
      v,
      enc.pcm_log2_max_size > 5,
      PcmLog2MaxTooLarge(enc.pcm_log2_max_size)
    );
    confirm!(
      v,
      enc.pcm_log2_max_size < enc.pcm_log2_min_size,
      PcmMaxLessThanMin
    );
  }

  confirm!(
    v,
    enc.transform_skip_log2_max_size < 2,
    TransformSkipSizeTooSmall(enc.transform_skip_log2_max_size)
  );
  if enc.transform_skip_log2_max_size != 2 && enc.transform_skip_fast {
    warn!(
      "transform skip fast is enabled (which only tests NxN splits), \
       but the transform skip log2 max size is not 2"
    );
  }

  confirm!(
    v,
    enc.slice_mode > 3,
    InvalidSliceMode(enc.slice_mode)
  );
  confirm!(
    v,
    enc.slice_mode != 0 && enc.slice_argument < 1,
    InvalidSliceArgument
  );
  confirm!(
    v,
    enc.slice_segment_mode > 3,
    InvalidSliceSegmentMode(enc.slice_segment_mode)
  );
  confirm!(
    v,
    enc.slice_segment_mode != 0 && enc.slice_segment_argument < 1,
    InvalidSliceSegmentArgument
  );

  let tiles =
    enc.num_tile_columns_minus1 > 0 || enc.num_tile_rows_minus1 > 0;
  confirm!(v, tiles && enc.wavefront_synchro != 0, TilesWithWavefront);
  if !enc.uniform_tile_spacing && enc.num_tile_columns_minus1 > 0 {
    confirm!(
      v,
      enc.tile_column_widths.len() != enc.num_tile_columns_minus1,
      TileColumnCountMismatch {
        expected: enc.num_tile_columns_minus1,
        found: enc.tile_column_widths.len()
      }
    );
  }
  if !enc.uniform_tile_spacing && enc.num_tile_rows_minus1 > 0 {
    confirm!(
      v,
      enc.tile_row_heights.len() != enc.num_tile_rows_minus1,
      TileRowCountMismatch {
        expected: enc.num_tile_rows_minus1,
        found: enc.tile_row_heights.len()
      }
    );
  }
  confirm!(
    v,
    enc.wavefront_synchro < 0,
    NegativeWavefront(enc.wavefront_synchro)
  );
  confirm!(
    v,
    enc.log2_parallel_merge_level < 2,
    ParallelMergeLevelTooSmall(enc.log2_parallel_merge_level)
  );
  confirm!(
    v,
    !enc.transquant_bypass_enable && enc.transquant_bypass_force,
    TransquantBypassForceWithoutEnable
  );
  confirm!(
    v,
    rc.enabled && enc.delta_qp_rd > 0,
    RateControlWithDeltaQpRd
  );

  // SEI parameter sets.
  if let Some(tm) = &enc.tone_mapping {
    confirm!(
      v,
      !(8..=14).contains(&tm.coded_data_bit_depth),
      ToneMapCodedBitDepthOutOfRange(tm.coded_data_bit_depth)
    );
    confirm!(
      v,
      tm.target_bit_depth < 1
        || (tm.target_bit_depth > 16 && tm.target_bit_depth < 255)
        || tm.target_bit_depth > 255,
      ToneMapTargetBitDepthOutOfRange(tm.target_bit_depth)
    );
    confirm!(v, tm.camera_iso_speed_value == 0, ZeroCameraIsoSpeed);
    confirm!(v, tm.exposure_index_value == 0, ZeroExposureIndex);
    confirm!(
      v,
      tm.extended_range_white_level < 100,
      ExtendedRangeWhiteLevelTooLow(tm.extended_range_white_level)
    );
    confirm!(
      v,
      tm.nominal_black_level >= tm.nominal_white_level,
      NominalWhiteNotAboveBlack {
        black: tm.nominal_black_level,
        white: tm.nominal_white_level
      }
    );
    confirm!(
      v,
      tm.extended_white_level < tm.nominal_white_level,
      ExtendedWhiteBelowNominal {
        extended: tm.extended_white_level,
        nominal: tm.nominal_white_level
      }
    );
    if tm.model == ToneMapModel::PiecewiseLinear {
      for pivots in [&tm.coded_pivot_value, &tm.target_pivot_value] {
        confirm!(
          v,
          pivots.len() != tm.num_pivots,
          ToneMapPivotCountMismatch {
            expected: tm.num_pivots,
            found: pivots.len()
          }
        );
      }
    }
  }
  if let Some(knee) = &enc.knee_function {
    let points = knee.input_knee_points.len();
    confirm!(
      v,
      !(1..=999).contains(&points),
      KneePointCountOutOfRange(points)
    );
    confirm!(
      v,
      knee.output_knee_points.len() != points,
      KneePointCountMismatch {
        inputs: points,
        outputs: knee.output_knee_points.len()
      }
    );
    for (i, &value) in knee.input_knee_points.iter().enumerate() {
      confirm!(
        v,
        !(1..=999).contains(&value),
        KneeInputPointOutOfRange { index: i, value }
      );
      if i > 0 {
        confirm!(
          v,
          knee.input_knee_points[i - 1] >= value,
          KneeInputPointsNotIncreasing { index: i }
        );
      }
    }
    for (i, &value) in knee.output_knee_points.iter().enumerate() {
      confirm!(
        v,
        value > 1000,
        KneeOutputPointOutOfRange { index: i, value }
      );
    }
  }
  if let Some(fp) = &enc.frame_packing {
    confirm!(
      v,
      !(3..=5).contains(&fp.packing_type),
      InvalidFramePackingType(fp.packing_type)
    );
  }

  // Level limits.
  if let Some(max_ps) = levels::max_luma_picture_size(enc.level) {
    let luma_samples = enc.coded_width * enc.coded_height;
    confirm!(
      v,
      luma_samples > max_ps,
      LevelPictureSizeExceeded { luma_samples, max: max_ps }
    );
    if let Some(max_dim) = levels::max_luma_dimension(enc.level) {
      confirm!(
        v,
        enc.coded_width > max_dim,
        LevelDimensionExceeded {
          dimension: "width",
          actual: enc.coded_width,
          max: max_dim
        }
      );
      confirm!(
        v,
        enc.coded_height > max_dim,
        LevelDimensionExceeded {
          dimension: "height",
          actual: enc.coded_height,
          max: max_dim
        }
      );
    }
  }

  // Coding structure.
  confirm!(
    v,
    enc.intra_period != 1 && enc.intra_constraint,
    IntraConstraintForInterSequence
  );
  for (i, entry) in enc.gop.iter().take(enc.gop_size).enumerate() {
    if entry.poc == Some(enc.gop_size as i32) {
      confirm!(
        v,
        entry.temporal_id != 0,
        LastGopEntryTemporalId { frame: i + 1 }
      );
    }
  }

  v
}

#[cfg(test)]
mod test {
  use super::*;
  use pretty_assertions::assert_eq;

  /// A minimal valid all-intra configuration.
  pub(crate) fn base_config() -> EncoderConfig {
    let mut enc = EncoderConfig::default();
    enc.width = 1920;
    enc.height = 1080;
    enc.frame_rate = 50;
    enc.frames_to_encode = 17;
    enc.intra_period = 1;
    enc.gop_size = 1;
    enc.extended_profile = ExtendedProfile::Base(Profile::Main);
    enc.level = Level::L4_1;
    enc
  }

  fn violations_of(enc: EncoderConfig) -> Vec<InvalidConfig> {
    match Config::new().with_encoder_config(enc).validate() {
      Ok(()) => Vec::new(),
      Err(e) => e.violations,
    }
  }

  #[test]
  fn default_all_intra_config_is_valid() {
    assert_eq!(violations_of(base_config()), Vec::new());
  }

  #[test]
  fn battery_reports_every_violation_at_once() {
    let mut enc = base_config();
    enc.qp = 99;
    enc.loop_filter_beta_offset_div2 = 9;
    enc.max_num_merge_cand = 7;
    let violations = violations_of(enc);
    assert!(violations
      .contains(&InvalidConfig::QpOutOfRange { actual: 99, min: 0 }));
    assert!(violations
      .contains(&InvalidConfig::LoopFilterBetaOffsetOutOfRange(9)));
    assert!(
      violations.contains(&InvalidConfig::InvalidMaxNumMergeCand(7))
    );
    assert_eq!(violations.len(), 3);
  }

  #[test]
  fn tiles_and_wavefront_are_mutually_exclusive() {
    let mut enc = base_config();
    enc.num_tile_columns_minus1 = 1;
    enc.uniform_tile_spacing = true;
    enc.wavefront_synchro = 1;
    assert!(
      violations_of(enc).contains(&InvalidConfig::TilesWithWavefront)
    );
  }

  #[test]
  fn rate_control_conflicts_with_slice_multi_qp() {
    let mut enc = base_config();
    enc.delta_qp_rd = 2;
    let rc =
      RateControlConfig { enabled: true, ..Default::default() };
    let err = Config::new()
      .with_encoder_config(enc)
      .with_rate_control(rc)
      .validate()
      .unwrap_err();
    assert!(err
      .violations
      .contains(&InvalidConfig::RateControlWithDeltaQpRd));
  }

  #[test]
  fn v1_profiles_reject_rext_tools() {
    let mut enc = base_config();
    enc.residual_rotation = true;
    enc.extended_precision = true;
    let violations = violations_of(enc);
    assert!(violations.contains(&InvalidConfig::ToolForbiddenInV1Profile(
      "residual rotation"
    )));
    assert!(violations.contains(&InvalidConfig::ToolForbiddenInV1Profile(
      "extended precision"
    )));
  }

  #[test]
  fn rext_combination_table_is_enforced() {
    // 8-bit 4:2:0 inter is not a defined RExt profile.
    let mut enc = base_config();
    enc.extended_profile = ExtendedProfile::Base(Profile::MainRExt);
    enc.bit_depth_constraint = 8;
    enc.chroma_format_constraint = Some(ChromaFormat::Cf420);
    let violations = violations_of(enc);
    assert!(violations.iter().any(|e| matches!(
      e,
      InvalidConfig::InvalidRExtProfileCombination { .. }
    )));
  }

  #[test]
  fn explicit_sub_profile_rejects_explicit_constraints() {
    let mut enc = base_config();
    enc.extended_profile = ExtendedProfile::SubProfile(1310);
    enc.bit_depth_constraint = 10;
    let err = Config::new()
      .with_encoder_config(enc)
      .validate()
      .unwrap_err();
    assert_eq!(
      err.violations,
      vec![InvalidConfig::MutuallyExclusiveConstraints]
    );
  }

  #[test]
  fn partially_specified_constraints_are_rejected() {
    let mut enc = base_config();
    enc.extended_profile = ExtendedProfile::Base(Profile::MainRExt);
    enc.bit_depth_constraint = 10;
    let err = Config::new()
      .with_encoder_config(enc)
      .validate()
      .unwrap_err();
    assert_eq!(
      err.violations,
      vec![InvalidConfig::PartiallySpecifiedConstraints]
    );
  }

  #[test]
  fn dimensions_must_cover_whole_minimum_cus() {
    let mut enc = base_config();
    enc.width = 1918;
    let violations = violations_of(enc);
    assert!(violations.iter().any(|e| matches!(
      e,
      InvalidConfig::WidthNotMultipleOfMinCu { width: 1918, .. }
    )));
  }

  #[test]
  fn level_limits_are_enforced() {
    let mut enc = base_config();
    enc.level = Level::L2; // 352x288-class level
    let violations = violations_of(enc);
    assert!(violations.iter().any(|e| matches!(
      e,
      InvalidConfig::LevelPictureSizeExceeded { .. }
    )));
  }

  #[test]
  fn gop_template_closes_at_temporal_id_zero() {
    let mut enc = base_config();
    enc.intra_period = 8;
    enc.gop_size = 8;
    enc.gop = crate::api::config::gop::test::hierarchical_b8();
    // Corrupt the closing entry.
    for entry in enc.gop.iter_mut() {
      if entry.poc == Some(8) {
        entry.temporal_id = 1;
      }
    }
    let violations = violations_of(enc);
    assert!(violations.iter().any(|e| matches!(
      e,
      InvalidConfig::LastGopEntryTemporalId { .. }
    )));
  }
}
