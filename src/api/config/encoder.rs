// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use itertools::*;
use num_derive::FromPrimitive;

use crate::api::color::*;
use crate::api::config::gop::GopEntry;
use crate::api::config::profile::*;
use crate::serialize::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Window conformance mode.
#[derive(
  Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, Serialize, Deserialize,
)]
#[repr(C)]
pub enum ConformanceMode {
  /// No conformance window, no padding.
  Disabled = 0,
  /// Pad automatically up to the next multiple of the minimum CU size.
  AutoPadding = 1,
  /// Fixed user-supplied padding, echoed into the conformance window.
  Padding = 2,
  /// Fixed user-supplied conformance window offsets.
  Window = 3,
}

impl Default for ConformanceMode {
  fn default() -> Self {
    ConformanceMode::Disabled
  }
}

/// Conformance window offsets, in luma samples.
#[derive(
  Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct ConformanceWindow {
  pub left: u32,
  pub right: u32,
  pub top: u32,
  pub bottom: u32,
}

/// Cost function used for mode decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostMode {
  /// Standard lossy coding.
  Lossy,
  /// Lossless at sequence level, lossy cost functions.
  SequenceLevelLossless,
  /// Lossless coding with a fixed QP.
  Lossless,
  /// Mixed lossless and lossy coding.
  MixedLosslessLossy,
}

impl Default for CostMode {
  fn default() -> Self {
    CostMode::Lossy
  }
}

impl FromStr for CostMode {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "lossy" => Ok(CostMode::Lossy),
      "sequence_level_lossless" => Ok(CostMode::SequenceLevelLossless),
      "lossless" => Ok(CostMode::Lossless),
      "mixed_lossless_lossy" => Ok(CostMode::MixedLosslessLossy),
      _ => Err(()),
    }
  }
}

impl fmt::Display for CostMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      CostMode::Lossy => "lossy",
      CostMode::SequenceLevelLossless => "sequence_level_lossless",
      CostMode::Lossless => "lossless",
      CostMode::MixedLosslessLossy => "mixed_lossless_lossy",
    };
    write!(f, "{}", s)
  }
}

/// Decoded picture hash SEI message type.
#[derive(
  Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, Serialize, Deserialize,
)]
#[repr(C)]
pub enum DecodedPictureHash {
  /// No hash SEI messages.
  None = 0,
  /// MD5 digests.
  Md5 = 1,
  /// CRC.
  Crc = 2,
  /// Checksum.
  Checksum = 3,
}

impl Default for DecodedPictureHash {
  fn default() -> Self {
    DecodedPictureHash::None
  }
}

/// Model used by the tone mapping SEI message.
#[derive(
  Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, Serialize, Deserialize,
)]
#[repr(C)]
pub enum ToneMapModel {
  /// Linear mapping with clipping.
  Linear = 0,
  /// Sigmoidal mapping.
  Sigmoid = 1,
  /// User-defined table mapping.
  UserTable = 2,
  /// Piece-wise linear mapping.
  PiecewiseLinear = 3,
  /// Luminance dynamic range information.
  LuminanceRange = 4,
}

/// Parameters of the tone mapping SEI message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneMapping {
  /// Mapping model.
  pub model: ToneMapModel,
  /// Bit depth of the coded data the mapping applies to.
  pub coded_data_bit_depth: u32,
  /// Bit depth of the mapping output.
  pub target_bit_depth: u32,
  /// Minimum value in the linear model.
  pub min_value: u32,
  /// Maximum value in the linear model.
  pub max_value: u32,
  /// Centre point of the sigmoidal model.
  pub sigmoid_midpoint: u32,
  /// Width of the sigmoidal model.
  pub sigmoid_width: u32,
  /// User-defined mapping table for the table model.
  pub start_of_coded_interval: Vec<u32>,
  /// Number of pivot points of the piece-wise linear model.
  pub num_pivots: usize,
  /// Coded pivot values of the piece-wise linear model.
  pub coded_pivot_value: Vec<u32>,
  /// Target pivot values of the piece-wise linear model.
  pub target_pivot_value: Vec<u32>,
  /// Camera ISO speed for daylight illumination.
  pub camera_iso_speed_value: u32,
  /// Exposure index setting of the camera.
  pub exposure_index_value: u32,
  /// Luminance dynamic range of the extended range model.
  pub extended_range_white_level: u32,
  /// Luma sample value of the nominal black level.
  pub nominal_black_level: u32,
  /// Luma sample value of the nominal white level.
  pub nominal_white_level: u32,
  /// Luma sample value of the extended dynamic range.
  pub extended_white_level: u32,
}

impl Default for ToneMapping {
  fn default() -> Self {
    ToneMapping {
      model: ToneMapModel::Linear,
      coded_data_bit_depth: 8,
      target_bit_depth: 8,
      min_value: 0,
      max_value: 1023,
      sigmoid_midpoint: 512,
      sigmoid_width: 960,
      start_of_coded_interval: Vec::new(),
      num_pivots: 0,
      coded_pivot_value: Vec::new(),
      target_pivot_value: Vec::new(),
      camera_iso_speed_value: 400,
      exposure_index_value: 400,
      extended_range_white_level: 800,
      nominal_black_level: 16,
      nominal_white_level: 235,
      extended_white_level: 300,
    }
  }
}

/// Parameters of the knee function SEI message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KneeFunction {
  /// Peak luminance level of the input picture.
  pub input_drange: u32,
  /// Expected display brightness of the input picture.
  pub input_display_luminance: u32,
  /// Peak luminance level of the output picture.
  pub output_drange: u32,
  /// Expected display brightness of the output picture.
  pub output_display_luminance: u32,
  /// Input knee points, in the range 1..=999, strictly increasing.
  pub input_knee_points: Vec<u32>,
  /// Output knee points, in the range 0..=1000.
  pub output_knee_points: Vec<u32>,
}

impl Default for KneeFunction {
  fn default() -> Self {
    KneeFunction {
      input_drange: 1000,
      input_display_luminance: 100,
      output_drange: 4000,
      output_display_luminance: 800,
      input_knee_points: vec![600, 800, 900],
      output_knee_points: vec![100, 250, 450],
    }
  }
}

/// Parameters of the frame packing arrangement SEI message.
#[derive(
  Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct FramePacking {
  /// Frame packing arrangement type; only 3 (side by side), 4 (top
  /// bottom) and 5 (frame alternation) are accepted.
  pub packing_type: u32,
  /// Id of the SEI message for a given session.
  pub id: u32,
  /// Quincunx sampling flag.
  pub quincunx: bool,
  /// Interpretation of the frame pair.
  pub interpretation: u32,
}

/// Encoder settings which impact the produced bitstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
  // source geometry
  /// Width of the source frames in pixels.
  pub width: usize,
  /// Height of the source frames in pixels.
  pub height: usize,
  /// Frame rate in frames per second.
  pub frame_rate: u32,
  /// Number of frames to skip at the start of the input.
  pub frame_skip: u32,
  /// Number of frames to encode.
  pub frames_to_encode: usize,
  /// Field-based coding.
  pub field_coding: bool,
  /// Top field first, for field-based coding.
  pub top_field_first: bool,

  // data format
  /// Bit depth of the input, per channel. Chroma falls back to luma.
  pub input_bit_depth: BitDepths,
  /// Bit depth after MSB extension; falls back to the input bit depth.
  pub msb_extended_bit_depth: BitDepths,
  /// Bit depth the codec operates at; falls back to the MSB-extended
  /// bit depth.
  pub internal_bit_depth: BitDepths,
  /// Bit depth of the output; falls back to the internal bit depth.
  pub output_bit_depth: BitDepths,
  /// Chroma format of the input.
  pub input_chroma_format: ChromaFormat,
  /// Coded chroma format; `None` means follow the input format.
  pub chroma_format_override: Option<ChromaFormat>,
  /// Resolved coded chroma format. Derived.
  pub chroma_format: ChromaFormat,
  /// Increased internal accuracies to support high bit depths.
  pub extended_precision: bool,
  /// High precision weighted prediction.
  pub high_precision_weighting: bool,

  // conformance window
  /// How the conformance window and padding are derived.
  pub conformance_mode: ConformanceMode,
  /// Horizontal and vertical source padding, for mode 2.
  pub pad: [u32; 2],
  /// Conformance window offsets, for mode 3. Derived for modes 1 and 2.
  pub conf_win: ConformanceWindow,
  /// Coded picture width after padding. Derived.
  pub coded_width: usize,
  /// Coded picture height after padding. Derived.
  pub coded_height: usize,

  // profile, tier, level
  /// Profile name to encode with, possibly an RExt sub-profile
  /// shorthand. Shorthands decompose into the constraint fields during
  /// normalization.
  pub extended_profile: ExtendedProfile,
  /// Resolved coded profile. Derived.
  pub profile: Profile,
  /// Tier for interpretation of the level.
  pub tier: Tier,
  /// Level limit.
  pub level: Level,
  /// Bit depth constraint for RExt profiles; 0 selects automatically.
  pub bit_depth_constraint: u32,
  /// Chroma format constraint for RExt profiles; `None` selects
  /// automatically.
  pub chroma_format_constraint: Option<ChromaFormat>,
  /// Value of `general_intra_constraint_flag` for RExt profiles.
  pub intra_constraint: bool,
  /// Value of `general_lower_bit_rate_constraint_flag`.
  pub lower_bit_rate_constraint: bool,

  // unit definition
  /// Maximum CU width. Must be a power of two.
  pub max_cu_width: u32,
  /// Maximum CU height. Must be a power of two.
  pub max_cu_height: u32,
  /// CU partitioning depth.
  pub max_cu_depth: u32,
  /// Maximum TU size in log2.
  pub tu_log2_max_size: u32,
  /// Minimum TU size in log2.
  pub tu_log2_min_size: u32,
  /// Depth of the TU tree for intra CUs.
  pub tu_max_depth_intra: u32,
  /// Depth of the TU tree for inter CUs.
  pub tu_max_depth_inter: u32,

  // coding structure
  /// Intra period in frames; -1 codes only the first frame intra.
  pub intra_period: i32,
  /// Intra refresh type: 0 none, 1 CRA, 2 IDR, 3 recovery point SEI.
  pub decoding_refresh_type: u32,
  /// GOP size of the temporal structure.
  pub gop_size: usize,
  /// GOP template, one entry per frame in coding order. Entries past
  /// `gop_size` are synthesized during expansion.
  pub gop: Vec<GopEntry>,

  // motion search
  /// Motion search mode: 0 full, 1 diamond, 2 PMVFAST.
  pub fast_search: u32,
  /// Motion search range.
  pub search_range: i32,
  /// Motion search range for bipred refinement.
  pub bipred_search_range: i32,
  /// Hadamard ME for fractional-pel.
  pub hadamard_me: bool,
  /// Adaptive motion search range.
  pub adaptive_search_range: bool,

  // quantization
  /// Base QP.
  pub qp: i32,
  /// Maximum dQP offset for blocks.
  pub max_delta_qp: u32,
  /// Maximum dQP offset for slice-level multi-QP optimization.
  pub delta_qp_rd: u32,
  /// Maximum depth for a minimum CU dQP.
  pub max_cu_dqp_depth: u32,
  /// Chroma Cb QP offset.
  pub cb_qp_offset: i32,
  /// Chroma Cr QP offset.
  pub cr_qp_offset: i32,
  /// Maximum depth for CU chroma QP adjustment; negative disables.
  pub chroma_qp_adjustment_depth: i32,
  /// QP adaptation based on a psycho-visual model.
  pub adaptive_qp: bool,
  /// QP adaptation range.
  pub qp_adaptation_range: i32,
  /// Adaptive QP selection.
  pub adaptive_qp_select: bool,
  /// Rate-distortion optimized quantization.
  pub rdoq: bool,
  /// RDOQ for transform skipped blocks.
  pub rdoq_ts: bool,
  /// RD penalty for 32x32 intra TUs in non-intra slices: 0 disabled,
  /// 1 penalty, 2 maximum penalty.
  pub rd_penalty: u32,

  // deblocking filter
  /// Disable the deblocking filter.
  pub loop_filter_disable: bool,
  /// Signal the deblocking offsets in the PPS.
  pub loop_filter_offset_in_pps: bool,
  /// Deblocking beta offset (div 2).
  pub loop_filter_beta_offset_div2: i32,
  /// Deblocking tc offset (div 2).
  pub loop_filter_tc_offset_div2: i32,
  /// Signal deblocking filter control parameters.
  pub deblocking_control_present: bool,

  // coding tools
  /// Asymmetric motion partitions.
  pub amp: bool,
  /// Cross-component prediction (4:4:4 only).
  pub cross_component_prediction: bool,
  /// Use the reconstructed residual for the cross-component alpha
  /// estimate.
  pub recon_based_cross_component_estimate: bool,
  /// Sample adaptive offset filter.
  pub sao: bool,
  /// Luma SAO offset bit shift; negative selects a value derived from
  /// the bit depth and QP.
  pub sao_luma_offset_bit_shift: i32,
  /// Chroma SAO offset bit shift; negative selects a derived value.
  pub sao_chroma_offset_bit_shift: i32,
  /// Intra transform skipping.
  pub transform_skip: bool,
  /// Fast intra transform skipping.
  pub transform_skip_fast: bool,
  /// Maximum transform-skip size in log2. Values other than 2 are an
  /// RExt tool.
  pub transform_skip_log2_max_size: u32,
  /// Implicitly signalled residual DPCM for intra.
  pub implicit_rdpcm: bool,
  /// Explicitly signalled residual DPCM for inter.
  pub explicit_rdpcm: bool,
  /// Rotation of transform-skipped TUs prior to entropy coding.
  pub residual_rotation: bool,
  /// Single significance map context for transform-skipped TUs.
  pub single_significance_map_context: bool,
  /// Adaptation of the Golomb-Rice parameter over each slice.
  pub golomb_rice_adaptation: bool,
  /// Align the CABAC engine prior to bypass data. High-throughput
  /// profile only.
  pub align_cabac_before_bypass: bool,
  /// Intra reference sample smoothing.
  pub intra_reference_smoothing: bool,
  /// Strong intra smoothing for 32x32 blocks.
  pub strong_intra_smoothing: bool,
  /// Constrained intra prediction.
  pub constrained_intra_prediction: bool,
  /// PCM sample bypass coding.
  pub pcm: bool,
  /// Maximum PCM block size in log2.
  pub pcm_log2_max_size: u32,
  /// Minimum PCM block size in log2.
  pub pcm_log2_min_size: u32,
  /// Code PCM samples at the input bit depth rather than internal.
  pub pcm_input_bit_depth: bool,
  /// Disable loop filtering of PCM blocks.
  pub pcm_filter_disable: bool,
  /// Weighted prediction in P slices.
  pub weighted_pred_p: bool,
  /// Weighted bi-prediction in B slices.
  pub weighted_pred_b: bool,
  /// Parallel merge estimation region in log2.
  pub log2_parallel_merge_level: u32,
  /// Sign bit hiding.
  pub sign_hiding: bool,
  /// Maximum number of merge candidates.
  pub max_num_merge_cand: u32,
  /// TMVP mode: 0 disabled, 1 enabled, 2 enabled for certain slices.
  pub tmvp_mode: u32,
  /// Signal `transquant_bypass_enable_flag` in the PPS.
  pub transquant_bypass_enable: bool,
  /// Force transquant bypass mode on every CU.
  pub transquant_bypass_force: bool,
  /// Cost function for mode decision.
  pub cost_mode: CostMode,

  // slices, tiles, wavefront
  /// Slice mode: 0 disabled, 1 max CTUs, 2 max bytes, 3 tiles.
  pub slice_mode: u32,
  /// Argument of the selected slice mode.
  pub slice_argument: u32,
  /// Slice segment mode: 0 disabled, 1 max CTUs, 2 max bytes, 3 tiles.
  pub slice_segment_mode: u32,
  /// Argument of the selected slice segment mode.
  pub slice_segment_argument: u32,
  /// Distribute tile boundaries uniformly.
  pub uniform_tile_spacing: bool,
  /// Number of tile columns, minus 1.
  pub num_tile_columns_minus1: usize,
  /// Tile column widths in CTUs, for non-uniform spacing.
  pub tile_column_widths: Vec<u32>,
  /// Number of tile rows, minus 1.
  pub num_tile_rows_minus1: usize,
  /// Tile row heights in CTUs, for non-uniform spacing.
  pub tile_row_heights: Vec<u32>,
  /// Loop filtering across tile boundaries.
  pub loop_filter_across_tiles: bool,
  /// Loop filtering across slice boundaries.
  pub loop_filter_across_slices: bool,
  /// Wavefront parallel processing synchronization.
  pub wavefront_synchro: i32,
  /// Number of wavefront substreams. Derived.
  pub wavefront_substreams: usize,

  // SEI messages
  /// Decoded picture hash SEI type.
  pub decoded_picture_hash: DecodedPictureHash,
  /// Recovery point SEI messages.
  pub recovery_point_sei: bool,
  /// Tone mapping SEI parameters.
  pub tone_mapping: Option<ToneMapping>,
  /// Knee function SEI parameters.
  pub knee_function: Option<KneeFunction>,
  /// Mastering display colour volume SEI parameters.
  pub mastering_display: Option<MasteringDisplay>,
  /// Frame packing arrangement SEI parameters.
  pub frame_packing: Option<FramePacking>,
  /// Temporal motion-constrained tile sets SEI message.
  pub tmcts_sei: bool,
}

impl Default for EncoderConfig {
  fn default() -> Self {
    EncoderConfig {
      width: 0,
      height: 0,
      frame_rate: 0,
      frame_skip: 0,
      frames_to_encode: 0,
      field_coding: false,
      top_field_first: false,

      input_bit_depth: BitDepths::new(8, 0),
      msb_extended_bit_depth: BitDepths::new(0, 0),
      internal_bit_depth: BitDepths::new(0, 0),
      output_bit_depth: BitDepths::new(0, 0),
      input_chroma_format: ChromaFormat::Cf420,
      chroma_format_override: None,
      chroma_format: ChromaFormat::Cf420,
      extended_precision: false,
      high_precision_weighting: false,

      conformance_mode: ConformanceMode::Disabled,
      pad: [0, 0],
      conf_win: ConformanceWindow::default(),
      coded_width: 0,
      coded_height: 0,

      extended_profile: ExtendedProfile::default(),
      profile: Profile::None,
      tier: Tier::Main,
      level: Level::None,
      bit_depth_constraint: 0,
      chroma_format_constraint: None,
      intra_constraint: false,
      lower_bit_rate_constraint: true,

      max_cu_width: 64,
      max_cu_height: 64,
      max_cu_depth: 4,
      tu_log2_max_size: 5,
      tu_log2_min_size: 2,
      tu_max_depth_intra: 1,
      tu_max_depth_inter: 2,

      intra_period: -1,
      decoding_refresh_type: 0,
      gop_size: 1,
      gop: Vec::new(),

      fast_search: 1,
      search_range: 96,
      bipred_search_range: 4,
      hadamard_me: true,
      adaptive_search_range: false,

      qp: 30,
      max_delta_qp: 0,
      delta_qp_rd: 0,
      max_cu_dqp_depth: 0,
      cb_qp_offset: 0,
      cr_qp_offset: 0,
      chroma_qp_adjustment_depth: -1,
      adaptive_qp: false,
      qp_adaptation_range: 6,
      adaptive_qp_select: false,
      rdoq: true,
      rdoq_ts: true,
      rd_penalty: 0,

      loop_filter_disable: false,
      loop_filter_offset_in_pps: false,
      loop_filter_beta_offset_div2: 0,
      loop_filter_tc_offset_div2: 0,
      deblocking_control_present: false,

      amp: true,
      cross_component_prediction: false,
      recon_based_cross_component_estimate: false,
      sao: true,
      sao_luma_offset_bit_shift: 0,
      sao_chroma_offset_bit_shift: 0,
      transform_skip: false,
      transform_skip_fast: false,
      transform_skip_log2_max_size: 2,
      implicit_rdpcm: false,
      explicit_rdpcm: false,
      residual_rotation: false,
      single_significance_map_context: false,
      golomb_rice_adaptation: false,
      align_cabac_before_bypass: false,
      intra_reference_smoothing: true,
      strong_intra_smoothing: true,
      constrained_intra_prediction: false,
      pcm: false,
      pcm_log2_max_size: 5,
      pcm_log2_min_size: 3,
      pcm_input_bit_depth: true,
      pcm_filter_disable: false,
      weighted_pred_p: false,
      weighted_pred_b: false,
      log2_parallel_merge_level: 2,
      sign_hiding: true,
      max_num_merge_cand: 5,
      tmvp_mode: 1,
      transquant_bypass_enable: false,
      transquant_bypass_force: false,
      cost_mode: CostMode::Lossy,

      slice_mode: 0,
      slice_argument: 0,
      slice_segment_mode: 0,
      slice_segment_argument: 0,
      uniform_tile_spacing: false,
      num_tile_columns_minus1: 0,
      tile_column_widths: Vec::new(),
      num_tile_rows_minus1: 0,
      tile_row_heights: Vec::new(),
      loop_filter_across_tiles: true,
      loop_filter_across_slices: true,
      wavefront_synchro: 0,
      wavefront_substreams: 1,

      decoded_picture_hash: DecodedPictureHash::None,
      recovery_point_sei: false,
      tone_mapping: None,
      knee_function: None,
      mastering_display: None,
      frame_packing: None,
      tmcts_sei: false,
    }
  }
}

impl EncoderConfig {
  /// Source height of a single coded picture; halved for field coding.
  pub fn source_height(&self) -> usize {
    if self.field_coding {
      self.height >> 1
    } else {
      self.height
    }
  }

  /// Minimum CU size implied by the partitioning parameters.
  pub fn min_cu_size(&self) -> u32 {
    self.max_cu_height >> self.max_cu_depth.saturating_sub(1)
  }

  /// The larger internal bit depth across the coded channels.
  pub fn max_internal_bit_depth(&self) -> u32 {
    if self.chroma_format == ChromaFormat::Cf400 {
      self.internal_bit_depth.luma
    } else {
      self.internal_bit_depth.max()
    }
  }

  /// Whether any of the general RExt tools is in use.
  pub fn uses_general_rext_tools(&self) -> bool {
    self.residual_rotation
      || self.single_significance_map_context
      || self.implicit_rdpcm
      || self.explicit_rdpcm
      || !self.intra_reference_smoothing
      || self.golomb_rice_adaptation
      || self.transform_skip_log2_max_size != 2
  }

  /// Whether the CU chroma QP adjustment tool is in use.
  pub fn uses_chroma_qp_adjustment(&self) -> bool {
    self.chroma_qp_adjustment_depth >= 0
  }
}

impl fmt::Display for EncoderConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    let pairs = [
      (
        "format",
        format!(
          "{}x{} {}Hz {}",
          self.coded_width, self.coded_height, self.frame_rate,
          self.chroma_format
        ),
      ),
      ("profile", self.profile.to_string()),
      ("tier", format!("{:?}", self.tier).to_lowercase()),
      ("level", self.level.to_string()),
      (
        "cu_size/depth",
        format!("{}/{}", self.max_cu_width, self.max_cu_depth),
      ),
      (
        "tu_size",
        format!(
          "{}..{}",
          1 << self.tu_log2_min_size,
          1 << self.tu_log2_max_size
        ),
      ),
      ("intra_period", self.intra_period.to_string()),
      ("gop_size", self.gop_size.to_string()),
      ("qp", self.qp.to_string()),
      ("input_bit_depth", self.input_bit_depth.to_string()),
      ("internal_bit_depth", self.internal_bit_depth.to_string()),
      ("cost_mode", self.cost_mode.to_string()),
      ("sao", self.sao.to_string()),
      ("pcm", self.pcm.to_string()),
      ("transform_skip", self.transform_skip.to_string()),
      ("amp", self.amp.to_string()),
      ("wpp", self.weighted_pred_p.to_string()),
      ("wpb", self.weighted_pred_b.to_string()),
      ("sign_hiding", self.sign_hiding.to_string()),
      ("tmvp", self.tmvp_mode.to_string()),
      ("wavefront", self.wavefront_synchro.to_string()),
      (
        "extended_precision",
        self.extended_precision.to_string(),
      ),
    ];
    write!(
      f,
      "{}",
      pairs.iter().map(|pair| format!("{}={}", pair.0, pair.1)).join(" ")
    )
  }
}
