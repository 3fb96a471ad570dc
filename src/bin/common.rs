// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use clap::{ArgAction, Parser};
use num_traits::FromPrimitive;
use rhevce::prelude::*;

use crate::error::{CliError, ToError};

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Accepts the `0`/`1` flag values used by HM-style configuration
/// files alongside `true`/`false`.
fn boolish(s: &str) -> Result<bool, String> {
  match s {
    "1" | "true" => Ok(true),
    "0" | "false" => Ok(false),
    _ => Err(format!("`{s}` is not a boolean (expected 0, 1, true or false)")),
  }
}

#[derive(Parser, Debug)]
#[command(
  name = "rhevce",
  version,
  about = "HEVC (H.265) video encoder",
  args_override_self = true,
  arg_required_else_help = true
)]
pub struct CliOptions {
  /// Configuration file of `Key: value` lines; may be given more than
  /// once. Command-line flags take precedence.
  #[arg(short = 'c', long, value_name = "FILE")]
  pub config: Vec<PathBuf>,
  /// File holding one GOP template entry per line, replacing the
  /// FrameN entries of the configuration file.
  #[arg(long, value_name = "FILE")]
  pub gop_file: Option<PathBuf>,

  // Source parameters.
  /// Source picture width
  #[arg(long, value_name = "PIXELS", default_value_t = 0)]
  pub source_width: usize,
  /// Source picture height
  #[arg(long, value_name = "PIXELS", default_value_t = 0)]
  pub source_height: usize,
  /// Frame rate
  #[arg(long, default_value_t = 0)]
  pub frame_rate: u32,
  /// Number of frames to skip at start of input
  #[arg(long, default_value_t = 0)]
  pub frame_skip: u32,
  /// Number of frames to be encoded
  #[arg(long, default_value_t = 0)]
  pub frames_to_be_encoded: usize,
  /// Field-based coding
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub field_coding: bool,
  /// Top field first, for field-based coding
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub top_field_first: bool,

  /// Bit depth of the input file
  #[arg(long, default_value_t = 8)]
  pub input_bit_depth: u32,
  /// As per input-bit-depth but for the chroma component
  #[arg(long, default_value_t = 0)]
  pub input_bit_depth_c: u32,
  /// Bit depth after addition of MSBs of value 0
  #[arg(long, default_value_t = 0)]
  pub msb_extended_bit_depth: u32,
  /// As per msb-extended-bit-depth but for the chroma component
  #[arg(long, default_value_t = 0)]
  pub msb_extended_bit_depth_c: u32,
  /// Bit depth the codec operates at
  #[arg(long, default_value_t = 0)]
  pub internal_bit_depth: u32,
  /// As per internal-bit-depth but for the chroma component
  #[arg(long, default_value_t = 0)]
  pub internal_bit_depth_c: u32,
  /// Bit depth of the output file
  #[arg(long, default_value_t = 0)]
  pub output_bit_depth: u32,
  /// As per output-bit-depth but for the chroma component
  #[arg(long, default_value_t = 0)]
  pub output_bit_depth_c: u32,
  /// Input chroma format (400, 420, 422, 444)
  #[arg(long, default_value_t = 420)]
  pub input_chroma_format: u32,
  /// Coded chroma format, or 0 for same as the input chroma format
  #[arg(long, default_value_t = 0)]
  pub chroma_format_idc: u32,
  /// Increased internal accuracies for high bit depths
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub extended_precision: bool,
  /// High precision weighted prediction
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub high_precision_prediction_weighting: bool,

  /// Window conformance mode (0: none, 1: automatic padding,
  /// 2: padding, 3: conformance window)
  #[arg(long, default_value_t = 0)]
  pub conformance_mode: u32,
  /// Horizontal source padding for conformance mode 2
  #[arg(long, default_value_t = 0)]
  pub horizontal_padding: u32,
  /// Vertical source padding for conformance mode 2
  #[arg(long, default_value_t = 0)]
  pub vertical_padding: u32,
  /// Left offset for conformance mode 3
  #[arg(long, default_value_t = 0)]
  pub conf_left: u32,
  /// Right offset for conformance mode 3
  #[arg(long, default_value_t = 0)]
  pub conf_right: u32,
  /// Top offset for conformance mode 3
  #[arg(long, default_value_t = 0)]
  pub conf_top: u32,
  /// Bottom offset for conformance mode 3
  #[arg(long, default_value_t = 0)]
  pub conf_bottom: u32,

  // Profile, tier, level.
  /// Profile name, or an RExt sub-profile shorthand such as main_444_10
  #[arg(long, default_value = "none")]
  pub profile: String,
  /// Level limit, e.g. 5.1, or none
  #[arg(long, default_value = "none")]
  pub level: String,
  /// Tier used for interpretation of the level (main or high)
  #[arg(long, default_value = "main")]
  pub tier: String,
  /// Bit depth constraint for RExt profiles; 0 chooses automatically
  #[arg(long, default_value_t = 0)]
  pub max_bit_depth_constraint: u32,
  /// Chroma format constraint for RExt profiles; 0 chooses automatically
  #[arg(long, default_value_t = 0)]
  pub max_chroma_format_constraint: u32,
  /// Value of general_intra_constraint_flag for RExt profiles
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub intra_constraint_flag: bool,
  /// Value of general_lower_bit_rate_constraint_flag for RExt profiles
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub lower_bit_rate_constraint_flag: bool,

  // Unit definition.
  /// Maximum CU width
  #[arg(long, default_value_t = 64)]
  pub max_cu_width: u32,
  /// Maximum CU height
  #[arg(long, default_value_t = 64)]
  pub max_cu_height: u32,
  /// Maximum CU size, overriding both width and height when nonzero
  #[arg(long, short = 's', default_value_t = 0)]
  pub max_cu_size: u32,
  /// CU partitioning depth
  #[arg(long, default_value_t = 4)]
  pub max_partition_depth: u32,
  /// Maximum TU size in log2
  #[arg(long, default_value_t = 5)]
  pub quadtree_tu_log2_max_size: u32,
  /// Minimum TU size in log2
  #[arg(long, default_value_t = 2)]
  pub quadtree_tu_log2_min_size: u32,
  /// Depth of the TU tree for intra CUs
  #[arg(long, default_value_t = 1)]
  pub quadtree_tu_max_depth_intra: u32,
  /// Depth of the TU tree for inter CUs
  #[arg(long, default_value_t = 2)]
  pub quadtree_tu_max_depth_inter: u32,

  // Coding structure.
  /// Intra period in frames (-1: only the first frame)
  #[arg(long, allow_hyphen_values = true, default_value_t = -1)]
  pub intra_period: i32,
  /// Intra refresh type (0: none, 1: CRA, 2: IDR, 3: recovery point SEI)
  #[arg(long, default_value_t = 0)]
  pub decoding_refresh_type: u32,
  /// GOP size of the temporal structure
  #[arg(long, short = 'g', default_value_t = 1)]
  pub gop_size: usize,

  // Motion search.
  /// Motion search mode (0: full, 1: diamond, 2: PMVFAST)
  #[arg(long, default_value_t = 1)]
  pub fast_search: u32,
  /// Motion search range
  #[arg(long, default_value_t = 96)]
  pub search_range: i32,
  /// Motion search range for bipred refinement
  #[arg(long, default_value_t = 4)]
  pub bipred_search_range: i32,
  /// Hadamard ME for fractional-pel
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub hadamard_me: bool,
  /// Adaptive motion search range
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub asr: bool,

  // Quantization.
  /// Base QP
  #[arg(long, short = 'q', allow_hyphen_values = true, default_value_t = 30)]
  pub qp: i32,
  /// Maximum dQP offset for blocks
  #[arg(long, default_value_t = 0)]
  pub max_delta_qp: u32,
  /// Maximum dQP offset for slice-level multi-QP optimization
  #[arg(long, default_value_t = 0)]
  pub delta_qp_rd: u32,
  /// Maximum depth for a minimum CU dQP
  #[arg(long, default_value_t = 0)]
  pub max_cu_dqp_depth: u32,
  /// Chroma Cb QP offset
  #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
  pub cb_qp_offset: i32,
  /// Chroma Cr QP offset
  #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
  pub cr_qp_offset: i32,
  /// Maximum depth for CU chroma QP adjustment; negative disables
  #[arg(long, allow_hyphen_values = true, default_value_t = -1)]
  pub max_cu_chroma_qp_adjustment_depth: i32,
  /// QP adaptation based on a psycho-visual model
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub adaptive_qp: bool,
  /// QP adaptation range
  #[arg(long, default_value_t = 6)]
  pub max_qp_adaptation_range: i32,
  /// Adaptive QP selection
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub adaptive_qp_selection: bool,
  /// Rate-distortion optimized quantization
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub rdoq: bool,
  /// RDOQ for transform skipped blocks
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub rdoqts: bool,
  /// RD penalty for 32x32 intra TUs in non-intra slices (0..2)
  #[arg(long, default_value_t = 0)]
  pub rd_penalty: u32,

  // Deblocking filter.
  /// Disable the deblocking filter
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub loop_filter_disable: bool,
  /// Signal the deblocking offsets in the PPS
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub loop_filter_offset_in_pps: bool,
  /// Deblocking beta offset (div 2)
  #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
  pub loop_filter_beta_offset_div2: i32,
  /// Deblocking tc offset (div 2)
  #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
  pub loop_filter_tc_offset_div2: i32,
  /// Signal deblocking filter control parameters
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub deblocking_filter_control_present: bool,

  // Coding tools.
  /// Asymmetric motion partitions
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub amp: bool,
  /// Cross-component prediction (4:4:4 only, RExt)
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub cross_component_prediction: bool,
  /// Sample adaptive offset filter
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub sao: bool,
  /// Luma SAO offset bit shift; negative derives one from depth and QP
  #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
  pub sao_luma_offset_bit_shift: i32,
  /// Chroma SAO offset bit shift; negative derives one from depth and QP
  #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
  pub sao_chroma_offset_bit_shift: i32,
  /// Intra transform skipping
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub transform_skip: bool,
  /// Fast intra transform skipping
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub transform_skip_fast: bool,
  /// Maximum transform-skip size in log2 (RExt when not 2)
  #[arg(long, default_value_t = 2)]
  pub transform_skip_log2_max_size: u32,
  /// Implicitly signalled residual DPCM for intra (RExt)
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub implicit_residual_dpcm: bool,
  /// Explicitly signalled residual DPCM for inter (RExt)
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub explicit_residual_dpcm: bool,
  /// Rotation of transform-skipped TUs (RExt)
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub residual_rotation: bool,
  /// Single significance map context for transform-skipped TUs (RExt)
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub single_significance_map_context: bool,
  /// Golomb-Rice parameter adaptation over each slice (RExt)
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub golomb_rice_parameter_adaptation: bool,
  /// CABAC bypass alignment (high-throughput RExt profile only)
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub align_cabac_before_bypass: bool,
  /// Intra reference sample smoothing
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub intra_reference_smoothing: bool,
  /// Strong intra smoothing for 32x32 blocks
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub strong_intra_smoothing: bool,
  /// Constrained intra prediction
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub constrained_intra_pred: bool,
  /// PCM sample bypass coding
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub pcm_enabled_flag: bool,
  /// Maximum PCM block size in log2
  #[arg(long, default_value_t = 5)]
  pub pcm_log2_max_size: u32,
  /// Minimum PCM block size in log2
  #[arg(long, default_value_t = 3)]
  pub pcm_log2_min_size: u32,
  /// Code PCM samples at the input bit depth rather than internal
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub pcm_input_bit_depth_flag: bool,
  /// Disable loop filtering of PCM blocks
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub pcm_filter_disable_flag: bool,
  /// Weighted prediction in P slices
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub weighted_pred_p: bool,
  /// Weighted bi-prediction in B slices
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub weighted_pred_b: bool,
  /// Parallel merge estimation region in log2
  #[arg(long, default_value_t = 2)]
  pub log2_parallel_merge_level: u32,
  /// Sign bit hiding
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub sign_hide_flag: bool,
  /// Maximum number of merge candidates
  #[arg(long, default_value_t = 5)]
  pub max_num_merge_cand: u32,
  /// TMVP mode (0: disabled, 1: enabled, 2: certain slices only)
  #[arg(long, default_value_t = 1)]
  pub tmvp_mode: u32,
  /// Signal transquant_bypass_enable_flag in the PPS
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub transquant_bypass_enable_flag: bool,
  /// Force transquant bypass mode on every CU
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub cu_transquant_bypass_flag_force: bool,
  /// Cost function: lossy, sequence_level_lossless, lossless or
  /// mixed_lossless_lossy
  #[arg(long, default_value = "lossy")]
  pub cost_mode: String,

  // Slices, tiles, wavefront.
  /// Slice mode (0: disabled, 1: max CTUs, 2: max bytes, 3: tiles)
  #[arg(long, default_value_t = 0)]
  pub slice_mode: u32,
  /// Argument of the selected slice mode
  #[arg(long, default_value_t = 0)]
  pub slice_argument: u32,
  /// Slice segment mode (0: disabled, 1: max CTUs, 2: max bytes, 3: tiles)
  #[arg(long, default_value_t = 0)]
  pub slice_segment_mode: u32,
  /// Argument of the selected slice segment mode
  #[arg(long, default_value_t = 0)]
  pub slice_segment_argument: u32,
  /// Distribute tile boundaries uniformly
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub uniform_spacing_idc: bool,
  /// Number of tile columns minus 1
  #[arg(long, default_value_t = 0)]
  pub num_tile_columns_minus1: usize,
  /// Tile column widths in CTUs, as a delimited list
  #[arg(long, default_value = "")]
  pub column_width_array: String,
  /// Number of tile rows minus 1
  #[arg(long, default_value_t = 0)]
  pub num_tile_rows_minus1: usize,
  /// Tile row heights in CTUs, as a delimited list
  #[arg(long, default_value = "")]
  pub row_height_array: String,
  /// Loop filtering across tile boundaries
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub lf_cross_tile_boundary_flag: bool,
  /// Loop filtering across slice boundaries
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub lf_cross_slice_boundary_flag: bool,
  /// Wavefront parallel processing synchronization
  #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
  pub wave_front_synchro: i32,

  // Rate control.
  /// Enable rate control
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub rate_control: bool,
  /// Rate control target bitrate
  #[arg(long, default_value_t = 0)]
  pub target_bitrate: i32,
  /// Bit allocation (0: equal, 1: fixed ratio, 2: adaptive ratio)
  #[arg(long, default_value_t = 0)]
  pub keep_hierarchical_bit: u32,
  /// CTU-level rate control
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub lcu_level_rate_control: bool,
  /// Separate R-lambda model per CTU
  #[arg(long, value_parser = boolish, default_value_t = true, action = ArgAction::Set)]
  pub rclcu_separate_model: bool,
  /// Rate control initial QP, or 0 to estimate one
  #[arg(long, default_value_t = 0)]
  pub initial_qp: i32,
  /// Force intra frames to the initial QP
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub rc_force_intra_qp: bool,

  // SEI messages.
  /// Decoded picture hash SEI (0: none, 1: MD5, 2: CRC, 3: checksum)
  #[arg(long, default_value_t = 0)]
  pub sei_decoded_picture_hash: u32,
  /// Recovery point SEI messages
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub sei_recovery_point: bool,
  /// Tone mapping SEI messages
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub sei_tone_mapping_info: bool,
  /// Tone mapping model (0: linear, 1: sigmoid, 2: table, 3: piece-wise
  /// linear, 4: luminance range)
  #[arg(long, default_value_t = 0)]
  pub sei_tone_map_model_id: u32,
  /// Tone mapping coded data bit depth
  #[arg(long, default_value_t = 8)]
  pub sei_tone_map_coded_data_bit_depth: u32,
  /// Tone mapping target bit depth
  #[arg(long, default_value_t = 8)]
  pub sei_tone_map_target_bit_depth: u32,
  /// Minimum value in tone mapping model 0
  #[arg(long, default_value_t = 0)]
  pub sei_tone_map_min_value: u32,
  /// Maximum value in tone mapping model 0
  #[arg(long, default_value_t = 1023)]
  pub sei_tone_map_max_value: u32,
  /// Centre point in tone mapping model 1
  #[arg(long, default_value_t = 512)]
  pub sei_tone_map_sigmoid_midpoint: u32,
  /// Sigmoid width in tone mapping model 1
  #[arg(long, default_value_t = 960)]
  pub sei_tone_map_sigmoid_width: u32,
  /// User-defined mapping table for tone mapping model 2
  #[arg(long, default_value = "")]
  pub sei_tone_map_start_of_coded_interval: String,
  /// Number of pivot points in tone mapping model 3
  #[arg(long, default_value_t = 0)]
  pub sei_tone_map_num_pivots: usize,
  /// Coded pivot values for tone mapping model 3
  #[arg(long, default_value = "")]
  pub sei_tone_map_coded_pivot_value: String,
  /// Target pivot values for tone mapping model 3
  #[arg(long, default_value = "")]
  pub sei_tone_map_target_pivot_value: String,
  /// Camera ISO speed for daylight illumination
  #[arg(long, default_value_t = 400)]
  pub sei_tone_map_camera_iso_speed_value: u32,
  /// Exposure index setting of the camera
  #[arg(long, default_value_t = 400)]
  pub sei_tone_map_exposure_index_value: u32,
  /// Luminance dynamic range of the extended range model
  #[arg(long, default_value_t = 800)]
  pub sei_tone_map_extended_range_white_level: u32,
  /// Luma sample value of the nominal black level
  #[arg(long, default_value_t = 16)]
  pub sei_tone_map_nominal_black_level_luma_code_value: u32,
  /// Luma sample value of the nominal white level
  #[arg(long, default_value_t = 235)]
  pub sei_tone_map_nominal_white_level_luma_code_value: u32,
  /// Luma sample value of the extended dynamic range
  #[arg(long, default_value_t = 300)]
  pub sei_tone_map_extended_white_level_luma_code_value: u32,
  /// Knee function SEI messages
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub sei_knee_function_info: bool,
  /// Input knee points, as a delimited list
  #[arg(long, default_value = "600 800 900")]
  pub sei_knee_function_input_knee_point_value: String,
  /// Output knee points, as a delimited list
  #[arg(long, default_value = "100 250 450")]
  pub sei_knee_function_output_knee_point_value: String,
  /// Mastering display colour volume SEI messages
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub sei_mastering_display_colour_volume: bool,
  /// Mastering display GBR primaries, six values in 1/50000 increments
  #[arg(long, default_value = "0 50000 0 0 50000 0")]
  pub sei_mastering_display_primaries: String,
  /// Mastering display white point, two values in 1/50000 increments
  #[arg(long, default_value = "16667 16667")]
  pub sei_mastering_display_white_point: String,
  /// Mastering display maximum luminance in 1/10000 cd/m2
  #[arg(long, default_value_t = 10000)]
  pub sei_mastering_display_max_luminance: u32,
  /// Mastering display minimum luminance in 1/10000 cd/m2
  #[arg(long, default_value_t = 0)]
  pub sei_mastering_display_min_luminance: u32,
  /// Frame packing SEI messages
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub sei_frame_packing: bool,
  /// Frame packing arrangement type (3, 4 or 5)
  #[arg(long, default_value_t = 3)]
  pub sei_frame_packing_type: u32,
  /// Frame packing SEI id
  #[arg(long, default_value_t = 0)]
  pub sei_frame_packing_id: u32,
  /// Quincunx sampling flag
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub sei_frame_packing_quincunx: bool,
  /// Interpretation of the frame pair
  #[arg(long, default_value_t = 0)]
  pub sei_frame_packing_interpretation: u32,
  /// Temporal motion-constrained tile sets SEI message
  #[arg(long, value_parser = boolish, default_value_t = false, action = ArgAction::Set)]
  pub sei_temp_motion_constrained_tile_sets: bool,
}

/// Reads an HM-style `Key: value` configuration file and translates it
/// into long command-line flags understood by the same parser, plus the
/// GOP template lines carried by `FrameN` keys.
fn read_config_file(
  path: &std::path::Path,
) -> Result<(Vec<OsString>, Vec<(usize, String)>), CliError> {
  let text = fs::read_to_string(path).map_err(|e| {
    e.context(&format!("Unable to read config file `{}`", path.display()))
  })?;

  let mut args = Vec::new();
  let mut frames = Vec::new();
  for line in text.lines() {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
      continue;
    }
    let Some((key, value)) = line.split_once(':') else {
      return Err(CliError::new(&format!(
        "Malformed config line `{line}` (expected `Key: value`)"
      )));
    };
    let key = key.trim();
    let value = value.trim();
    if let Some(n) = key.strip_prefix("Frame") {
      if let Ok(n) = n.parse::<usize>() {
        frames.push((n, value.to_owned()));
        continue;
      }
    }
    // File I/O is handled by the source reader and muxer, not the
    // configuration layer.
    const IO_KEYS: [&str; 5] =
      ["InputFile", "BitstreamFile", "ReconFile", "dQPFile", "ScalingListFile"];
    if IO_KEYS.contains(&key) {
      warn!("ignoring configuration key `{}`", key);
      continue;
    }
    args.push(OsString::from(format!("--{}", camel_to_kebab(key))));
    args.push(OsString::from(value));
  }
  frames.sort_by_key(|&(n, _)| n);
  Ok((args, frames))
}

/// Maps HM option names onto their command-line flag spelling, e.g.
/// `GOPSize` to `gop-size` and `LoopFilterBetaOffset_div2` to
/// `loop-filter-beta-offset-div2`.
fn camel_to_kebab(key: &str) -> String {
  let chars: Vec<char> = key.chars().collect();
  let mut out = String::new();
  for i in 0..chars.len() {
    let c = chars[i];
    if c == '_' {
      out.push('-');
      continue;
    }
    if c.is_ascii_uppercase() {
      let prev_lower = i > 0
        && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
      let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
      let next_lower =
        i + 1 < chars.len() && chars[i + 1].is_ascii_lowercase();
      if !out.is_empty()
        && !out.ends_with('-')
        && (prev_lower || (prev_upper && next_lower))
      {
        out.push('-');
      }
      out.push(c.to_ascii_lowercase());
    } else {
      out.push(c);
    }
  }
  out
}

/// Collects the config files named by `-c`/`--config` in the raw
/// argument list, ahead of clap parsing.
fn config_file_paths(raw: &[OsString]) -> Vec<PathBuf> {
  let mut paths = Vec::new();
  let mut iter = raw.iter();
  while let Some(arg) = iter.next() {
    let Some(s) = arg.to_str() else { continue };
    if s == "-c" || s == "--config" {
      if let Some(path) = iter.next() {
        paths.push(PathBuf::from(path));
      }
    } else if let Some(path) = s.strip_prefix("--config=") {
      paths.push(PathBuf::from(path));
    }
  }
  paths
}

pub fn parse_cli() -> Result<Config, CliError> {
  let mut raw: Vec<OsString> = std::env::args_os().collect();

  // Expand config files ahead of the command-line flags, so the
  // command line takes precedence.
  let mut file_args = Vec::new();
  let mut file_frames = Vec::new();
  for path in config_file_paths(&raw[1..]) {
    let (args, frames) = read_config_file(&path)?;
    file_args.extend(args);
    file_frames.extend(frames);
  }

  let mut full = Vec::with_capacity(1 + file_args.len() + raw.len());
  full.push(raw.remove(0));
  full.extend(file_args);
  full.extend(raw);

  let cli = CliOptions::parse_from(full);
  build_config(cli, file_frames)
}

fn build_config(
  cli: CliOptions, file_frames: Vec<(usize, String)>,
) -> Result<Config, CliError> {
  let mut enc = EncoderConfig::default();

  enc.width = cli.source_width;
  enc.height = cli.source_height;
  enc.frame_rate = cli.frame_rate;
  enc.frame_skip = cli.frame_skip;
  enc.frames_to_encode = cli.frames_to_be_encoded;
  enc.field_coding = cli.field_coding;
  enc.top_field_first = cli.top_field_first;
  if enc.field_coding {
    // Two fields are coded per source frame.
    enc.frames_to_encode *= 2;
  }

  enc.input_bit_depth =
    BitDepths::new(cli.input_bit_depth, cli.input_bit_depth_c);
  enc.msb_extended_bit_depth =
    BitDepths::new(cli.msb_extended_bit_depth, cli.msb_extended_bit_depth_c);
  enc.internal_bit_depth =
    BitDepths::new(cli.internal_bit_depth, cli.internal_bit_depth_c);
  enc.output_bit_depth =
    BitDepths::new(cli.output_bit_depth, cli.output_bit_depth_c);
  enc.input_chroma_format = ChromaFormat::from_idc(cli.input_chroma_format)
    .ok_or_else(|| {
      CliError::invalid_value("InputChromaFormat", cli.input_chroma_format)
    })?;
  enc.chroma_format_override = match cli.chroma_format_idc {
    0 => None,
    idc => Some(ChromaFormat::from_idc(idc).ok_or_else(|| {
      CliError::invalid_value("ChromaFormatIDC", idc)
    })?),
  };
  enc.extended_precision = cli.extended_precision;
  enc.high_precision_weighting = cli.high_precision_prediction_weighting;

  enc.conformance_mode = ConformanceMode::from_u32(cli.conformance_mode)
    .ok_or_else(|| {
      CliError::invalid_value("ConformanceMode", cli.conformance_mode)
    })?;
  enc.pad = [cli.horizontal_padding, cli.vertical_padding];
  enc.conf_win = ConformanceWindow {
    left: cli.conf_left,
    right: cli.conf_right,
    top: cli.conf_top,
    bottom: cli.conf_bottom,
  };

  enc.extended_profile = cli
    .profile
    .parse()
    .map_err(|_| CliError::invalid_value("Profile", &cli.profile))?;
  enc.level = cli
    .level
    .parse()
    .map_err(|_| CliError::invalid_value("Level", &cli.level))?;
  enc.tier = cli
    .tier
    .parse()
    .map_err(|_| CliError::invalid_value("Tier", &cli.tier))?;
  enc.bit_depth_constraint = cli.max_bit_depth_constraint;
  enc.chroma_format_constraint = match cli.max_chroma_format_constraint {
    0 => None,
    idc => Some(ChromaFormat::from_idc(idc).ok_or_else(|| {
      CliError::invalid_value("MaxChromaFormatConstraint", idc)
    })?),
  };
  enc.intra_constraint = cli.intra_constraint_flag;
  enc.lower_bit_rate_constraint = cli.lower_bit_rate_constraint_flag;

  enc.max_cu_width = cli.max_cu_width;
  enc.max_cu_height = cli.max_cu_height;
  if cli.max_cu_size != 0 {
    enc.max_cu_width = cli.max_cu_size;
    enc.max_cu_height = cli.max_cu_size;
  }
  enc.max_cu_depth = cli.max_partition_depth;
  enc.tu_log2_max_size = cli.quadtree_tu_log2_max_size;
  enc.tu_log2_min_size = cli.quadtree_tu_log2_min_size;
  enc.tu_max_depth_intra = cli.quadtree_tu_max_depth_intra;
  enc.tu_max_depth_inter = cli.quadtree_tu_max_depth_inter;

  enc.intra_period = cli.intra_period;
  enc.decoding_refresh_type = cli.decoding_refresh_type;
  enc.gop_size = cli.gop_size;

  enc.fast_search = cli.fast_search;
  enc.search_range = cli.search_range;
  enc.bipred_search_range = cli.bipred_search_range;
  enc.hadamard_me = cli.hadamard_me;
  enc.adaptive_search_range = cli.asr;

  enc.qp = cli.qp;
  enc.max_delta_qp = cli.max_delta_qp;
  enc.delta_qp_rd = cli.delta_qp_rd;
  enc.max_cu_dqp_depth = cli.max_cu_dqp_depth;
  enc.cb_qp_offset = cli.cb_qp_offset;
  enc.cr_qp_offset = cli.cr_qp_offset;
  enc.chroma_qp_adjustment_depth = cli.max_cu_chroma_qp_adjustment_depth;
  enc.adaptive_qp = cli.adaptive_qp;
  enc.qp_adaptation_range = cli.max_qp_adaptation_range;
  enc.adaptive_qp_select = cli.adaptive_qp_selection;
  enc.rdoq = cli.rdoq;
  enc.rdoq_ts = cli.rdoqts;
  enc.rd_penalty = cli.rd_penalty;

  enc.loop_filter_disable = cli.loop_filter_disable;
  enc.loop_filter_offset_in_pps = cli.loop_filter_offset_in_pps;
  enc.loop_filter_beta_offset_div2 = cli.loop_filter_beta_offset_div2;
  enc.loop_filter_tc_offset_div2 = cli.loop_filter_tc_offset_div2;
  enc.deblocking_control_present = cli.deblocking_filter_control_present;

  enc.amp = cli.amp;
  enc.cross_component_prediction = cli.cross_component_prediction;
  enc.sao = cli.sao;
  enc.sao_luma_offset_bit_shift = cli.sao_luma_offset_bit_shift;
  enc.sao_chroma_offset_bit_shift = cli.sao_chroma_offset_bit_shift;
  enc.transform_skip = cli.transform_skip;
  enc.transform_skip_fast = cli.transform_skip_fast;
  enc.transform_skip_log2_max_size = cli.transform_skip_log2_max_size;
  enc.implicit_rdpcm = cli.implicit_residual_dpcm;
  enc.explicit_rdpcm = cli.explicit_residual_dpcm;
  enc.residual_rotation = cli.residual_rotation;
  enc.single_significance_map_context = cli.single_significance_map_context;
  enc.golomb_rice_adaptation = cli.golomb_rice_parameter_adaptation;
  enc.align_cabac_before_bypass = cli.align_cabac_before_bypass;
  enc.intra_reference_smoothing = cli.intra_reference_smoothing;
  enc.strong_intra_smoothing = cli.strong_intra_smoothing;
  enc.constrained_intra_prediction = cli.constrained_intra_pred;
  enc.pcm = cli.pcm_enabled_flag;
  enc.pcm_log2_max_size = cli.pcm_log2_max_size;
  enc.pcm_log2_min_size = cli.pcm_log2_min_size;
  enc.pcm_input_bit_depth = cli.pcm_input_bit_depth_flag;
  enc.pcm_filter_disable = cli.pcm_filter_disable_flag;
  enc.weighted_pred_p = cli.weighted_pred_p;
  enc.weighted_pred_b = cli.weighted_pred_b;
  enc.log2_parallel_merge_level = cli.log2_parallel_merge_level;
  enc.sign_hiding = cli.sign_hide_flag;
  enc.max_num_merge_cand = cli.max_num_merge_cand;
  enc.tmvp_mode = cli.tmvp_mode;
  enc.transquant_bypass_enable = cli.transquant_bypass_enable_flag;
  enc.transquant_bypass_force = cli.cu_transquant_bypass_flag_force;
  enc.cost_mode = cli
    .cost_mode
    .parse()
    .map_err(|_| CliError::invalid_value("CostMode", &cli.cost_mode))?;

  enc.slice_mode = cli.slice_mode;
  enc.slice_argument = cli.slice_argument;
  enc.slice_segment_mode = cli.slice_segment_mode;
  enc.slice_segment_argument = cli.slice_segment_argument;
  enc.uniform_tile_spacing = cli.uniform_spacing_idc;
  enc.num_tile_columns_minus1 = cli.num_tile_columns_minus1;
  enc.num_tile_rows_minus1 = cli.num_tile_rows_minus1;
  if !cli.uniform_spacing_idc && cli.num_tile_columns_minus1 > 0 {
    enc.tile_column_widths =
      parse_exact_list(&cli.column_width_array, cli.num_tile_columns_minus1)
        .map_err(|e| e.context("ColumnWidthArray"))?;
  }
  if !cli.uniform_spacing_idc && cli.num_tile_rows_minus1 > 0 {
    enc.tile_row_heights =
      parse_exact_list(&cli.row_height_array, cli.num_tile_rows_minus1)
        .map_err(|e| e.context("RowHeightArray"))?;
  }
  enc.loop_filter_across_tiles = cli.lf_cross_tile_boundary_flag;
  enc.loop_filter_across_slices = cli.lf_cross_slice_boundary_flag;
  enc.wavefront_synchro = cli.wave_front_synchro;

  enc.decoded_picture_hash =
    DecodedPictureHash::from_u32(cli.sei_decoded_picture_hash).ok_or_else(
      || {
        CliError::invalid_value(
          "SEIDecodedPictureHash",
          cli.sei_decoded_picture_hash,
        )
      },
    )?;
  enc.recovery_point_sei = cli.sei_recovery_point;
  if cli.sei_tone_mapping_info {
    let model = ToneMapModel::from_u32(cli.sei_tone_map_model_id)
      .ok_or_else(|| {
        CliError::invalid_value(
          "SEIToneMapModelId",
          cli.sei_tone_map_model_id,
        )
      })?;
    enc.tone_mapping = Some(ToneMapping {
      model,
      coded_data_bit_depth: cli.sei_tone_map_coded_data_bit_depth,
      target_bit_depth: cli.sei_tone_map_target_bit_depth,
      min_value: cli.sei_tone_map_min_value,
      max_value: cli.sei_tone_map_max_value,
      sigmoid_midpoint: cli.sei_tone_map_sigmoid_midpoint,
      sigmoid_width: cli.sei_tone_map_sigmoid_width,
      start_of_coded_interval: parse_list(
        &cli.sei_tone_map_start_of_coded_interval,
      )
      .map_err(|e| e.context("SEIToneMapStartOfCodedInterval"))?,
      num_pivots: cli.sei_tone_map_num_pivots,
      coded_pivot_value: parse_list(&cli.sei_tone_map_coded_pivot_value)
        .map_err(|e| e.context("SEIToneMapCodedPivotValue"))?,
      target_pivot_value: parse_list(&cli.sei_tone_map_target_pivot_value)
        .map_err(|e| e.context("SEIToneMapTargetPivotValue"))?,
      camera_iso_speed_value: cli.sei_tone_map_camera_iso_speed_value,
      exposure_index_value: cli.sei_tone_map_exposure_index_value,
      extended_range_white_level: cli
        .sei_tone_map_extended_range_white_level,
      nominal_black_level: cli
        .sei_tone_map_nominal_black_level_luma_code_value,
      nominal_white_level: cli
        .sei_tone_map_nominal_white_level_luma_code_value,
      extended_white_level: cli
        .sei_tone_map_extended_white_level_luma_code_value,
    });
  }
  if cli.sei_knee_function_info {
    enc.knee_function = Some(KneeFunction {
      input_knee_points: parse_list(
        &cli.sei_knee_function_input_knee_point_value,
      )
      .map_err(|e| e.context("SEIKneeFunctionInputKneePointValue"))?,
      output_knee_points: parse_list(
        &cli.sei_knee_function_output_knee_point_value,
      )
      .map_err(|e| e.context("SEIKneeFunctionOutputKneePointValue"))?,
      ..Default::default()
    });
  }
  if cli.sei_mastering_display_colour_volume {
    let primaries: Vec<u32> =
      parse_exact_list(&cli.sei_mastering_display_primaries, 6)
        .map_err(|e| e.context("SEIMasteringDisplayPrimaries"))?;
    let white: Vec<u32> =
      parse_exact_list(&cli.sei_mastering_display_white_point, 2)
        .map_err(|e| e.context("SEIMasteringDisplayWhitePoint"))?;
    let point = |x: u32, y: u32| Point { x: x as u16, y: y as u16 };
    enc.mastering_display = Some(MasteringDisplay {
      primaries: [
        point(primaries[0], primaries[1]),
        point(primaries[2], primaries[3]),
        point(primaries[4], primaries[5]),
      ],
      white_point: point(white[0], white[1]),
      max_luminance: cli.sei_mastering_display_max_luminance,
      min_luminance: cli.sei_mastering_display_min_luminance,
    });
  }
  if cli.sei_frame_packing {
    enc.frame_packing = Some(FramePacking {
      packing_type: cli.sei_frame_packing_type,
      id: cli.sei_frame_packing_id,
      quincunx: cli.sei_frame_packing_quincunx,
      interpretation: cli.sei_frame_packing_interpretation,
    });
  }
  enc.tmcts_sei = cli.sei_temp_motion_constrained_tile_sets;

  // GOP template: a --gop-file replaces the FrameN entries of the
  // configuration file.
  let mut gop_lines: Vec<String> =
    file_frames.into_iter().map(|(_, line)| line).collect();
  if let Some(path) = &cli.gop_file {
    let text = fs::read_to_string(path).map_err(|e| {
      e.context(&format!("Unable to read GOP file `{}`", path.display()))
    })?;
    gop_lines = text
      .lines()
      .map(|l| l.split('#').next().unwrap_or("").trim().to_owned())
      .filter(|l| !l.is_empty())
      .collect();
  }
  for line in &gop_lines {
    let entry: GopEntry =
      line.parse().map_err(|e: GopEntryParseError| e.context(line))?;
    enc.gop.push(entry);
  }

  let rate_control = RateControlConfig {
    enabled: cli.rate_control,
    target_bitrate: cli.target_bitrate,
    keep_hierarchical_bit: cli.keep_hierarchical_bit,
    lcu_level: cli.lcu_level_rate_control,
    lcu_separate_model: cli.rclcu_separate_model,
    initial_qp: cli.initial_qp,
    force_intra_qp: cli.rc_force_intra_qp,
  };

  Ok(Config::new().with_encoder_config(enc).with_rate_control(rate_control))
}

pub fn init_logger() {
  use std::str::FromStr;
  fn level_colored(l: log::Level) -> console::StyledObject<&'static str> {
    use console::style;
    use log::Level;
    match l {
      Level::Trace => style("??").dim(),
      Level::Debug => style("? ").dim(),
      Level::Info => style("> ").green(),
      Level::Warn => style("! ").yellow(),
      Level::Error => style("!!").red(),
    }
  }

  let level = std::env::var("RHEVCE_LOG")
    .ok()
    .and_then(|l| log::LevelFilter::from_str(&l).ok())
    .unwrap_or(log::LevelFilter::Info);

  fern::Dispatch::new()
    .format(move |out, message, record| {
      out.finish(format_args!(
        "{level} {message}",
        level = level_colored(record.level()),
        message = message,
      ));
    })
    // set the default log level. to filter out verbose log messages
    // from dependencies, set this to Warn and overwrite the log level
    // for this crate below.
    .level(log::LevelFilter::Warn)
    .level_for("rhevce", level)
    .chain(std::io::stderr())
    .apply()
    .unwrap();
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn option_names_translate_to_flags() {
    assert_eq!(camel_to_kebab("GOPSize"), "gop-size");
    assert_eq!(camel_to_kebab("SourceWidth"), "source-width");
    assert_eq!(camel_to_kebab("MaxCUWidth"), "max-cu-width");
    assert_eq!(camel_to_kebab("QP"), "qp");
    assert_eq!(camel_to_kebab("ChromaFormatIDC"), "chroma-format-idc");
    assert_eq!(
      camel_to_kebab("LoopFilterBetaOffset_div2"),
      "loop-filter-beta-offset-div2"
    );
    assert_eq!(
      camel_to_kebab("QuadtreeTULog2MaxSize"),
      "quadtree-tu-log2-max-size"
    );
    assert_eq!(
      camel_to_kebab("SEIDecodedPictureHash"),
      "sei-decoded-picture-hash"
    );
    assert_eq!(camel_to_kebab("InputBitDepthC"), "input-bit-depth-c");
    assert_eq!(
      camel_to_kebab("AlignCABACBeforeBypass"),
      "align-cabac-before-bypass"
    );
  }

  #[test]
  fn cli_options_verify() {
    use clap::CommandFactory;
    CliOptions::command().debug_assert();
  }
}
