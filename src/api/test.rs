// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use crate::api::*;

use interpolate_name::interpolate_test;
use pretty_assertions::assert_eq;

fn setup_config(
  w: usize, h: usize, chroma_format: ChromaFormat, intra_period: i32,
  gop_size: usize, gop: Vec<GopEntry>,
) -> EncoderConfig {
  let mut enc = EncoderConfig::default();
  enc.width = w;
  enc.height = h;
  enc.frame_rate = 50;
  enc.frames_to_encode = 17;
  enc.input_chroma_format = chroma_format;
  enc.intra_period = intra_period;
  enc.gop_size = gop_size;
  enc.gop = gop;
  enc
}

fn random_access_config() -> EncoderConfig {
  setup_config(
    1920,
    1080,
    ChromaFormat::Cf420,
    16,
    8,
    crate::api::config::gop::test::hierarchical_b8(),
  )
}

#[interpolate_test(depth_8, 8)]
#[interpolate_test(depth_10, 10)]
#[interpolate_test(depth_12, 12)]
fn bit_depth_cascade_follows_luma(depth: u32) {
  let mut enc = setup_config(64, 64, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.input_bit_depth = BitDepths::new(depth, 0);
  enc.normalize().unwrap();

  assert_eq!(enc.input_bit_depth, BitDepths::new(depth, depth));
  assert_eq!(enc.msb_extended_bit_depth, BitDepths::new(depth, depth));
  assert_eq!(enc.internal_bit_depth, BitDepths::new(depth, depth));
  assert_eq!(enc.output_bit_depth, BitDepths::new(depth, depth));
}

#[test]
fn internal_luma_bit_depth_cascades_to_chroma() {
  // Changing only the luma internal bit depth while chroma fields are
  // unset must change the derived chroma internal bit depth identically.
  let mut enc = setup_config(64, 64, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.internal_bit_depth = BitDepths::new(10, 0);
  enc.normalize().unwrap();
  assert_eq!(enc.internal_bit_depth, BitDepths::new(10, 10));

  let mut enc = setup_config(64, 64, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.internal_bit_depth = BitDepths::new(12, 0);
  enc.normalize().unwrap();
  assert_eq!(enc.internal_bit_depth, BitDepths::new(12, 12));
}

#[test]
fn explicit_chroma_bit_depth_survives_the_cascade() {
  let mut enc = setup_config(64, 64, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.input_bit_depth = BitDepths::new(10, 8);
  enc.internal_bit_depth = BitDepths::new(0, 12);
  enc.normalize().unwrap();
  assert_eq!(enc.input_bit_depth, BitDepths::new(10, 8));
  // Internal luma falls back to the MSB-extended depth, chroma keeps
  // its explicit value.
  assert_eq!(enc.internal_bit_depth, BitDepths::new(10, 12));
}

#[test]
fn chroma_format_override_zero_means_input_format() {
  let mut enc = setup_config(64, 64, ChromaFormat::Cf422, 1, 1, vec![]);
  enc.normalize().unwrap();
  assert_eq!(enc.chroma_format, ChromaFormat::Cf422);

  let mut enc = setup_config(64, 64, ChromaFormat::Cf422, 1, 1, vec![]);
  enc.chroma_format_override = Some(ChromaFormat::Cf400);
  enc.normalize().unwrap();
  assert_eq!(enc.chroma_format, ChromaFormat::Cf400);
}

#[test]
fn normalization_is_idempotent() {
  let mut enc = random_access_config();
  enc.conformance_mode = ConformanceMode::AutoPadding;
  enc.width = 1918;
  enc.input_bit_depth = BitDepths::new(10, 0);
  enc.extended_profile = "main_444_10".parse().unwrap();

  enc.normalize().unwrap();
  let once = enc.clone();
  enc.normalize().unwrap();
  assert_eq!(once, enc);
}

#[test]
fn validation_is_idempotent() {
  // Re-running the whole pipeline on an already-validated record must
  // produce the same frozen output and no new violations.
  let enc = random_access_config();
  let config = Config::new().with_encoder_config(enc);
  let first = config.new_context().unwrap();

  let config = Config::new().with_encoder_config(first.config().clone());
  let second = config.new_context().unwrap();
  assert_eq!(first.config(), second.config());
  assert_eq!(first.gop_derived(), second.gop_derived());
  assert_eq!(first.constants(), second.constants());
}

#[test]
fn automatic_padding_of_1918_pads_to_1920() {
  // 1918 is not a multiple of the minimum CU size 8: expect a
  // horizontal pad of 2 echoed into the conformance window.
  let mut enc = setup_config(1918, 1080, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.conformance_mode = ConformanceMode::AutoPadding;
  enc.normalize().unwrap();

  assert_eq!(enc.pad[0], 2);
  assert_eq!(enc.conf_win.right, 2);
  assert_eq!(enc.coded_width, 1920);
  assert_eq!(enc.coded_height, 1080);

  // 4:2:2 subsamples horizontally by 2, which still divides the pad.
  let mut enc = setup_config(1918, 1080, ChromaFormat::Cf422, 1, 1, vec![]);
  enc.conformance_mode = ConformanceMode::AutoPadding;
  enc.normalize().unwrap();
  assert_eq!(enc.conf_win.right, 2);
}

#[test]
fn automatic_padding_rejects_odd_pads_for_subsampled_formats() {
  // 1919 pads by 1, which 4:2:0 cannot express.
  let mut enc = setup_config(1919, 1080, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.conformance_mode = ConformanceMode::AutoPadding;
  assert_eq!(
    enc.normalize(),
    Err(InvalidConfig::PaddedWidthNotChromaAligned { pad: 1, unit: 2 })
  );

  // 4:4:4 can.
  let mut enc = setup_config(1919, 1080, ChromaFormat::Cf444, 1, 1, vec![]);
  enc.conformance_mode = ConformanceMode::AutoPadding;
  enc.normalize().unwrap();
  assert_eq!(enc.coded_width, 1920);
}

#[test]
fn fixed_padding_is_echoed_into_the_conformance_window() {
  let mut enc = setup_config(1912, 1072, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.conformance_mode = ConformanceMode::Padding;
  enc.pad = [8, 8];
  enc.normalize().unwrap();
  assert_eq!(enc.coded_width, 1920);
  assert_eq!(enc.coded_height, 1080);
  assert_eq!(enc.conf_win.right, 8);
  assert_eq!(enc.conf_win.bottom, 8);
}

#[test]
fn window_mode_ignores_padding() {
  let mut enc = setup_config(1920, 1080, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.conformance_mode = ConformanceMode::Window;
  enc.conf_win = ConformanceWindow { left: 0, right: 2, top: 0, bottom: 4 };
  enc.pad = [6, 6];
  enc.normalize().unwrap();
  assert_eq!(enc.pad, [0, 0]);
  assert_eq!(enc.coded_width, 1920);
  assert_eq!(enc.conf_win.right, 2);
}

#[test]
fn rext_auto_selection_raises_chroma_constraint_for_general_tools() {
  // Profile main-RExt, no explicit constraints, a general RExt tool in
  // use, 4:2:0 input at internal bit depth 10: rule (b) selects the
  // 4:4:4 constraint at the rounded trial bit depth.
  let mut enc = random_access_config();
  enc.extended_profile = "main-RExt".parse().unwrap();
  enc.internal_bit_depth = BitDepths::new(10, 0);
  enc.golomb_rice_adaptation = true;
  enc.normalize().unwrap();

  assert_eq!(enc.chroma_format_constraint, Some(ChromaFormat::Cf444));
  assert_eq!(enc.bit_depth_constraint, 10);

  // The selected combination passes the validation battery.
  let ctx = Config::new().with_encoder_config(enc).new_context().unwrap();
  assert_eq!(ctx.config().bit_depth_constraint, 10);
}

#[test]
fn sub_profile_shorthand_configures_the_constraints() {
  let mut enc = random_access_config();
  enc.intra_period = -1;
  enc.extended_profile = "main_422_10".parse().unwrap();
  enc.input_bit_depth = BitDepths::new(10, 0);
  enc.input_chroma_format = ChromaFormat::Cf422;
  enc.normalize().unwrap();

  assert_eq!(enc.profile, Profile::MainRExt);
  assert_eq!(enc.bit_depth_constraint, 10);
  assert_eq!(enc.chroma_format_constraint, Some(ChromaFormat::Cf422));
  assert!(!enc.intra_constraint);
}

#[test]
fn all_intra_run_produces_a_context() {
  let enc = setup_config(1920, 1080, ChromaFormat::Cf420, 1, 1, vec![]);
  let ctx = Config::new().with_encoder_config(enc).new_context().unwrap();

  assert_eq!(ctx.gop().len(), 1);
  assert_eq!(ctx.gop()[0].slice_type, SliceType::I);
  assert_eq!(ctx.gop_derived().extra_rps_count, 0);
  assert_eq!(ctx.constants().bit_depth, BitDepths::new(8, 8));
  assert_eq!(ctx.constants().max_tr_dynamic_range, BitDepths::new(15, 15));
}

#[test]
fn random_access_run_publishes_monotone_bounds() {
  let ctx = Config::new()
    .with_encoder_config(random_access_config())
    .new_context()
    .unwrap();

  let derived = ctx.gop_derived();
  assert!(derived.extra_rps_count > 0);
  for i in 0..MAX_TLAYER - 1 {
    assert!(derived.num_reorder_pics[i] <= derived.num_reorder_pics[i + 1]);
    assert!(
      derived.max_dec_pic_buffering[i]
        <= derived.max_dec_pic_buffering[i + 1]
    );
  }
  for i in 0..MAX_TLAYER {
    assert!(
      derived.max_dec_pic_buffering[i] >= derived.num_reorder_pics[i] + 1
    );
  }
}

#[test]
fn sao_offset_shift_is_derived_from_depth_and_qp() {
  let mut enc = setup_config(64, 64, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.input_bit_depth = BitDepths::new(12, 0);
  enc.sao_luma_offset_bit_shift = -1;
  enc.sao_chroma_offset_bit_shift = -1;
  enc.qp = 37;
  enc.normalize().unwrap();

  // 12-10 + 0.165*37 - 3.22 + 0.5 = 5.385, truncated to 5, clamped to
  // the bit-depth headroom of 2.
  assert_eq!(enc.sao_luma_offset_bit_shift, 2);

  let mut enc = setup_config(64, 64, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.sao_luma_offset_bit_shift = -1;
  enc.normalize().unwrap();
  // 8-bit internal depth derives no shift.
  assert_eq!(enc.sao_luma_offset_bit_shift, 0);
}

#[test]
fn wavefront_substreams_follow_the_coded_height() {
  let mut enc = setup_config(1920, 1080, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.wavefront_synchro = 1;
  enc.normalize().unwrap();
  assert_eq!(enc.wavefront_substreams, 17); // ceil(1080 / 64)

  enc.wavefront_synchro = 0;
  enc.normalize().unwrap();
  assert_eq!(enc.wavefront_substreams, 1);
}

#[test]
fn cross_component_prediction_is_forced_off_outside_444() {
  let mut enc = setup_config(64, 64, ChromaFormat::Cf420, 1, 1, vec![]);
  enc.cross_component_prediction = true;
  enc.normalize().unwrap();
  assert!(!enc.cross_component_prediction);

  let mut enc = setup_config(64, 64, ChromaFormat::Cf444, 1, 1, vec![]);
  enc.cross_component_prediction = true;
  enc.normalize().unwrap();
  assert!(enc.cross_component_prediction);
}
