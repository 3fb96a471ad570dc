// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

use arrayvec::ArrayVec;
use num_traits::FromPrimitive;
use thiserror::Error;

use crate::api::config::InvalidConfig;
use crate::serialize::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Maximum number of entries in a GOP structure, template plus
/// synthesized.
pub const MAX_GOP: usize = 64;
/// Maximum number of reference pictures a single entry may carry.
pub const MAX_NUM_REF_PICS: usize = 16;
/// Maximum number of temporal sub-layers.
pub const MAX_TLAYER: usize = 7;

/// Slice type of a GOP entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceType {
  /// Bi-predicted slice.
  B,
  /// Uni-predicted slice.
  P,
  /// Intra slice.
  I,
}

impl Default for SliceType {
  fn default() -> Self {
    SliceType::P
  }
}

impl FromStr for SliceType {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "B" => Ok(SliceType::B),
      "P" => Ok(SliceType::P),
      "I" => Ok(SliceType::I),
      _ => Err(()),
    }
  }
}

impl fmt::Display for SliceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SliceType::B => write!(f, "B"),
      SliceType::P => write!(f, "P"),
      SliceType::I => write!(f, "I"),
    }
  }
}

/// One reference picture of a GOP entry: a picture-order-count delta
/// relative to the current picture, and whether the current picture
/// actually uses it.
#[derive(
  Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct RefPic {
  /// Signed POC offset from the current picture.
  pub delta_poc: i32,
  /// Whether the current picture references it, or it is only kept for
  /// later pictures.
  pub used_by_curr: bool,
}

/// Reference-index code of inter-RPS prediction, describing how one
/// reference of the chained entry maps onto the predicted entry.
#[derive(
  Copy,
  Clone,
  Debug,
  PartialEq,
  Eq,
  num_derive::FromPrimitive,
  Serialize,
  Deserialize,
)]
#[repr(C)]
pub enum RefIdc {
  /// Not a reference of the predicted entry.
  NotReference = 0,
  /// A reference used by the current picture.
  UsedByCurrent = 1,
  /// A reference kept but not used by the current picture.
  NotUsed = 2,
}

/// Inter-RPS prediction data of a synthesized entry that chains from the
/// previously synthesized one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterRps {
  /// POC of the chained entry relative to this one.
  pub delta_rps: i32,
  /// One code per reference of the chained entry, plus one for the
  /// chained picture itself.
  pub ref_idcs: ArrayVec<RefIdc, { MAX_NUM_REF_PICS + 1 }>,
}

/// Describes one frame's coding role within a GOP template.
///
/// The first `gop_size` entries are authored by the user; further
/// entries are synthesized during reference-picture-set expansion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GopEntry {
  /// Display-order offset within the GOP period. `None` until assigned.
  pub poc: Option<i32>,
  /// Slice type used to code the frame.
  pub slice_type: SliceType,
  /// QP offset applied on top of the sequence QP.
  pub qp_offset: i32,
  /// Lambda weighting factor for mode decision.
  pub qp_factor: f64,
  /// Deblocking tc offset (div 2) for this frame.
  pub tc_offset_div2: i32,
  /// Deblocking beta offset (div 2) for this frame.
  pub beta_offset_div2: i32,
  /// Temporal sub-layer of the frame.
  pub temporal_id: u32,
  /// Number of active reference pictures desired for this frame.
  pub num_ref_pics_active: usize,
  /// Reference pictures, as POC deltas plus used-by-current flags.
  pub refs: ArrayVec<RefPic, MAX_NUM_REF_PICS>,
  /// Whether another picture at the same temporal layer references this
  /// one. Derived during expansion.
  pub is_reference: bool,
  /// Inter-RPS prediction data, when this entry chains from the
  /// previous synthesized one.
  pub inter_rps: Option<InterRps>,
}

impl Default for GopEntry {
  fn default() -> Self {
    GopEntry {
      poc: None,
      slice_type: SliceType::default(),
      qp_offset: 0,
      qp_factor: 0.0,
      tc_offset_div2: 0,
      beta_offset_div2: 0,
      temporal_id: 0,
      num_ref_pics_active: 0,
      refs: ArrayVec::new(),
      is_reference: false,
      inter_rps: None,
    }
  }
}

/// Errors from parsing a GOP template line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GopEntryParseError {
  /// The line ended before all fields were read.
  #[error("truncated GOP entry: missing {0}")]
  Missing(&'static str),
  /// A field did not parse as its expected type.
  #[error("invalid {field} `{value}` in GOP entry")]
  Invalid {
    /// The field being parsed.
    field: &'static str,
    /// The offending token.
    value: String,
  },
  /// More reference pictures than an entry may carry.
  #[error("reference picture count {0} exceeds the supported maximum")]
  TooManyRefs(usize),
  /// More reference-index codes than an entry may carry.
  #[error("reference index count {0} exceeds the supported maximum")]
  TooManyRefIdcs(usize),
  /// The inter-RPS prediction mode is not one this parser accepts.
  #[error("inter-RPS prediction mode {0} is not supported (expected 0 or 1)")]
  UnsupportedInterRps(i32),
  /// A reference-index code outside 0..=2.
  #[error("invalid reference index code {0} (expected 0, 1 or 2)")]
  InvalidRefIdc(i32),
}

impl FromStr for GopEntry {
  type Err = GopEntryParseError;

  /// Parses the textual `FrameN` form:
  ///
  /// ```text
  /// B 8 1 0.442 0 0 0 4 4 -8 -10 -12 -16 0
  /// ```
  ///
  /// i.e. slice type, POC, QP offset, QP factor, tc offset, beta
  /// offset, temporal id, active reference count, reference count, the
  /// reference deltas, and the inter-RPS prediction mode with its
  /// fields when the mode is 1.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    use GopEntryParseError::*;

    fn next<'a>(
      tokens: &mut std::str::SplitWhitespace<'a>, field: &'static str,
    ) -> Result<&'a str, GopEntryParseError> {
      tokens.next().ok_or(Missing(field))
    }
    fn parse<T: FromStr>(
      field: &'static str, token: &str,
    ) -> Result<T, GopEntryParseError> {
      token
        .parse()
        .map_err(|_| Invalid { field, value: token.to_owned() })
    }

    let t = &mut s.split_whitespace();
    let mut entry = GopEntry {
      slice_type: parse("slice type", next(t, "slice type")?)?,
      poc: Some(parse("POC", next(t, "POC")?)?),
      qp_offset: parse("QP offset", next(t, "QP offset")?)?,
      qp_factor: parse("QP factor", next(t, "QP factor")?)?,
      tc_offset_div2: parse("tc offset", next(t, "tc offset")?)?,
      beta_offset_div2: parse("beta offset", next(t, "beta offset")?)?,
      temporal_id: parse("temporal id", next(t, "temporal id")?)?,
      num_ref_pics_active: parse(
        "active reference count",
        next(t, "active reference count")?,
      )?,
      ..Default::default()
    };

    let num_refs: usize =
      parse("reference count", next(t, "reference count")?)?;
    if num_refs > MAX_NUM_REF_PICS {
      return Err(TooManyRefs(num_refs));
    }
    for _ in 0..num_refs {
      let delta_poc =
        parse("reference delta", next(t, "reference delta")?)?;
      entry.refs.push(RefPic { delta_poc, used_by_curr: false });
    }

    let inter_rps_mode: i32 =
      parse("inter-RPS mode", next(t, "inter-RPS mode")?)?;
    match inter_rps_mode {
      0 => {}
      1 => {
        let delta_rps = parse("delta RPS", next(t, "delta RPS")?)?;
        let num_ref_idcs: usize = parse(
          "reference index count",
          next(t, "reference index count")?,
        )?;
        if num_ref_idcs > MAX_NUM_REF_PICS + 1 {
          return Err(TooManyRefIdcs(num_ref_idcs));
        }
        let mut ref_idcs = ArrayVec::new();
        for _ in 0..num_ref_idcs {
          let code: i32 = parse(
            "reference index code",
            next(t, "reference index code")?,
          )?;
          ref_idcs.push(RefIdc::from_i32(code).ok_or(InvalidRefIdc(code))?);
        }
        entry.inter_rps = Some(InterRps { delta_rps, ref_idcs });
      }
      mode => return Err(UnsupportedInterRps(mode)),
    }

    Ok(entry)
  }
}

/// Buffering and reordering bounds derived from the expanded GOP
/// structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GopDerived {
  /// Number of temporal sub-layers in use.
  pub max_temporal_layer: u32,
  /// Per-layer maximum reorder count.
  pub num_reorder_pics: [usize; MAX_TLAYER],
  /// Per-layer maximum decoded picture buffer size.
  pub max_dec_pic_buffering: [usize; MAX_TLAYER],
  /// Number of entries synthesized during expansion.
  pub extra_rps_count: usize,
}

/// Expands the GOP template into a complete, decodable set of
/// reference-picture-set entries.
///
/// Walks pictures in coding order, verifying that every reference of
/// every template position is available among previously decoded
/// pictures of the same period. Positions whose references reach before
/// the start of the stream get a synthesized entry holding the subset
/// of references that do exist, topped up with nearby already-decoded
/// pictures. The loop ends once every template position has been
/// verified against a fully populated reference list.
pub(crate) fn expand(
  gop: &mut Vec<GopEntry>, gop_size: usize, intra_period: i32,
  field_coding: bool,
) -> Result<GopDerived, InvalidConfig> {
  if gop_size == 0 {
    return Err(InvalidConfig::InvalidGopSize(0));
  }

  // An intra-only sequence needs no GOP structure; supply the trivial
  // single-entry one so the expansion below verifies immediately.
  if intra_period == 1 && gop.first().map_or(true, |e| e.poc.is_none()) {
    let entry = GopEntry {
      poc: Some(1),
      slice_type: SliceType::I,
      qp_factor: 1.0,
      num_ref_pics_active: 4,
      ..Default::default()
    };
    if gop.is_empty() {
      gop.push(entry);
    } else {
      gop[0] = entry;
    }
  }

  if gop.len() < gop_size {
    return Err(InvalidConfig::FewerRpsThanGopSize {
      templates: gop.len(),
      gop_size,
    });
  }
  for entry in gop.iter() {
    if entry.temporal_id >= MAX_TLAYER as u32 {
      return Err(InvalidConfig::TemporalIdOutOfRange {
        actual: entry.temporal_id,
        max: MAX_TLAYER as u32 - 1,
      });
    }
  }

  let mut ref_list: ArrayVec<i32, { MAX_NUM_REF_PICS + 1 }> =
    ArrayVec::new();
  ref_list.push(0);
  if field_coding {
    ref_list.push(1);
  }

  let mut is_ok = vec![false; gop_size];
  let mut num_ok = 0;
  let mut extra_rps = 0usize;
  let mut last_synth_poc = 0i32;
  let mut verified = false;
  let mut check_gop = 1usize;

  while !verified {
    let mut cur_gop = (check_gop - 1) % gop_size;
    let period = ((check_gop - 1) / gop_size) as i32 * gop_size as i32;
    let cur_poc = period
      + gop[cur_gop].poc.ok_or(InvalidConfig::FewerRpsThanGopSize {
        templates: cur_gop,
        gop_size,
      })?;

    // Check that all reference pictures are available, or lie before
    // the start of the stream (in which case they may exist in later
    // periods).
    let mut before_i = false;
    for i in 0..gop[cur_gop].refs.len() {
      let abs_poc = cur_poc + gop[cur_gop].refs[i].delta_poc;
      if abs_poc < 0 {
        before_i = true;
        continue;
      }
      let found = ref_list.iter().any(|&r| r == abs_poc);
      if !found {
        return Err(InvalidConfig::UnavailableReference {
          delta_poc: gop[cur_gop].refs[i].delta_poc,
          frame: cur_gop + 1,
        });
      }
      for k in 0..gop_size {
        let k_poc = gop[k].poc.unwrap_or(-1);
        if abs_poc % gop_size as i32 == k_poc % gop_size as i32 {
          if gop[k].temporal_id == gop[cur_gop].temporal_id {
            gop[k].is_reference = true;
          }
          let used = gop[k].temporal_id <= gop[cur_gop].temporal_id;
          gop[cur_gop].refs[i].used_by_curr = used;
        }
      }
    }

    if !before_i {
      // All references were present; one more template position holds.
      if !is_ok[cur_gop] {
        num_ok += 1;
        is_ok[cur_gop] = true;
        if num_ok == gop_size {
          verified = true;
        }
      }
    } else {
      // Synthesize a new entry for this position, containing the
      // references that do exist.
      if gop_size + extra_rps >= MAX_GOP {
        return Err(InvalidConfig::RpsListFull);
      }
      let mut new_entry = gop[cur_gop].clone();
      let mut new_refs: ArrayVec<RefPic, MAX_NUM_REF_PICS> = gop[cur_gop]
        .refs
        .iter()
        .copied()
        .filter(|r| cur_poc + r.delta_poc >= 0)
        .collect();
      let num_pref_refs = gop[cur_gop].num_ref_pics_active;

      // Step backwards in coding order and include any extra available
      // pictures useful to replace the ones that fell off the start.
      for prev in (0..check_gop.saturating_sub(1)).rev() {
        let off_gop = prev % gop_size;
        let Some(off_template_poc) = gop[off_gop].poc else {
          continue;
        };
        let off_poc =
          (prev / gop_size) as i32 * gop_size as i32 + off_template_poc;
        if off_poc >= 0
          && gop[off_gop].temporal_id <= gop[cur_gop].temporal_id
        {
          let mut new_ref = ref_list.iter().any(|&r| r == off_poc);
          for r in &new_refs {
            if r.delta_poc == off_poc - cur_poc {
              new_ref = false;
            }
          }
          if new_ref && !new_refs.is_full() {
            if gop[off_gop].temporal_id == gop[cur_gop].temporal_id {
              gop[off_gop].is_reference = true;
            }
            // Find the appropriate place in the list and insert it:
            // deltas are kept in descending order, negatives before
            // positives.
            let mut insert_point = new_refs.len();
            for (j, r) in new_refs.iter().enumerate() {
              if r.delta_poc < off_poc - cur_poc || r.delta_poc > 0 {
                insert_point = j;
                break;
              }
            }
            let used =
              gop[off_gop].temporal_id <= gop[cur_gop].temporal_id;
            new_refs.insert(
              insert_point,
              RefPic { delta_poc: off_poc - cur_poc, used_by_curr: used },
            );
          }
        }
        if new_refs.len() >= num_pref_refs {
          break;
        }
      }

      new_entry.refs = new_refs;
      new_entry.poc = Some(cur_poc);
      new_entry.inter_rps = if extra_rps == 0 {
        None
      } else {
        // Chain from the previously synthesized entry: one code per
        // reference of that entry, plus one for the entry itself.
        let prev_entry = gop[gop_size + extra_rps - 1].clone();
        let ref_poc = last_synth_poc;
        let mut ref_idcs = ArrayVec::new();
        for i in 0..=prev_entry.refs.len() {
          let delta_poc = if i != prev_entry.refs.len() {
            prev_entry.refs[i].delta_poc
          } else {
            0
          };
          let abs_poc_ref = ref_poc + delta_poc;
          let mut idc = RefIdc::NotReference;
          for r in &new_entry.refs {
            if abs_poc_ref - cur_poc == r.delta_poc {
              idc = if r.used_by_curr {
                RefIdc::UsedByCurrent
              } else {
                RefIdc::NotUsed
              };
            }
          }
          ref_idcs.push(idc);
        }
        Some(InterRps { delta_rps: ref_poc - cur_poc, ref_idcs })
      };

      last_synth_poc = cur_poc;
      let idx = gop_size + extra_rps;
      if idx < gop.len() {
        gop[idx] = new_entry;
      } else {
        gop.push(new_entry);
      }
      cur_gop = idx;
      extra_rps += 1;
    }

    // Rebuild the running reference list from the entry just processed.
    ref_list.clear();
    for r in gop[cur_gop].refs.iter() {
      let abs_poc = cur_poc + r.delta_poc;
      if abs_poc >= 0 {
        ref_list.push(abs_poc);
      }
    }
    ref_list.push(cur_poc);
    check_gop += 1;
  }

  Ok(derive_bounds(gop, gop_size, extra_rps))
}

/// Computes the temporal-layer buffering and reordering bounds of the
/// verified template, then enforces the standard-mandated monotonicity
/// between layers and the `buffering >= reorder + 1` relation.
fn derive_bounds(
  gop: &[GopEntry], gop_size: usize, extra_rps: usize,
) -> GopDerived {
  let mut max_temporal_layer = 1;
  for entry in gop.iter().take(gop_size) {
    if entry.temporal_id >= max_temporal_layer {
      max_temporal_layer = entry.temporal_id + 1;
    }
  }

  let poc = |i: usize| gop[i].poc.unwrap_or(-1);
  let mut num_reorder_pics = [0usize; MAX_TLAYER];
  let mut max_dec_pic_buffering = [1usize; MAX_TLAYER];
  for i in 0..gop_size {
    let tid = gop[i].temporal_id as usize;
    if gop[i].refs.len() + 1 > max_dec_pic_buffering[tid] {
      max_dec_pic_buffering[tid] = gop[i].refs.len() + 1;
    }
    let mut highest_decoding_number_with_lower_poc = 0;
    for j in 0..gop_size {
      if poc(j) <= poc(i) {
        highest_decoding_number_with_lower_poc = j;
      }
    }
    let mut num_reorder = 0;
    for j in 0..highest_decoding_number_with_lower_poc {
      if gop[j].temporal_id <= gop[i].temporal_id && poc(j) > poc(i) {
        num_reorder += 1;
      }
    }
    if num_reorder > num_reorder_pics[tid] {
      num_reorder_pics[tid] = num_reorder;
    }
  }

  for i in 0..MAX_TLAYER - 1 {
    // A lower layer may not require more reordering than a higher one.
    if num_reorder_pics[i + 1] < num_reorder_pics[i] {
      num_reorder_pics[i + 1] = num_reorder_pics[i];
    }
    // num_reorder_pics[i] shall be in the range 0 to
    // max_dec_pic_buffering[i] - 1, inclusive.
    if num_reorder_pics[i] > max_dec_pic_buffering[i] - 1 {
      max_dec_pic_buffering[i] = num_reorder_pics[i] + 1;
    }
    // A lower layer may not require a larger buffer than a higher one.
    if max_dec_pic_buffering[i + 1] < max_dec_pic_buffering[i] {
      max_dec_pic_buffering[i + 1] = max_dec_pic_buffering[i];
    }
  }
  if num_reorder_pics[MAX_TLAYER - 1]
    > max_dec_pic_buffering[MAX_TLAYER - 1] - 1
  {
    max_dec_pic_buffering[MAX_TLAYER - 1] =
      num_reorder_pics[MAX_TLAYER - 1] + 1;
  }

  GopDerived {
    max_temporal_layer,
    num_reorder_pics,
    max_dec_pic_buffering,
    extra_rps_count: extra_rps,
  }
}

#[cfg(test)]
pub(crate) mod test {
  use super::*;
  use pretty_assertions::assert_eq;

  /// Hierarchical-B random-access template, GOP size 8, four temporal
  /// layers. Each entry carries forward the pictures later entries
  /// still reference.
  pub(crate) fn hierarchical_b8() -> Vec<GopEntry> {
    [
      "B 8 1 0.442 0 0 0 4 4 -8 -10 -12 -16 0",
      "B 4 2 0.3536 0 0 1 2 3 -4 -6 4 0",
      "B 2 3 0.3536 0 0 2 2 4 -2 -4 2 6 0",
      "B 1 4 0.68 0 0 3 2 4 -1 1 3 7 0",
      "B 3 4 0.68 0 0 3 2 4 -1 -3 1 5 0",
      "B 6 3 0.3536 0 0 2 2 4 -2 -4 -6 2 0",
      "B 5 4 0.68 0 0 3 2 4 -1 -5 1 3 0",
      "B 7 4 0.68 0 0 3 2 4 -1 -3 -7 1 0",
    ]
    .iter()
    .map(|s| s.parse().unwrap())
    .collect()
  }

  #[test]
  fn parse_frame_line() {
    let entry: GopEntry = "B 8 1 0.442 0 0 0 4 4 -8 -10 -12 -16 0"
      .parse()
      .unwrap();
    assert_eq!(entry.slice_type, SliceType::B);
    assert_eq!(entry.poc, Some(8));
    assert_eq!(entry.qp_offset, 1);
    assert_eq!(entry.temporal_id, 0);
    assert_eq!(entry.num_ref_pics_active, 4);
    assert_eq!(
      entry.refs.iter().map(|r| r.delta_poc).collect::<Vec<_>>(),
      vec![-8, -10, -12, -16]
    );
    assert_eq!(entry.inter_rps, None);
  }

  #[test]
  fn parse_frame_line_with_inter_rps() {
    let entry: GopEntry =
      "B 2 2 0.5 0 0 1 2 2 -2 2 1 4 3 1 1 0".parse().unwrap();
    let inter = entry.inter_rps.unwrap();
    assert_eq!(inter.delta_rps, 4);
    assert_eq!(
      inter.ref_idcs.as_slice(),
      [RefIdc::UsedByCurrent, RefIdc::UsedByCurrent, RefIdc::NotReference]
    );
  }

  #[test]
  fn parse_rejects_truncated_line() {
    let err = "B 8 1 0.442 0 0 0 4 4 -8 -10".parse::<GopEntry>();
    assert_eq!(
      err,
      Err(GopEntryParseError::Missing("reference delta"))
    );
  }

  #[test]
  fn parse_rejects_auto_inter_rps_mode() {
    let err = "B 8 1 0.442 0 0 0 4 1 -8 2".parse::<GopEntry>();
    assert_eq!(err, Err(GopEntryParseError::UnsupportedInterRps(2)));
  }

  #[test]
  fn all_intra_synthesizes_trivial_entry() {
    let mut gop = Vec::new();
    let derived = expand(&mut gop, 1, 1, false).unwrap();
    assert_eq!(gop.len(), 1);
    assert_eq!(gop[0].poc, Some(1));
    assert_eq!(gop[0].slice_type, SliceType::I);
    assert_eq!(derived.extra_rps_count, 0);
    assert_eq!(derived.max_temporal_layer, 1);
  }

  #[test]
  fn fewer_templates_than_gop_size_is_fatal() {
    let mut gop: Vec<GopEntry> =
      vec!["P 1 0 1.0 0 0 0 1 1 -1 0".parse().unwrap()];
    let err = expand(&mut gop, 4, -1, false);
    assert!(matches!(
      err,
      Err(InvalidConfig::FewerRpsThanGopSize { .. })
    ));
  }

  #[test]
  fn unavailable_reference_is_fatal() {
    // POC 1 referencing POC -2 in period terms: the reference falls on
    // an absolute POC that is never coded.
    let mut gop: Vec<GopEntry> =
      vec!["P 1 0 1.0 0 0 0 1 1 -3 0".parse().unwrap()];
    let err = expand(&mut gop, 1, -1, false);
    assert!(matches!(
      err,
      Err(InvalidConfig::UnavailableReference { delta_poc: -3, .. })
    ));
  }

  #[test]
  fn temporal_id_out_of_range_is_fatal() {
    let mut gop: Vec<GopEntry> =
      vec!["P 1 0 1.0 0 0 9 1 1 -1 0".parse().unwrap()];
    let err = expand(&mut gop, 1, -1, false);
    assert!(matches!(
      err,
      Err(InvalidConfig::TemporalIdOutOfRange { actual: 9, .. })
    ));
  }

  #[test]
  fn low_delay_template_verifies_without_synthesis() {
    let mut gop: Vec<GopEntry> =
      vec!["P 1 0 1.0 0 0 0 1 1 -1 0".parse().unwrap()];
    let derived = expand(&mut gop, 1, -1, false).unwrap();
    assert_eq!(derived.extra_rps_count, 0);
    assert_eq!(gop.len(), 1);
    assert!(gop[0].refs[0].used_by_curr);
  }

  #[test]
  fn hierarchical_b_expansion_terminates_and_stays_non_negative() {
    let mut gop = hierarchical_b8();
    let derived = expand(&mut gop, 8, -1, false).unwrap();

    assert!(derived.extra_rps_count > 0);
    assert!(gop.len() <= MAX_GOP);
    // Every synthesized entry references only pictures that exist.
    for entry in gop.iter().skip(8) {
      let poc = entry.poc.unwrap();
      for r in &entry.refs {
        assert!(poc + r.delta_poc >= 0);
      }
    }
  }

  #[test]
  fn synthesized_ref_idcs_are_consistent_with_chained_entry() {
    let mut gop = hierarchical_b8();
    expand(&mut gop, 8, -1, false).unwrap();

    for idx in 8..gop.len() {
      let Some(inter) = gop[idx].inter_rps.clone() else {
        continue;
      };
      let prev = &gop[idx - 1];
      let cur_poc = gop[idx].poc.unwrap();
      let ref_poc = prev.poc.unwrap();
      assert_eq!(inter.delta_rps, ref_poc - cur_poc);
      assert_eq!(inter.ref_idcs.len(), prev.refs.len() + 1);
      for (i, &idc) in inter.ref_idcs.iter().enumerate() {
        let delta =
          if i != prev.refs.len() { prev.refs[i].delta_poc } else { 0 };
        let mapped =
          gop[idx].refs.iter().find(|r| ref_poc + delta - cur_poc == r.delta_poc);
        match idc {
          RefIdc::NotReference => assert!(mapped.is_none()),
          RefIdc::UsedByCurrent => assert!(mapped.unwrap().used_by_curr),
          RefIdc::NotUsed => assert!(!mapped.unwrap().used_by_curr),
        }
      }
    }
  }

  #[test]
  fn derived_bounds_are_monotone() {
    let mut gop = hierarchical_b8();
    let derived = expand(&mut gop, 8, -1, false).unwrap();

    assert_eq!(derived.max_temporal_layer, 4);
    for i in 0..MAX_TLAYER - 1 {
      assert!(
        derived.num_reorder_pics[i] <= derived.num_reorder_pics[i + 1]
      );
      assert!(
        derived.max_dec_pic_buffering[i]
          <= derived.max_dec_pic_buffering[i + 1]
      );
    }
    for i in 0..MAX_TLAYER {
      assert!(
        derived.max_dec_pic_buffering[i]
          >= derived.num_reorder_pics[i] + 1
      );
    }
  }

  #[test]
  fn field_coding_seeds_two_reference_pictures() {
    // With field coding the first two fields are both available as
    // references; a reference to POC -1 from the first coded frame
    // resolves against the seeded list instead of synthesizing.
    let mut gop: Vec<GopEntry> =
      vec!["P 2 0 1.0 0 0 0 1 2 -1 -2 0".parse().unwrap()];
    let derived = expand(&mut gop, 1, -1, true).unwrap();
    assert_eq!(derived.extra_rps_count, 0);
  }
}
