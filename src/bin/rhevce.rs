// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

// Safety lints
#![deny(bare_trait_objects)]
#![deny(clippy::large_stack_arrays)]
// Correctness lints
#![deny(clippy::expl_impl_clone_on_copy)]
#![deny(clippy::float_cmp)]
#![deny(clippy::mem_forget)]
// Clarity/formatting lints
#![warn(clippy::map_flatten)]
#![warn(clippy::match_bool)]
#![warn(clippy::needless_borrow)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate log;

mod common;
mod error;

use crate::common::*;
use crate::error::*;

use rhevce::prelude::*;

use std::process::exit;

fn run() -> Result<(), CliError> {
  let config = parse_cli()?;

  let ctx: Context = config
    .new_context()
    .map_err(|e| e.context("Invalid encoder configuration"))?;

  info!("{}", ctx.config());
  let derived = ctx.gop_derived();
  info!(
    "gop: {} entries ({} synthesized), {} temporal layers",
    ctx.gop().len(),
    derived.extra_rps_count,
    derived.max_temporal_layer
  );
  info!(
    "dpb: buffering {:?} reorder {:?}",
    derived.max_dec_pic_buffering, derived.num_reorder_pics
  );
  let constants = ctx.constants();
  info!(
    "derived: cu depth {} bit depth {} pcm bit depth {} dynamic range {}",
    constants.max_cu_depth,
    constants.bit_depth,
    constants.pcm_bit_depth,
    constants.max_tr_dynamic_range
  );

  // The pixel pipeline takes over from here; this front end only
  // derives and validates the configuration.
  Ok(())
}

fn main() {
  init_logger();

  match run() {
    Ok(()) => {}
    Err(e) => {
      print_error(&e);
      exit(1);
    }
  }
}
