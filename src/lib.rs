// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

//! rhevce is an HEVC (H.265) video encoder.
//!
//! This crate contains the configuration layer of the encoder: parameter
//! derivation, reference-picture-set expansion and conformance validation.
//! The validated, frozen output of [`Config::new_context`] is what the
//! pixel-domain pipeline consumes.
//!
//! [`Config::new_context`]: crate::Config::new_context

// Safety lints
#![deny(bare_trait_objects)]
#![deny(clippy::large_stack_arrays)]
// Correctness lints
#![deny(clippy::expl_impl_clone_on_copy)]
#![deny(clippy::float_cmp)]
#![deny(clippy::mem_forget)]
// Clarity/formatting lints
#![warn(clippy::checked_conversions)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![warn(clippy::map_flatten)]
#![warn(clippy::match_bool)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::range_minus_one)]
#![warn(clippy::range_plus_one)]
#![allow(clippy::upper_case_acronyms)]
// Documentation lints
#![warn(clippy::doc_link_with_quotes)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::missing_errors_doc)]

pub mod levels;
mod serialize;

mod api;

pub use crate::api::*;

/// Commonly used types and traits.
pub mod prelude {
  pub use crate::api::*;
  pub use crate::levels::*;
}
