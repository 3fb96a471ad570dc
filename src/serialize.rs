// Copyright (c) 2024-2025, The rhevce contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause

cfg_if::cfg_if! {
  if #[cfg(feature = "serialize")] {
    pub use serde::*;
  } else {
    pub use noop_proc_macro::{Deserialize, Serialize};
  }
}
