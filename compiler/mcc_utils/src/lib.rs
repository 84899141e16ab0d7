// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// Reports a broken compiler invariant. Never used for user-facing errors.
#[macro_export]
macro_rules! bug {
    ($($arg:tt)*) => ({
        panic!("MCC internal error: {}! Aborting...", format!($($arg)*));
    });
}
