//! Build script for llbc-sys.
//!
//! Records which native library variant matches the current cargo profile so
//! that `llbc-sys` can expose it as [`DEFAULT_VARIANT`]. The value is only a
//! default: callers resolve the real library identity at runtime.
//!
//! # Environment variables
//!
//! - `LLBC_DEFAULT_VARIANT` — Force the default variant (`debug` or
//!   `release`) regardless of the cargo profile. Useful when a release build
//!   of the host must load the debug flavour of the native libraries.

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=LLBC_DEFAULT_VARIANT");

    let variant = match env::var("LLBC_DEFAULT_VARIANT") {
        Ok(forced) => match forced.trim().to_ascii_lowercase().as_str() {
            "debug" | "dbg" => "debug",
            "release" | "rel" => "release",
            other => panic!("LLBC_DEFAULT_VARIANT must be debug or release, got {other:?}"),
        },
        // PROFILE is "debug" for dev/test builds and "release" for release/bench.
        Err(_) => match env::var("PROFILE").as_deref() {
            Ok("release") => "release",
            _ => "debug",
        },
    };

    println!("cargo:rustc-env=LLBC_SYS_DEFAULT_VARIANT={variant}");
}
