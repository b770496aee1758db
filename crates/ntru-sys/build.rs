// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

use std::env;

/// Extra directory searched for `libntruencrypt`.
const LIB_DIR_VAR: &str = "NTRUENCRYPT_LIB_DIR";
/// When set to anything but `0`, link the static archive instead of the shared object.
const STATIC_VAR: &str = "NTRUENCRYPT_STATIC";

fn main() {
    println!("cargo:rerun-if-env-changed={LIB_DIR_VAR}");
    println!("cargo:rerun-if-env-changed={STATIC_VAR}");

    if let Ok(dir) = env::var(LIB_DIR_VAR) {
        println!("cargo:rustc-link-search=native={dir}");
    }

    let kind = match env::var(STATIC_VAR) {
        Ok(v) if v != "0" => "static",
        _ => "dylib",
    };
    println!("cargo:rustc-link-lib={kind}=ntruencrypt");
}
