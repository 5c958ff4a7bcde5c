// Stamps the arielfwctl version into the binary.
//
// Packaged builds export ARIELFW_VERSION; local builds report the workspace
// version from Cargo.toml.

fn main() {
    let version = match std::env::var("ARIELFW_VERSION") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => env!("CARGO_PKG_VERSION").to_string(),
    };
    println!("cargo:rustc-env=ARIELFW_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=ARIELFW_VERSION");
}
