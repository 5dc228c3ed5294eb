//! Version command implementation

use crate::error::Result;
use crate::platform;

/// Run version command
pub fn run() -> Result<()> {
    println!("moog-setup {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Minimum Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());
    println!("  Host: {}", host_description());

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn host_description() -> String {
    match platform::resolve() {
        Ok(profile) => format!(
            "{} {}-bit (machine tag {})",
            profile.os_family, profile.pointer_bits, profile.machine_tag
        ),
        Err(_) => format!("{} (unsupported)", std::env::consts::OS),
    }
}
