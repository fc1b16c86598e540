//! Version and build information display.
//!
//! Build metadata comes from the `built` build script; git fields are
//! absent when the crate is built outside a checkout.

use crate::cli::args::{OutputFormat, VersionArgs};

#[allow(dead_code)]
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Prints version and build information.
pub fn run(args: &VersionArgs) {
    match args.format {
        OutputFormat::Text => println!("{}", render_text()),
        OutputFormat::Json => println!("{}", render_json()),
    }
}

fn render_text() -> String {
    let mut out = format!("{} {}", built_info::PKG_NAME, built_info::PKG_VERSION);
    if let Some(commit) = built_info::GIT_COMMIT_HASH_SHORT {
        let dirty = if built_info::GIT_DIRTY == Some(true) {
            " (dirty)"
        } else {
            ""
        };
        out.push_str(&format!("\ncommit:  {commit}{dirty}"));
    }
    out.push_str(&format!("\nbuilt:   {}", built_info::BUILT_TIME_UTC));
    out.push_str(&format!("\nrustc:   {}", built_info::RUSTC_VERSION));
    out
}

fn render_json() -> serde_json::Value {
    serde_json::json!({
        "name": built_info::PKG_NAME,
        "version": built_info::PKG_VERSION,
        "commit": built_info::GIT_COMMIT_HASH_SHORT,
        "dirty": built_info::GIT_DIRTY,
        "built": built_info::BUILT_TIME_UTC,
        "rustc": built_info::RUSTC_VERSION,
    })
}
