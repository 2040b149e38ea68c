use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SAVEDSEARCH_DIR: &str = ".savedsearch";
pub const STATE_DIR: &str = ".savedsearch/state";
pub const PROVIDER_FILE: &str = ".savedsearch/provider.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn savedsearch_dir(root: &Path) -> PathBuf {
    root.join(SAVEDSEARCH_DIR)
}

pub fn state_dir(root: &Path) -> PathBuf {
    root.join(STATE_DIR)
}

pub fn provider_path(root: &Path) -> PathBuf {
    root.join(PROVIDER_FILE)
}

pub fn state_path(root: &Path, name: &str) -> PathBuf {
    state_dir(root).join(format!("{}.yaml", state_file_stem(name)))
}

/// Entity names may hold any printable text; everything outside
/// `[A-Za-z0-9._-]` is percent-encoded so the mapping stays reversible.
pub fn state_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            b'.' if !out.is_empty() => out.push('.'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
