//! SSH domain logic: `~/.ssh/config` alias blocks and key naming.
//!
//! Pure functions only. File access lives in `crate::infra::ssh`.

use sha2::{Digest, Sha256};

/// Prefix shared by uploaded key names and host aliases.
pub const NAME_PREFIX: &str = "fuzzrig";

/// Remote login user on provisioned instances.
pub const REMOTE_USER: &str = "root";

/// Returns the first 8 hex characters of the SHA-256 of `pubkey`.
///
/// The input is hashed byte-for-byte (including any trailing newline), so the
/// same key file always maps to the same suffix.
#[must_use]
pub fn pubkey_hash(pubkey: &str) -> String {
    let digest = Sha256::digest(pubkey.as_bytes());
    let mut hex = hex_encode(&digest);
    hex.truncate(8);
    hex
}

/// Name under which the local public key is uploaded: `fuzzrig-<hash>`.
#[must_use]
pub fn ssh_key_name(pubkey: &str) -> String {
    format!("{NAME_PREFIX}-{}", pubkey_hash(pubkey))
}

pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}

// ── Alias blocks ─────────────────────────────────────────────────────────────

/// Renders the `~/.ssh/config` block for a provisioned instance.
#[must_use]
pub fn host_block(alias: &str, address: &str, identity_file: &str) -> String {
    format!(
        "Host {alias}\n    HostName {address}\n    User {REMOTE_USER}\n    IdentityFile {identity_file}\n    StrictHostKeyChecking no\n"
    )
}

fn host_header_aliases(line: &str) -> Option<Vec<&str>> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next()?;
    keyword
        .eq_ignore_ascii_case("host")
        .then(|| tokens.collect())
}

fn is_header_for(line: &str, alias: &str) -> bool {
    host_header_aliases(line).is_some_and(|names| names == [alias])
}

/// Removes every block headed by `Host <alias>`.
///
/// A block is the header line plus all following non-blank lines, up to the
/// next blank line or the next `Host` header. Everything else, including line
/// endings, is copied through unchanged.
#[must_use]
pub fn remove_host_block(content: &str, alias: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_block = false;
    for line in content.split_inclusive('\n') {
        if is_header_for(line, alias) {
            in_block = true;
            continue;
        }
        if in_block {
            if line.trim().is_empty() || host_header_aliases(line).is_some() {
                in_block = false;
            } else {
                continue;
            }
        }
        out.push_str(line);
    }
    out
}

/// Replaces any block for `alias` with `block`, appended at the end.
///
/// A single blank line separates the new block from preceding content, so
/// replacing the same alias repeatedly does not grow the file.
#[must_use]
pub fn replace_host_block(content: &str, alias: &str, block: &str) -> String {
    let mut out = remove_host_block(content, alias);
    if !out.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        if !out.ends_with("\n\n") {
            out.push('\n');
        }
    }
    out.push_str(block);
    out
}

/// Counts the blocks headed by `Host <alias>`.
#[must_use]
pub fn count_host_blocks(content: &str, alias: &str) -> usize {
    content.lines().filter(|l| is_header_for(l, alias)).count()
}
