use std::fmt::Write as _;

use rand::Rng;

const MIN_TOKEN_BYTES: usize = 16;

/// Hex-encoded random token of `bytes` bytes.
pub(crate) fn generate(bytes: usize) -> anyhow::Result<String> {
    if bytes < MIN_TOKEN_BYTES {
        anyhow::bail!("token must be at least {MIN_TOKEN_BYTES} bytes, got {bytes}");
    }

    let mut raw = vec![0u8; bytes];
    rand::rng().fill(raw.as_mut_slice());

    let mut token = String::with_capacity(bytes * 2);
    for byte in raw {
        write!(token, "{byte:02x}")?;
    }
    Ok(token)
}
