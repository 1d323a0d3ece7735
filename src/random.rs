//! The Random Source collaborator: produces uniformly random bytes for the
//! permutation seed, preferring a hosted quantum RNG and falling back to a
//! local cryptographically secure source on any failure.

use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Deserialize;

/// ANU Quantum Random Numbers API, returning `uint16` words.
const ANU_QRNG_URL: &str = "https://qrng.anu.edu.au/API/jsonI.php";

/// Bound on the external call; on expiry the fallback is taken silently
/// from the caller's perspective (only a log line distinguishes the path).
const EXTERNAL_TIMEOUT: Duration = Duration::from_secs(10);

/// ANU caps a single request at 1024 `uint16` words.
const MAX_WORDS_PER_REQUEST: usize = 1024;

#[derive(Deserialize)]
struct QrngResponse {
    success: bool,
    #[serde(default)]
    data: Vec<u16>,
}

/// Returns exactly `n` uniformly random bytes. Always succeeds: any failure
/// reaching the external quantum RNG is absorbed by falling back to a local
/// cryptographic RNG, with only a log line marking which path was taken.
pub fn random_bytes(n: usize, use_external: bool) -> Vec<u8> {
    if use_external {
        match fetch_quantum_bytes(n) {
            Ok(bytes) => {
                info!("random_bytes: obtained {} bytes from external QRNG", n);
                return bytes;
            }
            Err(err) => {
                warn!(
                    "random_bytes: external QRNG unavailable ({}), falling back to local CSPRNG",
                    err
                );
            }
        }
    } else {
        debug!("random_bytes: external RNG disabled by configuration, using local CSPRNG");
    }

    let mut bytes = vec![0u8; n];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

fn fetch_quantum_bytes(n: usize) -> Result<Vec<u8>, String> {
    let num_words = n.div_ceil(2).min(MAX_WORDS_PER_REQUEST);
    if num_words * 2 < n {
        return Err(format!(
            "requested length {} exceeds what a single QRNG request can supply",
            n
        ));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(EXTERNAL_TIMEOUT)
        .build()
        .map_err(|e| e.to_string())?;

    let response = client
        .get(ANU_QRNG_URL)
        .query(&[
            ("length", num_words.to_string()),
            ("type", "uint16".to_string()),
            ("size", "1".to_string()),
        ])
        .send()
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("HTTP status {}", response.status()));
    }

    let parsed: QrngResponse = response.json().map_err(|e| e.to_string())?;
    if !parsed.success {
        return Err("ANU QRNG API reported failure".to_string());
    }

    let mut bytes = Vec::with_capacity(num_words * 2);
    for word in parsed.data {
        bytes.extend_from_slice(&word.to_be_bytes());
    }

    if bytes.len() < n {
        return Err(format!(
            "ANU QRNG returned {} bytes, needed {}",
            bytes.len(),
            n
        ));
    }

    bytes.truncate(n);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_path_returns_requested_length() {
        let bytes = random_bytes(16, false);
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn fallback_path_is_not_all_zero() {
        // Overwhelmingly likely for a CSPRNG; guards against a broken stub.
        let bytes = random_bytes(32, false);
        assert!(bytes.iter().any(|&b| b != 0));
    }
}
