//! CPU workloads driven by the executor.
//!
//! AES-256-GCM, SHA-256 and gzip run the real algorithms over in-memory
//! buffers. [`ModExpProxy`] stands in for RSA-2048 and is reported as a
//! synthetic metric.

use super::executor::Workload;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::hint::black_box;
use std::io::Write;

pub const SINGLE_CORE_BATCH: u64 = 10_000;
pub const MULTI_CORE_BATCH: u64 = 5_000;
pub const AES_BUFFER_BYTES: usize = 1024 * 1024;
pub const SHA_BUFFER_BYTES: usize = 512 * 1024;
pub const GZIP_BUFFER_BYTES: usize = 1024 * 1024;
pub const MODEXP_BATCH: u64 = 100;

/// Deterministic, moderately compressible payload.
pub fn payload(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    (0..len)
        .map(|i| {
            if i % 64 < 40 {
                // text-like run
                b"octane fuel grade benchmark "[i % 28]
            } else {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xFF) as u8
            }
        })
        .collect()
}

/// Integer/float mix for the single-core score: sqrt * sin per operation.
#[derive(Debug, Clone)]
pub struct ScalarCompute {
    pub iterations: u64,
}

impl ScalarCompute {
    pub fn single_core() -> Self {
        ScalarCompute {
            iterations: SINGLE_CORE_BATCH,
        }
    }
}

impl Workload for ScalarCompute {
    fn name(&self) -> &str {
        "single_core"
    }

    fn run_batch(&self) -> u64 {
        let mut acc = 0.0f64;
        for i in 0..self.iterations {
            let x = i as f64;
            acc += black_box(x.sqrt() * x.sin());
        }
        black_box(acc);
        self.iterations
    }
}

/// Per-thread compute for the multi-core score: sqrt * cos per operation.
#[derive(Debug, Clone)]
pub struct ParallelCompute {
    pub iterations: u64,
}

impl ParallelCompute {
    pub fn multi_core() -> Self {
        ParallelCompute {
            iterations: MULTI_CORE_BATCH,
        }
    }
}

impl Workload for ParallelCompute {
    fn name(&self) -> &str {
        "multi_core"
    }

    fn run_batch(&self) -> u64 {
        let mut acc = 0.0f64;
        for i in 0..self.iterations {
            let x = i as f64;
            acc += black_box(x.sqrt() * x.cos());
        }
        black_box(acc);
        self.iterations
    }
}

/// AES-256-GCM encryption of a fixed buffer. Counts bytes encrypted.
pub struct AesGcmEncrypt {
    cipher: Aes256Gcm,
    plaintext: Vec<u8>,
}

impl AesGcmEncrypt {
    pub fn new(buffer_bytes: usize) -> Self {
        let key: &Key<Aes256Gcm> = (&[0x42u8; 32]).into();
        AesGcmEncrypt {
            cipher: Aes256Gcm::new(key),
            plaintext: payload(buffer_bytes),
        }
    }
}

impl Workload for AesGcmEncrypt {
    fn name(&self) -> &str {
        "aes_256_gcm"
    }

    fn run_batch(&self) -> u64 {
        let nonce = Nonce::from_slice(&[0x24u8; 12]);
        match self.cipher.encrypt(nonce, self.plaintext.as_slice()) {
            Ok(ciphertext) => {
                black_box(ciphertext);
                self.plaintext.len() as u64
            }
            Err(_) => 0,
        }
    }
}

/// SHA-256 digest of a fixed buffer. Counts bytes hashed.
pub struct Sha256Digest {
    data: Vec<u8>,
}

impl Sha256Digest {
    pub fn new(buffer_bytes: usize) -> Self {
        Sha256Digest {
            data: payload(buffer_bytes),
        }
    }
}

impl Workload for Sha256Digest {
    fn name(&self) -> &str {
        "sha256"
    }

    fn run_batch(&self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        black_box(hasher.finalize());
        self.data.len() as u64
    }
}

/// Modular exponentiation with a 61-bit prime modulus, standing in for an
/// RSA-2048 private key operation. Counts exponentiations.
#[derive(Debug, Clone)]
pub struct ModExpProxy {
    pub batch: u64,
}

const MERSENNE_61: u64 = (1 << 61) - 1;
const PUBLIC_EXPONENT: u64 = 65_537;

impl ModExpProxy {
    pub fn rsa_2048() -> Self {
        ModExpProxy {
            batch: MODEXP_BATCH,
        }
    }
}

pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let m = modulus as u128;
    let mut result: u128 = 1;
    let mut b = (base % modulus) as u128;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        exp >>= 1;
    }
    result as u64
}

impl Workload for ModExpProxy {
    fn name(&self) -> &str {
        "rsa_2048_proxy"
    }

    fn run_batch(&self) -> u64 {
        let mut acc = 0u64;
        for i in 0..self.batch {
            acc ^= mod_pow(black_box(i + 2), PUBLIC_EXPONENT, MERSENNE_61);
        }
        black_box(acc);
        self.batch
    }
}

/// Gzip (default level) of a fixed buffer. Counts input bytes compressed.
pub struct GzipCompress {
    data: Vec<u8>,
}

impl GzipCompress {
    pub fn new(buffer_bytes: usize) -> Self {
        GzipCompress {
            data: payload(buffer_bytes),
        }
    }
}

impl Workload for GzipCompress {
    fn name(&self) -> &str {
        "gzip"
    }

    fn run_batch(&self) -> u64 {
        let mut encoder = GzEncoder::new(Vec::with_capacity(self.data.len() / 2), Compression::default());
        let compressed = encoder.write_all(&self.data).and_then(|_| encoder.finish());
        match compressed {
            Ok(out) => {
                black_box(out);
                self.data.len() as u64
            }
            Err(e) => {
                log::warn!("[Workload] gzip batch failed: {}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_payload_deterministic() {
        assert_eq!(payload(4096), payload(4096));
        assert_eq!(payload(100).len(), 100);
    }

    #[test]
    fn test_compute_batches_report_iterations() {
        assert_eq!(ScalarCompute::single_core().run_batch(), 10_000);
        assert_eq!(ParallelCompute::multi_core().run_batch(), 5_000);
        assert_eq!(ModExpProxy::rsa_2048().run_batch(), 100);
    }

    #[test]
    fn test_crypto_batches_report_bytes() {
        assert_eq!(AesGcmEncrypt::new(AES_BUFFER_BYTES).run_batch(), 1024 * 1024);
        assert_eq!(Sha256Digest::new(SHA_BUFFER_BYTES).run_batch(), 512 * 1024);
    }

    #[test]
    fn test_gzip_output_is_valid() {
        let data = payload(64 * 1024);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data).expect("write");
        let compressed = encoder.finish().expect("finish");
        assert!(compressed.len() < data.len(), "payload should compress");

        let mut decoded = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .expect("decode");
        assert_eq!(decoded, data);

        assert_eq!(GzipCompress::new(64 * 1024).run_batch(), 64 * 1024);
    }

    #[test]
    fn test_mod_pow() {
        assert_eq!(mod_pow(4, 13, 497), 445);
        assert_eq!(mod_pow(2, 10, 1_000_000), 1024);
        assert_eq!(mod_pow(7, 0, 13), 1);
        assert_eq!(mod_pow(7, 5, 1), 0);
    }
}
