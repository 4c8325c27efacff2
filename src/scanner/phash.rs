//! Perceptual hashing for camera frames.
//!
//! Hashes are compact base64 strings so the previous frame's hash can sit
//! in scanner state as plain data. Distance between two hashes is the
//! hamming distance; unparseable hashes compare as maximally distant so a
//! corrupt value can never look steady.

use anyhow::Result;
use image_hasher::{HashAlg, HasherConfig, ImageHash};

pub fn compute_phash(image_bytes: &[u8]) -> Result<String> {
    let img = image::load_from_memory(image_bytes)?;
    let hasher = HasherConfig::new()
        .hash_alg(HashAlg::DoubleGradient)
        .hash_size(8, 8)
        .to_hasher();

    let hash = hasher.hash_image(&img);
    Ok(hash.to_base64())
}

pub fn compute_hamming_distance(lhs: &str, rhs: &str) -> u32 {
    let Ok(h1) = ImageHash::<Vec<u8>>::from_base64(lhs) else {
        return u32::MAX;
    };
    let Ok(h2) = ImageHash::<Vec<u8>>::from_base64(rhs) else {
        return u32::MAX;
    };
    h1.dist(&h2)
}
