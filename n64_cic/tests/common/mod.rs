// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Not every test binary uses every helper
#![allow(dead_code)]

use n64_areas::{BOOT_CODE, CHECKSUM_END};
use n64_cic::crc32::{crc32, CRC32_TABLE};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn xorshift_fill(buf: &mut [u8], mut state: u32) {
    for b in buf.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *b = state as u8;
    }
}

/// Rewrites the last four bytes of the boot code so that the whole window
/// has CRC-32 `target`.
///
/// Each table entry has a distinct top byte, so the four table indices the
/// last four steps must hit can be recovered from the final register alone.
pub fn forge_boot_code(image: &mut [u8], target: u32) {
    let table = &*CRC32_TABLE;
    let tail = BOOT_CODE.end - 4;

    let mut reg = !0u32;
    for &b in &image[BOOT_CODE.start..tail] {
        reg = (reg >> 8) ^ table[((reg ^ b as u32) & 0xff) as usize];
    }

    let mut want = !target;
    let mut indices = [0usize; 4];
    for k in (0..4).rev() {
        let idx = (0..256)
            .find(|&i| table[i] >> 24 == want >> 24)
            .unwrap();
        indices[k] = idx;
        want = (want ^ table[idx]) << 8;
    }

    for (k, &idx) in indices.iter().enumerate() {
        image[tail + k] = ((reg ^ idx as u32) & 0xff) as u8;
        reg = (reg >> 8) ^ table[idx];
    }

    assert_eq!(crc32(&image[BOOT_CODE]), target);
}

/// A full-size image with random boot code and data, whose boot code
/// fingerprints as `target`
pub fn synthetic_image(target: u32, data_seed: Option<u32>) -> Vec<u8> {
    let mut image = vec![0u8; CHECKSUM_END];
    image[0x20..0x34].copy_from_slice(b"SYNTHETIC           ");
    image[0x3b] = b'N';
    xorshift_fill(&mut image[BOOT_CODE], target);
    if let Some(seed) = data_seed {
        xorshift_fill(&mut image[BOOT_CODE.end..], seed);
    }
    forge_boot_code(&mut image, target);
    image
}
