// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reflected CRC-32, used to fingerprint boot code.

use lazy_static::lazy_static;

/// Reversed form of 0x04c11db7
pub const POLYNOMIAL: u32 = 0xedb8_8320;

pub fn generate_table() -> [u32; 256] {
    let mut table = [0; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut c = i as u32;
        for _ in 0..8 {
            if c & 1 != 0 {
                c = (c >> 1) ^ POLYNOMIAL;
            } else {
                c >>= 1;
            }
        }
        *entry = c;
    }
    table
}

lazy_static! {
    pub static ref CRC32_TABLE: [u32; 256] = generate_table();
}

/// Standard CRC-32 (init 0xffffffff, reflected, final xor 0xffffffff)
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &b in data {
        crc = (crc >> 8) ^ CRC32_TABLE[((crc ^ b as u32) & 0xff) as usize];
    }
    !crc
}
