// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boot checksum handling for N64 cartridge images.
//!
//! The boot code in an image is matched against the known CIC variants,
//! and the checksum the boot ROM will compute over the first megabyte of
//! program data is recomputed and written back into the header.

pub mod checksum;
pub mod cic;
pub mod crc32;
pub mod crc_image;

pub use checksum::ChecksumPair;
pub use cic::CicVariant;
pub use crc_image::FixStatus;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unidentified boot code (fingerprint {0:#010x})")]
    UnidentifiedBootCode(u32),
}
