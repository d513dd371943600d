// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout of an N64 cartridge image, in big-endian (`.z64`) byte order.
//!
//! The first 0x40 bytes are the header, followed by the boot code (IPL3)
//! up to 0x1000. The boot ROM checksums the first megabyte of program data
//! after the boot code and compares the result against the two CRC words
//! in the header.

use packed_struct::prelude::*;
use serde::{Serialize, Serializer};
use std::ops::Range;

pub const HEADER_SIZE: usize = 0x40;

/// First checksum word (CRC1)
pub const HEADER_CRC1: Range<usize> = 0x10..0x14;
/// Second checksum word (CRC2)
pub const HEADER_CRC2: Range<usize> = 0x14..0x18;

/// Boot code window used to fingerprint the CIC variant
pub const BOOT_CODE: Range<usize> = HEADER_SIZE..0x1000;

pub const CHECKSUM_START: usize = 0x1000;
pub const CHECKSUM_LENGTH: usize = 0x10_0000;
pub const CHECKSUM_END: usize = CHECKSUM_START + CHECKSUM_LENGTH;

/// Region of the boot code that the CIC-6105 checksum mixes into its
/// first accumulator. Offsets into it wrap every 0x100 bytes.
pub const CIC6105_BOOT_TABLE: usize = HEADER_SIZE + 0x0710;

// Byte 0x3b of the header
#[derive(PrimitiveEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaFormat {
    // 'C'
    ExpandableCartridge = 0x43,
    // 'D'
    Disk = 0x44,
    // 'E'
    DiskExpansion = 0x45,
    // 'N'
    Cartridge = 0x4e,
    // 'Z'
    Aleck64 = 0x5a,
}

#[derive(Clone, Debug, PackedStruct, Serialize)]
#[repr(C)]
#[packed_struct(size_bytes = "0x40", bit_numbering = "msb0", endian = "msb")]
pub struct RomHeader {
    /// PI domain 1 latency / pulse width / page size / release
    #[packed_field(bytes = "0..=3")]
    pub pi_bsd_config: u32,
    #[packed_field(bytes = "4..=7")]
    pub clock_rate: u32,
    #[packed_field(bytes = "8..=11")]
    pub boot_address: u32,
    #[packed_field(bytes = "12..=15")]
    pub libultra_version: u32,
    #[packed_field(bytes = "16..=19")]
    pub crc1: u32,
    #[packed_field(bytes = "20..=23")]
    pub crc2: u32,
    #[packed_field(bytes = "24..=31")]
    reserved0: [u8; 8],
    /// Space padded, usually ASCII or Shift-JIS
    #[packed_field(bytes = "32..=51")]
    pub image_name: [u8; 20],
    #[packed_field(bytes = "52..=58")]
    reserved1: [u8; 7],
    #[packed_field(bytes = "59", ty = "enum")]
    #[serde(serialize_with = "serialize_media_format")]
    pub media_format: EnumCatchAll<MediaFormat>,
    #[packed_field(bytes = "60..=61")]
    pub cartridge_id: [u8; 2],
    #[packed_field(bytes = "62")]
    pub region: u8,
    #[packed_field(bytes = "63")]
    pub version: u8,
}

fn serialize_media_format<S: Serializer>(
    media_format: &EnumCatchAll<MediaFormat>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(media_format.to_primitive())
}

impl RomHeader {
    /// Unpacks the header from the start of an image.
    ///
    /// # Panics
    /// If `image` is shorter than [`HEADER_SIZE`].
    pub fn from_image(image: &[u8]) -> Result<RomHeader, packed_struct::PackingError> {
        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&image[..HEADER_SIZE]);
        RomHeader::unpack(&raw)
    }

    /// The image name with trailing padding removed
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.image_name)
            .trim_end_matches(&[' ', '\0'][..])
            .to_string()
    }
}
