// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{
    checksum::{calculate, ChecksumPair},
    cic::{identify, CicVariant},
    Error,
};
use byteorder::{BigEndian, ByteOrder};
use log::{debug, info, warn};
use n64_areas::{HEADER_CRC1, HEADER_CRC2};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FixStatus {
    /// The header already held the computed checksum; nothing was written
    AlreadyCorrect(ChecksumPair),
    /// At least one header word was rewritten
    Fixed {
        stored: ChecksumPair,
        computed: ChecksumPair,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    pub cic: CicVariant,
    pub stored: ChecksumPair,
    pub computed: ChecksumPair,
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        self.stored == self.computed
    }
}

/// Reads CRC1 and CRC2 from the header
pub fn stored_checksum(image: &[u8]) -> ChecksumPair {
    ChecksumPair {
        crc1: BigEndian::read_u32(&image[HEADER_CRC1]),
        crc2: BigEndian::read_u32(&image[HEADER_CRC2]),
    }
}

/// Identifies the boot code of `image` and makes the header checksum match
/// it. Only header words that differ from the computed value are written.
///
/// If the boot code is not one of the known variants, the image is left
/// untouched and [`Error::UnidentifiedBootCode`] is returned.
///
/// # Panics
/// If the boot code is identified and `image` does not cover the whole
/// checksum window (0x101000 bytes).
pub fn fix_crc(image: &mut [u8]) -> Result<FixStatus, Error> {
    let cic = identify(image);
    fix_crc_as(image, cic)
}

/// Like [`fix_crc`], but checksums for `cic` regardless of what the boot
/// code looks like. Useful for images with patched boot code.
///
/// # Panics
/// If `cic` is a known variant and `image` does not cover the whole
/// checksum window (0x101000 bytes).
pub fn fix_crc_as(image: &mut [u8], cic: CicVariant) -> Result<FixStatus, Error> {
    debug!("fixing checksum as {cic}");

    // Both words are computed before either is written
    let computed = match calculate(image, cic) {
        Ok(computed) => computed,
        Err(e) => {
            warn!("{e}; leaving checksum untouched");
            return Err(e);
        }
    };
    let stored = stored_checksum(image);

    if stored == computed {
        info!(
            "checksum already correct: {:08x} {:08x}",
            computed.crc1, computed.crc2
        );
        return Ok(FixStatus::AlreadyCorrect(computed));
    }

    if stored.crc1 != computed.crc1 {
        info!("CRC1 {:08x} -> {:08x}", stored.crc1, computed.crc1);
        BigEndian::write_u32(&mut image[HEADER_CRC1], computed.crc1);
    }
    if stored.crc2 != computed.crc2 {
        info!("CRC2 {:08x} -> {:08x}", stored.crc2, computed.crc2);
        BigEndian::write_u32(&mut image[HEADER_CRC2], computed.crc2);
    }

    Ok(FixStatus::Fixed { stored, computed })
}

/// Checks the header checksum without modifying the image
///
/// # Panics
/// If the boot code is identified and `image` does not cover the whole
/// checksum window (0x101000 bytes).
pub fn verify_crc(image: &[u8]) -> Result<Verification, Error> {
    let cic = identify(image);
    let computed = calculate(image, cic)?;
    let stored = stored_checksum(image);
    let verification = Verification {
        cic,
        stored,
        computed,
    };
    if !verification.is_valid() {
        warn!(
            "checksum mismatch: header has {:08x} {:08x}, expected {:08x} {:08x}",
            stored.crc1, stored.crc2, computed.crc1, computed.crc2
        );
    }
    Ok(verification)
}
