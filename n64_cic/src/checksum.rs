// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The checksum the boot code computes over the first megabyte of program
//! data, and compares against CRC1/CRC2 in the header before jumping to
//! the entry point.

use crate::{
    cic::{boot_code_fingerprint, CicVariant},
    Error,
};
use byteorder::{BigEndian, ByteOrder};
use log::debug;
use n64_areas::{CHECKSUM_END, CHECKSUM_START, CIC6105_BOOT_TABLE};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChecksumPair {
    pub crc1: u32,
    pub crc2: u32,
}

#[derive(Copy, Clone, Debug)]
struct Accumulators {
    t1: u32,
    t2: u32,
    t3: u32,
    t4: u32,
    t5: u32,
    t6: u32,
}

impl Accumulators {
    fn new(seed: u32) -> Accumulators {
        Accumulators {
            t1: seed,
            t2: seed,
            t3: seed,
            t4: seed,
            t5: seed,
            t6: seed,
        }
    }

    /// Mixes in one data word. `boot_word` is only present for 6105, which
    /// keys `t1` off its own boot code instead of `t5`.
    fn step(&mut self, d: u32, boot_word: Option<u32>) {
        let sum = self.t6.wrapping_add(d);
        // t4 counts carries out of t6
        if sum < self.t6 {
            self.t4 = self.t4.wrapping_add(1);
        }
        self.t6 = sum;
        self.t3 ^= d;

        let r = d.rotate_left(d & 0x1f);
        self.t5 = self.t5.wrapping_add(r);

        if self.t2 > d {
            self.t2 ^= r;
        } else {
            self.t2 ^= self.t6 ^ d;
        }

        let key = match boot_word {
            Some(w) => w,
            None => self.t5,
        };
        self.t1 = self.t1.wrapping_add(key ^ d);
    }

    fn finalize(&self, cic: CicVariant) -> ChecksumPair {
        let Accumulators {
            t1,
            t2,
            t3,
            t4,
            t5,
            t6,
        } = *self;
        match cic {
            CicVariant::Cic6103 => ChecksumPair {
                crc1: (t6 ^ t4).wrapping_add(t3),
                crc2: (t5 ^ t2).wrapping_add(t1),
            },
            CicVariant::Cic6106 => ChecksumPair {
                crc1: t6.wrapping_mul(t4).wrapping_add(t3),
                crc2: t5.wrapping_mul(t2).wrapping_add(t1),
            },
            _ => ChecksumPair {
                crc1: t6 ^ t4 ^ t3,
                crc2: t5 ^ t2 ^ t1,
            },
        }
    }
}

/// Computes the checksum pair `cic`'s boot code expects for `image`.
///
/// The image is not classified here; pass the result of
/// [`crate::cic::identify`] or a known variant.
///
/// # Panics
/// If `image` does not cover the whole checksum window (0x101000 bytes).
pub fn calculate(image: &[u8], cic: CicVariant) -> Result<ChecksumPair, Error> {
    let seed = match cic.seed() {
        Some(seed) => seed,
        None => return Err(Error::UnidentifiedBootCode(boot_code_fingerprint(image))),
    };
    assert!(
        image.len() >= CHECKSUM_END,
        "image is {:#x} bytes, checksum window ends at {CHECKSUM_END:#x}",
        image.len()
    );
    debug!("{cic}: seed {seed:#010x}");

    let mut acc = Accumulators::new(seed);
    for i in (CHECKSUM_START..CHECKSUM_END).step_by(4) {
        let d = BigEndian::read_u32(&image[i..i + 4]);
        let boot_word = match cic {
            CicVariant::Cic6105 => {
                let offset = CIC6105_BOOT_TABLE + (i & 0xff);
                Some(BigEndian::read_u32(&image[offset..offset + 4]))
            }
            _ => None,
        };
        acc.step(d, boot_word);
    }

    Ok(acc.finalize(cic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn known_variants() -> impl Iterator<Item = CicVariant> {
        CicVariant::iter().filter(|c| *c != CicVariant::Unknown)
    }

    fn accumulators() -> Accumulators {
        Accumulators {
            t1: 0x7,
            t2: 0x6,
            t3: 0x5,
            t4: 0x3,
            t5: 0x20,
            t6: 0x10,
        }
    }

    #[test]
    fn finalize_xor() {
        let pair = accumulators().finalize(CicVariant::Cic6102);
        assert_eq!(pair, ChecksumPair { crc1: 0x16, crc2: 0x21 });
        assert_eq!(accumulators().finalize(CicVariant::Cic6101), pair);
        assert_eq!(accumulators().finalize(CicVariant::Cic6105), pair);
    }

    #[test]
    fn finalize_6103_adds() {
        let pair = accumulators().finalize(CicVariant::Cic6103);
        assert_eq!(pair, ChecksumPair { crc1: 0x18, crc2: 0x2d });
    }

    #[test]
    fn finalize_6106_multiplies() {
        let pair = accumulators().finalize(CicVariant::Cic6106);
        assert_eq!(pair, ChecksumPair { crc1: 0x35, crc2: 0xc7 });

        let acc = Accumulators {
            t6: 0x8000_0000,
            t4: 2,
            t3: 1,
            t5: 0xffff_ffff,
            t2: 0xffff_ffff,
            t1: 0xffff_ffff,
        };
        // 0x8000_0000 * 2 wraps to 0; 0xffff_ffff^2 wraps to 1
        assert_eq!(
            acc.finalize(CicVariant::Cic6106),
            ChecksumPair { crc1: 1, crc2: 0 }
        );
    }

    #[test]
    fn carry_increments_t4() {
        let mut acc = Accumulators::new(0xffff_fff0);
        acc.step(0x10, None);
        assert_eq!(acc.t6, 0);
        assert_eq!(acc.t4, 0xffff_fff1);
        acc.step(0x10, None);
        assert_eq!(acc.t6, 0x10);
        assert_eq!(acc.t4, 0xffff_fff1);
    }

    #[test]
    fn zero_window() {
        let image = vec![0u8; CHECKSUM_END];
        for cic in known_variants() {
            let s = cic.seed().unwrap();
            // With every word zero, only t1 moves: by t5 (== seed) per word,
            // or by the (zero) boot code word for 6105.
            let t1 = if cic == CicVariant::Cic6105 {
                s
            } else {
                s.wrapping_mul(0x4_0001)
            };
            let expected = match cic {
                CicVariant::Cic6103 => ChecksumPair { crc1: s, crc2: t1 },
                CicVariant::Cic6106 => ChecksumPair {
                    crc1: s.wrapping_mul(s).wrapping_add(s),
                    crc2: s.wrapping_mul(s).wrapping_add(t1),
                },
                _ => ChecksumPair { crc1: s, crc2: t1 },
            };
            assert_eq!(calculate(&image, cic).unwrap(), expected, "{cic}");
        }
    }

    #[test]
    fn unknown_is_rejected() {
        let image = vec![0u8; CHECKSUM_END];
        match calculate(&image, CicVariant::Unknown) {
            Err(Error::UnidentifiedBootCode(fp)) => assert_eq!(fp, boot_code_fingerprint(&image)),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    #[should_panic]
    fn short_image_panics() {
        let image = vec![0u8; CHECKSUM_END - 4];
        let _ = calculate(&image, CicVariant::Cic6102);
    }
}
