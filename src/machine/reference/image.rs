// iNES program image parsing
//
// Layout: 16-byte header, optional 512-byte trainer, PRG-ROM banks (16 KiB),
// CHR-ROM banks (8 KiB).

use crate::machine::CoreError;

/// iNES header size in bytes
pub const HEADER_SIZE: usize = 16;

/// iNES magic number ("NES" followed by MS-DOS EOF)
pub const INES_MAGIC: [u8; 4] = *b"NES\x1A";

/// PRG-ROM bank size (16 KiB)
pub const PRG_BANK_SIZE: usize = 16 * 1024;

/// CHR-ROM bank size (8 KiB)
pub const CHR_BANK_SIZE: usize = 8 * 1024;

/// Trainer size when flag 6 bit 2 is set
pub const TRAINER_SIZE: usize = 512;

/// A parsed iNES image
#[derive(Debug, Clone)]
pub struct ProgramImage {
    /// PRG-ROM contents
    pub prg_rom: Vec<u8>,
    /// CHR-ROM contents (empty when the board uses CHR-RAM)
    pub chr_rom: Vec<u8>,
    /// iNES mapper number
    pub mapper: u8,
}

impl ProgramImage {
    /// Parse an iNES image
    ///
    /// # Errors
    /// [`CoreError::InvalidImage`] when the header is missing, the magic does
    /// not match, there is no PRG-ROM, or the file is shorter than the header
    /// claims.
    pub fn parse(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() < HEADER_SIZE {
            return Err(CoreError::InvalidImage(format!(
                "image is {} bytes, shorter than the {}-byte header",
                bytes.len(),
                HEADER_SIZE
            )));
        }

        if bytes[0..4] != INES_MAGIC {
            return Err(CoreError::InvalidImage("missing iNES magic".to_string()));
        }

        let prg_banks = bytes[4] as usize;
        let chr_banks = bytes[5] as usize;
        let flags6 = bytes[6];
        let flags7 = bytes[7];

        if prg_banks == 0 {
            return Err(CoreError::InvalidImage("image has no PRG-ROM".to_string()));
        }

        let trainer = if flags6 & 0x04 != 0 { TRAINER_SIZE } else { 0 };
        let prg_start = HEADER_SIZE + trainer;
        let chr_start = prg_start + prg_banks * PRG_BANK_SIZE;
        let end = chr_start + chr_banks * CHR_BANK_SIZE;

        if bytes.len() < end {
            return Err(CoreError::InvalidImage(format!(
                "image truncated: header needs {} bytes, got {}",
                end,
                bytes.len()
            )));
        }

        Ok(Self {
            prg_rom: bytes[prg_start..chr_start].to_vec(),
            chr_rom: bytes[chr_start..end].to_vec(),
            mapper: (flags7 & 0xF0) | (flags6 >> 4),
        })
    }

    /// Pattern data to display: CHR-ROM, or PRG-ROM for CHR-RAM boards
    pub fn pattern_data(&self) -> &[u8] {
        if self.chr_rom.is_empty() {
            &self.prg_rom
        } else {
            &self.chr_rom
        }
    }
}

/// Build a minimal valid iNES image, used by tests and benches
pub fn build_image(prg_banks: u8, chr_banks: u8, fill: u8) -> Vec<u8> {
    let mut image = vec![0u8; HEADER_SIZE];
    image[0..4].copy_from_slice(&INES_MAGIC);
    image[4] = prg_banks;
    image[5] = chr_banks;
    image.resize(
        HEADER_SIZE + prg_banks as usize * PRG_BANK_SIZE + chr_banks as usize * CHR_BANK_SIZE,
        fill,
    );
    image
}
