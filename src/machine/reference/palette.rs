// Master palette for the reference core
//
// 64 entries indexed $00-$3F. Entries $xD-$xF are blacks.

/// NES master palette, 0xRRGGBB per entry (NTSC approximation)
pub const MASTER_PALETTE: [u32; 64] = [
    // $00-$0F
    0x666666, 0x002A88, 0x1412A7, 0x3B00A4, 0x5C007E, 0x6E0040, 0x6C0600, 0x561D00,
    0x333500, 0x0B4800, 0x005200, 0x004F08, 0x00404D, 0x000000, 0x000000, 0x000000,
    // $10-$1F
    0xADADAD, 0x155FD9, 0x4240FF, 0x7527FE, 0xA01ACC, 0xB71E7B, 0xB53120, 0x994E00,
    0x6B6D00, 0x388700, 0x0C9300, 0x008F32, 0x007C8D, 0x000000, 0x000000, 0x000000,
    // $20-$2F
    0xFFFEFF, 0x64B0FF, 0x9290FF, 0xC676FF, 0xF36AFF, 0xFE6ECC, 0xFE8170, 0xEA9E22,
    0xBCBE00, 0x88D800, 0x5CE430, 0x45E082, 0x48CDDE, 0x4F4F4F, 0x000000, 0x000000,
    // $30-$3F
    0xFFFEFF, 0xC0DFFF, 0xD3D2FF, 0xE8C8FF, 0xFBC2FF, 0xFEC4EA, 0xFECCC5, 0xF7D8A5,
    0xE4E594, 0xCFEF96, 0xBDF4AB, 0xB3F3CC, 0xB5EBF2, 0xB8B8B8, 0x000000, 0x000000,
];

/// Universal background color ($0F, black)
pub const BACKGROUND: u8 = 0x0F;

/// Number of selectable hues ($01-$0C)
pub const HUE_COUNT: u8 = 12;

/// RGBA bytes for a palette index (index is masked to 6 bits)
#[inline]
pub fn rgba(index: u8) -> [u8; 4] {
    let rgb = MASTER_PALETTE[(index & 0x3F) as usize];
    [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 0xFF]
}

/// Four-color sub-palette for 2bpp tiles: background plus three shades of a hue
///
/// `hue` wraps into $01-$0C.
pub fn sub_palette(hue: u8) -> [u8; 4] {
    let hue = 0x01 + hue % HUE_COUNT;
    [BACKGROUND, hue, hue + 0x10, hue + 0x20]
}
