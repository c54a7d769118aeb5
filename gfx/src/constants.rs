/// `GFXA` read as a little-endian `u32`.
pub const MAGIC_A: u32 = u32::from_le_bytes(*b"GFXA");
/// `GFXB` read as a little-endian `u32`.
pub const MAGIC_B: u32 = u32::from_le_bytes(*b"GFXB");

pub const PALETTE_LENGTH_A: usize = 256;
pub const PALETTE_LENGTH_B: usize = 64;

pub const MAGIC_SIZE: usize = 4;
pub const PALETTE_ENTRY_SIZE: usize = 2;
/// Three offsets followed by three counts, all `u16`.
pub const TABLE_DIRECTORY_SIZE: usize = 6 * 2;

pub const TILE_SIZE: usize = 20;
pub const TILE_COLOR_COUNT: usize = 4;
pub const TILE_PIXEL_BYTES: usize = 16;
pub const TILE_DIMENSION: usize = 8;

pub const SPRITE_SIZE_A: usize = 8;
pub const SPRITE_SIZE_B: usize = 7;

pub const ANIMATION_SIZE_A: usize = 8;
pub const ANIMATION_SIZE_B: usize = 10;

pub const TAG_LENGTH: usize = 4;
