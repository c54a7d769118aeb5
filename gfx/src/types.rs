use std::{
    fmt::{self, Write},
    ops::Range,
};

use crate::{
    constants::{
        ANIMATION_SIZE_A, ANIMATION_SIZE_B, MAGIC_A, MAGIC_B, MAGIC_SIZE, PALETTE_ENTRY_SIZE,
        PALETTE_LENGTH_A, PALETTE_LENGTH_B, SPRITE_SIZE_A, SPRITE_SIZE_B, TABLE_DIRECTORY_SIZE,
        TAG_LENGTH, TILE_COLOR_COUNT, TILE_DIMENSION, TILE_PIXEL_BYTES, TILE_SIZE,
    },
    validate,
};

/// The two layouts of the package. Told apart by the magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    /// 256 colour palette, animations point at sprites by index.
    A,
    /// 64 colour palette, animations point at sprites by name.
    B,
}

impl FormatVersion {
    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            MAGIC_A => Some(Self::A),
            MAGIC_B => Some(Self::B),
            _ => None,
        }
    }

    pub fn magic(self) -> u32 {
        match self {
            Self::A => MAGIC_A,
            Self::B => MAGIC_B,
        }
    }

    pub fn palette_len(self) -> usize {
        match self {
            Self::A => PALETTE_LENGTH_A,
            Self::B => PALETTE_LENGTH_B,
        }
    }

    pub fn header_size(self) -> usize {
        MAGIC_SIZE + self.palette_len() * PALETTE_ENTRY_SIZE + TABLE_DIRECTORY_SIZE
    }

    pub fn tile_size(self) -> usize {
        TILE_SIZE
    }

    pub fn sprite_size(self) -> usize {
        match self {
            Self::A => SPRITE_SIZE_A,
            Self::B => SPRITE_SIZE_B,
        }
    }

    pub fn animation_size(self) -> usize {
        match self {
            Self::A => ANIMATION_SIZE_A,
            Self::B => ANIMATION_SIZE_B,
        }
    }

    /// Largest tile offset a sprite entry can store.
    pub fn max_sprite_tile_offset(self) -> usize {
        match self {
            Self::A => u16::MAX as usize,
            Self::B => u8::MAX as usize,
        }
    }
}

/// Four raw bytes naming a sprite or an animation.
///
/// All four bytes are significant. There is no terminator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Tag(pub [u8; TAG_LENGTH]);

impl Tag {
    /// Pads with zeroes, anything past four bytes is dropped.
    pub fn new(s: impl AsRef<str>) -> Self {
        let bytes = s.as_ref().as_bytes();
        let mut res = [0u8; TAG_LENGTH];
        let len = bytes.len().min(TAG_LENGTH);

        res[..len].copy_from_slice(&bytes[..len]);

        Self(res)
    }

    pub fn get_bytes(&self) -> &[u8; TAG_LENGTH] {
        &self.0
    }
}

impl From<[u8; TAG_LENGTH]> for Tag {
    fn from(value: [u8; TAG_LENGTH]) -> Self {
        Self(value)
    }
}

impl From<&[u8; TAG_LENGTH]> for Tag {
    fn from(value: &[u8; TAG_LENGTH]) -> Self {
        Self(*value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in &self.0 {
            if c.is_ascii_graphic() || c == b' ' {
                f.write_char(c as char)?;
            } else {
                write!(f, "\\x{c:02x}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{self}\")")
    }
}

/// 8x8 block, 2 bits per pixel. Each pixel picks one of `colors`, which picks a palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    pub colors: [u8; TILE_COLOR_COUNT],
    // row major, two bytes per row, leftmost pixel in the top bits
    pub pixels: [u8; TILE_PIXEL_BYTES],
}

impl Tile {
    pub fn new(colors: [u8; TILE_COLOR_COUNT], pixels: [u8; TILE_PIXEL_BYTES]) -> Self {
        Self { colors, pixels }
    }

    /// Packs a grid of 2-bit values. Only the low two bits of each value are kept.
    pub fn from_pixels(
        colors: [u8; TILE_COLOR_COUNT],
        rows: &[[u8; TILE_DIMENSION]; TILE_DIMENSION],
    ) -> Self {
        let mut pixels = [0u8; TILE_PIXEL_BYTES];

        for (y, row) in rows.iter().enumerate() {
            for (x, value) in row.iter().enumerate() {
                let (byte, shift) = Self::locate(x, y);
                pixels[byte] |= (value & 0b11) << shift;
            }
        }

        Self { colors, pixels }
    }

    fn locate(x: usize, y: usize) -> (usize, usize) {
        (y * 2 + x / 4, 6 - 2 * (x % 4))
    }

    fn pixel_unchecked(&self, x: usize, y: usize) -> u8 {
        let (byte, shift) = Self::locate(x, y);
        (self.pixels[byte] >> shift) & 0b11
    }

    /// 2-bit value at `(x, y)`. `None` if either coordinate is 8 or more.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        (x < TILE_DIMENSION && y < TILE_DIMENSION).then(|| self.pixel_unchecked(x, y))
    }

    /// Palette entry for the pixel at `(x, y)`.
    pub fn palette_index(&self, x: usize, y: usize) -> Option<u8> {
        self.pixel(x, y).map(|pixel| self.colors[pixel as usize])
    }

    pub fn pixel_rows(&self) -> [[u8; TILE_DIMENSION]; TILE_DIMENSION] {
        let mut rows = [[0u8; TILE_DIMENSION]; TILE_DIMENSION];

        rows.iter_mut().enumerate().for_each(|(y, row)| {
            row.iter_mut()
                .enumerate()
                .for_each(|(x, value)| *value = self.pixel_unchecked(x, y))
        });

        rows
    }
}

/// A `width` x `height` block of tiles, stored contiguously in the tile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sprite {
    pub name: Tag,
    /// In tiles.
    pub width: u8,
    /// In tiles.
    pub height: u8,
    pub tile_offset: u16,
}

impl Sprite {
    pub fn new(name: impl Into<Tag>, width: u8, height: u8, tile_offset: u16) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tile_offset,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn tile_range(&self) -> Range<usize> {
        let start = self.tile_offset as usize;
        start..(start + self.tile_count())
    }
}

/// Where an animation's first frame is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRef {
    /// Index into the sprite table. Version A.
    Offset(u16),
    /// Name of the first sprite. Version B.
    Sprite(Tag),
}

impl FrameRef {
    pub fn version(&self) -> FormatVersion {
        match self {
            FrameRef::Offset(_) => FormatVersion::A,
            FrameRef::Sprite(_) => FormatVersion::B,
        }
    }
}

/// `frame_count` sprites, contiguous in the sprite table, starting at `first_frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Animation {
    pub name: Tag,
    pub first_frame: FrameRef,
    pub frame_count: u16,
}

impl Animation {
    pub fn new(name: impl Into<Tag>, first_frame: FrameRef, frame_count: u16) -> Self {
        Self {
            name: name.into(),
            first_frame,
            frame_count,
        }
    }
}

/// The header as it sits on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub magic: u32,
    pub palette: Vec<u16>,
    pub tile_offset: u16,
    pub sprite_offset: u16,
    pub animation_offset: u16,
    pub tile_count: u16,
    pub sprite_count: u16,
    pub animation_count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// `None` accepts either version. Otherwise the other magic is rejected.
    pub version: Option<FormatVersion>,
}

impl DecodeOptions {
    pub fn version(version: FormatVersion) -> Self {
        Self {
            version: Some(version),
        }
    }
}

/// A decoded and validated package.
///
/// Only obtainable from [`crate::decode`] or [`crate::AssetBuilder`], so every cross reference
/// inside resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsAsset {
    pub(crate) version: FormatVersion,
    pub(crate) palette: Vec<u16>,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) sprites: Vec<Sprite>,
    pub(crate) animations: Vec<Animation>,
}

impl GraphicsAsset {
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn palette(&self) -> &[u16] {
        &self.palette
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    /// First sprite with this name. Duplicates are allowed, later ones are shadowed.
    pub fn find_sprite(&self, name: impl Into<Tag>) -> Option<&Sprite> {
        self.find_sprite_index(name).map(|index| &self.sprites[index])
    }

    pub fn find_sprite_index(&self, name: impl Into<Tag>) -> Option<usize> {
        validate::position_of(&self.sprites, name.into())
    }

    pub fn find_animation(&self, name: impl Into<Tag>) -> Option<&Animation> {
        let name = name.into();
        self.animations.iter().find(|animation| animation.name == name)
    }

    /// Tiles of a sprite in row-major order. `None` if the sprite does not fit this asset.
    pub fn sprite_tiles(&self, sprite: &Sprite) -> Option<&[Tile]> {
        self.tiles.get(sprite.tile_range())
    }

    /// Frames of an animation in playback order. `None` if the animation does not fit this asset.
    pub fn frames(&self, animation: &Animation) -> Option<&[Sprite]> {
        let range = validate::frame_range(&self.sprites, animation)?;
        self.sprites.get(range)
    }

    /// The header [`crate::encode`] writes for this asset.
    pub fn header(&self) -> Header {
        let layout = validate::Layout::of(
            self.version,
            self.tiles.len(),
            self.sprites.len(),
            self.animations.len(),
        );

        Header {
            magic: self.version.magic(),
            palette: self.palette.clone(),
            tile_offset: validate::stored_offset(layout.tile_offset),
            sprite_offset: validate::stored_offset(layout.sprite_offset),
            animation_offset: validate::stored_offset(layout.animation_offset),
            tile_count: self.tiles.len() as u16,
            sprite_count: self.sprites.len() as u16,
            animation_count: self.animations.len() as u16,
        }
    }

    /// Size in bytes of the encoded asset.
    pub fn encoded_len(&self) -> usize {
        validate::Layout::of(
            self.version,
            self.tiles.len(),
            self.sprites.len(),
            self.animations.len(),
        )
        .end
    }

    /// Checks every invariant in table order and wraps the tables up.
    pub(crate) fn from_tables(
        version: FormatVersion,
        palette: Vec<u16>,
        tiles: Vec<Tile>,
        sprites: Vec<Sprite>,
        animations: Vec<Animation>,
    ) -> Result<Self, crate::error::Violation> {
        validate::check_layout(version, tiles.len(), sprites.len(), animations.len())?;

        tiles
            .iter()
            .enumerate()
            .try_for_each(|(index, tile)| validate::check_tile(palette.len(), index, tile))?;

        sprites.iter().enumerate().try_for_each(|(index, sprite)| {
            validate::check_sprite(version, tiles.len(), index, sprite)
        })?;

        animations
            .iter()
            .enumerate()
            .try_for_each(|(index, animation)| {
                validate::check_animation(version, &sprites, index, animation)
            })?;

        Ok(Self {
            version,
            palette,
            tiles,
            sprites,
            animations,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tile_pixel_packing() {
        let mut rows = [[0u8; 8]; 8];
        rows[0] = [0, 1, 2, 3, 3, 2, 1, 0];
        rows[7][7] = 2;

        let tile = Tile::from_pixels([10, 11, 12, 13], &rows);

        assert_eq!(tile.pixels[0], 0b00_01_10_11);
        assert_eq!(tile.pixels[1], 0b11_10_01_00);
        assert_eq!(tile.pixels[15], 0b00_00_00_10);
        assert_eq!(tile.pixel(3, 0), Some(3));
        assert_eq!(tile.palette_index(2, 0), Some(12));
        assert_eq!(tile.palette_index(7, 7), Some(12));
        assert_eq!(tile.pixel_rows(), rows);
    }

    #[test]
    fn tile_pixel_out_of_range() {
        let tile = Tile::new([0, 1, 2, 3], [0xff; 16]);

        assert_eq!(tile.pixel(8, 0), None);
        assert_eq!(tile.pixel(0, 8), None);
        assert_eq!(tile.palette_index(7, 8), None);
    }

    #[test]
    fn tile_from_pixels_masks_high_bits() {
        let rows = [[0b111u8; 8]; 8];
        let tile = Tile::from_pixels([0; 4], &rows);

        assert!(tile.pixels.iter().all(|&byte| byte == 0xff));
    }

    #[test]
    fn tag_keeps_all_bytes() {
        let tag = Tag::from([b'A', 0, b'B', 0]);

        assert_ne!(tag, Tag::new("A"));
        assert_eq!(tag.to_string(), "A\\x00B\\x00");
        assert_eq!(Tag::new("WALKING"), Tag::from(b"WALK"));
        assert_eq!(Tag::new("AB"), Tag::from([b'A', b'B', 0, 0]));
    }

    #[test]
    fn version_sizes() {
        assert_eq!(FormatVersion::A.header_size(), 528);
        assert_eq!(FormatVersion::B.header_size(), 144);
        assert_eq!(
            FormatVersion::from_magic(u32::from_le_bytes(*b"GFXB")),
            Some(FormatVersion::B)
        );
        assert_eq!(FormatVersion::from_magic(0), None);
    }

    #[test]
    fn sprite_tile_range() {
        let sprite = Sprite::new(b"HERO", 2, 3, 4);

        assert_eq!(sprite.tile_count(), 6);
        assert_eq!(sprite.tile_range(), 4..10);
    }
}
