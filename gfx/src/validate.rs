//! Invariants shared by the decoder and the builder.
use std::ops::Range;

use crate::{
    error::{RefKind, Table, Violation},
    types::{Animation, FormatVersion, FrameRef, Sprite, Tag, Tile},
};

const MAX_OFFSET: usize = u16::MAX as usize;
const MAX_COUNT: usize = u16::MAX as usize;

/// Byte positions of the tables when written back to back after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    pub tile_offset: usize,
    pub sprite_offset: usize,
    pub animation_offset: usize,
    pub end: usize,
}

impl Layout {
    pub fn of(version: FormatVersion, tiles: usize, sprites: usize, animations: usize) -> Self {
        let tile_offset = version.header_size();
        let sprite_offset = tile_offset + tiles * version.tile_size();
        let animation_offset = sprite_offset + sprites * version.sprite_size();
        let end = animation_offset + animations * version.animation_size();

        Self {
            tile_offset,
            sprite_offset,
            animation_offset,
            end,
        }
    }
}

/// Offset stored in the header for a table written at `position`.
///
/// Only empty tables can sit past `u16::MAX`. They get the last offset that fits, which is still
/// inside the file.
pub(crate) fn stored_offset(position: usize) -> u16 {
    position.min(MAX_OFFSET) as u16
}

/// Every count must fit in a `u16`, and so must the start of every non-empty table.
pub(crate) fn check_layout(
    version: FormatVersion,
    tiles: usize,
    sprites: usize,
    animations: usize,
) -> Result<(), Violation> {
    let layout = Layout::of(version, tiles, sprites, animations);

    if tiles > MAX_COUNT {
        return Err(Violation::TableFull {
            table: Table::Tiles,
        });
    }

    if sprites > MAX_COUNT || (sprites > 0 && layout.sprite_offset > MAX_OFFSET) {
        return Err(Violation::TableFull {
            table: Table::Sprites,
        });
    }

    if animations > MAX_COUNT || (animations > 0 && layout.animation_offset > MAX_OFFSET) {
        return Err(Violation::TableFull {
            table: Table::Animations,
        });
    }

    Ok(())
}

pub(crate) fn check_tile(palette_len: usize, index: usize, tile: &Tile) -> Result<(), Violation> {
    if tile.colors.iter().any(|&color| color as usize >= palette_len) {
        return Err(Violation::DanglingReference {
            kind: RefKind::Tile,
            index,
        });
    }

    Ok(())
}

pub(crate) fn check_sprite(
    version: FormatVersion,
    tile_count: usize,
    index: usize,
    sprite: &Sprite,
) -> Result<(), Violation> {
    if sprite.width == 0 || sprite.height == 0 {
        return Err(Violation::EmptySprite { index });
    }

    // version B stores the offset in a single byte
    if sprite.tile_offset as usize > version.max_sprite_tile_offset()
        || sprite.tile_range().end > tile_count
    {
        return Err(Violation::DanglingReference {
            kind: RefKind::Sprite,
            index,
        });
    }

    Ok(())
}

pub(crate) fn check_animation(
    version: FormatVersion,
    sprites: &[Sprite],
    index: usize,
    animation: &Animation,
) -> Result<(), Violation> {
    if animation.first_frame.version() != version {
        return Err(Violation::FrameKind { index });
    }

    if frame_range(sprites, animation).is_none() {
        return Err(Violation::DanglingReference {
            kind: RefKind::Animation,
            index,
        });
    }

    Ok(())
}

pub(crate) fn position_of(sprites: &[Sprite], name: Tag) -> Option<usize> {
    sprites.iter().position(|sprite| sprite.name == name)
}

/// Sprite indices an animation plays through. Frames never wrap past the end of the table.
pub(crate) fn frame_range(sprites: &[Sprite], animation: &Animation) -> Option<Range<usize>> {
    let start = match animation.first_frame {
        FrameRef::Offset(offset) => offset as usize,
        FrameRef::Sprite(name) => position_of(sprites, name)?,
    };
    let end = start + animation.frame_count as usize;

    (end <= sprites.len()).then_some(start..end)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout_is_contiguous() {
        let layout = Layout::of(FormatVersion::B, 4, 3, 2);

        assert_eq!(layout.tile_offset, 144);
        assert_eq!(layout.sprite_offset, 224);
        assert_eq!(layout.animation_offset, 245);
        assert_eq!(layout.end, 265);
    }

    #[test]
    fn layout_overflow() {
        // 528 + 3251 * 20 = 65548, fine while nothing follows the tiles
        assert!(check_layout(FormatVersion::A, 3251, 0, 0).is_ok());
        assert_eq!(
            check_layout(FormatVersion::A, 3251, 1, 0),
            Err(Violation::TableFull {
                table: Table::Sprites
            })
        );
        // 528 + 3250 * 20 + 8 = 65536
        assert!(check_layout(FormatVersion::A, 3250, 1, 0).is_ok());
        assert_eq!(
            check_layout(FormatVersion::A, 3250, 1, 1),
            Err(Violation::TableFull {
                table: Table::Animations
            })
        );
        assert_eq!(
            check_layout(FormatVersion::A, 65536, 0, 0),
            Err(Violation::TableFull {
                table: Table::Tiles
            })
        );
    }

    #[test]
    fn empty_tables_past_u16_clamp() {
        assert_eq!(stored_offset(556), 556);
        assert_eq!(stored_offset(66144), u16::MAX);
    }

    #[test]
    fn frames_by_name_take_first_match() {
        let sprites = [
            Sprite::new(b"STND", 1, 1, 0),
            Sprite::new(b"RUN0", 1, 1, 0),
            Sprite::new(b"RUN1", 1, 1, 0),
            Sprite::new(b"RUN0", 1, 1, 0),
        ];

        let run = Animation::new(b"RUN ", FrameRef::Sprite(Tag::from(b"RUN0")), 2);
        assert_eq!(frame_range(&sprites, &run), Some(1..3));

        let too_long = Animation::new(b"RUN ", FrameRef::Sprite(Tag::from(b"RUN0")), 4);
        assert_eq!(frame_range(&sprites, &too_long), None);

        let missing = Animation::new(b"JUMP", FrameRef::Sprite(Tag::from(b"JMP0")), 1);
        assert_eq!(frame_range(&sprites, &missing), None);
    }

    #[test]
    fn frames_by_offset() {
        let sprites = [Sprite::new(b"A000", 1, 1, 0), Sprite::new(b"A001", 1, 1, 0)];

        let empty_at_end = Animation::new(b"NONE", FrameRef::Offset(2), 0);
        assert_eq!(frame_range(&sprites, &empty_at_end), Some(2..2));

        let past_end = Animation::new(b"LONG", FrameRef::Offset(1), 2);
        assert_eq!(frame_range(&sprites, &past_end), None);
    }

    #[test]
    fn version_b_sprite_offset_must_fit_a_byte() {
        let sprite = Sprite::new(b"WIDE", 1, 1, 256);

        assert!(check_sprite(FormatVersion::A, 300, 0, &sprite).is_ok());
        assert_eq!(
            check_sprite(FormatVersion::B, 300, 0, &sprite),
            Err(Violation::DanglingReference {
                kind: RefKind::Sprite,
                index: 0
            })
        );
    }
}
