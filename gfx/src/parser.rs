use std::array::from_fn;

use nom::{
    bytes::complete::take,
    combinator::map,
    multi::count,
    number::complete::{le_u16, le_u32, le_u8},
    IResult as _IResult, Parser,
};

use crate::{
    constants::{MAGIC_SIZE, TAG_LENGTH, TILE_COLOR_COUNT, TILE_PIXEL_BYTES},
    error::{DecodeError, Table},
    types::{
        Animation, DecodeOptions, FormatVersion, FrameRef, GraphicsAsset, Header, Sprite, Tag,
        Tile,
    },
};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

fn tag(i: &[u8]) -> IResult<'_, Tag> {
    map(take(TAG_LENGTH), |res: &[u8]| Tag(from_fn(|i| res[i]))).parse(i)
}

fn parse_palette(i: &[u8], version: FormatVersion) -> IResult<'_, Vec<u16>> {
    count(le_u16, version.palette_len()).parse(i)
}

fn parse_header_for(i: &[u8], version: FormatVersion) -> IResult<'_, Header> {
    let (i, magic) = le_u32(i)?;
    let (i, palette) = parse_palette(i, version)?;
    let (
        i,
        (tile_offset, sprite_offset, animation_offset, tile_count, sprite_count, animation_count),
    ) = (le_u16, le_u16, le_u16, le_u16, le_u16, le_u16).parse(i)?;

    Ok((
        i,
        Header {
            magic,
            palette,
            tile_offset,
            sprite_offset,
            animation_offset,
            tile_count,
            sprite_count,
            animation_count,
        },
    ))
}

fn parse_tile(i: &[u8]) -> IResult<'_, Tile> {
    map(
        (take(TILE_COLOR_COUNT), take(TILE_PIXEL_BYTES)),
        |(colors, pixels): (&[u8], &[u8])| {
            let mut tile = Tile::default();

            tile.colors.copy_from_slice(colors);
            tile.pixels.copy_from_slice(pixels);

            tile
        },
    )
    .parse(i)
}

fn parse_sprite(i: &[u8], version: FormatVersion) -> IResult<'_, Sprite> {
    let (i, (name, width, height)) = (tag, le_u8, le_u8).parse(i)?;
    let (i, tile_offset) = match version {
        FormatVersion::A => le_u16(i)?,
        FormatVersion::B => map(le_u8, u16::from).parse(i)?,
    };

    Ok((
        i,
        Sprite {
            name,
            width,
            height,
            tile_offset,
        },
    ))
}

fn parse_animation(i: &[u8], version: FormatVersion) -> IResult<'_, Animation> {
    let (i, name) = tag(i)?;
    let (i, first_frame) = match version {
        FormatVersion::A => map(le_u16, FrameRef::Offset).parse(i)?,
        FormatVersion::B => map(tag, FrameRef::Sprite).parse(i)?,
    };
    let (i, frame_count) = le_u16(i)?;

    Ok((
        i,
        Animation {
            name,
            first_frame,
            frame_count,
        },
    ))
}

/// Reads the magic and tells which version the rest of the buffer is.
pub fn detect_version(i: &[u8]) -> Result<FormatVersion, DecodeError> {
    let res: IResult<'_, u32> = le_u32(i);
    let (_, magic) = res.map_err(|_| DecodeError::TruncatedInput {
        needed: MAGIC_SIZE,
        len: i.len(),
    })?;

    FormatVersion::from_magic(magic).ok_or(DecodeError::BadMagic { magic })
}

/// Parses only the fixed-size header, without looking at the tables.
pub fn parse_header(i: &[u8]) -> Result<Header, DecodeError> {
    let version = detect_version(i)?;

    parse_header_checked(i, version)
}

fn parse_header_checked(i: &[u8], version: FormatVersion) -> Result<Header, DecodeError> {
    let truncated = DecodeError::TruncatedInput {
        needed: version.header_size(),
        len: i.len(),
    };

    if i.len() < version.header_size() {
        return truncated.to_result();
    }

    parse_header_for(i, version)
        .map(|(_, header)| header)
        .map_err(|_| truncated)
}

/// `offset..offset + count * size`, or the table that does not fit.
fn table_slice(
    i: &[u8],
    version: FormatVersion,
    table: Table,
    offset: u16,
    count: u16,
    entry_size: usize,
) -> Result<&[u8], DecodeError> {
    let start = offset as usize;
    let end = start + count as usize * entry_size;

    // an empty table may point anywhere inside the buffer, including into the header
    let overlaps_header = count > 0 && start < version.header_size();

    if overlaps_header || end > i.len() {
        return DecodeError::TableOutOfBounds { table }.to_result();
    }

    Ok(&i[start..end])
}

fn parse_table<'a, T>(
    i: &'a [u8],
    table: Table,
    entries: u16,
    parser: impl Parser<&'a [u8], Output = T, Error = nom::error::Error<&'a [u8]>>,
) -> Result<Vec<T>, DecodeError> {
    count(parser, entries as usize)
        .parse(i)
        .map(|(_, res)| res)
        // the slice was sized from the header, so running dry means the sizes disagree
        .map_err(|_| DecodeError::TableOutOfBounds { table })
}

pub fn decode_with(i: &[u8], options: &DecodeOptions) -> Result<GraphicsAsset, DecodeError> {
    let version = detect_version(i)?;

    if let Some(expected) = options.version {
        if expected != version {
            return DecodeError::BadMagic {
                magic: version.magic(),
            }
            .to_result();
        }
    }

    log::debug!("decoding {} bytes as version {:?}", i.len(), version);

    let header = parse_header_checked(i, version)?;

    let tile_bytes = table_slice(
        i,
        version,
        Table::Tiles,
        header.tile_offset,
        header.tile_count,
        version.tile_size(),
    )?;
    let sprite_bytes = table_slice(
        i,
        version,
        Table::Sprites,
        header.sprite_offset,
        header.sprite_count,
        version.sprite_size(),
    )?;
    let animation_bytes = table_slice(
        i,
        version,
        Table::Animations,
        header.animation_offset,
        header.animation_count,
        version.animation_size(),
    )?;

    let tiles = parse_table(tile_bytes, Table::Tiles, header.tile_count, parse_tile)?;
    log::trace!("parsed {} tiles", tiles.len());

    let sprites = parse_table(
        sprite_bytes,
        Table::Sprites,
        header.sprite_count,
        |i| parse_sprite(i, version),
    )?;
    log::trace!("parsed {} sprites", sprites.len());

    let animations = parse_table(
        animation_bytes,
        Table::Animations,
        header.animation_count,
        |i| parse_animation(i, version),
    )?;
    log::trace!("parsed {} animations", animations.len());

    GraphicsAsset::from_tables(version, header.palette, tiles, sprites, animations)
        .map_err(DecodeError::from)
}

pub fn decode(i: &[u8]) -> Result<GraphicsAsset, DecodeError> {
    decode_with(i, &DecodeOptions::default())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sprite_entry_sizes() {
        let bytes = [b'H', b'E', b'R', b'O', 2, 3, 0x34, 0x12, 0xff];

        let (rest, sprite) = parse_sprite(&bytes, FormatVersion::A).unwrap();
        assert_eq!(rest, &[0xff]);
        assert_eq!(sprite, Sprite::new(b"HERO", 2, 3, 0x1234));

        let (rest, sprite) = parse_sprite(&bytes, FormatVersion::B).unwrap();
        assert_eq!(rest, &[0x12, 0xff]);
        assert_eq!(sprite, Sprite::new(b"HERO", 2, 3, 0x34));
    }

    #[test]
    fn animation_entry_sizes() {
        let bytes = [b'W', b'A', b'L', b'K', b'W', b'L', b'K', b'0', 2, 0];

        let (rest, animation) = parse_animation(&bytes, FormatVersion::A).unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(animation.first_frame, FrameRef::Offset(0x4c57));
        assert_eq!(animation.frame_count, 0x304b);

        let (rest, animation) = parse_animation(&bytes, FormatVersion::B).unwrap();
        assert!(rest.is_empty());
        assert_eq!(animation.first_frame, FrameRef::Sprite(Tag::from(b"WLK0")));
        assert_eq!(animation.frame_count, 2);
    }

    #[test]
    fn short_magic() {
        assert_eq!(
            detect_version(b"GFX"),
            Err(DecodeError::TruncatedInput { needed: 4, len: 3 })
        );
        assert_eq!(detect_version(b"GFXB"), Ok(FormatVersion::B));
    }
}
