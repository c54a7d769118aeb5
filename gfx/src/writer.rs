use byte_writer::ByteWriter;

use crate::{
    types::{Animation, FormatVersion, FrameRef, GraphicsAsset, Sprite, Tag, Tile},
    validate::stored_offset,
};

trait WriteToWriter {
    fn write_to_bytes(&self, version: FormatVersion, writer: &mut ByteWriter);
}

impl GraphicsAsset {
    /// Tables go back to back after the header in the order tiles, sprites, animations.
    pub fn write_to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.encoded_len());

        let Self {
            version,
            palette,
            tiles,
            sprites,
            animations,
        } = self;
        let version = *version;

        log::debug!(
            "encoding version {:?}: {} tiles, {} sprites, {} animations",
            version,
            tiles.len(),
            sprites.len(),
            animations.len()
        );

        writer.append_u32(version.magic());
        writer.append_u16_slice(palette);

        // offsets are patched once each table has been written
        let tile_offset_index = writer.get_offset();
        writer.append_u16(0);
        let sprite_offset_index = writer.get_offset();
        writer.append_u16(0);
        let animation_offset_index = writer.get_offset();
        writer.append_u16(0);

        writer.append_u16(tiles.len() as u16);
        writer.append_u16(sprites.len() as u16);
        writer.append_u16(animations.len() as u16);

        writer.replace_with_u16(tile_offset_index, stored_offset(writer.get_offset()));
        tiles.write_to_bytes(version, &mut writer);

        writer.replace_with_u16(sprite_offset_index, stored_offset(writer.get_offset()));
        sprites.write_to_bytes(version, &mut writer);

        writer.replace_with_u16(animation_offset_index, stored_offset(writer.get_offset()));
        animations.write_to_bytes(version, &mut writer);

        writer.into_bytes()
    }
}

impl WriteToWriter for Tag {
    fn write_to_bytes(&self, _: FormatVersion, writer: &mut ByteWriter) {
        writer.append_u8_slice(self.get_bytes());
    }
}

impl WriteToWriter for Tile {
    fn write_to_bytes(&self, _: FormatVersion, writer: &mut ByteWriter) {
        let Self { colors, pixels } = self;

        writer.append_u8_slice(colors);
        writer.append_u8_slice(pixels);
    }
}

impl WriteToWriter for Sprite {
    fn write_to_bytes(&self, version: FormatVersion, writer: &mut ByteWriter) {
        let Self {
            name,
            width,
            height,
            tile_offset,
        } = self;

        name.write_to_bytes(version, writer);
        writer.append_u8(*width);
        writer.append_u8(*height);

        match version {
            FormatVersion::A => writer.append_u16(*tile_offset),
            FormatVersion::B => writer.append_u8(*tile_offset as u8),
        }
    }
}

impl WriteToWriter for Animation {
    fn write_to_bytes(&self, version: FormatVersion, writer: &mut ByteWriter) {
        let Self {
            name,
            first_frame,
            frame_count,
        } = self;

        name.write_to_bytes(version, writer);

        match first_frame {
            FrameRef::Offset(offset) => writer.append_u16(*offset),
            FrameRef::Sprite(sprite) => sprite.write_to_bytes(version, writer),
        }

        writer.append_u16(*frame_count);
    }
}

impl<T: WriteToWriter> WriteToWriter for Vec<T> {
    fn write_to_bytes(&self, version: FormatVersion, writer: &mut ByteWriter) {
        self.iter().for_each(|entry| entry.write_to_bytes(version, writer));
    }
}

pub fn encode(asset: &GraphicsAsset) -> Vec<u8> {
    asset.write_to_bytes()
}
