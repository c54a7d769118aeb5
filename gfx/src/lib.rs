//! Sprite graphics package: a 16-bit palette, 8x8 tiles at 2 bits per pixel, sprites made of
//! tiles and animations made of sprites.
//!
//! Two layouts exist. `GFXA` files carry 256 palette entries and point animations at sprites by
//! index. `GFXB` files carry 64 entries, store sprite tile offsets in one byte and point
//! animations at sprites by name. Everything is little-endian.
//!
//! ```text
//! magic        u32
//! palette      [u16; 256 | 64]
//! offsets      tile, sprite, animation: u16
//! counts       tile, sprite, animation: u16
//! tile         colors [u8; 4], pixels [u8; 16]
//! sprite       name [u8; 4], width u8, height u8, tile offset u16 | u8
//! animation    name [u8; 4], first frame u16 | [u8; 4], frames u16
//! ```
mod builder;
pub mod constants;
pub mod error;
mod parser;
mod types;
mod validate;
mod writer;

pub use builder::AssetBuilder;
pub use error::{BuildError, DecodeError, RefKind, Table};
pub use parser::{decode, decode_with, detect_version, parse_header};
pub use types::*;
pub use writer::encode;

/// First sprite named `name`, in table order.
pub fn find_sprite(asset: &GraphicsAsset, name: impl Into<Tag>) -> Option<&Sprite> {
    asset.find_sprite(name)
}
