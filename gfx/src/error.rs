use std::fmt;

/// One of the three indexed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Tiles,
    Sprites,
    Animations,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Table::Tiles => "tile",
            Table::Sprites => "sprite",
            Table::Animations => "animation",
        })
    }
}

/// Which entry holds a broken cross reference.
///
/// `Tile` is a tile colour pointing past the palette, `Sprite` is a sprite pointing past the
/// tile table, `Animation` is an animation whose frames are not in the sprite table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Tile,
    Sprite,
    Animation,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefKind::Tile => "tile",
            RefKind::Sprite => "sprite",
            RefKind::Animation => "animation",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Input is truncated: needs {needed} bytes, got {len}")]
    TruncatedInput { needed: usize, len: usize },
    #[error("Unknown magic: {magic:#010x}")]
    BadMagic { magic: u32 },
    #[error("The {table} table is out of bounds")]
    TableOutOfBounds { table: Table },
    #[error("The {kind} at index {index} has a dangling reference")]
    DanglingReference { kind: RefKind, index: usize },
    #[error("Sprite at index {index} has zero width or height")]
    EmptySprite { index: usize },
    #[error("The {table} table does not fit 16-bit offsets")]
    TableFull { table: Table },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Palette must have {expected} entries, got {got}")]
    PaletteLength { expected: usize, got: usize },
    #[error("Palette index {index} is out of range for a palette of {len}")]
    PaletteIndex { index: usize, len: usize },
    #[error("The {kind} at index {index} has a dangling reference")]
    DanglingReference { kind: RefKind, index: usize },
    #[error("Sprite at index {index} has zero width or height")]
    EmptySprite { index: usize },
    #[error("Animation at index {index} uses a frame reference of the other format version")]
    FrameKind { index: usize },
    #[error("The {table} table does not fit 16-bit offsets")]
    TableFull { table: Table },
}

/// Invariant violations shared by decoding and the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    DanglingReference { kind: RefKind, index: usize },
    EmptySprite { index: usize },
    FrameKind { index: usize },
    TableFull { table: Table },
}

impl From<Violation> for DecodeError {
    fn from(value: Violation) -> Self {
        match value {
            Violation::DanglingReference { kind, index } => {
                DecodeError::DanglingReference { kind, index }
            }
            Violation::EmptySprite { index } => DecodeError::EmptySprite { index },
            // the parser picks the frame reference from the version, so this cannot come from bytes
            Violation::FrameKind { index } => DecodeError::DanglingReference {
                kind: RefKind::Animation,
                index,
            },
            Violation::TableFull { table } => DecodeError::TableFull { table },
        }
    }
}

impl From<Violation> for BuildError {
    fn from(value: Violation) -> Self {
        match value {
            Violation::DanglingReference { kind, index } => {
                BuildError::DanglingReference { kind, index }
            }
            Violation::EmptySprite { index } => BuildError::EmptySprite { index },
            Violation::FrameKind { index } => BuildError::FrameKind { index },
            Violation::TableFull { table } => BuildError::TableFull { table },
        }
    }
}

impl DecodeError {
    pub fn to_result<T>(self) -> Result<T, Self> {
        Err(self)
    }
}
