use crate::{
    error::BuildError,
    types::{Animation, FormatVersion, GraphicsAsset, Sprite, Tile},
    validate,
};

/// Builds a [`GraphicsAsset`] one entry at a time.
///
/// Every push is checked against what is already in the builder, so tiles go before the sprites
/// using them and sprites before the animations playing them.
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    asset: GraphicsAsset,
}

impl AssetBuilder {
    /// Empty tables and an all-zero palette.
    pub fn new(version: FormatVersion) -> Self {
        Self {
            asset: GraphicsAsset {
                version,
                palette: vec![0; version.palette_len()],
                tiles: vec![],
                sprites: vec![],
                animations: vec![],
            },
        }
    }

    pub fn version(&self) -> FormatVersion {
        self.asset.version
    }

    /// What has been built so far.
    pub fn asset(&self) -> &GraphicsAsset {
        &self.asset
    }

    pub fn set_palette(&mut self, palette: &[u16]) -> Result<&mut Self, BuildError> {
        let expected = self.asset.version.palette_len();

        if palette.len() != expected {
            return Err(BuildError::PaletteLength {
                expected,
                got: palette.len(),
            });
        }

        self.asset.palette.copy_from_slice(palette);

        Ok(self)
    }

    pub fn set_palette_entry(
        &mut self,
        index: usize,
        color: u16,
    ) -> Result<&mut Self, BuildError> {
        let len = self.asset.palette.len();
        let entry = self
            .asset
            .palette
            .get_mut(index)
            .ok_or(BuildError::PaletteIndex { index, len })?;

        *entry = color;

        Ok(self)
    }

    fn check_layout(
        &self,
        tiles: usize,
        sprites: usize,
        animations: usize,
    ) -> Result<(), BuildError> {
        validate::check_layout(self.asset.version, tiles, sprites, animations)
            .map_err(BuildError::from)
    }

    pub fn push_tile(&mut self, tile: Tile) -> Result<&mut Self, BuildError> {
        let GraphicsAsset {
            palette,
            tiles,
            sprites,
            animations,
            ..
        } = &self.asset;

        self.check_layout(tiles.len() + 1, sprites.len(), animations.len())?;
        validate::check_tile(palette.len(), tiles.len(), &tile)?;

        self.asset.tiles.push(tile);

        Ok(self)
    }

    pub fn push_sprite(&mut self, sprite: Sprite) -> Result<&mut Self, BuildError> {
        let GraphicsAsset {
            version,
            tiles,
            sprites,
            animations,
            ..
        } = &self.asset;

        self.check_layout(tiles.len(), sprites.len() + 1, animations.len())?;
        validate::check_sprite(*version, tiles.len(), sprites.len(), &sprite)?;

        self.asset.sprites.push(sprite);

        Ok(self)
    }

    pub fn push_animation(&mut self, animation: Animation) -> Result<&mut Self, BuildError> {
        let GraphicsAsset {
            version,
            tiles,
            sprites,
            animations,
            ..
        } = &self.asset;

        self.check_layout(tiles.len(), sprites.len(), animations.len() + 1)?;
        validate::check_animation(*version, sprites, animations.len(), &animation)?;

        self.asset.animations.push(animation);

        Ok(self)
    }

    pub fn build(self) -> GraphicsAsset {
        self.asset
    }
}

impl GraphicsAsset {
    pub fn builder(version: FormatVersion) -> AssetBuilder {
        AssetBuilder::new(version)
    }

    /// Reopens the asset to append more entries.
    pub fn into_builder(self) -> AssetBuilder {
        AssetBuilder { asset: self }
    }
}
