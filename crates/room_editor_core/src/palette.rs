//! Palette canvas for composing brushes
//!
//! The palette is a scratch layer: tiles are arranged on it, a selection of
//! at least two of them becomes a composite brush.

use uuid::Uuid;

use crate::brush::{Brush, BrushMaker};
use crate::error::{LoadError, PaletteError};
use crate::format::LayerJson;
use crate::layer::Layer;
use crate::tile::{TileCatalog, TileId};

pub const DEFAULT_PALETTE_SIZE: (u32, u32) = (32, 32);

const PALETTE_LAYER_NAME: &str = "palette";

#[derive(Debug, Clone)]
pub struct Palette {
    canvas: Layer,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE_SIZE, crate::snapshot::DEFAULT_SNAPSHOT_CAPACITY)
    }
}

impl Palette {
    pub fn new(size: (u32, u32), snapshot_capacity: usize) -> Self {
        Self {
            canvas: Layer::new(PALETTE_LAYER_NAME, size, 0, snapshot_capacity),
        }
    }

    pub fn canvas(&self) -> &Layer {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Layer {
        &mut self.canvas
    }

    /// Turn the selected palette tiles into a composite brush
    pub fn create_composite_brush(&self, ids: &[Uuid], maker: &mut BrushMaker) -> Result<Brush, PaletteError> {
        let region = self
            .canvas
            .select_instances(ids)
            .filter(|r| r.len() >= 2)
            .ok_or(PaletteError::TooFewTiles)?;
        Ok(maker.from_region(&region))
    }

    pub fn needs_tile(&self, tile: TileId) -> bool {
        self.canvas.needs_tile(tile)
    }

    pub fn to_json(&self) -> LayerJson {
        self.canvas.to_json((0, 0))
    }

    pub fn from_json(json: &LayerJson, catalog: &TileCatalog, snapshot_capacity: usize) -> Result<Self, LoadError> {
        Ok(Self {
            canvas: Layer::from_json(json, json.size, catalog, snapshot_capacity)?,
        })
    }
}
