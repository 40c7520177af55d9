//! Icon synthesis for multi-cell favorites.
//!
//! Each eligible cell's sprite is scaled into its own section of a square
//! canvas laid out like the cells themselves (row 0 at the bottom). The
//! canvas grows with the total pixel footprint of the inputs.

use std::sync::Arc;

use bevy::prelude::*;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::assets::{encode_png, AssetDatabase, PlaceholderIcon};
use crate::clipboard::ItemIcon;
use crate::constants::{ICON_CANVAS_SIZES, MAX_ICON_COMBINE_CELLS, MAX_ICON_GRID_CELLS};
use crate::grid::{CellGrid, TileCell};
use crate::tiles::{SpriteRef, Tile};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IconError {
    #[error("no cell has a tile with a sprite")]
    NoEligibleCells,
}

/// Icon plus its PNG encoding when one was produced
#[derive(Debug, Clone)]
pub struct SynthesizedIcon {
    pub icon: ItemIcon,
    pub png: Option<Vec<u8>>,
}

/// Smallest canvas edge whose area holds `footprint` pixels, capped at the
/// largest size
pub fn canvas_size_for(footprint: u64) -> u32 {
    ICON_CANVAS_SIZES
        .iter()
        .copied()
        .find(|size| footprint <= u64::from(*size) * u64::from(*size))
        .unwrap_or(ICON_CANVAS_SIZES[ICON_CANVAS_SIZES.len() - 1])
}

fn eligible_sprite(cell: &TileCell) -> Option<&SpriteRef> {
    cell.tile().and_then(|t| t.sprite())
}

/// Build an icon for `grid`.
///
/// Textures that had to be made readable are appended to `forced` so the
/// caller can restore them once the batch is done.
pub fn synthesize_icon(
    grid: &CellGrid,
    database: &mut dyn AssetDatabase,
    placeholder: &PlaceholderIcon,
    forced: &mut Vec<String>,
) -> Result<SynthesizedIcon, IconError> {
    let eligible: Vec<(&TileCell, &SpriteRef)> = grid
        .cells()
        .iter()
        .filter_map(|cell| eligible_sprite(cell).map(|sprite| (cell, sprite)))
        .collect();

    match eligible.len() {
        0 => Err(IconError::NoEligibleCells),
        1 => Ok(SynthesizedIcon {
            icon: ItemIcon::Sprite(eligible[0].1.clone()),
            png: None,
        }),
        n if n > MAX_ICON_COMBINE_CELLS => {
            debug!("{} cells is too many to combine, using placeholder icon", n);
            Ok(placeholder_icon(placeholder))
        }
        _ => Ok(combine(grid, &eligible, database, placeholder, forced)),
    }
}

fn placeholder_icon(placeholder: &PlaceholderIcon) -> SynthesizedIcon {
    SynthesizedIcon {
        icon: ItemIcon::Image(placeholder.image.clone()),
        png: None,
    }
}

fn combine(
    grid: &CellGrid,
    eligible: &[(&TileCell, &SpriteRef)],
    database: &mut dyn AssetDatabase,
    placeholder: &PlaceholderIcon,
    forced: &mut Vec<String>,
) -> SynthesizedIcon {
    let size = grid.local_bounds().size;
    let columns = size.x.clamp(1, MAX_ICON_GRID_CELLS) as u32;
    let rows = size.y.clamp(1, MAX_ICON_GRID_CELLS) as u32;

    let footprint: u64 = eligible.iter().map(|(_, sprite)| sprite.pixel_count()).sum();
    let canvas_size = canvas_size_for(footprint);
    let section = (canvas_size / columns.max(rows)).max(1);

    let mut canvas = RgbaImage::from_pixel(canvas_size, canvas_size, Rgba([0, 0, 0, 0]));

    for (cell, sprite) in eligible {
        let local = cell.position + grid.pivot();
        if local.x < 0 || local.y < 0 || local.x as u32 >= columns || local.y as u32 >= rows {
            continue;
        }

        if database.is_readable(&sprite.texture) == Some(false) {
            match database.set_readable(&sprite.texture, true) {
                Ok(()) => {
                    if !forced.contains(&sprite.texture) {
                        forced.push(sprite.texture.clone());
                    }
                }
                Err(e) => {
                    warn!("Could not make '{}' readable: {}", sprite.texture, e);
                    continue;
                }
            }
        }

        let pixels = match database.read_pixels(sprite) {
            Ok(pixels) => pixels,
            Err(e) => {
                warn!("Skipping cell at {:?} in icon: {}", local, e);
                continue;
            }
        };

        let scaled = imageops::resize(&pixels, section, section, FilterType::Triangle);
        let x = local.x as u32 * section;
        let y = (rows - 1 - local.y as u32) * section;
        imageops::overlay(&mut canvas, &scaled, i64::from(x), i64::from(y));
    }

    match encode_png(&canvas) {
        Ok(png) => SynthesizedIcon {
            icon: ItemIcon::Image(Arc::new(canvas)),
            png: Some(png),
        },
        Err(e) => {
            error!("Failed to encode favorite icon: {}", e);
            placeholder_icon(placeholder)
        }
    }
}
