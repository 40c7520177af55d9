//! Placeholder icon for favorites whose icon can't be built.
//!
//! Generates a red X image used when icon synthesis is skipped or fails.

use std::sync::Arc;

use bevy::prelude::*;
use image::{Rgba, RgbaImage};

/// Resource holding the shared placeholder icon.
#[derive(Resource, Clone)]
pub struct PlaceholderIcon {
    pub image: Arc<RgbaImage>,
}

impl Default for PlaceholderIcon {
    fn default() -> Self {
        Self {
            image: Arc::new(create_placeholder_image()),
        }
    }
}

/// Default placeholder size in pixels.
pub const PLACEHOLDER_SIZE: u32 = 64;

/// Create a red placeholder image with an X pattern.
pub fn create_placeholder_image() -> RgbaImage {
    let size = PLACEHOLDER_SIZE as i32;

    let red = Rgba([200, 50, 50, 255]);
    let dark_red = Rgba([120, 30, 30, 255]);

    RgbaImage::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |x, y| {
        let (x, y) = (x as i32, y as i32);

        // Draw border (2px)
        let is_border = x < 2 || x >= size - 2 || y < 2 || y >= size - 2;

        // Draw X pattern (diagonal lines)
        let on_diagonal = (x - y).abs() <= 2 || ((size - 1 - x) - y).abs() <= 2;

        if is_border || on_diagonal { red } else { dark_red }
    })
}
