//! Destructible shields, built cell by cell from a text stencil.

use crate::entities::{Block, Rect};

/// `x` marks a block, anything else is empty.
pub const SHIELD_SHAPE: [&str; 7] = [
    "   xxxxxxxxxxxx",
    "  xxxxxxxxxxxxxx",
    " xxxxxxxxxxxxxxxx",
    "xxxxxxxxxxxxxxxxxx",
    "xxxxxx      xxxxxx",
    "xxxx          xxxx",
    "xxx            xxx",
];

pub const SHIELD_COUNT: usize = 4;

/// Distance from the shields' top edge to the bottom of the screen.
pub const SHIELD_BOTTOM_OFFSET: f32 = 120.0;

/// Widest stencil row, in blocks.
pub fn shape_columns() -> usize {
    SHIELD_SHAPE.iter().map(|row| row.len()).max().unwrap_or(0)
}

/// One shield with its top-left corner at `(x, y)`.
pub fn create_shield(x: f32, y: f32, block_size: f32) -> Vec<Block> {
    let mut blocks = Vec::new();
    for (row, line) in SHIELD_SHAPE.iter().enumerate() {
        for (col, cell) in line.chars().enumerate() {
            if cell == 'x' {
                blocks.push(Block {
                    rect: Rect::new(
                        x + col as f32 * block_size,
                        y + row as f32 * block_size,
                        block_size,
                        block_size,
                    ),
                });
            }
        }
    }
    blocks
}

/// `SHIELD_COUNT` shields spread evenly across the screen, equal gaps at
/// both ends and between shields.
pub fn create_shields(screen_width: f32, screen_height: f32, block_size: f32) -> Vec<Block> {
    let shield_width = shape_columns() as f32 * block_size;
    let gap = ((screen_width - shield_width * SHIELD_COUNT as f32) / (SHIELD_COUNT as f32 + 1.0)).max(0.0);
    let y = screen_height - SHIELD_BOTTOM_OFFSET;

    (0..SHIELD_COUNT)
        .flat_map(|i| {
            let x = gap + i as f32 * (shield_width + gap);
            create_shield(x, y, block_size)
        })
        .collect()
}
