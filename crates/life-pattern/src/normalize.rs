//! Mapping imported coordinates into a padded, centered square.

use life_core::{Coordinate, Error, Result, SimulationConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coordinates ready for grid construction; all lie in `[0, size)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedConfiguration {
    pub size: usize,
    pub alive: Vec<Coordinate>,
}

/// Pads, sizes and centers imported patterns
#[derive(Debug, Clone)]
pub struct Normalizer {
    padding: usize,
    max_grid_size: usize,
}

impl Normalizer {
    /// Create a normalizer with explicit padding and size limit
    pub fn new(padding: usize, max_grid_size: usize) -> Self {
        Self {
            padding,
            max_grid_size,
        }
    }

    /// Create a normalizer from simulation settings
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.padding, config.max_grid_size)
    }

    /// Get the dead margin added on each side
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Translate so the bounding box starts at `padding`, size the square to
    /// the longer axis plus padding on both sides, and center the shorter axis.
    pub fn normalize(&self, coords: &[Coordinate]) -> Result<NormalizedConfiguration> {
        let padding = self.padding as i64;

        if coords.is_empty() {
            let size = self.check_size(2 * padding)?;
            return Ok(NormalizedConfiguration {
                size,
                alive: Vec::new(),
            });
        }

        let (mut min_x, mut min_y) = (i64::MAX, i64::MAX);
        let (mut max_x, mut max_y) = (i64::MIN, i64::MIN);
        for coord in coords {
            let (x, y) = (coord.x as i64, coord.y as i64);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let max_x = max_x - min_x + padding;
        let max_y = max_y - min_y + padding;
        let extent = max_x.max(max_y);
        // Without padding the formula alone would leave the far edge outside
        let size = self.check_size((extent + 2 * padding).max(extent + 1))?;

        // Integer division leaves odd differences one cell off center
        let (shift_x, shift_y) = if max_x > max_y {
            (0, (max_x - max_y) / 2)
        } else {
            ((max_y - max_x) / 2, 0)
        };

        // check_size bounds every value below by i32::MAX
        let alive = coords
            .iter()
            .map(|coord| {
                Coordinate::new(
                    (coord.x as i64 - min_x + padding + shift_x) as i32,
                    (coord.y as i64 - min_y + padding + shift_y) as i32,
                )
            })
            .collect();

        debug!(
            size,
            shift_x,
            shift_y,
            alive = coords.len(),
            "Normalized configuration"
        );

        Ok(NormalizedConfiguration { size, alive })
    }

    fn check_size(&self, size: i64) -> Result<usize> {
        let too_large = Error::GridTooLarge {
            size: size as u64,
            limit: self.max_grid_size,
        };
        if size > i32::MAX as i64 {
            return Err(too_large);
        }
        let size = size as usize;
        if size > self.max_grid_size {
            return Err(too_large);
        }
        Ok(size)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}
