//! Simulation state and the command surface used by external drivers.

use crate::grid::Grid;
use crate::step::{CellChange, StepEngine};
use life_core::{
    Cell, ChangeEvent, ChangeNotifier, Coordinate, Error, Result, SimulationConfig,
    SubscriptionId,
};
use life_pattern::{load_pattern, parse_pattern, Normalizer, ParsedConfiguration};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, trace, warn};

/// Summary of one `step()` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub generation: u64,
    pub changes: Vec<CellChange>,
}

/// A single Life simulation.
///
/// Mutating commands take `&mut self`, so callers are serialized by
/// ownership. Every replacement of the grid (load, new pattern) is committed
/// only after it has been fully built; failures leave the previous state
/// untouched and emit nothing.
pub struct Simulation {
    grid: Grid,
    generation: u64,
    is_playing: bool,
    config: SimulationConfig,
    engine: StepEngine,
    normalizer: Normalizer,
    notifier: ChangeNotifier,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Create an unloaded simulation seeded from `config.seed`
    pub fn new(config: SimulationConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Create a simulation drawing random patterns from the given source
    pub fn with_rng(config: SimulationConfig, rng: ChaCha8Rng) -> Self {
        Self {
            grid: Grid::empty(),
            generation: 0,
            is_playing: false,
            engine: StepEngine::from_config(&config),
            normalizer: Normalizer::from_config(&config),
            notifier: ChangeNotifier::new(),
            config,
            rng,
        }
    }

    /// Get the simulation configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get the current grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid side length, 0 when nothing is loaded
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Generations stepped since the last load or new pattern
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the simulation is running
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether a non-empty grid is loaded
    pub fn is_configured(&self) -> bool {
        !self.grid.is_empty()
    }

    /// Get the cell at a position, or None outside the grid
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid.cell_at(Coordinate::new(x, y))
    }

    /// Live cells in row-major order
    pub fn alive_cells(&self) -> Vec<Coordinate> {
        self.grid.alive_cells()
    }

    /// Number of live cells
    pub fn alive_count(&self) -> usize {
        self.grid.alive_count()
    }

    /// Register a handler for change events
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(handler)
    }

    /// Remove a handler; false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Shared handle to the subscriber list, usable from inside handlers
    pub fn notifier(&self) -> ChangeNotifier {
        self.notifier.clone()
    }

    /// Load a pattern file, replacing the current grid
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let parsed = load_pattern(path).await.map_err(|e| {
            warn!(error = %e, "Rejected pattern file");
            e
        })?;
        self.load_configuration(&parsed)
    }

    /// Load pattern text already in memory
    pub fn load_str(&mut self, text: &str) -> Result<()> {
        let parsed = parse_pattern(text).map_err(|e| {
            warn!(error = %e, "Rejected pattern text");
            e
        })?;
        self.load_configuration(&parsed)
    }

    /// Normalize parsed coordinates into a fresh grid and install it
    pub fn load_configuration(&mut self, parsed: &ParsedConfiguration) -> Result<()> {
        let normalized = self.normalizer.normalize(&parsed.alive).map_err(|e| {
            warn!(error = %e, "Pattern cannot be normalized");
            e
        })?;
        let grid = Grid::from_alive(normalized.size, &normalized.alive)?;

        info!(
            format = parsed.format.signature(),
            size = grid.size(),
            alive = grid.alive_count(),
            "Pattern loaded"
        );
        self.install(grid);
        Ok(())
    }

    /// Reset to an empty or randomly filled grid of the given size
    pub fn new_pattern(&mut self, size: usize, randomize: bool) -> Result<()> {
        if size > self.config.max_grid_size {
            return Err(Error::GridTooLarge {
                size: size as u64,
                limit: self.config.max_grid_size,
            });
        }

        let grid = if randomize {
            Grid::random(size, self.config.random_fill_probability, &mut self.rng)
        } else {
            Grid::new(size)
        };

        info!(size, randomize, alive = grid.alive_count(), "New pattern");
        self.install(grid);
        Ok(())
    }

    /// Advance one generation. Returns None when nothing is loaded.
    pub fn step(&mut self) -> Option<StepReport> {
        if self.grid.is_empty() {
            trace!("Step ignored, no configuration loaded");
            return None;
        }

        let (next, changes) = self.engine.next(&self.grid);
        self.grid = next;

        for change in &changes {
            self.notifier.emit(ChangeEvent::CellChanged {
                x: change.x,
                y: change.y,
                state: change.state,
            });
        }

        self.generation += 1;
        self.notifier.emit(ChangeEvent::GenerationChanged {
            generation: self.generation,
        });

        debug!(
            generation = self.generation,
            changed = changes.len(),
            alive = self.grid.alive_count(),
            "Stepped"
        );

        Some(StepReport {
            generation: self.generation,
            changes,
        })
    }

    /// Flip the play flag and return its new value
    pub fn toggle_play(&mut self) -> Result<bool> {
        if self.grid.is_empty() {
            trace!("Toggle play ignored, no configuration loaded");
            return Err(Error::NotConfigured);
        }
        self.is_playing = !self.is_playing;
        debug!(playing = self.is_playing, "Toggled play");
        Ok(self.is_playing)
    }

    /// Flip one cell while paused.
    ///
    /// Returns the new state, or None if the command was ignored because the
    /// simulation is playing or nothing is loaded.
    pub fn change_cell(&mut self, x: i32, y: i32) -> Result<Option<Cell>> {
        if self.grid.is_empty() || self.is_playing {
            trace!(x, y, playing = self.is_playing, "Cell change ignored");
            return Ok(None);
        }

        let size = self.grid.size();
        if !Coordinate::new(x, y).in_bounds(size) {
            return Err(Error::OutOfRange { x, y, size });
        }

        let (x, y) = (x as usize, y as usize);
        let state = self.grid.toggle(x, y);
        self.notifier.emit(ChangeEvent::CellChanged { x, y, state });
        Ok(Some(state))
    }

    /// Swap in a freshly built grid and tell subscribers about all of it
    fn install(&mut self, grid: Grid) {
        self.grid = grid;
        self.generation = 0;
        if self.grid.is_empty() {
            self.is_playing = false;
        }

        self.notifier.emit(ChangeEvent::SizeChanged {
            size: self.grid.size(),
        });
        self.notifier.emit(ChangeEvent::GenerationChanged { generation: 0 });
        for coord in self.grid.alive_cells() {
            self.notifier.emit(ChangeEvent::CellChanged {
                x: coord.x as usize,
                y: coord.y as usize,
                state: Cell::Alive,
            });
        }
        self.notifier.emit(ChangeEvent::LoadComplete);
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
