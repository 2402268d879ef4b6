//! Flat 2D view of the sensor sheet
//!
//! One square region per grid position is created once and then recolored in
//! place every animation step. Invalid positions (no physical sensor) are
//! created fully transparent and never written again.

use super::geometry::GridGeometry;
use super::scan::scan_valid;
use crate::core_types::{Opacity, Rgb, Sensitivity, Vec2};
use crate::layout::{count_valid, MaskLayout, SensorLayout};
use crate::ramp::{value_to_color, ColorRamp};
use crate::scene::{Camera, Label, LabelId, Region, RegionId, Scene, ViewId};
use rustc_hash::FxHashMap;
use tracing::{debug, error, info};

/// Grid position as `(row, col)`
pub type CellKey = (usize, usize);

/// Readings at or below this force are drawn dim
pub const DEFAULT_ACTIVE_THRESHOLD: f64 = 5.0;

/// Background of the grid view (light blueish grey)
pub const GRID_BACKGROUND: Rgb = Rgb {
    r: 0.92,
    g: 0.92,
    b: 0.98,
};

/// Sensor grid bound to one view of a [`Scene`]
#[derive(Debug, Clone)]
pub struct HardwareGrid {
    /// `None` when the view was missing at construction; the grid is then inert
    view: Option<ViewId>,
    geometry: GridGeometry,
    ramp: ColorRamp,
    active_threshold: f64,
    /// Validity evaluated once at construction
    mask: MaskLayout,
    valid_count: usize,
    cells: FxHashMap<CellKey, RegionId>,
    time_label: Option<LabelId>,
    last_timestamp: Option<f64>,
}

impl HardwareGrid {
    /// Bind a grid to `view`, capturing the layout's validity mask
    ///
    /// A missing view is logged and leaves the grid inert: every later call is a no-op.
    pub fn new<L>(scene: &Scene, view: ViewId, geometry: GridGeometry, layout: &L) -> Self
    where
        L: SensorLayout + ?Sized,
    {
        let view = if scene.view(view).is_some() {
            Some(view)
        } else {
            error!("HwGrid (view {}): view not present in scene", view.0);
            None
        };
        let mask = MaskLayout::capture(layout, geometry.rows, geometry.cols);
        let valid_count = count_valid(&mask, geometry.rows, geometry.cols);

        Self {
            view,
            geometry,
            ramp: ColorRamp::default(),
            active_threshold: DEFAULT_ACTIVE_THRESHOLD,
            mask,
            valid_count,
            cells: FxHashMap::default(),
            time_label: None,
            last_timestamp: None,
        }
    }

    pub fn with_ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn with_active_threshold(mut self, threshold: f64) -> Self {
        self.active_threshold = threshold;
        self
    }

    pub fn is_inert(&self) -> bool {
        self.view.is_none()
    }

    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Number of cells that expect a reading
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    pub fn is_valid_cell(&self, row: usize, col: usize) -> bool {
        self.mask.is_valid(col, row)
    }

    /// Position of a valid cell in the flat reading sequence
    pub fn reading_index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.geometry.rows || col >= self.geometry.cols || !self.is_valid_cell(row, col) {
            return None;
        }
        let before = row * self.geometry.cols + col;
        Some(
            (0..before)
                .filter(|i| self.is_valid_cell(i / self.geometry.cols, i % self.geometry.cols))
                .count(),
        )
    }

    /// Camera, background and cell regions for a fresh view
    pub fn setup_scene(&mut self, scene: &mut Scene) {
        let Some(view) = self.view.and_then(|id| scene.view_mut(id)) else {
            return;
        };
        info!("HwGrid (view {}): setting up scene", view.id().0);
        let (_, height) = self.geometry.extent();
        view.set_default_camera(Camera::framing(height, 1.9));
        view.set_background(GRID_BACKGROUND);

        self.build_grid(scene);
        info!("HwGrid: scene setup complete");
    }

    /// Create one region per grid position, releasing any previous ones first
    ///
    /// Returns the number of regions now owned by the grid.
    pub fn build_grid(&mut self, scene: &mut Scene) -> usize {
        let Some(view) = self.view.and_then(|id| scene.view_mut(id)) else {
            return 0;
        };
        if !self.cells.is_empty() {
            let released = view.remove_regions(self.cells.drain().map(|(_, id)| id));
            debug!("HwGrid: released {} previous cell regions", released);
        }

        for row in 0..self.geometry.rows {
            for col in 0..self.geometry.cols {
                let opacity = if self.mask.is_valid(col, row) {
                    Opacity::FAINT
                } else {
                    Opacity::TRANSPARENT
                };
                let region = Region::rect(
                    self.geometry.cell_rect(row, col),
                    Rgb::LIGHT_GREY,
                    opacity,
                );
                self.cells.insert((row, col), view.add_region(region));
            }
        }

        info!(
            "HwGrid: created {} cell regions ({} with sensors)",
            self.cells.len(),
            self.valid_count
        );
        self.cells.len()
    }

    /// Recolor every valid cell from a flat reading sequence
    ///
    /// The timestamp label is always replaced. With `readings == None` nothing
    /// else changes. Otherwise each valid cell takes the next reading: ramp
    /// color, opaque when the reading exceeds the active threshold and dim
    /// otherwise. Valid cells past the end of `readings` turn dim grey.
    pub fn update_step(
        &mut self,
        scene: &mut Scene,
        timestamp: f64,
        readings: Option<&[f64]>,
        sensitivity: Sensitivity,
    ) {
        let Some(view) = self.view.and_then(|id| scene.view_mut(id)) else {
            return;
        };

        view.replace_label(
            &mut self.time_label,
            Label::new(format!("HW Grid - T: {timestamp:.1}s")),
        );

        let Some(readings) = readings else {
            return;
        };

        for cell in scan_valid(&self.mask, readings) {
            let Some(&id) = self.cells.get(&(cell.row, cell.col)) else {
                continue;
            };
            let Some(region) = view.region_mut(id) else {
                continue;
            };
            match cell.value {
                Some(value) => {
                    let opacity = if value > self.active_threshold {
                        Opacity::OPAQUE
                    } else {
                        Opacity::DIM
                    };
                    region
                        .set_color(value_to_color(
                            value,
                            sensitivity.value(),
                            self.ramp.max_scale,
                        ))
                        .set_opacity(opacity);
                }
                None => {
                    region.set_color(Rgb::LIGHT_GREY).set_opacity(Opacity::DIM);
                }
            }
        }
    }

    /// Record the animated timestamp and run an update step
    pub fn animate(
        &mut self,
        scene: &mut Scene,
        timestamp: f64,
        readings: Option<&[f64]>,
        sensitivity: Sensitivity,
    ) {
        self.last_timestamp = Some(timestamp);
        self.update_step(scene, timestamp, readings, sensitivity);
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    pub fn time_label(&self) -> Option<LabelId> {
        self.time_label
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<RegionId> {
        self.cells.get(&(row, col)).copied()
    }

    /// Current visual state of a cell
    pub fn cell_region<'s>(&self, scene: &'s Scene, row: usize, col: usize) -> Option<&'s Region> {
        let view = scene.view(self.view?)?;
        view.region(self.cell(row, col)?)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Valid cell under a view-plane point, for click handling
    pub fn pick(&self, point: Vec2) -> Option<CellKey> {
        self.geometry
            .cell_at(point)
            .filter(|&(row, col)| self.mask.is_valid(col, row))
    }
}
