//! 3D bar field: one column per sensor, height proportional to force
//!
//! Lives in its own view next to the flat grid. Columns stand on the same
//! footprints as the grid cells and share its cursor semantics: valid cells
//! take readings in row-major order and collapse to a grey, zero-height
//! column once the readings run out.

use crate::core_types::{Opacity, Rgb, Sensitivity};
use crate::grid::{scan_valid, CellKey, GridGeometry};
use crate::layout::{MaskLayout, SensorLayout};
use crate::ramp::{value_to_color, ColorRamp};
use crate::scene::{Camera, Label, LabelId, Region, RegionId, Scene, ViewId};
use rustc_hash::FxHashMap;
use tracing::{debug, error, info};

/// Tallest column, in world units
pub const DEFAULT_BAR_HEIGHT: f32 = 4.0;

/// Camera lean for the bar view (radians)
pub const BAR_TILT: f32 = 0.9;

/// Background of the bar view (light grey)
pub const BAR_BACKGROUND: Rgb = Rgb {
    r: 0.9,
    g: 0.9,
    b: 0.9,
};

/// Column height for a reading: `clamp(value / sensitivity / max_scale, 0, 1) * max_height`
///
/// Unusable sensitivity or scale gives a flat column.
pub fn bar_height(value: f64, sensitivity: Sensitivity, max_scale: f64, max_height: f32) -> f32 {
    if !sensitivity.is_usable() || !(max_scale.is_finite() && max_scale > 0.0) {
        return 0.0;
    }
    let fraction = value / sensitivity.value() / max_scale;
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0) as f32 * max_height
}

#[derive(Debug, Clone)]
pub struct BarField {
    view: Option<ViewId>,
    geometry: GridGeometry,
    ramp: ColorRamp,
    max_height: f32,
    mask: MaskLayout,
    bars: FxHashMap<CellKey, RegionId>,
    title: Option<LabelId>,
}

impl BarField {
    /// Bind a bar field to `view`; a missing view leaves it inert
    pub fn new<L>(scene: &Scene, view: ViewId, geometry: GridGeometry, layout: &L) -> Self
    where
        L: SensorLayout + ?Sized,
    {
        let view = if scene.view(view).is_some() {
            Some(view)
        } else {
            error!("BarField (view {}): view not present in scene", view.0);
            None
        };
        Self {
            view,
            geometry,
            ramp: ColorRamp::default(),
            max_height: DEFAULT_BAR_HEIGHT,
            mask: MaskLayout::capture(layout, geometry.rows, geometry.cols),
            bars: FxHashMap::default(),
            title: None,
        }
    }

    pub fn with_ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn with_max_height(mut self, max_height: f32) -> Self {
        self.max_height = max_height.max(0.0);
        self
    }

    pub fn is_inert(&self) -> bool {
        self.view.is_none()
    }

    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Tilted camera, background and one flat column per valid cell
    pub fn setup_scene(&mut self, scene: &mut Scene) {
        let Some(view) = self.view.and_then(|id| scene.view_mut(id)) else {
            return;
        };
        info!("BarField (view {}): setting up scene", view.id().0);
        let (_, height) = self.geometry.extent();
        view.set_default_camera(Camera::framing(height + self.max_height, 1.9).tilted(BAR_TILT));
        view.set_background(BAR_BACKGROUND);
        view.replace_label(&mut self.title, Label::new("Force Bars"));

        self.build_bars(scene);
    }

    /// Create the columns, releasing previous ones; returns how many exist
    pub fn build_bars(&mut self, scene: &mut Scene) -> usize {
        let Some(view) = self.view.and_then(|id| scene.view_mut(id)) else {
            return 0;
        };
        if !self.bars.is_empty() {
            let released = view.remove_regions(self.bars.drain().map(|(_, id)| id));
            debug!("BarField: released {} previous columns", released);
        }

        for row in 0..self.geometry.rows {
            for col in 0..self.geometry.cols {
                if !self.mask.is_valid(col, row) {
                    continue;
                }
                let column = Region::column(
                    self.geometry.cell_rect(row, col),
                    0.0,
                    Rgb::LIGHT_GREY,
                    Opacity::DIM,
                );
                self.bars.insert((row, col), view.add_region(column));
            }
        }
        info!("BarField: created {} columns", self.bars.len());
        self.bars.len()
    }

    /// Resize and recolor every column from a flat reading sequence
    ///
    /// `None` leaves the columns untouched.
    pub fn update_step(
        &mut self,
        scene: &mut Scene,
        readings: Option<&[f64]>,
        sensitivity: Sensitivity,
    ) {
        let Some(readings) = readings else {
            return;
        };
        let Some(view) = self.view.and_then(|id| scene.view_mut(id)) else {
            return;
        };

        for cell in scan_valid(&self.mask, readings) {
            let Some(&id) = self.bars.get(&(cell.row, cell.col)) else {
                continue;
            };
            let Some(column) = view.region_mut(id) else {
                continue;
            };
            match cell.value {
                Some(value) => {
                    column
                        .set_height(bar_height(
                            value,
                            sensitivity,
                            self.ramp.max_scale,
                            self.max_height,
                        ))
                        .set_color(value_to_color(
                            value,
                            sensitivity.value(),
                            self.ramp.max_scale,
                        ))
                        .set_opacity(Opacity::OPAQUE);
                }
                None => {
                    column
                        .set_height(0.0)
                        .set_color(Rgb::LIGHT_GREY)
                        .set_opacity(Opacity::DIM);
                }
            }
        }
    }

    /// Restore the tilted default camera
    pub fn reset_camera(&self, scene: &mut Scene) {
        if let Some(view) = self.view.and_then(|id| scene.view_mut(id)) {
            view.reset_camera();
        }
    }

    pub fn bar(&self, row: usize, col: usize) -> Option<RegionId> {
        self.bars.get(&(row, col)).copied()
    }

    pub fn bar_region<'s>(&self, scene: &'s Scene, row: usize, col: usize) -> Option<&'s Region> {
        scene.view(self.view?)?.region(self.bar(row, col)?)
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }
}
