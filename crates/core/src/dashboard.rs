//! Multi-view dashboard: flat grid and 3D bars side by side over a force graph
//!
//! The dashboard owns the [`Scene`] and every component drawing into it, and
//! feeds them the same timestamp, readings and sensitivity on each step.

use crate::bars::BarField;
use crate::config::VisualizerConfig;
use crate::core_types::{Sensitivity, Vec2};
use crate::error::Result;
use crate::events::{ClickEvent, ClickRouter, Dispatch};
use crate::export::{compose, CanvasLayout, Frame};
use crate::grid::{CellKey, HardwareGrid};
use crate::history::{ForceHistory, ForceSample};
use crate::layout::SensorLayout;
use crate::scene::{Anchor, Label, LabelId, Scene, ViewId};
use tracing::{debug, info};

/// View holding the flat sensor grid
pub const GRID_VIEW: ViewId = ViewId(0);
/// View holding the 3D bar field
pub const BAR_VIEW: ViewId = ViewId(1);

const IDLE_DETAIL: &str = "Click on a sensor to see details.";

/// Which component a view's clicks belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Grid,
    Bars,
}

pub struct Dashboard {
    config: VisualizerConfig,
    scene: Scene,
    grid: HardwareGrid,
    bars: BarField,
    history: ForceHistory,
    router: ClickRouter<Panel>,
    canvas: CanvasLayout,
    /// Copy of the most recent frame, for the detail readout
    last_readings: Option<Vec<f64>>,
    selection: Option<CellKey>,
    detail_label: Option<LabelId>,
}

impl Dashboard {
    /// Build both views for `layout` and set up their scenes
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidConfig`](crate::VizError::InvalidConfig) if
    /// `config` does not validate.
    pub fn new<L>(config: VisualizerConfig, layout: &L) -> Result<Self>
    where
        L: SensorLayout + ?Sized,
    {
        config.validate()?;
        let mut scene = Scene::new(2);

        let mut grid = HardwareGrid::new(&scene, GRID_VIEW, config.geometry, layout)
            .with_ramp(config.ramp())
            .with_active_threshold(config.active_threshold);
        grid.setup_scene(&mut scene);

        let mut bars = BarField::new(&scene, BAR_VIEW, config.geometry, layout)
            .with_ramp(config.ramp())
            .with_max_height(config.bar_max_height);
        bars.setup_scene(&mut scene);

        let mut router = ClickRouter::new();
        router.register(GRID_VIEW, Panel::Grid);
        router.register(BAR_VIEW, Panel::Bars);

        let (width, height) = config.canvas();
        info!(
            "Dashboard ready: {} sensors, canvas {}x{}",
            grid.valid_count(),
            width,
            height
        );

        let mut dashboard = Self {
            history: ForceHistory::new(config.history_capacity),
            canvas: CanvasLayout::new(width, height, scene.view_count()),
            config,
            scene,
            grid,
            bars,
            router,
            last_readings: None,
            selection: None,
            detail_label: None,
        };
        dashboard.refresh_detail();
        Ok(dashboard)
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn grid(&self) -> &HardwareGrid {
        &self.grid
    }

    pub fn bars(&self) -> &BarField {
        &self.bars
    }

    pub fn history(&self) -> &ForceHistory {
        &self.history
    }

    pub fn canvas(&self) -> CanvasLayout {
        self.canvas
    }

    /// Number of readings a source should deliver per frame
    pub fn sensor_count(&self) -> usize {
        self.grid.valid_count()
    }

    /// Advance every view to `timestamp`
    pub fn update_views(
        &mut self,
        timestamp: f64,
        readings: Option<&[f64]>,
        sensitivity: Sensitivity,
    ) -> ForceSample {
        self.grid.animate(&mut self.scene, timestamp, readings, sensitivity);
        self.bars.update_step(&mut self.scene, readings, sensitivity);
        let sample = self
            .history
            .record(timestamp, readings, self.config.active_threshold);
        // A step without data leaves nothing current to read out
        self.last_readings = readings.map(<[f64]>::to_vec);
        self.refresh_detail();
        debug!(
            "Step t={:.1}: total {} peak {} active {}",
            timestamp, sample.total, sample.peak, sample.active
        );
        sample
    }

    /// Composite frame at the configured canvas size
    pub fn compose_frame(&self) -> Frame {
        compose(
            &self.scene,
            &self.history,
            self.canvas.width,
            self.canvas.height,
        )
    }

    pub fn reset_bar_camera(&mut self) {
        self.bars.reset_camera(&mut self.scene);
    }

    pub fn selection(&self) -> Option<CellKey> {
        self.selection
    }

    /// Latest reading of the selected cell
    pub fn selected_force(&self) -> Option<f64> {
        let (row, col) = self.selection?;
        let index = self.grid.reading_index(row, col)?;
        self.last_readings.as_ref()?.get(index).copied()
    }

    /// Readout for the selected cell
    pub fn detail_text(&self) -> String {
        match (self.selection, self.selected_force()) {
            (Some((row, col)), Some(force)) => format!("Sensor ({row}, {col}): {force:.1}"),
            (Some((row, col)), None) => format!("Sensor ({row}, {col}): no data"),
            (None, _) => IDLE_DETAIL.to_string(),
        }
    }

    fn refresh_detail(&mut self) {
        let text = self.detail_text();
        if let Some(view) = self.scene.view_mut(GRID_VIEW) {
            let mut label = Label::new(text);
            label.anchor = Anchor::TopLeft;
            view.replace_label(&mut self.detail_label, label);
        }
    }

    /// Dispatch a click given in view-plane coordinates
    pub fn click(&mut self, event: &ClickEvent) {
        match self.router.route(event) {
            Dispatch::Target(Panel::Grid) => self.select(self.grid.pick(event.point)),
            Dispatch::Target(Panel::Bars) => {
                // Undo the camera lean to land on the ground plane
                let tilt = self
                    .scene
                    .view(BAR_VIEW)
                    .map_or(0.0, |view| view.camera().tilt);
                let ground = Vec2::new(event.point.x, event.point.y / tilt.cos());
                self.select(self.grid.pick(ground));
            }
            Dispatch::Broadcast(_) => self.select(None),
        }
    }

    /// Dispatch a click given in canvas pixels
    pub fn click_at_pixel(&mut self, x: u32, y: u32) {
        let event = self
            .canvas
            .hit(x, y)
            .and_then(|(view_id, local)| {
                let rect = self.canvas.view_rect(view_id.0)?;
                let view = self.scene.view(view_id)?;
                let world = view
                    .camera()
                    .viewport_to_world(local, (rect.width(), rect.height()));
                Some(ClickEvent::at(view_id, world))
            })
            .unwrap_or_else(ClickEvent::outside);
        self.click(&event);
    }

    fn select(&mut self, cell: Option<CellKey>) {
        if self.selection != cell {
            match cell {
                Some((row, col)) => info!("Selected sensor ({}, {})", row, col),
                None => debug!("Selection cleared"),
            }
        }
        self.selection = cell;
        self.refresh_detail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FullLayout;

    fn dashboard() -> Dashboard {
        let config = VisualizerConfig {
            canvas_width: 320,
            canvas_height: 180,
            ..Default::default()
        };
        Dashboard::new(config, &FullLayout).unwrap()
    }

    #[test]
    fn test_views_are_populated() {
        let dash = dashboard();
        assert_eq!(dash.scene().view_count(), 2);
        assert_eq!(dash.grid().cell_count(), 44 * 52);
        assert_eq!(dash.bars().bar_count(), 44 * 52);
        assert_eq!(dash.sensor_count(), 44 * 52);
    }

    #[test]
    fn test_update_feeds_history() {
        let mut dash = dashboard();
        let sample = dash.update_views(0.1, Some(&[10.0, 20.0]), Sensitivity::UNIT);
        assert_eq!(*sample.total, 30.0);
        assert_eq!(dash.history().len(), 1);
    }

    #[test]
    fn test_grid_click_selects_cell() {
        let mut dash = dashboard();
        dash.update_views(0.0, Some(&[11.0, 22.0, 33.0]), Sensitivity::UNIT);
        let point = dash.config().geometry.cell_center(0, 2);
        dash.click(&ClickEvent::at(GRID_VIEW, point));
        assert_eq!(dash.selection(), Some((0, 2)));
        assert_eq!(dash.detail_text(), "Sensor (0, 2): 33.0");

        dash.click(&ClickEvent::outside());
        assert_eq!(dash.selection(), None);
        assert_eq!(dash.detail_text(), IDLE_DETAIL);
    }

    #[test]
    fn test_detail_label_is_replaced() {
        let mut dash = dashboard();
        dash.update_views(0.0, None, Sensitivity::UNIT);
        dash.update_views(0.1, None, Sensitivity::UNIT);
        // Timestamp label plus detail label
        assert_eq!(dash.scene().view(GRID_VIEW).unwrap().label_count(), 2);
    }

    #[test]
    fn test_pixel_outside_views_deselects() {
        let mut dash = dashboard();
        let point = dash.config().geometry.cell_center(3, 3);
        dash.click(&ClickEvent::at(GRID_VIEW, point));
        assert!(dash.selection().is_some());
        // The bottom band holds the graph, not a view
        dash.click_at_pixel(10, 170);
        assert!(dash.selection().is_none());
    }

    #[test]
    fn test_composed_frame_size() {
        let dash = dashboard();
        assert_eq!(dash.compose_frame().dimensions(), (320, 180));
    }

    #[test]
    fn test_missing_readings_clear_detail() {
        let mut dash = dashboard();
        dash.update_views(0.0, Some(&[11.0, 22.0]), Sensitivity::UNIT);
        let point = dash.config().geometry.cell_center(0, 1);
        dash.click(&ClickEvent::at(GRID_VIEW, point));
        assert_eq!(dash.detail_text(), "Sensor (0, 1): 22.0");

        dash.update_views(0.1, None, Sensitivity::UNIT);
        assert_eq!(dash.selected_force(), None);
        assert_eq!(dash.detail_text(), "Sensor (0, 1): no data");

        dash.update_views(0.2, Some(&[5.0, 7.5]), Sensitivity::UNIT);
        assert_eq!(dash.detail_text(), "Sensor (0, 1): 7.5");
    }
}
