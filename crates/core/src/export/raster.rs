//! Software rasterizer for exported frames
//!
//! Regions are projected through each view's camera and painted as
//! axis-aligned pixel rectangles. Rows are painted in parallel with rayon.
//! Labels are left to text-capable surfaces and are not drawn here.

use crate::core_types::{Opacity, Rgb, Vec2, Vec3};
use crate::history::ForceHistory;
use crate::scene::{Camera, Rect, Scene, Shape, View, ViewId};
use rayon::prelude::*;
use std::io::{self, Write};

/// Share of the canvas height given to the views; the graph gets the rest
const VIEW_SHARE: f32 = 0.6;

const GRAPH_MARGIN: i64 = 40;
const GRAPH_BACKGROUND: Rgb = Rgb::WHITE;
const TOTAL_LINE: Rgb = Rgb {
    r: 0.12,
    g: 0.35,
    b: 0.8,
};
const PEAK_LINE: Rgb = Rgb {
    r: 0.95,
    g: 0.5,
    b: 0.1,
};
const INDICATOR_LINE: Rgb = Rgb {
    r: 0.85,
    g: 0.1,
    b: 0.1,
};

/// Half-open pixel rectangle, may extend past the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl PixelRect {
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }
}

/// 8-bit RGB image, rows top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let fill = background.to_rgb8();
        let pixels = fill
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let i = self.offset(i64::from(x), i64::from(y))?;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Opaque write; out-of-bounds points are dropped
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 3].copy_from_slice(&color.to_rgb8());
        }
    }

    /// Blend `color` over the pixels covered by `rect`
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgb, opacity: Opacity) {
        self.paint(&[Paint {
            rect,
            color,
            opacity,
        }]);
    }

    /// Paint a list of rectangles in order, one rayon task per row
    fn paint(&mut self, paints: &[Paint]) {
        let stride = self.width as usize * 3;
        if stride == 0 || paints.is_empty() {
            return;
        }
        let width = i64::from(self.width);
        self.pixels
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as i64;
                for paint in paints {
                    if y < paint.rect.y0 || y >= paint.rect.y1 {
                        continue;
                    }
                    let x0 = paint.rect.x0.clamp(0, width) as usize;
                    let x1 = paint.rect.x1.clamp(0, width) as usize;
                    if x0 >= x1 {
                        continue;
                    }
                    for px in row[x0 * 3..x1 * 3].chunks_exact_mut(3) {
                        let under = Rgb::from_rgb8([px[0], px[1], px[2]]);
                        px.copy_from_slice(&paint.color.over(under, paint.opacity).to_rgb8());
                    }
                }
            });
    }

    /// Copy `other` with its top-left corner at `(x, y)`, clipping at the edges
    pub fn blit(&mut self, other: &Frame, x: u32, y: u32) {
        let dst_w = self.width as usize;
        let src_w = other.width as usize;
        let copy_w = src_w.min(dst_w.saturating_sub(x as usize));
        if copy_w == 0 {
            return;
        }
        for row in 0..other.height {
            let dy = (y + row) as usize;
            if dy >= self.height as usize {
                break;
            }
            let src = row as usize * src_w * 3;
            let dst = (dy * dst_w + x as usize) * 3;
            self.pixels[dst..dst + copy_w * 3]
                .copy_from_slice(&other.pixels[src..src + copy_w * 3]);
        }
    }

    /// Bresenham line, one pixel wide
    pub fn draw_line(&mut self, from: (i64, i64), to: (i64, i64), color: Rgb) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Binary PPM (P6)
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        out.write_all(&self.pixels)?;
        out.flush()
    }
}

#[derive(Debug, Clone, Copy)]
struct Paint {
    rect: PixelRect,
    color: Rgb,
    opacity: Opacity,
}

/// Pixel bounds of a view-plane rectangle
fn project_rect(camera: &Camera, a: Vec2, b: Vec2, viewport: (u32, u32)) -> PixelRect {
    let pa = camera.world_to_viewport(a, viewport);
    let pb = camera.world_to_viewport(b, viewport);
    PixelRect {
        x0: pa.x.min(pb.x).round() as i64,
        y0: pa.y.min(pb.y).round() as i64,
        x1: pa.x.max(pb.x).round() as i64,
        y1: pa.y.max(pb.y).round() as i64,
    }
}

/// Painter's list for a view: flat regions in creation order, then columns back to front
fn paint_list(view: &View, viewport: (u32, u32)) -> Vec<Paint> {
    let camera = view.camera();
    let mut flats = Vec::new();
    let mut columns = Vec::new();

    for (_, region) in view.regions() {
        if region.opacity.is_transparent() {
            continue;
        }
        match region.shape {
            Shape::Rect(rect) => {
                let a = camera.project(Vec3::new(rect.min.x, rect.min.y, 0.0));
                let b = camera.project(Vec3::new(rect.max.x, rect.max.y, 0.0));
                flats.push(Paint {
                    rect: project_rect(camera, a, b, viewport),
                    color: region.color,
                    opacity: region.opacity,
                });
            }
            Shape::Column { footprint, height } => columns.push((footprint, height, region)),
        }
    }

    // Larger y sits further from a camera leaning back
    columns.sort_by(|a, b| b.0.center().y.total_cmp(&a.0.center().y));

    let mut paints = flats;
    for (footprint, height, region) in columns {
        paints.extend(column_paints(
            camera,
            footprint,
            height,
            region.color,
            region.opacity,
            viewport,
        ));
    }
    paints
}

/// Body and lighter top cap of a column
fn column_paints(
    camera: &Camera,
    footprint: Rect,
    height: f32,
    color: Rgb,
    opacity: Opacity,
    viewport: (u32, u32),
) -> [Paint; 2] {
    let corner = |p: Vec2, z: f32| camera.project(Vec3::new(p.x, p.y, z));
    let body = project_rect(
        camera,
        corner(footprint.min, 0.0),
        corner(footprint.max, height),
        viewport,
    );
    let cap = project_rect(
        camera,
        corner(footprint.min, height),
        corner(footprint.max, height),
        viewport,
    );
    [
        Paint {
            rect: body,
            color,
            opacity,
        },
        Paint {
            rect: cap,
            color: Rgb::WHITE.over(color, Opacity::new(0.3)),
            opacity,
        },
    ]
}

/// Rasterize one view at the given size
pub fn render_view(view: &View, width: u32, height: u32) -> Frame {
    let mut frame = Frame::new(width, height, view.background());
    let paints = paint_list(view, (width, height));
    frame.paint(&paints);
    frame
}

/// Line graph of total and peak force with the time indicator
pub fn render_history(history: &ForceHistory, width: u32, height: u32) -> Frame {
    let mut frame = Frame::new(width, height, GRAPH_BACKGROUND);
    let plot = PixelRect {
        x0: GRAPH_MARGIN,
        y0: GRAPH_MARGIN / 2,
        x1: i64::from(width) - GRAPH_MARGIN / 2,
        y1: i64::from(height) - GRAPH_MARGIN,
    };
    if plot.width() < 2 || plot.height() < 2 {
        return frame;
    }

    // Axes
    frame.draw_line((plot.x0, plot.y1), (plot.x1, plot.y1), Rgb::BLACK);
    frame.draw_line((plot.x0, plot.y0), (plot.x0, plot.y1), Rgb::BLACK);

    let Some((t0, t1)) = history.time_bounds() else {
        return frame;
    };
    let span = if t1 > t0 { t1 - t0 } else { 1.0 };
    let top = (*history.max_total()).max(1.0);
    let to_px = |t: f64, v: f64| {
        let fx = (t - t0) / span;
        let fy = (v / top).clamp(0.0, 1.0);
        (
            plot.x0 + (fx * f64::from(plot.width() - 1)).round() as i64,
            plot.y1 - (fy * f64::from(plot.height() - 1)).round() as i64,
        )
    };

    for (series, color) in [
        (history.peak_series(), PEAK_LINE),
        (history.total_series(), TOTAL_LINE),
    ] {
        let points: Vec<_> = series.iter().map(|&(t, v)| to_px(t, v)).collect();
        match points.as_slice() {
            [single] => frame.set_pixel(single.0, single.1, color),
            _ => {
                for pair in points.windows(2) {
                    frame.draw_line(pair[0], pair[1], color);
                }
            }
        }
    }

    if let Some(t) = history.indicator() {
        let (x, _) = to_px(t.clamp(t0, t0 + span), 0.0);
        frame.draw_line((x, plot.y0), (x, plot.y1), INDICATOR_LINE);
    }
    frame
}

/// Placement of views and graph on the exported canvas
///
/// Views split the top band evenly left to right; the graph spans the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub view_count: usize,
}

impl CanvasLayout {
    pub fn new(width: u32, height: u32, view_count: usize) -> Self {
        Self {
            width,
            height,
            view_count,
        }
    }

    fn view_band_height(&self) -> u32 {
        (self.height as f32 * VIEW_SHARE).round() as u32
    }

    pub fn view_rect(&self, index: usize) -> Option<PixelRect> {
        if index >= self.view_count {
            return None;
        }
        let count = self.view_count as i64;
        let width = i64::from(self.width);
        Some(PixelRect {
            x0: width * index as i64 / count,
            y0: 0,
            x1: width * (index as i64 + 1) / count,
            y1: i64::from(self.view_band_height()),
        })
    }

    pub fn graph_rect(&self) -> PixelRect {
        PixelRect {
            x0: 0,
            y0: i64::from(self.view_band_height()),
            x1: i64::from(self.width),
            y1: i64::from(self.height),
        }
    }

    /// View under a canvas pixel and the pixel relative to that view
    pub fn hit(&self, x: u32, y: u32) -> Option<(ViewId, Vec2)> {
        let (x, y) = (i64::from(x), i64::from(y));
        (0..self.view_count).find_map(|index| {
            let rect = self.view_rect(index)?;
            let local = Vec2::new((x - rect.x0) as f32, (y - rect.y0) as f32);
            rect.contains(x, y).then_some((ViewId(index), local))
        })
    }
}

/// Composite every view of `scene` above the history graph
pub fn compose(scene: &Scene, history: &ForceHistory, width: u32, height: u32) -> Frame {
    let layout = CanvasLayout::new(width, height, scene.view_count());
    let mut canvas = Frame::new(width, height, Rgb::WHITE);

    for (index, view) in scene.views().iter().enumerate() {
        let Some(rect) = layout.view_rect(index) else {
            continue;
        };
        let tile = render_view(view, rect.width(), rect.height());
        canvas.blit(&tile, rect.x0 as u32, rect.y0 as u32);
    }

    let graph = layout.graph_rect();
    let plot = render_history(history, graph.width(), graph.height());
    canvas.blit(&plot, graph.x0 as u32, graph.y0 as u32);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Region;

    #[test]
    fn test_frame_fill_and_blend() {
        let mut frame = Frame::new(4, 3, Rgb::WHITE);
        assert_eq!(frame.as_bytes().len(), 4 * 3 * 3);
        let rect = PixelRect {
            x0: 1,
            y0: 1,
            x1: 10,
            y1: 2,
        };
        frame.fill_rect(rect, Rgb::BLACK, Opacity::OPAQUE);
        assert_eq!(frame.pixel(0, 1), Some([255, 255, 255]));
        assert_eq!(frame.pixel(3, 1), Some([0, 0, 0]));
        assert_eq!(frame.pixel(3, 2), Some([255, 255, 255]));

        frame.fill_rect(rect, Rgb::BLACK, Opacity::new(0.5));
        frame.fill_rect(
            PixelRect {
                x0: 0,
                y0: 0,
                x1: 1,
                y1: 1,
            },
            Rgb::BLACK,
            Opacity::new(0.5),
        );
        assert_eq!(frame.pixel(0, 0), Some([128, 128, 128]));
    }

    #[test]
    fn test_transparent_regions_are_skipped() {
        let mut view = View::new(ViewId(0));
        view.set_background(Rgb::WHITE);
        view.add_region(Region::rect(
            Rect::square(Vec2::zeros(), 2.0),
            Rgb::BLACK,
            Opacity::TRANSPARENT,
        ));
        let frame = render_view(&view, 10, 10);
        assert_eq!(frame.pixel(5, 5), Some([255, 255, 255]));
    }

    #[test]
    fn test_view_region_lands_at_center() {
        let mut view = View::new(ViewId(0));
        view.add_region(Region::rect(
            Rect::square(Vec2::zeros(), 0.5),
            Rgb::from_rgb8([255, 0, 0]),
            Opacity::OPAQUE,
        ));
        let frame = render_view(&view, 20, 20);
        assert_eq!(frame.pixel(10, 10), Some([255, 0, 0]));
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255]));
    }

    #[test]
    fn test_blit_clips() {
        let mut canvas = Frame::new(5, 5, Rgb::WHITE);
        let tile = Frame::new(3, 3, Rgb::BLACK);
        canvas.blit(&tile, 3, 3);
        assert_eq!(canvas.pixel(4, 4), Some([0, 0, 0]));
        assert_eq!(canvas.pixel(2, 2), Some([255, 255, 255]));
    }

    #[test]
    fn test_ppm_header() {
        let frame = Frame::new(2, 1, Rgb::BLACK);
        let mut out = Vec::new();
        frame.write_ppm(&mut out).unwrap();
        assert!(out.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(out.len(), b"P6\n2 1\n255\n".len() + 6);
    }

    #[test]
    fn test_canvas_layout_hit() {
        let layout = CanvasLayout::new(1920, 1080, 2);
        assert_eq!(layout.view_rect(1).unwrap().x0, 960);
        assert_eq!(layout.graph_rect().y0, 648);
        let (view, local) = layout.hit(1000, 10).unwrap();
        assert_eq!(view, ViewId(1));
        assert_eq!(local, Vec2::new(40.0, 10.0));
        assert!(layout.hit(10, 700).is_none());
    }

    #[test]
    fn test_history_graph_draws_indicator() {
        let mut history = ForceHistory::new(10);
        history.record(0.0, Some(&[10.0]), 5.0);
        history.record(1.0, Some(&[20.0]), 5.0);
        let frame = render_history(&history, 200, 100);
        // Indicator sits at the right edge of the plot area
        let x = (200 - GRAPH_MARGIN / 2 - 1) as u32;
        assert_eq!(frame.pixel(x, 30), Some(INDICATOR_LINE.to_rgb8()));
    }

    #[test]
    fn test_compose_matches_canvas() {
        let scene = Scene::new(2);
        let frame = compose(&scene, &ForceHistory::default(), 320, 180);
        assert_eq!(frame.dimensions(), (320, 180));
    }

    #[test]
    fn test_graph_stays_inside_plot_after_loop() {
        let mut history = ForceHistory::new(600);
        for i in 0..30 {
            history.record(f64::from(i) * 0.1, Some(&[f64::from(i) * 10.0]), 5.0);
        }
        history.record(0.0, Some(&[40.0]), 5.0);
        history.record(0.1, Some(&[80.0]), 5.0);

        let (width, height) = (200_u32, 100_u32);
        let frame = render_history(&history, width, height);
        let right = width - (GRAPH_MARGIN / 2) as u32;
        let white = Some([255, 255, 255]);
        for x in (right + 1)..width {
            for y in 0..height {
                assert_eq!(frame.pixel(x, y), white, "stray pixel at ({x}, {y})");
            }
        }
    }
}
