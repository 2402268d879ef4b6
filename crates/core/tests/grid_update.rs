//! Color ramp and grid update behavior checked through the public API
use force_grid_core::grid::{GridGeometry, HardwareGrid};
use force_grid_core::ramp::{mapped_value, ramp_rgb8, value_to_color};
use force_grid_core::scene::{Scene, ViewId};
use force_grid_core::{MaskLayout, Opacity, Rgb, Sensitivity, HW_COLS, HW_ROWS};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn grid_for<L: Fn(usize, usize) -> bool>(layout: L) -> (Scene, HardwareGrid) {
    let mut scene = Scene::new(1);
    let mut grid = HardwareGrid::new(&scene, ViewId(0), GridGeometry::default(), &layout);
    grid.setup_scene(&mut scene);
    (scene, grid)
}

/// Color and opacity of every cell, row-major
fn snapshot(scene: &Scene, grid: &HardwareGrid) -> Vec<(Rgb, Opacity)> {
    let mut out = Vec::with_capacity(HW_ROWS * HW_COLS);
    for row in 0..HW_ROWS {
        for col in 0..HW_COLS {
            let region = grid.cell_region(scene, row, col).unwrap();
            out.push((region.color, region.opacity));
        }
    }
    out
}

#[test]
fn test_low_values_are_exact_grey() {
    for &sensitivity in &[0.5, 1.0, 2.0, 7.5] {
        let ceiling = sensitivity * 12.0 * 1000.0 / 255.0;
        for &fraction in &[0.0, 0.25, 0.5, 0.99, 1.0] {
            let color = value_to_color(ceiling * fraction, sensitivity, 1000.0);
            assert_eq!(
                color,
                Rgb::LIGHT_GREY,
                "value {} at sensitivity {}",
                ceiling * fraction,
                sensitivity
            );
        }
    }
}

#[test]
fn test_top_band_starts_red() {
    assert_eq!(mapped_value(804.0, 1.0, 1000.0), Some(205));
    assert_eq!(mapped_value(800.0, 1.0, 1000.0), Some(204));

    let band_start = value_to_color(804.0, 1.0, 1000.0);
    let band_end = value_to_color(800.0, 1.0, 1000.0);
    assert_eq!(band_start.r, 1.0);
    assert!(band_start.g < band_end.g);
}

#[test]
fn test_channels_stay_normalized() {
    for &sensitivity in &[0.1, 0.5, 1.0, 3.0, 100.0] {
        let mut value = 0.0;
        while value < 5000.0 {
            let color = value_to_color(value, sensitivity, 1000.0);
            assert!(color.is_normalized(), "{value} / {sensitivity} -> {color:?}");
            value += 3.7;
        }
    }
    for mapped in 0..=255u8 {
        let [r, g, b] = ramp_rgb8(mapped);
        let color = Rgb::from_rgb8([r, g, b]);
        assert!(color.is_normalized());
    }
}

#[test]
fn test_ramp_endpoints() {
    assert_eq!(value_to_color(0.0, 1.0, 1000.0), Rgb::LIGHT_GREY);
    assert_eq!(
        value_to_color(1000.0, 1.0, 1000.0),
        Rgb::from_rgb8([255, 0, 0])
    );
}

#[test]
fn test_all_invalid_mask_never_changes() {
    let (mut scene, mut grid) = grid_for(|_, _| false);
    let before = snapshot(&scene, &grid);
    assert!(before.iter().all(|(_, opacity)| *opacity == Opacity::TRANSPARENT));

    grid.update_step(&mut scene, 0.0, Some(&[500.0; 16]), Sensitivity::UNIT);
    assert_eq!(snapshot(&scene, &grid), before);
}

#[test]
fn test_two_valid_cells_one_reading() {
    let (mut scene, mut grid) = grid_for(|col, row| row == 0 && col < 2);
    grid.update_step(&mut scene, 0.0, Some(&[800.0]), Sensitivity::UNIT);

    let first = grid.cell_region(&scene, 0, 0).unwrap();
    assert_eq!(first.color, Rgb::from_rgb8(ramp_rgb8(204)));
    assert_eq!(first.color, Rgb::from_rgb8([255, 150, 0]));
    assert_eq!(first.opacity, Opacity::OPAQUE);

    let second = grid.cell_region(&scene, 0, 1).unwrap();
    assert_eq!(second.color, Rgb::LIGHT_GREY);
    assert_eq!(second.opacity, Opacity::DIM);

    // Invalid cells keep their initial state
    let third = grid.cell_region(&scene, 0, 2).unwrap();
    assert_eq!(third.opacity, Opacity::TRANSPARENT);
}

#[test]
fn test_rebuild_does_not_leak_regions() {
    let (mut scene, mut grid) = grid_for(|col, row| (col * row) % 3 != 1);
    assert_eq!(scene.region_count(), HW_ROWS * HW_COLS);
    assert_eq!(grid.build_grid(&mut scene), HW_ROWS * HW_COLS);
    assert_eq!(scene.region_count(), HW_ROWS * HW_COLS);
}

#[test]
fn test_none_readings_only_touch_label() {
    let (mut scene, mut grid) = grid_for(|_, _| true);
    grid.update_step(&mut scene, 0.0, Some(&[900.0, 10.0]), Sensitivity::UNIT);
    let before = snapshot(&scene, &grid);

    grid.update_step(&mut scene, 2.0, None, Sensitivity::UNIT);
    assert_eq!(snapshot(&scene, &grid), before);

    let view = scene.view(ViewId(0)).unwrap();
    let label = view.label(grid.time_label().unwrap()).unwrap();
    assert_eq!(label.text, "HW Grid - T: 2.0s");
}

#[test]
fn test_mask_text_drives_cursor() {
    let mask = MaskLayout::parse(".##\n#.#").unwrap();
    let geometry = GridGeometry {
        rows: 2,
        cols: 3,
        ..Default::default()
    };
    let mut scene = Scene::new(1);
    let mut grid = HardwareGrid::new(&scene, ViewId(0), geometry, &mask);
    grid.setup_scene(&mut scene);
    assert_eq!(grid.valid_count(), 4);

    grid.update_step(
        &mut scene,
        0.0,
        Some(&[1000.0, 0.0, 1000.0, 0.0]),
        Sensitivity::UNIT,
    );
    let red = Rgb::from_rgb8([255, 0, 0]);
    assert_eq!(grid.cell_region(&scene, 0, 1).unwrap().color, red);
    assert_eq!(grid.cell_region(&scene, 0, 2).unwrap().color, Rgb::LIGHT_GREY);
    assert_eq!(grid.cell_region(&scene, 1, 0).unwrap().color, red);
    assert_eq!(
        grid.cell_region(&scene, 1, 1).unwrap().opacity,
        Opacity::TRANSPARENT
    );
}

#[test]
fn test_sensitivity_scales_band() {
    let (mut scene, mut grid) = grid_for(|_, _| true);
    grid.update_step(&mut scene, 0.0, Some(&[1000.0]), Sensitivity::new(2.0));
    // 1000 / 2 = 500 -> mapped 127
    assert_eq!(
        grid.cell_region(&scene, 0, 0).unwrap().color,
        Rgb::from_rgb8(ramp_rgb8(127))
    );
}
