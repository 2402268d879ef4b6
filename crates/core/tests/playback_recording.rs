//! End-to-end playback: source -> dashboard -> recorder
use force_grid_core::config::VisualizerConfig;
use force_grid_core::export::FrameRecorder;
use force_grid_core::playback::PlaybackState;
use force_grid_core::{
    ArchLayout, CyclingSource, Dashboard, ImageSequenceRecorder, Playback, ReadingSource,
    Session, SimulatedSource, VizError, HW_COLS, HW_ROWS,
};
use std::fs;
use std::path::PathBuf;

fn small_config() -> VisualizerConfig {
    VisualizerConfig {
        canvas_width: 96,
        canvas_height: 54,
        ..Default::default()
    }
}

fn scratch(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "force-grid-playback-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&path);
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn test_arch_session_writes_one_frame_per_tick() {
    let dir = scratch("arch");
    let layout = ArchLayout::new(HW_ROWS, HW_COLS);
    let dashboard = Dashboard::new(small_config(), &layout).unwrap();
    let sensors = dashboard.sensor_count();
    assert!(sensors > 0 && sensors < HW_ROWS * HW_COLS);

    let mut session = Session::new(
        dashboard,
        Playback::from_duration(0.5, 10),
        SimulatedSource::new(sensors, 11),
    )
    .with_recorder(Box::new(ImageSequenceRecorder::new(&dir)));

    assert_eq!(session.toggle().unwrap(), PlaybackState::Playing);
    for _ in 0..5 {
        let report = session.tick().unwrap();
        assert!(report.recorded);
    }
    session.close();

    let mut frames: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    frames.sort();
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0], "frame_000000.ppm");
    assert_eq!(frames[4], "frame_000004.ppm");

    let header = b"P6\n96 54\n255\n";
    let bytes = fs::read(dir.join("frame_000004.ppm")).unwrap();
    assert_eq!(bytes.len(), header.len() + 96 * 54 * 3);
    assert!(bytes.starts_with(header));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_recorder_failure_keeps_playing() {
    let blocked = scratch("blocked");
    fs::write(&blocked, b"a file where the frame directory should be").unwrap();

    let dashboard = Dashboard::new(small_config(), &|_: usize, _: usize| true).unwrap();
    let source = CyclingSource::new(dashboard.sensor_count());
    let mut session = Session::new(dashboard, Playback::new(vec![0.0, 0.1], 10), source)
        .with_recorder(Box::new(ImageSequenceRecorder::new(&blocked)));

    session.toggle().unwrap();
    assert!(session.is_playing());
    assert!(!session.is_recording());

    let report = session.tick().unwrap();
    assert!(!report.recorded);
    assert_eq!(session.dashboard().history().len(), 1);
    fs::remove_file(&blocked).unwrap();
}

#[test]
fn test_disconnected_source_leaves_cells_alone() {
    let dashboard = Dashboard::new(small_config(), &|_: usize, _: usize| true).unwrap();
    let mut source = CyclingSource::new(dashboard.sensor_count());
    source.disconnect();
    let mut session = Session::new(dashboard, Playback::new(vec![0.0, 0.1], 10), source);

    let report = session.step().unwrap();
    assert_eq!(report.sample.active, 0);
    let grid = session.dashboard().grid();
    let cell = grid
        .cell_region(session.dashboard().scene(), 0, 0)
        .unwrap();
    assert_eq!(cell.opacity, force_grid_core::Opacity::FAINT);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = VisualizerConfig {
        fps: 0,
        ..small_config()
    };
    let err = Dashboard::new(config, &|_: usize, _: usize| true).err().unwrap();
    assert!(matches!(err, VizError::InvalidConfig { field: "fps", .. }));
}

#[test]
fn test_reopen_clears_previous_recording() {
    let dir = scratch("reopen");
    let mut recorder = ImageSequenceRecorder::new(&dir);
    let dashboard = Dashboard::new(small_config(), &|_: usize, _: usize| true).unwrap();
    let frame = dashboard.compose_frame();

    recorder.open(96, 54).unwrap();
    for _ in 0..3 {
        recorder.write_frame(&frame).unwrap();
    }
    recorder.release();

    recorder.open(96, 54).unwrap();
    recorder.write_frame(&frame).unwrap();
    recorder.release();
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    fs::remove_dir_all(&dir).unwrap();
}
