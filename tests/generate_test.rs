//! End-to-end screen generation from presets to files.

mod common;

use common::{fixtures::presets, TestWorkspace};
use htscreen::models::ScreenConfig;
use htscreen::rendering::ScreenFormat;
use ordered_screen::MaskKind;
use pretty_assertions::assert_eq;

#[test]
fn test_default_preset_raw() {
    let ws = TestWorkspace::new();
    let screen = ws.generate(None, &ScreenConfig::default(), ScreenFormat::Raw, false);

    common::assert_valid_thresholds(&screen);
    assert_eq!(screen.kind, MaskKind::NonDithered);
    assert_eq!((screen.mask.width(), screen.mask.height()), (68, 17));

    let path = ws.write(&screen, ScreenFormat::Raw);
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Screen_Dithered_68x17.raw"
    );
    assert_eq!(std::fs::read(&path).unwrap().len(), 68 * 17);
}

#[test]
fn test_holladay_preset_pgm() {
    let ws = TestWorkspace::new();
    let screen = ws.generate(
        Some(presets::BRICK),
        &ScreenConfig::default(),
        ScreenFormat::Pgm,
        false,
    );

    assert_eq!(screen.kind, MaskKind::Holladay);
    let path = ws.write(&screen, ScreenFormat::Pgm);
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Screen_Holladay_Shift4_17x1.pgm"
    );

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"P5\n# Halftone threshold array, Holladay_Shift, [17, 1], S=4\n"));
}

#[test]
fn test_overrides_win_over_preset() {
    let ws = TestWorkspace::new();
    let overrides = ScreenConfig {
        angle: Some(0.0),
        ..Default::default()
    };
    let screen = ws.generate(
        Some(presets::COARSE),
        &overrides,
        ScreenFormat::Raw,
        false,
    );

    assert_eq!((screen.cell.x, screen.cell.y), (0, 4));
    assert_eq!(screen.cell.n, 16);
    assert_eq!((screen.mask.width(), screen.mask.height()), (4, 4));
}

#[test]
fn test_anisotropic_resolution() {
    let ws = TestWorkspace::new();
    let screen = ws.generate(
        Some(presets::ANISOTROPIC),
        &ScreenConfig::default(),
        ScreenFormat::Png,
        false,
    );

    common::assert_valid_thresholds(&screen);
    assert_eq!(screen.cell.n, 8);

    let path = ws.write(&screen, ScreenFormat::Png);
    common::assert_png(&std::fs::read(path).unwrap());
}

#[test]
fn test_sequence_output() {
    let ws = TestWorkspace::new();
    let screen = ws.generate(
        Some(presets::DIAGONAL),
        &ScreenConfig::default(),
        ScreenFormat::Tos,
        false,
    );

    common::assert_valid_sequence(&screen);

    let path = ws.write(&screen, ScreenFormat::Tos);
    let text = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        text.lines().count(),
        screen.mask.width() * screen.mask.height()
    );
}

#[test]
fn test_json_with_sequence() {
    let ws = TestWorkspace::new();
    let screen = ws.generate(
        Some(presets::DIAGONAL),
        &ScreenConfig::default(),
        ScreenFormat::Json,
        true,
    );

    let path = ws.write(&screen, ScreenFormat::Json);
    let value: serde_json::Value =
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();

    assert_eq!(
        value["sequence"].as_array().unwrap().len(),
        screen.mask.width() * screen.mask.height()
    );
    assert!(value.get("thresholds").is_none());
}

#[test]
fn test_dithered_preset_is_reproducible() {
    let ws = TestWorkspace::new();
    let first = ws.generate(
        Some(presets::DITHERED),
        &ScreenConfig::default(),
        ScreenFormat::Raw,
        false,
    );
    let second = ws.generate(
        Some(presets::DITHERED),
        &ScreenConfig::default(),
        ScreenFormat::Raw,
        false,
    );

    assert!(matches!(first.kind, MaskKind::Dithered { .. }));
    common::assert_valid_thresholds(&first);
    assert_eq!(first.mask, second.mask);
}

#[test]
fn test_ps_output() {
    let ws = TestWorkspace::new();
    let screen = ws.generate(None, &ScreenConfig::default(), ScreenFormat::Ps, false);

    let path = ws.write(&screen, ScreenFormat::Ps);
    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.starts_with("%!PS\n<< /HalftoneType 3\n   /Width  68\n   /Height 17\n"));
    assert!(text.ends_with("   >\n>>\n"));
}
