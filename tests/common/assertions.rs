//! Assertion helpers for tests.

use ordered_screen::{GeneratedScreen, MAXVAL};
use pretty_assertions::assert_eq;

/// Assert the threshold grid has one value per pixel, all in range
pub fn assert_valid_thresholds(screen: &GeneratedScreen) {
    let values = screen
        .mask
        .thresholds()
        .expect("Expected threshold grid data");
    assert_eq!(values.len(), screen.mask.width() * screen.mask.height());
    assert!(values.iter().all(|&v| i32::from(v) <= MAXVAL));
}

/// Assert the turn-on sequence visits every pixel exactly once
pub fn assert_valid_sequence(screen: &GeneratedScreen) {
    let sequence = screen
        .mask
        .sequence()
        .expect("Expected turn-on sequence data");
    let (width, height) = (screen.mask.width(), screen.mask.height());
    assert_eq!(sequence.len(), width * height);

    let mut seen = vec![false; width * height];
    for &(x, y) in sequence {
        let index = y as usize * width + x as usize;
        assert!(!seen[index], "pixel ({x}, {y}) listed twice");
        seen[index] = true;
    }
}

/// Assert the bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
