use super::*;
use crate::foundation::core::{Point, Rgba8};

fn canvas32() -> Canvas {
    Canvas {
        width: 32,
        height: 32,
    }
}

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn disc_covers_its_center_and_not_the_corner() {
    let mut r = CpuRasterizer::new(canvas32(), RasterSettings::default()).unwrap();
    let scene = LayeredScene {
        drawing: vec![DrawOp::Disc {
            center: Point::new(16.0, 16.0),
            radius: 6.0,
            color: Rgba8::WHITE,
        }],
        ..LayeredScene::default()
    };
    let frame = r.rasterize(&scene, LayerToggles::default()).unwrap();

    assert_eq!(frame.width, 32);
    assert_eq!(frame.height, 32);
    assert_eq!(frame.data.len(), 32 * 32 * 4);
    assert!(frame.premultiplied);
    assert_eq!(pixel(&frame, 16, 16), [255, 255, 255, 255]);
    assert_eq!(pixel(&frame, 0, 0), [0, 0, 0, 255]);
}

#[test]
fn hidden_layers_are_not_painted() {
    let mut r = CpuRasterizer::new(canvas32(), RasterSettings::default()).unwrap();
    let scene = LayeredScene {
        epicycles: vec![DrawOp::Ring {
            center: Point::new(16.0, 16.0),
            radius: 10.0,
            width: 2.0,
            color: Rgba8::new(255, 0, 0, 255),
        }],
        ..LayeredScene::default()
    };

    let hidden = r.rasterize(&scene, LayerToggles::default()).unwrap();
    assert_eq!(pixel(&hidden, 26, 16), [0, 0, 0, 255]);

    let shown = r
        .rasterize(
            &scene,
            LayerToggles {
                show_dots: false,
                show_epicycles: true,
            },
        )
        .unwrap();
    assert!(pixel(&shown, 26, 16)[0] > 0);
    // The ring is hollow.
    assert_eq!(pixel(&shown, 16, 16), [0, 0, 0, 255]);
}

#[test]
fn degenerate_ops_are_skipped() {
    assert!(
        outline(
            &DrawOp::Line {
                from: Point::new(1.0, 1.0),
                to: Point::new(1.0, 1.0),
                width: 1.0,
                color: Rgba8::WHITE,
            },
            0.1
        )
        .is_none()
    );
    assert!(
        outline(
            &DrawOp::Disc {
                center: Point::ZERO,
                radius: 0.0,
                color: Rgba8::WHITE,
            },
            0.1
        )
        .is_none()
    );
    assert!(
        outline(
            &DrawOp::Ring {
                center: Point::ZERO,
                radius: 3.0,
                width: 1.0,
                color: Rgba8::WHITE,
            },
            0.1
        )
        .is_some()
    );
}

#[test]
fn transparent_clear_leaves_untouched_pixels_empty() {
    let settings = RasterSettings {
        clear_rgba: None,
        ..RasterSettings::default()
    };
    let mut r = CpuRasterizer::new(canvas32(), settings).unwrap();
    let frame = r
        .rasterize(&LayeredScene::default(), LayerToggles::default())
        .unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn oversized_canvas_is_rejected() {
    let canvas = Canvas {
        width: 70_000,
        height: 10,
    };
    let result = CpuRasterizer::new(canvas, RasterSettings::default());
    assert!(result.is_err());
}
