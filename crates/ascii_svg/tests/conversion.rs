//! End-to-end conversion scenarios through the public renderer.

use ascii_svg::{
    AnimationOptions, AsciiSvgRenderer, GridConfig, MarkupStyle, PixelBuffer, Ramp, RenderOutput,
};
use image::{DynamicImage, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn renderer(config: GridConfig) -> AsciiSvgRenderer {
    AsciiSvgRenderer::new(config, MarkupStyle::default(), Ramp::detailed()).unwrap()
}

fn positions(output: &RenderOutput) -> Vec<(u32, u32)> {
    output.grid.glyphs.iter().map(|glyph| (glyph.x, glyph.y)).collect()
}

/// White border band around a black rectangle covering cells (2..6, 2..4) of a 6x9 grid.
fn framed_shape() -> PixelBuffer {
    PixelBuffer::from_fn(48, 54, |x, y| {
        if (12..36).contains(&x) && (18..36).contains(&y) {
            BLACK
        } else {
            WHITE
        }
    })
}

#[test]
fn dark_corner_cell_is_the_only_glyph() {
    let buffer =
        PixelBuffer::from_fn(12, 18, |x, y| if x < 6 && y < 9 { BLACK } else { WHITE });
    let output = renderer(GridConfig::default()).render(&buffer).unwrap();

    assert_eq!((output.grid.columns, output.grid.rows), (2, 2));
    assert_eq!(output.grid.glyphs.len(), 1);

    let glyph = output.grid.glyphs[0];
    assert_eq!((glyph.column, glyph.row), (0, 0));
    let ramp = Ramp::detailed();
    assert!(ramp.position(glyph.ch).unwrap() < ramp.len() / 4, "{} is not dense", glyph.ch);
}

#[test]
fn flat_images_produce_no_glyphs() {
    for rgba in [BLACK, WHITE, [90, 140, 30, 255], [0, 0, 0, 0]] {
        let buffer = PixelBuffer::filled(60, 45, rgba);
        let output = renderer(GridConfig::default()).render(&buffer).unwrap();
        assert!(output.grid.glyphs.is_empty(), "{rgba:?} produced glyphs");
        assert_eq!((output.grid.columns, output.grid.rows), (10, 5));
    }
}

#[test]
fn background_removal_matches_brightness_cutoff() {
    let buffer = framed_shape();

    let plain = renderer(GridConfig::default()).render(&buffer).unwrap();
    let removed = renderer(GridConfig { remove_background: true, ..GridConfig::default() })
        .render(&buffer)
        .unwrap();

    assert!(!plain.grid.glyphs.is_empty());
    assert_eq!(positions(&plain), positions(&removed));
    assert_eq!(plain.grid.glyphs.len(), 8);
}

#[test]
fn svg_output_has_expected_frame() {
    let buffer =
        PixelBuffer::from_fn(12, 18, |x, y| if x < 6 && y < 9 { BLACK } else { WHITE });
    let svg = renderer(GridConfig::default()).render_svg(&buffer).unwrap();

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"12\" height=\"18\""));
    assert!(svg.contains("viewBox=\"0 0 12 18\""));
    assert!(svg.contains("<text x=\"0\" y=\"9\">@</text>"));
    assert_eq!(svg.matches("<text ").count(), 1);
}

#[test]
fn decoded_images_go_through_the_adapter() {
    let image = RgbaImage::from_fn(12, 18, |x, y| Rgba(if x >= 6 && y >= 9 { BLACK } else { WHITE }));
    let output = renderer(GridConfig::default()).render(&DynamicImage::ImageRgba8(image)).unwrap();
    assert_eq!(positions(&output), vec![(6, 18)]);
}

#[test]
fn invalid_configuration_is_reported() {
    let config = GridConfig { cell_width: 0, ..GridConfig::default() };
    let err = AsciiSvgRenderer::new(config, MarkupStyle::default(), Ramp::detailed()).unwrap_err();
    assert!(err.to_string().contains("cell dimensions"));

    let style = MarkupStyle { font_size: 0.0, ..MarkupStyle::default() };
    assert!(AsciiSvgRenderer::new(GridConfig::default(), style, Ramp::detailed()).is_err());
}

#[test]
fn animation_keeps_every_position() {
    let renderer = renderer(GridConfig::default());
    let output = renderer.render(&framed_shape()).unwrap();
    let options = AnimationOptions {
        color: Some("#00ff00".into()),
        ..AnimationOptions::default()
    };

    let animation = renderer.animate(&output, &options, &mut StdRng::seed_from_u64(9)).unwrap();

    assert_eq!(animation.series.len(), 8);
    assert_eq!(animation.style.color, "#00ff00");
    assert_eq!(animation.series.frame(0), Some(&output.grid));
    for frame in animation.series.frames() {
        let frame_positions: Vec<_> =
            frame.grid.glyphs.iter().map(|glyph| (glyph.x, glyph.y)).collect();
        assert_eq!(frame_positions, positions(&output));
    }

    let documents = animation.frame_documents();
    assert_eq!(documents.len(), 8);
    assert!(documents.iter().all(|doc| doc.contains("fill:#00ff00")));
    assert_eq!(animation.to_animated_svg().matches("<g class=\"frame\"").count(), 8);
}
