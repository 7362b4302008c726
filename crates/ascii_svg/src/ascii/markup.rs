use std::borrow::Cow;
use std::fmt::Write;

use super::grid::GlyphGrid;
use super::series::FrameSeries;
use crate::config::MarkupStyle;

pub const FONT_FAMILY: &str = "monospace";

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Replace the five XML-reserved characters with their named entities.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(&['&', '<', '>', '"', '\''][..]) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Serialize one grid as a standalone SVG document.
pub fn render_svg(grid: &GlyphGrid, style: &MarkupStyle) -> String {
    let mut out = String::new();
    open_document(&mut out, grid.canvas_width(), grid.canvas_height());
    let _ = writeln!(out, "<style>{}</style>", text_rule(style));
    write_glyphs(&mut out, grid);
    out.push_str("</svg>\n");
    out
}

/// Serialize every frame into one SVG that cycles through them with CSS animations.
///
/// Every `<g>` runs a loop-long animation of its own. It is visible for its frame's share of
/// the loop and starts after the frames before it; zero-length frames are never shown.
pub fn render_animated_svg(series: &FrameSeries, style: &MarkupStyle) -> String {
    let Some((width, height)) = series.canvas() else {
        let mut out = String::new();
        open_document(&mut out, 0, 0);
        out.push_str("</svg>\n");
        return out;
    };

    if series.len() == 1 {
        return series.frame(0).map(|grid| render_svg(grid, style)).unwrap_or_default();
    }

    let total_ms = series.total_duration().as_millis().max(1);

    let mut out = String::new();
    open_document(&mut out, width, height);
    let _ = write!(
        out,
        "<style>{}g.frame{{visibility:hidden;animation:{total_ms}ms steps(1,end) infinite}}",
        text_rule(style)
    );
    for (index, frame) in series.frames().iter().enumerate() {
        let visible_pct = frame.duration.as_millis() as f64 / total_ms as f64 * 100.0;
        let _ = write!(
            out,
            "@keyframes f{index}{{0%{{visibility:{}}}{visible_pct:.3}%{{visibility:hidden}}\
             100%{{visibility:hidden}}}}",
            if frame.duration.is_zero() { "hidden" } else { "visible" }
        );
    }
    out.push_str("</style>\n");

    for (index, (start, frame)) in series.schedule().enumerate() {
        let _ = writeln!(
            out,
            "<g class=\"frame\" style=\"animation-name:f{index};animation-delay:{}ms\">",
            start.as_millis()
        );
        write_glyphs(&mut out, &frame.grid);
        out.push_str("</g>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn open_document(out: &mut String, width: u32, height: u32) {
    let _ = writeln!(
        out,
        "<svg xmlns=\"{SVG_NAMESPACE}\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 \
         {width} {height}\">"
    );
}

fn text_rule(style: &MarkupStyle) -> String {
    format!(
        "text{{font-family:{FONT_FAMILY};font-size:{}px;fill:{};white-space:pre}}",
        style.font_size,
        escape_xml(&style.color)
    )
}

fn write_glyphs(out: &mut String, grid: &GlyphGrid) {
    let mut buf = [0u8; 4];
    for glyph in &grid.glyphs {
        let text = escape_xml(glyph.ch.encode_utf8(&mut buf));
        let _ = writeln!(out, "<text x=\"{}\" y=\"{}\">{}</text>", glyph.x, glyph.y, text);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ascii::grid::Glyph;
    use crate::ascii::series::GlyphFrame;

    fn grid(chars: &str) -> GlyphGrid {
        let glyphs = chars
            .chars()
            .enumerate()
            .map(|(i, ch)| Glyph {
                ch,
                x: i as u32 * 6,
                y: 9,
                column: i as u32,
                row: 0,
                luminance: 0.0,
            })
            .collect();
        GlyphGrid::new(chars.chars().count() as u32, 1, 6, 9, glyphs)
    }

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(escape_xml("a&b"), "a&amp;b");
        assert_eq!(escape_xml("<>\"'"), "&lt;&gt;&quot;&apos;");
        assert!(matches!(escape_xml("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn document_layout() {
        let svg = render_svg(&grid("@#"), &MarkupStyle::default());
        let expected = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"12\" height=\"9\" \
                        viewBox=\"0 0 12 9\">\n\
                        <style>text{font-family:monospace;font-size:8px;fill:#d4d4d4;\
                        white-space:pre}</style>\n\
                        <text x=\"0\" y=\"9\">@</text>\n\
                        <text x=\"6\" y=\"9\">#</text>\n\
                        </svg>\n";
        assert_eq!(svg, expected);
    }

    #[test]
    fn glyph_text_is_escaped() {
        let svg = render_svg(&grid("&<>\"'"), &MarkupStyle::default());
        for entity in ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"] {
            assert!(svg.contains(&format!(">{entity}</text>")), "missing {entity}");
        }
        assert!(!svg.contains(">&</text>"));
        assert!(!svg.contains("><</text>"));
    }

    #[test]
    fn style_values_are_applied() {
        let style = MarkupStyle { font_size: 10.5, color: "tomato".into() };
        let svg = render_svg(&grid("@"), &style);
        assert!(svg.contains("font-size:10.5px;fill:tomato;"));
    }

    #[test]
    fn animated_document_has_one_group_per_frame() {
        let mut series = FrameSeries::new();
        for chars in ["@#", "#@", "%%"] {
            series.push_frame(GlyphFrame { grid: grid(chars), duration: Duration::from_millis(100) });
        }

        let svg = render_animated_svg(&series, &MarkupStyle::default());
        assert_eq!(svg.matches("<g class=\"frame\"").count(), 3);
        assert!(svg.contains("animation:300ms steps(1,end) infinite"));
        assert!(svg.contains("animation-name:f2;animation-delay:200ms"));
        assert!(svg.contains("@keyframes f1{0%{visibility:visible}33.333%{visibility:hidden}"));
        assert_eq!(svg.matches("<text ").count(), 6);
    }

    #[test]
    fn frame_timing_follows_durations() {
        let mut series = FrameSeries::new();
        series.push_frame(GlyphFrame { grid: grid("@"), duration: Duration::from_millis(100) });
        series.push_frame(GlyphFrame { grid: grid("#"), duration: Duration::from_millis(300) });

        let svg = render_animated_svg(&series, &MarkupStyle::default());
        assert!(svg.contains("animation:400ms steps(1,end) infinite"));
        assert!(svg.contains("@keyframes f0{0%{visibility:visible}25.000%{visibility:hidden}"));
        assert!(svg.contains("@keyframes f1{0%{visibility:visible}75.000%{visibility:hidden}"));
        assert!(svg.contains("animation-name:f0;animation-delay:0ms"));
        assert!(svg.contains("animation-name:f1;animation-delay:100ms"));
    }

    #[test]
    fn zero_length_frames_stay_hidden() {
        let mut series = FrameSeries::new();
        series.push_frame(GlyphFrame { grid: grid("@"), duration: Duration::ZERO });
        series.push_frame(GlyphFrame { grid: grid("#"), duration: Duration::from_millis(50) });

        let svg = render_animated_svg(&series, &MarkupStyle::default());
        assert!(svg.contains("@keyframes f0{0%{visibility:hidden}0.000%{visibility:hidden}"));
        assert!(svg.contains("animation-name:f1;animation-delay:0ms"));
    }

    #[test]
    fn single_frame_animation_is_static() {
        let mut series = FrameSeries::new();
        series.push_frame(GlyphFrame { grid: grid("@"), duration: Duration::from_millis(100) });
        let svg = render_animated_svg(&series, &MarkupStyle::default());
        assert_eq!(svg, render_svg(&grid("@"), &MarkupStyle::default()));
    }
}
