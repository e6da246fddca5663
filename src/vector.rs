//! SVG document synthesis for the vector artifact.
//!
//! The vector artifact is rebuilt from the text and colors rather than traced
//! from pixels. Renderers may pick different font metrics than the raster
//! backend did, so the two outputs can differ slightly.

use crate::surface::{CANVAS_SIZE, FONT_FAMILY, FONT_SIZE, SizePx};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Builds the favicon SVG document.
///
/// The document has one background `rect` covering the viewbox and one
/// centered `text` element. Both colors are copied verbatim into the `fill`
/// declarations, escaped only as far as XML requires.
///
/// # Example
///
/// ```
/// use favicon_renderer::build_svg;
///
/// let svg = build_svg("F", "#4F46E5", "#FFFFFF");
/// assert!(svg.contains("fill: #4F46E5"));
/// assert!(svg.contains(">F</text>"));
/// ```
pub fn build_svg(text: &str, background_color: &str, foreground_color: &str) -> String {
    let size = CANVAS_SIZE;
    let background = escape_xml(background_color);
    let foreground = escape_xml(foreground_color);

    format!(
        concat!(
            r#"<svg xmlns="{ns}" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
            r#"<rect x="0" y="0" width="{size}" height="{size}" style="fill: {background}"/>"#,
            "{text}",
            "</svg>"
        ),
        ns = SVG_NAMESPACE,
        size = size,
        background = background,
        text = text_element(text, &format!(r#"style="fill: {foreground}""#)),
    )
}

/// Builds a standalone SVG document holding only the glyph, with no
/// background.
pub(crate) fn build_glyph_svg(text: &str, fill_hex: &str, fill_opacity: f32) -> String {
    let size = CANVAS_SIZE;
    let paint = format!(r#"fill="{fill_hex}" fill-opacity="{fill_opacity}""#);

    format!(
        r#"<svg xmlns="{SVG_NAMESPACE}" width="{size}" height="{size}" viewBox="0 0 {size} {size}">{}</svg>"#,
        text_element(text, &paint)
    )
}

/// Renders the centered `text` element shared by both documents.
fn text_element(text: &str, paint: &str) -> String {
    let (cx, cy) = SizePx::canvas().center();

    format!(
        concat!(
            r#"<text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="middle" "#,
            r#"font-family="{family}" font-weight="bold" font-size="{font_size}" {paint}>"#,
            "{content}</text>"
        ),
        cx = cx,
        cy = cy,
        family = FONT_FAMILY,
        font_size = FONT_SIZE,
        paint = paint,
        content = escape_xml(text),
    )
}

/// Escapes markup characters and drops characters XML 1.0 cannot carry.
pub(crate) fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::usvg::{Options, Tree};

    #[test]
    fn document_has_one_rect_and_one_text() {
        let svg = build_svg("F", "#4F46E5", "#FFFFFF");

        assert_eq!(svg.matches("<rect").count(), 1);
        assert_eq!(svg.matches("<text").count(), 1);
        assert!(svg.contains(r#"viewBox="0 0 32 32""#));
        assert!(svg.contains(r#"font-size="20""#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(r#"x="16" y="16""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn colors_appear_verbatim() {
        let svg = build_svg("F", "#4F46E5", "#FFFFFF");

        assert!(svg.contains("fill: #4F46E5"));
        assert!(svg.contains("fill: #FFFFFF"));
    }

    #[test]
    fn document_is_well_formed() {
        let svg = build_svg("<&", "rgb(1, 2, 3)", "hotpink");
        assert!(Tree::from_str(&svg, &Options::default()).is_ok());
        assert!(svg.contains("&lt;&amp;</text>"));
    }

    #[test]
    fn empty_text_produces_empty_text_element() {
        let svg = build_svg("", "#000", "#fff");
        assert!(svg.contains("></text>"));
        assert!(Tree::from_str(&svg, &Options::default()).is_ok());
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(escape_xml("A\u{0}\u{7}B"), "AB");
        assert_eq!(escape_xml("\"'"), "&quot;&apos;");
    }

    #[test]
    fn glyph_document_has_no_background() {
        let svg = build_glyph_svg("F", "#ffffff", 1.0);
        assert!(!svg.contains("<rect"));
        assert!(svg.contains(r##"fill="#ffffff" fill-opacity="1""##));
    }
}
