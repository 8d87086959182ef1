use std::fmt::Write as _;

/// A rectangle shape on a surface. Attribute values mirror the SVG `rect`
/// element: colors stay as their textual attribute values.
#[derive(Clone, Debug, PartialEq)]
pub struct RectShape {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
}

impl RectShape {
    /// The zero-size rect appended when a drag starts: no fill, black
    /// 2-unit stroke.
    pub fn drag_default(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: 0.0,
            height: 0.0,
            fill: "none".into(),
            stroke: "black".into(),
            stroke_width: 2.0,
        }
    }
}

/// Formats a numeric attribute the way it is written into markup and form
/// payloads: whole values without a fractional part.
pub fn number_attr(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// An in-memory vector document: a fixed-size canvas with a white
/// background and a list of rect children. This is the drawable surface a
/// drag session mutates.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceDocument {
    width: u32,
    height: u32,
    shapes: Vec<RectShape>,
}

impl SurfaceDocument {
    pub fn new_canvas(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn shapes(&self) -> &[RectShape] {
        &self.shapes
    }

    /// Appends a rect and returns its index, which stays valid for the
    /// lifetime of the document (shapes are never removed).
    pub fn append_rect(&mut self, shape: RectShape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn rect(&self, idx: usize) -> Option<&RectShape> {
        self.shapes.get(idx)
    }

    pub fn rect_mut(&mut self, idx: usize) -> Option<&mut RectShape> {
        self.shapes.get_mut(idx)
    }

    /// Serializes the document as a standalone SVG file, including the
    /// full-size white background rect.
    pub fn to_svg(&self) -> String {
        let mut out = String::from("<?xml version='1.0' encoding='utf-8'?>\n");
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}px\" height=\"{}px\">",
            self.width, self.height
        );
        out.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"white\" />");
        for shape in &self.shapes {
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" />",
                number_attr(shape.x),
                number_attr(shape.y),
                number_attr(shape.width),
                number_attr(shape.height),
                shape.fill,
                shape.stroke,
                number_attr(shape.stroke_width),
            );
        }
        out.push_str("</svg>");
        out
    }

    /// Parses the SVG subset this tool emits: an `svg` root with `px`
    /// dimensions and flat `rect` children. Percent-sized rects are the
    /// canvas background, not user shapes, and are skipped.
    pub fn parse_svg(text: &str) -> Result<Self, SvgParseError> {
        let mut doc = None;
        let mut rest = text;

        while let Some(tag_start) = rest.find('<') {
            let tag = &rest[tag_start + 1..];
            let Some(tag_end) = tag.find('>') else {
                return Err(SvgParseError::UnclosedTag);
            };
            let (content, remainder) = tag.split_at(tag_end);
            rest = &remainder[1..];

            if content.starts_with(['?', '!', '/']) {
                continue;
            }
            let name_end = content
                .find(|c: char| c.is_whitespace() || c == '/')
                .unwrap_or(content.len());
            let (name, attr_text) = content.split_at(name_end);
            let attributes = attribute_pairs(name, attr_text)?;

            match name {
                "svg" => {
                    doc = Some(Self::new_canvas(
                        dimension("width", &attributes)?,
                        dimension("height", &attributes)?,
                    ));
                }
                "rect" => {
                    let doc = doc.as_mut().ok_or(SvgParseError::MissingRoot)?;
                    if is_background(&attributes) {
                        continue;
                    }
                    doc.append_rect(RectShape {
                        x: number("x", &attributes)?,
                        y: number("y", &attributes)?,
                        width: number("width", &attributes)?,
                        height: number("height", &attributes)?,
                        fill: lookup(&attributes, "fill").unwrap_or("none").to_string(),
                        stroke: lookup(&attributes, "stroke").unwrap_or("black").to_string(),
                        stroke_width: number("stroke-width", &attributes)?,
                    });
                }
                _ => {}
            }
        }

        doc.ok_or(SvgParseError::MissingRoot)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SvgParseError {
    #[error("document has no svg root element")]
    MissingRoot,
    #[error("markup contains an unclosed tag")]
    UnclosedTag,
    #[error("malformed attribute list in <{0}>")]
    MalformedAttributes(String),
    #[error("invalid {attribute} value {value:?}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },
}

fn attribute_pairs<'a>(
    element: &str,
    mut rest: &'a str,
) -> Result<Vec<(&'a str, &'a str)>, SvgParseError> {
    let mut pairs = Vec::new();
    loop {
        rest = rest.trim_start().trim_start_matches('/');
        if rest.is_empty() {
            return Ok(pairs);
        }
        let malformed = || SvgParseError::MalformedAttributes(element.to_string());
        let eq = rest.find('=').ok_or_else(malformed)?;
        let name = rest[..eq].trim_end();
        rest = rest[eq + 1..].trim_start();
        let quote = rest
            .chars()
            .next()
            .filter(|c| matches!(c, '"' | '\''))
            .ok_or_else(malformed)?;
        rest = &rest[1..];
        let end = rest.find(quote).ok_or_else(malformed)?;
        pairs.push((name, &rest[..end]));
        rest = &rest[end + 1..];
    }
}

fn lookup<'a>(attributes: &[(&'a str, &'a str)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(attr, _)| *attr == name)
        .map(|(_, value)| *value)
}

fn is_background(attributes: &[(&str, &str)]) -> bool {
    ["width", "height"]
        .into_iter()
        .any(|name| lookup(attributes, name).is_some_and(|v| v.ends_with('%')))
}

fn number(attribute: &'static str, attributes: &[(&str, &str)]) -> Result<f32, SvgParseError> {
    let value = lookup(attributes, attribute).unwrap_or("0");
    value
        .parse()
        .map_err(|_| SvgParseError::InvalidAttribute {
            attribute,
            value: value.to_string(),
        })
}

fn dimension(attribute: &'static str, attributes: &[(&str, &str)]) -> Result<u32, SvgParseError> {
    let value = lookup(attributes, attribute).ok_or(SvgParseError::InvalidAttribute {
        attribute,
        value: String::new(),
    })?;
    let digits = value.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    digits
        .parse::<f32>()
        .map(|v| v as u32)
        .map_err(|_| SvgParseError::InvalidAttribute {
            attribute,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_canvas_with_background() {
        let mut doc = SurfaceDocument::new_canvas(800, 600);
        doc.append_rect(RectShape::drag_default(50.0, 40.0));
        let svg = doc.to_svg();
        assert!(svg.starts_with("<?xml version='1.0' encoding='utf-8'?>\n<svg "));
        assert!(svg.contains("width=\"800px\" height=\"600px\""));
        assert!(svg.contains("width=\"100%\" height=\"100%\" fill=\"white\""));
        assert!(svg.contains(
            "<rect x=\"50\" y=\"40\" width=\"0\" height=\"0\" \
             fill=\"none\" stroke=\"black\" stroke-width=\"2\" />"
        ));
    }

    #[test]
    fn parses_own_output() {
        let mut doc = SurfaceDocument::new_canvas(640, 480);
        doc.append_rect(RectShape {
            x: 50.0,
            y: 40.0,
            width: 70.5,
            height: 40.0,
            fill: "none".into(),
            stroke: "black".into(),
            stroke_width: 2.0,
        });
        assert_eq!(SurfaceDocument::parse_svg(&doc.to_svg()).unwrap(), doc);
    }

    #[test]
    fn background_rect_is_not_a_shape() {
        let doc = SurfaceDocument::parse_svg(
            "<svg width=\"800px\" height=\"600px\">\
             <rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"white\" /></svg>",
        )
        .unwrap();
        assert!(doc.shapes().is_empty());
        assert_eq!((doc.width(), doc.height()), (800, 600));
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(matches!(
            SurfaceDocument::parse_svg("<rect x=\"1\" y=\"1\" width=\"2\" height=\"2\" />"),
            Err(SvgParseError::MissingRoot)
        ));
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let err = SurfaceDocument::parse_svg(
            "<svg width=\"10px\" height=\"10px\"><rect x=\"nope\" /></svg>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SvgParseError::InvalidAttribute { attribute: "x", .. }
        ));
    }

    #[test]
    fn whole_numbers_have_no_fraction() {
        assert_eq!(number_attr(70.0), "70");
        assert_eq!(number_attr(70.5), "70.5");
        assert_eq!(number_attr(0.0), "0");
    }
}
