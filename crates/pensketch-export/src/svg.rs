//! SVG export serializer.
//!
//! Converts the strokes of a surface into a standalone SVG document
//! using the [`svg`] crate for document construction and XML escaping.
//!
//! Each stroke becomes one `<path>` element. Its `d` attribute is the
//! stroke's stored path data, copied verbatim, and every style attribute
//! of the stroke is copied onto the element. Paths appear in z-order.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::{Description, Element, Path, Title};
use svg::node::{Node, Text};

use pensketch_core::{BoundingBox, Stroke};

/// Size of the SVG coordinate space (`viewBox="0 0 width height"`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    /// Width in surface units.
    pub width: f64,
    /// Height in surface units.
    pub height: f64,
}

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped by the `svg`
/// crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized session configuration, emitted inside `<metadata>`
    /// wrapped in a namespaced `<pensketch:session>` element so exported
    /// files record the settings they were drawn with.
    pub config_json: Option<&'a str>,
}

/// Smallest coordinate space anchored at the origin that covers every
/// stroke.
///
/// Strokes with no points are ignored. An empty iterator yields a zero
/// sized space.
///
/// # Examples
///
/// ```
/// use pensketch_core::{Canvas, PathData, Surface, StrokeStyle};
/// use pensketch_export::{Dimensions, canvas_dimensions};
///
/// let mut canvas = Canvas::new();
/// let id = canvas.add_path(&StrokeStyle::default());
/// canvas.set_path_data(id, PathData::new("M2 3 L40 25")).unwrap();
/// assert_eq!(
///     canvas_dimensions(canvas.strokes()),
///     Dimensions { width: 40.0, height: 25.0 },
/// );
/// ```
#[must_use]
pub fn canvas_dimensions<'a>(strokes: impl IntoIterator<Item = &'a Stroke>) -> Dimensions {
    let extent = strokes
        .into_iter()
        .filter_map(|stroke| BoundingBox::from_points(stroke.points().points()))
        .reduce(|a, b| a.union(&b));
    extent.map_or(
        Dimensions {
            width: 0.0,
            height: 0.0,
        },
        |bbox| Dimensions {
            width: bbox.max_x().max(0.0),
            height: bbox.max_y().max(0.0),
        },
    )
}

/// Serialize strokes into an SVG document string.
///
/// Strokes whose path data is empty are skipped.
///
/// # Examples
///
/// ```
/// use pensketch_core::{Canvas, PathData, Surface, StrokeStyle};
/// use pensketch_export::{Dimensions, SvgMetadata, to_svg};
///
/// let mut canvas = Canvas::new();
/// let id = canvas.add_path(&StrokeStyle::default());
/// canvas.set_path_data(id, PathData::new("M10 15 L12.5 18.3")).unwrap();
///
/// let dims = Dimensions { width: 800.0, height: 600.0 };
/// let metadata = SvgMetadata {
///     title: Some("sketch"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(canvas.strokes(), dims, &metadata);
/// assert!(svg.contains("<title>sketch</title>"));
/// assert!(svg.contains("d=\"M10 15 L12.5 18.3\""));
/// assert!(svg.contains("stroke=\"red\""));
/// ```
#[must_use]
pub fn to_svg<'a>(
    strokes: impl IntoIterator<Item = &'a Stroke>,
    dimensions: Dimensions,
    metadata: &SvgMetadata<'_>,
) -> String {
    let Dimensions { width, height } = dimensions;
    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", format!("0 0 {width} {height}"));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut session_el = Element::new("pensketch:session");
        session_el.assign("xmlns:pensketch", "https://pensketch.dev/ns/1");
        session_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(session_el);
        doc = doc.add(metadata_el);
    }

    for stroke in strokes {
        if stroke.data().is_empty() {
            continue;
        }
        let mut path = Path::new()
            .set("id", format!("stroke-{}", stroke.id()))
            .set("d", stroke.data().as_str());
        for (name, value) in stroke.style().iter() {
            path = path.set(name, value);
        }
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
