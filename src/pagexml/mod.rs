//! PAGE XML annotation reader.
//!
//! Reads the subset of PAGE XML needed to draw text-line masks:
//! - the `<Page>` element's `imageFilename`, `imageWidth` and `imageHeight`
//! - every `<TextLine>` element's `<Coords points="x1,y1 x2,y2 ...">`
//!
//! Elements are matched by local name anywhere in the tree, so both the
//! namespaced PRImA schema and un-namespaced exports are accepted.

mod model;

pub use model::{PageMetadata, PageXml, Polygon, Vertex};

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::error::PageMaskError;

const PAGE_TAG: &str = "Page";
const TEXT_LINE_TAG: &str = "TextLine";
const COORDS_TAG: &str = "Coords";
const POINTS_ATTR: &str = "points";

/// Read a PAGE XML file and extract its metadata and text-line polygons.
pub fn read_page_xml(path: &Path) -> Result<PageXml, PageMaskError> {
    let xml = fs::read_to_string(path).map_err(PageMaskError::filesystem(path))?;
    parse_page_xml_str(&xml, path)
}

/// Parse PAGE XML from a string.
pub fn from_page_xml_str(xml: &str) -> Result<PageXml, PageMaskError> {
    parse_page_xml_str(xml, Path::new("<string>"))
}

/// Parse PAGE XML from bytes (must be valid UTF-8).
pub fn from_page_xml_slice(bytes: &[u8]) -> Result<PageXml, PageMaskError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| PageMaskError::XmlParse {
        path: PathBuf::from("<bytes>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_page_xml_str(xml, Path::new("<bytes>"))
}

/// Parse raw markup into a queryable document tree.
///
/// `path` is only used to label errors.
pub fn parse_document<'input>(
    xml: &'input str,
    path: &Path,
) -> Result<Document<'input>, PageMaskError> {
    Document::parse(xml).map_err(|source| PageMaskError::XmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })
}

/// Extract the page metadata.
///
/// When a document declares several `<Page>` elements, every one is read and
/// the last one wins. A document with no `<Page>` element is an error.
pub fn extract_metadata(
    document: &Document<'_>,
    path: &Path,
) -> Result<PageMetadata, PageMaskError> {
    let mut metadata = None;

    for page in elements_named(document, PAGE_TAG) {
        let image_filename = required_attr(page, "imageFilename", path)?.to_string();
        let image_height = parse_dimension_attr(page, "imageHeight", path)?;
        let image_width = parse_dimension_attr(page, "imageWidth", path)?;

        metadata = Some(PageMetadata {
            image_filename,
            image_height,
            image_width,
        });
    }

    metadata.ok_or_else(|| PageMaskError::MissingMetadata {
        path: path.to_path_buf(),
        message: format!("no <{PAGE_TAG}> element found"),
    })
}

/// Extract every text-line polygon in document order.
pub fn extract_polygons(
    document: &Document<'_>,
    path: &Path,
) -> Result<Vec<Polygon>, PageMaskError> {
    elements_named(document, TEXT_LINE_TAG)
        .enumerate()
        .map(|(idx, text_line)| {
            let context = match text_line.attribute("id") {
                Some(id) => format!("<{TEXT_LINE_TAG}> '{id}'"),
                None => format!("<{TEXT_LINE_TAG}> #{}", idx + 1),
            };

            // The line's own Coords precede any nested Word/Glyph Coords.
            let coords = text_line
                .descendants()
                .find(|node| node.is_element() && node.tag_name().name() == COORDS_TAG)
                .ok_or_else(|| PageMaskError::MalformedCoordinates {
                    path: path.to_path_buf(),
                    message: format!("missing <{COORDS_TAG}> in {context}"),
                })?;

            let points =
                coords
                    .attribute(POINTS_ATTR)
                    .ok_or_else(|| PageMaskError::MalformedCoordinates {
                        path: path.to_path_buf(),
                        message: format!("missing '{POINTS_ATTR}' attribute in {context}"),
                    })?;

            parse_points(points).map_err(|message| PageMaskError::MalformedCoordinates {
                path: path.to_path_buf(),
                message: format!("{message} in {context}"),
            })
        })
        .collect()
}

/// Parse a whitespace-separated `x,y` point list into a polygon.
///
/// Returns a bare message so callers can attach file and element context.
pub fn parse_points(points: &str) -> Result<Polygon, String> {
    let vertices = points
        .split_whitespace()
        .map(parse_point_token)
        .collect::<Result<Vec<_>, _>>()?;

    if vertices.is_empty() {
        return Err("empty point list".to_string());
    }

    Ok(Polygon::new(vertices))
}

fn parse_point_token(token: &str) -> Result<Vertex, String> {
    let mut parts = token.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => {
            let x = parse_coordinate(x, token)?;
            let y = parse_coordinate(y, token)?;
            Ok(Vertex::new(x, y))
        }
        _ => Err(format!(
            "invalid point '{token}'; expected exactly two comma-separated integers"
        )),
    }
}

fn parse_coordinate(raw: &str, token: &str) -> Result<i32, String> {
    raw.parse::<i32>()
        .map_err(|_| format!("invalid coordinate '{raw}' in point '{token}'; expected integer"))
}

fn parse_page_xml_str(xml: &str, path: &Path) -> Result<PageXml, PageMaskError> {
    let document = parse_document(xml, path)?;
    let metadata = extract_metadata(&document, path)?;
    let text_lines = extract_polygons(&document, path)?;

    Ok(PageXml {
        metadata,
        text_lines,
    })
}

fn elements_named<'a, 'input: 'a>(
    document: &'a Document<'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    document
        .descendants()
        .filter(move |node| node.is_element() && node.tag_name().name() == tag)
}

fn required_attr<'a>(
    node: Node<'a, '_>,
    name: &str,
    path: &Path,
) -> Result<&'a str, PageMaskError> {
    node.attribute(name)
        .ok_or_else(|| PageMaskError::MissingMetadata {
            path: path.to_path_buf(),
            message: format!("missing '{name}' attribute on <{PAGE_TAG}>"),
        })
}

fn parse_dimension_attr(node: Node<'_, '_>, name: &str, path: &Path) -> Result<i64, PageMaskError> {
    let raw = required_attr(node, name, path)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| PageMaskError::InvalidMetadata {
            path: path.to_path_buf(),
            message: format!("invalid '{name}' value '{raw}' on <{PAGE_TAG}>; expected integer"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PcGts xmlns="http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15">
  <Metadata><Creator>test</Creator></Metadata>
  <Page imageFilename="doc1.jpg" imageWidth="800" imageHeight="600">
    <TextRegion id="r1">
      <Coords points="0,0 800,0 800,600 0,600"/>
      <TextLine id="l1">
        <Coords points="10,10 100,10 50,100"/>
        <Baseline points="10,90 100,90"/>
        <Word id="w1"><Coords points="1,1 2,2 3,3"/></Word>
      </TextLine>
      <TextLine id="l2">
        <Coords points="200,200 300,200 300,250 200,250"/>
      </TextLine>
    </TextRegion>
  </Page>
</PcGts>"#;

    #[test]
    fn parses_metadata_and_lines_in_document_order() {
        let page = from_page_xml_str(SAMPLE).expect("parse sample");
        assert_eq!(
            page.metadata,
            PageMetadata {
                image_filename: "doc1.jpg".to_string(),
                image_height: 600,
                image_width: 800,
            }
        );
        assert_eq!(page.text_lines.len(), 2);
        assert_eq!(
            page.text_lines[0],
            Polygon::from_iter([(10, 10), (100, 10), (50, 100)])
        );
        assert_eq!(page.text_lines[1].len(), 4);
    }

    #[test]
    fn last_page_declaration_wins() {
        let xml = r#"<PcGts>
  <Page imageFilename="a.jpg" imageWidth="10" imageHeight="20"/>
  <Page imageFilename="b.jpg" imageWidth="30" imageHeight="40"/>
</PcGts>"#;
        let page = from_page_xml_str(xml).expect("parse");
        assert_eq!(page.metadata.image_filename, "b.jpg");
        assert_eq!(page.metadata.image_width, 30);
        assert_eq!(page.metadata.image_height, 40);
        assert!(page.text_lines.is_empty());
    }

    #[test]
    fn missing_page_is_missing_metadata() {
        let err = from_page_xml_str("<PcGts><TextLine/></PcGts>").unwrap_err();
        assert!(matches!(err, PageMaskError::MissingMetadata { .. }), "{err}");
    }

    #[test]
    fn missing_dimension_attribute_is_missing_metadata() {
        let err =
            from_page_xml_str(r#"<PcGts><Page imageFilename="a.jpg" imageWidth="10"/></PcGts>"#)
                .unwrap_err();
        assert!(matches!(err, PageMaskError::MissingMetadata { .. }), "{err}");
        assert!(err.to_string().contains("imageHeight"));
    }

    #[test]
    fn non_integer_dimension_is_invalid_metadata() {
        let err = from_page_xml_str(
            r#"<PcGts><Page imageFilename="a.jpg" imageWidth="wide" imageHeight="10"/></PcGts>"#,
        )
        .unwrap_err();
        assert!(matches!(err, PageMaskError::InvalidMetadata { .. }), "{err}");
    }

    #[test]
    fn malformed_markup_is_parse_error() {
        let err = from_page_xml_str("<PcGts><Page></PcGts>").unwrap_err();
        assert!(matches!(err, PageMaskError::XmlParse { .. }), "{err}");
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        let err = from_page_xml_slice(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, PageMaskError::XmlParse { .. }), "{err}");
    }

    #[test]
    fn text_line_without_coords_is_malformed() {
        let xml = r#"<PcGts>
  <Page imageFilename="a.jpg" imageWidth="10" imageHeight="10">
    <TextLine id="l7"><TextEquiv/></TextLine>
  </Page>
</PcGts>"#;
        let err = from_page_xml_str(xml).unwrap_err();
        assert!(matches!(err, PageMaskError::MalformedCoordinates { .. }));
        assert!(err.to_string().contains("'l7'"), "{err}");
    }

    #[test]
    fn coords_without_points_is_malformed() {
        let xml = r#"<PcGts>
  <Page imageFilename="a.jpg" imageWidth="10" imageHeight="10">
    <TextLine><Coords/></TextLine>
  </Page>
</PcGts>"#;
        let err = from_page_xml_str(xml).unwrap_err();
        assert!(matches!(err, PageMaskError::MalformedCoordinates { .. }));
        assert!(err.to_string().contains("#1"), "{err}");
    }

    #[test]
    fn parse_points_accepts_extra_whitespace() {
        let polygon = parse_points("  1,2\n\t3,4   5,-6 ").expect("parse points");
        assert_eq!(
            polygon.vertices(),
            &[Vertex::new(1, 2), Vertex::new(3, 4), Vertex::new(5, -6)]
        );
    }

    #[test]
    fn parse_points_rejects_bad_tokens() {
        assert!(parse_points("1,2 3").is_err());
        assert!(parse_points("1,2,3").is_err());
        assert!(parse_points("1.5,2").is_err());
        assert!(parse_points("a,b").is_err());
        assert!(parse_points("1,").is_err());
        assert!(parse_points("").is_err());
        assert!(parse_points("   ").is_err());
    }
}
