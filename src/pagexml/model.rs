//! Owned types extracted from a PAGE XML document.

/// Page-level metadata declared by the `<Page>` element.
///
/// Width and height are kept signed so that non-positive declarations can be
/// represented and rejected by the rasterizer with a dimension error rather
/// than a parse error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMetadata {
    pub image_filename: String,
    pub image_height: i64,
    pub image_width: i64,
}

/// A single integer polygon vertex in image pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Vertex {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// The outline of one text line, in document order.
///
/// The vertex sequence is treated as a closed path: the last vertex connects
/// back to the first when stroking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<Vertex>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl<V: Into<Vertex>> FromIterator<V> for Polygon {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Everything the mask pipeline needs from one annotation file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageXml {
    pub metadata: PageMetadata,
    pub text_lines: Vec<Polygon>,
}
