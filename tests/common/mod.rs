#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const PAGE_NAMESPACE: &str = "http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15";

/// Build a PAGE XML document with one text line per `points` value.
pub fn page_xml(image_name: &str, width: u32, height: u32, polygons: &[&str]) -> String {
    let mut xml = String::new();
    writeln!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>").expect("write to string");
    writeln!(xml, "<PcGts xmlns=\"{PAGE_NAMESPACE}\">").expect("write to string");
    writeln!(
        xml,
        "  <Page imageFilename=\"{image_name}\" imageWidth=\"{width}\" imageHeight=\"{height}\">"
    )
    .expect("write to string");
    writeln!(xml, "    <TextRegion id=\"r0\">").expect("write to string");
    for (idx, points) in polygons.iter().enumerate() {
        writeln!(xml, "      <TextLine id=\"l{idx}\">").expect("write to string");
        writeln!(xml, "        <Coords points=\"{points}\"/>").expect("write to string");
        writeln!(xml, "      </TextLine>").expect("write to string");
    }
    writeln!(xml, "    </TextRegion>").expect("write to string");
    writeln!(xml, "  </Page>").expect("write to string");
    writeln!(xml, "</PcGts>").expect("write to string");
    xml
}

/// Write `<stem>.xml` and an empty `<stem>.jpg` companion into `dir`.
pub fn write_page(dir: &Path, stem: &str, width: u32, height: u32, polygons: &[&str]) {
    fs::create_dir_all(dir).expect("create input dir");
    let image_name = format!("{stem}.jpg");
    fs::write(
        dir.join(format!("{stem}.xml")),
        page_xml(&image_name, width, height, polygons),
    )
    .expect("write page xml");
    fs::write(dir.join(image_name), b"").expect("write placeholder image");
}

pub fn read_mask(path: &Path) -> image::RgbImage {
    image::open(path).expect("decode mask").to_rgb8()
}

pub fn sorted_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
