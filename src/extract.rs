//! Region extraction from the two layout XML dialects.
//!
//! ALTO carries block polygons as a flat `POINTS="x y x y ..."` attribute,
//! PAGE carries line polygons as `points="x,y x,y ..."`. Both declare a
//! namespace on the root element but the concrete URI varies between
//! producers, so the namespace is taken from the root tag instead of being
//! hard-coded.
//!
//! Elements without coordinate data contribute nothing and are skipped, as
//! are rings with fewer than 3 points. Only unreadable files, malformed XML
//! and unparseable coordinate tokens are errors.

use std::fs;
use std::path::Path;

use geo::{Coord, Polygon};
use roxmltree::{Document, Node};
use tracing::instrument;

use crate::error::{Error, Result};
use crate::geometry::{self, polygon_from_points};

/// Block-granularity regions from an ALTO document: one polygon per
/// `TextBlock` with a `Shape/Polygon` outline.
#[instrument(level = "debug")]
pub fn parse_alto_blocks(path: &Path) -> Result<Vec<Polygon<f64>>> {
    let text = read(path)?;
    let doc = parse(path, &text)?;
    let root = doc.root_element();
    let ns = root.tag_name().namespace();

    let mut blocks = Vec::new();
    for block in root
        .descendants()
        .filter(|node| is_element(node, ns, "TextBlock"))
    {
        let Some(outline) = block
            .descendants()
            .find(|node| is_element(node, ns, "Polygon"))
        else {
            continue;
        };
        let points = parse_flat_points(outline.attribute("POINTS").unwrap_or(""))?;
        if let Ok(polygon) = polygon_from_points(&points) {
            blocks.push(polygon);
        }
    }
    log::debug!("{}: {} text blocks", path.display(), blocks.len());
    Ok(blocks)
}

/// Line-granularity regions from a PAGE document: one polygon per `TextLine`
/// with a `Coords` child.
#[instrument(level = "debug")]
pub fn parse_page_lines(path: &Path) -> Result<Vec<Polygon<f64>>> {
    let text = read(path)?;
    let doc = parse(path, &text)?;
    let root = doc.root_element();
    let ns = root.tag_name().namespace();

    let mut lines = Vec::new();
    for line in root
        .descendants()
        .filter(|node| is_element(node, ns, "TextLine"))
    {
        let Some(coords) = line
            .children()
            .find(|node| is_element(node, ns, "Coords"))
        else {
            continue;
        };
        let points = parse_pair_points(coords.attribute("points").unwrap_or(""))?;
        if let Ok(polygon) = polygon_from_points(&points) {
            lines.push(polygon);
        }
    }
    log::debug!("{}: {} text lines", path.display(), lines.len());
    Ok(lines)
}

/// Block-granularity regions from a PAGE document. PAGE only outlines lines,
/// so blocks are reconstructed by repairing every line polygon and merging
/// the whole document geometrically. Merging ignores the region elements the
/// lines sit in; spatially adjacent logical blocks therefore coalesce.
#[instrument(level = "debug")]
pub fn parse_page_blocks(path: &Path) -> Result<Vec<Polygon<f64>>> {
    let lines = parse_page_lines(path)?;
    let repaired: Vec<_> = lines.iter().flat_map(geometry::repair).collect();
    Ok(geometry::merge(&repaired))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<'a>(path: &Path, text: &'a str) -> Result<Document<'a>> {
    Document::parse(text).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn is_element(node: &Node, ns: Option<&str>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == ns
}

fn parse_float(token: &str) -> Result<f64> {
    token
        .parse()
        .map_err(|_| Error::MalformedCoordinates {
            token: token.to_string(),
        })
}

/// `x y x y ...` — alternating coordinates, whitespace separated.
fn parse_flat_points(raw: &str) -> Result<Vec<Coord<f64>>> {
    let values = raw
        .split_whitespace()
        .map(parse_float)
        .collect::<Result<Vec<_>>>()?;
    if values.len() % 2 != 0 {
        return Err(Error::MalformedCoordinates {
            token: raw.split_whitespace().last().unwrap_or("").to_string(),
        });
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| Coord {
            x: pair[0],
            y: pair[1],
        })
        .collect())
}

/// `x,y x,y ...` — one comma-joined pair per token.
fn parse_pair_points(raw: &str) -> Result<Vec<Coord<f64>>> {
    raw.split_whitespace()
        .map(|token| {
            let (x, y) = token.split_once(',').ok_or_else(|| Error::MalformedCoordinates {
                token: token.to_string(),
            })?;
            Ok(Coord {
                x: parse_float(x)?,
                y: parse_float(y)?,
            })
        })
        .collect()
}
