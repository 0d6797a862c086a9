//! STL decoding.
//!
//! Binary is recognised by exact length: `80 + 4 + 50 * count` bytes.
//! Anything else starting with `solid` is read as ASCII. Binary files whose
//! header happens to start with `solid` therefore still decode as binary.

use mesh_types::Mesh;
use tracing::{debug, instrument};

use crate::errors::StlError;
use crate::{HEADER_SIZE, TRIANGLE_SIZE};

/// Which STL flavour a buffer was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlEncoding {
    Binary,
    Ascii,
}

/// Parse ASCII or binary STL bytes into a mesh.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn parse_stl(bytes: &[u8]) -> Result<Mesh, StlError> {
    let (mesh, encoding) = parse_stl_with_encoding(bytes)?;
    debug!(?encoding, triangles = mesh.triangle_count(), "parsed STL");
    Ok(mesh)
}

/// Like [`parse_stl`], also reporting the detected encoding.
pub fn parse_stl_with_encoding(bytes: &[u8]) -> Result<(Mesh, StlEncoding), StlError> {
    if bytes.is_empty() {
        return Err(StlError::Empty);
    }

    if let Some(declared) = declared_count(bytes) {
        let expected = binary_len(declared);
        if expected == bytes.len() as u64 {
            return Ok((parse_binary(bytes, declared)?, StlEncoding::Binary));
        }
        if !looks_ascii(bytes) {
            return Err(StlError::LengthMismatch {
                declared,
                expected,
                got: bytes.len(),
            });
        }
    } else if !looks_ascii(bytes) {
        return Err(StlError::Truncated {
            expected: HEADER_SIZE + 4,
            got: bytes.len(),
        });
    }

    Ok((parse_ascii(bytes)?, StlEncoding::Ascii))
}

fn declared_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn binary_len(count: u32) -> u64 {
    (HEADER_SIZE + 4) as u64 + TRIANGLE_SIZE as u64 * count as u64
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"solid")
}

// ── Binary ──────────────────────────────────────────────────────────────────

fn parse_binary(bytes: &[u8], count: u32) -> Result<Mesh, StlError> {
    if count == 0 {
        return Err(StlError::NoTriangles);
    }
    let body = &bytes[HEADER_SIZE + 4..];
    let mut vertices = Vec::with_capacity(count as usize * 9);
    for record in body.chunks_exact(TRIANGLE_SIZE) {
        // Bytes 0..12 hold the stored normal, which is not trusted.
        for raw in record[12..48].chunks_exact(4) {
            vertices.push(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]));
        }
    }
    Ok(Mesh::from_vertices(vertices)?)
}

// ── ASCII ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AsciiState {
    BeforeSolid,
    InSolid,
    InFacet,
    InLoop,
    LoopClosed,
    Done,
}

fn parse_ascii(bytes: &[u8]) -> Result<Mesh, StlError> {
    let text = std::str::from_utf8(bytes).map_err(|e| StlError::InvalidText {
        reason: e.to_string(),
    })?;

    let mut state = AsciiState::BeforeSolid;
    let mut vertices: Vec<f32> = Vec::new();
    let mut in_loop = 0usize;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        let mut tokens = raw_line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let malformed = |reason: String| StlError::MalformedFacet { line, reason };

        state = match (state, keyword) {
            (AsciiState::BeforeSolid, "solid") => AsciiState::InSolid,
            (AsciiState::InSolid, "facet") => {
                if tokens.next() != Some("normal") {
                    return Err(malformed("expected 'facet normal'".to_string()));
                }
                AsciiState::InFacet
            }
            (AsciiState::InSolid, "endsolid") => AsciiState::Done,
            (AsciiState::InFacet, "outer") => {
                if tokens.next() != Some("loop") {
                    return Err(malformed("expected 'outer loop'".to_string()));
                }
                in_loop = 0;
                AsciiState::InLoop
            }
            (AsciiState::InLoop, "vertex") => {
                if in_loop == 3 {
                    return Err(malformed("more than 3 vertices in loop".to_string()));
                }
                vertices.extend_from_slice(&parse_vertex(line, tokens)?);
                in_loop += 1;
                AsciiState::InLoop
            }
            (AsciiState::InLoop, "endloop") => {
                if in_loop != 3 {
                    return Err(malformed(format!(
                        "loop has {in_loop} vertices, expected 3"
                    )));
                }
                AsciiState::LoopClosed
            }
            (AsciiState::LoopClosed, "endfacet") => AsciiState::InSolid,
            (AsciiState::Done, _) => break,
            (state, keyword) => {
                return Err(malformed(format!(
                    "unexpected '{keyword}' while {}",
                    describe(state)
                )));
            }
        };
    }

    match state {
        AsciiState::InSolid | AsciiState::Done => {}
        other => {
            return Err(StlError::MalformedFacet {
                line: text.lines().count(),
                reason: format!("unexpected end of data while {}", describe(other)),
            });
        }
    }

    if vertices.is_empty() {
        return Err(StlError::NoTriangles);
    }
    Ok(Mesh::from_vertices(vertices)?)
}

fn parse_vertex<'a>(
    line: usize,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<[f32; 3], StlError> {
    let mut out = [0.0f32; 3];
    for slot in out.iter_mut() {
        let token = tokens.next().ok_or_else(|| StlError::InvalidVertex {
            line,
            reason: "expected 3 coordinates".to_string(),
        })?;
        *slot = token.parse().map_err(|_| StlError::InvalidVertex {
            line,
            reason: format!("'{token}' is not a number"),
        })?;
    }
    if let Some(extra) = tokens.next() {
        return Err(StlError::InvalidVertex {
            line,
            reason: format!("unexpected trailing token '{extra}'"),
        });
    }
    Ok(out)
}

fn describe(state: AsciiState) -> &'static str {
    match state {
        AsciiState::BeforeSolid => "looking for 'solid'",
        AsciiState::InSolid => "between facets",
        AsciiState::InFacet => "inside a facet",
        AsciiState::InLoop => "inside a vertex loop",
        AsciiState::LoopClosed => "expecting 'endfacet'",
        AsciiState::Done => "after 'endsolid'",
    }
}
