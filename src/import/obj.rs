//! OBJ-family polygon mesh parser.
//!
//! Line-oriented, single-space-separated tokens. Supported entries:
//!
//! - `v x y z [r g b]` — position, optionally with a per-vertex color
//!   (otherwise the caller-supplied fallback color is used)
//! - `vn x y z` — normal
//! - `vt u v` — texture coordinate
//! - `f a/t/n a/t/n a/t/n` — one *triangular* face, 1-based indices
//! - `mtllib name` — companion material file reference
//!
//! Anything else is ignored. Output is one interleaved record per face
//! corner in face-traversal order; shared vertices are re-emitted per
//! incident face, never deduplicated.
//!
//! Normal resolution is deliberately last-write-wins: a pre-pass records,
//! per position index, every normal index it was paired with, and the
//! final entry of that list becomes the effective normal for *every*
//! corner sharing the position. This matches the format's established
//! consumers; conflicts are reported as [`ImportIssue::NormalConflict`]
//! rather than averaged away.

use std::collections::HashMap;

use cgmath::{Vector2, Vector3};
use log::warn;

use crate::gfx::mesh::MeshGeometry;
use crate::gfx::vertex::Vertex;
use crate::import::ImportIssue;

/// Parsed OBJ content plus everything the caller must know about it.
#[derive(Debug, Clone, Default)]
pub struct ObjImport {
    pub geometry: MeshGeometry,
    /// Material file referenced by the last `mtllib` line, if any.
    pub mtllib: Option<String>,
    /// Non-fatal problems, in discovery order.
    pub issues: Vec<ImportIssue>,
}

#[derive(Debug, Clone, Copy)]
struct CornerRef {
    position: usize,
    texcoord: usize,
    normal: usize,
}

#[derive(Debug, Clone, Copy)]
struct FaceRef {
    corners: [CornerRef; 3],
    line: usize,
}

/// Parses OBJ text into render-ready buffers.
///
/// `fallback_color` fills the color slot of every vertex whose `v` line
/// carries no color of its own.
pub fn parse_obj(text: &str, fallback_color: [f32; 3]) -> ObjImport {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut colors: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut faces: Vec<FaceRef> = Vec::new();
    // Pre-pass record: position index -> every normal index paired with it.
    let mut normal_pairings: HashMap<usize, Vec<usize>> = HashMap::new();

    let mut import = ObjImport::default();

    for (line_index, raw_line) in text.lines().enumerate() {
        let line_number = line_index + 1;
        let line = raw_line.trim_end_matches('\r');
        let tokens: Vec<&str> = line.split(' ').collect();

        match tokens[0] {
            "v" => match parse_vertex_line(&tokens, fallback_color) {
                Some((position, color)) => {
                    positions.push(position);
                    colors.push(color);
                }
                None => import.report(ImportIssue::MalformedLine {
                    line: line_number,
                    text: line.to_string(),
                }),
            },
            "vn" => match parse_floats::<3>(&tokens[1..]) {
                Some(normal) if tokens.len() == 4 => normals.push(normal),
                _ => import.report(ImportIssue::MalformedLine {
                    line: line_number,
                    text: line.to_string(),
                }),
            },
            "vt" => match parse_floats::<2>(&tokens[1..]) {
                Some(uv) if tokens.len() == 3 => texcoords.push(uv),
                _ => import.report(ImportIssue::MalformedLine {
                    line: line_number,
                    text: line.to_string(),
                }),
            },
            "f" => match parse_face_line(&tokens) {
                Some(corners) => {
                    for corner in &corners {
                        normal_pairings
                            .entry(corner.position)
                            .or_default()
                            .push(corner.normal);
                    }
                    faces.push(FaceRef {
                        corners,
                        line: line_number,
                    });
                }
                None => import.report(ImportIssue::MalformedLine {
                    line: line_number,
                    text: line.to_string(),
                }),
            },
            "mtllib" if tokens.len() == 2 => {
                import.mtllib = Some(tokens[1].to_string());
            }
            _ => {}
        }
    }

    let mut conflicts: Vec<(usize, usize)> = normal_pairings
        .iter()
        .filter_map(|(&position, pairings)| {
            let mut distinct = pairings.clone();
            distinct.sort_unstable();
            distinct.dedup();
            (distinct.len() > 1).then_some((position, distinct.len()))
        })
        .collect();
    conflicts.sort_unstable();
    for (position, normals) in conflicts {
        import.report(ImportIssue::NormalConflict { position, normals });
    }

    let has_texcoords = !texcoords.is_empty();

    for face in &faces {
        let mut face_vertices = [Vertex {
            position: [0.0; 3],
            color: [0.0; 3],
            normal: [0.0; 3],
        }; 3];
        let mut face_uvs = [[0.0f32; 2]; 3];
        let mut valid = true;

        for (slot, corner) in face.corners.iter().enumerate() {
            // Effective normal: the last pairing ever seen for this
            // position index, not this corner's own normal index.
            let effective_normal = normal_pairings
                .get(&corner.position)
                .and_then(|pairings| pairings.last())
                .copied();

            let position = positions.get(corner.position);
            let color = colors.get(corner.position);
            let normal = effective_normal.and_then(|index| normals.get(index));
            let uv = if has_texcoords {
                texcoords.get(corner.texcoord)
            } else {
                Some(&[0.0f32; 2])
            };

            match (position, color, normal, uv) {
                (Some(&position), Some(&color), Some(&normal), Some(&uv)) => {
                    face_vertices[slot] = Vertex {
                        position,
                        color,
                        normal,
                    };
                    face_uvs[slot] = uv;
                }
                _ => {
                    valid = false;
                    break;
                }
            }
        }

        if !valid {
            import.report(ImportIssue::IndexOutOfRange { line: face.line });
            continue;
        }

        import.geometry.vertices.extend_from_slice(&face_vertices);
        if has_texcoords {
            import.geometry.uvs.extend_from_slice(&face_uvs);
        }
    }

    if has_texcoords {
        let (tangents, bitangents, uv_issues) =
            calculate_tangent_space(&import.geometry.vertices, &import.geometry.uvs);
        import.geometry.tangents = tangents;
        import.geometry.bitangents = bitangents;
        for issue in uv_issues {
            import.report(issue);
        }
    }

    import
}

impl ObjImport {
    fn report(&mut self, issue: ImportIssue) {
        warn!("obj import: {}", issue);
        self.issues.push(issue);
    }
}

fn parse_vertex_line(tokens: &[&str], fallback_color: [f32; 3]) -> Option<([f32; 3], [f32; 3])> {
    match tokens.len() {
        4 => Some((parse_floats::<3>(&tokens[1..])?, fallback_color)),
        7 => Some((
            parse_floats::<3>(&tokens[1..4])?,
            parse_floats::<3>(&tokens[4..])?,
        )),
        _ => None,
    }
}

fn parse_face_line(tokens: &[&str]) -> Option<[CornerRef; 3]> {
    // Exactly triangular; quads and larger polygons are a format error.
    if tokens.len() != 4 {
        return None;
    }

    let mut corners = [CornerRef {
        position: 0,
        texcoord: 0,
        normal: 0,
    }; 3];
    for (slot, token) in tokens[1..].iter().enumerate() {
        let mut parts = token.split('/');
        let position: usize = parts.next()?.parse().ok()?;
        let texcoord: usize = parts.next()?.parse().ok()?;
        let normal: usize = parts.next()?.parse().ok()?;
        if parts.next().is_some() || position == 0 || texcoord == 0 || normal == 0 {
            return None;
        }
        // 1-based in the file, 0-based from here on.
        corners[slot] = CornerRef {
            position: position - 1,
            texcoord: texcoord - 1,
            normal: normal - 1,
        };
    }
    Some(corners)
}

fn parse_floats<const N: usize>(tokens: &[&str]) -> Option<[f32; N]> {
    if tokens.len() < N {
        return None;
    }
    let mut values = [0.0f32; N];
    for (value, token) in values.iter_mut().zip(tokens) {
        *value = token.parse().ok()?;
    }
    Some(values)
}

/// Flat per-face tangent basis from positions and UVs.
///
/// Each triangle gets one tangent/bitangent pair replicated for its three
/// corners. A degenerate UV triangle (zero UV area) yields zero vectors
/// and an issue instead of infinities.
fn calculate_tangent_space(
    vertices: &[Vertex],
    uvs: &[[f32; 2]],
) -> (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<ImportIssue>) {
    let mut tangents = Vec::with_capacity(vertices.len());
    let mut bitangents = Vec::with_capacity(vertices.len());
    let mut issues = Vec::new();

    for (triangle, (corners, corner_uvs)) in
        vertices.chunks_exact(3).zip(uvs.chunks_exact(3)).enumerate()
    {
        let p0 = Vector3::from(corners[0].position);
        let p1 = Vector3::from(corners[1].position);
        let p2 = Vector3::from(corners[2].position);

        let uv0 = Vector2::from(corner_uvs[0]);
        let uv1 = Vector2::from(corner_uvs[1]);
        let uv2 = Vector2::from(corner_uvs[2]);

        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let d1 = uv1 - uv0;
        let d2 = uv2 - uv0;

        let det = d1.x * d2.y - d1.y * d2.x;
        let (tangent, bitangent) = if det.abs() < f32::EPSILON {
            issues.push(ImportIssue::DegenerateUv { triangle });
            (Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0))
        } else {
            let r = 1.0 / det;
            ((e1 * d2.y - e2 * d1.y) * r, (e2 * d1.x - e1 * d2.x) * r)
        };

        for _ in 0..3 {
            tangents.push([tangent.x, tangent.y, tangent.z]);
            bitangents.push([bitangent.x, bitangent.y, bitangent.z]);
        }
    }

    (tangents, bitangents, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

    const SINGLE_TRIANGLE: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn test_single_triangle_buffers() {
        let import = parse_obj(SINGLE_TRIANGLE, WHITE);
        assert!(import.issues.is_empty(), "issues: {:?}", import.issues);

        let geometry = &import.geometry;
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.uvs.len(), 3);
        assert_eq!(geometry.tangents.len(), 3);
        assert_eq!(geometry.bitangents.len(), 3);

        // Flat basis: all three corners share one tangent pair.
        assert_eq!(geometry.tangents[0], geometry.tangents[1]);
        assert_eq!(geometry.tangents[1], geometry.tangents[2]);

        // UVs track positions here, so the tangent frame is axis-aligned.
        assert_relative_eq!(geometry.tangents[0][0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(geometry.bitangents[0][1], 1.0, epsilon = 1e-6);

        assert_eq!(geometry.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(geometry.vertices[0].color, WHITE);
    }

    #[test]
    fn test_vertex_colors_override_fallback() {
        let text = "\
v 0.0 0.0 0.0 0.5 0.25 0.125
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
f 1/1/1 2/1/1 3/1/1
";
        let import = parse_obj(text, [0.9, 0.9, 0.9]);
        let vertices = &import.geometry.vertices;
        assert_eq!(vertices[0].color, [0.5, 0.25, 0.125]);
        assert_eq!(vertices[1].color, [0.9, 0.9, 0.9]);
    }

    #[test]
    fn test_last_write_wins_normals() {
        // Position 1 is paired with normal 1 first, then normal 2; every
        // corner referencing position 1 must end up with normal 2.
        let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
v 1.0 1.0 0.0
vn 0.0 0.0 1.0
vn 1.0 0.0 0.0
vt 0.0 0.0
f 1/1/1 2/1/1 3/1/1
f 1/1/2 2/1/1 4/1/1
";
        let import = parse_obj(text, WHITE);
        let vertices = &import.geometry.vertices;

        // First face's first corner shares position 0, whose last pairing
        // is normal index 1.
        assert_eq!(vertices[0].normal, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[3].normal, [1.0, 0.0, 0.0]);
        // Position 1 only ever saw normal index 0.
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0]);

        assert!(import.issues.contains(&ImportIssue::NormalConflict {
            position: 0,
            normals: 2
        }));
    }

    #[test]
    fn test_malformed_lines_are_reported_and_skipped() {
        let text = "\
v 0.0 0.0
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0
vn 0.0 0.0 1.0
vt 0.0
vt 0.0 0.0
f 1/1/1 2/1/1
f 1/1/1 2/1/1 3/1/1
";
        let import = parse_obj(text, WHITE);

        // Four malformed lines, one of each kind; the well-formed ones
        // still produce a triangle.
        let malformed = import
            .issues
            .iter()
            .filter(|issue| matches!(issue, ImportIssue::MalformedLine { .. }))
            .count();
        assert_eq!(malformed, 4);
        assert_eq!(import.geometry.vertex_count(), 3);
    }

    #[test]
    fn test_quad_face_is_a_format_error() {
        let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
f 1/1/1 2/1/1 3/1/1 4/1/1
";
        let import = parse_obj(text, WHITE);
        assert_eq!(import.geometry.vertex_count(), 0);
        assert!(matches!(
            import.issues[0],
            ImportIssue::MalformedLine { line: 7, .. }
        ));
    }

    #[test]
    fn test_out_of_range_face_index_skips_triangle() {
        let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
vn 0.0 0.0 1.0
vt 0.0 0.0
f 1/1/1 2/1/1 9/1/1
";
        let import = parse_obj(text, WHITE);
        assert_eq!(import.geometry.vertex_count(), 0);
        assert!(matches!(
            import.issues[0],
            ImportIssue::IndexOutOfRange { line: 5 }
        ));
    }

    #[test]
    fn test_degenerate_uv_zeroes_tangent_pair() {
        let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vt 0.5 0.5
f 1/1/1 2/1/1 3/1/1
";
        let import = parse_obj(text, WHITE);
        assert!(import
            .issues
            .contains(&ImportIssue::DegenerateUv { triangle: 0 }));
        assert_eq!(import.geometry.tangents[0], [0.0, 0.0, 0.0]);
        assert_eq!(import.geometry.bitangents[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_no_texcoords_means_no_uv_or_tangent_buffers() {
        let text = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
";
        let import = parse_obj(text, WHITE);
        assert_eq!(import.geometry.vertex_count(), 3);
        assert!(import.geometry.uvs.is_empty());
        assert!(import.geometry.tangents.is_empty());
    }

    #[test]
    fn test_mtllib_and_unknown_lines() {
        let text = "\
# comment
o some_object
mtllib cube.mtl
v 0.0 0.0 0.0
";
        let import = parse_obj(text, WHITE);
        assert_eq!(import.mtllib.as_deref(), Some("cube.mtl"));
        assert!(import.issues.is_empty());
    }
}
