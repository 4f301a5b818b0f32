//! Closed-ribbon mesh construction.
//!
//! Extrudes a closed centerline polyline into strip meshes built from
//! three-vertex cross-sections: the road surface (left edge, center, right
//! edge) and the two walls (below edge, edge, above edge). Sections are
//! triangulated as a cylindrical grid of quads, two columns wide and one row
//! per section, with closing triangles wrapping the last section back to the
//! first.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

/// Vertex and index buffers for a ribbon mesh.
///
/// Optional attribute arrays (normals, UVs, tangents) are kept only when
/// their length exactly matches the vertex count at build time; mismatched
/// arrays are dropped, and missing normals are recomputed from the triangle
/// faces.
#[derive(Default)]
pub struct RibbonBuilder {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    tangents: Vec<Vec4>,
    indices: Vec<u32>,
}

impl RibbonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of three-vertex cross-sections pushed so far.
    pub fn section_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn push_vertex(&mut self, vertex: Vec3) {
        self.vertices.push(vertex);
    }

    /// Pushes one cross-section's three vertices.
    pub fn push_section(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.vertices.push(a);
        self.vertices.push(b);
        self.vertices.push(c);
    }

    pub fn push_normal(&mut self, normal: Vec3) {
        self.normals.push(normal);
    }

    pub fn push_uv(&mut self, uv: Vec2) {
        self.uvs.push(uv);
    }

    pub fn push_tangent(&mut self, tangent: Vec4) {
        self.tangents.push(tangent);
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Triangulates the pushed sections as a closed ribbon.
    ///
    /// The sections form a cylindrical grid two quads wide; each grid cell
    /// emits two triangles, and the last row emits two extra triangles per
    /// column connecting back to the base section instead of a section past
    /// the end. With `double_sided`, every triangle is also emitted with
    /// reversed winding so both faces render.
    pub fn close_loop(&mut self, double_sided: bool) {
        let sections = self.section_count();
        assert!(
            sections >= 3,
            "closed ribbon needs at least 3 cross-sections, got {sections}"
        );

        let base = 0u32;
        let rows = sections as u32 - 1;
        let mut vi = 0u32;

        for y in 0..rows {
            for x in 0..2u32 {
                self.add_triangle(vi, vi + 3, vi + 1);
                self.add_triangle(vi + 1, vi + 3, vi + 4);

                if y == rows - 1 {
                    self.add_triangle(vi + 3, base + x, vi + 4);
                    self.add_triangle(base + x + 1, vi + 4, base + x);
                }

                if double_sided {
                    self.add_triangle(vi + 1, vi + 3, vi);
                    self.add_triangle(vi + 4, vi + 3, vi + 1);

                    if y == rows - 1 {
                        self.add_triangle(vi + 4, base + x, vi + 3);
                        self.add_triangle(base + x, vi + 4, base + x + 1);
                    }
                }

                vi += 1;
            }
            vi += 1;
        }
    }

    /// Converts the buffers into a renderable mesh.
    pub fn build(self) -> Mesh {
        let vertex_count = self.vertices.len();
        let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.to_array()).collect();

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
            .with_inserted_indices(Indices::U32(self.indices));

        if self.uvs.len() == vertex_count {
            let uvs: Vec<[f32; 2]> = self.uvs.iter().map(|v| v.to_array()).collect();
            mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        }

        if self.tangents.len() == vertex_count {
            let tangents: Vec<[f32; 4]> = self.tangents.iter().map(|v| v.to_array()).collect();
            mesh.insert_attribute(Mesh::ATTRIBUTE_TANGENT, tangents);
        }

        let normals = if self.normals.len() == vertex_count {
            self.normals
        } else {
            smooth_normals(&self.vertices, mesh.indices())
        };
        let normals: Vec<[f32; 3]> = normals.iter().map(|v| v.to_array()).collect();
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);

        mesh
    }
}

/// Area-weighted vertex normals accumulated from triangle faces.
fn smooth_normals(vertices: &[Vec3], indices: Option<&Indices>) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    if let Some(indices) = indices {
        let flat: Vec<usize> = indices.iter().collect();
        for tri in flat.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
            let face = (vertices[i1] - vertices[i0]).cross(vertices[i2] - vertices[i0]);
            normals[i0] += face;
            normals[i1] += face;
            normals[i2] += face;
        }
    }

    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}

/// Builds the road surface ribbon: per section, the centerline point flanked
/// by the two edge points half a width out along the lateral axis.
pub fn road_ribbon(points: &[Vec3], width: f32) -> RibbonBuilder {
    assert!(width > 0.0, "road width must be positive");

    let mut builder = RibbonBuilder::new();
    let mut lateral = Vec3::X;
    let mut run_length = 0.0;

    for i in 0..points.len() {
        lateral = section_lateral(points, i, lateral);

        let left = points[i] + 0.5 * width * lateral;
        let right = points[i] - 0.5 * width * lateral;
        builder.push_section(left, points[i], right);

        if i > 0 {
            run_length += points[i].distance(points[i - 1]);
        }
        let u = run_length / width;
        builder.push_uv(Vec2::new(u, 0.0));
        builder.push_uv(Vec2::new(u, 0.5));
        builder.push_uv(Vec2::new(u, 1.0));
    }

    builder.close_loop(false);
    builder
}

/// Builds the two wall ribbons along the road edges. Each section spans from
/// `height` below the edge point to `height` above it; walls are double-sided
/// so they render from either side of the track.
pub fn wall_ribbons(points: &[Vec3], width: f32, height: f32) -> (RibbonBuilder, RibbonBuilder) {
    assert!(width > 0.0, "road width must be positive");
    assert!(height > 0.0, "wall height must be positive");

    let mut side_a = RibbonBuilder::new();
    let mut side_b = RibbonBuilder::new();
    let mut lateral = Vec3::X;
    let mut run_length = 0.0;
    let rise = Vec3::Y * height;

    for i in 0..points.len() {
        lateral = section_lateral(points, i, lateral);

        let edge_a = points[i] + 0.5 * width * lateral;
        let edge_b = points[i] - 0.5 * width * lateral;
        side_a.push_section(edge_a - rise, edge_a, edge_a + rise);
        side_b.push_section(edge_b - rise, edge_b, edge_b + rise);

        if i > 0 {
            run_length += points[i].distance(points[i - 1]);
        }
        let u = run_length / width;
        for builder in [&mut side_a, &mut side_b] {
            builder.push_uv(Vec2::new(u, 0.0));
            builder.push_uv(Vec2::new(u, 0.5));
            builder.push_uv(Vec2::new(u, 1.0));
        }
    }

    side_a.close_loop(true);
    side_b.close_loop(true);
    (side_a, side_b)
}

/// Lateral (cross) axis for section `i`: the direction from the previous
/// point (wrapping to the last for the first section) crossed with world up.
/// Consecutive duplicate points have no direction of their own and reuse the
/// previous section's lateral.
fn section_lateral(points: &[Vec3], i: usize, previous: Vec3) -> Vec3 {
    let prev_point = points[if i == 0 { points.len() - 1 } else { i - 1 }];
    let lateral = (points[i] - prev_point).cross(Vec3::Y).normalize_or_zero();
    if lateral == Vec3::ZERO {
        previous
    } else {
        lateral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Regular polygon in the XZ plane, P sections.
    fn polygon(sections: usize, radius: f32) -> Vec<Vec3> {
        (0..sections)
            .map(|i| {
                let angle = (i as f32 / sections as f32) * std::f32::consts::TAU;
                Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
            })
            .collect()
    }

    #[test]
    fn closed_ribbon_has_two_quads_per_section() {
        let sections = 5;
        let ribbon = road_ribbon(&polygon(sections, 10.0), 2.0);
        assert_eq!(ribbon.vertex_count(), 3 * sections);
        // 2 quads x 2 triangles x P sections, wrapping included
        assert_eq!(ribbon.indices().len(), 12 * sections);
    }

    #[test]
    fn double_sided_ribbon_doubles_the_triangles() {
        let sections = 5;
        let (wall_a, wall_b) = wall_ribbons(&polygon(sections, 10.0), 2.0, 1.0);
        assert_eq!(wall_a.indices().len(), 24 * sections);
        assert_eq!(wall_b.indices().len(), 24 * sections);
    }

    #[test]
    fn indices_stay_in_bounds_and_wrap_to_the_base_section() {
        let sections = 6;
        let ribbon = road_ribbon(&polygon(sections, 10.0), 2.0);

        let max = 3 * sections as u32;
        assert!(ribbon.indices().iter().all(|&i| i < max));

        // at least one triangle must bridge the final section back to the base
        let bridges = ribbon.indices().chunks_exact(3).any(|tri| {
            tri.iter().any(|&i| i < 3) && tri.iter().any(|&i| i >= max - 3)
        });
        assert!(bridges, "no wraparound triangle references the base section");
    }

    #[test]
    fn road_sections_span_the_requested_width() {
        let width = 4.0;
        let ribbon = road_ribbon(&polygon(8, 10.0), width);
        let vertices = ribbon.vertices();

        for section in vertices.chunks_exact(3) {
            let spread = section[0].distance(section[2]);
            assert!((spread - width).abs() < 1e-4);
        }
    }

    #[test]
    fn wall_sections_rise_and_drop_from_the_road_edge() {
        let height = 1.5;
        let (wall_a, _) = wall_ribbons(&polygon(8, 10.0), 4.0, height);

        for section in wall_a.vertices().chunks_exact(3) {
            let edge = section[1];
            assert!((section[0].y - (edge.y - height)).abs() < 1e-5);
            assert!((section[2].y - (edge.y + height)).abs() < 1e-5);
        }
    }

    #[test]
    fn duplicate_centerline_points_reuse_the_previous_lateral() {
        let mut points = polygon(8, 10.0);
        points[3] = points[2]; // zero-length step

        let ribbon = road_ribbon(&points, 2.0);
        for vertex in ribbon.vertices() {
            assert!(vertex.is_finite(), "degenerate section produced {vertex}");
        }

        // the duplicate section inherits its neighbor's lateral, so their
        // edge vertices coincide
        let vertices = ribbon.vertices();
        assert!(vertices[6].distance(vertices[9]) < 1e-5);
        assert!(vertices[8].distance(vertices[11]) < 1e-5);
    }

    #[test]
    fn mismatched_optional_attributes_are_dropped() {
        let mut builder = RibbonBuilder::new();
        for &p in &polygon(4, 5.0) {
            builder.push_section(p, p + Vec3::X, p + 2.0 * Vec3::X);
        }
        builder.close_loop(false);
        builder.push_normal(Vec3::Y); // 1 normal for 12 vertices
        builder.push_uv(Vec2::ZERO); // 1 uv for 12 vertices

        let mesh = builder.build();
        assert!(mesh.attribute(Mesh::ATTRIBUTE_UV_0).is_none());
        let normals = mesh.attribute(Mesh::ATTRIBUTE_NORMAL).unwrap();
        assert_eq!(normals.len(), 12);
    }

    #[test]
    fn matching_attributes_survive_the_build() {
        let ribbon = road_ribbon(&polygon(6, 10.0), 2.0);
        let vertex_count = ribbon.vertex_count();

        let mesh = ribbon.build();
        assert_eq!(mesh.attribute(Mesh::ATTRIBUTE_UV_0).unwrap().len(), vertex_count);
        assert_eq!(mesh.count_vertices(), vertex_count);
    }

    #[test]
    fn flat_ring_normals_point_up() {
        let ribbon = road_ribbon(&polygon(12, 10.0), 2.0);
        let vertices = ribbon.vertices().to_vec();
        let normals = smooth_normals(&vertices, Some(&Indices::U32(ribbon.indices().to_vec())));

        for normal in normals {
            assert!(normal.distance(Vec3::Y) < 1e-3, "normal {normal} not up");
        }
    }
}
