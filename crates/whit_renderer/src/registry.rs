//! Surface registry: the flattened, camera-space polygon soup that every ray
//! query runs against.
//!
//! Loading and querying are separate types. [`SurfaceRegistry::begin_load`]
//! hands out a [`RegistryLoader`]; surfaces are streamed into it one at a
//! time and [`RegistryLoader::end_load`] consumes it to produce the frozen,
//! shareable registry. Queries therefore can never observe a half-built
//! registry, and nothing can be inserted after the freeze.

use std::sync::Arc;

use whit_core::{Material, Texture};
use whit_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Smallest accepted ray parameter for a hit.
pub const DEFAULT_MIN_DISTANCE: f32 = 1e-5;

/// Polygons whose doubled area falls below this are dropped as degenerate.
const DEGENERATE_AREA: f32 = 1e-12;

/// Tolerance for the fan-triangle containment test in `interpolate`.
const BARYCENTRIC_SLACK: f32 = 1e-4;

/// Identity of a surface within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(usize);

/// Result of a nearest-hit query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the (unit) ray direction
    pub t: f32,
    pub point: Vec3,
    pub surface: SurfaceId,
}

/// Shading inputs at a hit.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    pub t: f32,
    pub point: Vec3,
    /// Interpolated vertex normal, or the flat polygon normal (unit length)
    pub normal: Vec3,
    pub material: Option<&'a Material>,
    pub texture: Option<&'a Texture>,
    pub tex_coord: Option<Vec2>,
    pub surface: SurfaceId,
}

/// A flattened polygon, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Surface {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    material: Option<Arc<Material>>,
    texture: Option<Arc<Texture>>,
    /// Unit plane normal following the vertex winding
    normal: Vec3,
    /// Plane offset: normal · p == plane_d for points on the plane
    plane_d: f32,
    /// Axis dropped when projecting for the inside test
    drop_axis: usize,
    bbox: Aabb,
}

impl Surface {
    fn build(draft: SurfaceDraft) -> Option<Self> {
        if draft.vertices.len() < 3 {
            return None;
        }

        // Newell normal, oriented by the vertex winding
        let origin = draft.vertices[0];
        let area_normal = draft
            .vertices
            .iter()
            .zip(draft.vertices.iter().cycle().skip(1))
            .fold(Vec3::ZERO, |acc, (a, b)| acc + (*a - origin).cross(*b - origin));
        if area_normal.length_squared() < DEGENERATE_AREA {
            return None;
        }
        let normal = area_normal.normalize();

        let abs = normal.abs();
        let drop_axis = if abs.x >= abs.y && abs.x >= abs.z {
            0
        } else if abs.y >= abs.z {
            1
        } else {
            2
        };

        Some(Self {
            plane_d: normal.dot(origin),
            bbox: Aabb::enclosing(&draft.vertices),
            vertices: draft.vertices,
            normals: draft.normals,
            tex_coords: draft.tex_coords,
            material: draft.material,
            texture: draft.texture,
            normal,
            drop_axis,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// The flat (geometric) normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_deref()
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_deref()
    }

    /// Ray parameter of the hit, if the ray crosses the polygon strictly
    /// inside `range`.
    fn intersect(&self, ray: &Ray, range: Interval) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-9 {
            return None;
        }
        let t = (self.plane_d - self.normal.dot(ray.origin)) / denom;
        if !range.surrounds(t) {
            return None;
        }
        self.contains(ray.at(t)).then_some(t)
    }

    /// Crossing-number test in the plane of maximal projection.
    fn contains(&self, point: Vec3) -> bool {
        let project = |v: Vec3| match self.drop_axis {
            0 => Vec2::new(v.y, v.z),
            1 => Vec2::new(v.z, v.x),
            _ => Vec2::new(v.x, v.y),
        };
        let p = project(point);

        let mut inside = false;
        for (a, b) in self
            .vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
        {
            let a = project(*a);
            let b = project(*b);
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Interpolate vertex normals and texture coordinates at `point`.
    ///
    /// The polygon is fanned from its first vertex and the fan triangle
    /// containing the point supplies barycentric weights. Attributes are
    /// only interpolated when all three corners of that triangle carry them.
    fn interpolate(&self, point: Vec3) -> (Vec3, Option<Vec2>) {
        let Some((corners, weights)) = self.fan_weights(point) else {
            return (self.normal, None);
        };

        let normal = corner_values(&self.normals, corners)
            .and_then(|[n0, n1, n2]| (n0 * weights.x + n1 * weights.y + n2 * weights.z).try_normalize())
            .unwrap_or(self.normal);

        let tex_coord = corner_values(&self.tex_coords, corners)
            .map(|[uv0, uv1, uv2]| uv0 * weights.x + uv1 * weights.y + uv2 * weights.z);

        (normal, tex_coord)
    }

    /// Corner indices and barycentric weights of the fan triangle best
    /// containing `point`.
    fn fan_weights(&self, point: Vec3) -> Option<([usize; 3], Vec3)> {
        let a = self.vertices[0];
        let mut best: Option<([usize; 3], Vec3)> = None;
        let mut best_score = f32::NEG_INFINITY;

        for i in 1..self.vertices.len() - 1 {
            let b = self.vertices[i];
            let c = self.vertices[i + 1];

            let e0 = b - a;
            let e1 = c - a;
            let e2 = point - a;
            let d00 = e0.dot(e0);
            let d01 = e0.dot(e1);
            let d11 = e1.dot(e1);
            let d20 = e2.dot(e0);
            let d21 = e2.dot(e1);
            let denom = d00 * d11 - d01 * d01;
            if denom.abs() <= f32::EPSILON * d00 * d11 {
                continue;
            }

            let v = (d11 * d20 - d01 * d21) / denom;
            let w = (d00 * d21 - d01 * d20) / denom;
            let weights = Vec3::new(1.0 - v - w, v, w);
            let score = weights.min_element();

            if score >= -BARYCENTRIC_SLACK {
                return Some(([0, i, i + 1], weights));
            }
            if score > best_score {
                best_score = score;
                best = Some(([0, i, i + 1], weights));
            }
        }
        best
    }
}

/// Values of `attrs` at three corners, if every corner has one.
fn corner_values<T: Copy>(attrs: &[T], [a, b, c]: [usize; 3]) -> Option<[T; 3]> {
    Some([*attrs.get(a)?, *attrs.get(b)?, *attrs.get(c)?])
}

#[derive(Debug, Default)]
struct SurfaceDraft {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    material: Option<Arc<Material>>,
    texture: Option<Arc<Texture>>,
}

/// Mutable accumulation phase of a [`SurfaceRegistry`].
#[derive(Debug)]
pub struct RegistryLoader {
    surfaces: Vec<Surface>,
    open: Option<SurfaceDraft>,
    min_distance: f32,
    dropped: usize,
}

impl RegistryLoader {
    /// Start a new surface.
    ///
    /// # Panics
    ///
    /// Panics if the previous surface was not ended.
    pub fn begin_surface(&mut self) {
        assert!(
            self.open.is_none(),
            "begin_surface called while another surface is open"
        );
        self.open = Some(SurfaceDraft::default());
    }

    pub fn set_material(&mut self, material: Option<Arc<Material>>) {
        self.draft().material = material;
    }

    pub fn set_texture(&mut self, texture: Option<Arc<Texture>>) {
        self.draft().texture = texture;
    }

    pub fn add_vertex(&mut self, vertex: Vec3) {
        self.draft().vertices.push(vertex);
    }

    pub fn add_normal(&mut self, normal: Vec3) {
        self.draft().normals.push(normal);
    }

    pub fn add_tex_coord(&mut self, uv: Vec2) {
        self.draft().tex_coords.push(uv);
    }

    /// Finish the open surface. Degenerate outlines (fewer than three
    /// vertices, or zero area) are dropped and yield `None`.
    pub fn end_surface(&mut self) -> Option<SurfaceId> {
        let Some(draft) = self.open.take() else {
            panic!("end_surface called with no open surface");
        };

        let vertex_count = draft.vertices.len();
        match Surface::build(draft) {
            Some(surface) => {
                self.surfaces.push(surface);
                Some(SurfaceId(self.surfaces.len() - 1))
            }
            None => {
                self.dropped += 1;
                log::warn!("Dropping degenerate surface with {} vertices", vertex_count);
                None
            }
        }
    }

    /// Number of surfaces accepted so far.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Freeze the registry.
    ///
    /// # Panics
    ///
    /// Panics if a surface is still open.
    pub fn end_load(self) -> SurfaceRegistry {
        assert!(
            self.open.is_none(),
            "end_load called while a surface is open"
        );
        log::debug!(
            "Surface registry frozen: {} surfaces ({} dropped)",
            self.surfaces.len(),
            self.dropped
        );
        SurfaceRegistry {
            surfaces: self.surfaces,
            min_distance: self.min_distance,
        }
    }

    fn draft(&mut self) -> &mut SurfaceDraft {
        match self.open.as_mut() {
            Some(draft) => draft,
            None => panic!("surface data supplied with no open surface"),
        }
    }
}

/// Frozen collection of surfaces supporting nearest-hit and any-hit queries.
///
/// Queries scan every surface; each is first rejected by its bounding box
/// and then tested exactly.
#[derive(Debug, Clone)]
pub struct SurfaceRegistry {
    surfaces: Vec<Surface>,
    min_distance: f32,
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::begin_load().end_load()
    }
}

impl SurfaceRegistry {
    /// Enter the loading phase.
    pub fn begin_load() -> RegistryLoader {
        RegistryLoader {
            surfaces: Vec::new(),
            open: None,
            min_distance: DEFAULT_MIN_DISTANCE,
            dropped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.surfaces
            .iter()
            .enumerate()
            .map(|(i, surface)| (SurfaceId(i), surface))
    }

    /// Closest hit with `min_distance < t < max_distance`, skipping
    /// `ignore` by identity.
    pub fn nearest_hit(&self, ray: &Ray, max_distance: f32, ignore: Option<SurfaceId>) -> Option<Hit> {
        let mut closest = max_distance;
        let mut nearest = None;

        for (id, surface) in self.surfaces() {
            if Some(id) == ignore {
                continue;
            }
            let range = Interval::new(self.min_distance, closest);
            if !surface.bbox.hit(ray, range) {
                continue;
            }
            if let Some(t) = surface.intersect(ray, range) {
                closest = t;
                nearest = Some((id, t));
            }
        }

        nearest.map(|(surface, t)| Hit {
            t,
            point: ray.at(t),
            surface,
        })
    }

    /// Whether anything lies on the ray within the same bounds as
    /// [`nearest_hit`](Self::nearest_hit). Stops at the first blocker.
    pub fn any_hit(&self, ray: &Ray, max_distance: f32, ignore: Option<SurfaceId>) -> bool {
        let range = Interval::new(self.min_distance, max_distance);
        self.surfaces().any(|(id, surface)| {
            Some(id) != ignore
                && surface.bbox.hit(ray, range)
                && surface.intersect(ray, range).is_some()
        })
    }

    /// Shading inputs for a hit returned by `nearest_hit` on this registry.
    ///
    /// # Panics
    ///
    /// Panics if `hit` came from a different registry.
    pub fn intersect_info(&self, ray: &Ray, hit: &Hit) -> HitRecord<'_> {
        let surface = &self.surfaces[hit.surface.0];
        let point = ray.at(hit.t);
        let (normal, tex_coord) = surface.interpolate(point);

        HitRecord {
            t: hit.t,
            point,
            normal,
            material: surface.material(),
            texture: surface.texture(),
            tex_coord,
            surface: hit.surface,
        }
    }
}
