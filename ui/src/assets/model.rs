use glam::{Mat3, Mat4, Vec3};
use gltf::mesh::Mode;

use super::error::LoadError;
use crate::render::renderer::bounds::Aabb;
use crate::render::renderer::vertex::Vertex;

/// Decoded RGBA8 pixels.
#[derive(Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TextureImage({}x{})", self.width, self.height)
    }
}

impl TextureImage {
    pub fn decode(index: usize, bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| LoadError::Image(index, e))?
            .into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
    /// Index into [`ModelAsset::images`].
    pub base_color_texture: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0; 4],
            base_color_texture: None,
        }
    }
}

impl Material {
    fn from_gltf(material: gltf::Material<'_>) -> Self {
        let pbr = material.pbr_metallic_roughness();
        Self {
            base_color: pbr.base_color_factor(),
            base_color_texture: pbr
                .base_color_texture()
                .map(|info| info.texture().source().index()),
        }
    }
}

/// Triangle list already transformed into world space.
#[derive(Debug, Clone)]
pub struct ModelPrimitive {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Index into [`ModelAsset::materials`], `None` for the default material.
    pub material: Option<usize>,
}

impl ModelPrimitive {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }
}

#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub primitives: Vec<ModelPrimitive>,
    pub materials: Vec<Material>,
    /// `None` where an image failed to decode; such textures render white.
    pub images: Vec<Option<TextureImage>>,
    pub bounds: Aabb,
}

impl ModelAsset {
    /// Flatten the default scene (or the first one) into world-space primitives.
    ///
    /// `buffers` must be indexed like the document's buffers.
    pub fn from_document(
        document: &gltf::Document,
        buffers: &[Vec<u8>],
        images: Vec<Option<TextureImage>>,
    ) -> Result<Self, LoadError> {
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or(LoadError::NoScene)?;

        let mut primitives = Vec::new();
        for node in scene.nodes() {
            visit(&node, Mat4::IDENTITY, buffers, &mut primitives);
        }

        if primitives.is_empty() {
            return Err(LoadError::Empty);
        }

        let bounds = primitives
            .iter()
            .fold(Aabb::EMPTY, |b, p| b.union(p.bounds()));

        let materials = document.materials().map(Material::from_gltf).collect();

        log::debug!(
            "flattened scene {:?}: {} primitives, {} vertices",
            scene.name().unwrap_or("unnamed"),
            primitives.len(),
            primitives.iter().map(|p| p.vertices.len()).sum::<usize>()
        );

        Ok(Self {
            primitives,
            materials,
            images,
            bounds,
        })
    }

    pub fn material(&self, primitive: &ModelPrimitive) -> Material {
        primitive
            .material
            .and_then(|i| self.materials.get(i).copied())
            .unwrap_or_default()
    }
}

fn visit(node: &gltf::Node<'_>, parent: Mat4, buffers: &[Vec<u8>], out: &mut Vec<ModelPrimitive>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                log::debug!(
                    "skipping {:?} primitive in mesh {:?}",
                    primitive.mode(),
                    mesh.name().unwrap_or("unnamed")
                );
                continue;
            }
            if let Some(p) = flatten(&primitive, world, buffers) {
                out.push(p);
            }
        }
    }

    for child in node.children() {
        visit(&child, world, buffers, out);
    }
}

fn flatten(primitive: &gltf::Primitive<'_>, world: Mat4, buffers: &[Vec<u8>]) -> Option<ModelPrimitive> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let positions: Vec<Vec3> = reader
        .read_positions()?
        .map(|p| world.transform_point3(Vec3::from(p)))
        .collect();
    if positions.is_empty() {
        return None;
    }

    let mut indices: Vec<u32> = reader
        .read_indices()
        .map(|idx| idx.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());
    indices.truncate(indices.len() - indices.len() % 3);
    if indices.iter().any(|&i| i as usize >= positions.len()) {
        log::warn!("primitive has out-of-range indices, skipping");
        return None;
    }

    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(iter) => {
            let normal_matrix = normal_matrix(world);
            iter.map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero())
                .collect()
        }
        None => face_normals(&positions, &indices),
    };

    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|tc| tc.into_f32().collect())
        .unwrap_or_default();

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: p.to_array(),
            normal: normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
            uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect();

    Some(ModelPrimitive {
        vertices,
        indices,
        material: primitive.material().index(),
    })
}

fn normal_matrix(world: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(world);
    if m.determinant().abs() < f32::EPSILON {
        return Mat3::IDENTITY;
    }
    m.inverse().transpose()
}

/// Area-weighted vertex normals for meshes that ship without them.
fn face_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals.into_iter().map(Vec3::normalize_or_zero).collect()
}
