//! Mesh payload data structures

use m3d_core::{Error, Result, Rgb, Uv, Vec3};
use serde::{Deserialize, Serialize};

use crate::object::ImageId;

/// Geometry and materials attached to a mesh object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshPayload {
    /// Vertices; faces reference them by index
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    /// Triangles
    #[serde(default)]
    pub faces: Vec<Face>,
    /// Materials; faces reference them by index
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl MeshPayload {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if any face carries texture coordinates
    pub fn has_face_uvs(&self) -> bool {
        self.faces.iter().any(|f| f.uv.is_some())
    }

    /// Check the index invariants faces rely on.
    ///
    /// `image_exists` answers whether the host can resolve an image id.
    /// Out-of-range material indices are not an error; they are written as
    /// "no material".
    pub fn validate(&self, object: &str, image_exists: impl Fn(ImageId) -> bool) -> Result<()> {
        let vertex_count = self.vertices.len();

        for (face_index, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.vertices.iter().find(|&&v| v >= vertex_count) {
                return Err(Error::invalid_mesh(
                    object,
                    format!(
                        "face {} references vertex {} but the mesh has {} vertices",
                        face_index, bad, vertex_count
                    ),
                ));
            }

            if let Some(image) = face.image {
                if !image_exists(image) {
                    return Err(Error::invalid_mesh(
                        object,
                        format!("face {} references unknown image {}", face_index, image.index()),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// A single vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in object space
    pub position: Vec3,
    /// Vertex normal
    #[serde(default)]
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// A triangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Vertex indices (counter-clockwise)
    pub vertices: [usize; 3],
    /// Face normal
    #[serde(default)]
    pub normal: Vec3,
    /// Smooth shading flag
    #[serde(default)]
    pub smooth: bool,
    /// Material index into the owning mesh
    #[serde(default)]
    pub material: Option<usize>,
    /// Texture image
    #[serde(default)]
    pub image: Option<ImageId>,
    /// One texture coordinate per corner
    #[serde(default)]
    pub uv: Option<[Uv; 3]>,
}

impl Face {
    /// Create an untextured triangle without material
    pub fn new(vertices: [usize; 3], normal: Vec3) -> Self {
        Self {
            vertices,
            normal,
            smooth: false,
            material: None,
            image: None,
            uv: None,
        }
    }

    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_texture(mut self, image: ImageId, uv: [Uv; 3]) -> Self {
        self.image = Some(image);
        self.uv = Some(uv);
        self
    }

    pub fn smooth(mut self) -> Self {
        self.smooth = true;
        self
    }

    /// Material index, or `None` if unset or not below `material_count`
    pub fn material_index(&self, material_count: usize) -> Option<usize> {
        self.material.filter(|&m| m < material_count)
    }

    /// Texture coordinates, only when the face is actually textured
    pub fn textured_uvs(&self) -> Option<&[Uv; 3]> {
        self.image.and(self.uv.as_ref())
    }
}

/// Classic ambient/diffuse/specular material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Diffuse colour
    #[serde(default = "default_diffuse")]
    pub diffuse: Rgb,
    /// Ambient factor; the ambient colour is `diffuse * ambient`
    #[serde(default = "default_half")]
    pub ambient: f64,
    /// Specular colour
    #[serde(default)]
    pub specular: Rgb,
    /// Specular intensity
    #[serde(default = "default_half")]
    pub shininess: f64,
}

fn default_diffuse() -> Rgb {
    Rgb::new(0.8, 0.8, 0.8)
}

fn default_half() -> f64 {
    0.5
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: Rgb) -> Self {
        Self {
            name: name.into(),
            diffuse,
            ambient: default_half(),
            specular: Rgb::WHITE,
            shininess: default_half(),
        }
    }

    /// Effective ambient colour
    pub fn ambient_color(&self) -> Rgb {
        self.diffuse.scale(self.ambient)
    }
}

/// A texture image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,
    /// Source image path as stored by the host
    pub filename: String,
}

impl Texture {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
        }
    }

    /// Final path component; both separators are accepted
    pub fn base_filename(&self) -> &str {
        self.filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filename)
    }
}
