//! Scene objects and their identities

use std::fmt;
use std::str::FromStr;

use m3d_core::Transform;
use serde::{Deserialize, Serialize};

use crate::mesh::MeshPayload;

/// Identity of an object inside its owning scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub usize);

impl ObjectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a texture image; faces referencing the same id share a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageId(pub usize);

impl ImageId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Object type tag. Only meshes are exported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ObjectKind {
    #[default]
    Mesh,
    Empty,
    Camera,
    Lamp,
    Other(String),
}

impl ObjectKind {
    pub fn is_mesh(&self) -> bool {
        matches!(self, ObjectKind::Mesh)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Mesh => "mesh",
            ObjectKind::Empty => "empty",
            ObjectKind::Camera => "camera",
            ObjectKind::Lamp => "lamp",
            ObjectKind::Other(name) => name,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "mesh" => ObjectKind::Mesh,
            "empty" => ObjectKind::Empty,
            "camera" => ObjectKind::Camera,
            "lamp" | "light" => ObjectKind::Lamp,
            _ => ObjectKind::Other(s.to_string()),
        })
    }
}

/// A node of the host scene graph
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Object name, also used for the output file name
    pub name: String,
    /// Type tag
    pub kind: ObjectKind,
    /// Location / rotation / scale as stored by the host
    pub transform: Transform,
    /// Non-owning back reference to the parent object
    pub parent: Option<ObjectId>,
    /// Geometry, present for meshes
    pub mesh: Option<MeshPayload>,
}

impl SceneObject {
    /// Create a mesh object
    pub fn mesh(name: impl Into<String>, transform: Transform, mesh: MeshPayload) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Mesh,
            transform,
            parent: None,
            mesh: Some(mesh),
        }
    }

    /// Create a geometry-less object of the given kind
    pub fn new(name: impl Into<String>, kind: ObjectKind, transform: Transform) -> Self {
        Self {
            name: name.into(),
            kind,
            transform,
            parent: None,
            mesh: None,
        }
    }

    /// Attach to a parent
    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn is_mesh(&self) -> bool {
        self.kind.is_mesh()
    }
}
