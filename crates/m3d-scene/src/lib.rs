//! m3d Scene Model
//!
//! The scene graph the exporter reads from:
//! - objects with a kind tag, a location/rotation/scale transform and an
//!   optional parent
//! - mesh payloads (vertices, triangles, materials)
//! - texture images shared between meshes
//!
//! The exporter only sees a scene through the [`SceneHost`] trait. [`Scene`]
//! is the in-memory implementation, built in code or loaded from a JSON
//! scene description.
//!
//! # Example
//! ```
//! use m3d_core::Transform;
//! use m3d_scene::{MeshPayload, Scene, SceneHost, SceneObject};
//!
//! let mut scene = Scene::new();
//! let body = scene
//!     .add_object(SceneObject::mesh("Body", Transform::IDENTITY, MeshPayload::new()))
//!     .unwrap();
//! scene.select(body);
//!
//! assert_eq!(scene.selected(), vec![body]);
//! ```

pub mod description;
pub mod host;
pub mod mesh;
pub mod object;
pub mod scene;

pub use description::SceneDescription;
pub use host::SceneHost;
pub use mesh::{Face, Material, MeshPayload, Texture, Vertex};
pub use object::{ImageId, ObjectId, ObjectKind, SceneObject};
pub use scene::Scene;
