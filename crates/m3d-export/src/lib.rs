//! m3d Export Pipeline
//!
//! Converts meshes of a host scene into the m3d XML format:
//! - one file per top-level selected mesh, named `<object>.xml`
//! - materials, textures, vertices and triangles per mesh
//! - selected child meshes nested inside their parent's element
//!
//! The scene is read through [`m3d_scene::SceneHost`]; nothing in the host
//! is modified.

pub mod coords;
pub mod options;
pub mod report;
pub mod textures;
pub mod transform;
pub mod xml;

pub use options::{ChildPolicy, ExportOptions, TransformMode};
pub use report::{ExportReport, ExportStats, ObjectOutcome};
pub use textures::TextureTable;
pub use transform::{resolve_transform, to_quaternion, ResolvedTransform};
pub use xml::{ExportPlan, MeshXmlExporter, PlanNode, XmlWriter};
