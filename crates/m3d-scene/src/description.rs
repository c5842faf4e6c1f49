//! JSON scene descriptions
//!
//! A stand-in for a live host: objects, parents, selection and face images
//! are referenced by name and resolved to ids when the scene is built.

use std::collections::HashMap;

use m3d_core::{Error, Euler, Result, Uv, Vec3};
use serde::{Deserialize, Serialize};

use crate::mesh::{Face, Material, MeshPayload, Texture, Vertex};
use crate::object::{ImageId, ObjectId, ObjectKind, SceneObject};
use crate::scene::Scene;

/// Root of a scene description document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub images: Vec<Texture>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    /// Names of the selected objects, in selection order
    #[serde(default)]
    pub selection: Vec<String>,
}

/// One object of a scene description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub name: String,
    /// Defaults to `mesh` when geometry is present, `empty` otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub location: Vec3,
    #[serde(default)]
    pub rotation: Euler,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshDescription>,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// Mesh geometry with faces referencing images by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshDescription {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub faces: Vec<FaceDescription>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

/// A triangle whose image is referenced by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceDescription {
    pub vertices: [usize; 3],
    #[serde(default)]
    pub normal: Vec3,
    #[serde(default)]
    pub smooth: bool,
    #[serde(default)]
    pub material: Option<usize>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub uv: Option<[Uv; 3]>,
}

impl SceneDescription {
    /// Resolve names and build a validated [`Scene`]
    pub fn into_scene(self) -> Result<Scene> {
        let image_ids: HashMap<&str, ImageId> = self
            .images
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.as_str(), ImageId(i)))
            .collect();

        let mut object_ids: HashMap<&str, ObjectId> = HashMap::new();
        for (i, object) in self.objects.iter().enumerate() {
            if object_ids.insert(object.name.as_str(), ObjectId(i)).is_some() {
                return Err(Error::invalid_scene(format!(
                    "duplicate object name '{}'",
                    object.name
                )));
            }
        }

        let lookup_object = |name: &str| {
            object_ids.get(name).copied().ok_or_else(|| Error::UnknownObject {
                name: name.to_string(),
            })
        };

        let objects = self
            .objects
            .iter()
            .map(|desc| {
                let parent = desc.parent.as_deref().map(lookup_object).transpose()?;
                let mesh = desc
                    .mesh
                    .as_ref()
                    .map(|m| m.resolve(&image_ids))
                    .transpose()?;
                let kind = match desc.kind.as_deref() {
                    Some(kind) => kind.parse().unwrap_or(ObjectKind::Mesh),
                    None if mesh.is_some() => ObjectKind::Mesh,
                    None => ObjectKind::Empty,
                };

                Ok(SceneObject {
                    name: desc.name.clone(),
                    kind,
                    transform: m3d_core::Transform::new(desc.location, desc.rotation, desc.scale),
                    parent,
                    mesh,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let selection = self
            .selection
            .iter()
            .map(|name| lookup_object(name))
            .collect::<Result<Vec<_>>>()?;

        Scene::from_parts(objects, self.images, selection)
    }
}

impl MeshDescription {
    fn resolve(&self, image_ids: &HashMap<&str, ImageId>) -> Result<MeshPayload> {
        let faces = self
            .faces
            .iter()
            .map(|face| {
                let image = face
                    .image
                    .as_deref()
                    .map(|name| {
                        image_ids.get(name).copied().ok_or_else(|| Error::UnknownImage {
                            name: name.to_string(),
                        })
                    })
                    .transpose()?;

                Ok(Face {
                    vertices: face.vertices,
                    normal: face.normal,
                    smooth: face.smooth,
                    material: face.material,
                    image,
                    uv: face.uv,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MeshPayload {
            vertices: self.vertices.clone(),
            faces,
            materials: self.materials.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SceneHost;

    const SHIP: &str = r#"{
        "images": [{ "name": "Hull", "filename": "/art/hull.png" }],
        "objects": [
            { "name": "Wing", "parent": "Ship", "location": [2, 0, 0],
              "mesh": { "vertices": [], "faces": [] } },
            { "name": "Ship",
              "mesh": {
                "vertices": [
                    { "position": [0, 0, 0], "normal": [0, 0, 1] },
                    { "position": [1, 0, 0], "normal": [0, 0, 1] },
                    { "position": [0, 1, 0], "normal": [0, 0, 1] }
                ],
                "faces": [{ "vertices": [0, 1, 2], "normal": [0, 0, 1],
                            "material": 0, "image": "Hull",
                            "uv": [[0, 0], [1, 0], [0, 1]] }],
                "materials": [{ "name": "Paint", "diffuse": [1, 0, 0] }]
              } },
            { "name": "Pivot" }
        ],
        "selection": ["Ship", "Wing"]
    }"#;

    #[test]
    fn test_resolves_names() {
        let scene = Scene::from_json_str(SHIP).unwrap();
        let ship = scene.find("Ship").unwrap();
        let wing = scene.find("Wing").unwrap();

        assert_eq!(scene.selected(), vec![ship, wing]);
        assert_eq!(scene.object(wing).unwrap().parent, Some(ship));
        assert_eq!(scene.children(ship), vec![wing]);

        let mesh = scene.object(ship).unwrap().mesh.as_ref().unwrap();
        assert_eq!(mesh.faces[0].image, Some(ImageId(0)));
        assert_eq!(mesh.materials[0].ambient, 0.5);
    }

    #[test]
    fn test_kind_defaults() {
        let scene = Scene::from_json_str(SHIP).unwrap();
        let pivot = scene.find("Pivot").unwrap();
        assert_eq!(scene.object(pivot).unwrap().kind, ObjectKind::Empty);
        assert_eq!(scene.object(pivot).unwrap().transform.scale, Vec3::ONE);
    }

    #[test]
    fn test_unknown_image() {
        let text = SHIP.replace("\"image\": \"Hull\"", "\"image\": \"Deck\"");
        let err = Scene::from_json_str(&text).unwrap_err();
        assert!(matches!(err, Error::UnknownImage { ref name } if name == "Deck"));
    }

    #[test]
    fn test_unknown_selection() {
        let text = SHIP.replace("\"selection\": [\"Ship\", \"Wing\"]", "\"selection\": [\"Tail\"]");
        let err = Scene::from_json_str(&text).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_explicit_mesh_kind_without_geometry() {
        let text = r#"{ "objects": [{ "name": "Ghost", "kind": "mesh" }] }"#;
        let err = Scene::from_json_str(text).unwrap_err();
        assert!(matches!(err, Error::InvalidMesh { .. }));
    }
}
