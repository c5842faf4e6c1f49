//! In-memory scene graph

use std::collections::HashMap;
use std::path::Path;

use m3d_core::{Error, Result, ResultExt};
use tracing::debug;

use crate::description::SceneDescription;
use crate::host::SceneHost;
use crate::mesh::Texture;
use crate::object::{ImageId, ObjectId, SceneObject};

/// Owns every object and image of a scene plus the current selection
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    images: Vec<Texture>,
    selection: Vec<ObjectId>,
    /// Direct children per object, in insertion order
    children: Vec<Vec<ObjectId>>,
    /// Object name to id
    by_name: HashMap<String, ObjectId>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from already-resolved parts.
    ///
    /// Fails on duplicate object names, dangling parent/image/selection ids,
    /// parent cycles and mesh objects without geometry.
    pub fn from_parts(
        objects: Vec<SceneObject>,
        images: Vec<Texture>,
        selection: Vec<ObjectId>,
    ) -> Result<Self> {
        let mut scene = Scene {
            images,
            ..Scene::default()
        };

        for object in objects {
            scene.insert_unchecked(object)?;
        }

        for (index, object) in scene.objects.iter().enumerate() {
            if let Some(parent) = object.parent {
                if parent.index() >= scene.objects.len() {
                    return Err(Error::invalid_scene(format!(
                        "object '{}' has dangling parent {}",
                        object.name, parent
                    )));
                }
                if parent.index() == index {
                    return Err(Error::invalid_scene(format!(
                        "object '{}' is its own parent",
                        object.name
                    )));
                }
            }
        }

        scene.check_acyclic()?;
        scene.rebuild_children();

        for id in selection {
            if scene.object(id).is_none() {
                return Err(Error::UnknownObject { name: id.to_string() });
            }
            scene.select(id);
        }

        scene.validate_meshes()?;
        Ok(scene)
    }

    /// Load a JSON scene description from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).with_context(|| format!("loading scene {}", path.display()))
    }

    /// Parse a JSON scene description
    pub fn from_json_str(text: &str) -> Result<Self> {
        let description: SceneDescription = serde_json::from_str(text)?;
        description.into_scene()
    }

    /// Add an object. Its parent, if any, must already be in the scene.
    pub fn add_object(&mut self, object: SceneObject) -> Result<ObjectId> {
        if let Some(parent) = object.parent {
            if parent.index() >= self.objects.len() {
                return Err(Error::UnknownObject { name: parent.to_string() });
            }
        }
        if object.is_mesh() {
            let mesh = object
                .mesh
                .as_ref()
                .ok_or_else(|| Error::invalid_mesh(&object.name, "mesh object has no geometry"))?;
            mesh.validate(&object.name, |image| image.index() < self.images.len())?;
        }

        let parent = object.parent;
        let id = self.insert_unchecked(object)?;
        self.children.push(Vec::new());
        if let Some(parent) = parent {
            self.children[parent.index()].push(id);
        }
        Ok(id)
    }

    /// Add a texture image
    pub fn add_image(&mut self, texture: Texture) -> ImageId {
        self.images.push(texture);
        ImageId(self.images.len() - 1)
    }

    /// Append to the selection; selecting twice has no effect
    pub fn select(&mut self, id: ObjectId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Replace the selection with the named objects
    pub fn select_by_name<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let ids = names
            .iter()
            .map(|name| {
                self.find(name.as_ref()).ok_or_else(|| Error::UnknownObject {
                    name: name.as_ref().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.selection.clear();
        for id in ids {
            self.select(id);
        }
        Ok(())
    }

    /// Look up an object id by name
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.by_name.get(name).copied()
    }

    /// All objects with their ids
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    /// Objects without a parent
    pub fn roots(&self) -> Vec<ObjectId> {
        self.objects()
            .filter(|(_, o)| o.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn images(&self) -> &[Texture] {
        &self.images
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn insert_unchecked(&mut self, object: SceneObject) -> Result<ObjectId> {
        if self.by_name.contains_key(&object.name) {
            return Err(Error::invalid_scene(format!(
                "duplicate object name '{}'",
                object.name
            )));
        }
        let id = ObjectId(self.objects.len());
        self.by_name.insert(object.name.clone(), id);
        debug!(name = %object.name, kind = %object.kind, "Adding scene object");
        self.objects.push(object);
        Ok(id)
    }

    fn rebuild_children(&mut self) {
        self.children = vec![Vec::new(); self.objects.len()];
        for (index, object) in self.objects.iter().enumerate() {
            if let Some(parent) = object.parent {
                self.children[parent.index()].push(ObjectId(index));
            }
        }
    }

    fn check_acyclic(&self) -> Result<()> {
        for (index, object) in self.objects.iter().enumerate() {
            let mut steps = 0;
            let mut current = object.parent;
            while let Some(parent) = current {
                steps += 1;
                if parent.index() == index || steps > self.objects.len() {
                    return Err(Error::invalid_scene(format!(
                        "parent cycle through object '{}'",
                        object.name
                    )));
                }
                current = self.objects[parent.index()].parent;
            }
        }
        Ok(())
    }

    fn validate_meshes(&self) -> Result<()> {
        for object in self.objects.iter().filter(|o| o.is_mesh()) {
            let mesh = object
                .mesh
                .as_ref()
                .ok_or_else(|| Error::invalid_mesh(&object.name, "mesh object has no geometry"))?;
            mesh.validate(&object.name, |image| image.index() < self.images.len())?;
        }
        Ok(())
    }
}

impl SceneHost for Scene {
    fn selected(&self) -> Vec<ObjectId> {
        self.selection.clone()
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.index())
    }

    fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.children.get(id.index()).cloned().unwrap_or_default()
    }

    fn image(&self, id: ImageId) -> Option<&Texture> {
        self.images.get(id.index())
    }
}
