//! Read-only host interface the exporter is driven through

use crate::mesh::Texture;
use crate::object::{ImageId, ObjectId, SceneObject};

/// Capabilities a host environment provides to the exporter.
///
/// Implementations are never mutated by an export.
pub trait SceneHost {
    /// Currently selected objects, in host order
    fn selected(&self) -> Vec<ObjectId>;

    /// Look up an object
    fn object(&self, id: ObjectId) -> Option<&SceneObject>;

    /// Direct children of an object, in host order
    fn children(&self, id: ObjectId) -> Vec<ObjectId>;

    /// Look up a texture image
    fn image(&self, id: ImageId) -> Option<&Texture>;

    /// Parent chain of an object, nearest ancestor first.
    ///
    /// Stops at the first dangling parent reference, and after visiting as
    /// many ancestors as a well-formed chain can have, so a cyclic host
    /// cannot hang the walk.
    fn ancestors(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut chain = Vec::new();
        let mut current = self.object(id).and_then(|o| o.parent);

        while let Some(parent) = current {
            if parent == id || chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.object(parent).and_then(|o| o.parent);
        }

        chain
    }

    /// Whether `id` is part of the current selection
    fn is_selected(&self, id: ObjectId) -> bool {
        self.selected().contains(&id)
    }
}
