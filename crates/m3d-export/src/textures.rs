//! Per-mesh texture table

use m3d_scene::{ImageId, MeshPayload};

/// Distinct images referenced by a mesh's faces, in first-seen order.
///
/// Meshes are small and rarely use more than a handful of images, so a
/// linear scan is used for lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureTable {
    images: Vec<ImageId>,
}

impl TextureTable {
    /// Collect the images of all faces. Meshes without any texture
    /// coordinates contribute no textures.
    pub fn collect(mesh: &MeshPayload) -> Self {
        let mut table = Self::default();
        if !mesh.has_face_uvs() {
            return table;
        }

        for image in mesh.faces.iter().filter_map(|f| f.image) {
            if !table.images.contains(&image) {
                table.images.push(image);
            }
        }
        table
    }

    /// Position of an image in the table
    pub fn index_of(&self, image: ImageId) -> Option<usize> {
        self.images.iter().position(|&i| i == image)
    }

    pub fn images(&self) -> &[ImageId] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
