//! m3d XML exporter implementation

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use m3d_core::{Error, Result};
use m3d_scene::{Material, MeshPayload, ObjectId, SceneHost};
use tracing::{debug, info, warn};

use super::plan::{ExportPlan, PlanNode};
use super::writer::XmlWriter;
use super::{Escaped, Fixed, IndexOrNone};
use crate::coords::remap;
use crate::options::ExportOptions;
use crate::report::{ExportReport, ExportStats, ObjectOutcome};
use crate::textures::TextureTable;
use crate::transform::resolve_transform;

/// Scene to m3d XML exporter
#[derive(Debug, Clone, Default)]
pub struct MeshXmlExporter {
    options: ExportOptions,
}

impl MeshXmlExporter {
    /// Create a new exporter
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Work out the roots and nesting for the host's selection
    pub fn plan<H: SceneHost + ?Sized>(&self, host: &H) -> ExportPlan {
        ExportPlan::build(host, self.options.child_policy)
    }

    /// Export every root of the selection to `<name>.<extension>` in `out_dir`.
    ///
    /// A failing root is recorded in the report and the remaining roots are
    /// still exported.
    pub fn export_selection<H: SceneHost + ?Sized>(
        &self,
        host: &H,
        out_dir: impl AsRef<Path>,
    ) -> ExportReport {
        let out_dir = out_dir.as_ref();
        let plan = self.plan(host);

        if plan.nothing_selected {
            info!("Nothing selected");
            return ExportReport {
                outcomes: Vec::new(),
                nothing_selected: true,
            };
        }

        let mut outcomes = Vec::with_capacity(plan.roots.len());
        for root in &plan.roots {
            let (path, result) = match self.file_name(&root.name) {
                Ok(file_name) => {
                    let path = out_dir.join(file_name);
                    info!(name = %root.name, path = %path.display(), meshes = root.mesh_count(), "Exporting");
                    let result = self.export_file(host, root, &path);
                    (path, result)
                }
                Err(e) => (out_dir.to_path_buf(), Err(e)),
            };

            match &result {
                Ok(stats) => info!(
                    name = %root.name,
                    meshes = stats.meshes,
                    vertices = stats.vertices,
                    faces = stats.faces,
                    "Export complete"
                ),
                Err(e) => warn!(name = %root.name, error = %e, "Export failed"),
            }

            outcomes.push(ObjectOutcome {
                object: root.id,
                name: root.name.clone(),
                path,
                result,
            });
        }

        ExportReport {
            outcomes,
            nothing_selected: false,
        }
    }

    /// Output file name for a root, `<name>.<extension>`.
    ///
    /// Names that are not a plain file name are rejected so every file
    /// lands inside the output directory.
    pub fn file_name(&self, name: &str) -> Result<String> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Error::ExportFailed {
                object: name.to_string(),
                message: "name cannot be used as a file name".to_string(),
            });
        }
        Ok(format!("{}.{}", name, self.options.extension))
    }

    /// Check every mesh of a planned root without writing anything
    pub fn check<H: SceneHost + ?Sized>(&self, host: &H, root: &PlanNode) -> Result<()> {
        for node in root.walk() {
            let object = host
                .object(node.id)
                .ok_or_else(|| Error::UnknownObject { name: node.id.to_string() })?;
            if !object.is_mesh() {
                return Err(Error::ExportFailed {
                    object: object.name.clone(),
                    message: format!("not a mesh ({})", object.kind),
                });
            }
            let mesh = object
                .mesh
                .as_ref()
                .ok_or_else(|| Error::invalid_mesh(&object.name, "mesh object has no geometry"))?;
            mesh.validate(&object.name, |image| host.image(image).is_some())?;
        }
        Ok(())
    }

    /// Export one root (and its nested children) to any sink
    pub fn export_object<H: SceneHost + ?Sized, W: Write>(
        &self,
        host: &H,
        root: ObjectId,
        sink: W,
    ) -> Result<ExportStats> {
        let node = ExportPlan::single(host, root, self.options.child_policy);
        self.check(host, &node)?;
        self.write_document(host, &node, sink)
    }

    /// Export one root into a string
    pub fn export_to_string<H: SceneHost + ?Sized>(&self, host: &H, root: ObjectId) -> Result<String> {
        let mut buffer = Vec::new();
        self.export_object(host, root, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::ExportFailed {
            object: root.to_string(),
            message: e.to_string(),
        })
    }

    fn export_file<H: SceneHost + ?Sized>(
        &self,
        host: &H,
        node: &PlanNode,
        path: &Path,
    ) -> Result<ExportStats> {
        self.check(host, node)?;

        let file = File::create(path)
            .map_err(|e| Error::from(e).with_context(format!("creating {}", path.display())))?;
        self.write_document(host, node, BufWriter::new(file))
    }

    fn write_document<H: SceneHost + ?Sized, W: Write>(
        &self,
        host: &H,
        node: &PlanNode,
        sink: W,
    ) -> Result<ExportStats> {
        let mut writer = XmlWriter::new(sink);
        let mut stats = ExportStats::default();

        writer.declaration()?;
        self.write_mesh(host, node, &mut writer, &mut stats)?;
        writer.flush()?;

        Ok(stats)
    }

    fn write_mesh<H: SceneHost + ?Sized, W: Write>(
        &self,
        host: &H,
        node: &PlanNode,
        w: &mut XmlWriter<W>,
        stats: &mut ExportStats,
    ) -> Result<()> {
        let object = host
            .object(node.id)
            .ok_or_else(|| Error::UnknownObject { name: node.id.to_string() })?;
        let mesh = object
            .mesh
            .as_ref()
            .ok_or_else(|| Error::invalid_mesh(&object.name, "mesh object has no geometry"))?;

        if w.depth() > 0 {
            debug!(name = %object.name, depth = w.depth(), "Exporting nested mesh");
        }

        let transform = resolve_transform(host, node.id, self.options.transform_mode)?;
        let location = remap(transform.location);
        let scale = transform.scale;
        let q = transform.quaternion;

        w.line(format_args!(
            "<Mesh name=\"{}\" numVertices=\"{}\" numFaces=\"{}\" x=\"{}\" y=\"{}\" z=\"{}\" sx=\"{}\" sy=\"{}\" sz=\"{}\" qw=\"{}\" qx=\"{}\" qy=\"{}\" qz=\"{}\">",
            Escaped(&object.name),
            mesh.vertex_count(),
            mesh.face_count(),
            Fixed::geometry(location.x),
            Fixed::geometry(location.y),
            Fixed::geometry(location.z),
            Fixed::geometry(scale.x),
            Fixed::geometry(scale.y),
            Fixed::geometry(scale.z),
            Fixed::geometry(q.w),
            Fixed::geometry(q.x),
            Fixed::geometry(q.y),
            Fixed::geometry(q.z),
        ))?;

        let textures = TextureTable::collect(mesh);

        w.nested(|w| -> Result<()> {
            for material in &mesh.materials {
                write_material(w, material)?;
            }
            if !mesh.materials.is_empty() {
                w.blank()?;
            }

            for &image in textures.images() {
                let texture = host.image(image).ok_or_else(|| Error::UnknownImage {
                    name: image.index().to_string(),
                })?;
                w.line(format_args!("<Texture name=\"{}\" units=\"1\">", Escaped(&texture.name)))?;
                w.nested(|w| {
                    w.line(format_args!(
                        "<Image filename=\"{}\"/>",
                        Escaped(texture.base_filename())
                    ))
                })?;
                w.line(format_args!("</Texture>"))?;
            }
            if !textures.is_empty() {
                w.blank()?;
            }

            write_vertices(w, mesh)?;
            write_faces(w, mesh, &textures)?;

            for child in &node.children {
                self.write_mesh(host, child, w, stats)?;
            }
            Ok(())
        })?;

        w.line(format_args!("</Mesh>"))?;
        w.blank()?;

        stats.meshes += 1;
        stats.vertices += mesh.vertex_count();
        stats.faces += mesh.face_count();
        stats.materials += mesh.materials.len();
        stats.textures += textures.len();

        Ok(())
    }
}

fn write_material<W: Write>(w: &mut XmlWriter<W>, material: &Material) -> Result<()> {
    let diffuse = material.diffuse;
    let ambient = material.ambient_color();
    let specular = material.specular;

    w.line(format_args!(
        "<Material name=\"{}\" diffuseR=\"{}\" diffuseG=\"{}\" diffuseB=\"{}\" ambientR=\"{}\" ambientG=\"{}\" ambientB=\"{}\" specularR=\"{}\" specularG=\"{}\" specularB=\"{}\" shininess=\"{}\"/>",
        Escaped(&material.name),
        Fixed::color(diffuse.r),
        Fixed::color(diffuse.g),
        Fixed::color(diffuse.b),
        Fixed::color(ambient.r),
        Fixed::color(ambient.g),
        Fixed::color(ambient.b),
        Fixed::color(specular.r),
        Fixed::color(specular.g),
        Fixed::color(specular.b),
        Fixed::color(material.shininess),
    ))?;
    Ok(())
}

fn write_vertices<W: Write>(w: &mut XmlWriter<W>, mesh: &MeshPayload) -> Result<()> {
    for vertex in &mesh.vertices {
        let p = remap(vertex.position);
        let n = remap(vertex.normal);
        w.line(format_args!(
            "<Vertex x=\"{}\" y=\"{}\" z=\"{}\" nx=\"{}\" ny=\"{}\" nz=\"{}\"/>",
            Fixed::geometry(p.x),
            Fixed::geometry(p.y),
            Fixed::geometry(p.z),
            Fixed::geometry(n.x),
            Fixed::geometry(n.y),
            Fixed::geometry(n.z),
        ))?;
    }
    if !mesh.vertices.is_empty() {
        w.blank()?;
    }
    Ok(())
}

fn write_faces<W: Write>(
    w: &mut XmlWriter<W>,
    mesh: &MeshPayload,
    textures: &TextureTable,
) -> Result<()> {
    let material_count = mesh.materials.len();

    for face in &mesh.faces {
        let n = remap(face.normal);
        let texture = face.image.and_then(|image| textures.index_of(image));
        let uvs = texture.and(face.textured_uvs());

        w.line(format_args!(
            "<Face smooth=\"{}\" nx=\"{}\" ny=\"{}\" nz=\"{}\" texture=\"{}\" material=\"{}\">",
            u8::from(face.smooth),
            Fixed::geometry(n.x),
            Fixed::geometry(n.y),
            Fixed::geometry(n.z),
            IndexOrNone(texture),
            IndexOrNone(face.material_index(material_count)),
        ))?;

        w.nested(|w| -> Result<()> {
            for (corner, &index) in face.vertices.iter().enumerate() {
                match uvs {
                    Some(uvs) => {
                        let uv = uvs[corner].flip_v();
                        w.line(format_args!(
                            "<Vertex index=\"{}\" u=\"{}\" v=\"{}\"/>",
                            index,
                            Fixed::uv(uv.u),
                            Fixed::uv(uv.v),
                        ))?;
                    }
                    // space before "/>" kept for byte-identical output
                    None => w.line(format_args!("<Vertex index=\"{}\" />", index))?,
                }
            }
            Ok(())
        })?;

        w.line(format_args!("</Face>"))?;
    }
    Ok(())
}
