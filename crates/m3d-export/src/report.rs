//! Per-object export results

use std::path::PathBuf;

use m3d_core::Result;
use m3d_scene::ObjectId;

/// Counts of what was written for one root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// `<Mesh>` elements, nested ones included
    pub meshes: usize,
    pub vertices: usize,
    pub faces: usize,
    pub materials: usize,
    pub textures: usize,
}

impl ExportStats {
    pub fn merge(&mut self, other: &ExportStats) {
        self.meshes += other.meshes;
        self.vertices += other.vertices;
        self.faces += other.faces;
        self.materials += other.materials;
        self.textures += other.textures;
    }
}

/// Result of exporting one root object
#[derive(Debug)]
pub struct ObjectOutcome {
    pub object: ObjectId,
    pub name: String,
    /// Output file, or the output directory when the name was rejected
    pub path: PathBuf,
    pub result: Result<ExportStats>,
}

impl ObjectOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of a batch export
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<ObjectOutcome>,
    /// The host had nothing selected; no files were written
    pub nothing_selected: bool,
}

impl ExportReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ObjectOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ObjectOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// True when no root failed
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ObjectOutcome::is_success)
    }

    /// Stats summed over successful roots
    pub fn totals(&self) -> ExportStats {
        let mut totals = ExportStats::default();
        for stats in self.outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
            totals.merge(stats);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use m3d_core::Error;

    fn outcome(name: &str, result: Result<ExportStats>) -> ObjectOutcome {
        ObjectOutcome {
            object: ObjectId(0),
            name: name.to_string(),
            path: PathBuf::from(format!("{}.xml", name)),
            result,
        }
    }

    #[test]
    fn test_report_partitions() {
        let stats = ExportStats {
            meshes: 2,
            vertices: 8,
            faces: 12,
            materials: 1,
            textures: 0,
        };
        let report = ExportReport {
            outcomes: vec![
                outcome("Cube", Ok(stats)),
                outcome("Broken", Err(Error::invalid_mesh("Broken", "bad index"))),
                outcome("Cube2", Ok(stats)),
            ],
            nothing_selected: false,
        };

        assert!(!report.is_success());
        assert_eq!(report.succeeded().count(), 2);
        assert_eq!(report.failed().next().unwrap().name, "Broken");
        assert_eq!(report.totals().faces, 24);
        assert_eq!(report.totals().meshes, 4);
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = ExportReport::default();
        assert!(report.is_success());
        assert_eq!(report.totals(), ExportStats::default());
    }
}
