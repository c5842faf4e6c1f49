//! Which objects are exported, and where they nest

use std::collections::HashSet;

use m3d_scene::{ObjectId, SceneHost};
use tracing::{debug, warn};

use crate::options::ChildPolicy;

/// A mesh to export together with the meshes nested inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanNode {
    pub id: ObjectId,
    pub name: String,
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    /// Number of meshes in this subtree, including this one
    pub fn mesh_count(&self) -> usize {
        1 + self.children.iter().map(PlanNode::mesh_count).sum::<usize>()
    }

    /// Pre-order walk over the subtree
    pub fn walk(&self) -> Vec<&PlanNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }
}

/// Export roots in selection order. Every object appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPlan {
    pub roots: Vec<PlanNode>,
    /// The host had nothing selected
    pub nothing_selected: bool,
}

impl ExportPlan {
    /// Build the plan for the host's current selection
    pub fn build<H: SceneHost + ?Sized>(host: &H, policy: ChildPolicy) -> Self {
        let selected = host.selected();
        if selected.is_empty() {
            return Self {
                roots: Vec::new(),
                nothing_selected: true,
            };
        }

        let selection: HashSet<ObjectId> = selected.iter().copied().collect();
        let mut visited = HashSet::new();
        let mut roots = Vec::new();

        for id in selected {
            let Some(object) = host.object(id) else {
                warn!(object = %id, "Selected object not found in host");
                continue;
            };
            if !object.is_mesh() || visited.contains(&id) {
                continue;
            }
            if is_nested(host, id, &selection, policy) {
                debug!(name = %object.name, "Exported inside its parent");
                continue;
            }
            roots.push(plan_subtree(host, id, &selection, policy, &mut visited));
        }

        Self {
            roots,
            nothing_selected: false,
        }
    }

    /// Plan a single root regardless of the selection's other roots
    pub fn single<H: SceneHost + ?Sized>(host: &H, root: ObjectId, policy: ChildPolicy) -> PlanNode {
        let selection: HashSet<ObjectId> = host.selected().into_iter().collect();
        plan_subtree(host, root, &selection, policy, &mut HashSet::new())
    }

    /// Total meshes across all roots
    pub fn mesh_count(&self) -> usize {
        self.roots.iter().map(PlanNode::mesh_count).sum()
    }
}

fn eligible_child<H: SceneHost + ?Sized>(
    host: &H,
    id: ObjectId,
    selection: &HashSet<ObjectId>,
    policy: ChildPolicy,
) -> bool {
    let is_mesh = host.object(id).is_some_and(|o| o.is_mesh());
    match policy {
        ChildPolicy::Selected => is_mesh && selection.contains(&id),
        ChildPolicy::All => is_mesh,
    }
}

/// Whether `id` will be written inside an ancestor's element
fn is_nested<H: SceneHost + ?Sized>(
    host: &H,
    id: ObjectId,
    selection: &HashSet<ObjectId>,
    policy: ChildPolicy,
) -> bool {
    match policy {
        ChildPolicy::Selected => host
            .object(id)
            .and_then(|o| o.parent)
            .is_some_and(|parent| eligible_child(host, parent, selection, policy)),
        ChildPolicy::All => {
            for ancestor in host.ancestors(id) {
                match host.object(ancestor) {
                    Some(object) if object.is_mesh() => {
                        if selection.contains(&ancestor) {
                            return true;
                        }
                    }
                    _ => return false,
                }
            }
            false
        }
    }
}

fn plan_subtree<H: SceneHost + ?Sized>(
    host: &H,
    id: ObjectId,
    selection: &HashSet<ObjectId>,
    policy: ChildPolicy,
    visited: &mut HashSet<ObjectId>,
) -> PlanNode {
    visited.insert(id);
    let name = host.object(id).map(|o| o.name.clone()).unwrap_or_default();

    let mut children = Vec::new();
    for child in host.children(id) {
        if visited.contains(&child) || !eligible_child(host, child, selection, policy) {
            continue;
        }
        children.push(plan_subtree(host, child, selection, policy, visited));
    }

    PlanNode { id, name, children }
}
