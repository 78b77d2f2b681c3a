use relative_path::{RelativePath, RelativePathBuf};
use serde::Serialize;
use std::collections::BTreeSet;

use super::ProjectStructure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A node of the generated project's directory tree.
///
/// Folders keep their children in insertion order; files carry their content.
/// `is_new` only marks nodes for highlighting in a UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectNode {
    pub name: String,
    pub path: RelativePathBuf,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProjectNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub is_new: bool,
}

impl ProjectNode {
    pub fn new_folder(name: String, path: RelativePathBuf) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::Folder,
            children: Vec::new(),
            content: None,
            is_new: true,
        }
    }

    pub fn new_file(name: String, path: RelativePathBuf, content: String) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::File,
            children: Vec::new(),
            content: Some(content),
            is_new: true,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Insert a file below this node, creating intermediate folders on demand.
    ///
    /// Folders are reused when a child with the same name and kind exists. A
    /// file whose path is already present has its content replaced.
    pub fn insert_file(&mut self, relative_path: &RelativePath, content: &str) {
        let segments: Vec<&str> = relative_path
            .as_str()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        self.insert_segments(&segments, content);
    }

    fn insert_segments(&mut self, segments: &[&str], content: &str) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };
        let child_path = self.path.join(first);

        if rest.is_empty() {
            match self.child_mut(first, NodeKind::File) {
                Some(existing) => existing.content = Some(content.to_string()),
                None => self.children.push(ProjectNode::new_file(
                    first.to_string(),
                    child_path,
                    content.to_string(),
                )),
            }
            return;
        }

        if self.child_mut(first, NodeKind::Folder).is_none() {
            self.children
                .push(ProjectNode::new_folder(first.to_string(), child_path));
        }
        if let Some(folder) = self.child_mut(first, NodeKind::Folder) {
            folder.insert_segments(rest, content);
        }
    }

    fn child_mut(&mut self, name: &str, kind: NodeKind) -> Option<&mut ProjectNode> {
        self.children
            .iter_mut()
            .find(|c| c.name == name && c.kind == kind)
    }

    /// Depth-first lookup of a file node by its path.
    pub fn find_file(&self, path: &RelativePath) -> Option<&ProjectNode> {
        if self.kind == NodeKind::File {
            return (self.path.as_relative_path() == path).then_some(self);
        }
        self.children.iter().find_map(|c| c.find_file(path))
    }

    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Folder => self.children.iter().map(ProjectNode::file_count).sum(),
        }
    }

    fn flatten_into(
        &self,
        depth: usize,
        expanded: &BTreeSet<RelativePathBuf>,
        items: &mut Vec<ProjectTreeItem>,
    ) {
        let is_expanded = self.is_folder() && expanded.contains(&self.path);
        items.push(ProjectTreeItem {
            node: self.clone(),
            depth,
            is_expanded,
        });

        if is_expanded {
            // Folders first, then files, both case-insensitive alphabetically
            let mut sorted_children: Vec<_> = self.children.iter().collect();
            sorted_children.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            });

            for child in sorted_children {
                child.flatten_into(depth + 1, expanded, items);
            }
        }
    }
}

/// Assemble the directory tree for a detected project.
///
/// The root folder is named after the project and has an empty path; every
/// other node's path is relative to it.
pub fn build_tree(structure: &ProjectStructure) -> ProjectNode {
    let mut root = ProjectNode::new_folder(structure.name.clone(), RelativePathBuf::new());
    for file in &structure.files {
        root.insert_file(&file.path, &file.content);
    }
    root
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTreeItem {
    pub node: ProjectNode,
    pub depth: usize,
    pub is_expanded: bool,
}

/// Browsable view over a [`ProjectNode`] tree, tracking which folders are open.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTree {
    pub root: ProjectNode,
    expanded: BTreeSet<RelativePathBuf>,
}

impl ProjectTree {
    /// Wrap a tree with the root expanded and everything else collapsed.
    pub fn new(root: ProjectNode) -> Self {
        let mut expanded = BTreeSet::new();
        expanded.insert(root.path.clone());
        Self { root, expanded }
    }

    /// Wrap a tree with every folder expanded.
    pub fn fully_expanded(root: ProjectNode) -> Self {
        let mut expanded = BTreeSet::new();
        collect_folders(&root, &mut expanded);
        Self { root, expanded }
    }

    pub fn is_expanded(&self, path: &RelativePath) -> bool {
        self.expanded.contains(path)
    }

    pub fn toggle_folder(&mut self, path: &RelativePath) {
        if !self.expanded.remove(path) {
            self.expand_folder(path);
        }
    }

    pub fn expand_folder(&mut self, path: &RelativePath) {
        self.expanded.insert(path.to_relative_path_buf());
    }

    pub fn collapse_folder(&mut self, path: &RelativePath) {
        self.expanded.remove(path);
    }

    /// Visible nodes in display order.
    pub fn get_items(&self) -> Vec<ProjectTreeItem> {
        let mut items = Vec::new();
        self.root.flatten_into(0, &self.expanded, &mut items);
        items
    }
}

fn collect_folders(node: &ProjectNode, out: &mut BTreeSet<RelativePathBuf>) {
    if node.is_folder() {
        out.insert(node.path.clone());
        for child in &node.children {
            collect_folders(child, out);
        }
    }
}
