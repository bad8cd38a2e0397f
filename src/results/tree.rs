use super::node::{Directory, Node, NodeKind};
use super::walker::TreeWalker;

/// One peer's search response as a compacted tree. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTree {
    /// Root directory; its name is the peer's user name.
    pub root: Directory,
    /// Advertised upload speed, the sole sort key.
    pub speed_kbps: u32,
    pub file_count: usize,
}

/// A node picked out of a tree by its pre-order index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedEntry {
    /// Remote path relative to the peer; empty for the root itself.
    pub path: String,
    pub kind: NodeKind,
}

impl ResultTree {
    pub fn new(root: Directory, speed_kbps: u32, file_count: usize) -> Self {
        Self {
            root,
            speed_kbps,
            file_count,
        }
    }

    pub fn owner(&self) -> &str {
        &self.root.name
    }

    /// Reconstruct the remote path of the `index`-th node in pre-order, where
    /// index 0 is the root.
    pub fn entry_at<'t>(&'t self, index: usize, walker: &mut TreeWalker<'t>) -> Option<SelectedEntry> {
        let (path, node) = self.locate(index, walker)?;
        let kind = node.map_or(NodeKind::Directory, Node::kind);
        Some(SelectedEntry { path, kind })
    }

    /// Every file path at or below the `index`-th node.
    pub fn files_under<'t>(&'t self, index: usize, walker: &mut TreeWalker<'t>) -> Vec<String> {
        let Some((prefix, node)) = self.locate(index, walker) else {
            return Vec::new();
        };
        let dir = match node {
            None => &self.root,
            Some(Node::Directory(dir)) => dir,
            Some(Node::File(_)) => return vec![prefix],
        };

        let mut files = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        walker.reset(dir);
        while walker.advance() {
            let Some(node) = walker.current() else { break };
            names.truncate(walker.depth() - 1);
            names.push(node.name());
            if let Node::File(_) = node {
                let mut path = prefix.clone();
                path.extend(names.iter().copied());
                files.push(path);
            }
        }
        files
    }

    /// Path and node at `index`; a `None` node means the root.
    fn locate<'t>(&'t self, index: usize, walker: &mut TreeWalker<'t>) -> Option<(String, Option<&'t Node>)> {
        if index == 0 {
            return Some((String::new(), None));
        }

        let mut names: Vec<&str> = Vec::new();
        walker.reset(&self.root);
        for _ in 0..index {
            if !walker.advance() {
                return None;
            }
            let node = walker.current()?;
            names.truncate(walker.depth() - 1);
            names.push(node.name());
        }
        Some((names.concat(), walker.current()))
    }
}
