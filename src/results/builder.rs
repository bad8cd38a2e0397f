use super::node::{Directory, Node};
use super::path::{is_dir_segment, segments};
use super::tree::ResultTree;
use super::walker::TreeWalker;
use crate::error::ResultError;

/// Build the compacted directory tree for one peer's search response.
///
/// `paths` must be grouped so that paths sharing a directory prefix are
/// contiguous. Chains of directories that end up with a single directory
/// child are merged into one node whose name is the concatenated chain.
pub fn build_tree<I, S>(owner: &str, speed_kbps: u32, paths: I) -> Result<ResultTree, ResultError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = TreeBuilder::new(owner);
    for path in paths {
        let path = path.as_ref();
        if !is_well_formed(path) {
            return Err(ResultError::MalformedPath {
                owner: owner.to_string(),
                path: path.to_string(),
            });
        }
        builder.add_path(path);
    }
    if builder.paths == 0 {
        return Err(ResultError::EmptyResult {
            owner: owner.to_string(),
        });
    }

    let root = builder.finish();
    let file_count = TreeWalker::new().count_files(&root);
    Ok(ResultTree::new(root, speed_kbps, file_count))
}

/// A path must have at least one segment and end in a file name.
fn is_well_formed(path: &str) -> bool {
    segments(path).last().is_some_and(|last| !is_dir_segment(last))
}

struct TreeBuilder {
    root: Directory,
    /// Directories still accepting children; `open[d - 1]` sits at depth `d`.
    open: Vec<Directory>,
    paths: usize,
}

impl TreeBuilder {
    fn new(owner: &str) -> Self {
        Self {
            root: Directory::new(owner),
            open: Vec::with_capacity(8),
            paths: 0,
        }
    }

    fn add_path(&mut self, path: &str) {
        self.paths += 1;
        let mut segs = segments(path).peekable();

        let mut depth = 1;
        while depth <= self.open.len() {
            // Prefix rather than equality: an open name may already hold
            // several merged segments.
            let same_dir = segs
                .peek()
                .is_some_and(|seg| {
                    is_dir_segment(seg) && self.open[depth - 1].name.starts_with(*seg)
                });
            if !same_dir {
                self.finalize(depth);
                break;
            }
            segs.next();
            depth += 1;
        }

        for seg in segs {
            if is_dir_segment(seg) {
                self.open.push(Directory::new(seg));
            } else {
                self.innermost().children.push(Node::File(seg.to_string()));
            }
        }
    }

    fn innermost(&mut self) -> &mut Directory {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    /// Close every open directory at `from_depth` and below, compacting
    /// single-child chains top-down, and attach the result to its parent.
    fn finalize(&mut self, from_depth: usize) {
        let mut closing = self.open.split_off(from_depth - 1).into_iter();
        let Some(mut current) = closing.next() else {
            return;
        };

        let mut chain: Vec<Directory> = Vec::new();
        for next in closing {
            if current.children.is_empty() {
                // `next` is the only child: absorb it.
                current.name.push_str(&next.name);
                current.children = next.children;
            } else {
                chain.push(current);
                current = next;
            }
        }
        chain.push(current);

        while let Some(mut dir) = chain.pop() {
            dir.children.shrink_to_fit();
            let parent = match chain.last_mut() {
                Some(parent) => parent,
                None => self.innermost(),
            };
            parent.children.push(Node::Directory(dir));
        }
    }

    fn finish(mut self) -> Directory {
        self.finalize(1);
        self.root.children.shrink_to_fit();
        self.root
    }
}
