use super::node::{Directory, Node};

/// Pre-order, depth-first cursor over a [`Directory`].
///
/// Keeps an explicit stack of `(siblings, next index)` frames instead of
/// recursing. The frame buffer survives [`TreeWalker::reset`], so one walker
/// can be reused for every tree rendered in a pass without reallocating.
#[derive(Debug, Default)]
pub struct TreeWalker<'t> {
    frames: Vec<(&'t [Node], usize)>,
    current: Option<&'t Node>,
}

impl<'t> TreeWalker<'t> {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(16),
            current: None,
        }
    }

    /// Restart the traversal at `root`. The root itself is not visited; the
    /// first call to [`advance`](Self::advance) lands on its first child.
    pub fn reset(&mut self, root: &'t Directory) {
        self.frames.clear();
        self.frames.push((&root.children, 0));
        self.current = None;
    }

    /// Step to the next node in pre-order. Returns `false` once the walk has
    /// climbed back out of the root.
    pub fn advance(&mut self) -> bool {
        if let Some(Node::Directory(dir)) = self.current {
            self.frames.push((&dir.children, 0));
        }
        loop {
            let Some(frame) = self.frames.last_mut() else {
                self.current = None;
                return false;
            };
            let siblings: &'t [Node] = frame.0;
            if frame.1 < siblings.len() {
                let node = &siblings[frame.1];
                frame.1 += 1;
                self.current = Some(node);
                return true;
            }
            self.frames.pop();
        }
    }

    /// Node under the cursor, `None` before the first advance and after the end.
    pub fn current(&self) -> Option<&'t Node> {
        self.current
    }

    /// Nesting level of the current node; the root's children are at depth 1.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of files below `root`.
    pub fn count_files(&mut self, root: &'t Directory) -> usize {
        self.reset(root);
        let mut count = 0;
        while self.advance() {
            if matches!(self.current, Some(Node::File(_))) {
                count += 1;
            }
        }
        count
    }
}
