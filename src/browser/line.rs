use crate::results::{Node, ResultTree, TreeWalker};

/// Style tag for a rendered line. Carries no link back to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// First line of a peer: owner and speed.
    Header,
    Directory,
    File,
    /// Empty line closing a peer's block.
    Separator,
}

/// A pre-rendered, untruncated display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub text: String,
    pub kind: LineKind,
}

impl DisplayLine {
    pub fn separator() -> Self {
        Self {
            text: String::new(),
            kind: LineKind::Separator,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.kind == LineKind::Separator
    }
}

const INDENT: &str = "  ";

/// Header text for a peer block.
pub fn header_text(tree: &ResultTree) -> String {
    let noun = if tree.file_count == 1 { "file" } else { "files" };
    format!(
        "{}  {} kB/s  ({} {})",
        tree.owner(),
        tree.speed_kbps,
        tree.file_count,
        noun
    )
}

/// Append one line per node of `tree` (header first, pre-order after) and a
/// trailing separator. Returns the number of lines written.
pub fn flatten_into<'t>(
    tree: &'t ResultTree,
    walker: &mut TreeWalker<'t>,
    out: &mut Vec<DisplayLine>,
) -> usize {
    let start = out.len();
    out.push(DisplayLine {
        text: header_text(tree),
        kind: LineKind::Header,
    });

    walker.reset(&tree.root);
    while walker.advance() {
        let Some(node) = walker.current() else { break };
        let kind = match node {
            Node::File(_) => LineKind::File,
            Node::Directory(_) => LineKind::Directory,
        };
        let mut text = INDENT.repeat(walker.depth());
        text.push_str(node.name());
        out.push(DisplayLine { text, kind });
    }

    out.push(DisplayLine::separator());
    out.len() - start
}

/// Convenience wrapper returning a fresh line vector.
#[cfg(test)]
pub fn flatten(tree: &ResultTree) -> Vec<DisplayLine> {
    let mut lines = Vec::new();
    flatten_into(tree, &mut TreeWalker::new(), &mut lines);
    lines
}
