/// Directory separator used by remote peers. This is part of the wire
/// protocol, so it never follows the local platform's separator.
pub const SEPARATOR: char = '\\';

/// Iterator over the segments of a remote path.
///
/// Directory segments keep their trailing separator (`"music\\"`), the final
/// segment is the bare file name. Concatenating every segment yields the
/// original path again.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    path: &'a str,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.pos >= self.path.len() {
            return None;
        }
        let start = self.pos;
        self.pos = next_segment_end(self.path, start);
        Some(&self.path[start..self.pos])
    }
}

/// Split `path` into segments at [`SEPARATOR`].
pub fn segments(path: &str) -> Segments<'_> {
    Segments { path, pos: 0 }
}

/// Returns one past the next separator at or after `start`, or the end of
/// the string.
pub fn next_segment_end(path: &str, start: usize) -> usize {
    path[start..]
        .find(SEPARATOR)
        .map(|i| start + i + SEPARATOR.len_utf8())
        .unwrap_or(path.len())
}

/// Whether a segment names a directory (ends with the separator).
pub fn is_dir_segment(segment: &str) -> bool {
    segment.ends_with(SEPARATOR)
}
