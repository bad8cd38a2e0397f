use crate::results::ResultTree;

/// Peers ordered by descending advertised speed; ties keep arrival order.
#[derive(Debug, Default)]
pub struct ResultSet {
    trees: Vec<ResultTree>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `tree` after every entry at least as fast, returning its index.
    pub fn insert(&mut self, tree: ResultTree) -> usize {
        let pos = self
            .trees
            .partition_point(|t| t.speed_kbps >= tree.speed_kbps);
        self.trees.insert(pos, tree);
        pos
    }

    pub fn clear(&mut self) {
        self.trees.clear();
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResultTree> {
        self.trees.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultTree> {
        self.trees.iter()
    }

    pub fn total_files(&self) -> usize {
        self.iter().map(|t| t.file_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::build_tree;

    fn peer(owner: &str, speed: u32) -> ResultTree {
        build_tree(owner, speed, ["f.flac"]).unwrap()
    }

    fn speeds(set: &ResultSet) -> Vec<u32> {
        set.iter().map(|t| t.speed_kbps).collect()
    }

    #[test]
    fn sorts_by_descending_speed() {
        let mut set = ResultSet::new();
        assert_eq!(set.insert(peer("a", 50)), 0);
        assert_eq!(set.insert(peer("b", 200)), 0);
        assert_eq!(set.insert(peer("c", 100)), 1);
        assert_eq!(speeds(&set), vec![200, 100, 50]);
    }

    #[test]
    fn ties_keep_arrival_order() {
        let mut set = ResultSet::new();
        set.insert(peer("first", 100));
        set.insert(peer("fast", 300));
        assert_eq!(set.insert(peer("second", 100)), 2);
        set.insert(peer("third", 100));
        let owners: Vec<&str> = set.iter().map(|t| t.owner()).collect();
        assert_eq!(owners, vec!["fast", "first", "second", "third"]);
    }

    #[test]
    fn order_invariant_holds_for_many_inserts() {
        let mut set = ResultSet::new();
        for i in 0..200u32 {
            set.insert(peer(&format!("p{i}"), (i * 7919) % 97));
        }
        let s = speeds(&set);
        assert!(s.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn clear_empties_and_counts_files() {
        let mut set = ResultSet::new();
        set.insert(peer("a", 1));
        set.insert(build_tree("b", 2, ["x", "y"]).unwrap());
        assert_eq!(set.total_files(), 3);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
