//! Visible-row flattening.

use crate::node::{NodeIndex, NodeStore};

/// Pre-order walk of the forest that only descends into expanded nodes.
///
/// Collapsed subtrees are never visited, so the cost tracks the number of
/// rows that end up visible rather than the size of the tree.
pub fn flatten(store: &NodeStore) -> Vec<NodeIndex> {
    let mut out = Vec::new();
    collect_visible(store, store.roots(), &mut out);
    out
}

fn collect_visible(store: &NodeStore, items: &[NodeIndex], out: &mut Vec<NodeIndex>) {
    for &index in items {
        let Some(entry) = store.get(index) else {
            continue;
        };
        out.push(index);
        if entry.is_expanded() {
            collect_visible(store, entry.children(), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TreeNode;

    fn labels(store: &NodeStore, rows: &[NodeIndex]) -> Vec<String> {
        rows.iter()
            .filter_map(|&i| store.get(i))
            .map(|e| e.label().to_string())
            .collect()
    }

    #[test]
    fn test_collapsed_children_are_skipped() {
        let roots = vec![
            TreeNode::new("A")
                .expanded(true)
                .children([TreeNode::new("A1").child(TreeNode::new("A1x")), TreeNode::new("A2")]),
            TreeNode::new("B").child(TreeNode::new("B1")),
        ];
        let store = NodeStore::attach(roots, false).unwrap();
        assert_eq!(labels(&store, &flatten(&store)), ["A", "A1", "A2", "B"]);
    }

    #[test]
    fn test_expanding_nested_node_inserts_in_order() {
        let roots = vec![TreeNode::new("A").children([
            TreeNode::new("A1").child(TreeNode::new("A1x")),
            TreeNode::new("A2"),
        ])];
        let mut store = NodeStore::attach(roots, true).unwrap();
        let a1 = store.lookup("A/A1").unwrap();
        store.set_expanded(a1, true);
        assert_eq!(labels(&store, &flatten(&store)), ["A", "A1", "A1x", "A2"]);
    }

    #[test]
    fn test_empty_forest() {
        let store = NodeStore::attach(Vec::new(), true).unwrap();
        assert!(flatten(&store).is_empty());
    }
}
