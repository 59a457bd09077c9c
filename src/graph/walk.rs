//! Block-tree traversal
//!
//! Depth-first, pre-order: a block is yielded before its children, and
//! siblings keep their order. Blocks without content are still descended
//! into; their children keep their own tree depth.

use super::block::Block;

/// Pre-order iterator over a block forest, yielding `(block, depth)`.
///
/// Uses an explicit stack so deeply nested pages cannot overflow the call stack.
pub struct Walk<'a> {
    stack: Vec<(&'a Block, usize)>,
}

impl<'a> Walk<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        Self {
            stack: blocks.iter().rev().map(|b| (b, 0)).collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a Block, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (block, depth) = self.stack.pop()?;
        self.stack
            .extend(block.children.iter().rev().map(|child| (child, depth + 1)));
        Some((block, depth))
    }
}

/// Walk every block in the forest.
pub fn walk(blocks: &[Block]) -> Walk<'_> {
    Walk::new(blocks)
}

/// Non-empty block contents in traversal order.
pub fn contents(blocks: &[Block]) -> impl Iterator<Item = &str> {
    walk(blocks).filter_map(|(block, _)| block.text())
}

/// Render a block forest as an indented bullet list, one line per block.
pub fn flatten(blocks: &[Block]) -> String {
    let mut out = String::new();
    for (block, depth) in walk(blocks) {
        let Some(text) = block.text() else {
            continue;
        };
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        out.push_str(text);
        out.push('\n');
    }
    out
}

/// Total characters of block content, ignoring tree structure.
pub fn content_length(blocks: &[Block]) -> usize {
    contents(blocks).map(|c| c.trim().chars().count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Vec<Block> {
        vec![
            Block::new("root one").with_children(vec![
                Block::new("child a").with_children(vec![Block::new("grandchild")]),
                Block::new("child b"),
            ]),
            Block::container(vec![Block::new("under empty parent")]),
            Block::new("root two"),
        ]
    }

    #[test]
    fn flatten_indents_by_depth_in_preorder() {
        let text = flatten(&sample_tree());
        assert_eq!(
            text,
            "- root one\n  - child a\n    - grandchild\n  - child b\n  - under empty parent\n- root two\n"
        );
    }

    #[test]
    fn empty_parent_keeps_child_depth() {
        let tree = vec![Block::container(vec![Block::container(vec![Block::new("deep")])])];
        assert_eq!(flatten(&tree), "    - deep\n");
    }

    #[test]
    fn flatten_is_idempotent() {
        let tree = sample_tree();
        assert_eq!(flatten(&tree), flatten(&tree));
    }

    #[test]
    fn empty_input_yields_empty_text() {
        assert_eq!(flatten(&[]), "");
        assert_eq!(walk(&[]).count(), 0);
    }

    #[test]
    fn walk_visits_every_block() {
        let tree = sample_tree();
        let depths: Vec<usize> = walk(&tree).map(|(_, d)| d).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0, 1, 0]);
        assert_eq!(contents(&tree).count(), 6);
    }

    #[test]
    fn content_length_counts_characters() {
        let tree = vec![Block::new("abc"), Block::new(" de ").with_children(vec![Block::new("é")])];
        assert_eq!(content_length(&tree), 6);
    }
}
