//! Arena-backed binary cluster tree.
//!
//! Nodes are addressed by id: leaves are `0..n`, the internal node created
//! by the `k`-th merge is `n + k`. Children are referenced by id, so the
//! tree has no parent pointers and no shared ownership.

/// A node of the agglomeration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    id: usize,
    members: Vec<usize>,
    children: Option<[usize; 2]>,
    height: f64,
}

impl ClusterNode {
    /// Node id (equal to the leaf position for leaves).
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Leaf ids covered by this node, in merge order.
    #[must_use]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// The two child ids of an internal node; `None` for leaves.
    #[must_use]
    pub const fn children(&self) -> Option<[usize; 2]> {
        self.children
    }

    /// Linkage distance at which the node was formed; `0` for leaves.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Number of leaves under this node.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether this node is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// One merge step, in the order merges happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// Id of the node created by this merge.
    pub id: usize,
    /// First child id (after ladderization, the larger one).
    pub left: usize,
    /// Second child id.
    pub right: usize,
    /// Linkage distance of the merge.
    pub height: f64,
    /// Number of leaves under the new node.
    pub size: usize,
}

/// A binary tree over `n` leaves produced by agglomerative clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterTree {
    nodes: Vec<ClusterNode>,
    n_leaves: usize,
}

impl ClusterTree {
    /// A forest of `n` unmerged leaves.
    pub(crate) fn with_leaves(n: usize) -> Self {
        let nodes = (0..n)
            .map(|id| ClusterNode { id, members: vec![id], children: None, height: 0.0 })
            .collect();
        Self { nodes, n_leaves: n }
    }

    /// Join nodes `a` and `b` under a new node and return its id.
    pub(crate) fn merge(&mut self, a: usize, b: usize, height: f64) -> usize {
        let id = self.nodes.len();
        let mut members = Vec::with_capacity(self.nodes[a].size() + self.nodes[b].size());
        members.extend_from_slice(&self.nodes[a].members);
        members.extend_from_slice(&self.nodes[b].members);
        self.nodes.push(ClusterNode { id, members, children: Some([a, b]), height });
        id
    }

    /// Number of leaves.
    #[must_use]
    pub const fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Total number of nodes (leaves plus internal nodes).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id.
    #[must_use]
    pub fn node(&self, id: usize) -> Option<&ClusterNode> {
        self.nodes.get(id)
    }

    /// The root: the last node created. `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<&ClusterNode> {
        self.nodes.last()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &ClusterNode> {
        self.nodes.iter()
    }

    /// Merge history, oldest first.
    pub fn merges(&self) -> impl Iterator<Item = Merge> + '_ {
        self.nodes.iter().filter_map(|node| {
            node.children.map(|[left, right]| Merge {
                id: node.id,
                left,
                right,
                height: node.height,
                size: node.size(),
            })
        })
    }

    /// Put the child with more leaves first at every internal node.
    ///
    /// Children of equal size keep their order. Membership is untouched;
    /// only the leaf emission order of [`ClusterTree::leaves`] changes.
    pub fn ladderize(&mut self) {
        for i in self.n_leaves..self.nodes.len() {
            if let Some([left, right]) = self.nodes[i].children {
                if self.nodes[right].size() > self.nodes[left].size() {
                    self.nodes[i].children = Some([right, left]);
                }
            }
        }
    }

    /// Depth-first leaf ids from the root, left to right.
    ///
    /// Each call starts a fresh traversal.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        let stack = self.root().map(|root| vec![root.id]).unwrap_or_default();
        Leaves { tree: self, stack }
    }

    /// Collected [`ClusterTree::leaves`].
    #[must_use]
    pub fn leaf_order(&self) -> Vec<usize> {
        self.leaves().collect()
    }
}

/// Iterator over leaf ids in display order. See [`ClusterTree::leaves`].
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    tree: &'a ClusterTree,
    stack: Vec<usize>,
}

impl Iterator for Leaves<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some(id) = self.stack.pop() {
            match self.tree.nodes[id].children {
                None => return Some(id),
                Some([left, right]) => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}
