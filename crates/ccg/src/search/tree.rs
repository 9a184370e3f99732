//! Tree-directed search: one resolution attempt per bracketing.
//!
//! Every binary bracketing of the input is resolved bottom-up using
//! application only. When neither application rule combines two resolved
//! subtrees, the left category is lifted by repeated type-raising and tried
//! again, then the right one. Lifting stops once the raised category is
//! larger than the category it has to combine with, so every node
//! terminates.
//!
//! Bindings made at one node hold for the whole bracketing: each bracketing
//! carries a running substitution that is applied to both operands before
//! they are combined, so a variable fixed in one subtree is seen fixed in
//! its siblings.
//!
//! # Example
//!
//! ```
//! use compositional_ccg::search::bracketings;
//!
//! let trees: Vec<String> = bracketings(3).map(|t| t.to_string()).collect();
//! assert_eq!(trees, vec!["(0 (1 2))", "((0 1) 2)"]);
//! ```

use crate::category::{Category, VarSupply};
use crate::hooks::SearchHook;
use crate::rules::{BinaryRule, UnaryRule};
use crate::unify::Substitution;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

// ============================================================================
// Bracketings
// ============================================================================

/// A binary bracketing with leaves of type `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree<T> {
    Leaf(T),
    Branch(Box<Tree<T>>, Box<Tree<T>>),
}

impl<T> Tree<T> {
    /// Create a leaf.
    pub fn leaf(value: T) -> Self {
        Tree::Leaf(value)
    }

    /// Create an internal node.
    pub fn branch(left: Tree<T>, right: Tree<T>) -> Self {
        Tree::Branch(Box::new(left), Box::new(right))
    }

    /// Transform every leaf, keeping the shape.
    pub fn map<U>(&self, f: &mut impl FnMut(&T) -> U) -> Tree<U> {
        match self {
            Tree::Leaf(value) => Tree::Leaf(f(value)),
            Tree::Branch(left, right) => {
                let left = left.map(f);
                Tree::branch(left, right.map(f))
            }
        }
    }

    /// Leaves from left to right.
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Tree::Leaf(value) => out.push(value),
            Tree::Branch(left, right) => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        match self {
            Tree::Leaf(_) => 1,
            Tree::Branch(left, right) => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        match self {
            Tree::Leaf(_) => 0,
            Tree::Branch(left, right) => 1 + left.height().max(right.height()),
        }
    }
}

impl<T: Clone> Tree<T> {
    /// Convert to a graph. Branch nodes carry `None`, leaves their value;
    /// edges are labelled `0` for the left child and `1` for the right.
    ///
    /// Returns the root index along with the graph.
    pub fn to_graph(&self) -> (NodeIndex, DiGraph<Option<T>, u8>) {
        let mut graph = DiGraph::new();
        let root = self.add_to_graph(&mut graph);
        (root, graph)
    }

    fn add_to_graph(&self, graph: &mut DiGraph<Option<T>, u8>) -> NodeIndex {
        match self {
            Tree::Leaf(value) => graph.add_node(Some(value.clone())),
            Tree::Branch(left, right) => {
                let node = graph.add_node(None);
                let l = left.add_to_graph(graph);
                let r = right.add_to_graph(graph);
                graph.add_edge(node, l, 0);
                graph.add_edge(node, r, 1);
                node
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Leaf(value) => write!(f, "{}", value),
            Tree::Branch(left, right) => write!(f, "({} {})", left, right),
        }
    }
}

/// The `n`th Catalan number, saturating at `usize::MAX`.
pub fn catalan(n: usize) -> usize {
    // C(k+1) = C(k) * 2(2k+1) / (k+2); exact at every step.
    let mut c: u128 = 1;
    for k in 0..n as u128 {
        c = match c.checked_mul(2 * (2 * k + 1)) {
            Some(product) => product / (k + 2),
            None => return usize::MAX,
        };
        if c > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    c as usize
}

/// Lazily enumerate every bracketing of `n` leaves, labelled `0..n`.
///
/// Split points ascend, and for each split the left subtree varies slowest.
/// There are `catalan(n - 1)` of them; `n == 0` yields nothing.
pub fn bracketings(n: usize) -> Box<dyn Iterator<Item = Tree<usize>>> {
    if n == 0 {
        return Box::new(std::iter::empty());
    }
    span(0, n)
}

fn span(lo: usize, hi: usize) -> Box<dyn Iterator<Item = Tree<usize>>> {
    if hi - lo == 1 {
        return Box::new(std::iter::once(Tree::Leaf(lo)));
    }
    Box::new((lo + 1..hi).flat_map(move |mid| {
        span(lo, mid).flat_map(move |left| {
            span(mid, hi).map(move |right| Tree::branch(left.clone(), right))
        })
    }))
}

// ============================================================================
// Lifting
// ============================================================================

/// Breadth-first generator of raised variants of a category.
///
/// Level `k` holds every combination of `k` raises, right raise first at
/// each expansion. Both raises grow a category by exactly two, so all of
/// level `k` has size `count + 2k`; generation stops at the first level
/// larger than `bound`.
#[derive(Debug, Clone)]
pub struct Lifter {
    frontier: VecDeque<Category>,
    ready: VecDeque<Category>,
    bound: usize,
}

impl Lifter {
    /// Start lifting `cat`. The unlifted category itself is not produced.
    pub fn new(cat: Category, bound: usize) -> Self {
        Self {
            frontier: VecDeque::from([cat]),
            ready: VecDeque::new(),
            bound,
        }
    }

    /// Produce the next lifted category, minting variables from `supply`.
    ///
    /// Ends early if `supply` runs out of tokens.
    pub fn next_lift(&mut self, supply: &mut VarSupply) -> Option<Category> {
        while self.ready.is_empty() {
            let cat = self.frontier.pop_front()?;
            for rule in UnaryRule::ALL {
                let Some(rewrite) = rule.apply(&cat, supply) else {
                    continue;
                };
                let raised = rewrite.category;
                if raised.count() <= self.bound {
                    self.ready.push_back(raised);
                }
            }
        }
        let lifted = self.ready.pop_front()?;
        self.frontier.push_back(lifted.clone());
        Some(lifted)
    }
}

/// Iterator over the lifts of a category. See [`Lifter`].
pub struct Lifts<'a> {
    lifter: Lifter,
    supply: &'a mut VarSupply,
}

impl Iterator for Lifts<'_> {
    type Item = Category;

    fn next(&mut self) -> Option<Category> {
        self.lifter.next_lift(self.supply)
    }
}

/// Lazily lift `cat` while its size stays within `bound`.
pub fn lifts<'a>(cat: &Category, bound: usize, supply: &'a mut VarSupply) -> Lifts<'a> {
    Lifts {
        lifter: Lifter::new(cat.clone(), bound),
        supply,
    }
}

/// Upper bound on how many lifts [`lifts`] produces for a category of size
/// `count` against a partner of size `bound`.
pub fn lift_limit(count: usize, bound: usize) -> usize {
    if bound < count {
        return 0;
    }
    let levels = ((bound - count) / 2) as u32;
    2usize.saturating_pow(levels + 1).saturating_sub(2)
}

// ============================================================================
// Tree Search
// ============================================================================

/// A bracketing that resolved to a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved category
    pub category: Category,
    /// The bracketing of the input that produced it
    pub tree: Tree<Category>,
    /// Every binding made while resolving the bracketing
    pub bindings: Substitution,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.tree, self.category)
    }
}

/// Lazy stream of resolutions from the tree-directed search.
///
/// Bracketings that fail are skipped; the stream ends after the last one.
pub struct DParse {
    cats: Vec<Category>,
    trees: Box<dyn Iterator<Item = Tree<usize>>>,
    supply: VarSupply,
    hook: Arc<dyn SearchHook>,
    attempted: usize,
}

impl DParse {
    pub(crate) fn new(cats: &[Category], hook: Arc<dyn SearchHook>) -> Self {
        Self {
            cats: cats.to_vec(),
            trees: bracketings(cats.len()),
            supply: VarSupply::above(cats),
            hook,
            attempted: 0,
        }
    }

    /// Number of bracketings tried so far.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    fn resolve(&mut self, tree: &Tree<usize>, subs: &mut Substitution) -> Option<Category> {
        match tree {
            Tree::Leaf(i) => Some(subs.apply(&self.cats[*i])),
            Tree::Branch(left, right) => {
                let left = self.resolve(left, subs)?;
                let right = self.resolve(right, subs)?;
                // The right subtree may have bound variables of the left.
                let left = subs.apply(&left);
                let right = subs.apply(&right);
                let (category, bindings) = self.combine(&left, &right)?;
                subs.compose(&bindings);
                Some(category)
            }
        }
    }

    fn combine(&mut self, left: &Category, right: &Category) -> Option<(Category, Substitution)> {
        if let Some(result) = self.apply(left, right) {
            return Some(result);
        }

        let mut lifter = Lifter::new(left.clone(), right.count());
        while let Some(lifted) = lifter.next_lift(&mut self.supply) {
            self.hook.on_lift(&lifted, right);
            if let Some(result) = self.apply(&lifted, right) {
                trace!(%lifted, %right, result = %result.0, "left lift applied");
                return Some(result);
            }
        }

        let mut lifter = Lifter::new(right.clone(), left.count());
        while let Some(lifted) = lifter.next_lift(&mut self.supply) {
            self.hook.on_lift(&lifted, left);
            if let Some(result) = self.apply(left, &lifted) {
                trace!(%left, %lifted, result = %result.0, "right lift applied");
                return Some(result);
            }
        }

        trace!(%left, %right, "node failed");
        self.hook.on_node_failure(left, right);
        None
    }

    fn apply(&mut self, x: &Category, y: &Category) -> Option<(Category, Substitution)> {
        BinaryRule::APPLICATION
            .iter()
            .find_map(|rule| rule.apply(x, y, &mut self.supply))
            .map(|rewrite| (rewrite.resolved(), rewrite.bindings))
    }
}

impl Iterator for DParse {
    type Item = Resolution;

    fn next(&mut self) -> Option<Resolution> {
        while let Some(shape) = self.trees.next() {
            self.attempted += 1;
            let tree = shape.map(&mut |i| self.cats[*i].clone());
            self.hook.on_bracketing(&tree);

            let mut bindings = Substitution::empty();
            match self.resolve(&shape, &mut bindings) {
                Some(category) => {
                    debug!(%tree, %category, "bracketing resolved");
                    self.hook.on_resolution(&category);
                    return Some(Resolution {
                        category,
                        tree,
                        bindings,
                    });
                }
                None => debug!(%tree, "bracketing failed"),
            }
        }
        None
    }
}

impl fmt::Debug for DParse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DParse")
            .field("cats", &self.cats)
            .field("attempted", &self.attempted)
            .finish()
    }
}
