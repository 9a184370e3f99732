//! Categories: the term language of the grammar.
//!
//! A category is either atomic (`np`, `s`), a type variable, or a functor
//! that consumes a neighbouring category and yields a result.
//!
//! # Key Concepts
//!
//! - **Left functor** `ret<arg`: sits to the left of its argument and
//!   consumes the category immediately to its right.
//! - **Right functor** `arg>ret`: sits to the right of its argument and
//!   consumes the category immediately to its left.
//! - **Variables** `$n`: placeholders minted by a [`VarSupply`]; two
//!   variables are the same only if their tokens are the same.
//!
//! # Example
//!
//! ```rust
//! use compositional_ccg::category::Category;
//!
//! let np = Category::atomic("np");
//! let s = Category::atomic("s");
//!
//! // A transitive verb: takes an object on the right, then a subject on the left.
//! let verb = (np.clone() >> s) << np;
//! assert_eq!(verb.to_string(), "(np>s)<np");
//! assert_eq!(verb.count(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Shl, Shr};

/// Identity token of a type variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub u32);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Generator of fresh variable tokens.
///
/// Each search owns its own supply, so results are reproducible and two
/// concurrent searches never share state. The token space is finite: once
/// `$4294967295` has been handed out, [`VarSupply::fresh`] returns `None`.
#[derive(Debug, Clone)]
pub struct VarSupply {
    // `None` once every token has been issued.
    next: Option<u32>,
}

impl VarSupply {
    /// Create a supply starting at `$0`.
    pub fn new() -> Self {
        Self { next: Some(0) }
    }

    /// Create a supply whose tokens are all greater than any variable
    /// occurring in `cats`.
    pub fn above<'a>(cats: impl IntoIterator<Item = &'a Category>) -> Self {
        match cats.into_iter().filter_map(Category::max_var).max() {
            Some(max) => Self {
                next: max.0.checked_add(1),
            },
            None => Self::new(),
        }
    }

    /// Mint a new token, or `None` if the token space is used up.
    pub fn fresh(&mut self) -> Option<VarId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(VarId(id))
    }

    /// Mint a new token wrapped as a category.
    pub fn fresh_var(&mut self) -> Option<Category> {
        self.fresh().map(Category::Unbound)
    }

    /// The token the next call to [`VarSupply::fresh`] returns.
    pub fn peek(&self) -> Option<VarId> {
        self.next.map(VarId)
    }

    /// Check whether every token has been issued.
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}

impl Default for VarSupply {
    fn default() -> Self {
        Self::new()
    }
}

/// A category term.
///
/// Equality is written out per variant rather than derived: atoms compare
/// by name, variables by token, functors by direction and then structurally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Category {
    /// Ground, unanalysed category.
    Atomic(String),
    /// Type variable.
    Unbound(VarId),
    /// `ret<arg`: consumes `arg` on its right.
    Left { arg: Box<Category>, ret: Box<Category> },
    /// `arg>ret`: consumes `arg` on its left.
    Right { arg: Box<Category>, ret: Box<Category> },
}

impl Category {
    /// Create an atomic category.
    pub fn atomic(name: impl Into<String>) -> Self {
        Category::Atomic(name.into())
    }

    /// Wrap a variable token.
    pub fn unbound(var: VarId) -> Self {
        Category::Unbound(var)
    }

    /// Build `ret<arg`.
    pub fn left(ret: Category, arg: Category) -> Self {
        Category::Left {
            arg: Box::new(arg),
            ret: Box::new(ret),
        }
    }

    /// Build `arg>ret`.
    pub fn right(arg: Category, ret: Category) -> Self {
        Category::Right {
            arg: Box::new(arg),
            ret: Box::new(ret),
        }
    }

    /// Number of functor constructors in the term.
    ///
    /// Atoms and variables count zero. Used to bound type-raising.
    pub fn count(&self) -> usize {
        match self {
            Category::Atomic(_) | Category::Unbound(_) => 0,
            Category::Left { arg, ret } | Category::Right { arg, ret } => {
                1 + arg.count() + ret.count()
            }
        }
    }

    /// The variable token, if this is a bare variable.
    pub fn as_var(&self) -> Option<VarId> {
        match self {
            Category::Unbound(v) => Some(*v),
            _ => None,
        }
    }

    /// Check if this is a bare variable.
    pub fn is_var(&self) -> bool {
        matches!(self, Category::Unbound(_))
    }

    /// Check if this is a left or right functor.
    pub fn is_functor(&self) -> bool {
        matches!(self, Category::Left { .. } | Category::Right { .. })
    }

    /// Check if the term contains no variables.
    pub fn is_ground(&self) -> bool {
        self.max_var().is_none()
    }

    /// Check whether `var` occurs anywhere in the term.
    pub fn occurs(&self, var: VarId) -> bool {
        match self {
            Category::Atomic(_) => false,
            Category::Unbound(v) => *v == var,
            Category::Left { arg, ret } | Category::Right { arg, ret } => {
                arg.occurs(var) || ret.occurs(var)
            }
        }
    }

    /// All variables occurring in the term.
    pub fn variables(&self) -> BTreeSet<VarId> {
        let mut vars = BTreeSet::new();
        self.collect_vars(&mut vars);
        vars
    }

    fn collect_vars(&self, vars: &mut BTreeSet<VarId>) {
        match self {
            Category::Atomic(_) => {}
            Category::Unbound(v) => {
                vars.insert(*v);
            }
            Category::Left { arg, ret } | Category::Right { arg, ret } => {
                arg.collect_vars(vars);
                ret.collect_vars(vars);
            }
        }
    }

    /// Largest variable token in the term.
    pub fn max_var(&self) -> Option<VarId> {
        match self {
            Category::Atomic(_) => None,
            Category::Unbound(v) => Some(*v),
            Category::Left { arg, ret } | Category::Right { arg, ret } => {
                arg.max_var().max(ret.max_var())
            }
        }
    }

    /// Rename every variable through `f`, keeping the shape.
    pub fn map_vars(&self, f: &mut impl FnMut(VarId) -> VarId) -> Category {
        match self {
            Category::Atomic(_) => self.clone(),
            Category::Unbound(v) => Category::Unbound(f(*v)),
            Category::Left { arg, ret } => {
                let ret = ret.map_vars(f);
                Category::left(ret, arg.map_vars(f))
            }
            Category::Right { arg, ret } => {
                let arg = arg.map_vars(f);
                Category::right(arg, ret.map_vars(f))
            }
        }
    }

    /// Rename every variable apart, consistently within the term.
    ///
    /// Returns `None` if `supply` runs out of tokens.
    pub fn freshen(&self, supply: &mut VarSupply) -> Option<Category> {
        let mut renaming: HashMap<VarId, VarId> = HashMap::new();
        for var in self.variables() {
            renaming.insert(var, supply.fresh()?);
        }
        Some(self.map_vars(&mut |v| renaming.get(&v).copied().unwrap_or(v)))
    }

    /// Equality up to a consistent, bijective renaming of variables.
    ///
    /// Searches mint fresh variables, so two runs that find the same
    /// category generally disagree on tokens.
    pub fn alpha_eq(&self, other: &Category) -> bool {
        let mut forward = HashMap::new();
        let mut backward = HashMap::new();
        alpha_eq_in(self, other, &mut forward, &mut backward)
    }
}

fn alpha_eq_in(
    a: &Category,
    b: &Category,
    forward: &mut HashMap<VarId, VarId>,
    backward: &mut HashMap<VarId, VarId>,
) -> bool {
    match (a, b) {
        (Category::Atomic(x), Category::Atomic(y)) => x == y,
        (Category::Unbound(x), Category::Unbound(y)) => {
            let fwd = *forward.entry(*x).or_insert(*y);
            let bwd = *backward.entry(*y).or_insert(*x);
            fwd == *y && bwd == *x
        }
        (Category::Left { arg: a1, ret: r1 }, Category::Left { arg: a2, ret: r2 })
        | (Category::Right { arg: a1, ret: r1 }, Category::Right { arg: a2, ret: r2 }) => {
            alpha_eq_in(a1, a2, forward, backward) && alpha_eq_in(r1, r2, forward, backward)
        }
        _ => false,
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Category::Atomic(a), Category::Atomic(b)) => a == b,
            // Token identity only.
            (Category::Unbound(a), Category::Unbound(b)) => a == b,
            (Category::Left { arg: a1, ret: r1 }, Category::Left { arg: a2, ret: r2 })
            | (Category::Right { arg: a1, ret: r1 }, Category::Right { arg: a2, ret: r2 }) => {
                a1 == a2 && r1 == r2
            }
            _ => false,
        }
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Category::Atomic(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            Category::Unbound(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Category::Left { arg, ret } => {
                2u8.hash(state);
                arg.hash(state);
                ret.hash(state);
            }
            Category::Right { arg, ret } => {
                3u8.hash(state);
                arg.hash(state);
                ret.hash(state);
            }
        }
    }
}

struct Operand<'a>(&'a Category);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_functor() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Atomic(name) => write!(f, "{}", name),
            Category::Unbound(v) => write!(f, "{}", v),
            Category::Left { arg, ret } => write!(f, "{}<{}", Operand(ret), Operand(arg)),
            Category::Right { arg, ret } => write!(f, "{}>{}", Operand(arg), Operand(ret)),
        }
    }
}

/// `ret << arg` builds the left functor `ret<arg`.
impl Shl for Category {
    type Output = Category;

    fn shl(self, arg: Category) -> Category {
        Category::left(self, arg)
    }
}

impl Shl<&Category> for &Category {
    type Output = Category;

    fn shl(self, arg: &Category) -> Category {
        Category::left(self.clone(), arg.clone())
    }
}

/// `arg >> ret` builds the right functor `arg>ret`.
impl Shr for Category {
    type Output = Category;

    fn shr(self, ret: Category) -> Category {
        Category::right(self, ret)
    }
}

impl Shr<&Category> for &Category {
    type Output = Category;

    fn shr(self, ret: &Category) -> Category {
        Category::right(self.clone(), ret.clone())
    }
}
