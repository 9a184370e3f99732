//! Unification: solving equations between categories.
//!
//! First-order, syntactic unification with occurs check. The only
//! constructors are the two functor directions, so decomposition is a
//! matter of matching `arg` with `arg` and `ret` with `ret`.
//!
//! The solved form is an ordered association list. Bindings made later
//! during solving come first, and every stored value has already been
//! rewritten by the bindings that follow it, so a single lookup always
//! returns a fully resolved term.

use crate::category::{Category, VarId};
use std::collections::VecDeque;
use thiserror::Error;

/// A pair of categories to be made equal.
pub type Equation = (Category, Category);

/// Reasons why unification can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// Binding the variable would create an infinite term.
    #[error("Occurs check: {var} occurs in {term}")]
    OccursCheck { var: VarId, term: Category },

    /// Two different atoms.
    #[error("Atom clash: expected {expected}, found {found}")]
    AtomClash { expected: String, found: String },

    /// Different constructors (atom against functor, or opposite directions).
    #[error("Shape clash: {left} does not match {right}")]
    ShapeClash { left: Category, right: Category },
}

/// A solved substitution mapping variables to categories.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution {
    bindings: Vec<(VarId, Category)>,
}

impl Substitution {
    /// Create an empty substitution (identity).
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Create a substitution with a single binding.
    pub fn singleton(var: VarId, term: Category) -> Self {
        Self {
            bindings: vec![(var, term)],
        }
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if this substitution is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Look up a variable; the first matching entry wins.
    pub fn lookup(&self, var: VarId) -> Option<&Category> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == var)
            .map(|(_, term)| term)
    }

    /// Iterate over the bindings in lookup order.
    pub fn bindings(&self) -> impl Iterator<Item = (VarId, &Category)> {
        self.bindings.iter().map(|(var, term)| (*var, term))
    }

    /// Variables bound by this substitution.
    pub fn domain(&self) -> Vec<VarId> {
        self.bindings.iter().map(|(var, _)| *var).collect()
    }

    /// Apply this substitution to a category.
    ///
    /// Bound values are returned as stored; they are already resolved.
    pub fn apply(&self, cat: &Category) -> Category {
        match cat {
            Category::Atomic(_) => cat.clone(),
            Category::Unbound(var) => self.lookup(*var).cloned().unwrap_or_else(|| cat.clone()),
            Category::Left { arg, ret } => Category::left(self.apply(ret), self.apply(arg)),
            Category::Right { arg, ret } => Category::right(self.apply(arg), self.apply(ret)),
        }
    }

    /// Apply this substitution to every category of a sequence.
    pub fn apply_all(&self, cats: &[Category]) -> Vec<Category> {
        cats.iter().map(|cat| self.apply(cat)).collect()
    }

    /// Fold in `later`, which was solved over terms this substitution had
    /// already been applied to.
    ///
    /// Existing values are rewritten by `later` and its bindings go in
    /// front, so the result is still solved and applying it equals applying
    /// `self` and then `later`.
    pub fn compose(&mut self, later: &Substitution) {
        if later.is_empty() {
            return;
        }
        for (_, value) in self.bindings.iter_mut() {
            *value = later.apply(value);
        }
        let mut bindings = later.bindings.clone();
        bindings.append(&mut self.bindings);
        self.bindings = bindings;
    }
}

/// Solve a list of equations.
///
/// Equations are processed front to back; decomposing two functors of the
/// same direction appends the `arg` and `ret` equations at the back.
pub fn unify(equations: Vec<Equation>) -> Result<Substitution, UnifyError> {
    let mut pending: VecDeque<Equation> = equations.into();
    // In binding order; reversed at the end.
    let mut solved: Vec<(VarId, Category)> = Vec::new();

    while let Some((lhs, rhs)) = pending.pop_front() {
        if lhs == rhs {
            continue;
        }
        match (lhs, rhs) {
            (Category::Unbound(var), term) | (term, Category::Unbound(var)) => {
                if term.occurs(var) {
                    return Err(UnifyError::OccursCheck { var, term });
                }
                let step = Substitution::singleton(var, term.clone());
                for (l, r) in pending.iter_mut() {
                    *l = step.apply(l);
                    *r = step.apply(r);
                }
                for (_, value) in solved.iter_mut() {
                    *value = step.apply(value);
                }
                solved.push((var, term));
            }
            (Category::Left { arg: a1, ret: r1 }, Category::Left { arg: a2, ret: r2 })
            | (Category::Right { arg: a1, ret: r1 }, Category::Right { arg: a2, ret: r2 }) => {
                pending.push_back((*a1, *a2));
                pending.push_back((*r1, *r2));
            }
            (Category::Atomic(expected), Category::Atomic(found)) => {
                return Err(UnifyError::AtomClash { expected, found });
            }
            (left, right) => return Err(UnifyError::ShapeClash { left, right }),
        }
    }

    solved.reverse();
    Ok(Substitution { bindings: solved })
}

/// Solve a single equation.
pub fn unify_pair(lhs: &Category, rhs: &Category) -> Result<Substitution, UnifyError> {
    unify(vec![(lhs.clone(), rhs.clone())])
}
