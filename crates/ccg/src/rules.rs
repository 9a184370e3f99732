//! Combinator rules: type-raising, composition and application.
//!
//! Every rule is a pure partial function. A successful application returns
//! a [`Rewrite`]: the combined category together with the bindings the
//! surrounding sequence must be rewritten by. Failure is `None` and leaves
//! nothing behind. A rule that needs a fresh variable also fails once the
//! supply has no tokens left.
//!
//! | Rule               | Input              | Output    |
//! |--------------------|--------------------|-----------|
//! | right type-raising | `x`                | `t<(x>t)` |
//! | left type-raising  | `x`                | `(t<x)>t` |
//! | left composition   | `a<b`, `b<c`       | `a<c`     |
//! | right composition  | `a>b`, `b>c`       | `a>c`     |
//! | left application   | `a<b`, `b`         | `a`       |
//! | right application  | `b`, `b>a`         | `a`       |
//!
//! When the side a rule would inspect is still a variable, the rule invents
//! the functor shape it needs out of fresh variables and emits equations
//! binding the variable to it. Those equations go through the unifier, so a
//! variable shared by both operands is handled soundly.

use crate::category::{Category, VarSupply};
use crate::unify::{unify, unify_pair, Equation, Substitution};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a successful rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The combined category, before `bindings` are applied
    pub category: Category,
    /// Bindings to apply to every category in the sequence
    pub bindings: Substitution,
}

impl Rewrite {
    fn bare(category: Category) -> Self {
        Self {
            category,
            bindings: Substitution::empty(),
        }
    }

    /// The combined category with the bindings applied.
    pub fn resolved(&self) -> Category {
        self.bindings.apply(&self.category)
    }
}

fn solve(category: Category, equations: Vec<Equation>) -> Option<Rewrite> {
    let bindings = unify(equations).ok()?;
    Some(Rewrite { category, bindings })
}

fn matched(category: Category, lhs: &Category, rhs: &Category) -> Option<Rewrite> {
    let bindings = unify_pair(lhs, rhs).ok()?;
    Some(Rewrite { category, bindings })
}

// ============================================================================
// Unary Rules
// ============================================================================

/// `x  ⇒  t<(x>t)` for a fresh `t`.
pub fn right_type_raising(x: &Category, supply: &mut VarSupply) -> Option<Rewrite> {
    let t = supply.fresh_var()?;
    Some(Rewrite::bare(Category::left(
        t.clone(),
        Category::right(x.clone(), t),
    )))
}

/// `x  ⇒  (t<x)>t` for a fresh `t`.
pub fn left_type_raising(x: &Category, supply: &mut VarSupply) -> Option<Rewrite> {
    let t = supply.fresh_var()?;
    Some(Rewrite::bare(Category::right(
        Category::left(t.clone(), x.clone()),
        t,
    )))
}

// ============================================================================
// Binary Rules
// ============================================================================

/// `a<b  b<c  ⇒  a<c`
pub fn left_composition(x: &Category, y: &Category, supply: &mut VarSupply) -> Option<Rewrite> {
    match (x, y) {
        (Category::Unbound(_), Category::Unbound(_)) => {
            let arg = supply.fresh_var()?;
            let mid = supply.fresh_var()?;
            let ret = supply.fresh_var()?;
            solve(
                Category::left(ret.clone(), arg.clone()),
                vec![
                    (x.clone(), Category::left(ret, mid.clone())),
                    (y.clone(), Category::left(mid, arg)),
                ],
            )
        }
        (Category::Unbound(_), Category::Left { arg: yarg, ret: yret }) => {
            let ret = supply.fresh_var()?;
            solve(
                Category::left(ret.clone(), (**yarg).clone()),
                vec![(x.clone(), Category::left(ret, (**yret).clone()))],
            )
        }
        (Category::Left { arg: xarg, ret: xret }, Category::Unbound(_)) => {
            let arg = supply.fresh_var()?;
            solve(
                Category::left((**xret).clone(), arg.clone()),
                vec![(y.clone(), Category::left((**xarg).clone(), arg))],
            )
        }
        (Category::Left { arg: xarg, ret: xret }, Category::Left { arg: yarg, ret: yret }) => {
            matched(Category::left((**xret).clone(), (**yarg).clone()), xarg, yret)
        }
        _ => None,
    }
}

/// `a>b  b>c  ⇒  a>c`
pub fn right_composition(x: &Category, y: &Category, supply: &mut VarSupply) -> Option<Rewrite> {
    match (x, y) {
        (Category::Unbound(_), Category::Unbound(_)) => {
            let arg = supply.fresh_var()?;
            let mid = supply.fresh_var()?;
            let ret = supply.fresh_var()?;
            solve(
                Category::right(arg.clone(), ret.clone()),
                vec![
                    (x.clone(), Category::right(arg, mid.clone())),
                    (y.clone(), Category::right(mid, ret)),
                ],
            )
        }
        (Category::Unbound(_), Category::Right { arg: yarg, ret: yret }) => {
            let arg = supply.fresh_var()?;
            solve(
                Category::right(arg.clone(), (**yret).clone()),
                vec![(x.clone(), Category::right(arg, (**yarg).clone()))],
            )
        }
        (Category::Right { arg: xarg, ret: xret }, Category::Unbound(_)) => {
            let ret = supply.fresh_var()?;
            solve(
                Category::right((**xarg).clone(), ret.clone()),
                vec![(y.clone(), Category::right((**xret).clone(), ret))],
            )
        }
        (Category::Right { arg: xarg, ret: xret }, Category::Right { arg: yarg, ret: yret }) => {
            matched(Category::right((**xarg).clone(), (**yret).clone()), xret, yarg)
        }
        _ => None,
    }
}

/// `a<b  b  ⇒  a`
pub fn left_application(x: &Category, y: &Category, supply: &mut VarSupply) -> Option<Rewrite> {
    match x {
        Category::Unbound(_) => {
            let ret = supply.fresh_var()?;
            solve(ret.clone(), vec![(x.clone(), Category::left(ret, y.clone()))])
        }
        Category::Left { arg, ret } => matched((**ret).clone(), arg, y),
        _ => None,
    }
}

/// `b  b>a  ⇒  a`
pub fn right_application(x: &Category, y: &Category, supply: &mut VarSupply) -> Option<Rewrite> {
    match y {
        Category::Unbound(_) => {
            let ret = supply.fresh_var()?;
            solve(ret.clone(), vec![(y.clone(), Category::right(x.clone(), ret))])
        }
        Category::Right { arg, ret } => matched((**ret).clone(), arg, x),
        _ => None,
    }
}

// ============================================================================
// Rule Tables
// ============================================================================

/// Rules rewriting a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryRule {
    RightTypeRaising,
    LeftTypeRaising,
}

impl UnaryRule {
    /// Every unary rule, in search order.
    pub const ALL: [UnaryRule; 2] = [UnaryRule::RightTypeRaising, UnaryRule::LeftTypeRaising];

    /// Human-readable rule name.
    pub fn name(&self) -> &'static str {
        match self {
            UnaryRule::RightTypeRaising => "right_type_raising",
            UnaryRule::LeftTypeRaising => "left_type_raising",
        }
    }

    /// Apply the rule. Type-raising succeeds on every category; `None`
    /// only means `supply` has no tokens left.
    pub fn apply(&self, x: &Category, supply: &mut VarSupply) -> Option<Rewrite> {
        match self {
            UnaryRule::RightTypeRaising => right_type_raising(x, supply),
            UnaryRule::LeftTypeRaising => left_type_raising(x, supply),
        }
    }
}

impl fmt::Display for UnaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rules combining two adjacent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryRule {
    RightComposition,
    LeftComposition,
    RightApplication,
    LeftApplication,
}

impl BinaryRule {
    /// Every binary rule, in rewrite-queue search order.
    pub const ALL: [BinaryRule; 4] = [
        BinaryRule::RightComposition,
        BinaryRule::LeftComposition,
        BinaryRule::RightApplication,
        BinaryRule::LeftApplication,
    ];

    /// Application rules in the order tree resolution tries them.
    pub const APPLICATION: [BinaryRule; 2] =
        [BinaryRule::LeftApplication, BinaryRule::RightApplication];

    /// Human-readable rule name.
    pub fn name(&self) -> &'static str {
        match self {
            BinaryRule::RightComposition => "right_composition",
            BinaryRule::LeftComposition => "left_composition",
            BinaryRule::RightApplication => "right_application",
            BinaryRule::LeftApplication => "left_application",
        }
    }

    /// Apply the rule to the adjacent pair `x y`.
    pub fn apply(&self, x: &Category, y: &Category, supply: &mut VarSupply) -> Option<Rewrite> {
        match self {
            BinaryRule::RightComposition => right_composition(x, y, supply),
            BinaryRule::LeftComposition => left_composition(x, y, supply),
            BinaryRule::RightApplication => right_application(x, y, supply),
            BinaryRule::LeftApplication => left_application(x, y, supply),
        }
    }
}

impl fmt::Display for BinaryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> (Category, Category, Category) {
        (
            Category::atomic("a"),
            Category::atomic("b"),
            Category::atomic("c"),
        )
    }

    #[test]
    fn test_type_raising_shapes() {
        let (a, _, _) = abc();
        let mut supply = VarSupply::new();

        let raised = right_type_raising(&a, &mut supply).unwrap();
        let t = Category::unbound(crate::category::VarId(0));
        assert_eq!(raised.category, &t << &(&a >> &t));
        assert!(raised.bindings.is_empty());

        let raised = left_type_raising(&a, &mut supply).unwrap();
        let t = Category::unbound(crate::category::VarId(1));
        assert_eq!(raised.category, (&t << &a) >> t);
    }

    #[test]
    fn test_type_raising_grows() {
        let (a, b, _) = abc();
        let mut supply = VarSupply::new();
        let f = &a << &b;
        for rule in UnaryRule::ALL {
            assert_eq!(rule.apply(&f, &mut supply).unwrap().category.count(), f.count() + 2);
        }
    }

    #[test]
    fn test_left_composition_concrete() {
        let (a, b, c) = abc();
        let mut supply = VarSupply::new();
        let rewrite = left_composition(&(&a << &b), &(&b << &c), &mut supply).unwrap();
        assert_eq!(rewrite.resolved(), &a << &c);
    }

    #[test]
    fn test_right_composition_concrete() {
        let (a, b, c) = abc();
        let mut supply = VarSupply::new();
        let rewrite = right_composition(&(&a >> &b), &(&b >> &c), &mut supply).unwrap();
        assert_eq!(rewrite.resolved(), &a >> &c);
    }

    #[test]
    fn test_composition_boundary_mismatch() {
        let (a, b, c) = abc();
        let mut supply = VarSupply::new();
        assert!(left_composition(&(&a << &b), &(&c << &a), &mut supply).is_none());
        assert!(right_composition(&(&a >> &b), &(&c >> &a), &mut supply).is_none());
        // Opposite directions never compose.
        assert!(left_composition(&(&a << &b), &(&b >> &c), &mut supply).is_none());
    }

    #[test]
    fn test_composition_with_variable_operand() {
        let (a, b, _) = abc();
        let mut supply = VarSupply::above([&a]);
        let v = supply.fresh_var().unwrap();

        let rewrite = left_composition(&v, &(&a << &b), &mut supply).unwrap();
        let result = rewrite.resolved();
        // $r<b, with $v bound to $r<a
        match &result {
            Category::Left { arg, ret } => {
                assert_eq!(**arg, b);
                assert_eq!(rewrite.bindings.apply(&v), Category::left((**ret).clone(), a));
            }
            other => panic!("expected left functor, got {}", other),
        }
    }

    #[test]
    fn test_composition_both_variables() {
        let mut supply = VarSupply::new();
        let x = supply.fresh_var().unwrap();
        let y = supply.fresh_var().unwrap();
        let rewrite = right_composition(&x, &y, &mut supply).unwrap();
        assert_eq!(rewrite.bindings.len(), 2);
        assert!(rewrite.resolved().alpha_eq(&(&x >> &y)));
    }

    #[test]
    fn test_composition_same_variable_twice() {
        // $0 = r<m and $0 = m<a force r = m = a.
        let mut supply = VarSupply::new();
        let x = supply.fresh_var().unwrap();
        let rewrite = left_composition(&x, &x, &mut supply).unwrap();
        let resolved = rewrite.resolved();
        match resolved {
            Category::Left { arg, ret } => assert_eq!(arg, ret),
            other => panic!("expected left functor, got {}", other),
        }
    }

    #[test]
    fn test_left_application() {
        let (a, b, _) = abc();
        let mut supply = VarSupply::new();
        let rewrite = left_application(&(&a << &b), &b, &mut supply).unwrap();
        assert_eq!(rewrite.resolved(), a);
        assert!(left_application(&(&a << &b), &a, &mut supply).is_none());
        assert!(left_application(&(&b >> &a), &b, &mut supply).is_none());
    }

    #[test]
    fn test_right_application() {
        let (a, b, _) = abc();
        let mut supply = VarSupply::new();
        let rewrite = right_application(&b, &(&b >> &a), &mut supply).unwrap();
        assert_eq!(rewrite.resolved(), a);
        assert!(right_application(&a, &(&b >> &a), &mut supply).is_none());
    }

    #[test]
    fn test_application_invents_functor() {
        let (a, _, _) = abc();
        let mut supply = VarSupply::new();
        let f = supply.fresh_var().unwrap();

        let rewrite = left_application(&f, &a, &mut supply).unwrap();
        let ret = rewrite.resolved();
        assert!(ret.is_var());
        assert_eq!(rewrite.bindings.apply(&f), &ret << &a);

        let rewrite = right_application(&a, &f, &mut supply).unwrap();
        let ret = rewrite.resolved();
        assert_eq!(rewrite.bindings.apply(&f), &a >> &ret);
    }

    #[test]
    fn test_application_occurs_check() {
        // $0 applied to $0<a would need $0 = r<($0<a).
        let (a, _, _) = abc();
        let mut supply = VarSupply::new();
        let f = supply.fresh_var().unwrap();
        assert!(left_application(&f, &(&f << &a), &mut supply).is_none());
    }

    #[test]
    fn test_application_binds_argument_variable() {
        let (a, b, _) = abc();
        let mut supply = VarSupply::new();
        let v = supply.fresh_var().unwrap();
        let rewrite = left_application(&(&a << &v), &b, &mut supply).unwrap();
        assert_eq!(rewrite.resolved(), a);
        assert_eq!(rewrite.bindings.apply(&v), b);
    }

    #[test]
    fn test_exhausted_supply() {
        let (a, b, _) = abc();
        let top = Category::unbound(crate::category::VarId(u32::MAX));
        let mut supply = VarSupply::above([&top]);

        for rule in UnaryRule::ALL {
            assert!(rule.apply(&a, &mut supply).is_none());
        }
        // Inventing a functor needs a token; matching a concrete one does not.
        assert!(left_application(&top, &a, &mut supply).is_none());
        let rewrite = left_application(&(&a << &b), &b, &mut supply).unwrap();
        assert_eq!(rewrite.resolved(), a);
    }

    #[test]
    fn test_rule_tables() {
        let names: Vec<_> = BinaryRule::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "right_composition",
                "left_composition",
                "right_application",
                "left_application"
            ]
        );
        assert_eq!(UnaryRule::ALL[0].to_string(), "right_type_raising");
    }
}
