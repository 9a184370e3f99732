//! Rewrite-queue search: breadth-first over whole sequences.
//!
//! The queue starts with the input sequence. Each popped sequence of
//! length one is yielded; anything longer is expanded by every unary rule
//! at every position and every binary rule at every adjacent pair, in
//! rule-then-position order, and the successors go to the back of the
//! queue. Bindings produced by a binary rule are applied to the whole
//! successor, not only to the combined category.
//!
//! Every derivation is yielded, not only the first, so ambiguous inputs
//! produce several results (and type-raising makes almost every input
//! ambiguous). Bounds come from [`SearchConfig`].

use crate::category::{Category, VarSupply};
use crate::config::{SearchConfig, Truncation};
use crate::hooks::SearchHook;
use crate::rules::{BinaryRule, UnaryRule};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A rule as recorded in a derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppliedRule {
    Unary(UnaryRule),
    Binary(BinaryRule),
}

impl AppliedRule {
    pub fn name(&self) -> &'static str {
        match self {
            AppliedRule::Unary(rule) => rule.name(),
            AppliedRule::Binary(rule) => rule.name(),
        }
    }
}

impl fmt::Display for AppliedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One rule application in a derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The rule applied
    pub rule: AppliedRule,
    /// Index of the (left) category it was applied to
    pub position: usize,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.rule, self.position)
    }
}

/// A sequence reduced to a single category, with the steps that got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    /// The final category
    pub category: Category,
    /// Rule applications, in order
    pub steps: Vec<Step>,
}

impl Derivation {
    /// Number of rule applications.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Check whether any type-raising was needed.
    pub fn uses_raising(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step.rule, AppliedRule::Unary(_)))
    }

    /// Display a trace of the derivation.
    pub fn trace(&self) -> String {
        let mut result = String::new();
        if self.steps.is_empty() {
            result.push_str("No rules applied.\n");
        } else {
            for (i, step) in self.steps.iter().enumerate() {
                result.push_str(&format!("  Step {}: {}\n", i + 1, step));
            }
        }
        result.push_str(&format!("Result: {}\n", self.category));
        result
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    cats: Vec<Category>,
    steps: Vec<Step>,
}

impl Candidate {
    fn successor(&self, cats: Vec<Category>, rule: AppliedRule, position: usize) -> Candidate {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(Step { rule, position });
        Candidate { cats, steps }
    }
}

/// Lazy stream of derivations from the rewrite-queue search.
///
/// Each call to `next` runs until the next singleton is found or the queue
/// is empty. Dropping the stream discards the pending work.
pub struct Parse {
    queue: VecDeque<Candidate>,
    supply: VarSupply,
    config: SearchConfig,
    hook: Arc<dyn SearchHook>,
    expanded: usize,
    truncated: bool,
}

impl Parse {
    pub(crate) fn new(cats: &[Category], config: SearchConfig, hook: Arc<dyn SearchHook>) -> Self {
        let mut queue = VecDeque::new();
        if !cats.is_empty() {
            queue.push_back(Candidate {
                cats: cats.to_vec(),
                steps: Vec::new(),
            });
        }
        Self {
            queue,
            supply: VarSupply::above(cats),
            config,
            hook,
            expanded: 0,
            truncated: false,
        }
    }

    /// Number of candidates popped so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of candidates waiting.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether any successor has been dropped by a bound.
    ///
    /// Once the stream has ended, `false` means the search space really
    /// was exhausted.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn truncate(&mut self, reason: Truncation) {
        if !self.truncated {
            warn!(?reason, "rewrite search truncated by configured bound");
        }
        self.truncated = true;
        self.hook.on_truncate(reason);
    }

    fn push(&mut self, candidate: Candidate) {
        if let Some(max) = self.config.max_category_size {
            if candidate.cats.iter().any(|cat| cat.count() > max) {
                self.truncate(Truncation::CategorySize);
                return;
            }
        }
        if let Some(max) = self.config.max_queue_len {
            if self.queue.len() >= max {
                self.truncate(Truncation::QueueFull);
                return;
            }
        }
        self.queue.push_back(candidate);
    }

    fn expand(&mut self, candidate: &Candidate) {
        if let Some(max) = self.config.max_depth {
            if candidate.steps.len() >= max {
                self.truncate(Truncation::Depth);
                return;
            }
        }

        let cats = &candidate.cats;
        for rule in UnaryRule::ALL {
            for i in 0..cats.len() {
                let Some(rewrite) = rule.apply(&cats[i], &mut self.supply) else {
                    continue;
                };
                let mut next = cats.clone();
                next[i] = rewrite.category;
                self.push(candidate.successor(next, AppliedRule::Unary(rule), i));
            }
        }

        for rule in BinaryRule::ALL {
            for i in 0..cats.len() - 1 {
                let Some(rewrite) = rule.apply(&cats[i], &cats[i + 1], &mut self.supply) else {
                    continue;
                };
                trace!(rule = rule.name(), position = i, result = %rewrite.category, "rule applied");
                let mut next = Vec::with_capacity(cats.len() - 1);
                next.extend_from_slice(&cats[..i]);
                next.push(rewrite.category);
                next.extend_from_slice(&cats[i + 2..]);
                let next = rewrite.bindings.apply_all(&next);
                self.push(candidate.successor(next, AppliedRule::Binary(rule), i));
            }
        }

        // Rules that needed a fresh variable were skipped.
        if self.supply.is_exhausted() {
            self.truncate(Truncation::Variables);
        }
    }
}

impl Iterator for Parse {
    type Item = Derivation;

    fn next(&mut self) -> Option<Derivation> {
        while let Some(candidate) = self.queue.pop_front() {
            self.expanded += 1;
            trace!(
                depth = candidate.steps.len(),
                len = candidate.cats.len(),
                pending = self.queue.len(),
                "dequeued candidate"
            );

            if let [category] = candidate.cats.as_slice() {
                debug!(depth = candidate.steps.len(), %category, "derivation found");
                self.hook.on_yield(category, candidate.steps.len());
                return Some(Derivation {
                    category: category.clone(),
                    steps: candidate.steps,
                });
            }

            self.hook.on_expand(&candidate.cats, candidate.steps.len());
            self.expand(&candidate);
        }

        debug!(
            expanded = self.expanded,
            truncated = self.truncated,
            "rewrite queue exhausted"
        );
        None
    }
}

impl fmt::Debug for Parse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parse")
            .field("pending", &self.queue.len())
            .field("expanded", &self.expanded)
            .field("truncated", &self.truncated)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::VarId;
    use crate::hooks::NullHook;

    fn run(cats: &[Category], config: SearchConfig) -> Parse {
        Parse::new(cats, config, Arc::new(NullHook))
    }

    #[test]
    fn test_singleton_is_yielded_once() {
        let s = Category::atomic("s");
        let mut parse = run(&[s.clone()], SearchConfig::default());
        let first = parse.next().unwrap();
        assert_eq!(first.category, s);
        assert_eq!(first.depth(), 0);
        // Singletons are not expanded, so nothing else is reachable.
        assert!(parse.next().is_none());
        assert!(!parse.is_truncated());
    }

    #[test]
    fn test_empty_input() {
        let mut parse = run(&[], SearchConfig::default());
        assert!(parse.next().is_none());
        assert_eq!(parse.expanded(), 0);
    }

    #[test]
    fn test_application_without_raising() {
        let x = Category::atomic("x");
        let y = Category::atomic("y");
        let mut parse = run(&[&y << &x, x], SearchConfig::default());
        let derivation = parse.next().unwrap();
        assert_eq!(derivation.category, y);
        assert_eq!(derivation.depth(), 1);
        assert_eq!(
            derivation.steps[0].rule,
            AppliedRule::Binary(BinaryRule::LeftApplication)
        );
    }

    #[test]
    fn test_depth_bound_exhausts() {
        let x = Category::atomic("x");
        let y = Category::atomic("y");
        let mut parse = run(&[x, y], SearchConfig::unbounded().with_max_depth(2));
        let results: Vec<_> = parse.by_ref().collect();
        assert!(parse.is_truncated());
        // Every derivation respects the bound.
        assert!(results.iter().all(|d| d.depth() <= 2));
    }

    #[test]
    fn test_category_size_bound() {
        let x = Category::atomic("x");
        let y = Category::atomic("y");
        let config = SearchConfig::unbounded().with_max_category_size(0);
        let mut parse = run(&[x, y], config);
        // Raising is pruned and atoms never combine, so the space is empty.
        assert!(parse.next().is_none());
        assert!(parse.is_truncated());
        assert_eq!(parse.expanded(), 1);
    }

    #[test]
    fn test_queue_bound() {
        let x = Category::atomic("x");
        let y = Category::atomic("y");
        let config = SearchConfig::unbounded()
            .with_max_depth(3)
            .with_max_queue_len(4);
        let mut parse = run(&[x, y], config);
        while parse.next().is_some() {
            assert!(parse.pending() <= 4);
        }
        assert!(parse.is_truncated());
    }

    #[test]
    fn test_exhausted_supply_truncates() {
        let x = Category::atomic("x");
        let top = Category::unbound(VarId(u32::MAX));
        let mut parse = run(&[&x << &top, x.clone()], SearchConfig::default());

        // Plain application needs no fresh variable.
        let derivation = parse.next().unwrap();
        assert_eq!(derivation.category, x);
        assert!(parse.next().is_none());
        assert!(parse.is_truncated());
    }

    #[test]
    fn test_trace() {
        let x = Category::atomic("x");
        let y = Category::atomic("y");
        let mut parse = run(&[x.clone(), &x >> &y], SearchConfig::default());
        let trace = parse.next().unwrap().trace();
        assert!(trace.contains("right_application at 0"));
        assert!(trace.contains("Result: y"));
    }
}
