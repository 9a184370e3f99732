//! Search hooks for observability.
//!
//! Hooks observe both search strategies without changing them.
//!
//! ## Events
//!
//! - `on_expand`: a rewrite-queue candidate is about to be expanded
//! - `on_yield`: a rewrite-queue candidate collapsed to one category
//! - `on_truncate`: a successor was dropped by a configured bound
//! - `on_bracketing`: tree search starts resolving a bracketing
//! - `on_lift`: tree search retries application with a raised category
//! - `on_resolution`: a bracketing resolved to a category
//! - `on_node_failure`: two resolved subtrees could not be combined
//!
//! ## Example
//!
//! ```
//! use compositional_ccg::{Category, Parser};
//! use compositional_ccg::hooks::CountingHook;
//! use std::sync::Arc;
//!
//! let counter = Arc::new(CountingHook::new());
//! let parser = Parser::default().with_shared_hook(counter.clone());
//!
//! let (x, y, z) = (Category::atomic("x"), Category::atomic("y"), Category::atomic("z"));
//! let cats = vec![&z << &y, x.clone(), &x >> &y];
//! let _: Vec<_> = parser.dparse(&cats).collect();
//!
//! assert_eq!(counter.bracketings(), 2);
//! ```

use crate::category::Category;
use crate::config::Truncation;
use crate::search::Tree;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

// ============================================================================
// Search Hook Trait
// ============================================================================

/// Trait for observing search events.
///
/// All methods have default no-op implementations, so you only need to
/// implement the events you care about.
pub trait SearchHook: Send + Sync {
    /// Called before a candidate sequence is expanded.
    ///
    /// # Arguments
    /// * `sequence` - The candidate being expanded
    /// * `depth` - Number of rule applications that produced it
    fn on_expand(&self, _sequence: &[Category], _depth: usize) {}

    /// Called when the rewrite queue yields a category.
    fn on_yield(&self, _category: &Category, _depth: usize) {}

    /// Called when a successor is dropped by a configured bound.
    fn on_truncate(&self, _reason: Truncation) {}

    /// Called before a bracketing is resolved.
    fn on_bracketing(&self, _tree: &Tree<Category>) {}

    /// Called for every lifted category tried against its partner.
    ///
    /// # Arguments
    /// * `lifted` - The raised category
    /// * `partner` - The unmodified category on the other side
    fn on_lift(&self, _lifted: &Category, _partner: &Category) {}

    /// Called when a bracketing resolves.
    fn on_resolution(&self, _category: &Category) {}

    /// Called when a tree node fails after every lift was tried.
    fn on_node_failure(&self, _left: &Category, _right: &Category) {}
}

// ============================================================================
// Null Hook (Default)
// ============================================================================

/// A no-op hook implementation for when no observation is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHook;

impl SearchHook for NullHook {}

// ============================================================================
// Logging Hook
// ============================================================================

/// A hook that reports events through `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook {
    /// Whether to report per-candidate and per-lift events
    pub verbose: bool,
}

impl LoggingHook {
    /// Create a new logging hook.
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Create a verbose logging hook.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl SearchHook for LoggingHook {
    fn on_expand(&self, sequence: &[Category], depth: usize) {
        if self.verbose {
            let rendered: Vec<String> = sequence.iter().map(|c| c.to_string()).collect();
            info!(depth, sequence = %rendered.join(" "), "expanding candidate");
        }
    }

    fn on_yield(&self, category: &Category, depth: usize) {
        info!(depth, %category, "derivation found");
    }

    fn on_truncate(&self, reason: Truncation) {
        if self.verbose {
            info!(?reason, "successor dropped");
        }
    }

    fn on_bracketing(&self, tree: &Tree<Category>) {
        info!(%tree, "resolving bracketing");
    }

    fn on_lift(&self, lifted: &Category, partner: &Category) {
        if self.verbose {
            info!(%lifted, %partner, "trying lifted category");
        }
    }

    fn on_resolution(&self, category: &Category) {
        info!(%category, "bracketing resolved");
    }

    fn on_node_failure(&self, left: &Category, right: &Category) {
        if self.verbose {
            info!(%left, %right, "node failed");
        }
    }
}

// ============================================================================
// Counting Hook
// ============================================================================

/// A hook that counts events.
#[derive(Debug, Default)]
pub struct CountingHook {
    expansions: AtomicUsize,
    yields: AtomicUsize,
    truncations: AtomicUsize,
    bracketings: AtomicUsize,
    lifts: AtomicUsize,
    resolutions: AtomicUsize,
    node_failures: AtomicUsize,
}

impl CountingHook {
    /// Create a hook with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expansions(&self) -> usize {
        self.expansions.load(Ordering::Relaxed)
    }

    pub fn yields(&self) -> usize {
        self.yields.load(Ordering::Relaxed)
    }

    pub fn truncations(&self) -> usize {
        self.truncations.load(Ordering::Relaxed)
    }

    pub fn bracketings(&self) -> usize {
        self.bracketings.load(Ordering::Relaxed)
    }

    pub fn lifts(&self) -> usize {
        self.lifts.load(Ordering::Relaxed)
    }

    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    pub fn node_failures(&self) -> usize {
        self.node_failures.load(Ordering::Relaxed)
    }
}

impl SearchHook for CountingHook {
    fn on_expand(&self, _sequence: &[Category], _depth: usize) {
        self.expansions.fetch_add(1, Ordering::Relaxed);
    }

    fn on_yield(&self, _category: &Category, _depth: usize) {
        self.yields.fetch_add(1, Ordering::Relaxed);
    }

    fn on_truncate(&self, _reason: Truncation) {
        self.truncations.fetch_add(1, Ordering::Relaxed);
    }

    fn on_bracketing(&self, _tree: &Tree<Category>) {
        self.bracketings.fetch_add(1, Ordering::Relaxed);
    }

    fn on_lift(&self, _lifted: &Category, _partner: &Category) {
        self.lifts.fetch_add(1, Ordering::Relaxed);
    }

    fn on_resolution(&self, _category: &Category) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    fn on_node_failure(&self, _left: &Category, _right: &Category) {
        self.node_failures.fetch_add(1, Ordering::Relaxed);
    }
}

// ============================================================================
// Composite Hook
// ============================================================================

/// A hook that delegates to multiple inner hooks.
pub struct CompositeHook {
    hooks: Vec<Box<dyn SearchHook>>,
}

impl CompositeHook {
    /// Create a new composite hook.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Add a hook to the composite.
    pub fn with<H: SearchHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }
}

impl Default for CompositeHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchHook for CompositeHook {
    fn on_expand(&self, sequence: &[Category], depth: usize) {
        for hook in &self.hooks {
            hook.on_expand(sequence, depth);
        }
    }

    fn on_yield(&self, category: &Category, depth: usize) {
        for hook in &self.hooks {
            hook.on_yield(category, depth);
        }
    }

    fn on_truncate(&self, reason: Truncation) {
        for hook in &self.hooks {
            hook.on_truncate(reason);
        }
    }

    fn on_bracketing(&self, tree: &Tree<Category>) {
        for hook in &self.hooks {
            hook.on_bracketing(tree);
        }
    }

    fn on_lift(&self, lifted: &Category, partner: &Category) {
        for hook in &self.hooks {
            hook.on_lift(lifted, partner);
        }
    }

    fn on_resolution(&self, category: &Category) {
        for hook in &self.hooks {
            hook.on_resolution(category);
        }
    }

    fn on_node_failure(&self, left: &Category, right: &Category) {
        for hook in &self.hooks {
            hook.on_node_failure(left, right);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
