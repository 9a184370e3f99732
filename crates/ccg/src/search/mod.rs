//! Searching for reductions of a category sequence.
//!
//! Two strategies are provided:
//!
//! - **Rewrite queue** ([`Parse`]): breadth-first over whole sequences with
//!   the full rule set, yielding every derivation it reaches.
//! - **Tree-directed** ([`DParse`]): one attempt per bracketing, using
//!   application plus bounded lifting.
//!
//! Both are lazy: work happens only while the caller pulls results.

mod queue;
mod tree;

pub use queue::{AppliedRule, Derivation, Parse, Step};
pub use tree::{
    bracketings, catalan, lift_limit, lifts, DParse, Lifter, Lifts, Resolution, Tree,
};

use crate::category::Category;
use crate::config::SearchConfig;
use crate::hooks::{NullHook, SearchHook};
use std::fmt;
use std::sync::Arc;

/// Search configuration plus an observer, shared by both strategies.
#[derive(Clone)]
pub struct Parser {
    config: SearchConfig,
    hook: Arc<dyn SearchHook>,
}

impl Parser {
    /// Create a parser with the given bounds and no hook.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            hook: Arc::new(NullHook),
        }
    }

    /// Attach a hook.
    pub fn with_hook<H: SearchHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Arc::new(hook);
        self
    }

    /// Attach a hook the caller keeps a handle to.
    pub fn with_shared_hook(mut self, hook: Arc<dyn SearchHook>) -> Self {
        self.hook = hook;
        self
    }

    /// The bounds used by the rewrite-queue search.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Rewrite-queue search, yielding derivations.
    pub fn derivations(&self, cats: &[Category]) -> Parse {
        Parse::new(cats, self.config.clone(), Arc::clone(&self.hook))
    }

    /// Rewrite-queue search, yielding categories.
    pub fn parse(&self, cats: &[Category]) -> impl Iterator<Item = Category> {
        self.derivations(cats).map(|derivation| derivation.category)
    }

    /// Tree-directed search, yielding resolutions.
    pub fn resolutions(&self, cats: &[Category]) -> DParse {
        DParse::new(cats, Arc::clone(&self.hook))
    }

    /// Tree-directed search, yielding categories.
    pub fn dparse(&self, cats: &[Category]) -> impl Iterator<Item = Category> {
        self.resolutions(cats).map(|resolution| resolution.category)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Rewrite-queue search with the default configuration.
pub fn parse(cats: &[Category]) -> impl Iterator<Item = Category> {
    Parser::default().parse(cats)
}

/// Tree-directed search.
pub fn dparse(cats: &[Category]) -> impl Iterator<Item = Category> {
    Parser::default().dparse(cats)
}
