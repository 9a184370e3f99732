//! # CCG - Combinatory Categorial Grammar Recognition
//!
//! This crate decides whether a sequence of categories reduces to a single
//! category under type-raising, composition and application, with
//! first-order unification over categories that contain type variables.
//!
//! ## Core Concepts
//!
//! - **Categories**: atoms, variables, and functors `ret<arg` / `arg>ret`
//! - **Unification**: solving category equations with occurs check
//! - **Combinators**: type-raising, composition, application
//! - **Rewrite-queue search**: breadth-first over whole sequences, all rules
//! - **Tree-directed search**: every bracketing, application plus lifting
//!
//! ## Example: Parsing "Alice loves Bob"
//!
//! ```rust
//! use compositional_ccg::{dparse, parse, Category, Lexicon};
//!
//! let lexicon = Lexicon::english_basic();
//! let cats = lexicon.categorize(&["Alice", "loves", "Bob"]).unwrap();
//! let s = Category::atomic("s");
//!
//! // Tree-directed search tries each bracketing once.
//! assert_eq!(dparse(&cats).collect::<Vec<_>>(), vec![s.clone()]);
//!
//! // The rewrite queue streams derivations breadth-first.
//! assert_eq!(parse(&cats).next(), Some(s));
//! ```

pub mod category;
pub mod config;
mod error;
pub mod hooks;
pub mod lexicon;
pub mod notation;
pub mod rules;
pub mod search;
pub mod unify;

pub use category::{Category, VarId, VarSupply};
pub use config::{SearchConfig, Truncation};
pub use error::CcgError;
pub use hooks::{CompositeHook, CountingHook, LoggingHook, NullHook, SearchHook};
pub use lexicon::Lexicon;
pub use rules::{BinaryRule, Rewrite, UnaryRule};
pub use search::{dparse, parse, Derivation, DParse, Parse, Parser, Resolution, Tree};
pub use unify::{unify, Equation, Substitution, UnifyError};
