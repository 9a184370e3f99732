//! # Search Tests
//!
//! Tests for both search strategies driven from the public API:
//! - Sentences categorized through the lexicon
//! - Ambiguity surfaced as multiple results
//! - Configured bounds and truncation reporting
//! - Hooks and derivation/resolution inspection

use compositional_ccg::notation::parse_sequence;
use compositional_ccg::search::AppliedRule;
use compositional_ccg::{
    BinaryRule, Category, CompositeHook, CountingHook, Lexicon, LoggingHook, Parser,
    SearchConfig, SearchHook, VarId, VarSupply,
};
use std::sync::Arc;

fn s() -> Category {
    Category::atomic("s")
}

// ============================================================================
// Sentences
// ============================================================================

#[test]
fn test_transitive_sentence() {
    let lexicon = Lexicon::english_basic();
    let cats = lexicon.categorize(&["Alice", "loves", "Bob"]).unwrap();
    let parser = Parser::default();

    let resolutions: Vec<_> = parser.resolutions(&cats).collect();
    assert_eq!(resolutions.len(), 1);
    assert_eq!(resolutions[0].category, s());
    assert_eq!(resolutions[0].tree.to_string(), "(np ((np>s)<np np))");

    assert_eq!(parser.parse(&cats).next(), Some(s()));
}

#[test]
fn test_noun_phrase_sentence() {
    let lexicon = Lexicon::english_basic();
    let cats = lexicon.categorize(&["the", "big", "dog", "runs"]).unwrap();
    let parser = Parser::default();

    let results: Vec<Category> = parser.dparse(&cats).collect();
    assert_eq!(results, vec![s()]);

    assert_eq!(parser.parse(&cats).next(), Some(s()));
}

#[test]
fn test_sentence_complement() {
    let lexicon = Lexicon::english_basic();
    let cats = lexicon
        .categorize(&["Alice", "thinks", "Bob", "runs"])
        .unwrap();

    let results: Vec<Category> = Parser::default().dparse(&cats).collect();
    assert!(results.contains(&s()));
}

#[test]
fn test_ungrammatical_order() {
    let lexicon = Lexicon::english_basic();
    let cats = lexicon.categorize(&["loves", "Alice", "Bob"]).unwrap();

    let results: Vec<Category> = Parser::default().dparse(&cats).collect();
    assert!(!results.contains(&s()));
}

#[test]
fn test_notation_input() {
    let mut supply = VarSupply::new();
    let cats = parse_sequence("z<y, x, x>y", &mut supply).unwrap();
    let results: Vec<Category> = Parser::default().dparse(&cats).collect();
    assert_eq!(results, vec![Category::atomic("z")]);
}

#[test]
fn test_shared_variable_across_bracketing() {
    // $v is fixed to x by the first application and must stay fixed.
    let mut supply = VarSupply::new();
    let cats = parse_sequence("t<$v, x, t>$v", &mut supply).unwrap();
    let x = Category::atomic("x");

    let resolutions: Vec<_> = Parser::default().resolutions(&cats).collect();
    assert_eq!(resolutions.len(), 1);
    assert_eq!(resolutions[0].category, x);
    assert_eq!(resolutions[0].bindings.apply(&cats[0]), &Category::atomic("t") << &x);

    assert_eq!(Parser::default().parse(&cats).next(), Some(x));
}

#[test]
fn test_largest_variable_token_in_input() {
    let x = Category::atomic("x");
    let top = Category::unbound(VarId(u32::MAX));

    let results: Vec<Category> = Parser::default().dparse(&[top.clone(), x.clone()]).collect();
    assert!(results.is_empty());

    let mut derivations = Parser::default().derivations(&[&x << &top, x.clone()]);
    assert_eq!(derivations.next().map(|d| d.category), Some(x));
    assert!(derivations.next().is_none());
    assert!(derivations.is_truncated());
}

// ============================================================================
// Ambiguity
// ============================================================================

#[test]
fn test_rewrite_queue_enumerates_derivations() {
    let a = Category::atomic("a");
    let b = Category::atomic("b");
    let c = Category::atomic("c");

    let parser = Parser::default();
    let derivations: Vec<_> = parser.derivations(&[&a << &b, &b << &c, c]).take(2).collect();

    assert_eq!(derivations.len(), 2);
    assert!(derivations.iter().all(|d| d.category == a && d.depth() == 2));
    assert_eq!(
        derivations[0].steps[0].rule,
        AppliedRule::Binary(BinaryRule::LeftComposition)
    );
    assert_eq!(
        derivations[1].steps[0].rule,
        AppliedRule::Binary(BinaryRule::LeftApplication)
    );
    assert!(!derivations[0].uses_raising());
}

#[test]
fn test_variables_in_input() {
    // $f applied to x: the functor shape is invented.
    let mut supply = VarSupply::new();
    let cats = parse_sequence("$f, x", &mut supply).unwrap();

    let results: Vec<Category> = Parser::default().dparse(&cats).collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_var());
    // Fresh variables never collide with the caller's.
    assert!(!cats[0].variables().contains(&results[0].as_var().unwrap()));
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_depth_bound_reports_truncation() {
    let x = Category::atomic("x");
    let y = Category::atomic("y");
    let parser = Parser::new(SearchConfig::unbounded().with_max_depth(1));

    let mut derivations = parser.derivations(&[&y << &x, x]);
    let results: Vec<_> = derivations.by_ref().collect();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].category, y);
    assert!(derivations.is_truncated());
}

#[test]
fn test_singleton_exhausts_without_truncation() {
    let mut derivations = Parser::new(SearchConfig::unbounded()).derivations(&[s()]);
    assert_eq!(derivations.by_ref().count(), 1);
    assert!(!derivations.is_truncated());
}

#[test]
fn test_config_from_json() {
    let config = SearchConfig::from_json(r#"{ "max_depth": 2, "max_category_size": 4 }"#).unwrap();
    let parser = Parser::new(config);
    assert_eq!(parser.config().max_depth, Some(2));

    let x = Category::atomic("x");
    let y = Category::atomic("y");
    let results: Vec<Category> = parser.parse(&[x.clone(), &x >> &y]).collect();
    assert!(results.contains(&y));
}

#[test]
fn test_counting_hook_tracks_rewrite_queue() {
    let x = Category::atomic("x");
    let y = Category::atomic("y");
    let counter = Arc::new(CountingHook::new());
    let parser = Parser::new(SearchConfig::unbounded().with_max_depth(2))
        .with_shared_hook(counter.clone());

    let mut derivations = parser.derivations(&[x.clone(), &x >> &y]);
    let found = derivations.by_ref().count();

    assert_eq!(counter.yields(), found);
    assert_eq!(counter.expansions() + counter.yields(), derivations.expanded());
    assert!(counter.truncations() > 0);
}

// ============================================================================
// Hooks and Inspection
// ============================================================================

#[test]
fn test_logging_hook_runs() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("compositional_ccg=trace")
        .try_init();

    let lexicon = Lexicon::english_basic();
    let cats = lexicon.categorize(&["Alice", "runs"]).unwrap();
    let parser = Parser::new(SearchConfig::default().with_max_depth(2)).with_hook(
        CompositeHook::new()
            .with(LoggingHook::verbose())
            .with(LoggingHook::new()),
    );

    assert_eq!(parser.dparse(&cats).next(), Some(s()));
    assert_eq!(parser.parse(&cats).next(), Some(s()));
}

#[test]
fn test_resolution_tree_graph() {
    let lexicon = Lexicon::english_basic();
    let cats = lexicon.categorize(&["the", "dog", "runs"]).unwrap();
    let resolution = Parser::default().resolutions(&cats).next().unwrap();

    let (root, graph) = resolution.tree.to_graph();
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph[root], None);
    assert_eq!(resolution.tree.leaf_count(), 3);
}

#[test]
fn test_custom_hook() {
    #[derive(Default)]
    struct FailureLog(std::sync::Mutex<Vec<String>>);

    impl SearchHook for FailureLog {
        fn on_node_failure(&self, left: &Category, right: &Category) {
            self.0
                .lock()
                .unwrap()
                .push(format!("{} {}", left, right));
        }
    }

    let x = Category::atomic("x");
    let y = Category::atomic("y");
    let z = Category::atomic("z");
    let log = Arc::new(FailureLog::default());
    let parser = Parser::default().with_shared_hook(log.clone());

    let _: Vec<Category> = parser.dparse(&[&z << &y, x.clone(), &x >> &y]).collect();
    let failures = log.0.lock().unwrap();
    assert_eq!(failures.as_slice(), ["z<y x"]);
}
