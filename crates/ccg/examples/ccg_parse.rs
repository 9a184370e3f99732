//! CCG recognition end to end.
//!
//! Run with: cargo run -p compositional-ccg --example ccg_parse
//!
//! Set `RUST_LOG=compositional_ccg=debug` to watch the searches.
//!
//! This example walks through:
//! - Building categories and reading them from notation
//! - Unification with the occurs check
//! - Tree-directed search over every bracketing
//! - The rewrite queue with configured bounds and hooks

use compositional_ccg::notation::parse_sequence;
use compositional_ccg::{
    unify, Category, CountingHook, Lexicon, LoggingHook, Parser, SearchConfig, VarSupply,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Combinatory Categorial Grammar ===\n");

    // -------------------------------------------------------------------------
    // 1. Categories
    // -------------------------------------------------------------------------
    println!("1. Categories");
    println!("-------------\n");

    let np = Category::atomic("np");
    let s = Category::atomic("s");
    let verb = (&np >> &s) << np.clone();
    println!("Transitive verb: {}", verb);
    println!("Size: {}\n", verb.count());

    let mut supply = VarSupply::new();
    let cats = parse_sequence("z<y, x, x>y", &mut supply).unwrap();
    let shown: Vec<String> = cats.iter().map(|c| c.to_string()).collect();
    println!("Read from notation: {}\n", shown.join("  "));

    // -------------------------------------------------------------------------
    // 2. Unification
    // -------------------------------------------------------------------------
    println!("2. Unification");
    println!("--------------\n");

    let a = supply.fresh_var().unwrap();
    let b = supply.fresh_var().unwrap();
    let lhs = &a << &np;
    let rhs = &s << &b;
    match unify(vec![(lhs.clone(), rhs.clone())]) {
        Ok(subs) => {
            println!("{} = {}", lhs, rhs);
            for (var, value) in subs.bindings() {
                println!("  {} := {}", var, value);
            }
            println!();
        }
        Err(e) => println!("Failed: {}\n", e),
    }

    let cyclic = &a << &np;
    if let Err(e) = unify(vec![(a.clone(), cyclic.clone())]) {
        println!("{} = {}: {}\n", a, cyclic, e);
    }

    // -------------------------------------------------------------------------
    // 3. Tree-Directed Search
    // -------------------------------------------------------------------------
    println!("3. Tree-Directed Search");
    println!("-----------------------\n");

    let lexicon = Lexicon::english_basic();
    let counter = Arc::new(CountingHook::new());
    let parser = Parser::default().with_shared_hook(counter.clone());

    for sentence in [
        "Alice loves Bob",
        "the big dog runs",
        "Alice thinks Bob runs",
        "loves Alice Bob",
    ] {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        let cats = match lexicon.categorize(&words) {
            Ok(cats) => cats,
            Err(e) => {
                println!("\"{}\": {}", sentence, e);
                continue;
            }
        };
        let mut search = parser.resolutions(&cats);
        match search.next() {
            Some(resolution) => println!("\"{}\": {}", sentence, resolution),
            None => println!("\"{}\": no resolution", sentence),
        }
        println!("  bracketings tried: {}", search.attempted());
    }
    println!(
        "\nTotals: {} bracketings, {} lifts, {} node failures\n",
        counter.bracketings(),
        counter.lifts(),
        counter.node_failures()
    );

    // -------------------------------------------------------------------------
    // 4. Rewrite Queue
    // -------------------------------------------------------------------------
    println!("4. Rewrite Queue");
    println!("----------------\n");

    let config = SearchConfig::default().with_max_depth(3);
    println!("Config: {}", config.to_json().unwrap());
    let parser = Parser::new(config).with_hook(LoggingHook::new());

    let mut derivations = parser.derivations(&cats);
    for derivation in derivations.by_ref().take(3) {
        print!("{}", derivation.trace());
        println!();
    }
    println!(
        "Expanded {} candidates, {} pending, truncated: {}",
        derivations.expanded(),
        derivations.pending(),
        derivations.is_truncated()
    );
}
