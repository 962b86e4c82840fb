//! Two replicas editing one document through the in-process fabric.
//!
//! This walks through the classic session: typing, a concurrent insert and
//! erase, a duplicate erase, and two inserts at the same spot.
//!
//! Run with: cargo run --example shared_editor

use crdt_lseq::{NetworkServer, SharedEditor, SiteId};
use tracing_subscriber::EnvFilter;

fn show(network: &NetworkServer, editor1: SiteId, editor2: SiteId) {
    println!("  editor1: '{}'", network.render(editor1).unwrap());
    println!("  editor2: '{}'", network.render(editor2).unwrap());
}

fn main() {
    // RUST_LOG=debug also prints the symbol dump below through tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Shared Editor Example ===\n");

    let network = NetworkServer::new();
    let editor1 = network.register_replica();
    let editor2 = network.register_replica();

    println!("editor1 types 'cat':");
    for (index, ch) in "cat".chars().enumerate() {
        network.local_insert(editor1, index, ch).unwrap();
    }
    network.dispatch_pending();
    show(&network, editor1, editor2);

    println!("\neditor1 inserts 'h' while editor2 erases 'a':");
    network.local_insert(editor1, 1, 'h').unwrap();
    network.local_erase(editor2, 1).unwrap();
    network.dispatch_pending();
    show(&network, editor1, editor2);

    println!("\nBoth erase the first character:");
    network.local_erase(editor1, 0).unwrap();
    network.local_erase(editor2, 0).unwrap();
    network.dispatch_pending();
    show(&network, editor1, editor2);

    println!("\nBoth insert at index 1:");
    network.local_insert(editor1, 1, 'a').unwrap();
    network.local_insert(editor2, 1, 'b').unwrap();
    network.dispatch_pending();
    show(&network, editor1, editor2);

    if network.render(editor1).unwrap() == network.render(editor2).unwrap() {
        println!("\n✓ SUCCESS: Both editors converged!");
    } else {
        println!("\n✗ ERROR: Editors did not converge!");
    }

    println!("\n--- Technical Details ---");
    let symbols = network.with_replica(editor1, SharedEditor::symbols).unwrap();
    for symbol in symbols {
        println!(
            "  '{}' id={} position={}",
            symbol.value(),
            symbol.id(),
            symbol.position()
        );
    }

    network
        .with_replica(editor2, SharedEditor::dump_symbols)
        .unwrap();
}
