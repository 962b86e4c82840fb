//! Property tests for the allocator and the replicated document.

use crdt_lseq::{Allocator, Message, NetworkServer, Position, SharedEditor};
use proptest::prelude::*;

/// A position the allocator could have produced: components below the default
/// base and a non-zero last component.
fn position() -> impl Strategy<Value = Position> {
    prop::collection::vec(0u32..1024, 1..6).prop_map(|mut components| {
        if let Some(last) = components.last_mut() {
            if *last == 0 {
                *last = 1;
            }
        }
        Position::new(components)
    })
}

#[derive(Debug, Clone)]
enum Edit {
    Insert { site: usize, seed: usize, value: char },
    Erase { site: usize, seed: usize },
    Dispatch,
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (0usize..3, any::<usize>(), proptest::char::range('a', 'z'))
            .prop_map(|(site, seed, value)| Edit::Insert { site, seed, value }),
        2 => (0usize..3, any::<usize>()).prop_map(|(site, seed)| Edit::Erase { site, seed }),
        1 => Just(Edit::Dispatch),
    ]
}

proptest! {
    #[test]
    fn allocated_position_is_strictly_between(a in position(), b in position()) {
        prop_assume!(a != b);
        let (prev, next) = if a < b { (a, b) } else { (b, a) };

        let mut allocator = Allocator::default();
        let middle = allocator.allocate_between(&prev, &next);
        prop_assert!(prev < middle, "{} !< {}", prev, middle);
        prop_assert!(middle < next, "{} !< {}", middle, next);
    }

    #[test]
    fn allocation_against_sentinels(p in position()) {
        let mut allocator = Allocator::default();

        let before = allocator.allocate_between(&allocator.begin(), &p);
        prop_assert!(allocator.begin() < before && before < p);

        let after = allocator.allocate_between(&p, &allocator.end());
        prop_assert!(p < after && after < allocator.end());
    }

    #[test]
    fn replicas_converge(edits in prop::collection::vec(edit(), 1..60)) {
        let network = NetworkServer::new();
        let sites: Vec<_> = (0..3).map(|_| network.register_replica()).collect();

        for edit in edits {
            match edit {
                Edit::Insert { site, seed, value } => {
                    let len = network.with_replica(sites[site], SharedEditor::len).unwrap();
                    network.local_insert(sites[site], seed % (len + 1), value).unwrap();
                }
                Edit::Erase { site, seed } => {
                    let len = network.with_replica(sites[site], SharedEditor::len).unwrap();
                    if len > 0 {
                        network.local_erase(sites[site], seed % len).unwrap();
                    }
                }
                Edit::Dispatch => {
                    network.dispatch_pending();
                }
            }
        }
        network.dispatch_pending();

        let first = network.render(sites[0]).unwrap();
        for &site in &sites[1..] {
            prop_assert_eq!(&network.render(site).unwrap(), &first);
        }
        for &site in &sites {
            let symbols = network.with_replica(site, SharedEditor::symbols).unwrap();
            prop_assert!(symbols.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn redelivery_is_idempotent(
        text in "[a-z]{1,20}",
        erase_seeds in prop::collection::vec(any::<usize>(), 0..5),
    ) {
        let source = SharedEditor::new(0);
        let mut messages: Vec<Message> = Vec::new();
        for (index, ch) in text.chars().enumerate() {
            messages.push(source.local_insert(index, ch).unwrap());
        }
        for seed in erase_seeds {
            if !source.is_empty() {
                messages.push(source.local_erase(seed % source.len()).unwrap());
            }
        }

        let once = SharedEditor::new(1);
        let twice = SharedEditor::new(2);
        for message in &messages {
            once.apply_remote(message).unwrap();
            twice.apply_remote(message).unwrap();
            twice.apply_remote(message).unwrap();
        }

        prop_assert_eq!(once.render(), source.render());
        prop_assert_eq!(twice.render(), source.render());
    }
}
