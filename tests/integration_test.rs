//! Integration tests for the LSEQ CRDT.
//!
//! These tests drive several replicas through the host and verify convergence,
//! commutativity and idempotence across the classic editing scenarios.

use crdt_lseq::{
    AllocatorConfig, Broadcaster, FifoBroadcaster, Message, NetworkServer, SharedEditor, SiteId,
};

fn render_all(network: &NetworkServer<impl Broadcaster>) -> Vec<String> {
    network
        .replicas()
        .into_iter()
        .map(|site| network.render(site).unwrap())
        .collect()
}

fn type_text(network: &NetworkServer, site: SiteId, text: &str) {
    for ch in text.chars() {
        let len = network.with_replica(site, SharedEditor::len).unwrap();
        network.local_insert(site, len, ch).unwrap();
    }
}

#[test]
fn test_basic_convergence() {
    let network = NetworkServer::new();
    let editor1 = network.register_replica();
    let editor2 = network.register_replica();
    assert_eq!((editor1, editor2), (0, 1));

    network.local_insert(editor1, 0, 'c').unwrap();
    network.local_insert(editor1, 1, 'a').unwrap();
    network.local_insert(editor1, 2, 't').unwrap();

    // Nothing reaches the other replica before dispatch
    assert_eq!(network.render(editor2).unwrap(), "");

    network.dispatch_pending();
    assert_eq!(network.render(editor1).unwrap(), "cat");
    assert_eq!(network.render(editor2).unwrap(), "cat");
}

#[test]
fn test_editing_session() {
    let network = NetworkServer::new();
    let editor1 = network.register_replica();
    let editor2 = network.register_replica();

    type_text(&network, editor1, "cat");
    network.dispatch_pending();

    // Commutativity: concurrent insert and erase
    network.local_insert(editor1, 1, 'h').unwrap();
    network.local_erase(editor2, 1).unwrap();
    assert_eq!(network.render(editor1).unwrap(), "chat");
    assert_eq!(network.render(editor2).unwrap(), "ct");

    network.dispatch_pending();
    assert_eq!(network.render(editor1).unwrap(), "cht");
    assert_eq!(network.render(editor2).unwrap(), "cht");

    // Idempotence: both erase the same character
    network.local_erase(editor1, 0).unwrap();
    network.local_erase(editor2, 0).unwrap();

    network.dispatch_pending();
    assert_eq!(network.render(editor1).unwrap(), "ht");
    assert_eq!(network.render(editor2).unwrap(), "ht");

    // Concurrent inserts at the same index
    network.local_insert(editor1, 1, 'a').unwrap();
    network.local_insert(editor2, 1, 'b').unwrap();

    network.dispatch_pending();
    assert_eq!(network.render(editor1).unwrap(), "habt");
    assert_eq!(network.render(editor2).unwrap(), "habt");
}

#[test]
fn test_same_position_tie_break_by_site() {
    let network = NetworkServer::new();
    let low = network.register_replica();
    let high = network.register_replica();

    type_text(&network, low, "()");
    network.dispatch_pending();

    // Insert in the opposite order of site ids to make sure the result
    // does not depend on who edited first
    network.local_insert(high, 1, 'Y').unwrap();
    network.local_insert(low, 1, 'X').unwrap();
    network.dispatch_pending();

    let symbols = network.with_replica(low, SharedEditor::symbols).unwrap();
    assert_eq!(symbols[1].position(), symbols[2].position());

    assert_eq!(network.render(low).unwrap(), "(XY)");
    assert_eq!(network.render(high).unwrap(), "(XY)");
}

#[test]
fn test_three_way_merge() {
    let network = NetworkServer::new();
    let sites: Vec<_> = (0..3).map(|_| network.register_replica()).collect();

    type_text(&network, sites[0], "shared");
    network.dispatch_pending();

    // Each replica makes a different change
    network.local_insert(sites[0], 0, '[').unwrap();
    network.local_erase(sites[1], 3).unwrap();
    network.local_insert(sites[2], 6, ']').unwrap();

    network.dispatch_pending();

    let renders = render_all(&network);
    assert_eq!(renders[0], renders[1]);
    assert_eq!(renders[1], renders[2]);
    assert_eq!(renders[0], "[shaed]");
}

#[test]
fn test_site_counters_are_monotonic() {
    let network = NetworkServer::new();
    let site = network.register_replica();

    let mut previous = None;
    for (index, ch) in "monotonic".chars().enumerate() {
        let id = network.local_insert(site, index, ch).unwrap();
        assert_eq!(id.site_id(), site);
        if let Some(previous) = previous {
            assert!(id.site_counter() > previous);
        }
        previous = Some(id.site_counter());
    }

    network.local_erase(site, 0).unwrap();
    let id = network.local_insert(site, 0, 'M').unwrap();
    assert_eq!(id.site_counter(), 9);
}

#[test]
fn test_late_joiner_only_sees_new_edits() {
    let network = NetworkServer::new();
    let early = network.register_replica();
    type_text(&network, early, "old");
    network.dispatch_pending();

    let late = network.register_replica();
    assert_eq!(network.render(late).unwrap(), "");

    network.local_insert(early, 3, '!').unwrap();
    network.dispatch_pending();
    assert_eq!(network.render(late).unwrap(), "!");
}

/// Delivers each batch grouped by origin, highest site id first, keeping the
/// per-origin order intact.
#[derive(Default)]
struct ReversedOrigins {
    inner: FifoBroadcaster,
    queue: Vec<Message>,
}

impl Broadcaster for ReversedOrigins {
    fn register(&mut self) -> SiteId {
        self.inner.register()
    }

    fn deregister(&mut self, site_id: SiteId) -> bool {
        self.inner.deregister(site_id)
    }

    fn send(&mut self, message: Message) {
        self.queue.push(message);
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }

    fn dispatch(&mut self, deliver: &mut dyn FnMut(SiteId, &Message)) -> usize {
        let mut batch = std::mem::take(&mut self.queue);
        // Stable sort keeps each origin's messages in send order
        batch.sort_by_key(|message| std::cmp::Reverse(message.origin()));
        for message in batch {
            self.inner.send(message);
        }
        self.inner.dispatch(deliver)
    }
}

#[test]
fn test_convergence_with_reordered_origins() {
    let fifo = NetworkServer::new();
    let reversed =
        NetworkServer::with_broadcaster(ReversedOrigins::default(), AllocatorConfig::default())
            .unwrap();

    for _ in 0..3 {
        fifo.register_replica();
        reversed.register_replica();
    }

    let rounds: [&[(SiteId, usize, char)]; 3] = [
        &[(0, 0, 'a'), (0, 1, 'b'), (1, 0, 'x'), (2, 0, 'z')],
        &[(0, 1, 'c'), (1, 2, 'y'), (2, 4, 'w')],
        &[(1, 0, '<'), (2, 0, '>'), (0, 3, '-')],
    ];

    for round in rounds {
        for &(site, index, ch) in round {
            fifo.local_insert(site, index, ch).unwrap();
            reversed.local_insert(site, index, ch).unwrap();
        }
        fifo.dispatch_pending();
        reversed.dispatch_pending();
    }

    let expected = render_all(&fifo);
    assert!(expected.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(render_all(&reversed), expected);
}

#[test]
fn test_custom_allocator_config() {
    let config = AllocatorConfig {
        base: 4,
        boundary: 1,
    };
    let network = NetworkServer::with_config(config).unwrap();
    let a = network.register_replica();
    let b = network.register_replica();

    type_text(&network, a, "tiny base");
    network.dispatch_pending();

    assert_eq!(network.render(b).unwrap(), "tiny base");
    let symbols = network.with_replica(b, SharedEditor::symbols).unwrap();
    assert!(symbols.iter().all(|s| s.position().components().iter().all(|&c| c < 4)));
    assert!(symbols.windows(2).all(|pair| pair[0] < pair[1]));
}
