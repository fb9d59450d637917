//! Property-based tests for the observer registries
//!
//! Replays random attach/detach sequences against a simple model and checks
//! that delivery matches registration exactly.

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use signal_registry::{Id, Identified, KeyedSubject, Observer, Subject};

// ============================================================================
// Test Helpers
// ============================================================================

struct Probe {
    id: Id,
    hits: AtomicUsize,
}

impl Probe {
    fn new(id: u64) -> Arc<Self> {
        Arc::new(Self {
            id: Id::new(id),
            hits: AtomicUsize::new(0),
        })
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Identified for Probe {
    fn id(&self) -> Id {
        self.id
    }
}

impl Observer<u8> for Probe {
    fn update(&self, _event: &u8, _payload: &()) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
enum Op {
    Attach(u64),
    Detach(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..8).prop_map(Op::Attach),
        (0u64..8).prop_map(Op::Detach),
    ]
}

// ============================================================================
// Attach/detach replay
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After any replay the registry holds exactly the ids attached and not
    /// subsequently detached.
    #[test]
    fn prop_replay_matches_model(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let probes: Vec<_> = (0..8).map(Probe::new).collect();
        let subject = Subject::<u8>::new();
        let mut model = BTreeSet::new();

        for op in &ops {
            match op {
                Op::Attach(id) => {
                    subject.attach_arc(&probes[*id as usize]);
                    model.insert(*id);
                }
                Op::Detach(id) => {
                    subject.detach_id(Id::new(*id));
                    model.remove(id);
                }
            }
        }

        let mut registered: Vec<u64> = subject.ids().into_iter().map(Id::value).collect();
        registered.sort_unstable();
        prop_assert_eq!(registered, model.iter().copied().collect::<Vec<_>>());
    }

    /// `notify(id)` delivers iff `id` is attached and still alive.
    #[test]
    fn prop_notify_delivers_iff_attached_and_alive(
        ops in prop::collection::vec(op_strategy(), 0..32),
        target in 0u64..8,
        drop_target in any::<bool>(),
    ) {
        let mut probes: Vec<Option<Arc<Probe>>> = (0..8).map(|i| Some(Probe::new(i))).collect();
        let subject = Subject::<u8>::new();
        let mut model = BTreeSet::new();

        for op in &ops {
            match op {
                Op::Attach(id) => {
                    if let Some(probe) = &probes[*id as usize] {
                        subject.attach_arc(probe);
                    }
                    model.insert(*id);
                }
                Op::Detach(id) => {
                    subject.detach_id(Id::new(*id));
                    model.remove(id);
                }
            }
        }

        if drop_target {
            probes[target as usize] = None;
        }

        let delivered = subject.notify_event(Id::new(target), &0);
        let expected = usize::from(model.contains(&target) && !drop_target);
        prop_assert_eq!(delivered, expected);

        if let Some(probe) = &probes[target as usize] {
            prop_assert_eq!(probe.hits(), expected);
        }
    }

    /// Keyed delivery reaches exactly the observers subscribed under the key.
    #[test]
    fn prop_keyed_notify_matches_subscriptions(
        subs in prop::collection::vec((0u64..6, 0u8..4), 0..24),
        key in 0u8..4,
    ) {
        let probes: Vec<_> = (0..6).map(Probe::new).collect();
        let subject = KeyedSubject::<u8, u8>::new();
        let mut expected = BTreeSet::new();

        for (id, k) in &subs {
            subject.attach_arc(*k, &probes[*id as usize]);
            if *k == key {
                expected.insert(*id);
            }
        }

        let delivered = subject.notify_event(&key, &1);
        prop_assert_eq!(delivered, expected.len());
        for probe in &probes {
            let want = usize::from(expected.contains(&probe.id().value()));
            prop_assert_eq!(probe.hits(), want);
        }
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_attach_detach_and_notify() {
    let subject = Arc::new(Subject::<u8>::new());
    let stable = Probe::new(1000);
    subject.attach_arc(&stable);

    let rounds = 200;
    let barrier = Arc::new(Barrier::new(3));

    let churn = {
        let subject = Arc::clone(&subject);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..rounds {
                let probe = Probe::new(i);
                subject.attach_arc(&probe);
                subject.detach_id(Id::new(i));
            }
        })
    };

    let notifier = {
        let subject = Arc::clone(&subject);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            (0..rounds).map(|_| subject.notify_all_event(&0)).collect::<Vec<_>>()
        })
    };

    barrier.wait();
    churn.join().unwrap();
    let deliveries = notifier.join().unwrap();

    // Every notify sees the stable observer plus at most one transient one
    for delivered in deliveries {
        assert!((1..=2).contains(&delivered), "torn delivery count {}", delivered);
    }
    assert_eq!(stable.hits(), rounds as usize);
    assert_eq!(subject.ids(), vec![Id::new(1000)]);
}

#[test]
fn test_observer_dropped_on_other_thread() {
    let subject = Arc::new(Subject::<u8>::new());
    let probe = Probe::new(1);
    subject.attach_arc(&probe);

    thread::spawn(move || drop(probe)).join().unwrap();

    assert_eq!(subject.notify_all_event(&0), 0);
    assert_eq!(subject.len(), 1);
}
