use anyhow::Result as AnyResult;
use shop_domain::error::DomainError;
use shop_domain::eventing::{EventBus, EventHandler, Matcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Journal {
    inner: Arc<Mutex<Vec<String>>>,
}
impl Journal {
    fn push(&self, line: impl Into<String>) {
        self.inner.lock().unwrap().push(line.into());
    }
    fn lines(&self) -> Vec<String> {
        self.inner.lock().unwrap().clone()
    }
}

struct Counting {
    name: &'static str,
    calls: AtomicUsize,
    journal: Journal,
}

impl EventHandler<u32> for Counting {
    fn handler_name(&self) -> &str {
        self.name
    }

    fn handle(&self, event_name: &str, payload: &u32) -> AnyResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.push(format!("{}<-{event_name}:{payload}", self.name));
        Ok(())
    }
}

fn counting(name: &'static str, journal: &Journal) -> Arc<Counting> {
    Arc::new(Counting {
        name,
        calls: AtomicUsize::new(0),
        journal: journal.clone(),
    })
}

#[test]
fn every_event_name_reaches_its_subscriber_exactly_once() {
    let names = ["items:changed", "basket:changed", "order.email:change", "x"];
    for (i, name) in names.iter().enumerate() {
        let bus = EventBus::<u32>::new();
        let journal = Journal::default();
        let h = counting("h", &journal);
        bus.subscribe_handler(*name, h.clone());

        bus.emit(name, &(i as u32)).unwrap();

        assert_eq!(h.calls.load(Ordering::SeqCst), 1, "event {name}");
        assert_eq!(journal.lines(), vec![format!("h<-{name}:{i}")]);
    }
}

#[test]
fn unsubscribed_handler_never_fires_again() {
    let bus = EventBus::<u32>::new();
    let journal = Journal::default();
    let h1 = counting("h1", &journal);
    let h2 = counting("h2", &journal);
    let handle = bus.subscribe_handler("e", h1.clone());
    bus.subscribe_handler("e", h2.clone());

    bus.emit("e", &1).unwrap();
    bus.unsubscribe(&handle);
    bus.emit("e", &2).unwrap();
    bus.emit("e", &3).unwrap();

    assert_eq!(h1.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h2.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn cart_pattern_fires_for_cart_events_only() {
    let bus = EventBus::<u32>::new();
    let journal = Journal::default();
    bus.subscribe_handler(
        Matcher::pattern(r"^cart\..*$").unwrap(),
        counting("cart", &journal),
    );

    for name in ["cart.added", "cart.removed", "order.submitted"] {
        bus.emit(name, &0).unwrap();
    }

    assert_eq!(journal.lines(), vec!["cart<-cart.added:0", "cart<-cart.removed:0"]);
}

#[test]
fn observe_all_receives_events_without_other_subscribers() {
    let bus = EventBus::<u32>::new();
    let journal = Journal::default();
    {
        let journal = journal.clone();
        bus.observe_all(move |name: &str, payload: &u32| {
            journal.push(format!("all<-{name}:{payload}"));
            Ok(())
        });
    }
    bus.subscribe_handler("b", counting("b", &journal));

    bus.emit("a", &1).unwrap();
    bus.emit("b", &2).unwrap();

    assert_eq!(
        journal.lines(),
        vec!["all<-a:1", "b<-b:2", "all<-b:2"]
    );
}

#[test]
fn independent_buses_do_not_share_registrations() {
    let left = EventBus::<u32>::new();
    let right = EventBus::<u32>::new();
    let journal = Journal::default();
    let handle = left.subscribe_handler("e", counting("left", &journal));

    right.emit("e", &1).unwrap();
    // 句柄只对签发它的总线有效
    assert!(!right.unsubscribe(&handle));
    assert!(journal.lines().is_empty());
    assert_eq!(left.subscription_count(), 1);
}

#[test]
fn all_failures_are_attempted_before_reporting() {
    let bus = EventBus::<u32>::new();
    let attempts = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let attempts = attempts.clone();
        bus.subscribe("e", move |_: &u32| {
            attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("handler rejected payload")
        });
    }

    let err = bus.emit("e", &7).unwrap_err();

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    match err {
        DomainError::EventHandler { suppressed, .. } => assert_eq!(suppressed, 2),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn handlers_run_concurrently_from_several_threads() {
    let bus = Arc::new(EventBus::<u32>::new());
    let total = Arc::new(AtomicUsize::new(0));
    {
        let total = total.clone();
        bus.subscribe("tick", move |n: &u32| {
            total.fetch_add(*n as usize, Ordering::SeqCst);
            Ok(())
        });
    }

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let bus = bus.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    bus.emit("tick", &1).unwrap();
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(total.load(Ordering::SeqCst), 400);
}
