//! Two-Strategy Event Manager Example
//!
//! A manager with id 100 drives two strategies from a fixed-rate loop.
//! Strategy 2 raises `Event1` to the manager from its `begin` hook; a
//! producer thread pushes commands into Strategy 1's mailbox between ticks.
//!
//! Run with: `cargo run -p signalbox-event-manager --example event_manager`
//! Set `SIGNALBOX_LOG_MODE=development` to see the manager's own logging.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use event_manager::logging::init_logging_from_env;
use event_manager::prelude::*;
use signal_registry::{Extended, Id, Identified, Observer};

#[derive(Debug, Clone, Copy, PartialEq)]
enum EventId {
    Event1,
    Event2,
}

type Event = Extended<EventId, BufferEvent>;

const MANAGER_ID: u64 = 100;
const TICKS: usize = 5;

struct Strategy1 {
    core: StrategyCore<Event>,
}

impl Strategy1 {
    fn new() -> Self {
        Self {
            core: StrategyCore::with_id(1u64, "Strategy 1", true),
        }
    }
}

impl Identified for Strategy1 {
    fn id(&self) -> Id {
        self.core.id()
    }
}

impl Observer<Event> for Strategy1 {
    fn update(&self, event: &Event, _payload: &()) {
        println!("  [{}] event {:?}", self.core.label(), event);
    }
}

impl Lifecycle for Strategy1 {
    fn begin(&self) {
        println!("  [{}] begin", self.core.label());
    }

    fn send_message(&self, message: &Document) {
        println!("  [{}] send {}", self.core.label(), message.to_json());
    }

    fn receive_message(&self) {
        match self.core.mailbox().get_message() {
            Some(message) => println!("  [{}] received {}", self.core.label(), message.to_json()),
            None => println!("  [{}] mailbox empty", self.core.label()),
        }
    }
}

impl Strategy<Event> for Strategy1 {
    fn core(&self) -> &StrategyCore<Event> {
        &self.core
    }
}

struct Strategy2 {
    core: StrategyCore<Event>,
}

impl Identified for Strategy2 {
    fn id(&self) -> Id {
        self.core.id()
    }
}

impl Observer<Event> for Strategy2 {
    fn update(&self, _event: &Event, _payload: &()) {}
}

impl Lifecycle for Strategy2 {
    fn begin(&self) {
        println!("  [{}] begin, notifying manager", self.core.label());
        self.core.notify(Id::new(MANAGER_ID), &Extended::Own(EventId::Event1));
    }

    fn receive_message(&self) {
        if !self.repeat() {
            println!("  [{}] nothing left to do", self.core.label());
        }
    }
}

impl Strategy<Event> for Strategy2 {
    fn core(&self) -> &StrategyCore<Event> {
        &self.core
    }
}

/// Manager-level reactions to strategy events
struct Reactions;

impl ManagerHandler<Event> for Reactions {
    fn update(&self, manager: &EventManager<Event, Self>, event: &Event) {
        match event {
            Extended::Own(EventId::Event1) => println!("📣 {}: Event 1 received", manager.label()),
            Extended::Own(EventId::Event2) => println!("📣 {}: Event 2 received", manager.label()),
            Extended::Base(BufferEvent::NewMessage) => {
                println!("📬 {}: new message queued", manager.label())
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    println!("🔧 Event Manager Example");
    println!("========================\n");

    let config = ManagerConfig::new()
        .with_label("EventManager")
        .with_id(MANAGER_ID);
    let manager = EventManager::<Event, _>::with_config(config, Reactions)?;
    println!("✅ Created {} with id {}", manager.label(), manager.id());

    let strategy1 = Arc::new(Strategy1::new());
    let strategy2 = Arc::new(Strategy2 {
        core: StrategyCore::with_id(2u64, "Strategy 2", false),
    });

    manager.add_subscriber(strategy1.clone());
    manager.add_subscriber(strategy2.clone());
    println!("✅ Strategies queued: {}\n", manager.len());

    println!("🚀 Begin");
    manager.begin();

    let producer = {
        let manager = Arc::clone(&manager);
        let target = strategy1.id();
        thread::spawn(move || -> Result<(), EventManagerError> {
            for step in 0..TICKS {
                manager.deliver(target, format!(r#"{{"step":{step}}}"#))?;
                thread::sleep(Duration::from_millis(150));
            }
            Ok(())
        })
    };

    for tick in 1..=TICKS {
        println!("\n⏱️  Tick {tick}");
        manager.handle_strategies();
        thread::sleep(Duration::from_millis(200));
    }

    producer
        .join()
        .map_err(|_| "producer thread panicked")??;

    println!("\n🛑 Stopping");
    let stopped = manager.stop();
    println!("✅ Stopped {stopped} strategies");

    Ok(())
}
