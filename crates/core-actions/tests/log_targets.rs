mod common;
use common::*;

use std::sync::{Arc, Mutex};
use tracing::dispatcher::{Dispatch, with_default};
use tracing::subscriber::Interest;
use tracing::{Metadata, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

#[derive(Clone, Default)]
struct TargetCapture {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for TargetCapture
where
    S: Subscriber,
{
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::always()
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events
            .lock()
            .unwrap()
            .push(event.metadata().target().to_string());
    }
}

fn capture(run: impl FnOnce()) -> Vec<String> {
    let capture = TargetCapture::default();
    let events = capture.events.clone();
    let subscriber = Registry::default().with(capture.with_filter(LevelFilter::TRACE));
    with_default(&Dispatch::new(subscriber), run);
    events.lock().unwrap().clone()
}

fn targets(events: &[String]) -> Vec<&str> {
    events.iter().map(String::as_str).collect()
}

#[test]
fn edits_log_under_dotted_targets() {
    let events = capture(|| {
        let mut s = Session::new("one two\n");
        s.keys("dwu");
    });
    let targets = targets(&events);
    for expected in ["actions.router", "actions.dispatch", "state.registers"] {
        assert!(targets.contains(&expected), "missing {expected} in {targets:?}");
    }
}

#[test]
fn mode_switch_and_insert_pack_are_logged() {
    let events = capture(|| {
        let mut s = Session::new("");
        s.keys("iabc<Esc>");
    });
    let targets = targets(&events);
    assert!(targets.contains(&"actions.insert"));
    assert!(targets.contains(&"actions.router"));
}

#[test]
fn unknown_ex_command_is_logged() {
    let events = capture(|| {
        let mut s = Session::new("abc\n");
        s.keys(":zz<CR>");
    });
    assert!(targets(&events).contains(&"actions.ex"));
}
