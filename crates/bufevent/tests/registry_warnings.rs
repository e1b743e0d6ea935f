#![expect(missing_docs)]

use bufevent::{EventRegistry, Listener, RegistryOptions};
use tracing_test::traced_test;

fn noop() -> Listener<()> {
    Listener::new(|_| Ok(()))
}

#[test]
#[traced_test]
fn warns_once_past_the_limit() {
    let registry = EventRegistry::with_options(RegistryOptions { max_listeners: 2 });
    for _ in 0..2 {
        registry.on("tick", &noop()).unwrap();
    }
    assert!(!logs_contain("possible listener leak"));

    for _ in 0..3 {
        registry.on("tick", &noop()).unwrap();
    }
    logs_assert(|lines: &[&str]| {
        match lines
            .iter()
            .filter(|line| line.contains("possible listener leak"))
            .count()
        {
            1 => Ok(()),
            n => Err(format!("expected one leak warning, saw {n}")),
        }
    });
    assert!(logs_contain("3 \"tick\" listeners added"));
}

#[test]
#[traced_test]
fn zero_disables_the_check() {
    let registry = EventRegistry::new();
    registry.set_max_listeners(0);
    for _ in 0..50 {
        registry.on("tick", &noop()).unwrap();
    }
    assert!(!logs_contain("possible listener leak"));
}

#[test]
#[traced_test]
fn warning_rearms_after_the_list_empties() {
    let registry = EventRegistry::with_options(RegistryOptions { max_listeners: 1 });
    let listeners = [noop(), noop()];
    for listener in &listeners {
        registry.on("tick", listener).unwrap();
    }
    registry.remove_all_listeners(Some("tick")).unwrap();
    for listener in &listeners {
        registry.on("tick", listener).unwrap();
    }
    logs_assert(|lines: &[&str]| {
        match lines
            .iter()
            .filter(|line| line.contains("possible listener leak"))
            .count()
        {
            2 => Ok(()),
            n => Err(format!("expected two leak warnings, saw {n}")),
        }
    });
}
