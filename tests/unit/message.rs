use super::*;

#[test]
fn injected_handler_receives_messages() {
    let seen: Arc<Mutex<Vec<(Severity, String)>>> = Arc::default();
    let sink = seen.clone();
    let m = Messenger::new(Some(Arc::new(move |sev: Severity, msg: &str| {
        sink.lock().unwrap().push((sev, msg.to_owned()));
    })));

    m.warning("color table full");
    m.error("not open");

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (Severity::Warning, "color table full".to_owned()),
            (Severity::Error, "not open".to_owned()),
        ]
    );
}

#[test]
fn messenger_without_handler_does_not_panic() {
    Messenger::default().warning("falls through to tracing or the global handler");
}
