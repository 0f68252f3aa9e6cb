// Attach/detach/resize accounting against the recording host.

use choreo_core::{
    presets, AttachState, EventHost, EventKind, Intercept, Layout, Orchestrator, PinState,
    RecordingHost,
};

fn desktop() -> Layout {
    Layout::new(1200.0, 900.0, 1440.0, 900.0)
}

fn attached(preset: &str) -> (Orchestrator, RecordingHost) {
    let mut host = RecordingHost::new();
    let mut o = Orchestrator::new(presets::by_name(preset, 4).unwrap()).unwrap();
    o.attach(&mut host, Some(desktop())).unwrap();
    (o, host)
}

#[test]
fn detach_twice_removes_each_listener_once() {
    let (mut o, mut host) = attached("services");
    assert_eq!(host.live_listeners(), 2);

    assert!(o.detach(&mut host));
    assert_eq!(host.live_listeners(), 0);
    assert_eq!(host.removed, 2);

    assert!(!o.detach(&mut host));
    assert_eq!(host.removed, 2);
    assert_eq!(host.stale_removals, 0);
}

#[test]
fn detach_cancels_the_in_flight_frame() {
    let (mut o, mut host) = attached("services");
    o.on_scroll(&mut host, 1500.0);
    assert_eq!(host.pending_frames(), 1);
    o.detach(&mut host);
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.frames_cancelled, 1);
}

#[test]
fn nothing_runs_after_teardown() {
    let (mut o, mut host) = attached("services-hero");
    assert!(host.is_listening(EventKind::Wheel));
    o.detach(&mut host);

    let requested = host.frames_requested;
    assert!(!o.on_scroll(&mut host, 400.0));
    assert_eq!(o.on_wheel(&mut host, 30.0, 0.0, 10.0), Intercept::Pass);
    assert_eq!(o.on_touch_move(&mut host, 200.0, 0.0, 20.0), Intercept::Pass);
    // A frame callback that was already queued by the browser is a no-op.
    assert!(o.frame(&mut host, 0.016).is_none());
    assert_eq!(host.frames_requested, requested);
}

#[test]
fn detach_resets_derived_state() {
    let (mut o, mut host) = attached("services");
    o.on_scroll(&mut host, 1200.0 + 3600.0 * 0.8);
    o.frame(&mut host, 0.016).unwrap();
    assert_eq!(o.active_index(), Some(3));
    o.detach(&mut host);
    assert_eq!(o.active_index(), Some(0));

    // Re-attaching starts clean and registers a fresh listener set.
    o.attach(&mut host, Some(desktop())).unwrap();
    assert_eq!(host.live_listeners(), 2);
    assert_eq!(host.added, 4);
}

#[test]
fn resize_round_trip_reproduces_boundaries() {
    let (mut o, mut host) = attached("stacked-cards");
    let before = o.child_offsets();
    let region = o.region().cloned().unwrap();

    let mobile = Layout::new(700.0, 640.0, 375.0, 640.0);
    o.resize(&mut host, mobile).unwrap();
    assert_ne!(o.child_offsets(), before);

    o.resize(&mut host, desktop()).unwrap();
    assert_eq!(o.child_offsets(), before);
    assert_eq!(o.region(), Some(&region));

    // Each resize swapped the listener set rather than stacking another one.
    assert_eq!(host.live_listeners(), 2);
    assert_eq!(host.added, 6);
    assert_eq!(host.removed, 4);
}

#[test]
fn resize_mid_scrub_reclamps_progress() {
    let (mut o, mut host) = attached("services");
    o.on_scroll(&mut host, 4000.0);
    let f = o.frame(&mut host, 0.016).unwrap();
    assert!(f.progress > 0.7);

    // The section moves further down the page; the same scroll offset now
    // sits before the region.
    o.resize(&mut host, Layout::new(5000.0, 900.0, 1440.0, 900.0)).unwrap();
    let f = o.frame(&mut host, 0.016).unwrap();
    assert_eq!(f.progress, 0.0);
    assert_eq!(f.active, Some(0));
}

#[test]
fn pending_attach_waits_for_mount() {
    let mut host = RecordingHost::new();
    let mut o = Orchestrator::new(presets::video_zoom().unwrap()).unwrap();
    assert_eq!(o.attach(&mut host, None).unwrap(), AttachState::Pending);
    assert_eq!(host.added, 0);
    assert!(o.frame(&mut host, 0.016).is_none());

    // Detaching before the element arrives leaves nothing behind.
    assert!(o.detach(&mut host));
    assert_eq!(o.mounted(&mut host, desktop()).unwrap(), AttachState::Detached);
    assert_eq!(host.added, 0);

    o.attach(&mut host, None).unwrap();
    assert_eq!(o.mounted(&mut host, desktop()).unwrap(), AttachState::Attached);
    assert_eq!(host.live_listeners(), 2);
}

#[test]
fn host_trait_objects_are_accepted() {
    let mut host = RecordingHost::new();
    let dyn_host: &mut dyn EventHost = &mut host;
    let mut o = Orchestrator::new(presets::services(3).unwrap()).unwrap();
    o.attach(dyn_host, Some(desktop())).unwrap();
    assert_eq!(host.live_listeners(), 2);
}

#[test]
fn attach_starts_from_the_restored_scroll_offset() {
    let mut host = RecordingHost::new();
    let mut o = Orchestrator::new(presets::services(4).unwrap()).unwrap();
    // The browser restored the page halfway through the region before attach.
    assert!(!o.on_scroll(&mut host, 1200.0 + 3600.0 * 0.5));
    assert_eq!(host.frames_requested, 0);

    o.attach(&mut host, Some(desktop())).unwrap();
    let f = o.frame(&mut host, 0.016).unwrap();
    assert_eq!(f.progress, 0.5);
    assert_eq!(f.pin, PinState::Pinned);
    assert_eq!(f.active, Some(2));
}

#[test]
fn smoothed_section_attached_mid_region_does_not_replay_from_zero() {
    let mut host = RecordingHost::new();
    let mut o = Orchestrator::new(presets::stacked_cards(5).unwrap()).unwrap();
    o.on_scroll(&mut host, 3000.0);
    o.attach(&mut host, Some(desktop())).unwrap();
    let f = o.frame(&mut host, 0.016).unwrap();
    assert!(f.progress > 0.0);
    assert_eq!(f.progress, f.raw_progress);
}

#[test]
fn hero_only_takes_input_while_it_holds_the_viewport() {
    let mut host = RecordingHost::new();
    let mut o = Orchestrator::new(presets::hero_reveal().unwrap()).unwrap();
    o.attach(&mut host, Some(Layout::new(0.0, 900.0, 1440.0, 900.0))).unwrap();

    // Reloaded far down the page: wheel and touch belong to the page.
    assert_eq!(o.on_wheel(&mut host, 100.0, 3000.0, 0.0), Intercept::Pass);
    o.on_touch_start(400.0);
    assert_eq!(o.on_touch_move(&mut host, 300.0, 3000.0, 100.0), Intercept::Pass);
    // Hero bottom above the middle of the viewport.
    assert_eq!(o.on_wheel(&mut host, 100.0, 500.0, 200.0), Intercept::Pass);
    assert_eq!(o.progress(), 0.0);

    // Back at the top the reveal takes over again.
    assert_eq!(
        o.on_wheel(&mut host, 100.0, 0.0, 300.0),
        Intercept::Prevent { moved: true }
    );
    let f = o.frame(&mut host, 0.016).unwrap();
    assert_eq!(f.progress, 0.08);
}
