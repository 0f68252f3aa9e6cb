// End-to-end scrub of the stacked cards section.

use choreo_core::{
    presets, IndexChange, Layout, Orchestrator, Property, RecordingHost, Scrub, TransitionStep,
    Value,
};

const CARDS: usize = 5;

fn layout() -> Layout {
    Layout::new(0.0, 900.0, 1440.0, 900.0)
}

fn orchestrator() -> (Orchestrator, RecordingHost) {
    let config = presets::stacked_cards(CARDS).unwrap().scrub(Scrub::Instant);
    let mut host = RecordingHost::new();
    let mut o = Orchestrator::new(config).unwrap();
    o.attach(&mut host, Some(layout())).unwrap();
    (o, host)
}

fn number(values: &[(Property, Value)], property: Property) -> Option<f64> {
    values
        .iter()
        .find(|(p, _)| *p == property)
        .and_then(|(_, v)| v.as_number())
}

#[test]
fn linear_scrub_visits_every_card_in_order() {
    let (mut o, mut host) = orchestrator();
    let end = o.region().unwrap().end_offset();
    assert_eq!(end, 4500.0);

    let mut visited = vec![o.active_index().unwrap()];
    let mut changes: Vec<IndexChange> = Vec::new();
    let mut y = 0.0;
    while y <= end {
        o.on_scroll(&mut host, y);
        host.take_frames();
        let frame = o.frame(&mut host, 1.0 / 60.0).unwrap();
        if let Some(change) = frame.index_change {
            changes.push(change);
            visited.push(change.current);
            assert_eq!(frame.active, Some(change.current));
        }
        y += 10.0;
    }

    assert_eq!(visited, vec![0, 1, 2, 3, 4]);
    for change in &changes {
        assert_eq!(change.current, change.previous + 1);
        // Exit and entry are delivered together, exit first.
        assert_eq!(
            change.steps(),
            [
                TransitionStep::Exit(change.previous),
                TransitionStep::Enter(change.current)
            ]
        );
    }
}

#[test]
fn previous_card_recedes_as_the_next_arrives() {
    let (mut o, mut host) = orchestrator();
    o.on_scroll(&mut host, 4500.0);
    let frame = o.frame(&mut host, 0.016).unwrap();
    assert_eq!(frame.progress, 1.0);

    let card = |i: usize| {
        frame
            .targets
            .iter()
            .find(|t| t.target == i)
            .map(|t| t.values.clone())
            .unwrap()
    };
    let last = card(CARDS - 1);
    assert_eq!(number(&last, Property::TranslateYPercent), Some(0.0));
    assert_eq!(number(&last, Property::Scale), Some(1.0));

    let previous = card(CARDS - 2);
    assert_eq!(number(&previous, Property::Scale), Some(0.9));
    assert_eq!(number(&previous, Property::Opacity), Some(0.4));
    assert_eq!(number(&previous, Property::BlurPx), Some(4.0));

    let text = card(CARDS + CARDS - 1);
    assert_eq!(number(&text, Property::Opacity), Some(1.0));
}

#[test]
fn cards_wait_below_the_fold_before_the_section() {
    let (mut o, mut host) = orchestrator();
    o.on_scroll(&mut host, -50.0);
    let frame = o.frame(&mut host, 0.016).unwrap();
    assert_eq!(frame.progress, 0.0);

    for t in frame.targets.iter().filter(|t| (1..CARDS).contains(&t.target)) {
        assert_eq!(number(&t.values, Property::TranslateYPercent), Some(100.0));
        assert_eq!(number(&t.values, Property::Scale), Some(0.95));
    }
    // The first card is at rest: its exit has not started.
    let first = frame.targets.iter().find(|t| t.target == 0).unwrap();
    assert_eq!(number(&first.values, Property::Scale), Some(1.0));
    assert_eq!(number(&first.values, Property::Opacity), Some(1.0));
}
