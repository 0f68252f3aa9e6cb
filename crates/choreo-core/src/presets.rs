//! Ready-made section configurations for the site's scroll sections.
//!
//! Target numbering is per preset and documented on each function; the web
//! front-end binds target `i` to the `i`-th `[data-choreo-child]` element.

use crate::active::{IndexStrategy, TriggerBand};
use crate::constants::{
    HERO_COMPLETE_DELAY_MS, HERO_STEP, HERO_STEP_INTERVAL_MS, MOBILE_BREAKPOINT,
    SERVICES_HERO_STEP,
};
use crate::ease::Ease;
use crate::error::{ChoreoError, Result};
use crate::interp::{Property, Track};
use crate::orchestrator::{ChildSpec, IndexConfig, Scrub, SectionConfig};
use crate::progress::AccumulatorConfig;
use crate::runtime;
use crate::trigger::{Distance, Edge, EndSpec, TriggerPoint};
use crate::window::{ChildWindow, Timeline, WindowSeq};

pub const PRESET_NAMES: &[&str] = &[
    "stacked-cards",
    "services",
    "reasons",
    "text-reveal",
    "video-zoom",
    "hero-reveal",
    "services-hero",
    "process-steps",
];

/// Look a preset up by name. `items` is the number of cards, words or steps
/// the section contains; presets without items ignore it.
pub fn by_name(name: &str, items: usize) -> Result<SectionConfig> {
    match name {
        "stacked-cards" => stacked_cards(items),
        "services" => services(items),
        "reasons" => reasons(items),
        "text-reveal" => text_reveal(items),
        "video-zoom" => video_zoom(),
        "hero-reveal" => hero_reveal(),
        "services-hero" => services_hero(),
        "process-steps" => process_steps(items),
        _ => Err(ChoreoError::UnknownPreset(name.to_string())),
    }
}

fn pinned(id: &str, viewport_percent: f64) -> SectionConfig {
    SectionConfig::scroll(
        id,
        TriggerPoint::TOP_TOP,
        EndSpec::After(Distance::ViewportPercent(viewport_percent)),
    )
    .pinned(true)
}

fn quantized(count: usize) -> IndexConfig {
    IndexConfig {
        count,
        strategy: IndexStrategy::QUANTIZED,
        initial: 0,
    }
}

/// Cards slide up over their predecessor, which shrinks, fades and blurs.
///
/// Targets `0..n` are the cards, `n..2n` their text blocks. Card `i` enters
/// at timeline position `i - 1` over 2 units; its text fades in from
/// `i - 0.5` over 1 unit.
pub fn stacked_cards(n: usize) -> Result<SectionConfig> {
    if n == 0 {
        return Err(ChoreoError::EmptyIndex {
            region: "stacked-cards".into(),
        });
    }
    let mut timeline = Timeline::new().with_total(n as f64);
    for i in 1..n {
        let at = (i - 1) as f64;
        // enter, predecessor exit, text
        timeline = timeline.add(at, 2.0).add(at, 2.0).add(i as f64 - 0.5, 1.0);
    }
    let windows = timeline.build()?.into_vec();

    let mut config = pinned("stacked-cards", 100.0 * n as f64)
        .scrub(Scrub::Smoothed {
            lag_sec: runtime::defaults().scrub_lag_sec,
        })
        .index(quantized(n));
    for (k, w) in windows.chunks_exact(3).enumerate() {
        let (i, enter, exit, text) = (k + 1, w[0], w[1], w[2]);
        config = config
            .child(
                ChildSpec::new(i, enter)
                    .track(Track::number(Property::TranslateYPercent, 100.0, 0.0, Ease::Linear))
                    .track(Track::number(Property::Scale, 0.95, 1.0, Ease::Linear)),
            )
            .child(
                ChildSpec::new(i - 1, exit)
                    .track(Track::number(Property::Scale, 1.0, 0.9, Ease::Linear))
                    .track(Track::number(Property::Opacity, 1.0, 0.4, Ease::Linear))
                    .track(Track::number(Property::BlurPx, 0.0, 4.0, Ease::Linear)),
            )
            .child(
                ChildSpec::new(n + i, text)
                    .track(Track::number(Property::Opacity, 0.0, 1.0, Ease::Linear))
                    .track(Track::number(Property::TranslateYPx, 40.0, 0.0, Ease::Linear))
                    .track(Track::number(Property::BlurPx, 8.0, 0.0, Ease::Linear)),
            );
    }
    Ok(config)
}

/// Pinned list whose active service follows progress, 100vh per service.
/// Target `0` is the progress bar.
pub fn services(n: usize) -> Result<SectionConfig> {
    Ok(pinned("services", 100.0 * n as f64)
        .index(quantized(n))
        .child(
            ChildSpec::new(0, ChildWindow::FULL)
                .track(Track::number(Property::WidthPercent, 0.0, 100.0, Ease::Linear)),
        ))
}

/// Pinned reasons list. Each reason gets 120vh of scroll, 90vh below the
/// mobile breakpoint. Target `i` is reason `i`.
pub fn reasons(n: usize) -> Result<SectionConfig> {
    let items = n as f64;
    let mut config = SectionConfig::scroll(
        "reasons",
        TriggerPoint::TOP_TOP,
        EndSpec::After(Distance::Responsive {
            narrow: 90.0 * items,
            wide: 120.0 * items,
            breakpoint: MOBILE_BREAKPOINT,
        }),
    )
    .pinned(true)
    .index(quantized(n));
    let ease = runtime::defaults().ease;
    for (i, window) in WindowSeq::even(n.max(1))?.iter().enumerate().take(n) {
        config = config.child(
            ChildSpec::new(i, *window)
                .track(Track::number(Property::Opacity, 0.0, 1.0, ease))
                .track(Track::number(Property::TranslateYPx, 40.0, 0.0, ease)),
        );
    }
    Ok(config)
}

/// Word-by-word reveal: word `i` owns `i/n .. (i+1)/n`. Target `i` is word `i`.
pub fn text_reveal(words: usize) -> Result<SectionConfig> {
    let mut config = SectionConfig::scroll(
        "text-reveal",
        TriggerPoint::new(Edge::Top, Edge::Percent(80.0)),
        EndSpec::After(Distance::ViewportPercent(150.0)),
    );
    for (i, window) in WindowSeq::even(words)?.iter().enumerate() {
        config = config.child(
            ChildSpec::new(i, *window)
                .track(Track::number(Property::Opacity, 0.15, 1.0, Ease::Linear))
                .track(Track::number(Property::BlurPx, 8.0, 0.0, Ease::Linear)),
        );
    }
    Ok(config)
}

/// Pinned video that grows to full bleed. Target `0` is the video frame.
pub fn video_zoom() -> Result<SectionConfig> {
    Ok(pinned("video-zoom", 150.0).child(
        ChildSpec::new(0, ChildWindow::FULL)
            .track(Track::number(Property::Scale, 0.6, 1.0, Ease::Linear))
            .track(Track::number(Property::BorderRadiusPx, 40.0, 0.0, Ease::Linear)),
    ))
}

/// Landing hero uncovered by wheel/touch steps before the page scrolls.
/// Target `0` is the image mask, `1` the headline.
pub fn hero_reveal() -> Result<SectionConfig> {
    let drive = AccumulatorConfig {
        step: HERO_STEP,
        min_interval_ms: HERO_STEP_INTERVAL_MS,
        complete_delay_ms: HERO_COMPLETE_DELAY_MS,
        ..AccumulatorConfig::default()
    };
    let ease = runtime::defaults().ease;
    Ok(SectionConfig::accumulator("hero-reveal", drive)
        .child(
            ChildSpec::new(0, ChildWindow::FULL)
                .track(Track::number(Property::ClipRightPercent, 100.0, 0.0, Ease::Linear)),
        )
        .child(
            ChildSpec::new(1, ChildWindow::new(0.5, 1.0)?)
                .track(Track::number(Property::Opacity, 0.0, 1.0, ease))
                .track(Track::number(Property::TranslateYPx, 40.0, 0.0, ease)),
        ))
}

/// Services landing hero: the framed image expands to fill the viewport.
/// Target `0` is the frame, `1` the image inside it.
pub fn services_hero() -> Result<SectionConfig> {
    let drive = AccumulatorConfig {
        step: SERVICES_HERO_STEP,
        ..AccumulatorConfig::default()
    };
    Ok(SectionConfig::accumulator("services-hero", drive)
        .child(
            ChildSpec::new(0, ChildWindow::FULL)
                .track(Track::number(Property::WidthPercent, 60.0, 100.0, Ease::Linear))
                .track(Track::number(Property::HeightVh, 60.0, 100.0, Ease::Linear))
                .track(Track::number(Property::BorderRadiusPx, 40.0, 0.0, Ease::Linear)),
        )
        .child(
            ChildSpec::new(1, ChildWindow::FULL)
                .track(Track::number(Property::Scale, 1.0, 1.2, Ease::Linear)),
        ))
}

/// Process steps highlighted as their top edge crosses the `70%..55%`
/// band of the viewport. Target `0` is the connecting line.
pub fn process_steps(n: usize) -> Result<SectionConfig> {
    Ok(SectionConfig::scroll(
        "process-steps",
        TriggerPoint::new(Edge::Top, Edge::Percent(70.0)),
        EndSpec::Point(TriggerPoint::new(Edge::Bottom, Edge::Percent(55.0))),
    )
    .index(IndexConfig {
        count: n,
        strategy: IndexStrategy::Intersection {
            band: TriggerBand::default(),
        },
        initial: 0,
    })
    .child(
        ChildSpec::new(0, ChildWindow::FULL)
            .track(Track::number(Property::HeightVh, 0.0, 100.0, Ease::Linear)),
    ))
}
