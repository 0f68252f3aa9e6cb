//! Scrub a section preset without a browser and log every frame.
//!
//! Usage: `choreo-native [preset] [items]`. Defaults to five stacked cards.

use anyhow::Context;
use choreo_core::presets::{self, PRESET_NAMES};
use choreo_core::runtime::{self, Defaults};
use choreo_core::{compose, Drive, Frame, Intercept, Layout, Orchestrator, RecordingHost};

const VIEWPORT: (f64, f64) = (1440.0, 900.0);
const SECTION_TOP: f64 = 900.0;
const SCROLL_STEPS: usize = 40;
const FRAME_DT_SEC: f64 = 1.0 / 60.0;
// Upper bound on frames spent letting a smoothed scrub settle per step
const SETTLE_FRAMES: usize = 600;
const WHEEL_INTERVAL_MS: f64 = 60.0;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let preset = args.next().unwrap_or_else(|| "stacked-cards".to_string());
    let items: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("item count `{}`", n))?,
        None => 5,
    };

    runtime::init(Defaults::default())?;
    let config = presets::by_name(&preset, items)
        .with_context(|| format!("known presets: {}", PRESET_NAMES.join(", ")))?;
    let drive = config.drive;
    let mut orchestrator = Orchestrator::new(config)?;
    let mut host = RecordingHost::new();

    // Heroes open the page and fill the viewport; scrubbed sections sit below.
    let layout = match drive {
        Drive::Accumulator(_) => Layout::new(0.0, VIEWPORT.1, VIEWPORT.0, VIEWPORT.1),
        Drive::Scroll => {
            let item_tops = (0..items).map(|i| SECTION_TOP + 300.0 * i as f64).collect();
            Layout::new(SECTION_TOP, 300.0 * items.max(1) as f64, VIEWPORT.0, VIEWPORT.1)
                .with_items(item_tops)
        }
    };
    orchestrator.attach(&mut host, Some(layout))?;
    log::info!(
        "[{}] attached with {} listeners",
        preset,
        host.live_listeners()
    );

    match drive {
        Drive::Scroll => scrub(&mut orchestrator, &mut host),
        Drive::Accumulator(_) => wheel_through(&mut orchestrator, &mut host),
    }

    orchestrator.detach(&mut host);
    log::info!(
        "[{}] detached: added={} removed={} frames requested={} cancelled={}",
        preset,
        host.added,
        host.removed,
        host.frames_requested,
        host.frames_cancelled
    );
    anyhow::ensure!(host.live_listeners() == 0, "listeners leaked after detach");
    Ok(())
}

fn scrub(orchestrator: &mut Orchestrator, host: &mut RecordingHost) {
    let Some(region) = orchestrator.region().cloned() else {
        return;
    };
    let from = region.start_offset() - VIEWPORT.1;
    let to = region.end_offset() + VIEWPORT.1;
    for step in 0..=SCROLL_STEPS {
        let y = from + (to - from) * step as f64 / SCROLL_STEPS as f64;
        orchestrator.on_scroll(host, y);
        let mut last = None;
        for _ in 0..SETTLE_FRAMES {
            if host.take_frames() == 0 {
                break;
            }
            last = orchestrator.frame(host, FRAME_DT_SEC);
        }
        if let Some(frame) = last {
            log_frame(&frame);
        }
    }
}

fn wheel_through(orchestrator: &mut Orchestrator, host: &mut RecordingHost) {
    let mut now = 0.0;
    loop {
        now += WHEEL_INTERVAL_MS;
        let intercept = orchestrator.on_wheel(host, 100.0, 0.0, now);
        if intercept == Intercept::Pass {
            log::info!("wheel passed through to the page at t={}ms", now);
            break;
        }
        host.take_frames();
        if let Some(frame) = orchestrator.frame(host, WHEEL_INTERVAL_MS / 1000.0) {
            log_frame(&frame);
        }
    }
}

fn log_frame(frame: &Frame) {
    let mut line = format!(
        "y={:>7.1} p={:.3} pin={:?}",
        frame.scroll_y, frame.progress, frame.pin
    );
    if let Some(active) = frame.active {
        line.push_str(&format!(" active={}", active));
    }
    if let Some(change) = frame.index_change {
        line.push_str(&format!(" ({} -> {})", change.previous, change.current));
    }
    log::info!("{}", line);
    for target in &frame.targets {
        let css: Vec<String> = compose(&target.values)
            .iter()
            .map(|d| format!("{}: {}", d.name, d.value))
            .collect();
        log::debug!("  #{} {}", target.target, css.join("; "));
    }
}
