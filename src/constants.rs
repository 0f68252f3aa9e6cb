/// Markup contract and DOM tuning for the web front-end.
///
/// Sections opt in through data attributes; everything the page author can
/// rely on is named here.
// Section root: value is a preset name, optionally `name:items`
pub const SECTION_ATTR: &str = "data-choreo";
pub const SECTION_SELECTOR: &str = "[data-choreo]";

// Elements a section's tracks write to, in target order
pub const CHILD_SELECTOR: &str = "[data-choreo-child]";

// Elements the active index toggles between
pub const ITEM_SELECTOR: &str = "[data-choreo-item]";

// One-shot staggered reveal container and the navigation bar
pub const REVEAL_SELECTOR: &str = "[data-choreo-reveal]";
pub const NAV_SELECTOR: &str = "[data-choreo-nav]";

// Mirrors the active item on the section root
pub const ACTIVE_ATTR: &str = "data-choreo-active";

pub const ACTIVE_CLASS: &str = "is-active";
pub const PINNED_CLASS: &str = "is-pinned";
pub const NAV_HIDDEN_CLASS: &str = "nav-hidden";

// How long a section whose element has no layout yet keeps polling (frames)
pub const MOUNT_RETRY_FRAMES: u32 = 120;

// Animation-frame dt clamp (seconds); a backgrounded tab resumes with one
// large step otherwise
pub const MAX_FRAME_DT_SEC: f64 = 0.1;
