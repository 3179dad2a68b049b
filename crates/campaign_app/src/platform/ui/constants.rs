use std::time::Duration;

pub const WINDOW_TITLE: &str = "Campaign Tool";
pub const WINDOW_SIZE: [f32; 2] = [960.0, 720.0];

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);
/// Upper bound between repaints so engine results and toasts expire on time.
pub const REPAINT_INTERVAL: Duration = Duration::from_millis(200);

pub const URL_BOX_ROWS: usize = 10;
pub const INVALID_LIST_HEIGHT: f32 = 90.0;
pub const PROGRESS_BAR_WIDTH: f32 = 160.0;

pub const TOKEN_INPUT_ID: &str = "token_input";
pub const USE_TOKEN_LABEL: &str = "Use token";

pub const HINT_TOKEN: &str = "Campaign token (leave empty to get one on first submit)";
pub const HINT_CAMPAIGN_NAME: &str = "Campaign name";
pub const HINT_URLS: &str = "One URL per line, e.g. https://example.com/page";
