//! Project-wide constants.

/// Base URL for wikiHow articles and its MediaWiki API.
pub const DEFAULT_WIKI_URL: &str = "https://www.wikihow.com";

/// Slack Web API endpoint for posting a message.
pub const DEFAULT_CHAT_URL: &str = "https://slack.com/api/chat.postMessage";

/// Port the webhook server binds when none is configured.
pub const DEFAULT_PORT: u16 = 5000;

/// How many random pages to try before giving up on a query.
pub const MAX_ATTEMPTS: usize = 3;

/// Fewest steps quoted from a page (when the page has that many).
pub const MIN_STEPS: usize = 2;

/// Upper bound (exclusive) of the extra steps added on top of [`MIN_STEPS`].
pub const EXTRA_STEPS: usize = 3;

/// Maximum clock skew, in seconds, accepted on a signed request.
pub const MAX_TIMESTAMP_SKEW: u64 = 300;

/// The last step of every set of instructions.
pub const PUNCHLINE: &str = "Shove it up your butt.";

/// Build a numbered step line, e.g. `_1._ Crack the eggs`.
pub fn step_line(number: usize, text: &str) -> String {
    format!("_{number}._ {text}\n")
}
