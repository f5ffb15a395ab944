// Per-match publish/subscribe plumbing.
//
// The service publishes a MatchEvent after every successful mutation; socket
// connections and the bot subscribe to the channel of the match they care about.

// Public API - what other modules can use
pub use bus::{EventBus, DEFAULT_CHANNEL_CAPACITY};
pub use events::MatchEvent;
pub use handler::{MatchEventError, MatchEventHandler};
pub use subscription::MatchSubscription;

// Internal modules
mod bus;
mod events;
mod handler;
mod subscription;
