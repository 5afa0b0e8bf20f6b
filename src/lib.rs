pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod gemini;
pub mod prompts;
pub mod recommendation;
pub mod session;
pub mod stylist;
pub mod terminal;
pub mod web_server;

pub use catalog::{Occasion, Weather};
pub use config::{StylistConfig, WebConfig};
pub use error::StylistError;
pub use gemini::GeminiClient;
pub use recommendation::{Recommendation, StyledLook};
pub use session::{ChatPanel, Message, ResultsView, Role, Snapshot, StylistSession};
pub use stylist::{ChatOutcome, RecommendationOutcome, Stylist};
