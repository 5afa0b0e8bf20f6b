// Every piece of text the app sends to, or synthesizes in place of, the model.

use crate::catalog::{Occasion, Weather};
use crate::recommendation::Recommendation;

/// Shown when a chat call fails outright.
pub const CHAT_ERROR_REPLY: &str = "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// Shown when a chat call succeeds but comes back without text.
pub const CHAT_EMPTY_REPLY: &str =
    "I'm sorry, I couldn't come up with an answer to that. Could you rephrase your question?";

/// Retry notice for a failed recommendation request.
pub const RECOMMENDATION_RETRY_NOTICE: &str = "We couldn't put together a look just now. Please try again.";

pub fn recommendation_prompt(occasion: Occasion, weather: Weather) -> String {
    format!(
        "You are a professional fashion stylist. Recommend a complete outfit for a {occasion} occasion \
        in {weather} weather. Describe the main outfit, the footwear, the accessories, and give practical \
        styling tips that account for the weather. Keep each part to two or three sentences.",
        occasion = occasion.label(),
        weather = weather.label(),
    )
}

/// First transcript entry after every new recommendation.
pub fn chat_greeting(occasion: Occasion, weather: Weather) -> String {
    format!(
        "Hi! I put together this {occasion} look for {weather} weather. \
        Ask me anything about it: colors, swaps, fit, or how to make it your own.",
        occasion = occasion.label(),
        weather = weather.label(),
    )
}

pub fn chat_system_instruction(occasion: Occasion, weather: Weather, recommendation: &Recommendation) -> String {
    format!(
        "You are a friendly, expert fashion stylist chatting with a client. \
        The client asked for an outfit for a {occasion} occasion in {weather} weather, \
        and you recommended the following (JSON): {json}\n\
        Answer their follow-up questions about this outfit. Stay consistent with the recommendation, \
        keep answers short and conversational, and suggest alternatives when asked.",
        occasion = occasion.label(),
        weather = weather.label(),
        json = recommendation.to_json(),
    )
}
