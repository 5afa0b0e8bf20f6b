use serde::Serialize;

use crate::catalog::{occasion_entries, weather_entries, CatalogEntry, Occasion, Weather};
use crate::prompts;
use crate::recommendation::{Recommendation, StyledLook};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatPanel {
    #[default]
    Closed,
    Open,
}

/// What the results area shows. Exactly one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultsView {
    Empty,
    Loading,
    Result { look: StyledLook },
}

impl ResultsView {
    pub fn derive(look: Option<&StyledLook>, loading: bool) -> Self {
        match (loading, look) {
            (true, _) => ResultsView::Loading,
            (false, Some(look)) => ResultsView::Result { look: look.clone() },
            (false, None) => ResultsView::Empty,
        }
    }
}

/// All state behind one stylist UI. Owned by `Stylist`; the in-flight flags
/// live there too since they must survive without holding this lock.
#[derive(Debug, Default)]
pub struct StylistSession {
    occasion: Option<Occasion>,
    weather: Option<Weather>,
    look: Option<StyledLook>,
    transcript: Vec<Message>,
    // Bumped on every reseed so late chat replies can tell they're stale.
    transcript_generation: u64,
    chat_panel: ChatPanel,
    notice: Option<String>,
}

impl StylistSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occasion(&self) -> Option<Occasion> {
        self.occasion
    }

    pub fn weather(&self) -> Option<Weather> {
        self.weather
    }

    pub fn set_occasion(&mut self, occasion: Occasion) {
        self.occasion = Some(occasion);
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = Some(weather);
    }

    /// Both halves of the selection, if the user has made them.
    pub fn selection(&self) -> Option<(Occasion, Weather)> {
        Some((self.occasion?, self.weather?))
    }

    pub fn look(&self) -> Option<&StyledLook> {
        self.look.as_ref()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn transcript_generation(&self) -> u64 {
        self.transcript_generation
    }

    pub fn chat_panel(&self) -> ChatPanel {
        self.chat_panel
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    /// Replaces the recommendation wholesale and reseeds the transcript with
    /// the greeting for the pair it was styled for.
    pub(crate) fn apply_recommendation(&mut self, occasion: Occasion, weather: Weather, recommendation: Recommendation) {
        self.look = Some(StyledLook {
            occasion,
            weather,
            recommendation,
        });
        self.transcript = vec![Message::model(prompts::chat_greeting(occasion, weather))];
        self.transcript_generation += 1;
        self.notice = None;
    }

    pub(crate) fn push_message(&mut self, message: Message) {
        self.transcript.push(message);
    }

    /// Opens the chat panel. Only possible once there's something to talk about.
    pub fn open_chat(&mut self) -> bool {
        if self.look.is_some() {
            self.chat_panel = ChatPanel::Open;
            true
        } else {
            false
        }
    }

    pub fn close_chat(&mut self) {
        self.chat_panel = ChatPanel::Closed;
    }

    pub fn snapshot(&self, loading: bool, chat_pending: bool) -> Snapshot {
        Snapshot {
            occasion: self.occasion,
            weather: self.weather,
            occasions: occasion_entries(self.occasion),
            weathers: weather_entries(self.weather),
            can_request: self.selection().is_some() && !loading,
            view: ResultsView::derive(self.look.as_ref(), loading),
            notice: self.notice.clone(),
            chat: ChatSnapshot {
                panel: self.chat_panel,
                pending: chat_pending,
                messages: self.transcript.clone(),
            },
        }
    }
}

/// Read-only copy of the session handed to templates and the JSON endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub occasion: Option<Occasion>,
    pub weather: Option<Weather>,
    pub occasions: Vec<CatalogEntry>,
    pub weathers: Vec<CatalogEntry>,
    pub can_request: bool,
    pub view: ResultsView,
    pub notice: Option<String>,
    pub chat: ChatSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub panel: ChatPanel,
    pub pending: bool,
    pub messages: Vec<Message>,
}

impl Snapshot {
    /// True while any model call is outstanding.
    pub fn is_pending(&self) -> bool {
        self.view == ResultsView::Loading || self.chat.pending
    }
}
