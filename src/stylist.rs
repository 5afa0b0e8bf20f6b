use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{Occasion, Weather};
use crate::gemini::GeminiClient;
use crate::prompts;
use crate::recommendation::{response_schema, Recommendation};
use crate::session::{Message, Snapshot, StylistSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationOutcome {
    /// Occasion or weather not chosen yet; nothing was sent.
    Skipped,
    /// Another request is still outstanding; nothing was sent.
    Busy,
    Applied(Recommendation),
    /// The call failed; prior state is untouched and a retry notice is set.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    EmptyMessage,
    NoRecommendation,
    Busy,
    /// The reply (possibly a fallback) that was appended after the question.
    Replied(Message),
    /// A new recommendation reseeded the transcript before the reply came back.
    Discarded,
}

// Holds an in-flight flag for exactly as long as it lives, so the flag is
// released on every exit path including a dropped future.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// An accepted recommendation request that hasn't reached the model yet.
pub struct RecommendationTicket {
    occasion: Occasion,
    weather: Weather,
    _in_flight: InFlight,
}

/// An accepted chat message, already visible in the transcript.
pub struct ChatTicket {
    text: String,
    system_instruction: String,
    generation: u64,
    _in_flight: InFlight,
}

/// Orchestrates the selection panel, the recommendation requester and the
/// chat session over one shared model client.
///
/// Each model-backed operation comes in two halves: `begin_*` validates and
/// claims the single in-flight slot (cheap, no network), `complete_*` talks to
/// the model and applies the result. `request_recommendation` and
/// `send_chat_message` run both halves inline; the `spawn_*` variants run the
/// second half on a background task so a caller can render the pending state.
pub struct Stylist {
    client: Arc<GeminiClient>,
    session: Mutex<StylistSession>,
    loading: Arc<AtomicBool>,
    chat_pending: Arc<AtomicBool>,
}

impl Stylist {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self {
            client,
            session: Mutex::new(StylistSession::new()),
            loading: Arc::new(AtomicBool::new(false)),
            chat_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn is_chat_pending(&self) -> bool {
        self.chat_pending.load(Ordering::Acquire)
    }

    /// Direct access for read-mostly callers. Don't hold it across an await
    /// on the model.
    pub async fn session(&self) -> MutexGuard<'_, StylistSession> {
        self.session.lock().await
    }

    pub async fn snapshot(&self) -> Snapshot {
        let session = self.session.lock().await;
        session.snapshot(self.is_loading(), self.is_chat_pending())
    }

    pub async fn set_occasion(&self, occasion: Occasion) {
        debug!(%occasion, "Occasion selected");
        self.session.lock().await.set_occasion(occasion);
    }

    pub async fn set_weather(&self, weather: Weather) {
        debug!(%weather, "Weather selected");
        self.session.lock().await.set_weather(weather);
    }

    pub async fn open_chat(&self) -> bool {
        self.session.lock().await.open_chat()
    }

    pub async fn close_chat(&self) {
        self.session.lock().await.close_chat();
    }

    /// Asks the model for a look matching the current selection.
    pub async fn request_recommendation(&self) -> RecommendationOutcome {
        match self.begin_recommendation().await {
            Ok(ticket) => self.complete_recommendation(ticket).await,
            Err(outcome) => outcome,
        }
    }

    /// Like `request_recommendation`, but returns as soon as the request is
    /// accepted. The loading flag is already set when this returns `Ok`.
    pub async fn spawn_recommendation(
        self: &Arc<Self>,
    ) -> Result<JoinHandle<RecommendationOutcome>, RecommendationOutcome> {
        let ticket = self.begin_recommendation().await?;
        let stylist = Arc::clone(self);
        Ok(tokio::spawn(async move { stylist.complete_recommendation(ticket).await }))
    }

    pub async fn begin_recommendation(&self) -> Result<RecommendationTicket, RecommendationOutcome> {
        let mut session = self.session.lock().await;
        let Some((occasion, weather)) = session.selection() else {
            debug!("Recommendation requested without a full selection; skipping");
            return Err(RecommendationOutcome::Skipped);
        };

        let Some(in_flight) = InFlight::acquire(&self.loading) else {
            debug!("Recommendation already in flight; ignoring request");
            return Err(RecommendationOutcome::Busy);
        };

        // A fresh attempt replaces any stale retry notice.
        session.set_notice(None);

        Ok(RecommendationTicket {
            occasion,
            weather,
            _in_flight: in_flight,
        })
    }

    #[instrument(skip(self, ticket), fields(occasion = %ticket.occasion, weather = %ticket.weather))]
    pub async fn complete_recommendation(&self, ticket: RecommendationTicket) -> RecommendationOutcome {
        let RecommendationTicket { occasion, weather, .. } = ticket;

        info!("Requesting recommendation");
        let prompt = prompts::recommendation_prompt(occasion, weather);
        let result = match self.client.generate_json(&prompt, response_schema()).await {
            Ok(raw) => Recommendation::parse(&raw),
            Err(e) => Err(e),
        };

        // Apply while the ticket (and so the loading flag) is still held.
        let mut session = self.session.lock().await;
        let outcome = match result {
            Ok(recommendation) => {
                info!("Recommendation received");
                session.apply_recommendation(occasion, weather, recommendation.clone());
                RecommendationOutcome::Applied(recommendation)
            }
            Err(e) => {
                error!(error = %e, "Failed to get recommendation");
                session.set_notice(Some(prompts::RECOMMENDATION_RETRY_NOTICE.to_string()));
                RecommendationOutcome::Failed
            }
        };
        drop(session);
        drop(ticket);
        outcome
    }

    /// Sends one follow-up question about the current look.
    pub async fn send_chat_message(&self, text: &str) -> ChatOutcome {
        match self.begin_chat(text).await {
            Ok(ticket) => self.complete_chat(ticket).await,
            Err(outcome) => outcome,
        }
    }

    /// Like `send_chat_message`, but returns once the question is in the
    /// transcript and the reply is pending.
    pub async fn spawn_chat_message(self: &Arc<Self>, text: &str) -> Result<JoinHandle<ChatOutcome>, ChatOutcome> {
        let ticket = self.begin_chat(text).await?;
        let stylist = Arc::clone(self);
        Ok(tokio::spawn(async move { stylist.complete_chat(ticket).await }))
    }

    pub async fn begin_chat(&self, text: &str) -> Result<ChatTicket, ChatOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatOutcome::EmptyMessage);
        }

        let mut session = self.session.lock().await;
        let Some(look) = session.look() else {
            return Err(ChatOutcome::NoRecommendation);
        };
        let system_instruction =
            prompts::chat_system_instruction(look.occasion, look.weather, &look.recommendation);

        let Some(in_flight) = InFlight::acquire(&self.chat_pending) else {
            debug!("Chat reply still pending; ignoring message");
            return Err(ChatOutcome::Busy);
        };

        // Shown right away, before the model answers.
        session.push_message(Message::user(text));

        Ok(ChatTicket {
            text: text.to_string(),
            system_instruction,
            generation: session.transcript_generation(),
            _in_flight: in_flight,
        })
    }

    #[instrument(skip(self, ticket))]
    pub async fn complete_chat(&self, ticket: ChatTicket) -> ChatOutcome {
        let reply = match self.client.chat(&ticket.system_instruction, &ticket.text).await {
            Ok(Some(reply)) => Message::model(reply),
            Ok(None) => {
                warn!("Chat reply was empty; using fallback");
                Message::model(prompts::CHAT_EMPTY_REPLY)
            }
            Err(e) => {
                error!(error = %e, transport = e.is_transport(), "Chat request failed");
                Message::model(prompts::CHAT_ERROR_REPLY)
            }
        };

        let mut session = self.session.lock().await;
        if session.transcript_generation() != ticket.generation {
            info!("Transcript was reseeded while waiting; dropping chat reply");
            return ChatOutcome::Discarded;
        }
        session.push_message(reply.clone());
        drop(session);
        drop(ticket);
        ChatOutcome::Replied(reply)
    }
}
