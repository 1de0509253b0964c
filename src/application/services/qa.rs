use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::application::prompts::{
    build_page_context, format_conversation, tutor_prompt, tutor_question,
};
use crate::domain::ports::{
    Content, ConversationStore, DocumentFetcher, GenerateRequest, GenerativeModel, Part,
    PdfTextExtractor, SamplingConfig,
};
use crate::domain::{ConversationTurn, DomainError, QaResult};

/// Upper bound on conversation turns fetched as context.
pub const HISTORY_WINDOW: usize = 20;

/// The conversational QA loop. Assembles conversation history plus a direct
/// page-window context (not embedding similarity search, which stays
/// pluggable via the search service) and invokes the generative model.
pub struct QaService {
    generative: Arc<dyn GenerativeModel>,
    conversations: Arc<dyn ConversationStore>,
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: Arc<dyn PdfTextExtractor>,
    call_timeout: Duration,
}

impl QaService {
    pub fn new(
        generative: Arc<dyn GenerativeModel>,
        conversations: Arc<dyn ConversationStore>,
        fetcher: Arc<dyn DocumentFetcher>,
        extractor: Arc<dyn PdfTextExtractor>,
    ) -> Self {
        Self {
            generative,
            conversations,
            fetcher,
            extractor,
            call_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// `collection` identifies the target index for callers; the active
    /// answer path reads page context directly and only records it in the
    /// trace span.
    #[instrument(
        skip(self),
        fields(collection = %collection, conversation_id = ?conversation_id, current_page)
    )]
    pub async fn answer(
        &self,
        question: &str,
        collection: &str,
        conversation_id: Option<Uuid>,
        pdf_url: &str,
        current_page: Option<u32>,
    ) -> Result<QaResult, DomainError> {
        let formatted_context = match conversation_id {
            Some(id) => {
                let turns = self
                    .with_deadline(self.conversations.recent_turns(id, HISTORY_WINDOW), || {
                        DomainError::internal("conversation history fetch timed out")
                    })
                    .await?;
                format_conversation(&turns)
            }
            None => String::new(),
        };

        // Fetch failure is fatal before any model call.
        let bytes = self
            .with_deadline(self.fetcher.fetch(pdf_url), || {
                DomainError::fetch(pdf_url, "fetch timed out")
            })
            .await?;

        let page_context = match current_page {
            Some(page) => {
                let pages = self.extractor.extract_pages(&bytes, pdf_url)?;
                build_page_context(&pages, page)
            }
            None => String::new(),
        };

        let system = tutor_prompt(question, &page_context, &formatted_context, current_page);
        let material = if page_context.is_empty() {
            // No usable page text: hand the raw PDF to the model inline.
            Part::pdf(base64::engine::general_purpose::STANDARD.encode(&bytes))
        } else {
            Part::text(format!("PDF textbook content:\n{page_context}"))
        };

        let request = GenerateRequest {
            contents: vec![
                Content::model(vec![Part::text(system), material]),
                Content::user(vec![Part::text(tutor_question(question))]),
            ],
            sampling: SamplingConfig::qa(),
        };

        let response = self
            .with_deadline(self.generative.generate(request), || {
                DomainError::model("generation timed out")
            })
            .await?;
        let answer = response.first_text()?.to_string();

        // Best effort: history persistence must not fail the answer.
        if let Some(id) = conversation_id {
            let turn = ConversationTurn::new(id, question, answer.clone());
            if let Err(e) = self.conversations.save_turn(&turn).await {
                warn!(conversation_id = %id, error = %e, "failed to persist turn");
            }
        }

        Ok(QaResult {
            question: question.to_string(),
            answer,
            candidates: response.candidates,
        })
    }

    async fn with_deadline<T, F>(
        &self,
        fut: F,
        on_expiry: impl FnOnce() -> DomainError,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_expiry()),
        }
    }
}
