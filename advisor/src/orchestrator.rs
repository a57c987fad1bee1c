//! The two public flows: answer a chat message and recommend a product.

use std::sync::Arc;

use ai_llm_service::LlmService;
use catalog_store::embed::llm::LlmEmbedder;
use catalog_store::{QdrantFacade, StoreConfig};
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument, warn};

use crate::advice::{ADVICE_FAILED, NO_MATCHES, advice_limit, advice_summary};
use crate::api_types::{ChatReply, Recommendation, RecommendError};
use crate::cfg::AdvisorConfig;
use crate::error::AdvisorError;
use crate::intent::{TemplateId, classify_order_intent, resolve_template};
use crate::llm::{LlmBackend, ServiceBackend};
use crate::prompt::{PromptContextBuilder, has_product};
use crate::retrieve::{RetrievalService, SearchOutcome};
use crate::select::{SELECTION_MARKER, select};
use crate::session::{ConversationSession, ResetReply, SessionHandle};
use crate::templates::PromptTemplateStore;

const PERSONA: &str = "\
You are a friendly IT hardware advisor. Your main focus is on IT topics and products.

For IT product inquiries: ONLY discuss products that are in the product catalog.

For general questions: You may politely and competently answer non-IT related \
questions, but indicate at the end of your response that you're primarily \
available for IT-related matters.";

/// Persona text plus the greeting rule for this point in the conversation.
pub fn system_instruction(first_message: bool) -> String {
    let note = if first_message {
        "NOTE: This is the first message in the conversation. You may greet the user once."
    } else {
        "NOTE: This is NOT the first message in the conversation. DO NOT start with a greeting."
    };
    format!("{PERSONA}\n{note}")
}

pub struct Orchestrator {
    retrieval: RetrievalService,
    llm: Arc<dyn LlmBackend>,
    templates: Arc<PromptTemplateStore>,
    cfg: AdvisorConfig,
    session: SessionHandle,
}

impl Orchestrator {
    pub fn new(
        retrieval: RetrievalService,
        llm: Arc<dyn LlmBackend>,
        templates: Arc<PromptTemplateStore>,
        cfg: AdvisorConfig,
    ) -> Self {
        Self {
            retrieval,
            llm,
            templates,
            cfg,
            session: ConversationSession::handle(),
        }
    }

    /// Wires the production collaborators: Qdrant index, LLM-backed
    /// embedder and completion backend, file-backed templates.
    pub async fn connect(
        svc: Arc<LlmService>,
        store: &StoreConfig,
        cfg: AdvisorConfig,
    ) -> Result<Self, AdvisorError> {
        let index = Arc::new(QdrantFacade::new(store)?);
        let embedder = Arc::new(LlmEmbedder::new(svc.clone(), store.embedding_dim));
        let retrieval = RetrievalService::new(embedder, index, cfg.retrieval_timeout);
        let templates = Arc::new(PromptTemplateStore::init(&cfg.prompts_dir).await?);
        info!(
            collection = %store.collection,
            prompts_dir = %cfg.prompts_dir.display(),
            "advisor ready"
        );
        Ok(Self::new(
            retrieval,
            Arc::new(ServiceBackend::new(svc)),
            templates,
            cfg,
        ))
    }

    /// The orchestrator's own session.
    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// A fresh session not shared with anyone.
    pub fn new_session(&self) -> SessionHandle {
        ConversationSession::handle()
    }

    /// Answers one chat message within `session`.
    ///
    /// The session lock is held from history read to append, so concurrent
    /// calls on one session never interleave. Failures come back as
    /// `ChatReply { error }` and leave the session untouched.
    #[instrument(skip_all, fields(role = role_type.unwrap_or("general")))]
    pub async fn answer_chat(
        &self,
        session: &SessionHandle,
        message: &str,
        role_type: Option<&str>,
        context: Option<&Value>,
    ) -> ChatReply {
        let empty = Value::Object(Map::new());
        let context = context.unwrap_or(&empty);

        let mut guard = session.lock().await;

        let order_intent = classify_order_intent(message);
        let id = resolve_template(role_type, order_intent, has_product(context));
        debug!(template = %id, order_intent, "template resolved");

        let bindings = PromptContextBuilder::build(
            id,
            message,
            context,
            guard.recent(self.cfg.history_window),
        );
        let prompt = self.templates.render(id, &bindings).await;
        let full_prompt = format!("{}\n\n{}", system_instruction(guard.is_empty()), prompt);

        match self.call_llm(&full_prompt).await {
            Ok(text) => {
                let text = text.trim().to_string();
                guard.append(message, text.clone());
                ChatReply::ok(text)
            }
            Err(e) => {
                warn!(error = %e, "chat completion failed");
                ChatReply::err(format!("Error generating response: {e}"))
            }
        }
    }

    /// Retrieves candidates, asks the model to pick one, and returns it.
    #[instrument(skip_all)]
    pub async fn recommend(&self, query: &str) -> Result<Recommendation, RecommendError> {
        let found = self
            .retrieval
            .try_retrieve(query, self.cfg.search_limit)
            .await
            .map_err(|e| match e {
                AdvisorError::NotFound => RecommendError::NotFound,
                other => RecommendError::Upstream(other.to_string()),
            })?;

        if found.products.is_empty() {
            info!("no candidates for recommendation");
            return Err(RecommendError::NotFound);
        }

        let shortlist: Vec<_> = found
            .products
            .into_iter()
            .take(self.cfg.shortlist_size)
            .collect();

        let context = json!({
            "products": shortlist,
            "user_requirements": query,
            "single_product": true,
        });
        let bindings =
            PromptContextBuilder::build(TemplateId::ProductRecommendation, query, &context, &[]);
        let prompt = self
            .templates
            .render(TemplateId::ProductRecommendation, &bindings)
            .await;
        let prompt = format!("{prompt}\n{}", selection_instruction(shortlist.len()));

        let reply = self
            .call_llm(&prompt)
            .await
            .map_err(|e| RecommendError::Upstream(e.to_string()))?;

        let chosen = select(&shortlist, &reply).ok_or(RecommendError::NotFound)?;
        info!(index = chosen.index, product = %chosen.product.id, "product selected");

        Ok(Recommendation {
            recommended_product: chosen.product,
            llm_response: chosen.cleaned_reply,
        })
    }

    /// Chat on the orchestrator's own session. `history` and
    /// `product_context` are merged into the request context; an explicit
    /// `history` key in the context wins.
    pub async fn chat(
        &self,
        message: &str,
        history: Option<Value>,
        role_type: Option<&str>,
        product_context: Option<Value>,
    ) -> ChatReply {
        let mut ctx = match product_context {
            Some(Value::Object(m)) => m,
            _ => Map::new(),
        };
        if let Some(h) = history {
            ctx.entry("history").or_insert(h);
        }
        let ctx = Value::Object(ctx);
        self.answer_chat(&self.session, message, role_type, Some(&ctx))
            .await
    }

    pub async fn reset_chat(&self) -> ResetReply {
        self.session.lock().await.reset()
    }

    /// Plain product search; never fails (see [`RetrievalService::retrieve`]).
    pub async fn search(&self, query: &str) -> SearchOutcome {
        self.retrieval.retrieve(query, self.cfg.search_limit).await
    }

    /// Shortlist with a fixed-text summary instead of a model reply.
    /// Covers one product when `single_product`, otherwise up to five.
    #[instrument(skip_all, fields(single_product = single_product))]
    pub async fn advise(&self, query: &str, single_product: bool) -> SearchOutcome {
        let limit = self.cfg.search_limit.max(advice_limit(single_product) as u64);
        let found = match self.retrieval.try_retrieve(query, limit).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "advice lookup failed");
                return SearchOutcome {
                    products: Vec::new(),
                    raw_count: 0,
                    message: ADVICE_FAILED.to_string(),
                };
            }
        };
        if found.products.is_empty() {
            return SearchOutcome {
                products: Vec::new(),
                raw_count: found.raw_count,
                message: NO_MATCHES.to_string(),
            };
        }

        let mut products = found.products;
        products.truncate(advice_limit(single_product));
        debug!(shown = products.len(), raw = found.raw_count, "advice: done");
        SearchOutcome {
            message: advice_summary(&products, single_product),
            products,
            raw_count: found.raw_count,
        }
    }

    async fn call_llm(&self, prompt: &str) -> Result<String, AdvisorError> {
        let opts = self.llm.defaults();
        match tokio::time::timeout(self.cfg.llm_timeout, self.llm.complete(prompt, opts)).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(AdvisorError::Timeout(self.cfg.llm_timeout)),
        }
    }
}

fn selection_instruction(n: usize) -> String {
    format!(
        "Start your answer with the line `{SELECTION_MARKER} <number>`, where <number> is \
         the number after \"Product\" of your choice (0 to {}). Then explain the choice.",
        n.saturating_sub(1)
    )
}
