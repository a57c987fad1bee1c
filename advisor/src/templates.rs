//! Prompt templates: file-backed, cached for the process lifetime.
//!
//! Each [`TemplateId`] maps to `{dir}/{stem}.jinja2`. A missing file is
//! replaced by the built-in default, which is written back so operators can
//! edit it. Unreadable or broken templates fall back to the default and are
//! logged; template problems never fail a request.
//!
//! Loaded text is cached until restart. Edits to files on disk are not picked
//! up by a running process.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use minijinja::Environment;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::AdvisorError;
use crate::intent::TemplateId;

/// Persistence for template text.
pub trait TemplateFileStore: Send + Sync {
    /// `Ok(None)` when no template is stored for `id`.
    fn read<'a>(&'a self, id: TemplateId) -> BoxFuture<'a, io::Result<Option<String>>>;
    fn write<'a>(&'a self, id: TemplateId, text: &'a str) -> BoxFuture<'a, io::Result<()>>;
}

/// Templates as `.jinja2` files in one directory.
#[derive(Clone, Debug)]
pub struct FsTemplateStore {
    dir: PathBuf,
}

impl FsTemplateStore {
    /// Creates `dir` (and parents) if needed. Run once at startup.
    pub async fn init(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "prompt template directory ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: TemplateId) -> PathBuf {
        self.dir.join(format!("{}.jinja2", id.file_stem()))
    }
}

impl TemplateFileStore for FsTemplateStore {
    fn read<'a>(&'a self, id: TemplateId) -> BoxFuture<'a, io::Result<Option<String>>> {
        Box::pin(async move {
            match tokio::fs::read_to_string(self.path_for(id)).await {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e),
            }
        })
    }

    fn write<'a>(&'a self, id: TemplateId, text: &'a str) -> BoxFuture<'a, io::Result<()>> {
        Box::pin(async move { tokio::fs::write(self.path_for(id), text).await })
    }
}

/// Resolves and renders prompt templates.
pub struct PromptTemplateStore {
    files: Arc<dyn TemplateFileStore>,
    cache: RwLock<HashMap<TemplateId, String>>,
    env: Environment<'static>,
}

impl PromptTemplateStore {
    pub fn new(files: Arc<dyn TemplateFileStore>) -> Self {
        Self {
            files,
            cache: RwLock::new(HashMap::new()),
            env: Environment::new(),
        }
    }

    /// Prepares the template directory and returns a store backed by it.
    pub async fn init(dir: impl Into<PathBuf>) -> Result<Self, AdvisorError> {
        let dir = dir.into();
        let fs = FsTemplateStore::init(&dir)
            .await
            .map_err(|e| AdvisorError::Config(format!("prompts dir {}: {e}", dir.display())))?;
        Ok(Self::new(Arc::new(fs)))
    }

    /// Template text for `id`, loading it on first use.
    pub async fn resolve(&self, id: TemplateId) -> String {
        if let Some(text) = self.cache.read().await.get(&id) {
            return text.clone();
        }

        let text = match self.files.read(id).await {
            Ok(Some(text)) => {
                debug!(template = %id, "template loaded");
                text
            }
            Ok(None) => {
                let text = default_template(id).to_string();
                if let Err(e) = self.files.write(id, &text).await {
                    warn!(template = %id, error = %e, "could not persist default template");
                } else {
                    info!(template = %id, "default template written");
                }
                text
            }
            Err(e) => {
                warn!(template = %id, error = %e, "template unreadable; using default");
                default_template(id).to_string()
            }
        };

        self.cache
            .write()
            .await
            .entry(id)
            .or_insert(text)
            .clone()
    }

    /// Renders `id` with `bindings`. Unknown placeholders render empty; a
    /// template that fails to compile or render falls back to the default.
    pub async fn render<S: Serialize>(&self, id: TemplateId, bindings: &S) -> String {
        let text = self.resolve(id).await;
        match self.env.render_str(&text, bindings) {
            Ok(out) => out,
            Err(e) => {
                warn!(template = %id, error = %e, "template render failed; using default");
                self.env
                    .render_str(default_template(id), bindings)
                    .unwrap_or_else(|_| default_template(id).to_string())
            }
        }
    }
}

/// Built-in template text for `id`.
pub fn default_template(id: TemplateId) -> &'static str {
    match id {
        TemplateId::General => GENERAL,
        TemplateId::ProductSpecific => PRODUCT_SPECIFIC,
        TemplateId::ProductRecommendation => PRODUCT_RECOMMENDATION,
        TemplateId::OrderInstructions => ORDER_INSTRUCTIONS,
        TemplateId::Clarification => CLARIFICATION,
    }
}

const GENERAL: &str = "\
{% if system_context %}Context: {{ system_context }}
{% endif %}{{ history }}
User question: {{ message }}

Answer helpfully and concisely. If the question is about IT hardware, only \
refer to products from the catalog.
";

const PRODUCT_SPECIFIC: &str = "\
You are answering a question about one catalog product.

Product: {{ name }}
Manufacturer: {{ manufacturer }}
Model: {{ model }}
Type: {{ type }}
Price: {{ price_text }}
Operating system: {{ os }}
Link: {{ link }}
Specifications:
{{ specifications }}
Typical users: {{ users }}
Ideal for: {{ ideal_for }}
Not recommended for: {{ not_recommended }}
Qualification: {{ qualification }}
{{ history }}
User question: {{ message }}

Answer using only the product data above. Say so if the data does not cover \
the question.
";

const PRODUCT_RECOMMENDATION: &str = "\
Recommend {% if single_product %}the single best product{% else %}suitable products{% endif %} \
for the user's requirements.

User requirements: {{ user_requirements }}

Available products:
{{ available_products }}
{{ history }}
User message: {{ message }}

Only recommend products from the list above and explain the choice briefly.
";

const ORDER_INSTRUCTIONS: &str = "\
The user wants to order the {{ manufacturer }} {{ model }}.
{{ history }}
User request: {{ user_query }}

Explain how to order this product through the internal IT shop: open the \
shop, search for the model, add it to the cart and submit the order for \
approval. Mention that delivery times depend on stock.
";

const CLARIFICATION: &str = "\
{{ history }}
User message: {{ message }}

The request is ambiguous. Ask one short clarifying question about the \
intended use, budget or required specifications.
";


#[cfg(test)]
mod tests {
    use super::fakes::MemoryTemplates;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_gets_default_written_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prompts = dir.path().join("prompts");
        let store = PromptTemplateStore::init(&prompts).await.expect("init");

        let text = store.resolve(TemplateId::Clarification).await;
        assert_eq!(text, default_template(TemplateId::Clarification));

        let on_disk = std::fs::read_to_string(prompts.join("clarification.jinja2")).expect("file");
        assert_eq!(on_disk, text);
    }

    #[tokio::test]
    async fn file_template_wins_and_is_cached() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("general.jinja2"), "Hi {{ message }}").expect("write");
        let store = PromptTemplateStore::init(dir.path()).await.expect("init");

        let out = store
            .render(TemplateId::General, &json!({"message": "there"}))
            .await;
        assert_eq!(out, "Hi there");

        // No hot-reload.
        std::fs::write(dir.path().join("general.jinja2"), "Changed").expect("write");
        let out = store
            .render(TemplateId::General, &json!({"message": "there"}))
            .await;
        assert_eq!(out, "Hi there");
    }

    #[tokio::test]
    async fn unknown_placeholders_render_empty() {
        let files = MemoryTemplates::default();
        files
            .files
            .lock()
            .expect("lock")
            .insert(TemplateId::General, "[{{ nope }}]{{ message }}".into());
        let store = PromptTemplateStore::new(Arc::new(files));
        let out = store
            .render(TemplateId::General, &json!({"message": "x"}))
            .await;
        assert_eq!(out, "[]x");
    }

    #[tokio::test]
    async fn broken_or_unreadable_template_uses_default() {
        let files = MemoryTemplates::default();
        files
            .files
            .lock()
            .expect("lock")
            .insert(TemplateId::Clarification, "{% if %}".into());
        let store = PromptTemplateStore::new(Arc::new(files));
        let out = store
            .render(TemplateId::Clarification, &json!({"message": "which one?"}))
            .await;
        assert!(out.contains("User message: which one?"));

        let store = PromptTemplateStore::new(Arc::new(MemoryTemplates {
            fail_reads: true,
            ..Default::default()
        }));
        assert_eq!(
            store.resolve(TemplateId::General).await,
            default_template(TemplateId::General)
        );
    }

    #[tokio::test]
    async fn every_default_template_renders() {
        let store = PromptTemplateStore::new(Arc::new(MemoryTemplates::default()));
        for id in TemplateId::ALL {
            let out = store.render(id, &json!({})).await;
            assert!(!out.trim().is_empty(), "{id} rendered empty");
        }
    }
}
