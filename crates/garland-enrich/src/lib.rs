//! Best-effort AI item enrichment.
//!
//! Given a free-text wish ("беспроводные наушники"), asks a Gemini model
//! for a concrete offer on the allow-listed Russian marketplaces and
//! returns `{title, image, url, price}` with the URL host-filtered and the
//! price normalised to roubles. Purely additive metadata assistance — no
//! other component depends on this crate.

mod price;
mod reply;

pub use reply::ALLOWED_HOSTS;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("query is empty")]
  EmptyQuery,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("upstream returned {status}: {body}")]
  UpstreamStatus { status: u16, body: String },

  #[error("could not parse a result out of the model reply")]
  Unparsable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Configuration ───────────────────────────────────────────────────────────

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Settings for the enrichment client.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
  pub api_key:  String,
  pub model:    String,
  /// Override for tests; defaults to the Google endpoint.
  pub base_url: String,
}

impl EnrichConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:  api_key.into(),
      model:    DEFAULT_MODEL.to_owned(),
      base_url: DEFAULT_BASE_URL.to_owned(),
    }
  }
}

// ─── Result type ─────────────────────────────────────────────────────────────

/// The filtered, normalised enrichment handed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrichment {
  pub title: String,
  pub image: Option<String>,
  pub url:   Option<String>,
  pub price: Option<String>,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
  contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
  role:  &'a str,
  parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
  text: Option<String>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for the enrichment collaborator.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct EnrichClient {
  client: reqwest::Client,
  config: EnrichConfig,
}

impl EnrichClient {
  pub fn new(config: EnrichConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  /// Look up `query` and return the best-effort enrichment.
  ///
  /// No automatic retry: a failed lookup surfaces to the caller, who
  /// re-submits manually.
  pub async fn enrich(&self, query: &str) -> Result<Enrichment> {
    let query = query.trim();
    if query.is_empty() {
      return Err(Error::EmptyQuery);
    }

    let prompt  = build_prompt(query);
    let request = GenerateRequest {
      contents: [Content {
        role:  "user",
        parts: [Part { text: &prompt }],
      }],
    };

    let url = format!(
      "{}/v1beta/models/{}:generateContent?key={}",
      self.config.base_url.trim_end_matches('/'),
      self.config.model,
      self.config.api_key,
    );

    let response = self.client.post(&url).json(&request).send().await?;
    let status   = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      tracing::warn!(status = status.as_u16(), "enrichment upstream failed");
      return Err(Error::UpstreamStatus {
        status: status.as_u16(),
        body,
      });
    }

    let payload: GenerateResponse = response.json().await?;
    let text = payload
      .candidates
      .into_iter()
      .flat_map(|c| c.content.into_iter().flat_map(|c| c.parts))
      .filter_map(|p| p.text)
      .collect::<Vec<_>>()
      .join("\n");

    let raw = reply::parse_reply(&text).ok_or(Error::Unparsable)?;

    Ok(Enrichment {
      title: raw.title.filter(|t| !t.is_empty()).unwrap_or_else(|| query.to_owned()),
      // A disallowed image URL falls back to the raw value; a disallowed
      // product URL is dropped outright.
      image: raw
        .image
        .clone()
        .and_then(|u| reply::filter_marketplace_url(&u))
        .or(raw.image),
      url:   raw.url.and_then(|u| reply::filter_marketplace_url(&u)),
      price: price::normalize(raw.price.as_deref()),
    })
  }
}

/// Product-research prompt. The model must answer with a single JSON line;
/// `reply::parse_reply` copes when it wraps it in prose anyway.
fn build_prompt(query: &str) -> String {
  let mut prompt = [
    "Ты ассистент для вишлиста, нужен быстрый ресёрч по товару.",
    "Найди актуальное предложение на российских сайтах: DNS, ОнлайнТрейд, ОЗОН, Wildberries, Яндекс Маркет, М.Видео, Ситилинк.",
    "Дай конкретные данные: рабочий URL карточки, реальную ссылку на картинку товара, цену в рублях.",
    "Ответ строго JSON одной строкой без текста и Markdown:",
    r#"{"title":"...","image":"https://...","url":"https://...","price":"123 000 ₽"}"#,
    "Требования:",
    "- title: лаконичное русское название по запросу.",
    "- image: ссылка на фото товара (jpeg/png/webp) с перечисленных площадок.",
    "- url: прямая ссылка на карточку товара на русском маркетплейсе.",
    "- price: цена только в рублях с символом ₽, без долларов.",
    "- Если точных данных нет, всё равно верни лучший вариант из перечисленных площадок.",
  ]
  .join("\n");
  prompt.push_str("\nЗапрос пользователя: ");
  prompt.push_str(query);
  prompt
}
