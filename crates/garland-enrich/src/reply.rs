//! Model reply parsing and marketplace host filtering.

use serde::Deserialize;
use url::Url;

/// Hostnames a returned product/image URL may point at. Anything else is
/// dropped — the model occasionally invents links.
pub const ALLOWED_HOSTS: &[&str] = &[
  "dns-shop.ru",
  "www.dns-shop.ru",
  "www.ozon.ru",
  "ozon.ru",
  "www.wildberries.ru",
  "wildberries.ru",
  "www.1c-interes.ru",
  "www.mvideo.ru",
  "mvideo.ru",
  "www.citilink.ru",
  "citilink.ru",
  "www.onlinetrade.ru",
  "onlinetrade.ru",
  "market.yandex.ru",
];

/// The untrusted shape the model is asked to reply with.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnrichment {
  pub title: Option<String>,
  pub image: Option<String>,
  pub url:   Option<String>,
  pub price: Option<String>,
}

/// Parse the model reply: strict JSON first, then the first `{…}` block
/// when the model wrapped it in prose or a Markdown fence.
pub fn parse_reply(text: &str) -> Option<RawEnrichment> {
  let text = text.trim();
  if let Ok(parsed) = serde_json::from_str::<RawEnrichment>(text) {
    return Some(parsed);
  }
  let start = text.find('{')?;
  let end   = text.rfind('}')?;
  if end <= start {
    return None;
  }
  serde_json::from_str(&text[start..=end]).ok()
}

/// Keep `raw` only when it parses as a URL on an allow-listed host.
pub fn filter_marketplace_url(raw: &str) -> Option<String> {
  let parsed = Url::parse(raw).ok()?;
  let host   = parsed.host_str()?;
  ALLOWED_HOSTS
    .contains(&host)
    .then(|| raw.to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_clean_json() {
    let raw = parse_reply(
      r#"{"title":"Наушники","image":null,"url":"https://ozon.ru/p/1","price":"12 990 ₽"}"#,
    )
    .unwrap();
    assert_eq!(raw.title.as_deref(), Some("Наушники"));
    assert_eq!(raw.price.as_deref(), Some("12 990 ₽"));
  }

  #[test]
  fn parses_json_wrapped_in_prose() {
    let reply = "Вот результат:\n```json\n{\"title\":\"Лего\",\"url\":\"https://www.ozon.ru/p/2\"}\n```\nУдачи!";
    let raw = parse_reply(reply).unwrap();
    assert_eq!(raw.title.as_deref(), Some("Лего"));
    assert_eq!(raw.url.as_deref(), Some("https://www.ozon.ru/p/2"));
  }

  #[test]
  fn garbage_yields_none() {
    assert!(parse_reply("no json here").is_none());
    assert!(parse_reply("").is_none());
    assert!(parse_reply("{broken").is_none());
  }

  #[test]
  fn allows_marketplace_hosts() {
    for url in [
      "https://www.ozon.ru/product/123",
      "https://market.yandex.ru/card/9",
      "https://dns-shop.ru/item/42",
    ] {
      assert_eq!(filter_marketplace_url(url).as_deref(), Some(url));
    }
  }

  #[test]
  fn drops_unknown_hosts() {
    for url in [
      "https://evil.example.com/ozon.ru",
      "https://ozon.ru.example.com/x",
      "not a url",
    ] {
      assert!(filter_marketplace_url(url).is_none(), "url {url:?}");
    }
  }
}
