use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::rates::{Currency, ExchangeRateProvider, RateQuote};

pub const DEFAULT_BASE_URL: &str = "https://www.tcmb.gov.tr";

const USER_AGENT: &str = concat!("faizdoviz/", env!("CARGO_PKG_VERSION"));

// Root element is <Tarih_Date Tarih="05.01.2024" ...>
#[derive(Debug, Deserialize)]
struct TcmbFeed {
    #[serde(rename = "@Tarih", default)]
    published: Option<String>,
    #[serde(rename = "Currency", default)]
    currencies: Vec<CurrencyNode>,
}

#[derive(Debug, Deserialize)]
struct CurrencyNode {
    #[serde(rename = "@Kod")]
    code: String,
    #[serde(rename = "Unit", default)]
    unit: Option<String>,
    #[serde(rename = "BanknoteSelling", default)]
    banknote_selling: Option<String>,
}

/// Parses a feed numeral; older bulletins use a decimal comma.
fn parse_numeral(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

impl TcmbFeed {
    fn banknote_selling(&self, currency: Currency) -> Result<f64> {
        let node = self
            .currencies
            .iter()
            .find(|c| c.code == currency.code())
            .ok_or_else(|| anyhow!("Currency {} not found in feed", currency))?;

        let raw = node
            .banknote_selling
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("No bank-note selling rate for {}", currency))?;
        let price = parse_numeral(raw)
            .ok_or_else(|| anyhow!("Invalid bank-note selling rate for {}: '{}'", currency, raw))?;

        // Rates are quoted per `Unit` of foreign currency (1 for USD and EUR).
        let unit = match node.unit.as_deref().map(str::trim) {
            None | Some("") => 1.0,
            Some(u) => {
                parse_numeral(u).ok_or_else(|| anyhow!("Invalid unit for {}: '{}'", currency, u))?
            }
        };

        Ok(price / unit)
    }

    fn published_on(&self) -> Option<NaiveDate> {
        self.published
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%d.%m.%Y").ok())
    }

    fn quote(&self, date: NaiveDate) -> Result<RateQuote> {
        Ok(RateQuote {
            date,
            usd: self.banknote_selling(Currency::Usd)?,
            eur: self.banknote_selling(Currency::Eur)?,
        })
    }
}

/// Reads the Turkish central bank's daily exchange rate bulletins.
pub struct TcmbProvider {
    base_url: String,
    client: reqwest::Client,
}

impl TcmbProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TcmbProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn current_url(&self) -> String {
        format!("{}/kurlar/today.xml", self.base_url)
    }

    fn daily_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/kurlar/{}/{}.xml",
            self.base_url,
            date.format("%Y%m"),
            date.format("%d%m%Y")
        )
    }

    async fn fetch_feed(&self, url: &str) -> Result<TcmbFeed> {
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for URL: {}", response.status(), url));
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;
        let text = String::from_utf8_lossy(&body);

        quick_xml::de::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse XML response from {}: {}", url, e))
    }
}

#[async_trait]
impl ExchangeRateProvider for TcmbProvider {
    #[instrument(name = "TcmbCurrentFetch", skip(self))]
    async fn fetch_current(&self) -> Result<RateQuote> {
        let feed = self.fetch_feed(&self.current_url()).await?;
        let date = feed
            .published_on()
            .unwrap_or_else(|| Local::now().date_naive());
        let quote = feed.quote(date)?;
        debug!(?quote, "Parsed current rates");
        Ok(quote)
    }

    #[instrument(name = "TcmbDailyFetch", skip(self))]
    async fn fetch_day(&self, date: NaiveDate) -> Result<RateQuote> {
        let feed = self.fetch_feed(&self.daily_url(date)).await?;
        let quote = feed.quote(date)?;
        debug!(?quote, "Parsed daily rates");
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::util::{WalkBack, fetch_historical};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_xml(tarih: &str, usd: &str, eur: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Tarih_Date Tarih="{tarih}" Date="01/05/2024" Bulten_No="2024/4">
    <Currency CrossOrder="0" Kod="USD" CurrencyCode="USD">
        <Unit>1</Unit>
        <Isim>ABD DOLARI</Isim>
        <CurrencyName>US DOLLAR</CurrencyName>
        <ForexBuying>29.7623</ForexBuying>
        <ForexSelling>29.8159</ForexSelling>
        <BanknoteBuying>29.7415</BanknoteBuying>
        <BanknoteSelling>{usd}</BanknoteSelling>
        <CrossRateUSD/>
        <CrossRateOther/>
    </Currency>
    <Currency CrossOrder="1" Kod="AUD" CurrencyCode="AUD">
        <Unit>1</Unit>
        <Isim>AVUSTRALYA DOLARI</Isim>
        <CurrencyName>AUSTRALIAN DOLLAR</CurrencyName>
        <ForexBuying>19.9532</ForexBuying>
        <ForexSelling>20.0833</ForexSelling>
        <BanknoteBuying>19.8774</BanknoteBuying>
        <BanknoteSelling>20.2038</BanknoteSelling>
        <CrossRateUSD>1.4925</CrossRateUSD>
        <CrossRateOther/>
    </Currency>
    <Currency CrossOrder="9" Kod="EUR" CurrencyCode="EUR">
        <Unit>1</Unit>
        <Isim>EURO</Isim>
        <CurrencyName>EURO</CurrencyName>
        <ForexBuying>32.6074</ForexBuying>
        <ForexSelling>32.6662</ForexSelling>
        <BanknoteBuying>32.5846</BanknoteBuying>
        <BanknoteSelling>{eur}</BanknoteSelling>
        <CrossRateUSD/>
        <CrossRateOther>1.0956</CrossRateOther>
    </Currency>
</Tarih_Date>"#
        )
    }

    async fn mount_feed(server: &MockServer, url_path: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn provider(server: &MockServer) -> TcmbProvider {
        TcmbProvider::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_comma_and_dot_numerals() {
        assert_eq!(parse_numeral("34,3199"), Some(34.3199));
        assert_eq!(parse_numeral(" 34.3199 "), Some(34.3199));
        assert_eq!(parse_numeral("0"), None);
        assert_eq!(parse_numeral("abc"), None);
    }

    #[test]
    fn builds_daily_url_from_date() {
        let provider = TcmbProvider::new("http://feed.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.daily_url(day(2024, 1, 5)),
            "http://feed.test/kurlar/202401/05012024.xml"
        );
        assert_eq!(provider.current_url(), "http://feed.test/kurlar/today.xml");
    }

    #[test]
    fn applies_unit_divisor() {
        let xml = r#"<Tarih_Date Tarih="05.01.2024">
            <Currency Kod="USD"><Unit>1</Unit><BanknoteSelling>30</BanknoteSelling></Currency>
            <Currency Kod="EUR"><Unit>100</Unit><BanknoteSelling>3300</BanknoteSelling></Currency>
        </Tarih_Date>"#;
        let feed: TcmbFeed = quick_xml::de::from_str(xml).unwrap();
        let quote = feed.quote(day(2024, 1, 5)).unwrap();
        assert_eq!(quote.usd, 30.0);
        assert_eq!(quote.eur, 33.0);
    }

    #[tokio::test]
    async fn test_successful_current_fetch() {
        let server = MockServer::start().await;
        mount_feed(
            &server,
            "/kurlar/today.xml",
            200,
            &feed_xml("05.01.2024", "29,8854", "32,7350"),
        )
        .await;

        let quote = provider(&server).fetch_current().await.unwrap();
        assert_eq!(quote.date, day(2024, 1, 5));
        assert_eq!(quote.usd, 29.8854);
        assert_eq!(quote.eur, 32.7350);
    }

    #[tokio::test]
    async fn test_current_fetch_missing_currency() {
        let server = MockServer::start().await;
        let xml = r#"<Tarih_Date Tarih="05.01.2024">
            <Currency Kod="USD"><Unit>1</Unit><BanknoteSelling>29.8854</BanknoteSelling></Currency>
        </Tarih_Date>"#;
        mount_feed(&server, "/kurlar/today.xml", 200, xml).await;

        let result = provider(&server).fetch_current().await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Currency EUR not found in feed"
        );
    }

    #[tokio::test]
    async fn test_current_fetch_empty_rate() {
        let server = MockServer::start().await;
        mount_feed(
            &server,
            "/kurlar/today.xml",
            200,
            &feed_xml("05.01.2024", "29.8854", ""),
        )
        .await;

        let result = provider(&server).fetch_current().await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No bank-note selling rate for EUR"
        );
    }

    #[tokio::test]
    async fn test_current_fetch_server_error() {
        let server = MockServer::start().await;
        mount_feed(&server, "/kurlar/today.xml", 500, "").await;

        let result = provider(&server).fetch_current().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("HTTP error: 500 Internal Server Error")
        );
    }

    #[tokio::test]
    async fn test_current_fetch_malformed_xml() {
        let server = MockServer::start().await;
        mount_feed(
            &server,
            "/kurlar/today.xml",
            200,
            "<Tarih_Date><Currency Kod=\"USD\">",
        )
        .await;

        let result = provider(&server).fetch_current().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse XML response")
        );
    }

    #[tokio::test]
    async fn test_daily_fetch_keeps_requested_date() {
        let server = MockServer::start().await;
        mount_feed(
            &server,
            "/kurlar/202401/05012024.xml",
            200,
            &feed_xml("05.01.2024", "29.9000", "32.8000"),
        )
        .await;

        let quote = provider(&server).fetch_day(day(2024, 1, 5)).await.unwrap();
        assert_eq!(quote.date, day(2024, 1, 5));
        assert_eq!(quote.usd, 29.9);
        assert_eq!(quote.eur, 32.8);
    }

    #[tokio::test]
    async fn test_historical_fetch_walks_back_over_weekend() {
        let server = MockServer::start().await;
        mount_feed(
            &server,
            "/kurlar/202401/05012024.xml",
            200,
            &feed_xml("05.01.2024", "29,9000", "32,8000"),
        )
        .await;

        // Sunday 2024-01-07 -> Saturday -> Friday 2024-01-05
        let quote = fetch_historical(&provider(&server), day(2024, 1, 7), &WalkBack::default())
            .await
            .unwrap();
        assert_eq!(quote.date, day(2024, 1, 5));
        assert_eq!(quote.usd, 29.9);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn test_historical_fetch_gives_up_after_ten_attempts() {
        let server = MockServer::start().await;

        let result =
            fetch_historical(&provider(&server), day(2024, 1, 1), &WalkBack::default()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No exchange rate published within 10 days up to 2024-01-01"
        );

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 10);
        assert_eq!(
            requests.last().unwrap().url.path(),
            "/kurlar/202312/23122023.xml"
        );
    }
}
