use crate::core::error::RateError;
use crate::core::provider::RateProvider;
use crate::core::snapshot::{BASE_CODE, BASE_NAME, CurrencyEntry, RateSnapshot};
use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, instrument, warn};

/// Resource carrying the current publication. Dated lookups go through the
/// archive instead.
const DAILY_RESOURCE: &str = "/daily_json.js";

/// Fetches daily rate snapshots from the `cbr-xml-daily.ru` JSON mirror.
///
/// The archive has no entries for weekends and holidays. A request for
/// such a date falls back one calendar day at a time, sequentially, until
/// a published snapshot is found or `max_lookback_days` steps have been
/// consumed.
pub struct CbrProvider {
    base_url: String,
    max_lookback_days: u32,
}

impl CbrProvider {
    pub fn new(base_url: &str, max_lookback_days: u32) -> Self {
        CbrProvider {
            base_url: base_url.to_string(),
            max_lookback_days,
        }
    }

    // The doubled path separators match the URL shape the reference
    // clients of the mirror use; the service accepts them.
    fn resource_for(date: NaiveDate, today: NaiveDate) -> String {
        if date == today {
            DAILY_RESOURCE.to_string()
        } else {
            format!(
                "/archive//{:04}//{:02}//{:02}//daily_json.js",
                date.year(),
                date.month(),
                date.day()
            )
        }
    }
}

/// The feed quotes everything in roubles and never lists the rouble
/// itself; a unit entry lets it participate in conversions like any other
/// code.
fn inject_base_entry(snapshot: &mut RateSnapshot) {
    snapshot.currencies.insert(
        BASE_CODE.to_string(),
        CurrencyEntry {
            id: String::new(),
            num_code: "643".to_string(),
            code: BASE_CODE.to_string(),
            nominal: 1,
            name: BASE_NAME.to_string(),
            value: 1.0,
            previous: 1.0,
        },
    );
}

#[async_trait]
impl RateProvider for CbrProvider {
    #[instrument(name = "CbrFetch", skip(self), fields(date = %date))]
    async fn fetch(&self, date: NaiveDate) -> Result<RateSnapshot, RateError> {
        let today = Local::now().date_naive();
        let client = reqwest::Client::builder()
            .user_agent(concat!("kurs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut current = date;
        let mut steps = 0u32;
        loop {
            let url = format!("{}{}", self.base_url, Self::resource_for(current, today));
            debug!("Requesting rate snapshot from {}", url);

            let response = client.get(&url).send().await?;
            if response.status().is_success() {
                let text = response.text().await?;
                let mut snapshot: RateSnapshot = serde_json::from_str(&text)?;
                inject_base_entry(&mut snapshot);
                if current != date {
                    debug!("Serving rates for {} in place of {}", current, date);
                }
                return Ok(snapshot);
            }

            debug!(
                "No snapshot published for {} ({}), stepping back one day",
                current,
                response.status()
            );
            if steps >= self.max_lookback_days {
                warn!(
                    "Consumed the lookback bound of {} days starting from {}",
                    self.max_lookback_days, date
                );
                return Err(RateError::LookbackExhausted {
                    requested: date,
                    earliest: current,
                });
            }
            steps += 1;
            current = match current.pred_opt() {
                Some(previous) => previous,
                None => {
                    return Err(RateError::LookbackExhausted {
                        requested: date,
                        earliest: current,
                    });
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body(date: &str) -> String {
        format!(
            r#"{{
                "Date": "{date}T11:30:00+03:00",
                "PreviousDate": "2024-03-06T11:30:00+03:00",
                "PreviousURL": "//www.cbr-xml-daily.ru/archive/2024/03/06/daily_json.js",
                "Timestamp": "{date}T12:00:00+03:00",
                "Valute": {{
                    "USD": {{
                        "ID": "R01235",
                        "NumCode": "840",
                        "CharCode": "USD",
                        "Nominal": 1,
                        "Name": "Доллар США",
                        "Value": 90.0,
                        "Previous": 89.5
                    }},
                    "EUR": {{
                        "ID": "R01239",
                        "NumCode": "978",
                        "CharCode": "EUR",
                        "Nominal": 1,
                        "Name": "Евро",
                        "Value": 100.0,
                        "Previous": 99.5
                    }}
                }}
            }}"#
        )
    }

    fn archive_path(date: NaiveDate) -> String {
        format!(
            "/archive//{:04}//{:02}//{:02}//daily_json.js",
            date.year(),
            date.month(),
            date.day()
        )
    }

    async fn mount_snapshot(server: &MockServer, resource: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(resource))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_successful_fetch_injects_base_entry() {
        let requested = date("2024-03-07");
        let server = MockServer::start().await;
        mount_snapshot(&server, &archive_path(requested), &sample_body("2024-03-07")).await;

        let provider = CbrProvider::new(&server.uri(), 30);
        let snapshot = provider.fetch(requested).await.unwrap();

        assert_eq!(snapshot.effective_date(), requested);
        assert_eq!(snapshot.get("USD").unwrap().value, 90.0);

        let rub = snapshot.get(BASE_CODE).unwrap();
        assert_eq!(rub.nominal, 1);
        assert_eq!(rub.value, 1.0);
        assert_eq!(rub.name, BASE_NAME);
    }

    #[tokio::test]
    async fn test_fallback_walks_back_over_missing_days() {
        // 2024-03-09/08 are unpublished, 2024-03-07 has data; unmatched
        // requests get a 404 from the mock server.
        let requested = date("2024-03-09");
        let published = date("2024-03-07");

        let server = MockServer::start().await;
        mount_snapshot(&server, &archive_path(published), &sample_body("2024-03-07")).await;

        let provider = CbrProvider::new(&server.uri(), 30);
        let snapshot = provider.fetch(requested).await.unwrap();

        assert_eq!(snapshot.effective_date(), published);

        // One request per missing day plus the hit
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn test_lookback_bound_is_terminal() {
        let requested = date("2024-03-09");
        let server = MockServer::start().await;

        let provider = CbrProvider::new(&server.uri(), 2);
        let err = provider.fetch(requested).await.unwrap_err();

        match err {
            RateError::LookbackExhausted {
                requested: r,
                earliest,
            } => {
                assert_eq!(r, requested);
                assert_eq!(earliest, date("2024-03-07"));
            }
            other => panic!("Expected LookbackExhausted, got {other:?}"),
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_body_is_terminal() {
        let requested = date("2024-03-07");
        let server = MockServer::start().await;
        mount_snapshot(&server, &archive_path(requested), "not a snapshot").await;

        let provider = CbrProvider::new(&server.uri(), 30);
        let err = provider.fetch(requested).await.unwrap_err();
        assert!(matches!(err, RateError::Parse(_)));

        // No fallback on a parse failure
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_today_uses_daily_resource() {
        let today = Local::now().date_naive();
        let body = sample_body(&today.format("%Y-%m-%d").to_string());

        let server = MockServer::start().await;
        mount_snapshot(&server, DAILY_RESOURCE, &body).await;

        let provider = CbrProvider::new(&server.uri(), 30);
        let snapshot = provider.fetch(today).await.unwrap();
        assert_eq!(snapshot.effective_date(), today);
    }

    #[tokio::test]
    async fn test_today_falls_back_into_archive() {
        let today = Local::now().date_naive();
        let yesterday = today.pred_opt().unwrap();
        let body = sample_body(&yesterday.format("%Y-%m-%d").to_string());

        let server = MockServer::start().await;
        mount_snapshot(&server, &archive_path(yesterday), &body).await;

        let provider = CbrProvider::new(&server.uri(), 30);
        let snapshot = provider.fetch(today).await.unwrap();
        assert_eq!(snapshot.effective_date(), yesterday);
    }
}
