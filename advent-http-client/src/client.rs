//! AoC HTTP client implementation

use crate::error::AocError;
use crate::leaderboard::Leaderboard;
use reqwest::blocking::Response;
use reqwest::header::HeaderValue;
use zeroize::Zeroize;

const DEFAULT_BASE_URL: &str = "https://adventofcode.com";

/// Blocking client for the Advent of Code website
///
/// # Example
///
/// ```no_run
/// use advent_http_client::AocClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::new()?;
/// let input = client.get_input(2020, 1, "your_session_cookie")?;
/// println!("Input: {}", input);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AocClient {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
}

impl AocClient {
    /// Create a client with rustls and no redirect following
    ///
    /// # Errors
    ///
    /// Returns `AocError::ClientInit` if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, AocError> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use advent_http_client::AocClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = AocClient::builder()
    ///     .base_url("http://localhost:1234")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> AocClientBuilder {
        AocClientBuilder::new()
    }

    /// Build the `Cookie` header, marked sensitive; the formatted string is wiped afterwards
    fn create_cookie_header(session: &str) -> Result<HeaderValue, AocError> {
        let mut cookie_string = format!("session={}", session);
        let header_value = HeaderValue::from_bytes(cookie_string.as_bytes())
            .map_err(|_| AocError::ClientInit("Invalid session cookie format".to_string()));
        cookie_string.zeroize();

        let mut header_value = header_value?;
        header_value.set_sensitive(true);
        Ok(header_value)
    }

    /// GET `base_url/<segments...>` with the session cookie, failing on non-2xx
    fn get_authenticated(&self, segments: &[&str], session: &str) -> Result<Response, AocError> {
        let cookie_header = Self::create_cookie_header(session)?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AocError::ClientInit("Cannot modify base URL path".to_string()))?
            .clear()
            .extend(segments);

        let response = self
            .client
            .get(url)
            .header("Cookie", cookie_header)
            .send()?;

        if !response.status().is_success() {
            return Err(AocError::InvalidStatus {
                status: response.status(),
            });
        }

        Ok(response)
    }

    /// Fetch the personal puzzle input for a year and day
    ///
    /// # Errors
    ///
    /// * `AocError::Request` - Network error
    /// * `AocError::InvalidStatus` - HTTP error (404 before the puzzle unlocks,
    ///   3xx or 400 when the session is no longer valid)
    /// * `AocError::Encoding` - Response is not valid UTF-8
    pub fn get_input(&self, year: u16, day: u8, session: &str) -> Result<String, AocError> {
        let response = self.get_authenticated(
            &[&year.to_string(), "day", &day.to_string(), "input"],
            session,
        )?;

        response.text().map_err(|_| AocError::Encoding)
    }

    /// Fetch a private leaderboard as JSON and decode it
    ///
    /// The board is read from `/{year}/leaderboard/private/view/{id}.json`.
    ///
    /// # Errors
    ///
    /// * `AocError::Request` - Network error
    /// * `AocError::InvalidStatus` - HTTP error (unknown board, no access, bad session)
    /// * `AocError::Json` - Body is not a leaderboard document
    ///
    /// # Example
    ///
    /// ```no_run
    /// use advent_http_client::AocClient;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = AocClient::new()?;
    /// let board = client.get_leaderboard(2020, 123456, "your_session_cookie")?;
    /// for member in board.sorted_members() {
    ///     println!("{} {}", member.display_name(), member.local_score);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_leaderboard(
        &self,
        year: u16,
        id: u64,
        session: &str,
    ) -> Result<Leaderboard, AocError> {
        let response = self.get_authenticated(
            &[
                &year.to_string(),
                "leaderboard",
                "private",
                "view",
                &format!("{}.json", id),
            ],
            session,
        )?;

        Leaderboard::from_reader(response)
    }
}

/// Builder for configuring an [`AocClient`]
///
/// The redirect policy is always forced to `Policy::none()`, whatever the
/// supplied `ClientBuilder` says.
///
/// # Example
///
/// ```no_run
/// use advent_http_client::AocClient;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AocClient::builder()
///     .base_url("http://localhost:1234")?
///     .client_builder(
///         reqwest::blocking::Client::builder()
///             .timeout(Duration::from_secs(10))
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AocClientBuilder {
    base_url: Option<reqwest::Url>,
    client_builder: Option<reqwest::blocking::ClientBuilder>,
}

impl AocClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL, validated immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url(mut self, url: impl reqwest::IntoUrl) -> Result<Self, AocError> {
        self.base_url = Some(url.into_url()?);
        Ok(self)
    }

    /// Set a custom HTTP client builder (timeouts, proxies, ...)
    pub fn client_builder(mut self, builder: reqwest::blocking::ClientBuilder) -> Self {
        self.client_builder = Some(builder);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `AocError::ClientInit` if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<AocClient, AocError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => reqwest::Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| AocError::ClientInit(e.to_string()))?,
        };

        let builder = self
            .client_builder
            .unwrap_or_else(|| reqwest::blocking::Client::builder().use_rustls_tls());

        let client = builder
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AocError::ClientInit(e.to_string()))?;

        Ok(AocClient { client, base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    const BOARD: &str = r#"{
        "owner_id": 42,
        "event": "2020",
        "members": {
            "42": {
                "id": 42, "name": "Ada", "stars": 2,
                "global_score": 0, "local_score": 4,
                "last_star_ts": 1606824000,
                "completion_day_level": {
                    "1": {"1": {"get_star_ts": 1606820000}, "2": {"get_star_ts": 1606824000}}
                }
            }
        }
    }"#;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn prop_base_url_configuration(
            scheme in prop::sample::select(vec!["http", "https"]),
            host in "[a-z]{3,10}",
            port in 1000u16..10000u16,
        ) {
            let base_url = format!("{}://{}:{}", scheme, host, port);

            let client = AocClient::builder()
                .base_url(&base_url)
                .unwrap()
                .build()
                .unwrap();

            prop_assert_eq!(client.base_url.scheme(), scheme);
            prop_assert_eq!(client.base_url.host_str(), Some(host.as_str()));
            prop_assert_eq!(client.base_url.port(), Some(port));
        }

        #[test]
        fn prop_custom_client_builder_configuration(timeout_secs in 1u64..120u64) {
            let custom_builder = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .use_rustls_tls();

            let result = AocClient::builder().client_builder(custom_builder).build();
            prop_assert!(result.is_ok());
        }

        #[test]
        fn prop_input_url_construction(
            year in 2015u16..2030u16,
            day in 1u8..=25u8,
            session in "[a-f0-9]{32,128}",
        ) {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", format!("/{}/day/{}/input", year, day).as_str())
                .match_header("cookie", format!("session={}", session).as_str())
                .with_status(200)
                .with_body("1721\n979\n")
                .expect(1)
                .create();

            let client = AocClient::builder()
                .base_url(server.url())
                .unwrap()
                .build()
                .unwrap();

            let result = client.get_input(year, day, &session);
            mock.assert();
            prop_assert_eq!(result.unwrap(), "1721\n979\n");
        }

        #[test]
        fn prop_non_success_status_error_handling(
            year in 2015u16..2030u16,
            day in 1u8..=25u8,
            status_code in prop::sample::select(vec![400, 401, 403, 404, 429, 500, 502, 503]),
        ) {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", format!("/{}/day/{}/input", year, day).as_str())
                .with_status(status_code)
                .with_body("Error response")
                .expect(1)
                .create();

            let client = AocClient::builder()
                .base_url(server.url())
                .unwrap()
                .build()
                .unwrap();

            match client.get_input(year, day, "abc") {
                Err(AocError::InvalidStatus { status }) => {
                    prop_assert_eq!(status.as_u16(), status_code as u16);
                }
                other => prop_assert!(false, "expected InvalidStatus, got {:?}", other),
            }
            mock.assert();
        }
    }

    #[test]
    fn test_default_base_url() {
        let client = AocClient::builder().build().unwrap();
        assert_eq!(client.base_url.as_str(), "https://adventofcode.com/");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(AocClient::builder().base_url("not a valid url").is_err());
    }

    #[test]
    fn test_redirect_is_not_followed() {
        let mut server = mockito::Server::new();
        let home = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<html>Home page</html>")
            .expect(0)
            .create();
        let input = server
            .mock("GET", "/2020/day/1/input")
            .with_status(302)
            .with_header("location", "/")
            .expect(1)
            .create();

        let client = AocClient::builder()
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap();

        match client.get_input(2020, 1, "expired") {
            Err(AocError::InvalidStatus { status }) => assert_eq!(status.as_u16(), 302),
            other => panic!("expected InvalidStatus, got {:?}", other),
        }
        home.assert();
        input.assert();
    }

    #[test]
    fn test_get_leaderboard() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/2020/leaderboard/private/view/42.json")
            .match_header("cookie", "session=abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BOARD)
            .expect(1)
            .create();

        let client = AocClient::builder()
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap();

        let board = client.get_leaderboard(2020, 42, "abc").unwrap();
        mock.assert();
        assert_eq!(board.owner_id, 42);
        assert_eq!(board.event, "2020");
        assert_eq!(board.members["42"].local_score, 4);
    }

    #[test]
    fn test_get_leaderboard_rejects_html() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/2020/leaderboard/private/view/7.json")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create();

        let client = AocClient::builder()
            .base_url(server.url())
            .unwrap()
            .build()
            .unwrap();

        assert!(matches!(
            client.get_leaderboard(2020, 7, "abc"),
            Err(AocError::Json(_))
        ));
    }
}
