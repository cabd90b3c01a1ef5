use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};

use crate::error::AppError;

const BASE_URL: &str = "https://irena1.intercity.pl/mbweb";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read-only view of an authenticated portal session. Production code uses
/// [`PortalClient`]; tests script the two page fetches.
#[async_trait]
pub trait PortalSession: Send + Sync {
    async fn duty_lookup(&self, title: &str, date: NaiveDate) -> Result<String, AppError>;
    async fn duty_details(&self, duty_id: &str, date: NaiveDate) -> Result<String, AppError>;
}

/// Authenticated HTTP session against the IRENA crew portal.
pub struct PortalClient {
    client: reqwest::Client,
}

impl PortalClient {
    /// Opens a session and performs the form login.
    pub async fn login(username: &str, password: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers())
            .cookie_store(true)
            .build()?;

        // The login form only accepts credentials for a primed session.
        let url = format!("{BASE_URL}/main/matter/desktop/main-menu");
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Portal {
                url,
                status: response.status(),
            });
        }

        let url = format!("{BASE_URL}/j_security_check");
        let form = [
            ("j_username", username.trim().to_lowercase()),
            ("j_password", password.trim().to_string()),
        ];
        let response = client.post(&url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Portal {
                url,
                status: response.status(),
            });
        }
        // A rejected login redirects back to the login page.
        let landing = response.url();
        if landing.path().ends_with("/login")
            && landing
                .query()
                .is_some_and(|query| query.contains("login-status=failed"))
        {
            return Err(AppError::Authentication);
        }

        Ok(Self { client })
    }

    async fn fetch(&self, url: String) -> Result<String, AppError> {
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Portal { url, status });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PortalSession for PortalClient {
    async fn duty_lookup(&self, title: &str, date: NaiveDate) -> Result<String, AppError> {
        let url = format!(
            "{BASE_URL}/main/ivu/desktop/_-any-duty-table?division=&depot=&abbreviation={title}&date={date}&",
            date = date.format(DATE_FORMAT),
        );
        self.fetch(url).await
    }

    async fn duty_details(&self, duty_id: &str, date: NaiveDate) -> Result<String, AppError> {
        let url = format!(
            "{BASE_URL}/main/ivu/desktop/any-duty-details?id={duty_id}&beginDate={date}&",
            date = date.format(DATE_FORMAT),
        );
        self.fetch(url).await
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (X11; Linux x86_64; rv:129.0) Gecko/20100101 Firefox/129.0",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}
