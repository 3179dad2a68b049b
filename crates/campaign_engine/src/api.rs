use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use campaign_logging::{campaign_debug, campaign_warn};

use crate::{
    ApiError, ApiSettings, CampaignRecord, CampaignsResponse, CreditsResponse, FailureKind,
    SubmitPayload, SubmitResponse,
};

/// The three calls the campaign service exposes.
#[async_trait::async_trait]
pub trait CampaignApi: Send + Sync {
    async fn credits(&self, token: &str) -> Result<i64, ApiError>;

    async fn campaigns(&self, token: &str) -> Result<Vec<CampaignRecord>, ApiError>;

    async fn submit(&self, payload: &SubmitPayload) -> Result<SubmitResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCampaignApi {
    base_url: Url,
    client: reqwest::Client,
}

/// Error bodies look like `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ReqwestCampaignApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        // Keep any path prefix when joining endpoint paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, token: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if let Some(token) = token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let server_message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.trim().is_empty());
            return Err(
                ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
                    .with_server_message(server_message),
            );
        }

        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        campaign_debug!("GET {}", url.path());
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_json(response).await
    }
}

#[async_trait::async_trait]
impl CampaignApi for ReqwestCampaignApi {
    async fn credits(&self, token: &str) -> Result<i64, ApiError> {
        let url = self.endpoint("api/credits", Some(token))?;
        let response: CreditsResponse = self.get_json(url).await?;
        Ok(response.remaining_credits)
    }

    async fn campaigns(&self, token: &str) -> Result<Vec<CampaignRecord>, ApiError> {
        let url = self.endpoint("api/campaigns", Some(token))?;
        let response: CampaignsResponse = self.get_json(url).await?;
        Ok(response.campaigns)
    }

    async fn submit(&self, payload: &SubmitPayload) -> Result<SubmitResponse, ApiError> {
        let url = self.endpoint("api/submit", None)?;
        let body = serde_json::to_vec(payload)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        campaign_debug!(
            "POST {} urls={} has_token={}",
            url.path(),
            payload.urls.len(),
            !payload.client_token.is_empty()
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let result = self.read_json(response).await;
        if let Err(err) = &result {
            campaign_warn!("Submission rejected: {}", err);
        }
        result
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
