use super::{
    check_status, parse_body, BlockAck, BlockDetails, BlockPayload, Category, LoginResponse,
    MajorVersionAck, MajorVersionPayload, Registry, ReleasePayload, RollbackPayload,
    CLIENT_VERSION,
};
use crate::config::ElementConfig;
use crate::error::{ElementError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Registry client over blocking HTTP.
pub struct HttpRegistry {
    client: Client,
    config: ElementConfig,
}

impl HttpRegistry {
    pub fn new(config: ElementConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("element-cli/{}", CLIENT_VERSION))
            .build()?;
        Ok(Self { client, config })
    }

    fn authorized(&self, method: Method, url: &str, token: &str) -> RequestBuilder {
        debug!("Requesting {} {}", method, url);
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header("Element-Cli-Version", CLIENT_VERSION)
    }

    /// Send `request` with an optional JSON body and parse the reply.
    fn send<B, T>(&self, request: RequestBuilder, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de> + Default,
    {
        let (request, content_length) = match body {
            Some(body) => {
                let bytes = serde_json::to_vec(body)?;
                let len = bytes.len();
                (
                    request.header(CONTENT_TYPE, "application/json").body(bytes),
                    len,
                )
            }
            None => (request, 0),
        };

        let response = request.send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        debug!("Response {}: {}", status, text);

        check_status(status, &text, content_length)?;
        parse_body(&text)
    }

    fn call<B, T>(&self, method: Method, path: &str, token: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de> + Default,
    {
        let url = self.config.registry_url(path);
        let request = self.authorized(method, &url, token);
        self.send(request, body)
    }
}

const NO_BODY: Option<&()> = None;

impl Registry for HttpRegistry {
    fn login(&self, username: &str, password: &str) -> Result<String> {
        let config = &self.config;
        let data = json!({
            "audience": config.auth_audience,
            "client_id": config.auth_client_id,
            "grant_type": config.grant_type,
            "password": password,
            "realm": config.realm,
            "scope": config.scope,
            "username": username,
        });

        let mut shown = data.clone();
        shown["password"] = json!("*****");
        debug!("Requesting {} with data {}", config.login_url, shown);

        let request = self.client.post(&config.login_url);
        let response: Option<LoginResponse> = self.send(request, Some(&data))?;
        response.map(|r| r.id_token).ok_or_else(|| ElementError::Network {
            status: None,
            message: "The identity provider did not return a token.".to_string(),
        })
    }

    fn categories(&self, token: &str) -> Result<Vec<String>> {
        let categories: Vec<Category> = self.call(Method::GET, "categories", token, NO_BODY)?;
        Ok(categories.into_iter().map(|c| c.name).collect())
    }

    fn allocate_block_id(&self, token: &str) -> Result<String> {
        let ack: BlockAck = self.call(Method::POST, "blocks/blockId", token, NO_BODY)?;
        ack.id.ok_or_else(|| ElementError::Network {
            status: None,
            message: "The registry did not return a block id.".to_string(),
        })
    }

    fn create_block(&self, token: &str, payload: &BlockPayload) -> Result<BlockAck> {
        self.call(Method::POST, "blocks", token, Some(payload))
    }

    fn update_block(&self, token: &str, id: &str, payload: &BlockPayload) -> Result<BlockAck> {
        self.call(Method::PUT, &format!("blocks/{}", id), token, Some(payload))
    }

    fn create_major_version(
        &self,
        token: &str,
        id: &str,
        payload: &MajorVersionPayload,
    ) -> Result<MajorVersionAck> {
        self.call(
            Method::POST,
            &format!("blocks/{}/major", id),
            token,
            Some(payload),
        )
    }

    fn release_block(&self, token: &str, id: &str, payload: &ReleasePayload) -> Result<BlockAck> {
        self.call(
            Method::PUT,
            &format!("blocks/{}/release", id),
            token,
            Some(payload),
        )
    }

    fn rollback_block(
        &self,
        token: &str,
        id: &str,
        payload: &RollbackPayload,
    ) -> Result<BlockAck> {
        self.call(
            Method::PUT,
            &format!("blocks/{}/rollback", id),
            token,
            Some(payload),
        )
    }

    fn get_block(&self, token: &str, id: &str, version: Option<u32>) -> Result<BlockDetails> {
        let path = match version {
            Some(v) => format!("blocks/{}?version={}", id, v),
            None => format!("blocks/{}", id),
        };
        self.call(Method::GET, &path, token, NO_BODY)
    }
}
