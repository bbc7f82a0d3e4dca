//! reqwest-backed implementation of the service traits
//!
//! Response envelopes are unwrapped here (`{"droplet": …}`,
//! `{"droplets": […], "links": …}`) and the pagination indicator is
//! derived from the presence of `links.pages.next`. Provider error bodies
//! surface their `message` field verbatim.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::models::{Action, Droplet, DropletCreateRequest, ListOptions, Page};
use super::{ActionsService, DropletsService};

/// Production API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// HTTP client for the DigitalOcean v2 API, authenticated with a bearer
/// token. One instance serves every resource family; the bridge holds it
/// behind `Arc<dyn …Service>` handles.
pub struct CloudClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Deserialize)]
struct DropletRoot {
    droplet: Droplet,
}

#[derive(Deserialize)]
struct DropletsRoot {
    #[serde(default)]
    droplets: Vec<Droplet>,
    #[serde(default)]
    links: Option<Links>,
}

#[derive(Deserialize)]
struct ActionRoot {
    action: Action,
}

#[derive(Deserialize)]
struct ActionsRoot {
    #[serde(default)]
    actions: Vec<Action>,
    #[serde(default)]
    links: Option<Links>,
}

/// The provider signals further pages by a `links.pages.next` URL; its
/// absence ends pagination even when the last page was full.
fn more_pages(links: &Option<Links>) -> bool {
    links
        .as_ref()
        .and_then(|l| l.pages.as_ref())
        .and_then(|p| p.next.as_ref())
        .is_some()
}

impl CloudClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        CloudClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        let response = self.http.get(&url).bearer_auth(&self.token).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn send_delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        log::debug!("DELETE {}", url);
        let response = self.http.delete(&url).bearer_auth(&self.token).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Turn a non-success response into a provider error carrying the
    /// provider's own message text.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Err(ApiError::provider(status.as_u16(), message))
    }
}

#[async_trait]
impl DropletsService for CloudClient {
    async fn get(&self, id: i64) -> Result<Droplet, ApiError> {
        let root: DropletRoot = self.get_json(&format!("/v2/droplets/{}", id)).await?;
        Ok(root.droplet)
    }

    async fn list(&self, opts: &ListOptions) -> Result<Page<Droplet>, ApiError> {
        let root: DropletsRoot = self
            .get_json(&format!(
                "/v2/droplets?page={}&per_page={}",
                opts.page, opts.per_page
            ))
            .await?;
        Ok(Page {
            items: root.droplets,
            has_more: more_pages(&root.links),
        })
    }

    async fn create(&self, request: &DropletCreateRequest) -> Result<Droplet, ApiError> {
        let root: DropletRoot = self.post_json("/v2/droplets", request).await?;
        Ok(root.droplet)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.send_delete(&format!("/v2/droplets/{}", id)).await
    }
}

#[async_trait]
impl ActionsService for CloudClient {
    async fn get(&self, id: i64) -> Result<Action, ApiError> {
        let root: ActionRoot = self.get_json(&format!("/v2/actions/{}", id)).await?;
        Ok(root.action)
    }

    async fn list(&self, opts: &ListOptions) -> Result<Page<Action>, ApiError> {
        let root: ActionsRoot = self
            .get_json(&format!(
                "/v2/actions?page={}&per_page={}",
                opts.page, opts.per_page
            ))
            .await?;
        Ok(Page {
            items: root.actions,
            has_more: more_pages(&root.links),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn droplet_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "memory": 1024,
            "vcpus": 1,
            "disk": 25,
            "locked": false,
            "status": "active",
            "created_at": "2020-07-21T18:37:44Z",
            "backup_ids": [],
            "snapshot_ids": [],
            "region": { "slug": "nyc3", "name": "New York 3", "available": true },
            "image": { "id": 63663980, "name": "20.04 (LTS) x64", "distribution": "Ubuntu", "slug": "ubuntu-20-04-x64", "public": true },
            "size": { "slug": "s-1vcpu-1gb", "memory": 1024, "vcpus": 1, "disk": 25 },
            "size_slug": "s-1vcpu-1gb",
            "networks": { "v4": [], "v6": [] }
        })
    }

    #[tokio::test]
    async fn test_get_droplet_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/droplets/3164444"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "droplet": droplet_json(3164444, "example.com") })),
            )
            .mount(&server)
            .await;

        let client = CloudClient::new("test-token", server.uri());
        let droplet = DropletsService::get(&client, 3164444).await.unwrap();
        assert_eq!(droplet.id, 3164444);
        assert_eq!(droplet.name, "example.com");
    }

    #[tokio::test]
    async fn test_list_derives_has_more_from_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/droplets"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "droplets": [droplet_json(1, "a")],
                "links": { "pages": { "next": "https://api.digitalocean.com/v2/droplets?page=2" } }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/droplets"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "droplets": [droplet_json(2, "b")],
                "links": {}
            })))
            .mount(&server)
            .await;

        let client = CloudClient::new("test-token", server.uri());
        let opts = ListOptions { page: 1, per_page: 200 };
        let first = DropletsService::list(&client, &opts).await.unwrap();
        assert!(first.has_more);

        let opts = ListOptions { page: 2, per_page: 200 };
        let last = DropletsService::list(&client, &opts).await.unwrap();
        assert!(!last.has_more);
        assert_eq!(last.items[0].name, "b");
    }

    #[tokio::test]
    async fn test_provider_error_message_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/droplets/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "id": "not_found",
                "message": "The resource you were accessing could not be found."
            })))
            .mount(&server)
            .await;

        let client = CloudClient::new("test-token", server.uri());
        let err = DropletsService::get(&client, 99).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "The resource you were accessing could not be found."
        );
    }

    #[tokio::test]
    async fn test_create_posts_wire_format() {
        use crate::api::models::{ImageRef, SshKeyRef};

        let server = MockServer::start().await;
        let expected_body = serde_json::json!({
            "name": "worker-1",
            "region": "nyc3",
            "size": "s-1vcpu-1gb",
            "image": "ubuntu-24-04-x64",
            "ssh_keys": [289794],
            "backups": false,
            "ipv6": true,
            "private_networking": false
        });
        Mock::given(method("POST"))
            .and(path("/v2/droplets"))
            .and(body_json(&expected_body))
            .respond_with(
                ResponseTemplate::new(202)
                    .set_body_json(serde_json::json!({ "droplet": droplet_json(7, "worker-1") })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = CloudClient::new("test-token", server.uri());
        let request = DropletCreateRequest {
            name: "worker-1".into(),
            region: "nyc3".into(),
            size: "s-1vcpu-1gb".into(),
            image: ImageRef { id: 0, slug: "ubuntu-24-04-x64".into() },
            ssh_keys: vec![SshKeyRef { id: 289794, fingerprint: String::new() }],
            backups: false,
            ipv6: true,
            private_networking: false,
            user_data: String::new(),
        };
        let droplet = client.create(&request).await.unwrap();
        assert_eq!(droplet.id, 7);
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2/droplets/7"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = CloudClient::new("test-token", server.uri());
        DropletsService::delete(&client, 7).await.unwrap();
    }
}
