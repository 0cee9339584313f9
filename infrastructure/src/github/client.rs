//! GitHub client.
//!
//! REST for repositories, contents, labels, milestones and issues; GraphQL
//! for the viewer and ProjectV2 boards (which have no REST API).

use super::wire::*;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use gitsmith_application::ports::repository_host::{FileWrite, HostError, RepositoryHostPort};
use gitsmith_domain::{MilestonePlan, NewIssue, NewRepository, RemoteIssue, RemoteRepository, RepoRef};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, trace};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;

pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self, HostError> {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Point at another API root (GitHub Enterprise, test servers)
    pub fn with_api_url(token: &str, api_url: &str) -> Result<Self, HostError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| HostError::Unauthorized(format!("invalid token: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(concat!("gitsmith/", env!("CARGO_PKG_VERSION"))));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| HostError::Transport(e.to_string()))?;

        let api_url = Url::parse(api_url.trim_end_matches('/'))
            .map_err(|e| HostError::Transport(format!("invalid API URL '{}': {}", api_url, e)))?;

        Ok(Self { http, api_url })
    }

    /// API URL with percent-encoded path segments appended
    fn url(&self, segments: &[&str]) -> Result<Url, HostError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| HostError::Transport(format!("API URL cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_url(&self, repo: &RepoRef, rest: &[&str]) -> Result<Url, HostError> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str()];
        segments.extend_from_slice(rest);
        self.url(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        trace!(%method, %url, "GitHub request");
        self.http.request(method, url)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, HostError> {
        builder
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))
    }

    /// Map non-2xx responses to [`HostError`]
    async fn check(response: Response) -> Result<Response, HostError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED => HostError::Unauthorized(text),
            StatusCode::UNPROCESSABLE_ENTITY if text.contains("already_exists") => {
                HostError::AlreadyExists(text)
            }
            _ => HostError::Api {
                status: status.as_u16(),
                message: text,
            },
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, HostError> {
        response
            .json()
            .await
            .map_err(|e| HostError::InvalidResponse(e.to_string()))
    }

    /// GET returning `None` on 404
    async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, HostError> {
        let response = self.send(self.request(Method::GET, url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        Ok(Some(Self::json(response).await?))
    }

    /// GET every page of a list endpoint
    async fn get_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, HostError> {
        let mut all = Vec::new();
        for page in 1.. {
            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());
            let response = Self::check(self.send(self.request(Method::GET, page_url)).await?).await?;
            let items: Vec<T> = Self::json(response).await?;
            let done = items.len() < PER_PAGE;
            all.extend(items);
            if done {
                break;
            }
        }
        Ok(all)
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, HostError> {
        let response = self.send(self.request(Method::POST, url).json(body)).await?;
        Self::json(Self::check(response).await?).await
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, HostError> {
        let url = self.url(&["graphql"])?;
        let response = self
            .send(
                self.request(Method::POST, url)
                    .json(&GraphQlRequest { query, variables }),
            )
            .await?;
        let body: GraphQlResponse<T> = Self::json(Self::check(response).await?).await?;

        // NOT_FOUND errors accompany null fields in otherwise valid data
        let fatal: Vec<&str> = body
            .errors
            .iter()
            .filter(|e| e.kind.as_deref() != Some("NOT_FOUND"))
            .map(|e| e.message.as_str())
            .collect();
        if !fatal.is_empty() {
            return Err(HostError::GraphQl(fatal.join("; ")));
        }
        body.data
            .ok_or_else(|| HostError::InvalidResponse("GraphQL response without data".to_string()))
    }
}

#[async_trait]
impl RepositoryHostPort for GitHubClient {
    async fn viewer_id(&self) -> Result<String, HostError> {
        let data: ViewerData = self.graphql(VIEWER_QUERY, serde_json::json!({})).await?;
        Ok(data.viewer.id)
    }

    async fn find_repository(&self, repo: &RepoRef) -> Result<Option<RemoteRepository>, HostError> {
        let found: Option<RepositoryJson> = self.get_optional(self.repo_url(repo, &[])?).await?;
        Ok(found.map(Into::into))
    }

    async fn create_repository(&self, new: &NewRepository) -> Result<RemoteRepository, HostError> {
        let body = CreateRepositoryBody {
            name: &new.name,
            description: &new.description,
            private: new.private,
            auto_init: new.auto_init,
            has_issues: new.has_issues,
        };
        let created: RepositoryJson = self.post_json(self.url(&["user", "repos"])?, &body).await?;
        debug!("Created repository {}", created.full_name);
        Ok(created.into())
    }

    async fn upsert_file(&self, repo: &RepoRef, path: &str, content: &str) -> Result<FileWrite, HostError> {
        let mut segments = vec!["contents"];
        segments.extend(path.split('/'));
        let url = self.repo_url(repo, &segments)?;

        let existing: Option<ContentJson> = self.get_optional(url.clone()).await?;
        let (write, message) = match existing {
            Some(_) => (
                FileWrite::Updated,
                format!("Update {} with project description and timeline", path),
            ),
            None => (
                FileWrite::Created,
                format!("Create {} with project description and timeline", path),
            ),
        };
        let body = PutContentBody {
            message: &message,
            content: BASE64.encode(content.as_bytes()),
            sha: existing.map(|c| c.sha),
        };
        let response = self.send(self.request(Method::PUT, url).json(&body)).await?;
        Self::check(response).await?;
        debug!("{} ({})", message, repo);
        Ok(write)
    }

    async fn find_label(&self, repo: &RepoRef, name: &str) -> Result<Option<String>, HostError> {
        let label: Option<LabelJson> = self.get_optional(self.repo_url(repo, &["labels", name])?).await?;
        Ok(label.map(|l| l.node_id))
    }

    async fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<(), HostError> {
        let _: serde_json::Value = self
            .post_json(self.repo_url(repo, &["labels"])?, &CreateLabelBody { name, color })
            .await?;
        Ok(())
    }

    async fn find_milestone(&self, repo: &RepoRef, title: &str) -> Result<Option<u64>, HostError> {
        let mut url = self.repo_url(repo, &["milestones"])?;
        url.query_pairs_mut().append_pair("state", "all");
        let milestones: Vec<MilestoneJson> = self.get_all(url).await?;
        Ok(milestones
            .into_iter()
            .find(|m| m.title == title)
            .map(|m| m.number))
    }

    async fn create_milestone(&self, repo: &RepoRef, milestone: &MilestonePlan) -> Result<u64, HostError> {
        let body = CreateMilestoneBody {
            title: &milestone.title,
            description: &milestone.description,
            due_on: milestone
                .due_on_utc()
                .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        };
        let created: MilestoneJson = self.post_json(self.repo_url(repo, &["milestones"])?, &body).await?;
        Ok(created.number)
    }

    async fn list_issues(&self, repo: &RepoRef) -> Result<Vec<RemoteIssue>, HostError> {
        let mut url = self.repo_url(repo, &["issues"])?;
        url.query_pairs_mut().append_pair("state", "all");
        let issues: Vec<IssueJson> = self.get_all(url).await?;
        Ok(issues
            .into_iter()
            .filter(|i| i.pull_request.is_none())
            .map(Into::into)
            .collect())
    }

    async fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<RemoteIssue, HostError> {
        let body = CreateIssueBody {
            title: &issue.title,
            body: &issue.body,
            labels: &issue.labels,
            milestone: issue.milestone,
        };
        let created: IssueJson = self.post_json(self.repo_url(repo, &["issues"])?, &body).await?;
        Ok(created.into())
    }

    async fn find_project(&self, login: &str, title: &str) -> Result<Option<String>, HostError> {
        let data: FindProjectData = self
            .graphql(
                FIND_PROJECT_QUERY,
                serde_json::json!({ "login": login, "title": title }),
            )
            .await?;
        Ok(data
            .user
            .into_iter()
            .flat_map(|u| u.projects_v2.nodes)
            .flatten()
            .find(|p| p.title == title)
            .map(|p| p.id))
    }

    async fn create_project(&self, owner_id: &str, title: &str) -> Result<String, HostError> {
        let data: CreateProjectData = self
            .graphql(
                CREATE_PROJECT_MUTATION,
                serde_json::json!({ "ownerId": owner_id, "title": title }),
            )
            .await?;
        Ok(data.create_project_v2.project_v2.id)
    }

    async fn project_item_content_ids(&self, project_id: &str) -> Result<HashSet<String>, HostError> {
        let mut ids = HashSet::new();
        let mut after: Option<String> = None;
        loop {
            let data: ProjectItemsData = self
                .graphql(
                    PROJECT_ITEMS_QUERY,
                    serde_json::json!({ "projectId": project_id, "after": after }),
                )
                .await?;
            let Some(project) = data.node else {
                return Err(HostError::InvalidResponse(format!(
                    "project {} not found",
                    project_id
                )));
            };
            ids.extend(
                project
                    .items
                    .nodes
                    .into_iter()
                    .flatten()
                    .filter_map(|item| item.content.map(|c| c.id)),
            );
            match (project.items.page_info.has_next_page, project.items.page_info.end_cursor) {
                (true, Some(cursor)) => after = Some(cursor),
                _ => break,
            }
        }
        Ok(ids)
    }

    async fn add_project_item(&self, project_id: &str, content_id: &str) -> Result<(), HostError> {
        let _: AddItemData = self
            .graphql(
                ADD_PROJECT_ITEM_MUTATION,
                serde_json::json!({ "projectId": project_id, "contentId": content_id }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, GitHubClient) {
        let server = MockServer::start().await;
        let client = GitHubClient::with_api_url("test-token", &server.uri()).unwrap();
        (server, client)
    }

    fn demo() -> RepoRef {
        RepoRef::new("me", "demo")
    }

    #[tokio::test]
    async fn test_viewer_id_sends_bearer_token() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_string_contains("viewer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "viewer": { "id": "U_abc", "login": "me" } }
            })))
            .mount(&server)
            .await;

        assert_eq!(client.viewer_id().await.unwrap(), "U_abc");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&server)
            .await;

        let err = client.viewer_id().await.unwrap_err();
        assert!(matches!(err, HostError::Unauthorized(ref m) if m.contains("Bad credentials")));
    }

    #[tokio::test]
    async fn test_graphql_errors_surface() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": null,
                "errors": [{ "type": "FORBIDDEN", "message": "Resource not accessible by integration" }]
            })))
            .mount(&server)
            .await;

        let err = client.create_project("U_1", "Board").await.unwrap_err();
        assert!(matches!(err, HostError::GraphQl(ref m) if m.contains("not accessible")));
    }

    #[tokio::test]
    async fn test_find_repository() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/repos/me/demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "node_id": "R_1",
                "full_name": "me/demo",
                "html_url": "https://github.com/me/demo"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/me/absent"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let found = client.find_repository(&demo()).await.unwrap().unwrap();
        assert_eq!(found.html_url, "https://github.com/me/demo");
        assert!(client.find_repository(&RepoRef::new("me", "absent")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_repository() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .and(body_partial_json(serde_json::json!({
                "name": "demo",
                "private": true,
                "auto_init": false,
                "has_issues": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "node_id": "R_1",
                "full_name": "me/demo",
                "html_url": "https://github.com/me/demo"
            })))
            .mount(&server)
            .await;

        let new = NewRepository::new("demo").with_private(true);
        let created = client.create_repository(&new).await.unwrap();
        assert_eq!(created.full_name, "me/demo");
    }

    #[tokio::test]
    async fn test_create_repository_name_taken() {
        let (server, client) = setup().await;
        let body = r#"{"message":"Repository creation failed.","errors":[{"resource":"Repository","code":"custom","field":"name","message":"name already exists on this account"}]}"#;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(ResponseTemplate::new(422).set_body_string(body))
            .mount(&server)
            .await;

        let err = client.create_repository(&NewRepository::new("demo")).await.unwrap_err();
        match err {
            HostError::Api { status, message } => {
                assert_eq!(status, 422);
                assert!(message.contains("name already exists on this account"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_label_already_exists() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/repos/me/demo/labels"))
            .respond_with(ResponseTemplate::new(422).set_body_string(
                r#"{"message":"Validation Failed","errors":[{"resource":"Label","code":"already_exists","field":"name"}]}"#,
            ))
            .mount(&server)
            .await;

        let err = client.create_label(&demo(), "core", "c5def5").await.unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_find_label_encodes_name() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/repos/me/demo/labels/good%20first%20issue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "node_id": "LA_1", "name": "good first issue"
            })))
            .mount(&server)
            .await;

        let id = client.find_label(&demo(), "good first issue").await.unwrap();
        assert_eq!(id.as_deref(), Some("LA_1"));
    }

    #[tokio::test]
    async fn test_upsert_file_creates_then_updates() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/repos/me/demo/contents/README.md"))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/me/demo/contents/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "sha": "abc123" })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/me/demo/contents/README.md"))
            .and(body_partial_json(serde_json::json!({ "content": "IyBEZW1v" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
            .expect(2)
            .mount(&server)
            .await;

        assert_eq!(client.upsert_file(&demo(), "README.md", "# Demo").await.unwrap(), FileWrite::Created);
        assert_eq!(client.upsert_file(&demo(), "README.md", "# Demo").await.unwrap(), FileWrite::Updated);

        let requests = server.received_requests().await.unwrap();
        let last_put: serde_json::Value = requests
            .iter()
            .filter(|r| r.method.as_str() == "PUT")
            .last()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .unwrap();
        assert_eq!(last_put["sha"], "abc123");
    }

    #[tokio::test]
    async fn test_milestone_lookup_and_due_date() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/repos/me/demo/milestones"))
            .and(query_param("state", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "number": 3, "title": "Phase 1" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/me/demo/milestones"))
            .and(body_partial_json(serde_json::json!({
                "title": "Phase 2",
                "due_on": "2025-01-31T00:00:00Z"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "number": 4, "title": "Phase 2"
            })))
            .mount(&server)
            .await;

        assert_eq!(client.find_milestone(&demo(), "Phase 1").await.unwrap(), Some(3));
        assert_eq!(client.find_milestone(&demo(), "Phase 2").await.unwrap(), None);

        let plan = MilestonePlan::new("Phase 2")
            .with_due_on(chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(client.create_milestone(&demo(), &plan).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_list_issues_skips_pull_requests() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/repos/me/demo/issues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "number": 1, "node_id": "I_1", "title": "Parse code" },
                { "number": 2, "node_id": "PR_2", "title": "Fix", "pull_request": { "url": "x" } }
            ])))
            .mount(&server)
            .await;

        let issues = client.list_issues(&demo()).await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].node_id, "I_1");
    }

    #[tokio::test]
    async fn test_find_project_exact_title() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("projectsV2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "user": { "projectsV2": { "nodes": [
                    { "id": "PVT_a", "title": "Board v2" },
                    { "id": "PVT_b", "title": "Board" }
                ] } } }
            })))
            .mount(&server)
            .await;

        assert_eq!(client.find_project("me", "Board").await.unwrap().as_deref(), Some("PVT_b"));
        assert_eq!(client.find_project("me", "Other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_project_item_content_ids() {
        let (server, client) = setup().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "node": { "items": {
                    "nodes": [
                        { "content": { "id": "I_1" } },
                        { "content": null },
                        { "content": { "id": "I_2" } }
                    ],
                    "pageInfo": { "hasNextPage": false, "endCursor": null }
                } } }
            })))
            .mount(&server)
            .await;

        let ids = client.project_item_content_ids("PVT_1").await.unwrap();
        assert_eq!(ids, HashSet::from(["I_1".to_string(), "I_2".to_string()]));
    }
}
