//! GitHub request/response shapes and GraphQL documents.

use gitsmith_domain::{RemoteIssue, RemoteRepository};
use serde::{Deserialize, Serialize};

pub const VIEWER_QUERY: &str = "query { viewer { id login } }";

pub const FIND_PROJECT_QUERY: &str = r#"
query($login: String!, $title: String!) {
  user(login: $login) {
    projectsV2(first: 100, query: $title) {
      nodes { id title }
    }
  }
}"#;

pub const CREATE_PROJECT_MUTATION: &str = r#"
mutation($ownerId: ID!, $title: String!) {
  createProjectV2(input: {ownerId: $ownerId, title: $title}) {
    projectV2 { id }
  }
}"#;

pub const PROJECT_ITEMS_QUERY: &str = r#"
query($projectId: ID!, $after: String) {
  node(id: $projectId) {
    ... on ProjectV2 {
      items(first: 100, after: $after) {
        nodes {
          content {
            ... on Issue { id }
            ... on PullRequest { id }
          }
        }
        pageInfo { hasNextPage endCursor }
      }
    }
  }
}"#;

pub const ADD_PROJECT_ITEM_MUTATION: &str = r#"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {projectId: $projectId, contentId: $contentId}) {
    item { id }
  }
}"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorItem>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorItem {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Node {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Node,
}

#[derive(Debug, Deserialize)]
pub struct ProjectNode {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectConnection {
    pub nodes: Vec<Option<ProjectNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOwner {
    pub projects_v2: ProjectConnection,
}

#[derive(Debug, Deserialize)]
pub struct FindProjectData {
    pub user: Option<ProjectOwner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    pub project_v2: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectData {
    pub create_project_v2: CreatedProject,
}

#[derive(Debug, Deserialize)]
pub struct ProjectItem {
    pub content: Option<Node>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItems {
    pub nodes: Vec<Option<ProjectItem>>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct ProjectWithItems {
    pub items: ProjectItems,
}

#[derive(Debug, Deserialize)]
pub struct ProjectItemsData {
    pub node: Option<ProjectWithItems>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemData {
    pub add_project_v2_item_by_id: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryJson {
    pub node_id: String,
    pub full_name: String,
    pub html_url: String,
}

impl From<RepositoryJson> for RemoteRepository {
    fn from(r: RepositoryJson) -> Self {
        RemoteRepository {
            node_id: r.node_id,
            full_name: r.full_name,
            html_url: r.html_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateRepositoryBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub private: bool,
    pub auto_init: bool,
    pub has_issues: bool,
}

#[derive(Debug, Deserialize)]
pub struct ContentJson {
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub struct PutContentBody<'a> {
    pub message: &'a str,
    /// Base64 of the file content
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LabelJson {
    pub node_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateLabelBody<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct MilestoneJson {
    pub number: u64,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct CreateMilestoneBody<'a> {
    pub title: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IssueJson {
    pub number: u64,
    pub node_id: String,
    pub title: String,
    /// Present when the "issue" is a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl From<IssueJson> for RemoteIssue {
    fn from(i: IssueJson) -> Self {
        RemoteIssue {
            number: i.number,
            node_id: i.node_id,
            title: i.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateIssueBody<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub labels: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}
