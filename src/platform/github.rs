//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Commit, PlatformConfig, PullRequestSnapshot, Review, ReviewState, User};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const PULL_REQUEST_QUERY: &str = r"
query($owner: String!, $repo: String!, $pr: Int!) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $pr) {
      headRefOid
      author {
        login
        resourcePath
      }
      reviews(first: 100) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          state
          commit {
            oid
          }
          author {
            login
            resourcePath
          }
        }
      }
      commits(first: 100) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          commit {
            oid
            committer {
              user {
                login
                resourcePath
              }
            }
            author {
              user {
                login
                resourcePath
              }
            }
          }
        }
      }
    }
  }
}
";

const REVIEWS_PAGE_QUERY: &str = r"
query($owner: String!, $repo: String!, $pr: Int!, $cursor: String) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $pr) {
      reviews(first: 100, after: $cursor) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          state
          commit {
            oid
          }
          author {
            login
            resourcePath
          }
        }
      }
    }
  }
}
";

const COMMITS_PAGE_QUERY: &str = r"
query($owner: String!, $repo: String!, $pr: Int!, $cursor: String) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $pr) {
      commits(first: 100, after: $cursor) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          commit {
            oid
            committer {
              user {
                login
                resourcePath
              }
            }
            author {
              user {
                login
                resourcePath
              }
            }
          }
        }
      }
    }
  }
}
";

// GraphQL response types

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryData<T> {
    repository: Option<RepositoryNode<T>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode<T> {
    pull_request: Option<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    head_ref_oid: String,
    author: Option<UserNode>,
    reviews: Connection<ReviewNode>,
    commits: Connection<PullRequestCommitNode>,
}

#[derive(Deserialize)]
struct ReviewsNode {
    reviews: Connection<ReviewNode>,
}

#[derive(Deserialize)]
struct CommitsNode {
    commits: Connection<PullRequestCommitNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    page_info: PageInfo,
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    login: String,
    resource_path: String,
}

#[derive(Deserialize)]
struct OidNode {
    oid: String,
}

#[derive(Deserialize)]
struct ReviewNode {
    state: ReviewState,
    commit: Option<OidNode>,
    author: Option<UserNode>,
}

#[derive(Deserialize)]
struct PullRequestCommitNode {
    commit: CommitNode,
}

#[derive(Deserialize)]
struct CommitNode {
    oid: String,
    committer: Option<GitActorNode>,
    author: Option<GitActorNode>,
}

#[derive(Deserialize)]
struct GitActorNode {
    user: Option<UserNode>,
}

#[derive(Deserialize)]
struct ViewerData {
    viewer: UserNode,
}

impl From<UserNode> for User {
    fn from(user: UserNode) -> Self {
        Self {
            login: user.login,
            resource_path: user.resource_path,
        }
    }
}

impl ReviewNode {
    /// Approval of `head` whose author GitHub no longer reports
    fn is_orphaned_approval_of(&self, head: &str) -> bool {
        self.state == ReviewState::Approved
            && self.author.is_none()
            && self.commit.as_ref().is_some_and(|c| c.oid == head)
    }
}

impl From<ReviewNode> for Review {
    fn from(review: ReviewNode) -> Self {
        Self {
            state: review.state,
            // A review without a commit can never match the head
            commit_oid: review.commit.map(|c| c.oid).unwrap_or_default(),
            author: review.author.map_or_else(User::ghost, User::from),
        }
    }
}

impl From<CommitNode> for Commit {
    fn from(commit: CommitNode) -> Self {
        Self {
            oid: commit.oid,
            committer_user: commit.committer.and_then(|a| a.user).map(User::from),
            author_user: commit.author.and_then(|a| a.user).map(User::from),
        }
    }
}

impl TryFrom<PullRequestNode> for PullRequestSnapshot {
    type Error = Error;

    /// Fails when an approval of the head has no author (a deleted account).
    /// Other reviews without an author map to [`User::ghost`].
    fn try_from(pr: PullRequestNode) -> Result<Self> {
        if pr
            .reviews
            .nodes
            .iter()
            .any(|r| r.is_orphaned_approval_of(&pr.head_ref_oid))
        {
            return Err(Error::GitHubApi(format!(
                "approval of {} has no author (deleted account)",
                pr.head_ref_oid
            )));
        }

        Ok(Self {
            head_sha: pr.head_ref_oid,
            author: pr.author.map(User::from),
            commits: pr
                .commits
                .nodes
                .into_iter()
                .map(|n| Commit::from(n.commit))
                .collect(),
            reviews: pr.reviews.nodes.into_iter().map(Review::from).collect(),
        })
    }
}

/// Build an octocrab client for github.com or a GitHub Enterprise host
///
/// Only the GraphQL endpoint is used, so Enterprise hosts get `/api` as the
/// base (`/api/graphql`).
pub(crate) fn build_client(token: &str, host: Option<&str>) -> Result<Octocrab> {
    let mut builder = Octocrab::builder().personal_token(token.to_string());

    if let Some(h) = host {
        builder = builder.base_uri(format!("https://{h}/api"))?;
    }

    Ok(builder.build()?)
}

/// Run a GraphQL query and unwrap the `data` field
pub(crate) async fn graphql_query<T: DeserializeOwned>(
    client: &Octocrab,
    query: &str,
    variables: serde_json::Value,
) -> Result<T> {
    let response: GraphQlResponse<T> = client
        .graphql(&serde_json::json!({
            "query": query,
            "variables": variables,
        }))
        .await?;

    unwrap_response(response)
}

fn unwrap_response<T>(response: GraphQlResponse<T>) -> Result<T> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        let not_found = errors
            .iter()
            .any(|e| e.kind.as_deref() == Some("NOT_FOUND"));
        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        let message = messages.join(", ");
        return Err(if not_found {
            Error::PullRequestNotFound(message)
        } else {
            Error::GitHubApi(format!("GraphQL error: {message}"))
        });
    }

    response
        .data
        .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))
}

/// Resolve the login of the token's owner
pub(crate) async fn viewer_login(client: &Octocrab) -> Result<String> {
    let data: ViewerData =
        graphql_query(client, "query { viewer { login resourcePath } }", serde_json::json!({}))
            .await?;
    Ok(data.viewer.login)
}

/// GitHub service using octocrab's GraphQL client
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let client = build_client(token, host.as_deref())?;
        Ok(Self {
            client,
            config: PlatformConfig { owner, repo, host },
        })
    }

    fn variables(&self, pr_number: u64, cursor: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "owner": self.config.owner,
            "repo": self.config.repo,
            "pr": pr_number,
            "cursor": cursor,
        })
    }

    async fn query_pull_request<T: DeserializeOwned>(
        &self,
        query: &str,
        pr_number: u64,
        cursor: Option<&str>,
    ) -> Result<T> {
        let data: RepositoryData<T> =
            graphql_query(&self.client, query, self.variables(pr_number, cursor)).await?;
        data.repository
            .and_then(|r| r.pull_request)
            .ok_or_else(|| Error::PullRequestNotFound(format!("{}#{pr_number}", self.config)))
    }

    /// Append the reviews after `page` until the last page
    async fn fetch_remaining_reviews(
        &self,
        pr_number: u64,
        page: PageInfo,
        nodes: &mut Vec<ReviewNode>,
    ) -> Result<()> {
        collect_pages("reviews", page, nodes, move |cursor| async move {
            self.query_pull_request::<ReviewsNode>(REVIEWS_PAGE_QUERY, pr_number, Some(&cursor))
                .await
                .map(|pr| pr.reviews)
        })
        .await
    }

    /// Append the commits after `page` until the last page
    async fn fetch_remaining_commits(
        &self,
        pr_number: u64,
        page: PageInfo,
        nodes: &mut Vec<PullRequestCommitNode>,
    ) -> Result<()> {
        collect_pages("commits", page, nodes, move |cursor| async move {
            self.query_pull_request::<CommitsNode>(COMMITS_PAGE_QUERY, pr_number, Some(&cursor))
                .await
                .map(|pr| pr.commits)
        })
        .await
    }
}

/// Follow `endCursor` from `page` while GitHub reports another page,
/// appending each page's nodes to `nodes` in order
async fn collect_pages<T, F, Fut>(
    list: &str,
    mut page: PageInfo,
    nodes: &mut Vec<T>,
    mut fetch_page: F,
) -> Result<()>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Connection<T>>>,
{
    while page.has_next_page {
        let cursor = next_cursor(&mut page, list)?;
        let connection = fetch_page(cursor).await?;
        debug!(list, count = connection.nodes.len(), "fetched page");
        nodes.extend(connection.nodes);
        page = connection.page_info;
    }
    Ok(())
}

fn next_cursor(page: &mut PageInfo, list: &str) -> Result<String> {
    page.end_cursor
        .take()
        .ok_or_else(|| Error::GitHubApi(format!("{list} page has no end cursor")))
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pull_request_snapshot(&self, pr_number: u64) -> Result<PullRequestSnapshot> {
        debug!(repo = %self.config, pr_number, "fetching pull request");

        let mut pr: PullRequestNode = self
            .query_pull_request(PULL_REQUEST_QUERY, pr_number, None)
            .await?;

        let reviews_page = pr.reviews.page_info.clone();
        self.fetch_remaining_reviews(pr_number, reviews_page, &mut pr.reviews.nodes)
            .await?;

        let commits_page = pr.commits.page_info.clone();
        self.fetch_remaining_commits(pr_number, commits_page, &mut pr.commits.nodes)
            .await?;

        let snapshot = PullRequestSnapshot::try_from(pr)?;
        debug!(
            pr_number,
            head_sha = %snapshot.head_sha,
            commits = snapshot.commits.len(),
            reviews = snapshot.reviews.len(),
            "fetched pull request"
        );
        Ok(snapshot)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::evaluate;
    use crate::policy::TrustPolicy;

    const HEAD: &str = "1234567890abcdef1234567890abcdef12345678";

    const RESPONSE: &str = r#"{
      "data": {
        "repository": {
          "pullRequest": {
            "headRefOid": "1234567890abcdef1234567890abcdef12345678",
            "author": { "login": "octocat", "resourcePath": "/octocat" },
            "reviews": {
              "pageInfo": { "hasNextPage": false, "endCursor": null },
              "nodes": [
                {
                  "state": "APPROVED",
                  "commit": { "oid": "1234567890abcdef1234567890abcdef12345678" },
                  "author": { "login": "suzuki-shunsuke", "resourcePath": "/suzuki-shunsuke" }
                },
                { "state": "COMMENTED", "commit": null, "author": null }
              ]
            },
            "commits": {
              "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29yOjEwMA==" },
              "nodes": [
                {
                  "commit": {
                    "oid": "1234567890abcdef1234567890abcdef12345678",
                    "committer": { "user": null },
                    "author": { "user": { "login": "octocat", "resourcePath": "/octocat" } }
                  }
                }
              ]
            }
          }
        }
      }
    }"#;

    fn parse(json: &str) -> Result<RepositoryData<PullRequestNode>> {
        let response: GraphQlResponse<RepositoryData<PullRequestNode>> =
            serde_json::from_str(json).unwrap();
        unwrap_response(response)
    }

    #[test]
    fn test_pull_request_response_to_snapshot() {
        let data = parse(RESPONSE).unwrap();
        let pr = data.repository.unwrap().pull_request.unwrap();
        assert!(pr.commits.page_info.has_next_page);
        assert_eq!(
            pr.commits.page_info.end_cursor.as_deref(),
            Some("Y3Vyc29yOjEwMA==")
        );

        let snapshot = PullRequestSnapshot::try_from(pr).unwrap();
        assert_eq!(snapshot.author, Some(User::new("octocat")));
        assert_eq!(snapshot.commits.len(), 1);
        assert!(snapshot.commits[0].committer_user.is_none());
        assert_eq!(
            snapshot.commits[0].effective_committer(),
            Some(&User::new("octocat"))
        );

        assert_eq!(snapshot.reviews.len(), 2);
        assert_eq!(snapshot.reviews[0].state, ReviewState::Approved);
        assert_eq!(snapshot.reviews[0].author.login, "suzuki-shunsuke");
        // Deleted reviewer and missing commit
        assert_eq!(snapshot.reviews[1].author, User::ghost());
        assert_eq!(snapshot.reviews[1].commit_oid, "");
    }

    /// Pull request at `HEAD` with the given review nodes and no commits
    fn pull_request_with_reviews(reviews: &str) -> PullRequestNode {
        let json = format!(
            r#"{{
              "headRefOid": "{HEAD}",
              "author": {{ "login": "octocat", "resourcePath": "/octocat" }},
              "reviews": {{
                "pageInfo": {{ "hasNextPage": false, "endCursor": null }},
                "nodes": [{reviews}]
              }},
              "commits": {{
                "pageInfo": {{ "hasNextPage": false, "endCursor": null }},
                "nodes": []
              }}
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_deleted_account_approval_of_head_is_rejected() {
        let pr = pull_request_with_reviews(&format!(
            r#"{{ "state": "APPROVED", "commit": {{ "oid": "{HEAD}" }}, "author": null }}"#
        ));

        match PullRequestSnapshot::try_from(pr) {
            Err(Error::GitHubApi(msg)) => assert!(msg.contains("deleted account")),
            other => panic!("Expected GitHubApi error, got: {other:?}"),
        }
    }

    #[test]
    fn test_deleted_account_reviews_never_count() {
        let pr = pull_request_with_reviews(&format!(
            r#"{{ "state": "APPROVED", "commit": {{ "oid": "0000000" }}, "author": null }},
               {{ "state": "COMMENTED", "commit": {{ "oid": "{HEAD}" }}, "author": null }}"#
        ));

        let snapshot = PullRequestSnapshot::try_from(pr).unwrap();
        assert!(snapshot.reviews.iter().all(|r| r.author == User::ghost()));

        let verdict = evaluate(&snapshot, &TrustPolicy::default());
        assert_eq!(verdict.decision.counted_approvals, 0);
        assert!(verdict.ignored_approvals.is_empty());
        assert!(!verdict.is_valid());
    }

    #[test]
    fn test_not_found_error() {
        let json = r#"{
          "data": { "repository": { "pullRequest": null } },
          "errors": [
            { "type": "NOT_FOUND", "message": "Could not resolve to a PullRequest with the number of 999." }
          ]
        }"#;
        match parse(json) {
            Err(Error::PullRequestNotFound(msg)) => assert!(msg.contains("999")),
            Err(other) => panic!("Expected PullRequestNotFound, got: {other:?}"),
            Ok(_) => panic!("Expected PullRequestNotFound, got data"),
        }
    }

    #[test]
    fn test_other_graphql_error() {
        let json = r#"{ "errors": [ { "message": "Something went wrong" } ] }"#;
        match parse(json) {
            Err(Error::GitHubApi(msg)) => assert!(msg.contains("Something went wrong")),
            Err(other) => panic!("Expected GitHubApi error, got: {other:?}"),
            Ok(_) => panic!("Expected GitHubApi error, got data"),
        }
    }

    #[test]
    fn test_missing_data() {
        assert!(matches!(parse("{}"), Err(Error::GitHubApi(_))));
    }

    #[tokio::test]
    async fn test_client_errors_convert_from_octocrab() {
        assert!(matches!(
            build_client("token", Some("bad host")),
            Err(Error::Octocrab(_))
        ));
        assert!(build_client("token", Some("github.example.com")).is_ok());
    }

    #[test]
    fn test_next_cursor_requires_end_cursor() {
        let mut page = PageInfo {
            has_next_page: true,
            end_cursor: None,
        };
        assert!(next_cursor(&mut page, "commits").is_err());

        let mut page = PageInfo {
            has_next_page: true,
            end_cursor: Some("abc".to_string()),
        };
        assert_eq!(next_cursor(&mut page, "commits").unwrap(), "abc");
    }

    fn page<T>(nodes: Vec<T>, end_cursor: Option<&str>) -> Connection<T> {
        Connection {
            page_info: PageInfo {
                has_next_page: end_cursor.is_some(),
                end_cursor: end_cursor.map(str::to_string),
            },
            nodes,
        }
    }

    fn review_node(login: &str) -> ReviewNode {
        ReviewNode {
            state: ReviewState::Approved,
            commit: Some(OidNode {
                oid: HEAD.to_string(),
            }),
            author: Some(UserNode {
                login: login.to_string(),
                resource_path: format!("/{login}"),
            }),
        }
    }

    fn commit_node(oid: &str) -> PullRequestCommitNode {
        PullRequestCommitNode {
            commit: CommitNode {
                oid: oid.to_string(),
                committer: None,
                author: None,
            },
        }
    }

    /// Page fetcher serving `pages` in order and recording each cursor it is given
    fn scripted<T>(
        pages: Vec<Result<Connection<T>>>,
        cursors: &mut Vec<String>,
    ) -> impl FnMut(String) -> std::future::Ready<Result<Connection<T>>> {
        let mut pages = pages.into_iter();
        move |cursor| {
            cursors.push(cursor);
            std::future::ready(
                pages
                    .next()
                    .unwrap_or_else(|| Err(Error::GitHubApi("no more pages".to_string()))),
            )
        }
    }

    #[tokio::test]
    async fn test_reviews_follow_cursor_across_pages() {
        let first = page(vec![review_node("a"), review_node("b")], Some("c1"));
        let mut nodes = first.nodes;
        let mut cursors = Vec::new();
        let fetch = scripted(
            vec![
                Ok(page(vec![review_node("c"), review_node("d")], Some("c2"))),
                Ok(page(vec![review_node("e")], None)),
            ],
            &mut cursors,
        );

        collect_pages("reviews", first.page_info, &mut nodes, fetch)
            .await
            .unwrap();

        let logins: Vec<_> = nodes
            .into_iter()
            .map(|n| Review::from(n).author.login)
            .collect();
        assert_eq!(logins, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(cursors, vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn test_commits_follow_cursor_across_pages() {
        let first = page(vec![commit_node("c1")], Some("cursor-1"));
        let mut nodes = first.nodes;
        let mut cursors = Vec::new();
        let fetch = scripted(
            vec![Ok(page(vec![commit_node("c2"), commit_node("c3")], None))],
            &mut cursors,
        );

        collect_pages("commits", first.page_info, &mut nodes, fetch)
            .await
            .unwrap();

        let oids: Vec<_> = nodes.into_iter().map(|n| n.commit.oid).collect();
        assert_eq!(oids, vec!["c1", "c2", "c3"]);
        assert_eq!(cursors, vec!["cursor-1"]);
    }

    #[tokio::test]
    async fn test_last_page_fetches_nothing() {
        let mut nodes = vec![commit_node("c1")];
        let mut cursors = Vec::new();
        let last = PageInfo {
            has_next_page: false,
            end_cursor: None,
        };

        collect_pages("commits", last, &mut nodes, scripted(vec![], &mut cursors))
            .await
            .unwrap();

        assert_eq!(nodes.len(), 1);
        assert!(cursors.is_empty());
    }

    #[tokio::test]
    async fn test_error_mid_pagination_propagates() {
        let first = page(vec![review_node("a")], Some("c1"));
        let mut nodes = first.nodes;
        let mut cursors = Vec::new();
        let fetch = scripted(
            vec![
                Ok(page(vec![review_node("b")], Some("c2"))),
                Err(Error::GitHubApi("GraphQL error: timeout".to_string())),
                Ok(page(vec![review_node("z")], None)),
            ],
            &mut cursors,
        );

        let result = collect_pages("reviews", first.page_info, &mut nodes, fetch).await;

        match result {
            Err(Error::GitHubApi(msg)) => assert!(msg.contains("timeout")),
            other => panic!("Expected GitHubApi error, got: {other:?}"),
        }
        assert_eq!(cursors, vec!["c1", "c2"]);
    }
}
