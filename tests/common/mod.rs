//! Shared test fixtures

#![allow(dead_code)]

pub mod mock_platform;

pub use mock_platform::MockPlatformService;

use review_gate::types::{Commit, PlatformConfig, PullRequestSnapshot, Review, ReviewState, User};

/// Head SHA used by the fixtures
pub const HEAD_SHA: &str = "1234567890abcdef1234567890abcdef12345678";

/// An older commit on the same PR
pub const OLD_SHA: &str = "abcdef1234567890abcdef1234567890abcdef12";

pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "suzuki-shunsuke".to_string(),
        repo: "validate-pr-review-action".to_string(),
        host: None,
    }
}

pub fn user(login: &str) -> User {
    User::new(login)
}

pub fn app(slug: &str) -> User {
    User::app(slug)
}

/// Commit at `oid` whose committer and author are both `login`
pub fn commit_by(oid: &str, login: &str) -> Commit {
    Commit {
        oid: oid.to_string(),
        committer_user: Some(user(login)),
        author_user: Some(user(login)),
    }
}

/// Commit at `oid` committed by `committer`
pub fn commit_with(oid: &str, committer: Option<User>, author: Option<User>) -> Commit {
    Commit {
        oid: oid.to_string(),
        committer_user: committer,
        author_user: author,
    }
}

pub fn approval(author: User) -> Review {
    Review {
        state: ReviewState::Approved,
        commit_oid: HEAD_SHA.to_string(),
        author,
    }
}

pub fn review(state: ReviewState, oid: &str, author: User) -> Review {
    Review {
        state,
        commit_oid: oid.to_string(),
        author,
    }
}

/// PR by `octocat` with one commit by `octocat` at the head and the given reviews
pub fn make_snapshot(reviews: Vec<Review>) -> PullRequestSnapshot {
    PullRequestSnapshot {
        head_sha: HEAD_SHA.to_string(),
        author: Some(user("octocat")),
        commits: vec![commit_by(HEAD_SHA, "octocat")],
        reviews,
    }
}
