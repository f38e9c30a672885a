//! Handlers for events from the project board itself.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info};

use super::{HandlerError, expect_success};
use crate::effects::{GitHubEffect, IssueData};
use crate::github::GitHubApiError;
use crate::notes::{parse_ref, refs_from_note};
use crate::server::App;
use crate::types::CardId;
use crate::webhooks::event::{Event, WebhookRequest};

/// `project_card` `created`: when every issue the new card's note references
/// is already closed, file the card straight into the done column.
pub async fn card_created(request: WebhookRequest, app: App) -> Response {
    file_card(&request, &app).await.into_response()
}

async fn file_card(request: &WebhookRequest, app: &App) -> Result<Response, HandlerError> {
    let event = Event::from_request(app, request)?;
    let card_id = event
        .get_u64("card_id")
        .map(CardId)
        .ok_or(HandlerError::MissingField("project_card.id"))?;
    let done = app.config().done_column_id;

    if event.get_u64("column_id") == Some(done.0) {
        return Ok((StatusCode::OK, format!("Card {card_id} is already done")).into_response());
    }

    let refs: Vec<_> = event
        .get_str("note")
        .map(refs_from_note)
        .unwrap_or_default()
        .iter()
        .filter_map(|r| parse_ref(r))
        .collect();
    if refs.is_empty() {
        debug!(app = app.name(), card_id = %card_id, "Card references no issues");
        return Ok((StatusCode::OK, format!("Card {card_id} references no issues")).into_response());
    }

    for issue_ref in &refs {
        let response = app
            .github()
            .interpret(GitHubEffect::GetIssue {
                repo: issue_ref.repo.clone(),
                number: issue_ref.number,
            })
            .await?;
        let issue: IssueData = expect_success(response, "get issue")?
            .json()
            .map_err(GitHubApiError::from)?;

        if !issue.is_closed() {
            return Ok((
                StatusCode::OK,
                format!("Card {card_id} references open item {}", issue.html_url),
            )
                .into_response());
        }
    }

    let response = app
        .github()
        .interpret(GitHubEffect::MoveProjectCard {
            card_id,
            column_id: done,
        })
        .await?;
    expect_success(response, "move project card")?;

    info!(
        app = app.name(),
        card_id = %card_id,
        references = refs.len(),
        "Filed card for closed items as done"
    );
    Ok((StatusCode::OK, format!("Moved card {card_id} to column {done}")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::ApiResponse;
    use crate::test_utils::{MockGitHub, test_app_with, webhook_request};
    use crate::types::{ColumnId, RepoId};
    use serde_json::json;
    use std::sync::Arc;

    const NEW: ColumnId = ColumnId(10144279);
    const DONE: ColumnId = ColumnId(9388249);

    fn card_payload(note: Option<&str>, column: ColumnId) -> serde_json::Value {
        json!({
            "action": "created",
            "project_card": { "id": 31, "column_id": column, "note": note }
        })
    }

    /// Issue 1 is closed, issue 2 is open.
    fn github() -> Arc<MockGitHub> {
        Arc::new(MockGitHub::new(|effect| match effect {
            GitHubEffect::GetIssue { number, .. } => {
                let state = if *number == 1 { "closed" } else { "open" };
                ApiResponse::new(
                    200,
                    json!({
                        "number": number,
                        "state": state,
                        "html_url": format!("https://github.com/NCAR/xdev/issues/{number}")
                    }),
                )
            }
            GitHubEffect::MoveProjectCard { .. } => ApiResponse::new(201, json!({})),
            _ => ApiResponse::new(404, json!({"message": "Not Found"})),
        }))
    }

    #[tokio::test]
    async fn closed_reference_moves_card_to_done() {
        let github = github();
        let app = test_app_with("main", github.clone());
        let payload = card_payload(Some("https://github.com/NCAR/xdev/issues/1"), NEW);

        let response = card_created(webhook_request("project_card", &payload), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            github.calls(),
            vec![
                GitHubEffect::GetIssue {
                    repo: RepoId::new("NCAR", "xdev"),
                    number: 1
                },
                GitHubEffect::MoveProjectCard {
                    card_id: CardId(31),
                    column_id: DONE
                },
            ]
        );
    }

    #[tokio::test]
    async fn open_reference_leaves_card() {
        let github = github();
        let app = test_app_with("main", github.clone());
        let payload = card_payload(
            Some("https://github.com/NCAR/xdev/issues/1 https://github.com/NCAR/xdev/issues/2"),
            NEW,
        );

        let response = card_created(webhook_request("project_card", &payload), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(github.calls().len(), 2);
        assert!(
            !github
                .calls()
                .iter()
                .any(|e| matches!(e, GitHubEffect::MoveProjectCard { .. }))
        );
    }

    #[tokio::test]
    async fn note_without_refs_takes_no_action() {
        let github = github();
        let app = test_app_with("main", github.clone());

        for note in [None, Some("remember the milk")] {
            let payload = card_payload(note, NEW);
            let response = card_created(webhook_request("project_card", &payload), app.clone()).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert!(github.calls().is_empty());
    }

    #[tokio::test]
    async fn card_created_in_done_is_left_alone() {
        let github = github();
        let app = test_app_with("main", github.clone());
        let payload = card_payload(Some("https://github.com/NCAR/xdev/issues/1"), DONE);

        let response = card_created(webhook_request("project_card", &payload), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(github.calls().is_empty());
    }

    #[tokio::test]
    async fn card_without_id_is_bad_request() {
        let github = github();
        let app = test_app_with("main", github.clone());
        let payload = json!({"action": "created", "project_card": {"note": "x"}});

        let response = card_created(webhook_request("project_card", &payload), app).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(github.calls().is_empty());
    }

    #[tokio::test]
    async fn issue_lookup_failure_is_bad_gateway() {
        let github = Arc::new(MockGitHub::with_response(ApiResponse::new(
            404,
            json!({"message": "Not Found"}),
        )));
        let app = test_app_with("main", github);
        let payload = card_payload(Some("https://github.com/NCAR/xdev/issues/1"), NEW);

        let response = card_created(webhook_request("project_card", &payload), app).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
