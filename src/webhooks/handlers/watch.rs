//! Issue and pull request handlers for watched repositories.
//!
//! Every tracked item is represented on the board by a note card whose text
//! is the item's URL. Opening an item adds a card to the new column; closing
//! it moves the card to the done column; reopening moves it back.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::info;

use super::{HandlerError, expect_success};
use crate::effects::{CARDS_PER_PAGE, GitHubEffect, ProjectCard};
use crate::github::GitHubApiError;
use crate::notes::refs_from_note;
use crate::server::App;
use crate::types::ColumnId;
use crate::webhooks::event::{Event, WebhookRequest};

/// `issues`/`pull_request` `opened`: add a card for the item.
pub async fn card_opened(request: WebhookRequest, app: App) -> Response {
    let result = async {
        let url = item_url(&request, &app)?;
        create_card(&app, &url).await
    };
    result.await.into_response()
}

/// `issues`/`pull_request` `reopened`: move the item's card back to the new
/// column, adding one if the item has none.
pub async fn card_reopened(request: WebhookRequest, app: App) -> Response {
    let result = async {
        let url = item_url(&request, &app)?;
        let target = app.config().new_column_id;
        match find_card(&app, &url).await? {
            Some((card, column_id)) => place_card(&app, &card, column_id, target, &url).await,
            None => create_card(&app, &url).await,
        }
    };
    result.await.into_response()
}

/// `issues`/`pull_request` `closed`: move the item's card to the done column.
pub async fn card_closed(request: WebhookRequest, app: App) -> Response {
    let result = async {
        let url = item_url(&request, &app)?;
        let target = app.config().done_column_id;
        match find_card(&app, &url).await? {
            Some((card, column_id)) => place_card(&app, &card, column_id, target, &url).await,
            None => {
                info!(app = app.name(), url = %url, "Closed item has no card");
                Ok((StatusCode::OK, format!("No card for {url}")).into_response())
            }
        }
    };
    result.await.into_response()
}

/// Reads the item URL out of the delivery.
fn item_url(request: &WebhookRequest, app: &App) -> Result<String, HandlerError> {
    let event = Event::from_request(app, request)?;
    event
        .html_url()
        .map(str::to_string)
        .ok_or(HandlerError::MissingField("html_url"))
}

/// Creates a card for `url` in the new column.
async fn create_card(app: &App, url: &str) -> Result<Response, HandlerError> {
    let column_id = app.config().new_column_id;
    let response = app
        .github()
        .interpret(GitHubEffect::CreateProjectCard {
            column_id,
            note: url.to_string(),
        })
        .await?;
    let card: ProjectCard = expect_success(response, "create project card")?
        .json()
        .map_err(GitHubApiError::from)?;

    info!(
        app = app.name(),
        card_id = %card.id,
        column_id = %column_id,
        url = %url,
        "Created project card"
    );
    Ok((StatusCode::CREATED, format!("Created card {} for {url}", card.id)).into_response())
}

/// Moves a card to `target` unless it is already there.
async fn place_card(
    app: &App,
    card: &ProjectCard,
    current: ColumnId,
    target: ColumnId,
    url: &str,
) -> Result<Response, HandlerError> {
    if current == target {
        return Ok((
            StatusCode::OK,
            format!("Card {} for {url} already in column {target}", card.id),
        )
            .into_response());
    }

    let response = app
        .github()
        .interpret(GitHubEffect::MoveProjectCard {
            card_id: card.id,
            column_id: target,
        })
        .await?;
    expect_success(response, "move project card")?;

    info!(
        app = app.name(),
        card_id = %card.id,
        from = %current,
        to = %target,
        "Moved project card"
    );
    Ok((
        StatusCode::OK,
        format!("Moved card {} for {url} to column {target}", card.id),
    )
        .into_response())
}

/// Searches the board columns for the card whose note references `url`.
async fn find_card(app: &App, url: &str) -> Result<Option<(ProjectCard, ColumnId)>, HandlerError> {
    for column_id in app.config().board_columns() {
        if let Some(card) = find_card_in_column(app, column_id, url).await? {
            return Ok(Some((card, column_id)));
        }
    }
    Ok(None)
}

/// Walks a column page by page. A short page is the last one.
async fn find_card_in_column(
    app: &App,
    column_id: ColumnId,
    url: &str,
) -> Result<Option<ProjectCard>, HandlerError> {
    for page in 1.. {
        let response = app
            .github()
            .interpret(GitHubEffect::ListProjectCards { column_id, page })
            .await?;
        let cards: Vec<ProjectCard> = expect_success(response, "list project cards")?
            .json()
            .map_err(GitHubApiError::from)?;

        let last_page = cards.len() < CARDS_PER_PAGE;
        if let Some(card) = cards.into_iter().find(|card| references(card, url)) {
            return Ok(Some(card));
        }
        if last_page {
            break;
        }
    }
    Ok(None)
}

fn references(card: &ProjectCard, url: &str) -> bool {
    card.note
        .as_deref()
        .is_some_and(|note| refs_from_note(note).iter().any(|r| r == url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::ApiResponse;
    use crate::test_utils::{MockGitHub, response_text, test_app_with, webhook_request};
    use crate::types::CardId;
    use serde_json::{Value, json};
    use std::sync::Arc;

    const NEW: ColumnId = ColumnId(10144279);
    const DONE: ColumnId = ColumnId(9388249);
    const URL: &str = "https://github.com/NCAR/xdevbot-testing/issues/5";

    fn issue_payload(action: &str) -> Value {
        json!({
            "action": action,
            "issue": { "number": 5, "html_url": URL, "state": "open" },
            "repository": { "full_name": "NCAR/xdevbot-testing" }
        })
    }

    /// A board with the given cards per column; creates and moves succeed.
    fn board(new_cards: Value, done_cards: Value) -> Arc<MockGitHub> {
        Arc::new(MockGitHub::new(move |effect| match effect {
            GitHubEffect::ListProjectCards { column_id, .. } if *column_id == NEW => {
                ApiResponse::new(200, new_cards.clone())
            }
            GitHubEffect::ListProjectCards { .. } => ApiResponse::new(200, done_cards.clone()),
            GitHubEffect::CreateProjectCard { note, .. } => {
                ApiResponse::new(201, json!({"id": 77, "note": note, "archived": false}))
            }
            GitHubEffect::MoveProjectCard { .. } => ApiResponse::new(201, json!({})),
            _ => ApiResponse::new(404, json!({"message": "Not Found"})),
        }))
    }

    #[tokio::test]
    async fn opened_creates_card_in_new_column() {
        let github = board(json!([]), json!([]));
        let app = test_app_with("watch", github.clone());

        let response = card_opened(webhook_request("issues", &issue_payload("opened")), app).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            github.calls(),
            vec![GitHubEffect::CreateProjectCard {
                column_id: NEW,
                note: URL.to_string()
            }]
        );
        assert!(response_text(response).await.contains("Created card 77"));
    }

    #[tokio::test]
    async fn opened_without_item_is_bad_request() {
        let github = board(json!([]), json!([]));
        let app = test_app_with("watch", github.clone());

        let response = card_opened(webhook_request("issues", &json!({"action": "opened"})), app).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(github.calls().is_empty());
    }

    #[tokio::test]
    async fn opened_relays_github_failure_as_bad_gateway() {
        let github = Arc::new(MockGitHub::with_response(ApiResponse::new(
            422,
            json!({"message": "Validation Failed"}),
        )));
        let app = test_app_with("watch", github);

        let response = card_opened(webhook_request("issues", &issue_payload("opened")), app).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response_text(response).await,
            "GitHub returned HTTP 422 for create project card"
        );
    }

    #[tokio::test]
    async fn closed_moves_card_to_done() {
        let github = board(
            json!([
                {"id": 1, "note": "https://github.com/NCAR/xdev/issues/1"},
                {"id": 2, "note": format!("tracking {URL}")}
            ]),
            json!([]),
        );
        let app = test_app_with("watch", github.clone());

        let response = card_closed(webhook_request("issues", &issue_payload("closed")), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            github.calls(),
            vec![
                GitHubEffect::ListProjectCards {
                    column_id: NEW,
                    page: 1
                },
                GitHubEffect::MoveProjectCard {
                    card_id: CardId(2),
                    column_id: DONE
                },
            ]
        );
    }

    #[tokio::test]
    async fn opened_with_undecodable_card_is_bad_gateway() {
        let github = Arc::new(MockGitHub::with_response(ApiResponse::new(201, json!({}))));
        let app = test_app_with("watch", github);

        let response = card_opened(webhook_request("issues", &issue_payload("opened")), app).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    /// A new column holding a full page of unrelated cards, with the item's
    /// card first on page 2.
    fn long_column() -> Arc<MockGitHub> {
        Arc::new(MockGitHub::new(|effect| match effect {
            GitHubEffect::ListProjectCards {
                column_id,
                page: 1,
            } if *column_id == NEW => {
                let cards: Vec<Value> = (0..CARDS_PER_PAGE)
                    .map(|i| json!({"id": i, "note": format!("https://github.com/NCAR/xdev/issues/{i}")}))
                    .collect();
                ApiResponse::new(200, Value::Array(cards))
            }
            GitHubEffect::ListProjectCards {
                column_id,
                page: 2,
            } if *column_id == NEW => ApiResponse::new(200, json!([{"id": 999, "note": URL}])),
            GitHubEffect::ListProjectCards { .. } => ApiResponse::new(200, json!([])),
            GitHubEffect::CreateProjectCard { note, .. } => {
                ApiResponse::new(201, json!({"id": 77, "note": note}))
            }
            GitHubEffect::MoveProjectCard { .. } => ApiResponse::new(201, json!({})),
            _ => ApiResponse::new(404, json!({"message": "Not Found"})),
        }))
    }

    #[tokio::test]
    async fn card_past_first_page_is_found() {
        let github = long_column();
        let app = test_app_with("watch", github.clone());

        let response = card_closed(webhook_request("issues", &issue_payload("closed")), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            github.calls(),
            vec![
                GitHubEffect::ListProjectCards {
                    column_id: NEW,
                    page: 1
                },
                GitHubEffect::ListProjectCards {
                    column_id: NEW,
                    page: 2
                },
                GitHubEffect::MoveProjectCard {
                    card_id: CardId(999),
                    column_id: DONE
                },
            ]
        );
    }

    #[tokio::test]
    async fn reopened_card_past_first_page_is_not_duplicated() {
        let github = long_column();
        let app = test_app_with("watch", github.clone());

        let response =
            card_reopened(webhook_request("issues", &issue_payload("reopened")), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            !github
                .calls()
                .iter()
                .any(|e| matches!(e, GitHubEffect::CreateProjectCard { .. }))
        );
    }

    #[tokio::test]
    async fn closed_without_card_takes_no_action() {
        let github = board(json!([]), json!([{"id": 3, "note": null}]));
        let app = test_app_with("watch", github.clone());

        let response = card_closed(webhook_request("issues", &issue_payload("closed")), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_text(response).await, format!("No card for {URL}"));
        assert_eq!(
            github.calls(),
            vec![
                GitHubEffect::ListProjectCards {
                    column_id: NEW,
                    page: 1
                },
                GitHubEffect::ListProjectCards {
                    column_id: DONE,
                    page: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn closed_card_already_done_is_not_moved() {
        let github = board(json!([]), json!([{"id": 4, "note": URL}]));
        let app = test_app_with("watch", github.clone());

        let response = card_closed(webhook_request("issues", &issue_payload("closed")), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            !github
                .calls()
                .iter()
                .any(|e| matches!(e, GitHubEffect::MoveProjectCard { .. }))
        );
    }

    #[tokio::test]
    async fn reopened_moves_done_card_back() {
        let github = board(json!([]), json!([{"id": 4, "note": URL}]));
        let app = test_app_with("watch", github.clone());

        let response =
            card_reopened(webhook_request("issues", &issue_payload("reopened")), app).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            github.calls().last(),
            Some(&GitHubEffect::MoveProjectCard {
                card_id: CardId(4),
                column_id: NEW
            })
        );
    }

    #[tokio::test]
    async fn reopened_without_card_creates_one() {
        let github = board(json!([]), json!([]));
        let app = test_app_with("watch", github.clone());

        let pull = json!({
            "action": "reopened",
            "pull_request": { "number": 8, "html_url": "https://github.com/NCAR/xdev/pull/8" }
        });
        let response = card_reopened(webhook_request("pull_request", &pull), app).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            github.calls().last(),
            Some(&GitHubEffect::CreateProjectCard {
                column_id: NEW,
                note: "https://github.com/NCAR/xdev/pull/8".to_string()
            })
        );
    }

    #[test]
    fn references_needs_exact_url() {
        let card = |note: Option<&str>| ProjectCard {
            id: CardId(1),
            note: note.map(str::to_string),
            archived: false,
            content_url: None,
        };
        assert!(references(&card(Some(URL)), URL));
        assert!(!references(&card(Some("https://github.com/NCAR/xdevbot-testing/issues/50")), URL));
        assert!(!references(&card(None), URL));
    }
}
