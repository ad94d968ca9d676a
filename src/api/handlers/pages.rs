use crate::{
    auth::middleware::AuthUser,
    pages::{
        categories::{self, CourseCategory},
        contacts::{self, Contact},
        faculty::{self, FacultyMember},
        menu::{share_text, ActionMenu},
        notifications::Notification,
        reports::{seed_reports, ReportSummary},
    },
    types::{AppError, Result},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Search parameters accepted by the directory-style pages.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    /// Faculty page only: restrict to one department.
    pub department: Option<String>,
}

/// Actions in a faculty row's options menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FacultyAction {
    Share,
    Message,
    ViewProfile,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvokeActionRequest {
    /// Menu label as rendered, e.g. "Share".
    pub label: String,
}

/// Result of invoking a faculty row action.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum FacultyActionResponse {
    /// Plain text for the clipboard share sheet.
    Share { text: String },
    /// Room id for a conversation with this member.
    Message { room_id: String },
    ViewProfile { member: FacultyMember },
}

fn faculty_row_menu() -> ActionMenu<FacultyAction> {
    ActionMenu::new([
        ("Share", FacultyAction::Share),
        ("Message", FacultyAction::Message),
        ("View profile", FacultyAction::ViewProfile),
    ])
}

fn find_member(member_id: &str) -> Result<FacultyMember> {
    faculty::seed_faculty()
        .into_iter()
        .find(|m| m.id == member_id)
        .ok_or_else(|| AppError::NotFound(format!("No faculty member with id {}", member_id)))
}

/// Search the faculty directory
#[utoipa::path(
    get,
    path = "/api/faculty",
    params(
        ("query" = Option<String>, Query, description = "Name or department search"),
        ("department" = Option<String>, Query, description = "Restrict to one department")
    ),
    responses((status = 200, description = "Matching members", body = [FacultyMember])),
    tag = "pages"
)]
pub async fn list_faculty(Query(query): Query<SearchQuery>) -> Json<Vec<FacultyMember>> {
    let members = faculty::seed_faculty();
    let matches = faculty::search(
        &members,
        query.query.as_deref().unwrap_or(""),
        query.department.as_deref(),
    )
    .into_iter()
    .cloned()
    .collect();
    Json(matches)
}

/// The options menu for one faculty row
pub async fn faculty_actions(Path(member_id): Path<String>) -> Result<Json<ActionMenu<FacultyAction>>> {
    find_member(&member_id)?;
    Ok(Json(faculty_row_menu()))
}

/// Invoke a faculty row action by its menu label
#[utoipa::path(
    post,
    path = "/api/faculty/{member_id}/actions",
    params(("member_id" = String, Path, description = "Faculty member id")),
    request_body = InvokeActionRequest,
    responses(
        (status = 200, description = "Action result", body = FacultyActionResponse),
        (status = 400, description = "Unknown menu label"),
        (status = 404, description = "No such member")
    ),
    tag = "pages"
)]
pub async fn invoke_faculty_action(
    AuthUser(claims): AuthUser,
    Path(member_id): Path<String>,
    Json(payload): Json<InvokeActionRequest>,
) -> Result<Json<FacultyActionResponse>> {
    let member = find_member(&member_id)?;
    let menu = faculty_row_menu();
    let action = menu
        .select(&payload.label)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown action '{}'", payload.label)))?;

    let response = match action {
        FacultyAction::Share => FacultyActionResponse::Share {
            text: share_text(
                &member.name,
                &[
                    ("Department", member.department.as_str()),
                    ("Title", member.title.as_str()),
                    ("Email", member.email.as_str()),
                ],
            ),
        },
        FacultyAction::Message => FacultyActionResponse::Message {
            room_id: format!("{}--{}", claims.sub, member.id),
        },
        FacultyAction::ViewProfile => FacultyActionResponse::ViewProfile { member },
    };
    Ok(Json(response))
}

/// Course category cards
pub async fn list_categories(Query(query): Query<SearchQuery>) -> Json<Vec<CourseCategory>> {
    let all = categories::seed_categories();
    let matches = categories::search(&all, query.query.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    Json(matches)
}

/// Campus contact list
pub async fn list_contacts(Query(query): Query<SearchQuery>) -> Json<Vec<Contact>> {
    let all = contacts::seed_contacts();
    let matches = contacts::search(&all, query.query.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    Json(matches)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationsResponse {
    pub items: Vec<Notification>,
    pub unread: usize,
}

/// Notifications, newest first, with the unread badge count
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses((status = 200, description = "Notification list", body = NotificationsResponse)),
    tag = "pages"
)]
pub async fn list_notifications(State(state): State<AppState>) -> Json<NotificationsResponse> {
    Json(NotificationsResponse {
        items: state.notifications.list(),
        unread: state.notifications.unread_count(),
    })
}

/// Mark one notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> Result<StatusCode> {
    if state.notifications.mark_read(&notification_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "No notification with id {}",
            notification_id
        )))
    }
}

/// Term summary figures for the reports page
pub async fn list_reports() -> Json<Vec<ReportSummary>> {
    Json(seed_reports())
}
