use crate::{
    auth::middleware::AuthUser,
    calendar::events::{seed_events, Event, EventCategory, Filter},
    calendar::grid::{month_grid, CalendarCursor},
    calendar::planner::{EventBoard, EventDraft, SubmitOutcome},
    types::{AppError, Result},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Filter parameters shared by the event list and deadline endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct EventFilterQuery {
    pub category: Option<String>,
    pub course: Option<String>,
    /// Override for "today"; defaults to the server date.
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    /// Month in `YYYY-MM` form; defaults to the current month.
    pub month: Option<String>,
}

/// One month rendered as a flat cell list: leading `null` cells pad to the
/// weekday of the 1st, then one cell per day.
#[derive(Debug, Serialize, ToSchema)]
pub struct GridResponse {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<Option<NaiveDate>>,
    /// `YYYY-MM` labels for the adjacent months.
    pub prev: String,
    pub next: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeadlineResponse {
    /// Earliest matching event on or after today; absent when the
    /// schedule is clear.
    pub upcoming: Option<Event>,
}

fn category_filter(raw: Option<&str>) -> Result<Filter<EventCategory>> {
    match raw {
        None | Some("all") => Ok(Filter::All),
        Some(s) => EventCategory::parse(s)
            .map(Filter::Only)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown category '{}'", s))),
    }
}

fn course_filter(raw: Option<String>) -> Filter<String> {
    match raw {
        None => Filter::All,
        Some(s) if s == "all" => Filter::All,
        Some(s) => Filter::Only(s),
    }
}

fn month_label(cursor: &CalendarCursor) -> String {
    format!("{:04}-{:02}", cursor.year(), cursor.month_number())
}

/// Run `f` against the caller's planner board, creating it with the
/// institutional seed events on first touch.
fn with_board<R>(state: &AppState, user_id: &str, f: impl FnOnce(&mut EventBoard) -> R) -> R {
    let mut boards = state.boards.write();
    let board = boards
        .entry(user_id.to_string())
        .or_insert_with(|| EventBoard::new(seed_events()));
    f(board)
}

/// Render the month grid
#[utoipa::path(
    get,
    path = "/api/calendar/grid",
    params(("month" = Option<String>, Query, description = "Month as YYYY-MM")),
    responses(
        (status = 200, description = "Month grid", body = GridResponse),
        (status = 400, description = "Malformed month parameter")
    ),
    tag = "calendar"
)]
pub async fn grid(Query(query): Query<GridQuery>) -> Result<Json<GridResponse>> {
    let day = match &query.month {
        Some(month) => NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
            .map_err(|_| {
                AppError::InvalidInput(format!("Invalid month '{}', expected YYYY-MM", month))
            })?,
        None => Utc::now().date_naive(),
    };

    let cursor = CalendarCursor::containing(day);
    Ok(Json(GridResponse {
        year: cursor.year(),
        month: cursor.month_number(),
        cells: month_grid(day),
        prev: month_label(&cursor.prev_month()),
        next: month_label(&cursor.next_month()),
    }))
}

/// List events, filtered and date-ascending
#[utoipa::path(
    get,
    path = "/api/events",
    params(
        ("category" = Option<String>, Query, description = "Category filter or 'all'"),
        ("course" = Option<String>, Query, description = "Course id filter or 'all'")
    ),
    responses((status = 200, description = "Filtered events", body = [Event])),
    tag = "calendar"
)]
pub async fn list_events(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<EventFilterQuery>,
) -> Result<Json<Vec<Event>>> {
    let category = category_filter(query.category.as_deref())?;
    let course = course_filter(query.course);

    let events = with_board(&state, &claims.sub, |board| {
        crate::calendar::events::filtered_events(board.events(), &category, &course)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>()
    });
    Ok(Json(events))
}

/// Create an event through the add dialog
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = EventDraft,
    responses(
        (status = 200, description = "Event created", body = Event),
        (status = 400, description = "Missing title, date, or category")
    ),
    tag = "calendar"
)]
pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(draft): Json<EventDraft>,
) -> Result<Json<Event>> {
    let day = draft.date.unwrap_or_else(|| Utc::now().date_naive());

    with_board(&state, &claims.sub, |board| {
        board.open_add(day);
        board.update_draft(draft);
        match board.submit() {
            SubmitOutcome::Saved(id) => board
                .find(&id)
                .cloned()
                .map(Json)
                .ok_or_else(|| AppError::Internal("Saved event missing from board".to_string())),
            SubmitOutcome::Rejected => {
                board.cancel();
                Err(AppError::InvalidInput(
                    "Title, date and category are required".to_string(),
                ))
            }
        }
    })
}

/// Next upcoming deadline for the dashboard card
#[utoipa::path(
    get,
    path = "/api/events/next-deadline",
    params(
        ("category" = Option<String>, Query, description = "Category filter or 'all'"),
        ("course" = Option<String>, Query, description = "Course id filter or 'all'"),
        ("today" = Option<String>, Query, description = "Override for today (YYYY-MM-DD)")
    ),
    responses((status = 200, description = "Upcoming deadline, if any", body = DeadlineResponse)),
    tag = "calendar"
)]
pub async fn next_deadline(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<EventFilterQuery>,
) -> Result<Json<DeadlineResponse>> {
    let category = category_filter(query.category.as_deref())?;
    let course = course_filter(query.course);
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());

    let upcoming = with_board(&state, &claims.sub, |board| {
        crate::calendar::events::next_deadline(board.events(), &category, &course, today).cloned()
    });
    Ok(Json(DeadlineResponse { upcoming }))
}

/// Delete a user-created event
#[utoipa::path(
    delete,
    path = "/api/events/{event_id}",
    params(("event_id" = String, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event removed"),
        (status = 400, description = "Institutional events cannot be removed"),
        (status = 404, description = "No such event")
    ),
    tag = "calendar"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(event_id): Path<String>,
) -> Result<StatusCode> {
    with_board(&state, &claims.sub, |board| {
        if board.find(&event_id).is_none() {
            return Err(AppError::NotFound(format!("No event with id {}", event_id)));
        }
        // Confirmation happens client-side; institutional events never
        // render the control in the first place.
        if !board.can_delete(&event_id) {
            return Err(AppError::InvalidInput(
                "Institutional events cannot be removed".to_string(),
            ));
        }

        board.delete(&event_id);
        Ok(StatusCode::NO_CONTENT)
    })
}
