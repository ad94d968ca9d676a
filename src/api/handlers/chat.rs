use crate::{
    auth::middleware::AuthUser,
    chat::room::{classify_participants, room_kind, RoomId},
    types::{AppError, ChatMessage, Result, SendMessageRequest},
    AppState,
};
use axum::{
    extract::{Path, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use tracing::debug;
use uuid::Uuid;

/// Parse the room id and reject callers who are not one of its two
/// participants.
fn member_room(room_id: &str, user_id: &str) -> Result<RoomId> {
    let room = RoomId::parse(room_id)?;
    if !room.contains(user_id) {
        return Err(AppError::Auth(
            "You are not a participant in this conversation".to_string(),
        ));
    }
    Ok(room)
}

/// Send a message, creating the room on first contact
#[utoipa::path(
    post,
    path = "/api/chat/rooms/{room_id}/messages",
    params(("room_id" = String, Path, description = "Composite room id, `first--second`")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message stored", body = ChatMessage),
        (status = 400, description = "Malformed room id or empty message"),
        (status = 401, description = "Sender is not a participant")
    ),
    tag = "chat"
)]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(room_id): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<ChatMessage>> {
    let room = member_room(&room_id, &claims.sub)?;

    if payload.text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Message text must not be empty".to_string(),
        ));
    }

    // Check-then-act on purpose: if two first messages race, the insert
    // is an ignore for the loser and both messages land in the same room.
    if state.directory.get_room(&room_id).await?.is_none() {
        let (first_role, second_role) = classify_participants(
            state.role_lookup.as_ref(),
            &room,
            &claims.sub,
            claims.role,
        )
        .await?;
        let kind = room_kind(first_role, second_role);

        let created = state
            .directory
            .create_room_if_absent(&room_id, kind, &claims.sub)
            .await?;
        if created {
            debug!(%room_id, kind = kind.as_str(), "chat room created");
        } else {
            debug!(%room_id, "room was created concurrently, reusing it");
        }
    }

    let message = state
        .directory
        .append_message(&Uuid::new_v4().to_string(), &room_id, &claims.sub, payload.text.trim())
        .await?;

    // Feed subscribers always get the full re-ordered list, never a delta.
    let snapshot = state.directory.get_room_messages(&room_id).await?;
    state.feeds.publish(&room_id, snapshot);

    Ok(Json(message))
}

/// Current messages of a room, oldest first
#[utoipa::path(
    get,
    path = "/api/chat/rooms/{room_id}/messages",
    params(("room_id" = String, Path, description = "Composite room id, `first--second`")),
    responses(
        (status = 200, description = "Messages in send order", body = [ChatMessage]),
        (status = 401, description = "Caller is not a participant")
    ),
    tag = "chat"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>> {
    member_room(&room_id, &claims.sub)?;

    // A room nobody has written to yet is just an empty conversation.
    let messages = state.directory.get_room_messages(&room_id).await?;
    Ok(Json(messages))
}

/// Live snapshot feed for a room as server-sent events
pub async fn stream_messages(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(room_id): Path<String>,
) -> Result<Sse<impl Stream<Item = std::result::Result<SseEvent, axum::Error>>>> {
    member_room(&room_id, &claims.sub)?;

    // Subscribe before the initial read so no publish is missed; a
    // duplicate snapshot is harmless since every event is the full list.
    let mut rx = state.feeds.subscribe(&room_id);
    let initial = state.directory.get_room_messages(&room_id).await?;

    let stream = async_stream::stream! {
        yield SseEvent::default().event("snapshot").json_data(&initial);

        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if let Some(messages) = snapshot {
                yield SseEvent::default().event("snapshot").json_data(&messages);
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
