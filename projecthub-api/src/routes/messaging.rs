/// Messaging endpoints
///
/// # Endpoints
///
/// - `GET  /v1/conversations` - Caller's conversations with previews
/// - `POST /v1/conversations` - Create a conversation (group or 1:1)
/// - `POST /v1/conversations/find-or-create` - Find or create a 1:1 thread
/// - `GET  /v1/conversations/:id` - Detail; marks unread messages read
/// - `GET  /v1/conversations/:id/messages` - Messages, oldest first
/// - `POST /v1/conversations/:id/messages` - Send a message
/// - `POST /v1/messages/:id/read` - Mark one message read
///
/// Retrieving a conversation is the read event: every message in it not
/// authored by the caller flips to read, in bulk. The flag is shared per
/// message (not per recipient), so in a group thread one reader clears the
/// unread count for everyone; clients rely on this longstanding behavior.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use projecthub_shared::{
    auth::middleware::AuthContext,
    models::{conversation::Conversation, message::Message},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Conversation with preview data for the list view
#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    pub conversation: Conversation,

    /// Most recent message, if any
    pub last_message: Option<Message>,

    /// Unread count from the caller's perspective
    pub unread_count: i64,
}

/// Conversation detail
#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub participant_ids: Vec<Uuid>,
    pub messages: Vec<Message>,
}

/// Conversation creation payload
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    /// Other participants; the caller is always added
    #[validate(length(min = 1, message = "At least one participant is required"))]
    pub participant_ids: Vec<Uuid>,

    /// Display name (group conversations)
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub is_group: bool,

    /// Optional first message to send on creation
    pub initial_message: Option<String>,
}

/// Find-or-create payload
#[derive(Debug, Deserialize)]
pub struct FindOrCreateRequest {
    /// The other account of the 1:1 thread
    pub participant_id: Uuid,
}

/// Send-message payload
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Message content is required"))]
    pub content: String,
}

/// Loads a conversation and checks the caller participates in it
async fn load_joined_conversation(
    state: &AppState,
    id: Uuid,
    auth: &AuthContext,
) -> ApiResult<Conversation> {
    let conversation = Conversation::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;

    let is_participant =
        Conversation::is_participant(&state.db, conversation.id, auth.account_id).await?;
    if !is_participant {
        return Err(ApiError::Forbidden(
            "You are not a participant in this conversation".to_string(),
        ));
    }

    Ok(conversation)
}

/// Caller's conversations, most recently active first, with previews
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<ConversationSummary>>> {
    let conversations = Conversation::list_for_account(&state.db, auth.account_id).await?;

    let mut summaries = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let last_message = Conversation::last_message(&state.db, conversation.id).await?;
        let unread_count =
            Conversation::unread_count(&state.db, conversation.id, auth.account_id).await?;

        summaries.push(ConversationSummary {
            conversation,
            last_message,
            unread_count,
        });
    }

    Ok(Json(summaries))
}

/// Create a conversation
pub async fn create_conversation(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateConversationRequest>,
) -> ApiResult<Json<ConversationDetail>> {
    req.validate().map_err(ApiError::from_validation)?;

    let conversation = Conversation::create(
        &state.db,
        &req.name,
        req.is_group,
        auth.account_id,
        &req.participant_ids,
    )
    .await?;

    if let Some(content) = req.initial_message.as_deref() {
        if !content.is_empty() {
            Message::create(&state.db, conversation.id, auth.account_id, content).await?;
        }
    }

    let participant_ids = Conversation::participants(&state.db, conversation.id).await?;
    let messages = Message::list_for_conversation(&state.db, conversation.id).await?;

    Ok(Json(ConversationDetail {
        conversation,
        participant_ids,
        messages,
    }))
}

/// Find the 1:1 conversation with another account, creating it if absent
///
/// Calling this twice with the same counterpart returns the same
/// conversation; it never creates a duplicate.
pub async fn find_or_create_conversation(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<FindOrCreateRequest>,
) -> ApiResult<Json<ConversationDetail>> {
    if req.participant_id == auth.account_id {
        return Err(ApiError::BadRequest(
            "Cannot start a conversation with yourself".to_string(),
        ));
    }

    let (conversation, _created) =
        Conversation::find_or_create_direct(&state.db, auth.account_id, req.participant_id).await?;

    let participant_ids = Conversation::participants(&state.db, conversation.id).await?;
    let messages = Message::list_for_conversation(&state.db, conversation.id).await?;

    Ok(Json(ConversationDetail {
        conversation,
        participant_ids,
        messages,
    }))
}

/// Conversation detail; retrieving it marks unread messages read
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ConversationDetail>> {
    let conversation = load_joined_conversation(&state, id, &auth).await?;

    // The retrieve is the read event: bulk-mark everything not sent by the
    // caller, regardless of age
    Conversation::mark_read(&state.db, conversation.id, auth.account_id).await?;

    let participant_ids = Conversation::participants(&state.db, conversation.id).await?;
    let messages = Message::list_for_conversation(&state.db, conversation.id).await?;

    Ok(Json(ConversationDetail {
        conversation,
        participant_ids,
        messages,
    }))
}

/// Messages in a conversation, oldest first
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Message>>> {
    let conversation = load_joined_conversation(&state, id, &auth).await?;

    let messages = Message::list_for_conversation(&state.db, conversation.id).await?;
    Ok(Json(messages))
}

/// Send a message (participants only)
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<Message>> {
    req.validate().map_err(ApiError::from_validation)?;

    let conversation = load_joined_conversation(&state, id, &auth).await?;

    let message =
        Message::create(&state.db, conversation.id, auth.account_id, &req.content).await?;

    Ok(Json(message))
}

/// Mark a single message read
pub async fn mark_message_read(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let message = Message::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    let is_participant =
        Conversation::is_participant(&state.db, message.conversation_id, auth.account_id).await?;
    if !is_participant {
        return Err(ApiError::Forbidden(
            "You are not a participant in this conversation".to_string(),
        ));
    }

    Message::mark_as_read(&state.db, message.id).await?;

    Ok(Json(serde_json::json!({
        "status": "message marked as read"
    })))
}
