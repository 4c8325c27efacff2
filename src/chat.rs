use tauri::State;
use tokio::sync::Mutex;

use crate::models::{ChatMessage, ChatRole};
use crate::AppState;

/// In-memory conversation log, alive for the process lifetime only.
#[derive(Default)]
pub struct ChatLog {
    messages: Mutex<Vec<ChatMessage>>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, message: ChatMessage) {
        self.messages.lock().await.push(message);
    }

    /// Oldest first, the order a transcript renders in.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.messages.lock().await.clear();
    }
}

#[tauri::command]
pub async fn send_chat_message(
    state: State<'_, AppState>,
    text: String,
    plant_id: Option<i64>,
) -> Result<ChatMessage, String> {
    // Append before the call so a failed completion still leaves the
    // question visible in the transcript.
    let question = ChatMessage::new(ChatRole::User, text.clone(), plant_id);
    state.chat.append(question).await;

    let completion = state
        .api
        .send_chat(&text, plant_id)
        .await
        .map_err(|e| state.surface_api_error(e))?;

    let reply = ChatMessage::new(ChatRole::Assistant, completion.reply, plant_id);
    state.chat.append(reply.clone()).await;
    Ok(reply)
}

#[tauri::command]
pub async fn get_chat_history(state: State<'_, AppState>) -> Result<Vec<ChatMessage>, String> {
    Ok(state.chat.history().await)
}

#[tauri::command]
pub async fn clear_chat(state: State<'_, AppState>) -> Result<(), String> {
    state.chat.clear().await;
    Ok(())
}
