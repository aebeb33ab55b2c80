//! One-shot notifications carried across a redirect in the session.

use tower_sessions::Session;

use super::AppError;

const FLASH_KEY: &str = "_flashes";

/// Queue a message for the next rendered page.
pub async fn push(session: &Session, message: impl Into<String>) -> Result<(), AppError> {
    let mut queue: Vec<String> = session.get(FLASH_KEY).await?.unwrap_or_default();
    queue.push(message.into());
    session.insert(FLASH_KEY, queue).await?;
    Ok(())
}

/// Drain the queue. Messages are returned once and then gone.
pub async fn take(session: &Session) -> Result<Vec<String>, AppError> {
    Ok(session
        .remove::<Vec<String>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_messages_are_read_once_in_order() {
        let session = session();
        push(&session, "Item created.").await.unwrap();
        push(&session, "Goodbye.").await.unwrap();

        assert_eq!(take(&session).await.unwrap(), vec!["Item created.", "Goodbye."]);
        assert!(take(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_queue() {
        assert!(take(&session()).await.unwrap().is_empty());
    }
}
