//! Ownership checks for single-resource requests

use async_trait::async_trait;
use qsl_db::{Database, DbError, Qsl};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;
use crate::middleware::Principal;

/// A resource with exactly one owning user
pub trait Owned {
    fn owner_id(&self) -> &str;
}

impl Owned for Qsl {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

/// Loads a resource by id, always from the store
#[async_trait]
pub trait ResourceLoader<R>: Send + Sync {
    async fn load(&self, id: &str) -> Result<Option<R>, DbError>;
}

#[async_trait]
impl ResourceLoader<Qsl> for Database {
    async fn load(&self, id: &str) -> Result<Option<Qsl>, DbError> {
        self.get_qsl(id).await
    }
}

/// Load `raw_id` and return it only if `principal` owns it
///
/// Missing and foreign resources are reported separately (`NotFound` vs
/// `NotOwned`).
pub async fn authorize<R, L>(loader: &L, raw_id: &str, principal: &Principal) -> Result<R, AuthError>
where
    R: Owned + Send,
    L: ResourceLoader<R> + ?Sized,
{
    let id = raw_id.trim();
    let id = Uuid::parse_str(id)
        .map_err(|_| {
            debug!("Invalid resource id: {:?}", raw_id);
            AuthError::InvalidIdentifier
        })?
        .to_string();

    let resource = loader.load(&id).await?.ok_or(AuthError::NotFound)?;

    if resource.owner_id() != principal.id {
        debug!("{} tried to access {} owned by another user", principal.callsign, id);
        return Err(AuthError::NotOwned);
    }

    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        owner: String,
        text: String,
    }

    impl Owned for Note {
        fn owner_id(&self) -> &str {
            &self.owner
        }
    }

    struct Notes(HashMap<String, Note>);

    #[async_trait]
    impl ResourceLoader<Note> for Notes {
        async fn load(&self, id: &str) -> Result<Option<Note>, DbError> {
            Ok(self.0.get(id).cloned())
        }
    }

    const NOTE_ID: &str = "6f9619ff-8b86-4011-b42d-00c04fc964ff";

    fn notes() -> Notes {
        let mut map = HashMap::new();
        map.insert(
            NOTE_ID.to_string(),
            Note {
                owner: "alice".to_string(),
                text: "73".to_string(),
            },
        );
        Notes(map)
    }

    fn principal(id: &str) -> Principal {
        Principal {
            id: id.to_string(),
            callsign: id.to_uppercase(),
            token_expiration: None,
        }
    }

    #[tokio::test]
    async fn test_owner_gets_resource() {
        let note: Note = authorize(&notes(), NOTE_ID, &principal("alice")).await.unwrap();
        assert_eq!(note.text, "73");
    }

    #[tokio::test]
    async fn test_id_is_trimmed_and_normalized() {
        let padded = format!("  {}  ", NOTE_ID.to_uppercase());
        let note: Note = authorize(&notes(), &padded, &principal("alice")).await.unwrap();
        assert_eq!(note.owner, "alice");
    }

    #[tokio::test]
    async fn test_other_principal_is_not_owned() {
        let result: Result<Note, _> = authorize(&notes(), NOTE_ID, &principal("bob")).await;
        assert!(matches!(result, Err(AuthError::NotOwned)));
    }

    #[tokio::test]
    async fn test_missing_resource_is_not_found() {
        let result: Result<Note, _> = authorize(
            &notes(),
            "00000000-0000-4000-8000-000000000000",
            &principal("alice"),
        )
        .await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_malformed_id_is_invalid_identifier() {
        let result: Result<Note, _> = authorize(&notes(), "not-an-id", &principal("alice")).await;
        assert!(matches!(result, Err(AuthError::InvalidIdentifier)));
    }

    #[tokio::test]
    async fn test_database_loader() {
        let db = Database::in_memory().await.unwrap();
        let result: Result<Qsl, _> = authorize(&db, NOTE_ID, &principal("alice")).await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }
}
