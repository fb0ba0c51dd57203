//! Error sanitization for client-facing messages.
//!
//! Prevents leaking internal details (paths, SQL errors, content bugs) to clients.

use donjon_shared::{ErrorCode, ServerMessage};

use crate::use_cases::ActionError;

/// Sanitize a repository error.
///
/// Logs the full error server-side, returns a generic message for the client.
pub fn sanitize_repo_error<E: std::fmt::Display>(error: &E, operation: &str) -> String {
    tracing::error!(
        error = %error,
        operation = operation,
        "Repository error"
    );

    format!("Failed to {} - please try again", operation)
}

/// Turn a failed action into the `Error` frame sent to the requester.
pub fn action_error_response(error: &ActionError, operation: &str) -> ServerMessage {
    match error {
        ActionError::SessionNotFound(_) => {
            ServerMessage::error(ErrorCode::NotFound, "Session not found")
        }
        ActionError::NotFound { entity, id } => {
            ServerMessage::error(ErrorCode::NotFound, format!("Unknown {entity}: {id}"))
        }
        ActionError::Invalid(message) => ServerMessage::error(ErrorCode::BadRequest, message),
        ActionError::InvalidState(message) => ServerMessage::error(ErrorCode::Conflict, message),
        ActionError::InventoryFull { .. } => {
            ServerMessage::error(ErrorCode::Conflict, error.to_string())
        }
        ActionError::NotHost(_) => ServerMessage::error(ErrorCode::Forbidden, error.to_string()),
        ActionError::Content(message) => {
            tracing::error!(error = %message, operation, "Game content is inconsistent");
            ServerMessage::error(
                ErrorCode::InternalError,
                format!("Failed to {} - game content is invalid", operation),
            )
        }
        ActionError::Repo(e) => {
            ServerMessage::error(ErrorCode::InternalError, sanitize_repo_error(e, operation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::RepoError;
    use donjon_domain::SessionId;

    fn code_of(message: ServerMessage) -> (ErrorCode, String) {
        match message {
            ServerMessage::Error { code, message } => (code, message),
            other => panic!("expected an error frame, got {other:?}"),
        }
    }

    #[test]
    fn repo_errors_are_sanitized() {
        let error = ActionError::Repo(RepoError::database(
            "save",
            "disk I/O error at /var/lib/donjon/sessions.db",
        ));

        let (code, message) = code_of(action_error_response(&error, "confirm roll"));
        assert_eq!(code, ErrorCode::InternalError);
        assert_eq!(message, "Failed to confirm roll - please try again");
        assert!(!message.contains("/var/lib"));
    }

    #[test]
    fn content_errors_hide_details() {
        let error = ActionError::Content("boss boss_lich missing from enemies".into());
        let (code, message) = code_of(action_error_response(&error, "start game"));
        assert_eq!(code, ErrorCode::InternalError);
        assert!(!message.contains("boss_lich"));
    }

    #[test]
    fn client_mistakes_keep_their_message() {
        let (code, message) = code_of(action_error_response(
            &ActionError::invalid_state("no active combat"),
            "confirm roll",
        ));
        assert_eq!(code, ErrorCode::Conflict);
        assert_eq!(message, "no active combat");

        let (code, _) = code_of(action_error_response(
            &ActionError::Invalid("max_hp must be positive".into()),
            "select character",
        ));
        assert_eq!(code, ErrorCode::BadRequest);
    }

    #[test]
    fn lookup_failures_are_not_found() {
        let (code, _) = code_of(action_error_response(
            &ActionError::SessionNotFound(SessionId::new()),
            "join session",
        ));
        assert_eq!(code, ErrorCode::NotFound);

        let (code, message) = code_of(action_error_response(
            &ActionError::not_found("item", "potion_soin"),
            "use item",
        ));
        assert_eq!(code, ErrorCode::NotFound);
        assert_eq!(message, "Unknown item: potion_soin");
    }

    #[test]
    fn host_only_actions_are_forbidden() {
        let (code, _) = code_of(action_error_response(
            &ActionError::NotHost("force the round"),
            "force round",
        ));
        assert_eq!(code, ErrorCode::Forbidden);
    }
}
