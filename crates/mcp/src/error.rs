use rmcp::model::ErrorCode;
use rmcp::ErrorData as McpError;
use serde_json::json;
use stand_core::GameError;

/// Maps core failures onto JSON-RPC error codes.
pub fn to_mcp_error(err: GameError) -> McpError {
    let message = err.to_string();
    match err {
        GameError::NotFound(game_id) => {
            McpError::invalid_request("Game not found", Some(json!({ "gameId": game_id })))
        }
        GameError::InvalidRequest(_) => McpError::invalid_params(message, None),
        GameError::UnknownOperation(_) => McpError::new(ErrorCode::METHOD_NOT_FOUND, message, None),
        GameError::IllegalTransition { operation, status } => McpError::invalid_request(
            message,
            Some(json!({ "operation": operation, "status": status })),
        ),
        GameError::InsufficientFunds { .. } => McpError::invalid_request(message, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stand_core::{Operation, Status};

    #[test]
    fn missing_game_keeps_the_familiar_message() {
        let err = to_mcp_error(GameError::NotFound("abc".to_string()));
        assert_eq!(err.code, ErrorCode::INVALID_REQUEST);
        assert_eq!(err.message, "Game not found");
        assert_eq!(err.data, Some(json!({ "gameId": "abc" })));
    }

    #[test]
    fn codes_follow_the_failure_kind() {
        let invalid = to_mcp_error(GameError::invalid("price is required"));
        assert_eq!(invalid.code, ErrorCode::INVALID_PARAMS);

        let unknown = to_mcp_error(GameError::UnknownOperation("juggle".to_string()));
        assert_eq!(unknown.code, ErrorCode::METHOD_NOT_FOUND);

        let illegal = to_mcp_error(GameError::IllegalTransition {
            operation: Operation::SellLemonade,
            status: Status::Buying,
        });
        assert_eq!(illegal.code, ErrorCode::INVALID_REQUEST);
        assert_eq!(
            illegal.data,
            Some(json!({ "operation": "sell_lemonade", "status": "buying" }))
        );
    }
}
