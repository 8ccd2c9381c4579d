//! Operation dispatch for the single API endpoint.
//!
//! Requests follow GraphQL's wire shape but no query document is parsed.
//! `operationName` selects the root field to run: either the field name
//! itself (`signupUser`) or the conventional client operation name that
//! wraps it (`SignupUser`). Responses are always keyed by the root field.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    auth::dto::{AuthPayload, LoginInput, LogoutInput, LogoutPayload, SignupInput},
    error::AuthError,
};

pub const HELLO: &str = "Hello from the resume builder API!";

/// Operations exposed on the single API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationName {
    #[serde(alias = "Hello")]
    Hello,
    #[serde(alias = "SignupUser")]
    SignupUser,
    #[serde(alias = "LoginUser")]
    LoginUser,
    #[serde(alias = "LogoutUser")]
    LogoutUser,
}

/// Request body: `{"operationName": "...", "variables": {"input": {...}}}`.
/// Any `query` document sent along is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    pub operation_name: OperationName,
    #[serde(default)]
    pub variables: Option<Value>,
}

#[derive(Debug)]
pub enum Operation {
    Hello,
    SignupUser(SignupInput),
    LoginUser(LoginInput),
    LogoutUser(LogoutInput),
}

#[derive(Deserialize)]
struct Variables<T> {
    input: T,
}

fn input<T: DeserializeOwned>(name: OperationName, variables: Option<Value>) -> Result<T, AuthError> {
    let variables = variables
        .filter(|v| !v.is_null())
        .ok_or_else(|| AuthError::InvalidInput(format!("{name:?} requires variables.input")))?;
    serde_json::from_value::<Variables<T>>(variables)
        .map(|v| v.input)
        .map_err(|e| {
            // Only the error category is surfaced; values may hold credentials.
            debug!(operation = ?name, category = ?e.classify(), "rejected variables");
            AuthError::InvalidInput(format!("Invalid variables for {name:?}"))
        })
}

impl GatewayRequest {
    pub fn into_operation(self) -> Result<Operation, AuthError> {
        let name = self.operation_name;
        Ok(match name {
            OperationName::Hello => Operation::Hello,
            OperationName::SignupUser => Operation::SignupUser(input(name, self.variables)?),
            OperationName::LoginUser => Operation::LoginUser(input(name, self.variables)?),
            OperationName::LogoutUser => {
                let has_input = self
                    .variables
                    .as_ref()
                    .is_some_and(|v| v.get("input").is_some_and(|i| !i.is_null()));
                if has_input {
                    Operation::LogoutUser(input(name, self.variables)?)
                } else {
                    Operation::LogoutUser(LogoutInput::default())
                }
            }
        })
    }
}

/// Success payload keyed by operation name, e.g. `{"signupUser": {...}}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationData {
    Hello(&'static str),
    SignupUser(AuthPayload),
    LoginUser(AuthPayload),
    LogoutUser(LogoutPayload),
}

#[derive(Debug, Serialize)]
pub struct DataEnvelope {
    pub data: OperationData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> Result<Operation, AuthError> {
        serde_json::from_value::<GatewayRequest>(body)
            .expect("request shape")
            .into_operation()
    }

    #[test]
    fn hello_needs_no_variables() {
        assert!(matches!(parse(json!({"operationName": "hello"})), Ok(Operation::Hello)));
        assert!(matches!(
            parse(json!({"operationName": "hello", "variables": {}, "query": "{ hello }"})),
            Ok(Operation::Hello)
        ));
    }

    #[test]
    fn signup_input_is_read_from_variables() {
        let op = parse(json!({
            "operationName": "signupUser",
            "variables": {"input": {
                "name": "Ada", "email": "ada@example.com",
                "password": "secret123", "work": "Engineer"
            }}
        }))
        .expect("signup op");
        match op {
            Operation::SignupUser(input) => assert_eq!(input.email, "ada@example.com"),
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn missing_or_partial_input_is_bad_user_input() {
        let err = parse(json!({"operationName": "loginUser"})).unwrap_err();
        assert_eq!(err.code(), "BAD_USER_INPUT");

        let err = parse(json!({
            "operationName": "loginUser",
            "variables": {"input": {"email": "ada@example.com", "password": 12345678}}
        }))
        .unwrap_err();
        assert_eq!(err.code(), "BAD_USER_INPUT");
        assert!(!err.to_string().contains("12345678"));
    }

    #[test]
    fn logout_without_input_defers_to_header() {
        match parse(json!({"operationName": "logoutUser"})).expect("logout op") {
            Operation::LogoutUser(input) => assert!(input.token.is_none()),
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn client_operation_names_select_the_root_field() {
        let op = parse(json!({
            "operationName": "LoginUser",
            "query": "mutation LoginUser($input: LoginInput!) { loginUser(input: $input) { token } }",
            "variables": {"input": {"email": "ada@example.com", "password": "secret123"}}
        }))
        .expect("login op");
        assert!(matches!(op, Operation::LoginUser(_)));
        assert!(matches!(parse(json!({"operationName": "Hello"})), Ok(Operation::Hello)));
        assert!(matches!(
            parse(json!({"operationName": "LogoutUser"})),
            Ok(Operation::LogoutUser(_))
        ));
    }

    #[test]
    fn unknown_operation_is_rejected() {
        assert!(serde_json::from_value::<GatewayRequest>(json!({"operationName": "dropUsers"})).is_err());
    }

    #[test]
    fn data_is_keyed_by_operation_name() {
        let body = serde_json::to_value(DataEnvelope {
            data: OperationData::Hello(HELLO),
        })
        .unwrap();
        assert_eq!(body, json!({"data": {"hello": HELLO}}));
    }
}
