//! GraphQL client for integration testing.
//!
//! Executes GraphQL queries directly against the schema without HTTP overhead.

use std::sync::Arc;

use collab_core::common::Actor;
use collab_core::kernel::ServerDeps;
use collab_core::server::graphql::{create_schema, GraphQLContext, Schema};
use collab_core::server::middleware::AuthUser;
use juniper::Variables;
use serde_json::Value;

/// GraphQL client for executing queries and mutations in tests.
pub struct GraphQLClient {
    schema: Schema,
    context: GraphQLContext,
}

/// A field error as returned to API clients.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    pub message: String,
    /// `extensions.kind`
    pub kind: Option<String>,
    pub extensions: Value,
}

/// Result of a GraphQL execution.
#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResult {
    /// Returns true if the execution had no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// Kind of the first error, panicking if the execution succeeded.
    pub fn error_kind(&self) -> String {
        let error = self.errors.first().expect("expected a GraphQL error");
        error.kind.clone().expect("error has no kind extension")
    }

    /// Gets a value at the given JSON path.
    ///
    /// # Example
    /// ```ignore
    /// let title = result.get("createCollaborationRequest.title").as_str();
    /// ```
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = &current[key];
        }
        current.clone()
    }
}

impl GraphQLClient {
    /// Client without an authenticated caller.
    pub fn anonymous(deps: Arc<ServerDeps>) -> Self {
        Self::with_context(GraphQLContext::new(deps, None))
    }

    /// Client acting as `actor`.
    pub fn authenticated(deps: Arc<ServerDeps>, actor: Actor) -> Self {
        Self::with_context(GraphQLContext::new(deps, Some(AuthUser { actor })))
    }

    pub fn with_context(context: GraphQLContext) -> Self {
        Self {
            schema: create_schema(),
            context,
        }
    }

    /// Execute a GraphQL query/mutation.
    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    /// Execute a GraphQL query/mutation with variables.
    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let (result, errors) =
            juniper::execute(query, None, &self.schema, &variables, &self.context)
                .await
                .expect("GraphQL execution failed");

        let data = Some(serde_json::to_value(&result).expect("Failed to serialize GraphQL result"));

        let errors = errors
            .iter()
            .map(|e| {
                let json = serde_json::to_value(e).expect("Failed to serialize GraphQL error");
                GraphQLError {
                    message: json["message"].as_str().unwrap_or_default().to_string(),
                    kind: json["extensions"]["kind"].as_str().map(str::to_string),
                    extensions: json["extensions"].clone(),
                }
            })
            .collect();

        GraphQLResult { data, errors }
    }

    /// Execute a query and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }

    /// Execute a query with variables and expect success.
    pub async fn query_with_vars(&self, query: &str, variables: Variables) -> Value {
        self.execute_with_vars(query, variables).await.unwrap()
    }
}
