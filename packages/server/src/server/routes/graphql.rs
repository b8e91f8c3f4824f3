//! HTTP entry points for the collaboration GraphQL API.
//!
//! `POST /graphql` runs one operation against the schema with the caller's
//! `GraphQLContext`. Parse and validation failures answer 400; field errors
//! (forbidden, invalid transition, ...) still answer 200 with `errors[]`.

use crate::server::graphql::{GraphQLContext, Schema};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use juniper::http::GraphQLRequest;
use std::sync::Arc;

/// Execute one GraphQL operation.
pub async fn graphql_handler(
    State(schema): State<Arc<Schema>>,
    Extension(context): Extension<GraphQLContext>,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    let response = request.execute(&schema, &context).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(response)).into_response()
}

/// GraphiQL, preloaded with the caller's own requests. Debug builds only.
pub async fn graphql_playground() -> Html<&'static str> {
    Html(PLAYGROUND_HTML)
}

const PLAYGROUND_HTML: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <title>Collaboration API</title>
    <style>
        body {
            height: 100%;
            margin: 0;
            width: 100%;
            overflow: hidden;
        }
        #graphiql {
            height: 100vh;
        }
    </style>
    <script
        crossorigin
        src="https://unpkg.com/react@18/umd/react.production.min.js"
    ></script>
    <script
        crossorigin
        src="https://unpkg.com/react-dom@18/umd/react-dom.production.min.js"
    ></script>
    <link rel="stylesheet" href="https://unpkg.com/graphiql/graphiql.min.css" />
</head>
<body>
    <div id="graphiql">Loading...</div>
    <script
        src="https://unpkg.com/graphiql/graphiql.min.js"
        type="application/javascript"
    ></script>
    <script>
        const fetcher = GraphiQL.createFetcher({
            url: '/graphql',
        });
        const defaultQuery = `{
  myCollaborationRequests(status: PENDING) {
    items { id title status budget { min max currency } }
    pageInfo { page total pages }
  }
}`;

        ReactDOM.render(
            React.createElement(GraphiQL, {
                fetcher: fetcher,
                defaultQuery: defaultQuery,
                defaultHeaders: '{"Authorization": "Bearer <token>"}',
                headerEditorEnabled: true,
            }),
            document.getElementById('graphiql'),
        );
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::graphql::create_schema;
    use crate::kernel::TestDependencies;

    fn request(query: &str) -> Json<GraphQLRequest> {
        Json(GraphQLRequest::new(query.to_string(), None, None))
    }

    fn anonymous_context() -> GraphQLContext {
        GraphQLContext::new(Arc::new(TestDependencies::new().into_server_deps()), None)
    }

    #[tokio::test]
    async fn test_field_errors_answer_ok() {
        let response = graphql_handler(
            State(Arc::new(create_schema())),
            Extension(anonymous_context()),
            request("{ myCollaborationRequests { items { id } } }"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_field_answers_bad_request() {
        let response = graphql_handler(
            State(Arc::new(create_schema())),
            Extension(anonymous_context()),
            request("{ noSuchField }"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_playground_targets_graphql_endpoint() {
        let Html(page) = graphql_playground().await;
        assert!(page.contains("url: '/graphql'"));
        assert!(page.contains("myCollaborationRequests"));
    }
}
