//! GraphQL query definitions for the directory data API.

use graphql_client::GraphQLQuery;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/data/schema.graphql",
    query_path = "graphql/data/queries/stores.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug",
    skip_serializing_none
)]
pub struct ListStores;
