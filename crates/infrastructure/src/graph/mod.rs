//! Graph API adapters.

mod profile_client;

pub use profile_client::{GraphClientError, GraphProfileClient, interpret_graph_response};
