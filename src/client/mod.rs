pub mod query;
pub mod rest_client;
pub mod rest_client_error;
