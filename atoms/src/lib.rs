//! Marketplace domain atoms: records, DynamoDB services and lambda handlers.
//! Atoms take clients as arguments and never read global state.

pub mod listings;
pub mod media;
