/// Data layer: statistics source, name lookup, series and trend.
///
/// Architecture:
/// ```text
///   PxWeb table (GET metadata / POST query)
///        │
///        ▼
///   ┌──────────┐
///   │  client   │  HTTP + JSON → TableMetadata / QueryResponse
///   └──────────┘
///        │                         │
///        ▼                         ▼
///   ┌───────────┐           ┌──────────┐
///   │ directory  │ name→code │ fetcher   │ rows → Series per measurement
///   └───────────┘           └──────────┘
///                                  │
///                                  ▼
///                           ┌─────────────┐
///                           │ extrapolate  │ mean-delta next point
///                           └─────────────┘
/// ```

pub mod client;
pub mod directory;
pub mod extrapolate;
pub mod fetcher;
pub mod model;

#[cfg(test)]
pub mod test_server;
