// src/fetch/mod.rs
// =============================================================================
// Everything that talks to the network.
//
// Submodules:
// - resolve: turns user input into an absolute URL
// - retrieve: downloads a resource with manual redirects and timeouts
// =============================================================================

mod resolve;
mod retrieve;

pub use resolve::resolve_input;
pub use retrieve::{RequestOptions, RetrievalError, RetrievalOutcome, Retriever};
