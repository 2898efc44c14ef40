// topiclens: summarized, ranked topic statistics from per-word topic assignments
//
// This is the library root. Each module corresponds to a stage of the
// pipeline: corpus input, topic statistics, orchestration, and output.

pub mod config;
pub mod corpus;
pub mod output;
pub mod pipeline;
pub mod topics;
