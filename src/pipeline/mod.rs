// Orchestration — loading inputs and running the core end to end.

pub mod summarize;
