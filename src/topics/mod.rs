// Topic statistics — aggregation, collocations, salience labels, summaries.

pub mod aggregate;
pub mod bigrams;
pub mod salience;
pub mod stats;
pub mod summary;
pub mod traits;
pub mod vocab;
