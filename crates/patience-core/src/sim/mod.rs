pub mod batch;
pub mod tally;
