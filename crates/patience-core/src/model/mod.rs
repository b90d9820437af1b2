pub mod deck;
pub mod rank;
pub mod visible;
