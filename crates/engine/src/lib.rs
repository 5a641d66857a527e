pub mod cell;
pub mod column;
pub mod stats;
pub mod table;
