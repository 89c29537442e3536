pub mod data;
pub mod goal;
pub mod replay;
pub mod reset;
pub mod stats;
pub mod tracking;
