pub mod entries;
pub mod participants;
pub mod ranking;
