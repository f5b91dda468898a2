mod common;
mod performance;
mod share;
