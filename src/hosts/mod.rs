pub mod omnibox;
pub mod workflow;
