// Core moderation module - text normalization, profanity/spam detection and
// the action-escalation policy.

pub mod action_policy;
pub mod detection_engine;
pub mod enforcement;
pub mod lexicon;
pub mod moderation_models;
pub mod moderation_service;
pub mod normalizer;

pub use action_policy::*;
pub use detection_engine::*;
pub use enforcement::*;
pub use lexicon::*;
pub use moderation_models::*;
pub use moderation_service::*;
pub use normalizer::*;
