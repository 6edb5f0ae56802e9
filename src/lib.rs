// Chat moderation engine: profanity/spam detection plus the escalation
// policy that turns a detection into an enforcement action.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (policy storage)
//
// The chat-platform gateway itself is not part of this crate. A platform
// adapter supplies a `PolicyStore`, an `Actuator` and per-message
// `PrivilegeInfo`, and drives `ModerationService` + `ActionDispatcher`.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a pile of mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;

pub use crate::core::moderation::{
    ActionDispatcher, ActionPolicy, Actuator, DetectionEngine, DetectionResult, GuildPolicy,
    Lexicon, ModAction, ModerationService, PolicyStore, PrivilegeInfo,
};
