//! Effect system for card abilities.
//!
//! - `CardEffect`: verb + target spec + condition + parameters
//! - `targeting`: candidate sets, stat filters and context gates
//! - `EffectAction`: one handler object per verb, looked up by `action_for`
//! - `EffectManager`: trigger dispatch, selection, passive auras, bans

mod actions;
mod effect;
mod manager;
mod targeting;

pub use actions::{action_for, EffectAction, EffectInvocation};
pub use effect::{BanKind, CardEffect, Chooser, EffectCondition, EffectParams, EffectVerb, Stat, StatMode};
pub use manager::EffectManager;
pub use targeting::{
    candidates, context_holds, filter_targets, CompareOp, ContextCondition, StatFilter, Target,
    TargetGroup, TargetSelect, TargetSpec,
};
