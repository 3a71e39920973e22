//! JSON card data loader.
//!
//! Card sets are a JSON array of records:
//!
//! ```json
//! { "id": 7, "name": "Grave Beetle", "power": 3, "keywords": [],
//!   "trigger": "ON_DEATH", "set": "FIRST_CONTACT", "copies": 1,
//!   "effects": [ { "type": "DESTROY",
//!                  "target": { "group": "ENEMIES", "select": "CHOOSE", "count": 1 },
//!                  "condition": { "stat": "POWER", "operator": "LTE", "value": 4 } } ] }
//! ```
//!
//! Older records use a single `ability { code, target, value, condition,
//! condition_value }` instead of `effects`. A record that fails to parse is
//! logged and skipped; the rest of the set still loads.

use std::path::Path;

use serde::Deserialize;

use super::definition::{CardDefinition, CardId, Trigger};
use super::keyword::{Keyword, KeywordSet};
use super::registry::CardRegistry;
use crate::core::{GameLogger, LoadError};
use crate::effects::{
    BanKind, CardEffect, Chooser, CompareOp, ContextCondition, EffectCondition, EffectVerb, Stat,
    StatFilter, StatMode, TargetGroup, TargetSelect, TargetSpec,
};
use crate::zones::Zone;

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct RawCard {
    id: u32,
    name: String,
    power: i32,
    #[serde(default)]
    keywords: Vec<String>,
    trigger: Option<String>,
    #[serde(default)]
    set: String,
    #[serde(default = "one")]
    copies: u32,
    #[serde(default)]
    effects: Vec<RawEffect>,
    ability: Option<RawAbility>,
}

#[derive(Debug, Deserialize)]
struct RawEffect {
    #[serde(rename = "type")]
    verb: String,
    target: RawTarget,
    condition: Option<RawCondition>,
    #[serde(default)]
    params: RawParams,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    group: String,
    zone: Option<String>,
    select: Option<String>,
    count: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    context: Option<String>,
    stat: Option<String>,
    operator: Option<String>,
    value: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct RawParams {
    stat: Option<String>,
    mode: Option<String>,
    amount: Option<i32>,
    #[serde(default)]
    keywords: Vec<String>,
    destination: Option<String>,
    copy_from: Option<String>,
    ban: Option<String>,
    chooser: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAbility {
    code: String,
    target: Option<String>,
    value: Option<i32>,
    condition: Option<String>,
    condition_value: Option<i32>,
}

/// Loads card sets, logging and skipping bad records.
pub struct CardLoader<'a> {
    logger: &'a dyn GameLogger,
}

impl<'a> CardLoader<'a> {
    pub fn new(logger: &'a dyn GameLogger) -> Self {
        Self { logger }
    }

    /// Load a set from a JSON file.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<CardRegistry, LoadError> {
        let text = std::fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// Load a set from JSON text.
    ///
    /// Only a document that is not a JSON array is an error.
    pub fn load_str(&self, json: &str) -> Result<CardRegistry, LoadError> {
        let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut registry = CardRegistry::new();

        for (position, record) in records.into_iter().enumerate() {
            let parsed = parse_record(record)
                .and_then(|(def, copies)| registry.register(def, copies).map(|_| ()));
            if let Err(err) = parsed {
                self.logger
                    .error(format_args!("skipping card record {position}: {err}"));
            }
        }

        self.logger.info(format_args!(
            "loaded {} card definitions ({} cards)",
            registry.len(),
            registry.pool().len()
        ));
        Ok(registry)
    }
}

fn parse_record(record: serde_json::Value) -> Result<(CardDefinition, u32), LoadError> {
    let raw: RawCard = serde_json::from_value(record)?;
    let name = raw.name.clone();
    let invalid = |reason: String| LoadError::invalid(name.clone(), reason);

    let mut def = CardDefinition::creature(raw.name, raw.power)
        .with_id(CardId(raw.id))
        .with_set(raw.set);

    def.keywords = parse_keywords(&raw.keywords).map_err(&invalid)?;

    if let Some(trigger) = &raw.trigger {
        let trigger =
            Trigger::parse(trigger).ok_or_else(|| invalid(format!("unknown trigger {trigger}")))?;
        def = def.with_trigger(trigger);
    }

    for effect in &raw.effects {
        def = def.with_effect(parse_effect(effect).map_err(&invalid)?);
    }
    if let Some(ability) = &raw.ability {
        def = def.with_effect(legacy_effect(ability).map_err(&invalid)?);
    }

    if raw.copies == 0 {
        return Err(invalid("copies must be at least 1".to_string()));
    }
    Ok((def, raw.copies))
}

fn lookup<T>(kind: &str, name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T, String> {
    parse(name).ok_or_else(|| format!("unknown {kind} {name}"))
}

fn parse_keywords(names: &[String]) -> Result<KeywordSet, String> {
    names
        .iter()
        .map(|n| lookup("keyword", n, Keyword::parse))
        .collect()
}

fn parse_effect(raw: &RawEffect) -> Result<CardEffect, String> {
    let verb = lookup("effect", &raw.verb, EffectVerb::parse)?;
    let mut effect = CardEffect::new(verb, parse_target(&raw.target)?);

    if let Some(condition) = &raw.condition {
        effect.condition = Some(parse_condition(condition)?);
    }

    let params = &raw.params;
    let p = &mut effect.params;
    p.stat = params
        .stat
        .as_deref()
        .map(|s| lookup("stat", s, parse_stat))
        .transpose()?;
    if let Some(mode) = &params.mode {
        p.mode = lookup("mode", mode, parse_mode)?;
    }
    p.amount = params.amount.unwrap_or(0);
    p.keywords = parse_keywords(&params.keywords)?;
    p.destination = params
        .destination
        .as_deref()
        .map(|z| lookup("zone", z, Zone::parse))
        .transpose()?;
    p.copy_from = params
        .copy_from
        .as_deref()
        .map(|g| lookup("group", g, TargetGroup::parse))
        .transpose()?;
    p.ban = params
        .ban
        .as_deref()
        .map(|b| lookup("ban", b, parse_ban))
        .transpose()?;
    if let Some(chooser) = &params.chooser {
        p.chooser = lookup("chooser", chooser, parse_chooser)?;
    }

    if verb == EffectVerb::ModifyStat && p.stat.is_none() {
        return Err("MODIFY_STAT needs params.stat".to_string());
    }
    if verb == EffectVerb::Ban && p.ban.is_none() {
        return Err("BAN needs params.ban".to_string());
    }
    Ok(effect)
}

fn parse_target(raw: &RawTarget) -> Result<TargetSpec, String> {
    let mut spec = TargetSpec::group(lookup("group", &raw.group, TargetGroup::parse)?);
    spec.zone = raw
        .zone
        .as_deref()
        .map(|z| lookup("zone", z, Zone::parse))
        .transpose()?;
    let count = raw.count.unwrap_or(1);
    if count == 0 {
        return Err("target count must be at least 1".to_string());
    }
    spec.select = match raw.select.as_deref() {
        None | Some("ALL") => TargetSelect::All,
        Some("CHOOSE") => TargetSelect::Choose(count),
        Some("RANDOM") => TargetSelect::Random(count),
        Some(other) => return Err(format!("unknown select {other}")),
    };
    Ok(spec)
}

fn parse_condition(raw: &RawCondition) -> Result<EffectCondition, String> {
    if let Some(context) = &raw.context {
        return Ok(EffectCondition::Context(lookup(
            "condition",
            context,
            ContextCondition::parse,
        )?));
    }
    let stat = raw.stat.as_deref().ok_or("condition needs context or stat")?;
    let op = raw.operator.as_deref().ok_or("stat condition needs operator")?;
    Ok(EffectCondition::Stat(StatFilter {
        stat: lookup("stat", stat, parse_stat)?,
        op: lookup("operator", op, CompareOp::parse)?,
        value: raw.value.ok_or("stat condition needs value")?,
    }))
}

fn parse_stat(name: &str) -> Option<Stat> {
    match name {
        "HP" => Some(Stat::Hp),
        "POWER" => Some(Stat::Power),
        _ => None,
    }
}

fn parse_mode(name: &str) -> Option<StatMode> {
    match name {
        "ADD" => Some(StatMode::Add),
        "SUB" => Some(StatMode::Sub),
        "SET" => Some(StatMode::Set),
        "COPY" => Some(StatMode::Copy),
        _ => None,
    }
}

fn parse_ban(name: &str) -> Option<BanKind> {
    match name {
        "ON_PLAY_TRIGGER" | "TRIGGER_ON_PLAY" => Some(BanKind::OnPlayTrigger),
        "ATTACK" => Some(BanKind::Attack),
        "BLOCK" => Some(BanKind::Block),
        _ => None,
    }
}

fn parse_chooser(name: &str) -> Option<Chooser> {
    match name {
        "OWNER" | "SELF" => Some(Chooser::Owner),
        "OPPONENT" => Some(Chooser::Opponent),
        _ => None,
    }
}

/// Target strings of the legacy shape. The singular forms pick one card.
fn legacy_target(name: &str) -> Option<TargetSpec> {
    let choose_one = TargetSelect::Choose(1);
    Some(match name {
        "ENEMY" => TargetSpec::group(TargetGroup::Enemies).with_select(choose_one),
        "ALLY" => TargetSpec::group(TargetGroup::Allies).with_select(choose_one),
        "ANY_CREATURE" => TargetSpec::group(TargetGroup::Any).with_select(choose_one),
        other => TargetSpec::group(TargetGroup::parse(other)?),
    })
}

fn legacy_condition(raw: &RawAbility) -> Result<Option<EffectCondition>, String> {
    let Some(name) = raw.condition.as_deref() else {
        return Ok(None);
    };
    if let Some(context) = ContextCondition::parse(name) {
        return Ok(Some(EffectCondition::Context(context)));
    }
    let op = name
        .strip_prefix("POWER_")
        .and_then(CompareOp::parse)
        .ok_or_else(|| format!("unknown condition {name}"))?;
    let value = raw
        .condition_value
        .ok_or_else(|| format!("condition {name} needs condition_value"))?;
    Ok(Some(EffectCondition::Stat(StatFilter::power(op, value))))
}

fn legacy_effect(raw: &RawAbility) -> Result<CardEffect, String> {
    let value = raw.value.unwrap_or(1);
    let target = |default: TargetSpec| -> Result<TargetSpec, String> {
        match raw.target.as_deref() {
            Some(name) => lookup("target", name, legacy_target),
            None => Ok(default),
        }
    };
    let enemy = TargetSpec::group(TargetGroup::Enemies).with_select(TargetSelect::Choose(1));

    let mut effect = match raw.code.as_str() {
        "DAMAGE" => CardEffect::damage(target(TargetSpec::group(TargetGroup::Opponent))?, value),
        "HEAL" => CardEffect::heal(target(TargetSpec::group(TargetGroup::Owner))?, value),
        "BOOST" => CardEffect::power(target(TargetSpec::group(TargetGroup::SelfCard))?, value),
        "WEAKEN" => CardEffect::power(target(enemy)?, -value),
        "DESTROY" => CardEffect::new(EffectVerb::Destroy, target(enemy)?),
        "STEAL" => CardEffect::new(
            EffectVerb::Steal,
            target(
                TargetSpec::group(TargetGroup::Opponent)
                    .in_zone(Zone::Hand)
                    .with_select(TargetSelect::Random(1)),
            )?,
        ),
        "DISCARD" => CardEffect::new(
            EffectVerb::Discard,
            TargetSpec::group(TargetGroup::Opponent)
                .in_zone(Zone::Hand)
                .with_select(TargetSelect::Choose(value.clamp(1, u8::MAX as i32) as u8)),
        )
        .with_chooser(Chooser::Opponent),
        "RECLAIM" => CardEffect::new(
            EffectVerb::Play,
            TargetSpec::group(TargetGroup::Owner)
                .in_zone(Zone::Discard)
                .with_select(TargetSelect::Choose(1)),
        ),
        "BOUNCE" => CardEffect::new(EffectVerb::Move, target(enemy)?).with_destination(Zone::Hand),
        "SILENCE" => CardEffect::ban(
            TargetSpec::group(TargetGroup::Opponent),
            BanKind::OnPlayTrigger,
        ),
        other => return Err(format!("unknown ability code {other}")),
    };

    if let Some(condition) = legacy_condition(raw)? {
        effect.condition = Some(condition);
    }
    Ok(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, MemoryLogger};

    #[test]
    fn test_effects_shape() {
        let json = r#"[{
            "id": 1, "name": "Grave Beetle", "power": 3, "trigger": "ON_DEATH",
            "effects": [{
                "type": "DESTROY",
                "target": {"group": "ENEMIES", "select": "CHOOSE", "count": 1},
                "condition": {"stat": "POWER", "operator": "LTE", "value": 4}
            }]
        }]"#;
        let logger = MemoryLogger::default();
        let registry = CardLoader::new(&logger).load_str(json).unwrap();
        let def = registry.get(CardId(1)).unwrap();

        assert_eq!(def.trigger, Some(Trigger::OnDeath));
        let effect = &def.effects[0];
        assert_eq!(effect.verb, EffectVerb::Destroy);
        assert_eq!(effect.target.select, TargetSelect::Choose(1));
        assert_eq!(effect.filter(), Some(StatFilter::power(CompareOp::Lte, 4)));
    }

    #[test]
    fn test_legacy_ability() {
        let json = r#"[{
            "id": 2, "name": "Tusk Boar", "power": 4, "trigger": "ON_UNBLOCKED",
            "ability": {"code": "DAMAGE", "value": 2}
        }]"#;
        let logger = MemoryLogger::default();
        let registry = CardLoader::new(&logger).load_str(json).unwrap();
        let effect = &registry.get(CardId(2)).unwrap().effects[0];

        assert_eq!(effect.verb, EffectVerb::ModifyStat);
        assert_eq!(effect.params.stat, Some(Stat::Hp));
        assert_eq!(effect.params.mode, StatMode::Sub);
        assert_eq!(effect.params.amount, 2);
        assert_eq!(effect.target.group, TargetGroup::Opponent);
    }

    #[test]
    fn test_bad_record_is_skipped_and_logged() {
        let json = r#"[
            {"id": 1, "name": "Good", "power": 2, "copies": 3},
            {"id": 2, "name": "Bad", "power": 2, "keywords": ["FLYING"]},
            {"id": 3, "power": 2}
        ]"#;
        let logger = MemoryLogger::default();
        let registry = CardLoader::new(&logger).load_str(json).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.pool().len(), 3);
        assert!(logger.contains(LogLevel::Error, "unknown keyword FLYING"));
        assert!(logger.contains(LogLevel::Error, "skipping card record 2"));
    }

    #[test]
    fn test_zero_target_count_is_rejected() {
        let json = r#"[
            {"id": 1, "name": "Nobody", "power": 2, "trigger": "ON_PLAY",
             "effects": [{"type": "DESTROY",
                          "target": {"group": "ENEMIES", "select": "CHOOSE", "count": 0}}]},
            {"id": 2, "name": "Somebody", "power": 2}
        ]"#;
        let logger = MemoryLogger::default();
        let registry = CardLoader::new(&logger).load_str(json).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get(CardId(1)).is_none());
        assert!(logger.contains(LogLevel::Error, "target count must be at least 1"));
    }

    #[test]
    fn test_not_an_array_is_an_error() {
        let logger = MemoryLogger::default();
        assert!(matches!(
            CardLoader::new(&logger).load_str("{\"id\": 1}"),
            Err(LoadError::Json(_))
        ));
    }
}
