// tests/admission_tests.rs

use std::sync::Arc;

use botgate_core::models::{
    CommandLimitConfig, CommandSpec, IdentityContext, LimitScope, LimitValue, RuleAction,
    RuleEntry, RuleSubject,
};
use botgate_core::test_utils::ManualClock;
use botgate_core::{AdmissionConfig, AdmissionService, Decision};

use chrono::{Local, TimeZone};

fn limits(scope: LimitScope, min_interval: i64, max_day_usage: i64) -> CommandLimitConfig {
    CommandLimitConfig {
        scope,
        max_day_usage: LimitValue::Fixed(max_day_usage),
        min_interval: LimitValue::Fixed(min_interval),
    }
}

fn user_rule(content: &str, action: RuleAction) -> RuleEntry {
    RuleEntry {
        subject: RuleSubject::User,
        content: content.to_string(),
        action,
    }
}

fn channel_rule(content: &str, action: RuleAction) -> RuleEntry {
    RuleEntry {
        subject: RuleSubject::Channel,
        content: content.to_string(),
        action,
    }
}

fn service_at_midday(rules: &[RuleEntry], send_hint: bool) -> (AdmissionService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_midday());
    let service = AdmissionService::with_clock(rules, send_hint, clock.clone());
    (service, clock)
}

#[test]
fn test_remind_scenario_full_timeline() {
    // remind: scope=user, min_interval=60s, max_day_usage=3
    let (service, clock) = service_at_midday(&[], true);
    let remind = CommandSpec::root("remind").with_limits(limits(LimitScope::User, 60, 3));
    let ctx = IdentityContext::channel_message("twitch", "chan1", "U1");

    // t=0: admitted, 2 uses left, cooldown until t=60
    assert_eq!(service.pre_execute(&ctx, remind.as_ref()), None);
    assert_eq!(
        service.store().get("user:U1:remind").unwrap().daily_uses_left,
        Some(2)
    );

    // t=10: denied, ~50s remaining
    clock.advance_secs(10);
    let hint = service.pre_execute(&ctx, remind.as_ref()).unwrap();
    assert_eq!(hint, "Command remind is on cooldown. Please wait 50s.");

    // t=61: admitted, 1 use left
    clock.advance_secs(51);
    assert_eq!(service.pre_execute(&ctx, remind.as_ref()), None);

    // t=62: denied by the fresh cooldown
    clock.advance_secs(1);
    assert!(service.pre_execute(&ctx, remind.as_ref()).unwrap().contains("cooldown"));

    // t=130: admitted, 0 uses left
    clock.advance_secs(68);
    assert_eq!(service.pre_execute(&ctx, remind.as_ref()), None);
    assert_eq!(
        service.store().get("user:U1:remind").unwrap().daily_uses_left,
        Some(0)
    );

    // t=200: cooldown has expired but the daily quota is spent
    clock.advance_secs(70);
    let hint = service.pre_execute(&ctx, remind.as_ref()).unwrap();
    assert_eq!(hint, "Command remind has reached its daily usage limit.");

    // Past local midnight the window resets and a call is admitted again.
    let next_day = Local
        .with_ymd_and_hms(2025, 1, 16, 0, 0, 30)
        .single()
        .expect("unambiguous local time");
    clock.set(next_day);
    assert_eq!(service.pre_execute(&ctx, remind.as_ref()), None);
    assert_eq!(
        service.store().get("user:U1:remind").unwrap().daily_uses_left,
        Some(2)
    );
}

#[test]
fn test_user_ignore_overrides_channel_block() {
    // Channel is blanket-blocked, but U1 carries a user-level exemption.
    let (service, _clock) = service_at_midday(
        &[
            channel_rule("chan1", RuleAction::Block),
            user_rule("U1", RuleAction::Ignore),
        ],
        true,
    );
    let cmd = CommandSpec::root("remind").with_limits(limits(LimitScope::User, 60, 1));

    let exempt = IdentityContext::channel_message("twitch", "chan1", "U1");
    let blocked = IdentityContext::channel_message("twitch", "chan1", "U2");

    // Ignore short-circuits even aggressive limits: every call is admitted
    // and nothing is recorded.
    for _ in 0..10 {
        assert_eq!(service.pre_execute(&exempt, cmd.as_ref()), None);
    }
    assert!(service.store().is_empty());

    // Everyone else in the channel is blocked, silently.
    assert_eq!(service.pre_execute(&blocked, cmd.as_ref()), Some(String::new()));
}

#[test]
fn test_block_rule_is_always_silent() {
    let (service, _clock) = service_at_midday(&[user_rule("U1", RuleAction::Block)], true);
    let cmd = CommandSpec::root("remind");
    let ctx = IdentityContext::private_message("twitch", "U1");

    assert_eq!(service.decide(&ctx, cmd.as_ref()), Decision::Deny { hint: None });
    // Even with send_hint on, a rule block carries no text.
    assert_eq!(service.pre_execute(&ctx, cmd.as_ref()), Some(String::new()));
}

#[test]
fn test_nearest_configured_ancestor_wins() {
    let (service, _clock) = service_at_midday(&[], true);
    let parent = CommandSpec::root("remind").with_limits(limits(LimitScope::User, 0, 1));
    let child =
        CommandSpec::subcommand(&parent, "me").with_limits(limits(LimitScope::User, 0, 2));
    let ctx = IdentityContext::channel_message("twitch", "chan1", "U1");

    // The child defines its own quota of 2, so the parent's quota of 1 is
    // never consulted for child invocations.
    assert_eq!(service.pre_execute(&ctx, child.as_ref()), None);
    assert_eq!(service.pre_execute(&ctx, child.as_ref()), None);
    assert!(service.pre_execute(&ctx, child.as_ref()).is_some());

    // Only the child's record exists; the parent is untouched.
    assert!(service.store().get("user:U1:remind/me").is_some());
    assert!(service.store().get("user:U1:remind").is_none());

    // Invoking the parent directly still uses the parent's own quota.
    assert_eq!(service.pre_execute(&ctx, parent.as_ref()), None);
    assert!(service.pre_execute(&ctx, parent.as_ref()).is_some());
}

#[test]
fn test_unlimited_levels_fall_through_to_ancestor() {
    let (service, _clock) = service_at_midday(&[], true);
    let root = CommandSpec::root("admin").with_limits(limits(LimitScope::User, 0, 2));
    let mid = CommandSpec::subcommand(&root, "tools");
    let leaf_a = CommandSpec::subcommand(&mid, "kick");
    let leaf_b = CommandSpec::subcommand(&mid, "ban");
    let ctx = IdentityContext::channel_message("twitch", "chan1", "U1");

    // Neither leaf nor mid defines a limit, so both leaves draw from the
    // root's single record.
    assert_eq!(service.pre_execute(&ctx, leaf_a.as_ref()), None);
    assert_eq!(service.pre_execute(&ctx, leaf_b.as_ref()), None);
    assert!(service.pre_execute(&ctx, leaf_a.as_ref()).is_some());
    assert_eq!(
        service.store().get("user:U1:admin").unwrap().daily_uses_left,
        Some(0)
    );
}

#[test]
fn test_absent_scope_key_skips_the_level() {
    let (service, _clock) = service_at_midday(&[], true);
    let ctx = IdentityContext::private_message("discord", "U1");

    // A channel-scoped limit cannot be evaluated in a private message; with
    // no ancestor to fall back to, the call is admitted and nothing recorded.
    let solo = CommandSpec::root("roll").with_limits(limits(LimitScope::Channel, 30, 0));
    assert_eq!(service.pre_execute(&ctx, solo.as_ref()), None);
    assert!(service.store().is_empty());

    // With a user-scoped ancestor, the walk falls through to it instead.
    let root = CommandSpec::root("game").with_limits(limits(LimitScope::User, 0, 1));
    let sub = CommandSpec::subcommand(&root, "roll").with_limits(limits(LimitScope::Channel, 30, 0));
    assert_eq!(service.pre_execute(&ctx, sub.as_ref()), None);
    assert!(service.pre_execute(&ctx, sub.as_ref()).is_some());
    assert!(service.store().get("user:U1:game").is_some());
}

#[test]
fn test_send_hint_flag_suppresses_denial_text() {
    let (service, clock) = service_at_midday(&[], false);
    let cmd = CommandSpec::root("remind").with_limits(limits(LimitScope::User, 60, 0));
    let ctx = IdentityContext::channel_message("twitch", "chan1", "U1");

    assert_eq!(service.pre_execute(&ctx, cmd.as_ref()), None);
    clock.advance_secs(5);

    // The decision still computes the hint; the hook suppresses it.
    match service.decide(&ctx, cmd.as_ref()) {
        Decision::Deny { hint: Some(text) } => assert!(text.contains("cooldown")),
        other => panic!("Expected a cooldown denial, got {:?}", other),
    }
    assert_eq!(service.pre_execute(&ctx, cmd.as_ref()), Some(String::new()));
}

#[test]
fn test_no_limits_anywhere_always_allows() {
    let (service, _clock) = service_at_midday(&[], true);
    let root = CommandSpec::root("help");
    let sub = CommandSpec::subcommand(&root, "verbose");
    let ctx = IdentityContext::channel_message("twitch", "chan1", "U1");

    for _ in 0..5 {
        assert_eq!(service.pre_execute(&ctx, sub.as_ref()), None);
    }
    assert!(service.store().is_empty());
}

#[test]
fn test_channel_scope_shares_one_record_across_users() {
    let (service, _clock) = service_at_midday(&[], true);
    let cmd = CommandSpec::root("raffle").with_limits(limits(LimitScope::Channel, 0, 2));
    let u1 = IdentityContext::channel_message("twitch", "chan1", "U1");
    let u2 = IdentityContext::channel_message("twitch", "chan1", "U2");
    let elsewhere = IdentityContext::channel_message("twitch", "chan2", "U1");

    assert_eq!(service.pre_execute(&u1, cmd.as_ref()), None);
    assert_eq!(service.pre_execute(&u2, cmd.as_ref()), None);
    // chan1's shared quota is spent, for any user.
    assert!(service.pre_execute(&u1, cmd.as_ref()).is_some());
    // Another channel has its own record.
    assert_eq!(service.pre_execute(&elsewhere, cmd.as_ref()), None);
}

#[test]
fn test_computed_limit_resolves_per_invocation() {
    let (service, _clock) = service_at_midday(&[], true);
    // Trusted users get no quota at all; everyone else gets one call per day.
    let cmd = CommandSpec::root("shoutout").with_limits(CommandLimitConfig {
        scope: LimitScope::User,
        max_day_usage: LimitValue::computed(|ctx| {
            if ctx.user_id.as_deref() == Some("trusted") { 0 } else { 1 }
        }),
        min_interval: LimitValue::Fixed(0),
    });

    let trusted = IdentityContext::channel_message("twitch", "chan1", "trusted");
    let normal = IdentityContext::channel_message("twitch", "chan1", "U1");

    for _ in 0..4 {
        assert_eq!(service.pre_execute(&trusted, cmd.as_ref()), None);
    }
    assert_eq!(service.pre_execute(&normal, cmd.as_ref()), None);
    assert!(service.pre_execute(&normal, cmd.as_ref()).is_some());
}

#[test]
fn test_service_built_from_json_config() -> anyhow::Result<()> {
    let config = AdmissionConfig::from_json(
        r#"{
            "send_hint": true,
            "rules": [
                { "type": "user", "content": "banned_user", "action": "block" }
            ]
        }"#,
    )?;
    let service = AdmissionService::from_config(&config);
    let cmd = CommandSpec::root("remind");

    let banned = IdentityContext::private_message("twitch", "banned_user");
    let other = IdentityContext::private_message("twitch", "someone_else");
    assert_eq!(service.pre_execute(&banned, cmd.as_ref()), Some(String::new()));
    assert_eq!(service.pre_execute(&other, cmd.as_ref()), None);
    Ok(())
}
