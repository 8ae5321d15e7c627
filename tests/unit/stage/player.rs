use super::*;
use crate::engine::log::{CallLog, EngineCall};
use crate::foundation::core::Point;
use crate::scene::entity::EntityDesc;
use crate::stage::{FnStage, StagePlan};

fn show(names: &[&'static str], carry: &[&'static str]) -> Box<dyn Stage> {
    let names = names.to_vec();
    let carry = carry.to_vec();
    let stage_name = format!("show {}", names.join("+"));
    FnStage::new(stage_name, move |_| {
        let mut plan = StagePlan::new();
        for n in &names {
            plan.entity(*n, EntityDesc::label(*n, 20.0));
        }
        plan.enter(Beat::new(1.0).cue_all(names.iter().copied(), Transition::FadeIn));
        for c in &carry {
            plan.carry(*c);
        }
        Ok(plan)
    })
    .boxed()
}

#[test]
fn exit_fades_visible_leftovers_then_removes_them() {
    let mut player = StagePlayer::new(CallLog::new());
    let report = player.run(&[show(&["a", "b"], &["a"])]).unwrap();
    let calls = player.engine().calls();
    let fade = calls
        .iter()
        .filter_map(|c| match c {
            EngineCall::Play { beat } => Some(beat),
            _ => None,
        })
        .nth(1)
        .unwrap();
    assert_eq!(fade.cues.len(), 1);
    assert_eq!(fade.cues[0].transition, Transition::FadeOut);
    assert!(matches!(calls[calls.len() - 2], EngineCall::Remove { .. }));
    assert_eq!(calls.last(), Some(&EngineCall::Finish));
    assert_eq!(report.stages[0].removed, vec!["b"]);
    assert_eq!(report.final_carried(), ["a".to_string()]);
    assert_eq!(player.scene().names(), vec!["a"]);
}

#[test]
fn hidden_leftovers_are_removed_without_a_fade() {
    let stage = FnStage::new("Hide", |_| {
        let mut plan = StagePlan::new();
        plan.entity("x", EntityDesc::dot(3.0))
            .enter(Beat::new(1.0).cue("x", Transition::FadeIn))
            .explain(Beat::new(1.0).cue("x", Transition::FadeOut));
        Ok(plan)
    })
    .boxed();
    let mut player = StagePlayer::new(CallLog::new());
    let report = player.run(&[stage]).unwrap();
    let plays = player
        .engine()
        .calls()
        .iter()
        .filter(|c| matches!(c, EngineCall::Play { .. }))
        .count();
    assert_eq!(plays, 2);
    assert_eq!(report.stages[0].removed, vec!["x"]);
    assert!(player.scene().is_empty());
    assert_eq!(report.stages[0].duration_s, 2.0);
}

#[test]
fn unrequired_inherited_entities_pass_through() {
    let mut player = StagePlayer::new(CallLog::new());
    let report = player
        .run(&[show(&["a"], &["a"]), show(&["b"], &[])])
        .unwrap();
    assert_eq!(report.stages[1].removed, vec!["b"]);
    assert_eq!(report.stages[1].carried, vec!["a"]);
}

#[test]
fn begin_stage_precedes_everything_in_a_stage() {
    let mut player = StagePlayer::new(CallLog::new());
    player.run(&[show(&["a"], &[])]).unwrap();
    assert_eq!(
        player.engine().calls()[0],
        EngineCall::BeginStage {
            stage: "show a".into()
        }
    );
    assert_eq!(player.engine().stages(), vec!["show a"]);
}

#[test]
fn required_entities_are_consumed_unless_carried_again() {
    let consume = FnStage::new("Consume", |c| {
        c.get("a")?;
        Ok(StagePlan::new())
    })
    .with_requires(["a"])
    .boxed();
    let mut player = StagePlayer::new(CallLog::new());
    let report = player.run(&[show(&["a"], &["a"]), consume]).unwrap();
    assert_eq!(report.stages[1].required, vec!["a"]);
    assert_eq!(report.stages[1].removed, vec!["a"]);
    assert!(report.final_carried().is_empty());
}

#[test]
fn build_errors_are_attributed_to_the_stage() {
    let broken = FnStage::new("Broken", |_| Err(CycleError::validation("bad layout"))).boxed();
    let mut player = StagePlayer::new(CallLog::new());
    let err = player.run(&[broken]).unwrap_err();
    assert_eq!(err.stage(), Some("Broken"));
    assert!(err.to_string().contains("bad layout"));
    assert!(!player.engine().calls().contains(&EngineCall::Finish));
}

#[test]
fn shown_entities_are_added_instantly() {
    let stage = FnStage::new("Bus", |_| {
        let mut plan = StagePlan::new();
        plan.entity("dot", EntityDesc::dot(3.0))
            .entity("flag", EntityDesc::dot(3.0))
            .show(["flag"])
            .explain(
                Beat::new(1.0)
                    .show("dot")
                    .cue("dot", Transition::MoveTo { to: Point::new(2.0, 0.0) }),
            );
        Ok(plan)
    })
    .boxed();
    let mut player = StagePlayer::new(CallLog::new());
    let report = player.run(&[stage]).unwrap();

    let calls = player.engine().calls();
    let adds = calls
        .iter()
        .filter(|c| matches!(c, EngineCall::Add { .. }))
        .count();
    assert_eq!(adds, 2);
    // The zero-length show does not become a play; the exit fade covers both dots.
    let plays: Vec<_> = calls
        .iter()
        .filter_map(|c| match c {
            EngineCall::Play { beat } => Some(beat),
            _ => None,
        })
        .collect();
    assert_eq!(plays.len(), 2);
    assert_eq!(plays[1].cues.len(), 2);
    let add_at = calls
        .iter()
        .rposition(|c| matches!(c, EngineCall::Add { .. }))
        .unwrap();
    let move_at = calls
        .iter()
        .position(|c| matches!(c, EngineCall::Play { .. }))
        .unwrap();
    assert!(add_at < move_at);
    assert_eq!(report.stages[0].duration_s, 1.0 + crate::stage::plan::DEFAULT_EXIT_S);
}
