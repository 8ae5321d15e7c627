use super::*;
use crate::animation::ease::Ease;
use crate::engine::PlayCue;
use crate::scene::transition::Transition;

#[test]
fn records_calls_in_order_with_sequential_ids() {
    let mut log = CallLog::new();
    log.begin_stage("Setup").unwrap();
    let a = log.create("ax", &EntityDesc::dot(3.0)).unwrap();
    let b = log.create("bx", &EntityDesc::dot(3.0)).unwrap();
    assert_eq!(a.id(), EntityId(1));
    assert_eq!(b.id(), EntityId(2));

    log.play(&PlayBeat {
        cues: vec![PlayCue {
            entity: a.id(),
            transition: Transition::FadeIn,
        }],
        duration_s: 1.5,
        ease: Ease::Linear,
    })
    .unwrap();
    log.remove(&b).unwrap();
    log.finish().unwrap();

    assert_eq!(log.stages(), vec!["Setup"]);
    assert_eq!(log.live(), &[EntityId(1)]);
    assert_eq!(log.total_duration_s(), 1.5);
    assert_eq!(log.calls_for_stage("Setup").len(), 5);
    assert_eq!(log.calls().last(), Some(&EngineCall::Finish));
}

#[test]
fn rejects_calls_on_dead_entities() {
    let mut log = CallLog::new();
    let a = log.create("ax", &EntityDesc::dot(3.0)).unwrap();
    log.remove(&a).unwrap();
    assert!(log.remove(&a).is_err());
    assert!(log.add(&a).is_err());
    let beat = PlayBeat {
        cues: vec![PlayCue {
            entity: a.id(),
            transition: Transition::FadeOut,
        }],
        duration_s: 1.0,
        ease: Ease::default(),
    };
    assert!(log.play(&beat).is_err());
}

#[test]
fn calls_serialize_with_call_tags() {
    let mut log = CallLog::new();
    log.begin_stage("Intro").unwrap();
    let json = serde_json::to_string(log.calls()).unwrap();
    assert_eq!(json, r#"[{"call":"begin_stage","stage":"Intro"}]"#);
}
