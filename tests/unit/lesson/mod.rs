use super::*;
use crate::engine::log::EngineCall;
use crate::foundation::core::Canvas;
use crate::lesson::config::SourceRegister;
use crate::scene::transition::Transition;

fn with_detail(detail: Detail) -> LessonConfig {
    LessonConfig {
        detail,
        ..LessonConfig::default()
    }
}

fn stage_names(stages: &[Box<dyn Stage>]) -> Vec<&str> {
    stages.iter().map(|s| s.name()).collect()
}

#[test]
fn detailed_lesson_runs_every_stage() {
    let stages = mul_lesson(&with_detail(Detail::Detailed));
    assert_eq!(
        stage_names(&stages),
        [
            "Intro",
            "Architecture",
            "Registers",
            "Memory",
            "Fetch",
            "Decode",
            "ALU",
            "Operand Fetch",
            "Execute",
            "Write-back",
            "Flags",
            "Performance",
            "Summary",
        ]
    );
}

#[test]
fn brief_lesson_skips_overview_and_performance() {
    let stages = mul_lesson(&with_detail(Detail::Brief));
    let names = stage_names(&stages);
    assert_eq!(names.len(), 11);
    assert!(!names.contains(&"Architecture"));
    assert!(!names.contains(&"Performance"));
    assert_eq!(names.first(), Some(&"Intro"));
    assert_eq!(names.last(), Some(&"Summary"));
}

#[test]
fn carried_set_follows_the_handoffs() {
    for detail in [Detail::Brief, Detail::Detailed] {
        let stages = mul_lesson(&with_detail(detail));
        let (log, report) = record_calls(&stages).unwrap();

        let carried = |stage: &str| {
            report
                .stages
                .iter()
                .find(|s| s.name == stage)
                .unwrap()
                .carried
                .clone()
        };
        assert_eq!(carried("Intro"), Vec::<String>::new());
        assert_eq!(
            carried("Memory"),
            [
                AX_REGISTER,
                SRC_REGISTER,
                DX_REGISTER,
                MEMORY_CELL,
                PC_POINTER,
                IR_REGISTER
            ]
        );
        assert_eq!(
            carried("Fetch"),
            [AX_REGISTER, SRC_REGISTER, DX_REGISTER, MEMORY_CELL, IR_REGISTER]
        );
        assert_eq!(carried("Decode"), [AX_REGISTER, SRC_REGISTER, DX_REGISTER]);
        assert_eq!(
            carried("Execute"),
            [AX_REGISTER, SRC_REGISTER, DX_REGISTER, ALU, ALU_GEAR]
        );
        assert_eq!(carried("Write-back"), [AX_REGISTER, DX_REGISTER]);
        assert_eq!(report.final_carried(), wrapup::SUMMARY_CARRIED);

        // Only the final carried set is still live in the engine.
        assert_eq!(log.live().len(), wrapup::SUMMARY_CARRIED.len());
        assert_eq!(log.calls().last(), Some(&EngineCall::Finish));
    }
}

#[test]
fn brief_is_shorter_than_detailed() {
    let (_, brief) = record_calls(&mul_lesson(&with_detail(Detail::Brief))).unwrap();
    let (_, detailed) = record_calls(&mul_lesson(&with_detail(Detail::Detailed))).unwrap();
    assert!(brief.duration_s() < detailed.duration_s());
    assert!(brief.duration_s() > 30.0);
}

#[test]
fn runs_are_deterministic() {
    let cfg = LessonConfig::default();
    let (a, _) = record_calls(&mul_lesson(&cfg)).unwrap();
    let (b, _) = record_calls(&mul_lesson(&cfg)).unwrap();
    assert_eq!(a.calls(), b.calls());
}

#[test]
fn write_back_shows_the_product_words() {
    let cfg = LessonConfig {
        ax: 0x1234,
        bx: 0x0100,
        ..LessonConfig::default()
    };
    let (log, _) = record_calls(&mul_lesson(&cfg)).unwrap();
    let texts: Vec<String> = log
        .calls_for_stage("Write-back")
        .into_iter()
        .filter_map(|c| match c {
            EngineCall::Play { beat } => Some(beat),
            _ => None,
        })
        .flat_map(|b| b.cues.iter())
        .filter_map(|cue| match &cue.transition {
            Transition::SetText { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    // 0x1234 * 0x100 = 0x00123400
    assert_eq!(texts, ["0x3400", "0x0012"]);
}

#[test]
fn other_source_registers_build() {
    for source in [SourceRegister::Cx, SourceRegister::Si, SourceRegister::Di] {
        let cfg = LessonConfig {
            source,
            ..LessonConfig::default()
        };
        let stages = lesson(Scene::Mul, &cfg).unwrap();
        assert!(record_calls(&stages).is_ok(), "{source:?}");
    }
}

#[test]
fn invalid_config_is_rejected_before_building() {
    let cfg = LessonConfig {
        pace: 0.0,
        ..LessonConfig::default()
    };
    let err = lesson(Scene::Mul, &cfg).err().unwrap();
    assert_eq!(err.kind(), crate::foundation::error::FailureKind::Validation);
}

#[test]
fn smoke_scene_leaves_nothing_behind() {
    let stages = lesson(Scene::Smoke, &LessonConfig::default()).unwrap();
    let (log, report) = record_calls(&stages).unwrap();
    assert_eq!(stage_names(&stages), ["Smoke"]);
    assert!(report.final_carried().is_empty());
    assert!(log.live().is_empty());
}

#[test]
fn timeline_duration_scales_with_pace() {
    let cfg = LessonConfig {
        canvas: Canvas {
            width: 320,
            height: 180,
        },
        pace: 2.0,
        ..LessonConfig::default()
    };
    let (timeline, report) = record_timeline(&cfg, &smoke_lesson(&cfg)).unwrap();
    assert!((timeline.duration_s - report.duration_s() * 2.0).abs() < 1e-9);
    assert_eq!(timeline.stages.len(), 1);
    assert_eq!(timeline.entities.len(), 2);
}

#[test]
fn bus_markers_appear_instantly() {
    let (log, _) = record_calls(&mul_lesson(&LessonConfig::default())).unwrap();
    let adds = |stage: &str| {
        log.calls_for_stage(stage)
            .into_iter()
            .filter(|c| matches!(c, EngineCall::Add { .. }))
            .count()
    };
    assert_eq!(adds("Fetch"), 1);
    assert_eq!(adds("Operand Fetch"), 2);
    assert_eq!(adds("Write-back"), 2);
}
