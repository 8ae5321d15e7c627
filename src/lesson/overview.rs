//! Intro and architecture overview.

use crate::foundation::error::CycleResult;
use crate::lesson::layout::{Kit, soft};
use crate::scene::transition::Transition;
use crate::stage::{Beat, Carried, StagePlan};

const COMPONENTS: [&str; 6] = [
    "Execution Unit (EU)",
    "Bus Interface Unit (BIU)",
    "Arithmetic Logic Unit (ALU)",
    "Control Unit (CU)",
    "Registers (AX, BX, CX, DX)",
    "Instruction Queue (6 bytes)",
];

const PIPELINE: [&str; 6] = [
    "1. Fetch",
    "2. Decode",
    "3. Execute",
    "4. Memory Access",
    "5. Write Back",
    "6. Update Flags",
];

pub(crate) fn intro(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let info = format!(
        "Intel 8086 Microprocessor\n16-bit Architecture\nClock Speed: {} MHz",
        kit.mul.clock_mhz
    );

    let mut plan = StagePlan::new();
    plan.entity(
        "intro_title",
        kit.text("8086 MUL Instruction", 80.0, p.blue, 0.0, 0.8).bold(),
    )
    .entity(
        "intro_subtitle",
        kit.text("Execution Cycle Animation", 52.0, soft(p.blue), 0.0, -0.3),
    )
    .entity(
        "intro_info",
        kit.text(&info, 24.0, soft(p.blue), 0.0, -2.4)
            .line_spacing(1.5),
    )
    .enter(Beat::new(3.0).cue("intro_title", Transition::Write))
    .enter(Beat::new(2.0).cue("intro_subtitle", Transition::FadeIn))
    .hold(kit.hold(2.0))
    .explain(Beat::new(2.0).cue("intro_info", Transition::FadeIn))
    .hold(kit.hold(2.0))
    .exit_duration(2.0);
    Ok(plan)
}

pub(crate) fn architecture(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let mut plan = StagePlan::new();
    plan.entity("arch_title", kit.title("8086 CPU Architecture", p.blue))
        .entity(
            "pipeline_title",
            kit.text("Instruction Pipeline", 26.0, p.yellow, 3.0, 2.0).bold(),
        )
        .enter(Beat::new(1.5).cue("arch_title", Transition::FadeIn));

    for (i, component) in COMPONENTS.iter().enumerate() {
        let name = format!("component_{i}");
        plan.entity(
            &name,
            kit.text(component, 22.0, soft(p.green), -3.0, 2.0 - i as f64 * 0.7),
        )
        .explain(Beat::new(0.8).cue(&name, Transition::FadeIn))
        .hold(0.3);
    }

    plan.explain(Beat::new(1.0).cue("pipeline_title", Transition::FadeIn));
    for (i, step) in PIPELINE.iter().enumerate() {
        let name = format!("pipeline_step_{i}");
        plan.entity(
            &name,
            kit.text(step, 20.0, soft(p.yellow), 3.0, 1.2 - i as f64 * 0.5),
        )
        .explain(Beat::new(0.6).cue(&name, Transition::FadeIn))
        .hold(0.2);
    }

    plan.hold(3.0).exit_duration(2.0);
    Ok(plan)
}
