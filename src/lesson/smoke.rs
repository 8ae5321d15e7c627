//! One-stage scene for checking the render and encode path.

use crate::foundation::error::CycleResult;
use crate::lesson::layout::Kit;
use crate::scene::transition::Transition;
use crate::stage::{Beat, Carried, StagePlan};

pub(crate) fn smoke(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let mut plan = StagePlan::new();
    plan.entity(
        "smoke_title",
        kit.text("cyclecast", 64.0, p.blue, 0.0, 0.6).bold(),
    )
    .entity("smoke_bar", kit.panel(6.0, 0.4, p.green, 0.0, -0.6))
    .enter(Beat::new(1.5).cue("smoke_title", Transition::Write))
    .enter(Beat::new(1.0).cue("smoke_bar", Transition::GrowFromCenter))
    .hold(1.0)
    .exit_duration(1.0);
    Ok(plan)
}
