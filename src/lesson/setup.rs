//! Register and memory setup.

use crate::foundation::error::CycleResult;
use crate::lesson::layout::{Kit, soft};
use crate::lesson::names::{
    AX_REGISTER, DX_REGISTER, IR_REGISTER, MEMORY_CELL, PC_POINTER, SRC_REGISTER,
};
use crate::lesson::values::{addr, grouped, hex16};
use crate::scene::entity::EntityDesc;
use crate::scene::transition::Transition;
use crate::stage::{Beat, Carried, StagePlan};

/// Left column where the register boxes live for most of the lesson.
pub(crate) const REGISTER_X: f64 = -5.36;
pub(crate) const AX_Y: f64 = 2.5;
pub(crate) const SRC_Y: f64 = 0.1;
pub(crate) const DX_Y: f64 = -2.3;

pub(crate) fn registers(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;
    let src = m.source;

    let explanation = format!(
        "AX (Accumulator): Multiplicand = {} decimal\n\
         {} ({}): Multiplier = {} decimal\n\
         DX (Data): Will store high 16 bits of result",
        grouped(u64::from(m.ax)),
        src.name(),
        src.role(),
        grouped(u64::from(m.src)),
    );

    let mut plan = StagePlan::new();
    plan.entity("registers_title", kit.title("CPU Registers Setup", p.blue))
        .entity(
            AX_REGISTER,
            kit.register("AX", &hex16(m.ax), "Accumulator", REGISTER_X, AX_Y),
        )
        .entity(
            SRC_REGISTER,
            kit.register(src.name(), &hex16(m.src), src.role(), REGISTER_X, SRC_Y),
        )
        .entity(
            DX_REGISTER,
            kit.register("DX", &hex16(0), "Data Register", REGISTER_X, DX_Y),
        )
        .entity(
            "registers_note",
            kit.text(&explanation, 20.0, soft(p.blue), 2.0, 1.0),
        )
        .enter(Beat::new(1.5).cue("registers_title", Transition::FadeIn));

    if kit.detailed() {
        plan.enter(Beat::new(1.5).cue(AX_REGISTER, Transition::GrowFromCenter))
            .enter(Beat::hold(0.5))
            .enter(Beat::new(1.5).cue(SRC_REGISTER, Transition::GrowFromCenter))
            .enter(Beat::hold(0.5))
            .enter(Beat::new(1.5).cue(DX_REGISTER, Transition::GrowFromCenter));
    } else {
        plan.enter(Beat::new(2.0).cue_all(
            [AX_REGISTER, SRC_REGISTER, DX_REGISTER],
            Transition::GrowFromCenter,
        ));
    }

    plan.explain(Beat::new(2.0).cue("registers_note", Transition::FadeIn))
        .hold(kit.hold(3.0))
        .exit_duration(1.0)
        .carry(AX_REGISTER)
        .carry(SRC_REGISTER)
        .carry(DX_REGISTER);
    Ok(plan)
}

pub(crate) fn memory(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;

    let cell = EntityDesc::group(vec![
        kit.panel(3.0, 1.5, p.blue, 4.5, 2.0),
        kit.text(&addr(m.address), 18.0, soft(p.blue), 4.5, 2.95)
            .part("address"),
        kit.text(
            &format!("{}\n({})", m.encoding_text(), m.mnemonic()),
            20.0,
            p.text,
            4.5,
            2.0,
        )
        .part("bytes"),
    ]);
    let pc = EntityDesc::group(vec![
        kit.arrow(kit.pt(1.0, 2.0), kit.pt(2.9, 2.0), p.yellow),
        kit.text(&format!("PC = {}", addr(m.address)), 20.0, p.yellow, 1.95, 2.35)
            .part("address"),
    ]);
    let ir = EntityDesc::group(vec![
        kit.panel(2.5, 1.2, p.blue, 4.5, -0.7),
        kit.text("IR", 22.0, p.blue, 4.5, 0.15).bold(),
        kit.text("-- --", 22.0, p.text, 4.5, -0.7).part("value"),
    ]);

    let mut plan = StagePlan::new();
    plan.entity("memory_title", kit.title("Memory & Program Counter", p.blue))
        .entity(MEMORY_CELL, cell)
        .entity(PC_POINTER, pc)
        .entity(IR_REGISTER, ir)
        .enter(Beat::new(1.0).cue("memory_title", Transition::FadeIn))
        .enter(
            Beat::new(2.0)
                .cue(MEMORY_CELL, Transition::GrowFromCenter)
                .cue(PC_POINTER, Transition::GrowArrow),
        )
        .enter(Beat::new(1.0).cue(IR_REGISTER, Transition::FadeIn));

    if kit.detailed() {
        let caption = format!(
            "{} is stored at {}\nPC holds the address of the next instruction",
            m.mnemonic(),
            addr(m.address)
        );
        plan.entity(
            "memory_caption",
            kit.text(&caption, 18.0, soft(p.blue), 1.5, -2.6),
        )
        .explain(Beat::new(1.5).cue("memory_caption", Transition::FadeIn));
    }

    plan.hold(kit.hold(1.5))
        .carry(MEMORY_CELL)
        .carry(PC_POINTER)
        .carry(IR_REGISTER);
    Ok(plan)
}
