//! ALU introduction, operand transfer and the multiplication itself.

use std::f64::consts::TAU;

use crate::foundation::core::Point;
use crate::foundation::error::CycleResult;
use crate::lesson::layout::{Kit, right_of, soft};
use crate::lesson::names::{ALU, ALU_GEAR, AX_REGISTER, SRC_REGISTER};
use crate::lesson::values::{grouped, hex16, hex32};
use crate::scene::entity::EntityDesc;
use crate::scene::transition::Transition;
use crate::stage::{Beat, Carried, StagePlan};

const ALU_X: f64 = 1.5;
const ALU_Y: f64 = -0.5;

pub(crate) fn alu(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let unit = EntityDesc::group(vec![
        kit.panel(3.5, 2.2, p.green, ALU_X, ALU_Y),
        kit.text("ALU", 30.0, p.green, ALU_X, ALU_Y + 0.95).bold(),
    ]);

    let mut plan = StagePlan::new();
    plan.entity("alu_title", kit.title("Arithmetic Logic Unit", p.green))
        .entity(ALU, unit)
        .entity(ALU_GEAR, kit.gear(p.green, ALU_X, ALU_Y))
        .enter(Beat::new(1.0).cue("alu_title", Transition::FadeIn))
        .enter(
            Beat::new(1.5)
                .cue(ALU, Transition::GrowFromCenter)
                .cue(ALU_GEAR, Transition::FadeIn),
        );

    if kit.detailed() {
        plan.entity(
            "alu_note",
            kit.text(
                "16 x 16 bit multiply\nproduces a 32-bit result",
                18.0,
                soft(p.green),
                5.4,
                1.2,
            ),
        )
        .explain(Beat::new(1.0).cue("alu_note", Transition::FadeIn));
    }

    plan.hold(kit.hold(1.5))
        .exit_duration(1.0)
        .carry(ALU)
        .carry(ALU_GEAR);
    Ok(plan)
}

pub(crate) fn operand_fetch(kit: &Kit, carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;
    let ax = carried.get(AX_REGISTER)?.bounds();
    let src = carried.get(SRC_REGISTER)?.bounds();
    let alu = carried.get(ALU)?.bounds();

    let offset = kit.layout.len(0.6);
    let ax_from = right_of(ax, 0.0, 8.0);
    let src_from = right_of(src, 0.0, 8.0);
    let ax_to = Point::new(alu.x0 - 8.0, alu.center().y - offset);
    let src_to = Point::new(alu.x0 - 8.0, alu.center().y + offset);

    let operands = format!(
        "Operands: AX = {}, {} = {}",
        hex16(m.ax),
        m.source.name(),
        hex16(m.src)
    );

    let mut plan = StagePlan::new();
    plan.entity("operand_title", kit.title("Operand Fetch", p.yellow))
        .entity("ax_path", kit.arrow(ax_from, ax_to, p.yellow))
        .entity("src_path", kit.arrow(src_from, src_to, p.yellow))
        .entity("ax_dot", kit.dot(ax_from, p.yellow))
        .entity("src_dot", kit.dot(src_from, p.yellow))
        .entity(
            "operands",
            kit.text(&operands, 20.0, soft(p.yellow), ALU_X, -2.1),
        )
        .enter(Beat::new(1.0).cue("operand_title", Transition::FadeIn))
        .explain(
            Beat::new(0.8)
                .cue(
                    AX_REGISTER,
                    Transition::Highlight {
                        color: p.yellow,
                        width: 4.0,
                    },
                )
                .cue(
                    SRC_REGISTER,
                    Transition::Highlight {
                        color: p.yellow,
                        width: 4.0,
                    },
                ),
        )
        .explain(
            Beat::new(1.2)
                .cue("ax_path", Transition::GrowArrow)
                .cue("src_path", Transition::GrowArrow),
        )
        .explain(
            Beat::new(1.5)
                .show("ax_dot")
                .show("src_dot")
                .cue("ax_dot", Transition::MoveTo { to: ax_to })
                .cue("src_dot", Transition::MoveTo { to: src_to }),
        )
        .explain(
            Beat::new(0.5)
                .cue("ax_dot", Transition::FadeOut)
                .cue("src_dot", Transition::FadeOut)
                .cue(ALU, Transition::Indicate),
        )
        .explain(Beat::new(1.0).cue("operands", Transition::FadeIn))
        .explain(
            Beat::new(0.5)
                .cue(AX_REGISTER, Transition::ClearHighlight)
                .cue(SRC_REGISTER, Transition::ClearHighlight),
        )
        .hold(kit.hold(1.5))
        .exit_duration(1.0)
        .carry(AX_REGISTER)
        .carry(SRC_REGISTER)
        .carry(ALU);
    Ok(plan)
}

pub(crate) fn execute(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;

    let turns = if kit.detailed() { 2.0 } else { 1.0 };
    let calc = format!("{} x {}", hex16(m.ax), hex16(m.src));
    let result = format!("= {}", hex32(m.product()));
    let decimal = format!(
        "{} x {} = {}",
        grouped(u64::from(m.ax)),
        grouped(u64::from(m.src)),
        grouped(u64::from(m.product()))
    );

    let mut plan = StagePlan::new();
    plan.entity("execute_title", kit.title("Execute: Multiply", p.green))
        .entity("calc", kit.text(&calc, 24.0, p.text, ALU_X, -2.2))
        .entity("result", kit.text(&result, 26.0, p.green, ALU_X, -2.7).bold())
        .entity("decimal", kit.text(&decimal, 18.0, soft(p.green), ALU_X, -3.15))
        .enter(Beat::new(1.0).cue("execute_title", Transition::FadeIn))
        .explain(Beat::new(0.5).cue(
            ALU,
            Transition::Highlight {
                color: p.green,
                width: 4.0,
            },
        ))
        .explain(
            Beat::new(2.0 * turns)
                .cue(ALU_GEAR, Transition::Rotate { radians: TAU * turns })
                .cue("calc", Transition::Write),
        )
        .explain(Beat::new(1.0).cue("result", Transition::Write))
        .explain(Beat::new(1.0).cue("decimal", Transition::FadeIn));

    if kit.detailed() {
        let steps = format!(
            "Shift-and-add over 16 multiplier bits\n\
             Low word  -> AX = {}\n\
             High word -> DX = {}",
            hex16(m.ax_after()),
            hex16(m.dx())
        );
        let overflow = if m.carry() {
            "High word is non-zero: result overflows 16 bits"
        } else {
            "High word is zero: result fits in 16 bits"
        };
        plan.entity(
            "execute_steps",
            kit.text(&steps, 18.0, soft(p.green), 4.0, 1.3).align_start(),
        )
        .entity(
            "overflow_note",
            kit.text(overflow, 18.0, soft(p.red), 4.9, 0.1),
        )
        .explain(Beat::new(1.5).cue("execute_steps", Transition::FadeIn))
        .explain(Beat::new(1.0).cue("overflow_note", Transition::FadeIn));
    }

    plan.explain(Beat::new(0.5).cue(ALU, Transition::ClearHighlight))
        .hold(kit.hold(2.0))
        .exit_duration(1.0)
        .carry(ALU)
        .carry(ALU_GEAR);
    Ok(plan)
}
