//! Instruction fetch and decode.

use crate::foundation::core::Point;
use crate::foundation::error::CycleResult;
use crate::lesson::layout::{Kit, left_of, right_of, soft};
use crate::lesson::names::{IR_REGISTER, MEMORY_CELL, PC_POINTER};
use crate::lesson::values::{MUL_GROUP_REG, addr, bits8};
use crate::scene::entity::EntityDesc;
use crate::scene::transition::Transition;
use crate::stage::{Beat, Carried, StagePlan};

const SIGNALS: [&str; 3] = ["MUL_OP", "REG_READ", "ALU_EN"];

pub(crate) fn fetch(kit: &Kit, carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;
    let memory = carried.get(MEMORY_CELL)?.bounds();
    let pc = carried.get(PC_POINTER)?.bounds();
    let ir = carried.get(IR_REGISTER)?.bounds();

    let bus_y = kit.layout.len(0.45);
    let bus_from = Point::new(pc.x0, memory.center().y + bus_y);
    let bus_to = left_of(memory, bus_y, 6.0);
    let path_from = Point::new(memory.center().x, memory.y1 + 6.0);
    let path_to = Point::new(ir.center().x, ir.y0 - 6.0);

    let mut plan = StagePlan::new();
    plan.entity("fetch_title", kit.title("Instruction Fetch", p.blue))
        .entity("address_bus", kit.arrow(bus_from, bus_to, p.yellow))
        .entity(
            "bus_label",
            EntityDesc::label("address bus", kit.layout.font(16.0))
                .color(soft(p.yellow))
                .at(Point::new(
                    (bus_from.x + bus_to.x) / 2.0,
                    bus_from.y + kit.layout.len(0.25),
                )),
        )
        .entity("data_path", kit.arrow(path_from, path_to, p.blue))
        .entity("fetch_dot", kit.dot(path_from, p.blue))
        .enter(Beat::new(1.0).cue("fetch_title", Transition::FadeIn))
        .explain(
            Beat::new(1.0)
                .cue("address_bus", Transition::GrowArrow)
                .cue("bus_label", Transition::FadeIn),
        )
        .explain(Beat::new(0.6).cue(MEMORY_CELL, Transition::Indicate))
        .explain(Beat::new(1.5).cue("data_path", Transition::GrowArrow))
        .explain(
            Beat::new(2.0)
                .show("fetch_dot")
                .cue("fetch_dot", Transition::MoveTo { to: path_to }),
        )
        .explain(
            Beat::new(0.8)
                .cue("fetch_dot", Transition::FadeOut)
                .cue(
                    IR_REGISTER,
                    Transition::SetText {
                        part: Some("value".into()),
                        text: m.encoding_text(),
                        color: Some(p.green),
                    },
                ),
        )
        .explain(Beat::new(0.5).cue(
            IR_REGISTER,
            Transition::Highlight {
                color: p.blue,
                width: 4.0,
            },
        ))
        .explain(Beat::new(0.5).cue(IR_REGISTER, Transition::ClearHighlight))
        .explain(Beat::new(1.0).cue(
            PC_POINTER,
            Transition::SetText {
                part: Some("address".into()),
                text: format!("PC = {}", addr(m.next_address())),
                color: None,
            },
        ));

    if kit.detailed() {
        let caption = format!(
            "Fetched 2 bytes: {}\nPC advances by 2 to {}",
            m.encoding_text(),
            addr(m.next_address())
        );
        plan.entity(
            "fetch_caption",
            kit.text(&caption, 18.0, soft(p.blue), 1.5, -2.6),
        )
        .explain(Beat::new(1.0).cue("fetch_caption", Transition::FadeIn));
    }

    plan.hold(kit.hold(1.5))
        .exit_duration(1.0)
        .carry(MEMORY_CELL)
        .carry(IR_REGISTER);
    Ok(plan)
}

pub(crate) fn decode(kit: &Kit, carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;
    let ir = carried.get(IR_REGISTER)?.bounds();

    let cu_box = kit.panel(3.2, 1.6, p.red, 0.0, -0.8);
    let cu_bounds = cu_box.bounds();
    let control_unit = EntityDesc::group(vec![
        cu_box,
        kit.text("Control Unit", 20.0, p.red, 0.0, 0.25).bold(),
    ]);

    let [op, modrm] = m.encoding();
    let bits = format!(
        "{op:02X} = {}\nModRM {modrm:02X} = {:02b} {:03b} {:03b}\nreg = {:03b} (MUL), r/m = {:03b} ({})",
        bits8(op),
        modrm >> 6,
        (modrm >> 3) & 0b111,
        modrm & 0b111,
        MUL_GROUP_REG,
        m.source.code(),
        m.source.name(),
    );

    let mut plan = StagePlan::new();
    plan.entity("decode_title", kit.title("Instruction Decode", p.red))
        .entity("control_unit", control_unit)
        .entity(
            "decode_path",
            kit.arrow(left_of(ir, 0.0, 8.0), right_of(cu_bounds, 0.0, 8.0), p.red),
        )
        .entity("opcode_bits", kit.text(&bits, 16.0, p.red, 0.0, -0.8))
        .enter(Beat::new(1.0).cue("decode_title", Transition::FadeIn))
        .enter(Beat::new(1.5).cue("control_unit", Transition::GrowFromCenter))
        .explain(
            Beat::new(1.0)
                .cue("decode_path", Transition::GrowArrow)
                .cue(IR_REGISTER, Transition::Indicate),
        )
        .explain(Beat::new(2.0).cue("opcode_bits", Transition::Write));

    let signal_names: Vec<String> = (0..SIGNALS.len()).map(|i| format!("signal_{i}")).collect();
    for (i, (name, signal)) in signal_names.iter().zip(SIGNALS).enumerate() {
        plan.entity(
            name,
            kit.text(signal, 16.0, p.red, -1.2 + i as f64 * 1.2, -2.25),
        )
        .explain(Beat::new(0.6).cue(name, Transition::FadeIn));
    }
    plan.explain(Beat::new(0.6).cue_all(
        signal_names.iter().cloned(),
        Transition::Highlight {
            color: p.red,
            width: 2.0,
        },
    ));

    if kit.detailed() {
        plan.entity(
            "decode_note",
            kit.text(
                "Group opcode F7: ModRM.reg selects MUL",
                18.0,
                soft(p.red),
                0.0,
                -3.0,
            ),
        )
        .explain(Beat::new(1.0).cue("decode_note", Transition::FadeIn));
    }

    plan.hold(kit.hold(1.0)).exit_duration(1.0);
    Ok(plan)
}
