//! Write-back, flags, timing and the closing summary.

use crate::foundation::core::Color;
use crate::foundation::error::CycleResult;
use crate::lesson::layout::{Kit, left_of, right_of, soft};
use crate::lesson::names::{ALU, AX_REGISTER, DX_REGISTER};
use crate::lesson::values::{addr, bit, grouped, hex16, hex32};
use crate::scene::entity::EntityDesc;
use crate::scene::transition::Transition;
use crate::stage::{Beat, Carried, StagePlan};

/// Names still on screen when the lesson ends.
pub(crate) const SUMMARY_CARRIED: [&str; 5] =
    [AX_REGISTER, DX_REGISTER, "summary_title", "recap", "closing"];

pub(crate) fn write_back(kit: &Kit, carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;
    let alu = carried.get(ALU)?.bounds();
    let ax = carried.get(AX_REGISTER)?.bounds();
    let dx = carried.get(DX_REGISTER)?.bounds();

    let dy = kit.layout.len(0.5);
    let low_from = left_of(alu, -dy, 8.0);
    let high_from = left_of(alu, dy, 8.0);
    let low_to = right_of(ax, 0.0, 8.0);
    let high_to = right_of(dx, 0.0, 8.0);
    let glow = Transition::Highlight {
        color: p.green,
        width: 4.0,
    };

    let breakdown = format!(
        "DX:AX = {}\nDX = {} (high)   AX = {} (low)",
        hex32(m.product()),
        hex16(m.dx()),
        hex16(m.ax_after())
    );

    let mut plan = StagePlan::new();
    plan.entity("write_back_title", kit.title("Write Back", p.green))
        .entity("low_path", kit.arrow(low_from, low_to, p.green))
        .entity("high_path", kit.arrow(high_from, high_to, p.green))
        .entity("low_dot", kit.dot(low_from, p.green))
        .entity("high_dot", kit.dot(high_from, p.green))
        .entity(
            "breakdown",
            kit.text(&breakdown, 20.0, soft(p.green), 3.8, -2.5),
        )
        .enter(Beat::new(1.0).cue("write_back_title", Transition::FadeIn))
        .explain(
            Beat::new(1.2)
                .cue("low_path", Transition::GrowArrow)
                .cue("high_path", Transition::GrowArrow),
        )
        .explain(
            Beat::new(1.5)
                .show("low_dot")
                .show("high_dot")
                .cue("low_dot", Transition::MoveTo { to: low_to })
                .cue("high_dot", Transition::MoveTo { to: high_to }),
        )
        .explain(
            Beat::new(1.0)
                .cue("low_dot", Transition::FadeOut)
                .cue("high_dot", Transition::FadeOut)
                .cue(
                    AX_REGISTER,
                    Transition::SetText {
                        part: Some("value".into()),
                        text: hex16(m.ax_after()),
                        color: Some(p.green),
                    },
                )
                .cue(
                    DX_REGISTER,
                    Transition::SetText {
                        part: Some("value".into()),
                        text: hex16(m.dx()),
                        color: Some(p.green),
                    },
                ),
        )
        .explain(
            Beat::new(0.6)
                .cue(AX_REGISTER, glow.clone())
                .cue(DX_REGISTER, glow),
        )
        .explain(Beat::new(1.5).cue("breakdown", Transition::FadeIn))
        .explain(
            Beat::new(0.5)
                .cue(AX_REGISTER, Transition::ClearHighlight)
                .cue(DX_REGISTER, Transition::ClearHighlight),
        )
        .hold(kit.hold(2.0))
        .exit_duration(1.0)
        .carry(AX_REGISTER)
        .carry(DX_REGISTER);
    Ok(plan)
}

pub(crate) fn flags(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;

    let shown = if kit.detailed() {
        vec![
            ("CF", m.carry(), -0.5),
            ("OF", m.overflow(), 1.6),
            ("SF", m.sign(), 3.7),
            ("ZF", m.zero(), 5.8),
        ]
    } else {
        vec![("CF", m.carry(), 1.0), ("OF", m.overflow(), 3.1)]
    };
    let names: Vec<String> = shown
        .iter()
        .map(|(flag, ..)| format!("flag_{}", flag.to_ascii_lowercase()))
        .collect();

    let explanation = if m.carry() {
        format!(
            "CF = OF = 1: high word DX = {} is non-zero",
            hex16(m.dx())
        )
    } else {
        "CF = OF = 0: the product fits in AX".to_string()
    };

    let mut plan = StagePlan::new();
    plan.entity("flags_title", kit.title("Flag Updates", p.yellow));
    for ((flag, set, x), name) in shown.iter().zip(&names) {
        plan.entity(name, kit.flag(flag, *set, *x, -0.5));
    }
    plan.entity(
        "flags_note",
        kit.text(&explanation, 20.0, soft(p.yellow), 2.6, -2.4),
    )
    .enter(Beat::new(1.0).cue("flags_title", Transition::FadeIn))
    .enter(Beat::new(1.5).cue_all(names.iter().cloned(), Transition::GrowFromCenter));

    for _ in 0..2 {
        plan.explain(Beat::new(0.4).cue_all(
            names.iter().cloned(),
            Transition::Highlight {
                color: p.yellow,
                width: 4.0,
            },
        ))
        .explain(Beat::new(0.4).cue_all(names.iter().cloned(), Transition::ClearHighlight));
    }

    plan.explain(Beat::new(1.5).cue("flags_note", Transition::FadeIn));
    if kit.detailed() {
        plan.entity(
            "flags_detail",
            kit.text(
                &format!(
                    "SF = {}, ZF = {} (undefined on the 8086 after MUL)",
                    bit(m.sign()),
                    bit(m.zero())
                ),
                16.0,
                soft(p.text),
                2.6,
                -3.0,
            ),
        )
        .explain(Beat::new(1.0).cue("flags_detail", Transition::FadeIn));
    }
    plan.hold(kit.hold(2.0)).exit_duration(1.0);
    Ok(plan)
}

pub(crate) fn performance(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;
    let c = &m.cycles;

    let metrics = format!(
        "MUL r16: {}-{} clock cycles\n\
         At {} MHz: {:.1}-{:.1} \u{b5}s\n\
         Modern x86: ~{} cycles",
        c.mul_min,
        c.mul_max,
        m.clock_mhz,
        m.micros(c.mul_min),
        m.micros(c.mul_max),
        c.modern
    );

    let rows: [(&str, u32, Color); 5] = [
        ("Fetch", c.fetch, p.blue),
        ("Decode", c.decode, p.red),
        ("Execute", c.mul_max, p.green),
        ("Flags", c.flags, p.yellow),
        ("Modern", c.modern, soft(p.text)),
    ];
    let longest = rows.iter().map(|r| r.1).max().unwrap_or(1).max(1);

    let mut plan = StagePlan::new();
    plan.entity("performance_title", kit.title("Performance", p.red))
        .entity("metrics", kit.text(&metrics, 22.0, soft(p.red), -3.0, -0.1))
        .entity(
            "timing_title",
            kit.text("Cycle breakdown", 24.0, p.yellow, 4.6, 2.0).bold(),
        )
        .enter(Beat::new(1.0).cue("performance_title", Transition::FadeIn))
        .explain(Beat::new(2.0).cue("metrics", Transition::Write))
        .explain(Beat::new(0.8).cue("timing_title", Transition::FadeIn));

    for (i, (label, cycles, color)) in rows.into_iter().enumerate() {
        let y = 1.2 - i as f64 * 0.75;
        let w = (2.8 * f64::from(cycles) / f64::from(longest)).max(0.05);
        let bar = EntityDesc::group(vec![
            kit.text(label, 18.0, p.text, 2.0, y).align_start(),
            kit.panel(w, 0.4, color, 3.4 + w / 2.0, y),
            kit.text(&cycles.to_string(), 16.0, color, 3.6 + w, y)
                .align_start(),
        ]);
        let name = format!("timing_bar_{i}");
        plan.entity(&name, bar)
            .explain(Beat::new(0.6).cue(&name, Transition::GrowFromCenter));
    }

    plan.hold(kit.hold(3.0)).exit_duration(1.0);
    Ok(plan)
}

pub(crate) fn summary(kit: &Kit, _carried: &Carried<'_>) -> CycleResult<StagePlan> {
    let p = kit.palette();
    let m = &kit.mul;

    let recap = format!(
        "{} executed at {}\n\
         {} x {} = {}\n\
         ({})\n\
         DX = {}, AX = {}\n\
         CF = OF = {}",
        m.mnemonic(),
        addr(m.address),
        hex16(m.ax),
        hex16(m.src),
        hex32(m.product()),
        grouped(u64::from(m.product())),
        hex16(m.dx()),
        hex16(m.ax_after()),
        bit(m.carry())
    );
    let glow = Transition::Highlight {
        color: p.green,
        width: 6.0,
    };

    let mut plan = StagePlan::new();
    plan.entity(
        "summary_title",
        kit.text("Execution Complete", 48.0, p.green, 0.0, 3.2).bold(),
    )
    .entity(
        "recap",
        kit.text(&recap, 22.0, p.text, -2.2, 0.3).align_start(),
    )
    .entity(
        "closing",
        kit.text("Thank You for Watching!", 36.0, p.blue, 0.0, -3.2).bold(),
    )
    .enter(Beat::new(1.5).cue("summary_title", Transition::Write))
    .explain(
        Beat::new(1.5)
            .cue(AX_REGISTER, Transition::MoveTo { to: kit.pt(-5.0, 1.0) })
            .cue(DX_REGISTER, Transition::MoveTo { to: kit.pt(-5.0, -0.6) }),
    )
    .explain(Beat::new(3.0).cue("recap", Transition::Write))
    .explain(
        Beat::new(0.8)
            .cue(AX_REGISTER, glow.clone())
            .cue(DX_REGISTER, glow),
    )
    .explain(Beat::new(1.5).cue("closing", Transition::FadeIn))
    .hold(3.0)
    .exit_duration(0.0);
    for name in SUMMARY_CARRIED {
        plan.carry(name);
    }
    Ok(plan)
}
