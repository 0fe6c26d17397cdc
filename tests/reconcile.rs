use std::cell::Cell;

use anyhow::Result;

use imtui::{
    Button, Config, Context, HeadlessToolkit, ImError, MAX_PASSES, NativeCall, Point, RefreshPolicy,
    Size, Ui, Value, WidgetKind, im_error,
};

const PAD: u16 = 5;

fn context() -> Context<HeadlessToolkit> {
    Context::new(HeadlessToolkit::new(Size::new(400, 300)), &Config::default())
}

fn is_structural(call: &NativeCall) -> bool {
    matches!(
        call,
        NativeCall::Create { .. }
            | NativeCall::Destroy(_)
            | NativeCall::Configure(_)
            | NativeCall::Place { .. }
            | NativeCall::Resize { .. }
    )
}

fn position(ctx: &Context<HeadlessToolkit>, identifier: &str) -> Point {
    ctx.record(identifier)
        .and_then(|r| r.position())
        .unwrap_or_else(|| panic!("{identifier} was not placed"))
}

#[test]
fn test_unchanged_refresh_touches_nothing() {
    let mut ctx = context();
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        ui.text("Hello")?;
        ui.button("Go")?;
        ui.checkbox("Enabled", true)?;
        ui.input_text("Name", "ferris")?;
        ui.float_slider("Speed", 0.5, 0.0..=1.0)?;
        ui.labelframe("Group", |ui| {
            ui.input_int("Count#spin", 3, 0..=10)?;
            ui.combo_box("Pick", 1, &["a", "b", "c"])?;
            Ok(())
        })?;
        ui.progress_bar("Load", 0.25, 0.0..=1.0)?;
        ui.horizontal_separator("sep")
    };

    let first = ctx.refresh(&mut draw).unwrap();
    assert!(first.created > 0);
    ctx.factory_mut().take_calls();

    let second = ctx.refresh(&mut draw).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.destroyed, 0);
    let calls = ctx.factory_mut().take_calls();
    assert!(
        !calls.iter().any(is_structural),
        "unexpected native calls: {calls:?}"
    );
}

#[test]
fn test_undeclared_widgets_are_destroyed() {
    let mut ctx = context();
    ctx.refresh(&mut |ui| {
        ui.button("Keep")?;
        ui.button("Drop")?;
        Ok(())
    })
    .unwrap();
    let dropped = ctx.record("Drop").unwrap().handle();

    let report = ctx.refresh(&mut |ui| ui.button("Keep").map(|_| ())).unwrap();
    assert_eq!(report.destroyed, 1);
    assert_eq!(ctx.len(), 1);
    assert!(ctx.record("Drop").is_none());
    assert!(ctx.factory().calls().contains(&NativeCall::Destroy(dropped)));
    assert_eq!(ctx.factory().arena().len(), 1);
}

#[test]
fn test_namespaces_keep_identical_labels_apart() {
    let mut ctx = context();
    ctx.refresh(&mut |ui| {
        ui.namespace("first", |ui| ui.button("OK"))?;
        ui.namespace("second", |ui| ui.button("OK"))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(ctx.len(), 2);
    let handles: Vec<_> = ctx.records().map(|r| r.handle()).collect();
    assert_ne!(handles[0], handles[1]);
    assert!(ctx.records().all(|r| r.identifier().ends_with("OK")));
}

#[test]
fn test_namespace_is_closed_when_body_fails() {
    let mut ctx = context();
    let err = ctx
        .refresh(&mut |ui| {
            ui.namespace("outer", |ui| {
                ui.button("Fine")?;
                anyhow::bail!("boom")
            })
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "boom");

    // the next pass starts with an empty namespace stack
    ctx.refresh(&mut |ui| ui.button("Top").map(|_| ())).unwrap();
    assert!(ctx.record("Top").is_some());
}

#[test]
fn test_row_layout_is_deterministic() {
    let mut ctx = context();
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        ui.row(|ui| {
            ui.button("A")?;
            ui.button("BB")?;
            ui.button("CCC")?;
            Ok(())
        })?;
        ui.button("Below")?;
        Ok(())
    };
    ctx.refresh(&mut draw).unwrap();
    let first: Vec<Point> = ["A", "BB", "CCC", "Below"]
        .iter()
        .map(|id| position(&ctx, id))
        .collect();

    assert!(first[..3].iter().all(|p| p.y == first[0].y));
    assert!(first[0].x < first[1].x && first[1].x < first[2].x);
    assert!(first[3].y > first[0].y);
    assert_eq!(first[3].x, PAD);

    ctx.refresh(&mut draw).unwrap();
    let second: Vec<Point> = ["A", "BB", "CCC", "Below"]
        .iter()
        .map(|id| position(&ctx, id))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_same_row_places_next_to_previous_widget() {
    let mut ctx = context();
    ctx.refresh(&mut |ui| {
        ui.button("A")?;
        ui.same_row()?;
        ui.button("B")?;
        Ok(())
    })
    .unwrap();

    let a = position(&ctx, "A");
    let b = position(&ctx, "B");
    // headless buttons are 7 px per character plus 20
    assert_eq!(b.x, a.x + 27 + PAD);
    assert_eq!(b.y, a.y);
}

#[test]
fn test_refresh_never_exceeds_two_passes() {
    let mut ctx = context();
    let mut draws = 0;
    let report = ctx
        .refresh(&mut |ui| {
            draws += 1;
            ui.request_repaint();
            Ok(())
        })
        .unwrap();
    assert_eq!(report.passes, MAX_PASSES);
    assert_eq!(draws, 2);
}

#[test]
fn test_programmatic_writes_do_not_activate() {
    let mut ctx = context();
    ctx.refresh(&mut |ui| ui.checkbox("Flag", false).map(|_| ()))
        .unwrap();

    let mut seen = None;
    let report = ctx
        .refresh(&mut |ui| {
            seen = Some(ui.checkbox("Flag", true)?);
            Ok(())
        })
        .unwrap();
    assert_eq!(report.passes, 1);
    assert_eq!(seen, Some((false, true)));
    assert!(ctx.pending_activation().is_none());

    let handle = ctx.record("Flag").unwrap().handle();
    assert_eq!(ctx.factory().arena().get(handle).map(|w| w.value.clone()), Some(Value::Bool(true)));
}

#[test]
fn test_clicking_add_creates_a_button_below() {
    let mut ctx = context();
    let mut extra: Vec<String> = Vec::new();
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        if ui.add(Button::new("Add"))? {
            extra.push(format!("Button {}", extra.len()));
        }
        for label in &extra {
            ui.button(label)?;
        }
        Ok(())
    };
    ctx.refresh(&mut draw).unwrap();
    let add = ctx.record("Add").unwrap().handle();
    let before = ctx.pass_count();

    let (_, report) = ctx
        .dispatch(&mut draw, |tk| tk.click(add))
        .unwrap();
    let report = report.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.passes, 2);

    let record = ctx.record("Button 0").unwrap();
    assert_eq!(record.created_pass(), before + 1);
    assert!(position(&ctx, "Button 0").y > position(&ctx, "Add").y);
}

#[test]
fn test_checkbox_click_reports_change() {
    let mut ctx = context();
    let mut checked = false;
    let mut changes = 0;
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        let (changed, value) = ui.checkbox("Check", checked)?;
        if changed {
            changes += 1;
        }
        checked = value;
        Ok(())
    };
    ctx.refresh(&mut draw).unwrap();
    let handle = ctx.factory().find(WidgetKind::Checkbutton, "Check").unwrap();

    let (_, report) = ctx.dispatch(&mut draw, |tk| tk.click(handle)).unwrap();
    assert_eq!(report.map(|r| r.passes), Some(2));
    drop(draw);
    assert!(checked);
    assert_eq!(changes, 1);
}

#[test]
fn test_missing_widget_kind_is_reported() {
    let toolkit = HeadlessToolkit::with_kinds(Size::new(400, 300), &[WidgetKind::Button]);
    let mut ctx = Context::new(toolkit, &Config::default());
    let err = ctx
        .refresh(&mut |ui| {
            ui.button("Fine")?;
            ui.checkbox("Missing", false)?;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(
        im_error(&err),
        Some(&ImError::UnknownWidgetKind {
            kind: WidgetKind::Checkbutton.as_str()
        })
    );
}

#[test]
fn test_refreshing_another_context_inside_draw_is_rejected() {
    let mut outer = context();
    let mut nested = None;
    outer
        .refresh(&mut |_ui| {
            let mut inner = context();
            nested = Some(inner.refresh(&mut |_ui| Ok(())).map(|_| ()));
            Ok(())
        })
        .unwrap();

    let err = nested.unwrap().unwrap_err();
    assert_eq!(im_error(&err), Some(&ImError::ReentrantActivation));

    // the outer guard was released
    let mut again = context();
    again.refresh(&mut |_ui| Ok(())).unwrap();
}

#[test]
fn test_frame_is_sized_to_children_and_placed() {
    let mut ctx = context();
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        ui.frame("box", |ui| ui.button("Go").map(|_| ()))
    };
    ctx.refresh(&mut draw).unwrap();

    let frame = ctx.record("box").unwrap().handle();
    // button: 2 chars * 7 + 20 wide, 26 high, at (PAD, 2 * PAD) inside
    let size = Size::new(PAD + 34 + PAD, 2 * PAD + 26 + PAD);
    assert!(ctx.factory().calls().contains(&NativeCall::Resize { handle: frame, size }));
    assert_eq!(position(&ctx, "box"), Point::new(PAD, 2 * PAD));
    assert_eq!(position(&ctx, "Go"), Point::new(PAD, 2 * PAD));
    assert_eq!(
        ctx.factory().arena().get(ctx.record("Go").unwrap().handle()).and_then(|w| w.parent),
        Some(frame)
    );

    ctx.factory_mut().take_calls();
    ctx.refresh(&mut draw).unwrap();
    assert!(
        !ctx.factory()
            .calls()
            .iter()
            .any(|c| matches!(c, NativeCall::Resize { .. }))
    );
}

#[test]
fn test_labelframe_reserves_title_padding() {
    let mut ctx = context();
    ctx.refresh(&mut |ui| {
        ui.frame("plain", |ui| ui.button("A").map(|_| ()))?;
        ui.labelframe("Titled#1", |ui| ui.button("B").map(|_| ()))?;
        Ok(())
    })
    .unwrap();

    let sizes: Vec<Size> = ctx
        .factory()
        .calls()
        .iter()
        .filter_map(|c| match c {
            NativeCall::Resize { size, .. } => Some(*size),
            _ => None,
        })
        .collect();
    assert_eq!(sizes.len(), 2);
    let labelframe_padding = Config::default().layout.labelframe_padding;
    assert_eq!(sizes[1].height, sizes[0].height + labelframe_padding);

    let titled = ctx.record("Titled#1").unwrap().handle();
    assert_eq!(
        ctx.factory().arena().get(titled).map(|w| w.text.as_str()),
        Some("Titled")
    );
}

#[test]
fn test_scrollbar_follows_content_height() {
    let mut ctx = Context::new(HeadlessToolkit::new(Size::new(400, 100)), &Config::default());
    let rows = Cell::new(10);
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        for i in 0..rows.get() {
            ui.button(&format!("Row {i}"))?;
        }
        Ok(())
    };
    ctx.refresh(&mut draw).unwrap();
    assert!(ctx.content_size().height > 100);
    assert!(ctx.factory().scrollbar().is_some());

    ctx.scroll_by(1000);
    assert_eq!(ctx.factory().scroll_offset(), ctx.content_size().height - 100);

    rows.set(1);
    ctx.refresh(&mut draw).unwrap();
    assert!(ctx.factory().scrollbar().is_none());
    assert_eq!(ctx.factory().scroll_offset(), 0);
}

#[test]
fn test_loop_policy_defers_refresh_to_timer() {
    let mut ctx = Context::with_policy(
        HeadlessToolkit::new(Size::new(400, 300)),
        RefreshPolicy::loop_every(25),
    );
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        ui.checkbox("Check", false).map(|_| ())
    };
    ctx.refresh(&mut draw).unwrap();
    let handle = ctx.record("Check").unwrap().handle();

    let (_, report) = ctx.dispatch(&mut draw, |tk| tk.click(handle)).unwrap();
    assert!(report.is_none());
    assert_eq!(ctx.pending_activation().as_deref(), Some("Check"));

    let deadline = ctx.next_deadline().unwrap();
    let report = ctx.on_timer(deadline, &mut draw).unwrap().unwrap();
    assert_eq!(report.passes, 1);
}

#[test]
fn test_programmatic_writes_to_inputs_do_not_activate() {
    let mut ctx = context();
    let updated = Cell::new(false);
    let mut text = None;
    let mut int_spin = None;
    let mut float_spin = None;
    let mut int_slider = None;
    let mut float_slider = None;
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        let next = updated.get();
        text = Some(ui.input_text("Name", if next { "new" } else { "old" })?);
        int_spin = Some(ui.input_int("Count#spin", if next { 7 } else { 3 }, 0..=10)?);
        float_spin = Some(ui.input_float("Ratio#spin", if next { 1.5 } else { 0.5 }, 0.0..=2.0)?);
        int_slider = Some(ui.int_slider("Level", if next { 8 } else { 2 }, 0..=10)?);
        float_slider = Some(ui.float_slider("Speed", if next { 1.25 } else { 0.25 }, 0.0..=2.0)?);
        Ok(())
    };
    ctx.refresh(&mut draw).unwrap();

    updated.set(true);
    let report = ctx.refresh(&mut draw).unwrap();
    assert_eq!(report.passes, 1);
    assert!(ctx.pending_activation().is_none());
    drop(draw);

    assert_eq!(text, Some((false, "new".to_string())));
    assert_eq!(int_spin, Some((false, 7)));
    assert_eq!(float_spin, Some((false, 1.5)));
    assert_eq!(int_slider, Some((false, 8)));
    assert_eq!(float_slider, Some((false, 1.25)));
}

#[test]
fn test_hidden_frame_is_swept_with_its_children() {
    let mut ctx = context();
    let shown = Cell::new(true);
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        ui.button("Outside")?;
        if shown.get() {
            ui.labelframe("Details", |ui| {
                ui.button("Inside")?;
                ui.checkbox("Also inside", false).map(|_| ())
            })?;
        }
        Ok(())
    };
    ctx.refresh(&mut draw).unwrap();
    let frame = ctx.record("Details").unwrap().handle();
    ctx.factory_mut().take_calls();

    shown.set(false);
    let report = ctx.refresh(&mut draw).unwrap();
    assert_eq!(report.destroyed, 3);
    assert_eq!(ctx.len(), 1);
    assert!(ctx.record("Inside").is_none());
    assert!(ctx.record("Also inside").is_none());
    assert_eq!(ctx.factory().arena().len(), 1);
    // the children go down with the frame
    let destroyed: Vec<_> = ctx
        .factory()
        .calls()
        .iter()
        .filter(|c| matches!(c, NativeCall::Destroy(_)))
        .collect();
    assert_eq!(destroyed, vec![&NativeCall::Destroy(frame)]);
}

/// Every record must point at a live native widget whose parent is the
/// record's container.
fn assert_handles_alive(ctx: &Context<HeadlessToolkit>) {
    for record in ctx.records() {
        let widget = ctx.factory().arena().get(record.handle());
        let widget = widget.unwrap_or_else(|| panic!("{} has a dead handle", record.identifier()));
        assert_eq!(widget.parent, record.parent(), "{}", record.identifier());
    }
}

#[test]
fn test_widget_leaving_a_frame_gets_a_live_root_widget() {
    let mut ctx = context();
    let in_frame = Cell::new(true);
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        if in_frame.get() {
            ui.frame("box", |ui| ui.button("OK").map(|_| ()))
        } else {
            ui.button("OK").map(|_| ())
        }
    };
    ctx.refresh(&mut draw).unwrap();
    let before = ctx.record("OK").unwrap().handle();

    in_frame.set(false);
    ctx.refresh(&mut draw).unwrap();
    let record = ctx.record("OK").unwrap();
    assert_ne!(record.handle(), before);
    assert_eq!(record.parent(), None);
    assert!(ctx.record("box").is_none());
    assert_eq!(ctx.factory().arena().len(), 1);
    assert_handles_alive(&ctx);

    // and it stays put afterwards
    let report = ctx.refresh(&mut draw).unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.destroyed, 0);
}

#[test]
fn test_widget_entering_a_frame_is_created_inside_it() {
    let mut ctx = context();
    let in_frame = Cell::new(false);
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        if in_frame.get() {
            ui.frame("box", |ui| ui.button("OK").map(|_| ()))
        } else {
            ui.button("OK").map(|_| ())
        }
    };
    ctx.refresh(&mut draw).unwrap();
    let before = ctx.record("OK").unwrap().handle();

    in_frame.set(true);
    ctx.refresh(&mut draw).unwrap();
    let frame = ctx.record("box").unwrap().handle();
    let button = ctx.record("OK").unwrap();
    assert_eq!(button.parent(), Some(frame));
    assert!(ctx.factory().calls().contains(&NativeCall::Destroy(before)));
    assert_eq!(position(&ctx, "OK"), Point::new(PAD, 2 * PAD));
    assert_handles_alive(&ctx);
}

#[test]
fn test_frame_redeclared_as_button_releases_its_children() {
    let mut ctx = context();
    let as_frame = Cell::new(true);
    let mut draw = |ui: &mut Ui<'_, HeadlessToolkit>| -> Result<()> {
        if as_frame.get() {
            ui.frame("X", |ui| ui.button("child").map(|_| ()))
        } else {
            ui.button("X")?;
            ui.button("child").map(|_| ())
        }
    };
    ctx.refresh(&mut draw).unwrap();

    as_frame.set(false);
    ctx.refresh(&mut draw).unwrap();
    assert_eq!(ctx.record("X").map(|r| r.kind()), Some(WidgetKind::Button));
    assert_eq!(ctx.len(), 2);
    assert_eq!(ctx.factory().arena().len(), 2);
    assert_handles_alive(&ctx);
}
