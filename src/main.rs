use std::io::stdout;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossbeam::channel::{self, Receiver, select};
use crossterm::{
    ExecutableCommand,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;

use imtui::config::DEFAULT_LOOP_INTERVAL_MS;
use imtui::event::{TermEvent, spawn_input_reader};
use imtui::tui::Response;
use imtui::{
    Button, ComboBox, Config, Context, LabelPosition, LayoutConfig, ProgressBar, RefreshPolicy,
    Separator, Slider, TerminalToolkit, Ui,
};

/// Terminal cells are much coarser than pixels.
const TERMINAL_LAYOUT: LayoutConfig = LayoutConfig {
    padding: 1,
    labelframe_padding: 1,
};

/// Immediate-mode widgets in the terminal
#[derive(Parser)]
#[command(name = "imtui-demo", version, about, long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// `callback`, `loop`, or a loop interval in milliseconds
    #[arg(long)]
    refresh: Option<RefreshPolicy>,

    /// Loop-mode refresh interval
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Gap between widgets, in cells
    #[arg(long)]
    padding: Option<u16>,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let defaults = Config {
            layout: TERMINAL_LAYOUT,
            ..Config::default()
        };
        let mut config = match &self.config {
            Some(path) => Config::load_over(path, defaults)?,
            None => defaults,
        };
        if let Some(policy) = self.refresh {
            config.refresh = policy;
        }
        if let Some(ms) = self.interval_ms {
            if !config.refresh.is_callback() {
                config.refresh = RefreshPolicy::loop_every(ms);
            }
        }
        if let Some(padding) = self.padding {
            config.layout.padding = padding;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    let _log_guard = logging_guard(&config)?;

    info!("imtui-demo starting, refresh {}", config.refresh);

    // Enter alternate screen buffer and enable raw mode
    terminal::enable_raw_mode()?;
    stdout()
        .execute(EnterAlternateScreen)?
        .execute(EnableMouseCapture)?
        .execute(EnableBracketedPaste)?;

    let result = run(&config);

    // Always restore terminal state, even if run() fails
    stdout()
        .execute(DisableBracketedPaste)?
        .execute(DisableMouseCapture)?
        .execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    info!("imtui-demo shutting down");
    result
}

fn logging_guard(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    imtui::logging::init(&config.logging)
}

fn run(config: &Config) -> Result<()> {
    let mut ctx = Context::new(TerminalToolkit::detect()?, config);
    let mut app = DemoApp::new(config.refresh);
    let input = spawn_input_reader();
    event_loop(&mut ctx, &mut app, &input)
}

fn event_loop(
    ctx: &mut Context<TerminalToolkit>,
    app: &mut DemoApp,
    input: &Receiver<TermEvent>,
) -> Result<()> {
    let mut out = stdout();
    ctx.refresh(&mut |ui| app.draw(ui))?;
    ctx.factory().render(&mut out)?;

    loop {
        let timer = match ctx.next_deadline() {
            Some(deadline) => channel::at(deadline),
            None => channel::never(),
        };
        select! {
            recv(input) -> event => {
                let Ok(event) = event else {
                    info!("input closed");
                    break;
                };
                let (response, _) = ctx.dispatch(&mut |ui| app.draw(ui), |tk| tk.handle(&event))?;
                match response {
                    Response::Quit => break,
                    Response::Scroll(delta) => ctx.scroll_by(delta),
                    Response::Resized => {
                        ctx.refresh(&mut |ui| app.draw(ui))?;
                    }
                    Response::Handled | Response::Ignored => {}
                }
            }
            recv(timer) -> _ => {
                ctx.on_timer(Instant::now(), &mut |ui| app.draw(ui))?;
            }
        }

        if let Some(policy) = app.requested_policy.take() {
            ctx.set_refresh_policy(policy, &mut |ui| app.draw(ui))?;
            app.policy = policy;
        }
        ctx.factory().render(&mut out)?;
    }
    Ok(())
}

struct DemoApp {
    checked: bool,
    input_text: String,
    float_val: f64,
    int_val: i64,
    selected: usize,
    extra_buttons: usize,
    policy: RefreshPolicy,
    requested_policy: Option<RefreshPolicy>,
}

impl DemoApp {
    fn new(policy: RefreshPolicy) -> Self {
        Self {
            checked: true,
            input_text: "Write here ...".to_string(),
            float_val: 1.0,
            int_val: 50,
            selected: 0,
            extra_buttons: 0,
            policy,
            requested_policy: None,
        }
    }

    fn draw(&mut self, ui: &mut Ui<'_, TerminalToolkit>) -> Result<()> {
        ui.text("Just some random text")?;
        let summary = format!(
            "The text   {}\nThe float  {:.1}\nThe int    {}",
            self.input_text, self.float_val, self.int_val
        );
        ui.text_with_id(&summary, "test")?;
        let (changed, checked) = ui.checkbox("Checkbox", self.checked)?;
        self.checked = checked;

        ui.labelframe("Buttons in a Grid", |ui| {
            for i in 0..9 {
                if i % 3 != 0 {
                    ui.same_row()?;
                }
                if ui.button(&format!("Button#{i}"))? {
                    info!("button {i} was pressed");
                }
            }
            Ok(())
        })?;

        if changed {
            info!("checked state changed: {}", self.checked);
        }

        ui.add(Separator::new("a separator").style("info"))?;

        ui.frame("This frame is invisible", |ui| {
            ui.row(|ui| {
                for i in 0..2 {
                    if ui.add(Button::new(format!("Row Button#{i}")).style("outline danger"))? {
                        info!("row button {i} pressed");
                    }
                }
                Ok(())
            })
        })?;

        let choices = ["Option A", "Option B", "Option C"];
        let (changed, selected) = ui.add(
            ComboBox::new("A Combobox", self.selected, &choices)
                .label_position("left".parse::<LabelPosition>()?),
        )?;
        self.selected = selected;
        if changed {
            info!("combo box changed to {}", choices[selected.min(choices.len() - 1)]);
        }

        ui.add(
            ProgressBar::new("Progress", self.float_val)
                .range(0.0..=2.0)
                .show_progress(true)
                .style("striped info"),
        )?;

        (_, self.input_text) = ui.input_text("#Text input without label", &self.input_text)?;
        (_, self.input_text) = ui.input_text("Text input with label", &self.input_text)?;
        (_, self.float_val) = ui.float_slider("A float", self.float_val, 0.0..=2.0)?;
        (_, self.float_val) = ui.input_float("A float#spin", self.float_val, 0.0..=2.0)?;
        (_, self.int_val) = ui.add(Slider::new("An int", self.int_val, 0..=100).style("warning"))?;
        (_, self.int_val) = ui.input_int("An int#spin", self.int_val, 0..=100)?;

        ui.horizontal_separator("dynamic separator")?;
        ui.namespace("dynamic", |ui| {
            ui.row(|ui| {
                if ui.button("Add")? {
                    self.extra_buttons += 1;
                }
                if ui.button("Remove")? {
                    self.extra_buttons = self.extra_buttons.saturating_sub(1);
                }
                Ok(())
            })?;
            for i in 0..self.extra_buttons {
                if ui.button(&format!("Extra#{i}"))? {
                    info!("extra button {i} pressed");
                }
            }
            Ok(())
        })?;

        ui.text_with_id(&format!("Refresh mode: {}", self.policy), "mode")?;
        ui.same_row()?;
        if ui.button("Toggle")? {
            self.requested_policy = Some(match self.policy {
                RefreshPolicy::Callback => RefreshPolicy::loop_every(DEFAULT_LOOP_INTERVAL_MS),
                RefreshPolicy::Loop { .. } => RefreshPolicy::Callback,
            });
        }
        Ok(())
    }
}
