use anyhow::Result;
use colored::Colorize;
use hiitclock::catalog;
use hiitclock::display::phase_label;
use hiitclock::events::recv_skipping_lag;
use hiitclock::prelude::*;
use hiitclock::{ENGINE_NAME, VERSION as LIB_VERSION};
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct MyHighlighter;

impl Highlighter for MyHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    // Embedded at compile time from the root of the `rdx-hiitshell` crate.
    const LOGO_TEXT: &str = include_str!("../logo.log");
    println!("{}", LOGO_TEXT.cyan());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );

    println!("{}", "-------------------------------------------------------------------".dimmed());

    let license_blurb = "
    This software is provided 'as is', without warranty of any kind.
    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.
    ";

    println!("{}", version_string);
    println!("{}", license_blurb.dimmed());

    println!("{}", "-------------------------------------------------------------------".dimmed());
}

/// Spawns tasks that print session events and, while watching, the live clock.
fn spawn_event_listeners(engine: &HiitEngine, is_watching: Arc<AtomicBool>) {
    // Session Event Listener
    let mut session_rx = engine.subscribe_session_events();
    let listener_engine = engine.clone();
    tokio::spawn(async move {
        while let Some(event) = recv_skipping_lag(&mut session_rx).await {
            let line = match &event {
                SessionEvent::Started { snapshot } | SessionEvent::PhaseChanged { snapshot, .. } => {
                    let workout = listener_engine.workout().await;
                    format!(
                        "{} {}",
                        phase_label(snapshot, &workout).cyan().bold(),
                        format_clock(snapshot.remaining_ms)
                    )
                }
                SessionEvent::Finished { sets_completed } => {
                    format!("{} after {} set(s)", "Finished".green().bold(), sets_completed)
                }
                SessionEvent::StartRejected => "Nothing to start: the workout has no sets.".red().to_string(),
                other => format!("{:?}", other),
            };
            println!("\n<-- [SESSION] {}\n>> ", line);
        }
    });

    // Tick Listener (controlled by the shared flag), roughly once per second.
    let mut tick_rx = engine.subscribe_tick_events();
    let ticks_per_second = (1_000 / engine.tick_period().as_millis().max(1)).max(1) as u64;
    let watched_engine = engine.clone();
    tokio::spawn(async move {
        while let Some(event) = recv_skipping_lag(&mut tick_rx).await {
            if is_watching.load(Ordering::Relaxed) && event.tick_count % ticks_per_second == 0 {
                let workout = watched_engine.workout().await;
                println!(
                    "<-- [CLOCK] {} {}",
                    format_clock(event.snapshot.remaining_ms).bold(),
                    phase_label(&event.snapshot, &workout).dimmed()
                );
            }
        }
    });
}

/// Replaces one setting of the current workout, leaving every other field as it is.
async fn edit_setting(engine: &HiitEngine, setting: Setting, raw: &str) {
    match engine.workout().await.with_setting(setting, raw) {
        Ok(workout) => save_workout(engine, workout).await,
        Err(e) => println!("Error: {}", e),
    }
}

async fn save_workout(engine: &HiitEngine, workout: WorkoutConfig) {
    match engine.reconfigure(workout).await {
        Ok(()) => println!("--> Settings saved. The session has been reset."),
        Err(e) => println!("Error: {}", e),
    }
}

/// Shows `ms` in `unit_ms` steps, keeping any fraction.
fn in_units(ms: u64, unit_ms: u64) -> String {
    if ms % unit_ms == 0 {
        (ms / unit_ms).to_string()
    } else {
        format!("{}", ms as f64 / unit_ms as f64)
    }
}

async fn print_status(engine: &HiitEngine) {
    let snapshot = engine.snapshot().await;
    let frame = engine.display().await;
    let workout = engine.workout().await;
    println!("  Phase:     {}", snapshot.phase);
    println!("  Clock:     {}", frame.clock.bold());
    println!("  Label:     {}", frame.label.cyan());
    println!(
        "  Set:       {}/{}   Exercise: {}/{}",
        snapshot.current_set,
        workout.set_count,
        snapshot.current_exercise_index + 1,
        workout.exercises.len()
    );
    let c = frame.controls;
    let available: Vec<&str> = [
        (c.start, "start"),
        (c.pause, "pause"),
        (c.resume, "resume"),
        (c.stop, "stop"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    println!("  Controls:  {}", available.join(", "));
}

fn print_workout(workout: &WorkoutConfig) {
    println!("  Sets:                {}", workout.set_count);
    println!("  Rep duration (s):    {}", in_units(workout.exercise_duration_ms, 1_000));
    println!("  Rest between reps:   {} s", in_units(workout.rest_between_exercises_ms, 1_000));
    println!("  Rest between sets:   {} min", in_units(workout.rest_between_sets_ms, 60_000));
    println!("  Exercises:");
    for (index, name) in workout.exercises.iter().enumerate() {
        println!("    {:>2}. {}", index + 1, name);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => HiitConfig::load(&path)?,
        None => HiitConfig::default(),
    };
    let engine = HiitEngine::new(config);

    // Create the shared flag for the clock listener.
    let is_watching = Arc::new(AtomicBool::new(false));
    spawn_event_listeners(&engine, is_watching.clone());
    info!("{} ready.", ENGINE_NAME);

    let mut rl = Editor::new()?;
    rl.set_helper(Some(MyHighlighter {}));

    println!("{} is ready. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        let readline = rl.readline(&prompt);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();

                if let Some(command) = args.first() {
                    match *command {
                        "start" => engine.start().await,
                        "pause" => engine.pause().await,
                        "resume" => engine.resume().await,
                        "stop" => engine.stop().await,
                        "status" => print_status(&engine).await,
                        "watch" => match args.get(1) {
                            Some(&"on") => {
                                is_watching.store(true, Ordering::Relaxed);
                                println!("--> Printing the clock once per second.");
                            }
                            Some(&"off") => {
                                is_watching.store(false, Ordering::Relaxed);
                                println!("--> Stopped printing the clock.");
                            }
                            _ => println!("Usage: watch <on|off>"),
                        },
                        "set" => match (args.get(1), args.get(2)) {
                            (Some(field), Some(value)) => {
                                let setting = match *field {
                                    "sets" => Some(Setting::Sets),
                                    "rep" => Some(Setting::RepDurationSecs),
                                    "rest" => Some(Setting::RestBetweenRepsSecs),
                                    "setrest" => Some(Setting::RestBetweenSetsMins),
                                    _ => None,
                                };
                                match setting {
                                    Some(setting) => edit_setting(&engine, setting, value).await,
                                    None => println!("Unknown setting '{}'. Try sets, rep, rest or setrest.", field),
                                }
                            }
                            _ => println!("Usage: set <sets|rep|rest|setrest> <VALUE>"),
                        },
                        "exercises" => {
                            let name = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
                            match args.get(1) {
                                None | Some(&"list") => print_workout(&engine.workout().await),
                                Some(&"catalog") => {
                                    for name in catalog::all() {
                                        println!("  {}", name);
                                    }
                                }
                                Some(&"add") if !name.is_empty() => match catalog::lookup(&name) {
                                    Some(found) => {
                                        let mut workout = engine.workout().await;
                                        workout.exercises.push(found.to_string());
                                        save_workout(&engine, workout).await;
                                    }
                                    None => println!("Error: '{}' is not in the catalog. Try 'exercises catalog'.", name),
                                },
                                Some(&"remove") if !name.is_empty() => {
                                    let target = catalog::lookup(&name).map(str::to_string).unwrap_or(name);
                                    let mut workout = engine.workout().await;
                                    let removed = workout.remove_exercise(&target);
                                    if removed == 0 {
                                        // Nothing changed, so the running session is left alone.
                                        println!("--> '{}' is not in the workout.", target);
                                    } else {
                                        save_workout(&engine, workout).await;
                                        println!("--> Removed {} entr{}.", removed, if removed == 1 { "y" } else { "ies" });
                                    }
                                }
                                _ => println!("Usage: exercises [list|catalog|add <NAME>|remove <NAME>]"),
                            }
                        }
                        "help" => {
                            println!("Available commands:");
                            println!("  start | pause | resume | stop  - Control the session.");
                            println!("  status                        - Shows the phase, clock and set/exercise.");
                            println!("  watch <on|off>                - Prints the live clock once per second.");
                            println!("  set sets <N>                  - Number of sets.");
                            println!("  set rep <S>                   - Exercise duration in seconds.");
                            println!("  set rest <S>                  - Rest between exercises in seconds.");
                            println!("  set setrest <M>               - Rest between sets in minutes.");
                            println!("  exercises [list]              - Shows the current workout.");
                            println!("  exercises catalog             - Lists every known exercise.");
                            println!("  exercises add|remove <NAME>   - Edits the exercise list.");
                            println!("  exit                          - Quits the shell.");
                        }
                        "exit" => break,
                        _ => println!("Unknown command: '{}'. Type 'help'.", line),
                    }
                }
            }
            Err(_) => {
                println!("Exiting hiitshell...");
                break;
            }
        }
    }

    engine.stop().await;
    Ok(())
}
