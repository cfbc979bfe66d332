use planboard::board::PlanBoard;
use planboard::crud::{BoardSnapshot, FileTransport};
use planboard::drag::{DropOutcome, Point};
use planboard::notify::{Notifier, Severity};
use planboard::persistence::{export_events_to_csv, save_board_to_json};
use planboard::surface::{Orientation, SurfaceConfig};
use std::io::{self, BufRead, Write};

/// Prints toasts straight to stdout so scripted sessions can assert on them.
struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn notify(&self, message: &str, severity: Severity, _timeout_ms: u64) {
        match severity {
            Severity::Info => println!("{message}"),
            Severity::Warning => println!("warning: {message}"),
            Severity::Error => println!("error: {message}"),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  reload                     load board data from the backend");
    println!("  reset                      restore the backend seed data");
    println!("  sync                       push pending changes to the backend");
    println!("  show                       list resources and scheduled tasks");
    println!("  unplanned                  list the unplanned pool");
    println!("  begin <id> <x> <y> [grab]  start dragging an unplanned item");
    println!("  move <x> <y>               move the active drag");
    println!("  drop                       release the active drag");
    println!("  cancel                     abandon the active drag");
    println!("  drag <id> <x> <y>          begin + move + drop in one step");
    println!("  mode <horizontal|vertical> toggle the view orientation");
    println!("  save <path>                write the board snapshot as JSON");
    println!("  export <path>              write the scheduled set as CSV");
    println!("  quit");
}

fn show_board(board: &PlanBoard) {
    println!("Resources:");
    for resource in board.resources() {
        println!("  {:>4}  {}", resource.id, resource.name);
    }
    println!("Scheduled tasks:");
    if board.store().scheduled().is_empty() {
        println!("  (none)");
    }
    for task in board.store().scheduled() {
        println!(
            "  {:>4}  {:<28} {}  {}{}  resource {}",
            task.id,
            task.name,
            task.start_date.format("%Y-%m-%d %H:%M"),
            task.duration,
            task.duration_unit.suffix(),
            task.resource_id
        );
    }
}

fn show_unplanned(board: &PlanBoard) {
    println!("Unplanned pool:");
    if board.store().unplanned().is_empty() {
        println!("  (empty)");
    }
    for item in board.store().unplanned() {
        println!(
            "  {:>4}  {:<28} {}{}",
            item.id,
            item.name,
            item.duration,
            item.duration_unit.suffix()
        );
    }
}

fn report_outcome(outcome: DropOutcome) {
    match outcome {
        DropOutcome::Committed { task, .. } => {
            println!(
                "Scheduled \"{}\" at {} on resource {} (id {}).",
                task.name,
                task.start_date.format("%Y-%m-%d %H:%M"),
                task.resource_id,
                task.id
            );
        }
        DropOutcome::DuplicateSuppressed { name } => {
            println!("A task named \"{name}\" is already scheduled; nothing added.");
        }
        DropOutcome::Aborted => println!("Drag aborted."),
    }
}

fn snapshot_of(board: &PlanBoard) -> BoardSnapshot {
    BoardSnapshot {
        resources: board.resources().to_vec(),
        events: board.store().scheduled().to_vec(),
        unplanned: board.store().unplanned().to_vec(),
    }
}

fn parse_number<T: std::str::FromStr>(token: Option<&str>) -> Option<T> {
    token.and_then(|value| value.parse().ok())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let data_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/board.json".to_string());

    let transport = FileTransport::with_seed(&data_path, &data_path);
    let mut board = PlanBoard::new(
        SurfaceConfig::default(),
        Box::new(transport),
        Box::new(PrintNotifier),
    );

    println!("planboard CLI — type `help` for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            continue;
        };

        match command {
            "help" => print_help(),
            "reload" => {
                let _ = board.reload().await;
            }
            "reset" => {
                let _ = board.reset().await;
            }
            "sync" => {
                if board.sync().await.is_ok() {
                    println!("Synced.");
                }
            }
            "show" => show_board(&board),
            "unplanned" => show_unplanned(&board),
            "begin" => {
                let (Some(id), Some(x), Some(y)) = (
                    parse_number::<i64>(tokens.next()),
                    parse_number::<f64>(tokens.next()),
                    parse_number::<f64>(tokens.next()),
                ) else {
                    println!("usage: begin <id> <x> <y> [grab]");
                    continue;
                };
                let grab = parse_number::<f64>(tokens.next()).unwrap_or(0.0);
                match board.begin_drag(id, Point::new(x, y), grab) {
                    Ok(proxy) => println!(
                        "Dragging (proxy {:.0}x{:.0}, grab {:.0}).",
                        proxy.width, proxy.height, proxy.grab_offset
                    ),
                    Err(err) => println!("error: {err}"),
                }
            }
            "move" => {
                let (Some(x), Some(y)) = (
                    parse_number::<f64>(tokens.next()),
                    parse_number::<f64>(tokens.next()),
                ) else {
                    println!("usage: move <x> <y>");
                    continue;
                };
                match board.move_drag(Point::new(x, y)) {
                    Some(context) if context.valid => {
                        let start = context.candidate_start.expect("valid context has start");
                        println!(
                            "Candidate: {} on resource {}.",
                            start.format("%Y-%m-%d %H:%M"),
                            context.candidate_resource.expect("valid context has resource")
                        );
                    }
                    Some(_) => println!("Outside the droppable surface."),
                    None => println!("No drag in progress."),
                }
            }
            "drop" => report_outcome(board.release_drag()),
            "cancel" => {
                board.cancel_drag();
                println!("Cancelled.");
            }
            "drag" => {
                let (Some(id), Some(x), Some(y)) = (
                    parse_number::<i64>(tokens.next()),
                    parse_number::<f64>(tokens.next()),
                    parse_number::<f64>(tokens.next()),
                ) else {
                    println!("usage: drag <id> <x> <y>");
                    continue;
                };
                match board.begin_drag(id, Point::new(x, y), 0.0) {
                    Ok(_) => {
                        board.move_drag(Point::new(x, y));
                        report_outcome(board.release_drag());
                    }
                    Err(err) => println!("error: {err}"),
                }
            }
            "mode" => match tokens.next() {
                Some("horizontal") | Some("h") => {
                    board.set_view_mode(Orientation::Horizontal);
                    println!("Horizontal mode.");
                }
                Some("vertical") | Some("v") => {
                    board.set_view_mode(Orientation::Vertical);
                    println!("Vertical mode.");
                }
                _ => println!("usage: mode <horizontal|vertical>"),
            },
            "save" => {
                let Some(path) = tokens.next() else {
                    println!("usage: save <path>");
                    continue;
                };
                match save_board_to_json(&snapshot_of(&board), path) {
                    Ok(()) => println!("Board saved to {path}."),
                    Err(err) => println!("error: {err}"),
                }
            }
            "export" => {
                let Some(path) = tokens.next() else {
                    println!("usage: export <path>");
                    continue;
                };
                match export_events_to_csv(board.store().scheduled(), path) {
                    Ok(()) => println!("Events exported to {path}."),
                    Err(err) => println!("error: {err}"),
                }
            }
            "quit" | "exit" => break,
            other => println!("unknown command \"{other}\"; type `help`"),
        }
    }

    Ok(())
}
