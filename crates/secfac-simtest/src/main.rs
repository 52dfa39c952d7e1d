//! SecFac Headless Simulation Harness
//!
//! Replays a scripted scenario against the facility engine and validates the
//! end state. Runs entirely in-process: no rendering, no input.
//!
//! Usage:
//!   cargo run -p secfac-simtest
//!   cargo run -p secfac-simtest -- --verbose
//!   cargo run -p secfac-simtest -- --scenario path/to/scenario.json

use secfac_core::prelude::*;
use serde::Deserialize;

// ── Default scenario ────────────────────────────────────────────────────
const SCENARIO_JSON: &str = include_str!("../../../data/scenario.json");

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    ticks: u64,
    #[serde(default)]
    config: FacilityConfig,
    commands: Vec<Command>,
    expect: Expectations,
}

#[derive(Debug, Deserialize)]
struct Expectations {
    employees: usize,
    open_area: Option<Viewport>,
    #[serde(default)]
    pending: usize,
    #[serde(default)]
    elevators: Vec<ElevatorExpectation>,
}

#[derive(Debug, Deserialize)]
struct ElevatorExpectation {
    index: usize,
    cabin_floor: i32,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let scenario_path = args
        .iter()
        .position(|a| a == "--scenario")
        .and_then(|i| args.get(i + 1));

    // Engine output goes through `log`; the subscriber picks it up via its log bridge
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    println!("=== SecFac Simulation Harness ===\n");

    let source = match scenario_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Cannot read scenario {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => SCENARIO_JSON.to_string(),
    };

    let mut results = Vec::new();

    // 1. Scenario parsing
    let scenario = match serde_json::from_str::<Scenario>(&source) {
        Ok(s) => {
            results.push(TestResult {
                name: "scenario_parse".into(),
                passed: true,
                detail: format!(
                    "'{}': {} commands over {} ticks",
                    s.name,
                    s.commands.len(),
                    s.ticks
                ),
            });
            Some(s)
        }
        Err(e) => {
            results.push(TestResult {
                name: "scenario_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            None
        }
    };

    if let Some(scenario) = scenario {
        // 2. Scripted run
        match run_scenario(&scenario) {
            Ok(facility) => {
                results.push(TestResult {
                    name: "scenario_run".into(),
                    passed: true,
                    detail: format!("{} ticks without error", facility.tick_count()),
                });
                results.extend(validate_staff(&scenario, &facility, verbose));
                results.extend(validate_grid(&scenario, &facility));
                results.extend(validate_elevators(&scenario, &facility));
                results.extend(validate_determinism(&scenario, &facility));
            }
            Err(e) => results.push(TestResult {
                name: "scenario_run".into(),
                passed: false,
                detail: format!("simulation error: {}", e),
            }),
        }
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run_scenario(scenario: &Scenario) -> Result<Facility, FacilityError> {
    let mut facility = Facility::new(scenario.config.clone());
    let mut commands = CommandQueue::new();
    commands.extend(scenario.commands.iter().cloned());
    facility.step_n(scenario.ticks, &mut commands)?;
    Ok(facility)
}

// ── Staff ───────────────────────────────────────────────────────────────

fn validate_staff(scenario: &Scenario, facility: &Facility, verbose: bool) -> Vec<TestResult> {
    println!("--- Staff ---");
    let mut results = Vec::new();
    let staff = facility.employees();

    results.push(TestResult {
        name: "staff_hired".into(),
        passed: staff.len() == scenario.expect.employees,
        detail: format!(
            "{} hired, {} expected",
            staff.len(),
            scenario.expect.employees
        ),
    });

    if verbose {
        for s in &staff {
            println!("    {} at {} ({:?})", s.role, s.position, s.state);
        }
    }

    let in_rock: Vec<_> = staff
        .iter()
        .filter(|s| facility.is_solid(s.position))
        .collect();
    results.push(TestResult {
        name: "staff_on_open_ground".into(),
        passed: in_rock.is_empty(),
        detail: if in_rock.is_empty() {
            "nobody stands inside rock".into()
        } else {
            format!(
                "{} inside rock: {}",
                in_rock.len(),
                in_rock
                    .iter()
                    .map(|s| s.position.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        },
    });

    let busy = staff
        .iter()
        .filter(|s| s.state != BehaviorState::Idle)
        .count();
    results.push(TestResult {
        name: "staff_settled".into(),
        passed: busy == 0,
        detail: format!("{} of {} still busy", busy, staff.len()),
    });

    results
}

// ── Grid and ledger ─────────────────────────────────────────────────────

fn validate_grid(scenario: &Scenario, facility: &Facility) -> Vec<TestResult> {
    println!("--- Grid ---");
    let mut results = Vec::new();

    if let Some(area) = scenario.expect.open_area {
        let still_solid: Vec<_> = area.cells().filter(|c| facility.is_solid(*c)).collect();
        results.push(TestResult {
            name: "area_dug".into(),
            passed: still_solid.is_empty(),
            detail: if still_solid.is_empty() {
                format!("{} cells open", area.cells().count())
            } else {
                format!(
                    "{} cells still solid: {}",
                    still_solid.len(),
                    still_solid
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            },
        });
    }

    // Surface rows never take digs, so they stay open and untouched
    let grid = facility.grid();
    let surface_open = (0..=grid.surface_depth())
        .flat_map(|y| (0..grid.width()).map(move |x| Coord::new(x, y)))
        .all(|c| !grid.is_solid(c));
    results.push(TestResult {
        name: "surface_open".into(),
        passed: surface_open,
        detail: format!("rows 0..={} open", grid.surface_depth()),
    });

    let ledger = facility.ledger();
    results.push(TestResult {
        name: "ledger_pending".into(),
        passed: ledger.pending_count() == scenario.expect.pending,
        detail: format!(
            "{} pending, {} expected",
            ledger.pending_count(),
            scenario.expect.pending
        ),
    });
    results.push(TestResult {
        name: "ledger_nothing_in_progress".into(),
        passed: ledger.in_progress_count() == 0,
        detail: format!("{} in progress", ledger.in_progress_count()),
    });

    results
}

// ── Elevators ───────────────────────────────────────────────────────────

fn validate_elevators(scenario: &Scenario, facility: &Facility) -> Vec<TestResult> {
    println!("--- Elevators ---");
    let mut results = Vec::new();

    for expected in &scenario.expect.elevators {
        let name = format!("elevator_{}", expected.index);
        let Some(elevator) = facility.elevator(expected.index) else {
            results.push(TestResult {
                name,
                passed: false,
                detail: "never built".into(),
            });
            continue;
        };
        let served = !elevator.is_called_or_has_destination();
        results.push(TestResult {
            name,
            passed: served && elevator.cabin_floor == expected.cabin_floor,
            detail: format!(
                "cabin at {} ({} expected), {:?}, {}",
                elevator.cabin_floor,
                expected.cabin_floor,
                elevator.direction,
                if served {
                    "all requests served"
                } else {
                    "requests outstanding"
                }
            ),
        });
    }

    results
}

// ── Determinism ─────────────────────────────────────────────────────────

fn validate_determinism(scenario: &Scenario, facility: &Facility) -> Vec<TestResult> {
    println!("--- Determinism ---");
    if scenario.config.seed.is_none() {
        return vec![TestResult {
            name: "replay_matches".into(),
            passed: true,
            detail: "skipped, scenario has no seed".into(),
        }];
    }

    let replay = match run_scenario(scenario) {
        Ok(f) => f,
        Err(e) => {
            return vec![TestResult {
                name: "replay_matches".into(),
                passed: false,
                detail: format!("replay failed: {}", e),
            }]
        }
    };

    let positions = |f: &Facility| {
        f.employees()
            .iter()
            .map(|s| (s.position, s.state))
            .collect::<Vec<_>>()
    };
    let same_staff = positions(facility) == positions(&replay);
    let same_grid = facility.grid().open_cell_count() == replay.grid().open_cell_count();

    vec![TestResult {
        name: "replay_matches".into(),
        passed: same_staff && same_grid,
        detail: format!(
            "staff {}, grid {}",
            if same_staff { "identical" } else { "diverged" },
            if same_grid { "identical" } else { "diverged" }
        ),
    }]
}
