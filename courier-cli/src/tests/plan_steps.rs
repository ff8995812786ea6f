//! Behaviour-driven step definitions driving the plan and demo scenarios.

use super::helpers::{
    DESTINATION_ID, ORIGIN_ID, delivery_snapshot, parse_output, printed_stop_ids, utf8_root,
    write_snapshot, write_utf8,
};
use super::*;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

const DEMO_ARGS: [&str; 8] = [
    "--origins",
    "3",
    "--destinations",
    "3",
    "--orders",
    "2",
    "--seed",
    "7",
];

/// Aggregates plan command scenario state behind a single world argument.
#[derive(Debug)]
struct PlanWorld {
    _dir: TempDir,
    snapshot_path: Utf8PathBuf,
    include_snapshot: RefCell<bool>,
    strategy: RefCell<Option<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl PlanWorld {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let snapshot_path = utf8_root(&dir).join("snapshot.json");
        Self {
            _dir: dir,
            snapshot_path,
            include_snapshot: RefCell::new(true),
            strategy: RefCell::new(None),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn plan_command_line(&self) -> Vec<String> {
        let mut argv = vec!["courier".to_owned(), "plan".to_owned()];
        if *self.include_snapshot.borrow() {
            argv.push(self.snapshot_path.to_string());
        }
        if let Some(strategy) = self.strategy.borrow().as_ref() {
            argv.push(format!("--{ARG_STRATEGY}"));
            argv.push(strategy.clone());
        }
        argv
    }

    fn run(&self, argv: Vec<String>) {
        let mut buffer = self.stdout.borrow_mut();
        buffer.clear();
        let outcome = run_with(argv, &mut *buffer);
        self.result.replace(Some(outcome));
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }

    fn printed_plan(&self) -> serde_json::Value {
        let borrowed = self.result.borrow();
        borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect("expected success");
        parse_output(&self.stdout.borrow())
    }
}

fn demo_command_line(extra: &[&str]) -> Vec<String> {
    ["courier", "demo"]
        .iter()
        .chain(extra)
        .map(|arg| (*arg).to_owned())
        .collect()
}

#[fixture]
fn world() -> PlanWorld {
    PlanWorld::new()
}

#[given("a delivery snapshot exists on disk")]
fn delivery_snapshot_exists(#[from(world)] world: &PlanWorld) {
    let root = world
        .snapshot_path
        .parent()
        .expect("snapshot has a parent directory");
    let written = write_snapshot(root, &delivery_snapshot());
    assert_eq!(written, world.snapshot_path);
}

#[given("the snapshot contains invalid JSON")]
fn snapshot_contains_invalid_json(#[from(world)] world: &PlanWorld) {
    write_utf8(&world.snapshot_path, "{ not valid json");
}

#[given("I omit the snapshot path")]
fn omit_snapshot_path(#[from(world)] world: &PlanWorld) {
    world.include_snapshot.replace(false);
}

#[given("I select the all-possible-paths strategy")]
fn select_exhaustive(#[from(world)] world: &PlanWorld) {
    world.strategy.replace(Some("all-possible-paths".to_owned()));
}

#[given("I select the greedy strategy")]
fn select_greedy(#[from(world)] world: &PlanWorld) {
    world.strategy.replace(Some("greedy".to_owned()));
}

#[when("I run the plan command")]
fn run_plan_command(#[from(world)] world: &PlanWorld) {
    world.run(world.plan_command_line());
}

#[when("I run the demo command with seed 7")]
fn run_seeded_demo(#[from(world)] world: &PlanWorld) {
    world.run(demo_command_line(&DEMO_ARGS));
}

#[when("I run the demo command with 3 orders for 2 destinations")]
fn run_oversubscribed_demo(#[from(world)] world: &PlanWorld) {
    world.run(demo_command_line(&["--destinations", "2", "--orders", "3"]));
}

#[then("the command prints a route costing 11.12")]
fn prints_route_costing(#[from(world)] world: &PlanWorld) {
    let plan = world.printed_plan();
    assert_eq!(
        plan.pointer("/route/total_cost")
            .and_then(serde_json::Value::as_str),
        Some("11.12")
    );
}

#[then("the route collects the order before delivering it")]
fn collects_before_delivering(#[from(world)] world: &PlanWorld) {
    let plan = world.printed_plan();
    assert_eq!(
        printed_stop_ids(&plan),
        vec![ORIGIN_ID.to_string(), DESTINATION_ID.to_string()]
    );
}

#[then("the command prints a route")]
fn prints_a_route(#[from(world)] world: &PlanWorld) {
    let plan = world.printed_plan();
    assert!(plan.get("agent_id").is_some());
    assert!(!printed_stop_ids(&plan).is_empty());
}

#[then("the printed plan matches a second run with seed 7")]
fn plan_matches_second_run(#[from(world)] world: &PlanWorld) {
    let first = world.printed_plan();
    let mut rerun = Vec::new();
    run_with(demo_command_line(&DEMO_ARGS), &mut rerun).expect("second demo run");
    assert_eq!(first, parse_output(&rerun));
}

#[then("the command fails because the strategy is unknown")]
fn fails_unknown_strategy(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::InvalidStrategy(_) => {}
        other => panic!("expected InvalidStrategy, found {other:?}"),
    }
}

#[then("the command fails because the snapshot JSON is invalid")]
fn fails_invalid_json(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::ParseSnapshot { path, .. } => assert_eq!(*path, world.snapshot_path),
        other => panic!("expected ParseSnapshot, found {other:?}"),
    }
}

#[then("the command fails because the snapshot path is missing")]
fn fails_missing_snapshot(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_SNAPSHOT);
            assert_eq!(*env, ENV_PLAN_SNAPSHOT);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the demo is invalid")]
fn fails_invalid_demo(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::InvalidDemo { .. } => {}
        other => panic!("expected InvalidDemo, found {other:?}"),
    }
}

macro_rules! register_plan_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/plan_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: PlanWorld) {
            let _ = world;
        }
    };
}

register_plan_scenario!(plan_happy_path, "planning a route from a JSON snapshot");
register_plan_scenario!(plan_exhaustive, "planning with the exhaustive finder");
register_plan_scenario!(plan_unknown_strategy, "rejecting an unknown strategy");
register_plan_scenario!(plan_invalid_json, "rejecting invalid snapshot JSON");
register_plan_scenario!(plan_missing_snapshot, "rejecting a missing snapshot path");
register_plan_scenario!(demo_seeded, "planning a seeded demo");
register_plan_scenario!(
    demo_invalid,
    "rejecting a demo with more orders than destinations"
);
