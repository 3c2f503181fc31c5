use chrono::NaiveDate;
use serde_json::{json, Value};
use work_reports::blocks::{Bar, Block, Table, Tag};
use work_reports::classify::Band;
use work_reports::{
    ConstructionProgressReport, ConstructionTask, Counts, EmployeeLoad, EmployeeLoadReport,
    JsonBackend, ParamBag, ReportComposer, ReportError, ReportGenerator, ReportParams, TaskDetail,
    TeamEfficiency, TeamEfficiencyReport, TextBackend,
};

fn bag(v: Value) -> ParamBag {
    match v {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stamped() -> ReportParams {
    ReportParams::at(date(2024, 6, 1).and_hms_opt(10, 0, 0).unwrap())
}

fn headings(blocks: &[Block]) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks {
        match block {
            Block::Heading { text } => out.push(text.clone()),
            Block::Section { heading, blocks } => {
                out.push(heading.clone());
                out.extend(headings(blocks));
            }
            _ => {}
        }
    }
    out
}

fn charts(blocks: &[&Block]) -> Vec<Vec<Bar>> {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::BarChart { bars } => Some(bars.clone()),
            _ => None,
        })
        .collect()
}

fn tables<'a>(blocks: &[&'a Block]) -> Vec<&'a Table> {
    blocks
        .iter()
        .copied()
        .filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scenario A: an on-time completed construction task
// ---------------------------------------------------------------------------

fn on_time_task() -> Vec<ConstructionTask> {
    vec![ConstructionTask::builder("Foundations", "DONE")
        .planned_end(date(2024, 1, 10))
        .actual_end(date(2024, 1, 9))
        .delayed(false)
        .build()]
}

#[test]
fn on_time_task_has_no_delay_analysis_or_progress_chart() {
    let tree = ConstructionProgressReport.compose(&on_time_task(), &stamped());
    let all = tree.walk();
    assert!(!headings(tree.blocks()).contains(&"Delayed task analysis".to_string()));
    assert!(charts(&all).is_empty());
}

#[test]
fn full_completion_shows_a_hundred_percent_progress_bar() {
    let params = stamped().with_completed_percentage(100);
    let tree = ConstructionProgressReport.compose(&on_time_task(), &params);
    let bars = charts(&tree.walk());
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0][0].caption, "100%");
    assert_eq!(bars[0][0].value, 100.0);
    assert_eq!(bars[0][0].tag, Tag::Band(Band::Good));
    assert!(!headings(tree.blocks()).contains(&"Delayed task analysis".to_string()));
}

// ---------------------------------------------------------------------------
// Scenario B: a team without tasks
// ---------------------------------------------------------------------------

#[test]
fn idle_team_is_ranked_not_applicable_and_left_off_the_chart() {
    let teams = vec![
        TeamEfficiency::builder("Builders")
            .total_tasks(10)
            .completed_tasks(9)
            .on_time_tasks(8)
            .efficiency_score(82.5)
            .build(),
        TeamEfficiency::builder("Reserve").has_no_tasks(true).build(),
    ];
    let tree = TeamEfficiencyReport.compose(&teams, &stamped());
    let all = tree.walk();

    let bars = charts(&all);
    assert_eq!(bars.len(), 1);
    assert!(bars[0].iter().all(|b| b.label != "Reserve"));

    let leaderboard = tables(&all)
        .into_iter()
        .find(|t| t.columns.iter().any(|c| c.header == "Efficiency score"))
        .unwrap();
    let row = leaderboard.rows.iter().find(|r| r[1].text == "Reserve").unwrap();
    assert_eq!(row[0].text, "2");
    assert_eq!(row[2].text, "N/A");
    assert_eq!(row[2].tag, Some(Tag::Band(Band::NotApplicable)));

    let section = tree
        .blocks()
        .iter()
        .find_map(|b| match b {
            Block::Section { heading, blocks } if heading == "Reserve" => Some(blocks),
            _ => None,
        })
        .unwrap();
    assert_eq!(section, &vec![Block::italic("No tasks assigned in this period.")]);
}

// ---------------------------------------------------------------------------
// Scenario C: priority distribution
// ---------------------------------------------------------------------------

#[test]
fn priority_distribution_percentages_and_widths() {
    let teams = vec![TeamEfficiency::builder("Crew")
        .total_tasks(10)
        .tasks_by_priority(Counts::new().with("High", 3).with("Low", 7))
        .build()];
    let tree = TeamEfficiencyReport.compose(&teams, &stamped());
    let all = tree.walk();

    let percent_table = tables(&all)
        .into_iter()
        .find(|t| t.columns.first().map(|c| c.header.as_str()) == Some("Priority"))
        .unwrap();
    assert_eq!(percent_table.rows[0][0].text, "High");
    assert_eq!(percent_table.rows[0][2].text, "30.0%");
    assert_eq!(percent_table.rows[1][0].text, "Low");
    assert_eq!(percent_table.rows[1][2].text, "70.0%");

    let bars = charts(&all).into_iter().find(|bars| bars.len() == 2).unwrap();
    assert_eq!(bars[1].value, 100.0);
    assert!((bars[0].value / bars[1].value - 3.0 / 7.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Determinism and parameters
// ---------------------------------------------------------------------------

#[test]
fn composing_twice_gives_identical_trees() {
    let staff = vec![
        EmployeeLoad::builder(1, "Ann")
            .task_count(2)
            .total_hours(16.0)
            .fte(1.0)
            .task(TaskDetail::builder("Survey", "DONE").priority("High").build())
            .task(TaskDetail::builder("Report", "DELAYED").priority("Low").delayed(true).build())
            .build(),
        EmployeeLoad::builder(2, "Bob").build(),
    ];
    let generator = ReportGenerator::new(EmployeeLoadReport, JsonBackend);
    let params = bag(json!({
        "dateFrom": "2024-01-01",
        "dateTo": "2024-03-31",
        "generatedAt": "2024-04-01T08:00:00"
    }));
    let first = generator.compose(&staff, &params).unwrap();
    let second = generator.compose(&staff, &params).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        generator.render(&staff, &params).unwrap(),
        generator.render(&staff, &params).unwrap()
    );
}

#[test]
fn malformed_parameter_fails_the_call() {
    let generator = ReportGenerator::new(ConstructionProgressReport, TextBackend::default());
    let err = generator
        .render(&on_time_task(), &bag(json!({"completedPercentage": "nearly done"})))
        .unwrap_err();
    match err {
        ReportError::MalformedParameter { key, .. } => assert_eq!(key, "completedPercentage"),
        other => panic!("unexpected error {other:?}"),
    }
    // A failed call leaves the generator usable.
    assert!(generator.render(&on_time_task(), &ParamBag::new()).is_ok());
}

#[test]
fn unrecognized_and_absent_keys_only_drop_their_blocks() {
    let generator = ReportGenerator::new(TeamEfficiencyReport, TextBackend::default());
    let tree = generator
        .compose(&[], &bag(json!({"colour": "blue", "totalTasksCount": 12})))
        .unwrap();
    let Block::KeyValueList { pairs } = &tree.blocks()[1] else {
        panic!("expected aggregate key values");
    };
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].value.text, "12");
    assert!(matches!(tree.blocks().last(), Some(Block::Paragraph { .. })));
}

#[test]
fn polish_language_switches_labels() {
    let generator = ReportGenerator::new(ConstructionProgressReport, TextBackend::default());
    let tree = generator
        .compose(&on_time_task(), &bag(json!({"language": "pl"})))
        .unwrap();
    assert_eq!(tree.blocks()[0], Block::title("Raport postępu budowy"));
}

// ---------------------------------------------------------------------------
// Backends and storage
// ---------------------------------------------------------------------------

#[test]
fn text_render_contains_tables_and_footer() {
    let generator = ReportGenerator::new(ConstructionProgressReport, TextBackend::default());
    let params = bag(json!({
        "completedPercentage": 50,
        "tasksByStatus": {"DELAYED": 1, "DONE": 1},
        "generatedAt": "2024-06-01 10:00:00"
    }));
    let bytes = generator.render(&on_time_task(), &params).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("# Construction Progress Report"));
    assert!(text.contains("Foundations"));
    assert!(text.contains("2024-01-09"));
    assert!(text.ends_with("_Report generated: 2024-06-01 10:00:00_\n\n"));
    // Canonical status order puts completed before delayed.
    let done = text.find("| DONE").unwrap();
    let delayed = text.find("| DELAYED").unwrap();
    assert!(done < delayed);
}

#[test]
fn render_to_path_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("team-efficiency").join("report.json");
    let generator = ReportGenerator::new(TeamEfficiencyReport, JsonBackend);
    let written = generator.render_to_path(&[], &ParamBag::new(), &dest).unwrap();
    assert_eq!(written, dest);
    let value: Value = serde_json::from_slice(&std::fs::read(&dest).unwrap()).unwrap();
    assert_eq!(value["blocks"][0]["text"], "Team Efficiency Report");
}

#[test]
fn storage_failure_carries_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("taken");
    std::fs::write(&blocker, b"").unwrap();
    let dest = blocker.join("report.md");
    let generator = ReportGenerator::new(ConstructionProgressReport, TextBackend::default());
    let err = generator
        .render_to_path(&on_time_task(), &ParamBag::new(), &dest)
        .unwrap_err();
    match err {
        ReportError::Storage { path, .. } => assert!(path.starts_with(&blocker)),
        other => panic!("unexpected error {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Status map edge cases and pinned generation time
// ---------------------------------------------------------------------------

fn status_rows(tree: &work_reports::BlockTree) -> Vec<String> {
    let all = tree.walk();
    let table = tables(&all)
        .into_iter()
        .find(|t| t.columns.first().map(|c| c.header.as_str()) == Some("Status"))
        .unwrap();
    table.rows.iter().map(|r| r[0].text.clone()).collect()
}

#[test]
fn unknown_statuses_follow_in_first_seen_order() {
    let params: ParamBag =
        serde_json::from_str(r#"{"tasksByStatus": {"Zeta": 1, "DONE": 2, "Alpha": 3}}"#).unwrap();
    let generator = ReportGenerator::new(ConstructionProgressReport, TextBackend::default());
    let tree = generator.compose(&on_time_task(), &params).unwrap();
    assert_eq!(status_rows(&tree), ["DONE", "Zeta", "Alpha"]);
}

#[test]
fn huge_status_counts_compose_without_overflow() {
    let params: ParamBag =
        serde_json::from_str(r#"{"tasksByStatus": {"DONE": 18446744073709551615, "DELAYED": 1}}"#)
            .unwrap();
    let generator = ReportGenerator::new(ConstructionProgressReport, TextBackend::default());
    let tree = generator.compose(&on_time_task(), &params).unwrap();
    assert_eq!(status_rows(&tree), ["DONE", "DELAYED"]);
    assert!(generator.render(&on_time_task(), &params).is_ok());
}

#[test]
fn pinned_generator_is_deterministic_without_generated_at() {
    let pinned = date(2024, 7, 1).and_hms_opt(12, 30, 0).unwrap();
    let generator = ReportGenerator::new(TeamEfficiencyReport, TextBackend::default()).at(pinned);
    let first = generator.compose(&[], &ParamBag::new()).unwrap();
    let second = generator.compose(&[], &ParamBag::new()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.blocks().last(),
        Some(&Block::italic("Report generated: 2024-07-01 12:30:00"))
    );
    // A bag timestamp still wins over the pinned one.
    let stamped = generator
        .compose(&[], &bag(json!({"generatedAt": "2024-01-02 03:04:05"})))
        .unwrap();
    assert_eq!(
        stamped.blocks().last(),
        Some(&Block::italic("Report generated: 2024-01-02 03:04:05"))
    );
}
