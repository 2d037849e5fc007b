//! Property tests over generated row grids: the missing/invalid/valid
//! partition, row/column accounting, and determinism.

use csv_profiler::analysis::analyze;
use csv_profiler::report::AnalysisStatus;
use proptest::prelude::*;

const COLUMNS: usize = 3;

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        "[0-9]{1,6}",
        "-?[0-9]{1,4}\\.[0-9]{1,3}",
        "[a-z]{1,8}",
    ]
}

fn grid() -> impl Strategy<Value = Vec<Vec<String>>> {
    proptest::collection::vec(proptest::collection::vec(cell(), COLUMNS), 0..24)
}

fn render_csv(rows: &[Vec<String>]) -> String {
    let mut content = String::from("c0,c1,c2\n");
    for row in rows {
        content.push_str(&row.join(","));
        content.push('\n');
    }
    content
}

proptest! {
    #[test]
    fn partition_and_accounting_hold(rows in grid()) {
        let content = render_csv(&rows);
        let analysis = analyze("generated.csv", content.as_bytes());

        prop_assert_eq!(analysis.status, AnalysisStatus::Success);
        prop_assert_eq!(analysis.row_count, rows.len());
        prop_assert_eq!(analysis.column_count, COLUMNS);
        prop_assert_eq!(analysis.quality_issues.total_rows, rows.len());

        for column in &analysis.schema.columns {
            let missing = analysis
                .quality_issues
                .missing_values
                .get(&column.name)
                .map_or(0, |issue| issue.count);
            if column.datatype.is_numeric() {
                let invalid = analysis
                    .quality_issues
                    .invalid_values
                    .get(&column.name)
                    .map_or(0, |issue| issue.count);
                let valid = analysis
                    .statistics
                    .get(&column.name)
                    .map_or(0, |stats| stats.count);
                prop_assert_eq!(missing + invalid + valid, analysis.row_count);
            } else {
                // Non-numeric columns never carry statistics or invalid counts.
                prop_assert!(!analysis.statistics.contains_key(&column.name));
                prop_assert!(
                    !analysis.quality_issues.invalid_values.contains_key(&column.name)
                );
                prop_assert!(missing <= analysis.row_count);
            }
        }
    }

    #[test]
    fn identical_bytes_give_identical_results(rows in grid()) {
        let content = render_csv(&rows);
        let first = analyze("generated.csv", content.as_bytes());
        let second = analyze("generated.csv", content.as_bytes());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn issue_report_is_minimal(rows in grid()) {
        let content = render_csv(&rows);
        let analysis = analyze("generated.csv", content.as_bytes());
        for (name, issue) in &analysis.quality_issues.missing_values {
            prop_assert!(issue.count > 0, "column {} reported without issue", name);
        }
        for (name, issue) in &analysis.quality_issues.invalid_values {
            prop_assert!(issue.count > 0, "column {} reported without issue", name);
        }
        let expected = !analysis.quality_issues.missing_values.is_empty()
            || !analysis.quality_issues.invalid_values.is_empty();
        prop_assert_eq!(analysis.quality_issues.has_issues, expected);
    }
}
