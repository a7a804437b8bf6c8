use crate::stability::StabilityResult;
use std::fmt::Write;

/// Text summary of a stability run: candidates by descending selection
/// count, with the ones that made it into the neighborhood marked.
pub fn format_report(result: &StabilityResult) -> String {
    let table = &result.frequencies;
    let mut output = String::new();

    let _ = writeln!(output, "STABILITY SELECTION for target '{}':", table.target_name);
    let _ = writeln!(
        output,
        "{} subsamples, threshold {:.3}, {} of {} candidates selected",
        table.num_subsamples,
        result.pi_threshold,
        result.graph.edge_count(),
        table.entries.len()
    );
    let _ = writeln!(output, "--------------------------------------------------");

    let width = table.entries.iter().map(|e| e.name.len()).max().unwrap_or(0).max(8);
    let _ = writeln!(output, "{:<width$}  {:>6}  {:>9}", "variable", "count", "frequency", width = width);
    for entry in table.ranked() {
        let mark = if entry.frequency > result.pi_threshold { " *" } else { "" };
        let _ = writeln!(
            output,
            "{:<width$}  {:>6}  {:>9.3}{}",
            entry.name, entry.count, entry.frequency, mark, width = width
        );
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Variable, VariableId};
    use crate::stability::FrequencyTable;

    #[test]
    fn test_report_lists_ranked_candidates_and_marks_selected() {
        let vars: Vec<Variable> = ["Y", "A", "B"].iter().map(|s| Variable::continuous(*s)).collect();
        let table = FrequencyTable::new(&vars, VariableId(0), &[VariableId(1), VariableId(2)], &[2, 9], 10).unwrap();
        let result = StabilityResult::new(table, &vars, 0.5).unwrap();

        let report = format_report(&result);
        assert!(report.starts_with("STABILITY SELECTION for target 'Y':"));
        let lines: Vec<&str> = report.lines().collect();
        assert!(lines[4].starts_with("B ") && lines[4].ends_with(" *"), "{}", lines[4]);
        assert!(lines[5].starts_with("A ") && !lines[5].ends_with('*'), "{}", lines[5]);
    }
}
