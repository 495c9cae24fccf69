use crate::core::{MarkerRow, Selection};

/// Rows whose district is selected, in their original order.
///
/// An empty selection yields no rows at all, not every row.
pub fn filter(rows: &[MarkerRow], selection: &Selection) -> Vec<MarkerRow> {
    if selection.is_empty() {
        return Vec::new();
    }

    rows.iter()
        .filter(|row| selection.contains(&row.district))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(district: &str, branch: &str) -> MarkerRow {
        MarkerRow {
            district: district.to_string(),
            branch_name: branch.to_string(),
            sol_id: "0".to_string(),
            block_name: "Block".to_string(),
            latitude: Some(26.0),
            longitude: Some(74.0),
        }
    }

    #[test]
    fn test_empty_selection_returns_nothing() {
        let rows = vec![row("A", "one"), row("B", "two"), row("A", "three")];
        assert!(filter(&rows, &Selection::new()).is_empty());
    }

    #[test]
    fn test_filter_is_stable() {
        let rows = vec![row("A", "one"), row("B", "two"), row("A", "three")];
        let selection: Selection = ["A"].into_iter().collect();

        let result = filter(&rows, &selection);

        assert_eq!(result, vec![rows[0].clone(), rows[2].clone()]);
    }

    #[test]
    fn test_filter_multiple_districts_keeps_row_order() {
        let rows = vec![
            row("C", "one"),
            row("B", "two"),
            row("A", "three"),
            row("B", "four"),
        ];
        let selection: Selection = ["B", "A"].into_iter().collect();

        let names: Vec<String> = filter(&rows, &selection)
            .into_iter()
            .map(|r| r.branch_name)
            .collect();

        assert_eq!(names, vec!["two", "three", "four"]);
    }

    #[test]
    fn test_district_match_is_exact() {
        let rows = vec![row("Ajmer", "one"), row("ajmer", "two"), row("Ajmer ", "three")];
        let selection: Selection = ["Ajmer"].into_iter().collect();

        assert_eq!(filter(&rows, &selection).len(), 1);
    }
}
