//! Summaries of the per-node execution info a graph run reports.

use crate::types::NodeExecInfo;
use std::fmt::Write as _;

/// Sums every node into a single `TOTAL RESULT` row.
#[must_use]
pub fn total_row(nodes: &[NodeExecInfo]) -> NodeExecInfo {
    nodes.iter().fold(
        NodeExecInfo {
            node_name: "TOTAL RESULT".to_string(),
            ..NodeExecInfo::default()
        },
        |mut acc, node| {
            acc.total_tokens += node.total_tokens;
            acc.prompt_tokens += node.prompt_tokens;
            acc.completion_tokens += node.completion_tokens;
            acc.successful_requests += node.successful_requests;
            acc.total_cost_usd += node.total_cost_usd;
            acc.exec_time += node.exec_time;
            acc
        },
    )
}

/// Renders execution info as a fixed-width table with a total row.
///
/// Returns an empty string when no nodes were reported.
///
/// # Examples
///
/// ```
/// use search_graph_adapter::{prettify_exec_info, NodeExecInfo};
///
/// let nodes = vec![NodeExecInfo {
///     node_name: "SearchInternet".to_string(),
///     total_tokens: 120,
///     ..NodeExecInfo::default()
/// }];
/// let table = prettify_exec_info(&nodes);
/// assert!(table.contains("SearchInternet"));
/// assert!(table.contains("TOTAL RESULT"));
/// ```
#[must_use]
pub fn prettify_exec_info(nodes: &[NodeExecInfo]) -> String {
    if nodes.is_empty() {
        return String::new();
    }

    let total = total_row(nodes);
    let name_width = nodes
        .iter()
        .chain(std::iter::once(&total))
        .map(|n| n.node_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("node_name".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>12}  {:>13}  {:>17}  {:>19}  {:>14}  {:>9}",
        "node_name",
        "total_tokens",
        "prompt_tokens",
        "completion_tokens",
        "successful_requests",
        "total_cost_USD",
        "exec_time",
    );
    for node in nodes.iter().chain(std::iter::once(&total)) {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>12}  {:>13}  {:>17}  {:>19}  {:>14.6}  {:>9.3}",
            node.node_name,
            node.total_tokens,
            node.prompt_tokens,
            node.completion_tokens,
            node.successful_requests,
            node.total_cost_usd,
            node.exec_time,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, tokens: u64, time: f64) -> NodeExecInfo {
        NodeExecInfo {
            node_name: name.to_string(),
            total_tokens: tokens,
            prompt_tokens: tokens / 2,
            completion_tokens: tokens - tokens / 2,
            successful_requests: 1,
            total_cost_usd: 0.001,
            exec_time: time,
        }
    }

    #[test]
    fn test_total_row_sums_nodes() {
        let total = total_row(&[node("SearchInternet", 100, 1.5), node("GenerateAnswer", 50, 0.5)]);
        assert_eq!(total.node_name, "TOTAL RESULT");
        assert_eq!(total.total_tokens, 150);
        assert_eq!(total.successful_requests, 2);
        assert!((total.exec_time - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_prettify_has_header_rows_and_total() {
        let table = prettify_exec_info(&[node("SearchInternet", 100, 1.5), node("GenerateAnswer", 50, 0.5)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("node_name"));
        assert!(lines[3].starts_with("TOTAL RESULT"));
        assert!(lines[3].contains("150"));
    }

    #[test]
    fn test_prettify_empty_is_blank() {
        assert!(prettify_exec_info(&[]).is_empty());
    }
}
