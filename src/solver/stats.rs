use prettytable::{Cell, Row, Table};

/// Counters for one agent's traversal of its subtree.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    /// Nodes popped from the agent's priority queue.
    pub nodes_visited: u64,
    /// Nodes rejected by the weak local-consistency gate.
    pub nodes_pruned: u64,
    /// Solutions the agent emitted downstream.
    pub solutions_emitted: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.nodes_visited += other.nodes_visited;
        self.nodes_pruned += other.nodes_pruned;
        self.solutions_emitted += other.solutions_emitted;
    }
}

/// Renders per-agent statistics plus a totals row.
pub fn render_stats_table(per_agent: &[SearchStats]) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Agent"),
        Cell::new("Nodes Visited"),
        Cell::new("Pruned"),
        Cell::new("Solutions"),
    ]));

    let mut total = SearchStats::default();
    for (index, stats) in per_agent.iter().enumerate() {
        total.merge(stats);
        table.add_row(Row::new(vec![
            Cell::new(&index.to_string()),
            Cell::new(&stats.nodes_visited.to_string()),
            Cell::new(&stats.nodes_pruned.to_string()),
            Cell::new(&stats.solutions_emitted.to_string()),
        ]));
    }
    table.add_row(Row::new(vec![
        Cell::new("Total"),
        Cell::new(&total.nodes_visited.to_string()),
        Cell::new(&total.nodes_pruned.to_string()),
        Cell::new(&total.solutions_emitted.to_string()),
    ]));

    table.to_string()
}
