use netpharm::core::graph::hubs::DisplaySubgraph;
use netpharm::core::graph::topology::{Connectivity, MetricsRow, NetworkSummary};
use netpharm::core::models::enrichment::EnrichmentTerm;
use netpharm::engine::state::RunReport;
use std::fmt::Write;

pub fn network_summary(summary: &NetworkSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Nodes:           {}", summary.node_count);
    let _ = writeln!(out, "Edges:           {}", summary.edge_count);
    let _ = writeln!(out, "Average degree:  {:.3}", summary.average_degree);
    let _ = writeln!(out, "Density:         {:.4}", summary.density);
    match summary.connectivity {
        Connectivity::Connected {
            diameter,
            average_shortest_path,
        } => {
            let _ = writeln!(out, "Diameter:        {}", diameter);
            let _ = writeln!(out, "Avg path length: {:.3}", average_shortest_path);
        }
        Connectivity::Disconnected { components } => {
            let _ = writeln!(out, "Components:      {} (disconnected)", components);
        }
    }
    out
}

pub fn hub_table(rows: &[MetricsRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<12} {:>6} {:>10} {:>12} {:>10}",
        "#", "Protein", "Degree", "Degree C.", "Betweenness", "Closeness"
    );
    for (rank, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<12} {:>6} {:>10.4} {:>12.4} {:>10.4}",
            rank + 1,
            row.protein,
            row.degree,
            row.degree_centrality,
            row.betweenness_centrality,
            row.closeness_centrality
        );
    }
    out
}

pub fn display_subgraph(display: &DisplaySubgraph) -> String {
    let hubs: Vec<&str> = display
        .hubs()
        .filter_map(|id| display.graph().symbol(id))
        .map(|symbol| symbol.as_str())
        .collect();
    format!(
        "Display subgraph: {} node(s), {} edge(s), {} connector(s)\nHubs: {}\n",
        display.node_count(),
        display.edge_count(),
        display.connector_count(),
        hubs.join(", ")
    )
}

pub fn enrichment_terms(terms: &[EnrichmentTerm], limit: usize) -> String {
    let mut out = String::new();
    for term in terms.iter().take(limit) {
        let genes: Vec<&str> = term.intersections.iter().map(|s| s.as_str()).collect();
        let _ = writeln!(
            out,
            "{:<8} {:<14} {:.2e}  {} [{}]",
            term.source,
            term.term_id,
            term.adjusted_p_value,
            term.name,
            genes.join(", ")
        );
    }
    if terms.len() > limit {
        let _ = writeln!(out, "... {} more term(s)", terms.len() - limit);
    }
    out
}

pub fn run_report(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Compound {} reached: {}", report.compound, report.state);
    for outcome in &report.outcomes {
        let _ = writeln!(
            out,
            "  {:<22} {:<6} {:<28} {}",
            outcome.stage.to_string(),
            outcome.status.to_string(),
            outcome.tally.to_string(),
            outcome.detail
        );
    }
    out
}
