use crate::models::{AggregateRecord, Recommendations};
use crate::pipeline::{DashboardOutputs, TablePreview};
use crate::processor::describe_correlation;
use crate::report::Report;
use std::fmt::{self, Write};

pub const NO_RESULTS_NOTICE: &str = "No products found for selected criteria.";
const PLACEHOLDER: &str = "N/A";

pub fn render_markdown(report: &Report) -> Result<String, fmt::Error> {
    let outputs = &report.outputs;
    let mut out = String::new();

    writeln!(out, "# Sales Dashboard\n")?;
    writeln!(
        out,
        "_Source: {} | generated {}_\n",
        report.source,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    render_overview(&mut out, outputs)?;
    render_cleaning(&mut out, outputs)?;
    render_kpis(&mut out, outputs)?;

    writeln!(out, "## Category-Level Analysis\n")?;
    aggregate_table(&mut out, "main_category", &outputs.category_stats, true)?;
    writeln!(out)?;

    writeln!(out, "## Sub-Category Performance (Top {})\n", outputs.sub_category_stats.len())?;
    aggregate_table(&mut out, "sub_category", &outputs.sub_category_stats, true)?;
    writeln!(out)?;

    writeln!(out, "## Discount % vs Ratings\n")?;
    writeln!(
        out,
        "{} products have both a discount and a rating.\n",
        outputs.discount_vs_rating.len()
    )?;

    writeln!(out, "## Price Segment Analysis\n")?;
    aggregate_table(&mut out, "price_segment", &outputs.segment_stats, false)?;
    writeln!(out)?;

    render_insights(&mut out, outputs)?;
    render_recommendations(&mut out, outputs)?;

    Ok(out)
}

fn render_overview(out: &mut String, outputs: &DashboardOutputs) -> fmt::Result {
    let overview = &outputs.overview;
    writeln!(out, "## Preview of Dataset\n")?;
    preview_table(out, &overview.preview)?;
    writeln!(out)?;

    writeln!(out, "## Dataset Overview\n")?;
    writeln!(out, "- Number of rows: {}", overview.row_count)?;
    writeln!(out, "- Number of columns: {}", overview.column_count)?;
    writeln!(out, "- Columns: {}\n", overview.column_names.join(", "))
}

fn render_cleaning(out: &mut String, outputs: &DashboardOutputs) -> fmt::Result {
    let cleaning = &outputs.cleaning;
    writeln!(out, "## Data Cleaning Summary\n")?;
    writeln!(out, "Duplicate rows removed: {}\n", cleaning.duplicates_removed)?;

    let rows: Vec<Vec<String>> = cleaning
        .null_counts
        .iter()
        .map(|c| vec![c.column.clone(), c.nulls.to_string()])
        .collect();
    markdown_table(out, &["column", "missing_values"], &rows)?;
    writeln!(out)
}

fn render_kpis(out: &mut String, outputs: &DashboardOutputs) -> fmt::Result {
    let kpis = &outputs.kpis;
    writeln!(out, "## Key Business Metrics\n")?;
    writeln!(out, "- Avg Actual Price: {}", format_number(kpis.avg_actual_price, 2))?;
    writeln!(out, "- Avg Discount Price: {}", format_number(kpis.avg_discount_price, 2))?;
    writeln!(out, "- Avg Rating: {}\n", format_number(kpis.avg_rating, 2))
}

fn render_insights(out: &mut String, outputs: &DashboardOutputs) -> fmt::Result {
    let insights = &outputs.insights;
    writeln!(out, "## Business Insights\n")?;
    writeln!(
        out,
        "- **Best Performing Price Segment:** {}",
        insights.best_segment.as_deref().unwrap_or(PLACEHOLDER)
    )?;
    writeln!(
        out,
        "- **Highest Average Rating:** {}",
        format_number(insights.best_rating, 2)
    )?;
    writeln!(
        out,
        "- **Average Discount Across Products:** {}",
        insights
            .avg_discount_percent
            .map(|d| format!("{:.1}%", d))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    )?;
    writeln!(
        out,
        "- Discounts {} (r = {}).\n",
        describe_correlation(insights.discount_rating_correlation),
        format_number(insights.discount_rating_correlation, 2)
    )
}

fn render_recommendations(out: &mut String, outputs: &DashboardOutputs) -> fmt::Result {
    writeln!(out, "## Smart Product Recommendations\n")?;
    writeln!(out, "- Maximum Budget: {}", outputs.inputs.max_budget)?;
    if let Some(bounds) = outputs.budget_bounds {
        writeln!(out, "- Budget range: {} to {}", bounds.min, bounds.max)?;
    }
    writeln!(out, "- Minimum Rating: {:.1}\n", outputs.inputs.min_rating)?;

    recommendation_table(out, &outputs.recommendations)
}

/// The recommendation table, or the explicit notice when nothing matched.
pub fn recommendation_table(out: &mut String, recommendations: &Recommendations) -> fmt::Result {
    match recommendations {
        Recommendations::NoMatches => writeln!(out, "> {}", NO_RESULTS_NOTICE),
        Recommendations::Matches(products) => {
            let rows: Vec<Vec<String>> = products
                .iter()
                .map(|p| {
                    vec![
                        p.name.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
                        format_number(p.actual_price, 2),
                        format_number(p.discount_price, 2),
                        format_number(p.ratings, 1),
                        format_number(p.discount_percent, 2),
                        p.link.to_string(),
                    ]
                })
                .collect();
            markdown_table(
                out,
                &["name", "actual_price", "discount_price", "ratings", "discount_percent", "link"],
                &rows,
            )
        }
    }
}

fn aggregate_table(out: &mut String, key_header: &str, records: &[AggregateRecord], with_price: bool) -> fmt::Result {
    let mut headers = vec![key_header];
    if with_price {
        headers.push("avg_price");
    }
    headers.extend(["avg_rating", "product_count"]);

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            let mut row = vec![r.key.clone()];
            if with_price {
                row.push(format_number(r.avg_price, 2));
            }
            row.push(format_number(r.avg_rating, 2));
            row.push(r.product_count.to_string());
            row
        })
        .collect();

    markdown_table(out, &headers, &rows)
}

fn preview_table(out: &mut String, preview: &TablePreview) -> fmt::Result {
    let headers: Vec<&str> = preview.columns.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = preview
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.clone().unwrap_or_else(|| PLACEHOLDER.to_string()))
                .collect()
        })
        .collect();
    markdown_table(out, &headers, &rows)
}

pub fn markdown_table(out: &mut String, headers: &[&str], rows: &[Vec<String>]) -> fmt::Result {
    writeln!(out, "| {} |", headers.join(" | "))?;
    writeln!(
        out,
        "|{}|",
        headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    )?;
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| escape_cell(cell)).collect();
        writeln!(out, "| {} |", cells.join(" | "))?;
    }
    Ok(())
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => PLACEHOLDER.to_string(),
    }
}
