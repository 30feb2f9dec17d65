//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for the filtered transactions:
//! - **Expenses by category**: A doughnut chart coloured by category
//! - **Income vs. expenses**: Grouped monthly bars
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, ItemStyle, JsFunction, Tooltip,
        Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    chart_data::{CategoryTotal, ChartData, MonthlyTotals},
    html::HeadElement,
};

const INCOME_COLOUR: &str = "#22c55e";
const EXPENSE_COLOUR: &str = "#ef4444";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The title shown in place of the chart when there is nothing to plot.
    pub title: &'static str,
    /// The ECharts configuration as a JSON string, `None` if there is no data.
    pub options: Option<String>,
}

/// Build both dashboard charts from the aggregated chart data.
pub(super) fn build_dashboard_charts(chart_data: &ChartData) -> [DashboardChart; 2] {
    let expenses = &chart_data.expenses_by_category;
    let monthly = &chart_data.income_vs_expense_by_month;

    [
        DashboardChart {
            id: "expenses-by-category-chart",
            title: "Expenses by category",
            options: (!expenses.is_empty())
                .then(|| expenses_by_category_chart(expenses).to_string()),
        },
        DashboardChart {
            id: "income-vs-expense-chart",
            title: "Income vs. expenses",
            options: (!monthly.is_empty())
                .then(|| income_vs_expense_chart(monthly).to_string()),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
///
/// Charts without data are replaced by a short message.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    @if chart.options.is_some() {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded bg-white dark:bg-gray-800"
                        {}
                    } @else {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded bg-white dark:bg-gray-800 flex flex-col
                                items-center justify-center text-gray-500 dark:text-gray-400"
                        {
                            h3 class="text-lg font-semibold" { (chart.title) }
                            p data-chart-empty { "No data for the selected filters." }
                        }
                    }
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances that follow the page
/// theme and resize with the window.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .filter_map(|chart| chart.options.as_ref().map(|options| (chart.id, options)))
        .map(|(id, options)| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{id}");
                    const chart = echarts.init(chartDom);
                    const option = {options};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const root = document.documentElement;
                    const updateTheme = () => {{
                        const isDarkMode = root.classList.contains('dark');
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    new MutationObserver(updateTheme).observe(root, {{ attributes: true, attributeFilter: ['class'] }});
                    updateTheme();
                }})();"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn expenses_by_category_chart(totals: &[CategoryTotal]) -> Chart {
    let colours: Vec<Color> = totals
        .iter()
        .map(|total| Color::from(total.category.colour()))
        .collect();
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|total| (total.total, total.category.label()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom(0))
        .color(colours)
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

pub(super) fn income_vs_expense_chart(months: &[MonthlyTotals]) -> Chart {
    let labels: Vec<String> = months
        .iter()
        .map(|month| month.period_label.clone())
        .collect();
    let income: Vec<f64> = months.iter().map(|month| month.income).collect();
    let expenses: Vec<f64> = months.iter().map(|month| month.expense).collect();

    Chart::new()
        .title(Title::new().text("Income vs. expenses"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().bottom(0))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom(40)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOUR))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color(EXPENSE_COLOUR))
                .data(expenses),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
