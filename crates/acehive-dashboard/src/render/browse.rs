use super::{alert, escape, post_button, spinner};
use crate::components::TableContent;
use crate::components::browse::{BrowseView, FETCH_ERROR, NO_FILTERED_DATA};
use acehive_core::{ResourceType, TableName, YearLevel};
use std::fmt::Write as _;

/// `<option>` list with an "any" entry first
fn options<'a>(any: &str, labels: impl Iterator<Item = &'a str>, selected: Option<&str>) -> String {
    let mut html = format!(r#"<option value="">{any}</option>"#);
    for label in labels {
        let mark = if selected == Some(label) { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{value}"{mark}>{value}</option>"#,
            value = escape(label)
        );
    }
    html
}

fn table_picker(current: TableName) -> String {
    let choices: String = TableName::ALL
        .into_iter()
        .map(|table| {
            let mark = if table == current { " selected" } else { "" };
            format!(
                r#"<option value="{}"{mark}>{}</option>"#,
                table.as_str(),
                table.label()
            )
        })
        .collect();

    format!(
        r#"<form method="post" action="/browse/table" class="d-flex gap-2">
<select class="form-select" name="table" onchange="this.form.submit()">{choices}</select>
<button type="submit" class="btn btn-primary">Load</button>
</form>"#
    )
}

fn filter_controls(view: &BrowseView) -> String {
    let inputs = view.inputs();
    format!(
        r#"<form method="post" action="/browse/filters" class="row g-2 align-items-end mb-3">
<div class="col-md-3"><label class="form-label" for="year">Year</label><select class="form-select" id="year" name="year">{years}</select></div>
<div class="col-md-3"><label class="form-label" for="resource_type">Type</label><select class="form-select" id="resource_type" name="resource_type">{types}</select></div>
<div class="col-md-3"><label class="form-label" for="search">Title</label><input class="form-control" id="search" name="search" value="{search}" placeholder="Search by title"></div>
<div class="col-md-3 d-flex gap-2">
<button type="submit" class="btn btn-primary">Apply Filters</button>
<button type="submit" class="btn btn-outline-secondary" formaction="/browse/search">Search</button>
<button type="submit" class="btn btn-outline-danger" formaction="/browse/reset">Reset</button>
</div>
</form>"#,
        years = options(
            "All Years",
            YearLevel::ALL.iter().map(|year| year.label()),
            inputs.year.map(YearLevel::label)
        ),
        types = options(
            "All Types",
            ResourceType::ALL.iter().map(|kind| kind.label()),
            inputs.resource_type.map(ResourceType::label)
        ),
        search = escape(&inputs.search),
    )
}

fn table(view: &BrowseView, rows: &[&acehive_core::Row]) -> String {
    let columns = view.columns();
    let header: String = columns
        .iter()
        .map(|column| format!("<th>{}</th>", escape(column)))
        .collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = columns
                .iter()
                .map(|column| format!("<td>{}</td>", escape(&row.display(column))))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        r#"<div class="table-responsive"><table class="table table-striped table-hover"><thead><tr>{header}</tr></thead><tbody>{body}</tbody></table></div>"#
    )
}

pub(super) fn render(view: &BrowseView) -> String {
    let filters = if view.shows_filters() {
        filter_controls(view)
    } else {
        String::new()
    };
    let banner = if view.filters_applied() {
        format!(
            r#"<div class="alert alert-info d-flex justify-content-between align-items-center">Filters Applied {}</div>"#,
            post_button("/browse/reset", "Remove Filters", "btn btn-sm btn-outline-dark", false)
        )
    } else {
        String::new()
    };
    let content = match view.content() {
        TableContent::Loading => spinner().to_string(),
        TableContent::Failed => alert("danger", FETCH_ERROR),
        TableContent::Empty => alert("secondary", NO_FILTERED_DATA),
        TableContent::Rows(rows) => table(view, &rows),
    };

    format!(
        r#"<div class="d-flex justify-content-between align-items-center mb-3">
<h1 class="h3 mb-0">Database Table Viewer</h1>
<div class="d-flex gap-2">{picker}{refresh}</div>
</div>
{filters}
{banner}
{content}"#,
        picker = table_picker(view.table()),
        refresh = post_button(
            "/browse/refresh",
            "Refresh",
            "btn btn-outline-primary",
            view.is_loading()
        ),
    )
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::components::RowFilters;
    use acehive_core::Row;

    fn loaded(table: TableName, rows: Vec<Row>) -> BrowseView {
        let mut view = BrowseView::new(table);
        let ticket = view.select_table(table);
        view.complete_fetch(ticket, Ok(rows));
        view
    }

    #[test]
    fn test_resource_table_hides_columns_and_offers_filters() {
        let view = loaded(
            TableName::Resources,
            vec![
                Row::new()
                    .with("id", 1)
                    .with("title", "<Calculus>")
                    .with("description", "secret")
                    .with("year", "1st Year"),
            ],
        );
        let html = render(&view);

        assert!(html.contains("<th>title</th>"));
        assert!(!html.contains("<th>id</th>"));
        assert!(!html.contains("secret"));
        assert!(html.contains("&lt;Calculus&gt;"));
        assert!(html.contains(r#"action="/browse/filters""#));
    }

    #[test]
    fn test_other_tables_show_every_column_without_filters() {
        let view = loaded(
            TableName::Feedback,
            vec![Row::new().with("id", 3).with("message", "Great app")],
        );
        let html = render(&view);

        assert!(html.contains("<th>id</th>"));
        assert!(!html.contains(r#"action="/browse/filters""#));
        assert!(html.contains(r#"<option value="feedback" selected>"#));
    }

    #[test]
    fn test_banner_and_empty_notice() {
        let mut view = loaded(TableName::Resources, vec![Row::new().with("title", "A")]);
        view.set_inputs(RowFilters {
            search: "zzz".to_string(),
            ..RowFilters::default()
        });
        view.apply_filters();

        let html = render(&view);
        assert!(html.contains("Filters Applied"));
        assert!(html.contains("Remove Filters"));
        assert!(html.contains(NO_FILTERED_DATA));
        assert!(html.contains(r#"value="zzz""#));
    }

    #[test]
    fn test_fetch_error_alert() {
        let mut view = BrowseView::new(TableName::Resources);
        let ticket = view.refresh();
        view.complete_fetch(ticket, Err("connection refused".to_string()));

        let html = render(&view);
        assert!(html.contains(FETCH_ERROR));
        assert!(!html.contains("connection refused"));
    }
}
