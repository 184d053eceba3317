use super::{alert, escape, post_button, spinner};
use crate::components::TableContent;
use crate::components::editor::{EditorView, NO_TABLE_DATA};
use crate::components::browse::FETCH_ERROR;
use acehive_core::{Row, RowId};

fn row_path(id: &RowId, action: &str) -> String {
    format!("/edit/{}/{action}", urlencoding::encode(id.as_str()))
}

fn editing_row(view: &EditorView, row: &Row, id: &RowId, columns: &[String], index: usize) -> String {
    let form = format!("edit-row-{index}");
    let cells: String = columns
        .iter()
        .map(|column| {
            format!(
                r#"<td><input class="form-control form-control-sm" form="{form}" name="{name}" value="{value}"></td>"#,
                name = escape(column),
                value = escape(&view.input_value(row, column)),
            )
        })
        .collect();

    format!(
        r#"<tr class="table-warning">{cells}<td class="text-nowrap"><form id="{form}" method="post" action="{save}" class="d-inline"><button type="submit" class="btn btn-sm btn-success">Save</button></form> {cancel}</td></tr>"#,
        save = escape(&row_path(id, "save")),
        cancel = post_button(&row_path(id, "cancel"), "Cancel", "btn btn-sm btn-secondary", false),
    )
}

fn display_row(row: &Row, id: Option<&RowId>, columns: &[String]) -> String {
    let cells: String = columns
        .iter()
        .map(|column| format!("<td>{}</td>", escape(&row.display(column))))
        .collect();
    let actions = id
        .map(|id| {
            format!(
                "{} {}",
                post_button(&row_path(id, "begin"), "Edit", "btn btn-sm btn-primary", false),
                post_button(&row_path(id, "delete"), "Delete", "btn btn-sm btn-danger", false),
            )
        })
        .unwrap_or_default();
    format!(r#"<tr>{cells}<td class="text-nowrap">{actions}</td></tr>"#)
}

fn table(view: &EditorView, rows: &[&Row]) -> String {
    let columns = view.columns();
    let header: String = columns
        .iter()
        .map(|column| format!("<th>{}</th>", escape(column)))
        .collect();
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(index, row)| match row.id() {
            Some(id) if view.is_editing(&id) => editing_row(view, row, &id, &columns, index),
            id => display_row(row, id.as_ref(), &columns),
        })
        .collect();

    format!(
        r#"<div class="table-responsive"><table class="table table-bordered align-middle"><thead><tr>{header}<th>Actions</th></tr></thead><tbody>{body}</tbody></table></div>"#
    )
}

fn delete_prompt(id: &RowId) -> String {
    format!(
        r#"<div class="modal d-block" tabindex="-1" role="dialog" style="background: rgba(0, 0, 0, 0.5);">
<div class="modal-dialog modal-dialog-centered"><div class="modal-content">
<div class="modal-header"><h2 class="modal-title h5">Confirm Delete</h2></div>
<div class="modal-body">Are you sure you want to delete record {id}?</div>
<div class="modal-footer">{cancel}{confirm}</div>
</div></div>
</div>"#,
        id = escape(id.as_str()),
        cancel = post_button("/edit/delete/cancel", "Cancel", "btn btn-secondary me-2", false),
        confirm = post_button("/edit/delete/confirm", "Delete", "btn btn-danger", false),
    )
}

pub(super) fn render(view: &EditorView) -> String {
    let notice = view
        .notice()
        .map(|notice| {
            let kind = if notice.is_error() { "danger" } else { "success" };
            alert(kind, notice.message())
        })
        .unwrap_or_default();
    let content = match view.content() {
        TableContent::Loading => spinner().to_string(),
        TableContent::Failed => alert("danger", FETCH_ERROR),
        TableContent::Empty => alert("secondary", NO_TABLE_DATA),
        TableContent::Rows(rows) => table(view, &rows),
    };
    let prompt = view.pending_delete().map(delete_prompt).unwrap_or_default();

    format!(
        r#"<div class="d-flex justify-content-between align-items-center mb-3">
<h1 class="h3 mb-0">Edit Database Table</h1>
<div class="d-flex gap-2">
<select class="form-select" name="table" disabled><option value="resources" selected>Resources</option></select>
{refresh}
</div>
</div>
<form method="post" action="/edit/search" class="d-flex gap-2 mb-3">
<input class="form-control" name="search" value="{search}" placeholder="Search by title">
<button type="submit" class="btn btn-outline-secondary">Search</button>
</form>
{notice}
{content}
{prompt}"#,
        refresh = post_button(
            "/edit/refresh",
            "Refresh",
            "btn btn-outline-primary",
            view.is_loading()
        ),
        search = escape(view.search_query()),
    )
}
