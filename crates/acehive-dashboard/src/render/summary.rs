use super::{post_button, spinner};
use crate::components::SummaryPanel;

pub(super) fn render(panel: &SummaryPanel) -> String {
    let cards: String = panel
        .cards()
        .iter()
        .map(|card| {
            let value = card
                .value
                .map_or_else(|| spinner().to_string(), |count| format!(r#"<p class="display-6 mb-0">{count}</p>"#));
            format!(
                r#"<div class="col-sm-6 col-lg-3 mb-3"><div class="card shadow-sm" style="border-top: 4px solid {accent};"><div class="card-body text-center"><h2 class="h6 text-muted">{title}</h2>{value}</div></div></div>"#,
                accent = card.accent,
                title = card.title,
            )
        })
        .collect();

    format!(
        r#"<div class="d-flex justify-content-between align-items-center mb-4">
<h1 class="h3 mb-0">Resources Added So Far</h1>
{refresh}
</div>
<div class="row">{cards}</div>"#,
        refresh = post_button(
            "/summary/refresh",
            "Refresh",
            "btn btn-outline-primary",
            panel.is_loading()
        ),
    )
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::components::ResourceCounts;

    #[test]
    fn test_loading_disables_refresh() {
        let mut panel = SummaryPanel::new();
        let _ticket = panel.begin_refresh();

        let html = render(&panel);
        assert!(html.contains("disabled"));
        assert!(html.contains("spinner-border"));
    }

    #[test]
    fn test_counts_and_accents() {
        let mut panel = SummaryPanel::new();
        let ticket = panel.begin_refresh().unwrap();
        panel.complete(
            ticket,
            Ok(ResourceCounts {
                total: 12,
                ct_papers: 5,
                sem_papers: 4,
                study_materials: 3,
            }),
        );

        let html = render(&panel);
        assert!(!html.contains("disabled"));
        assert!(html.contains(">12</p>"));
        assert!(html.contains("#FF5733"));
        assert!(html.contains("Study Material"));
    }
}
