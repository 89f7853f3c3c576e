use crate::layout::{Layout, LayoutError};
use crate::page_client::Subpage;

/// Everything a frontend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub page: u32,
    pub subpage_index: usize,
    pub subpage_count: usize,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub subpage: Option<&'a Subpage>,
    /// `None` when the page has no subpages.
    pub layout: Option<Result<Layout, LayoutError>>,
    /// Digits typed so far while the page-jump prompt is open.
    pub jump_input: Option<&'a str>,
    pub hover_target: Option<u32>,
}

impl View<'_> {
    /// `prev < page > next`, followed by the subpage position and any prompt.
    pub fn status_line(&self) -> String {
        let prev = self.prev_page.map(|p| p.to_string()).unwrap_or_default();
        let next = self.next_page.map(|p| p.to_string()).unwrap_or_default();
        let mut line = format!("{prev} < {} > {next}", self.page);

        if self.subpage_count > 1 {
            line.push_str(&format!("  [{}/{}]", self.subpage_index + 1, self.subpage_count));
        }
        if let Some(target) = self.hover_target {
            line.push_str(&format!("  -> {target}"));
        }
        if let Some(digits) = self.jump_input {
            line.push_str(&format!("  :{digits}"));
        }
        line
    }

    /// Body rows as plain strings; a short notice when there is nothing to lay out.
    pub fn body_lines(&self) -> Vec<String> {
        use crate::layout::Row;

        match &self.layout {
            Some(Ok(layout)) => layout
                .rows()
                .into_iter()
                .map(|row| match row {
                    Row::Header(l) | Row::Content(l) | Row::Footer(l) => l.to_string(),
                    Row::Separator => String::new(),
                })
                .collect(),
            Some(Err(e)) => vec![format!("  ({e})")],
            None => vec!["  (page has no content)".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;

    fn view(layout: Option<Result<Layout, LayoutError>>) -> View<'static> {
        View {
            page: 100,
            subpage_index: 0,
            subpage_count: 1,
            prev_page: None,
            next_page: Some(101),
            subpage: None,
            layout,
            jump_input: None,
            hover_target: None,
        }
    }

    #[test]
    fn test_status_line_with_missing_prev() {
        assert_eq!(view(None).status_line(), " < 100 > 101");
    }

    #[test]
    fn test_status_line_shows_subpage_hover_and_prompt() {
        let mut v = view(None);
        v.subpage_index = 1;
        v.subpage_count = 3;
        v.hover_target = Some(104);
        v.jump_input = Some("3");
        assert_eq!(v.status_line(), " < 100 > 101  [2/3]  -> 104  :3");
    }

    #[test]
    fn test_body_lines_blank_row_between_blocks() {
        let v = view(Some(layout(&["HEAD", "    ", "body", "foot", "x"])));
        assert_eq!(v.body_lines(), vec!["  HEAD  ", "", "  body  ", "", "  foot  "]);
    }

    #[test]
    fn test_body_lines_for_empty_page_and_layout_error() {
        assert_eq!(view(None).body_lines(), vec!["  (page has no content)"]);
        let v = view(Some(Err(LayoutError::EmptyContent)));
        assert_eq!(v.body_lines(), vec!["  (subpage has no non-empty lines)"]);
    }
}
