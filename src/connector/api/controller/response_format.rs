use crate::{ChatResponse, Citation};

const CITATION_PREVIEW_CHARS: usize = 200;

/// Render a response for the terminal: the answer, then the citations it
/// references (or every citation when the answer has no `[docN]` markers).
pub fn format_response(response: &ChatResponse) -> String {
    if let Some(error) = &response.error {
        return format!("Error: {error}");
    }

    let text = response.text();
    if text.trim().is_empty() && response.citations.is_empty() {
        return "(no answer)".to_string();
    }

    let mut output = text;

    let referenced = response.referenced_citations();
    let citations: Vec<(usize, &Citation)> = if referenced.is_empty() {
        response.citations.iter().enumerate().map(|(i, c)| (i + 1, c)).collect()
    } else {
        referenced
    };

    if !citations.is_empty() {
        output.push_str("\n\nCitations:\n");
        for (index, citation) in citations {
            output.push_str(&format!("  [doc{}] {}\n", index, citation.display_title()));
            if let Some(location) = citation.url.as_deref().or(citation.filepath.as_deref()) {
                if location != citation.display_title() {
                    output.push_str(&format!("         {}\n", location));
                }
            }
            let preview = preview(&citation.content);
            if !preview.is_empty() {
                output.push_str(&format!("         | {}\n", preview));
            }
        }
    }

    output
}

fn preview(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= CITATION_PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(CITATION_PREVIEW_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentPart;

    #[test]
    fn formats_error() {
        let response = ChatResponse::failure("An error occurred: timeout");
        assert_eq!(format_response(&response), "Error: An error occurred: timeout");
    }

    #[test]
    fn formats_empty_success() {
        assert_eq!(format_response(&ChatResponse::default()), "(no answer)");
    }

    #[test]
    fn lists_only_referenced_citations() {
        let response = ChatResponse::success(
            vec![ContentPart::text("Travel is economy [doc2].")],
            vec![
                Citation::new("Leave", "25 days"),
                Citation::new("Travel", "economy").with_filepath("travel.md"),
            ],
        );

        let output = format_response(&response);

        assert!(output.starts_with("Travel is economy [doc2]."));
        assert!(output.contains("[doc2] Travel"));
        assert!(output.contains("travel.md"));
        assert!(!output.contains("[doc1] Leave"));
    }

    #[test]
    fn preview_truncates_long_content() {
        let long = "word ".repeat(100);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert!(p.chars().count() <= CITATION_PREVIEW_CHARS + 3);
    }
}
