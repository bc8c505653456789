//! Output formatting utilities

use crate::application::{NodeReference, TemplateReport};

/// Format scan reports for display.
///
/// Templates without node references are skipped; static entries show a
/// shortened identifier, dynamic ones the expression and line.
pub fn format_scan_report(reports: &[TemplateReport]) -> String {
    let mut output = String::new();

    for report in reports {
        if report.nodes.is_empty() {
            continue;
        }

        output.push_str(&format!("{}\n", report.template.display()));
        for node in &report.nodes {
            match node {
                NodeReference::Static { uri, default, id } => {
                    output.push_str(&format!(
                        "  {}  [{}]  default: {:?}\n",
                        uri,
                        &id[..12],
                        default
                    ));
                }
                NodeReference::Dynamic { expr, line } => {
                    output.push_str(&format!("  {}  (dynamic, line {})\n", expr, line));
                }
            }
        }
    }

    if output.is_empty() {
        return "No node references found\n".to_string();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn static_ref(uri: &str, default: &str) -> NodeReference {
        NodeReference::Static {
            uri: uri.to_string(),
            default: default.to_string(),
            id: "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef".to_string(),
        }
    }

    #[test]
    fn test_format_empty_reports() {
        let output = format_scan_report(&[]);
        assert_eq!(output, "No node references found\n");
    }

    #[test]
    fn test_format_skips_templates_without_nodes() {
        let reports = vec![TemplateReport {
            template: PathBuf::from("plain.html"),
            nodes: vec![],
        }];
        assert_eq!(format_scan_report(&reports), "No node references found\n");
    }

    #[test]
    fn test_format_static_reference() {
        let reports = vec![TemplateReport {
            template: PathBuf::from("page.html"),
            nodes: vec![static_ref("page/title", "Welcome")],
        }];

        let output = format_scan_report(&reports);
        assert!(output.contains("page.html"));
        assert!(output.contains("page/title"));
        assert!(output.contains("[0123456789ab]"));
        assert!(output.contains("default: \"Welcome\""));
    }

    #[test]
    fn test_format_dynamic_reference() {
        let reports = vec![TemplateReport {
            template: PathBuf::from("page.html"),
            nodes: vec![NodeReference::Dynamic {
                expr: "page_uri".to_string(),
                line: 4,
            }],
        }];

        let output = format_scan_report(&reports);
        assert!(output.contains("page_uri  (dynamic, line 4)"));
    }
}
