use cmdbridge_types::CommandInfo;

pub const DOC_SUFFIX: &str = "-doc";

pub fn doc_resource_name(command: &str) -> String {
    format!("{command}{DOC_SUFFIX}")
}

pub fn doc_resource_uri(scheme: &str, command: &str) -> String {
    format!("{scheme}://{command}{DOC_SUFFIX}")
}

/// Render a command's documentation as markdown.
///
/// Sections are emitted only for non-empty fields.
pub fn render_markdown(command: &str, info: &CommandInfo) -> String {
    let mut sections = vec![format!("# {command}")];
    if !info.purpose.trim().is_empty() {
        sections.push(info.purpose.trim().to_string());
    }
    if !info.args.trim().is_empty() {
        sections.push(format!("## Usage\n\n```\n{command} {}\n```", info.args.trim()));
    }
    if !info.doc.trim().is_empty() {
        sections.push(format!("## Details\n\n{}", info.doc.trim()));
    }
    if !info.examples.trim().is_empty() {
        sections.push(format!("## Examples\n\n```\n{}\n```", info.examples.trim()));
    }
    if !info.see_also.is_empty() {
        let links: Vec<String> = info.see_also.iter().map(|name| format!("- {name}")).collect();
        sections.push(format!("## See also\n\n{}", links.join("\n")));
    }
    let mut markdown = sections.join("\n\n");
    markdown.push('\n');
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_empty_sections() {
        let info = CommandInfo {
            name: "status".into(),
            purpose: "Report status.".into(),
            ..CommandInfo::default()
        };
        let markdown = render_markdown("status", &info);
        assert_eq!(markdown, "# status\n\nReport status.\n");
    }

    #[test]
    fn renders_every_populated_section() {
        let info = CommandInfo {
            name: "config".into(),
            purpose: "Get or set config.".into(),
            args: "<application name>".into(),
            doc: "Long text.".into(),
            examples: "juju config mysql\n".into(),
            see_also: vec!["deploy".into(), "status".into()],
        };
        let markdown = render_markdown("config", &info);
        assert!(markdown.contains("## Usage\n\n```\nconfig <application name>\n```"));
        assert!(markdown.contains("## Details\n\nLong text."));
        assert!(markdown.contains("## Examples\n\n```\njuju config mysql\n```"));
        assert!(markdown.contains("## See also\n\n- deploy\n- status"));
    }

    #[test]
    fn uri_and_name_share_suffix() {
        assert_eq!(doc_resource_name("status"), "status-doc");
        assert_eq!(doc_resource_uri("juju", "status"), "juju://status-doc");
    }
}
